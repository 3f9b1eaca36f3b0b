use std::{error::Error, io::Write, sync::Once};

use ldif_decoder::{Entry, LdifReader};
use tempfile::NamedTempFile;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

static TRACING: Once = Once::new();

pub fn init_tracing() {
	TRACING.call_once(|| {
		let tracing_filter = EnvFilter::default().add_directive(LevelFilter::DEBUG.into());
		let _ = tracing_subscriber::fmt().with_env_filter(tracing_filter).with_test_writer().try_init();
	});
}

pub fn reader(text: &str) -> LdifReader<&[u8]> {
	init_tracing();
	LdifReader::new(text.as_bytes())
}

pub fn first_entry(text: &str) -> Result<Entry, Box<dyn Error>> {
	let entry = reader(text).next_entry()?.ok_or("No entry decoded")?;
	Ok(entry)
}

pub fn temp_file(content: &[u8]) -> Result<NamedTempFile, Box<dyn Error>> {
	let mut file = NamedTempFile::new()?;
	file.write_all(content)?;
	file.flush()?;
	Ok(file)
}
