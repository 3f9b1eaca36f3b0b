#![allow(
	clippy::dbg_macro,
	clippy::expect_used,
	clippy::missing_docs_in_private_items,
	clippy::print_stderr,
	clippy::print_stdout,
	clippy::unwrap_used
)]
use std::error::Error;

use ldif_decoder::{Config, LdifReader, ResourceHandlers, SearchEntry, Value};
use url::Url;

mod common;

use common::{first_entry, reader, temp_file};

#[test]
fn version() -> Result<(), Box<dyn Error>> {
	let mut reader = reader("version: 1\ndn: cn=test\ncn: test\n");
	let entry = reader.next_entry()?.unwrap();
	assert_eq!(reader.version(), Some(1));
	assert_eq!(entry.dn(), "cn=test");

	let mut reader = common::reader("dn: cn=test\n");
	reader.next_entry()?;
	assert_eq!(reader.version(), None, "Version should be unset without a version line");
	Ok(())
}

#[test]
fn missing_dn() {
	let err = reader("changetype: add\nsn: test\ncn: test\n").next_entry().unwrap_err();
	assert!(err.to_string().contains("Missing distinguished name"));
	assert!(err.to_string().contains("entry #1"));
}

#[test]
fn invalid_file() -> Result<(), Box<dyn Error>> {
	let err = reader(" invalid\n").next_entry().unwrap_err();
	assert!(err.to_string().contains("Parser error"));

	let err = reader("dn: cn=test\nnotvalid attribute\n").next_entry().unwrap_err();
	assert!(err.to_string().contains("Invalid attribute value pair:"));
	assert!(err.to_string().contains("entry #1"));

	let config = Config { max_length: Some(12), ..Config::default() };
	let err = LdifReader::with_config("dn: cn=toolong\n".as_bytes(), config)?.next_entry().unwrap_err();
	assert!(err.to_string().contains("too long"));
	assert!(err.to_string().contains("Line 1"));

	let err = reader("dn: cn=test notvalid: attribute\n").next_entry().unwrap_err();
	assert!(err.to_string().contains("Invalid attribute value pair:"));
	assert!(err.to_string().contains("entry #1"));
	Ok(())
}

#[test]
fn too_long_across_entries() -> Result<(), Box<dyn Error>> {
	let config = Config { max_length: Some(20), ..Config::default() };
	let text = "dn: cn=a\n\ndn: cn=b\ndescription: this is much too long\n";
	let mut reader = LdifReader::with_config(text.as_bytes(), config)?;
	assert_eq!(reader.next_entry()?.unwrap().dn(), "cn=a");
	let err = reader.next_entry().unwrap_err();
	assert!(err.to_string().contains("Line 4"), "{err}");
	Ok(())
}

#[test]
fn comment() -> Result<(), Box<dyn Error>> {
	let entry = first_entry("# DN: cn=test\ndn: cn=test\n#Other comment line.\ncn: test\n")?;
	assert_eq!(entry.dn(), "cn=test");
	assert_eq!(entry.get("cn"), Some(&[Value::from("test")][..]));
	assert_eq!(entry.attributes().count(), 1, "Comments should not become attributes");

	let entry = first_entry("# A long multiline comment\n in an LDIF file.\ndn: cn=test\n")?;
	assert_eq!(entry.dn(), "cn=test");

	let entry = first_entry("dn: cn=a\n# c\n more\ncn: a\n")?;
	assert_eq!(entry.dn(), "cn=a");
	assert_eq!(entry.attributes().count(), 1, "Folded comments should not become attributes");
	assert_eq!(entry.get("cn"), Some(&[Value::from("a")][..]));
	Ok(())
}

#[test]
fn autoload() {
	let mut reader = reader("");
	assert!(reader.autoload());
	reader.set_autoload(false);
	assert!(!reader.autoload());
}

#[test]
fn resource_handlers() {
	let mut reader = reader("");
	assert!(reader.resource_handlers().contains("file"));

	let mut replacement = ResourceHandlers::empty();
	replacement.insert("new", |_: &Url| Ok(Value::from("dict")));
	assert!(reader.set_resource_handlers(replacement).is_err());
	assert!(!reader.resource_handlers().contains("new"), "Invalid handlers should not be applied");

	reader.resource_handlers_mut().insert("http", |url: &Url| Ok(Value::from(url.as_str())));
	assert!(reader.resource_handlers().contains("http"));
}

#[test]
fn load_file_reference() -> Result<(), Box<dyn Error>> {
	let photo = temp_file(&[0xff, 0xd8, 0xff, 0xe0])?;
	let description = temp_file(b"Loaded from a file")?;
	let text = format!(
		"dn: cn=test\njpegPhoto:< {}\ndescription:< {}\n",
		Url::from_file_path(photo.path()).unwrap(),
		Url::from_file_path(description.path()).unwrap(),
	);
	let entry = first_entry(&text)?;
	assert_eq!(entry.bin_attr_first("jpegPhoto"), Some(&[0xff, 0xd8, 0xff, 0xe0][..]));
	assert_eq!(entry.attr_first("description"), Some("Loaded from a file"));
	Ok(())
}

#[test]
fn custom_resource_handler() -> Result<(), Box<dyn Error>> {
	let mut reader = reader("dn: cn=test\ndescription:< memory:greeting\n");
	reader
		.resource_handlers_mut()
		.insert("memory", |url: &Url| Ok(Value::Text(format!("hello from {}", url.path()))));
	let entry = reader.next_entry()?.unwrap();
	assert_eq!(entry.attr_first("description"), Some("hello from greeting"));
	Ok(())
}

#[test]
fn multiline_attribute() -> Result<(), Box<dyn Error>> {
	let text = "dn: cn=unimaginably+sn=very,ou=very,dc=very,dc=long,\n dc=line\ncn: unimaginably\nsn: very\n";
	let entry = first_entry(text)?;
	assert_eq!(entry.dn(), "cn=unimaginably+sn=very,ou=very,dc=very,dc=long,dc=line");
	assert_eq!(entry.attr_first("cn"), Some("unimaginably"));
	assert_eq!(entry.attr_first("sn"), Some("very"));
	Ok(())
}

#[test]
fn folded_value_is_concatenated() -> Result<(), Box<dyn Error>> {
	let fragments = ["Lorem ipsum ", "dolor sit", " amet,", "consectetur"];
	let mut text = format!("dn: cn=test\ndescription: {}\n", fragments[0]);
	for fragment in &fragments[1..] {
		text.push_str(&format!(" {fragment}\n"));
	}
	let entry = first_entry(&text)?;
	assert_eq!(entry.attr_first("description"), Some(fragments.concat().as_str()));
	Ok(())
}

#[test]
fn multiple_entries() -> Result<(), Box<dyn Error>> {
	let text = "dn: cn=test1\ncn: test1\n\ndn: cn=test2\ncn: test2\n";
	let entries = reader(text).collect::<Result<Vec<_>, _>>()?;
	assert_eq!(entries.len(), 2);
	assert_eq!(entries[0].dn(), "cn=test1");
	assert_eq!(entries[1].attr_first("cn"), Some("test2"));

	let text = "\n\ndn: cn=test1\n\n\n\ndn: cn=test2\n\n\n";
	let entries = reader(text).collect::<Result<Vec<_>, _>>()?;
	assert_eq!(entries.len(), 2, "Extra blank lines should not produce entries");
	Ok(())
}

#[test]
fn changetype() -> Result<(), Box<dyn Error>> {
	let entry = first_entry("dn: cn=test\nchangetype: add\ncn: test\n")?;
	assert_eq!(entry.dn(), "cn=test");
	assert!(entry.contains("cn"));
	assert!(!entry.contains("changetype"));
	assert_eq!(entry.changetype(), Some("add"));
	Ok(())
}

#[test]
fn values_keep_order() -> Result<(), Box<dyn Error>> {
	let entry = first_entry("dn: cn=test\nmail: a@example.com\ncn: test\nMail: b@example.com\n")?;
	let mails: Vec<_> = entry.get("mail").unwrap().iter().filter_map(Value::as_str).collect();
	assert_eq!(mails, ["a@example.com", "b@example.com"]);
	Ok(())
}

#[test]
fn open_file() -> Result<(), Box<dyn Error>> {
	let file = temp_file(b"version: 1\r\ndn: cn=test\r\ncn: test\r\n")?;
	let mut reader = LdifReader::open(file.path())?;
	let entry = reader.next_entry()?.unwrap();
	assert_eq!(entry.attr_first("cn"), Some("test"));
	assert!(reader.next_entry()?.is_none());
	Ok(())
}

#[test]
fn binary_input_is_rejected() {
	let mut reader = LdifReader::new(&b"dn: cn=test\ncn: \xff\xfe\n"[..]);
	assert!(matches!(reader.next_entry(), Err(ldif_decoder::Error::Io(_))));
}

#[test]
fn search_entry() -> Result<(), Box<dyn Error>> {
	let entry = first_entry("dn: uid=jdoe,dc=example,dc=com\nchangetype: add\ncn: John Doe\n")?;
	let entry = SearchEntry::from(entry);
	assert_eq!(entry.dn, "uid=jdoe,dc=example,dc=com");
	assert_eq!(entry.attrs["cn"], ["John Doe"]);
	assert!(!entry.attrs.contains_key("changetype"));
	Ok(())
}
