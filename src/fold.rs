//! Reassembly of folded physical lines into logical lines.
use std::io::BufRead;

use crate::error::{Error, Result};

/// A logical line with its continuations joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
	/// Physical line number the logical line starts on
	pub(crate) line: usize,
	/// Content without line terminators and continuation markers
	pub(crate) text: String,
}

/// Reads physical lines and joins continuations (lines starting with a single
/// space) onto the line before them.
#[derive(Debug)]
pub(crate) struct LineFolder<R> {
	/// The underlying stream
	reader: R,
	/// Maximum physical line length in characters
	max_length: Option<usize>,
	/// Number of physical lines read from the stream
	line_number: usize,
	/// Line read ahead while looking for continuations, with its number
	peeked: Option<(usize, String)>,
}

impl<R: BufRead> LineFolder<R> {
	/// Fold lines read from `reader`.
	pub(crate) fn new(reader: R, max_length: Option<usize>) -> Self {
		Self { reader, max_length, line_number: 0, peeked: None }
	}

	/// Number of the last physical line handed out as part of a logical line.
	pub(crate) fn line_number(&self) -> usize {
		self.line_number - usize::from(self.peeked.is_some())
	}

	/// Change the length limit. Applies to every line not handed out yet.
	pub(crate) fn set_max_length(&mut self, max_length: Option<usize>) {
		self.max_length = max_length;
	}

	/// The underlying stream.
	pub(crate) fn get_ref(&self) -> &R {
		&self.reader
	}

	/// The underlying stream, mutably.
	pub(crate) fn get_mut(&mut self) -> &mut R {
		&mut self.reader
	}

	/// Unwrap the underlying stream. A line read ahead is lost.
	pub(crate) fn into_inner(self) -> R {
		self.reader
	}

	/// Read one physical line, without its terminator.
	fn read_physical(&mut self) -> Result<Option<(usize, String)>> {
		let mut text = String::new();
		if self.reader.read_line(&mut text)? == 0 {
			return Ok(None);
		}
		if text.ends_with('\n') {
			text.pop();
			if text.ends_with('\r') {
				text.pop();
			}
		}
		self.line_number += 1;
		Ok(Some((self.line_number, text)))
	}

	/// Enforce the length limit on a physical line.
	fn check_length(&self, line: usize, text: &str) -> Result<()> {
		match self.max_length {
			Some(max) => {
				let length = text.chars().count();
				if length > max {
					return Err(Error::TooLong { line, length, max });
				}
				Ok(())
			}
			None => Ok(()),
		}
	}

	/// The next logical line, or `None` at the end of the stream.
	///
	/// Empty lines are never continued, a space after one is an error just
	/// like a space on the very first line.
	pub(crate) fn next_line(&mut self) -> Result<Option<LogicalLine>> {
		let next = match self.peeked.take() {
			Some(peeked) => Some(peeked),
			None => self.read_physical()?,
		};
		let Some((line, mut text)) = next else {
			return Ok(None);
		};
		self.check_length(line, &text)?;
		if text.starts_with(' ') {
			return Err(Error::Parser { line, reason: "continuation without a line to continue" });
		}

		if !text.is_empty() {
			while let Some((number, physical)) = self.read_physical()? {
				if let Some(continuation) = physical.strip_prefix(' ') {
					self.check_length(number, &physical)?;
					text.push_str(continuation);
				} else {
					self.peeked = Some((number, physical));
					break;
				}
			}
		}
		tracing::trace!(line, "{text}");
		Ok(Some(LogicalLine { line, text }))
	}
}
