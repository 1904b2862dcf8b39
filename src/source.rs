use std::io::Read;

use crate::error::{BjdataError, Result};

/// Pull-style byte source over a preloaded slice or an upstream reader.
///
/// Tracks the absolute input offset for error reporting and supports the
/// single byte of lookahead the decoder grammar needs.
pub struct Source<'r> {
	kind: SourceKind<'r>,
	peeked: Option<u8>,
	pos: usize,
}

enum SourceKind<'r> {
	Slice { bytes: &'r [u8], cursor: usize },
	Reader(&'r mut dyn Read),
}

impl<'r> Source<'r> {
	/// Create a source over a borrowed byte slice.
	pub fn from_slice(bytes: &'r [u8]) -> Self {
		Self {
			kind: SourceKind::Slice { bytes, cursor: 0 },
			peeked: None,
			pos: 0,
		}
	}

	/// Create a source over an upstream blocking reader.
	pub fn from_reader(reader: &'r mut dyn Read) -> Self {
		Self {
			kind: SourceKind::Reader(reader),
			peeked: None,
			pos: 0,
		}
	}

	/// Absolute offset of the next unread byte.
	pub fn pos(&self) -> usize {
		self.pos - usize::from(self.peeked.is_some())
	}

	/// Read one byte and advance.
	pub fn read_byte(&mut self) -> Result<u8> {
		if let Some(byte) = self.peeked.take() {
			return Ok(byte);
		}

		let mut byte = [0_u8; 1];
		self.fill(&mut byte)?;
		Ok(byte[0])
	}

	/// Return the next byte without consuming it.
	pub fn peek_byte(&mut self) -> Result<u8> {
		if let Some(byte) = self.peeked {
			return Ok(byte);
		}

		let byte = self.read_byte()?;
		self.peeked = Some(byte);
		Ok(byte)
	}

	/// Read exactly `out.len()` bytes into `out`.
	pub fn read_into(&mut self, out: &mut [u8]) -> Result<()> {
		if out.is_empty() {
			return Ok(());
		}

		let mut start = 0;
		if let Some(byte) = self.peeked.take() {
			out[0] = byte;
			start = 1;
		}
		self.fill(&mut out[start..])
	}

	/// Read exactly `n` bytes into a fresh vector.
	///
	/// Large reads grow the vector chunk-by-chunk so a hostile declared
	/// length cannot force a huge allocation before any byte arrives.
	pub fn read_vec(&mut self, n: usize) -> Result<Vec<u8>> {
		const CHUNK: usize = 64 * 1024;

		if n <= CHUNK {
			let mut out = vec![0_u8; n];
			self.read_into(&mut out)?;
			return Ok(out);
		}

		let mut out = Vec::with_capacity(CHUNK);
		let mut remaining = n;
		while remaining > 0 {
			let take = remaining.min(CHUNK);
			let start = out.len();
			out.resize(start + take, 0);
			self.read_into(&mut out[start..])?;
			remaining -= take;
		}
		Ok(out)
	}

	fn fill(&mut self, out: &mut [u8]) -> Result<()> {
		if out.is_empty() {
			return Ok(());
		}

		match &mut self.kind {
			SourceKind::Slice { bytes, cursor } => {
				let remaining = bytes.len().saturating_sub(*cursor);
				if out.len() > remaining {
					return Err(BjdataError::UnexpectedEnd {
						at: self.pos,
						need: out.len() - remaining,
					});
				}
				out.copy_from_slice(&bytes[*cursor..*cursor + out.len()]);
				*cursor += out.len();
			}
			SourceKind::Reader(reader) => {
				if let Err(err) = reader.read_exact(out) {
					if err.kind() == std::io::ErrorKind::UnexpectedEof {
						return Err(BjdataError::UnexpectedEnd {
							at: self.pos,
							need: out.len(),
						});
					}
					return Err(err.into());
				}
			}
		}

		self.pos += out.len();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::Source;
	use crate::error::BjdataError;

	#[test]
	fn slice_reads_and_tracks_position() {
		let mut src = Source::from_slice(b"abcd");
		assert_eq!(src.read_byte().unwrap(), b'a');
		assert_eq!(src.pos(), 1);

		let mut two = [0_u8; 2];
		src.read_into(&mut two).unwrap();
		assert_eq!(&two, b"bc");
		assert_eq!(src.pos(), 3);
	}

	#[test]
	fn peek_does_not_advance() {
		let mut src = Source::from_slice(b"xy");
		assert_eq!(src.peek_byte().unwrap(), b'x');
		assert_eq!(src.pos(), 0);
		assert_eq!(src.read_byte().unwrap(), b'x');
		assert_eq!(src.read_byte().unwrap(), b'y');
	}

	#[test]
	fn peeked_byte_feeds_bulk_reads() {
		let mut src = Source::from_slice(b"hello");
		assert_eq!(src.peek_byte().unwrap(), b'h');
		assert_eq!(src.read_vec(5).unwrap(), b"hello");
	}

	#[test]
	fn short_input_reports_unexpected_end() {
		let mut src = Source::from_slice(b"ab");
		let err = src.read_vec(5).unwrap_err();
		assert!(matches!(err, BjdataError::UnexpectedEnd { need: 3, .. }));
	}

	#[test]
	fn reader_source_matches_slice_source() {
		let data = b"stream".to_vec();
		let mut cursor = std::io::Cursor::new(data);
		let mut src = Source::from_reader(&mut cursor);
		assert_eq!(src.peek_byte().unwrap(), b's');
		assert_eq!(src.read_vec(6).unwrap(), b"stream");
		assert!(matches!(src.read_byte(), Err(BjdataError::UnexpectedEnd { .. })));
	}
}
