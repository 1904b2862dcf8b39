use std::io::Write;

use crate::error::Result;

/// Initial capacity when accumulating fully in memory.
const INITIAL_CAPACITY: usize = 64;
/// Buffered bytes before flushing to a configured sink.
const SINK_THRESHOLD: usize = 256;

/// Resizable output buffer, optionally flushing to a write sink.
///
/// Without a sink the buffer grows until `finalize` returns the
/// accumulated bytes. With a sink, buffered bytes are handed over
/// whenever the high-water mark is reached; `finalize` flushes the
/// remainder and returns empty.
pub struct WriteBuffer<'w> {
	buf: Vec<u8>,
	sink: Option<&'w mut dyn Write>,
	threshold: usize,
}

impl<'w> WriteBuffer<'w> {
	/// Create an in-memory buffer.
	pub fn in_memory() -> WriteBuffer<'static> {
		WriteBuffer {
			buf: Vec::with_capacity(INITIAL_CAPACITY),
			sink: None,
			threshold: usize::MAX,
		}
	}

	/// Create a buffer that flushes to `sink` at the high-water mark.
	pub fn with_sink(sink: &'w mut dyn Write) -> Self {
		Self {
			buf: Vec::with_capacity(SINK_THRESHOLD),
			sink: Some(sink),
			threshold: SINK_THRESHOLD,
		}
	}

	/// Append a slice, flushing if the threshold is reached.
	pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
		self.buf.extend_from_slice(bytes);
		if self.buf.len() >= self.threshold {
			self.flush()?;
		}
		Ok(())
	}

	/// Append a single byte.
	pub fn write_byte(&mut self, byte: u8) -> Result<()> {
		self.write(&[byte])
	}

	/// Bytes currently buffered (not yet flushed).
	pub fn buffered_len(&self) -> usize {
		self.buf.len()
	}

	/// Flush remaining bytes to the sink, or return the accumulated bytes.
	pub fn finalize(mut self) -> Result<Vec<u8>> {
		if self.sink.is_some() {
			self.flush()?;
			Ok(Vec::new())
		} else {
			self.buf.shrink_to_fit();
			Ok(self.buf)
		}
	}

	fn flush(&mut self) -> Result<()> {
		if let Some(sink) = self.sink.as_deref_mut() {
			if !self.buf.is_empty() {
				sink.write_all(&self.buf)?;
				self.buf.clear();
			}
		}
		Ok(())
	}
}
