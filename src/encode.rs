use std::io::Write;

use crate::buffer::WriteBuffer;
use crate::error::{BjdataError, Result};
use crate::markers;
use crate::packer::{self, Endian};
use crate::value::{Dtype, NdArray, StructuredArray, Value, is_decimal_text, nonfinite_text, NONFINITE_TEXTS};

/// Structured-array wire layout selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoaFormat {
	/// No forced layout; structured arrays auto-select the columnar form.
	#[default]
	None,
	/// Row-interleaved records behind an array container.
	Row,
	/// Field-contiguous columns behind an object container.
	Column,
}

/// Target wire dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
	/// BJData Draft 2: unsigned wide integers, little-endian default.
	#[default]
	Bjdata,
	/// Strict UBJSON: signed-only wide integers, non-finite floats as null.
	Ubjson,
}

/// Adapter consulted for values the encoder cannot serialize directly.
pub type DefaultFn = fn(&Value) -> Option<Value>;

/// Behavior switches for encoding.
#[derive(Debug, Clone)]
pub struct EncoderPrefs {
	/// Emit `#` count prefixes instead of container terminators.
	pub container_count: bool,
	/// Emit object entries in lexicographic key-byte order.
	pub sort_keys: bool,
	/// Never narrow finite doubles to Float32 (zero stays Float32).
	pub no_float32: bool,
	/// Emit byte blobs as a strongly-typed UInt8 array.
	pub uint8_bytes: bool,
	/// Little-endian numeric payloads when true.
	pub islittle: bool,
	/// Structured-array layout selection.
	pub soa_format: SoaFormat,
	/// Maximum nested composite depth.
	pub recursion_limit: u32,
	/// Wire dialect.
	pub format: WireFormat,
	/// Adapter for otherwise-unencodable values.
	pub default_func: Option<DefaultFn>,
}

impl Default for EncoderPrefs {
	fn default() -> Self {
		Self {
			container_count: false,
			sort_keys: false,
			no_float32: true,
			uint8_bytes: true,
			islittle: true,
			soa_format: SoaFormat::None,
			recursion_limit: 1024,
			format: WireFormat::Bjdata,
			default_func: None,
		}
	}
}

/// Encode `value` through a write sink; all bytes go to `sink`.
pub fn dump(value: &Value, sink: &mut dyn Write, prefs: &EncoderPrefs) -> Result<()> {
	encode_root(value, WriteBuffer::with_sink(sink), prefs).map(|_| ())
}

/// Encode `value` into an owned byte vector.
pub fn dumpb(value: &Value, prefs: &EncoderPrefs) -> Result<Vec<u8>> {
	encode_root(value, WriteBuffer::in_memory(), prefs)
}

fn encode_root(value: &Value, out: WriteBuffer<'_>, prefs: &EncoderPrefs) -> Result<Vec<u8>> {
	if prefs.recursion_limit == 0 {
		return Err(BjdataError::InvalidConfig {
			reason: "recursion_limit must be positive",
		});
	}

	let mut encoder = Encoder {
		out,
		endian: Endian::from_islittle(prefs.islittle),
		prefs,
		depth: 0,
	};
	encoder.encode_value(value)?;
	encoder.out.finalize()
}

struct Encoder<'w, 'p> {
	out: WriteBuffer<'w>,
	endian: Endian,
	prefs: &'p EncoderPrefs,
	depth: u32,
}

impl Encoder<'_, '_> {
	fn encode_value(&mut self, value: &Value) -> Result<()> {
		match value {
			Value::Null => self.out.write_byte(markers::NULL),
			Value::Bool(true) => self.out.write_byte(markers::TRUE),
			Value::Bool(false) => self.out.write_byte(markers::FALSE),
			Value::String(text) => self.encode_string(text),
			Value::Char(ch) => self.encode_char(*ch),
			Value::Int(num) => self.encode_int(*num),
			Value::UInt(num) => self.encode_uint(*num),
			Value::F32(num) => self.encode_f32(*num),
			Value::F64(num) => self.encode_f64(*num),
			Value::HighPrec(text) => self.encode_high_prec(text),
			Value::Bytes(bytes) => self.encode_bytes(bytes),
			Value::NdArray(arr) => match arr.validate() {
				Ok(()) => self.encode_ndarray(arr),
				Err(err) => self.try_default(value, err),
			},
			Value::Structured(arr) => match arr.validate() {
				Ok(()) => self.encode_structured(arr),
				Err(err) => self.try_default(value, err),
			},
			Value::Array(items) => self.encode_array(items),
			Value::Object(pairs) => self.encode_object(pairs),
		}
	}

	/// Re-encode through the user adapter, or surface the original failure.
	fn try_default(&mut self, value: &Value, err: BjdataError) -> Result<()> {
		let Some(adapter) = self.prefs.default_func else {
			return Err(err);
		};
		let Some(replacement) = adapter(value) else {
			return Err(BjdataError::CannotEncode { kind: value.kind() });
		};

		self.enter()?;
		let result = self.encode_value(&replacement);
		self.leave();
		result
	}

	fn encode_string(&mut self, text: &str) -> Result<()> {
		let bytes = text.as_bytes();
		if bytes.len() == 1 && bytes[0] < 0x80 {
			return self.out.write(&[markers::CHAR, bytes[0]]);
		}

		self.out.write_byte(markers::STRING)?;
		self.encode_length(bytes.len())?;
		self.out.write(bytes)
	}

	fn encode_char(&mut self, ch: char) -> Result<()> {
		if (ch as u32) < 0x80 {
			return self.out.write(&[markers::CHAR, ch as u8]);
		}
		// Multi-byte codepoints promote to a string.
		let mut buf = [0_u8; 4];
		let text: &str = ch.encode_utf8(&mut buf);
		self.encode_string(text)
	}

	/// Narrowest-marker integer emission, preferring unsigned for non-negatives.
	fn encode_int(&mut self, num: i64) -> Result<()> {
		if num >= 0 {
			return self.encode_uint(num as u64);
		}

		if num >= -(1_i64 << 7) {
			self.out.write(&[markers::INT8, num as i8 as u8])
		} else if num >= -(1_i64 << 15) {
			self.out.write_byte(markers::INT16)?;
			self.out.write(&packer::pack_i16(num as i16, self.endian))
		} else if num >= -(1_i64 << 31) {
			self.out.write_byte(markers::INT32)?;
			self.out.write(&packer::pack_i32(num as i32, self.endian))
		} else {
			self.out.write_byte(markers::INT64)?;
			self.out.write(&packer::pack_i64(num, self.endian))
		}
	}

	fn encode_uint(&mut self, num: u64) -> Result<()> {
		match self.prefs.format {
			WireFormat::Bjdata => {
				if num < 1 << 8 {
					self.out.write(&[markers::UINT8, num as u8])
				} else if num < 1 << 16 {
					self.out.write_byte(markers::UINT16)?;
					self.out.write(&packer::pack_u16(num as u16, self.endian))
				} else if num < 1 << 32 {
					self.out.write_byte(markers::UINT32)?;
					self.out.write(&packer::pack_u32(num as u32, self.endian))
				} else {
					self.out.write_byte(markers::UINT64)?;
					self.out.write(&packer::pack_u64(num, self.endian))
				}
			}
			WireFormat::Ubjson => {
				if num < 1 << 8 {
					self.out.write(&[markers::UINT8, num as u8])
				} else if num < 1 << 15 {
					self.out.write_byte(markers::INT16)?;
					self.out.write(&packer::pack_i16(num as i16, self.endian))
				} else if num < 1 << 31 {
					self.out.write_byte(markers::INT32)?;
					self.out.write(&packer::pack_i32(num as i32, self.endian))
				} else if num <= i64::MAX as u64 {
					self.out.write_byte(markers::INT64)?;
					self.out.write(&packer::pack_i64(num as i64, self.endian))
				} else {
					// Beyond Int64 there is no unsigned marker in strict mode.
					self.write_high_prec_text(&num.to_string())
				}
			}
		}
	}

	fn encode_length(&mut self, len: usize) -> Result<()> {
		self.encode_uint(len as u64)
	}

	fn encode_f32(&mut self, num: f32) -> Result<()> {
		if !num.is_finite() {
			return self.encode_nonfinite(f64::from(num));
		}
		self.out.write_byte(markers::FLOAT32)?;
		self.out.write(&packer::pack_f32(num, self.endian))
	}

	fn encode_f64(&mut self, num: f64) -> Result<()> {
		if !num.is_finite() {
			return self.encode_nonfinite(num);
		}
		if num == 0.0 {
			self.out.write_byte(markers::FLOAT32)?;
			return self.out.write(&packer::pack_f32(num as f32, self.endian));
		}
		if num.is_subnormal() {
			return self.write_high_prec_text(&format!("{num:e}"));
		}

		let magnitude = num.abs();
		if !self.prefs.no_float32 && (1.18e-38..=3.4e38).contains(&magnitude) {
			self.out.write_byte(markers::FLOAT32)?;
			self.out.write(&packer::pack_f32(num as f32, self.endian))
		} else {
			self.out.write_byte(markers::FLOAT64)?;
			self.out.write(&packer::pack_f64(num, self.endian))
		}
	}

	fn encode_nonfinite(&mut self, num: f64) -> Result<()> {
		match self.prefs.format {
			WireFormat::Ubjson => self.out.write_byte(markers::NULL),
			WireFormat::Bjdata => self.write_high_prec_text(nonfinite_text(num)),
		}
	}

	fn encode_high_prec(&mut self, text: &str) -> Result<()> {
		if NONFINITE_TEXTS.contains(&text) {
			return self.out.write_byte(markers::NULL);
		}
		if !is_decimal_text(text) {
			return Err(BjdataError::InvalidHighPrec { text: text.to_owned() });
		}
		self.write_high_prec_text(text)
	}

	fn write_high_prec_text(&mut self, text: &str) -> Result<()> {
		self.out.write_byte(markers::HIGH_PREC)?;
		self.encode_length(text.len())?;
		self.out.write(text.as_bytes())
	}

	fn encode_bytes(&mut self, bytes: &[u8]) -> Result<()> {
		if self.prefs.uint8_bytes {
			self.out.write(&[markers::ARRAY_START, markers::CONTAINER_TYPE, markers::UINT8, markers::CONTAINER_COUNT])?;
			self.encode_length(bytes.len())?;
			// no ARRAY_END since the count was specified
			return self.out.write(bytes);
		}

		self.out.write_byte(markers::ARRAY_START)?;
		if self.prefs.container_count {
			self.out.write_byte(markers::CONTAINER_COUNT)?;
			self.encode_length(bytes.len())?;
		}
		for byte in bytes {
			self.encode_uint(u64::from(*byte))?;
		}
		if !self.prefs.container_count {
			self.out.write_byte(markers::ARRAY_END)?;
		}
		Ok(())
	}

	fn encode_ndarray(&mut self, arr: &NdArray) -> Result<()> {
		if arr.shape.is_empty() {
			// Variable-length string scalars carry a count prefix.
			if arr.dtype == Dtype::Char {
				self.out.write_byte(markers::STRING)?;
				self.encode_length(arr.data.len())?;
				return self.out.write(&arr.data);
			}
			self.out.write_byte(arr.dtype.wire_marker())?;
			return self.write_payload(&arr.data, arr.dtype.size());
		}

		self.out.write(&[
			markers::ARRAY_START,
			markers::CONTAINER_TYPE,
			arr.dtype.wire_marker(),
			markers::CONTAINER_COUNT,
			markers::ARRAY_START,
		])?;
		for dim in &arr.shape {
			self.encode_length(*dim)?;
		}
		self.out.write_byte(markers::ARRAY_END)?;
		// no ARRAY_END for the outer container since the shape was specified
		self.write_payload(&arr.data, arr.dtype.size())
	}

	fn encode_structured(&mut self, arr: &StructuredArray) -> Result<()> {
		let row = matches!(self.prefs.soa_format, SoaFormat::Row);
		self.encode_soa(arr, row)
	}

	fn encode_soa(&mut self, arr: &StructuredArray, row: bool) -> Result<()> {
		let count = arr.count().ok_or(BjdataError::CannotEncode { kind: "structured" })?;

		self.out.write_byte(if row { markers::ARRAY_START } else { markers::OBJECT_START })?;
		self.out.write(&[markers::CONTAINER_TYPE, markers::OBJECT_START])?;
		for field in &arr.fields {
			self.encode_length(field.name.len())?;
			self.out.write(field.name.as_bytes())?;
			self.out.write_byte(field.dtype.schema_marker())?;
		}
		self.out.write_byte(markers::OBJECT_END)?;

		self.out.write_byte(markers::CONTAINER_COUNT)?;
		if arr.shape.len() > 1 {
			self.out.write_byte(markers::ARRAY_START)?;
			for dim in &arr.shape {
				self.encode_length(*dim)?;
			}
			self.out.write_byte(markers::ARRAY_END)?;
		} else {
			self.encode_length(arr.shape[0])?;
		}

		if row {
			for record in 0..count {
				for (field, column) in arr.fields.iter().zip(&arr.columns) {
					let width = field.dtype.size();
					let element = &column[record * width..(record + 1) * width];
					if field.dtype == Dtype::Bool {
						self.out.write_byte(if element[0] != 0 { markers::TRUE } else { markers::FALSE })?;
					} else {
						self.write_payload(element, width)?;
					}
				}
			}
		} else {
			for (field, column) in arr.fields.iter().zip(&arr.columns) {
				if field.dtype == Dtype::Bool {
					for byte in column {
						self.out.write_byte(if *byte != 0 { markers::TRUE } else { markers::FALSE })?;
					}
				} else {
					self.write_payload(column, field.dtype.size())?;
				}
			}
		}
		Ok(())
	}

	fn encode_array(&mut self, items: &[Value]) -> Result<()> {
		self.enter()?;
		self.out.write_byte(markers::ARRAY_START)?;
		if self.prefs.container_count {
			self.out.write_byte(markers::CONTAINER_COUNT)?;
			self.encode_length(items.len())?;
		}

		for item in items {
			self.encode_value(item)?;
		}

		if !self.prefs.container_count {
			self.out.write_byte(markers::ARRAY_END)?;
		}
		self.leave();
		Ok(())
	}

	fn encode_object(&mut self, pairs: &[(String, Value)]) -> Result<()> {
		self.enter()?;
		self.out.write_byte(markers::OBJECT_START)?;
		if self.prefs.container_count {
			self.out.write_byte(markers::CONTAINER_COUNT)?;
			self.encode_length(pairs.len())?;
		}

		if self.prefs.sort_keys {
			let mut sorted: Vec<&(String, Value)> = pairs.iter().collect();
			sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
			for (key, value) in sorted.iter().map(|pair| (&pair.0, &pair.1)) {
				self.encode_key(key)?;
				self.encode_value(value)?;
			}
		} else {
			for (key, value) in pairs {
				self.encode_key(key)?;
				self.encode_value(value)?;
			}
		}

		if !self.prefs.container_count {
			self.out.write_byte(markers::OBJECT_END)?;
		}
		self.leave();
		Ok(())
	}

	/// Object keys are a bare length-prefixed UTF-8 run, no marker.
	fn encode_key(&mut self, key: &str) -> Result<()> {
		self.encode_length(key.len())?;
		self.out.write(key.as_bytes())
	}

	fn write_payload(&mut self, data: &[u8], width: usize) -> Result<()> {
		if self.endian == Endian::Big && width > 1 {
			let mut swapped = data.to_vec();
			packer::swap_element_bytes(&mut swapped, width);
			self.out.write(&swapped)
		} else {
			self.out.write(data)
		}
	}

	fn enter(&mut self) -> Result<()> {
		if self.depth >= self.prefs.recursion_limit {
			return Err(BjdataError::RecursionLimitExceeded {
				limit: self.prefs.recursion_limit,
			});
		}
		self.depth += 1;
		Ok(())
	}

	fn leave(&mut self) {
		self.depth -= 1;
	}
}
