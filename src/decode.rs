use std::collections::HashMap;
use std::io::Read;

use crate::error::{BjdataError, Result};
use crate::markers;
use crate::packer::{self, Endian};
use crate::source::Source;
use crate::value::{Dtype, Field, NdArray, StructuredArray, Value, is_decimal_text};

/// Hook constructing a mapping value from ordered key/value pairs.
pub type PairsHook = fn(Vec<(String, Value)>) -> Value;

/// Behavior switches and resource limits for decoding.
#[derive(Debug, Clone)]
pub struct DecoderPrefs {
	/// Expected endianness of numeric payloads (true = little).
	pub islittle: bool,
	/// Reuse equal key strings across object entries.
	pub intern_object_keys: bool,
	/// Callable constructing mappings from ordered pairs.
	pub object_pairs_hook: Option<PairsHook>,
	/// Keep UInt8 typed arrays as integer sequences instead of raw bytes.
	pub no_bytes: bool,
	/// Maximum declared element count for any single container.
	pub max_container_len: usize,
	/// Maximum NDArray/structured-array element count (shape product).
	pub max_ndarray_elems: usize,
	/// Maximum nested container depth.
	pub recursion_limit: u32,
}

impl Default for DecoderPrefs {
	fn default() -> Self {
		Self {
			islittle: true,
			intern_object_keys: false,
			object_pairs_hook: None,
			no_bytes: false,
			max_container_len: 1 << 30,
			max_ndarray_elems: 1 << 30,
			recursion_limit: 1024,
		}
	}
}

/// Decode exactly one value from a blocking reader.
pub fn load(source: &mut dyn Read, prefs: &DecoderPrefs) -> Result<Value> {
	decode_root(Source::from_reader(source), prefs)
}

/// Decode exactly one value from a byte slice.
pub fn loadb(bytes: &[u8], prefs: &DecoderPrefs) -> Result<Value> {
	decode_root(Source::from_slice(bytes), prefs)
}

fn decode_root(src: Source<'_>, prefs: &DecoderPrefs) -> Result<Value> {
	if prefs.recursion_limit == 0 {
		return Err(BjdataError::InvalidConfig {
			reason: "recursion_limit must be positive",
		});
	}
	if prefs.max_container_len == 0 || prefs.max_ndarray_elems == 0 {
		return Err(BjdataError::InvalidConfig {
			reason: "container limits must be positive",
		});
	}

	let mut decoder = Decoder {
		src,
		endian: Endian::from_islittle(prefs.islittle),
		prefs,
		depth: 0,
		key_cache: HashMap::new(),
	};
	decoder.decode_value()
}

struct Decoder<'r, 'p> {
	src: Source<'r>,
	endian: Endian,
	prefs: &'p DecoderPrefs,
	depth: u32,
	key_cache: HashMap<Vec<u8>, String>,
}

impl Decoder<'_, '_> {
	fn decode_value(&mut self) -> Result<Value> {
		let at = self.src.pos();
		let marker = self.src.read_byte()?;
		self.decode_marker(marker, at)
	}

	fn decode_marker(&mut self, marker: u8, at: usize) -> Result<Value> {
		match marker {
			markers::NULL => Ok(Value::Null),
			markers::TRUE => Ok(Value::Bool(true)),
			markers::FALSE => Ok(Value::Bool(false)),
			markers::INT8 => {
				let byte = self.src.read_byte()?;
				Ok(Value::Int(i64::from(byte as i8)))
			}
			markers::UINT8 => Ok(Value::Int(i64::from(self.src.read_byte()?))),
			markers::INT16 => self.read_signed(2),
			markers::INT32 => self.read_signed(4),
			markers::INT64 => self.read_signed(8),
			markers::UINT16 => self.read_unsigned(2),
			markers::UINT32 => self.read_unsigned(4),
			markers::UINT64 => self.read_unsigned(8),
			markers::FLOAT16 => {
				let mut buf = [0_u8; 2];
				self.src.read_into(&mut buf)?;
				Ok(Value::F32(packer::unpack_f16(buf, self.endian)))
			}
			markers::FLOAT32 => {
				let mut buf = [0_u8; 4];
				self.src.read_into(&mut buf)?;
				Ok(Value::F32(packer::unpack_f32(buf, self.endian)))
			}
			markers::FLOAT64 => {
				let mut buf = [0_u8; 8];
				self.src.read_into(&mut buf)?;
				Ok(Value::F64(packer::unpack_f64(buf, self.endian)))
			}
			markers::HIGH_PREC => self.decode_high_prec(),
			markers::CHAR => {
				let at = self.src.pos();
				let byte = self.src.read_byte()?;
				if byte >= 0x80 {
					return Err(BjdataError::InvalidChar { byte, at });
				}
				Ok(Value::Char(char::from(byte)))
			}
			markers::STRING => Ok(Value::String(self.read_string()?)),
			markers::ARRAY_START => self.decode_array(),
			markers::OBJECT_START => self.decode_object(),
			other => Err(BjdataError::UnknownMarker { marker: other, at }),
		}
	}

	fn read_signed(&mut self, width: usize) -> Result<Value> {
		let mut buf = [0_u8; 8];
		self.src.read_into(&mut buf[..width])?;
		Ok(Value::Int(packer::unpack_int(&buf[..width], self.endian)?))
	}

	fn read_unsigned(&mut self, width: usize) -> Result<Value> {
		let mut buf = [0_u8; 8];
		self.src.read_into(&mut buf[..width])?;
		let raw = packer::unpack_uint(&buf[..width], self.endian)?;
		// Normalize everything that fits the signed carrier.
		if raw <= i64::MAX as u64 {
			Ok(Value::Int(raw as i64))
		} else {
			Ok(Value::UInt(raw))
		}
	}

	fn decode_high_prec(&mut self) -> Result<Value> {
		let len = self.read_length()?;
		let at = self.src.pos();
		let bytes = self.src.read_vec(len)?;
		let text = String::from_utf8(bytes).map_err(|_| BjdataError::InvalidUtf8 { at })?;

		match text.as_str() {
			"NaN" => Ok(Value::F64(f64::NAN)),
			"Infinity" => Ok(Value::F64(f64::INFINITY)),
			"-Infinity" => Ok(Value::F64(f64::NEG_INFINITY)),
			_ if is_decimal_text(&text) => Ok(Value::HighPrec(text)),
			_ => Err(BjdataError::InvalidHighPrec { text }),
		}
	}

	/// Read an integer-marked length, enforcing sign and the count limit.
	fn read_length(&mut self) -> Result<usize> {
		let at = self.src.pos();
		let marker = self.src.read_byte()?;

		let raw: u64 = match marker {
			markers::UINT8 => u64::from(self.src.read_byte()?),
			markers::UINT16 | markers::UINT32 | markers::UINT64 => {
				let width = match marker {
					markers::UINT16 => 2,
					markers::UINT32 => 4,
					_ => 8,
				};
				let mut buf = [0_u8; 8];
				self.src.read_into(&mut buf[..width])?;
				packer::unpack_uint(&buf[..width], self.endian)?
			}
			markers::INT8 | markers::INT16 | markers::INT32 | markers::INT64 => {
				let width = match marker {
					markers::INT8 => 1,
					markers::INT16 => 2,
					markers::INT32 => 4,
					_ => 8,
				};
				let mut buf = [0_u8; 8];
				self.src.read_into(&mut buf[..width])?;
				let value = packer::unpack_int(&buf[..width], self.endian)?;
				if value < 0 {
					return Err(BjdataError::NegativeLength { value, at });
				}
				value as u64
			}
			other => return Err(BjdataError::UnknownMarker { marker: other, at }),
		};

		let len = usize::try_from(raw).unwrap_or(usize::MAX);
		if len > self.prefs.max_container_len {
			return Err(BjdataError::CountTooLarge {
				count: len,
				max: self.prefs.max_container_len,
			});
		}
		Ok(len)
	}

	fn read_string(&mut self) -> Result<String> {
		let len = self.read_length()?;
		let at = self.src.pos();
		let bytes = self.src.read_vec(len)?;
		String::from_utf8(bytes).map_err(|_| BjdataError::InvalidUtf8 { at })
	}

	/// Object keys are a bare length-prefixed UTF-8 run, optionally interned.
	fn read_key(&mut self) -> Result<String> {
		let len = self.read_length()?;
		let at = self.src.pos();
		let bytes = self.src.read_vec(len)?;

		if self.prefs.intern_object_keys {
			if let Some(known) = self.key_cache.get(&bytes) {
				return Ok(known.clone());
			}
			let key = String::from_utf8(bytes.clone()).map_err(|_| BjdataError::InvalidUtf8 { at })?;
			self.key_cache.insert(bytes, key.clone());
			return Ok(key);
		}

		String::from_utf8(bytes).map_err(|_| BjdataError::InvalidUtf8 { at })
	}

	fn decode_array(&mut self) -> Result<Value> {
		match self.src.peek_byte()? {
			markers::CONTAINER_TYPE => {
				self.src.read_byte()?;
				self.decode_typed_array()
			}
			markers::CONTAINER_COUNT => {
				self.src.read_byte()?;
				let count = self.read_length()?;
				self.enter()?;
				let mut items = Vec::with_capacity(count.min(1024));
				for _ in 0..count {
					items.push(self.decode_value()?);
				}
				self.leave();
				Ok(Value::Array(items))
			}
			_ => {
				self.enter()?;
				let mut items = Vec::new();
				loop {
					let byte = self.src.peek_byte()?;
					if byte == markers::ARRAY_END {
						self.src.read_byte()?;
						break;
					}
					if byte == markers::NOOP {
						self.src.read_byte()?;
						continue;
					}
					items.push(self.decode_value()?);
				}
				self.leave();
				Ok(Value::Array(items))
			}
		}
	}

	fn decode_typed_array(&mut self) -> Result<Value> {
		let at = self.src.pos();
		let type_marker = self.src.read_byte()?;
		if type_marker == markers::OBJECT_START {
			return self.decode_soa(true);
		}

		let dtype = Dtype::from_wire_marker(type_marker).ok_or(BjdataError::UnsupportedType {
			marker: type_marker,
			at,
		})?;
		self.expect_count()?;

		if self.src.peek_byte()? == markers::ARRAY_START {
			self.src.read_byte()?;
			let shape = self.read_shape()?;
			return self.read_ndarray(dtype, shape);
		}

		let count = self.read_length()?;
		if dtype == Dtype::UInt8 && !self.prefs.no_bytes {
			return Ok(Value::Bytes(self.src.read_vec(count)?));
		}

		let mut items = Vec::with_capacity(count.min(1024));
		for _ in 0..count {
			items.push(self.decode_scalar_of(dtype)?);
		}
		Ok(Value::Array(items))
	}

	fn decode_object(&mut self) -> Result<Value> {
		match self.src.peek_byte()? {
			markers::CONTAINER_TYPE => {
				self.src.read_byte()?;
				let at = self.src.pos();
				let type_marker = self.src.read_byte()?;
				if type_marker == markers::OBJECT_START {
					return self.decode_soa(false);
				}

				let dtype = Dtype::from_wire_marker(type_marker).ok_or(BjdataError::UnsupportedType {
					marker: type_marker,
					at,
				})?;
				self.expect_count()?;
				let count = self.read_length()?;

				let mut pairs = Vec::with_capacity(count.min(1024));
				for _ in 0..count {
					let key = self.read_key()?;
					let value = self.decode_scalar_of(dtype)?;
					pairs.push((key, value));
				}
				Ok(self.finish_object(pairs))
			}
			markers::CONTAINER_COUNT => {
				self.src.read_byte()?;
				let count = self.read_length()?;
				self.enter()?;
				let mut pairs = Vec::with_capacity(count.min(1024));
				for _ in 0..count {
					let key = self.read_key()?;
					let value = self.decode_value()?;
					pairs.push((key, value));
				}
				self.leave();
				Ok(self.finish_object(pairs))
			}
			_ => {
				self.enter()?;
				let mut pairs = Vec::new();
				loop {
					let byte = self.src.peek_byte()?;
					if byte == markers::OBJECT_END {
						self.src.read_byte()?;
						break;
					}
					if byte == markers::NOOP {
						self.src.read_byte()?;
						continue;
					}
					let key = self.read_key()?;
					let value = self.decode_value()?;
					pairs.push((key, value));
				}
				self.leave();
				Ok(self.finish_object(pairs))
			}
		}
	}

	fn finish_object(&self, pairs: Vec<(String, Value)>) -> Value {
		match self.prefs.object_pairs_hook {
			Some(hook) => hook(pairs),
			None => Value::Object(pairs),
		}
	}

	/// Structured-array container: `$` and the schema `{` are consumed.
	fn decode_soa(&mut self, row: bool) -> Result<Value> {
		let schema_at = self.src.pos();
		let mut fields = Vec::new();
		loop {
			if self.src.peek_byte()? == markers::OBJECT_END {
				self.src.read_byte()?;
				break;
			}
			let name = self.read_key()?;
			let at = self.src.pos();
			let marker = self.src.read_byte()?;
			let dtype = Dtype::from_schema_marker(marker).ok_or(BjdataError::UnsupportedType { marker, at })?;
			fields.push(Field { name, dtype });
		}
		if fields.is_empty() {
			return Err(BjdataError::EmptySchema { at: schema_at });
		}

		self.expect_count()?;
		let shape = if self.src.peek_byte()? == markers::ARRAY_START {
			self.src.read_byte()?;
			self.read_shape()?
		} else {
			vec![self.read_length()?]
		};
		let count = self.checked_elems(&shape)?;

		let mut columns: Vec<Vec<u8>> = fields
			.iter()
			.map(|field| Vec::with_capacity(count.min(1024) * field.dtype.size()))
			.collect();

		if row {
			for _ in 0..count {
				for (idx, field) in fields.iter().enumerate() {
					self.read_soa_element(field.dtype, idx, &mut columns)?;
				}
			}
		} else {
			for (idx, field) in fields.iter().enumerate() {
				for _ in 0..count {
					self.read_soa_element(field.dtype, idx, &mut columns)?;
				}
			}
		}

		Ok(Value::Structured(StructuredArray { fields, shape, columns }))
	}

	fn read_soa_element(&mut self, dtype: Dtype, idx: usize, columns: &mut [Vec<u8>]) -> Result<()> {
		if dtype == Dtype::Bool {
			let at = self.src.pos();
			let byte = self.src.read_byte()?;
			match byte {
				markers::TRUE => columns[idx].push(1),
				markers::FALSE => columns[idx].push(0),
				other => return Err(BjdataError::InvalidBool { byte: other, at }),
			}
			return Ok(());
		}

		let width = dtype.size();
		let mut buf = [0_u8; 8];
		self.src.read_into(&mut buf[..width])?;
		if self.endian == Endian::Big {
			buf[..width].reverse();
		}
		columns[idx].extend_from_slice(&buf[..width]);
		Ok(())
	}

	fn expect_count(&mut self) -> Result<()> {
		let at = self.src.pos();
		let byte = self.src.read_byte()?;
		if byte != markers::CONTAINER_COUNT {
			return Err(BjdataError::TypeWithoutCount { at });
		}
		Ok(())
	}

	/// Shape vector: dimension integers up to the closing `]`.
	fn read_shape(&mut self) -> Result<Vec<usize>> {
		let mut shape = Vec::new();
		loop {
			if self.src.peek_byte()? == markers::ARRAY_END {
				self.src.read_byte()?;
				break;
			}
			shape.push(self.read_length()?);
		}
		Ok(shape)
	}

	fn checked_elems(&self, shape: &[usize]) -> Result<usize> {
		let count = shape
			.iter()
			.try_fold(1_usize, |acc, dim| acc.checked_mul(*dim))
			.ok_or(BjdataError::CountTooLarge {
				count: usize::MAX,
				max: self.prefs.max_ndarray_elems,
			})?;
		if count > self.prefs.max_ndarray_elems {
			return Err(BjdataError::CountTooLarge {
				count,
				max: self.prefs.max_ndarray_elems,
			});
		}
		Ok(count)
	}

	fn read_ndarray(&mut self, dtype: Dtype, shape: Vec<usize>) -> Result<Value> {
		let count = self.checked_elems(&shape)?;
		let total = count.checked_mul(dtype.size()).ok_or(BjdataError::CountTooLarge {
			count,
			max: self.prefs.max_ndarray_elems,
		})?;

		let mut data = self.src.read_vec(total)?;
		if self.endian == Endian::Big {
			packer::swap_element_bytes(&mut data, dtype.size());
		}
		Ok(Value::NdArray(NdArray::new(dtype, shape, data)))
	}

	/// One element of a typed container, no per-element marker.
	fn decode_scalar_of(&mut self, dtype: Dtype) -> Result<Value> {
		let width = dtype.size();
		let mut buf = [0_u8; 8];
		match dtype {
			Dtype::Bool | Dtype::UInt8 => Ok(Value::Int(i64::from(self.src.read_byte()?))),
			Dtype::Int8 => {
				let byte = self.src.read_byte()?;
				Ok(Value::Int(i64::from(byte as i8)))
			}
			Dtype::Int16 | Dtype::Int32 | Dtype::Int64 => {
				self.src.read_into(&mut buf[..width])?;
				Ok(Value::Int(packer::unpack_int(&buf[..width], self.endian)?))
			}
			Dtype::UInt16 | Dtype::UInt32 | Dtype::UInt64 => {
				self.src.read_into(&mut buf[..width])?;
				let raw = packer::unpack_uint(&buf[..width], self.endian)?;
				if raw <= i64::MAX as u64 {
					Ok(Value::Int(raw as i64))
				} else {
					Ok(Value::UInt(raw))
				}
			}
			Dtype::Float16 => {
				self.src.read_into(&mut buf[..2])?;
				Ok(Value::F32(packer::unpack_f16([buf[0], buf[1]], self.endian)))
			}
			Dtype::Float32 => {
				self.src.read_into(&mut buf[..4])?;
				Ok(Value::F32(packer::unpack_f32([buf[0], buf[1], buf[2], buf[3]], self.endian)))
			}
			Dtype::Float64 => {
				self.src.read_into(&mut buf)?;
				Ok(Value::F64(packer::unpack_f64(buf, self.endian)))
			}
			Dtype::Char => {
				let at = self.src.pos();
				let byte = self.src.read_byte()?;
				if byte >= 0x80 {
					return Err(BjdataError::InvalidChar { byte, at });
				}
				Ok(Value::Char(char::from(byte)))
			}
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
