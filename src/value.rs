use crate::error::{BjdataError, Result};
use crate::markers;

/// Decoded or to-be-encoded BJData value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Null.
	Null,
	/// Boolean.
	Bool(bool),
	/// Signed integer; the carrier for every wire integer that fits `i64`.
	Int(i64),
	/// Unsigned integer above `i64::MAX`.
	UInt(u64),
	/// Single-precision float.
	F32(f32),
	/// Double-precision float.
	F64(f64),
	/// Arbitrary-precision decimal carried as canonical decimal text.
	HighPrec(String),
	/// Single codepoint; encoded in one byte when below 0x80.
	Char(char),
	/// UTF-8 string.
	String(String),
	/// Raw octet blob, wire-encoded as a strongly-typed UInt8 array.
	Bytes(Vec<u8>),
	/// Ordered sequence.
	Array(Vec<Value>),
	/// Ordered key/value pairs; duplicate keys are preserved in source order.
	Object(Vec<(String, Value)>),
	/// Homogeneously-typed dense N-dimensional array.
	NdArray(NdArray),
	/// Structured array of named scalar fields (SOA/AoS layouts).
	Structured(StructuredArray),
}

impl Value {
	/// Stable lowercase label for the value kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::UInt(_) => "uint",
			Self::F32(_) => "float32",
			Self::F64(_) => "float64",
			Self::HighPrec(_) => "highprec",
			Self::Char(_) => "char",
			Self::String(_) => "string",
			Self::Bytes(_) => "bytes",
			Self::Array(_) => "array",
			Self::Object(_) => "object",
			Self::NdArray(_) => "ndarray",
			Self::Structured(_) => "structured",
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::F64(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

/// Element type of typed arrays and structured-array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
	/// Boolean, stored as one 0/1 byte per element.
	Bool,
	/// Signed 8-bit integer.
	Int8,
	/// Unsigned 8-bit integer.
	UInt8,
	/// Signed 16-bit integer.
	Int16,
	/// Unsigned 16-bit integer.
	UInt16,
	/// Signed 32-bit integer.
	Int32,
	/// Unsigned 32-bit integer.
	UInt32,
	/// Signed 64-bit integer.
	Int64,
	/// Unsigned 64-bit integer.
	UInt64,
	/// Half-precision float.
	Float16,
	/// Single-precision float.
	Float32,
	/// Double-precision float.
	Float64,
	/// Fixed-width character element, one byte per wire element.
	Char,
}

impl Dtype {
	/// Element width in bytes on the wire and in stored payloads.
	pub fn size(self) -> usize {
		match self {
			Self::Bool | Self::Int8 | Self::UInt8 | Self::Char => 1,
			Self::Int16 | Self::UInt16 | Self::Float16 => 2,
			Self::Int32 | Self::UInt32 | Self::Float32 => 4,
			Self::Int64 | Self::UInt64 | Self::Float64 => 8,
		}
	}

	/// Marker emitted for this element type in a typed-array prefix.
	///
	/// Boolean arrays have no wire type of their own and travel as UInt8.
	pub fn wire_marker(self) -> u8 {
		match self {
			Self::Bool | Self::UInt8 => markers::UINT8,
			Self::Int8 => markers::INT8,
			Self::Int16 => markers::INT16,
			Self::UInt16 => markers::UINT16,
			Self::Int32 => markers::INT32,
			Self::UInt32 => markers::UINT32,
			Self::Int64 => markers::INT64,
			Self::UInt64 => markers::UINT64,
			Self::Float16 => markers::FLOAT16,
			Self::Float32 => markers::FLOAT32,
			Self::Float64 => markers::FLOAT64,
			Self::Char => markers::CHAR,
		}
	}

	/// Marker emitted for this field type inside a structured-array schema.
	pub fn schema_marker(self) -> u8 {
		match self {
			Self::Bool => markers::TRUE,
			other => other.wire_marker(),
		}
	}

	/// Resolve a typed-array element marker.
	pub fn from_wire_marker(marker: u8) -> Option<Self> {
		match marker {
			markers::INT8 => Some(Self::Int8),
			markers::UINT8 => Some(Self::UInt8),
			markers::INT16 => Some(Self::Int16),
			markers::UINT16 => Some(Self::UInt16),
			markers::INT32 => Some(Self::Int32),
			markers::UINT32 => Some(Self::UInt32),
			markers::INT64 => Some(Self::Int64),
			markers::UINT64 => Some(Self::UInt64),
			markers::FLOAT16 => Some(Self::Float16),
			markers::FLOAT32 => Some(Self::Float32),
			markers::FLOAT64 => Some(Self::Float64),
			markers::CHAR => Some(Self::Char),
			_ => None,
		}
	}

	/// Resolve a structured-array schema field marker.
	pub fn from_schema_marker(marker: u8) -> Option<Self> {
		match marker {
			markers::TRUE => Some(Self::Bool),
			markers::CHAR => None,
			other => Self::from_wire_marker(other),
		}
	}

	/// Whether the type may appear as a structured-array field.
	pub fn is_scalar_field(self) -> bool {
		!matches!(self, Self::Char)
	}
}

/// Dense row-major typed array with explicit shape.
///
/// Element bytes are stored little-endian regardless of the encoding
/// endianness preference.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
	/// Element type.
	pub dtype: Dtype,
	/// Shape vector; empty means a zero-dimensional scalar.
	pub shape: Vec<usize>,
	/// Raw little-endian element bytes, row-major.
	pub data: Vec<u8>,
}

impl NdArray {
	/// Create a typed array without validating the payload size.
	pub fn new(dtype: Dtype, shape: Vec<usize>, data: Vec<u8>) -> Self {
		Self { dtype, shape, data }
	}

	/// Create a fixed-width character array from UTF-32 code units.
	///
	/// `shape` describes the grid of 4-byte characters; the trailing
	/// width dimension is appended here so the stored shape matches the
	/// wire shape exactly.
	pub fn chars(mut shape: Vec<usize>, data: Vec<u8>) -> Self {
		shape.push(4);
		Self {
			dtype: Dtype::Char,
			shape,
			data,
		}
	}

	/// Total element count, the product of all shape dimensions.
	pub fn elem_count(&self) -> Option<usize> {
		self.shape.iter().try_fold(1_usize, |acc, dim| acc.checked_mul(*dim))
	}

	/// Check payload size against shape and element width.
	pub fn validate(&self) -> Result<()> {
		// Zero-dimensional character arrays are variable-length string scalars.
		if self.dtype == Dtype::Char && self.shape.is_empty() {
			return Ok(());
		}
		let count = self.elem_count().ok_or(BjdataError::ShapeMismatch {
			expected: usize::MAX,
			actual: self.data.len(),
		})?;
		let expected = count.checked_mul(self.dtype.size()).ok_or(BjdataError::ShapeMismatch {
			expected: usize::MAX,
			actual: self.data.len(),
		})?;
		if expected != self.data.len() {
			return Err(BjdataError::ShapeMismatch {
				expected,
				actual: self.data.len(),
			});
		}
		Ok(())
	}
}

/// One named scalar field of a structured array.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	/// UTF-8 field name.
	pub name: String,
	/// Scalar element type; `Char` is not permitted here.
	pub dtype: Dtype,
}

/// Structured array: named scalar fields over a common shape.
///
/// Storage is column-major: one contiguous little-endian byte column per
/// field. Boolean columns hold one 0/1 byte per element. The encode-time
/// layout (row-interleaved vs columnar) is chosen by preference, not by
/// the value.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredArray {
	/// Field schema in declaration order.
	pub fields: Vec<Field>,
	/// Shape vector, at least one dimension.
	pub shape: Vec<usize>,
	/// Per-field element bytes, parallel to `fields`.
	pub columns: Vec<Vec<u8>>,
}

impl StructuredArray {
	/// Total record count, the product of all shape dimensions.
	pub fn count(&self) -> Option<usize> {
		self.shape.iter().try_fold(1_usize, |acc, dim| acc.checked_mul(*dim))
	}

	/// Check schema and column sizes.
	pub fn validate(&self) -> Result<()> {
		if self.fields.is_empty() || self.shape.is_empty() || self.columns.len() != self.fields.len() {
			return Err(BjdataError::CannotEncode { kind: "structured" });
		}
		let count = self.count().ok_or(BjdataError::CannotEncode { kind: "structured" })?;
		for (field, column) in self.fields.iter().zip(&self.columns) {
			if !field.dtype.is_scalar_field() {
				return Err(BjdataError::CannotEncode { kind: "structured" });
			}
			let expected = count.checked_mul(field.dtype.size()).ok_or(BjdataError::CannotEncode { kind: "structured" })?;
			if column.len() != expected {
				return Err(BjdataError::ShapeMismatch {
					expected,
					actual: column.len(),
				});
			}
		}
		Ok(())
	}
}

/// Decimal text forms that stand for non-finite doubles in BJData mode.
pub(crate) const NONFINITE_TEXTS: [&str; 3] = ["NaN", "Infinity", "-Infinity"];

/// Map a non-finite double to its canonical decimal text.
pub(crate) fn nonfinite_text(value: f64) -> &'static str {
	if value.is_nan() {
		"NaN"
	} else if value > 0.0 {
		"Infinity"
	} else {
		"-Infinity"
	}
}

/// Check canonical decimal syntax: `-? digits (. digits)? ([eE][+-]? digits)?`.
pub(crate) fn is_decimal_text(text: &str) -> bool {
	let rest = text.strip_prefix('-').unwrap_or(text);
	let mut chars = rest.as_bytes();

	let digits = |bytes: &mut &[u8]| {
		let mut seen = false;
		while let Some((first, tail)) = bytes.split_first() {
			if !first.is_ascii_digit() {
				break;
			}
			seen = true;
			*bytes = tail;
		}
		seen
	};

	if !digits(&mut chars) {
		return false;
	}
	if let Some((&b'.', tail)) = chars.split_first() {
		chars = tail;
		if !digits(&mut chars) {
			return false;
		}
	}
	if let Some((&(b'e' | b'E'), tail)) = chars.split_first() {
		chars = tail;
		if let Some((&(b'+' | b'-'), tail)) = chars.split_first() {
			chars = tail;
		}
		if !digits(&mut chars) {
			return false;
		}
	}
	chars.is_empty()
}
