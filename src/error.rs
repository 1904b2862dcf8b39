use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BjdataError>;

/// Errors produced while encoding or decoding BJData/UBJSON streams.
#[derive(Debug, Error)]
pub enum BjdataError {
	/// Sink or source IO failure, propagated verbatim.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Value cannot be serialized and no adapter rescued it.
	#[error("cannot encode value of kind {kind}")]
	CannotEncode {
		/// Logical kind of the offending value.
		kind: &'static str,
	},
	/// High-precision text is not canonical decimal syntax.
	#[error("invalid high-precision decimal text: {text:?}")]
	InvalidHighPrec {
		/// The rejected text.
		text: String,
	},
	/// Nested composite depth exceeded the configured limit.
	#[error("recursion limit exceeded (limit={limit})")]
	RecursionLimitExceeded {
		/// Configured depth ceiling.
		limit: u32,
	},
	/// Integer does not fit the requested packing width.
	#[error("integer overflows {width}-byte packing")]
	IntegerOverflow {
		/// Requested width in bytes.
		width: usize,
	},
	/// Typed payload length disagrees with shape and element width.
	#[error("payload size mismatch: expected {expected} bytes, have {actual}")]
	ShapeMismatch {
		/// Bytes required by shape × element width.
		expected: usize,
		/// Bytes actually carried.
		actual: usize,
	},
	/// Rejected preference combination.
	#[error("invalid configuration: {reason}")]
	InvalidConfig {
		/// Human-readable rejection reason.
		reason: &'static str,
	},
	/// Marker byte outside the wire grammar.
	#[error("unknown marker 0x{marker:02X} at offset {at}")]
	UnknownMarker {
		/// The offending byte.
		marker: u8,
		/// Input offset of the byte.
		at: usize,
	},
	/// Input ended before a required read completed.
	#[error("unexpected end of input at offset {at}, need {need} more bytes")]
	UnexpectedEnd {
		/// Offset where the read was attempted.
		at: usize,
		/// Bytes still required.
		need: usize,
	},
	/// Declared length or count was negative.
	#[error("negative length {value} at offset {at}")]
	NegativeLength {
		/// Parsed signed value.
		value: i64,
		/// Input offset of the length.
		at: usize,
	},
	/// Declared count or shape product exceeded the configured maximum.
	#[error("declared count {count} exceeds maximum {max}")]
	CountTooLarge {
		/// Declared element count.
		count: usize,
		/// Configured ceiling.
		max: usize,
	},
	/// Container declared a type without a following count.
	#[error("container type without count at offset {at}")]
	TypeWithoutCount {
		/// Input offset of the violation.
		at: usize,
	},
	/// Declared element type is not a typed-container element type.
	#[error("unsupported declared type 0x{marker:02X} at offset {at}")]
	UnsupportedType {
		/// The declared marker byte.
		marker: u8,
		/// Input offset of the marker.
		at: usize,
	},
	/// String or key bytes were not valid UTF-8.
	#[error("invalid utf-8 at offset {at}")]
	InvalidUtf8 {
		/// Input offset of the run.
		at: usize,
	},
	/// Char payload byte outside the single-byte range.
	#[error("invalid char byte 0x{byte:02X} at offset {at}")]
	InvalidChar {
		/// The offending byte.
		byte: u8,
		/// Input offset of the byte.
		at: usize,
	},
	/// Boolean column byte was neither `T` nor `F`.
	#[error("invalid boolean byte 0x{byte:02X} at offset {at}")]
	InvalidBool {
		/// The offending byte.
		byte: u8,
		/// Input offset of the byte.
		at: usize,
	},
	/// Structured-array schema declared no fields.
	#[error("empty structured-array schema at offset {at}")]
	EmptySchema {
		/// Input offset of the schema.
		at: usize,
	},
}
