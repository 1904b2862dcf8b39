//! BJData/UBJSON wire marker bytes.

// Null and padding
/// Null value.
pub const NULL: u8 = b'Z';
/// No-op padding byte, skipped between elements of unsized containers.
pub const NOOP: u8 = b'N';

// Booleans
/// Boolean true.
pub const TRUE: u8 = b'T';
/// Boolean false.
pub const FALSE: u8 = b'F';

// Integers
/// Signed 8-bit integer.
pub const INT8: u8 = b'i';
/// Unsigned 8-bit integer.
pub const UINT8: u8 = b'U';
/// Signed 16-bit integer.
pub const INT16: u8 = b'I';
/// Unsigned 16-bit integer (BJData only).
pub const UINT16: u8 = b'u';
/// Signed 32-bit integer.
pub const INT32: u8 = b'l';
/// Unsigned 32-bit integer (BJData only).
pub const UINT32: u8 = b'm';
/// Signed 64-bit integer.
pub const INT64: u8 = b'L';
/// Unsigned 64-bit integer (BJData only).
pub const UINT64: u8 = b'M';

// Floats (IEEE-754)
/// Half-precision float (BJData only).
pub const FLOAT16: u8 = b'h';
/// Single-precision float.
pub const FLOAT32: u8 = b'd';
/// Double-precision float.
pub const FLOAT64: u8 = b'D';

// Text
/// Arbitrary-precision decimal, length-prefixed decimal text.
pub const HIGH_PREC: u8 = b'H';
/// Single byte character (< 0x80).
pub const CHAR: u8 = b'C';
/// Length-prefixed UTF-8 string.
pub const STRING: u8 = b'S';

// Container delimiters
/// Array open.
pub const ARRAY_START: u8 = b'[';
/// Array close (unsized arrays only).
pub const ARRAY_END: u8 = b']';
/// Object open.
pub const OBJECT_START: u8 = b'{';
/// Object close (unsized objects only).
pub const OBJECT_END: u8 = b'}';

// Optional container parameters
/// Declared element type follows.
pub const CONTAINER_TYPE: u8 = b'$';
/// Declared element count (or bracketed shape) follows.
pub const CONTAINER_COUNT: u8 = b'#';
