//! bjdata - BJData (Binary JData) and UBJSON encoding and decoding.
//!
//! BJData is a binary superset of JSON extending UBJSON with unsigned wide
//! integers, half-precision floats, sized containers, and an N-dimensional
//! typed-array construct for scientific data. This crate translates between
//! an in-memory [`Value`] tree and the octet stream: narrowest-marker
//! integer selection, endianness-aware packing, sized-vs-terminated
//! container framing, strongly-typed container payloads, and structured
//! arrays in row-interleaved or columnar layouts.
//!
//! # Example
//!
//! ```rust
//! use bjdata::{dumpb, loadb, DecoderPrefs, EncoderPrefs, Value};
//!
//! let value = Value::Object(vec![
//!     ("a".into(), Value::Int(123)),
//!     ("b".into(), Value::Array(vec![Value::Int(1), Value::Int(2)])),
//! ]);
//!
//! let bytes = dumpb(&value, &EncoderPrefs::default()).unwrap();
//! let back = loadb(&bytes, &DecoderPrefs::default()).unwrap();
//! assert_eq!(value, back);
//! ```

#![warn(missing_docs)]

pub mod buffer;
pub mod decode;
pub mod encode;
pub mod error;
pub mod markers;
pub mod packer;
pub mod source;
pub mod value;

/// One-shot decoding entry points and preferences.
pub use decode::{DecoderPrefs, PairsHook, load, loadb};
/// One-shot encoding entry points and preferences.
pub use encode::{DefaultFn, EncoderPrefs, SoaFormat, WireFormat, dump, dumpb};
/// Error and result aliases.
pub use error::{BjdataError, Result};
/// Value tree and typed-array carriers.
pub use value::{Dtype, Field, NdArray, StructuredArray, Value};
