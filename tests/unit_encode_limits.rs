#![allow(missing_docs)]

use bjdata::{BjdataError, DecoderPrefs, EncoderPrefs, Value, dump, dumpb, load, loadb};

fn nested_array(depth: usize) -> Value {
	let mut value = Value::Int(1);
	for _ in 0..depth {
		value = Value::Array(vec![value]);
	}
	value
}

#[test]
fn recursion_limit_stops_deep_nesting() {
	let prefs = EncoderPrefs {
		recursion_limit: 8,
		..EncoderPrefs::default()
	};

	assert!(dumpb(&nested_array(8), &prefs).is_ok());
	let err = dumpb(&nested_array(9), &prefs).unwrap_err();
	assert!(matches!(err, BjdataError::RecursionLimitExceeded { limit: 8 }));
}

#[test]
fn zero_recursion_limit_is_rejected() {
	let prefs = EncoderPrefs {
		recursion_limit: 0,
		..EncoderPrefs::default()
	};
	assert!(matches!(
		dumpb(&Value::Null, &prefs).unwrap_err(),
		BjdataError::InvalidConfig { .. }
	));
}

#[test]
fn dump_and_dumpb_produce_identical_bytes() {
	let value = Value::Object(vec![
		("nums".into(), Value::Array((0..100).map(Value::Int).collect())),
		("text".into(), Value::String("payload".into())),
	]);

	let direct = dumpb(&value, &EncoderPrefs::default()).unwrap();
	let mut sunk = Vec::new();
	dump(&value, &mut sunk, &EncoderPrefs::default()).unwrap();
	assert_eq!(direct, sunk);
}

#[test]
fn failed_encode_flushes_nothing_below_threshold() {
	// The invalid leaf fails before the buffer ever reaches its high-water
	// mark, so the sink must stay untouched.
	let value = Value::Array(vec![Value::Int(1), Value::HighPrec("bogus".into())]);
	let mut sunk = Vec::new();
	assert!(dump(&value, &mut sunk, &EncoderPrefs::default()).is_err());
	assert!(sunk.is_empty());
}

#[test]
fn load_reads_from_a_blocking_reader() {
	let value = Value::Array(vec![
		Value::String("stream".into()),
		Value::Int(42),
		Value::Bytes(vec![0, 1, 2, 255]),
	]);
	let bytes = dumpb(&value, &EncoderPrefs::default()).unwrap();

	let mut cursor = std::io::Cursor::new(bytes.clone());
	assert_eq!(load(&mut cursor, &DecoderPrefs::default()).unwrap(), value);
	assert_eq!(loadb(&bytes, &DecoderPrefs::default()).unwrap(), value);
}

#[test]
fn consecutive_values_decode_from_one_reader() {
	let first = dumpb(&Value::Int(1), &EncoderPrefs::default()).unwrap();
	let second = dumpb(&Value::String("two".into()), &EncoderPrefs::default()).unwrap();

	let mut stream = first;
	stream.extend_from_slice(&second);
	let mut cursor = std::io::Cursor::new(stream);

	assert_eq!(load(&mut cursor, &DecoderPrefs::default()).unwrap(), Value::Int(1));
	assert_eq!(
		load(&mut cursor, &DecoderPrefs::default()).unwrap(),
		Value::String("two".into())
	);
}

#[test]
fn sink_errors_propagate_as_io() {
	struct Failing;
	impl std::io::Write for Failing {
		fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
			Err(std::io::Error::other("closed"))
		}
		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	let big = Value::Bytes(vec![0xAB; 4096]);
	let mut sink = Failing;
	let err = dump(&big, &mut sink, &EncoderPrefs::default()).unwrap_err();
	assert!(matches!(err, BjdataError::Io(_)));
}
