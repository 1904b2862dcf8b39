#![allow(missing_docs)]

use bjdata::{BjdataError, DecoderPrefs, Value, loadb};

fn fail(bytes: &[u8]) -> BjdataError {
	loadb(bytes, &DecoderPrefs::default()).unwrap_err()
}

#[test]
fn truncated_scalar() {
	assert!(matches!(fail(&[b'U']), BjdataError::UnexpectedEnd { .. }));
	assert!(matches!(fail(&[b'l', 0x01, 0x02]), BjdataError::UnexpectedEnd { .. }));
}

#[test]
fn truncated_container() {
	assert!(matches!(fail(&[b'[', b'U', 1]), BjdataError::UnexpectedEnd { .. }));
	assert!(matches!(fail(&[b'{', b'U', 1, b'k']), BjdataError::UnexpectedEnd { .. }));
}

#[test]
fn empty_input() {
	assert!(matches!(fail(&[]), BjdataError::UnexpectedEnd { at: 0, .. }));
}

#[test]
fn unknown_marker() {
	assert!(matches!(fail(&[0x51]), BjdataError::UnknownMarker { marker: 0x51, at: 0 }));
}

#[test]
fn negative_string_length() {
	let err = fail(&[b'S', b'i', 0xFF]);
	assert!(matches!(err, BjdataError::NegativeLength { value: -1, .. }));
}

#[test]
fn length_marker_must_be_an_integer() {
	assert!(matches!(fail(&[b'S', b'd', 0, 0, 0, 0]), BjdataError::UnknownMarker { marker: b'd', .. }));
}

#[test]
fn count_over_configured_maximum() {
	let prefs = DecoderPrefs {
		max_container_len: 4,
		..DecoderPrefs::default()
	};
	let err = loadb(&[b'[', b'#', b'U', 10], &prefs).unwrap_err();
	assert!(matches!(err, BjdataError::CountTooLarge { count: 10, max: 4 }));
}

#[test]
fn shape_product_over_configured_maximum() {
	let prefs = DecoderPrefs {
		max_ndarray_elems: 50,
		..DecoderPrefs::default()
	};
	let bytes = [b'[', b'$', b'I', b'#', b'[', b'U', 10, b'U', 10, b']'];
	let err = loadb(&bytes, &prefs).unwrap_err();
	assert!(matches!(err, BjdataError::CountTooLarge { count: 100, max: 50 }));
}

#[test]
fn invalid_utf8_in_string_and_key() {
	assert!(matches!(fail(&[b'S', b'U', 2, 0xFF, 0xFE]), BjdataError::InvalidUtf8 { .. }));
	assert!(matches!(
		fail(&[b'{', b'U', 1, 0xFF, b'Z', b'}']),
		BjdataError::InvalidUtf8 { .. }
	));
}

#[test]
fn declared_type_without_count() {
	let err = fail(&[b'[', b'$', b'I', b'Z']);
	assert!(matches!(err, BjdataError::TypeWithoutCount { .. }));
}

#[test]
fn unsupported_declared_type() {
	let err = fail(&[b'[', b'$', b'Z', b'#', b'U', 1]);
	assert!(matches!(err, BjdataError::UnsupportedType { marker: b'Z', .. }));
}

#[test]
fn char_payload_must_be_single_byte_range() {
	assert!(matches!(fail(&[b'C', 0xC3]), BjdataError::InvalidChar { byte: 0xC3, .. }));
}

#[test]
fn high_precision_text_must_be_decimal() {
	let err = fail(&[b'H', b'U', 3, b'a', b'b', b'c']);
	assert!(matches!(err, BjdataError::InvalidHighPrec { .. }));
}

#[test]
fn runaway_nesting_hits_the_recursion_limit() {
	let bytes = vec![b'['; 2000];
	assert!(matches!(fail(&bytes), BjdataError::RecursionLimitExceeded { limit: 1024 }));

	let prefs = DecoderPrefs {
		recursion_limit: 4,
		..DecoderPrefs::default()
	};
	let err = loadb(&[b'[', b'[', b'[', b'[', b'[', b'Z'], &prefs).unwrap_err();
	assert!(matches!(err, BjdataError::RecursionLimitExceeded { limit: 4 }));
}

#[test]
fn zero_limits_are_rejected_configuration() {
	let prefs = DecoderPrefs {
		recursion_limit: 0,
		..DecoderPrefs::default()
	};
	assert!(matches!(
		loadb(&[b'Z'], &prefs).unwrap_err(),
		BjdataError::InvalidConfig { .. }
	));

	let prefs = DecoderPrefs {
		max_container_len: 0,
		..DecoderPrefs::default()
	};
	assert!(matches!(
		loadb(&[b'Z'], &prefs).unwrap_err(),
		BjdataError::InvalidConfig { .. }
	));
}

#[test]
fn no_partial_value_on_failure() {
	// A half-written object fails outright rather than yielding a prefix.
	let bytes = [b'{', b'U', 1, b'k', b'U', 5, b'U', 1];
	assert!(loadb(&bytes, &DecoderPrefs::default()).is_err());

	// The same frame completed decodes fine.
	let bytes = [b'{', b'U', 1, b'k', b'U', 5, b'}'];
	assert_eq!(
		loadb(&bytes, &DecoderPrefs::default()).unwrap(),
		Value::Object(vec![("k".into(), Value::Int(5))])
	);
}
