#![allow(missing_docs)]

use bjdata::{DecoderPrefs, Dtype, EncoderPrefs, Field, NdArray, SoaFormat, StructuredArray, Value, dumpb, loadb};

fn sample_tree() -> Value {
	let mut floats = Vec::new();
	for num in [0.25_f64, -8.5, 1e12] {
		floats.extend_from_slice(&num.to_le_bytes());
	}

	Value::Object(vec![
		("null".into(), Value::Null),
		("flags".into(), Value::Array(vec![Value::Bool(true), Value::Bool(false)])),
		("small".into(), Value::Int(42)),
		("wide".into(), Value::Int(-9_000_000_000)),
		("huge".into(), Value::UInt(u64::MAX - 1)),
		("pi".into(), Value::F64(3.141592653589793)),
		("exact".into(), Value::F32(0.5)),
		("dec".into(), Value::HighPrec("123456789012345678901234567890.5".into())),
		("ch".into(), Value::Char('%')),
		("text".into(), Value::String("unicode: ünïcødé ✓".into())),
		("blob".into(), Value::Bytes((0..=255).collect())),
		(
			"grid".into(),
			Value::NdArray(NdArray::new(Dtype::UInt16, vec![2, 2], vec![1, 0, 2, 0, 3, 0, 4, 0])),
		),
		(
			"floats".into(),
			Value::NdArray(NdArray::new(Dtype::Float64, vec![3], floats)),
		),
		(
			"records".into(),
			Value::Structured(StructuredArray {
				fields: vec![
					Field {
						name: "on".into(),
						dtype: Dtype::Bool,
					},
					Field {
						name: "weight".into(),
						dtype: Dtype::Float64,
					},
				],
				shape: vec![2],
				columns: vec![vec![1, 0], {
					let mut col = Vec::new();
					col.extend_from_slice(&1.5_f64.to_le_bytes());
					col.extend_from_slice(&(-2.5_f64).to_le_bytes());
					col
				}],
			}),
		),
		(
			"nested".into(),
			Value::Array(vec![
				Value::Array(vec![Value::Int(1), Value::Array(vec![Value::Int(2)])]),
				Value::Object(vec![("deep".into(), Value::Object(Vec::new()))]),
			]),
		),
	])
}

#[test]
fn composite_tree_round_trips_in_every_framing() {
	let value = sample_tree();

	for container_count in [false, true] {
		for islittle in [true, false] {
			let enc = EncoderPrefs {
				container_count,
				islittle,
				..EncoderPrefs::default()
			};
			let dec = DecoderPrefs {
				islittle,
				..DecoderPrefs::default()
			};

			let bytes = dumpb(&value, &enc).unwrap();
			assert_eq!(
				loadb(&bytes, &dec).unwrap(),
				value,
				"framing count={container_count} little={islittle}"
			);
		}
	}
}

#[test]
fn soa_layouts_round_trip_the_same_tree() {
	let value = sample_tree();
	for layout in [SoaFormat::Row, SoaFormat::Column] {
		let enc = EncoderPrefs {
			soa_format: layout,
			..EncoderPrefs::default()
		};
		let bytes = dumpb(&value, &enc).unwrap();
		assert_eq!(loadb(&bytes, &DecoderPrefs::default()).unwrap(), value);
	}
}

#[test]
fn integer_boundaries_round_trip() {
	let boundaries = [
		0_i64,
		127,
		128,
		255,
		256,
		65535,
		65536,
		-128,
		-129,
		-32768,
		-32769,
		i64::from(i32::MIN),
		i64::from(i32::MAX),
		i64::MIN,
		i64::MAX,
	];

	for num in boundaries {
		let value = Value::Int(num);
		let bytes = dumpb(&value, &EncoderPrefs::default()).unwrap();
		assert_eq!(loadb(&bytes, &DecoderPrefs::default()).unwrap(), value, "boundary {num}");
	}
}

#[test]
fn narrow_unsigned_wire_integers_normalize_to_int() {
	// A foreign writer may use M for small magnitudes; they come back signed.
	let bytes = [b'M', 5, 0, 0, 0, 0, 0, 0, 0];
	assert_eq!(loadb(&bytes, &DecoderPrefs::default()).unwrap(), Value::Int(5));
}

#[test]
fn interning_and_hooks_compose_with_round_trips() {
	let value = sample_tree();
	let bytes = dumpb(&value, &EncoderPrefs::default()).unwrap();

	let prefs = DecoderPrefs {
		intern_object_keys: true,
		..DecoderPrefs::default()
	};
	assert_eq!(loadb(&bytes, &prefs).unwrap(), value);
}
