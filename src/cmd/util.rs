use bjdata::packer::{self, Endian};
use bjdata::{Dtype, NdArray, StructuredArray, Value};

/// Convert a decoded value into its JSON rendering.
pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Null => serde_json::Value::Null,
		Value::Bool(flag) => serde_json::Value::Bool(*flag),
		Value::Int(num) => serde_json::Value::from(*num),
		Value::UInt(num) => serde_json::Value::from(*num),
		Value::F32(num) => float_json(f64::from(*num)),
		Value::F64(num) => float_json(*num),
		// Rendered as a string so no precision is lost.
		Value::HighPrec(text) => serde_json::Value::String(text.clone()),
		Value::Char(ch) => serde_json::Value::String(ch.to_string()),
		Value::String(text) => serde_json::Value::String(text.clone()),
		Value::Bytes(bytes) => serde_json::Value::Array(bytes.iter().map(|byte| serde_json::Value::from(*byte)).collect()),
		Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
		Value::Object(pairs) => {
			let mut map = serde_json::Map::with_capacity(pairs.len());
			for (key, item) in pairs {
				map.insert(key.clone(), value_to_json(item));
			}
			serde_json::Value::Object(map)
		}
		Value::NdArray(arr) => ndarray_json(arr),
		Value::Structured(arr) => structured_json(arr),
	}
}

/// Convert parsed JSON into an encodable value.
pub(crate) fn json_to_value(json: &serde_json::Value) -> Value {
	match json {
		serde_json::Value::Null => Value::Null,
		serde_json::Value::Bool(flag) => Value::Bool(*flag),
		serde_json::Value::Number(num) => {
			if let Some(int) = num.as_i64() {
				Value::Int(int)
			} else if let Some(uint) = num.as_u64() {
				Value::UInt(uint)
			} else {
				Value::F64(num.as_f64().unwrap_or(f64::NAN))
			}
		}
		serde_json::Value::String(text) => Value::String(text.clone()),
		serde_json::Value::Array(items) => Value::Array(items.iter().map(json_to_value).collect()),
		serde_json::Value::Object(map) => {
			Value::Object(map.iter().map(|(key, item)| (key.clone(), json_to_value(item))).collect())
		}
	}
}

fn float_json(num: f64) -> serde_json::Value {
	serde_json::Number::from_f64(num).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

/// Expand a typed array into nested JSON arrays.
fn ndarray_json(arr: &NdArray) -> serde_json::Value {
	// Character grids render one string per trailing width-4 group.
	if arr.dtype == Dtype::Char && arr.shape.last() == Some(&4) {
		let strings: Vec<serde_json::Value> = arr
			.data
			.chunks_exact(4)
			.map(|chunk| serde_json::Value::String(utf32_char(chunk).to_string()))
			.collect();
		let mut elems = strings.into_iter();
		return nest(&arr.shape[..arr.shape.len() - 1], &mut elems);
	}

	let width = arr.dtype.size();
	let flat: Vec<serde_json::Value> = arr.data.chunks_exact(width).map(|chunk| elem_json(arr.dtype, chunk)).collect();
	let mut elems = flat.into_iter();
	nest(&arr.shape, &mut elems)
}

/// Render a structured array as one column array per field.
fn structured_json(arr: &StructuredArray) -> serde_json::Value {
	let mut map = serde_json::Map::with_capacity(arr.fields.len());
	for (field, column) in arr.fields.iter().zip(&arr.columns) {
		let width = field.dtype.size();
		let elems = column.chunks_exact(width).map(|chunk| elem_json(field.dtype, chunk)).collect();
		map.insert(field.name.clone(), serde_json::Value::Array(elems));
	}
	serde_json::Value::Object(map)
}

fn nest(shape: &[usize], elems: &mut std::vec::IntoIter<serde_json::Value>) -> serde_json::Value {
	let Some((first, rest)) = shape.split_first() else {
		return elems.next().unwrap_or(serde_json::Value::Null);
	};
	serde_json::Value::Array((0..*first).map(|_| nest(rest, elems)).collect())
}

/// One stored (little-endian) element as JSON.
fn elem_json(dtype: Dtype, bytes: &[u8]) -> serde_json::Value {
	let le = Endian::Little;
	match dtype {
		Dtype::Bool => serde_json::Value::Bool(bytes[0] != 0),
		Dtype::Int8 => serde_json::Value::from(bytes[0] as i8),
		Dtype::UInt8 => serde_json::Value::from(bytes[0]),
		Dtype::Int16 | Dtype::Int32 | Dtype::Int64 => {
			packer::unpack_int(bytes, le).map_or(serde_json::Value::Null, serde_json::Value::from)
		}
		Dtype::UInt16 | Dtype::UInt32 | Dtype::UInt64 => {
			packer::unpack_uint(bytes, le).map_or(serde_json::Value::Null, serde_json::Value::from)
		}
		Dtype::Float16 => float_json(f64::from(packer::unpack_f16([bytes[0], bytes[1]], le))),
		Dtype::Float32 => float_json(f64::from(packer::unpack_f32([bytes[0], bytes[1], bytes[2], bytes[3]], le))),
		Dtype::Float64 => {
			let mut buf = [0_u8; 8];
			buf.copy_from_slice(bytes);
			float_json(packer::unpack_f64(buf, le))
		}
		Dtype::Char => serde_json::Value::String(char::from(bytes[0] & 0x7F).to_string()),
	}
}

fn utf32_char(bytes: &[u8]) -> char {
	let mut buf = [0_u8; 4];
	buf.copy_from_slice(bytes);
	char::from_u32(u32::from_le_bytes(buf)).unwrap_or(char::REPLACEMENT_CHARACTER)
}
