use std::fs;
use std::path::PathBuf;

use bjdata::{DecoderPrefs, Value, loadb};

/// Decode a BJData file and print a structural summary.
pub fn run(path: PathBuf) -> bjdata::Result<()> {
	let bytes = fs::read(&path)?;
	let value = loadb(&bytes, &DecoderPrefs::default())?;

	let mut stats = Stats::default();
	collect(&value, 1, &mut stats);

	println!("path: {}", path.display());
	println!("size: {} bytes", bytes.len());
	println!("kind: {}", value.kind());
	println!("nodes: {}", stats.nodes);
	println!("max depth: {}", stats.max_depth);
	println!("arrays: {}", stats.arrays);
	println!("objects: {}", stats.objects);
	println!("typed arrays: {}", stats.typed);

	Ok(())
}

#[derive(Default)]
struct Stats {
	nodes: u64,
	arrays: u64,
	objects: u64,
	typed: u64,
	max_depth: u32,
}

fn collect(value: &Value, depth: u32, stats: &mut Stats) {
	stats.nodes += 1;
	stats.max_depth = stats.max_depth.max(depth);

	match value {
		Value::Array(items) => {
			stats.arrays += 1;
			for item in items {
				collect(item, depth + 1, stats);
			}
		}
		Value::Object(pairs) => {
			stats.objects += 1;
			for (_, item) in pairs {
				collect(item, depth + 1, stats);
			}
		}
		Value::Bytes(_) | Value::NdArray(_) | Value::Structured(_) => {
			stats.typed += 1;
		}
		_ => {}
	}
}
