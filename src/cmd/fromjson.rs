use std::fs;
use std::io::Write;
use std::path::PathBuf;

use bjdata::{EncoderPrefs, dumpb};

use crate::cmd::util::json_to_value;

/// Parse a JSON file and write it as BJData.
pub fn run(path: PathBuf, output: Option<PathBuf>, count: bool, sort_keys: bool, big_endian: bool) -> bjdata::Result<()> {
	let text = fs::read_to_string(&path)?;
	let json: serde_json::Value = serde_json::from_str(&text).map_err(std::io::Error::other)?;
	let value = json_to_value(&json);

	let prefs = EncoderPrefs {
		container_count: count,
		sort_keys,
		islittle: !big_endian,
		..EncoderPrefs::default()
	};
	let bytes = dumpb(&value, &prefs)?;

	match output {
		Some(out) => fs::write(out, bytes)?,
		None => std::io::stdout().write_all(&bytes)?,
	}
	Ok(())
}
