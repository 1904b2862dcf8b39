use std::fs;
use std::path::PathBuf;

use bjdata::{DecoderPrefs, loadb};

use crate::cmd::util::value_to_json;

/// Decode a BJData file and print it as JSON.
pub fn run(path: PathBuf, pretty: bool) -> bjdata::Result<()> {
	let bytes = fs::read(&path)?;
	let value = loadb(&bytes, &DecoderPrefs::default())?;
	let json = value_to_json(&value);

	let rendered = if pretty {
		serde_json::to_string_pretty(&json)
	} else {
		serde_json::to_string(&json)
	};
	println!("{}", rendered.map_err(std::io::Error::other)?);

	Ok(())
}
