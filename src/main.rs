#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "bjdata", about = "BJData/UBJSON inspection and conversion tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info {
		path: PathBuf,
	},
	ToJson {
		path: PathBuf,
		#[arg(long)]
		pretty: bool,
	},
	FromJson {
		path: PathBuf,
		#[arg(long, short = 'o')]
		output: Option<PathBuf>,
		#[arg(long)]
		count: bool,
		#[arg(long = "sort-keys")]
		sort_keys: bool,
		#[arg(long = "big-endian")]
		big_endian: bool,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> bjdata::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info { path } => cmd::info::run(path),
		Commands::ToJson { path, pretty } => cmd::tojson::run(path, pretty),
		Commands::FromJson {
			path,
			output,
			count,
			sort_keys,
			big_endian,
		} => cmd::fromjson::run(path, output, count, sort_keys, big_endian),
	}
}
