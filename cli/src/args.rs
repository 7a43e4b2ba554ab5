use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(about = "compile ipv4 range sets and look addresses up in them")]
pub struct CliArgs {
	#[command(subcommand)]
	pub cmd: Cmd,
}

// where the matcher comes from: compiled from a conf right now, or a stored one
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Source {
	#[arg(short, long)]
	pub conf: Option<PathBuf>,

	#[arg(short, long)]
	pub matcher: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Cmd {
	/// Compile a conf and write the matcher text
	Compile {
		conf: PathBuf,

		/// overrides `output` in [global], stdout if neither is set
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
	/// Print the value each address resolves to
	Lookup {
		#[command(flatten)]
		src: Source,

		/// printed when nothing matches, overrides `default` in [global]
		#[arg(short, long)]
		default: Option<String>,

		#[arg(required = true)]
		addrs: Vec<String>,
	},
	/// List the ranges that survived compilation
	Dump {
		#[command(flatten)]
		src: Source,
	},
}
