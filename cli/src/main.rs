use std::{
	fs,
	path::{Path, PathBuf},
	process::exit,
	time::Instant,
};

use clap::Parser;
use log::*;

use cidrmatch::{
	conf::{Conf, MatcherConf},
	prefix::{format_cidr, parse_addr},
	CompiledMatcher, Compiler,
};

mod args;
use args::*;

fn main() {
	let args = CliArgs::parse();

	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let ok = match args.cmd {
		Cmd::Compile { conf, output } => compile(&conf, output),
		Cmd::Lookup {
			src,
			default,
			addrs,
		} => lookup(&src, default, &addrs),
		Cmd::Dump { src } => dump(&src),
	};
	if ok.is_none() {
		exit(1);
	}
}

fn read_conf(path: &Path) -> Option<MatcherConf> {
	info!("read config from {}", path.display());
	let conf = MatcherConf::from_file(path);
	if conf.is_none() {
		error!("failed to read config {}", path.display());
	}
	conf
}

fn build(path: &Path, conf: &MatcherConf) -> CompiledMatcher<String> {
	let base = path.parent().unwrap_or(Path::new("."));
	let t0 = Instant::now();
	let c = Compiler::from_conf(conf, base);
	let n = c.len();
	let m = c.finish();
	info!(
		"compiled {} entries in {:.3} ms",
		n,
		t0.elapsed().as_secs_f32() * 1000.0
	);
	m
}

// matcher plus the configured default, if any
fn load(src: &Source) -> Option<(CompiledMatcher<String>, Option<String>)> {
	if let Some(path) = src.conf.as_ref() {
		let conf = read_conf(path)?;
		return Some((build(path, &conf), conf.global.default));
	}
	let path = src.matcher.as_ref()?;
	let text = fs::read_to_string(path)
		.map_err(|e| error!("failed to read {}: {}", path.display(), e))
		.ok()?;
	let m = text
		.parse()
		.map_err(|e| error!("invalid matcher in {}: {}", path.display(), e))
		.ok()?;
	info!("loaded matcher from {}", path.display());
	Some((m, None))
}

fn compile(path: &Path, output: Option<PathBuf>) -> Option<()> {
	let conf = read_conf(path)?;
	let m = build(path, &conf);
	let text = m.to_string();
	match output.or(conf.global.output.map(PathBuf::from)) {
		Some(out) => {
			fs::write(&out, format!("{}\n", text))
				.map_err(|e| error!("failed to write {}: {}", out.display(), e))
				.ok()?;
			info!("wrote {} bytes to {}", text.len() + 1, out.display());
		}
		None => println!("{}", text),
	}
	Some(())
}

fn lookup(src: &Source, default: Option<String>, addrs: &[String]) -> Option<()> {
	let (m, conf_default) = load(src)?;
	let default = default.or(conf_default);
	let miss = default.as_deref().unwrap_or("-");
	for a in addrs {
		let addr = parse_addr(a);
		if addr.is_none() {
			warn!("invalid address: {}", a);
		}
		let v = cidrmatch::lookup(Some(&m), addr);
		println!("{} {}", a, v.map_or(miss, String::as_str));
	}
	Some(())
}

fn dump(src: &Source) -> Option<()> {
	let (m, _) = load(src)?;
	for (prefix, len, v) in m.ranges() {
		println!("{} {}", format_cidr(prefix, len as i32), v);
	}
	let s = m.stats();
	info!(
		"{} ranges, {} nodes, depth {}",
		s.leaves, s.nodes, s.depth
	);
	Some(())
}
