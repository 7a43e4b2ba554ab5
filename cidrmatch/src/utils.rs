use std::{
	fs::File,
	io::{BufRead, BufReader},
	path::Path,
	str::FromStr,
};

use log::*;

use crate::{compiler::Compiler, prefix::parse_cidr};

pub trait FromLst<T: Clone> {
	fn append_line(&mut self, l: &str, v: &T) -> Option<()>;

	fn append_from(&mut self, lst: impl IntoIterator<Item = impl AsRef<str>>, v: &T) -> usize {
		let mut c = 0;
		for l in lst {
			let l = l.as_ref();
			let l = l.trim_ascii();
			if l.is_empty() || l.starts_with('#') {
				continue;
			}
			if self.append_line(l, v).is_some() {
				c += 1;
			} else {
				warn!("invalid line: {}", l);
			}
		}
		c
	}

	fn append_from_file(&mut self, file: impl AsRef<Path>, v: &T) -> Option<usize> {
		let file = file.as_ref();
		let c = self.append_from(read_lines(file)?, v);
		info!("loaded {} entries from {}", c, file.display());
		Some(c)
	}
}

// one range per line:
//	10.0.0.0/8              -> the list's value
//	10.0.0.0/8 lan          -> "lan"
//	10.0.0.0/8 = lan side   -> "lan side"
impl<T: Clone + FromStr> FromLst<T> for Compiler<T> {
	fn append_line(&mut self, l: &str, v: &T) -> Option<()> {
		let (cidr, rest) = match l.find(|c: char| c == '=' || c.is_ascii_whitespace()) {
			Some(i) => l.split_at(i),
			None => (l, ""),
		};
		let (prefix, mask) = parse_cidr(cidr)?;
		let rest = rest.trim_ascii();
		let rest = rest.strip_prefix('=').unwrap_or(rest).trim_ascii();
		let value = if rest.is_empty() {
			v.clone()
		} else {
			rest.parse().ok()?
		};
		self.insert(prefix, mask, value);
		Some(())
	}
}

pub fn read_lines(f: impl AsRef<Path>) -> Option<impl Iterator<Item = impl AsRef<str>>> {
	let f = f.as_ref();
	match File::open(f) {
		Err(e) => {
			warn!("failed to open {}: {:?}", f.display(), e);
			None
		}
		Ok(f) => Some(BufReader::new(f).lines().map_while(Result::ok)),
	}
}
