// a tiny ini-ish conf
//	warns on unknown keys instead of failing
//	keeps section order, which is the order ranges are compiled in

use std::path::Path;

use log::*;

use crate::{
	compiler::Compiler,
	utils::{read_lines, FromLst},
};

// this is the part that's generic

pub trait Section {
	fn set(&mut self, k: &str, v: &str);
}

pub trait Conf: Sized {
	fn new() -> Self;
	fn sec_mut(&mut self, name: &str) -> &mut dyn Section;

	fn from_lines(conf: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
		let mut ret = Self::new();
		let mut sec = None;
		for l in conf {
			let l = l.as_ref().trim_ascii();
			if l.is_empty() || l.starts_with('#') {
				// empty line or comment
			} else if l.starts_with('[') && l.ends_with(']') {
				// section name
				let name = l[1..l.len() - 1].trim_ascii();
				sec = Some(ret.sec_mut(name));
			} else if let Some(sec) = sec.as_mut() {
				// k = v
				match l.split_once('=') {
					None => warn!("invalid line, expected k = v: {}", l),
					Some((k, v)) => {
						sec.set(k.trim_ascii_end(), v.trim_ascii_start());
					}
				}
			} else {
				warn!("invalid line, not in a section: {}", l);
			}
		}
		ret
	}

	fn from_file(conf: impl AsRef<Path>) -> Option<Self> {
		Some(Self::from_lines(read_lines(conf)?))
	}
}

// the following is specific to range sets

#[cfg_attr(debug_assertions, derive(Debug))]
pub struct MatcherConf {
	pub global: GlobalSec,
	pub groups: Vec<GroupSec>,
}

impl Conf for MatcherConf {
	fn new() -> Self {
		Self {
			global: GlobalSec::new(),
			groups: Vec::new(),
		}
	}
	fn sec_mut(&mut self, name: &str) -> &mut dyn Section {
		if name.to_ascii_lowercase().as_str() == "global" {
			&mut self.global
		} else {
			self.groups.push(GroupSec::new(name));
			let len = self.groups.len();
			&mut self.groups[len - 1]
		}
	}
}

#[cfg_attr(debug_assertions, derive(Debug))]
pub struct GlobalSec {
	// where `compile` writes the matcher, stdout if unset
	pub output: Option<String>,
	// printed by `lookup` for addresses nothing matches
	pub default: Option<String>,
}

impl GlobalSec {
	fn new() -> Self {
		Self {
			output: None,
			default: None,
		}
	}
}

impl Section for GlobalSec {
	fn set(&mut self, k: &str, v: &str) {
		match k.to_ascii_lowercase().as_str() {
			"output" => self.output = Some(v.to_string()),
			"default" => self.default = Some(v.to_string()),
			_ => warn!("unknown key: {}", k),
		}
	}
}

// one group of ranges sharing a value, named after the value unless `value` says otherwise
#[cfg_attr(debug_assertions, derive(Debug))]
pub struct GroupSec {
	pub name: String,
	pub value: String,
	pub files: Vec<String>,
	pub cidrs: Vec<String>,
}

impl GroupSec {
	fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			value: name.to_string(),
			files: Vec::new(),
			cidrs: Vec::new(),
		}
	}
}

impl Section for GroupSec {
	fn set(&mut self, k: &str, v: &str) {
		match k.to_ascii_lowercase().as_str() {
			"value" => self.value = v.to_string(),
			"files" => self
				.files
				.extend(v.split_ascii_whitespace().map(|s| s.to_string())),
			"cidrs" => self
				.cidrs
				.extend(v.split_ascii_whitespace().map(|s| s.to_string())),
			_ => warn!("unknown key: \"{}\"", k),
		}
	}
}

impl Compiler<String> {
	/// Groups are compiled in conf order, list files are relative to `base`.
	pub fn from_conf(conf: &MatcherConf, base: impl AsRef<Path>) -> Self {
		let base = base.as_ref();
		let mut c = Compiler::new();
		for g in conf.groups.iter() {
			for cidr in g.cidrs.iter() {
				if c.append_line(cidr, &g.value).is_none() {
					warn!("invalid cidr in [{}]: {}", g.name, cidr);
				}
			}
			for fname in g.files.iter() {
				c.append_from_file(base.join(fname), &g.value);
			}
			info!("group {} configured", g.name);
		}
		c
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::prefix::parse_addr;

	#[test]
	fn test() {
		env_logger::builder()
			.is_test(true)
			.filter_level(log::LevelFilter::Trace)
			.try_init()
			.ok();
		let mc = MatcherConf::from_file("../example.conf").unwrap();
		#[cfg(debug_assertions)]
		println!("{:?}", mc);
		assert_eq!(mc.global.default.as_deref(), Some("wan"));
		assert!(!mc.groups.is_empty());
	}

	#[test]
	fn test_sections() {
		let conf = "
			stray = line
			[Global]
			output = out.txt
			colour = blue
			[lan]
			cidrs = 10.0.0.0/8 192.168.0.0/16
			cidrs = 172.16.0.0/12
			files = a.lst b.lst
			[loopback]
			value = lo
			cidrs = 127.0.0.0/8
			no equals sign here
			[lan]
		";
		let mc = MatcherConf::from_lines(conf.lines());
		assert_eq!(mc.global.output.as_deref(), Some("out.txt"));
		assert_eq!(mc.global.default, None);
		let names: Vec<_> = mc.groups.iter().map(|g| g.name.as_str()).collect();
		assert_eq!(names, ["lan", "loopback", "lan"]);
		assert_eq!(mc.groups[0].value, "lan");
		assert_eq!(
			mc.groups[0].cidrs,
			["10.0.0.0/8", "192.168.0.0/16", "172.16.0.0/12"]
		);
		assert_eq!(mc.groups[0].files, ["a.lst", "b.lst"]);
		assert_eq!(mc.groups[1].value, "lo");
		assert!(mc.groups[2].cidrs.is_empty());
	}

	#[test]
	fn test_from_conf() {
		let mc = MatcherConf::from_file("../example.conf").unwrap();
		let m = Compiler::from_conf(&mc, "..").finish();
		let get = |a| m.lookup(parse_addr(a).unwrap()).map(String::as_str);
		assert_eq!(get("127.0.0.1"), Some("lo"));
		assert_eq!(get("10.1.1.1"), Some("lan"));
		assert_eq!(get("100.64.3.2"), Some("lan"));
		// the /24 in the list is shadowed by the /16 before it
		assert_eq!(get("192.168.1.5"), Some("lan"));
		assert_eq!(get("192.0.2.1"), Some("test-net-1"));
		assert_eq!(get("224.0.0.1"), Some("multicast"));
		assert_eq!(get("169.254.1.1"), Some("bogon"));
		assert_eq!(get("8.8.8.8"), None);
	}

	#[test]
	fn test_from_conf_missing_files() {
		let mc = MatcherConf::from_lines(["[lan]", "files = does-not-exist.lst", "cidrs = 10.0.0.0/8 bogus"]);
		let m = Compiler::from_conf(&mc, std::env::temp_dir()).finish();
		assert_eq!(m.lookup(0x0a00_0001).map(String::as_str), Some("lan"));
		assert_eq!(m.stats().leaves, 1);
	}
}
