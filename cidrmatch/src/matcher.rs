use std::net::Ipv4Addr;

use crate::trie::{bit_at, Node, Stats, ADDR_BITS};

/// An immutable, precomputed range set.
///
/// Built by [`crate::compile`] or parsed back from its text form, see [`crate::codec`].
/// Lookups never mutate it, so it can be shared freely between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledMatcher<T> {
	root: Node<T>,
}

impl<T> CompiledMatcher<T> {
	pub(crate) fn from_root(root: Node<T>) -> Self {
		Self { root }
	}

	pub(crate) fn root(&self) -> &Node<T> {
		&self.root
	}

	/// Walks at most 32 bits, stopping at the first resolved node.
	pub fn lookup(&self, addr: u32) -> Option<&T> {
		let mut node = &self.root;
		for i in 0..ADDR_BITS {
			if let Some(v) = node.value.as_ref() {
				return Some(v);
			}
			node = node.child(bit_at(addr, i))?;
		}
		node.value.as_ref()
	}

	pub fn get(&self, addr: Ipv4Addr) -> Option<&T> {
		self.lookup(addr.into())
	}

	pub fn contains(&self, addr: Ipv4Addr) -> bool {
		self.get(addr).is_some()
	}

	pub fn is_empty(&self) -> bool {
		self.root.value.is_none() && self.root.is_leaf()
	}

	pub fn stats(&self) -> Stats {
		Stats::of(&self.root)
	}

	/// The ranges that survived compilation, in address order.
	pub fn ranges(&self) -> Ranges<'_, T> {
		Ranges {
			stack: vec![(&self.root, 0, 0)],
		}
	}
}

impl<T: Clone> CompiledMatcher<T> {
	pub fn lookup_or(&self, addr: u32, default: T) -> T {
		self.lookup(addr).cloned().unwrap_or(default)
	}
}

/// Lookup for callers that may not have a matcher or an address at hand,
/// either one missing is simply no match.
pub fn lookup<T>(matcher: Option<&CompiledMatcher<T>>, addr: Option<u32>) -> Option<&T> {
	matcher?.lookup(addr?)
}

pub struct Ranges<'a, T> {
	// node, prefix so far, depth
	stack: Vec<(&'a Node<T>, u32, u32)>,
}

impl<'a, T> Iterator for Ranges<'a, T> {
	type Item = (u32, u32, &'a T);

	fn next(&mut self) -> Option<Self::Item> {
		while let Some((n, prefix, depth)) = self.stack.pop() {
			if let Some(v) = n.value.as_ref() {
				return Some((prefix, depth, v));
			}
			// push 1 first so 0 comes out first
			for bit in [1u32, 0] {
				if let Some(c) = n.child(bit) {
					let p = prefix | (bit << (ADDR_BITS - 1 - depth));
					self.stack.push((c, p, depth + 1));
				}
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread};

	use super::*;
	use crate::{
		compiler::compile,
		prefix::{format_cidr, parse_addr, parse_cidr},
	};

	fn build(list: &[(&str, &'static str)]) -> CompiledMatcher<&'static str> {
		compile(list.iter().map(|(cidr, v)| {
			let (prefix, mask) = parse_cidr(cidr).unwrap();
			(prefix, mask, *v)
		}))
	}

	#[test]
	fn size() {
		println!(
			"size_of::<CompiledMatcher<u8>>: {}",
			std::mem::size_of::<CompiledMatcher<u8>>()
		);
	}

	#[test]
	fn test_lookup() {
		let m = build(&[("127.0.0.1/24", "lo"), ("0.0.0.0/32", "zero")]);
		let tests = [
			("126.255.255.255", None),
			("127.0.0.0", Some("lo")),
			("127.0.0.255", Some("lo")),
			("127.0.1.0", None),
			("0.0.0.0", Some("zero")),
			("0.0.0.1", None),
			("255.255.255.255", None),
		];
		for (ip, expected) in tests.iter() {
			let a: Ipv4Addr = ip.parse().unwrap();
			assert_eq!(m.get(a).copied(), *expected, "{}", ip);
			assert_eq!(m.contains(a), expected.is_some());
		}
		assert_eq!(m.lookup_or(parse_addr("8.8.8.8").unwrap(), "wan"), "wan");
		assert_eq!(m.lookup_or(parse_addr("127.0.0.8").unwrap(), "wan"), "lo");
	}

	#[test]
	fn test_missing_inputs() {
		let m = build(&[("0.0.0.0/0", "all")]);
		assert_eq!(lookup(Some(&m), Some(1)), Some(&"all"));
		assert_eq!(lookup(Some(&m), None), None);
		assert_eq!(lookup::<&str>(None, Some(1)), None);
		assert_eq!(lookup::<&str>(None, None), None);
	}

	#[test]
	fn test_ranges() {
		let m = build(&[
			("192.168.1.0/24", "lan1"),
			("10.0.0.0/8", "ten"),
			("10.1.0.0/16", "shadowed"),
			("192.168.0.0/24", "lan0"),
			("255.255.255.255/32", "bcast"),
		]);
		let got: Vec<_> = m
			.ranges()
			.map(|(p, len, v)| (format_cidr(p, len as i32), *v))
			.collect();
		assert_eq!(
			got,
			vec![
				("10.0.0.0/8".to_string(), "ten"),
				("192.168.0.0/24".to_string(), "lan0"),
				("192.168.1.0/24".to_string(), "lan1"),
				("255.255.255.255/32".to_string(), "bcast"),
			]
		);

		let all = build(&[("1.2.3.4/0", "all")]);
		assert_eq!(all.ranges().count(), 1);
		assert_eq!(all.ranges().next(), Some((0, 0, &"all")));
		assert_eq!(build(&[]).ranges().next(), None);
	}

	#[test]
	fn test_shared_between_threads() {
		let m = Arc::new(build(&[("10.0.0.0/8", "ten"), ("172.16.0.0/12", "private")]));
		let handles: Vec<_> = (0..4u32)
			.map(|i| {
				let m = m.clone();
				thread::spawn(move || {
					for n in 0..1000u32 {
						let a = 0x0a00_0000 | (i << 16) | n;
						assert_eq!(m.lookup(a), Some(&"ten"));
						assert_eq!(m.lookup(0xac10_0000 | n), Some(&"private"));
						assert_eq!(m.lookup(0x0b00_0000 | n), None);
					}
				})
			})
			.collect();
		for h in handles {
			h.join().unwrap();
		}
	}
}
