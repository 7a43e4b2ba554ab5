use std::net::Ipv4Addr;

use log::*;

use crate::{
	matcher::CompiledMatcher,
	trie::{bit_at, Node, Stats, ADDR_BITS},
};

/// One range handed to the compiler: the leading `mask` bits of `prefix`, resolving to `value`.
///
/// `mask` is deliberately signed and unchecked, anything `<= 0` resolves at the root
/// and anything above 32 is treated as a full /32.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<T> {
	pub prefix: u32,
	pub mask: i32,
	pub value: T,
}

impl<T> Entry<T> {
	pub fn new(prefix: u32, mask: i32, value: T) -> Self {
		Self {
			prefix,
			mask,
			value,
		}
	}
}

impl<T> From<(Ipv4Addr, i32, T)> for Entry<T> {
	fn from((addr, mask, value): (Ipv4Addr, i32, T)) -> Self {
		Self::new(addr.into(), mask, value)
	}
}

impl<T> From<(u32, i32, T)> for Entry<T> {
	fn from((prefix, mask, value): (u32, i32, T)) -> Self {
		Self::new(prefix, mask, value)
	}
}

// number of prefix bits actually walked for a mask
fn walk_len(mask: i32) -> u32 {
	if mask <= 0 {
		0
	} else {
		(mask as u32).min(ADDR_BITS)
	}
}

/// Builds the trie one entry at a time.
///
/// A shorter prefix always wins over a longer overlapping one, whatever the order,
/// and among entries landing on the same node the first one inserted wins.
pub struct Compiler<T> {
	root: Node<T>,
	entries: usize,
	shadowed: usize,
}

impl<T> Compiler<T> {
	#[allow(clippy::new_without_default)]
	pub fn new() -> Self {
		Self {
			root: Node::new(),
			entries: 0,
			shadowed: 0,
		}
	}

	/// Returns false when the entry was shadowed by something already committed.
	pub fn insert(&mut self, prefix: u32, mask: i32, value: T) -> bool {
		self.entries += 1;
		let len = walk_len(mask);
		if mask < 0 || mask > ADDR_BITS as i32 {
			debug!("mask out of range: {}, walking {} bits", mask, len);
		}

		let mut node = &mut self.root;
		for i in 0..len {
			if node.value.is_some() {
				break;
			}
			node = node.child_mut_or_new(bit_at(prefix, i));
		}

		let committed = if node.value.is_none() {
			node.value = Some(value);
			true
		} else {
			trace!("{:08x}/{} shadowed", prefix, mask);
			self.shadowed += 1;
			false
		};
		// set or confirmed, either way nothing below it matters any more
		node.prune();
		committed
	}

	pub fn insert_entry(&mut self, e: Entry<T>) -> bool {
		self.insert(e.prefix, e.mask, e.value)
	}

	pub fn extend(&mut self, entries: impl IntoIterator<Item = impl Into<Entry<T>>>) {
		for e in entries {
			self.insert_entry(e.into());
		}
	}

	pub fn len(&self) -> usize {
		self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries == 0
	}

	pub fn finish(self) -> CompiledMatcher<T> {
		debug!(
			"compiled {} entries ({} shadowed): {:?}",
			self.entries,
			self.shadowed,
			Stats::of(&self.root)
		);
		CompiledMatcher::from_root(self.root)
	}
}

/// Compiles `entries` in order into a matcher.
pub fn compile<T>(entries: impl IntoIterator<Item = impl Into<Entry<T>>>) -> CompiledMatcher<T> {
	let mut c = Compiler::new();
	c.extend(entries);
	c.finish()
}
