// binary trie over address bits, msb first
//	every node owns its two children, nothing is shared

pub const ADDR_BITS: u32 = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<T> {
	pub value: Option<T>,
	pub children: [Option<Box<Node<T>>>; 2],
}

impl<T> Node<T> {
	pub fn new() -> Self {
		Self {
			value: None,
			children: [None, None],
		}
	}

	pub fn child(&self, bit: u32) -> Option<&Node<T>> {
		self.children[(bit & 1) as usize].as_deref()
	}

	pub fn child_mut_or_new(&mut self, bit: u32) -> &mut Node<T> {
		self.children[(bit & 1) as usize].get_or_insert_with(|| Box::new(Node::new()))
	}

	pub fn is_leaf(&self) -> bool {
		self.children[0].is_none() && self.children[1].is_none()
	}

	// nothing below a resolved node is ever reached by a lookup
	pub fn prune(&mut self) {
		self.children = [None, None];
	}
}

impl<T> Default for Node<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Shape of a trie, mostly for logging and the `dump` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
	pub nodes: usize,
	pub leaves: usize,
	pub depth: u32,
}

impl Stats {
	pub fn of<T>(root: &Node<T>) -> Self {
		let mut s = Self::default();
		// explicit stack, depth is bounded by ADDR_BITS anyway
		let mut stack = vec![(root, 0u32)];
		while let Some((n, d)) = stack.pop() {
			s.nodes += 1;
			if n.value.is_some() {
				s.leaves += 1;
			}
			s.depth = s.depth.max(d);
			for c in n.children.iter().flatten() {
				stack.push((c, d + 1));
			}
		}
		s
	}
}

// bit `i` of `addr`, counting from the most significant
#[inline]
pub fn bit_at(addr: u32, i: u32) -> u32 {
	(addr >> (ADDR_BITS - 1 - i)) & 1
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn size() {
		println!("size_of::<Node<u8>>: {}", std::mem::size_of::<Node<u8>>());
		println!("size_of::<Node<String>>: {}", std::mem::size_of::<Node<String>>());
	}

	#[test]
	fn test_bit_at() {
		let a = 0x8000_0001;
		assert_eq!(bit_at(a, 0), 1);
		assert_eq!(bit_at(a, 1), 0);
		assert_eq!(bit_at(a, 30), 0);
		assert_eq!(bit_at(a, 31), 1);
	}

	#[test]
	fn test_prune_and_stats() {
		let mut root = Node::new();
		root.child_mut_or_new(0).child_mut_or_new(1).value = Some("a");
		root.child_mut_or_new(1).value = Some("b");
		assert_eq!(
			Stats::of(&root),
			Stats {
				nodes: 4,
				leaves: 2,
				depth: 2
			}
		);
		assert!(root.child(0).unwrap().child(0).is_none());

		root.value = Some("c");
		root.prune();
		assert!(root.is_leaf());
		assert_eq!(
			Stats::of(&root),
			Stats {
				nodes: 1,
				leaves: 1,
				depth: 0
			}
		);
	}
}
