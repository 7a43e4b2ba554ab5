//! Text form of a [`CompiledMatcher`].
//!
//! A header followed by a pre-order walk of the trie, one tag per node:
//!
//! ```text
//! -             empty matcher, only valid as the whole body
//! v<len>:<val>  resolved node, <len> is the byte length of <val>
//! <N            only child0, followed by it
//! >N            only child1, followed by it
//! *NN           both children, child0 first
//! ```
//!
//! Values are written verbatim with their `Display` impl and read back with `FromStr`,
//! so `0.0.0.0/1 => a` plus `128.0.0.0/2 => b` comes out as `cidrmatch:1:*v1:a<v1:b`.
//! The string is plain ASCII apart from the values themselves.

use std::{
	fmt::{self, Display, Write},
	str::FromStr,
};

use thiserror::Error;

use crate::{
	matcher::CompiledMatcher,
	trie::{Node, ADDR_BITS},
};

pub const HEADER: &str = "cidrmatch:1:";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
	#[error("missing or unsupported header, expected \"cidrmatch:1:\"")]
	BadHeader,

	#[error("unexpected end of input at {pos}")]
	UnexpectedEnd { pos: usize },

	#[error("unexpected byte {byte:#04x} at {pos}")]
	UnexpectedByte { byte: u8, pos: usize },

	#[error("invalid value length at {pos}")]
	BadLength { pos: usize },

	#[error("invalid value at {pos}: {msg}")]
	Value { pos: usize, msg: String },

	#[error("trie deeper than 32 bits at {pos}")]
	TooDeep { pos: usize },

	#[error("trailing data at {pos}")]
	Trailing { pos: usize },
}

pub fn encode<T: Display>(m: &CompiledMatcher<T>) -> String {
	m.to_string()
}

pub fn decode<T>(s: &str) -> Result<CompiledMatcher<T>, DecodeError>
where
	T: FromStr,
	T::Err: Display,
{
	s.parse()
}

impl<T: Display> Display for CompiledMatcher<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(HEADER)?;
		if self.is_empty() {
			return f.write_char('-');
		}
		write_node(self.root(), f)
	}
}

fn write_node<T: Display>(n: &Node<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	if let Some(v) = n.value.as_ref() {
		let v = v.to_string();
		return write!(f, "v{}:{}", v.len(), v);
	}
	match (n.child(0), n.child(1)) {
		(Some(c0), Some(c1)) => {
			f.write_char('*')?;
			write_node(c0, f)?;
			write_node(c1, f)
		}
		(Some(c0), None) => {
			f.write_char('<')?;
			write_node(c0, f)
		}
		(None, Some(c1)) => {
			f.write_char('>')?;
			write_node(c1, f)
		}
		// compile never leaves a dangling branch behind
		(None, None) => panic!("corrupted trie: node with neither value nor children"),
	}
}

impl<T> FromStr for CompiledMatcher<T>
where
	T: FromStr,
	T::Err: Display,
{
	type Err = DecodeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let body = s.strip_prefix(HEADER).ok_or(DecodeError::BadHeader)?;
		let mut p = Parser {
			s: body,
			pos: 0,
			base: HEADER.len(),
		};
		let root = if p.peek() == Some(b'-') {
			p.pos += 1;
			Node::new()
		} else {
			p.node(0)?
		};
		// a trailing newline from a file is fine, anything else is not
		if !p.rest().trim_ascii().is_empty() {
			return Err(DecodeError::Trailing { pos: p.at() });
		}
		Ok(CompiledMatcher::from_root(root))
	}
}

struct Parser<'a> {
	s: &'a str,
	pos: usize,
	// offset of `s` in the original string, for error positions
	base: usize,
}

impl Parser<'_> {
	fn at(&self) -> usize {
		self.base + self.pos
	}

	fn rest(&self) -> &str {
		&self.s[self.pos..]
	}

	fn peek(&self) -> Option<u8> {
		self.s.as_bytes().get(self.pos).copied()
	}

	fn next(&mut self) -> Result<u8, DecodeError> {
		let b = self.peek().ok_or(DecodeError::UnexpectedEnd { pos: self.at() })?;
		self.pos += 1;
		Ok(b)
	}

	fn node<T>(&mut self, depth: u32) -> Result<Node<T>, DecodeError>
	where
		T: FromStr,
		T::Err: Display,
	{
		let tag_pos = self.at();
		let tag = self.next()?;
		if tag != b'v' && depth == ADDR_BITS {
			return Err(DecodeError::TooDeep { pos: tag_pos });
		}
		let mut n = Node::new();
		match tag {
			b'v' => n.value = Some(self.value()?),
			b'<' => n.children[0] = Some(Box::new(self.node(depth + 1)?)),
			b'>' => n.children[1] = Some(Box::new(self.node(depth + 1)?)),
			b'*' => {
				n.children[0] = Some(Box::new(self.node(depth + 1)?));
				n.children[1] = Some(Box::new(self.node(depth + 1)?));
			}
			byte => return Err(DecodeError::UnexpectedByte { byte, pos: tag_pos }),
		}
		Ok(n)
	}

	fn value<T>(&mut self) -> Result<T, DecodeError>
	where
		T: FromStr,
		T::Err: Display,
	{
		let len_pos = self.at();
		let mut len: usize = 0;
		let mut digits = 0;
		loop {
			match self.next()? {
				b':' if digits > 0 => break,
				b @ b'0'..=b'9' => {
					len = len
						.checked_mul(10)
						.and_then(|l| l.checked_add((b - b'0') as usize))
						.ok_or(DecodeError::BadLength { pos: len_pos })?;
					digits += 1;
				}
				_ => return Err(DecodeError::BadLength { pos: len_pos }),
			}
		}

		let val_pos = self.at();
		let end = self
			.pos
			.checked_add(len)
			.ok_or(DecodeError::BadLength { pos: len_pos })?;
		if end > self.s.len() {
			return Err(DecodeError::UnexpectedEnd { pos: self.base + self.s.len() });
		}
		// None when the length cuts a utf-8 sequence in half
		let raw = self
			.s
			.get(self.pos..end)
			.ok_or(DecodeError::BadLength { pos: len_pos })?;
		self.pos = end;
		raw.parse().map_err(|e: T::Err| DecodeError::Value {
			pos: val_pos,
			msg: e.to_string(),
		})
	}
}
