//! IPv4 range classification.
//!
//! A list of `(prefix, mask, value)` ranges is compiled once into a [`CompiledMatcher`],
//! a pruned binary trie where a broader range always beats a narrower overlapping one
//! and exact ties go to whichever range came first. Looking an address up walks at most
//! 32 bits no matter how many ranges went in, and the matcher round-trips through a
//! plain string so it can be stored and reused without compiling again.
//!
//! ```
//! use cidrmatch::{compile, CompiledMatcher};
//!
//! let m = compile([
//! 	(0x7f00_0001u32, 32, "localhost"),
//! 	(0xc0a8_0000, 16, "localnet"),
//! ]);
//! assert_eq!(m.lookup(0xc0a8_0000), Some(&"localnet"));
//! assert_eq!(m.lookup(0x0a00_0001), None);
//!
//! let text = m.to_string();
//! let m: CompiledMatcher<String> = text.parse().unwrap();
//! assert_eq!(m.lookup(0x7f00_0001).map(String::as_str), Some("localhost"));
//! ```

pub mod codec;
pub mod compiler;
pub mod conf;
pub mod matcher;
pub mod prefix;
pub mod trie;
pub mod utils;

pub use codec::DecodeError;
pub use compiler::{compile, Compiler, Entry};
pub use matcher::{lookup, CompiledMatcher};
