// text <-> (prefix, mask) for the loaders and the cli, the core only sees numbers

use std::net::Ipv4Addr;

pub fn ipv4_to_u32(addr: Ipv4Addr) -> u32 {
	u32::from_be_bytes(addr.octets())
}

pub fn parse_addr(s: &str) -> Option<u32> {
	Some(ipv4_to_u32(s.trim_ascii().parse().ok()?))
}

// "a.b.c.d/n", a bare address is a /32
//	the mask is whatever integer was written, the compiler copes with nonsense
pub fn parse_cidr(s: &str) -> Option<(u32, i32)> {
	match s.trim_ascii().split_once('/') {
		Some((addr, len)) => Some((parse_addr(addr)?, len.trim_ascii().parse().ok()?)),
		None => Some((parse_addr(s)?, 32)),
	}
}

pub fn format_cidr(prefix: u32, mask: i32) -> String {
	format!("{}/{}", Ipv4Addr::from(prefix), mask)
}
