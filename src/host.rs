//! Host validators.
//!
//! Two whole-string grammars are recognized: an IPv4 address or a
//! DNS-style registered name, and an IPv6 address (the interior of a
//! bracketed literal) with an optional zone identifier.

use crate::pct_enc::table::{self, Table};
use core::net::{Ipv4Addr, Ipv6Addr};

/// `ALPHA / DIGIT / "-" / "~" / "_"`
const LABEL: Table = table::ALPHA.or(table::DIGIT).or(Table::new(b"-~_"));

/// `ALPHA / DIGIT / "." / "_"`
const ZONE_ID: Table = table::ALPHA.or(table::DIGIT).or(Table::new(b"._"));

/// A host recognized by the analyzer.
///
/// # Examples
///
/// ```
/// use lenient_uri::Host;
/// use std::net::{Ipv4Addr, Ipv6Addr};
///
/// assert_eq!(Host::parse("127.0.0.1"), Some(Host::Ipv4(Ipv4Addr::LOCALHOST)));
/// assert_eq!(
///     Host::parse("[::1%eth0]"),
///     Some(Host::Ipv6 { addr: Ipv6Addr::LOCALHOST, zone_id: Some("eth0") }),
/// );
/// assert_eq!(Host::parse("example.com"), Some(Host::RegName("example.com")));
/// assert_eq!(Host::parse("example.1com"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Host<'a> {
    /// An IPv4 address.
    Ipv4(Ipv4Addr),
    /// An IPv6 address.
    Ipv6 {
        /// The address.
        addr: Ipv6Addr,
        /// The zone identifier following `%`, if any.
        zone_id: Option<&'a str>,
    },
    /// A registered name.
    RegName(&'a str),
}

impl<'a> Host<'a> {
    /// Classifies a host as it appears in a URI.
    ///
    /// IPv6 addresses must be enclosed in square brackets. Returns `None`
    /// if the host matches none of the grammars.
    #[must_use]
    pub fn parse(host: &'a str) -> Option<Self> {
        if let Some(inner) = host.strip_prefix('[') {
            let (addr, zone_id) = parse_v6(inner.strip_suffix(']')?)?;
            Some(Host::Ipv6 { addr, zone_id })
        } else if let Some(addr) = parse_v4(host) {
            Some(Host::Ipv4(addr))
        } else {
            is_reg_name(host).then_some(Host::RegName(host))
        }
    }
}

/// Checks whether a string is a dotted-decimal IPv4 address or a
/// registered name.
///
/// A registered name is either a single label, or two or more
/// dot-separated labels of which the last starts with a letter. A label
/// consists of letters, digits, `-`, `~` and `_`, and starts and ends
/// with a letter or digit.
///
/// # Examples
///
/// ```
/// use lenient_uri::host::is_ipv4_or_reg_name;
///
/// assert!(is_ipv4_or_reg_name("199.98.55.44"));
/// assert!(is_ipv4_or_reg_name("www.example.com"));
/// assert!(is_ipv4_or_reg_name("localhost"));
/// assert!(!is_ipv4_or_reg_name("49.10hh8.54.12"));
/// assert!(!is_ipv4_or_reg_name("256.0.0.1"));
/// assert!(!is_ipv4_or_reg_name(""));
/// ```
#[must_use]
pub fn is_ipv4_or_reg_name(s: &str) -> bool {
    parse_v4(s).is_some() || is_reg_name(s)
}

/// Checks whether a string is an IPv6 address with an optional zone
/// identifier, as found between the brackets of an IP literal.
///
/// # Examples
///
/// ```
/// use lenient_uri::host::is_ipv6;
///
/// assert!(is_ipv6("1080::8:800:200C:417A"));
/// assert!(is_ipv6("::FFFF:129.144.52.38"));
/// assert!(is_ipv6("22::22:2:2%ss"));
/// assert!(!is_ipv6("1:0:0:sfvs1:2:1:2:1"));
/// assert!(!is_ipv6("::1%"));
/// ```
#[must_use]
pub fn is_ipv6(s: &str) -> bool {
    parse_v6(s).is_some()
}

fn parse_v4(s: &str) -> Option<Ipv4Addr> {
    let mut reader = Reader::new(s.as_bytes());
    let addr = reader.read_v4()?;
    (!reader.has_remaining()).then(|| Ipv4Addr::from(addr))
}

fn parse_v6(s: &str) -> Option<(Ipv6Addr, Option<&str>)> {
    let (addr, zone_id) = match s.split_once('%') {
        Some((addr, zone_id)) => {
            if zone_id.is_empty() || !ZONE_ID.validate(zone_id, false) {
                return None;
            }
            (addr, Some(zone_id))
        }
        None => (s, None),
    };

    let mut reader = Reader::new(addr.as_bytes());
    let segs = reader.read_v6()?;
    (!reader.has_remaining()).then(|| (Ipv6Addr::from(segs), zone_id))
}

fn is_reg_name(s: &str) -> bool {
    let mut labels = s.split('.');
    let Some(last) = labels.next_back() else {
        return false;
    };
    if !is_label(last) {
        return false;
    }
    if s.len() == last.len() {
        return true;
    }
    last.as_bytes()[0].is_ascii_alphabetic() && labels.all(is_label)
}

fn is_label(s: &str) -> bool {
    match s.as_bytes() {
        [] => false,
        [x] => x.is_ascii_alphanumeric(),
        [first, .., last] => {
            first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric() && LABEL.validate(s, false)
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

enum Seg {
    // *1":" 1*4HEXDIG
    Normal(u16, bool),
    // "::"
    Ellipsis,
    // *1":" 1*4HEXDIG "."
    MaybeV4(bool),
    // ":"
    SingleColon,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.bytes.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
        debug_assert!(self.pos <= self.bytes.len());
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    fn read_v6(&mut self) -> Option<[u16; 8]> {
        let mut segs = [0; 8];
        let mut ellipsis_idx = 8;

        let mut i = 0;
        while i < 8 {
            match self.read_v6_segment() {
                Some(Seg::Normal(seg, colon)) => {
                    if colon == (i == 0 || i == ellipsis_idx) {
                        // Leading colon, triple colons, or no colon.
                        return None;
                    }
                    segs[i] = seg;
                    i += 1;
                }
                Some(Seg::Ellipsis) => {
                    if ellipsis_idx != 8 {
                        // Multiple ellipses.
                        return None;
                    }
                    ellipsis_idx = i;
                }
                Some(Seg::MaybeV4(colon)) => {
                    if i > 6 || colon == (i == ellipsis_idx) {
                        // Not enough space, triple colons, or no colon.
                        return None;
                    }
                    let octets = self.read_v4()?.to_be_bytes();
                    segs[i] = u16::from_be_bytes([octets[0], octets[1]]);
                    segs[i + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                    i += 2;
                    break;
                }
                Some(Seg::SingleColon) => return None,
                None => break,
            }
        }

        if ellipsis_idx == 8 {
            // No ellipsis.
            if i != 8 {
                // Too short.
                return None;
            }
        } else if i == 8 {
            // Eliding nothing.
            return None;
        } else {
            // Shift the segments after the ellipsis to the right.
            for j in (ellipsis_idx..i).rev() {
                segs[8 - (i - j)] = segs[j];
                segs[j] = 0;
            }
        }

        Some(segs)
    }

    fn read_v6_segment(&mut self) -> Option<Seg> {
        let colon = self.read_str(":");
        let Some(first) = self.peek(0) else {
            return colon.then_some(Seg::SingleColon);
        };

        let mut x = match hex_value(first) {
            Some(v) => v,
            None => {
                return colon.then(|| {
                    if first == b':' {
                        self.skip(1);
                        Seg::Ellipsis
                    } else {
                        Seg::SingleColon
                    }
                });
            }
        };
        let mut i = 1;

        while i < 4 {
            let Some(b) = self.peek(i) else {
                break;
            };
            match hex_value(b) {
                Some(v) => {
                    x = (x << 4) | v;
                    i += 1;
                }
                None if b == b'.' => return Some(Seg::MaybeV4(colon)),
                None => break,
            }
        }
        self.skip(i);
        Some(Seg::Normal(x, colon))
    }

    fn read_v4(&mut self) -> Option<u32> {
        let mut addr = self.read_v4_octet()? << 24;
        for i in (0..3).rev() {
            if !self.read_str(".") {
                return None;
            }
            addr |= self.read_v4_octet()? << (i * 8);
        }
        Some(addr)
    }

    fn read_v4_octet(&mut self) -> Option<u32> {
        let mut res = self.peek_digit(0)?;
        if res == 0 {
            // No leading zeros.
            self.skip(1);
            return Some(0);
        }

        for i in 1..3 {
            let Some(x) = self.peek_digit(i) else {
                self.skip(i);
                return Some(res);
            };
            res = res * 10 + x;
        }
        self.skip(3);

        u8::try_from(res).is_ok().then_some(res)
    }

    fn peek_digit(&self, i: usize) -> Option<u32> {
        self.peek(i).and_then(|x| (x as char).to_digit(10))
    }
}

fn hex_value(x: u8) -> Option<u16> {
    (x as char).to_digit(16).map(|v| v as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert!(is_label("a"));
        assert!(is_label("a-b~c_d"));
        assert!(!is_label("-a"));
        assert!(!is_label("a_"));
        assert!(!is_label(""));
    }

    #[test]
    fn reg_names() {
        assert!(is_reg_name("1abc"));
        assert!(is_reg_name("a.b.c"));
        assert!(is_reg_name("9x.example"));
        assert!(!is_reg_name("a..b"));
        assert!(!is_reg_name("a."));
        assert!(!is_reg_name(".a"));
        assert!(!is_reg_name("www.1hw.1com"));
    }

    #[test]
    fn v6_segments() {
        assert_eq!(
            parse_v6("fe80::1:2").map(|(a, _)| a.segments()),
            Some([0xfe80, 0, 0, 0, 0, 0, 1, 2])
        );
        assert_eq!(
            parse_v6("::ffff:1.2.3.4").map(|(a, _)| a.segments()),
            Some([0, 0, 0, 0, 0, 0xffff, 0x0102, 0x0304])
        );
        assert_eq!(parse_v6("1:2:3:4:5:6:7::").map(|(_, z)| z), Some(None));
        assert!(parse_v6("1:2:3:4:5:6:7:8::").is_none());
        assert!(parse_v6("::1:2:3:4:5:6:7:8").is_none());
    }
}
