//! Percent-encoding utilities.
//!
//! [`encode`] escapes every byte not allowed by a [`Table`]; [`decode`]
//! reverses it, leaving escapes that do not form valid UTF-8 untouched.

pub mod table;

pub use table::Table;

use crate::log::warning;
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::str;

/// Returns the percent-encoded form of a byte, with uppercase hexadecimal digits.
///
/// # Examples
///
/// ```
/// use lenient_uri::pct_enc::encode_byte;
///
/// assert_eq!(encode_byte(b' '), "%20");
/// assert_eq!(encode_byte(0xe4), "%E4");
/// ```
#[must_use]
pub fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Percent-encodes a string with a table.
///
/// Every byte not allowed by `table` is written as `%` followed by two
/// uppercase hexadecimal digits; all other bytes are copied verbatim.
/// Non-ASCII bytes are never allowed by a table and are therefore always
/// encoded. The input is returned borrowed when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use lenient_uri::pct_enc::{encode, table::QUERY_SET};
/// use std::borrow::Cow;
///
/// assert!(matches!(encode("a=1&b=2", QUERY_SET), Cow::Borrowed(_)));
/// assert_eq!(encode("name=张三 #1", QUERY_SET), "name=%E5%BC%A0%E4%B8%89%20%231");
/// ```
pub fn encode(s: &str, table: Table) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = table.find_disallowed(bytes) else {
        return Cow::Borrowed(s);
    };

    let mut buf = String::with_capacity(s.len() + (s.len() - first) * 2);
    buf.push_str(&s[..first]);
    for &x in &bytes[first..] {
        if table.allows(x) {
            buf.push(x as char);
        } else {
            buf.push_str(encode_byte(x));
        }
    }
    Cow::Owned(buf)
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes the percent-encoded octet at the start of `s`, if any.
fn decode_octet(s: &[u8]) -> Option<u8> {
    match s {
        [b'%', hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
            Some(OCTET_TABLE_HI[*hi as usize] | OCTET_TABLE_LO[*lo as usize])
        }
        _ => None,
    }
}

/// Returns the length of the UTF-8 sequence introduced by a leading byte,
/// or `None` if the byte cannot start a sequence.
const fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// Decodes a run of percent-encoded octets forming one UTF-8 character
/// at the start of `s`.
///
/// Returns the decoded bytes and their count, or `None` if a
/// continuation octet is missing or invalid.
fn decode_char(s: &[u8]) -> Option<([u8; 4], usize)> {
    let lead = decode_octet(s)?;
    let len = utf8_len(lead)?;

    let mut out = [lead, 0, 0, 0];
    for (i, slot) in out.iter_mut().enumerate().take(len).skip(1) {
        let x = decode_octet(s.get(i * 3..)?)?;
        if x >> 6 != 0b10 {
            return None;
        }
        *slot = x;
    }
    // Rejects overlong forms and surrogates that pass the bit-pattern check.
    str::from_utf8(&out[..len]).ok()?;
    Some((out, len))
}

/// Decodes a percent-encoded string.
///
/// Each escape, together with the escapes following it that complete a
/// UTF-8 character, is replaced by the character. An escape that is not
/// hexadecimal, or does not start a complete and valid UTF-8 sequence,
/// is copied verbatim and decoding resumes after it. The input is
/// returned borrowed when it contains no `%`.
///
/// # Examples
///
/// ```
/// use lenient_uri::pct_enc::decode;
///
/// assert_eq!(decode("%E5%BC%A0%E4%B8%89"), "张三");
/// assert_eq!(decode("100%25"), "100%");
/// // A lone leading byte passes through untouched.
/// assert_eq!(decode("%E5%41"), "%E5A");
/// assert_eq!(decode("50%"), "50%");
/// ```
pub fn decode(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = bytes.iter().position(|&x| x == b'%') else {
        return Cow::Borrowed(s);
    };

    let mut buf = Vec::with_capacity(bytes.len());
    buf.extend_from_slice(&bytes[..first]);

    let mut i = first;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            buf.push(bytes[i]);
            i += 1;
        } else if let Some((chars, len)) = decode_char(&bytes[i..]) {
            buf.extend_from_slice(&chars[..len]);
            i += len * 3;
        } else if decode_octet(&bytes[i..]).is_some() {
            buf.extend_from_slice(&bytes[i..i + 3]);
            i += 3;
        } else {
            buf.push(b'%');
            i += 1;
        }
    }

    // Every decoded run is checked above and everything else is copied
    // from the input on character boundaries.
    match String::from_utf8(buf) {
        Ok(s) => Cow::Owned(s),
        Err(e) => {
            warning!("decoding {s:?} produced invalid UTF-8");
            Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octet_tables() {
        assert_eq!(decode_octet(b"%2f"), Some(0x2f));
        assert_eq!(decode_octet(b"%A0rest"), Some(0xa0));
        assert_eq!(decode_octet(b"%g0"), None);
        assert_eq!(decode_octet(b"%0"), None);
    }

    #[test]
    fn utf8_lengths() {
        assert_eq!(utf8_len(b'a'), Some(1));
        assert_eq!(utf8_len(0xc3), Some(2));
        assert_eq!(utf8_len(0xe4), Some(3));
        assert_eq!(utf8_len(0xf0), Some(4));
        assert_eq!(utf8_len(0x80), None);
        assert_eq!(utf8_len(0xc0), None);
        assert_eq!(utf8_len(0xff), None);
    }

    #[test]
    fn decode_char_runs() {
        assert_eq!(decode_char(b"%C3%A9"), Some(([0xc3, 0xa9, 0, 0], 2)));
        assert_eq!(decode_char(b"%C3%41"), None);
        assert_eq!(decode_char(b"%C3"), None);
        // Surrogate half.
        assert_eq!(decode_char(b"%ED%A0%80"), None);
    }
}
