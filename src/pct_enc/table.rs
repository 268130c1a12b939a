//! Character-class tables and percent-encode sets.
//!
//! A [`Table`] answers membership for ASCII bytes only. Bytes at or above
//! `0x80` are never members; whether they are acceptable is decided by
//! the caller (see [`Table::validate`]).

/// A table specifying the ASCII bytes allowed in a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table(u64, u64);

impl Table {
    /// Creates a table that only allows the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut table = 0;
        while let [cur, rem @ ..] = bytes {
            assert!(cur.is_ascii(), "cannot allow non-ASCII byte");
            table |= 1u128 << *cur as u32;
            bytes = rem;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Creates a table that allows every byte in `start..=end`.
    ///
    /// # Panics
    ///
    /// Panics if `end` is not ASCII.
    #[must_use]
    pub const fn range(start: u8, end: u8) -> Self {
        assert!(end.is_ascii(), "cannot allow non-ASCII byte");
        let mut table = 0;
        let mut i = start;
        while i <= end {
            table |= 1u128 << i as u32;
            i += 1;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Combines two tables into one.
    ///
    /// Returns a new table that allows all the bytes allowed
    /// by `self` or by `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Subtracts from this table.
    ///
    /// Returns a new table that allows all the bytes allowed
    /// by `self` but not allowed by `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self(self.0 & !other.0, self.1 & !other.1)
    }

    /// Checks whether the table is a subset of another, i.e., `other`
    /// allows at least all the bytes allowed by `self`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & other.0 == self.0 && self.1 & other.1 == self.1
    }

    /// Checks whether the given byte is allowed by the table.
    ///
    /// Always returns `false` for non-ASCII bytes.
    #[inline]
    #[must_use]
    pub const fn allows(self, x: u8) -> bool {
        let bits = if x < 64 {
            self.0
        } else if x < 128 {
            self.1
        } else {
            return false;
        };
        bits & (1u64 << (x as u32 & 63)) != 0
    }

    /// Validates a string against the table.
    ///
    /// Returns `true` iff every ASCII byte of `s` is allowed by the table
    /// and, when `s` contains non-ASCII bytes, `allow_non_ascii` is `true`.
    /// An empty string is always valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use lenient_uri::pct_enc::table::{PATH, SCHEME};
    ///
    /// assert!(SCHEME.validate("svn+ssh", false));
    /// assert!(!SCHEME.validate("ht*tp", false));
    /// assert!(PATH.validate("/caf\u{e9}", true));
    /// assert!(!PATH.validate("/caf\u{e9}", false));
    /// ```
    #[must_use]
    pub const fn validate(self, s: &str, allow_non_ascii: bool) -> bool {
        let s = s.as_bytes();
        let mut i = 0;
        while i < s.len() {
            let x = s[i];
            if x.is_ascii() {
                if !self.allows(x) {
                    return false;
                }
            } else if !allow_non_ascii {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Returns the index of the first byte that is not allowed by the table.
    pub(crate) fn find_disallowed(self, s: &[u8]) -> Option<usize> {
        s.iter().position(|&x| !self.allows(x))
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

// Character classes used by the analyzer:

/// `0-9`
pub const DIGIT: Table = new(b"0123456789");

/// `A-Z / a-z`
pub const ALPHA: Table = new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `ALPHA / DIGIT / "+" / "-" / "."`
pub const SCHEME: Table = ALPHA.or(DIGIT).or(new(b"+-."));

/// Characters allowed in a query or fragment:
/// [`SCHEME`] plus `;/?:@&=$,[]_!~*'()%`.
pub const URIC: Table = SCHEME.or(new(b";/?:@&=$,[]_!~*'()%"));

/// [`SCHEME`] plus `;/:@&=$,_!~*'()%`.
pub const PATH: Table = SCHEME.or(new(b";/:@&=$,_!~*'()%"));

/// [`SCHEME`] plus `;:&=$,_!~*'()%`.
pub const USERINFO: Table = SCHEME.or(new(b";:&=$,_!~*'()%"));

/// `ALPHA / DIGIT` plus `.:@-;&=+$,_!~*'()`.
///
/// A port that validates against this table but not against [`DIGIT`]
/// is discarded without error.
pub const PORT: Table = ALPHA.or(DIGIT).or(new(b".:@-;&=+$,_!~*'()"));

// Percent-encode sets from the WHATWG URL Standard, expressed as the
// bytes left unencoded:

/// Bytes outside the C0 control percent-encode set: `%x20-7E`.
pub const C0_CONTROL_SET: Table = Table::range(0x20, 0x7e);

/// Bytes outside the fragment percent-encode set.
pub const FRAGMENT_SET: Table = C0_CONTROL_SET.sub(new(b" \"<>`"));

/// Bytes outside the query percent-encode set.
pub const QUERY_SET: Table = C0_CONTROL_SET.sub(new(b" \"#<>"));

/// Bytes outside the special-query percent-encode set.
pub const SPECIAL_QUERY_SET: Table = QUERY_SET.sub(new(b"'"));

/// Bytes outside the path percent-encode set.
pub const PATH_SET: Table = QUERY_SET.sub(new(b"?`{}"));

/// Bytes outside the userinfo percent-encode set.
pub const USERINFO_SET: Table = PATH_SET.sub(new(b"/:;=@[\\]^|"));

/// Bytes outside the component percent-encode set.
pub const COMPONENT_SET: Table = USERINFO_SET.sub(new(b"$%&+,"));

/// Bytes outside the `application/x-www-form-urlencoded` percent-encode set.
pub const FORM_URLENCODED_SET: Table = COMPONENT_SET.sub(new(b"!'()~"));
