//! Query string tokenizing and form-urlencoded search parameters.

use crate::pct_enc::{self, encode_byte, table::FORM_URLENCODED_SET};
use alloc::{
    borrow::Cow,
    string::{String, ToString},
    vec::{self, Vec},
};
use core::{convert::Infallible, fmt, iter::FusedIterator, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Returns an iterator over the decoded key-value pairs of a query string.
///
/// One leading `?` or `&` is skipped. The rest is split on `&`; a
/// trailing `&` is ignored but an empty segment anywhere else yields an
/// empty pair. Each segment is split on its first `=` (no `=` means an
/// empty value), and both halves have `+` replaced by a space before
/// being [percent-decoded](pct_enc::decode).
///
/// # Examples
///
/// ```
/// use lenient_uri::query::pairs;
///
/// let mut it = pairs("?a=1&&b&c=x+y%21&");
/// assert_eq!(it.next(), Some(("a".into(), "1".into())));
/// assert_eq!(it.next(), Some(("".into(), "".into())));
/// assert_eq!(it.next(), Some(("b".into(), "".into())));
/// assert_eq!(it.next(), Some(("c".into(), "x y!".into())));
/// assert_eq!(it.next(), None);
/// ```
pub fn pairs(query: &str) -> Pairs<'_> {
    let rest = query.strip_prefix(['?', '&']).unwrap_or(query);
    Pairs { rest }
}

/// Splits a query string into decoded key-value pairs.
///
/// Equivalent to collecting [`pairs`] into owned strings.
///
/// # Examples
///
/// ```
/// use lenient_uri::query::tokenize;
///
/// assert_eq!(
///     tokenize("name=%E5%BC%A0%E4%B8%89&id=3&id=4"),
///     [
///         ("name".to_owned(), "张三".to_owned()),
///         ("id".to_owned(), "3".to_owned()),
///         ("id".to_owned(), "4".to_owned()),
///     ]
/// );
/// ```
#[must_use]
pub fn tokenize(query: &str) -> Vec<(String, String)> {
    pairs(query)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Replaces `+` with a space and percent-decodes.
fn decode_form(s: &str) -> Cow<'_, str> {
    if s.contains('+') {
        Cow::Owned(pct_enc::decode(&s.replace('+', " ")).into_owned())
    } else {
        pct_enc::decode(s)
    }
}

/// An iterator over the decoded key-value pairs of a query string.
///
/// This struct is created by [`pairs`] and [`Uri::query_pairs`].
///
/// [`Uri::query_pairs`]: crate::Uri::query_pairs
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Pairs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let seg = match self.rest.split_once('&') {
            Some((seg, rest)) => {
                self.rest = rest;
                seg
            }
            None => core::mem::take(&mut self.rest),
        };
        let (key, value) = seg.split_once('=').unwrap_or((seg, ""));
        Some((decode_form(key), decode_form(value)))
    }
}

impl FusedIterator for Pairs<'_> {}

/// An ordered list of name-value pairs, as found in a query string.
///
/// Duplicate names are kept as separate entries. Formatting with
/// [`Display`] serializes the list as `application/x-www-form-urlencoded`.
///
/// # Examples
///
/// ```
/// use lenient_uri::SearchParams;
///
/// let mut params = SearchParams::parse("?b=2&a=1&b=3");
/// assert_eq!(params.get("b"), Some("2"));
/// assert_eq!(params.get_all("b").collect::<Vec<_>>(), ["2", "3"]);
///
/// params.append("c", "x y");
/// params.set("b", "4");
/// params.sort();
/// assert_eq!(params.to_string(), "a=1&b=4&c=x+y");
/// ```
///
/// [`Display`]: fmt::Display
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchParams {
    list: Vec<(String, String)>,
}

impl SearchParams {
    /// Creates an empty `SearchParams`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string. See [`pairs`] for the splitting rules.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        Self {
            list: tokenize(query),
        }
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Checks whether there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Appends a pair.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.list.push((name.into(), value.into()));
    }

    /// Removes all pairs with the given name.
    pub fn delete(&mut self, name: &str) {
        self.list.retain(|(k, _)| k != name);
    }

    /// Returns the value of the first pair with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.list
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the values of all pairs with the given name, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.list
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Checks whether a pair with the given name exists.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.list.iter().any(|(k, _)| k == name)
    }

    /// Sets the value of the first pair with the given name and removes
    /// the others, or appends a new pair if there is none.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.list.iter().position(|(k, _)| k == name) {
            Some(i) => {
                self.list[i].1 = value;
                let mut j = 0;
                self.list.retain(|(k, _)| {
                    j += 1;
                    j - 1 <= i || k != name
                });
            }
            None => self.list.push((name.to_string(), value)),
        }
    }

    /// Sorts the pairs by name, keeping the relative order of pairs with
    /// equal names.
    pub fn sort(&mut self) {
        self.list.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Returns an iterator over the pairs.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &str)> + ExactSizeIterator {
        self.list.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns an iterator over the names.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.list.iter().map(|(k, _)| k.as_str())
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.list.iter().map(|(_, v)| v.as_str())
    }
}

/// Writes a string in `application/x-www-form-urlencoded` form.
fn write_form(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let mut start = 0;
    for (i, &x) in s.as_bytes().iter().enumerate() {
        if FORM_URLENCODED_SET.allows(x) {
            continue;
        }
        if start < i {
            f.write_str(&s[start..i])?;
        }
        f.write_str(if x == b' ' { "+" } else { encode_byte(x) })?;
        start = i + 1;
    }
    f.write_str(&s[start..])
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.list.iter().enumerate() {
            if i != 0 {
                f.write_str("&")?;
            }
            write_form(f, k)?;
            f.write_str("=")?;
            write_form(f, v)?;
        }
        Ok(())
    }
}

impl FromStr for SearchParams {
    type Err = Infallible;

    /// Equivalent to [`SearchParams::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SearchParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.list
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for SearchParams {
    type Item = (String, String);
    type IntoIter = vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

#[cfg(feature = "serde")]
impl Serialize for SearchParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SearchParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
