use crate::{
    host,
    log::{debug, trace},
    pct_enc::table::{DIGIT, PATH, PORT, SCHEME, URIC, USERINFO},
    uri::Data,
};
use alloc::string::{String, ToString};
use core::fmt;

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    /// The input is empty.
    Empty,
    /// The input starts with `#`.
    FragmentFirst,
    /// The fragment contains a disallowed character.
    InvalidFragment,
    /// The query contains a disallowed character.
    InvalidQuery,
    /// The scheme does not start with a letter.
    SchemeFirstLetter,
    /// The scheme contains a disallowed or non-ASCII character.
    InvalidScheme,
    /// The path contains a disallowed character.
    InvalidPath,
    /// The userinfo contains a disallowed character.
    InvalidUserinfo,
    /// The port contains a disallowed character, or does not fit in a `u32`.
    InvalidPort,
    /// A bracketed host is followed by a port that is not all digits.
    PortWithBracketedHost,
    /// A host starting with `[` does not end with `]`.
    MissingClosingBracket,
    /// The content of a bracketed host is not an IPv6 address.
    InvalidIpv6,
    /// A host that is not bracketed contains `[` or `]`.
    InvalidHost,
}

impl ParseErrorKind {
    fn description(self) -> &'static str {
        match self {
            Self::Empty => "uri is empty",
            Self::FragmentFirst => "fragment delimiter cannot be first character",
            Self::InvalidFragment => "fragment invalid",
            Self::InvalidQuery => "query invalid",
            Self::SchemeFirstLetter => "scheme must start with a letter",
            Self::InvalidScheme => "scheme invalid",
            Self::InvalidPath => "path invalid",
            Self::InvalidUserinfo => "userinfo invalid",
            Self::InvalidPort => "port invalid",
            Self::PortWithBracketedHost => "port invalid for bracketed host",
            Self::MissingClosingBracket => "IPv6 missing closing bracket",
            Self::InvalidIpv6 => "IPv6 invalid",
            Self::InvalidHost => "host invalid",
        }
    }
}

/// An error occurred when parsing a URI.
///
/// Analysis stops at the first error, so at most one is ever reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the index of the first byte of the offending component.
    ///
    /// For [`FragmentFirst`] and [`Empty`] this is `0`.
    ///
    /// [`FragmentFirst`]: ParseErrorKind::FragmentFirst
    /// [`Empty`]: ParseErrorKind::Empty
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.description())
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ParseError {}

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

pub(crate) fn parse(input: &str) -> Result<Data> {
    let mut analyzer = Analyzer {
        input,
        rest: input,
        out: Data::default(),
    };
    match analyzer.analyze() {
        Ok(()) => Ok(analyzer.out),
        Err(e) => {
            debug!("rejected {input:?} at {}: {e}", e.index);
            Err(e)
        }
    }
}

/// URI analyzer.
///
/// Each step consumes a suffix of `rest`, which always stays a subslice
/// of `input`.
struct Analyzer<'a> {
    input: &'a str,
    rest: &'a str,
    out: Data,
}

impl<'a> Analyzer<'a> {
    /// Returns the position of a subslice of the input.
    fn index_of(&self, s: &str) -> usize {
        s.as_ptr() as usize - self.input.as_ptr() as usize
    }

    fn analyze(&mut self) -> Result<()> {
        if self.input.is_empty() {
            err!(0, Empty);
        }
        self.split_fragment()?;
        self.split_query()?;
        self.split_scheme()
    }

    fn split_fragment(&mut self) -> Result<()> {
        let Some(i) = self.rest.find('#') else {
            return Ok(());
        };
        if i == 0 {
            err!(0, FragmentFirst);
        }
        let fragment = &self.rest[i + 1..];
        if !URIC.validate(fragment, true) {
            err!(self.index_of(fragment), InvalidFragment);
        }
        self.out.fragment = Some(fragment.to_string());
        self.rest = &self.rest[..i];
        Ok(())
    }

    fn split_query(&mut self) -> Result<()> {
        let Some(i) = self.rest.find('?') else {
            return Ok(());
        };
        let query = &self.rest[i + 1..];
        if !URIC.validate(query, true) {
            err!(self.index_of(query), InvalidQuery);
        }
        self.out.query = Some(query.to_string());
        self.rest = &self.rest[..i];
        Ok(())
    }

    fn split_scheme(&mut self) -> Result<()> {
        let rest = self.rest;
        let Some(pos) = rest.find(':') else {
            return self.special_path();
        };
        let scheme = &rest[..pos];
        if scheme.contains('/') {
            // The colon belongs to a relative path.
            return self.special_path();
        }

        let first = rest.as_bytes()[0];
        if first.is_ascii() && !first.is_ascii_alphabetic() {
            err!(self.index_of(rest), SchemeFirstLetter);
        }
        if !SCHEME.validate(scheme, false) {
            err!(self.index_of(scheme), InvalidScheme);
        }
        self.out.scheme = Some(scheme.to_string());

        let rest = &rest[pos + 1..];
        self.rest = "";
        if let Some(authority) = rest.strip_prefix("//") {
            self.out.ssp = self.with_query(rest);
            self.parse_authority(authority)
        } else if rest.starts_with('/') {
            // Taken verbatim: rooted paths after a scheme are not validated.
            self.out.path = Some(rest.to_string());
            self.out.ssp = self.with_query(rest);
            Ok(())
        } else {
            self.out.ssp = self.with_query(rest);
            self.out.query = None;
            Ok(())
        }
    }

    /// Takes what remains as a path, with no scheme or authority.
    fn special_path(&mut self) -> Result<()> {
        let path = self.rest;
        if !PATH.validate(path, true) {
            err!(self.index_of(path), InvalidPath);
        }
        self.out.path = Some(path.to_string());
        self.out.ssp = self.with_query(path);
        self.rest = "";
        Ok(())
    }

    /// Appends `"?" + query` to `s` if the query is non-empty.
    fn with_query(&self, s: &str) -> String {
        let mut buf = s.to_string();
        if let Some(query) = self.out.query.as_deref().filter(|q| !q.is_empty()) {
            buf.push('?');
            buf.push_str(query);
        }
        buf
    }

    fn parse_authority(&mut self, mut auth: &'a str) -> Result<()> {
        if auth.is_empty() {
            return Ok(());
        }

        if let Some(i) = auth.find('/') {
            let path = &auth[i..];
            if !PATH.validate(path, true) {
                err!(self.index_of(path), InvalidPath);
            }
            self.out.path = Some(path.to_string());
            auth = &auth[..i];
        }
        self.out.authority = Some(auth.to_string());

        if let Some(i) = auth.find('@') {
            let userinfo = &auth[..i];
            if !USERINFO.validate(userinfo, true) {
                err!(self.index_of(userinfo), InvalidUserinfo);
            }
            self.out.userinfo = Some(userinfo.to_string());
            auth = &auth[i + 1..];
        }

        let mut port_well_formed = true;
        if let Some(colon) = auth.rfind(':') {
            // A colon before the last `]` belongs to an IPv6 literal.
            let in_literal = auth.rfind(']').is_some_and(|bracket| colon < bracket);
            if !in_literal {
                (auth, port_well_formed) = self.parse_port(auth, colon)?;
            }
        }
        self.parse_host(auth, port_well_formed)
    }

    /// Parses the port after `host[colon]`.
    ///
    /// Returns the host with the port removed and whether the port was
    /// well-formed. An empty port is not well-formed and is not removed.
    fn parse_port(&mut self, host: &'a str, colon: usize) -> Result<(&'a str, bool)> {
        let port = &host[colon + 1..];
        if !PORT.validate(port, true) {
            err!(self.index_of(port), InvalidPort);
        }
        if !DIGIT.validate(port, false) {
            trace!("discarding non-numeric port {port:?}");
            return Ok((&host[..colon], false));
        }
        if port.is_empty() {
            return Ok((host, false));
        }
        match port.parse() {
            Ok(port) => self.out.port = Some(port),
            Err(_) => err!(self.index_of(port), InvalidPort),
        }
        Ok((&host[..colon], true))
    }

    fn parse_host(&mut self, host: &'a str, port_well_formed: bool) -> Result<()> {
        if let Some(literal) = host.strip_prefix('[') {
            let Some(addr) = literal.strip_suffix(']') else {
                err!(self.index_of(host), MissingClosingBracket);
            };
            if !port_well_formed {
                err!(self.index_of(host), PortWithBracketedHost);
            }
            if !host::is_ipv6(addr) {
                err!(self.index_of(addr), InvalidIpv6);
            }
            self.out.host = Some(host.to_string());
            return Ok(());
        }

        if host.contains(['[', ']']) {
            err!(self.index_of(host), InvalidHost);
        }
        if port_well_formed && host::is_ipv4_or_reg_name(host) {
            self.out.host = Some(host.to_string());
        } else {
            trace!("dropping host {host:?} along with its userinfo and port");
            self.out.host = None;
            self.out.userinfo = None;
            self.out.port = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(input: &str) -> Option<ParseErrorKind> {
        parse(input).err().map(|e| e.kind())
    }

    #[test]
    fn error_index_points_at_component() {
        let e = parse("http://a/p?q^#f").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidQuery);
        assert_eq!(e.index(), 11);

        let e = parse("http://u^@h").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidUserinfo);
        assert_eq!(e.index(), 7);

        let e = parse("http://h:9^9").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidPort);
        assert_eq!(e.index(), 9);
    }

    #[test]
    fn fail_fast_order() {
        // The fragment is checked before the query and the scheme.
        assert_eq!(kind("4ht^tp://h?q^#f^"), Some(ParseErrorKind::InvalidFragment));
        assert_eq!(kind("4ht^tp://h?q^#f"), Some(ParseErrorKind::InvalidQuery));
        assert_eq!(kind("4ht^tp://h?q#f"), Some(ParseErrorKind::SchemeFirstLetter));
    }

    #[test]
    fn empty_port_is_kept_in_host() {
        let data = parse("http://host:/p").unwrap();
        assert_eq!(data.host, None);
        assert_eq!(data.authority.as_deref(), Some("host:"));
        assert_eq!(kind("http://[::1]:/p"), Some(ParseErrorKind::MissingClosingBracket));
    }

    #[test]
    fn oversized_port() {
        assert_eq!(kind("http://h:4294967296"), Some(ParseErrorKind::InvalidPort));
        assert_eq!(parse("http://h:4294967295").unwrap().port, Some(u32::MAX));
    }
}
