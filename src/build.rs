use crate::uri::Data;
use alloc::string::String;
use core::fmt::Write;

/// Change applied while reassembling a URI.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Op<'a> {
    Plain,
    AppendSegment(&'a str),
    AppendQuery(&'a str),
    ClearQuery,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

fn push_scheme(buf: &mut String, data: &Data, lowercase: bool) {
    if let Some(scheme) = non_empty(&data.scheme) {
        if lowercase {
            buf.extend(scheme.chars().map(|c| c.to_ascii_lowercase()));
        } else {
            buf.push_str(scheme);
        }
        buf.push(':');
    }
}

/// Writes the segment, query and fragment parts after the path.
fn push_tail(buf: &mut String, data: &Data, op: Op<'_>) {
    if let Op::AppendSegment(segment) = op {
        if !buf.ends_with('/') {
            buf.push('/');
        }
        buf.push_str(segment);
    }

    match (non_empty(&data.query), op) {
        (_, Op::ClearQuery) => {}
        (Some(query), Op::AppendQuery(param)) => {
            buf.push('?');
            buf.push_str(query);
            buf.push('&');
            buf.push_str(param);
        }
        (Some(query), _) => {
            buf.push('?');
            buf.push_str(query);
        }
        (None, Op::AppendQuery(param)) => {
            buf.push('?');
            buf.push_str(param);
        }
        (None, _) => {}
    }

    if let Some(fragment) = non_empty(&data.fragment) {
        buf.push('#');
        buf.push_str(fragment);
    }
}

/// Reassembles a URI from its stored components, applying `op`.
///
/// The authority is written verbatim.
pub(crate) fn assemble(data: &Data, op: Op<'_>) -> String {
    let mut buf = String::with_capacity(data.ssp.len() + 16);
    push_scheme(&mut buf, data, false);
    if let Some(authority) = non_empty(&data.authority) {
        buf.push_str("//");
        buf.push_str(authority);
    }
    if let Some(path) = &data.path {
        buf.push_str(path);
    }
    push_tail(&mut buf, data, op);
    buf
}

/// Reassembles a URI around a normalized path.
///
/// The authority is rebuilt from the userinfo, host and port when there
/// is a host, and written verbatim otherwise.
pub(crate) fn assemble_normalized(data: &Data, path: &str, lowercase: bool) -> String {
    let mut buf = String::with_capacity(data.ssp.len() + 16);
    push_scheme(&mut buf, data, lowercase);
    if let Some(host) = non_empty(&data.host) {
        buf.push_str("//");
        if let Some(userinfo) = non_empty(&data.userinfo) {
            buf.push_str(userinfo);
            buf.push('@');
        }
        if lowercase {
            buf.extend(host.chars().map(|c| c.to_ascii_lowercase()));
        } else {
            buf.push_str(host);
        }
        if let Some(port) = data.port {
            write!(buf, ":{port}").unwrap();
        }
    } else if let Some(authority) = non_empty(&data.authority) {
        buf.push_str("//");
        buf.push_str(authority);
    }
    buf.push_str(path);
    push_tail(&mut buf, data, Op::Plain);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    #[test]
    fn segment_after_trailing_slash() {
        let data = parse("http://h/dir/").unwrap();
        assert_eq!(assemble(&data, Op::AppendSegment("f")), "http://h/dir/f");
        let data = parse("http://h").unwrap();
        assert_eq!(assemble(&data, Op::AppendSegment("f")), "http://h/f");
    }

    #[test]
    fn normalized_authority_from_host() {
        let data = parse("http://u@h:080/a").unwrap();
        assert_eq!(assemble(&data, Op::Plain), "http://u@h:080/a");
        assert_eq!(assemble_normalized(&data, "/a", false), "http://u@h:80/a");
    }

    #[test]
    fn normalized_authority_without_host() {
        let data = parse("http://u@bad..host/a").unwrap();
        assert_eq!(data.host, None);
        assert_eq!(assemble_normalized(&data, "/a", false), "http://u@bad..host/a");
    }
}
