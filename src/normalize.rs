use crate::{build, log::trace, Uri};
use alloc::{borrow::ToOwned, string::String, vec::Vec};
use borrow_or_share::Bos;

/// A configurable URI normalizer.
///
/// # Examples
///
/// ```
/// use lenient_uri::{Normalizer, Uri};
///
/// let uri = Uri::parse("HTTP://Example.COM/../a/./b/../c")?;
/// assert_eq!(uri.normalize(), "HTTP://Example.COM/../a/c");
///
/// let normalizer = Normalizer::new()
///     .keep_leading_parent_segments(false)
///     .lowercase_scheme_and_host(true);
/// assert_eq!(normalizer.normalize(&uri), "http://example.com/a/c");
/// # Ok::<_, lenient_uri::ParseError>(())
/// ```
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct Normalizer {
    keep_leading_parent_segments: bool,
    lowercase_scheme_and_host: bool,
}

impl Normalizer {
    /// Creates a new `Normalizer` with default configuration.
    pub fn new() -> Self {
        Self {
            keep_leading_parent_segments: true,
            lowercase_scheme_and_host: false,
        }
    }

    /// Sets whether `..` segments that would climb above the root are
    /// kept in the output.
    ///
    /// Default is `true`. When `false`, such segments are dropped.
    pub fn keep_leading_parent_segments(mut self, value: bool) -> Self {
        self.keep_leading_parent_segments = value;
        self
    }

    /// Sets whether the scheme and the host are converted to lowercase.
    ///
    /// Default is `false`. Only ASCII letters are affected.
    pub fn lowercase_scheme_and_host(mut self, value: bool) -> Self {
        self.lowercase_scheme_and_host = value;
        self
    }

    /// Removes `.` and `..` segments from a path.
    ///
    /// Empty and `.` segments are dropped. A `..` segment removes the
    /// segment before it, unless there is none or it is itself `..`.
    /// The result always starts with `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lenient_uri::Normalizer;
    ///
    /// let normalizer = Normalizer::new();
    /// assert_eq!(normalizer.normalize_path("/a//b/./c/.."), "/a/b");
    /// assert_eq!(normalizer.normalize_path("/../../path/.././../aa/bb/cc"), "/../../../aa/bb/cc");
    /// assert_eq!(normalizer.normalize_path("a/.."), "/");
    /// ```
    #[must_use]
    pub fn normalize_path(&self, path: &str) -> String {
        let mut stack: Vec<&str> = Vec::new();
        for seg in path.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    if stack.last().is_some_and(|&top| top != "..") {
                        stack.pop();
                    } else if self.keep_leading_parent_segments {
                        stack.push(seg);
                    }
                }
                _ => stack.push(seg),
            }
        }

        if stack.is_empty() {
            return "/".to_owned();
        }
        let mut buf = String::with_capacity(path.len());
        for seg in stack {
            buf.push('/');
            buf.push_str(seg);
        }
        buf
    }

    /// Normalizes a URI.
    ///
    /// The path is normalized with [`normalize_path`] and the URI is
    /// reassembled around it. When there is a host, the authority is
    /// rebuilt from the userinfo, host and port. The input text is
    /// returned unchanged if the path is empty.
    ///
    /// [`normalize_path`]: Self::normalize_path
    #[must_use]
    pub fn normalize<T: Bos<str>>(&self, uri: &Uri<T>) -> String {
        let path = match uri.path() {
            Some(path) if !path.is_empty() => path,
            _ => {
                trace!("nothing to normalize in {:?}", uri.as_str());
                return uri.as_str().to_owned();
            }
        };
        let path = self.normalize_path(path);
        build::assemble_normalized(uri.data(), &path, self.lowercase_scheme_and_host)
    }
}

impl Default for Normalizer {
    /// Equivalent to [`Normalizer::new`].
    fn default() -> Self {
        Self::new()
    }
}
