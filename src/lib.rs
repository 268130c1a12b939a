#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A permissive URI analyzer with normalization, reconstruction and
//! percent-encoding utilities.
//!
//! The analyzer splits a URI string into scheme, authority, userinfo,
//! host, port, path, query and fragment by character-class lookups and
//! substring slicing. It is deliberately lenient in a few places: a
//! host that is neither an IPv4 address nor a registered name drops the
//! authority parts instead of failing, and a rooted path after a scheme
//! is taken verbatim. See [`Uri`] for details.
//!
//! ```
//! use lenient_uri::Uri;
//!
//! let uri = Uri::parse("http://user@example.com:8080/a/./b/../c?x=1#top")?;
//! assert_eq!(uri.scheme().unwrap().as_str(), "http");
//! assert_eq!(uri.host(), Some("example.com"));
//! assert_eq!(uri.port(), Some(8080));
//! assert_eq!(uri.normalize(), "http://user@example.com:8080/a/c?x=1#top");
//! assert_eq!(uri.add_query_value("y", "2"), "http://user@example.com:8080/a/./b/../c?x=1&y=2#top");
//! # Ok::<_, lenient_uri::ParseError>(())
//! ```
//!
//! # Feature flags
//!
//! - `std` (default): Enables `std` support. This includes [`Error`] implementations.
//! - `impl-error` (implied by `std`): Implements [`Error`] for the error types.
//! - `serde`: Enables [`serde`] support for [`Uri`] and [`SearchParams`].
//! - `log`: Emits diagnostics through the [`log`] facade.
//!
//! [`Error`]: core::error::Error
//! [`serde`]: https://docs.rs/serde
//! [`log`]: https://docs.rs/log

extern crate alloc;

mod build;
pub mod host;
mod log;
mod normalize;
mod parse;
pub mod pct_enc;
pub mod query;
mod uri;

pub use host::Host;
pub use normalize::Normalizer;
pub use parse::{ParseError, ParseErrorKind};
pub use query::SearchParams;
pub use uri::{Parse, Scheme, Segments, Uri};

#[cfg(feature = "impl-error")]
use core::error::Error;
