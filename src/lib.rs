//! A format-preserving parser and in-place editor for DNS zonefiles.
//!
//! This crate reads DNS master files, a.k.a. zonefiles, into a lossless
//! in-memory representation: the file is split into raw [`Token`]s that
//! keep their exact source bytes, tokens are grouped into logical
//! [`Entry`]s, and each token is tagged with the role it plays in its
//! entry — domain, class, TTL, record type, value, comment, or control
//! command. Because every byte of the input lives in exactly one token,
//! writing the file back reproduces it verbatim, including whitespace,
//! comments, parenthesized multi-line groups, and escaping.
//!
//! Editing works by splicing individual tokens: changing a record’s TTL
//! or one of its values rewrites only that token and leaves every other
//! byte of the file alone. This makes the crate suitable for tools that
//! must not reformat hand-maintained zonefiles, such as bumping an SOA
//! serial in place.
//!
//! This is a syntax layer, not a DNS validator: record data is decoded
//! but never interpreted, and zone semantics like serial arithmetic or
//! glue consistency are the caller’s business.
//!
//! ```
//! use zonefile::Zonefile;
//!
//! let mut zone = Zonefile::load(b"www 3600 IN A 192.0.2.1\n").unwrap();
//! let entry = &mut zone.entries_mut()[0];
//! assert_eq!(entry.ttl(), Some(3600));
//! entry.set_ttl(7200).unwrap();
//! assert_eq!(zone.save().as_ref(), b"www 7200 IN A 192.0.2.1\n");
//! ```
//!
//! [`Token`]: scan::Token

pub mod entry;
pub mod error;
pub mod scan;
pub mod tables;
pub mod zonefile;

pub use self::entry::Entry;
pub use self::error::{EntryError, ParseError};
pub use self::zonefile::Zonefile;
