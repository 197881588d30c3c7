//! Errors raised while parsing or editing a zonefile.
//!
//! There are two families. [`ParseError`] is fatal to the parse in
//! progress: lexing and classification abort on the first one and no
//! partial zonefile is returned. [`EntryError`] is local and recoverable:
//! a failed mutation leaves the entry exactly as it was.

use crate::scan::Pos;
use core::fmt;

//------------ ParseError ----------------------------------------------------

/// A lexing or structural error aborting a parse.
///
/// Carries a message and the 1-based line and column of the offending
/// byte or token.
#[derive(Clone, Copy, Debug)]
pub struct ParseError {
    msg: &'static str,
    pos: Pos,
}

impl ParseError {
    pub(crate) fn new(msg: &'static str, pos: Pos) -> Self {
        ParseError { msg, pos }
    }

    /// Returns the error message.
    pub fn message(&self) -> &'static str {
        self.msg
    }

    /// Returns the 1-based line number of the offending input.
    pub fn line(&self) -> usize {
        self.pos.line()
    }

    /// Returns the 1-based column number of the offending input.
    pub fn col(&self) -> usize {
        self.pos.col()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.msg)
    }
}

impl std::error::Error for ParseError {}

//------------ EntryError ----------------------------------------------------

/// An error returned by an entry mutator.
///
/// The entry is left unmodified and earlier edits stay intact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntryError(&'static str);

impl EntryError {
    pub(crate) fn empty_value() -> Self {
        EntryError("value must be non-empty")
    }

    pub(crate) fn value_index() -> Self {
        EntryError("index of value is too high")
    }

    pub(crate) fn no_domain() -> Self {
        EntryError("control entry does not have a domain")
    }

    pub(crate) fn no_class() -> Self {
        EntryError("control entry does not have a class")
    }

    pub(crate) fn no_ttl() -> Self {
        EntryError("control entry does not have a TTL")
    }

    pub(crate) fn bad_class() -> Self {
        EntryError("invalid dns class")
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for EntryError {}
