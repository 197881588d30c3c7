//! The zonefile as a whole.
//!
//! [`Zonefile`] holds the ordered entries of a DNS master file plus the
//! suffix: raw tokens trailing the last entry-terminating newline, such
//! as an unterminated final line or a dangling comment. Serializing a
//! freshly loaded zonefile reproduces the input byte for byte; after an
//! edit, everything outside the touched tokens still does.

use crate::entry::{parse_line, Entry};
use crate::error::{EntryError, ParseError};
use crate::scan::{Lexer, Token, TokenKind};
use bytes::{Bytes, BytesMut};
use core::mem;

//------------ Zonefile ------------------------------------------------------

/// A parsed DNS master file.
#[derive(Clone, Debug, Default)]
pub struct Zonefile {
    entries: Vec<Entry>,
    suffix: Vec<Token>,
}

impl Zonefile {
    /// Creates a new, empty zonefile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a bytestring containing a zonefile.
    ///
    /// Tokens are grouped into one entry per logical line: a newline
    /// terminates the pending run once the run contains at least one
    /// item, so blank and comment-only lines attach to the entry that
    /// follows them. A trailing run without items becomes the suffix.
    pub fn load(data: &[u8]) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(Bytes::copy_from_slice(data));
        let mut zonefile = Zonefile::new();
        let mut line = Vec::new();
        let mut items = 0;
        while let Some(token) = lexer.next_token()? {
            if token.is_item() {
                items += 1;
            }
            let terminates = token.kind() == TokenKind::Newline && items > 0;
            line.push(token);
            if terminates {
                zonefile.entries.push(parse_line(mem::take(&mut line))?);
                items = 0;
            }
        }
        if items > 0 {
            zonefile.entries.push(parse_line(line)?);
        } else {
            zonefile.suffix = line;
        }
        Ok(zonefile)
    }

    /// Returns the entries of the zonefile.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the entries of the zonefile for editing.
    pub fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    /// Appends an entry to the zonefile.
    ///
    /// The pending suffix is absorbed into the new entry as its prefix,
    /// so a dangling trailing comment ends up in front of the appended
    /// entry. If the file doesn’t end on a newline, one is inserted
    /// between the two.
    pub fn add_entry(&mut self, mut entry: Entry) -> &mut Entry {
        let newline = !self.ends_on_newline();
        entry.prepend(mem::take(&mut self.suffix), newline);
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Appends a minimal A record entry to the zonefile.
    pub fn add_a(
        &mut self,
        domain: &[u8],
        value: &[u8],
    ) -> Result<&mut Entry, EntryError> {
        let mut entry = Entry::with_single_value(value)?;
        if !domain.is_empty() {
            entry.set_domain(domain)?;
        }
        Ok(self.add_entry(entry))
    }

    /// Writes the zonefile back to a bytestring.
    ///
    /// This is plain concatenation of every token’s raw data; nothing is
    /// re-derived from decoded values.
    pub fn save(&self) -> Bytes {
        let mut buf = BytesMut::new();
        for entry in &self.entries {
            entry.compose(&mut buf);
        }
        for token in &self.suffix {
            buf.extend_from_slice(token.raw());
        }
        buf.freeze()
    }

    /// Returns whether the serialized zonefile would end on a newline.
    fn ends_on_newline(&self) -> bool {
        if let Some(token) = self.suffix.last() {
            return token.kind() == TokenKind::Newline;
        }
        match self.entries.last() {
            Some(entry) => entry.ends_on_newline(),
            // An empty file needs no separating newline.
            None => true,
        }
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_and_comment_lines_attach_to_next_entry() {
        let data = b"a A 1.2.3.4\n\n; db\nb A 4.3.2.1\n";
        let zonefile = Zonefile::load(data).unwrap();
        assert_eq!(zonefile.entries().len(), 2);
        assert_eq!(
            zonefile.entries()[1].domain().unwrap().as_ref(),
            b"b"
        );
        assert!(zonefile.save().as_ref() == data);
    }

    #[test]
    fn trailing_comment_becomes_suffix() {
        let data = b"a A 1.2.3.4\n; trailing";
        let zonefile = Zonefile::load(data).unwrap();
        assert_eq!(zonefile.entries().len(), 1);
        assert_eq!(zonefile.save().as_ref(), data);
    }

    #[test]
    fn final_entry_without_newline() {
        let zonefile = Zonefile::load(b"a A 1.2.3.4\nb A 4.3.2.1").unwrap();
        assert_eq!(zonefile.entries().len(), 2);
        assert_eq!(
            zonefile.entries()[1].domain().unwrap().as_ref(),
            b"b"
        );
    }

    #[test]
    fn save_is_idempotent() {
        let data = b"$TTL 3600\n@ IN SOA ns hm ( 1 2 3 4 5 )\n";
        let zonefile = Zonefile::load(data).unwrap();
        assert_eq!(zonefile.save(), zonefile.save());
        assert_eq!(zonefile.save().as_ref(), data);
    }

    #[test]
    fn add_entry_absorbs_suffix() {
        let mut zonefile =
            Zonefile::load(b"www IN A 192.0.2.1\n; eof").unwrap();
        zonefile.add_a(b"mail", b"192.0.2.2").unwrap();
        assert_eq!(
            zonefile.save().as_ref(),
            b"www IN A 192.0.2.1\n; eof\nmail 192.0.2.2"
        );
        assert_eq!(zonefile.entries().len(), 2);
    }

    #[test]
    fn add_a_to_empty_file() {
        let mut zonefile = Zonefile::new();
        let entry = zonefile.add_a(b"www", b"192.0.2.1").unwrap();
        assert_eq!(entry.domain().unwrap().as_ref(), b"www");
        assert_eq!(zonefile.save().as_ref(), b"www 192.0.2.1");
    }

    #[test]
    fn add_a_without_domain() {
        let mut zonefile = Zonefile::load(b"www IN A 192.0.2.1\n").unwrap();
        zonefile.add_a(b"", b"192.0.2.2").unwrap();
        assert_eq!(
            zonefile.save().as_ref(),
            b"www IN A 192.0.2.1\n 192.0.2.2"
        );
    }

    #[test]
    fn load_reports_position() {
        let err = Zonefile::load(b"a A 1.2.3.4\nb IN IN A 1.2.3.4\n")
            .unwrap_err();
        assert_eq!(err.message(), "two classes specified");
        assert_eq!(err.line(), 2);
    }
}
