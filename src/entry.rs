//! Entries of a zonefile.
//!
//! An [`Entry`] is one logical record or control directive together with
//! all the formatting around it: leading blank lines and comments belong
//! to the entry that follows them, the terminating newline to the entry
//! itself. Each token of the entry carries a [`Role`] assigned by the
//! classifier so the interesting tokens are easy to find and to splice
//! around without touching anything else.

use crate::error::{EntryError, ParseError};
use crate::scan::{Lexer, Pos, Token, TokenKind};
use crate::tables;
use bytes::{Bytes, BytesMut};
use core::mem;
use core::str;

//------------ Role ----------------------------------------------------------

/// The semantic purpose of a token within its entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Role {
    /// Whitespace, parentheses, newlines.
    None,
    Type,
    Class,
    Ttl,
    Domain,
    Comment,
    Value,
    /// A `$INCLUDE`, `$ORIGIN`, or `$TTL` command.
    Control,
}

//------------ TaggedToken ---------------------------------------------------

/// A token plus the role it plays in its entry.
#[derive(Clone, Debug)]
struct TaggedToken {
    token: Token,
    role: Role,
}

impl TaggedToken {
    /// Wraps a raw token. Comments get their role right away.
    fn new(token: Token) -> Self {
        let role = if token.kind() == TokenKind::Comment {
            Role::Comment
        } else {
            Role::None
        };
        TaggedToken { token, role }
    }

    fn space() -> Self {
        TaggedToken {
            token: Token::space(),
            role: Role::None,
        }
    }

    fn newline() -> Self {
        TaggedToken {
            token: Token::newline(),
            role: Role::None,
        }
    }
}

//------------ Entry ---------------------------------------------------------

/// One record or control directive of a zonefile.
#[derive(Clone, Debug)]
pub struct Entry {
    tokens: Vec<TaggedToken>,
    is_control: bool,
}

impl Entry {
    /// Parses a single entry from a bytestring.
    ///
    /// Fails with "multiple entries in string" if another item follows a
    /// terminated entry.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(Bytes::copy_from_slice(data));
        let mut tokens = Vec::new();
        let mut items = 0;
        let mut terminated = false;
        while let Some(token) = lexer.next_token()? {
            if terminated && token.is_item() {
                return Err(ParseError::new(
                    "multiple entries in string",
                    token.pos(),
                ));
            }
            if token.is_item() {
                items += 1;
            }
            if token.kind() == TokenKind::Newline && items > 0 {
                terminated = true;
            }
            tokens.push(token);
        }
        parse_line(tokens)
    }

    /// Creates a minimal entry holding a single value.
    ///
    /// The entry starts indented so it has no domain until one is set.
    pub(crate) fn with_single_value(
        value: &[u8],
    ) -> Result<Self, EntryError> {
        if value.is_empty() {
            return Err(EntryError::empty_value());
        }
        Ok(Entry {
            tokens: vec![
                TaggedToken::space(),
                TaggedToken {
                    token: Token::item(value),
                    role: Role::Value,
                },
            ],
            is_control: false,
        })
    }

    /// Returns whether this is a control ($INCLUDE, $ORIGIN, $TTL) entry.
    pub fn is_control(&self) -> bool {
        self.is_control
    }

    /// For a control entry, returns its command.
    pub fn command(&self) -> Option<Bytes> {
        self.first_value(Role::Control)
    }

    /// Returns the domain specified for the entry, if any.
    pub fn domain(&self) -> Option<Bytes> {
        self.first_value(Role::Domain)
    }

    /// Returns the class specified for the entry, if any.
    pub fn class(&self) -> Option<Bytes> {
        self.first_value(Role::Class)
    }

    /// Returns the record type specified for the entry, if any.
    pub fn rtype(&self) -> Option<Bytes> {
        self.first_value(Role::Type)
    }

    /// Returns the TTL specified for the entry, if any.
    pub fn ttl(&self) -> Option<u32> {
        let value = self.first_value(Role::Ttl)?;
        str::from_utf8(&value).ok()?.parse().ok()
    }

    /// Returns the values specified for the entry, in order.
    pub fn values(&self) -> Vec<Bytes> {
        self.tokens
            .iter()
            .filter(|t| t.role == Role::Value)
            .filter_map(|t| t.token.value().ok())
            .collect()
    }

    /// Replaces the `index`th value of the entry.
    pub fn set_value(
        &mut self,
        index: usize,
        value: &[u8],
    ) -> Result<(), EntryError> {
        if value.is_empty() {
            return Err(EntryError::empty_value());
        }
        let indexes = self.find(Role::Value);
        let i = *indexes.get(index).ok_or_else(EntryError::value_index)?;
        self.tokens[i].token.set_value(value);
        Ok(())
    }

    /// Changes the domain of the entry.
    ///
    /// An empty domain removes the current domain token, if any. Setting
    /// a domain on an entry that has none splices a new token in at the
    /// start of the entry’s main line.
    pub fn set_domain(&mut self, value: &[u8]) -> Result<(), EntryError> {
        if self.is_control {
            return Err(EntryError::no_domain());
        }

        if let Some(&i) = self.find(Role::Domain).first() {
            if !value.is_empty() {
                self.tokens[i].token.set_value(value);
                return Ok(());
            }
            self.tokens.remove(i);
        }

        // No domain present and none wanted.
        if value.is_empty() {
            return Ok(());
        }

        let start = self.start_of_line();
        let mut insert = vec![TaggedToken {
            token: Token::item(value),
            role: Role::Domain,
        }];
        if self.tokens[start].token.kind() != TokenKind::Whitespace {
            insert.push(TaggedToken::space());
        }
        self.tokens.splice(start..start, insert);
        Ok(())
    }

    /// Changes the class of the entry.
    ///
    /// An empty class removes the current class token, if any. A
    /// non-empty class must be a recognized class mnemonic.
    pub fn set_class(&mut self, value: &[u8]) -> Result<(), EntryError> {
        if self.is_control {
            return Err(EntryError::no_class());
        }
        if !value.is_empty() && !tables::is_class(value) {
            return Err(EntryError::bad_class());
        }

        if let Some(&i) = self.find(Role::Class).first() {
            if !value.is_empty() {
                self.tokens[i].token.set_value(value);
                return Ok(());
            }
            self.tokens.remove(i);
        }

        if value.is_empty() {
            return Ok(());
        }

        self.add_after_domain(TaggedToken {
            token: Token::item(value),
            role: Role::Class,
        });
        Ok(())
    }

    /// Changes the TTL of the entry.
    pub fn set_ttl(&mut self, ttl: u32) -> Result<(), EntryError> {
        if self.is_control {
            return Err(EntryError::no_ttl());
        }
        let value = ttl.to_string();

        if let Some(&i) = self.find(Role::Ttl).first() {
            self.tokens[i].token.set_value(value.as_bytes());
            return Ok(());
        }

        self.add_after_domain(TaggedToken {
            token: Token::item(value.as_bytes()),
            role: Role::Ttl,
        });
        Ok(())
    }

    /// Removes the TTL from the entry, if there is one.
    pub fn remove_ttl(&mut self) -> Result<(), EntryError> {
        if self.is_control {
            return Err(EntryError::no_ttl());
        }
        if let Some(&i) = self.find(Role::Ttl).first() {
            self.tokens.remove(i);
        }
        Ok(())
    }

    /// Appends the raw data of all tokens to the target.
    pub(crate) fn compose(&self, target: &mut BytesMut) {
        for tagged in &self.tokens {
            target.extend_from_slice(tagged.token.raw());
        }
    }

    /// Puts the given raw tokens in front of the entry.
    ///
    /// Used when an entry is appended to a zonefile: the file’s pending
    /// suffix, plus a newline if the file doesn’t end on one, becomes
    /// part of the new entry.
    pub(crate) fn prepend(&mut self, tokens: Vec<Token>, newline: bool) {
        let mut prefix: Vec<TaggedToken> =
            tokens.into_iter().map(TaggedToken::new).collect();
        if newline {
            prefix.push(TaggedToken::newline());
        }
        let rest = mem::replace(&mut self.tokens, prefix);
        self.tokens.extend(rest);
    }

    /// Returns whether the entry’s last token is a newline.
    pub(crate) fn ends_on_newline(&self) -> bool {
        self.tokens
            .last()
            .map_or(false, |t| t.token.kind() == TokenKind::Newline)
    }

    /// Inserts a new item after the domain token.
    ///
    /// If the entry has no domain the item goes to the start of the main
    /// line instead, right after any indentation.
    fn add_after_domain(&mut self, tagged: TaggedToken) {
        if let Some(&i) = self.find(Role::Domain).first() {
            self.tokens
                .splice(i + 1..i + 1, [TaggedToken::space(), tagged]);
            return;
        }

        let start = self.start_of_line();
        let mut insert = vec![tagged];
        if self.tokens[start].token.kind() != TokenKind::Whitespace {
            insert.insert(0, TaggedToken::space());
        }
        self.tokens.splice(start + 1..start + 1, insert);
    }

    /// Returns the indices of all tokens with the given role.
    fn find(&self, role: Role) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.role == role)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns the decoded value of the first token with the given role.
    fn first_value(&self, role: Role) -> Option<Bytes> {
        self.tokens
            .iter()
            .find(|t| t.role == role)
            .and_then(|t| t.token.value().ok())
    }

    /// Returns the index of the first token on the entry’s main line.
    ///
    /// That is the first token after the newline preceding the first
    /// item, skipping over any leading blank or comment lines.
    fn start_of_line(&self) -> usize {
        let first_item = self
            .tokens
            .iter()
            .position(|t| t.token.is_item())
            .unwrap_or(0);
        for i in (0..=first_item).rev() {
            if self.tokens[i].token.kind() == TokenKind::Newline {
                return i + 1;
            }
        }
        0
    }
}

//------------ parse_line ----------------------------------------------------

/// Classifies a tokenized run into an entry.
pub(crate) fn parse_line(line: Vec<Token>) -> Result<Entry, ParseError> {
    let mut entry = Entry {
        tokens: line.into_iter().map(TaggedToken::new).collect(),
        is_control: false,
    };

    let first = match entry.tokens.iter().position(|t| t.token.is_item()) {
        Some(first) => first,
        None => {
            let pos = entry
                .tokens
                .first()
                .map_or(Pos::new(1, 1), |t| t.token.pos());
            return Err(ParseError::new("unexpected empty line", pos));
        }
    };
    let first_pos = entry.tokens[first].token.pos();

    // A control entry has no domain, class, TTL, or type; everything
    // after the command is a value.
    let value = decoded(&entry.tokens[first].token)?;
    if matches!(&value[..], b"$INCLUDE" | b"$ORIGIN" | b"$TTL") {
        entry.tokens[first].role = Role::Control;
        entry.is_control = true;
        for tagged in &mut entry.tokens[first + 1..] {
            if tagged.token.is_item() {
                decoded(&tagged.token)?;
                tagged.role = Role::Value;
            }
        }
        return Ok(entry);
    }

    // An item at the very start of its line is the domain; an indented
    // first item means the entry has none.
    let scan_from = if first == 0
        || entry.tokens[first - 1].token.kind() == TokenKind::Newline
    {
        entry.tokens[first].role = Role::Domain;
        match entry.tokens[first + 1..]
            .iter()
            .position(|t| t.token.is_item())
        {
            Some(i) => first + 1 + i,
            None => return Err(ParseError::new("missing type", first_pos)),
        }
    } else {
        first
    };

    // Classify class and TTL items until the type is found. The type
    // table is consulted first at every position, so the scan always
    // stops at the first item naming a record type.
    let mut found_class = false;
    let mut found_ttl = false;
    let mut rtype_at = None;
    for i in scan_from..entry.tokens.len() {
        if !entry.tokens[i].token.is_item() {
            continue;
        }
        let pos = entry.tokens[i].token.pos();
        let value = decoded(&entry.tokens[i].token)?;

        if tables::is_rtype(&value) {
            entry.tokens[i].role = Role::Type;
            rtype_at = Some(i);
            break;
        }

        if tables::is_class(&value) {
            if found_class {
                return Err(ParseError::new("two classes specified", pos));
            }
            found_class = true;
            entry.tokens[i].role = Role::Class;
            continue;
        }

        // Neither type nor class, so it has to be a TTL.
        if str::from_utf8(&value)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .is_none()
        {
            return Err(ParseError::new("invalid type/class/ttl", pos));
        }
        if found_ttl {
            return Err(ParseError::new("double TTL", pos));
        }
        found_ttl = true;
        entry.tokens[i].role = Role::Ttl;
    }
    let rtype_at = match rtype_at {
        Some(i) => i,
        None => return Err(ParseError::new("missing type", first_pos)),
    };

    // The remaining items are values.
    for tagged in &mut entry.tokens[rtype_at + 1..] {
        if tagged.token.is_item() {
            decoded(&tagged.token)?;
            tagged.role = Role::Value;
        }
    }

    Ok(entry)
}

/// Decodes an item, turning a bad escape into a positioned parse error.
fn decoded(token: &Token) -> Result<Bytes, ParseError> {
    token
        .value()
        .map_err(|err| ParseError::new("malformed escape sequence", err.pos()))
}

//============ Tests =========================================================
