//! Lexing a zonefile into raw tokens.
//!
//! The lexer splits the raw bytes of a zonefile into a sequence of
//! [`Token`]s without interpreting them any further. Every byte of the
//! input ends up in the raw data of exactly one token, so concatenating
//! the raw data of all tokens in order reproduces the input exactly. This
//! is the foundation of the crate’s round-trip guarantee.
//!
//! The original data is kept in a single [`Bytes`] buffer and the tokens
//! reference ranges of it, so lexing does not copy the file’s content.

use crate::error::ParseError;
use bytes::{BufMut, Bytes, BytesMut};
use core::fmt;

//------------ Pos -----------------------------------------------------------

/// The position of a byte in the lexed source.
///
/// Lines and columns are 1-based. Tokens that were synthesized by an
/// editing operation rather than lexed from a file carry line 0.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pos {
    line: usize,
    col: usize,
}

impl Pos {
    pub(crate) fn new(line: usize, col: usize) -> Self {
        Pos { line, col }
    }

    /// Returns the 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 1-based column number.
    pub fn col(&self) -> usize {
        self.col
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

//------------ TokenKind -----------------------------------------------------

/// The lexical category of a token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// A run of blanks. Inside a parenthesized group this includes line
    /// ends, which is how a record can span physical lines.
    Whitespace,

    /// An opening parenthesis starting a group.
    LeftParen,

    /// A closing parenthesis ending a group.
    RightParen,

    /// A comment from a semicolon up to but not including the line end.
    Comment,

    /// A bare item such as a domain name, type mnemonic, or value.
    Item,

    /// An item wrapped in double quotes. The raw data includes the quotes.
    QuotedItem,

    /// A line end outside of a group. Candidate entry terminator.
    Newline,
}

//------------ Token ---------------------------------------------------------

/// A single lexical unit of a zonefile.
///
/// A token owns the exact source bytes it was lexed from. Editing
/// operations replace the raw data of individual tokens; all other tokens
/// keep their bytes untouched.
#[derive(Clone, Debug)]
pub struct Token {
    kind: TokenKind,
    raw: Bytes,
    pos: Pos,
}

impl Token {
    /// Creates a synthetic single space token.
    pub(crate) fn space() -> Self {
        Token {
            kind: TokenKind::Whitespace,
            raw: Bytes::from_static(b" "),
            pos: Pos::default(),
        }
    }

    /// Creates a synthetic newline token.
    pub(crate) fn newline() -> Self {
        Token {
            kind: TokenKind::Newline,
            raw: Bytes::from_static(b"\n"),
            pos: Pos::default(),
        }
    }

    /// Creates a synthetic item token carrying the given decoded value.
    pub(crate) fn item(value: &[u8]) -> Self {
        let mut res = Token {
            kind: TokenKind::Item,
            raw: Bytes::from_static(b"."),
            pos: Pos::default(),
        };
        res.set_value(value);
        res
    }

    /// Returns the kind of the token.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the raw source bytes of the token.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Returns the position the token was emitted at.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Returns whether the token is a plain or quoted item.
    pub fn is_item(&self) -> bool {
        matches!(self.kind, TokenKind::Item | TokenKind::QuotedItem)
    }

    /// Returns the decoded value the raw data of the token represents.
    ///
    /// For items this strips surrounding quotes and resolves `\X` and
    /// `\DDD` escape sequences. Any other kind of token decodes to its
    /// raw data unchanged.
    pub fn value(&self) -> Result<Bytes, BadEscape> {
        let what: &[u8] = match self.kind {
            TokenKind::QuotedItem => &self.raw[1..self.raw.len() - 1],
            TokenKind::Item => &self.raw,
            _ => return Ok(self.raw.clone()),
        };
        let mut res = BytesMut::with_capacity(what.len());
        let mut i = 0;
        while i < what.len() {
            let ch = what[i];
            i += 1;
            if ch != b'\\' {
                res.put_u8(ch);
                continue;
            }
            let ch = match what.get(i) {
                Some(&ch) => ch,
                // A trailing lone backslash escapes nothing.
                None => break,
            };
            i += 1;
            if !ch.is_ascii_digit() {
                res.put_u8(ch);
                continue;
            }
            // A decimal escape: exactly three digits.
            let (d2, d3) = match (what.get(i), what.get(i + 1)) {
                (Some(&d2), Some(&d3))
                    if d2.is_ascii_digit() && d3.is_ascii_digit() =>
                {
                    (d2, d3)
                }
                _ => return Err(BadEscape(self.pos)),
            };
            i += 2;
            let val = u32::from(ch - b'0') * 100
                + u32::from(d2 - b'0') * 10
                + u32::from(d3 - b'0');
            res.put_u8(val as u8);
        }
        Ok(res.freeze())
    }

    /// Replaces the token’s raw data so that it decodes to `value`.
    ///
    /// Backslashes and double quotes are escaped. If the value contains a
    /// space, the whole item is wrapped in double quotes and the token
    /// becomes a quoted item, otherwise it becomes a plain item.
    pub(crate) fn set_value(&mut self, value: &[u8]) {
        debug_assert!(self.is_item());
        let quote = value.contains(&b' ');
        let mut raw = BytesMut::with_capacity(value.len() + 2);
        if quote {
            raw.put_u8(b'"');
        }
        for &ch in value {
            if ch == b'\\' || ch == b'"' {
                raw.put_u8(b'\\');
            }
            raw.put_u8(ch);
        }
        if quote {
            raw.put_u8(b'"');
            self.kind = TokenKind::QuotedItem;
        } else {
            self.kind = TokenKind::Item;
        }
        self.raw = raw.freeze();
    }
}

//------------ Lexer ---------------------------------------------------------

/// A lexer producing the tokens of a zonefile.
///
/// This is a synchronous pull-based scanner: each call to
/// [`next_token`][Self::next_token] consumes just enough input to produce
/// the next token. Errors abort lexing; no further tokens should be
/// requested after one has been returned.
#[derive(Clone, Debug)]
pub(crate) struct Lexer {
    /// The input.
    buf: Bytes,

    /// The read position in `buf`.
    pos: usize,

    /// The start of the token currently being lexed.
    start: usize,

    /// Are we inside a parenthesized group?
    in_group: bool,

    line: usize,
    col: usize,

    /// The width of the previous line, so a newline can be pushed back.
    prev_line_width: usize,
}

impl Lexer {
    /// Creates a lexer over the given input.
    pub fn new(buf: Bytes) -> Self {
        Lexer {
            buf,
            pos: 0,
            start: 0,
            in_group: false,
            line: 1,
            col: 0,
            prev_line_width: 0,
        }
    }

    /// Returns the next token or `None` at the end of the input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        let ch = match self.next() {
            Some(ch) => ch,
            None => return Ok(None),
        };
        match ch {
            b' ' | b'\t' => Ok(Some(self.scan_space())),
            b'\n' | b'\r' if self.in_group => Ok(Some(self.scan_space())),
            b'\n' | b'\r' => Ok(Some(self.emit(TokenKind::Newline))),
            b'"' => self.scan_quoted(),
            b';' => {
                self.scan_until(b"\r\n");
                Ok(Some(self.emit(TokenKind::Comment)))
            }
            b'(' => {
                if self.in_group {
                    return Err(self.error("double ("));
                }
                self.in_group = true;
                Ok(Some(self.emit(TokenKind::LeftParen)))
            }
            b')' => {
                if !self.in_group {
                    return Err(self.error("unexpected )"));
                }
                self.in_group = false;
                Ok(Some(self.emit(TokenKind::RightParen)))
            }
            _ => {
                self.scan_until(b"\r\n\t ;");
                Ok(Some(self.emit(TokenKind::Item)))
            }
        }
    }

    /// Lexes the remainder of a whitespace run.
    ///
    /// Inside a group line ends count as whitespace which is what lets an
    /// entry continue on the next physical line.
    fn scan_space(&mut self) -> Token {
        if self.in_group {
            self.accept_run(b" \t\n\r");
        } else {
            self.accept_run(b" \t");
        }
        self.emit(TokenKind::Whitespace)
    }

    /// Lexes the remainder of a quoted item.
    ///
    /// The opening quote has already been consumed. A backslash escapes
    /// exactly the following byte. The error for an unterminated item
    /// points at the opening quote.
    fn scan_quoted(&mut self) -> Result<Option<Token>, ParseError> {
        let open = self.here();
        let mut escaped = false;
        loop {
            match self.next() {
                None => {
                    return Err(ParseError::new(
                        "unterminated quoted string",
                        open,
                    ))
                }
                Some(b'"') if !escaped => {
                    return Ok(Some(self.emit(TokenKind::QuotedItem)))
                }
                Some(b'\\') => escaped = !escaped,
                Some(_) => escaped = false,
            }
        }
    }

    /// Consumes the next byte if there is one.
    fn next(&mut self) -> Option<u8> {
        let ch = *self.buf.get(self.pos)?;
        if ch == b'\n' {
            self.line += 1;
            self.prev_line_width = self.col;
            self.col = 0;
        }
        self.col += 1;
        self.pos += 1;
        Some(ch)
    }

    /// Pushes the previously consumed byte back.
    ///
    /// Only a single byte can be pushed back. If that byte was a newline
    /// the position is restored to the end of the previous line.
    fn backup(&mut self) {
        self.pos -= 1;
        self.col -= 1;
        if self.col == 0 {
            self.line -= 1;
            self.col = self.prev_line_width;
        }
    }

    /// Consumes a run of bytes from the given set.
    fn accept_run(&mut self, valid: &[u8]) {
        while let Some(ch) = self.next() {
            if !valid.contains(&ch) {
                self.backup();
                return;
            }
        }
    }

    /// Consumes bytes until one of the given set or the end of input.
    fn scan_until(&mut self, stop: &[u8]) {
        while let Some(ch) = self.next() {
            if stop.contains(&ch) {
                self.backup();
                return;
            }
        }
    }

    /// Produces a token of the given kind from the pending raw bytes.
    fn emit(&mut self, kind: TokenKind) -> Token {
        let raw = self.buf.slice(self.start..self.pos);
        self.start = self.pos;
        Token {
            kind,
            raw,
            pos: self.here(),
        }
    }

    /// The current position.
    fn here(&self) -> Pos {
        Pos::new(self.line, self.col)
    }

    /// Produces a lexing error at the current position.
    fn error(&self, msg: &'static str) -> ParseError {
        ParseError::new(msg, self.here())
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

//------------ BadEscape -----------------------------------------------------

/// A malformed escape sequence in the raw data of an item.
///
/// Raised when a decimal escape has fewer than three digits. Since the
/// parser decodes every item while classifying an entry, data that made it
/// into an [`Entry`][crate::entry::Entry] never triggers this.
#[derive(Clone, Copy, Debug)]
pub struct BadEscape(Pos);

impl BadEscape {
    /// Returns the position of the offending item.
    pub fn pos(&self) -> Pos {
        self.0
    }
}

impl fmt::Display for BadEscape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("malformed escape sequence")
    }
}

impl std::error::Error for BadEscape {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn lex(data: &[u8]) -> Vec<Token> {
        Lexer::new(Bytes::copy_from_slice(data))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn lex_err(data: &[u8]) -> ParseError {
        Lexer::new(Bytes::copy_from_slice(data))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err()
    }

    #[test]
    fn kinds_and_raw_round_trip() {
        let data = b"www\tIN A 192.0.2.1 ; host\n";
        let tokens = lex(data);
        assert_eq!(
            tokens.iter().map(Token::kind).collect::<Vec<_>>(),
            [
                TokenKind::Item,
                TokenKind::Whitespace,
                TokenKind::Item,
                TokenKind::Whitespace,
                TokenKind::Item,
                TokenKind::Whitespace,
                TokenKind::Item,
                TokenKind::Whitespace,
                TokenKind::Comment,
                TokenKind::Newline,
            ]
        );
        let mut raw = Vec::new();
        for token in &tokens {
            raw.extend_from_slice(token.raw());
        }
        assert_eq!(raw, data);
    }

    #[test]
    fn group_folds_line_ends() {
        let tokens = lex(b"@ SOA ( 1\n 2 )\n");
        assert_eq!(
            tokens
                .iter()
                .filter(|t| t.kind() == TokenKind::Newline)
                .count(),
            1
        );
        assert!(tokens.iter().any(|t| t.kind() == TokenKind::Whitespace
            && t.raw().contains(&b'\n')));
        assert!(tokens.iter().any(|t| t.kind() == TokenKind::RightParen));
    }

    #[test]
    fn crlf_outside_group_is_two_newlines() {
        let tokens = lex(b"a A 1.2.3.4\r\n");
        assert_eq!(
            tokens
                .iter()
                .filter(|t| t.kind() == TokenKind::Newline)
                .count(),
            2
        );
    }

    #[test]
    fn paren_errors() {
        assert_eq!(lex_err(b"( (").message(), "double (");
        assert_eq!(lex_err(b")").message(), "unexpected )");
    }

    #[test]
    fn unterminated_quote_points_at_opening_quote() {
        let err = lex_err(b"a A 1.2.3.4\nb TXT \"oops");
        assert_eq!(err.message(), "unterminated quoted string");
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn positions_follow_lines() {
        let tokens = lex(b"one\ntwo\n");
        assert_eq!(tokens[0].pos().line(), 1);
        assert_eq!(tokens[3].pos().line(), 3);
    }

    #[test]
    fn decode_plain_and_quoted() {
        let tokens = lex(b"plain \"qu oted\" \"es\\\"c\" \"\\065\\066\"");
        let values: Vec<_> = tokens
            .iter()
            .filter(|t| t.is_item())
            .map(|t| t.value().unwrap())
            .collect();
        assert_eq!(values[0].as_ref(), b"plain");
        assert_eq!(values[1].as_ref(), b"qu oted");
        assert_eq!(values[2].as_ref(), b"es\"c");
        assert_eq!(values[3].as_ref(), b"AB");
    }

    #[test]
    fn decode_rejects_short_decimal_escape() {
        let tokens = lex(b"\"bad\\9x\"");
        assert!(tokens[0].value().is_err());
    }

    #[test]
    fn encode_decode_round_trip() {
        for value in [
            &b"plain"[..],
            b"with space",
            b"back\\slash",
            b"qu\"ote",
            b"all \\ of \" it",
        ] {
            let mut token = Token::item(b".");
            token.set_value(value);
            assert_eq!(token.value().unwrap().as_ref(), value);
        }
    }

    #[test]
    fn encode_quotes_only_on_space() {
        let mut token = Token::item(b".");
        token.set_value(b"plain");
        assert_eq!(token.kind(), TokenKind::Item);
        token.set_value(b"two words");
        assert_eq!(token.kind(), TokenKind::QuotedItem);
        assert_eq!(token.raw(), b"\"two words\"");
    }
}
