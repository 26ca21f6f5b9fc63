//! INI Byte Scanner
//!
//! Reads an INI-style document one byte at a time from any source that
//! implements `Read` and accumulates it into a [`ConfigStore`].
//!
//! # Format Overview
//!
//! - `[name]` starts a section; anything after `]` on that line is ignored
//! - `key = value` assigns within the current section
//! - the comment marker (`;` by default) discards the rest of the line,
//!   either on a line of its own or trailing a value
//! - blank lines are skipped
//!
//! Section names, keys and values are trimmed of spaces and tabs. An entry is
//! stored only once section, key and value are all non-empty.
//!
//! End of stream between lines is the normal way to finish. End of stream
//! inside a section header, key or value is reported as
//! [`ParseError::Unterminated`].

use std::fmt;
use std::io::{self, Read};
use std::mem;

use bytes::{BufMut, BytesMut};
use thiserror::Error;
use tracing::trace;

use crate::store::ConfigStore;

mod options;

pub use options::{CommentMarker, ParserOptions};

const NEWLINE: u8 = b'\n';
const SECTION_OPEN: u8 = b'[';
const SECTION_CLOSE: u8 = b']';
const ASSIGN: u8 = b'=';

/// The token that was still open when the stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `[` seen, `]` missing
    Section,
    /// key started, `=` missing
    Key,
    /// `=` seen, no newline or comment marker after the value
    Value,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Section => write!(f, "section header"),
            Token::Key => write!(f, "key"),
            Token::Value => write!(f, "value"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    /// The stream ended inside a token. `offset` is where the token began.
    #[error("unterminated {token} starting at byte {offset}")]
    Unterminated { token: Token, offset: u64 },

    /// The underlying reader failed for a reason other than end of stream.
    #[error("read failed at byte {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

/// Single-pass scanner over an INI byte stream.
///
/// Entries are accumulated into the parser's own store as lines complete, so
/// after a failed [`parse`](Parser::parse) the entries read so far can still
/// be recovered with [`into_store`](Parser::into_store). Such a store is
/// partial and should not be mistaken for the whole file.
///
/// # Example
///
/// ```
/// use iniconf::parser::Parser;
///
/// let mut parser = Parser::new(&b"[server]\nport = 8080\n"[..]);
/// parser.parse().unwrap();
///
/// let store = parser.into_store();
/// assert_eq!(store.get("server", "port").unwrap(), "8080");
/// ```
pub struct Parser<R: Read> {
    reader: R,
    comment: u8,
    /// Number of bytes consumed so far.
    offset: u64,
    section: String,
    key: String,
    value: String,
    token: BytesMut,
    store: ConfigStore,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        Parser {
            reader,
            comment: options.comment.byte(),
            offset: 0,
            section: String::new(),
            key: String::new(),
            value: String::new(),
            token: BytesMut::with_capacity(64),
            store: ConfigStore::new(),
        }
    }

    /// Scans the reader to the end.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - end of stream reached between lines
    /// * `Err(ParseError::Unterminated)` - end of stream inside a token
    /// * `Err(ParseError::Io)` - the reader failed
    pub fn parse(&mut self) -> Result<(), ParseError> {
        loop {
            let Some(byte) = self.next_byte()? else {
                return Ok(());
            };

            match byte {
                NEWLINE => {}
                b if b == self.comment => self.skip_line()?,
                SECTION_OPEN => {
                    self.key.clear();
                    self.value.clear();
                    self.section = self.read_section()?;
                    trace!(section = %self.section, "entered section");
                }
                first => {
                    self.key = self.read_key(first)?;
                    self.value = self.read_value()?;
                }
            }

            self.commit();
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn into_store(self) -> ConfigStore {
        self.store
    }

    fn next_byte(&mut self) -> Result<Option<u8>, ParseError> {
        let mut byte = [0u8; 1];
        match self.reader.read_exact(&mut byte) {
            Ok(()) => {
                self.offset += 1;
                Ok(Some(byte[0]))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(ParseError::Io {
                offset: self.offset,
                source,
            }),
        }
    }

    /// Like `next_byte`, but end of stream means `token` was left open.
    fn expect_byte(&mut self, token: Token, start: u64) -> Result<u8, ParseError> {
        self.next_byte()?.ok_or(ParseError::Unterminated {
            token,
            offset: start,
        })
    }

    /// Discards everything up to and including the next newline. End of
    /// stream is fine here.
    fn skip_line(&mut self) -> Result<(), ParseError> {
        while let Some(byte) = self.next_byte()? {
            if byte == NEWLINE {
                break;
            }
        }
        Ok(())
    }

    // The opening `[` has already been consumed.
    fn read_section(&mut self) -> Result<String, ParseError> {
        let start = self.offset - 1;
        self.token.clear();

        loop {
            match self.expect_byte(Token::Section, start)? {
                SECTION_CLOSE => break,
                b => self.token.put_u8(b),
            }
        }

        let name = trim(&self.token);
        self.skip_line()?;
        Ok(name)
    }

    // `first` has already been consumed and belongs to the key.
    fn read_key(&mut self, first: u8) -> Result<String, ParseError> {
        let start = self.offset - 1;
        self.token.clear();

        let mut byte = first;
        while byte != ASSIGN {
            self.token.put_u8(byte);
            byte = self.expect_byte(Token::Key, start)?;
        }

        Ok(trim(&self.token))
    }

    fn read_value(&mut self) -> Result<String, ParseError> {
        let start = self.offset;
        self.token.clear();

        loop {
            match self.expect_byte(Token::Value, start)? {
                NEWLINE => break,
                b if b == self.comment => {
                    self.skip_line()?;
                    break;
                }
                b => self.token.put_u8(b),
            }
        }

        Ok(trim(&self.token))
    }

    // The pending pair is moved into the store, so a later blank or comment
    // line cannot store it again.
    fn commit(&mut self) {
        if self.section.is_empty() || self.key.is_empty() || self.value.is_empty() {
            return;
        }

        let key = mem::take(&mut self.key);
        let value = mem::take(&mut self.value);
        self.store.insert(self.section.clone(), key, value);
    }
}

/// Strips leading and trailing spaces and tabs, nothing else.
fn trim(bytes: &[u8]) -> String {
    let is_blank = |b: &u8| *b == b' ' || *b == b'\t';
    let start = bytes
        .iter()
        .position(|b| !is_blank(b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !is_blank(b))
        .map_or(start, |i| i + 1);

    String::from_utf8_lossy(&bytes[start..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<ConfigStore, ParseError> {
        parse_with(input, ParserOptions::default())
    }

    fn parse_with(input: &str, options: ParserOptions) -> Result<ConfigStore, ParseError> {
        let mut parser = Parser::with_options(input.as_bytes(), options);
        parser.parse()?;
        Ok(parser.into_store())
    }

    #[test]
    fn parses_sections_and_multi_word_values() {
        let store = parse(
            "[section]\nkey=value\n\n[multi]\nfoo = multi word value\nbar = another multi word value\n",
        )
        .unwrap();

        assert_eq!(store.get("section", "key").unwrap(), "value");
        assert_eq!(store.get("multi", "foo").unwrap(), "multi word value");
        assert_eq!(store.get("multi", "bar").unwrap(), "another multi word value");
        assert!(store.get("section", "missing").is_err());
    }

    #[test]
    fn first_byte_of_key_is_kept() {
        let store = parse("[s]\nkey=v\n").unwrap();
        assert_eq!(store.get("s", "key").unwrap(), "v");
    }

    #[test]
    fn trims_spaces_and_tabs() {
        let store = parse("[ \tspaced\t ]\n \t name \t=\t  hello world \t \n").unwrap();
        assert_eq!(store.get("spaced", "name").unwrap(), "hello world");
    }

    #[test]
    fn trailing_comment_truncates_value() {
        let store = parse("[s]\nkey = value ; trailing\nnext = 1\n").unwrap();
        assert_eq!(store.get("s", "key").unwrap(), "value");
        assert_eq!(store.get("s", "next").unwrap(), "1");
    }

    #[test]
    fn full_line_comments_are_ignored() {
        let store = parse("; header comment\n[s]\n; key = nope\nkey = yes\n; no newline").unwrap();
        assert_eq!(store.get("s", "key").unwrap(), "yes");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn hash_marker_leaves_semicolon_in_value() {
        let options = ParserOptions::with_comment(CommentMarker::Hash);
        let store = parse_with("# comment\n[s]\nkey = a;b # trailing\n", options).unwrap();
        assert_eq!(store.get("s", "key").unwrap(), "a;b");
    }

    #[test]
    fn later_assignment_wins() {
        let store = parse("[s]\nkey = first\nkey = second\n").unwrap();
        assert_eq!(store.get("s", "key").unwrap(), "second");
    }

    #[test]
    fn text_after_section_close_is_ignored() {
        let store = parse("[s] trailing = junk\nkey = v\n").unwrap();
        assert_eq!(store.get("s", "key").unwrap(), "v");
        assert!(!store.contains("s", "trailing"));
    }

    #[test]
    fn section_header_at_end_of_stream_is_fine() {
        let store = parse("[s]\nkey = v\n[empty]").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_parts_are_never_stored() {
        let store = parse("orphan = no section\n[s]\nblank =\n = no key\n[]\nk = v\n").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn new_section_drops_pending_pair() {
        let store = parse("[a]\nk = v\n[b]\n\n").unwrap();
        assert!(store.contains("a", "k"));
        assert!(!store.contains("b", "k"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut parser = Parser::new(&b"[s]\nk = \xff\n"[..]);
        parser.parse().unwrap();
        assert_eq!(parser.store().get("s", "k").unwrap(), "\u{FFFD}");
    }

    #[test]
    fn unterminated_section_is_reported() {
        let err = parse("[a]\nk=v\n[broken").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unterminated {
                token: Token::Section,
                offset: 8
            }
        ));
    }

    #[test]
    fn unterminated_key_is_reported() {
        let err = parse("[a]\nkey").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unterminated {
                token: Token::Key,
                offset: 4
            }
        ));
    }

    #[test]
    fn value_without_line_end_is_reported() {
        let err = parse("[a]\nkey=value").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unterminated {
                token: Token::Value,
                offset: 8
            }
        ));
    }

    #[test]
    fn partial_store_survives_failure() {
        let mut parser = Parser::new(&b"[a]\none = 1\ntwo = 2\n[b"[..]);
        assert!(parser.parse().is_err());
        assert_eq!(parser.offset(), 22);

        let partial = parser.into_store();
        assert_eq!(partial.get("a", "one").unwrap(), "1");
        assert_eq!(partial.get("a", "two").unwrap(), "2");
    }

    #[test]
    fn trim_only_strips_spaces_and_tabs() {
        assert_eq!(trim(b" \t x y \t "), "x y");
        assert_eq!(trim(b"\"quoted\"\r"), "\"quoted\"\r");
        assert_eq!(trim(b" \t "), "");
    }
}
