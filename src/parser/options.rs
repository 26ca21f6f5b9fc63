use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// The byte that starts a comment. A comment runs to the end of its line,
/// either on a line of its own or trailing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentMarker {
    /// `;`
    #[default]
    Semicolon,
    /// `#`
    Hash,
}

impl CommentMarker {
    pub fn byte(self) -> u8 {
        match self {
            CommentMarker::Semicolon => b';',
            CommentMarker::Hash => b'#',
        }
    }
}

impl fmt::Display for CommentMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentMarker::Semicolon => write!(f, "semicolon"),
            CommentMarker::Hash => write!(f, "hash"),
        }
    }
}

impl FromStr for CommentMarker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semicolon" | ";" => Ok(CommentMarker::Semicolon),
            "hash" | "#" => Ok(CommentMarker::Hash),
            other => Err(format!(
                "unknown comment marker {:?} (expected semicolon or hash)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    pub comment: CommentMarker,
}

impl ParserOptions {
    pub fn with_comment(comment: CommentMarker) -> Self {
        Self { comment }
    }
}
