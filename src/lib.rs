//! Read-only access to INI-style configuration files.
//!
//! ```no_run
//! let config = iniconf::load("app.ini")?;
//! let host = config.get("database", "host")?;
//! # Ok::<(), iniconf::ConfigError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

pub mod error;
pub mod parser;
pub mod settings;
pub mod store;

pub use error::{ConfigError, ErrorKind, Result};
pub use parser::{CommentMarker, ParserOptions};
pub use store::ConfigStore;

use crate::parser::Parser;

/// Parses the INI file at `path` using `;` comments.
///
/// Fails with `ConfigError::Io` if the file cannot be opened or read, and
/// with `ConfigError::Malformed` if it ends inside a section header, key or
/// value.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigStore> {
    load_with(path, ParserOptions::default())
}

pub fn load_with<P: AsRef<Path>>(path: P, options: ParserOptions) -> Result<ConfigStore> {
    let path = path.as_ref();
    debug!(path = %path.display(), comment = %options.comment, "loading config");

    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut parser = Parser::with_options(BufReader::new(file), options);
    if let Err(e) = parser.parse() {
        debug!(path = %path.display(), error = %e, "config parse failed");
        return Err(ConfigError::with_path(e, path.to_path_buf()));
    }

    let store = parser.into_store();
    debug!(
        path = %path.display(),
        sections = store.sections().count(),
        entries = store.len(),
        "config loaded"
    );
    Ok(store)
}

/// Parses INI content from any reader. Errors carry no path and are
/// reported as `ConfigError::Parse`.
pub fn parse_reader<R: Read>(reader: R, options: ParserOptions) -> Result<ConfigStore> {
    let mut parser = Parser::with_options(reader, options);
    parser.parse()?;
    Ok(parser.into_store())
}
