use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

use crate::parser::{CommentMarker, ParserOptions};

/// Looked up in the working directory when no settings path is given.
const DEFAULT_SETTINGS: &str = "iniget";

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub comment: CommentMarker,
}

impl Settings {
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::with_comment(self.comment)
    }
}

/// Reads settings from `path`, or from an optional `iniget.{toml,yaml,json,...}`
/// in the working directory. Missing fields take their defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, config::ConfigError> {
    let source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_SETTINGS).required(false),
    };

    let settings: Settings = Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
