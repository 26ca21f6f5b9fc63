use std::path::PathBuf;

use anyhow::Context;
use clap::Parser as _;
use iniconf::settings::load_settings;
use iniconf::CommentMarker;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Print one value, or every entry, from an INI file.
#[derive(clap::Parser, Debug)]
#[command(name = "iniget", version)]
struct Args {
    /// INI file to read
    file: PathBuf,

    /// Section to look up (requires KEY)
    #[arg(requires = "key")]
    section: Option<String>,

    /// Key within SECTION
    key: Option<String>,

    /// Comment marker: semicolon or hash. Overrides the settings file.
    #[arg(long)]
    comment: Option<CommentMarker>,

    /// Settings file (defaults to ./iniget.toml when present)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let settings = load_settings(args.settings.as_deref()).context("failed to load settings")?;
    let mut options = settings.parser_options();
    if let Some(comment) = args.comment {
        options.comment = comment;
    }

    let store = iniconf::load_with(&args.file, options)?;

    match (args.section, args.key) {
        (Some(section), Some(key)) => {
            println!("{}", store.get(&section, &key)?);
        }
        _ => {
            let mut entries: Vec<(&str, &String, &String)> = store
                .sections()
                .filter_map(|name| store.section(name).map(|keys| (name, keys)))
                .flat_map(|(name, keys)| keys.iter().map(move |(k, v)| (name, k, v)))
                .collect();
            entries.sort_unstable();

            for (section, key, value) in entries {
                println!("{section}.{key}={value}");
            }
        }
    }

    Ok(())
}

fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
