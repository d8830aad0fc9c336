//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::commands::extract::engine_config;
use crate::config::Config;
use crate::discovery::{resolve_infos_dir, DirectorySource};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use quarry_extractor::{Diagnostics, TextResolver};

/// Execute the resolve command.
pub fn execute_resolve(args: ResolveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let engine = engine_config(config, &args.source);
    engine.validate().map_err(CliError::Config)?;

    let infos_dir = resolve_infos_dir(&args.source.game_path, &engine.language_file)?;
    let resolver = TextResolver::load(&DirectorySource::new(infos_dir), &engine)?;

    let count = resolver
        .forms(&args.key)
        .map(<[String]>::len)
        .ok_or_else(|| CliError::InvalidInput(format!("Unknown localization key '{}'", args.key)))?;

    let mut diagnostics = Diagnostics::new();
    let forms: Vec<String> = (0..count)
        .map(|index| resolver.resolve_form(&args.key, index, &mut diagnostics))
        .collect();
    let selected = args
        .form
        .map(|index| resolver.resolve_form(&args.key, index, &mut diagnostics));

    println!(
        "{}",
        formatter.format_resolution(&args.key, &forms, selected.as_deref())?
    );
    Ok(())
}
