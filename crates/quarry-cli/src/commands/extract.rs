//! Extract command implementation.

use crate::cli::{ExtractArgs, SourceArgs};
use crate::config::{select_categories, Config};
use crate::discovery::{resolve_infos_dir, DirectorySource};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::writer::{write_run, WrittenFile};
use quarry_domain::Registry;
use quarry_extractor::{ExtractorConfig, Pipeline, RunOutput};
use std::sync::Arc;
use tracing::info;

/// Apply command-line overrides to the engine configuration.
pub(crate) fn engine_config(config: &Config, source: &SourceArgs) -> ExtractorConfig {
    let mut engine = config.extractor.clone();
    if let Some(language) = &source.language {
        engine.language = language.clone();
    }
    engine
}

/// Run the extraction and write its documents, without printing.
pub async fn run_extract(
    args: &ExtractArgs,
    config: &Config,
    registry: &Registry,
) -> Result<(RunOutput, Vec<WrittenFile>)> {
    let mut engine = engine_config(config, &args.source);
    if let Some(workers) = args.workers {
        if workers == 0 {
            return Err(CliError::InvalidInput("--workers must be at least 1".to_string()));
        }
        engine.workers = workers;
    }

    let source = DirectorySource::new(resolve_infos_dir(
        &args.source.game_path,
        &engine.language_file,
    )?);
    info!("Reading game data from {}", source.root().display());

    let registry = select_categories(registry, &args.categories);
    let mut pipeline = Pipeline::new(engine)?;
    if let Some(version) = &args.game_version {
        pipeline = pipeline.with_game_version(version.clone());
    }

    let output = pipeline.run(Arc::new(source), &registry).await?;
    let written = write_run(&args.output_dir, &output)?;
    Ok((output, written))
}

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    registry: &Registry,
    formatter: &Formatter,
) -> Result<()> {
    let (output, written) = run_extract(&args, config, registry).await?;
    println!("{}", formatter.format_run(&output, &written)?);

    if !output.is_success() {
        let failed: Vec<_> = output
            .failures
            .iter()
            .filter(|f| f.fatal)
            .map(|f| f.category.as_str())
            .collect();
        return Err(CliError::RunFailed(failed.join(", ")));
    }
    Ok(())
}
