//! The extraction command: config and flags in, manifest file out.

use crate::{ExitCode, OutputOptions};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use graphql_persist_canonical::{AddTypename, DuplicateSignaturePolicy, TransformPipeline};
use graphql_persist_config::{find_config, load_config, ExtractSection, PersistConfig};
use graphql_persist_engine::{ExtractOptions, Extractor};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractArgs {
    /// File or directory to extract operations from
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Manifest file to write (default: extracted_queries.json)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Read GraphQL from `gql` tagged template literals in JavaScript/TypeScript files
    #[arg(long)]
    pub js: bool,

    /// File extensions to read, comma separated (default: graphql)
    #[arg(long, value_delimiter = ',', value_name = "EXT")]
    pub extension: Option<Vec<String>>,

    /// Regular expressions for paths to skip, comma separated
    #[arg(long, value_delimiter = ',', value_name = "REGEX")]
    pub exclude: Option<Vec<String>>,

    /// Add __typename to every nested selection set before computing signatures
    #[arg(long, alias = "add_typename")]
    pub add_typename: bool,

    /// Template tags to look for with --js, comma separated (default: gql)
    #[arg(long, value_delimiter = ',', value_name = "TAG")]
    pub tag: Option<Vec<String>>,

    /// What to do when two operations have the same signature: reuse or overwrite
    #[arg(long, value_name = "POLICY")]
    pub duplicate_signatures: Option<DuplicateSignaturePolicy>,
}

/// Everything a run needs after config and flags are merged.
#[derive(Debug)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: ExtractOptions,
}

/// Flags win over config values; config values win over defaults.
pub fn resolve_settings(args: &ExtractArgs, config: &PersistConfig) -> Result<Settings> {
    let ExtractSection {
        output,
        extensions,
        embedded,
        tags,
        exclude,
        add_typename,
        duplicate_signatures,
    } = config.extract.clone();

    let mut transforms = TransformPipeline::new();
    if args.add_typename || add_typename {
        transforms.push(AddTypename);
    }

    let options = ExtractOptions::new()
        .with_extensions(args.extension.clone().unwrap_or(extensions))
        .with_embedded(args.js || embedded)
        .with_tags(args.tag.clone().unwrap_or(tags))
        .with_exclude_patterns(args.exclude.clone().unwrap_or(exclude))
        .context("Invalid exclude pattern")?
        .with_transforms(transforms)
        .with_duplicate_signatures(args.duplicate_signatures.unwrap_or(duplicate_signatures));

    Ok(Settings {
        input: args.input.clone(),
        output: args.output.clone().unwrap_or(output),
        options,
    })
}

/// Loads the explicit config file, or the nearest one above the working directory.
fn load_persist_config(path: Option<&Path>) -> Result<PersistConfig> {
    let config_path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            find_config(&cwd).context("Failed to search for config")?
        }
    };

    let Some(config_path) = config_path else {
        tracing::debug!("No config file, using defaults");
        return Ok(PersistConfig::default());
    };

    load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))
}

pub fn run(args: &ExtractArgs, config_path: Option<&Path>, output_opts: OutputOptions) {
    let settings = match load_persist_config(config_path)
        .and_then(|config| resolve_settings(args, &config))
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {e:#}", "✗ Configuration error:".red());
            ExitCode::ConfigError.exit();
        }
    };

    if output_opts.show_info && !settings.options.transforms.is_empty() {
        println!("Using the add-typename query transformer.");
    }

    let spinner = output_opts.show_progress.then(|| {
        crate::progress::spinner(&format!(
            "Extracting queries from {}...",
            settings.input.display()
        ))
    });

    let extractor = Extractor::new(settings.options);
    let result = extractor.extract_to_file(&settings.input, &settings.output);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(manifest) => {
            tracing::info!(operations = manifest.len(), "Manifest written");
            if output_opts.show_info {
                println!("Wrote output file to {}.", settings.output.display());
            }
        }
        Err(e) => {
            eprintln!(
                "{} {e}",
                format!("✗ Unable to process path {}:", settings.input.display()).red()
            );
            ExitCode::from(&e).exit();
        }
    }
}
