use crate::{ConfigError, PersistConfig, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    ".persistgraphqlrc.yml",
    ".persistgraphqlrc.yaml",
    ".persistgraphqlrc.json",
    ".persistgraphqlrc.toml",
    ".persistgraphqlrc",
    "persistgraphql.config.yml",
    "persistgraphql.config.yaml",
    "persistgraphql.config.json",
    "persistgraphql.config.toml",
];

/// Find a config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a config from the specified path.
/// Automatically detects the format based on file extension.
///
/// Relative file paths in the config are resolved against the directory
/// holding the config file.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<PersistConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let config = load_config_from_str(&contents, path)?.relative_to(base);
    tracing::info!(
        embedded = config.extract.embedded,
        router = config.router.is_some(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a config from a string.
/// The path is used for error messages and format detection; paths inside the
/// config are returned as written.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<PersistConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    tracing::debug!(extension, file_name, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        "toml" => parse_toml(contents, path)?,
        "" if file_name == ".persistgraphqlrc" => {
            // No extension - try YAML first, then JSON
            tracing::trace!("Trying YAML then JSON for .persistgraphqlrc");
            parse_yaml(contents, path).or_else(|_| parse_json(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!("Validating config");
    validate_config(&config, path)?;

    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<PersistConfig> {
    // An empty YAML document is an empty config
    if contents.trim().is_empty() {
        return Ok(PersistConfig::default());
    }
    serde_saphyr::from_str(contents).map_err(|e| invalid(path, format!("YAML parse error: {e}")))
}

fn parse_json(contents: &str, path: &Path) -> Result<PersistConfig> {
    serde_json::from_str(contents).map_err(|e| invalid(path, format!("JSON parse error: {e}")))
}

fn parse_toml(contents: &str, path: &Path) -> Result<PersistConfig> {
    toml::from_str(contents).map_err(|e| invalid(path, format!("TOML parse error: {e}")))
}

fn invalid(path: &Path, message: String) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    }
}

#[tracing::instrument(skip(config, path), fields(path = %path.display()))]
fn validate_config(config: &PersistConfig, path: &Path) -> Result<()> {
    let extract = &config.extract;

    if extract.extensions.iter().any(|ext| ext.trim().is_empty()) {
        return Err(invalid(path, "extract.extensions has an empty entry".into()));
    }
    if extract.tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(invalid(path, "extract.tags has an empty entry".into()));
    }
    for pattern in &extract.exclude {
        if pattern.is_empty() {
            return Err(invalid(path, "extract.exclude has an empty pattern".into()));
        }
        if let Err(e) = Regex::new(pattern) {
            return Err(invalid(
                path,
                format!("extract.exclude pattern '{pattern}' is not a valid regex: {e}"),
            ));
        }
    }

    if let Some(router) = &config.router {
        if router.uri.trim().is_empty() {
            return Err(invalid(path, "router.uri is empty".into()));
        }
        if router.timeout == Some(0) {
            return Err(invalid(path, "router.timeout must be greater than zero".into()));
        }
        if router.connect_timeout == Some(0) {
            return Err(invalid(
                path,
                "router.connect_timeout must be greater than zero".into(),
            ));
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
