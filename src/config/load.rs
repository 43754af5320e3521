//! Configuration loading with env-var overrides.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::llm::ProviderKind;
use crate::logger;

use super::raw::RawConfig;
use super::types::*;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load config from the given path, or `config/default.toml`, then apply
/// env-var overrides and read secrets from the environment.
///
/// If no path is given and the default file does not exist, the built-in
/// defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = Overrides::from_env();

    if let Some(path) = config_path {
        return load_from(Path::new(path), &overrides);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        resolve(RawConfig::default(), &overrides)
    }
}

/// Internal loader. Accepts an explicit path and overrides.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: &Overrides) -> Result<Config, AppError> {
    let default_provider: ProviderKind = parsed
        .marking
        .default_provider
        .parse()
        .map_err(|e| AppError::Config(format!("[marking] default_provider: {e}")))?;

    for (section, secs) in [
        ("gemini", parsed.gemini.timeout_seconds),
        ("openai", parsed.openai.timeout_seconds),
    ] {
        if secs == 0 {
            return Err(AppError::Config(format!(
                "[{section}] timeout_seconds must be greater than zero"
            )));
        }
    }

    let log_level = overrides
        .log_level
        .clone()
        .unwrap_or(parsed.server.log_level);
    logger::parse_level(&log_level)
        .map_err(|_| AppError::Config(format!("[server] log_level: unrecognised level '{log_level}'")))?;

    Ok(Config {
        log_level,
        server: ServerConfig {
            bind: overrides.bind.clone().unwrap_or(parsed.server.bind),
        },
        gemini: GeminiConfig {
            backend: parsed.gemini.backend,
            api_base_url: parsed.gemini.api_base_url.trim_end_matches('/').to_string(),
            model: overrides
                .gemini_model
                .clone()
                .unwrap_or(parsed.gemini.model),
            timeout_seconds: parsed.gemini.timeout_seconds,
        },
        openai: OpenAiConfig {
            backend: parsed.openai.backend,
            api_base_url: parsed.openai.api_base_url,
            model: overrides
                .openai_model
                .clone()
                .unwrap_or(parsed.openai.model),
            temperature: parsed.openai.temperature,
            timeout_seconds: parsed.openai.timeout_seconds,
        },
        marking: MarkingConfig {
            default_provider,
            prompts_dir: PathBuf::from(parsed.marking.prompts_dir),
            system_prompt: parsed.marking.system_prompt,
        },
        secrets: Secrets::from_env(),
    })
}
