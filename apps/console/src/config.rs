use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::CredentialTable;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "crm.toml";

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub seed_demo_clients: bool,
    pub log_filter: String,
    pub credentials: CredentialTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_demo_clients: true,
            log_filter: "info".into(),
            credentials: CredentialTable::development_defaults(),
        }
    }
}

/// Reads settings from `explicit`, else `CRM_CONFIG`, else `crm.toml`, then
/// applies `APP__*` environment overrides. Only the implicit default path may
/// be absent.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match std::env::var("CRM_CONFIG") {
            Ok(v) if !v.trim().is_empty() => (PathBuf::from(v), true),
            _ => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        },
    };

    let mut settings = read_settings_file(&path, required)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path, required: bool) -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(Settings::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    };

    parse_settings(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str::<Settings>(raw)?)
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__SEED_DEMO_CLIENTS") {
        if let Some(parsed) = parse_flag(&v) {
            settings.seed_demo_clients = parsed;
        }
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        if !v.trim().is_empty() {
            settings.log_filter = v;
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
