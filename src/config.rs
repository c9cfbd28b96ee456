// src/config.rs

use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path};

pub const DEFAULT_CONFIG_FILE: &str = "crm.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    None,
    Sqlite,
    Http,
}

impl SheetKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(SheetKind::None),
            "sqlite" => Some(SheetKind::Sqlite),
            "http" => Some(SheetKind::Http),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    pub max_workers: usize,
    /// Password every team member logs in with.
    pub shared_password: String,
    /// When set, webhook callers must present it.
    pub webhook_secret: Option<String>,
    pub sheet_backend: SheetKind,
    pub sheet_db_path: String,
    pub schema_path: String,
    pub sheet_url: Option<String>,
    pub monthly_target: u32,
    /// Seed the demo dataset when the sheet is empty or absent.
    pub seed_mock_data: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            max_workers: 8,
            shared_password: "leaddesk".into(),
            webhook_secret: None,
            sheet_backend: SheetKind::None,
            sheet_db_path: "./data/sheet.sqlite3".into(),
            schema_path: "sql/schema.sql".into(),
            sheet_url: None,
            monthly_target: 5,
            seed_mock_data: true,
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `crm.toml` when present, then `APP__*` environment variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(_) => Settings::default(),
    };

    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__MAX_WORKERS") {
        settings.max_workers = v
            .parse()
            .with_context(|| format!("APP__MAX_WORKERS is not a number: '{v}'"))?;
    }
    if let Some(v) = env("APP__SHARED_PASSWORD") {
        settings.shared_password = v;
    }
    if let Some(v) = env("APP__WEBHOOK_SECRET") {
        settings.webhook_secret = Some(v).filter(|s| !s.trim().is_empty());
    }
    if let Some(v) = env("APP__SHEET_BACKEND") {
        settings.sheet_backend = SheetKind::parse(&v)
            .with_context(|| format!("unknown sheet backend '{v}' (none, sqlite, http)"))?;
    }
    if let Some(v) = env("APP__SHEET_DB_PATH") {
        settings.sheet_db_path = v;
    }
    if let Some(v) = env("APP__SCHEMA_PATH") {
        settings.schema_path = v;
    }
    if let Some(v) = env("APP__SHEET_URL") {
        settings.sheet_url = Some(v);
    }
    if let Some(v) = env("APP__MONTHLY_TARGET") {
        settings.monthly_target = v
            .parse()
            .with_context(|| format!("APP__MONTHLY_TARGET is not a number: '{v}'"))?;
    }
    if let Some(v) = env("APP__SEED_MOCK_DATA") {
        settings.seed_mock_data = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if settings.sheet_backend == SheetKind::Http && settings.sheet_url.is_none() {
        anyhow::bail!("sheet_backend = \"http\" needs sheet_url");
    }

    Ok(settings)
}

/// Make sure the directory holding the sheet database exists.
pub fn ensure_parent_dir(path: &str) -> anyhow::Result<()> {
    let Some(parent) = Path::new(path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create directory '{}'", parent.display()))
}
