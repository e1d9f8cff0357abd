use crate::i18n::Language;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Program used to run privileged apt commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Elevation {
    /// polkit; the desktop's authentication agent asks for the password
    #[default]
    Pkexec,
    /// sudo; credentials are validated on the terminal before the operation
    Sudo,
}

impl Elevation {
    pub fn program(self) -> &'static str {
        match self {
            Elevation::Pkexec => "pkexec",
            Elevation::Sudo => "sudo",
        }
    }

    /// Whether the front-end must leave the TUI to collect a password first.
    pub fn needs_terminal_auth(self) -> bool {
        matches!(self, Elevation::Sudo)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `None` follows the `LANG` environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    pub elevation: Elevation,
}

impl Config {
    pub fn path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/cuerdtoken/config.toml")
    }

    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Effective display language.
    pub fn language(&self) -> Language {
        self.language.unwrap_or_else(Language::detect)
    }
}
