use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use depwalker_core::AlternativeMode;
use serde::Deserialize;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "depwalker.toml";
pub(crate) const CONFIG_ENV: &str = "DEPWALKER_CONFIG";
pub(crate) const PACKAGES_ENV: &str = "DEPWALKER_PACKAGES";
pub(crate) const NO_COLOR_ENV: &str = "NO_COLOR";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputStyle {
    Plain,
    #[default]
    Rich,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) expand_alternatives: Option<bool>,
    pub(crate) packages_file: Option<PathBuf>,
    pub(crate) output: Option<OutputStyle>,
}

impl FileConfig {
    pub(crate) fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse depwalker config")
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CliOverrides {
    pub(crate) expand_alternatives: bool,
    pub(crate) grouped_alternatives: bool,
    pub(crate) plain: bool,
    pub(crate) packages_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) mode: AlternativeMode,
    pub(crate) style: OutputStyle,
    pub(crate) packages_file: Option<PathBuf>,
}

impl Settings {
    pub(crate) fn resolve<E>(
        overrides: &CliOverrides,
        file: &FileConfig,
        env: E,
        interactive: bool,
    ) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let expand = if overrides.expand_alternatives {
            true
        } else if overrides.grouped_alternatives {
            false
        } else {
            file.expand_alternatives.unwrap_or(false)
        };

        let style = if overrides.plain || env(NO_COLOR_ENV).is_some_and(|v| !v.is_empty()) {
            OutputStyle::Plain
        } else {
            file.output.unwrap_or(if interactive {
                OutputStyle::Rich
            } else {
                OutputStyle::Plain
            })
        };

        let packages_file = overrides
            .packages_file
            .clone()
            .or_else(|| {
                env(PACKAGES_ENV)
                    .filter(|value| !value.trim().is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| file.packages_file.clone());

        Self {
            mode: AlternativeMode::from_expand_flag(expand),
            style,
            packages_file,
        }
    }

    pub(crate) fn require_packages_file(&self) -> Result<&Path> {
        self.packages_file.as_deref().ok_or_else(|| {
            anyhow!(
                "no Packages file given: pass a path, set {PACKAGES_ENV}, or set packages_file in {DEFAULT_CONFIG_FILE}"
            )
        })
    }
}

pub(crate) fn load_file_config<E>(explicit: Option<&Path>, env: E) -> Result<FileConfig>
where
    E: Fn(&str) -> Option<String>,
{
    let requested = explicit
        .map(Path::to_path_buf)
        .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

    let path = match requested {
        Some(path) => path,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                return Ok(FileConfig::default());
            }
            default_path
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    FileConfig::from_toml_str(&content)
        .with_context(|| format!("invalid config file: {}", path.display()))
}
