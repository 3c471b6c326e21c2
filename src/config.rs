//! Runtime configuration.
//!
//! Values come from an optional TOML file (`~/.config/dirsnap/config.toml` or
//! the platform equivalent, or `--config PATH`), then CLI flags on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    output_dir: Option<PathBuf>,
    verbose: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    /// where relative snapshot file names are written, cwd when unset
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => read_file_config(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => read_file_config(&path)?,
                _ => FileConfig::default(),
            },
        };

        Ok(Config {
            output_dir: file.output_dir,
            verbose: cli.verbose || file.verbose.unwrap_or(false),
        })
    }

    /// Where a snapshot named `filename` should be written.
    pub fn output_path(&self, filename: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) if filename.is_relative() => dir.join(filename),
            _ => filename.to_path_buf(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "dirsnap").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    parse_file_config(&text).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

fn parse_file_config(text: &str) -> std::result::Result<FileConfig, toml::de::Error> {
    toml::from_str(text)
}
