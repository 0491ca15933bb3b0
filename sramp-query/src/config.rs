// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Compiler configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::namespaces::NamespaceContext;
use crate::schema::properties::ROOT_PATH;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Settings that shape the compiled query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Path under which live artifacts are stored; everything else is trash
    pub root_path: String,
    /// chrono format for date literals against timestamp properties
    pub date_format: String,
    /// Wildcard accepted in `matches` patterns
    pub wildcard_token: String,
    /// Backend wildcard that replaces `wildcard_token`
    pub backend_wildcard: String,
    /// Include binary content in `matches(., ...)` full-text searches
    pub search_content: bool,
    /// Prefix bindings for function and property names
    pub namespaces: NamespaceContext,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            root_path: ROOT_PATH.to_string(),
            date_format: "%Y-%m-%d".to_string(),
            wildcard_token: ".*".to_string(),
            backend_wildcard: "%".to_string(),
            search_content: true,
            namespaces: NamespaceContext::default(),
        }
    }
}

impl CompilerConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading compiler configuration from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root_path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "root_path must be absolute: {}",
                self.root_path
            )));
        }
        if self.wildcard_token.is_empty() {
            return Err(ConfigError::InvalidValue(
                "wildcard_token must not be empty".to_string(),
            ));
        }
        if self.namespaces.default_namespace().is_none() {
            return Err(ConfigError::InvalidValue(format!(
                "default prefix '{}' is not bound",
                self.namespaces.default_prefix
            )));
        }
        Ok(())
    }
}
