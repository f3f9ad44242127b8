//! Concierge configuration
//!
//! Config file: `$CONCIERGE_CONFIG`, else `~/.config/concierge/config.toml`,
//! else defaults. Matching constants (weights, thresholds, limits) are not
//! configurable.

use crate::error::{ConciergeError, Result};
use crate::knowledge::{builtin_items, generated_items, load_items_file, KnowledgeBase};
use crate::synonyms::SynonymTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "CONCIERGE_CONFIG";

/// Knowledge sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Load the built-in and generated sets first
    #[serde(default = "default_true")]
    pub include_builtin: bool,

    /// Extra JSON files, appended in order
    #[serde(default)]
    pub sources: Vec<PathBuf>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            sources: Vec::new(),
        }
    }
}

/// Local session settings for the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity reported by the static auth; absent means signed out
    #[serde(default)]
    pub actor: Option<String>,
}

/// Catalog fixture for the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file of `{ "category": [entity, ...] }`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Developer/debug settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    /// Print match scores next to answers
    #[serde(default)]
    pub show_scores: bool,

    /// Number of suggestions for `suggest`
    #[serde(default = "default_suggestions")]
    pub suggestions: usize,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            show_scores: false,
            suggestions: default_suggestions(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConciergeConfig {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Extra `phrase = "category_code"` pairs
    #[serde(default)]
    pub synonyms: HashMap<String, String>,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

fn default_true() -> bool {
    true
}

fn default_suggestions() -> usize {
    3
}

impl ConciergeConfig {
    /// `~/.config/concierge/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("concierge").join("config.toml"))
    }

    /// Parse a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a specific file; relative source paths resolve against its directory
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_toml(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path
    /// 2. `$CONCIERGE_CONFIG`
    /// 3. User config
    /// 4. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConciergeError::Config(format!(
                    "{} points to missing file {}",
                    CONFIG_ENV,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for source in &mut self.knowledge.sources {
            if source.is_relative() {
                *source = base.join(&*source);
            }
        }
        if let Some(path) = &mut self.catalog.path {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Assemble the knowledge base this config describes
    pub fn knowledge_base(&self) -> Result<KnowledgeBase> {
        let mut sources = Vec::new();
        if self.knowledge.include_builtin {
            sources.push(("builtin".to_string(), builtin_items()));
            sources.push(("generated".to_string(), generated_items()?));
        }
        for path in &self.knowledge.sources {
            sources.push((path.display().to_string(), load_items_file(path)?));
        }
        KnowledgeBase::from_sources(sources)
    }

    pub fn synonym_table(&self) -> SynonymTable {
        SynonymTable::with_extra(&self.synonyms)
    }
}
