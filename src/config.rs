use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::crawl;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub tmdb: TmdbConfig,

    pub crawler: CrawlerConfig,

    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        let database_path = dirs::data_local_dir().map_or_else(
            || "sqlite:castgraph.db".to_string(),
            |dir| format!("sqlite:{}", dir.join("castgraph").join("castgraph.db").display()),
        );

        Self {
            database_path,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// Bearer credential for the TMDB API, set once via `castgraph auth`.
    pub api_token: String,

    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            language: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum concurrent in-flight requests per batch.
    pub rate_limit: usize,

    /// Cast members billed at this order or better are expanded.
    pub billing_order_cutoff: i32,

    /// Crew job titles that are expanded.
    pub important_jobs: Vec<String>,

    /// Randomized pause between request batches, in milliseconds.
    pub backoff_min_ms: u64,

    pub backoff_max_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            rate_limit: crawl::DEFAULT_RATE_LIMIT,
            billing_order_cutoff: crawl::DEFAULT_BILLING_ORDER_CUTOFF,
            important_jobs: crawl::DEFAULT_IMPORTANT_JOBS
                .iter()
                .map(ToString::to_string)
                .collect(),
            backoff_min_ms: crawl::DEFAULT_BACKOFF_MIN_MS,
            backoff_max_ms: crawl::DEFAULT_BACKOFF_MAX_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Preferred edge length for the link spring, in world units.
    pub link_distance: f32,

    /// Pairwise repulsion strength.
    pub repulsion: f32,

    pub min_zoom: f32,

    pub max_zoom: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            repulsion: 300.0,
            min_zoom: 0.1,
            max_zoom: 3.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::existing_or_default_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("castgraph").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".castgraph").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// The first existing config location, or the default when none exists
    /// yet, so `auth` writes back to the file that was loaded.
    fn existing_or_default_path() -> PathBuf {
        Self::config_paths()
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or_else(Self::default_config_path)
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.crawler.rate_limit == 0 {
            anyhow::bail!("Crawler rate limit must be > 0");
        }

        if self.crawler.backoff_max_ms < self.crawler.backoff_min_ms {
            anyhow::bail!("Crawler backoff_max_ms must be >= backoff_min_ms");
        }

        if self.viewer.min_zoom <= 0.0 || self.viewer.max_zoom < self.viewer.min_zoom {
            anyhow::bail!("Viewer zoom range is invalid");
        }

        Ok(())
    }

    #[must_use]
    pub fn has_api_token(&self) -> bool {
        !self.tmdb.api_token.trim().is_empty()
    }
}
