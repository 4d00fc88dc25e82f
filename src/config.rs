//! Configuration management for QueryDeck.
//!
//! Handles loading configuration from a TOML file, with defaults for the
//! persistent store, grid limits, history cap, resource location and the
//! default query text offered for each resource.

use crate::error::{QueryDeckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Key under which the default query for new sessions is stored.
pub const DEFAULT_QUERY_KEY: &str = "default";

/// Main configuration structure for QueryDeck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Persistent workspace store.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Result grid limits and defaults.
    #[serde(default)]
    pub grid: GridConfig,

    /// Query history settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Row-data resource location and simulated execution delay.
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Default query text per resource title.
    #[serde(default = "default_queries")]
    pub default_queries: HashMap<String, String>,
}

/// Persistent store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the keyed store. Defaults to the platform data dir.
    pub dir: Option<PathBuf>,

    /// Fixed key of the workspace record.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    "sqlEditorState".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Returns the configured store directory, or the platform default.
    ///
    /// - Linux: `~/.local/share/querydeck`
    /// - macOS: `~/Library/Application Support/querydeck`
    /// - Windows: `%APPDATA%\querydeck`
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("querydeck")
        })
    }
}

/// Result grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,

    #[serde(default = "default_min_column_width")]
    pub min_column_width: u32,

    #[serde(default = "default_max_column_width")]
    pub max_column_width: u32,

    #[serde(default = "default_column_width")]
    pub default_column_width: u32,

    /// Characters shown before a long cell is cut off.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Pointer travel (per axis) that turns a click into a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,
}

fn default_page_size() -> usize {
    10
}

fn default_page_size_options() -> Vec<usize> {
    vec![10, 25, 50, 100]
}

fn default_min_column_width() -> u32 {
    100
}

fn default_max_column_width() -> u32 {
    400
}

fn default_column_width() -> u32 {
    150
}

fn default_preview_chars() -> usize {
    50
}

fn default_drag_threshold() -> f64 {
    5.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            min_column_width: default_min_column_width(),
            max_column_width: default_max_column_width(),
            default_column_width: default_column_width(),
            preview_chars: default_preview_chars(),
            drag_threshold: default_drag_threshold(),
        }
    }
}

/// Query history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_history_entries")]
    pub max_entries: usize,
}

fn default_max_history_entries() -> usize {
    15
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_history_entries(),
        }
    }
}

/// Row-data resource configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Base URL that `data/<title>.csv` is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Simulated execution delay applied before a run fetches its rows.
    #[serde(default = "default_query_delay_ms")]
    pub query_delay_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_query_delay_ms() -> u64 {
    1000
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            query_delay_ms: default_query_delay_ms(),
        }
    }
}

impl ResourceConfig {
    /// Parses the base URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| QueryDeckError::config(format!("Invalid resource base URL: {e}")))
    }

    /// Returns the simulated execution delay.
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }
}

fn default_queries() -> HashMap<String, String> {
    [
        (DEFAULT_QUERY_KEY, "SELECT * FROM customers LIMIT 10;"),
        ("categories", "SELECT * FROM categories ORDER BY category_id;"),
        (
            "customers",
            "SELECT customer_id, company_name, contact_name, country FROM customers LIMIT 20;",
        ),
        (
            "employee_territories",
            "SELECT employee_id, territory_id FROM employee_territories;",
        ),
        (
            "employees",
            "SELECT employee_id, first_name, last_name, title, hire_date FROM employees;",
        ),
        (
            "order_details",
            "SELECT order_id, product_id, unit_price, quantity FROM order_details LIMIT 25;",
        ),
        (
            "orders",
            "SELECT order_id, customer_id, employee_id, order_date FROM orders LIMIT 20;",
        ),
        (
            "products",
            "SELECT product_id, product_name, category_id, unit_price FROM products ORDER BY product_name;",
        ),
        ("regions", "SELECT * FROM regions;"),
        ("shippers", "SELECT * FROM shippers;"),
        (
            "suppliers",
            "SELECT supplier_id, company_name, contact_name, country FROM suppliers;",
        ),
        ("territories", "SELECT * FROM territories ORDER BY region_id;"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            grid: GridConfig::default(),
            history: HistoryConfig::default(),
            resources: ResourceConfig::default(),
            default_queries: default_queries(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("querydeck")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| QueryDeckError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses and validates configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            QueryDeckError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.grid.min_column_width > self.grid.max_column_width {
            return Err(QueryDeckError::config(format!(
                "min_column_width ({}) exceeds max_column_width ({})",
                self.grid.min_column_width, self.grid.max_column_width
            )));
        }
        if self.grid.page_size == 0 || self.grid.page_size_options.contains(&0) {
            return Err(QueryDeckError::config("page sizes must be positive"));
        }
        if self.history.max_entries == 0 {
            return Err(QueryDeckError::config("history.max_entries must be positive"));
        }
        self.resources.base_url()?;
        Ok(())
    }

    /// Returns the query text seeded into a "New Query" session.
    pub fn new_query_text(&self) -> String {
        self.default_queries
            .get(DEFAULT_QUERY_KEY)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the query text seeded into a session opened on a resource.
    ///
    /// Titles match the table keys exactly or lowercased.
    pub fn default_query_for(&self, title: &str) -> String {
        self.default_queries
            .get(title)
            .or_else(|| self.default_queries.get(&title.to_lowercase()))
            .cloned()
            .unwrap_or_else(|| format!("SELECT * FROM `{title}`;"))
    }
}
