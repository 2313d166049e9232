// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the LaViC toolkit.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to working values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LavicConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Package builder paths and spreadsheet layout.
    #[serde(default)]
    pub packager: PackagerConfig,

    /// Hyper3D Rodin generation provider.
    #[serde(default)]
    pub rodin: RodinConfig,

    /// Image search used for package thumbnails.
    #[serde(default)]
    pub image_search: ImageSearchConfig,

    /// Outbound network settings shared by the package builder clients.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Simulation platform REST API.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Spreadsheet display names the package builder knows how to handle.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<CatalogEntry>,
}

impl Default for LavicConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            packager: PackagerConfig::default(),
            rodin: RodinConfig::default(),
            image_search: ImageSearchConfig::default(),
            network: NetworkConfig::default(),
            simulation: SimulationConfig::default(),
            catalog: default_catalog(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Package builder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PackagerConfig {
    /// Directory receiving package folders and zip archives.
    #[serde(default = "default_models_dir")]
    pub models_dir: String,

    /// Cache directory for fetched images, symbols, and meshes.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: String,

    /// Manifest template the packages are derived from.
    #[serde(default = "default_template_path")]
    pub template_path: String,

    /// Input spreadsheet (`.xlsx`, `.xls`, or `.csv`).
    #[serde(default = "default_sheet_path")]
    pub sheet_path: String,

    /// Header of the display-name column.
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Header of the free-text dynamics column.
    #[serde(default = "default_dynamics_column")]
    pub dynamics_column: String,

    /// Header of the category column.
    #[serde(default = "default_category_column")]
    pub category_column: String,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            downloads_dir: default_downloads_dir(),
            template_path: default_template_path(),
            sheet_path: default_sheet_path(),
            name_column: default_name_column(),
            dynamics_column: default_dynamics_column(),
            category_column: default_category_column(),
        }
    }
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_downloads_dir() -> String {
    "models/downloads".to_string()
}

fn default_template_path() -> String {
    "templates/02aircraftAgent.json".to_string()
}

fn default_sheet_path() -> String {
    "models/fighters.xlsx".to_string()
}

fn default_name_column() -> String {
    "文本".to_string()
}

fn default_dynamics_column() -> String {
    "基本属性".to_string()
}

fn default_category_column() -> String {
    "类型".to_string()
}

/// Hyper3D Rodin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RodinConfig {
    /// Rodin API key. `None` disables mesh generation.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL; `/rodin`, `/status`, and `/download` are appended.
    #[serde(default = "default_rodin_base_url")]
    pub base_url: String,

    /// User-Agent sent with every Rodin request.
    #[serde(default = "default_rodin_user_agent")]
    pub user_agent: String,

    /// Generation quality tier.
    #[serde(default = "default_tier")]
    pub tier: String,

    /// Mesh topology mode.
    #[serde(default = "default_mesh_mode")]
    pub mesh_mode: String,

    /// Seconds between status polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Status polls before giving up on a job.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for RodinConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_rodin_base_url(),
            user_agent: default_rodin_user_agent(),
            tier: default_tier(),
            mesh_mode: default_mesh_mode(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

fn default_rodin_base_url() -> String {
    "https://api.hyper3d.com/api/v2".to_string()
}

fn default_rodin_user_agent() -> String {
    "blender-mcp".to_string()
}

fn default_tier() -> String {
    "Sketch".to_string()
}

fn default_mesh_mode() -> String {
    "Raw".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_poll_attempts() -> u32 {
    120
}

/// Image search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSearchConfig {
    /// HTML search endpoint; the search phrase is sent as `q`.
    #[serde(default = "default_search_url")]
    pub base_url: String,

    /// Browser User-Agent presented to the search site.
    #[serde(default = "default_browser_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ImageSearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            user_agent: default_browser_user_agent(),
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

fn default_search_url() -> String {
    "https://duckduckgo.com/html/".to_string()
}

fn default_browser_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_search_timeout_secs() -> u64 {
    10
}

/// Outbound network configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// HTTP(S) proxy for image search and Rodin traffic, e.g. `http://127.0.0.1:7897`.
    #[serde(default)]
    pub proxy: Option<String>,
}

/// Simulation platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// REST API base URL; endpoint paths such as `/getAllAgent` are appended.
    #[serde(default = "default_sim_base_url")]
    pub base_url: String,

    /// Value of the `X-UserId` header when a call does not override it.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Admin token sent as `Authorization: admin-Token=<token>`.
    #[serde(default)]
    pub api_token: String,

    /// Root directory for downloaded record data.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Page size used when a listing fetches every page.
    #[serde(default = "default_page_batch_size")]
    pub page_batch_size: u32,

    /// Optional per-request timeout in seconds. `None` keeps the transport default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_url: default_sim_base_url(),
            user_id: default_user_id(),
            api_token: String::new(),
            data_dir: default_data_dir(),
            page_batch_size: default_page_batch_size(),
            request_timeout_secs: None,
        }
    }
}

fn default_sim_base_url() -> String {
    "http://localhost:7980/api/v1/lavic-core".to_string()
}

fn default_user_id() -> String {
    "1".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_page_batch_size() -> u32 {
    50
}

/// Maps a spreadsheet display name to a canonical key and image search phrase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Text in the spreadsheet's display-name column.
    pub display_name: String,

    /// Filesystem-safe package key, e.g. `F-22_Raptor`.
    pub key: String,

    /// Phrase used for image search and as the generation prompt stem.
    pub search_term: String,
}

impl CatalogEntry {
    fn new(display_name: &str, key: &str, search_term: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            key: key.to_string(),
            search_term: search_term.to_string(),
        }
    }
}

fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(
            "F-22猛禽战斗机",
            "F-22_Raptor",
            "F-22 Raptor fighter jet 3d studio render white background",
        ),
        CatalogEntry::new(
            "F-35闪电II战斗机",
            "F-35_Lightning_II",
            "F-35 Lightning II fighter jet 3d studio render white background",
        ),
        CatalogEntry::new(
            "Su-57威罪战斗机",
            "Su-57_Felon",
            "Su-57 Felon fighter jet 3d studio render white background",
        ),
        CatalogEntry::new(
            "J-20威龙战斗机",
            "J-20_Mighty_Dragon",
            "Chengdu J-20 Mighty Dragon fighter jet 3d studio render white background",
        ),
    ]
}
