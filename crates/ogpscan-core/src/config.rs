//! Configuration types for the scanner.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default registry to scan: Canada's Open Government portal.
pub const DEFAULT_REGISTRY_URL: &str = "https://open.canada.ca/data/en";

/// Default directory for inventory exports.
pub const DEFAULT_EXPORT_DIR: &str = "./inventories";

/// HTTP client configuration for catalogue API calls.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

/// Configuration for one scan, passed explicitly into the pipeline entry
/// point - there is no ambient process-wide state.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Target department/organization name.
    pub department: String,
    /// Directory the CSV inventories are written to.
    pub export_dir: PathBuf,
    /// Whether an organization with zero matches is an input error
    /// (`OrgNotFound`) or a legitimate empty result.
    pub fail_on_empty_org: bool,
}

impl ScanConfig {
    pub fn new(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            fail_on_empty_org: false,
        }
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_fail_on_empty_org(mut self, fail: bool) -> Self {
        self.fail_on_empty_org = fail;
        self
    }
}

// =============================================================================
// Department presets (departments.toml)
// =============================================================================

/// One department preset: display name plus the registry's organization
/// slug used for `owner_org` filter queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentEntry {
    /// Display name, used in the prompt and as the org default fill.
    pub title: String,
    /// Organization machine name on the registry.
    pub owner_org: String,
}

/// Root structure of the departments.toml preset file.
///
/// # Example
///
/// ```toml
/// [[departments]]
/// title = "Health Canada"
/// owner_org = "hc-sc"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentsConfig {
    pub departments: Vec<DepartmentEntry>,
}

impl DepartmentsConfig {
    /// Finds a preset by display title, case-insensitively.
    pub fn find_by_title(&self, title: &str) -> Option<&DepartmentEntry> {
        self.departments
            .iter()
            .find(|d| d.title.eq_ignore_ascii_case(title))
    }
}

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "departments.toml";

/// Returns the default configuration directory path.
///
/// Uses the XDG Base Directory specification: `~/.config/ogpscan/`
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ogpscan"))
}

/// Returns the default configuration file path.
///
/// Path: `~/.config/ogpscan/departments.toml`
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}

/// Default template for a new departments.toml.
///
/// Ships the departments most commonly scanned so users can pick from the
/// prompt without editing anything first.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ogpscan department presets
#
# These appear in the interactive prompt; any free-text department name
# typed at the prompt (or passed as a CLI argument) works too and is used
# verbatim as the owner_org filter.

[[departments]]
title = "Agriculture and Agri-Food Canada"
owner_org = "aafc-aac"

[[departments]]
title = "Environment and Climate Change Canada"
owner_org = "ec"

[[departments]]
title = "Health Canada"
owner_org = "hc-sc"

[[departments]]
title = "Transport Canada"
owner_org = "tc"
"#;

/// Load the department presets from a TOML file.
///
/// # Arguments
/// * `path` - Optional custom path. If `None`, uses the default XDG path.
///
/// # Returns
/// * `Ok(Some(config))` - Presets loaded successfully
/// * `Ok(None)` - No file found and none could be created (not an error)
/// * `Err(e)` - File exists but is invalid
///
/// # Behavior
/// If no file exists at the default path, a template is created so users
/// can immediately pick a department from the prompt.
pub fn load_departments_config(path: Option<PathBuf>) -> Result<Option<DepartmentsConfig>, AppError> {
    let using_default_path = path.is_none();
    let config_path = match path {
        Some(p) => p,
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        if using_default_path {
            match create_default_config(&config_path) {
                Ok(()) => {
                    tracing::info!(
                        "Created department presets at {}",
                        config_path.display()
                    );
                }
                Err(e) => {
                    tracing::warn!("Could not create default departments file: {}", e);
                    return Ok(None);
                }
            }
        } else {
            return Err(AppError::ConfigError(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        AppError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    let config: DepartmentsConfig = toml::from_str(&content).map_err(|e| {
        AppError::ConfigError(format!(
            "Invalid TOML in '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    Ok(Some(config))
}

fn create_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
}
