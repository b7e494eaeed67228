use clap::Parser;
use std::path::PathBuf;

use ogpscan_core::config::{DEFAULT_EXPORT_DIR, DEFAULT_REGISTRY_URL};

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "ogpscan")]
#[command(
    author,
    version,
    about = "Inventories a department's datasets from an open-data registry into CSV tables"
)]
#[command(after_help = "Examples:
  ogpscan                                # interactive department prompt
  ogpscan \"Health Canada\"                # scan a preset department
  ogpscan hc-sc --output ./inventories   # free-text owner_org works too
  ogpscan --list-departments             # show the configured presets

The department presets live in ~/.config/ogpscan/departments.toml; a
template is created on first run.")]
pub struct Config {
    /// Department to scan: a preset title from departments.toml or a
    /// free-text organization name used verbatim as the owner_org filter
    #[arg(value_name = "DEPARTMENT")]
    pub department: Option<String>,

    /// Directory the inventory CSV files are written to
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_EXPORT_DIR)]
    pub output: PathBuf,

    /// Base URL of the CKAN registry to scan
    #[arg(long, env = "OGPSCAN_REGISTRY_URL", value_name = "URL",
          default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    /// Treat an organization with zero matching datasets as an error
    /// instead of exporting empty tables
    #[arg(long)]
    pub fail_on_empty_org: bool,

    /// List the configured department presets and exit
    #[arg(long)]
    pub list_departments: bool,

    /// Custom path to the departments.toml preset file
    #[arg(long, value_name = "PATH")]
    pub departments_config: Option<PathBuf>,
}
