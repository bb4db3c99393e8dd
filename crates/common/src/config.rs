use std::num::NonZeroU32;
use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::errors::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the SonarQube instance, e.g. `http://sonar63.rd.tut.fi`.
    pub base_url: String,
    #[serde(default = "ServerConfig::default_version_label")]
    pub version_label: String,
}

impl ServerConfig {
    fn default_version_label() -> String {
        "sonar63".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "ExportConfig::default_output_dir")]
    pub output_dir: String,
    /// Lower bound passed as `createdAfter` on every issue query.
    #[serde(default = "ExportConfig::default_created_after")]
    pub created_after: String,
    /// Hard cap the server puts on paged issue retrieval.
    #[serde(default = "ExportConfig::default_max_issues")]
    pub max_issues: u32,
    #[serde(default = "ExportConfig::default_history_page_size")]
    pub history_page_size: NonZeroU32,
    #[serde(default = "ExportConfig::default_project_page_size")]
    pub project_page_size: u32,
    #[serde(default = "ExportConfig::default_metrics_page_size")]
    pub metrics_page_size: u32,
}

impl ExportConfig {
    fn default_output_dir() -> String {
        "sonarqube_projects".to_string()
    }

    fn default_created_after() -> String {
        "1900-01-01T01:01:01+0100".to_string()
    }

    const fn default_max_issues() -> u32 {
        10_000
    }

    fn default_history_page_size() -> NonZeroU32 {
        NonZeroU32::new(1_000).expect("non-zero literal")
    }

    const fn default_project_page_size() -> u32 {
        500
    }

    const fn default_metrics_page_size() -> u32 {
        500
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            created_after: Self::default_created_after(),
            max_issues: Self::default_max_issues(),
            history_page_size: Self::default_history_page_size(),
            project_page_size: Self::default_project_page_size(),
            metrics_page_size: Self::default_metrics_page_size(),
        }
    }
}
