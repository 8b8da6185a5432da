pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::source::{OPENFLIGHTS_AIRPORTS_URL, OPENFLIGHTS_ROUTES_URL};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::UnmatchedPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_OUTPUT_FILE: &str = "routes_with_distances.csv";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "flight-routes-etl")]
#[command(about = "Join OpenFlights routes to airports and compute great-circle distances")]
pub struct CliConfig {
    #[arg(long, default_value = OPENFLIGHTS_AIRPORTS_URL)]
    pub airports_url: String,

    #[arg(long, default_value = OPENFLIGHTS_ROUTES_URL)]
    pub routes_url: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// What to do with routes whose airport code is not in the airport table
    #[arg(long, value_enum, default_value_t = UnmatchedPolicy::Drop)]
    pub unmatched: UnmatchedPolicy,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn airports_url(&self) -> &str {
        &self.airports_url
    }

    fn routes_url(&self) -> &str {
        &self.routes_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn unmatched_policy(&self) -> UnmatchedPolicy {
        self.unmatched
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("airports_url", &self.airports_url)?;
        validation::validate_url("routes_url", &self.routes_url)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_extension("output_file", &self.output_file, &["csv"])?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 3600)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["flight-routes-etl"]);
        assert_eq!(config.airports_url, OPENFLIGHTS_AIRPORTS_URL);
        assert_eq!(config.routes_url, OPENFLIGHTS_ROUTES_URL);
        assert_eq!(config.output_file(), DEFAULT_OUTPUT_FILE);
        assert_eq!(config.unmatched_policy(), UnmatchedPolicy::Drop);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = CliConfig::parse_from([
            "flight-routes-etl",
            "--unmatched",
            "keep",
            "--timeout-seconds",
            "30",
            "--output-path",
            "/tmp/out",
        ]);
        assert_eq!(config.unmatched, UnmatchedPolicy::Keep);
        assert_eq!(config.request_timeout_seconds(), Some(30));
        assert_eq!(config.output_path(), "/tmp/out");
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        let mut config = CliConfig::parse_from(["flight-routes-etl"]);
        config.output_file = "routes.json".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["flight-routes-etl"]);
        config.timeout_seconds = Some(0);
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["flight-routes-etl"]);
        config.routes_url = "file:///routes.dat".to_string();
        assert!(config.validate().is_err());
    }
}
