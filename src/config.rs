//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "multi-timer")]
#[command(about = "Run several pausable countdown timers from a menu")]
#[command(version)]
pub struct Config {
    /// How often timer labels are refreshed, in seconds
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh: u64,

    /// Default answer offered by the custom timer prompt, in minutes
    #[arg(long, default_value = "5")]
    pub custom_default: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Period of the label refresh tick
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["multi-timer"]).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.custom_default, "5");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from(["multi-timer", "-v", "--refresh", "5", "--custom-default", "25"]).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.custom_default, "25");
        assert_eq!(config.log_level(), "debug");
        assert!(Config::try_parse_from(["multi-timer", "--refresh", "0"]).is_err());
    }
}
