//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Validation ===
    /// Largest accepted difference between the over and under lines.
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f64,

    /// Largest accepted historical rate.
    #[serde(default = "default_max_rate")]
    pub max_rate: f64,

    // === Engine ===
    /// Batches with at least this many rows are scored in parallel (0 disables).
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    // === Odds Sheet Sanity Limits ===
    /// Highest believable line on an odds sheet.
    #[serde(default = "default_max_odds_line")]
    pub max_odds_line: f64,

    /// Highest believable decimal price on an odds sheet.
    #[serde(default = "default_max_odds_price")]
    pub max_odds_price: f64,

    // === Output ===
    /// Decimal places for rendered numbers.
    #[serde(default = "default_display_precision")]
    pub display_precision: u32,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_line_tolerance() -> f64 {
    1e-6
}

fn default_max_rate() -> f64 {
    1e6
}

fn default_parallel_threshold() -> usize {
    256
}

fn default_max_odds_line() -> f64 {
    50.0
}

fn default_max_odds_price() -> f64 {
    10.0
}

fn default_display_precision() -> u32 {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_tolerance: default_line_tolerance(),
            max_rate: default_max_rate(),
            parallel_threshold: default_parallel_threshold(),
            max_odds_line: default_max_odds_line(),
            max_odds_price: default_max_odds_price(),
            display_precision: default_display_precision(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.line_tolerance.is_finite() || self.line_tolerance < 0.0 {
            return Err("LINE_TOLERANCE must be a non-negative number".to_string());
        }

        if !self.max_rate.is_finite() || self.max_rate <= 0.0 {
            return Err("MAX_RATE must be a positive number".to_string());
        }

        if self.display_precision > 12 {
            return Err("DISPLAY_PRECISION must be at most 12".to_string());
        }

        if self.max_odds_line <= 0.0 {
            return Err("MAX_ODDS_LINE must be greater than 0".to_string());
        }

        if self.max_odds_price <= 1.0 {
            return Err("MAX_ODDS_PRICE must be greater than 1.0".to_string());
        }

        Ok(())
    }
}
