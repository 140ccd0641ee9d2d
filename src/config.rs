//! Runtime configuration shared by the dashboard and the generator.
//!
//! Loaded from `$DHT_DASH_CONFIG`, else `config/dashboard.toml`, else the
//! built-in defaults. A file that exists but does not parse or validate is an
//! error rather than a silent fallback.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::{chart::Metric, db::Setpoint};

pub const CONFIG_ENV: &str = "DHT_DASH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default = "default_panels")]
    pub panels: Vec<PanelConfig>,
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Seeded into the store at dashboard startup if no setpoint exists yet.
    #[serde(default)]
    pub setpoint: Option<SetpointSeed>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("dht11.sqlite3"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Dashboard log file; the generator always logs to stderr.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("logs").join("dashboard.log"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub settings_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("data").join("dashboard.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PanelConfig {
    pub id: String,
    pub title: String,
    pub window_size: usize,
    pub refresh_ms: u64,
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,
}

impl PanelConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}

fn default_metrics() -> Vec<Metric> {
    vec![Metric::Temperature, Metric::Humidity]
}

fn default_panels() -> Vec<PanelConfig> {
    vec![
        PanelConfig {
            id: "live".to_string(),
            title: "Live readings".to_string(),
            window_size: 10,
            refresh_ms: 1000,
            metrics: default_metrics(),
        },
        PanelConfig {
            id: "compact".to_string(),
            title: "Compact view".to_string(),
            window_size: 5,
            refresh_ms: 2000,
            metrics: default_metrics(),
        },
    ]
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    pub period_ms: u64,
    pub temperature: ValueRange,
    pub humidity: ValueRange,
}

impl GeneratorConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            temperature: ValueRange {
                min: 24.0,
                max: 28.0,
            },
            humidity: ValueRange {
                min: 40.0,
                max: 60.0,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SetpointSeed {
    pub temperature: f64,
    pub humidity: f64,
}

impl SetpointSeed {
    pub fn to_setpoint(self) -> Setpoint {
        Setpoint::new(self.temperature, self.humidity)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            dashboard: DashboardConfig::default(),
            panels: default_panels(),
            generator: GeneratorConfig::default(),
            setpoint: None,
        }
    }
}

/// Where the active configuration came from, for the startup log line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::File(path) => write!(f, "{}", path.display()),
            ConfigOrigin::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| anyhow!("failed to parse config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default() -> Result<(Self, ConfigOrigin)> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        if path.exists() {
            let config = Self::load(&path)?;
            return Ok((config, ConfigOrigin::File(path)));
        }

        Ok((Self::default(), ConfigOrigin::Defaults))
    }

    pub fn validate(&self) -> Result<()> {
        if self.panels.is_empty() {
            bail!("at least one [[panels]] entry is required");
        }

        let mut seen = HashSet::new();
        for panel in &self.panels {
            if panel.id.trim().is_empty() {
                bail!("panel id must not be empty");
            }
            if !seen.insert(panel.id.as_str()) {
                bail!("duplicate panel id '{}'", panel.id);
            }
            if panel.refresh_ms == 0 {
                bail!("panel '{}': refresh_ms must be greater than zero", panel.id);
            }
            if panel.metrics.is_empty() || panel.metrics.len() > 2 {
                bail!("panel '{}': metrics must list one or two series", panel.id);
            }
        }

        if self.generator.period_ms == 0 {
            bail!("generator period_ms must be greater than zero");
        }
        validate_range("generator temperature", &self.generator.temperature)?;
        validate_range("generator humidity", &self.generator.humidity)?;

        if let Some(seed) = &self.setpoint {
            if !seed.temperature.is_finite() || !seed.humidity.is_finite() {
                bail!("setpoint seed values must be finite numbers");
            }
        }

        Ok(())
    }
}

fn validate_range(name: &str, range: &ValueRange) -> Result<()> {
    if !range.min.is_finite() || !range.max.is_finite() {
        bail!("{name} range must be finite");
    }
    if range.min > range.max {
        bail!("{name} range min ({}) exceeds max ({})", range.min, range.max);
    }
    Ok(())
}
