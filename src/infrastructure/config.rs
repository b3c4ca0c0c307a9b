use crate::domain::downtime::DowntimeConfig;
use crate::domain::error::ReliabilityError;
use crate::domain::mill::MillInfo;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxConfig {
    pub influx: InfluxSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
    #[serde(default = "default_measurement")]
    pub measurement: String,
    #[serde(default = "default_mill_tag")]
    pub mill_tag: String,
    #[serde(default = "default_field")]
    pub field: String,
}

fn default_measurement() -> String {
    "ore_feed".to_string()
}

fn default_mill_tag() -> String {
    "mill".to_string()
}

fn default_field() -> String {
    "feed_rate".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FleetConfig {
    pub downtime: DowntimeConfig,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub mills: Vec<MillConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MillConfig {
    pub id: String,
    pub display_name: Option<String>,
    pub section: String,
    pub nominal_feed_rate: f64,
}

impl FleetConfig {
    pub fn validate(&self) -> Result<(), ReliabilityError> {
        self.downtime.validate()?;

        if self.mills.is_empty() {
            return Err(ReliabilityError::InvalidConfig(
                "at least one mill must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for mill in &self.mills {
            if !seen.insert(mill.id.as_str()) {
                return Err(ReliabilityError::InvalidConfig(format!(
                    "duplicate mill id {}",
                    mill.id
                )));
            }
            if !mill.nominal_feed_rate.is_finite() || mill.nominal_feed_rate <= 0.0 {
                return Err(ReliabilityError::InvalidConfig(format!(
                    "mill {} has non-positive nominal_feed_rate",
                    mill.id
                )));
            }
        }

        Ok(())
    }

    pub fn mill_infos(&self) -> Vec<MillInfo> {
        self.mills
            .iter()
            .map(|m| {
                MillInfo::new(
                    m.id.clone(),
                    m.display_name.clone(),
                    m.section.clone(),
                    m.nominal_feed_rate,
                )
            })
            .collect()
    }
}

pub fn load_influx_config() -> anyhow::Result<InfluxConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/influx"))
        .add_source(config::Environment::with_prefix("MILLS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_fleet_config() -> anyhow::Result<FleetConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/fleet"))
        .add_source(config::Environment::with_prefix("MILLS").separator("__"))
        .build()?;

    let fleet: FleetConfig = settings.try_deserialize()?;
    fleet.validate()?;
    Ok(fleet)
}

/// Replace template variables in a query string
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = query.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
