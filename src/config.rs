use std::env;
use std::time::Duration;

use crate::engine::{RestPolicy, SessionConfig};
use crate::models::WeightUnit;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub rest_policy: RestPolicy,
    pub weight_unit: WeightUnit,
    pub tick_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:liftflow.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            rest_policy: RestPolicy::parse(
                &env::var("REST_BETWEEN_EXERCISES").unwrap_or_else(|_| "finishing".to_string()),
            ),
            weight_unit: WeightUnit::parse(
                &env::var("WEIGHT_UNIT").unwrap_or_else(|_| "lbs".to_string()),
            ),
            tick_interval_ms: env::var("TICK_INTERVAL_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            rest_policy: self.rest_policy,
            weight_unit: self.weight_unit,
            ..SessionConfig::default()
        }
    }
}
