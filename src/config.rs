use std::collections::HashSet;
use std::env;
use std::str::FromStr;

use anyhow::{Context, anyhow};

use crate::payroll::batch::{ConstraintPolicy, EngineSettings};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_process_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Payroll engine
    pub home_citizenship: String,
    pub trip_based_jobs: HashSet<String>,
    pub constraint_policy: ConstraintPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,

            rate_process_per_min: parsed_or("RATE_PROCESS_PER_MIN", 30)?,
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            home_citizenship: env::var("PAYROLL_HOME_CITIZENSHIP")
                .unwrap_or_else(|_| "Malaysian".to_string()),
            trip_based_jobs: job_list(
                &env::var("PAYROLL_TRIP_JOBS").unwrap_or_else(|_| "DRIVER".to_string()),
            ),
            constraint_policy: parsed_or("PAYROLL_CONSTRAINT_POLICY", ConstraintPolicy::default())?,
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            home_citizenship: self.home_citizenship.clone(),
            trip_based_jobs: self.trip_based_jobs.clone(),
            constraint_policy: self.constraint_policy,
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key} {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

/// Comma-separated job codes, upper-cased. Blank entries are ignored.
fn job_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|job| job.trim().to_uppercase())
        .filter(|job| !job.is_empty())
        .collect()
}
