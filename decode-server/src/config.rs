use anyhow::{Context, Result};
use decode_core::{RewardSettings, ServiceSettings};
use decode_persistence::connection::DEFAULT_DATABASE_URL;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("unknown store backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub key_namespace: String,
    pub scoreboard_tag: String,
    pub rewards: RewardSettings,
    pub submission_lock_seconds: u64,
    pub first_solver_comment_delay_seconds: u64,
    pub content_api_url: Option<String>,
    pub content_api_token: Option<String>,
    pub content_dev_mode: bool,
}

impl Config {
    pub fn new() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", "8080")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            store_backend: parse_var("STORE_BACKEND", "sqlite")?,
            key_namespace: env::var("KEY_NAMESPACE").unwrap_or_else(|_| "pdg".to_string()),
            scoreboard_tag: env::var("SCOREBOARD_TAG").unwrap_or_else(|_| "default".to_string()),
            rewards: RewardSettings {
                guesser_reward_for_solve: parse_var("GUESSER_REWARD_FOR_SOLVE", "1")?,
                guesser_reward_for_first_solve: parse_var("GUESSER_REWARD_FOR_FIRST_SOLVE", "10")?,
                author_reward_for_correct_guess: parse_var("AUTHOR_REWARD_FOR_CORRECT_GUESS", "1")?,
                author_reward_for_submit: parse_var("AUTHOR_REWARD_FOR_SUBMIT", "1")?,
            },
            submission_lock_seconds: parse_var("SUBMISSION_LOCK_SECONDS", "20")?,
            first_solver_comment_delay_seconds: parse_var(
                "FIRST_SOLVER_COMMENT_DELAY_SECONDS",
                "300",
            )?,
            content_api_url: env::var("CONTENT_API_URL").ok(),
            content_api_token: env::var("CONTENT_API_TOKEN").ok(),
            content_dev_mode: env::var("CONTENT_DEV_MODE").unwrap_or_else(|_| "false".to_string())
                == "true",
        })
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            rewards: self.rewards,
            submission_lock: Duration::from_secs(self.submission_lock_seconds),
            first_solver_comment_delay: Duration::from_secs(
                self.first_solver_comment_delay_seconds,
            ),
        }
    }
}

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Invalid {}: '{}'", name, raw))
}
