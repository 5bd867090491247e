use std::str::FromStr;

use teloxide::types::UserId;

use crate::error::{Error, Result};

pub const DEFAULT_DATABASE: &str = "autodeletebot";
pub const DEFAULT_MAX_PENDING_DELETIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub database: String,
    /// The only user allowed to run `/stats`.
    pub owner_id: UserId,
    /// `0` disables the limit.
    pub max_pending_deletions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongodb_uri = required(&lookup, "MONGODB_URI")?;
        let database = lookup("MONGODB_DATABASE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let owner_id = UserId(parse("OWNER_ID", &required(&lookup, "OWNER_ID")?)?);
        let max_pending_deletions = match lookup("MAX_PENDING_DELETIONS") {
            Some(raw) => parse("MAX_PENDING_DELETIONS", &raw)?,
            None => DEFAULT_MAX_PENDING_DELETIONS,
        };

        Ok(Self {
            mongodb_uri,
            database,
            owner_id,
            max_pending_deletions,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{key} must be set")))
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} is not a valid number: {raw:?}")))
}
