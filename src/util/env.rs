use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

static LOAD_ENV: OnceLock<()> = OnceLock::new();

/// Loads `.env`, then `.env.dev` (debug builds) or `.env.prod` (release builds),
/// then `.env.local`. Runs at most once per process; variables already present in the
/// environment win over file values.
pub fn load_dotenv() {
    LOAD_ENV.get_or_init(|| {
        dotenv().ok();

        let env_file = if cfg!(debug_assertions) { ".env.dev" } else { ".env.prod" };

        for file in [env_file, ".env.local"] {
            if Path::new(file).exists() {
                dotenvy::from_filename(file).ok();
            }
        }
    });
}

/// Reads `key` and parses it into `T`, or returns `default` when unset.
pub fn get_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|err| anyhow!("Failed to parse {} env var: {:?}", key, err)),
        Err(_) => Ok(default),
    }
}

/// Like [`get_env_or`] for byte sizes, accepting K, M and G suffixes.
pub fn get_size_from_env_or(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(val) => parse_size(&val).ok_or_else(|| anyhow!("Failed to parse {} env var", key)),
        Err(_) => Ok(default),
    }
}

/// Accepts `true/1/yes/on` and `false/0/no/off`, case-insensitive.
pub fn get_bool_from_env_or(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(value) => parse_bool(&value)
            .ok_or_else(|| anyhow!("Failed to parse {} env var as `bool`", key)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_size(size_str: &str) -> Option<u64> {
    let size_str = size_str.to_lowercase();

    let (num_part, multiplier) = match size_str.chars().last()? {
        'k' => (&size_str[..size_str.len() - 1], 1024u64),
        'm' => (&size_str[..size_str.len() - 1], 1024u64 * 1024),
        'g' => (&size_str[..size_str.len() - 1], 1024u64 * 1024 * 1024),
        _ => (size_str.as_str(), 1),
    };

    num_part.parse::<u64>().ok()?.checked_mul(multiplier)
}
