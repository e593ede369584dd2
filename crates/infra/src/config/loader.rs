//! Configuration loader
//!
//! Loads scheduler configuration from environment variables, with a `.env`
//! file honoured when present. Every variable is optional; anything unset
//! keeps its default.
//!
//! ## Environment Variables
//! - `TMINUS_REMOTE_SOLVER_URL`: Remote solver endpoint (unset disables
//!   remote solving)
//! - `TMINUS_REMOTE_SOLVER_TIMEOUT_SECS`: Remote solver call timeout
//! - `TMINUS_MAX_CANDIDATES`: Maximum candidates returned per session
//! - `TMINUS_DEFAULT_HOLD_TIMEOUT_HOURS`: Default hold lifetime

use std::time::Duration;

use tminus_domain::{Result, SchedulerConfig, TminusError};

/// Load configuration, honouring a `.env` file when one exists.
pub fn load() -> Result<SchedulerConfig> {
    // Missing .env files are fine; only load failures of an existing file
    // would surface here, and those still fall back to process env.
    let _ = dotenvy::dotenv();
    let config = load_from_env()?;
    tracing::info!(
        remote_solver = config.remote_solver_url.is_some(),
        max_candidates = config.max_candidates,
        "Configuration loaded from environment"
    );
    Ok(config)
}

/// Load configuration from process environment variables only.
pub fn load_from_env() -> Result<SchedulerConfig> {
    let mut config = SchedulerConfig::default();

    if let Some(url) = optional_var("TMINUS_REMOTE_SOLVER_URL") {
        config.remote_solver_url = Some(url);
    }
    if let Some(secs) = parse_var::<u64>("TMINUS_REMOTE_SOLVER_TIMEOUT_SECS")? {
        config.remote_solver_timeout = Duration::from_secs(secs);
    }
    if let Some(max) = parse_var::<usize>("TMINUS_MAX_CANDIDATES")? {
        if max == 0 {
            return Err(TminusError::Config(
                "TMINUS_MAX_CANDIDATES must be at least 1".to_string(),
            ));
        }
        config.max_candidates = max;
    }
    if let Some(hours) = parse_var::<u64>("TMINUS_DEFAULT_HOLD_TIMEOUT_HOURS")? {
        config.default_hold_timeout = Duration::from_secs(hours * 3600);
    }

    Ok(config)
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|err| TminusError::Config(format!("Invalid {name}: {err}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = SchedulerConfig::default();
        assert!(config.remote_solver_url.is_none());
        assert_eq!(config.max_candidates, 5);
        assert_eq!(config.remote_solver_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_numbers_are_config_errors() {
        let err = "not-a-number"
            .parse::<usize>()
            .map_err(|err| TminusError::Config(format!("Invalid TMINUS_MAX_CANDIDATES: {err}")))
            .unwrap_err();
        assert!(err.to_string().contains("TMINUS_MAX_CANDIDATES"));
    }
}
