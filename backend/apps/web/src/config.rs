//! Environment configuration
//!
//! Reads `GatewayConfig` and server settings from the process environment
//! (after `.env` has been loaded).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose;
use gateway::GatewayConfig;

pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub messages_file: Option<String>,
    pub admin: Option<(String, String)>,
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let bind_addr = var("BIND_ADDR")
        .unwrap_or_else(|| "0.0.0.0:9000".to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;

    let admin = match (var("ADMIN_LOGIN"), var("ADMIN_PASSWORD")) {
        (Some(login), Some(password)) => Some((login, password)),
        (None, None) => None,
        _ => bail!("ADMIN_LOGIN and ADMIN_PASSWORD must be set together"),
    };

    Ok(ServerConfig {
        bind_addr,
        database_url: var("DATABASE_URL"),
        messages_file: var("MESSAGES_FILE"),
        admin,
    })
}

pub fn load_gateway_config() -> anyhow::Result<GatewayConfig> {
    // Debug builds get a throwaway secret and insecure cookies
    let mut config = if cfg!(debug_assertions) {
        GatewayConfig::development()
    } else {
        GatewayConfig::default()
    };

    match var("SESSION_SECRET") {
        Some(secret_b64) => config.session_secret = decode_secret(&secret_b64)?,
        None if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
        }
        None => bail!("SESSION_SECRET must be set in production"),
    }

    if let Some(name) = var("SESSION_COOKIE_NAME") {
        config.session_cookie_name = name;
    }
    if let Some(name) = var("REMEMBER_COOKIE_NAME") {
        config.remember_cookie_name = name;
    }
    if let Some(secs) = var("SESSION_TTL_SECS") {
        config.session_ttl = parse_secs("SESSION_TTL_SECS", &secs)?;
    }
    if let Some(secs) = var("REMEMBER_TTL_SECS") {
        config.remember_ttl = parse_secs("REMEMBER_TTL_SECS", &secs)?;
    }
    if let Some(flag) = var("COOKIE_SECURE") {
        config.cookie_secure = parse_flag("COOKIE_SECURE", &flag)?;
    }
    if let Some(pepper) = var("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }
    if let Some(path) = var("HOME_PATH") {
        config.home_path = path;
    }
    if let Some(path) = var("LOGIN_PATH") {
        config.login_path = path;
    }

    Ok(config)
}

/// Set and non-empty
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;

    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", b.len()))
}

fn parse_secs(name: &str, value: &str) -> anyhow::Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{name} must be a number of seconds"))?;
    if secs == 0 {
        bail!("{name} must be positive");
    }
    Ok(Duration::from_secs(secs))
}

fn parse_flag(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name} must be a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret() {
        let encoded = general_purpose::STANDARD.encode([7u8; 32]);
        assert_eq!(decode_secret(&encoded).unwrap(), [7u8; 32]);

        let short = general_purpose::STANDARD.encode([7u8; 16]);
        assert!(decode_secret(&short).is_err());
        assert!(decode_secret("not base64!").is_err());
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("X", "43200").unwrap(), Duration::from_secs(43200));
        assert!(parse_secs("X", "0").is_err());
        assert!(parse_secs("X", "-5").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }
}
