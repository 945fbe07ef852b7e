use anyhow::{anyhow, Context, Result};
use std::env;

use common_session::DEFAULT_BRIDGE_TTL_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSameSite {
    Lax,
    Strict,
    None,
}

impl CookieSameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieSameSite::Lax => "Lax",
            CookieSameSite::Strict => "Strict",
            CookieSameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub token_cookie_name: String,
    pub bridge_cookie_name: String,
    pub bridge_ttl_seconds: i64,
    pub login_path: String,
    pub not_found_path: String,
    pub cookie_secure: bool,
    pub cookie_same_site: CookieSameSite,
}

pub fn load_gateway_config() -> Result<GatewayConfig> {
    let token_cookie_name =
        env::var("GATEWAY_TOKEN_COOKIE").unwrap_or_else(|_| "jwt".to_string());
    let bridge_cookie_name =
        env::var("GATEWAY_BRIDGE_COOKIE").unwrap_or_else(|_| "storeCtx".to_string());

    let bridge_ttl_seconds = env::var("GATEWAY_BRIDGE_TTL_SECONDS")
        .ok()
        .map(|value| value.trim().parse::<i64>())
        .transpose()
        .context("Failed to parse GATEWAY_BRIDGE_TTL_SECONDS")?
        .unwrap_or(DEFAULT_BRIDGE_TTL_SECONDS);
    if bridge_ttl_seconds <= 0 {
        return Err(anyhow!(
            "GATEWAY_BRIDGE_TTL_SECONDS must be positive, got {bridge_ttl_seconds}"
        ));
    }

    let login_path =
        env::var("GATEWAY_LOGIN_PATH").unwrap_or_else(|_| "/auth/login".to_string());
    let not_found_path =
        env::var("GATEWAY_NOT_FOUND_PATH").unwrap_or_else(|_| "/not-found".to_string());

    let cookie_secure = bool_from_env("GATEWAY_COOKIE_SECURE").unwrap_or(false);
    let cookie_same_site = env::var("GATEWAY_COOKIE_SAMESITE")
        .ok()
        .map(|value| parse_same_site(&value))
        .transpose()
        .context("Failed to parse GATEWAY_COOKIE_SAMESITE")?
        .unwrap_or(CookieSameSite::Strict);

    Ok(GatewayConfig {
        token_cookie_name,
        bridge_cookie_name,
        bridge_ttl_seconds,
        login_path,
        not_found_path,
        cookie_secure,
        cookie_same_site,
    })
}

fn bool_from_env(key: &str) -> Option<bool> {
    env::var(key).ok().map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn parse_same_site(value: &str) -> Result<CookieSameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(CookieSameSite::Lax),
        "strict" => Ok(CookieSameSite::Strict),
        "none" => Ok(CookieSameSite::None),
        other => Err(anyhow!(
            "Unsupported cookie same-site policy '{other}'. Use Lax, Strict, or None."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_from_env_parses() {
        std::env::set_var("GATEWAY_TEST_BOOL_TRUE", "true");
        std::env::set_var("GATEWAY_TEST_BOOL_ONE", "1");
        std::env::set_var("GATEWAY_TEST_BOOL_FALSE", "no");
        assert_eq!(bool_from_env("GATEWAY_TEST_BOOL_TRUE"), Some(true));
        assert_eq!(bool_from_env("GATEWAY_TEST_BOOL_ONE"), Some(true));
        assert_eq!(bool_from_env("GATEWAY_TEST_BOOL_FALSE"), Some(false));
    }

    #[test]
    fn parse_same_site_accepts_known_policies() {
        assert_eq!(parse_same_site("Lax").unwrap(), CookieSameSite::Lax);
        assert_eq!(parse_same_site(" strict ").unwrap(), CookieSameSite::Strict);
        assert_eq!(parse_same_site("NONE").unwrap(), CookieSameSite::None);
        assert!(parse_same_site("sideways").is_err());
    }
}
