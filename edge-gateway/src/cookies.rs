use common_session::BridgeSignal;

use crate::config::GatewayConfig;

/// Set-Cookie line for a pending bridge signal. `None` for an absent
/// signal, which has no cookie form.
pub fn bridge_cookie(config: &GatewayConfig, signal: &BridgeSignal) -> Option<String> {
    let value = signal.cookie_value()?;
    Some(format!(
        "{}={}; Path=/; Max-Age={}; SameSite={}{}",
        config.bridge_cookie_name,
        value,
        config.bridge_ttl_seconds,
        config.cookie_same_site.as_str(),
        secure_suffix(config),
    ))
}

pub fn clear_bridge_cookie(config: &GatewayConfig) -> String {
    clearing_cookie(config, &config.bridge_cookie_name)
}

pub fn clear_token_cookie(config: &GatewayConfig) -> String {
    clearing_cookie(config, &config.token_cookie_name)
}

fn clearing_cookie(config: &GatewayConfig, name: &str) -> String {
    format!(
        "{}=; Path=/; Max-Age=0; SameSite={}{}",
        name,
        config.cookie_same_site.as_str(),
        secure_suffix(config),
    )
}

fn secure_suffix(config: &GatewayConfig) -> &'static str {
    if config.cookie_secure {
        "; Secure"
    } else {
        ""
    }
}
