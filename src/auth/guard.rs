// src/auth/guard.rs
use crate::auth::token::tokens_match;
use crate::errors::ServerError;
use astra::Request;

pub const HOOK_TOKEN_HEADER: &str = "X-Relay-Token";
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";
pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";

/// Store-facing hook routes. Open when no token is configured.
pub fn require_hook_token(req: &Request, expected: Option<&str>) -> Result<(), ServerError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match header_value(req, HOOK_TOKEN_HEADER) {
        Some(presented) if tokens_match(presented, expected) => Ok(()),
        _ => Err(ServerError::Unauthorized("missing or invalid relay token".into())),
    }
}

/// Settings routes accept the admin token as a header or a cookie.
pub fn require_admin(req: &Request, expected: Option<&str>) -> Result<(), ServerError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let presented = header_value(req, ADMIN_TOKEN_HEADER)
        .map(str::to_string)
        .or_else(|| cookie_value(req, ADMIN_TOKEN_COOKIE));

    match presented {
        Some(p) if tokens_match(&p, expected) => Ok(()),
        _ => Err(ServerError::Unauthorized("admin token required".into())),
    }
}

fn header_value<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

pub fn cookie_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}
