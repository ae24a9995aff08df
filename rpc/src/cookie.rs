//! Voter cookie handling.
//!
//! The voter token travels in a plain cookie. It is an anonymous handle for
//! vote uniqueness only and carries no authority.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::RpcError;

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
}

/// A `Set-Cookie` value scoped to the whole site.
pub fn voter_cookie(name: &str, value: &str, max_age_secs: u64) -> String {
    format!("{name}={value}; Max-Age={max_age_secs}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), RpcError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| RpcError::Internal(format!("bad cookie header: {e}")))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}
