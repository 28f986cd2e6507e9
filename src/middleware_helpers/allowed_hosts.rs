use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::errors::ServiceError;

/// `Host` values the server answers to.
///
/// Entries are compared case-insensitively without the port. A leading dot
/// (`.example.com`) matches the domain and every subdomain; `*` matches any host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedHosts {
    any: bool,
    patterns: Vec<String>,
}

impl AllowedHosts {
    pub fn any() -> Self {
        Self {
            any: true,
            patterns: Vec::new(),
        }
    }

    /// Parses a comma separated list such as `localhost,127.0.0.1,.corp.example`.
    pub fn parse(raw: &str) -> Self {
        let patterns: Vec<String> = raw
            .split(',')
            .map(|entry| entry.trim().to_ascii_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self {
            any: patterns.iter().any(|p| p == "*"),
            patterns,
        }
    }

    pub fn allows_any(&self) -> bool {
        self.any
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        if self.any {
            return true;
        }
        let host = strip_port(host).trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }
        self.patterns.iter().any(|pattern| match pattern.strip_prefix('.') {
            Some(domain) => host == domain || host.ends_with(pattern.as_str()),
            None => host == *pattern,
        })
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // bracketed IPv6 literal, optionally followed by :port
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Rejects requests whose `Host` is not configured with 400 Bad Request.
pub async fn allowed_hosts_middleware(
    State(allowed): State<Arc<AllowedHosts>>,
    request: Request,
    next: Next,
) -> Response {
    if allowed.allows_any() {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| request.uri().host().map(str::to_owned));

    match host {
        Some(host) if allowed.is_allowed(&host) => next.run(request).await,
        Some(host) => {
            tracing::warn!(host = %host, "rejected request for disallowed host");
            ServiceError::bad_request(format!("invalid Host header '{host}'")).into_response()
        }
        None => ServiceError::bad_request("missing Host header").into_response(),
    }
}
