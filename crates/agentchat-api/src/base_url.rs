//! Backend base-URL resolution.

/// Fallback backend address when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Resolve the backend base URL.
///
/// Precedence: explicit override, then a non-loopback origin hint (the
/// address the client itself was served from, when embedded), then the
/// fixed default. A loopback origin means the client is running against
/// a local dev setup where the backend sits on its own port, so it falls
/// through to the default.
pub fn resolve_base_url(explicit: Option<&str>, origin: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.trim_end_matches('/').to_string();
    }

    if let Some(origin) = origin {
        if !is_loopback_origin(origin) {
            return origin.trim_end_matches('/').to_string();
        }
    }

    DEFAULT_API_URL.to_string()
}

fn is_loopback_origin(origin: &str) -> bool {
    let host = origin
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    // Bracketed IPv6 hosts keep their colons, e.g. "[::1]:3000"; split on
    // ':' only for the other forms.
    let host = match host.strip_prefix('[') {
        Some(rest) => rest.split(']').next().unwrap_or(rest),
        None => host.split(['/', ':']).next().unwrap_or(host),
    };
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "")
}
