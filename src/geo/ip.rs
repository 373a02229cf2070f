//! Client IP extraction and normalization.
//!
//! The service runs behind a trusted proxy (Railway and friends), so the
//! first entry of X-Forwarded-For is taken at face value, with the socket
//! peer address as the fallback.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Strip the IPv4-mapped IPv6 prefix, if present.
///
/// Proxies commonly hand over `::ffff:203.0.113.9` for IPv4 clients; the
/// stored form should be the bare IPv4 address. Anything else, including
/// malformed input, passes through unchanged.
pub fn normalize(raw: &str) -> String {
    match raw.strip_prefix("::ffff:") {
        Some(mapped) => mapped.to_string(),
        None => raw.to_string(),
    }
}

/// Whether an address is loopback or in a private range, i.e. one that no
/// public geolocation database can say anything about.
///
/// Unparseable input is not considered local.
pub fn is_local(addr: &str) -> bool {
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        Ok(IpAddr::V6(v6)) => {
            v6.is_loopback() || v6.is_unique_local() || v6.is_unicast_link_local()
        }
        Err(_) => false,
    }
}

/// Extract the client address: first X-Forwarded-For entry when present,
/// otherwise the socket peer address.
pub fn client_ip(headers: &HeaderMap, socket_addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| socket_addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn socket(addr: &str) -> SocketAddr {
        format!("{addr}:443").parse().unwrap()
    }

    #[test]
    fn test_normalize_strips_mapped_prefix() {
        assert_eq!(normalize("::ffff:203.0.113.9"), "203.0.113.9");
        assert_eq!(normalize("::ffff:192.168.1.1"), "192.168.1.1");
    }

    #[test]
    fn test_normalize_is_identity_otherwise() {
        assert_eq!(normalize("203.0.113.9"), "203.0.113.9");
        assert_eq!(normalize("2001:db8::1"), "2001:db8::1");
        assert_eq!(normalize("::1"), "::1");
        assert_eq!(normalize("not-an-address"), "not-an-address");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_is_local_loopback_and_private() {
        assert!(is_local("127.0.0.1"));
        assert!(is_local("::1"));
        assert!(is_local("10.0.0.8"));
        assert!(is_local("172.16.4.2"));
        assert!(is_local("192.168.1.50"));
        assert!(is_local("169.254.0.1"));
        assert!(is_local("fc00::1"));
        assert!(is_local("fe80::1"));
    }

    #[test]
    fn test_is_local_public_and_malformed() {
        assert!(!is_local("8.8.8.8"));
        assert!(!is_local("203.0.113.9"));
        assert!(!is_local("2001:4860:4860::8888"));
        assert!(!is_local("garbage"));
        assert!(!is_local(""));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 198.51.100.1"),
        );

        let ip = client_ip(&headers, socket("10.0.0.1"));
        assert_eq!(ip, "203.0.113.9");
    }

    #[test]
    fn test_client_ip_falls_back_to_socket() {
        let headers = HeaderMap::new();
        let ip = client_ip(&headers, socket("198.51.100.7"));
        assert_eq!(ip, "198.51.100.7");
    }

    #[test]
    fn test_client_ip_ignores_empty_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));

        let ip = client_ip(&headers, socket("198.51.100.7"));
        assert_eq!(ip, "198.51.100.7");
    }
}
