//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Header carrying an opaque per-device identifier chosen by the client.
///
/// Used to label refresh-token sessions so a user can hold one live
/// token per device.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Maximum accepted device identifier length; longer values are ignored.
const DEVICE_ID_MAX_LENGTH: usize = 128;

/// Extract the optional device identifier from request headers.
///
/// Returns `None` when the header is absent, empty, non-UTF-8, or
/// unreasonably long.
pub fn extract_device_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(DEVICE_ID_HEADER)?.to_str().ok()?.trim();

    if value.is_empty() || value.len() > DEVICE_ID_MAX_LENGTH {
        return None;
    }

    Some(value.to_string())
}

/// Extract client IP address from headers.
///
/// Checks X-Forwarded-For first (reverse proxy setups), then falls back
/// to the direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // X-Forwarded-For: first IP in the list is the originating client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_device_id() {
        let mut headers = HeaderMap::new();
        headers.insert(DEVICE_ID_HEADER, HeaderValue::from_static("pixel-8a"));

        assert_eq!(extract_device_id(&headers), Some("pixel-8a".to_string()));
    }

    #[test]
    fn test_extract_device_id_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_device_id(&headers), None);
    }

    #[test]
    fn test_extract_device_id_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(DEVICE_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(extract_device_id(&headers), None);
    }

    #[test]
    fn test_extract_device_id_too_long() {
        let long = "x".repeat(DEVICE_ID_MAX_LENGTH + 1);
        let mut headers = HeaderMap::new();
        headers.insert(DEVICE_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert_eq!(extract_device_id(&headers), None);
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }
}
