// SPDX-License-Identifier: GPL-3.0-only
use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use url::Url;

/// Maximum accepted length for listing asset URLs
const MAX_URL_LENGTH: usize = 2048;

/// Validate an icon or APK URL supplied through the publish form.
///
/// Listing assets end up fetched by every store client, so only plain
/// http/https URLs with a public host are accepted: no exotic schemes, no
/// loopback, no private or link-local address ranges.
pub fn validate_asset_url(raw: &str) -> Result<()> {
    if raw.len() > MAX_URL_LENGTH {
        anyhow::bail!("URL exceeds maximum length of {} characters", MAX_URL_LENGTH);
    }

    let url = Url::parse(raw).context("Invalid URL format")?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!(
            "Invalid URL scheme: {} (only http and https are allowed)",
            url.scheme()
        );
    }

    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("URL must have a host"))?;

    if host.eq_ignore_ascii_case("localhost") {
        anyhow::bail!("URL host must be publicly reachable");
    }

    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        if !is_public_ip(&ip) {
            anyhow::bail!("URL host must be publicly reachable");
        }
    }

    Ok(())
}

fn is_public_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_ipv4(v4),
        IpAddr::V6(v6) => is_public_ipv6(v6),
    }
}

fn is_public_ipv4(ip: &Ipv4Addr) -> bool {
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast())
}

fn is_public_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return false;
    }

    let segments = ip.segments();

    // Unique local fc00::/7 and link-local fe80::/10
    if (segments[0] & 0xfe00) == 0xfc00 || (segments[0] & 0xffc0) == 0xfe80 {
        return false;
    }

    // IPv4-mapped addresses inherit the IPv4 verdict
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_ipv4(&v4);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_public_http_and_https() {
        assert!(validate_asset_url("https://cdn.example.com/icon.png").is_ok());
        assert!(validate_asset_url("http://cdn.example.com/app.apk").is_ok());
        assert!(validate_asset_url("http://8.8.8.8/icon.png").is_ok());
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(validate_asset_url("ftp://example.com/app.apk").is_err());
        assert!(validate_asset_url("file:///etc/passwd").is_err());
        assert!(validate_asset_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_rejects_loopback_and_localhost() {
        assert!(validate_asset_url("http://localhost/icon.png").is_err());
        assert!(validate_asset_url("http://127.0.0.1/icon.png").is_err());
        assert!(validate_asset_url("http://[::1]/icon.png").is_err());
    }

    #[test]
    fn test_rejects_private_ranges() {
        assert!(validate_asset_url("http://10.0.0.1/icon.png").is_err());
        assert!(validate_asset_url("http://172.16.0.1/icon.png").is_err());
        assert!(validate_asset_url("http://192.168.1.1/icon.png").is_err());
        assert!(validate_asset_url("http://169.254.0.1/icon.png").is_err());
        assert!(validate_asset_url("http://[fe80::1]/icon.png").is_err());
        assert!(validate_asset_url("http://[fc00::1]/icon.png").is_err());
        assert!(validate_asset_url("http://[::ffff:192.168.1.1]/icon.png").is_err());
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(validate_asset_url("").is_err());
        assert!(validate_asset_url("not-a-url").is_err());
    }

    #[test]
    fn test_rejects_oversized_url() {
        let long = format!("https://cdn.example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(validate_asset_url(&long).is_err());
    }
}
