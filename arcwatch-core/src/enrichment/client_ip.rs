use http::HeaderMap;
use ipnet::IpNet;
use std::net::IpAddr;

const MAX_X_FORWARDED_FOR_LENGTH: usize = 1024;

/// Resolve the originating client IP using X-Forwarded-For and a trusted proxy list.
///
/// Rules:
/// - XFF is only honoured when the direct peer is itself a trusted proxy
/// - Walk XFF from right → left
/// - Stop at the first IP not in trusted_proxies
/// - If no untrusted IP is found, fall back to peer_ip
///
/// IPv4-mapped IPv6 addresses (a dual-stack listener) are unwrapped first, so
/// the result is always canonical.
pub fn resolve_client_ip(headers: &HeaderMap, peer_ip: IpAddr, trusted_proxies: &[IpNet]) -> IpAddr {
    let peer_ip = peer_ip.to_canonical();

    if trusted_proxies.is_empty() || !is_trusted(&peer_ip, trusted_proxies) {
        return peer_ip;
    }

    let Some(xff) = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .filter(|v| v.len() <= MAX_X_FORWARDED_FOR_LENGTH)
    else {
        return peer_ip;
    };

    // left = client, right = closest proxy
    let hops: Vec<IpAddr> = xff
        .split(',')
        .map(str::trim)
        .filter_map(|s| s.parse::<IpAddr>().ok())
        .map(|ip| ip.to_canonical())
        .collect();

    hops.into_iter()
        .rev()
        .find(|ip| !is_trusted(ip, trusted_proxies))
        .unwrap_or(peer_ip)
}

fn is_trusted(ip: &IpAddr, trusted_proxies: &[IpNet]) -> bool {
    trusted_proxies.iter().any(|net| net.contains(ip))
}

/// Parse CIDR strings; a bare address is accepted as a single-host network.
pub fn parse_trusted_proxies<S: AsRef<str>>(raw: &[S]) -> Result<Vec<IpNet>, String> {
    raw.iter()
        .map(|s| {
            let s = s.as_ref().trim();
            s.parse::<IpNet>()
                .ok()
                .or_else(|| {
                    let ip = s.parse::<IpAddr>().ok()?;
                    let host_len = if ip.is_ipv4() { 32 } else { 128 };
                    IpNet::new(ip, host_len).ok()
                })
                .ok_or_else(|| s.to_string())
        })
        .collect()
}
