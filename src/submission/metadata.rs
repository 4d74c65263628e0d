use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Request facts that travel alongside a submission but are never stored.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub ip: IpAddr,
    pub user_agent: String,
}

pub fn extract(headers: &HeaderMap, peer_addr: IpAddr, trusted_proxies: &[IpNet]) -> RequestMeta {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    RequestMeta {
        ip: client_ip(headers, peer_addr, trusted_proxies),
        user_agent,
    }
}

/// X-Forwarded-For is honoured only when the direct peer is a trusted proxy.
/// Hops are walked right to left; the first one outside the trusted set was
/// appended by our own proxy, everything left of it is client-controlled.
pub fn client_ip(headers: &HeaderMap, peer: IpAddr, trusted_proxies: &[IpNet]) -> IpAddr {
    if !trusted_proxies.iter().any(|net| net.contains(&peer)) {
        return peer;
    }

    let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) else {
        return peer;
    };

    for hop in xff.rsplit(',').map(|s| s.trim()) {
        let Ok(ip) = hop.parse::<IpAddr>() else {
            return peer;
        };
        if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
            return ip;
        }
    }

    peer
}
