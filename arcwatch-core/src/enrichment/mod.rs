mod client_ip;
mod geoip;

#[cfg(test)]
mod tests;

pub use client_ip::{parse_trusted_proxies, resolve_client_ip};
pub use geoip::{GeoError, GeoResolver, MaxMindResolver, NullResolver, build_resolver, is_unroutable};
