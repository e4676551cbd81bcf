use arcwatch_core::enrichment::GeoResolver;
use arcwatch_core::event::GeoLocation;
use ipnet::IpNet;
use once_cell::sync::Lazy;
use std::net::IpAddr;

static PARIS_NET: Lazy<IpNet> = Lazy::new(|| "203.0.113.0/24".parse().unwrap());
static TOKYO_NET: Lazy<IpNet> = Lazy::new(|| "198.51.100.0/24".parse().unwrap());

/// Deterministic stand-in for a GeoIP database:
/// 203.0.113.0/24 is Paris, 198.51.100.0/24 is Tokyo, everything else is unknown.
#[derive(Debug, Default)]
pub struct FixtureResolver;

impl GeoResolver for FixtureResolver {
    fn lookup(&self, ip: IpAddr) -> Option<GeoLocation> {
        if PARIS_NET.contains(&ip) {
            Some(GeoLocation {
                latitude: 48.85,
                longitude: 2.35,
                country_code: "FR".to_string(),
                city: Some("Paris".to_string()),
            })
        } else if TOKYO_NET.contains(&ip) {
            Some(GeoLocation {
                latitude: 35.68,
                longitude: 139.69,
                country_code: "JP".to_string(),
                city: None,
            })
        } else {
            None
        }
    }
}
