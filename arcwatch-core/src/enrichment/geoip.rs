use crate::conf::GeoIpConfig;
use crate::event::GeoLocation;
use ipnet::IpNet;
use maxminddb::PathElement;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Ranges that carry no meaningful geography.
///
/// Documentation ranges (192.0.2.0/24, 198.51.100.0/24, 203.0.113.0/24) are
/// absent: they are routable as far as the lookup is concerned.
static UNROUTABLE_NETS: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        "0.0.0.0/8",
        "10.0.0.0/8",
        "100.64.0.0/10",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "::/128",
        "::1/128",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .filter_map(|cidr| cidr.parse().ok())
    .collect()
});

/// Loopback, private, link-local and unspecified addresses.
///
/// IPv4-mapped IPv6 addresses are judged by their IPv4 form.
pub fn is_unroutable(ip: IpAddr) -> bool {
    let ip = ip.to_canonical();
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        || UNROUTABLE_NETS.iter().any(|net| net.contains(&ip))
}

/// Maps an address to its best available location.
///
/// Implementations must be safe to call concurrently from every ingestion path.
pub trait GeoResolver: Send + Sync {
    /// Raw database lookup. Callers should go through [`GeoResolver::resolve`].
    fn lookup(&self, ip: IpAddr) -> Option<GeoLocation>;

    /// `None` means Unresolvable: the event is dropped.
    ///
    /// Unroutable addresses short-circuit without touching the database.
    fn resolve(&self, ip: IpAddr) -> Option<GeoLocation> {
        let ip = ip.to_canonical();
        if is_unroutable(ip) {
            return None;
        }
        self.lookup(ip)
    }
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("failed to open GeoIP database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: maxminddb::MaxMindDbError,
    },
}

/// Resolver backed by a MaxMind City (or GeoLite2-City) database.
pub struct MaxMindResolver {
    reader: maxminddb::Reader<maxminddb::Mmap>,
}

impl MaxMindResolver {
    pub fn open(path: &Path) -> Result<Self, GeoError> {
        // Safety note on the memory-mapped database...
        // - File is opened read-only
        // - Lifetime is bound to MaxMindResolver
        // - Arcwatch never mutates the mmdb file
        let reader = unsafe { maxminddb::Reader::open_mmap(path) }.map_err(|source| {
            GeoError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(Self { reader })
    }
}

impl GeoResolver for MaxMindResolver {
    fn lookup(&self, ip: IpAddr) -> Option<GeoLocation> {
        let lookup = self.reader.lookup(ip).ok()?;

        let latitude = lookup
            .decode_path::<f64>(&[PathElement::Key("location"), PathElement::Key("latitude")])
            .ok()
            .flatten()?;

        let longitude = lookup
            .decode_path::<f64>(&[PathElement::Key("location"), PathElement::Key("longitude")])
            .ok()
            .flatten()?;

        // Anycast and satellite ranges often only carry the registered country.
        let country_code = lookup
            .decode_path::<String>(&[PathElement::Key("country"), PathElement::Key("iso_code")])
            .ok()
            .flatten()
            .or_else(|| {
                lookup
                    .decode_path::<String>(&[
                        PathElement::Key("registered_country"),
                        PathElement::Key("iso_code"),
                    ])
                    .ok()
                    .flatten()
            })?;

        let city = lookup
            .decode_path::<String>(&[
                PathElement::Key("city"),
                PathElement::Key("names"),
                PathElement::Key("en"),
            ])
            .ok()
            .flatten();

        Some(GeoLocation {
            latitude,
            longitude,
            country_code,
            city,
        })
    }
}

/// Used when no database is configured: every address is Unresolvable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl GeoResolver for NullResolver {
    fn lookup(&self, _ip: IpAddr) -> Option<GeoLocation> {
        None
    }
}

pub fn build_resolver(cfg: &GeoIpConfig) -> Result<Arc<dyn GeoResolver>, GeoError> {
    match &cfg.city_db {
        Some(path) => {
            let resolver = MaxMindResolver::open(path)?;
            info!(db = %path.display(), "GeoIP database loaded");
            Ok(Arc::new(resolver))
        }
        None => {
            warn!("no GeoIP database configured, every event will be dropped as unresolvable");
            Ok(Arc::new(NullResolver))
        }
    }
}
