use crate::enrichment::{GeoResolver, NullResolver, is_unroutable};
use crate::event::GeoLocation;
use crate::test_support::paris;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Locates everything and counts how often the database was consulted.
#[derive(Default)]
struct CountingResolver {
    lookups: AtomicUsize,
}

impl GeoResolver for CountingResolver {
    fn lookup(&self, _ip: IpAddr) -> Option<GeoLocation> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Some(paris())
    }
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn loopback_and_private_ranges_are_unroutable() {
    for addr in [
        "127.0.0.1",
        "::1",
        "10.1.2.3",
        "172.16.0.1",
        "172.31.255.255",
        "192.168.1.10",
        "100.64.0.1",
        "169.254.10.10",
        "0.0.0.0",
        "::",
        "fd12:3456::1",
        "fe80::1",
        "::ffff:127.0.0.1",
        "::ffff:192.168.0.1",
    ] {
        assert!(is_unroutable(ip(addr)), "{addr} should be unroutable");
    }
}

#[test]
fn public_and_documentation_addresses_are_routable() {
    for addr in [
        "203.0.113.5",
        "8.8.8.8",
        "172.32.0.1",
        "2001:4860:4860::8888",
        "::ffff:8.8.8.8",
    ] {
        assert!(!is_unroutable(ip(addr)), "{addr} should be routable");
    }
}

#[test]
fn resolve_skips_lookup_for_unroutable_addresses() {
    let resolver = CountingResolver::default();

    assert_eq!(resolver.resolve(ip("127.0.0.1")), None);
    assert_eq!(resolver.resolve(ip("::1")), None);
    assert_eq!(resolver.resolve(ip("192.168.0.7")), None);

    assert_eq!(resolver.lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn resolve_consults_lookup_for_public_addresses() {
    let resolver = CountingResolver::default();

    assert_eq!(resolver.resolve(ip("203.0.113.5")), Some(paris()));
    assert_eq!(resolver.lookups.load(Ordering::SeqCst), 1);
}

#[test]
fn null_resolver_resolves_nothing() {
    assert_eq!(NullResolver.resolve(ip("8.8.8.8")), None);
}
