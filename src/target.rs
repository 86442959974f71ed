//! Target validation and name resolution.
//!
//! A target is either a dotted-quad literal or a name we can resolve.
//! Literal validation is a shape check only: four groups of one to three
//! digits. Out-of-range octets such as `999.999.999.999` therefore pass
//! validation; each probe against such a target later records an error
//! result, matching the per-connection failure the caller expects.

use std::net::IpAddr;
use std::str::FromStr;

use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};
use log::debug;

use crate::error::ScanError;

/// A validated scan target. Immutable once built.
///
/// `addr` is `None` only for dotted-quad literals that passed the shape
/// check but do not parse as an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    addr: Option<IpAddr>,
}

impl Target {
    /// The host exactly as the caller supplied it.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The resolved address, when one exists.
    #[must_use]
    pub fn addr(&self) -> Option<IpAddr> {
        self.addr
    }
}

/// Validates `input` as a target host.
///
/// Dotted-quad literals are accepted on shape alone, with no lookup.
/// Anything else goes through the system resolver, falling back to a
/// DNS-over-TLS resolver when the system configuration is unusable.
pub async fn resolve(input: &str) -> Result<Target, ScanError> {
    if is_dotted_quad(input) {
        return Ok(Target {
            host: input.to_owned(),
            addr: IpAddr::from_str(input).ok(),
        });
    }

    if let Ok(addr) = IpAddr::from_str(input) {
        return Ok(Target {
            host: input.to_owned(),
            addr: Some(addr),
        });
    }

    match resolve_host(input).await {
        Some(addr) => {
            debug!("resolved {input} to {addr}");
            Ok(Target {
                host: input.to_owned(),
                addr: Some(addr),
            })
        }
        None => Err(ScanError::InvalidTarget(input.to_owned())),
    }
}

/// Four groups of 1-3 digits separated by dots. Shape only, no range check.
fn is_dotted_quad(input: &str) -> bool {
    let groups: Vec<&str> = input.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Resolves a hostname to its first address, OS resolver first.
async fn resolve_host(host: &str) -> Option<IpAddr> {
    if let Ok(mut addrs) = tokio::net::lookup_host((host, 80)).await {
        if let Some(addr) = addrs.next() {
            return Some(addr.ip());
        }
    }

    let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|_| {
        TokioAsyncResolver::tokio(ResolverConfig::cloudflare_tls(), ResolverOpts::default())
    });
    resolver
        .lookup_ip(host)
        .await
        .ok()
        .and_then(|lookup| lookup.iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn dotted_quad_accepted_without_lookup() {
        let target = resolve("127.0.0.1").await.unwrap();
        assert_eq!(target.host(), "127.0.0.1");
        assert_eq!(target.addr(), Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }

    #[tokio::test]
    async fn out_of_range_octets_pass_shape_check() {
        // Shape-only validation keeps the permissive behavior on purpose.
        let target = resolve("999.999.999.999").await.unwrap();
        assert_eq!(target.host(), "999.999.999.999");
        assert_eq!(target.addr(), None);
    }

    #[tokio::test]
    async fn ipv6_literal_accepted() {
        let target = resolve("::1").await.unwrap();
        assert!(target.addr().is_some());
    }

    #[tokio::test]
    async fn garbage_host_rejected() {
        let err = resolve("definitely.not.a.real.host.invalid").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidTarget(_)));
    }

    #[test]
    fn dotted_quad_shape() {
        assert!(is_dotted_quad("1.2.3.4"));
        assert!(is_dotted_quad("192.168.001.1"));
        assert!(is_dotted_quad("999.999.999.999"));
        assert!(!is_dotted_quad("1.2.3"));
        assert!(!is_dotted_quad("1.2.3.4.5"));
        assert!(!is_dotted_quad("1.2.3.abcd"));
        assert!(!is_dotted_quad("1.2.3."));
        assert!(!is_dotted_quad("a.b.c.d"));
    }
}
