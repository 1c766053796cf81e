//! [`RecordResolver`] backed by `hickory-resolver`.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use hickory_resolver::config::{
    NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use tracing::debug;

use checksift_rules::schema::EnrichmentSpec;

use super::types::{LookupError, RecordResolver};

const DNS_PORT: u16 = 53;

/// Errors building a resolver from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ResolverConfigError {
    #[error("invalid nameserver address '{0}'")]
    InvalidNameserver(String),

    #[error("no nameservers configured")]
    NoNameservers,
}

/// Async DNS resolver over a fixed set of nameservers.
///
/// Only the configured nameservers are used (no system config, no search
/// domains). Each nameserver is reachable over UDP and TCP, and hickory
/// fails over between them within one query.
pub struct HickoryResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl HickoryResolver {
    /// Build a resolver for `nameservers` (`ip` or `ip:port`) with a
    /// per-query timeout.
    pub fn new(nameservers: &[String], timeout: Duration) -> Result<Self, ResolverConfigError> {
        let addrs = parse_nameservers(nameservers)?;

        let mut group = NameServerConfigGroup::with_capacity(addrs.len() * 2);
        for addr in &addrs {
            group.push(NameServerConfig::new(*addr, Protocol::Udp));
            group.push(NameServerConfig::new(*addr, Protocol::Tcp));
        }
        let config = ResolverConfig::from_parts(None, vec![], group);

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;

        debug!(nameservers = ?addrs, timeout_ms = timeout.as_millis() as u64, "built dns resolver");
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            timeout,
        })
    }

    pub fn from_spec(spec: &EnrichmentSpec) -> Result<Self, ResolverConfigError> {
        Self::new(&spec.nameservers, Duration::from_millis(spec.timeout_ms))
    }

    fn map_error(&self, name: &str, record_type: &str, err: &ResolveError) -> LookupError {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => LookupError::NoRecords {
                name: name.to_string(),
                record_type: record_type.to_string(),
            },
            ResolveErrorKind::Timeout => LookupError::Timeout(self.timeout.as_millis() as u64),
            _ => LookupError::Failed(err.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl RecordResolver for HickoryResolver {
    async fn resolve(&self, name: &str, record_type: &str) -> Result<Vec<String>, LookupError> {
        let rtype = parse_record_type(record_type)?;

        let lookup = self
            .resolver
            .lookup(name, rtype)
            .await
            .map_err(|e| self.map_error(name, record_type, &e))?;

        // Answers for an A/NS query on an alias also carry the CNAME chain.
        Ok(lookup
            .record_iter()
            .filter(|r| r.record_type() == rtype)
            .filter_map(|r| r.data())
            .map(|data| data.to_string())
            .collect())
    }
}

fn parse_record_type(record_type: &str) -> Result<RecordType, LookupError> {
    RecordType::from_str(&record_type.trim().to_ascii_uppercase())
        .map_err(|_| LookupError::Failed(format!("unsupported record type '{record_type}'")))
}

/// Parse `ip` or `ip:port` entries; bare IPs get port 53.
pub fn parse_nameservers(nameservers: &[String]) -> Result<Vec<SocketAddr>, ResolverConfigError> {
    if nameservers.is_empty() {
        return Err(ResolverConfigError::NoNameservers);
    }
    nameservers
        .iter()
        .map(|ns| {
            let ns = ns.trim();
            ns.parse::<SocketAddr>()
                .or_else(|_| ns.parse::<IpAddr>().map(|ip| SocketAddr::new(ip, DNS_PORT)))
                .map_err(|_| ResolverConfigError::InvalidNameserver(ns.to_string()))
        })
        .collect()
}
