//! DNS enrichment for check tables.
//!
//! - [`RecordResolver`]: the lookup capability, implemented by
//!   [`HickoryResolver`] for real nameservers
//! - [`DnsEnricher`]: resolves record sets for many keys with bounded
//!   concurrency and per-lookup timeouts
//! - [`join`]: appends the resolved values to a row set as new columns

mod engine;
mod hickory;
mod join;
mod types;

pub use engine::DnsEnricher;
pub use hickory::{parse_nameservers, HickoryResolver, ResolverConfigError};
pub use join::{join, lookup_keys};
pub use types::{Enrichment, KeyRecords, LookupError, RecordResolver};
