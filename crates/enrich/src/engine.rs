//! Bounded-concurrency DNS enricher.
//!
//! Resolves every requested record type for each unique key. Keys run
//! concurrently under a semaphore; record types within a key run in
//! order. Every lookup is bounded by a timeout and every failure is
//! absorbed into an empty result, so `enrich` always returns a complete map.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use checksift_rules::schema::EnrichmentSpec;

use super::types::{empty_records, Enrichment, KeyRecords, LookupError, RecordResolver};

/// Resolves record sets for many keys against one [`RecordResolver`].
pub struct DnsEnricher {
    resolver: Arc<dyn RecordResolver>,
    record_types: Vec<String>,
    max_concurrency: usize,
    timeout: Duration,
}

impl DnsEnricher {
    pub fn new(
        resolver: Arc<dyn RecordResolver>,
        record_types: Vec<String>,
        max_concurrency: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            record_types,
            // A zero bound would never hand out a permit.
            max_concurrency: max_concurrency.max(1),
            timeout,
        }
    }

    /// Build an enricher from the lookup settings of an `EnrichmentConfig`.
    pub fn from_spec(resolver: Arc<dyn RecordResolver>, spec: &EnrichmentSpec) -> Self {
        Self::new(
            resolver,
            spec.record_types.clone(),
            spec.max_concurrency,
            Duration::from_millis(spec.timeout_ms),
        )
    }

    pub fn record_types(&self) -> &[String] {
        &self.record_types
    }

    /// Resolve every record type for every key.
    ///
    /// Keys are trimmed and deduplicated before lookup; blank keys are
    /// skipped. Every remaining key is present in the result, with an
    /// empty sequence for each record type that failed, timed out or had
    /// no answer.
    pub async fn enrich<I, S>(&self, keys: I) -> Enrichment
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let started = Instant::now();

        let mut seen = HashSet::new();
        let unique: Vec<String> = keys
            .into_iter()
            .filter_map(|k| {
                let k = k.as_ref().trim();
                (!k.is_empty() && seen.insert(k.to_string())).then(|| k.to_string())
            })
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let key_count = unique.len();

        let lookups = unique.into_iter().map(|key| {
            let sem = Arc::clone(&semaphore);
            async move {
                // The semaphore is never closed; treat a closed one as "no answer".
                let Ok(_permit) = sem.acquire().await else {
                    return (key, empty_records(&self.record_types));
                };
                let records = self.lookup_key(&key).await;
                (key, records)
            }
        });

        let enrichment: Enrichment = join_all(lookups).await.into_iter().collect();

        let resolved = enrichment
            .values()
            .filter(|records| records.values().any(|v| !v.is_empty()))
            .count();
        info!(
            keys = key_count,
            resolved,
            unresolved = key_count - resolved,
            max_concurrency = self.max_concurrency,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dns enrichment complete"
        );

        enrichment
    }

    async fn lookup_key(&self, key: &str) -> KeyRecords {
        let mut records = KeyRecords::with_capacity(self.record_types.len());
        for record_type in &self.record_types {
            let values = self.lookup_one(key, record_type).await;
            records.insert(record_type.clone(), values);
        }
        records
    }

    async fn lookup_one(&self, key: &str, record_type: &str) -> Vec<String> {
        let outcome = tokio::time::timeout(self.timeout, self.resolver.resolve(key, record_type))
            .await
            .unwrap_or_else(|_| Err(LookupError::Timeout(self.timeout.as_millis() as u64)));

        match outcome {
            Ok(values) => values,
            Err(e @ LookupError::NoRecords { .. }) => {
                debug!(key, record_type, error = %e, "no answer");
                Vec::new()
            }
            Err(e) => {
                warn!(key, record_type, error = %e, "lookup failed, using empty result");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Canned answers keyed by `(name, record_type)`; anything else is NXDOMAIN.
    #[derive(Default)]
    struct MapResolver {
        answers: HashMap<(String, String), Result<Vec<String>, LookupError>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MapResolver {
        fn answer(mut self, name: &str, record_type: &str, values: &[&str]) -> Self {
            self.answers.insert(
                (name.into(), record_type.into()),
                Ok(values.iter().map(|v| v.to_string()).collect()),
            );
            self
        }

        fn fail(mut self, name: &str, record_type: &str, err: LookupError) -> Self {
            self.answers.insert((name.into(), record_type.into()), Err(err));
            self
        }
    }

    #[async_trait::async_trait]
    impl RecordResolver for MapResolver {
        async fn resolve(&self, name: &str, record_type: &str) -> Result<Vec<String>, LookupError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), record_type.to_string()));
            self.answers
                .get(&(name.to_string(), record_type.to_string()))
                .cloned()
                .unwrap_or_else(|| {
                    Err(LookupError::NoRecords {
                        name: name.to_string(),
                        record_type: record_type.to_string(),
                    })
                })
        }
    }

    /// Sleeps on every lookup and records the peak number in flight.
    struct SlowResolver {
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowResolver {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl RecordResolver for SlowResolver {
        async fn resolve(&self, name: &str, _record_type: &str) -> Result<Vec<String>, LookupError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![format!("{name}.")])
        }
    }

    fn types(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn enricher(resolver: Arc<dyn RecordResolver>, record_types: &[&str]) -> DnsEnricher {
        DnsEnricher::new(resolver, types(record_types), 4, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn nonexistent_name_maps_to_empty() {
        let enricher = enricher(Arc::new(MapResolver::default()), &["A"]);
        let result = enricher.enrich(["nonexistent.example"]).await;

        assert_eq!(result.len(), 1);
        let records = &result["nonexistent.example"];
        assert_eq!(records.len(), 1);
        assert!(records["A"].is_empty());
    }

    #[tokio::test]
    async fn every_key_present_even_on_failure() {
        let resolver = MapResolver::default()
            .answer("k1", "CNAME", &["k1.dxcloud.net."])
            .answer("k1", "A", &["104.1.1.1", "104.1.1.2"])
            .fail("k2", "A", LookupError::Failed("SERVFAIL".into()))
            .fail("k3", "CNAME", LookupError::Timeout(10));
        let enricher = enricher(Arc::new(resolver), &["CNAME", "A"]);

        let result = enricher.enrich(["k1", "k2", "k3"]).await;

        let mut keys: Vec<&str> = result.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);

        assert_eq!(result["k1"]["CNAME"], vec!["k1.dxcloud.net."]);
        assert_eq!(result["k1"]["A"], vec!["104.1.1.1", "104.1.1.2"]);
        for key in ["k2", "k3"] {
            let order: Vec<&str> = result[key].keys().map(|k| k.as_str()).collect();
            assert_eq!(order, vec!["CNAME", "A"]);
            assert!(result[key].values().all(|v| v.is_empty()));
        }
    }

    #[tokio::test]
    async fn keys_are_trimmed_and_resolved_once() {
        let resolver = Arc::new(MapResolver::default().answer("a.com", "A", &["1.2.3.4"]));
        let enricher = enricher(resolver.clone(), &["A", "NS"]);

        let result = enricher.enrich(["a.com", " a.com ", "a.com", "", "   "]).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result["a.com"]["A"], vec!["1.2.3.4"]);
        let calls = resolver.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn slow_lookup_times_out_to_empty() {
        let resolver = Arc::new(SlowResolver::new(Duration::from_secs(30)));
        let enricher = DnsEnricher::new(resolver, types(&["A"]), 2, Duration::from_millis(20));

        let result = enricher.enrich(["slow.example"]).await;
        assert!(result["slow.example"]["A"].is_empty());
    }

    #[tokio::test]
    async fn in_flight_lookups_are_bounded() {
        let resolver = Arc::new(SlowResolver::new(Duration::from_millis(10)));
        let enricher = DnsEnricher::new(resolver.clone(), types(&["A"]), 2, Duration::from_secs(5));

        let keys: Vec<String> = (0..8).map(|i| format!("host{i}.example")).collect();
        let result = enricher.enrich(&keys).await;

        assert_eq!(result.len(), 8);
        assert_eq!(result["host3.example"]["A"], vec!["host3.example."]);
        let peak = resolver.peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak in flight was {peak}");
    }

    #[tokio::test]
    async fn zero_concurrency_still_runs() {
        let resolver = Arc::new(MapResolver::default().answer("a.com", "A", &["1.2.3.4"]));
        let enricher = DnsEnricher::new(resolver, types(&["A"]), 0, Duration::from_secs(1));
        let result = enricher.enrich(["a.com"]).await;
        assert_eq!(result["a.com"]["A"], vec!["1.2.3.4"]);
    }

    #[test]
    fn from_spec_copies_settings() {
        let spec = EnrichmentSpec {
            timeout_ms: 250,
            max_concurrency: 3,
            ..EnrichmentSpec::default()
        };
        let enricher = DnsEnricher::from_spec(Arc::new(MapResolver::default()), &spec);
        assert_eq!(enricher.record_types(), spec.record_types.as_slice());
        assert_eq!(enricher.max_concurrency, 3);
        assert_eq!(enricher.timeout, Duration::from_millis(250));
    }
}
