//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the token ledger.
//!
//! # Metrics
//!
//! - `token_transfers_total{kind}` - Successful transfers by buy/sell/transfer
//! - `token_taxed_transfers_total{kind}` - Transfers that withheld tax
//! - `token_rejected_operations_total{error}` - Failed operations by error kind
//! - `token_admin_operations_total{operation}` - Successful owner-only calls
//! - `token_events_total` - Events appended to the log

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
///
/// Each collector owns a private registry, so several ledgers can live in
/// one process without name clashes.
#[derive(Clone)]
pub struct Metrics {
    /// Successful transfers by kind
    pub transfers_total: IntCounterVec,

    /// Taxed transfers by kind
    pub taxed_transfers_total: IntCounterVec,

    /// Rejected operations by error kind
    pub rejected_total: IntCounterVec,

    /// Admin operations by name
    pub admin_operations_total: IntCounterVec,

    /// Events appended
    pub events_total: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("events_total", &self.events_total.get())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_total = IntCounterVec::new(
            Opts::new("token_transfers_total", "Successful transfers by kind"),
            &["kind"],
        )?;
        registry.register(Box::new(transfers_total.clone()))?;

        let taxed_transfers_total = IntCounterVec::new(
            Opts::new("token_taxed_transfers_total", "Transfers that withheld tax"),
            &["kind"],
        )?;
        registry.register(Box::new(taxed_transfers_total.clone()))?;

        let rejected_total = IntCounterVec::new(
            Opts::new("token_rejected_operations_total", "Failed operations by error kind"),
            &["error"],
        )?;
        registry.register(Box::new(rejected_total.clone()))?;

        let admin_operations_total = IntCounterVec::new(
            Opts::new("token_admin_operations_total", "Successful owner-only calls"),
            &["operation"],
        )?;
        registry.register(Box::new(admin_operations_total.clone()))?;

        let events_total = IntCounter::new("token_events_total", "Events appended to the log")?;
        registry.register(Box::new(events_total.clone()))?;

        Ok(Self {
            transfers_total,
            taxed_transfers_total,
            rejected_total,
            admin_operations_total,
            events_total,
            registry,
        })
    }

    /// Record a completed transfer
    pub fn record_transfer(&self, kind: &str, taxed: bool) {
        self.transfers_total.with_label_values(&[kind]).inc();
        if taxed {
            self.taxed_transfers_total.with_label_values(&[kind]).inc();
        }
    }

    /// Record a failed operation
    pub fn record_rejection(&self, error: &str) {
        self.rejected_total.with_label_values(&[error]).inc();
    }

    /// Record an owner-only call
    pub fn record_admin(&self, operation: &str) {
        self.admin_operations_total.with_label_values(&[operation]).inc();
    }

    /// Record appended events
    pub fn record_events(&self, count: usize) {
        self.events_total.inc_by(count as u64);
    }

    /// Render in the Prometheus text exposition format
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.events_total.get(), 0);

        // Independent registries
        let other = Metrics::new().unwrap();
        other.record_events(3);
        assert_eq!(metrics.events_total.get(), 0);
    }

    #[test]
    fn test_record_transfer() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transfer("sell", true);
        metrics.record_transfer("sell", false);

        assert_eq!(metrics.transfers_total.with_label_values(&["sell"]).get(), 2);
        assert_eq!(metrics.taxed_transfers_total.with_label_values(&["sell"]).get(), 1);
    }

    #[test]
    fn test_record_rejection_and_admin() {
        let metrics = Metrics::new().unwrap();
        metrics.record_rejection("enforced_pause");
        metrics.record_admin("pause");

        assert_eq!(metrics.rejected_total.with_label_values(&["enforced_pause"]).get(), 1);
        assert_eq!(metrics.admin_operations_total.with_label_values(&["pause"]).get(), 1);
    }

    #[test]
    fn test_render() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transfer("buy", true);
        let text = metrics.render().unwrap();
        assert!(text.contains("token_transfers_total"));
    }
}
