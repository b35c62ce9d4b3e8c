//! Gantry usage statistics — periodic, privacy-gated usage reporting.
//!
//! Assembles a snapshot of the host's operational state (installation
//! identity, version, node and executor inventory, active extensions,
//! per-kind job counts), compresses and encrypts it so only the stats
//! service can read it, and encodes the result for embedding in a rendered
//! page. Reporting is throttled to once per day and disabled entirely when
//! the operator opts out. No bytes are sent from here; the host's rendering
//! layer transmits the encoded string.

pub mod encode;
pub mod error;
pub mod gate;
pub mod keys;
pub mod snapshot;

pub use encode::{decode_snapshot, encode_snapshot};
pub use error::{Result, TelemetryError};
pub use gate::{Clock, ReportingGate, SystemClock};
pub use keys::{ReportCipher, ReportKey, DEFAULT_KEY_IMAGE};
pub use snapshot::{build_snapshot, NodeReport, PluginReport, UsageSnapshot};

use gantry_core::models::host::HostState;

/// Usage-statistics reporter: the reporting gate, key material, snapshot
/// builder, and encode pipeline composed behind one handle.
///
/// The host's page-rendering layer owns one of these and embeds whatever
/// [`UsageReporter::report_if_due`] returns.
pub struct UsageReporter {
    key: ReportKey,
    gate: ReportingGate,
}

impl UsageReporter {
    /// Create a reporter encrypting to the default stats-service key.
    pub fn new() -> Self {
        Self::with_parts(ReportKey::new(), ReportingGate::new())
    }

    /// Create a reporter with a specific key image (used by tests).
    pub fn with_key_image(key_image: impl Into<String>) -> Self {
        Self::with_parts(ReportKey::with_key_image(key_image), ReportingGate::new())
    }

    /// Create a reporter from explicit parts, e.g. a gate on a test clock.
    pub fn with_parts(key: ReportKey, gate: ReportingGate) -> Self {
        Self { key, gate }
    }

    /// Returns true if a report should be produced now.
    ///
    /// Consumes the current reporting window when it returns true; see
    /// [`ReportingGate::is_due`].
    pub fn is_due(&self, host: &HostState) -> bool {
        self.gate.is_due(host.usage_stats_enabled)
    }

    /// Build and encode a report from the host's current state, regardless
    /// of the gate.
    pub fn encoded_report(&self, host: &HostState) -> Result<String> {
        let snapshot = build_snapshot(host);
        encode_snapshot(&snapshot, &self.key.cipher()?)
    }

    /// Produce a report if one is due.
    ///
    /// The window's attempt is consumed even if encoding then fails; the
    /// next opportunity is the following interval.
    pub fn report_if_due(&self, host: &HostState) -> Result<Option<String>> {
        if !self.is_due(host) {
            return Ok(None);
        }
        tracing::debug!("usage report due, assembling snapshot");
        let encoded = self.encoded_report(host)?;
        tracing::debug!(payload_len = encoded.len(), "usage report prepared");
        Ok(Some(encoded))
    }
}

impl Default for UsageReporter {
    fn default() -> Self {
        Self::new()
    }
}
