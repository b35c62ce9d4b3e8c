//! Point-in-time view of the host state the usage reporter queries.

use super::extension::Extension;
use super::job::{Job, JobKindRegistry};
use super::node::{Node, RuntimeInfo};

/// Everything the usage reporter reads from the host, captured as a
/// point-in-time view.
///
/// The host assembles this from its live object model. No transactional
/// consistency is guaranteed across fields; an extension may be disabled
/// while a report is being built, and that is acceptable.
#[derive(Debug, Clone)]
pub struct HostState {
    /// Host software version string.
    pub version: String,
    /// Installation secret; only a one-way digest of it ever leaves the host.
    pub install_secret: Vec<u8>,
    /// Operator opt-out: when false, no usage data is collected.
    pub usage_stats_enabled: bool,
    /// Execution runtime of the coordinating node's process.
    pub runtime: RuntimeInfo,
    pub nodes: Vec<Node>,
    pub extensions: Vec<Extension>,
    pub job_kinds: JobKindRegistry,
    pub jobs: Vec<Job>,
}

impl HostState {
    /// Create a host view with no nodes, extensions, or jobs, and usage
    /// statistics enabled.
    pub fn new(
        version: impl Into<String>,
        install_secret: Vec<u8>,
        runtime: RuntimeInfo,
    ) -> Self {
        Self {
            version: version.into(),
            install_secret,
            usage_stats_enabled: true,
            runtime,
            nodes: Vec::new(),
            extensions: Vec::new(),
            job_kinds: JobKindRegistry::new(),
            jobs: Vec::new(),
        }
    }
}
