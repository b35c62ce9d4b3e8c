//! Build nodes and the execution runtime they run on.

/// A compute node known to the host, as seen by the usage reporter.
///
/// Exactly one node per host is the coordinator; the rest are agents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    /// Whether this node coordinates the build farm.
    pub coordinator: bool,
    pub executor_count: u32,
    /// Platform descriptor (e.g. "Linux (amd64)"). `None` when the node has
    /// not reported one yet.
    pub os: Option<String>,
}

impl Node {
    /// Create an agent node.
    pub fn agent(name: impl Into<String>, executor_count: u32, os: Option<String>) -> Self {
        Self {
            name: name.into(),
            coordinator: false,
            executor_count,
            os,
        }
    }

    /// Create the coordinating node.
    pub fn coordinator(name: impl Into<String>, executor_count: u32, os: Option<String>) -> Self {
        Self {
            name: name.into(),
            coordinator: true,
            executor_count,
            os,
        }
    }
}

/// Vendor and version of the execution runtime, reported for the
/// coordinating node only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub vendor: String,
    pub version: String,
}

impl RuntimeInfo {
    pub fn new(vendor: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            version: version.into(),
        }
    }
}
