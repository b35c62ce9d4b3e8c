//! Usage snapshot model and assembly.

use gantry_core::models::host::HostState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Report format marker understood by the stats service.
const STAT_FORMAT: u32 = 1;

/// One point-in-time usage record, constructed fresh per reporting attempt.
///
/// JSON field order follows declaration order. `jobs` carries one entry per
/// registered workload kind, zero counts included, so the key set stays
/// complete and stable across reports even as usage shifts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageSnapshot {
    /// Report format marker.
    pub stat: u32,
    /// One-way digest identifying the installation.
    pub install: String,
    /// Host software version.
    pub version: String,
    pub nodes: Vec<NodeReport>,
    /// Active extensions only.
    pub plugins: Vec<PluginReport>,
    pub jobs: IndexMap<String, u64>,
}

/// Per-node entry. Wire keys follow the stats service's schema; the
/// coordinator-only fields are omitted for agent nodes, and `os` is omitted
/// when the node has not reported a platform descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeReport {
    #[serde(rename = "master", default, skip_serializing_if = "is_false")]
    pub coordinator: bool,
    #[serde(rename = "jvm-vendor", default, skip_serializing_if = "Option::is_none")]
    pub runtime_vendor: Option<String>,
    #[serde(rename = "jvm-version", default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    pub executors: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}

/// Per-extension entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginReport {
    pub name: String,
    pub version: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Digest of the installation secret.
///
/// Lets the stats service count distinct installations without learning the
/// secret itself.
pub fn install_identity(secret: &[u8]) -> String {
    hex::encode(Sha256::digest(secret))
}

/// Assemble a snapshot from the host's current state.
///
/// Pure aggregation: nodes and active extensions in host order, the
/// coordinating node annotated with the execution runtime, and one job count
/// per registered kind. Disabled extensions are excluded as if uninstalled.
pub fn build_snapshot(host: &HostState) -> UsageSnapshot {
    let nodes = host
        .nodes
        .iter()
        .map(|node| NodeReport {
            coordinator: node.coordinator,
            runtime_vendor: node.coordinator.then(|| host.runtime.vendor.clone()),
            runtime_version: node.coordinator.then(|| host.runtime.version.clone()),
            executors: node.executor_count,
            os: node.os.clone(),
        })
        .collect();

    let plugins = host
        .extensions
        .iter()
        .filter(|ext| ext.active)
        .map(|ext| PluginReport {
            name: ext.name.clone(),
            version: ext.version.clone(),
        })
        .collect();

    let mut jobs = IndexMap::new();
    for kind in host.job_kinds.iter() {
        let count = host.jobs.iter().filter(|job| job.kind == kind.key).count() as u64;
        jobs.insert(kind.key.clone(), count);
    }

    UsageSnapshot {
        stat: STAT_FORMAT,
        install: install_identity(&host.install_secret),
        version: host.version.clone(),
        nodes,
        plugins,
        jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::models::extension::Extension;
    use gantry_core::models::job::{Job, JobKind};
    use gantry_core::models::node::{Node, RuntimeInfo};

    fn sample_host() -> HostState {
        let mut host = HostState::new(
            "1.4.2",
            b"installation secret".to_vec(),
            RuntimeInfo::new("Acme", "1.0"),
        );
        host.nodes = vec![
            Node::coordinator("controller", 2, Some("Linux (amd64)".into())),
            Node::agent("agent-1", 4, Some("Linux (arm64)".into())),
            Node::agent("agent-2", 1, None),
        ];
        host.extensions = vec![
            Extension::new("git", "2.3.1", true),
            Extension::new("docker", "0.9.0", false),
            Extension::new("slack", "1.1.0", true),
        ];
        host.job_kinds.register(JobKind::new("pipeline"));
        host.job_kinds.register(JobKind::new("matrix"));
        host.job_kinds.register(JobKind::new("archive"));
        host.jobs = vec![
            Job::new("nightly", "pipeline"),
            Job::new("release", "pipeline"),
            Job::new("compat-grid", "matrix"),
        ];
        host
    }

    #[test]
    fn snapshot_carries_format_marker_and_version() {
        let snapshot = build_snapshot(&sample_host());
        assert_eq!(snapshot.stat, 1);
        assert_eq!(snapshot.version, "1.4.2");
    }

    #[test]
    fn install_identity_is_a_digest_not_the_secret() {
        let snapshot = build_snapshot(&sample_host());
        assert_eq!(snapshot.install, install_identity(b"installation secret"));
        assert_eq!(snapshot.install.len(), 64);
        assert!(!snapshot.install.contains("installation"));
    }

    #[test]
    fn install_identity_is_stable_and_distinguishes_secrets() {
        assert_eq!(install_identity(b"alpha"), install_identity(b"alpha"));
        assert_ne!(install_identity(b"alpha"), install_identity(b"beta"));
    }

    #[test]
    fn nodes_follow_host_order() {
        let snapshot = build_snapshot(&sample_host());
        assert_eq!(snapshot.nodes.len(), 3);
        assert!(snapshot.nodes[0].coordinator);
        assert!(!snapshot.nodes[1].coordinator);
        assert_eq!(snapshot.nodes[1].executors, 4);
        assert_eq!(snapshot.nodes[2].executors, 1);
    }

    #[test]
    fn only_the_coordinator_reports_the_runtime() {
        let snapshot = build_snapshot(&sample_host());
        assert_eq!(snapshot.nodes[0].runtime_vendor.as_deref(), Some("Acme"));
        assert_eq!(snapshot.nodes[0].runtime_version.as_deref(), Some("1.0"));
        assert_eq!(snapshot.nodes[1].runtime_vendor, None);
        assert_eq!(snapshot.nodes[1].runtime_version, None);
    }

    #[test]
    fn missing_platform_descriptor_is_absent_not_fatal() {
        let snapshot = build_snapshot(&sample_host());
        assert_eq!(snapshot.nodes[2].os, None);

        let json = serde_json::to_string(&snapshot.nodes[2]).expect("should serialize");
        assert!(!json.contains("\"os\""));
    }

    #[test]
    fn disabled_extensions_are_excluded() {
        let snapshot = build_snapshot(&sample_host());
        let names: Vec<&str> = snapshot.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["git", "slack"]);
    }

    #[test]
    fn reactivated_extension_appears_on_the_next_build() {
        let mut host = sample_host();
        assert_eq!(build_snapshot(&host).plugins.len(), 2);

        host.extensions[1].active = true;
        let names: Vec<String> = build_snapshot(&host)
            .plugins
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["git", "docker", "slack"]);
    }

    #[test]
    fn job_counts_cover_every_registered_kind() {
        let snapshot = build_snapshot(&sample_host());
        assert_eq!(snapshot.jobs.len(), 3);
        assert_eq!(snapshot.jobs["pipeline"], 2);
        assert_eq!(snapshot.jobs["matrix"], 1);
        assert_eq!(snapshot.jobs["archive"], 0);
    }

    #[test]
    fn job_counts_follow_registry_order() {
        let snapshot = build_snapshot(&sample_host());
        let keys: Vec<&str> = snapshot.jobs.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["pipeline", "matrix", "archive"]);
    }

    #[test]
    fn empty_host_builds_an_empty_snapshot() {
        let host = HostState::new("0.1.0", vec![1, 2, 3], RuntimeInfo::new("Acme", "1.0"));
        let snapshot = build_snapshot(&host);
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.plugins.is_empty());
        assert!(snapshot.jobs.is_empty());
    }

    #[test]
    fn snapshot_json_uses_wire_field_names() {
        let snapshot = build_snapshot(&sample_host());
        let json = serde_json::to_string(&snapshot).expect("should serialize");
        assert!(json.contains("\"stat\":1"));
        assert!(json.contains("\"install\":"));
        assert!(json.contains("\"master\":true"));
        assert!(json.contains("\"jvm-vendor\":\"Acme\""));
        assert!(json.contains("\"jvm-version\":\"1.0\""));
        assert!(json.contains("\"executors\":2"));
        assert!(json.contains("\"archive\":0"));
    }

    #[test]
    fn agent_nodes_omit_coordinator_fields() {
        let snapshot = build_snapshot(&sample_host());
        let json = serde_json::to_string(&snapshot.nodes[1]).expect("should serialize");
        assert!(!json.contains("master"));
        assert!(!json.contains("jvm-vendor"));
        assert!(!json.contains("jvm-version"));
    }

    #[test]
    fn snapshot_json_field_order_is_stable() {
        let snapshot = build_snapshot(&sample_host());
        let json = serde_json::to_string(&snapshot).expect("should serialize");
        let stat = json.find("\"stat\"").unwrap();
        let install = json.find("\"install\"").unwrap();
        let version = json.find("\"version\"").unwrap();
        let nodes = json.find("\"nodes\"").unwrap();
        let plugins = json.find("\"plugins\"").unwrap();
        let jobs = json.find("\"jobs\"").unwrap();
        assert!(stat < install && install < version && version < nodes);
        assert!(nodes < plugins && plugins < jobs);
    }

    #[test]
    fn snapshot_roundtrip_serde() {
        let snapshot = build_snapshot(&sample_host());
        let json = serde_json::to_string(&snapshot).expect("should serialize");
        let deserialized: UsageSnapshot =
            serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(snapshot, deserialized);
    }
}
