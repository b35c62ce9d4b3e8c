//! Workload kinds, the kind registry, and workload items.

/// A registered workload kind (e.g. pipeline, matrix).
///
/// The key is safe for use as a JSON object member, so reports can key
/// per-kind counts directly on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobKind {
    pub key: String,
}

impl JobKind {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Derive a kind from a fully qualified type path, normalizing the path
    /// separators into a key safe for use as a JSON object member.
    pub fn from_type_path(path: &str) -> Self {
        let key = path
            .split("::")
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Self { key }
    }
}

/// Ordered registry of workload kinds.
///
/// Iteration follows registration order, so derived reports carry a stable,
/// complete key set even for kinds with no current items.
#[derive(Debug, Clone, Default)]
pub struct JobKindRegistry {
    kinds: Vec<JobKind>,
}

impl JobKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind. Re-registering an existing key is a no-op.
    pub fn register(&mut self, kind: JobKind) {
        if !self.contains(&kind.key) {
            self.kinds.push(kind);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.kinds.iter().any(|k| k.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// A current workload item, associated with exactly one registered kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    /// Key of the [`JobKind`] this item belongs to.
    pub kind: String,
}

impl Job {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}
