use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner backing every node handle.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter for generated handles.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A stable handle for a node in the scene store.
///
/// Internally an interned string (`Spur` — 4 bytes, Copy, O(1) Eq/Hash), so
/// two fields holding the same `NodeId` *are* the aliasing mechanism: a
/// shared vertex is simply the same handle appearing in two shapes.
/// Handles also serialize as plain strings, which is what lets a persisted
/// document keep its reference topology.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern `s` as a handle (idempotent for equal strings).
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Mint a fresh, never-before-seen handle with a kind prefix,
    /// e.g. `point_12`, `line_3`.
    pub fn generated(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }

    /// Resolve the handle back to its string form.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_intern_to_equal_handles() {
        let a = NodeId::intern("shared_vertex");
        let b = NodeId::intern("shared_vertex");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "shared_vertex");
    }

    #[test]
    fn generated_handles_never_collide() {
        let a = NodeId::generated("point");
        let b = NodeId::generated("point");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("point_"));
    }
}
