//! Bootstrap registry.
//!
//! An append-only list of node addresses in the order their introductions
//! were processed. Each newcomer is attached to whoever joined right before
//! it, which yields a single chain ordered by join time.
//!
//! The registry itself is not synchronized. Callers sharing it between
//! connections must hold one lock across [`Registry::introduce`] so that the
//! parent lookup and the append are never observed separately.

use crate::protocol::NodeIntroductionResponse;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    nodes: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `addr` and return its parent assignment.
    ///
    /// The parent is the most recently registered address, or empty when the
    /// registry was empty. Duplicates are appended like any other address.
    pub fn introduce(&mut self, addr: impl Into<String>) -> NodeIntroductionResponse {
        let parent = self.nodes.last().cloned().unwrap_or_default();
        let first = parent.is_empty();

        self.nodes.push(addr.into());
        debug!(position = self.nodes.len(), first, "Registered node");

        NodeIntroductionResponse {
            addr: parent,
            first,
            nodes: self.nodes.clone(),
        }
    }

    /// Registered addresses in join order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_node_is_root() {
        let mut registry = Registry::new();
        let resp = registry.introduce("n1");

        assert!(resp.first);
        assert_eq!(resp.addr, "");
        assert_eq!(resp.nodes, vec!["n1"]);
        assert_eq!(resp.parent(), None);
    }

    #[test]
    fn test_each_node_attaches_to_previous() {
        let mut registry = Registry::new();
        registry.introduce("n1");

        let second = registry.introduce("n2");
        assert!(!second.first);
        assert_eq!(second.addr, "n1");
        assert_eq!(second.nodes, vec!["n1", "n2"]);

        let third = registry.introduce("n3");
        assert!(!third.first);
        assert_eq!(third.addr, "n2");
        assert_eq!(third.nodes, vec!["n1", "n2", "n3"]);

        assert_eq!(registry.nodes(), ["n1", "n2", "n3"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicates_are_appended() {
        let mut registry = Registry::new();
        registry.introduce("n1");
        let again = registry.introduce("n1");

        assert!(!again.first);
        assert_eq!(again.addr, "n1");
        assert_eq!(registry.nodes(), ["n1", "n1"]);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_joins() {
        let mut registry = Registry::new();
        let first = registry.introduce("n1");
        registry.introduce("n2");

        assert_eq!(first.nodes, vec!["n1"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_chain_over_many_joins() {
        let mut registry = Registry::new();
        let addrs: Vec<String> = (0..50).map(|i| format!("127.0.0.1:{}", 5000 + i)).collect();

        for (i, addr) in addrs.iter().enumerate() {
            let resp = registry.introduce(addr.clone());
            if i == 0 {
                assert!(resp.first);
            } else {
                assert_eq!(resp.addr, addrs[i - 1]);
            }
            assert_eq!(resp.nodes.len(), i + 1);
        }
        assert_eq!(registry.nodes(), addrs.as_slice());
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.nodes().is_empty());
    }
}
