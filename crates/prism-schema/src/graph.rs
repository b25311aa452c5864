//! Reference graph over nested record types, with cycle detection.
//!
//! Nodes are record types, edges are record-typed fields (singular or
//! repeated). The graph is populated depth-first from a root type and each
//! type is expanded once, so building it is linear in the number of
//! reachable types and record fields.

use std::collections::{HashMap, HashSet};

use prism_core::{FieldDescriptor, RecordType};
use rustworkx_core::petgraph::algo::tarjan_scc;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};

/// Directed graph of record types reachable from a root.
pub struct ReferenceGraph {
    graph: DiGraph<RecordType, FieldDescriptor>,
    type_to_index: HashMap<RecordType, NodeIndex>,
    root: NodeIndex,
}

impl ReferenceGraph {
    /// Build the graph of every record type reachable from `root`.
    #[must_use]
    pub fn of(root: &RecordType) -> Self {
        let mut graph = DiGraph::new();
        let mut type_to_index = HashMap::new();
        let root_index = graph.add_node(root.clone());
        type_to_index.insert(root.clone(), root_index);

        let mut expanded = HashSet::new();
        let mut stack = vec![root_index];
        while let Some(index) = stack.pop() {
            if !expanded.insert(index) {
                continue;
            }
            let record = graph[index].clone();
            for field in record.fields() {
                let Some(target) = field.record_type() else {
                    continue;
                };
                let target_index = *type_to_index
                    .entry(target.clone())
                    .or_insert_with(|| graph.add_node(target));
                graph.add_edge(index, target_index, field);
                if !expanded.contains(&target_index) {
                    stack.push(target_index);
                }
            }
        }

        tracing::trace!(
            root = root.full_name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built reference graph"
        );

        Self {
            graph,
            type_to_index,
            root: root_index,
        }
    }

    #[must_use]
    pub fn root(&self) -> &RecordType {
        &self.graph[self.root]
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether `record_type` is reachable from the root (or is the root).
    #[must_use]
    pub fn contains(&self, record_type: &RecordType) -> bool {
        self.type_to_index.contains_key(record_type)
    }

    /// Whether any reachable type can reach itself again: either through a
    /// field of its own type, or through a strongly connected component of
    /// more than one type.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.has_self_edge() || tarjan_scc(&self.graph).iter().any(|c| c.len() > 1)
    }

    /// The looping parts of the graph, as sorted lists of type names.
    ///
    /// Self-referencing types appear as single-element lists. Empty when
    /// [`is_looping`](Self::is_looping) is false.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|i| self.graph[i].full_name().to_string())
                    .collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    fn has_self_edge(&self) -> bool {
        self.graph
            .node_indices()
            .any(|i| self.graph.contains_edge(i, i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prism_core::testing;

    #[test]
    fn self_reference_is_looping() {
        let graph = ReferenceGraph::of(&testing::node());
        assert!(graph.is_looping());
        assert_eq!(graph.cycles(), vec![vec!["test.Node".to_string()]]);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn mutual_reference_is_looping() {
        let graph = ReferenceGraph::of(&testing::foo());
        assert!(graph.is_looping());
        assert_eq!(
            graph.cycles(),
            vec![vec!["test.Bar".to_string(), "test.Foo".to_string()]]
        );
    }

    #[test]
    fn diamond_is_not_looping() {
        let graph = ReferenceGraph::of(&testing::diamond());
        assert!(!graph.is_looping());
        assert!(graph.cycles().is_empty());
        assert_eq!(graph.node_count(), 3);
        // left, right, leaf, leaves
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.contains(&testing::record_type("test.Leaf")));
    }

    #[test]
    fn scalar_only_type_is_a_single_node() {
        let graph = ReferenceGraph::of(&testing::person());
        assert!(!graph.is_looping());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.root(), &testing::person());
    }

    #[test]
    fn union_refers_to_itself_twice() {
        let graph = ReferenceGraph::of(&testing::union());
        assert!(graph.is_looping());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn acyclic_nesting_is_not_looping() {
        let graph = ReferenceGraph::of(&testing::actor());
        assert!(!graph.is_looping());
        assert!(graph.contains(&testing::movie()));
    }
}
