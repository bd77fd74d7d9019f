//! Core graph data structure.
//!
//! The FamilyGraph wraps petgraph and adds an id index and per-family
//! marriage data. It is derived from a RecordStore once at load time and
//! never mutated afterwards.

use crate::edge::{BloodType, Edge, ParentRole};
use crate::error::{GraphError, Result};
use crate::xref_table::XrefTable;
use gedgraph_core::Xref;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction as PgDirection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// One hop to a neighbouring node over a specific edge.
pub(crate) type Link = (NodeId, EdgeIndex);

/// Family data the edges alone cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyLink {
    pub father: Option<Xref>,
    pub mother: Option<Xref>,
    pub married: bool,
}

/// The recorded parents of an individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentPair {
    pub father: Option<Xref>,
    pub mother: Option<Xref>,
}

/// The other parent of a child, seen from one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub spouse: Xref,
    pub married: bool,
    pub family: Xref,
}

/// The relationship graph.
///
/// Nodes hold only individual ids; edges point from parent to child and
/// carry the family and parent role they were derived from.
#[derive(Debug, Default)]
pub struct FamilyGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: DiGraph<Xref, Edge>,

    /// Maps ids to graph node indexes.
    id_index: XrefTable,

    /// Maps family ids to their parents and marriage flag.
    families: HashMap<Xref, FamilyLink>,
}

impl FamilyGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an individual. Returns the existing node if the id is known.
    pub fn add_individual(&mut self, xref: Xref) -> NodeId {
        if let Some(existing) = self.id_index.resolve(xref.as_str()) {
            return existing;
        }
        let index = self.graph.add_node(xref.clone());
        self.id_index.insert(xref, index);
        index
    }

    pub fn add_family(&mut self, xref: Xref, link: FamilyLink) {
        self.families.insert(xref, link);
    }

    /// Adds a parent → child edge.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId, edge: Edge) -> EdgeIndex {
        self.graph.add_edge(parent, child, edge)
    }

    /// Resolves an id (`@I1@` or `I1`) to its node.
    pub fn node(&self, id: &str) -> Result<NodeId> {
        self.id_index
            .resolve(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_index.resolve(id).is_some()
    }

    /// The id stored at a node.
    ///
    /// Panics if `node` does not belong to this graph.
    pub fn xref(&self, node: NodeId) -> &Xref {
        &self.graph[node]
    }

    pub(crate) fn edge(&self, edge: EdgeIndex) -> &Edge {
        &self.graph[edge]
    }

    pub(crate) fn endpoints(&self, edge: EdgeIndex) -> Option<(NodeId, NodeId)> {
        self.graph.edge_endpoints(edge)
    }

    pub fn family(&self, id: &str) -> Option<&FamilyLink> {
        self.families.get(Xref::new(id).as_str())
    }

    /// Parent links of a node, father first.
    pub(crate) fn parent_links(&self, node: NodeId) -> Vec<Link> {
        let mut links: Vec<(ParentRole, Link)> = self
            .graph
            .edges_directed(node, PgDirection::Incoming)
            .map(|e| (e.weight().role, (e.source(), e.id())))
            .collect();
        links.sort_by_key(|(role, (_, edge))| (*role, *edge));
        links.into_iter().map(|(_, link)| link).collect()
    }

    /// Child links of a node, in family order then CHIL order.
    pub(crate) fn child_links(&self, node: NodeId) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .graph
            .edges_directed(node, PgDirection::Outgoing)
            .map(|e| (e.target(), e.id()))
            .collect();
        // Edge indexes grow in insertion order and nothing is ever removed.
        links.sort_by_key(|(_, edge)| *edge);
        links
    }

    /// Parents then children: every neighbour in the undirected view.
    pub(crate) fn relative_links(&self, node: NodeId) -> Vec<Link> {
        let mut links = self.parent_links(node);
        links.extend(self.child_links(node));
        links
    }

    fn parent_nodes(&self, node: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let mut father = None;
        let mut mother = None;
        for e in self.graph.edges_directed(node, PgDirection::Incoming) {
            match e.weight().role {
                ParentRole::Father => father = father.or(Some(e.source())),
                ParentRole::Mother => mother = mother.or(Some(e.source())),
            }
        }
        (father, mother)
    }

    /// Classifies two distinct nodes as full or half siblings.
    pub(crate) fn sibling_kind_of(&self, a: NodeId, b: NodeId) -> Option<BloodType> {
        if a == b {
            return None;
        }
        let (fa, ma) = self.parent_nodes(a);
        let (fb, mb) = self.parent_nodes(b);
        let same_father = fa.is_some() && fa == fb;
        let same_mother = ma.is_some() && ma == mb;
        match (same_father, same_mother) {
            (true, true) => Some(BloodType::Full),
            (true, false) | (false, true) => Some(BloodType::Half),
            (false, false) => None,
        }
    }

    /// Recorded father and mother of `id`.
    pub fn parents(&self, id: &str) -> Result<ParentPair> {
        let (father, mother) = self.parent_nodes(self.node(id)?);
        Ok(ParentPair {
            father: father.map(|n| self.xref(n).clone()),
            mother: mother.map(|n| self.xref(n).clone()),
        })
    }

    /// Children of `id` across all its families.
    pub fn children(&self, id: &str) -> Result<Vec<Xref>> {
        let node = self.node(id)?;
        Ok(self
            .child_links(node)
            .into_iter()
            .map(|(child, _)| self.xref(child).clone())
            .collect())
    }

    /// The other parent of `child` in the family that links it to `id`,
    /// with that family's marriage flag.
    pub fn spouse_for_child(&self, id: &str, child: &str) -> Result<Option<Partner>> {
        let parent = self.node(id)?;
        let child = self.node(child)?;

        let Some(edge) = self.graph.find_edge(parent, child) else {
            return Ok(None);
        };
        let family_id = &self.graph[edge].family;
        let Some(family) = self.families.get(family_id) else {
            return Ok(None);
        };

        let me = self.xref(parent);
        let spouse = if family.father.as_ref() == Some(me) {
            family.mother.clone()
        } else {
            family.father.clone()
        };

        Ok(spouse.map(|spouse| Partner {
            spouse,
            married: family.married,
            family: family_id.clone(),
        }))
    }

    /// `Some(Full)` for full siblings, `Some(Half)` for half siblings.
    pub fn sibling_kind(&self, a: &str, b: &str) -> Result<Option<BloodType>> {
        Ok(self.sibling_kind_of(self.node(a)?, self.node(b)?))
    }

    /// Returns the number of individuals.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of parent-child edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all individual ids.
    pub fn individuals(&self) -> impl Iterator<Item = &Xref> {
        self.graph.node_weights()
    }
}

/// Graph statistics for the info command.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphStats {
    pub individuals: usize,
    pub families: usize,
    pub parent_links: usize,
}

impl FamilyGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            individuals: self.node_count(),
            families: self.families.len(),
            parent_links: self.edge_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// I1 + I2 -> I3, I4 (F1, married); I1 + I5 -> I6 (F2).
    fn sample() -> FamilyGraph {
        let mut graph = FamilyGraph::new();
        let ids: Vec<NodeId> = (1..=7)
            .map(|n| graph.add_individual(Xref::new(&format!("I{}", n))))
            .collect();
        let (i1, i2, i3, i4, i5, i6) = (ids[0], ids[1], ids[2], ids[3], ids[4], ids[5]);

        graph.add_family(
            Xref::new("F1"),
            FamilyLink {
                father: Some(Xref::new("I1")),
                mother: Some(Xref::new("I2")),
                married: true,
            },
        );
        graph.add_family(
            Xref::new("F2"),
            FamilyLink {
                father: Some(Xref::new("I1")),
                mother: Some(Xref::new("I5")),
                married: false,
            },
        );

        for child in [i3, i4] {
            graph.add_edge(i1, child, Edge::new(Xref::new("F1"), ParentRole::Father));
            graph.add_edge(i2, child, Edge::new(Xref::new("F1"), ParentRole::Mother));
        }
        graph.add_edge(i1, i6, Edge::new(Xref::new("F2"), ParentRole::Father));
        graph.add_edge(i5, i6, Edge::new(Xref::new("F2"), ParentRole::Mother));
        graph
    }

    #[test]
    fn test_parents() {
        let graph = sample();
        let parents = graph.parents("@I3@").unwrap();
        assert_eq!(parents.father, Some(Xref::new("I1")));
        assert_eq!(parents.mother, Some(Xref::new("I2")));
        assert_eq!(graph.parents("I1").unwrap(), ParentPair::default());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let graph = sample();
        let children = graph.children("I1").unwrap();
        assert_eq!(
            children,
            vec![Xref::new("I3"), Xref::new("I4"), Xref::new("I6")]
        );
    }

    #[test]
    fn test_spouse_is_per_family() {
        let graph = sample();

        let partner = graph.spouse_for_child("I1", "I3").unwrap().unwrap();
        assert_eq!(partner.spouse, Xref::new("I2"));
        assert!(partner.married);

        let partner = graph.spouse_for_child("I1", "I6").unwrap().unwrap();
        assert_eq!(partner.spouse, Xref::new("I5"));
        assert!(!partner.married);
        assert_eq!(partner.family, Xref::new("F2"));

        assert_eq!(graph.spouse_for_child("I2", "I6").unwrap(), None);
    }

    #[test]
    fn test_sibling_kind() {
        let graph = sample();
        assert_eq!(graph.sibling_kind("I3", "I4").unwrap(), Some(BloodType::Full));
        assert_eq!(graph.sibling_kind("I3", "I6").unwrap(), Some(BloodType::Half));
        assert_eq!(graph.sibling_kind("I3", "I3").unwrap(), None);
        assert_eq!(graph.sibling_kind("I1", "I7").unwrap(), None);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let graph = sample();
        assert!(matches!(graph.parents("I99"), Err(GraphError::NotFound(_))));
        assert!(matches!(graph.children("I99"), Err(GraphError::NotFound(_))));
        assert!(matches!(
            graph.spouse_for_child("I1", "I99"),
            Err(GraphError::NotFound(_))
        ));
    }

    #[test]
    fn test_add_individual_is_idempotent() {
        let mut graph = FamilyGraph::new();
        let a = graph.add_individual(Xref::new("I1"));
        let b = graph.add_individual(Xref::new("@I1@"));
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.individuals, 7);
        assert_eq!(stats.families, 2);
        assert_eq!(stats.parent_links, 6);
    }
}
