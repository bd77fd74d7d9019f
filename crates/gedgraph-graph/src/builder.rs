//! Graph builder for constructing the relationship graph from records.
//!
//! The builder takes individuals and families and resolves family
//! membership into parent → child edges.

use crate::edge::{Edge, ParentRole};
use crate::graph::{FamilyGraph, FamilyLink, NodeId};
use gedgraph_core::{Family, RecordStore, Xref};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Builds a FamilyGraph from decoded records.
///
/// The builder handles the two-pass process:
/// 1. Add all individuals as nodes
/// 2. Resolve family membership into edges
pub struct GraphBuilder {
    graph: FamilyGraph,
    /// Families waiting for edge resolution, in file order.
    pending: Vec<Family>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            graph: FamilyGraph::new(),
            pending: Vec::new(),
        }
    }

    /// Builds the graph for every record in a store.
    pub fn from_store(store: &RecordStore) -> FamilyGraph {
        let mut builder = Self::new();
        builder.add_individuals(store.individuals().map(|i| i.xref.clone()));
        builder.add_families(store.families().cloned());
        builder.build()
    }

    /// Adds individuals as nodes.
    pub fn add_individuals(&mut self, xrefs: impl IntoIterator<Item = Xref>) {
        for xref in xrefs {
            self.graph.add_individual(xref);
        }
    }

    /// Queues families for edge resolution.
    ///
    /// Call this after adding individuals, then call `build`.
    pub fn add_families(&mut self, families: impl IntoIterator<Item = Family>) {
        for mut family in families {
            if family.remove_self_links() {
                warn!(
                    "@{}@ lists a parent as its own spouse or child; ignoring those links",
                    family.xref
                );
            }
            self.graph.add_family(
                family.xref.clone(),
                FamilyLink {
                    father: family.husband.clone(),
                    mother: family.wife.clone(),
                    married: family.married,
                },
            );
            self.pending.push(family);
        }
    }

    /// Resolves family membership into edges.
    ///
    /// A child takes its parents from the first family that lists it. Self
    /// links were already dropped by `add_families`.
    fn resolve_edges(&mut self) {
        let mut placed: HashSet<NodeId> = HashSet::new();
        let families = std::mem::take(&mut self.pending);

        for family in &families {
            let father = self.lookup(family, family.husband.as_ref());
            let mother = self.lookup(family, family.wife.as_ref());

            for child_ref in &family.children {
                let Some(child) = self.lookup(family, Some(child_ref)) else {
                    continue;
                };

                if !placed.insert(child) {
                    warn!(
                        "@{}@ already has parents; ignoring its listing in @{}@",
                        child_ref, family.xref
                    );
                    continue;
                }

                let parents = [(father, ParentRole::Father), (mother, ParentRole::Mother)];
                for (parent, role) in parents {
                    let Some(parent) = parent else { continue };
                    self.graph
                        .add_edge(parent, child, Edge::new(family.xref.clone(), role));
                }
            }
        }

        debug!(
            "Resolved {} families into {} parent links",
            families.len(),
            self.graph.edge_count()
        );
    }

    fn lookup(&self, family: &Family, xref: Option<&Xref>) -> Option<NodeId> {
        let xref = xref?;
        let node = self.graph.node(xref.as_str()).ok();
        if node.is_none() {
            warn!("@{}@ references unknown individual @{}@", family.xref, xref);
        }
        node
    }

    /// Finishes building and returns the graph.
    pub fn build(mut self) -> FamilyGraph {
        self.resolve_edges();
        self.graph
    }
}
