//! Breadth-first search over the relationship graph.
//!
//! Every query here runs on one layered BFS primitive. Pedigree search
//! follows parent links only, descendant search child links only, and
//! relationship search both. Each call allocates its own visited map, so
//! a shared `&FamilyGraph` can be queried from several threads at once.

use crate::edge::{BloodType, Direction};
use crate::error::Result;
use crate::graph::{FamilyGraph, Link, NodeId};
use crate::path::{PathStep, RelationshipPath};
use gedgraph_core::Xref;
use petgraph::graph::EdgeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A traversed hop: (from, to, edge).
type Hop = (NodeId, NodeId, EdgeIndex);

/// What a layered BFS run discovered.
#[derive(Debug, Default)]
pub(crate) struct Layers {
    /// Distance from the start for every visited node. Doubles as the
    /// visited set.
    pub distance: HashMap<NodeId, usize>,

    /// How each node was reached. Holds one entry per node unless the run
    /// kept every shortest predecessor.
    pub predecessors: HashMap<NodeId, Vec<Link>>,

    /// Visited nodes other than the start, in discovery order.
    pub order: Vec<NodeId>,

    /// Nodes in the last layer that satisfied the stop predicate.
    pub found: Vec<NodeId>,
}

/// Layered breadth-first traversal from `start`.
///
/// A whole layer is expanded before the next one starts. After each layer
/// the run ends if any newly discovered node satisfies `stop`, so every
/// shortest route to that layer has been recorded. No node further than
/// `max_depth` hops is visited.
///
/// With `keep_all`, a node reached again within the layer that discovered
/// it gains another predecessor; otherwise only the first one is kept.
pub(crate) fn bfs_layers<N, S>(
    start: NodeId,
    max_depth: usize,
    keep_all: bool,
    mut neighbors: N,
    mut stop: S,
) -> Layers
where
    N: FnMut(NodeId) -> Vec<Link>,
    S: FnMut(NodeId) -> bool,
{
    let mut layers = Layers::default();
    layers.distance.insert(start, 0);

    if stop(start) {
        layers.found.push(start);
        return layers;
    }

    let mut frontier = vec![start];
    let mut depth = 0;

    while !frontier.is_empty() && depth < max_depth {
        depth += 1;
        let mut next = Vec::new();

        for &node in &frontier {
            for (neighbor, edge) in neighbors(node) {
                match layers.distance.get(&neighbor) {
                    None => {
                        layers.distance.insert(neighbor, depth);
                        layers
                            .predecessors
                            .entry(neighbor)
                            .or_default()
                            .push((node, edge));
                        layers.order.push(neighbor);
                        next.push(neighbor);
                    }
                    Some(&d) if keep_all && d == depth => {
                        layers
                            .predecessors
                            .entry(neighbor)
                            .or_default()
                            .push((node, edge));
                    }
                    Some(_) => {}
                }
            }
        }

        layers.found = next.iter().copied().filter(|&n| stop(n)).collect();
        if !layers.found.is_empty() {
            break;
        }
        frontier = next;
    }

    layers
}

/// One member of a pedigree or descendant tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeMember {
    pub individual: Xref,
    /// 1 for a parent or child, 2 for a grandparent or grandchild, ...
    pub generation: usize,
    /// Path from the root to this member.
    pub path: RelationshipPath,
}

/// Ancestors or descendants of `root`, in BFS discovery order.
///
/// The root itself is not a member. Members can also be looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyTree {
    root: Xref,
    members: Vec<TreeMember>,
    #[serde(skip)]
    index: HashMap<Xref, usize>,
}

impl FamilyTree {
    pub fn new(root: Xref, members: Vec<TreeMember>) -> Self {
        let index = members
            .iter()
            .enumerate()
            .map(|(position, member)| (member.individual.clone(), position))
            .collect();
        Self {
            root,
            members,
            index,
        }
    }

    pub fn root(&self) -> &Xref {
        &self.root
    }

    /// Looks up a member by id, in either form.
    pub fn get(&self, id: &str) -> Option<&TreeMember> {
        self.index
            .get(Xref::new(id).as_str())
            .map(|&position| &self.members[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeMember> {
        self.members.iter()
    }

    /// Deepest generation reached, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.members.iter().map(|m| m.generation).max().unwrap_or(0)
    }

    /// Members of one generation.
    pub fn generation(&self, generation: usize) -> impl Iterator<Item = &TreeMember> {
        self.members
            .iter()
            .filter(move |m| m.generation == generation)
    }
}

impl FamilyGraph {
    /// Ancestors of `start` up to `max_generations` generations back.
    pub fn find_pedigree(&self, start: &str, max_generations: usize) -> Result<FamilyTree> {
        let root = self.node(start)?;
        let layers = bfs_layers(
            root,
            max_generations,
            false,
            |n| self.parent_links(n),
            |_| false,
        );
        let tree = self.collect_tree(root, &layers);
        debug!(
            "Pedigree of {}: {} ancestors in {} generations",
            tree.root(),
            tree.len(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Descendants of `start` up to `max_generations` generations down.
    pub fn find_descendants(&self, start: &str, max_generations: usize) -> Result<FamilyTree> {
        let root = self.node(start)?;
        let layers = bfs_layers(
            root,
            max_generations,
            false,
            |n| self.child_links(n),
            |_| false,
        );
        let tree = self.collect_tree(root, &layers);
        debug!(
            "Descendants of {}: {} individuals in {} generations",
            tree.root(),
            tree.len(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Every shortest path between `start` and `end` within `max_depth`
    /// hops, in discovery order.
    ///
    /// Returns an empty list when `end` is not reachable within the bound,
    /// and a single empty path when `start` and `end` are the same person.
    pub fn find_relationship_paths(
        &self,
        start: &str,
        end: &str,
        max_depth: usize,
    ) -> Result<Vec<RelationshipPath>> {
        let from = self.node(start)?;
        let to = self.node(end)?;

        let layers = bfs_layers(
            from,
            max_depth,
            true,
            |n| self.relative_links(n),
            |n| n == to,
        );

        if layers.found.is_empty() {
            debug!(
                "No path from {} to {} within {} steps ({} visited)",
                self.xref(from),
                self.xref(to),
                max_depth,
                layers.distance.len()
            );
            return Ok(Vec::new());
        }

        let mut routes = Vec::new();
        let mut trail = Vec::new();
        backtrack(&layers, from, to, &mut trail, &mut routes);

        let paths: Vec<RelationshipPath> = routes
            .into_iter()
            .map(|hops| self.classify(from, to, &hops))
            .collect();

        debug!(
            "Found {} shortest path(s) from {} to {} of length {} ({} visited)",
            paths.len(),
            self.xref(from),
            self.xref(to),
            layers.distance.get(&to).copied().unwrap_or(0),
            layers.distance.len()
        );
        Ok(paths)
    }

    fn collect_tree(&self, root: NodeId, layers: &Layers) -> FamilyTree {
        let members = layers
            .order
            .iter()
            .map(|&node| {
                let hops = first_route(layers, node);
                TreeMember {
                    individual: self.xref(node).clone(),
                    generation: layers.distance.get(&node).copied().unwrap_or(hops.len()),
                    path: self.classify(root, node, &hops),
                }
            })
            .collect();

        FamilyTree::new(self.xref(root).clone(), members)
    }

    /// Turns raw hops into classified steps.
    fn classify(&self, start: NodeId, end: NodeId, hops: &[Hop]) -> RelationshipPath {
        let mut steps: Vec<PathStep> = Vec::with_capacity(hops.len());
        let mut previous: Option<(NodeId, Direction)> = None;

        for &(from, to, edge_index) in hops {
            let edge = self.edge(edge_index);
            let direction = match self.endpoints(edge_index) {
                Some((parent, _)) if parent == from => Direction::Child,
                _ => Direction::Parent,
            };

            // Down right after up: the path crosses between two children of
            // the same parent.
            let blood = match previous {
                Some((sibling, Direction::Parent)) if direction == Direction::Child => {
                    match self.sibling_kind_of(sibling, to) {
                        Some(BloodType::Full) => BloodType::Full,
                        _ => BloodType::Half,
                    }
                }
                _ => BloodType::Full,
            };

            steps.push(PathStep {
                from: self.xref(from).clone(),
                to: self.xref(to).clone(),
                direction,
                blood,
                lineage: edge.lineage(),
                family: edge.family.clone(),
            });
            previous = Some((from, direction));
        }

        RelationshipPath::new(self.xref(start).clone(), self.xref(end).clone(), steps)
    }
}

/// Follows first predecessors from `node` back to the start.
fn first_route(layers: &Layers, node: NodeId) -> Vec<Hop> {
    let mut hops = Vec::new();
    let mut current = node;
    while let Some(&(prev, edge)) = layers
        .predecessors
        .get(&current)
        .and_then(|preds| preds.first())
    {
        hops.push((prev, current, edge));
        current = prev;
    }
    hops.reverse();
    hops
}

/// Collects every route from `start` to `node` over the predecessor map.
///
/// `trail` holds the hops from `node` forward to the target, last hop first.
fn backtrack(
    layers: &Layers,
    start: NodeId,
    node: NodeId,
    trail: &mut Vec<Hop>,
    routes: &mut Vec<Vec<Hop>>,
) {
    if node == start {
        routes.push(trail.iter().rev().copied().collect());
        return;
    }
    let Some(preds) = layers.predecessors.get(&node) else {
        return;
    };
    for &(prev, edge) in preds {
        trail.push((prev, node, edge));
        backtrack(layers, start, prev, trail, routes);
        trail.pop();
    }
}
