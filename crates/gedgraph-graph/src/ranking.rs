//! Ranking of equally short relationship paths.
//!
//! Paths are ordered by `(length, blood_score, male_score)`, so among paths
//! of one length full blood beats half blood and, within that, male line
//! beats female line. The sort is stable: fully tied paths keep the order
//! the search discovered them in.

use crate::error::Result;
use crate::graph::FamilyGraph;
use crate::path::RelationshipPath;

/// Sorts paths best first.
pub fn get_shortest_paths(mut paths: Vec<RelationshipPath>) -> Vec<RelationshipPath> {
    paths.sort_by_key(RelationshipPath::sorting_key);
    paths
}

/// The ranked paths that tie with the best one.
pub fn preferred_paths(paths: Vec<RelationshipPath>) -> Vec<RelationshipPath> {
    let mut ranked = get_shortest_paths(paths);
    if let Some(best) = ranked.first().map(RelationshipPath::sorting_key) {
        ranked.retain(|p| p.sorting_key() == best);
    }
    ranked
}

impl FamilyGraph {
    /// Finds and ranks every shortest path between two individuals.
    pub fn shortest_paths(
        &self,
        start: &str,
        end: &str,
        max_depth: usize,
    ) -> Result<Vec<RelationshipPath>> {
        let paths = self.find_relationship_paths(start, end, max_depth)?;
        Ok(get_shortest_paths(paths))
    }
}
