//! GedGraph Graph - Relationship graph and path search
//!
//! This crate turns the families of a [`gedgraph_core::RecordStore`] into a
//! directed parent → child graph and answers three questions over it:
//! who are the ancestors of an individual, who are the descendants, and
//! what are the shortest relationship paths between two individuals.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Id lookups, accepting `@I1@` and `I1` alike
//! - Per-family parents and marriage flag (for spouse queries)
//!
//! Every search is a layered breadth-first traversal. Relationship search
//! keeps every shortest path, and [`get_shortest_paths`] ranks them by
//! length, then blood purity, then lineage.
//!
//! # Example
//!
//! ```no_run
//! use gedgraph_core::RecordStore;
//! use gedgraph_graph::{describe, GraphBuilder};
//!
//! let store = RecordStore::load("family.ged")?;
//! let graph = GraphBuilder::from_store(&store);
//!
//! for path in graph.shortest_paths("@I3@", "@I4@", 50)? {
//!     println!("{} ({} steps)", describe(&path), path.length());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod edge;
mod error;
mod graph;
mod kinship;
mod path;
mod ranking;
mod search;
mod xref_table;

pub use builder::GraphBuilder;
pub use edge::{BloodType, Direction, Edge, Lineage, ParentRole};
pub use error::{GraphError, Result};
pub use graph::{FamilyGraph, FamilyLink, GraphStats, NodeId, ParentPair, Partner};
pub use kinship::describe;
pub use path::{PathStep, RelationshipPath};
pub use ranking::{get_shortest_paths, preferred_paths};
pub use search::{FamilyTree, TreeMember};
