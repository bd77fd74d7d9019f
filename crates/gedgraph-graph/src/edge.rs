//! Edge metadata for the relationship graph.
//!
//! The graph stores one directed edge per parent-child link, always pointing
//! from parent to child. Traversal steps then read that edge upward
//! ([`Direction::Parent`]) or downward ([`Direction::Child`]).

use gedgraph_core::Xref;
use serde::{Deserialize, Serialize};

/// Which way a traversal step moves along a parent-child edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Up, from child to parent.
    Parent,
    /// Down, from parent to child.
    Child,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Parent => write!(f, "parent"),
            Direction::Child => write!(f, "child"),
        }
    }
}

/// Whether two relatives joined through a parent share both parents.
///
/// Ordered so that `Full` sorts before `Half`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodType {
    Full,
    Half,
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BloodType::Full => write!(f, "full"),
            BloodType::Half => write!(f, "half"),
        }
    }
}

/// The sex of the parent a step passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lineage {
    Male,
    Female,
}

impl std::fmt::Display for Lineage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lineage::Male => write!(f, "male"),
            Lineage::Female => write!(f, "female"),
        }
    }
}

/// The role a parent holds in the family that produced the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRole {
    /// HUSB
    Father,
    /// WIFE
    Mother,
}

impl ParentRole {
    pub fn lineage(self) -> Lineage {
        match self {
            ParentRole::Father => Lineage::Male,
            ParentRole::Mother => Lineage::Female,
        }
    }
}

/// A parent → child edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The FAM record this link comes from.
    pub family: Xref,

    /// Father or mother of the child in that family.
    pub role: ParentRole,
}

impl Edge {
    pub fn new(family: Xref, role: ParentRole) -> Self {
        Self { family, role }
    }

    pub fn lineage(&self) -> Lineage {
        self.role.lineage()
    }
}
