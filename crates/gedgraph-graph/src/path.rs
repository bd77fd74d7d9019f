//! Relationship paths and their ranking metrics.

use crate::edge::{BloodType, Direction, Lineage};
use gedgraph_core::Xref;
use serde::{Deserialize, Serialize};

/// One classified hop of a relationship path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub from: Xref,
    pub to: Xref,
    pub direction: Direction,
    pub blood: BloodType,
    /// Sex of the parent endpoint of the hop.
    pub lineage: Lineage,
    /// Family the underlying parent-child link comes from.
    pub family: Xref,
}

impl PathStep {
    pub fn is_full_blood(&self) -> bool {
        self.blood == BloodType::Full
    }

    pub fn via_male_line(&self) -> bool {
        self.lineage == Lineage::Male
    }

    /// True for an upward step (child to parent).
    pub fn is_parent(&self) -> bool {
        self.direction == Direction::Parent
    }

    /// The individual at the parent end of the hop.
    pub fn parent(&self) -> &Xref {
        match self.direction {
            Direction::Parent => &self.to,
            Direction::Child => &self.from,
        }
    }

    /// The individual at the child end of the hop.
    pub fn child(&self) -> &Xref {
        match self.direction {
            Direction::Parent => &self.from,
            Direction::Child => &self.to,
        }
    }
}

/// An ordered chain of steps from `start` to `end`.
///
/// A path where `start == end` has no steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipPath {
    pub start: Xref,
    pub end: Xref,
    pub steps: Vec<PathStep>,
}

impl RelationshipPath {
    pub fn new(start: Xref, end: Xref, steps: Vec<PathStep>) -> Self {
        Self { start, end, steps }
    }

    /// The zero-length path from an individual to itself.
    pub fn empty(start: Xref) -> Self {
        Self {
            end: start.clone(),
            start,
            steps: Vec::new(),
        }
    }

    pub fn length(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of half-blood steps. Lower is better.
    pub fn blood_score(&self) -> usize {
        self.steps.iter().filter(|s| !s.is_full_blood()).count()
    }

    /// Number of female-line steps. Lower is better.
    pub fn male_score(&self) -> usize {
        self.steps.iter().filter(|s| !s.via_male_line()).count()
    }

    /// Ranking key: `(length, blood_score, male_score)`, ascending.
    pub fn sorting_key(&self) -> (usize, usize, usize) {
        (self.length(), self.blood_score(), self.male_score())
    }

    /// Net generations from start to end: +1 per step down, -1 per step up.
    pub fn generation_distance(&self) -> i64 {
        self.steps
            .iter()
            .map(|s| match s.direction {
                Direction::Child => 1,
                Direction::Parent => -1,
            })
            .sum()
    }

    /// Every individual on the path, start first.
    pub fn individuals(&self) -> Vec<&Xref> {
        std::iter::once(&self.start)
            .chain(self.steps.iter().map(|s| &s.to))
            .collect()
    }

    pub fn is_full_blood(&self) -> bool {
        self.blood_score() == 0
    }

    pub fn is_male_line(&self) -> bool {
        self.male_score() == 0
    }
}
