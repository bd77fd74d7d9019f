//! Read-only store of decoded records.
//!
//! The store owns every [`Individual`] and [`Family`] for the lifetime of
//! the process. Relations are answered from family membership only: a
//! family's HUSB/WIFE/CHIL lines are the single source of parent, child and
//! spouse links.

use crate::error::{RecordError, Result};
use crate::parser::{GedcomParser, ParseResult};
use crate::record::{Family, Individual, Sex, Xref};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// The recorded parents of an individual.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parents<'a> {
    pub father: Option<&'a Individual>,
    pub mother: Option<&'a Individual>,
}

impl Parents<'_> {
    pub fn is_empty(&self) -> bool {
        self.father.is_none() && self.mother.is_none()
    }
}

/// The other parent of a child, seen from one parent.
#[derive(Debug, Clone, Copy)]
pub struct SpouseLink<'a> {
    pub spouse: &'a Individual,
    pub married: bool,
    pub family: &'a Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub individuals: usize,
    pub families: usize,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    individuals: Vec<Individual>,
    families: Vec<Family>,
    individual_index: HashMap<Xref, usize>,
    family_index: HashMap<Xref, usize>,
    /// First family listing the individual as a child.
    parent_family: HashMap<Xref, usize>,
    /// Families listing the individual as HUSB or WIFE, in file order.
    spouse_families: HashMap<Xref, Vec<usize>>,
    source: String,
}

impl RecordStore {
    /// Decodes and validates a GEDCOM file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let parsed = GedcomParser::new().parse_file(path.as_ref())?;
        let store = Self::from_parse_result(parsed)?;
        info!(
            "Loaded {}: {} individuals, {} families",
            store.source,
            store.individuals.len(),
            store.families.len()
        );
        Ok(store)
    }

    pub fn from_parse_result(parsed: ParseResult) -> Result<Self> {
        let mut store = Self::from_records(parsed.individuals, parsed.families)?;
        store.source = parsed.source;
        Ok(store)
    }

    /// Builds a store from decoded records, rejecting duplicate ids and
    /// family links to unknown individuals.
    ///
    /// A WIFE equal to the HUSB and any CHIL naming one of the family's own
    /// parents are dropped with a warning, the same way the graph skips them.
    pub fn from_records(individuals: Vec<Individual>, mut families: Vec<Family>) -> Result<Self> {
        for family in &mut families {
            if family.remove_self_links() {
                warn!(
                    "@{}@ lists a parent as its own spouse or child; ignoring those links",
                    family.xref
                );
            }
        }

        let mut store = Self {
            individuals,
            families,
            ..Self::default()
        };

        for (idx, individual) in store.individuals.iter().enumerate() {
            if store
                .individual_index
                .insert(individual.xref.clone(), idx)
                .is_some()
            {
                return Err(RecordError::DuplicateRecord(individual.xref.to_string()));
            }
        }

        for (idx, family) in store.families.iter().enumerate() {
            if store.family_index.insert(family.xref.clone(), idx).is_some() {
                return Err(RecordError::DuplicateRecord(family.xref.to_string()));
            }

            let members = family
                .husband
                .iter()
                .chain(family.wife.iter())
                .chain(family.children.iter());
            for member in members {
                if !store.individual_index.contains_key(member) {
                    return Err(RecordError::UnresolvedReference {
                        family: family.xref.to_string(),
                        reference: member.to_string(),
                    });
                }
            }

            for parent in family.husband.iter().chain(family.wife.iter()) {
                store
                    .spouse_families
                    .entry(parent.clone())
                    .or_default()
                    .push(idx);
            }

            for child in &family.children {
                if store.parent_family.contains_key(child) {
                    warn!(
                        "@{}@ is a child in more than one family; keeping the first, ignoring @{}@",
                        child, family.xref
                    );
                    continue;
                }
                store.parent_family.insert(child.clone(), idx);
            }
        }

        for individual in &store.individuals {
            for link in individual
                .families_as_child
                .iter()
                .chain(individual.families_as_spouse.iter())
            {
                if !store.family_index.contains_key(link) {
                    warn!("@{}@ links to unknown family @{}@", individual.xref, link);
                }
            }
        }

        Ok(store)
    }

    /// Label of the loaded source (file path), empty for in-memory stores.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Looks up an individual. Accepts `@I1@` as well as `I1`.
    pub fn get_individual(&self, id: &str) -> Result<&Individual> {
        self.individual_index
            .get(Xref::new(id).as_str())
            .map(|&idx| &self.individuals[idx])
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.individual_index.contains_key(Xref::new(id).as_str())
    }

    pub fn get_family(&self, id: &str) -> Option<&Family> {
        self.family_index
            .get(Xref::new(id).as_str())
            .map(|&idx| &self.families[idx])
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.iter()
    }

    pub fn get_name(&self, individual: &Individual) -> String {
        individual.display_name()
    }

    pub fn get_birth_year(&self, individual: &Individual) -> Option<i32> {
        individual.birth_year()
    }

    pub fn get_death_year(&self, individual: &Individual) -> Option<i32> {
        individual.death_year()
    }

    pub fn get_sex(&self, individual: &Individual) -> Sex {
        individual.sex
    }

    /// The family in which `id` appears as a child.
    pub fn get_parent_family(&self, id: &str) -> Result<Option<&Family>> {
        let individual = self.get_individual(id)?;
        Ok(self
            .parent_family
            .get(&individual.xref)
            .map(|&idx| &self.families[idx]))
    }

    pub fn get_parents(&self, id: &str) -> Result<Parents<'_>> {
        let Some(family) = self.get_parent_family(id)? else {
            return Ok(Parents::default());
        };

        Ok(Parents {
            father: family.husband.as_ref().map(|x| self.resolved(x)),
            mother: family.wife.as_ref().map(|x| self.resolved(x)),
        })
    }

    pub fn get_families_as_spouse(&self, id: &str) -> Result<Vec<&Family>> {
        let individual = self.get_individual(id)?;
        Ok(self
            .spouse_families
            .get(&individual.xref)
            .map(|indexes| indexes.iter().map(|&idx| &self.families[idx]).collect())
            .unwrap_or_default())
    }

    /// Children of `id` across all of its families, in family then CHIL order.
    ///
    /// A child is only counted under the family it takes its parents from.
    pub fn get_children(&self, id: &str) -> Result<Vec<&Individual>> {
        let mut children = Vec::new();
        for family in self.get_families_as_spouse(id)? {
            for child in &family.children {
                if self.parent_family.get(child) == self.family_index.get(&family.xref) {
                    children.push(self.resolved(child));
                }
            }
        }
        Ok(children)
    }

    /// The other parent of `child` when `id` is one of its parents, together
    /// with whether that family records a marriage.
    ///
    /// Spouses are per family: someone with several partners gets a
    /// different answer for children of different families.
    pub fn get_spouse_for_child(&self, id: &str, child: &str) -> Result<Option<SpouseLink<'_>>> {
        let parent = self.get_individual(id)?;
        let Some(family) = self.get_parent_family(child)? else {
            return Ok(None);
        };

        Ok(family.other_parent(&parent.xref).map(|spouse| SpouseLink {
            spouse: self.resolved(spouse),
            married: family.married,
            family,
        }))
    }

    /// Both recorded parents known and identical.
    pub fn is_full_sibling(&self, a: &str, b: &str) -> Result<bool> {
        let (pa, pb) = (self.get_parents(a)?, self.get_parents(b)?);
        if self.get_individual(a)?.xref == self.get_individual(b)?.xref {
            return Ok(false);
        }
        Ok(match (pa.father, pa.mother, pb.father, pb.mother) {
            (Some(fa), Some(ma), Some(fb), Some(mb)) => fa.xref == fb.xref && ma.xref == mb.xref,
            _ => false,
        })
    }

    /// Exactly one recorded parent in common.
    pub fn is_half_sibling(&self, a: &str, b: &str) -> Result<bool> {
        let (pa, pb) = (self.get_parents(a)?, self.get_parents(b)?);
        if self.get_individual(a)?.xref == self.get_individual(b)?.xref {
            return Ok(false);
        }
        let same = |x: Option<&Individual>, y: Option<&Individual>| match (x, y) {
            (Some(x), Some(y)) => x.xref == y.xref,
            _ => false,
        };
        Ok(same(pa.father, pb.father) != same(pa.mother, pb.mother))
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            individuals: self.individuals.len(),
            families: self.families.len(),
        }
    }

    /// Resolves an xref that validation has already checked.
    fn resolved(&self, xref: &Xref) -> &Individual {
        &self.individuals[self.individual_index[xref]]
    }
}
