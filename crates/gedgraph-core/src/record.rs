//! Decoded GEDCOM records.
//!
//! Only the parts of INDI and FAM records that genealogy queries need are
//! kept: names, sex, vital events and the family links.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A normalized record identifier.
///
/// GEDCOM writes cross references as `@I10@`; users often type `I10`.
/// Both forms normalize to the bare `I10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Xref(String);

impl Xref {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().trim_matches('@').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The delimited form used inside GEDCOM files.
    pub fn to_gedcom(&self) -> String {
        format!("@{}@", self.0)
    }
}

impl fmt::Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Xref {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Xref {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl Borrow<str> for Xref {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Xref {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub fn from_tag(value: &str) -> Self {
        match value.trim() {
            "M" | "m" => Sex::Male,
            "F" | "f" => Sex::Female,
            _ => Sex::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "U",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A personal name: the raw `NAME` value plus its structured sub-fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// Raw value, e.g. `John /Smith/ Jr`.
    pub value: Option<String>,
    /// NPFX
    pub prefix: Option<String>,
    /// TITL
    pub title: Option<String>,
    /// GIVN
    pub given: Option<String>,
    /// SURN
    pub surname: Option<String>,
    /// NSFX
    pub suffix: Option<String>,
}

impl PersonName {
    pub fn from_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Splits a raw `given /surname/ suffix` value into its three parts.
    pub fn split_value(value: &str) -> (Option<String>, Option<String>, Option<String>) {
        let mut pieces = value.splitn(3, '/');
        let given = pieces.next().and_then(non_empty);
        let surname = pieces.next().and_then(non_empty);
        let suffix = pieces.next().and_then(non_empty);
        (given, surname, suffix)
    }

    fn has_parts(&self) -> bool {
        self.prefix.is_some()
            || self.title.is_some()
            || self.given.is_some()
            || self.surname.is_some()
            || self.suffix.is_some()
    }

    /// Formats the name as `prefix title given surname suffix`.
    ///
    /// Structured sub-fields win; parts they leave out are taken from the
    /// raw value. Without any sub-field the raw value alone is used.
    pub fn formatted(&self) -> String {
        let (given, surname, suffix) = self
            .value
            .as_deref()
            .map(Self::split_value)
            .unwrap_or((None, None, None));

        let parts: Vec<Option<String>> = if self.has_parts() {
            vec![
                self.prefix.clone(),
                self.title.clone(),
                self.given.clone().or(given),
                self.surname.clone().or(surname),
                self.suffix.clone().or(suffix),
            ]
        } else {
            vec![given, surname, suffix]
        };

        let joined = parts
            .iter()
            .flatten()
            .flat_map(|part| part.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            "Unknown".to_string()
        } else {
            joined
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Pulls the year out of a GEDCOM date phrase.
///
/// Years are the last numeric token in practice: `1 JAN 1900`, `ABT 1850`,
/// `BET 1900 AND 1910`. Dual dates such as `1699/00` keep the first year.
pub fn extract_year(date: &str) -> Option<i32> {
    date.split_whitespace()
        .rev()
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .and_then(|token| {
            let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
}

/// An INDI record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub xref: Xref,
    pub name: Option<PersonName>,
    pub sex: Sex,
    /// DATE of BIRT.
    pub birth: Option<String>,
    /// DATE of BAPM.
    pub baptism: Option<String>,
    /// DATE of CHR.
    pub christening: Option<String>,
    /// DATE of DEAT.
    pub death: Option<String>,
    /// DATE of BURI.
    pub burial: Option<String>,
    /// FAMC links, in file order.
    pub families_as_child: Vec<Xref>,
    /// FAMS links, in file order.
    pub families_as_spouse: Vec<Xref>,
}

impl Individual {
    pub fn new(xref: impl Into<Xref>) -> Self {
        Self {
            xref: xref.into(),
            name: None,
            sex: Sex::Unknown,
            birth: None,
            baptism: None,
            christening: None,
            death: None,
            burial: None,
            families_as_child: Vec::new(),
            families_as_spouse: Vec::new(),
        }
    }

    /// Builder-style setter for a raw `given /surname/` name.
    pub fn with_name(mut self, value: &str) -> Self {
        self.name = Some(PersonName::from_value(value));
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    pub fn with_birth(mut self, date: &str) -> Self {
        self.birth = Some(date.to_string());
        self
    }

    pub fn with_death(mut self, date: &str) -> Self {
        self.death = Some(date.to_string());
        self
    }

    pub fn display_name(&self) -> String {
        self.name
            .as_ref()
            .map(PersonName::formatted)
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Birth year, falling back to baptism and then christening.
    pub fn birth_year(&self) -> Option<i32> {
        [&self.birth, &self.baptism, &self.christening]
            .into_iter()
            .flatten()
            .find_map(|date| extract_year(date))
    }

    /// Death year, falling back to burial.
    pub fn death_year(&self) -> Option<i32> {
        [&self.death, &self.burial]
            .into_iter()
            .flatten()
            .find_map(|date| extract_year(date))
    }
}

/// A FAM record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub xref: Xref,
    pub husband: Option<Xref>,
    pub wife: Option<Xref>,
    pub children: Vec<Xref>,
    /// True iff the record carries a MARR event.
    pub married: bool,
    pub marriage_date: Option<String>,
}

impl Family {
    pub fn new(xref: impl Into<Xref>) -> Self {
        Self {
            xref: xref.into(),
            husband: None,
            wife: None,
            children: Vec::new(),
            married: false,
            marriage_date: None,
        }
    }

    pub fn with_husband(mut self, xref: &str) -> Self {
        self.husband = Some(Xref::new(xref));
        self
    }

    pub fn with_wife(mut self, xref: &str) -> Self {
        self.wife = Some(Xref::new(xref));
        self
    }

    pub fn with_child(mut self, xref: &str) -> Self {
        self.children.push(Xref::new(xref));
        self
    }

    pub fn with_marriage(mut self, date: Option<&str>) -> Self {
        self.married = true;
        self.marriage_date = date.map(str::to_string);
        self
    }

    pub fn marriage_year(&self) -> Option<i32> {
        self.marriage_date.as_deref().and_then(extract_year)
    }

    pub fn is_parent(&self, xref: &Xref) -> bool {
        self.husband.as_ref() == Some(xref) || self.wife.as_ref() == Some(xref)
    }

    /// Drops a WIFE equal to the HUSB and any CHIL that is also a parent
    /// here. Returns true if anything was removed.
    pub fn remove_self_links(&mut self) -> bool {
        let before = self.children.len();
        let mut changed = false;

        if self.wife.is_some() && self.wife == self.husband {
            self.wife = None;
            changed = true;
        }
        let (husband, wife) = (&self.husband, &self.wife);
        self.children
            .retain(|child| husband.as_ref() != Some(child) && wife.as_ref() != Some(child));

        changed || self.children.len() != before
    }

    /// The partner of `xref` within this family, if both are recorded.
    pub fn other_parent(&self, xref: &Xref) -> Option<&Xref> {
        if self.husband.as_ref() == Some(xref) {
            self.wife.as_ref()
        } else if self.wife.as_ref() == Some(xref) {
            self.husband.as_ref()
        } else {
            None
        }
    }
}
