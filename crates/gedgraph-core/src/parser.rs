//! GEDCOM decoder.
//!
//! A GEDCOM file is a flat list of `LEVEL [@XREF@] TAG [VALUE]` lines whose
//! levels describe a tree. Decoding happens in two passes:
//!
//! 1. Lines are tokenized and folded into a tree (CONC/CONT continuation
//!    lines are merged into their parent's value).
//! 2. Level-0 INDI and FAM nodes are turned into [`Individual`] and
//!    [`Family`] records. Other top-level records are skipped.

use crate::charset;
use crate::error::{RecordError, Result};
use crate::record::{Family, Individual, PersonName, Sex, Xref};
use std::fs;
use std::path::Path;
use tracing::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Result of decoding a single GEDCOM source.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// INDI records in file order.
    pub individuals: Vec<Individual>,
    /// FAM records in file order.
    pub families: Vec<Family>,
    /// File path or label of the decoded source.
    pub source: String,
}

/// One tokenized line.
#[derive(Debug)]
struct GedcomLine<'a> {
    number: usize,
    level: usize,
    xref: Option<&'a str>,
    tag: &'a str,
    value: &'a str,
}

/// A line together with its nested sub-records.
#[derive(Debug)]
struct GedcomNode {
    line: usize,
    level: usize,
    xref: Option<String>,
    tag: String,
    value: String,
    children: Vec<GedcomNode>,
}

impl GedcomNode {
    fn child(&self, tag: &str) -> Option<&GedcomNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    fn child_value(&self, tag: &str) -> Option<String> {
        self.child(tag).and_then(|c| {
            let value = c.value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }
}

impl From<GedcomLine<'_>> for GedcomNode {
    fn from(line: GedcomLine<'_>) -> Self {
        Self {
            line: line.number,
            level: line.level,
            xref: line.xref.map(str::to_string),
            tag: line.tag.to_string(),
            value: line.value.to_string(),
            children: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GedcomParser
// ─────────────────────────────────────────────────────────────────────────────

/// Decodes GEDCOM text into individual and family records.
#[derive(Debug, Default, Clone)]
pub struct GedcomParser;

impl GedcomParser {
    pub fn new() -> Self {
        Self
    }

    /// Reads and decodes a GEDCOM file in its declared character set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is empty, or is not
    /// well-formed GEDCOM.
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        let bytes = fs::read(path).map_err(|e| RecordError::io(path, e))?;
        let source = charset::decode(&bytes, &path.to_string_lossy());

        if source.trim().is_empty() {
            return Err(RecordError::EmptyFile(path.to_path_buf()));
        }

        self.parse_source(&source, &path.to_string_lossy())
    }

    /// Decodes GEDCOM text held in memory. `label` names the source in
    /// errors and logs.
    pub fn parse_source(&self, source: &str, label: &str) -> Result<ParseResult> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        if source.trim().is_empty() {
            return Err(RecordError::EmptyFile(label.into()));
        }

        let roots = build_tree(source)?;

        let mut result = ParseResult {
            source: label.to_string(),
            ..ParseResult::default()
        };

        for root in &roots {
            match root.tag.as_str() {
                "INDI" => result.individuals.push(decode_individual(root)?),
                "FAM" => result.families.push(decode_family(root)?),
                other => debug!("Skipping {} record at line {}", other, root.line),
            }
        }

        debug!(
            "Decoded {}: {} individuals, {} families",
            label,
            result.individuals.len(),
            result.families.len()
        );

        Ok(result)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tokenizing
// ─────────────────────────────────────────────────────────────────────────────

fn tokenize(raw: &str, number: usize) -> Result<GedcomLine<'_>> {
    let line = raw.trim_start();

    let (level, rest) = split_token(line);
    let level = level
        .parse::<usize>()
        .map_err(|_| RecordError::syntax(number, format!("invalid level '{}'", level)))?;

    let (xref, rest) = match split_token(rest) {
        (token, tail) if token.starts_with('@') => {
            if token.len() < 3 || !token.ends_with('@') {
                return Err(RecordError::syntax(
                    number,
                    format!("invalid cross reference '{}'", token),
                ));
            }
            (Some(token), tail)
        }
        _ => (None, rest),
    };

    let (tag, value) = split_token(rest);
    if tag.is_empty() {
        return Err(RecordError::syntax(number, "missing tag"));
    }

    Ok(GedcomLine {
        number,
        level,
        xref,
        tag,
        value,
    })
}

/// Splits off the first space-delimited token. The remainder loses only the
/// single delimiter so CONC values keep their spacing.
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start_matches(' ');
    match s.find(' ') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

fn build_tree(source: &str) -> Result<Vec<GedcomNode>> {
    let mut roots: Vec<GedcomNode> = Vec::new();
    let mut stack: Vec<GedcomNode> = Vec::new();
    let mut previous_level: Option<usize> = None;

    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        let raw = raw.trim_end_matches(['\r', '\n']);
        if raw.trim().is_empty() {
            continue;
        }

        let line = tokenize(raw, number)?;

        match previous_level {
            None if line.level != 0 => {
                return Err(RecordError::syntax(number, "first record must be at level 0"));
            }
            Some(prev) if line.level > prev + 1 => {
                return Err(RecordError::syntax(
                    number,
                    format!("level jumps from {} to {}", prev, line.level),
                ));
            }
            _ => {}
        }
        previous_level = Some(line.level);

        // Close every open node at this level or deeper.
        while let Some(top) = stack.pop() {
            if top.level < line.level {
                stack.push(top);
                break;
            }
            attach(&mut stack, &mut roots, top);
        }

        if matches!(line.tag, "CONC" | "CONT") {
            let parent = stack.last_mut().ok_or_else(|| {
                RecordError::syntax(number, format!("{} without a parent line", line.tag))
            })?;
            if line.tag == "CONT" {
                parent.value.push('\n');
            }
            parent.value.push_str(line.value);
            continue;
        }

        stack.push(GedcomNode::from(line));
    }

    while let Some(top) = stack.pop() {
        attach(&mut stack, &mut roots, top);
    }

    Ok(roots)
}

fn attach(stack: &mut [GedcomNode], roots: &mut Vec<GedcomNode>, node: GedcomNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Record decoding
// ─────────────────────────────────────────────────────────────────────────────

fn record_xref(node: &GedcomNode) -> Result<Xref> {
    node.xref
        .as_deref()
        .map(Xref::new)
        .ok_or_else(|| RecordError::syntax(node.line, format!("{} record without xref", node.tag)))
}

fn event_date(node: &GedcomNode) -> Option<String> {
    node.child_value("DATE")
}

fn pointer(node: &GedcomNode) -> Option<Xref> {
    let value = node.value.trim();
    (!value.is_empty()).then(|| Xref::new(value))
}

fn decode_name(node: &GedcomNode) -> PersonName {
    let value = node.value.trim();
    PersonName {
        value: (!value.is_empty()).then(|| value.to_string()),
        prefix: node.child_value("NPFX"),
        title: node.child_value("TITL"),
        given: node.child_value("GIVN"),
        surname: node.child_value("SURN"),
        suffix: node.child_value("NSFX"),
    }
}

fn decode_individual(node: &GedcomNode) -> Result<Individual> {
    let mut individual = Individual::new(record_xref(node)?);

    for child in &node.children {
        match child.tag.as_str() {
            "NAME" if individual.name.is_none() => individual.name = Some(decode_name(child)),
            "SEX" => individual.sex = Sex::from_tag(&child.value),
            "BIRT" if individual.birth.is_none() => individual.birth = event_date(child),
            "BAPM" if individual.baptism.is_none() => individual.baptism = event_date(child),
            "CHR" if individual.christening.is_none() => {
                individual.christening = event_date(child)
            }
            "DEAT" if individual.death.is_none() => individual.death = event_date(child),
            "BURI" if individual.burial.is_none() => individual.burial = event_date(child),
            "FAMC" => individual.families_as_child.extend(pointer(child)),
            "FAMS" => individual.families_as_spouse.extend(pointer(child)),
            _ => {}
        }
    }

    Ok(individual)
}

fn decode_family(node: &GedcomNode) -> Result<Family> {
    let mut family = Family::new(record_xref(node)?);

    for child in &node.children {
        match child.tag.as_str() {
            "HUSB" if family.husband.is_none() => family.husband = pointer(child),
            "WIFE" if family.wife.is_none() => family.wife = pointer(child),
            "CHIL" => {
                if let Some(xref) = pointer(child) {
                    if !family.children.contains(&xref) {
                        family.children.push(xref);
                    }
                }
            }
            "MARR" => {
                family.married = true;
                if family.marriage_date.is_none() {
                    family.marriage_date = event_date(child);
                }
            }
            _ => {}
        }
    }

    Ok(family)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
0 HEAD
1 GEDC
2 VERS 5.5.1
0 @I1@ INDI
1 NAME John /Smith/
1 SEX M
1 BIRT
2 DATE 15 MAR 1900
1 DEAT
2 DATE 1980
1 FAMS @F1@
0 @I2@ INDI
1 NAME Mary /Jones/
2 GIVN Mary Ann
2 SURN Jones
1 SEX F
1 CHR
2 DATE ABT 1902
1 FAMS @F1@
0 @I3@ INDI
1 NAME Robert /Smith/
1 SEX M
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 MARR
2 DATE 1 JUN 1925
0 TRLR
";

    #[test]
    fn test_parse_individuals_and_families() {
        let result = GedcomParser::new().parse_source(SAMPLE, "sample").unwrap();

        assert_eq!(result.individuals.len(), 3);
        assert_eq!(result.families.len(), 1);

        let john = &result.individuals[0];
        assert_eq!(john.xref, Xref::new("I1"));
        assert_eq!(john.display_name(), "John Smith");
        assert_eq!(john.sex, Sex::Male);
        assert_eq!(john.birth_year(), Some(1900));
        assert_eq!(john.death_year(), Some(1980));
        assert_eq!(john.families_as_spouse, vec![Xref::new("F1")]);

        let mary = &result.individuals[1];
        assert_eq!(mary.display_name(), "Mary Ann Jones");
        assert_eq!(mary.birth_year(), Some(1902));

        let family = &result.families[0];
        assert_eq!(family.husband, Some(Xref::new("I1")));
        assert_eq!(family.wife, Some(Xref::new("I2")));
        assert_eq!(family.children, vec![Xref::new("I3")]);
        assert!(family.married);
        assert_eq!(family.marriage_year(), Some(1925));
    }

    #[test]
    fn test_family_without_marriage() {
        let source = "0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I2@\n1 CHIL @I2@\n";
        let result = GedcomParser::new().parse_source(source, "mem").unwrap();
        let family = &result.families[0];
        assert!(!family.married);
        assert_eq!(family.wife, None);
        assert_eq!(family.children.len(), 1);
    }

    #[test]
    fn test_conc_and_cont_are_folded() {
        let source = "0 @I1@ INDI\n1 NAME Anna /Lee\n2 CONC /\n1 NOTE first\n2 CONT second\n";
        let result = GedcomParser::new().parse_source(source, "mem").unwrap();
        assert_eq!(result.individuals[0].display_name(), "Anna Lee");
    }

    #[test]
    fn test_bom_and_crlf_are_tolerated() {
        let source = "\u{feff}0 @I1@ INDI\r\n1 NAME Eve /Adams/\r\n\r\n0 TRLR\r\n";
        let result = GedcomParser::new().parse_source(source, "mem").unwrap();
        assert_eq!(result.individuals[0].display_name(), "Eve Adams");
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = GedcomParser::new()
            .parse_source("0 HEAD\nX NAME foo\n", "mem")
            .unwrap_err();
        assert!(matches!(err, RecordError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_level_jump_is_rejected() {
        let err = GedcomParser::new()
            .parse_source("0 @I1@ INDI\n2 DATE 1900\n", "mem")
            .unwrap_err();
        assert!(matches!(err, RecordError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_record_without_xref_is_rejected() {
        let err = GedcomParser::new()
            .parse_source("0 INDI\n1 NAME Nobody\n", "mem")
            .unwrap_err();
        assert!(err.is_decode_failure());
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let err = GedcomParser::new().parse_source("  \n", "mem").unwrap_err();
        assert!(matches!(err, RecordError::EmptyFile(_)));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let result = GedcomParser::new().parse_file(file.path()).unwrap();
        assert_eq!(result.individuals.len(), 3);
        assert_eq!(result.source, file.path().to_string_lossy());
    }

    #[test]
    fn test_parse_ansi_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0 HEAD\n1 CHAR ANSI\n0 @I1@ INDI\n1 NAME Jos\xe9 /Mart\xednez/\n0 TRLR\n")
            .unwrap();

        let result = GedcomParser::new().parse_file(file.path()).unwrap();
        assert_eq!(result.individuals[0].display_name(), "José Martínez");
    }

    #[test]
    fn test_missing_file() {
        let err = GedcomParser::new()
            .parse_file(Path::new("/definitely/not/here.ged"))
            .unwrap_err();
        assert!(matches!(err, RecordError::Io { .. }));
    }
}
