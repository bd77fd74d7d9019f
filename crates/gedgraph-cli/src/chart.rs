//! GraphViz DOT output for pedigree, descendant and relationship charts.

use gedgraph_core::{Individual, RecordStore, Xref};
use gedgraph_graph::{describe, FamilyGraph, FamilyTree, Partner, RelationshipPath, Result};
use std::collections::HashSet;

const NODE_STYLE: &str = r#"  node [shape=box, style="rounded,filled", fillcolor=lightblue];"#;

/// Edge colour for steps through a mother.
const FEMALE_LINE_COLOR: &str = "crimson";

/// Writes DOT charts using names and years from a record store.
pub struct ChartWriter<'a> {
    store: &'a RecordStore,
    graph: &'a FamilyGraph,
}

impl<'a> ChartWriter<'a> {
    pub fn new(store: &'a RecordStore, graph: &'a FamilyGraph) -> Self {
        Self { store, graph }
    }

    /// Ancestor chart, oldest generation at the top.
    pub fn pedigree(&self, tree: &FamilyTree, generations: usize) -> Result<String> {
        let root = self.store.get_individual(tree.root().as_str())?;
        let mut lines = vec![
            "digraph Pedigree {".to_string(),
            "  rankdir=BT;".to_string(),
            NODE_STYLE.to_string(),
            String::new(),
            format!("  // Pedigree chart for {}", self.store.get_name(root)),
            format!("  // Root: {}", root.xref.to_gedcom()),
            format!("  // Generations: {}", generations),
            String::new(),
        ];

        let members = self.tree_members(tree);
        for xref in &members {
            lines.push(self.node_line(xref, None)?);
        }
        lines.push(String::new());

        let included: HashSet<&Xref> = members.iter().copied().collect();
        for &xref in &members {
            let parents = self.graph.parents(xref.as_str())?;
            for parent in [parents.father, parents.mother].iter().flatten() {
                if included.contains(parent) {
                    lines.push(format!("  {} -> {};", node_id(parent), node_id(xref)));
                }
            }
        }

        lines.push("}".to_string());
        Ok(finish(lines))
    }

    /// Descendant chart, root at the top.
    pub fn descendants(&self, tree: &FamilyTree, generations: usize) -> Result<String> {
        let root = self.store.get_individual(tree.root().as_str())?;
        let mut lines = vec![
            "digraph Descendants {".to_string(),
            "  rankdir=TB;".to_string(),
            NODE_STYLE.to_string(),
            String::new(),
            format!("  // Descendant chart for {}", self.store.get_name(root)),
            format!("  // Root: {}", root.xref.to_gedcom()),
            format!("  // Generations: {}", generations),
            String::new(),
        ];

        let members = self.tree_members(tree);
        for xref in &members {
            lines.push(self.node_line(xref, None)?);
        }
        lines.push(String::new());

        let included: HashSet<&Xref> = members.iter().copied().collect();
        for &xref in &members {
            for child in self.graph.children(xref.as_str())? {
                if included.contains(&child) {
                    lines.push(format!("  {} -> {};", node_id(xref), node_id(&child)));
                }
            }
        }

        lines.push("}".to_string());
        Ok(finish(lines))
    }

    /// Chart of the first (best ranked) path, with the partners that make
    /// each parent-child step.
    ///
    /// `paths` must be non-empty.
    pub fn relationship(&self, paths: &[RelationshipPath]) -> Result<String> {
        let Some(path) = paths.first() else {
            return Ok(String::new());
        };
        let start = self.store.get_individual(path.start.as_str())?;
        let end = self.store.get_individual(path.end.as_str())?;

        let mut lines = vec![
            "digraph Relationship {".to_string(),
            "  rankdir=TB;".to_string(),
            NODE_STYLE.to_string(),
            String::new(),
            "  // Relationship chart".to_string(),
            format!(
                "  // Start: {} ({})",
                self.store.get_name(start),
                start.xref.to_gedcom()
            ),
            format!(
                "  // End: {} ({})",
                self.store.get_name(end),
                end.xref.to_gedcom()
            ),
            format!("  // Relationship: {}", describe(path)),
            format!("  // Generation distance: {}", path.generation_distance()),
            format!("  // Path length: {} steps", path.length()),
            String::new(),
        ];

        if paths.len() > 1 {
            lines.push(format!("  // Note: {} equally short paths found", paths.len()));
            lines.push(String::new());
        }

        let on_path: Vec<&Xref> = path.individuals();
        let partners = self.partners(path, &on_path)?;

        let mut seen = HashSet::new();
        for &xref in &on_path {
            if !seen.insert(xref) {
                continue;
            }
            let fill = if *xref == path.start {
                "lightcoral"
            } else if *xref == path.end {
                "lightblue"
            } else {
                "lightgreen"
            };
            lines.push(self.node_line(xref, Some(fill))?);

            if let Some((_, partner)) = partners.iter().find(|(p, _)| p == xref) {
                lines.push(self.node_line(&partner.spouse, Some("lightyellow"))?);
                lines.push(format!(
                    "  {{rank=same; {}; {};}}",
                    node_id(xref),
                    node_id(&partner.spouse)
                ));
            }
        }
        lines.push(String::new());

        for (xref, partner) in &partners {
            let style = if partner.married { "solid" } else { "dashed" };
            lines.push(format!(
                "  {} -> {} [dir=none, style={}, constraint=false];",
                node_id(xref),
                node_id(&partner.spouse),
                style
            ));
        }
        lines.push(String::new());

        for step in &path.steps {
            let mut attrs = Vec::new();
            if !step.is_full_blood() {
                attrs.push("style=dashed".to_string());
            }
            if !step.via_male_line() {
                attrs.push(format!("color={}", FEMALE_LINE_COLOR));
            }
            let attrs = if attrs.is_empty() {
                String::new()
            } else {
                format!(" [{}]", attrs.join(", "))
            };
            lines.push(format!(
                "  {} -> {}{};",
                node_id(step.parent()),
                node_id(step.child()),
                attrs
            ));
        }

        lines.push("}".to_string());
        Ok(finish(lines))
    }

    /// Root followed by tree members.
    fn tree_members<'t>(&self, tree: &'t FamilyTree) -> Vec<&'t Xref> {
        std::iter::once(tree.root())
            .chain(tree.iter().map(|m| &m.individual))
            .collect()
    }

    /// For each parent on the path, the other parent of the child the path
    /// passes through, unless that person is on the path already.
    fn partners(
        &self,
        path: &RelationshipPath,
        on_path: &[&Xref],
    ) -> Result<Vec<(Xref, Partner)>> {
        let mut partners: Vec<(Xref, Partner)> = Vec::new();
        for step in &path.steps {
            let parent = step.parent();
            if partners.iter().any(|(p, _)| p == parent) {
                continue;
            }
            let Some(partner) = self
                .graph
                .spouse_for_child(parent.as_str(), step.child().as_str())?
            else {
                continue;
            };
            if on_path.contains(&&partner.spouse) {
                continue;
            }
            partners.push((parent.clone(), partner));
        }
        Ok(partners)
    }

    fn node_line(&self, xref: &Xref, fill: Option<&str>) -> Result<String> {
        let individual = self.store.get_individual(xref.as_str())?;
        let label = self.label(individual);
        Ok(match fill {
            Some(fill) => format!(
                "  {} [label=\"{}\", fillcolor={}];",
                node_id(xref),
                label,
                fill
            ),
            None => format!("  {} [label=\"{}\"];", node_id(xref), label),
        })
    }

    /// `Name\n(birth - death)`, or just the name when no year is known.
    fn label(&self, individual: &Individual) -> String {
        let name = escape(&self.store.get_name(individual));
        let birth = self.store.get_birth_year(individual);
        let death = self.store.get_death_year(individual);
        if birth.is_none() && death.is_none() {
            return name;
        }
        let birth = birth.map_or_else(|| "?".to_string(), |y| y.to_string());
        let death = death.map(|y| y.to_string()).unwrap_or_default();
        format!("{}\\n({} - {})", name, birth, death)
    }
}

/// DOT node id for an individual.
pub fn node_id(xref: &Xref) -> String {
    format!("\"{}\"", escape(xref.as_str()))
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
