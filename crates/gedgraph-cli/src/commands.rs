//! CLI command implementations.

use crate::chart::ChartWriter;
use colored::Colorize;
use gedgraph_core::RecordStore;
use gedgraph_graph::{describe, FamilyGraph, GraphBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Loads a GEDCOM file and builds its relationship graph.
fn load(gedcom: &Path) -> Result<(RecordStore, FamilyGraph)> {
    if !gedcom.exists() {
        return Err(format!("GEDCOM file not found: {}", gedcom.display()).into());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Loading {}...", gedcom.display()));

    let store = RecordStore::load(gedcom);
    spinner.finish_and_clear();
    let store = store?;

    let graph = GraphBuilder::from_store(&store);
    info!(
        "Built graph with {} individuals and {} parent links",
        graph.node_count(),
        graph.edge_count()
    );
    Ok((store, graph))
}

/// Write a pedigree chart for an individual.
pub fn pedigree(gedcom: &Path, id: &str, generations: usize, output: &Path) -> Result<()> {
    let (store, graph) = load(gedcom)?;
    let individual = store.get_individual(id)?;

    let tree = graph.find_pedigree(id, generations)?;
    let dot = ChartWriter::new(&store, &graph).pedigree(&tree, generations)?;
    fs::write(output, dot)?;

    println!(
        "{} Pedigree chart generated: {}",
        "✓".green(),
        output.display()
    );
    println!(
        "Individual: {} ({})",
        store.get_name(individual).cyan(),
        individual.xref.to_gedcom()
    );
    println!("Generations: {}", generations);
    println!("Ancestors: {}", tree.len());

    Ok(())
}

/// Write a descendant chart for an individual.
pub fn descendants(gedcom: &Path, id: &str, generations: usize, output: &Path) -> Result<()> {
    let (store, graph) = load(gedcom)?;
    let individual = store.get_individual(id)?;

    let tree = graph.find_descendants(id, generations)?;
    let dot = ChartWriter::new(&store, &graph).descendants(&tree, generations)?;
    fs::write(output, dot)?;

    println!(
        "{} Descendant chart generated: {}",
        "✓".green(),
        output.display()
    );
    println!(
        "Individual: {} ({})",
        store.get_name(individual).cyan(),
        individual.xref.to_gedcom()
    );
    println!("Generations: {}", generations);
    println!("Descendants: {}", tree.len());

    Ok(())
}

/// Write a chart of the best shortest path between two individuals.
pub fn relationship(
    gedcom: &Path,
    from: &str,
    to: &str,
    max_depth: usize,
    output: &Path,
    json_output: bool,
) -> Result<()> {
    let (store, graph) = load(gedcom)?;
    let start = store.get_individual(from)?;
    let end = store.get_individual(to)?;

    let paths = graph.shortest_paths(from, to, max_depth)?;
    let Some(best) = paths.first() else {
        return Err(format!(
            "No relationship found between {} and {}\n  {} ({})\n  {} ({})",
            from,
            to,
            store.get_name(start),
            start.xref.to_gedcom(),
            store.get_name(end),
            end.xref.to_gedcom()
        )
        .into());
    };

    let dot = ChartWriter::new(&store, &graph).relationship(&paths)?;
    fs::write(output, dot)?;

    let description = describe(best);

    if json_output {
        let report = serde_json::json!({
            "output": output.display().to_string(),
            "start": { "id": start.xref, "name": store.get_name(start) },
            "end": { "id": end.xref, "name": store.get_name(end) },
            "relationship": description,
            "length": best.length(),
            "generation_distance": best.generation_distance(),
            "paths": paths,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Relationship chart generated: {}",
        "✓".green(),
        output.display()
    );
    println!(
        "From: {} ({})",
        store.get_name(start).cyan(),
        start.xref.to_gedcom()
    );
    println!(
        "To: {} ({})",
        store.get_name(end).cyan(),
        end.xref.to_gedcom()
    );
    println!("Relationship: {}", description.bold());
    println!("Path length: {} steps", best.length());
    println!("Generation distance: {}", best.generation_distance());

    if paths.len() > 1 {
        println!(
            "{}",
            format!(
                "Note: {} equally short paths found, showing first",
                paths.len()
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Show record and graph statistics.
pub fn info(gedcom: &Path) -> Result<()> {
    let (store, graph) = load(gedcom)?;
    let records = store.stats();
    let stats = graph.stats();

    println!("{}", "GedGraph Info".cyan().bold());
    println!();
    println!("  {} {}", "File:".dimmed(), gedcom.display());
    println!("  {} {}", "Individuals:".dimmed(), records.individuals);
    println!("  {} {}", "Families:".dimmed(), records.families);
    println!("  {} {}", "Parent links:".dimmed(), stats.parent_links);

    Ok(())
}
