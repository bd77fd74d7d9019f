use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.ged")
}

#[allow(deprecated)]
fn gedgraph(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gedgraph").expect("binary");
    cmd.current_dir(workdir)
        .env_remove("RUST_LOG")
        .env_remove("CLICOLOR_FORCE")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn pedigree_writes_dot_chart() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("pedigree.dot");

    gedgraph(temp.path())
        .arg("pedigree")
        .arg(fixture())
        .arg("@I7@")
        .args(["-g", "2", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pedigree chart generated:"))
        .stdout(predicate::str::contains("David Smith"))
        .stdout(predicate::str::contains("Generations: 2"));

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph Pedigree {"));
    assert!(dot.contains("\"I5\" -> \"I7\";"));
    assert!(dot.contains("\"I3\" -> \"I5\";"));
    assert!(!dot.contains("\"I1\" ->"), "third generation should be cut off");
}

#[test]
fn descendants_writes_dot_chart() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("descendants.dot");

    gedgraph(temp.path())
        .arg("descendants")
        .arg(fixture())
        .arg("I1")
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Descendant chart generated:"))
        .stdout(predicate::str::contains("Generations: 3"));

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph Descendants {"));
    assert!(dot.contains("\"I5\" -> \"I8\";"));
}

#[test]
fn relationship_between_siblings() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("rel.dot");

    gedgraph(temp.path())
        .arg("relationship")
        .arg(fixture())
        .args(["@I7@", "@I8@", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Relationship: Siblings"))
        .stdout(predicate::str::contains("Path length: 2 steps"))
        .stdout(predicate::str::contains("Generation distance: 0"))
        .stdout(predicate::str::contains("Note: 2 equally short paths found"));

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph Relationship {"));
    assert!(dot.contains("fillcolor=lightcoral"));
    assert!(dot.contains("// Path length: 2 steps"));
    // The father's line ranks first.
    assert!(dot.contains("\"I5\" -> \"I7\";"));
    assert!(dot.contains("\"I5\" -> \"I6\" [dir=none, style=solid, constraint=false];"));
}

#[test]
fn relationship_across_generations() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("rel.dot");

    gedgraph(temp.path())
        .arg("relationship")
        .arg(fixture())
        .args(["I1", "I7", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Path length: 3 steps"))
        .stdout(predicate::str::contains("Generation distance: 3"))
        .stdout(predicate::str::contains("Great-grandchild"));
}

#[test]
fn relationship_json_lists_ranked_paths() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("rel.dot");

    let output = gedgraph(temp.path())
        .arg("relationship")
        .arg(fixture())
        .args(["I7", "I8", "--json", "-o"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["relationship"], "Siblings");
    assert_eq!(body["length"], 2);
    assert_eq!(body["paths"].as_array().unwrap().len(), 2);
    assert_eq!(body["paths"][0]["steps"][0]["to"], "I5");
    assert_eq!(body["paths"][1]["steps"][0]["lineage"], "female");
    assert!(out.exists());
}

#[test]
fn unrelated_individuals_fail() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("rel.dot");

    gedgraph(temp.path())
        .arg("relationship")
        .arg(fixture())
        .args(["@I7@", "@I10@", "-o"])
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "No relationship found between @I7@ and @I10@",
        ))
        .stderr(predicate::str::contains("Peter Stranger"));

    assert!(!out.exists());
}

#[test]
fn unknown_individual_fails() {
    let temp = tempdir().unwrap();

    gedgraph(temp.path())
        .arg("pedigree")
        .arg(fixture())
        .args(["@I99@", "-o", "out.dot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("Individual @I99@ not found"));
}

#[test]
fn missing_gedcom_fails() {
    let temp = tempdir().unwrap();

    gedgraph(temp.path())
        .args(["pedigree", "missing.ged", "I1", "-o", "out.dot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEDCOM file not found"));
}

#[test]
fn malformed_gedcom_fails() {
    let temp = tempdir().unwrap();
    let ged = temp.path().join("bad.ged");
    fs::write(&ged, "0 HEAD\n2 SOUR X\n").unwrap();

    gedgraph(temp.path())
        .arg("info")
        .arg(&ged)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed GEDCOM at line 2"));
}

#[test]
fn info_shows_counts() {
    let temp = tempdir().unwrap();

    gedgraph(temp.path())
        .arg("info")
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Individuals: 9\n"))
        .stdout(predicate::str::contains("Families: 3\n"))
        .stdout(predicate::str::contains("Parent links: 8\n"));
}

#[test]
fn non_utf8_gedcom_is_decoded() {
    let temp = tempdir().unwrap();
    let ged = temp.path().join("latin1.ged");
    fs::write(
        &ged,
        b"0 HEAD\n1 CHAR ANSI\n0 @I1@ INDI\n1 NAME Ren\xe9 /Dub\xe9/\n0 @I2@ INDI\n1 NAME Zo\xe9 /Dub\xe9/\n0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I2@\n0 TRLR\n",
    )
    .unwrap();

    gedgraph(temp.path())
        .arg("relationship")
        .arg(&ged)
        .args(["I2", "I1", "-o", "out.dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("From: Zoé Dubé (@I2@)"))
        .stdout(predicate::str::contains("Relationship: Parent"));
}

#[test]
fn config_file_sets_defaults() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(".gedgraph.json"), r#"{"generations": 1}"#).unwrap();

    gedgraph(temp.path())
        .arg("pedigree")
        .arg(fixture())
        .args(["I7", "-o", "out.dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generations: 1"))
        .stdout(predicate::str::contains("Ancestors: 2"));

    // Flags win over the config file.
    gedgraph(temp.path())
        .arg("pedigree")
        .arg(fixture())
        .args(["I7", "-g", "3", "-o", "out.dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generations: 3"));
}
