//! Human-readable kinship labels.
//!
//! A label says what the end of a path is to its start. Blood relatives
//! are joined by a path that climbs to a common ancestor and then descends,
//! so the label follows from the number of steps up and down. Any other
//! shape passes through a partner.

use crate::edge::Direction;
use crate::path::RelationshipPath;

/// Describes the relationship a path represents.
pub fn describe(path: &RelationshipPath) -> String {
    if path.is_empty() {
        return "Same individual".to_string();
    }

    let Some((up, down)) = climb_and_descend(path) else {
        let directions: Vec<Direction> = path.steps.iter().map(|s| s.direction).collect();
        if directions == [Direction::Child, Direction::Parent] {
            return "Co-parents".to_string();
        }
        return format!("Related by marriage ({} steps)", path.length());
    };

    let label = match (up, down) {
        (0, d) => lineal(d, "child"),
        (u, 0) => lineal(u, "parent"),
        (1, 1) => "siblings".to_string(),
        (1, 2) => "niece or nephew".to_string(),
        (1, d) => {
            let prefix = greats(d - 3);
            format!("{prefix}grandniece or {prefix}grandnephew")
        }
        (2, 1) => "aunt or uncle".to_string(),
        (u, 1) => {
            let prefix = greats(u - 2);
            format!("{prefix}aunt or {prefix}uncle")
        }
        (u, d) => cousins(u.min(d) - 1, u.abs_diff(d)),
    };

    let collateral = up > 0 && down > 0;
    if collateral && !path.is_full_blood() {
        capitalize(&format!("half {}", label))
    } else {
        capitalize(&label)
    }
}

/// Steps up then steps down, or None if the path turns upward again.
fn climb_and_descend(path: &RelationshipPath) -> Option<(usize, usize)> {
    let up = path.steps.iter().take_while(|s| s.is_parent()).count();
    let rest = &path.steps[up..];
    if rest.iter().any(|s| s.is_parent()) {
        return None;
    }
    Some((up, rest.len()))
}

/// Parent, grandparent, great-grandparent, 2nd great-grandparent, ...
fn lineal(generations: usize, noun: &str) -> String {
    match generations {
        1 => noun.to_string(),
        2 => format!("grand{}", noun),
        n => format!("{}grand{}", greats(n - 2), noun),
    }
}

fn greats(n: usize) -> String {
    match n {
        0 => String::new(),
        1 => "great-".to_string(),
        n => format!("{} great-", ordinal(n)),
    }
}

fn cousins(degree: usize, removed: usize) -> String {
    let degree = match degree {
        1 => "first".to_string(),
        2 => "second".to_string(),
        3 => "third".to_string(),
        4 => "fourth".to_string(),
        5 => "fifth".to_string(),
        n => ordinal(n),
    };
    match removed {
        0 => format!("{} cousins", degree),
        1 => format!("{} cousins once removed", degree),
        2 => format!("{} cousins twice removed", degree),
        n => format!("{} cousins {} times removed", degree, n),
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{BloodType, Lineage};
    use crate::path::PathStep;
    use gedgraph_core::Xref;

    fn path(shape: &str) -> RelationshipPath {
        let steps = shape
            .chars()
            .enumerate()
            .map(|(i, c)| PathStep {
                from: Xref::new(&format!("P{}", i)),
                to: Xref::new(&format!("P{}", i + 1)),
                direction: if c == 'u' {
                    Direction::Parent
                } else {
                    Direction::Child
                },
                blood: BloodType::Full,
                lineage: Lineage::Male,
                family: Xref::new("F1"),
            })
            .collect();
        RelationshipPath::new(
            Xref::new("P0"),
            Xref::new(&format!("P{}", shape.len())),
            steps,
        )
    }

    #[test]
    fn test_lineal() {
        assert_eq!(describe(&path("")), "Same individual");
        assert_eq!(describe(&path("u")), "Parent");
        assert_eq!(describe(&path("uu")), "Grandparent");
        assert_eq!(describe(&path("uuu")), "Great-grandparent");
        assert_eq!(describe(&path("uuuu")), "2nd great-grandparent");
        assert_eq!(describe(&path("d")), "Child");
        assert_eq!(describe(&path("ddd")), "Great-grandchild");
    }

    #[test]
    fn test_collateral() {
        assert_eq!(describe(&path("ud")), "Siblings");
        assert_eq!(describe(&path("udd")), "Niece or nephew");
        assert_eq!(describe(&path("uddd")), "Grandniece or grandnephew");
        assert_eq!(describe(&path("uud")), "Aunt or uncle");
        assert_eq!(describe(&path("uuud")), "Great-aunt or great-uncle");
        assert_eq!(describe(&path("uuuud")), "2nd great-aunt or 2nd great-uncle");
        assert_eq!(
            describe(&path("udddd")),
            "Great-grandniece or great-grandnephew"
        );
        assert_eq!(describe(&path("uudd")), "First cousins");
        assert_eq!(describe(&path("uuuddd")), "Second cousins");
        assert_eq!(describe(&path("uuudd")), "First cousins once removed");
        assert_eq!(describe(&path("uuuuddddd")), "Third cousins once removed");
    }

    #[test]
    fn test_half_blood() {
        let mut siblings = path("ud");
        siblings.steps[1].blood = BloodType::Half;
        assert_eq!(describe(&siblings), "Half siblings");

        let mut cousins = path("uudd");
        cousins.steps[2].blood = BloodType::Half;
        assert_eq!(describe(&cousins), "Half first cousins");
    }

    #[test]
    fn test_through_partner() {
        assert_eq!(describe(&path("du")), "Co-parents");
        assert_eq!(describe(&path("udu")), "Related by marriage (3 steps)");
        assert_eq!(describe(&path("duud")), "Related by marriage (4 steps)");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(23), "23rd");
    }
}
