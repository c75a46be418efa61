//! Keynote comparison between two or three remedies

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::remedy::RemedyRecord;

/// An item to compare: a full record, or a bare remedy name with no keynotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompareItem {
    Name(String),
    Record(RemedyRecord),
}

impl CompareItem {
    /// Trimmed, lowercased keynotes without duplicates, in first-seen order
    pub fn keynote_set(&self) -> Vec<String> {
        match self {
            CompareItem::Name(_) => Vec::new(),
            CompareItem::Record(record) => dedup_normalized(record.effective_keynotes()),
        }
    }
}

impl From<RemedyRecord> for CompareItem {
    fn from(record: RemedyRecord) -> Self {
        CompareItem::Record(record)
    }
}

impl From<&str> for CompareItem {
    fn from(name: &str) -> Self {
        CompareItem::Name(name.to_string())
    }
}

/// Shared keynotes and the keynotes unique to each item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareDiff {
    pub shared: Vec<String>,
    pub unique: Vec<Vec<String>>,
}

fn dedup_normalized(keynotes: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keynotes
        .into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect()
}

fn contains(set: &[String], keynote: &str) -> bool {
    set.iter().any(|k| k == keynote)
}

/// Computes shared and unique keynotes for 2 or 3 items.
///
/// Any other number of items yields no shared keynotes and each item's set verbatim.
pub fn compute_compare_diff(items: &[CompareItem]) -> CompareDiff {
    let sets: Vec<Vec<String>> = items.iter().map(CompareItem::keynote_set).collect();

    match sets.len() {
        2 => {
            let (a, b) = (&sets[0], &sets[1]);

            CompareDiff {
                shared: a.iter().filter(|k| contains(b, k)).cloned().collect(),
                unique: vec![
                    a.iter().filter(|k| !contains(b, k)).cloned().collect(),
                    b.iter().filter(|k| !contains(a, k)).cloned().collect(),
                ],
            }
        }
        3 => {
            let (a, b, c) = (&sets[0], &sets[1], &sets[2]);
            let unique_to = |own: &[String], x: &[String], y: &[String]| -> Vec<String> {
                own.iter()
                    .filter(|k| !contains(x, k) && !contains(y, k))
                    .cloned()
                    .collect()
            };

            CompareDiff {
                shared: a
                    .iter()
                    .filter(|k| contains(b, k) && contains(c, k))
                    .cloned()
                    .collect(),
                unique: vec![
                    unique_to(a.as_slice(), b.as_slice(), c.as_slice()),
                    unique_to(b.as_slice(), a.as_slice(), c.as_slice()),
                    unique_to(c.as_slice(), a.as_slice(), b.as_slice()),
                ],
            }
        }
        _ => CompareDiff {
            shared: Vec::new(),
            unique: sets,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, keynotes: &[&str]) -> CompareItem {
        RemedyRecord::named(name)
            .with_keynotes(keynotes.iter().copied())
            .into()
    }

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_two_items() {
        let diff = compute_compare_diff(&[item("A", &["x", "y"]), item("B", &["y", "z"])]);

        assert_eq!(diff.shared, vec!["y"]);
        assert_eq!(diff.unique, vec![vec!["x"], vec!["z"]]);
    }

    #[test]
    fn test_two_items_symmetry() {
        let a = item("A", &["Anxiety", "chilly", "thirst"]);
        let b = item("B", &["anxiety ", "thirst", "heat"]);

        let ab = compute_compare_diff(&[a.clone(), b.clone()]);
        let ba = compute_compare_diff(&[b, a]);

        let shared_ab: HashSet<_> = ab.shared.into_iter().collect();
        let shared_ba: HashSet<_> = ba.shared.into_iter().collect();
        assert_eq!(shared_ab, shared_ba);
        assert_eq!(shared_ab, set(&["anxiety", "thirst"]));
        assert_eq!(ab.unique[0], vec!["chilly"]);
        assert_eq!(ab.unique[1], vec!["heat"]);
    }

    #[test]
    fn test_three_items() {
        let a = item("A", &["x", "y", "w"]);
        let b = item("B", &["y", "z", "w"]);
        let c = item("C", &["y", "q"]);

        let diff = compute_compare_diff(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(diff.shared, vec!["y"]);
        assert_eq!(diff.unique, vec![vec!["x"], vec!["z"], vec!["q"]]);

        let shared_abc = set(&diff.shared.iter().map(String::as_str).collect::<Vec<_>>());
        let shared_ab: HashSet<_> = compute_compare_diff(&[a.clone(), b]).shared.into_iter().collect();
        let shared_ac: HashSet<_> = compute_compare_diff(&[a, c]).shared.into_iter().collect();
        assert!(shared_abc.is_subset(&shared_ab));
        assert!(shared_abc.is_subset(&shared_ac));
    }

    #[test]
    fn test_bare_names_have_empty_sets() {
        let diff = compute_compare_diff(&["Sulphur".into(), item("B", &["itch"])]);

        assert!(diff.shared.is_empty());
        assert_eq!(diff.unique, vec![Vec::<String>::new(), vec!["itch".to_string()]]);
    }

    #[test]
    fn test_other_counts_return_sets_verbatim() {
        let single = compute_compare_diff(&[item("A", &["X", "x", "y"])]);
        assert!(single.shared.is_empty());
        assert_eq!(single.unique, vec![vec!["x", "y"]]);

        let four = compute_compare_diff(&[
            item("A", &["x"]),
            item("B", &["x"]),
            item("C", &["x"]),
            item("D", &["x"]),
        ]);
        assert!(four.shared.is_empty());
        assert_eq!(four.unique.len(), 4);

        assert_eq!(compute_compare_diff(&[]), CompareDiff::default());
    }

    #[test]
    fn test_summary_keynotes_used() {
        let a: CompareItem = RemedyRecord::named("A").with_summary("Grief. Sighing.").into();
        let diff = compute_compare_diff(&[a, item("B", &["grief"])]);

        assert_eq!(diff.shared, vec!["grief"]);
        assert_eq!(diff.unique[0], vec!["sighing"]);
    }

    #[test]
    fn test_compare_item_deserializes_name_or_record() {
        let items: Vec<CompareItem> =
            serde_json::from_value(serde_json::json!(["Sepia", {"remedy": "B", "keynotes": ["x"]}]))
                .unwrap();

        assert_eq!(items[0], CompareItem::Name("Sepia".into()));
        assert_eq!(items[1].keynote_set(), vec!["x"]);
    }
}
