//! Compare command - keynote overlap between remedies

use clap::Args;
use futures::future::try_join_all;
use serde::Serialize;

use crate::domain::compare::{compute_compare_diff, CompareDiff, CompareItem};
use crate::domain::lookup::LookupKind;
use crate::domain::remedy::LookupPayload;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Two or three remedy names
    #[arg(required = true, num_args = 2..=3)]
    pub queries: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CompareOutput {
    remedies: Vec<String>,
    #[serde(flatten)]
    diff: CompareDiff,
}

/// The best record for a query, or the bare name when nothing matched
fn compare_item(query: &str, payload: LookupPayload) -> CompareItem {
    match payload.primary() {
        Some(record) => CompareItem::Record(record.clone()),
        None => CompareItem::from(query),
    }
}

fn item_label(item: &CompareItem) -> String {
    match item {
        CompareItem::Name(name) => name.clone(),
        CompareItem::Record(record) => record.name.clone(),
    }
}

pub async fn run(args: CompareArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let (service, source) = super::lookup_context(&config, LookupKind::MateriaMedica).await?;

    let payloads = try_join_all(
        args.queries
            .iter()
            .map(|query| service.fetch_with_cache(query, source.clone())),
    )
    .await?;

    let items: Vec<CompareItem> = args
        .queries
        .iter()
        .zip(payloads)
        .map(|(query, payload)| compare_item(query, payload))
        .collect();

    let output = CompareOutput {
        remedies: items.iter().map(item_label).collect(),
        diff: compute_compare_diff(&items),
    };
    super::print_json(&output)?;

    service.drain_refreshes().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::remedy::RemedyRecord;

    #[test]
    fn test_text_answer_compares_as_name() {
        let item = compare_item("Sepia", LookupPayload::Text("not found".into()));
        assert_eq!(item, CompareItem::Name("Sepia".into()));
        assert!(item.keynote_set().is_empty());
    }

    #[test]
    fn test_first_record_is_used() {
        let payload = LookupPayload::Records(vec![
            RemedyRecord::named("Sepia").with_keynotes(["indifference"]),
            RemedyRecord::named("Sepia succus"),
        ]);

        let item = compare_item("sepia", payload);

        assert_eq!(item_label(&item), "Sepia");
        assert_eq!(item.keynote_set(), vec!["indifference"]);
    }

    #[test]
    fn test_output_shape() {
        let items = vec![
            CompareItem::Record(RemedyRecord::named("A").with_keynotes(["x", "y"])),
            CompareItem::Record(RemedyRecord::named("B").with_keynotes(["y", "z"])),
        ];
        let output = CompareOutput {
            remedies: items.iter().map(item_label).collect(),
            diff: compute_compare_diff(&items),
        };

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "remedies": ["A", "B"],
                "shared": ["y"],
                "unique": [["x"], ["z"]]
            })
        );
    }
}
