//! Lookup command - cached search against the lookup API

use clap::Args;
use serde::Serialize;
use serde_json::Value;

use crate::domain::highlight::{highlight, query_tokens};
use crate::domain::lookup::LookupKind;
use crate::domain::remedy::LookupPayload;

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Remedy name or symptom to search for
    pub query: String,

    /// Search the repertory instead of the materia medica
    #[arg(long)]
    pub repertory: bool,

    /// Include HTML snippets with query terms marked
    #[arg(long)]
    pub highlight: bool,
}

impl LookupArgs {
    pub fn kind(&self) -> LookupKind {
        if self.repertory {
            LookupKind::Repertory
        } else {
            LookupKind::MateriaMedica
        }
    }
}

#[derive(Debug, Serialize)]
struct LookupOutput<'a> {
    query: &'a str,
    kind: LookupKind,
    result: &'a LookupPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlights: Option<Vec<Value>>,
}

/// HTML snippets for each record, or for the text answer
fn highlights(payload: &LookupPayload, query: &str) -> Vec<Value> {
    let tokens = query_tokens(query);

    if let LookupPayload::Text(text) = payload {
        return vec![Value::String(highlight(Some(text.as_str()), &tokens))];
    }

    payload
        .records()
        .iter()
        .map(|record| {
            let keynotes: Vec<String> = record
                .keynotes
                .iter()
                .map(|keynote| highlight(Some(keynote.as_str()), &tokens))
                .collect();

            serde_json::json!({
                "remedy": highlight(Some(record.name.as_str()), &tokens),
                "summary": highlight(record.summary.as_deref(), &tokens),
                "keynotes": keynotes,
            })
        })
        .collect()
}

pub async fn run(args: LookupArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let kind = args.kind();
    let (service, source) = super::lookup_context(&config, kind).await?;

    let payload = service.fetch_with_cache(&args.query, source).await?;

    let output = LookupOutput {
        query: &args.query,
        kind,
        result: &payload,
        highlights: args.highlight.then(|| highlights(&payload, &args.query)),
    };
    super::print_json(&output)?;

    service.drain_refreshes().await;
    Ok(())
}
