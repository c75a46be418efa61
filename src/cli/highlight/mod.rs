//! Highlight command

use clap::Args;

use crate::domain::highlight::{highlight, query_tokens};

#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// Terms to mark
    #[arg(short, long)]
    pub query: String,

    /// Text to highlight
    pub text: String,
}

pub fn render(args: &HighlightArgs) -> String {
    highlight(Some(args.text.as_str()), &query_tokens(&args.query))
}

pub async fn run(args: HighlightArgs) -> anyhow::Result<()> {
    println!("{}", render(&args));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let args = HighlightArgs {
            query: "burning pains".into(),
            text: "Burning pains relieved by heat".into(),
        };

        assert_eq!(
            render(&args),
            "<mark>Burning</mark> <mark>pains</mark> relieved by heat"
        );
    }
}
