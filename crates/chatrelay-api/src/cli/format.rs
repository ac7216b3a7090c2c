//! `chatrelay format`: markdown in, HTML out.

use std::path::Path;

use tokio::io::AsyncReadExt;

use chatrelay_core::format::format_markdown;

/// Read markdown from `file` (or stdin) and print the rendered HTML.
pub async fn format_file(file: Option<&Path>) -> anyhow::Result<()> {
    let markdown = match file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            input
        }
    };

    println!("{}", format_markdown(&markdown));
    Ok(())
}
