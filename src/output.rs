//! Output formatting module

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::types::Recipients;

/// Summary of a generated map, printed after `map` finishes.
#[derive(Debug, Serialize)]
pub struct MapSummary {
    pub output: String,
    pub rows: usize,
    pub groups: usize,
    pub categories: Vec<String>,
    pub checkpoints: usize,
}

pub fn output_map_summary(output_format: OutputFormat, summary: &MapSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(summary)?;
        println!("{}", content);
    } else {
        println!("\nMap Generated");
        println!("=============");
        println!("Output:      {}", summary.output);
        println!("Rows:        {}", summary.rows);
        println!("Points:      {}", summary.groups);
        println!("Categories:  {}", summary.categories.join(", "));
        if summary.checkpoints > 0 {
            println!("Checkpoints: {}", summary.checkpoints);
        }
    }

    Ok(())
}

pub fn output_recipients(output_format: OutputFormat, recipients: &Recipients) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(recipients)?;
        println!("{}", content);
    } else {
        println!("\nRecipients");
        println!("==========");
        if recipients.to.is_empty() {
            println!("TO: (none)");
        } else {
            println!("TO:");
            for addr in &recipients.to {
                println!("  {}", addr);
            }
        }
        if !recipients.cc.is_empty() {
            println!("CC:");
            for addr in &recipients.cc {
                println!("  {}", addr);
            }
        }
    }

    Ok(())
}
