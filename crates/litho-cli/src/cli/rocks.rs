//! Rocks command implementation.

use clap::Args;
use serde::Serialize;

use litho::Rock;

#[derive(Debug, Args)]
pub struct RocksArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct RockEntry {
    name: &'static str,
    survey_name: &'static str,
    fill: String,
}

/// Execute the rocks command.
pub fn cmd_rocks(args: &RocksArgs) -> Result<(), String> {
    let entries: Vec<RockEntry> = Rock::all()
        .iter()
        .map(|rock| RockEntry {
            name: rock.name(),
            survey_name: rock.survey_name(),
            fill: rock.fill_kind().describe(),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to encode JSON: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    println!("Available rocks:");
    for entry in &entries {
        println!("  {:<20} {:<24} {}", entry.name, entry.survey_name, entry.fill);
    }
    Ok(())
}
