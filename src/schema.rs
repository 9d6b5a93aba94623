use schemars::schema_for;

use crate::config::Config;

/// Generate and print the JSON Schema for the config file.
pub fn run() -> anyhow::Result<()> {
    let schema = schema_for!(Config);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}
