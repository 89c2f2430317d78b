//! # Schema Command
//!
//! Prints the JSON Schema of the desired-state file.

use anyhow::{Context, Result};
use target_group_registration::resource::RegistrationSpec;

pub fn schema_command() -> Result<()> {
    let schema = schemars::schema_for!(RegistrationSpec);
    let rendered =
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON Schema")?;
    println!("{rendered}");
    Ok(())
}
