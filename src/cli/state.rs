//! # State Commands
//!
//! Commands that work on the persisted state: `refresh`, `destroy`, `import`
//! and `show`.

use crate::apply::describe_member;
use anyhow::{bail, Context, Result};
use std::path::Path;
use target_group_registration::controller::reconciler::Reconciler;
use target_group_registration::resource::store::{load_state, remove_state, save_state};

pub async fn refresh_command(reconciler: &Reconciler, state_path: &Path) -> Result<()> {
    let Some(prior) = load_state(state_path)? else {
        println!("No state at {}", state_path.display());
        return Ok(());
    };

    match reconciler.read(&prior).await? {
        Some(state) => {
            save_state(state_path, &state)?;
            println!("🔄 Refreshed {} ({} target(s))", state.id, state.targets.len());
        }
        None => {
            remove_state(state_path)?;
            println!("⚠️  Target group {} no longer exists, state removed", prior.id);
        }
    }
    Ok(())
}

pub async fn destroy_command(reconciler: &Reconciler, state_path: &Path) -> Result<()> {
    let Some(prior) = load_state(state_path)? else {
        println!("No state at {}, nothing to destroy", state_path.display());
        return Ok(());
    };

    reconciler.delete(&prior).await?;
    remove_state(state_path)?;
    println!(
        "🗑️  Deregistered {} target(s) from {}",
        prior.targets.len(),
        prior.id
    );
    Ok(())
}

pub async fn import_command(reconciler: &Reconciler, id: &str, state_path: &Path) -> Result<()> {
    if let Some(existing) = load_state(state_path)? {
        bail!(
            "State at {} already holds {}; destroy it or choose another --state path",
            state_path.display(),
            existing.id
        );
    }

    let state = reconciler
        .import(id)
        .await
        .with_context(|| format!("Failed to import {id}"))?;
    save_state(state_path, &state)?;
    println!("📥 Imported {} ({} target(s))", state.id, state.targets.len());
    Ok(())
}

pub fn show_command(state_path: &Path) -> Result<()> {
    let Some(state) = load_state(state_path)? else {
        println!("No state at {}", state_path.display());
        return Ok(());
    };

    println!("Registration: {}", state.id);
    println!("  Target group: {}", state.target_group_arn.name());
    println!("  Region:       {}", state.target_group_arn.region());
    println!("  Targets:");
    if state.targets.is_empty() {
        println!("    (none)");
    }
    for member in state.targets.iter() {
        println!("    {}", describe_member(member));
    }
    Ok(())
}
