//! # Plan and Apply Commands
//!
//! `plan` compares desired state with the persisted state without touching
//! the load balancer. `apply` refreshes state first, then creates, updates or
//! replaces the registration and persists the result.

use anyhow::{Context, Result};
use std::path::Path;
use target_group_registration::config::ReconcilerConfig;
use target_group_registration::constants::{RESOURCE_DISPLAY_NAME, SERVICE_NAME};
use target_group_registration::controller::reconciler::{plan, Plan, Reconciler};
use target_group_registration::resource::store::load_state;
use target_group_registration::resource::{Member, RegistrationSpec};

/// Load desired state from a YAML or JSON file
pub fn load_spec(path: &Path) -> Result<RegistrationSpec> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read desired state {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse desired state {}", path.display()))
    } else {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse desired state {}", path.display()))
    }
}

pub fn plan_command(config: &ReconcilerConfig, file: &Path, state_path: &Path) -> Result<()> {
    let desired = load_spec(file)?;
    let validated = desired.validate(config.max_targets_per_request)?;
    let prior = load_state(state_path)?;

    print_plan(&plan(&validated, prior.as_ref()));
    Ok(())
}

pub async fn apply_command(reconciler: &Reconciler, file: &Path, state_path: &Path) -> Result<()> {
    let desired = load_spec(file)?;
    let outcome = reconciler.converge(&desired, state_path).await?;
    print_plan(&outcome.plan);

    if outcome.plan.has_changes() {
        println!(
            "✅ {SERVICE_NAME} {RESOURCE_DISPLAY_NAME} {} ({} target(s))",
            outcome.state.id,
            outcome.state.targets.len()
        );
    } else {
        println!("No changes. {SERVICE_NAME} {RESOURCE_DISPLAY_NAME} is up to date.");
    }
    Ok(())
}

fn print_plan(plan: &Plan) {
    println!("Plan: {} {}", plan.action, plan.planned.target_group_arn);
    for member in &plan.to_remove {
        println!("  - {}", describe_member(member));
    }
    for member in &plan.to_add {
        println!("  + {}", describe_member(member));
    }
    if !plan.has_changes() {
        println!("  (no changes)");
    }
}

pub fn describe_member(member: &Member) -> String {
    let port = if member.port.is_unknown() {
        "(known after apply)".to_string()
    } else {
        member
            .port
            .known()
            .map_or_else(|| "-".to_string(), ToString::to_string)
    };
    let zone = member.availability_zone.known().map_or("-", String::as_str);
    format!("{} port={port} zone={zone}", member.target_id)
}
