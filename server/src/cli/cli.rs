// server/src/cli/cli.rs

// CLI entry point: resolves configuration, honours CLEAR_DB, then dispatches
// the parsed subcommand to the boundary handlers and prints the JSON result.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use serde_json::{json, Value};
use std::sync::Arc;

use models::{AssessmentInput, PatientInput};
use synapss_lib::{Database, StartupFlags, StorageEngineType, StoreConfig};

use crate::cli::commands::{AssessmentAction, CliArgs, Commands, PatientAction};
use crate::cli::handlers;

pub async fn start_cli() -> Result<()> {
    let args = CliArgs::parse();
    let flags = StartupFlags::from_env();
    let config = resolve_config(&args).await?;
    debug!("Resolved store configuration: {:?}", config);

    let db = Arc::new(Database::from_config(&config));
    info!(
        "Using {} storage at {}",
        db.storage().engine_type(),
        db.storage().location()
    );
    let output = run(&db, &config, args.command, flags).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// With `CLEAR_DB` armed the store is force-reset and `command` never runs;
/// otherwise the command is executed normally.
pub async fn run(db: &Database, config: &StoreConfig, command: Commands, flags: StartupFlags) -> Result<Value> {
    if flags.clear_db {
        info!("CLEAR_DB=true: force-resetting local database...");
        let outcome = handlers::force_reset_database(db).await;
        if outcome.success {
            info!("Local database reset complete, exiting");
        }
        return Ok(serde_json::to_value(outcome)?);
    }
    execute(db, config, command).await
}

/// File config and environment first, then command-line flags on top.
pub async fn resolve_config(args: &CliArgs) -> Result<StoreConfig> {
    let mut config = StoreConfig::load(args.config.as_deref()).await?;
    if let Some(dir) = &args.data_directory {
        config.data_directory = dir.clone();
    }
    if let Some(engine) = &args.engine {
        config.storage_engine_type = engine.parse::<StorageEngineType>()?;
    }
    Ok(config.validate()?)
}

pub async fn execute(db: &Database, config: &StoreConfig, command: Commands) -> Result<Value> {
    // Every command runs against an initialized store, as the desktop app does at launch.
    let init = handlers::init_database(db).await;

    let value = match command {
        Commands::Init => serde_json::to_value(init)?,
        Commands::Patient(wrapper) => match wrapper.command {
            PatientAction::Add { id, name, age, gender, notes, json } => {
                let input = patient_input(id, name, age, gender, notes, json.as_deref())?;
                serde_json::to_value(handlers::save_patient(db, input).await)?
            }
            PatientAction::Get { id } => serde_json::to_value(handlers::get_patient(db, &id).await)?,
            PatientAction::List => serde_json::to_value(handlers::get_patients(db).await)?,
            PatientAction::Search { term } => {
                let term = term.unwrap_or_default();
                serde_json::to_value(handlers::search_patients(db, &term).await)?
            }
        },
        Commands::Assessment(wrapper) => match wrapper.command {
            AssessmentAction::Add { patient_id, scores } => {
                let input = assessment_input(&patient_id, &scores)?;
                serde_json::to_value(handlers::save_assessment(db, input).await)?
            }
            AssessmentAction::List { patient_id } => {
                serde_json::to_value(handlers::get_assessments(db, &patient_id).await)?
            }
            AssessmentAction::Get { id } => serde_json::to_value(handlers::get_assessment(db, &id).await)?,
            AssessmentAction::Latest { limit } => {
                let limit = limit.unwrap_or(config.default_latest_limit);
                serde_json::to_value(handlers::get_latest_assessments(db, limit).await)?
            }
            AssessmentAction::Delete { id } => {
                serde_json::to_value(handlers::delete_assessment(db, &id).await)?
            }
        },
        Commands::Reset { force } => {
            let outcome = if force {
                handlers::force_reset_database(db).await
            } else {
                handlers::reset_database(db).await
            };
            serde_json::to_value(outcome)?
        }
    };
    Ok(value)
}

/// Builds a patient input from an optional JSON document with the individual
/// flags laid over it.
fn patient_input(
    id: Option<String>,
    name: Option<String>,
    age: Option<String>,
    gender: Option<String>,
    notes: Option<String>,
    json: Option<&str>,
) -> Result<PatientInput> {
    let mut input = match json {
        Some(raw) => serde_json::from_str::<PatientInput>(raw).context("Invalid patient JSON")?,
        None => PatientInput::default(),
    };
    if id.is_some() {
        input.patient_id = id;
    }
    if name.is_some() {
        input.name = name;
    }
    if age.is_some() {
        input.age = age;
    }
    if gender.is_some() {
        input.gender = gender;
    }
    if notes.is_some() {
        input.notes = notes;
    }
    Ok(input)
}

fn assessment_input(patient_id: &str, scores: &str) -> Result<AssessmentInput> {
    let scores: Value = serde_json::from_str(scores).context("Scores must be valid JSON")?;
    let input = serde_json::from_value(json!({ "patient_id": patient_id, "scores": scores }))
        .context("Scores must map domains to parameter scores")?;
    Ok(input)
}
