// server/src/cli/commands.rs

// Command-line arguments and subcommands for the SYNAPSS CLI, one
// subcommand per store operation.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "synapss-cli")]
#[command(version)]
#[command(about = "Patient and SYNAPSS assessment store")]
pub struct CliArgs {
    /// YAML config file (defaults to ./synapss_config.yaml when present)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Directory holding the snapshot file
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub data_directory: Option<PathBuf>,
    /// Storage engine: json-file or in-memory
    #[arg(long, global = true)]
    pub engine: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Commands {
    /// Create the store if needed and report where it lives
    Init,
    Patient(PatientCommandWrapper),
    Assessment(AssessmentCommandWrapper),
    /// Empty both collections
    Reset {
        /// Truncate even if the current snapshot cannot be read
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args, PartialEq)]
pub struct PatientCommandWrapper {
    #[command(subcommand)]
    pub command: PatientAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct AssessmentCommandWrapper {
    #[command(subcommand)]
    pub command: AssessmentAction,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum PatientAction {
    /// Add a patient, or update the one with the same id
    Add {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Full patient document as JSON; flags override its fields
        #[arg(long)]
        json: Option<String>,
    },
    Get {
        #[arg(value_name = "PATIENT_ID")]
        id: String,
    },
    List,
    Search {
        #[arg(value_name = "TERM")]
        term: Option<String>,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AssessmentAction {
    Add {
        #[arg(long, short = 'p')]
        patient_id: String,
        /// Scores as JSON: {"Domain": {"Parameter": 0..4}}
        #[arg(long, short = 's')]
        scores: String,
    },
    List {
        #[arg(value_name = "PATIENT_ID")]
        patient_id: String,
    },
    Get {
        #[arg(value_name = "ASSESSMENT_ID")]
        id: String,
    },
    Latest {
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    Delete {
        #[arg(value_name = "ASSESSMENT_ID")]
        id: String,
    },
}
