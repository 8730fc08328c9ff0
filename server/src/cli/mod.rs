// server/src/cli/mod.rs

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod serializers;

pub use cli::{execute, resolve_config, run, start_cli};
pub use commands::{AssessmentAction, CliArgs, Commands, PatientAction};
pub use serializers::{AssessmentResponse, DeleteResponse, PatientResponse};
