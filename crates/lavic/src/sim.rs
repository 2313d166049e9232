// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lavic sim` command implementation.
//!
//! Direct access to the facade operations the MCP tools expose. Results
//! print to stdout as pretty JSON; failures print their payload to stderr.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use lavic_config::LavicConfig;
use lavic_sim::{ControlAction, ListModels, ListScenarios, SimError, SimFacade};
use serde_json::Value;

use crate::error::CliError;

#[derive(Subcommand, Debug)]
pub enum SimCommand {
    /// List simulation scenarios.
    Scenarios {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        /// Fetch every page.
        #[arg(long)]
        all: bool,
        /// Simulation tag filter ("1" for system scenarios).
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Search the model library.
    Models {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        /// Fetch every page.
        #[arg(long)]
        all: bool,
        /// Only model cases.
        #[arg(long)]
        model_case: bool,
        #[arg(long)]
        user: Option<String>,
    },
    /// Start, pause, resume, or stop a scenario.
    Control {
        action: Action,
        simulation_id: String,
        /// Record to act on (defaults to the running record).
        #[arg(long)]
        record: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Download and extract a record's data archive.
    Download {
        record_id: String,
        /// Extraction directory (defaults to <data_dir>/<record_id>).
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Resume,
    Stop,
}

impl From<Action> for ControlAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Start => Self::Start,
            Action::Pause => Self::Pause,
            Action::Resume => Self::Resume,
            Action::Stop => Self::Stop,
        }
    }
}

pub async fn run_sim(config: &LavicConfig, command: SimCommand) -> Result<(), CliError> {
    let facade = SimFacade::from_config(&config.simulation)?;
    let outcome = match command {
        SimCommand::Scenarios {
            page,
            size,
            all,
            tag,
            user,
        } => {
            let params = ListScenarios {
                page,
                size,
                fetch_all: all,
                simulation_tag: tag,
                user_id: user,
            };
            facade.list_scenarios(&params).await
        }
        SimCommand::Models {
            keyword,
            page,
            size,
            all,
            model_case,
            user,
        } => {
            let params = ListModels {
                keyword,
                page,
                size,
                fetch_all: all,
                is_model_case: model_case,
                user_id: user,
            };
            facade.list_models(&params).await
        }
        SimCommand::Control {
            action,
            simulation_id,
            record,
            user,
        } => {
            facade
                .control(
                    action.into(),
                    &simulation_id,
                    record.as_deref(),
                    user.as_deref(),
                )
                .await
        }
        SimCommand::Download {
            record_id,
            output,
            user,
        } => {
            facade
                .download_record_data(&record_id, output.as_deref(), user.as_deref())
                .await
        }
    };
    emit(outcome)
}

fn emit(outcome: Result<Value, SimError>) -> Result<(), CliError> {
    match outcome {
        Ok(value) => {
            println!("{}", to_pretty(&value));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", to_pretty(&e.to_payload()));
            Err(e.into())
        }
    }
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
