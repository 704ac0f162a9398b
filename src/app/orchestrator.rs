use crate::app::config::StructureConfig;
use crate::app::models::{ActionReport, Outcome, PlannedAction, RunState, RunSummary, SkipReason};
use crate::app::planner::{self, Plan};
use crate::app::strategy::{ApplyError, ExecutionStrategy};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("Failed to get current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Plans the structure for `config` and feeds every action to `strategy`.
///
/// `base_path` defaults to the current directory. Skipped and failed actions
/// are recorded in the summary; only a user abort or a fatal filesystem error
/// ends the run early.
pub fn create_structure(
    config: &StructureConfig,
    strategy: &mut dyn ExecutionStrategy,
    base_path: Option<&Path>,
) -> Result<RunSummary, StructureError> {
    let base = match base_path {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().map_err(StructureError::CurrentDir)?,
    };

    let plan = planner::plan(config);
    log::debug!(
        "Planned {} actions under {}",
        plan.actions.len(),
        base.join(config.docs_dir()).display()
    );

    if !base.is_dir() {
        log::error!("Base path {} is not a directory", base.display());
        return Ok(RunSummary {
            reports: Vec::new(),
            state: RunState::Fatal {
                path: base,
                error: "base path does not exist or is not a directory".to_string(),
            },
            tree: plan.tree,
        });
    }

    Ok(execute(plan, strategy, &base))
}

/// Applies planned actions strictly in order.
pub fn execute(plan: Plan, strategy: &mut dyn ExecutionStrategy, base: &Path) -> RunSummary {
    let mut reports = Vec::with_capacity(plan.actions.len());
    let mut unusable_dirs: Vec<PathBuf> = Vec::new();
    let mut state = RunState::Completed;

    for action in plan.actions {
        if unusable_dirs.iter().any(|dir| action.path().starts_with(dir)) {
            log::info!("Skipping {} (parent not created)", action.path().display());
            reports.push(ActionReport {
                action,
                outcome: Outcome::Skipped(SkipReason::ParentNotCreated),
            });
            continue;
        }

        match strategy.apply(base, &action) {
            Ok(outcome) => {
                log_outcome(base, &action, &outcome);
                let is_root = plan.root.as_deref() == Some(action.path());

                if let (Outcome::Failed(reason), true) = (&outcome, is_root) {
                    state = RunState::Fatal {
                        path: base.join(action.path()),
                        error: reason.clone(),
                    };
                    reports.push(ActionReport { action, outcome });
                    break;
                }
                if action.is_dir() && !outcome.leaves_target_usable() {
                    unusable_dirs.push(action.path().to_path_buf());
                }
                reports.push(ActionReport { action, outcome });
            }
            Err(ApplyError::Aborted) => {
                log::warn!("Operation cancelled by user");
                state = RunState::Aborted;
                break;
            }
            Err(err) => {
                log::error!("{}", err);
                let path = match &err {
                    ApplyError::Fatal { path, .. } => path.clone(),
                    _ => base.join(action.path()),
                };
                state = RunState::Fatal {
                    path,
                    error: err.to_string(),
                };
                reports.push(ActionReport {
                    action,
                    outcome: Outcome::Failed(err.to_string()),
                });
                break;
            }
        }
    }

    if state == RunState::Completed {
        log::info!("Documentation structure processed in {}", base.display());
    }

    RunSummary {
        reports,
        state,
        tree: plan.tree,
    }
}

fn log_outcome(base: &Path, action: &PlannedAction, outcome: &Outcome) {
    let target = base.join(action.path());
    let kind = if action.is_dir() { "directory" } else { "file" };
    match outcome {
        Outcome::Created => log::info!("Created {}: {}", kind, target.display()),
        Outcome::WouldCreate => log::info!("Would create {}: {}", kind, target.display()),
        Outcome::Skipped(SkipReason::AlreadyExists) => {
            log::info!("Exists, skipping {}: {}", kind, target.display())
        }
        Outcome::Skipped(_) => log::info!("Skipping {}: {}", kind, target.display()),
        Outcome::Failed(reason) => {
            log::warn!("Could not create {} {}: {}", kind, target.display(), reason)
        }
    }
}
