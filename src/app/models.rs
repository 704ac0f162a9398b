use std::fmt;
use std::path::{Component, Path, PathBuf};

/// One filesystem mutation, with its path already prefixed and relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    CreateDir { path: PathBuf },
    CreateFile { path: PathBuf, content: String },
}

impl PlannedAction {
    pub fn path(&self) -> &Path {
        match self {
            PlannedAction::CreateDir { path } | PlannedAction::CreateFile { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, PlannedAction::CreateDir { .. })
    }

    /// Checks the path is a non-empty relative path made only of plain names.
    pub fn check_well_formed(&self) -> Result<(), String> {
        let path = self.path();
        if path.as_os_str().is_empty() {
            return Err("empty path".to_string());
        }
        for component in path.components() {
            if !matches!(component, Component::Normal(_)) {
                return Err(format!("path {} is not a plain relative path", path.display()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedAction::CreateDir { path } => write!(f, "Create directory {}", path.display()),
            PlannedAction::CreateFile { path, .. } => write!(f, "Create file {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyExists,
    Declined,
    ParentNotCreated,
}

/// Result of handing one action to an execution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    WouldCreate,
    Skipped(SkipReason),
    Failed(String),
}

impl Outcome {
    /// Whether the target can be relied on by later actions nested under it.
    pub fn leaves_target_usable(&self) -> bool {
        matches!(
            self,
            Outcome::Created | Outcome::WouldCreate | Outcome::Skipped(SkipReason::AlreadyExists)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub action: PlannedAction,
    pub outcome: Outcome,
}

/// Terminal state of one `create_structure` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Completed,
    Aborted,
    Fatal { path: PathBuf, error: String },
}

/// Counts by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub would_create: usize,
    pub already_present: usize,
    pub declined: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<ActionReport>,
    pub state: RunState,
    pub tree: StructureTree,
}

impl RunSummary {
    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for report in &self.reports {
            match report.outcome {
                Outcome::Created => tally.created += 1,
                Outcome::WouldCreate => tally.would_create += 1,
                Outcome::Skipped(SkipReason::AlreadyExists) => tally.already_present += 1,
                Outcome::Skipped(_) => tally.declined += 1,
                Outcome::Failed(_) => tally.failed += 1,
            }
        }
        tally
    }

    pub fn outcome_for(&self, path: &Path) -> Option<&Outcome> {
        self.reports
            .iter()
            .find(|report| report.action.path() == path)
            .map(|report| &report.outcome)
    }
}

/// Resolved (post-prefix) tree handed to the navigation generator.
/// Paths are `/`-joined and relative to the documentation directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureTree {
    pub docs_dir: String,
    pub top_level_files: Vec<TreeFile>,
    pub directories: Vec<TreeDirectory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub name: String,
    pub path: String,
}

impl TreeFile {
    /// Prefixed name as it appears on disk.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeDirectory {
    pub name: String,
    pub path: String,
    pub files: Vec<TreeFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_parent_and_absolute_paths() {
        let parent = PlannedAction::CreateDir {
            path: PathBuf::from("docs/../escape"),
        };
        assert!(parent.check_well_formed().is_err());

        let absolute = PlannedAction::CreateFile {
            path: PathBuf::from("/etc/passwd"),
            content: String::new(),
        };
        assert!(absolute.check_well_formed().is_err());

        let ok = PlannedAction::CreateFile {
            path: PathBuf::from("docs/010_index.md"),
            content: String::new(),
        };
        assert!(ok.check_well_formed().is_ok());
    }

    #[test]
    fn tally_groups_skips() {
        let file = |name: &str, outcome| ActionReport {
            action: PlannedAction::CreateFile {
                path: PathBuf::from(name),
                content: String::new(),
            },
            outcome,
        };
        let summary = RunSummary {
            reports: vec![
                file("a.md", Outcome::Created),
                file("b.md", Outcome::Skipped(SkipReason::AlreadyExists)),
                file("c.md", Outcome::Skipped(SkipReason::Declined)),
                file("d.md", Outcome::Failed("boom".into())),
            ],
            state: RunState::Completed,
            tree: StructureTree::default(),
        };
        let tally = summary.tally();
        assert_eq!(tally.created, 1);
        assert_eq!(tally.already_present, 1);
        assert_eq!(tally.declined, 1);
        assert_eq!(tally.failed, 1);
        assert_eq!(
            summary.outcome_for(Path::new("c.md")),
            Some(&Outcome::Skipped(SkipReason::Declined))
        );
    }
}
