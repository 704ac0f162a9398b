use crate::app::models::{Outcome, PlannedAction, SkipReason};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("operation cancelled by user")]
    Aborted,
    #[error("cannot create {path}: {source}")]
    Fatal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read confirmation: {0}")]
    Prompt(#[source] io::Error),
}

/// Decides whether and how a planned action touches the filesystem.
///
/// Every variant shares the same existence policy: files are never
/// overwritten, directories are idempotent.
pub trait ExecutionStrategy {
    fn apply(&mut self, base: &Path, action: &PlannedAction) -> Result<Outcome, ApplyError>;
}

/// Strategy selected from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Silent,
    Interactive,
    DryRun,
}

impl Mode {
    pub fn from_flags(dry_run: bool, yes: bool) -> Self {
        if dry_run {
            Mode::DryRun
        } else if yes {
            Mode::Silent
        } else {
            Mode::Interactive
        }
    }

    pub fn build(self) -> Box<dyn ExecutionStrategy> {
        match self {
            Mode::Silent => Box::new(Silent),
            Mode::Interactive => Box::new(Interactive::stdio()),
            Mode::DryRun => Box::new(DryRun),
        }
    }
}

/// Outcome for a target that is already on disk, if any.
fn existing(target: &Path, action: &PlannedAction) -> Option<Outcome> {
    match action {
        PlannedAction::CreateDir { .. } if target.is_dir() => {
            Some(Outcome::Skipped(SkipReason::AlreadyExists))
        }
        PlannedAction::CreateDir { .. } if target.exists() => Some(Outcome::Failed(
            "path exists and is not a directory".to_string(),
        )),
        PlannedAction::CreateFile { .. } if target.is_dir() => Some(Outcome::Failed(
            "path exists and is a directory".to_string(),
        )),
        PlannedAction::CreateFile { .. } if target.exists() => {
            Some(Outcome::Skipped(SkipReason::AlreadyExists))
        }
        _ => None,
    }
}

fn create_dir(target: &Path) -> io::Result<Outcome> {
    match fs::create_dir(target) {
        Ok(()) => Ok(Outcome::Created),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && target.is_dir() => {
            Ok(Outcome::Skipped(SkipReason::AlreadyExists))
        }
        Err(e) => Err(e),
    }
}

fn create_file(target: &Path, content: &str) -> io::Result<Outcome> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(Outcome::Skipped(SkipReason::AlreadyExists))
        }
        Err(e) => return Err(e),
    };
    file.write_all(content.as_bytes())?;
    Ok(Outcome::Created)
}

/// Performs the action and classifies I/O errors: a missing parent only fails
/// this action, anything else stops the run.
fn perform(target: &Path, action: &PlannedAction) -> Result<Outcome, ApplyError> {
    if let Some(outcome) = existing(target, action) {
        return Ok(outcome);
    }
    let result = match action {
        PlannedAction::CreateDir { .. } => create_dir(target),
        PlannedAction::CreateFile { content, .. } => create_file(target, content),
    };
    match result {
        Ok(outcome) => Ok(outcome),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Outcome::Failed(e.to_string())),
        Err(source) => Err(ApplyError::Fatal {
            path: target.to_path_buf(),
            source,
        }),
    }
}

/// Applies every action without asking.
#[derive(Debug, Default)]
pub struct Silent;

impl ExecutionStrategy for Silent {
    fn apply(&mut self, base: &Path, action: &PlannedAction) -> Result<Outcome, ApplyError> {
        perform(&base.join(action.path()), action)
    }
}

/// Reports what would happen. Only reads the filesystem.
#[derive(Debug, Default)]
pub struct DryRun;

impl ExecutionStrategy for DryRun {
    fn apply(&mut self, base: &Path, action: &PlannedAction) -> Result<Outcome, ApplyError> {
        if let Err(reason) = action.check_well_formed() {
            return Ok(Outcome::Failed(reason));
        }
        let target = base.join(action.path());
        if let PlannedAction::CreateFile { content, .. } = action {
            if !content.is_empty() {
                log::debug!("With content:\n{}", content);
            }
        }
        Ok(existing(&target, action).unwrap_or(Outcome::WouldCreate))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
    All,
    Quit,
}

impl Answer {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Answer::Yes),
            "" | "n" | "no" => Some(Answer::No),
            "a" | "all" => Some(Answer::All),
            "q" | "quit" => Some(Answer::Quit),
            _ => None,
        }
    }
}

/// Asks before every mutating action. Blocks on `input` until an answer arrives.
pub struct Interactive<R, W> {
    input: R,
    output: W,
    approve_all: bool,
}

impl Interactive<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Interactive<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            approve_all: false,
        }
    }

    fn ask(&mut self, action: &PlannedAction) -> Result<Answer, ApplyError> {
        loop {
            write!(self.output, "{}? [y]es/[N]o/[a]ll/[q]uit: ", action).map_err(ApplyError::Prompt)?;
            self.output.flush().map_err(ApplyError::Prompt)?;

            let mut line = String::new();
            let read = self.input.read_line(&mut line).map_err(ApplyError::Prompt)?;
            if read == 0 {
                return Ok(Answer::Quit);
            }
            match Answer::parse(&line) {
                Some(answer) => return Ok(answer),
                None => writeln!(self.output, "Please answer y, n, a or q.")
                    .map_err(ApplyError::Prompt)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ExecutionStrategy for Interactive<R, W> {
    fn apply(&mut self, base: &Path, action: &PlannedAction) -> Result<Outcome, ApplyError> {
        let target = base.join(action.path());
        if let Some(outcome) = existing(&target, action) {
            return Ok(outcome);
        }

        if !self.approve_all {
            match self.ask(action)? {
                Answer::Yes => {}
                Answer::All => self.approve_all = true,
                Answer::No => return Ok(Outcome::Skipped(SkipReason::Declined)),
                Answer::Quit => return Err(ApplyError::Aborted),
            }
        }
        perform(&target, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn dir(path: &str) -> PlannedAction {
        PlannedAction::CreateDir { path: path.into() }
    }

    fn file(path: &str, content: &str) -> PlannedAction {
        PlannedAction::CreateFile {
            path: path.into(),
            content: content.into(),
        }
    }

    fn scripted(answers: &str) -> Interactive<Cursor<Vec<u8>>, Vec<u8>> {
        Interactive::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn mode_follows_flags() {
        assert_eq!(Mode::from_flags(true, true), Mode::DryRun);
        assert_eq!(Mode::from_flags(false, true), Mode::Silent);
        assert_eq!(Mode::from_flags(false, false), Mode::Interactive);
    }

    #[test]
    fn silent_creates_and_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let mut strategy = Silent;

        assert_eq!(strategy.apply(tmp.path(), &dir("docs")).unwrap(), Outcome::Created);
        assert_eq!(
            strategy.apply(tmp.path(), &dir("docs")).unwrap(),
            Outcome::Skipped(SkipReason::AlreadyExists)
        );

        let index = file("docs/index.md", "# Index\n");
        assert_eq!(strategy.apply(tmp.path(), &index).unwrap(), Outcome::Created);

        fs::write(tmp.path().join("docs/index.md"), "edited").unwrap();
        assert_eq!(
            strategy.apply(tmp.path(), &index).unwrap(),
            Outcome::Skipped(SkipReason::AlreadyExists)
        );
        assert_eq!(fs::read_to_string(tmp.path().join("docs/index.md")).unwrap(), "edited");
    }

    #[test]
    fn silent_fails_softly_when_parent_is_missing() {
        let tmp = TempDir::new().unwrap();
        let outcome = Silent.apply(tmp.path(), &file("missing/a.md", "")).unwrap();
        assert!(matches!(outcome, Outcome::Failed(_)));
    }

    #[test]
    fn silent_reports_file_in_place_of_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("docs"), "").unwrap();
        let outcome = Silent.apply(tmp.path(), &dir("docs")).unwrap();
        assert!(matches!(outcome, Outcome::Failed(_)));
    }

    #[test]
    fn silent_reports_directory_in_place_of_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("index.md")).unwrap();
        let action = file("index.md", "# Index\n");

        let expected = Outcome::Failed("path exists and is a directory".to_string());
        assert_eq!(Silent.apply(tmp.path(), &action).unwrap(), expected);
        assert_eq!(DryRun.apply(tmp.path(), &action).unwrap(), expected);
        assert!(tmp.path().join("index.md").is_dir());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut strategy = DryRun;

        assert_eq!(strategy.apply(tmp.path(), &dir("docs")).unwrap(), Outcome::WouldCreate);
        assert_eq!(
            strategy.apply(tmp.path(), &file("docs/index.md", "# Index\n")).unwrap(),
            Outcome::WouldCreate
        );
        assert!(!tmp.path().join("docs").exists());
    }

    #[test]
    fn dry_run_rejects_malformed_actions() {
        let tmp = TempDir::new().unwrap();
        let outcome = DryRun.apply(tmp.path(), &file("../outside.md", "")).unwrap();
        assert!(matches!(outcome, Outcome::Failed(_)));
    }

    #[test]
    fn interactive_decline_skips_only_that_action() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        let mut strategy = scripted("n\ny\n");

        assert_eq!(
            strategy.apply(tmp.path(), &file("docs/a.md", "")).unwrap(),
            Outcome::Skipped(SkipReason::Declined)
        );
        assert_eq!(
            strategy.apply(tmp.path(), &file("docs/b.md", "")).unwrap(),
            Outcome::Created
        );
        assert!(!tmp.path().join("docs/a.md").exists());
        assert!(tmp.path().join("docs/b.md").exists());
    }

    #[test]
    fn interactive_does_not_ask_about_existing_targets() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        let mut strategy = scripted("");

        assert_eq!(
            strategy.apply(tmp.path(), &dir("docs")).unwrap(),
            Outcome::Skipped(SkipReason::AlreadyExists)
        );
        assert!(strategy.output.is_empty());
    }

    #[test]
    fn interactive_all_stops_asking() {
        let tmp = TempDir::new().unwrap();
        let mut strategy = scripted("a\n");

        assert_eq!(strategy.apply(tmp.path(), &dir("docs")).unwrap(), Outcome::Created);
        assert_eq!(
            strategy.apply(tmp.path(), &file("docs/a.md", "")).unwrap(),
            Outcome::Created
        );
    }

    #[test]
    fn interactive_quit_and_eof_abort() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            scripted("q\n").apply(tmp.path(), &dir("docs")),
            Err(ApplyError::Aborted)
        ));
        assert!(matches!(
            scripted("").apply(tmp.path(), &dir("docs")),
            Err(ApplyError::Aborted)
        ));
        assert!(!tmp.path().join("docs").exists());
    }

    #[test]
    fn interactive_reasks_on_unknown_input() {
        let tmp = TempDir::new().unwrap();
        let mut strategy = scripted("maybe\nyes\n");

        assert_eq!(strategy.apply(tmp.path(), &dir("docs")).unwrap(), Outcome::Created);
        let prompt = String::from_utf8(strategy.output).unwrap();
        assert!(prompt.contains("Please answer y, n, a or q."));
        assert!(prompt.contains("Create directory docs?"));
    }
}
