use crate::app::models::{RunState, RunSummary, StructureTree};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-]").expect("Invalid regex pattern"));
static REPEATED_DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("Invalid regex pattern"));

/// Normalises a file name: lowercase, spaces to dashes, anything outside
/// `[a-z0-9-]` dropped, dash runs collapsed and trimmed. The extension is kept.
pub fn sanitize(file_name: &str) -> String {
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (file_name, String::new()),
    };
    let lowered = stem.to_lowercase().replace(' ', "-");
    let cleaned = DISALLOWED_CHARS.replace_all(&lowered, "");
    let collapsed = REPEATED_DASHES.replace_all(&cleaned, "-");
    format!("{}{}", collapsed.trim_matches('-'), ext)
}

/// Turns a file or directory name into a heading: `getting-started.md` → `Getting Started`.
pub fn to_title(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    humanize(stem)
}

/// Title-cases a bare stem, treating `-`, `_` and whitespace as word breaks.
pub fn humanize(stem: &str) -> String {
    stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Markdown stub for a new file, or empty content when headings are off or the file is not markdown.
pub fn initial_content(file_name: &str, use_markdown_headings: bool) -> String {
    let is_markdown = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == "md");
    if use_markdown_headings && is_markdown {
        format!("# {}\n", to_title(file_name))
    } else {
        String::new()
    }
}

pub struct OutputGenerator;

impl OutputGenerator {
    /// Indented listing of the resolved tree, directories marked with a trailing `/`.
    pub fn generate_tree(tree: &StructureTree) -> String {
        let mut output = String::new();
        let (root, indent) = if tree.docs_dir == "." {
            (None, "")
        } else {
            (Some(tree.docs_dir.as_str()), "    ")
        };

        if let Some(root) = root {
            output.push_str(&format!("{}/\n", root));
        }
        for file in &tree.top_level_files {
            output.push_str(&format!("{}{}\n", indent, file.file_name()));
        }
        for dir in &tree.directories {
            output.push_str(&format!("{}{}/\n", indent, dir.path));
            for file in &dir.files {
                output.push_str(&format!("{}    {}\n", indent, file.file_name()));
            }
        }

        output.trim_end().to_string()
    }

    pub fn format_summary(summary: &RunSummary) -> String {
        let tally = summary.tally();
        let mut counts = Vec::new();
        if tally.created > 0 {
            counts.push(format!("{} created", tally.created));
        }
        if tally.would_create > 0 {
            counts.push(format!("{} would be created", tally.would_create));
        }
        if tally.already_present > 0 {
            counts.push(format!("{} already present", tally.already_present));
        }
        if tally.declined > 0 {
            counts.push(format!("{} skipped", tally.declined));
        }
        if tally.failed > 0 {
            counts.push(format!("{} failed", tally.failed));
        }
        if counts.is_empty() {
            counts.push("nothing to do".to_string());
        }

        let state = match &summary.state {
            RunState::Completed => "completed".to_string(),
            RunState::Aborted => "aborted by user".to_string(),
            RunState::Fatal { path, error } => {
                format!("stopped at {}: {}", path.display(), error)
            }
        };

        format!("Summary: {} ({})", counts.join(", "), state)
    }
}
