use crate::app::config::StructureConfig;
use crate::app::formatter::{initial_content, sanitize};
use crate::app::models::{PlannedAction, StructureTree, TreeDirectory, TreeFile};
use crate::app::prefix::Role;
use std::path::PathBuf;

/// Ordered actions for one run plus the resolved tree they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// The documentation root, when it is a directory of its own.
    pub root: Option<PathBuf>,
    pub actions: Vec<PlannedAction>,
    pub tree: StructureTree,
}

/// Expands a configuration into filesystem actions. Performs no I/O.
///
/// Order: the docs root (unless it is the project root), top-level files, then
/// each directory followed by its files, all in declaration order. File names
/// are sanitised before prefixing; directory names are used as written.
pub fn plan(config: &StructureConfig) -> Plan {
    let numbering = config.numbering();
    let headings = config.use_markdown_headings();

    let root = (!config.is_project_root()).then(|| PathBuf::from(config.docs_dir()));
    let base = root.clone().unwrap_or_default();

    let mut actions = Vec::new();
    let mut tree = StructureTree {
        docs_dir: config.docs_dir().to_string(),
        ..StructureTree::default()
    };

    if let Some(root) = &root {
        actions.push(PlannedAction::CreateDir { path: root.clone() });
    }

    for (index, name) in config.top_level_files().iter().enumerate() {
        let name = sanitize(name);
        let file_name = numbering.apply(Role::TopLevelFile, index, &name);
        actions.push(PlannedAction::CreateFile {
            path: base.join(&file_name),
            content: initial_content(&name, headings),
        });
        tree.top_level_files.push(TreeFile {
            name,
            path: file_name,
        });
    }

    for (index, (dir_name, files)) in config.directories().iter().enumerate() {
        let prefixed_dir = numbering.apply(Role::Directory, index, dir_name);
        let dir_path = base.join(&prefixed_dir);
        actions.push(PlannedAction::CreateDir {
            path: dir_path.clone(),
        });

        let mut entry = TreeDirectory {
            name: dir_name.clone(),
            path: prefixed_dir.clone(),
            files: Vec::with_capacity(files.len()),
        };
        for (file_index, name) in files.iter().enumerate() {
            let name = sanitize(name);
            let file_name = numbering.apply(Role::NestedFile, file_index, &name);
            actions.push(PlannedAction::CreateFile {
                path: dir_path.join(&file_name),
                content: initial_content(&name, headings),
            });
            entry.files.push(TreeFile {
                name,
                path: format!("{}/{}", prefixed_dir, file_name),
            });
        }
        tree.directories.push(entry);
    }

    Plan {
        root,
        actions,
        tree,
    }
}
