use crate::app::config::MkDocsSettings;
use crate::app::formatter::{humanize, to_title};
use crate::app::models::{PlannedAction, StructureTree, TreeFile};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MKDOCS_FILE: &str = "mkdocs.yaml";

/// One `nav` entry: a single-key mapping from title to page or section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub title: String,
    pub target: NavTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NavTarget {
    Page(String),
    Section(Vec<NavItem>),
}

impl Serialize for NavItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.title, &self.target)?;
        map.end()
    }
}

#[derive(Serialize)]
struct MkDocsFile<'a> {
    site_name: &'a str,
    docs_dir: &'a str,
    #[serde(skip_serializing_if = "serde_yaml::Value::is_null")]
    theme: &'a serde_yaml::Value,
    nav: Vec<NavItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    markdown_extensions: Option<&'a serde_yaml::Value>,
}

fn page_title(file: &TreeFile) -> String {
    let stem = Path::new(&file.name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file.name);
    if stem.eq_ignore_ascii_case("index") {
        "Home".to_string()
    } else {
        to_title(&file.name)
    }
}

/// Navigation built from the resolved tree: top-level pages first, then one
/// section per directory, linking to the prefixed paths.
pub fn navigation(tree: &StructureTree) -> Vec<NavItem> {
    let mut nav: Vec<NavItem> = tree
        .top_level_files
        .iter()
        .map(|file| NavItem {
            title: page_title(file),
            target: NavTarget::Page(file.path.clone()),
        })
        .collect();

    for dir in &tree.directories {
        let pages = dir
            .files
            .iter()
            .map(|file| NavItem {
                title: to_title(&file.name),
                target: NavTarget::Page(file.path.clone()),
            })
            .collect();
        nav.push(NavItem {
            title: humanize(&dir.name),
            target: NavTarget::Section(pages),
        });
    }

    nav
}

pub fn render(settings: &MkDocsSettings, tree: &StructureTree) -> Result<String, serde_yaml::Error> {
    let file = MkDocsFile {
        site_name: &settings.site_name,
        docs_dir: &tree.docs_dir,
        theme: &settings.theme,
        nav: navigation(tree),
        repo_url: settings
            .repo_url
            .as_deref()
            .filter(|url| !url.trim().is_empty()),
        markdown_extensions: settings.markdown_extensions.as_ref(),
    };
    serde_yaml::to_string(&file)
}

/// The navigation file as an action for the active strategy, so it follows the
/// same dry-run, confirmation and no-overwrite rules as the structure itself.
pub fn navigation_action(
    settings: &MkDocsSettings,
    tree: &StructureTree,
) -> Result<PlannedAction, serde_yaml::Error> {
    Ok(PlannedAction::CreateFile {
        path: PathBuf::from(MKDOCS_FILE),
        content: render(settings, tree)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::TreeDirectory;
    use serde_yaml::Value;

    fn tree() -> StructureTree {
        let file = |name: &str, path: &str| TreeFile {
            name: name.into(),
            path: path.into(),
        };
        StructureTree {
            docs_dir: "docs".into(),
            top_level_files: vec![file("index.md", "010_index.md"), file("README.md", "020_README.md")],
            directories: vec![
                TreeDirectory {
                    name: "user-guides".into(),
                    path: "020_user-guides".into(),
                    files: vec![
                        file("getting-started.md", "020_user-guides/010_getting-started.md"),
                        file("advanced.md", "020_user-guides/020_advanced.md"),
                    ],
                },
                TreeDirectory {
                    name: "reference".into(),
                    path: "030_reference".into(),
                    files: vec![file("api.md", "030_reference/010_api.md")],
                },
            ],
        }
    }

    fn page(title: &str, path: &str) -> NavItem {
        NavItem {
            title: title.into(),
            target: NavTarget::Page(path.into()),
        }
    }

    #[test]
    fn navigation_follows_tree_order() {
        let nav = navigation(&tree());
        assert_eq!(nav[0], page("Home", "010_index.md"));
        assert_eq!(nav[1], page("Readme", "020_README.md"));
        assert_eq!(
            nav[2],
            NavItem {
                title: "User Guides".into(),
                target: NavTarget::Section(vec![
                    page("Getting Started", "020_user-guides/010_getting-started.md"),
                    page("Advanced", "020_user-guides/020_advanced.md"),
                ]),
            }
        );
        assert_eq!(nav.len(), 4);
    }

    #[test]
    fn renders_settings_and_nav() {
        let settings = MkDocsSettings {
            site_name: "Test Docs".into(),
            theme: serde_yaml::from_str("name: material").unwrap(),
            repo_url: Some("https://example.com/repo".into()),
            markdown_extensions: None,
        };
        let yaml = render(&settings, &tree()).unwrap();
        let parsed: Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed["site_name"], Value::from("Test Docs"));
        assert_eq!(parsed["docs_dir"], Value::from("docs"));
        assert_eq!(parsed["theme"]["name"], Value::from("material"));
        assert_eq!(parsed["repo_url"], Value::from("https://example.com/repo"));
        assert_eq!(parsed["nav"][0]["Home"], Value::from("010_index.md"));
        assert_eq!(
            parsed["nav"][3]["Reference"][0]["Api"],
            Value::from("030_reference/010_api.md")
        );
        assert!(parsed.get("markdown_extensions").is_none());
        assert!(yaml.starts_with("site_name:"));
    }

    #[test]
    fn empty_repo_url_is_omitted() {
        let settings = MkDocsSettings {
            site_name: "Docs".into(),
            repo_url: Some(String::new()),
            ..MkDocsSettings::default()
        };
        let yaml = render(&settings, &tree()).unwrap();
        assert!(!yaml.contains("repo_url"));
        assert!(!yaml.contains("theme"));
    }

    #[test]
    fn action_targets_project_root() {
        let settings = MkDocsSettings {
            site_name: "Docs".into(),
            ..MkDocsSettings::default()
        };
        let action = navigation_action(&settings, &tree()).unwrap();
        assert_eq!(action.path(), Path::new(MKDOCS_FILE));
    }
}
