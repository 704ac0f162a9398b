use crate::app::cli::CreateArgs;
use crate::app::formatter::sanitize;
use crate::app::prefix::{Numbering, Role};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STARTER_CONFIG_NAME: &str = "docstrap.yaml";

/// Widest zero-padded prefix accepted.
pub const MAX_PADDING_WIDTH: u32 = 16;

pub const STARTER_CONFIG: &str = r#"# Documentation directory ("." for the project root)
docs_dir: "docs"

# File naming options
use_numbered_prefix: false
use_markdown_headings: true

# Numbering settings
initial_prefix: 10
dir_start_prefix: 20
prefix_step: 10
padding_width: 3

# Structure
directories:
  guides:
    - getting-started.md
  reference:
    - api.md

top_level_files:
  - index.md

# MkDocs configuration
generate_mkdocs: false  # Set to true to generate mkdocs.yaml
mkdocs_config:
  site_name: "My Documentation"
  theme:
    name: "material"
  repo_url: ""  # Optional: Add your repository URL
  markdown_extensions:
    - toc:
        permalink: true
    - admonition
    - pymdownx.highlight
    - pymdownx.superfences
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read configuration {0}: {1}")]
    Read(PathBuf, #[source] io::Error),
    #[error("Error parsing YAML file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Error parsing TOML file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
    #[error("{0} already exists (use --force to overwrite)")]
    Exists(PathBuf),
    #[error("Failed to write {0}: {1}")]
    Write(PathBuf, #[source] io::Error),
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

/// Directory name → file names, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryList(pub Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for DirectoryList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = DirectoryList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of directory names to lists of file names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, files)) = map.next_entry::<String, Option<Vec<String>>>()? {
                    entries.push((name, files.unwrap_or_default()));
                }
                Ok(DirectoryList(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Site settings passed through to the navigation file untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MkDocsSettings {
    pub site_name: String,
    pub theme: serde_yaml::Value,
    pub repo_url: Option<String>,
    pub markdown_extensions: Option<serde_yaml::Value>,
}

/// The configuration document as written on disk, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    #[serde(alias = "base_dir")]
    pub docs_dir: Option<String>,
    pub use_numbered_prefix: bool,
    pub use_markdown_headings: bool,
    pub initial_prefix: u32,
    pub dir_start_prefix: u32,
    pub prefix_step: u32,
    pub padding_width: u32,
    pub directories: DirectoryList,
    pub top_level_files: Vec<String>,
    pub generate_mkdocs: bool,
    pub mkdocs_config: Option<MkDocsSettings>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        let numbering = Numbering::default();
        Self {
            docs_dir: None,
            use_numbered_prefix: false,
            use_markdown_headings: false,
            initial_prefix: numbering.initial_prefix,
            dir_start_prefix: numbering.dir_start_prefix,
            prefix_step: numbering.prefix_step,
            padding_width: numbering.padding_width,
            directories: DirectoryList::default(),
            top_level_files: Vec::new(),
            generate_mkdocs: false,
            mkdocs_config: None,
        }
    }
}

/// Validated, immutable description of the structure to create.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureConfig {
    docs_dir: String,
    numbering: Numbering,
    use_markdown_headings: bool,
    directories: Vec<(String, Vec<String>)>,
    top_level_files: Vec<String>,
    generate_mkdocs: bool,
    mkdocs: Option<MkDocsSettings>,
}

impl StructureConfig {
    pub fn from_document(doc: ConfigDocument) -> Result<Self, ConfigError> {
        let docs_dir = doc
            .docs_dir
            .ok_or_else(|| invalid("Missing required configuration: docs_dir"))?;
        if docs_dir.is_empty() {
            return Err(invalid("docs_dir cannot be empty"));
        }
        if docs_dir != "." {
            check_name("Documentation directory", &docs_dir)?;
        }

        for (key, value) in [
            ("initial_prefix", doc.initial_prefix),
            ("dir_start_prefix", doc.dir_start_prefix),
            ("prefix_step", doc.prefix_step),
            ("padding_width", doc.padding_width),
        ] {
            if value < 1 {
                return Err(invalid(format!("{} must be positive", key)));
            }
        }
        if doc.padding_width > MAX_PADDING_WIDTH {
            return Err(invalid(format!(
                "padding_width must be at most {}",
                MAX_PADDING_WIDTH
            )));
        }
        let numbering = Numbering {
            enabled: doc.use_numbered_prefix,
            initial_prefix: doc.initial_prefix,
            dir_start_prefix: doc.dir_start_prefix,
            prefix_step: doc.prefix_step,
            padding_width: doc.padding_width,
        };

        let directories = doc.directories.0;
        if directories.is_empty() {
            return Err(invalid("At least one directory must be configured"));
        }
        check_unique("directory", directories.iter().map(|(name, _)| name.as_str()), "docs root")?;
        for (dir_name, files) in &directories {
            check_name("Directory", dir_name)?;
            let sanitized = files
                .iter()
                .map(|file| check_file_name(file))
                .collect::<Result<Vec<_>, _>>()?;
            check_unique("file", sanitized.iter().map(String::as_str), dir_name)?;
        }

        let top_level = doc
            .top_level_files
            .iter()
            .map(|file| check_file_name(file))
            .collect::<Result<Vec<_>, _>>()?;
        check_unique("top-level file", top_level.iter().map(String::as_str), "docs root")?;

        // Files and directories share the docs root once prefixed.
        let root_entries: Vec<String> = top_level
            .iter()
            .enumerate()
            .map(|(index, file)| numbering.apply(Role::TopLevelFile, index, file))
            .chain(
                directories
                    .iter()
                    .enumerate()
                    .map(|(index, (dir, _))| numbering.apply(Role::Directory, index, dir)),
            )
            .collect();
        check_unique("entry", root_entries.iter().map(String::as_str), "docs root")?;

        if doc.generate_mkdocs {
            let has_site_name = doc
                .mkdocs_config
                .as_ref()
                .is_some_and(|settings| !settings.site_name.trim().is_empty());
            if !has_site_name {
                return Err(invalid(
                    "generate_mkdocs requires mkdocs_config with a site_name",
                ));
            }
        }

        Ok(Self {
            docs_dir,
            numbering,
            use_markdown_headings: doc.use_markdown_headings,
            directories,
            top_level_files: doc.top_level_files,
            generate_mkdocs: doc.generate_mkdocs,
            mkdocs: doc.mkdocs_config,
        })
    }

    pub fn docs_dir(&self) -> &str {
        &self.docs_dir
    }

    /// `docs_dir: "."` places the structure directly in the project root.
    pub fn is_project_root(&self) -> bool {
        self.docs_dir == "."
    }

    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }

    pub fn use_markdown_headings(&self) -> bool {
        self.use_markdown_headings
    }

    pub fn directories(&self) -> &[(String, Vec<String>)] {
        &self.directories
    }

    pub fn top_level_files(&self) -> &[String] {
        &self.top_level_files
    }

    pub fn generate_mkdocs(&self) -> bool {
        self.generate_mkdocs
    }

    pub fn mkdocs(&self) -> Option<&MkDocsSettings> {
        self.mkdocs.as_ref()
    }
}

fn check_name(kind: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(invalid(format!("{} name cannot be empty", kind)));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid(format!(
            "{} name cannot contain path separators: {}",
            kind, name
        )));
    }
    if name == "." || name == ".." {
        return Err(invalid(format!("Invalid {} name: {}", kind.to_lowercase(), name)));
    }
    Ok(())
}

/// Validates a file name as written and returns the name it will have on disk.
fn check_file_name(name: &str) -> Result<String, ConfigError> {
    check_name("File", name)?;
    let sanitized = sanitize(name);
    if sanitized.is_empty() || sanitized == "." {
        return Err(invalid(format!("File name has no usable characters: {}", name)));
    }
    Ok(sanitized)
}

fn check_unique<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
    scope: &str,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(invalid(format!("Duplicate {} '{}' in {}", kind, name, scope)));
        }
    }
    Ok(())
}

/// Reads and parses a configuration document. `.toml` files go through `toml`,
/// everything else through `serde_yaml`.
pub fn load_document(path: &Path) -> Result<ConfigDocument, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content =
        fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let doc = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    log::debug!("Loaded configuration from {}", path.display());
    Ok(doc)
}

pub fn load_config(path: &Path) -> Result<StructureConfig, ConfigError> {
    StructureConfig::from_document(load_document(path)?)
}

/// Loads the document named on the command line and applies flag overrides on top.
pub fn resolve_config(args: &CreateArgs) -> Result<StructureConfig, ConfigError> {
    let mut doc = load_document(&args.config)?;
    if args.mkdocs {
        doc.generate_mkdocs = true;
    }
    StructureConfig::from_document(doc)
}

/// Writes the starter configuration into `dir`, refusing to replace an existing one.
pub fn write_starter_config(dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = dir.join(STARTER_CONFIG_NAME);
    if path.exists() && !force {
        return Err(ConfigError::Exists(path));
    }
    fs::write(&path, STARTER_CONFIG).map_err(|e| ConfigError::Write(path.clone(), e))?;
    Ok(path)
}
