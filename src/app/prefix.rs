/// Position of a name in the documentation tree, which decides its counter seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    TopLevelFile,
    Directory,
    NestedFile,
}

/// Numbering parameters copied out of the validated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbering {
    pub enabled: bool,
    pub initial_prefix: u32,
    pub dir_start_prefix: u32,
    pub prefix_step: u32,
    pub padding_width: u32,
}

impl Default for Numbering {
    fn default() -> Self {
        Self {
            enabled: false,
            initial_prefix: 10,
            dir_start_prefix: 20,
            prefix_step: 10,
            padding_width: 3,
        }
    }
}

impl Numbering {
    /// Numeric value for the `index`-th sibling (0-based) with the given role.
    ///
    /// Top-level files and nested files start at `initial_prefix`, directories at
    /// `dir_start_prefix`. Nested files restart for every directory, so the caller
    /// passes the index within that directory.
    pub fn value(&self, role: Role, index: usize) -> u64 {
        let seed = match role {
            Role::Directory => self.dir_start_prefix,
            Role::TopLevelFile | Role::NestedFile => self.initial_prefix,
        };
        let offset = u64::from(self.prefix_step).saturating_mul(index as u64);
        u64::from(seed).saturating_add(offset)
    }

    /// Zero-padded prefix, or an empty string when numbering is disabled.
    /// Values wider than `padding_width` render at their natural width.
    pub fn prefix(&self, role: Role, index: usize) -> String {
        if !self.enabled {
            return String::new();
        }
        format!(
            "{:0width$}",
            self.value(role, index),
            width = self.padding_width as usize
        )
    }

    /// Joins the prefix and the bare name, e.g. `010_index.md`.
    pub fn apply(&self, role: Role, index: usize, name: &str) -> String {
        let prefix = self.prefix(role, index);
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", prefix, name)
        }
    }
}
