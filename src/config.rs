use crate::error::ExportError;
use ahash::AHashSet;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_EXPORT_FOLDER: &str = "Exports";

/// Kinds of activity an account can export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Upvoted,
    Saved,
    Submissions,
}

impl Category {
    /// Fixed collection order, independent of how the config lists them.
    pub const ALL: [Category; 3] = [Category::Upvoted, Category::Saved, Category::Submissions];
}

/// Script-app credentials for one account.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccountConfig {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub exports: Vec<Category>,
}

impl AccountConfig {
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn wants(&self, category: Category) -> bool {
        self.exports.contains(&category)
    }
}

/// Global switches, each overridable from the command line.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub separate_export: bool,     // one file per account
    pub archivebox_export: bool,   // URL list instead of CSV
    pub human_timestamps: bool,    // RFC3339 instead of epoch seconds
    pub export_folder: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            separate_export: false,
            archivebox_export: false,
            human_timestamps: false,
            export_folder: PathBuf::from(DEFAULT_EXPORT_FOLDER),
        }
    }
}

impl ExportOptions {
    /// A set flag wins; an unset flag leaves the configured value alone.
    pub fn with_overrides(mut self, separate: bool, archivebox: bool) -> Self {
        self.separate_export |= separate;
        self.archivebox_export |= archivebox;
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub options: ExportOptions,
    #[serde(default)]
    pub users: Vec<AccountConfig>,
}

impl ExportConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ExportError> {
        let cfg: ExportConfig = serde_yaml::from_str(s).map_err(|e| ExportError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ExportError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml_str(&raw)
    }

    /// Structural checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.users.is_empty() {
            return Err(ExportError::Config("no users configured".into()));
        }
        let name_re = Regex::new(r"^[A-Za-z0-9_-]{3,20}$").expect("static regex");
        let mut seen = AHashSet::new();
        for (i, user) in self.users.iter().enumerate() {
            let c = &user.credentials;
            if !name_re.is_match(&c.username) {
                return Err(ExportError::Config(format!("users[{i}]: invalid username {:?}", c.username)));
            }
            for (field, value) in [("password", &c.password), ("client_id", &c.client_id), ("client_secret", &c.client_secret)] {
                if value.trim().is_empty() {
                    return Err(ExportError::Config(format!("users[{i}] ({}): {field} is empty", c.username)));
                }
            }
            if user.exports.is_empty() {
                return Err(ExportError::Config(format!("users[{i}] ({}): no exports requested", c.username)));
            }
            if !seen.insert(c.username.to_lowercase()) {
                return Err(ExportError::Config(format!("users[{i}]: duplicate username {}", c.username)));
            }
        }
        Ok(())
    }
}
