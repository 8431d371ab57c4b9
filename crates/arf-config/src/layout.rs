use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "plugins.json";
pub const MODULES_DIR: &str = "modules";
pub const SETUP_PAGE_FILE: &str = "setup.html";
pub const WEB_CONFIG_FILE: &str = "web-config.json";
pub const LOCALIZATION_FILE: &str = "localization.json";

/// Well-known file locations inside a framework checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkLayout {
    root: PathBuf,
}

impl FrameworkLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Pick the framework root: explicit flag, then `ARF_ROOT`, then the
    /// configured root, then the current directory.
    pub fn discover(explicit: Option<&Path>, configured: Option<&str>) -> std::io::Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        if let Ok(env_root) = std::env::var("ARF_ROOT") {
            let trimmed = env_root.trim();
            if !trimmed.is_empty() {
                return Ok(Self::new(trimmed));
            }
        }
        if let Some(root) = configured.map(str::trim).filter(|r| !r.is_empty()) {
            return Ok(Self::new(root));
        }
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.root.join(MODULES_DIR)
    }

    /// Directory of a plugin given its identifier (`modules/<id>`).
    pub fn plugin_dir(&self, id: &str) -> PathBuf {
        self.modules_dir().join(id)
    }

    /// Manifest entry for a plugin identifier.
    pub fn plugin_entry(id: &str) -> String {
        format!("{}/{}", MODULES_DIR, id)
    }

    pub fn setup_page(&self) -> PathBuf {
        self.root.join(SETUP_PAGE_FILE)
    }

    pub fn web_config(&self) -> PathBuf {
        self.root.join(WEB_CONFIG_FILE)
    }

    pub fn localization(&self) -> PathBuf {
        self.root.join(LOCALIZATION_FILE)
    }

    pub fn global_settings(&self) -> PathBuf {
        self.root.join("settings").join("global-settings.json")
    }
}

/// Locate the `git` executable on PATH.
pub fn git_executable() -> Option<PathBuf> {
    which::which("git").ok()
}
