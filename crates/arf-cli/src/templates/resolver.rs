//! Locate a `templates/` tree for the configured tag.
//!
//! Tries a detached git worktree of the local tag first, then the tag
//! archive over HTTPS. Whatever was acquired lives in a [`TemplateCheckout`]
//! and is released when the checkout is dropped.

use super::archive;
use super::TemplateError;
use crate::interrupt::{CleanupScope, Interrupt};
use arf_config::{git_executable, ScaffoldConfig};
use arf_logger as logger;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TEMP_PREFIX: &str = "arf-templates-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A `--templates` directory supplied by the user.
    Directory(PathBuf),
    /// A detached worktree of a local tag.
    LocalTag(String),
    /// An unpacked tag archive.
    Archive(String),
}

#[derive(Debug)]
struct Worktree {
    git: PathBuf,
    repo: PathBuf,
    path: PathBuf,
}

/// A usable templates directory plus whatever must be cleaned up afterwards.
#[derive(Debug)]
pub struct TemplateCheckout {
    templates_dir: PathBuf,
    source: TemplateSource,
    worktree: Option<Worktree>,
    // Dropped after the worktree is unregistered.
    _temp: Option<TempDir>,
    _scope: Option<CleanupScope>,
}

impl TemplateCheckout {
    /// Use an existing directory: either the `templates/` directory itself or
    /// a checkout root containing one. Nothing is cleaned up on drop.
    pub fn from_dir(dir: &Path) -> Result<Self, TemplateError> {
        if !dir.is_dir() {
            return Err(TemplateError::NotADirectory(dir.to_path_buf()));
        }
        let nested = dir.join("templates");
        let templates_dir = if nested.is_dir() {
            nested
        } else {
            dir.to_path_buf()
        };
        Ok(Self {
            templates_dir,
            source: TemplateSource::Directory(dir.to_path_buf()),
            worktree: None,
            _temp: None,
            _scope: None,
        })
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }
}

impl Drop for TemplateCheckout {
    fn drop(&mut self) {
        if let Some(worktree) = self.worktree.take() {
            let output = Command::new(&worktree.git)
                .arg("-C")
                .arg(&worktree.repo)
                .args(["worktree", "remove", "--force"])
                .arg(&worktree.path)
                .output();
            match output {
                Ok(output) => logger::capture_output("git worktree remove", &output),
                Err(e) => logger::debug(&format!("git worktree remove failed: {}", e)),
            }
        }
    }
}

pub struct TemplateResolver<'a> {
    root: &'a Path,
    config: &'a ScaffoldConfig,
    cache_dir: Option<PathBuf>,
    interrupt: Interrupt,
}

impl<'a> TemplateResolver<'a> {
    /// `cache_dir` is the tool cache; archives are cached under it only when
    /// the scaffold config enables the template cache.
    pub fn new(root: &'a Path, config: &'a ScaffoldConfig, cache_dir: Option<PathBuf>) -> Self {
        let cache_dir = cache_dir.filter(|_| config.template_cache_enabled);
        Self {
            root,
            config,
            cache_dir,
            interrupt: Interrupt::global(),
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn resolve(&self) -> Result<TemplateCheckout, TemplateError> {
        let tag = self.config.tag_name();
        let git = git_executable();

        let local = if !self.config.prefer_local_templates {
            "disabled (prefer_local_templates = false)".to_string()
        } else {
            match git.as_deref() {
                None => "git executable not found".to_string(),
                Some(git) => match self.checkout_local(git, &tag) {
                    Ok(checkout) => {
                        self.interrupt.check()?;
                        logger::info(&format!("Using local tag '{}'", tag));
                        return Ok(checkout);
                    }
                    Err(reason) => {
                        self.interrupt.check()?;
                        logger::warn(&format!(
                            "Local tag '{}' not available ({}), downloading instead",
                            tag, reason
                        ));
                        reason
                    }
                },
            }
        };

        let base = self.remote_base(git.as_deref());
        let url = archive::archive_url(&base, &tag);
        logger::spinner_start(&format!("Fetching templates for '{}'", tag));
        match self.download(&base, &tag) {
            Err(TemplateError::Interrupted(e)) => {
                logger::spinner_error(&format!("Fetching templates for '{}' cancelled", tag));
                Err(e.into())
            }
            Ok(checkout) => {
                logger::spinner_success(&format!("Templates for '{}' ready", tag));
                Ok(checkout)
            }
            Err(e) => {
                logger::spinner_error(&format!("Could not fetch templates for '{}'", tag));
                Err(TemplateError::Unavailable {
                    tag,
                    local,
                    remote: format!("{} ({})", e, url),
                })
            }
        }
    }

    fn checkout_local(&self, git: &Path, tag: &str) -> Result<TemplateCheckout, String> {
        let repo = run_git(git, self.root, &["rev-parse", "--show-toplevel"])
            .map(|out| PathBuf::from(out.trim()))
            .map_err(|e| format!("not a git repository: {}", e))?;

        let tags = run_git(git, &repo, &["tag", "-l", tag])?;
        if !tags.lines().any(|line| line.trim() == tag) {
            return Err(format!("tag '{}' not found", tag));
        }

        let scope = CleanupScope::enter();
        let temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(|e| e.to_string())?;
        let path = temp.path().join("checkout");

        // Registered before `worktree add` so a partial checkout is released too.
        let checkout = TemplateCheckout {
            templates_dir: path.join("templates"),
            source: TemplateSource::LocalTag(tag.to_string()),
            worktree: Some(Worktree {
                git: git.to_path_buf(),
                repo: repo.clone(),
                path: path.clone(),
            }),
            _temp: Some(temp),
            _scope: Some(scope),
        };

        let path_arg = path.to_string_lossy().into_owned();
        let tag_ref = format!("tags/{}", tag);
        run_git(
            git,
            &repo,
            &["worktree", "add", "--detach", &path_arg, &tag_ref],
        )?;

        if !checkout.templates_dir.is_dir() {
            return Err(format!("templates/ missing in tag '{}'", tag));
        }
        Ok(checkout)
    }

    /// HTTPS base of the origin remote, else the configured repository.
    fn remote_base(&self, git: Option<&Path>) -> String {
        let origin = git.and_then(|git| {
            run_git(git, self.root, &["config", "--get", "remote.origin.url"]).ok()
        });
        if let Some(remote) = origin {
            match archive::https_base_url(&remote) {
                Ok(url) => return url,
                Err(e) => logger::debug(&format!("Ignoring origin remote: {}", e)),
            }
        }
        self.config.github_repo.clone()
    }

    /// Cached archive first; a cached archive that no longer unpacks is
    /// discarded and downloaded again. Only archives that unpack are cached.
    fn download(&self, base: &str, tag: &str) -> Result<TemplateCheckout, TemplateError> {
        let base = archive::https_base_url(base)?;

        if let Some(cache) = self.cache_dir.as_deref() {
            if let Some(bytes) = archive::read_cached(cache, tag) {
                match self.unpack(&bytes, tag) {
                    Err(TemplateError::Interrupted(e)) => return Err(e.into()),
                    Err(e) => {
                        logger::warn(&format!(
                            "Cached archive for '{}' is unusable ({}), downloading again",
                            tag, e
                        ));
                        archive::discard_cached(cache, tag);
                    }
                    ok => return ok,
                }
            }
        }

        let url = archive::archive_url(&base, tag);
        logger::info(&format!("Downloading templates from tag '{}': {}", tag, url));
        let bytes = archive::download(&url)?;
        self.interrupt.check()?;
        let checkout = self.unpack(&bytes, tag)?;

        if let Some(cache) = self.cache_dir.as_deref() {
            archive::store_cached(cache, tag, &bytes);
        }
        Ok(checkout)
    }

    fn unpack(&self, bytes: &[u8], tag: &str) -> Result<TemplateCheckout, TemplateError> {
        let scope = CleanupScope::enter();
        let temp = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
        archive::unpack(bytes, temp.path())?;
        self.interrupt.check()?;

        let root = archive::find_templates_root(temp.path()).ok_or_else(|| {
            TemplateError::Missing {
                what: "templates/ directory".to_string(),
                dir: temp.path().to_path_buf(),
            }
        })?;

        Ok(TemplateCheckout {
            templates_dir: root.join("templates"),
            source: TemplateSource::Archive(tag.to_string()),
            worktree: None,
            _temp: Some(temp),
            _scope: Some(scope),
        })
    }
}

fn run_git(git: &Path, dir: &Path, args: &[&str]) -> Result<String, String> {
    let output: Output = Command::new(git)
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| e.to_string())?;
    logger::capture_output(&format!("git {}", args.join(" ")), &output);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            stderr.trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_dir_accepts_root_or_templates_dir() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        fs::create_dir_all(dir.path().join("templates").join("rules"))?;

        let from_root = TemplateCheckout::from_dir(dir.path())?;
        assert_eq!(from_root.templates_dir(), dir.path().join("templates"));

        let direct = TemplateCheckout::from_dir(&dir.path().join("templates"))?;
        assert_eq!(direct.templates_dir(), dir.path().join("templates"));
        Ok(())
    }

    #[test]
    fn test_from_dir_keeps_directory_on_drop() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        drop(TemplateCheckout::from_dir(dir.path())?);
        assert!(dir.path().is_dir());
        Ok(())
    }

    #[test]
    fn test_missing_override_dir() {
        let err = TemplateCheckout::from_dir(Path::new("/definitely/not/here"));
        assert!(matches!(err, Err(TemplateError::NotADirectory(_))));
    }

    #[test]
    fn test_unavailable_names_tag_and_both_attempts() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::TempDir::new()?;
        let config = ScaffoldConfig {
            template_version: "9.9.9".to_string(),
            prefer_local_templates: false,
            template_cache_enabled: false,
            github_repo: "http://insecure.example/repo".to_string(),
            ..ScaffoldConfig::default()
        };
        let resolver = TemplateResolver::new(root.path(), &config, None);
        let err = resolver.resolve().err().ok_or("expected failure")?;
        let message = err.to_string();
        assert!(message.contains("Template_9.9.9"));
        assert!(message.contains("prefer_local_templates"));
        assert!(message.contains("non-HTTPS"));
        Ok(())
    }

    #[test]
    fn test_archive_checkout_removes_temp_dir_on_drop() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().to_path_buf();
        fs::create_dir_all(path.join("x").join("templates"))?;
        let checkout = TemplateCheckout {
            templates_dir: path.join("x").join("templates"),
            source: TemplateSource::Archive("T".to_string()),
            worktree: None,
            _temp: Some(temp),
            _scope: None,
        };
        drop(checkout);
        assert!(!path.exists());
        Ok(())
    }

    fn archive_bytes() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let src = tempfile::TempDir::new()?;
        let top = src.path().join("agentic-rules-Template_1.0.0");
        fs::create_dir_all(top.join("templates/rules"))?;
        fs::write(top.join("templates/rules/RULES.md.template"), "# {{display_name}}")?;

        let mut bytes = Vec::new();
        {
            let encoder =
                flate2::write::GzEncoder::new(&mut bytes, flate2::Compression::default());
            let mut builder = tar::Builder::new(encoder);
            builder.append_dir_all("agentic-rules-Template_1.0.0", &top)?;
            builder.into_inner()?.finish()?;
        }
        Ok(bytes)
    }

    fn download_only() -> ScaffoldConfig {
        ScaffoldConfig {
            prefer_local_templates: false,
            template_cache_enabled: true,
            github_repo: "https://invalid.invalid/repo".to_string(),
            ..ScaffoldConfig::default()
        }
    }

    #[test]
    fn test_cached_archive_is_used_before_network() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::TempDir::new()?;
        let cache = tempfile::TempDir::new()?;
        archive::store_cached(cache.path(), "Template_1.0.0", &archive_bytes()?);

        let config = download_only();
        let checkout = TemplateResolver::new(root.path(), &config, Some(cache.path().to_path_buf()))
            .resolve()?;
        assert_eq!(
            checkout.source(),
            &TemplateSource::Archive("Template_1.0.0".to_string())
        );
        assert!(checkout.templates_dir().join("rules/RULES.md.template").is_file());
        assert!(archive::cached_archive(cache.path(), "Template_1.0.0").is_file());
        Ok(())
    }

    #[test]
    fn test_corrupt_cached_archive_is_discarded() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::TempDir::new()?;
        let cache = tempfile::TempDir::new()?;
        archive::store_cached(cache.path(), "Template_1.0.0", b"<html>rate limited</html>");

        let config = download_only();
        let err = TemplateResolver::new(root.path(), &config, Some(cache.path().to_path_buf()))
            .resolve()
            .err()
            .ok_or("expected failure")?;

        // The cache no longer blocks the tag; the failure is the real download.
        assert!(!archive::cached_archive(cache.path(), "Template_1.0.0").exists());
        assert!(err.to_string().contains("Network failure"));
        Ok(())
    }

    #[test]
    fn test_interrupt_releases_unpacked_archive() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::TempDir::new()?;
        let cache = tempfile::TempDir::new()?;
        archive::store_cached(cache.path(), "Template_1.0.0", &archive_bytes()?);

        let interrupt = Interrupt::new();
        interrupt.trigger();
        let config = download_only();
        let result = TemplateResolver::new(root.path(), &config, Some(cache.path().to_path_buf()))
            .with_interrupt(interrupt)
            .resolve();
        assert!(matches!(result, Err(TemplateError::Interrupted(_))));
        // An interrupted unpack says nothing about the archive itself.
        assert!(archive::cached_archive(cache.path(), "Template_1.0.0").is_file());
        Ok(())
    }

    type Repo = Option<(tempfile::TempDir, PathBuf)>;

    fn git_repo(with_templates: bool) -> Result<Repo, Box<dyn std::error::Error>> {
        let Some(git) = git_executable() else {
            return Ok(None);
        };
        let repo = tempfile::TempDir::new()?;
        let dir = repo.path();
        if with_templates {
            fs::create_dir_all(dir.join("templates/rules"))?;
            fs::write(dir.join("templates/rules/RULES.md.template"), "# {{display_name}}")?;
        } else {
            fs::write(dir.join("README.md"), "no templates here")?;
        }
        run_git(&git, dir, &["init", "-q"])?;
        run_git(&git, dir, &["add", "."])?;
        run_git(
            &git,
            dir,
            &[
                "-c",
                "user.name=arf",
                "-c",
                "user.email=arf@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "-m",
                "templates",
            ],
        )?;
        run_git(&git, dir, &["tag", "Template_1.0.0"])?;
        Ok(Some((repo, git)))
    }

    fn worktree_count(git: &Path, repo: &Path) -> Result<usize, String> {
        let list = run_git(git, repo, &["worktree", "list", "--porcelain"])?;
        Ok(list.lines().filter(|l| l.starts_with("worktree ")).count())
    }

    #[test]
    fn test_local_tag_worktree_removed_on_drop() -> Result<(), Box<dyn std::error::Error>> {
        let Some((repo, git)) = git_repo(true)? else {
            return Ok(());
        };
        let config = ScaffoldConfig {
            template_cache_enabled: false,
            ..ScaffoldConfig::default()
        };

        let checkout = TemplateResolver::new(repo.path(), &config, None).resolve()?;
        assert_eq!(
            checkout.source(),
            &TemplateSource::LocalTag("Template_1.0.0".to_string())
        );
        let templates = checkout.templates_dir().to_path_buf();
        assert!(templates.join("rules/RULES.md.template").is_file());
        assert_eq!(worktree_count(&git, repo.path())?, 2);

        drop(checkout);
        assert!(!templates.exists());
        assert_eq!(worktree_count(&git, repo.path())?, 1);
        Ok(())
    }

    #[test]
    fn test_tag_without_templates_is_released_before_fallback(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Some((repo, git)) = git_repo(false)? else {
            return Ok(());
        };
        let config = ScaffoldConfig {
            template_cache_enabled: false,
            github_repo: "http://insecure.example/repo".to_string(),
            ..ScaffoldConfig::default()
        };

        let err = TemplateResolver::new(repo.path(), &config, None)
            .resolve()
            .err()
            .ok_or("expected failure")?;
        let message = err.to_string();
        assert!(message.contains("templates/ missing"));
        assert!(message.contains("non-HTTPS"));
        assert_eq!(worktree_count(&git, repo.path())?, 1);
        Ok(())
    }
}
