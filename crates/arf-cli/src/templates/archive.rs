//! Tag archive download, cache and unpacking.

use super::TemplateError;
use arf_logger as logger;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Normalize a git remote into an HTTPS repository URL.
///
/// `git@github.com:owner/repo.git` becomes `https://github.com/owner/repo`.
pub fn https_base_url(remote: &str) -> Result<String, TemplateError> {
    let mut url = remote.trim().to_string();
    if let Some(path) = url.strip_prefix("git@github.com:") {
        url = format!("https://github.com/{}", path);
    }
    let url = url.trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    if !url.starts_with("https://") {
        return Err(TemplateError::InsecureUrl(url.to_string()));
    }
    Ok(url.to_string())
}

/// `<base>/archive/refs/tags/<tag>.tar.gz`
pub fn archive_url(base: &str, tag: &str) -> String {
    format!("{}/archive/refs/tags/{}.tar.gz", base, tag)
}

/// Cached archive location for a tag.
pub fn cached_archive(cache_dir: &Path, tag: &str) -> PathBuf {
    cache_dir.join("templates").join(format!("{}.tar.gz", tag))
}

pub fn download(url: &str) -> Result<Vec<u8>, TemplateError> {
    let failure = |reason: String| TemplateError::Download {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .user_agent(concat!("arf/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| failure(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| failure(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(failure(format!("HTTP {}", status)));
    }
    let bytes = response.bytes().map_err(|e| failure(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Cached archive bytes for `tag`, if any.
pub fn read_cached(cache_dir: &Path, tag: &str) -> Option<Vec<u8>> {
    let cached = cached_archive(cache_dir, tag);
    if !cached.is_file() {
        return None;
    }
    match fs::read(&cached) {
        Ok(bytes) => {
            logger::debug(&format!("Using cached template archive {}", cached.display()));
            Some(bytes)
        }
        Err(e) => {
            logger::warn(&format!("Could not read {}: {}", cached.display(), e));
            None
        }
    }
}

/// Store an archive that is known to unpack.
pub fn store_cached(cache_dir: &Path, tag: &str, bytes: &[u8]) {
    let cached = cached_archive(cache_dir, tag);
    let stored = cached
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(&cached, bytes));
    match stored {
        Ok(()) => logger::debug(&format!("Cached template archive at {}", cached.display())),
        Err(e) => logger::warn(&format!("Could not cache template archive: {}", e)),
    }
}

pub fn discard_cached(cache_dir: &Path, tag: &str) {
    let cached = cached_archive(cache_dir, tag);
    if let Err(e) = fs::remove_file(&cached) {
        logger::warn(&format!("Could not remove {}: {}", cached.display(), e));
    }
}

/// Unpack a `.tar.gz` into `dest`.
pub fn unpack(bytes: &[u8], dest: &Path) -> Result<(), TemplateError> {
    let decoder = flate2::read::GzDecoder::new(bytes);
    let mut archive = tar::Archive::new(decoder);
    archive
        .unpack(dest)
        .map_err(|e| TemplateError::Unpack(e.to_string()))
}

/// First unpacked top-level directory (ignoring `__MACOSX`) that holds a
/// `templates/` directory.
pub fn find_templates_root(unpacked: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = WalkDir::new(unpacked)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir() && e.file_name() != "__MACOSX")
        .map(walkdir::DirEntry::into_path)
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .find(|dir| dir.join("templates").is_dir())
}
