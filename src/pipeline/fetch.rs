//! Remote spreadsheet download into a temporary directory

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::Url;
use tempfile::TempDir;

use super::error::{ConvertError, ValidationError};
use crate::utils::{create_progress_bar, create_spinner};

/// Subfolder of the platform temp directory used for downloads
pub const TEMP_SUBDIR: &str = "xl2json";

/// File name used when the URL path has no usable last segment
pub const DEFAULT_DOWNLOAD_NAME: &str = "download.xlsx";

/// Download settings
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Directory that receives downloaded files; created on demand
    pub temp_dir: PathBuf,
    /// Whole-request timeout. `None` waits for the transport to finish or fail.
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            timeout: None,
        }
    }
}

pub fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join(TEMP_SUBDIR)
}

/// Download directories that still exist, for cleanup on Ctrl+C
static ACTIVE_DOWNLOADS: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

fn active_downloads() -> MutexGuard<'static, Vec<PathBuf>> {
    ACTIVE_DOWNLOADS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Remove every download still on disk. Used when the process is about to
/// exit without unwinding.
pub fn remove_active_downloads() {
    for dir in active_downloads().drain(..) {
        if let Err(e) = fs::remove_dir_all(&dir) {
            log::warn!("event=temp_remove_failed path={} error={}", dir.display(), e);
        }
    }
}

/// A downloaded file in its own private directory, removed when dropped.
///
/// Each download gets a fresh subdirectory of the temp dir, so an existing
/// file with the same name is never overwritten or deleted.
#[derive(Debug)]
pub struct TempDownload {
    dir: Option<TempDir>,
    path: PathBuf,
    bytes: u64,
}

impl TempDownload {
    fn create(temp_dir: &Path, file_name: &str) -> io::Result<(Self, File)> {
        fs::create_dir_all(temp_dir)?;
        let dir = tempfile::Builder::new()
            .prefix("download-")
            .tempdir_in(temp_dir)?;
        active_downloads().push(dir.path().to_path_buf());

        let download = Self {
            path: dir.path().join(file_name),
            dir: Some(dir),
            bytes: 0,
        };
        let file = File::create(&download.path)?;
        Ok((download, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Drop for TempDownload {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let dir_path = dir.path().to_path_buf();
        active_downloads().retain(|p| p != &dir_path);

        match dir.close() {
            Ok(()) => log::debug!("event=temp_removed path={}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "event=temp_remove_failed path={} error={}",
                dir_path.display(),
                e
            ),
        }
    }
}

/// Parse and check an http(s) URL
pub fn parse_url(input: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(input).map_err(|_| ValidationError::InvalidUrl(input.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ValidationError::InvalidUrl(input.to_string())),
    }
}

fn is_loopback(url: &Url) -> bool {
    let host = url.host_str().unwrap_or("").trim_matches(['[', ']']);
    host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

/// Local file name for a URL: its last path segment, decoded, without query or fragment
pub fn file_name_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");
    let decoded = urlencoding::decode(segment)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let name = decoded.replace(['/', '\\'], "_");
    let name = name.trim();

    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_DOWNLOAD_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Download `url` into the temp directory.
///
/// Shows a progress bar when the server reports a content length and a
/// spinner otherwise. The returned handle deletes the file on drop.
pub fn fetch_to_temp(url: &str, options: &FetchOptions) -> Result<TempDownload, ConvertError> {
    let parsed = parse_url(url)?;

    let mut builder = reqwest::blocking::Client::builder().timeout(options.timeout);
    if is_loopback(&parsed) {
        builder = builder.no_proxy();
    }
    let client = builder
        .build()
        .map_err(|e| ConvertError::download(url, e))?;

    let response = client
        .get(parsed.clone())
        .send()
        .map_err(|e| ConvertError::download(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConvertError::download(url, format!("HTTP status {}", status)));
    }

    // From here on the handle owns the file, so every early return cleans it up
    let (mut download, file) =
        TempDownload::create(&options.temp_dir, &file_name_from_url(&parsed))
            .map_err(|e| ConvertError::write(&options.temp_dir, e))?;

    let progress = match response.content_length() {
        Some(len) => create_progress_bar(len, "Downloading"),
        None => create_spinner("Downloading..."),
    };

    let mut writer = BufWriter::new(file);
    let mut reader = progress.wrap_read(response);
    let copied = io::copy(&mut reader, &mut writer);
    progress.finish_and_clear();

    download.bytes = copied.map_err(|e| ConvertError::download(url, e))?;
    writer
        .flush()
        .map_err(|e| ConvertError::write(&download.path, e))?;

    log::info!(
        "event=download_complete url={} bytes={} path={}",
        url,
        download.bytes,
        download.path.display()
    );
    Ok(download)
}
