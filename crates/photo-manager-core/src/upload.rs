//! Boundary to the external image uploader.
//!
//! The uploader is a black box: it receives local paths and answers with one
//! public URL per path. Each input carries an explicit [`UploadRole`], so the
//! caller never has to guess from file names which URL belongs to the
//! thumbnail.
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

/// What an uploaded file is to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRole {
    Original,
    Thumbnail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub path: PathBuf,
    pub role: UploadRole,
}

impl UploadItem {
    pub fn new(path: impl Into<PathBuf>, role: UploadRole) -> Self {
        Self {
            path: path.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub url: String,
    pub role: UploadRole,
}

/// Uploads local files and reports one URL per input
pub trait Uploader {
    fn upload(&self, items: &[UploadItem]) -> Result<Vec<UploadedFile>>;
}

impl<T: Uploader + ?Sized> Uploader for &T {
    fn upload(&self, items: &[UploadItem]) -> Result<Vec<UploadedFile>> {
        (**self).upload(items)
    }
}

/// One entry of the uploader's JSON output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResult {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub url: String,
}

/// Runs a PicGo-compatible executable as a subprocess:
/// `<program> <args...> <paths...>`, expecting a JSON array of
/// `{"fileName", "url"}` on stdout.
#[derive(Debug, Clone)]
pub struct CommandUploader {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandUploader {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.uploader_path, config.uploader_args.clone())
    }

    /// Run `<program> --version`, returning its output
    pub fn check_executable(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|e| {
                Error::Configuration(format!(
                    "Uploader {} cannot be run: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Configuration(format!(
                "Uploader {} --version exited with {}",
                self.program.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Uploader {} version {}", self.program.display(), version);
        Ok(version)
    }
}

impl Uploader for CommandUploader {
    fn upload(&self, items: &[UploadItem]) -> Result<Vec<UploadedFile>> {
        info!(
            "Uploading {} file(s) with {}",
            items.len(),
            self.program.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(items.iter().map(|item| &item.path))
            .output()
            .map_err(|e| {
                Error::Upload(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Upload(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let results = parse_upload_output(&stdout)?;
        match_results(items, results)
    }
}

/// Extract the JSON result array from uploader stdout. The whole output is
/// tried first, then the span from each `[` to the last `]`, so log lines
/// printed ahead of the JSON are tolerated.
pub fn parse_upload_output(stdout: &str) -> Result<Vec<UploadResult>> {
    let trimmed = stdout.trim();
    if let Ok(results) = serde_json::from_str::<Vec<UploadResult>>(trimmed) {
        return Ok(results);
    }

    if let Some(end) = trimmed.rfind(']') {
        for (start, _) in trimmed.match_indices('[') {
            if start >= end {
                break;
            }
            if let Ok(results) = serde_json::from_str::<Vec<UploadResult>>(&trimmed[start..=end])
            {
                return Ok(results);
            }
        }
    }

    Err(Error::Upload(format!(
        "uploader output is not a JSON result list: {}",
        trimmed
    )))
}

/// Pair each input with the result carrying its file name
pub fn match_results(items: &[UploadItem], results: Vec<UploadResult>) -> Result<Vec<UploadedFile>> {
    if results.is_empty() {
        return Err(Error::Upload("uploader returned no results".to_string()));
    }

    let mut remaining = results;
    let mut uploaded = Vec::with_capacity(items.len());

    for item in items {
        let name = file_name(&item.path);
        let position = remaining
            .iter()
            .position(|r| r.file_name == name)
            .ok_or_else(|| Error::Upload(format!("no upload result for {}", name)))?;
        let result = remaining.remove(position);

        if result.url.trim().is_empty() {
            return Err(Error::Upload(format!("empty URL returned for {}", name)));
        }

        uploaded.push(UploadedFile {
            path: item.path.clone(),
            url: result.url,
            role: item.role,
        });
    }

    if let Some(extra) = remaining.first() {
        return Err(Error::Upload(format!(
            "unexpected upload result for {}",
            extra.file_name
        )));
    }

    Ok(uploaded)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
