//! Project packaging
//!
//! Zips a project directory into a scoped temporary location. The archive and
//! its directory live exactly as long as the returned [`PackagedProject`].

use crate::error::{JingongoError, Result};
use chrono::Utc;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

/// A zipped project inside its own temporary directory
///
/// Dropping the value deletes the directory and the archive, whether the
/// upload that used it succeeded or not.
#[derive(Debug)]
pub struct PackagedProject {
    path: PathBuf,
    size_bytes: u64,
    _dir: TempDir,
}

impl PackagedProject {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Zip `project_dir` into a fresh temporary directory
///
/// Fails with [`JingongoError::Validation`] before touching anything if the
/// path is not an existing directory. Archive names carry a nanosecond
/// timestamp so concurrent packaging of the same project never collides.
pub async fn package(project_dir: &Path) -> Result<PackagedProject> {
    ensure_project_dir(project_dir)?;

    let project_dir = project_dir.to_path_buf();
    info!(project = %project_dir.display(), "Zipping project");

    let packaged = tokio::task::spawn_blocking(move || package_blocking(&project_dir))
        .await
        .map_err(|e| JingongoError::Io(io::Error::new(io::ErrorKind::Other, e)))??;

    info!(
        archive = %packaged.path.display(),
        size = %jingongo_common::format_bytes(packaged.size_bytes),
        "Project zipped"
    );
    Ok(packaged)
}

pub(crate) fn ensure_project_dir(project_dir: &Path) -> Result<()> {
    if !project_dir.is_dir() {
        return Err(JingongoError::validation(format!(
            "Project path '{}' is not a valid directory",
            project_dir.display()
        )));
    }
    Ok(())
}

fn package_blocking(project_dir: &Path) -> Result<PackagedProject> {
    let dir = tempfile::Builder::new().prefix("jingongo-").tempdir()?;
    let path = dir.path().join(archive_name(project_dir));

    let mut writer = ZipWriter::new(BufWriter::new(File::create(&path)?));
    write_tree(&mut writer, project_dir)?;
    writer
        .finish()
        .map_err(zip_error)?
        .into_inner()
        .map_err(|e| e.into_error())?
        .sync_all()?;

    let size_bytes = std::fs::metadata(&path)?.len();

    Ok(PackagedProject {
        path,
        size_bytes,
        _dir: dir,
    })
}

fn archive_name(project_dir: &Path) -> String {
    let stem = project_dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string());
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}_{}.zip", stem, nanos)
}

fn write_tree<W: io::Write + io::Seek>(writer: &mut ZipWriter<W>, root: &Path) -> Result<()> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| JingongoError::Io(e.into()))?;
        let name = entry_name(root, entry.path())?;

        if entry.file_type().is_dir() {
            debug!(entry = %name, "Adding directory");
            writer
                .add_directory(name, options.unix_permissions(0o755))
                .map_err(zip_error)?;
        } else {
            debug!(entry = %name, "Adding file");
            writer.start_file(name, options).map_err(zip_error)?;
            let mut file = File::open(entry.path())?;
            io::copy(&mut file, writer)?;
        }
    }

    Ok(())
}

/// Archive entry name relative to the project root, always `/`-separated
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        JingongoError::validation(format!("'{}' is outside the project", path.display()))
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn zip_error(e: zip::result::ZipError) -> JingongoError {
    match e {
        zip::result::ZipError::Io(io) => JingongoError::Io(io),
        other => JingongoError::Io(io::Error::new(io::ErrorKind::Other, other)),
    }
}
