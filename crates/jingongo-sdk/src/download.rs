//! FMU download through a signed storage URL
//!
//! The artifact is streamed into `<name>.part` next to its final location and
//! renamed only once every byte has been written. Any failure removes the
//! partial file, so the destination never holds a truncated FMU.

use crate::api::{endpoints, DownloadResponse};
use crate::error::{JingongoError, Result};
use crate::progress;
use crate::transport::{status_error, Transport};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument, warn};

/// How transfer progress is reported
#[derive(Debug, Clone, Copy)]
pub enum ProgressTarget<'a> {
    /// Track nothing visible
    Hidden,
    /// Draw a bar on the terminal, sized from `Content-Length` when present
    Terminal,
    /// Advance a caller-owned bar
    Bar(&'a ProgressBar),
}

/// Look up the artifact of a completed job and save it under `destination_dir`
///
/// Creates the destination directory and any missing parents. Returns the path
/// of the saved file.
#[instrument(skip(transport, progress), fields(destination = %destination_dir.display()))]
pub async fn download_fmu(
    transport: &Transport,
    job_id: &str,
    destination_dir: &Path,
    progress: ProgressTarget<'_>,
) -> Result<PathBuf> {
    info!("Requesting FMU download");
    let response: DownloadResponse = transport.get_json(&endpoints::download(job_id)).await?;

    let (download_url, fmu_filename) = match (response.download_url, response.fmu_filename) {
        (Some(url), Some(name)) if !url.is_empty() && !name.is_empty() => (url, name),
        _ => {
            return Err(JingongoError::api(
                "Backend did not provide a valid download URL or filename",
            ))
        }
    };

    // Only the final component is trusted so the name cannot leave the directory
    let file_name = Path::new(&fmu_filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            JingongoError::api(format!("Backend returned an unusable filename '{}'", fmu_filename))
        })?;

    tokio::fs::create_dir_all(destination_dir).await?;
    let local_path = destination_dir.join(&file_name);
    let partial_path = destination_dir.join(format!("{}.part", file_name));

    info!(file = %file_name, path = %local_path.display(), "Downloading FMU");

    let transferred = match stream_to_file(
        transport.http(),
        &download_url,
        &partial_path,
        &file_name,
        progress,
    )
    .await
    {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, file = %file_name, "An error occurred during download");
            remove_partial(&partial_path).await;
            return Err(JingongoError::Api {
                message: format!("Download of {} failed", file_name),
                status: e.status(),
                source: Some(Box::new(e)),
            });
        }
    };

    if let Err(e) = tokio::fs::rename(&partial_path, &local_path).await {
        remove_partial(&partial_path).await;
        return Err(e.into());
    }

    info!(
        path = %local_path.display(),
        size = %jingongo_common::format_bytes(transferred),
        "FMU downloaded"
    );
    Ok(local_path)
}

async fn stream_to_file(
    http: &reqwest::Client,
    url: &str,
    path: &Path,
    label: &str,
    target: ProgressTarget<'_>,
) -> Result<u64> {
    let mut response = http
        .get(url)
        .send()
        .await
        .map_err(|e| JingongoError::api_source("Failed to reach the download URL", e))?;

    if !response.status().is_success() {
        return Err(status_error(response, "signed download URL").await);
    }

    let total = response.content_length();
    let owned_bar;
    let bar = match target {
        ProgressTarget::Bar(bar) => {
            if let Some(total) = total {
                bar.set_length(total);
            }
            bar
        }
        ProgressTarget::Terminal => {
            owned_bar = match total {
                Some(total) => progress::create_download_progress(total, label),
                None => progress::create_byte_counter(label),
            };
            &owned_bar
        }
        ProgressTarget::Hidden => {
            owned_bar = ProgressBar::hidden();
            &owned_bar
        }
    };

    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;

    let result = async {
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| JingongoError::api_source("Download stream interrupted", e))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            bar.set_position(written);
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok::<(), JingongoError>(())
    }
    .await;

    match result {
        Ok(()) => {
            bar.finish();
            debug!(written, expected = ?total, "Download stream complete");
            Ok(written)
        }
        Err(e) => {
            bar.abandon();
            Err(e)
        }
    }
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed partial download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(error = %e, path = %path.display(), "Failed to remove partial download"),
    }
}
