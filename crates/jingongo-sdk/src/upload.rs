//! Archive upload through a signed storage URL

use crate::api::{endpoints, UploadInitRequest, UploadInitResponse};
use crate::error::{JingongoError, Result};
use crate::packager::PackagedProject;
use crate::transport::{status_error, Transport};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::{error, info, instrument};

/// Request a signed URL, stream the archive to it and return the upload id
///
/// The PUT to the signed URL carries no API key; the URL itself is the
/// credential.
#[instrument(skip(transport, archive), fields(size = archive.size_bytes()))]
pub async fn upload_archive(
    transport: &Transport,
    archive: &PackagedProject,
    model_name: &str,
    version: &str,
) -> Result<String> {
    let init = UploadInitRequest {
        model_name: model_name.to_string(),
        version: version.to_string(),
        file_size_bytes: archive.size_bytes(),
    };
    let response: UploadInitResponse = transport.post_json(endpoints::UPLOAD_INIT, &init).await?;

    let (upload_url, upload_id) = match (response.upload_url, response.upload_id) {
        (Some(url), Some(id)) if !url.is_empty() && !id.is_empty() => (url, id),
        _ => {
            return Err(JingongoError::api(
                "Failed to get upload URL or upload ID from server",
            ))
        }
    };

    info!(upload_id = %upload_id, "Uploading zipped project to signed URL");
    put_file(transport.http(), &upload_url, archive).await?;
    info!(upload_id = %upload_id, "Upload complete");

    Ok(upload_id)
}

async fn put_file(http: &reqwest::Client, url: &str, archive: &PackagedProject) -> Result<()> {
    let file = tokio::fs::File::open(archive.path()).await?;

    let response = http
        .put(url)
        .header(CONTENT_TYPE, "application/zip")
        .header(CONTENT_LENGTH, archive.size_bytes())
        .body(reqwest::Body::from(file))
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "Archive upload failed");
            JingongoError::api_source("Failed to upload project archive", e)
        })?;

    if !response.status().is_success() {
        return Err(status_error(response, "signed upload URL").await);
    }

    Ok(())
}
