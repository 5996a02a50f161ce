//! Source audio download over HTTP.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Default request timeout for the whole download, not just connect.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Download a source audio file from `url` into `output_path`, streaming to
/// disk rather than buffering in memory, bounded by `timeout`.
///
/// Non-2xx responses are classified by status: 4xx maps to a non-retriable
/// error, 5xx to a retriable one (see `MediaError::kind`). A request-level
/// timeout maps to `MediaError::DownloadTimeout`, also retriable.
pub async fn download_audio(url: &str, output_path: impl AsRef<Path>, timeout: Duration) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MediaError::internal(format!("failed to build HTTP client: {e}")))?;

    info!("downloading source audio from {} to {}", url, output_path.display());

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            MediaError::DownloadTimeout
        } else {
            MediaError::download_failed(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!("source download returned HTTP {}", status.as_u16());
        return Err(MediaError::from_download_status(status.as_u16()));
    }

    let mut file = File::create(output_path).await?;
    let mut stream = response.bytes_stream();
    let mut total: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            if e.is_timeout() {
                MediaError::DownloadTimeout
            } else {
                MediaError::download_failed(e.to_string())
            }
        })?;
        file.write_all(&chunk).await?;
        total += chunk.len() as u64;
    }
    file.flush().await?;

    debug!("downloaded {} bytes to {}", total, output_path.display());

    if total == 0 {
        return Err(MediaError::download_failed("source returned an empty body"));
    }

    Ok(())
}

/// Reject obviously-unsupported source URLs before attempting a download.
pub fn is_supported_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
