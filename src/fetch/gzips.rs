use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Download the given `.tsv.gz` URL and save it at `dest_path`.
/// A file already present at `dest_path` is reused without re-downloading.
/// Returns the path of the saved file.
pub async fn download_gz(
    client: &Client,
    url_str: &str,
    dest_path: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dest_path = dest_path.as_ref();

    if fs::try_exists(dest_path).await? {
        info!(path = %dest_path.display(), "archive already on disk; skipping download");
        return Ok(dest_path.to_path_buf());
    }

    let url = Url::parse(url_str).with_context(|| format!("Invalid dataset URL: {}", url_str))?;

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut attempt = 0;
    let bytes = loop {
        attempt += 1;
        match client.get(url.as_str()).send().await {
            Ok(resp) if resp.status().is_success() => match resp.bytes().await {
                Ok(bytes) => break bytes,
                Err(_) if attempt < MAX_RETRIES => {
                    warn!(url = %url, attempt, "body read failed; retrying");
                    sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e.into()),
            },
            Ok(resp) if attempt < MAX_RETRIES => {
                warn!(url = %url, status = %resp.status(), attempt, "HTTP error; retrying");
                sleep(RETRY_DELAY).await;
            }
            Ok(resp) => bail!("HTTP error {} fetching {}", resp.status(), url),
            Err(_) if attempt < MAX_RETRIES => {
                warn!(url = %url, attempt, "request failed; retrying");
                sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e.into()),
        }
    };

    fs::write(&dest_path, &bytes)
        .await
        .with_context(|| format!("writing archive to {}", dest_path.display()))?;

    Ok(dest_path.to_path_buf())
}
