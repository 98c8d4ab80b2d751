//! Printable scan-code link and image download.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::config::QrConfig;

/// Link to a QR image encoding `code`
pub fn generator_url(config: &QrConfig, code: &str) -> String {
    format!(
        "{}?size={size}x{size}&data={}&bgcolor={}&color={}",
        config.generator_url,
        urlencoding::encode(code),
        config.background,
        config.foreground,
        size = config.size,
    )
}

/// Fetch the QR image for `code` and write it to `output`; returns the byte count
pub async fn download(config: &QrConfig, code: &str, output: &Path) -> Result<usize> {
    let url = generator_url(config, code);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .context("Failed to build HTTP client")?;

    let image = client
        .get(&url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .with_context(|| format!("Failed to fetch QR image from {}", config.generator_url))?
        .bytes()
        .await
        .context("Failed to read QR image")?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(output, &image)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(path = %output.display(), bytes = image.len(), "QR image saved");

    Ok(image.len())
}
