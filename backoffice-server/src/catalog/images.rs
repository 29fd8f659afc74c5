//! Product Image Mirroring
//!
//! Downloads remote product images into the local images directory so the
//! dashboard does not depend on the remote CDN. WEBP sources are avoided
//! when a `.jpg`/`.jpeg`/`.png` sibling exists under the same URL stem.
//! Downloads land in a temp file first and are renamed into place, so a
//! crashed download never leaves a truncated image behind.

use std::path::Path;

/// Mirror a remote image for a product. Returns the local file path on
/// success, or None when every candidate failed (caller keeps the remote
/// URL unmirrored).
pub async fn mirror(
    http: &reqwest::Client,
    images_dir: &Path,
    product_id: i64,
    url: &str,
) -> Option<String> {
    for candidate in candidates(url) {
        match download(http, images_dir, product_id, &candidate).await {
            Ok(path) => return Some(path),
            Err(e) => {
                tracing::debug!(product_id, url = %candidate, "Image candidate failed: {}", e);
            }
        }
    }
    tracing::warn!(product_id, url, "Image mirroring failed, keeping remote URL");
    None
}

/// Candidate URLs in preference order. For a WEBP source the format
/// siblings come first, the original last.
fn candidates(url: &str) -> Vec<String> {
    let lower = url.to_ascii_lowercase();
    if let Some(stem) = lower.strip_suffix(".webp") {
        let stem = &url[..stem.len()];
        vec![
            format!("{stem}.jpg"),
            format!("{stem}.jpeg"),
            format!("{stem}.png"),
            url.to_string(),
        ]
    } else {
        vec![url.to_string()]
    }
}

async fn download(
    http: &reqwest::Client,
    images_dir: &Path,
    product_id: i64,
    url: &str,
) -> Result<String, anyhow::Error> {
    let resp = http.get(url).send().await?;
    if !resp.status().is_success() {
        anyhow::bail!("HTTP {}", resp.status());
    }

    let content_type = resp
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let bytes = resp.bytes().await?;
    if bytes.is_empty() {
        anyhow::bail!("Empty body");
    }

    let ext = extension_for(url, &content_type);
    let final_path = images_dir.join(format!("{product_id}.{ext}"));
    let tmp_path = images_dir.join(format!("{product_id}.{ext}.tmp"));

    tokio::fs::write(&tmp_path, &bytes).await?;
    tokio::fs::rename(&tmp_path, &final_path).await?;

    Ok(final_path.to_string_lossy().into_owned())
}

/// Extension from the URL path, falling back to the content-type
fn extension_for(url: &str, content_type: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
        return ext.to_ascii_lowercase();
    }
    mime_guess::get_mime_extensions_str(content_type)
        .and_then(|exts| exts.first())
        .map(|e| e.to_string())
        .unwrap_or_else(|| "jpg".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webp_prefers_format_siblings() {
        let c = candidates("https://cdn.example.com/img/dress-1.webp");
        assert_eq!(c[0], "https://cdn.example.com/img/dress-1.jpg");
        assert_eq!(c[1], "https://cdn.example.com/img/dress-1.jpeg");
        assert_eq!(c[2], "https://cdn.example.com/img/dress-1.png");
        assert_eq!(c[3], "https://cdn.example.com/img/dress-1.webp");
    }

    #[test]
    fn non_webp_is_used_directly() {
        let c = candidates("https://cdn.example.com/img/dress-1.jpg");
        assert_eq!(c, vec!["https://cdn.example.com/img/dress-1.jpg"]);
    }

    #[test]
    fn extension_falls_back_to_content_type() {
        assert_eq!(extension_for("https://x/img.png?v=2", ""), "png");
        assert_eq!(extension_for("https://x/img", "image/png"), "png");
        assert_eq!(extension_for("https://x/img", ""), "jpg");
    }
}
