use relink_core::ShortenerError;
use url::Url;

/// Validates a redirect destination: it must parse and use `http` or `https`.
///
/// Returns the trimmed URL as given by the caller, not the normalized form,
/// so the stored target is exactly what was submitted.
pub fn validate_target_url(raw: &str) -> Result<&str, ShortenerError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ShortenerError::InvalidUrl(
            "URL cannot be empty".to_string(),
        ));
    }

    // the URL parser silently drops tabs and newlines, but the stored target is the raw input
    if url.chars().any(char::is_control) {
        return Err(ShortenerError::InvalidUrl(
            "URL cannot contain control characters".to_string(),
        ));
    }

    let parsed =
        Url::parse(url).map_err(|e| ShortenerError::InvalidUrl(format!("{url}: {e}")))?;

    // http(s) URLs always parse with a non-empty host, so the scheme is all that's left to check
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            parsed.scheme()
        )));
    }

    Ok(url)
}
