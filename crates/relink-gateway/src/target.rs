use axum::http::header::HOST;
use axum::http::HeaderMap;
use relink_core::ShortCode;
use thiserror::Error;
use url::Url;

/// Longest display label kept after sanitization.
pub const MAX_LABEL_LEN: usize = 32;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("request has no Host header and no public base URL is configured")]
    MissingHost,
    #[error("invalid Host header: {0}")]
    InvalidHost(String),
    #[error("public base URL must be an absolute http(s) URL: {0}")]
    InvalidBase(String),
}

/// Scheme and authority of an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOrigin<'a> {
    pub scheme: &'a str,
    pub host: &'a str,
}

impl<'a> RequestOrigin<'a> {
    /// Reads the origin from the `Host` and `X-Forwarded-Proto` headers.
    pub fn from_headers(headers: &'a HeaderMap) -> Option<Self> {
        let host = headers.get(HOST)?.to_str().ok()?;
        let scheme = match headers
            .get(FORWARDED_PROTO)
            .and_then(|value| value.to_str().ok())
        {
            Some(proto) if proto.trim().eq_ignore_ascii_case("https") => "https",
            _ => "http",
        };
        Some(Self { scheme, host })
    }
}

/// Builds the URL that gets encoded into a link's QR code.
///
/// The URL is `{base}/r/{code}`, where the base is the configured public URL
/// or, failing that, the origin of the request. A display label can be put
/// in the user-info part (`https://label@host/r/code`); scanner apps show it
/// but it plays no part in resolving the code.
#[derive(Debug, Clone, Default)]
pub struct RedirectTargets {
    public_base_url: Option<Url>,
    default_label: Option<String>,
}

impl RedirectTargets {
    pub fn new(
        public_base_url: Option<Url>,
        default_label: Option<&str>,
    ) -> Result<Self, TargetError> {
        if let Some(base) = &public_base_url {
            if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
                return Err(TargetError::InvalidBase(base.to_string()));
            }
        }

        Ok(Self {
            public_base_url,
            default_label: default_label.and_then(sanitize_label),
        })
    }

    /// Resolves the base URL for a request.
    pub fn base_url(&self, origin: Option<RequestOrigin<'_>>) -> Result<Url, TargetError> {
        if let Some(base) = &self.public_base_url {
            return Ok(base.clone());
        }

        let origin = origin.ok_or(TargetError::MissingHost)?;
        let host = origin.host.trim();
        if host.is_empty()
            || host
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '@' | '?' | '#'))
        {
            return Err(TargetError::InvalidHost(origin.host.to_string()));
        }

        Url::parse(&format!("{}://{}", origin.scheme, host))
            .map_err(|_| TargetError::InvalidHost(origin.host.to_string()))
    }

    /// Builds the redirect URL of `code` under `base`.
    ///
    /// `label` is sanitized first; if nothing survives, the configured default
    /// label is used, and without one the user-info part is left out.
    pub fn redirect_url(&self, base: &Url, code: &ShortCode, label: Option<&str>) -> Url {
        let mut url = base.clone();
        let path = format!("{}/r/{}", url.path().trim_end_matches('/'), code);
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);

        let label = label
            .and_then(sanitize_label)
            .or_else(|| self.default_label.clone())
            .unwrap_or_default();
        // only fails for URLs without a host, which base_url never returns
        let _ = url.set_password(None);
        let _ = url.set_username(&label);

        url
    }
}

/// Reduces a free-form title to a label that is safe in a URL's user-info.
///
/// Keeps ASCII letters, digits, `.`, `_` and `-`; runs of whitespace become a
/// single `-`; everything else is dropped. Returns `None` if nothing is left.
pub fn sanitize_label(raw: &str) -> Option<String> {
    let mut label = String::with_capacity(raw.len().min(MAX_LABEL_LEN));

    for c in raw.trim().chars() {
        if label.len() >= MAX_LABEL_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            label.push(c);
        } else if c.is_whitespace() && !label.is_empty() && !label.ends_with('-') {
            label.push('-');
        }
    }

    let label = label.trim_end_matches('-');
    (!label.is_empty()).then(|| label.to_string())
}
