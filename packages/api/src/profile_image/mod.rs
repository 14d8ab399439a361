//! # Profile images fetched from a URL — SSRF-guarded
//!
//! Users set their profile image by submitting a URL. The server downloads it,
//! which makes the URL an attacker-controlled request target. [`ImageFetcher`]
//! only lets a request out when it provably goes to a public address.
//!
//! ## Validation (no network traffic before all of these pass)
//!
//! 1. The URL parses and its scheme is exactly `http` or `https`.
//! 2. It has a non-empty host.
//! 3. The host resolves through the [`HostResolver`]. A resolver error or an
//!    empty answer is a refusal, not a retry.
//! 4. No resolved address is private, loopback, link-local, multicast or
//!    reserved (see [`address`]).
//!
//! Any failure here is [`ImageFetchError::UnsafeUrl`].
//!
//! ## Download
//!
//! | Step | Limit | Failure |
//! |------|-------|---------|
//! | GET through the [`ImageTransport`], pinned to the checked addresses | [`FETCH_TIMEOUT`] for the whole exchange | [`ImageFetchError::FetchFailed`] |
//! | status | 2xx only | [`ImageFetchError::FetchFailed`] |
//! | `Content-Type` (or extension guess when absent) | `image/*` | [`ImageFetchError::NotAnImage`] |
//! | body, counted per chunk while streaming | [`MAX_IMAGE_SIZE`] | [`ImageFetchError::TooLarge`] |
//!
//! Transport and resolver error types never leak out; they are folded into
//! `FetchFailed` or `UnsafeUrl`.

pub mod address;
mod resolver;
mod transport;

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::StreamExt;
use url::{Host, Url};

pub use resolver::{HostResolver, SystemResolver};
pub use transport::{BodyStream, HttpTransport, ImageResponse, ImageTransport, TransportError};

/// Largest accepted image body, 2 MiB.
pub const MAX_IMAGE_SIZE: usize = 2 * 1024 * 1024;

/// Deadline for the whole download, headers and body.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub const USER_AGENT: &str = "Notebook-ProfileImageFetcher/1.0";

/// MIME type assumed for stored images with no recorded type.
pub const DEFAULT_IMAGE_TYPE: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum ImageFetchError {
    #[error("Unsafe image URL.")]
    UnsafeUrl,
    #[error("URL does not point to an image.")]
    NotAnImage,
    #[error("Image is too large.")]
    TooLarge,
    #[error("Could not fetch image: {0}")]
    FetchFailed(String),
}

/// A downloaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl InlineImage {
    /// Render as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

pub struct ImageFetcher<R = SystemResolver, T = HttpTransport> {
    resolver: R,
    transport: T,
    max_bytes: usize,
    timeout: Duration,
}

impl ImageFetcher {
    /// Fetcher using the platform resolver and a `reqwest` transport.
    pub fn new() -> Self {
        Self::with_parts(
            SystemResolver,
            HttpTransport::new(USER_AGENT, FETCH_TIMEOUT),
        )
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HostResolver + Sync, T: ImageTransport + Sync> ImageFetcher<R, T> {
    pub fn with_parts(resolver: R, transport: T) -> Self {
        Self {
            resolver,
            transport,
            max_bytes: MAX_IMAGE_SIZE,
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Validate `url`, download it, and return the image bytes and MIME type.
    pub async fn fetch_inline_image(&self, url: &str) -> Result<InlineImage, ImageFetchError> {
        let url = Url::parse(url).map_err(|_| ImageFetchError::UnsafeUrl)?;
        let addrs = self.validate(&url).await?;

        match tokio::time::timeout(self.timeout, self.download(&url, &addrs)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %url, "profile image fetch timed out");
                Err(ImageFetchError::FetchFailed("request timed out".into()))
            }
        }
    }

    /// Resolve the host and check every address. Returns what the transport may connect to.
    async fn validate(&self, url: &Url) -> Result<Vec<SocketAddr>, ImageFetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            tracing::warn!(scheme = url.scheme(), "rejected image URL scheme");
            return Err(ImageFetchError::UnsafeUrl);
        }
        let port = url
            .port_or_known_default()
            .ok_or(ImageFetchError::UnsafeUrl)?;

        let ips = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => {
                match tokio::time::timeout(self.timeout, self.resolver.resolve(domain, port)).await {
                    Ok(Ok(ips)) => ips,
                    Ok(Err(e)) => {
                        tracing::warn!(host = domain, error = %e, "image host did not resolve");
                        return Err(ImageFetchError::UnsafeUrl);
                    }
                    Err(_) => {
                        tracing::warn!(host = domain, "image host resolution timed out");
                        return Err(ImageFetchError::UnsafeUrl);
                    }
                }
            }
            Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
            Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
            _ => return Err(ImageFetchError::UnsafeUrl),
        };

        if ips.is_empty() {
            return Err(ImageFetchError::UnsafeUrl);
        }
        if let Some(ip) = ips.iter().find(|ip| address::is_forbidden(**ip)) {
            tracing::warn!(%ip, host = url.host_str(), "rejected image URL targeting internal address");
            return Err(ImageFetchError::UnsafeUrl);
        }

        Ok(ips.into_iter().map(|ip| SocketAddr::new(ip, port)).collect())
    }

    async fn download(&self, url: &Url, addrs: &[SocketAddr]) -> Result<InlineImage, ImageFetchError> {
        let response = self
            .transport
            .get(url, addrs)
            .await
            .map_err(|e| ImageFetchError::FetchFailed(e.to_string()))?;

        if !(200..300).contains(&response.status) {
            return Err(ImageFetchError::FetchFailed(format!(
                "server answered HTTP {}",
                response.status
            )));
        }

        let mime_type = effective_mime_type(response.content_type.as_deref(), url)
            .ok_or(ImageFetchError::NotAnImage)?;

        let mut body = response.body;
        let mut bytes = Vec::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ImageFetchError::FetchFailed(e.to_string()))?;
            if bytes.len() + chunk.len() > self.max_bytes {
                tracing::warn!(url = %url, limit = self.max_bytes, "profile image exceeds size limit");
                return Err(ImageFetchError::TooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(InlineImage { bytes, mime_type })
    }
}

/// `Content-Type` without parameters, or a guess from the path when the header is absent.
/// `None` unless the result is an image type.
fn effective_mime_type(content_type: Option<&str>, url: &Url) -> Option<String> {
    let mime = match content_type {
        Some(value) => value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase(),
        None => mime_guess::from_path(url.path())
            .first()?
            .essence_str()
            .to_string(),
    };
    mime.starts_with("image/").then_some(mime)
}
