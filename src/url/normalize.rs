use crate::UrlError;
use std::fmt;
use url::Url;

/// A canonical URL used as the identity key for deduplication
///
/// A normalized URL always has an `http` or `https` scheme, a lower-cased host,
/// no fragment, and no empty trailing `?`. Two links point at the "same page"
/// iff their normalized forms are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Parses and normalizes an absolute URL string
    ///
    /// # Examples
    ///
    /// ```
    /// use site_harvest::url::NormalizedUrl;
    ///
    /// let url = NormalizedUrl::parse("HTTPS://Example.COM/docs?page=2#intro").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/docs?page=2");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(url)
    }

    /// Normalizes an already-parsed URL
    pub fn from_url(mut url: Url) -> Result<Self, UrlError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
        }

        // The url crate lower-cases scheme and registered host names on parse
        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost(url.to_string()));
        }

        url.set_fragment(None);
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(Self(url))
    }

    /// Returns the normalized URL as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the lower-cased host of this URL
    pub fn host(&self) -> &str {
        // Construction guarantees a non-empty host
        self.0.host_str().unwrap_or_default()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Resolves a raw link against the page it was found on and normalizes it
///
/// # Normalization Steps
///
/// 1. Resolve `raw_href` relative to `base_url` (dot segments are collapsed)
/// 2. Reject anything that is not `http` or `https`
/// 3. Lower-case scheme and host
/// 4. Strip the fragment; keep the query string unless it is empty
///
/// # Arguments
///
/// * `base_url` - The URL of the page the link was found on
/// * `raw_href` - The link target exactly as it appeared in the markup
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - The canonical form of the link
/// * `Err(UrlError::InvalidUrl)` - The href could not be resolved
/// * `Err(UrlError::UnsupportedScheme)` - The href resolved to e.g. `mailto:`
///
/// # Examples
///
/// ```
/// use site_harvest::url::{normalize, NormalizedUrl};
///
/// let base = NormalizedUrl::parse("https://example.com/docs/intro").unwrap();
/// let url = normalize(base.as_url(), "../about#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize(base_url: &Url, raw_href: &str) -> Result<NormalizedUrl, UrlError> {
    let href = raw_href.trim();
    let resolved = base_url.join(href).map_err(|e| UrlError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })?;
    NormalizedUrl::from_url(resolved)
}
