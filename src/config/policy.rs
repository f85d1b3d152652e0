use crate::config::types::CrawlerConfig;
use crate::url::{is_same_domain, matching_exclusion, NormalizedUrl};
use std::fmt;

/// Immutable visitation policy for one crawl
///
/// Built once from the seed URL and the crawler configuration, then shared
/// read-only by the frontier and the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlPolicy {
    /// Maximum number of link hops from the seed (the seed is depth 0)
    pub depth_limit: u32,

    /// Only admit URLs whose host equals `start_domain`
    pub same_domain_only: bool,

    /// Substrings that exclude a URL
    pub exclude_patterns: Vec<String>,

    /// Lower-cased host of the seed URL
    pub start_domain: String,
}

/// Why the policy refused a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRejection {
    /// Host differs from the start domain while `same_domain_only` is set
    ForeignDomain(String),
    /// URL contains an exclusion pattern
    Excluded(String),
}

impl fmt::Display for PolicyRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignDomain(host) => write!(f, "foreign domain {}", host),
            Self::Excluded(pattern) => write!(f, "matches exclusion pattern '{}'", pattern),
        }
    }
}

impl CrawlPolicy {
    /// Derives the policy for a crawl starting at `seed`
    pub fn from_config(seed: &NormalizedUrl, config: &CrawlerConfig) -> Self {
        Self {
            depth_limit: config.depth_limit,
            same_domain_only: config.same_domain_only,
            exclude_patterns: config.exclude_patterns.clone(),
            start_domain: seed.host().to_lowercase(),
        }
    }

    /// Checks the domain and exclusion filters, in that order
    ///
    /// Scheme filtering has already happened: a `NormalizedUrl` is always
    /// `http` or `https`.
    pub fn check(&self, url: &NormalizedUrl) -> Result<(), PolicyRejection> {
        if self.same_domain_only && !is_same_domain(url, &self.start_domain) {
            return Err(PolicyRejection::ForeignDomain(url.host().to_string()));
        }

        if let Some(pattern) = matching_exclusion(url, &self.exclude_patterns) {
            return Err(PolicyRejection::Excluded(pattern.to_string()));
        }

        Ok(())
    }

    /// Returns true if the domain and exclusion filters both pass
    pub fn admits(&self, url: &NormalizedUrl) -> bool {
        self.check(url).is_ok()
    }

    /// Returns true if an entry at `depth` may be queued or processed
    pub fn within_depth(&self, depth: u32) -> bool {
        depth <= self.depth_limit
    }

    /// Returns true if a page at `depth` should have its links followed
    pub fn should_expand(&self, depth: u32) -> bool {
        depth < self.depth_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(same_domain_only: bool) -> CrawlPolicy {
        let seed = NormalizedUrl::parse("https://Example.com/").unwrap();
        let config = CrawlerConfig {
            same_domain_only,
            depth_limit: 2,
            ..CrawlerConfig::default()
        };
        CrawlPolicy::from_config(&seed, &config)
    }

    fn url(s: &str) -> NormalizedUrl {
        NormalizedUrl::parse(s).unwrap()
    }

    #[test]
    fn test_start_domain_from_seed() {
        assert_eq!(policy(true).start_domain, "example.com");
    }

    #[test]
    fn test_same_domain_admitted() {
        assert!(policy(true).admits(&url("https://example.com/x")));
    }

    #[test]
    fn test_subdomain_rejected() {
        assert_eq!(
            policy(true).check(&url("https://sub.example.com/x")),
            Err(PolicyRejection::ForeignDomain("sub.example.com".to_string()))
        );
    }

    #[test]
    fn test_foreign_domain_allowed_when_external() {
        assert!(policy(false).admits(&url("https://other.org/x")));
    }

    #[test]
    fn test_exclusion_applies_to_external_links() {
        assert_eq!(
            policy(false).check(&url("https://other.org/report.pdf")),
            Err(PolicyRejection::Excluded(".pdf".to_string()))
        );
    }

    #[test]
    fn test_domain_checked_before_exclusion() {
        assert!(matches!(
            policy(true).check(&url("https://other.org/report.pdf")),
            Err(PolicyRejection::ForeignDomain(_))
        ));
    }

    #[test]
    fn test_depth_bounds() {
        let p = policy(true);
        assert!(p.within_depth(0));
        assert!(p.within_depth(2));
        assert!(!p.within_depth(3));

        assert!(p.should_expand(1));
        assert!(!p.should_expand(2));
    }
}
