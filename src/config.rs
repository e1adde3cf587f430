//! Application-level configuration loading and the origin allow-list policy.

use std::env;

use thiserror::Error;
use tracing::{info, warn};

/// Environment variable holding the comma-separated origin allow-list.
const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";
/// Environment variable enabling the strict referer check.
const REFERER_CHECK_ENV: &str = "REFERER_CHECK";
/// Port used when neither `PORT` nor `SERVER_PORT` is set.
const DEFAULT_PORT: u16 = 8080;
/// MongoDB endpoint used when `MONGO_URI` is not set.
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Immutable runtime configuration read from the environment at startup.
///
/// The core request handlers never read configuration themselves; everything
/// they need (the persistence handle, the access policy) is injected at
/// composition time.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the server listens on.
    pub port: u16,
    /// MongoDB connection URI.
    pub mongo_uri: String,
    /// MongoDB database name override.
    pub mongo_db: Option<String>,
    /// Origins permitted to call the endpoint; empty means open.
    pub allowed_origins: Vec<String>,
    /// Whether the referer header is matched against the allow-list too.
    pub check_referer: bool,
}

impl AppConfig {
    /// Load the configuration from environment variables, falling back to
    /// permissive defaults where a variable is absent.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.into());
        let mongo_db = env::var("MONGO_DB").ok();

        let allowed_origins = env::var(ALLOWED_ORIGINS_ENV)
            .map(|raw| parse_origin_list(&raw))
            .unwrap_or_default();
        let check_referer = env::var(REFERER_CHECK_ENV)
            .map(|raw| parse_flag(&raw))
            .unwrap_or(false);

        if allowed_origins.is_empty() {
            info!("no origin allow-list configured; accepting any origin");
        } else {
            info!(
                origins = allowed_origins.len(),
                check_referer, "origin allow-list configured"
            );
        }

        if check_referer && allowed_origins.is_empty() {
            warn!("{REFERER_CHECK_ENV} is set but the allow-list is empty; flag has no effect");
        }

        Self {
            port,
            mongo_uri,
            mongo_db,
            allowed_origins,
            check_referer,
        }
    }

    /// Build the access policy enforced in front of the request handlers.
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.allowed_origins.clone(), self.check_referer)
    }
}

/// Split a comma-separated origin list, normalizing each entry.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_origin)
        .filter(|origin| !origin.is_empty())
        .collect()
}

/// Lowercase and strip surrounding whitespace plus any trailing slash, so
/// `https://Example.com/` and `https://example.com` compare equal.
fn normalize_origin(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_ascii_lowercase()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true" | "TRUE" | "yes")
}

/// Reason a request was rejected by the [`AccessPolicy`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessViolation {
    /// The declared origin is not on the allow-list.
    #[error("origin not allowed")]
    OriginNotAllowed,
    /// The referer header does not point back to an allowed origin.
    #[error("referer not allowed")]
    RefererNotAllowed,
}

/// Static allow-list predicate run before a request reaches the handler.
///
/// Carries no state beyond the configured list; each check is a pure
/// function of the request headers.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    allowed_origins: Vec<String>,
    check_referer: bool,
}

impl AccessPolicy {
    /// Build a policy from an already-normalized origin list.
    pub fn new(allowed_origins: Vec<String>, check_referer: bool) -> Self {
        Self {
            allowed_origins,
            check_referer,
        }
    }

    /// Policy that admits every request.
    pub fn open() -> Self {
        Self::default()
    }

    /// Evaluate the declared origin and referer against the allow-list.
    ///
    /// An empty allow-list admits everything. A request without an `Origin`
    /// header is admitted as well (non-browser callers do not declare one);
    /// a declared origin must match the list exactly. The referer is only
    /// consulted in strict mode, and an unparseable referer is rejected.
    pub fn evaluate(
        &self,
        origin: Option<&str>,
        referer: Option<&str>,
    ) -> Result<(), AccessViolation> {
        if self.allowed_origins.is_empty() {
            return Ok(());
        }

        if let Some(origin) = origin
            && !self.matches(origin)
        {
            return Err(AccessViolation::OriginNotAllowed);
        }

        if self.check_referer
            && let Some(referer) = referer
        {
            match referer_origin(referer) {
                Some(origin) if self.matches(origin) => {}
                _ => return Err(AccessViolation::RefererNotAllowed),
            }
        }

        Ok(())
    }

    fn matches(&self, origin: &str) -> bool {
        let normalized = normalize_origin(origin);
        self.allowed_origins.iter().any(|entry| *entry == normalized)
    }
}

/// Extract the `scheme://authority` prefix of a referer URL.
fn referer_origin(referer: &str) -> Option<&str> {
    let scheme_end = referer.find("://")?;
    let authority_start = scheme_end + 3;
    let rest = &referer[authority_start..];
    if rest.is_empty() {
        return None;
    }
    match rest.find('/') {
        Some(path_start) => Some(&referer[..authority_start + path_start]),
        None => Some(referer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_list_parsing_normalizes_entries() {
        let origins = parse_origin_list(" https://Game.example.com/ ,http://localhost:3000,, ");
        assert_eq!(
            origins,
            vec![
                "https://game.example.com".to_string(),
                "http://localhost:3000".to_string()
            ]
        );
    }

    #[test]
    fn empty_allow_list_admits_everything() {
        let policy = AccessPolicy::open();
        assert!(policy.evaluate(Some("https://evil.example.com"), None).is_ok());
        assert!(policy.evaluate(None, None).is_ok());
    }

    fn strict_policy() -> AccessPolicy {
        AccessPolicy::new(vec!["https://game.example.com".into()], true)
    }

    #[test]
    fn matching_origin_is_admitted() {
        let policy = strict_policy();
        assert!(policy.evaluate(Some("https://game.example.com"), None).is_ok());
        // Case and trailing slash are not significant.
        assert!(
            policy
                .evaluate(Some("https://Game.Example.com/"), None)
                .is_ok()
        );
    }

    #[test]
    fn non_matching_origin_is_rejected() {
        let policy = strict_policy();
        assert_eq!(
            policy.evaluate(Some("https://evil.example.com"), None),
            Err(AccessViolation::OriginNotAllowed)
        );
    }

    #[test]
    fn absent_origin_is_admitted() {
        let policy = strict_policy();
        assert!(policy.evaluate(None, None).is_ok());
    }

    #[test]
    fn referer_checked_only_in_strict_mode() {
        let lax = AccessPolicy::new(vec!["https://game.example.com".into()], false);
        assert!(
            lax.evaluate(None, Some("https://evil.example.com/page"))
                .is_ok()
        );

        let strict = strict_policy();
        assert_eq!(
            strict.evaluate(None, Some("https://evil.example.com/page")),
            Err(AccessViolation::RefererNotAllowed)
        );
        assert!(
            strict
                .evaluate(None, Some("https://game.example.com/lobby?x=1"))
                .is_ok()
        );
    }

    #[test]
    fn unparseable_referer_is_rejected_in_strict_mode() {
        let strict = strict_policy();
        assert_eq!(
            strict.evaluate(None, Some("not a url")),
            Err(AccessViolation::RefererNotAllowed)
        );
    }

    #[test]
    fn referer_origin_extraction() {
        assert_eq!(
            referer_origin("https://game.example.com/lobby/1"),
            Some("https://game.example.com")
        );
        assert_eq!(
            referer_origin("http://localhost:3000"),
            Some("http://localhost:3000")
        );
        assert_eq!(referer_origin("garbage"), None);
        assert_eq!(referer_origin("https://"), None);
    }
}
