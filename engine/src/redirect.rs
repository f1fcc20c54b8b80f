use crate::{
    config::EngineConfig,
    error::NetworkError,
    normalize::{normalize_domain, DomainNormalizer},
    types::DetectionResult,
};
use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect::Policy};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};
use url::Url;

/// Resolves where a URL actually leads. Injected so the engine never owns a transport.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    async fn resolve_redirect(&self, url: &str) -> Result<String, NetworkError>;
}

/// Single-hop resolver: one `HEAD` request, redirects not followed, `Location` read.
pub struct HttpRedirectResolver {
    client: reqwest::Client,
}

impl HttpRedirectResolver {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RedirectResolver for HttpRedirectResolver {
    async fn resolve_redirect(&self, url: &str) -> Result<String, NetworkError> {
        let base = Url::parse(url).map_err(|_| NetworkError::InvalidUrl(url.to_string()))?;
        let response = self.client.head(base.clone()).send().await?;

        if !response.status().is_redirection() {
            return Ok(url.to_string());
        }
        let Some(location) = response.headers().get(LOCATION) else {
            return Ok(url.to_string());
        };
        let location = location
            .to_str()
            .map_err(|_| NetworkError::InvalidLocation(format!("{:?}", location)))?;
        let next = base
            .join(location)
            .map_err(|e| NetworkError::InvalidLocation(format!("{}: {}", location, e)))?;

        debug!("{} redirects to {}", url, next);
        Ok(next.to_string())
    }
}

/// Runs the bounded redirect probe and judges its outcome.
#[derive(Clone)]
pub struct RedirectAuditor {
    resolver: Arc<dyn RedirectResolver>,
    normalizer: DomainNormalizer,
    timeout: Duration,
    file_extensions: Vec<String>,
}

impl RedirectAuditor {
    pub fn new(resolver: Arc<dyn RedirectResolver>, config: &EngineConfig) -> Self {
        Self {
            resolver,
            normalizer: DomainNormalizer::new(config.multi_level_tlds.clone()),
            timeout: config.redirect_timeout,
            file_extensions: config.file_extensions.clone(),
        }
    }

    /// Never suspicious on failure: a probe that errors or times out yields
    /// `RedirectUnverified`.
    pub async fn check_redirect(&self, url: &str) -> DetectionResult {
        let probe = tokio::time::timeout(self.timeout, self.resolver.resolve_redirect(url)).await;
        let final_url = match probe {
            Ok(Ok(final_url)) => final_url,
            Ok(Err(e)) => return self.unverified(url, e),
            Err(_) => return self.unverified(url, NetworkError::Timeout(self.timeout)),
        };
        let Ok(parsed_final) = Url::parse(&final_url) else {
            return self.unverified(url, NetworkError::InvalidLocation(final_url));
        };

        let original_site = Url::parse(url).ok().and_then(|u| self.site_of(&u));
        let final_site = self.site_of(&parsed_final);
        if original_site != final_site {
            return DetectionResult::CrossSiteRedirect {
                original_url: url.to_string(),
                final_url,
                original_domain: original_site.unwrap_or_default(),
                final_domain: final_site.unwrap_or_default(),
            };
        }

        if let Some(extension) = self.download_extension(&parsed_final) {
            return DetectionResult::FileDownload {
                original_url: url.to_string(),
                final_url,
                extension,
            };
        }

        DetectionResult::RedirectVerified {
            url: url.to_string(),
            final_url,
        }
    }

    fn unverified(&self, url: &str, error: NetworkError) -> DetectionResult {
        warn!("Could not verify destination of {}: {}", url, error);
        metrics::counter!("redirect_probe_failures_total").increment(1);
        DetectionResult::RedirectUnverified {
            url: url.to_string(),
            error: error.to_string(),
        }
    }

    // Registrable domain (label and suffix), or the bare host when it has none.
    fn site_of(&self, url: &Url) -> Option<String> {
        let host = normalize_domain(url.host_str()?);
        Some(
            self.normalizer
                .registrable_domain(&host)
                .map(|r| r.domain())
                .unwrap_or(host),
        )
    }

    fn download_extension(&self, url: &Url) -> Option<String> {
        let file_name = url.path().rsplit('/').next()?;
        let (_, extension) = file_name.rsplit_once('.')?;
        let extension = extension.to_lowercase();
        self.file_extensions
            .iter()
            .any(|e| *e == extension)
            .then_some(extension)
    }
}
