use crate::{
    config::EngineConfig,
    error::NetworkError,
    extract::{extract_domain, extract_email, extract_phone, normalize_phone},
    redirect::{HttpRedirectResolver, RedirectAuditor, RedirectResolver},
    transport::{detect_insecure_http, detect_punycode},
    typosquat::BrandMatcher,
    types::{DetectionResult, LinkContext, Scheme},
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Decides whether a link's visible text misrepresents its destination.
///
/// Holds only read-only state, so one instance can serve concurrent callers.
pub struct LinkAnalyzer {
    matcher: BrandMatcher,
    redirects: RedirectAuditor,
}

impl LinkAnalyzer {
    pub fn new(config: EngineConfig, resolver: Arc<dyn RedirectResolver>) -> Self {
        info!(
            "Initializing link analyzer: {} brands, {} multi-level suffixes, threshold {}",
            config.brands.len(),
            config.multi_level_tlds.len(),
            config.typosquat_threshold
        );

        let matcher = BrandMatcher::from_config(&config);
        let redirects = RedirectAuditor::new(resolver, &config);

        Self {
            matcher,
            redirects,
        }
    }

    /// Builds an analyzer that probes redirects over HTTP.
    pub fn with_http_resolver(config: EngineConfig, user_agent: &str) -> Result<Self, NetworkError> {
        let resolver = HttpRedirectResolver::new(config.redirect_timeout, user_agent)?;
        Ok(Self::new(config, Arc::new(resolver)))
    }

    /// Runs the checks in order and returns the first suspicious verdict, or the
    /// verdict of the final identifier comparison when nothing fires.
    pub async fn analyze_link(&self, visible_text: &str, href_url: &str) -> DetectionResult {
        let text = visible_text.trim();
        let href = href_url.trim();
        if text.is_empty() || href.is_empty() {
            return DetectionResult::MissingInput;
        }

        debug!("Analyzing link {:?} -> {}", text, href);

        let verdict = detect_punycode(href);
        if verdict.is_suspicious() {
            return verdict;
        }

        let verdict = detect_insecure_http(href);
        if verdict.is_suspicious() {
            return verdict;
        }

        let scheme = Scheme::of(href);
        if scheme.is_web() {
            let verdict = self.redirects.check_redirect(href).await;
            if verdict.is_suspicious() {
                return verdict;
            }

            let verdict = self.matcher.detect_brand_typosquatting(href);
            if verdict.is_suspicious() {
                return verdict;
            }
        }

        match scheme {
            Scheme::Tel | Scheme::Sms => compare_phones(text, href),
            Scheme::Mailto => compare_emails(text, href),
            _ => compare_domains(text, href),
        }
    }

    pub async fn analyze(&self, link: &LinkContext) -> DetectionResult {
        self.analyze_link(&link.visible_text, &link.href_url).await
    }

    /// Analyzes every link concurrently. Results follow input order.
    pub async fn analyze_many(&self, links: &[LinkContext]) -> Vec<DetectionResult> {
        join_all(links.iter().map(|link| self.analyze(link))).await
    }
}

fn compare_phones(text: &str, href: &str) -> DetectionResult {
    let actual = extract_phone(href).unwrap_or_else(|| {
        let target = href.split_once(':').map_or(href, |(_, rest)| rest);
        normalize_phone(target.split('?').next().unwrap_or(target))
    });

    let Some(visible) = extract_phone(text) else {
        return DetectionResult::NoPhoneInText {
            actual_phone: (!actual.is_empty()).then_some(actual),
        };
    };

    if visible == actual {
        DetectionResult::PhoneMatch { phone: actual }
    } else {
        DetectionResult::PhoneMismatch {
            visible_phone: visible,
            actual_phone: actual,
            visible_text: text.to_string(),
            href: href.to_string(),
        }
    }
}

fn compare_emails(text: &str, href: &str) -> DetectionResult {
    match (extract_email(text), extract_email(href)) {
        (Some(visible), Some(actual)) if visible != actual => DetectionResult::EmailMismatch {
            visible_email: visible,
            actual_email: actual,
        },
        (Some(_), Some(actual)) => DetectionResult::EmailMatch { email: actual },
        _ => DetectionResult::NoEmailToCompare,
    }
}

fn compare_domains(text: &str, href: &str) -> DetectionResult {
    let actual = match extract_domain(href) {
        Ok(Some(domain)) => domain,
        Ok(None) => {
            return DetectionResult::InvalidUrl {
                href: href.to_string(),
                error: "no domain in destination".to_string(),
            }
        }
        Err(e) => {
            return DetectionResult::InvalidUrl {
                href: href.to_string(),
                error: e.to_string(),
            }
        }
    };

    let visible = match extract_domain(text) {
        Ok(Some(domain)) => domain,
        _ => return DetectionResult::NothingToCompare { actual_domain: actual },
    };

    // Subdomains must match exactly.
    if visible == actual {
        DetectionResult::DomainMatch { domain: actual }
    } else {
        DetectionResult::DomainMismatch {
            visible_domain: visible,
            actual_domain: actual,
            visible_text: text.to_string(),
            href: href.to_string(),
        }
    }
}
