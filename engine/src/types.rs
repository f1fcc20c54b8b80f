use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use uuid::Uuid;

/// A link as rendered on a page: what the user reads and where it really goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkContext {
    pub visible_text: String,
    pub href_url: String,
}

impl LinkContext {
    pub fn new(visible_text: impl Into<String>, href_url: impl Into<String>) -> Self {
        Self {
            visible_text: visible_text.into(),
            href_url: href_url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
    Ftp,
    Mailto,
    Tel,
    Sms,
    Other,
    Invalid,
}

impl Scheme {
    /// Classifies a URL by its scheme. Anything `url` cannot parse is `Invalid`.
    pub fn of(url: &str) -> Self {
        match Url::parse(url.trim()) {
            Ok(parsed) => match parsed.scheme() {
                "http" => Scheme::Http,
                "https" => Scheme::Https,
                "ftp" => Scheme::Ftp,
                "mailto" => Scheme::Mailto,
                "tel" => Scheme::Tel,
                "sms" => Scheme::Sms,
                _ => Scheme::Other,
            },
            Err(_) => Scheme::Invalid,
        }
    }

    pub fn is_web(&self) -> bool {
        matches!(self, Scheme::Http | Scheme::Https)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Ftp => "ftp",
            Scheme::Mailto => "mailto",
            Scheme::Tel => "tel",
            Scheme::Sms => "sms",
            Scheme::Other => "other",
            Scheme::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Identifier {
    Domain(String),
    Email(String),
    /// Digits only.
    Phone(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    MissingInput,
    AsciiOnly,
    SecureTransport,
    NotWebScheme,
    ValidCanonicalDomain,
    NoBrandMatch,
    RedirectVerified,
    RedirectUnverified,
    NoPhoneInText,
    PhoneMatch,
    NoEmailToCompare,
    EmailMatch,
    NothingToCompare,
    DomainMatch,
    NonAsciiUrl,
    InsecureHttp,
    CrossSiteRedirect,
    FileDownload,
    BrandNotCanonical,
    Typosquatting,
    PhoneMismatch,
    EmailMismatch,
    InvalidUrl,
    DomainMismatch,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::MissingInput => "missing_input",
            ReasonCode::AsciiOnly => "ascii_only",
            ReasonCode::SecureTransport => "secure_transport",
            ReasonCode::NotWebScheme => "not_web_scheme",
            ReasonCode::ValidCanonicalDomain => "valid_canonical_domain",
            ReasonCode::NoBrandMatch => "no_brand_match",
            ReasonCode::RedirectVerified => "redirect_verified",
            ReasonCode::RedirectUnverified => "redirect_unverified",
            ReasonCode::NoPhoneInText => "no_phone_in_text",
            ReasonCode::PhoneMatch => "phone_match",
            ReasonCode::NoEmailToCompare => "no_email_to_compare",
            ReasonCode::EmailMatch => "email_match",
            ReasonCode::NothingToCompare => "nothing_to_compare",
            ReasonCode::DomainMatch => "domain_match",
            ReasonCode::NonAsciiUrl => "non_ascii_url",
            ReasonCode::InsecureHttp => "insecure_http",
            ReasonCode::CrossSiteRedirect => "cross_site_redirect",
            ReasonCode::FileDownload => "file_download",
            ReasonCode::BrandNotCanonical => "brand_not_canonical",
            ReasonCode::Typosquatting => "typosquatting",
            ReasonCode::PhoneMismatch => "phone_mismatch",
            ReasonCode::EmailMismatch => "email_mismatch",
            ReasonCode::InvalidUrl => "invalid_url",
            ReasonCode::DomainMismatch => "domain_mismatch",
        }
    }

    /// Human-readable explanation shown next to a flagged link.
    pub fn message(&self) -> &'static str {
        match self {
            ReasonCode::MissingInput => "Missing text or URL",
            ReasonCode::AsciiOnly => "URL contains only ASCII characters",
            ReasonCode::SecureTransport => "Connection is not plain HTTP",
            ReasonCode::NotWebScheme => "Not http/https",
            ReasonCode::ValidCanonicalDomain => "Valid canonical domain",
            ReasonCode::NoBrandMatch => "No brand impersonation detected",
            ReasonCode::RedirectVerified => "Destination verified",
            ReasonCode::RedirectUnverified => "Could not verify (network error)",
            ReasonCode::NoPhoneInText => "No phone number in link text",
            ReasonCode::PhoneMatch => "Phone numbers match",
            ReasonCode::NoEmailToCompare => "Nothing to compare",
            ReasonCode::EmailMatch => "Email addresses match",
            ReasonCode::NothingToCompare => "Nothing to compare",
            ReasonCode::DomainMatch => "Domains match",
            ReasonCode::NonAsciiUrl => "Punycode or non-ASCII characters in URL",
            ReasonCode::InsecureHttp => "Insecure connection (HTTP)",
            ReasonCode::CrossSiteRedirect => "Redirects to different site",
            ReasonCode::FileDownload => "Leads to file download",
            ReasonCode::BrandNotCanonical => "Brand found but not canonical",
            ReasonCode::Typosquatting => "Potential typosquatting",
            ReasonCode::PhoneMismatch => "Phone number mismatch",
            ReasonCode::EmailMismatch => "Email address mismatch",
            ReasonCode::InvalidUrl => "Invalid URL",
            ReasonCode::DomainMismatch => "Domain mismatch",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Verdict for one link. Each variant carries only the data relevant to its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DetectionResult {
    MissingInput,
    AsciiOnly,
    SecureTransport,
    NotWebScheme {
        scheme: Scheme,
    },
    ValidCanonicalDomain {
        brand: String,
        domain: String,
    },
    NoBrandMatch {
        domain: String,
    },
    RedirectVerified {
        url: String,
        final_url: String,
    },
    RedirectUnverified {
        url: String,
        error: String,
    },
    NoPhoneInText {
        actual_phone: Option<String>,
    },
    PhoneMatch {
        phone: String,
    },
    NoEmailToCompare,
    EmailMatch {
        email: String,
    },
    NothingToCompare {
        actual_domain: String,
    },
    DomainMatch {
        domain: String,
    },

    NonAsciiUrl {
        url: String,
        non_ascii: String,
        ascii_host: Option<String>,
    },
    InsecureHttp {
        url: String,
    },
    CrossSiteRedirect {
        original_url: String,
        final_url: String,
        original_domain: String,
        final_domain: String,
    },
    FileDownload {
        original_url: String,
        final_url: String,
        extension: String,
    },
    BrandNotCanonical {
        brand: String,
        domain: String,
        canonical_domains: Vec<String>,
    },
    Typosquatting {
        brand: String,
        domain: String,
        label: String,
        distance: usize,
        nearest_match: String,
    },
    PhoneMismatch {
        visible_phone: String,
        actual_phone: String,
        visible_text: String,
        href: String,
    },
    EmailMismatch {
        visible_email: String,
        actual_email: String,
    },
    InvalidUrl {
        href: String,
        error: String,
    },
    DomainMismatch {
        visible_domain: String,
        actual_domain: String,
        visible_text: String,
        href: String,
    },
}

impl DetectionResult {
    pub fn reason(&self) -> ReasonCode {
        match self {
            DetectionResult::MissingInput => ReasonCode::MissingInput,
            DetectionResult::AsciiOnly => ReasonCode::AsciiOnly,
            DetectionResult::SecureTransport => ReasonCode::SecureTransport,
            DetectionResult::NotWebScheme { .. } => ReasonCode::NotWebScheme,
            DetectionResult::ValidCanonicalDomain { .. } => ReasonCode::ValidCanonicalDomain,
            DetectionResult::NoBrandMatch { .. } => ReasonCode::NoBrandMatch,
            DetectionResult::RedirectVerified { .. } => ReasonCode::RedirectVerified,
            DetectionResult::RedirectUnverified { .. } => ReasonCode::RedirectUnverified,
            DetectionResult::NoPhoneInText { .. } => ReasonCode::NoPhoneInText,
            DetectionResult::PhoneMatch { .. } => ReasonCode::PhoneMatch,
            DetectionResult::NoEmailToCompare => ReasonCode::NoEmailToCompare,
            DetectionResult::EmailMatch { .. } => ReasonCode::EmailMatch,
            DetectionResult::NothingToCompare { .. } => ReasonCode::NothingToCompare,
            DetectionResult::DomainMatch { .. } => ReasonCode::DomainMatch,
            DetectionResult::NonAsciiUrl { .. } => ReasonCode::NonAsciiUrl,
            DetectionResult::InsecureHttp { .. } => ReasonCode::InsecureHttp,
            DetectionResult::CrossSiteRedirect { .. } => ReasonCode::CrossSiteRedirect,
            DetectionResult::FileDownload { .. } => ReasonCode::FileDownload,
            DetectionResult::BrandNotCanonical { .. } => ReasonCode::BrandNotCanonical,
            DetectionResult::Typosquatting { .. } => ReasonCode::Typosquatting,
            DetectionResult::PhoneMismatch { .. } => ReasonCode::PhoneMismatch,
            DetectionResult::EmailMismatch { .. } => ReasonCode::EmailMismatch,
            DetectionResult::InvalidUrl { .. } => ReasonCode::InvalidUrl,
            DetectionResult::DomainMismatch { .. } => ReasonCode::DomainMismatch,
        }
    }

    pub fn is_suspicious(&self) -> bool {
        matches!(
            self,
            DetectionResult::NonAsciiUrl { .. }
                | DetectionResult::InsecureHttp { .. }
                | DetectionResult::CrossSiteRedirect { .. }
                | DetectionResult::FileDownload { .. }
                | DetectionResult::BrandNotCanonical { .. }
                | DetectionResult::Typosquatting { .. }
                | DetectionResult::PhoneMismatch { .. }
                | DetectionResult::EmailMismatch { .. }
                | DetectionResult::InvalidUrl { .. }
                | DetectionResult::DomainMismatch { .. }
        )
    }

    pub fn message(&self) -> &'static str {
        self.reason().message()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<AnalyzeRequest> for LinkContext {
    fn from(request: AnalyzeRequest) -> Self {
        LinkContext::new(request.text.unwrap_or_default(), request.url.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub is_suspicious: bool,
    pub reason: ReasonCode,
    pub message: String,
    pub details: DetectionResult,
    pub latency_ms: f64,
}

impl AnalyzeResponse {
    pub fn new(details: DetectionResult, latency_ms: f64) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            is_suspicious: details.is_suspicious(),
            reason: details.reason(),
            message: details.message().to_string(),
            details,
            latency_ms,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub links: Vec<AnalyzeRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchAnalyzeResponse {
    pub results: Vec<AnalyzeResponse>,
}
