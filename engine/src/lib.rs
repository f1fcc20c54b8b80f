//! Detects links whose visible text misleads about where they go: domain
//! mismatches, brand impersonation and typosquatting, plain-HTTP transport,
//! non-ASCII hosts, cross-site redirects, and mismatched phone numbers or
//! email addresses.

pub mod brands;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod redirect;
pub mod routes;
pub mod transport;
pub mod typosquat;
pub mod types;

pub use brands::{BrandDictionary, BrandEntry};
pub use config::{EngineConfig, ServiceConfig};
pub use engine::LinkAnalyzer;
pub use error::{AppError, MalformedDestination, NetworkError};
pub use extract::{extract_domain, extract_email, extract_identifier, extract_phone};
pub use normalize::{normalize_domain, DomainNormalizer, MultiLevelTldTable, RegistrableDomain};
pub use redirect::{HttpRedirectResolver, RedirectResolver};
pub use transport::{detect_insecure_http, detect_punycode};
pub use typosquat::{levenshtein_distance, BrandMatcher};
pub use types::{DetectionResult, Identifier, LinkContext, ReasonCode, Scheme};
