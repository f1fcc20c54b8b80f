use crate::{error::MalformedDestination, normalize::normalize_domain, types::Identifier};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("static regex"));

// Labels of 1-63 alphanumeric/hyphen chars without edge hyphens, ending in a 2+ letter suffix.
static DOMAIN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}\b")
        .expect("static regex")
});

// Group 1 is the number; the guards keep it from being cut out of a longer digit run.
static PHONE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d+])((?:\+?1[\-.\s]?)?\(?\d{3}\)?[\-.\s]?\d{3}[\-.\s]?\d{4})(?:$|\D)")
        .expect("static regex")
});

static EMAIL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+\-]+@(?:[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}")
        .expect("static regex")
});

// Domain first, then phone, then email. Scheme-prefixed input must carry a dotted host.
pub fn extract_identifier(text: &str) -> Result<Option<Identifier>, MalformedDestination> {
    if let Some(domain) = extract_domain(text)? {
        return Ok(Some(Identifier::Domain(domain)));
    }
    if let Some(phone) = extract_phone(text) {
        return Ok(Some(Identifier::Phone(phone)));
    }
    Ok(extract_email(text).map(Identifier::Email))
}

pub fn extract_domain(text: &str) -> Result<Option<String>, MalformedDestination> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    if URL_SCHEME.is_match(text) {
        let url = Url::parse(text).map_err(|e| MalformedDestination::new(text, e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| MalformedDestination::new(text, "URL has no host"))?;
        if !host.contains('.') {
            return Err(MalformedDestination::new(text, "host is not a DNS name"));
        }
        return Ok(Some(normalize_domain(host)));
    }

    Ok(DOMAIN_TOKEN
        .find(text)
        .map(|m| normalize_domain(m.as_str())))
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_TOKEN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| normalize_phone(m.as_str()))
}

pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest.to_string(),
        _ => digits,
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_TOKEN.find(text).map(|m| m.as_str().to_lowercase())
}
