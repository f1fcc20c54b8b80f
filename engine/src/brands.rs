use crate::normalize::normalize_domain;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEntry {
    pub name: String,
    pub domains: Vec<String>,
}

impl BrandEntry {
    pub fn new<I, S>(name: &str, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.trim().to_lowercase(),
            domains: domains
                .into_iter()
                .map(|d| normalize_domain(d.as_ref().trim()))
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// True iff `domain` equals one of the brand's domains or is a subdomain of one.
    pub fn is_canonical(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        self.domains.iter().any(|canonical| {
            domain == *canonical
                || domain
                    .strip_suffix(canonical.as_str())
                    .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
        })
    }
}

/// Brand name to canonical domains. Iteration follows insertion order, which is
/// the tie-break order for every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandDictionary {
    entries: Vec<BrandEntry>,
}

impl BrandDictionary {
    pub fn new(entries: Vec<BrandEntry>) -> Self {
        let mut deduped: Vec<BrandEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.name.is_empty() {
                continue;
            }
            match deduped.iter_mut().find(|e| e.name == entry.name) {
                Some(existing) => {
                    for domain in entry.domains {
                        if !existing.domains.contains(&domain) {
                            existing.domains.push(domain);
                        }
                    }
                }
                None => deduped.push(entry),
            }
        }
        Self { entries: deduped }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrandEntry> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&BrandEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BrandDictionary {
    fn default() -> Self {
        Self::new(
            DEFAULT_BRANDS
                .iter()
                .map(|(name, domains)| BrandEntry::new(name, domains.iter()))
                .collect(),
        )
    }
}

const DEFAULT_BRANDS: &[(&str, &[&str])] = &[
    ("google", &["google.com", "google.co.uk", "google.de", "google.fr", "google.co.jp", "googleapis.com", "googleusercontent.com", "gmail.com", "youtube.com"]),
    ("microsoft", &["microsoft.com", "microsoftonline.com", "outlook.com"]),
    ("apple", &["apple.com", "icloud.com"]),
    ("amazon", &["amazon.com", "amazon.co.uk", "amazon.de", "amazon.co.jp", "amazonaws.com"]),
    ("paypal", &["paypal.com", "paypal.me", "paypalobjects.com"]),
    ("facebook", &["facebook.com", "facebookmail.com"]),
    ("instagram", &["instagram.com"]),
    ("whatsapp", &["whatsapp.com"]),
    ("netflix", &["netflix.com"]),
    ("linkedin", &["linkedin.com"]),
    ("twitter", &["twitter.com"]),
    ("github", &["github.com", "github.io", "githubusercontent.com"]),
    ("dropbox", &["dropbox.com", "dropboxusercontent.com"]),
    ("wellsfargo", &["wellsfargo.com"]),
    ("bankofamerica", &["bankofamerica.com"]),
    ("coinbase", &["coinbase.com"]),
    ("binance", &["binance.com"]),
];
