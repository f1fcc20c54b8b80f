use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9+.\-]*://").expect("static regex"));

const WWW: &str = "www.";

// A host that starts with `www.www.` keeps both prefixes, otherwise a second pass would strip again.
pub fn normalize_domain(domain: &str) -> String {
    let lower = domain.to_lowercase();
    let without_scheme = match SCHEME_PREFIX.find(&lower) {
        Some(m) => &lower[m.end()..],
        None => lower.as_str(),
    };
    let host = match without_scheme.find(&['/', '?', '#'][..]) {
        Some(idx) => &without_scheme[..idx],
        None => without_scheme,
    };
    // Fully qualified hosts carry a trailing root dot.
    strip_www(host.trim_end_matches('.')).to_string()
}

fn strip_www(host: &str) -> &str {
    match host.strip_prefix(WWW) {
        Some(rest) if !rest.starts_with(WWW) => rest,
        _ => host,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLevelTldTable {
    suffixes: HashSet<String>,
}

impl MultiLevelTldTable {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().trim().trim_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, suffix: &str) -> bool {
        self.suffixes.contains(suffix)
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

impl Default for MultiLevelTldTable {
    fn default() -> Self {
        Self::new(DEFAULT_MULTI_LEVEL_TLDS)
    }
}

pub const DEFAULT_MULTI_LEVEL_TLDS: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "ltd.uk", "plc.uk", "net.uk",
    "com.au", "net.au", "org.au", "edu.au", "gov.au",
    "co.nz", "org.nz", "net.nz",
    "co.jp", "ne.jp", "or.jp", "ac.jp",
    "co.in", "net.in", "org.in", "gov.in",
    "co.za", "org.za",
    "co.kr", "or.kr",
    "com.br", "net.br", "org.br",
    "com.cn", "net.cn", "org.cn",
    "com.mx", "com.ar", "com.tr", "com.sg", "com.hk", "com.tw", "com.my",
    "co.id", "co.il", "co.th",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrableDomain {
    pub label: String,
    pub suffix: String,
}

impl RegistrableDomain {
    pub fn domain(&self) -> String {
        format!("{}.{}", self.label, self.suffix)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DomainNormalizer {
    tlds: MultiLevelTldTable,
}

impl DomainNormalizer {
    pub fn new(tlds: MultiLevelTldTable) -> Self {
        Self { tlds }
    }

    // Without a multi-level match the last label is taken as the suffix.
    pub fn registrable_domain(&self, domain: &str) -> Option<RegistrableDomain> {
        let domain = domain.trim_end_matches('.');
        let domain = domain.strip_prefix(WWW).unwrap_or(domain);
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return None;
        }

        // Suffix candidates from longest (labels[1..]) to shortest; a match must
        // leave at least one label in front of it.
        let boundary = (1..labels.len() - 1)
            .find(|&start| self.tlds.contains(&labels[start..].join(".")))
            .unwrap_or(labels.len() - 1);

        Some(RegistrableDomain {
            label: labels[boundary - 1].to_string(),
            suffix: labels[boundary..].join("."),
        })
    }

    pub fn registrable_label(&self, domain: &str) -> Option<String> {
        self.registrable_domain(domain).map(|r| r.label)
    }
}
