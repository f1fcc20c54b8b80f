use crate::{
    brands::{BrandDictionary, BrandEntry},
    config::EngineConfig,
    normalize::{normalize_domain, DomainNormalizer},
    types::{DetectionResult, Scheme},
};
use tracing::debug;
use url::Url;

pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Matches hosts against the brand dictionary, both literally and by edit distance.
#[derive(Debug, Clone)]
pub struct BrandMatcher {
    dictionary: BrandDictionary,
    normalizer: DomainNormalizer,
    threshold: usize,
}

impl BrandMatcher {
    pub fn new(dictionary: BrandDictionary, normalizer: DomainNormalizer, threshold: usize) -> Self {
        Self {
            dictionary,
            normalizer,
            threshold,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.brands.clone(),
            DomainNormalizer::new(config.multi_level_tlds.clone()),
            config.typosquat_threshold,
        )
    }

    // Labels left to right, brands in dictionary order; first hit wins.
    pub fn extract_brand_from_domain(&self, domain: &str) -> Option<&BrandEntry> {
        let domain = normalize_domain(domain);
        domain
            .split('.')
            .filter(|label| !label.is_empty())
            .find_map(|label| {
                self.dictionary.iter().find(|brand| {
                    label.contains(brand.name.as_str())
                        || brand.domains.iter().any(|canonical| {
                            self.normalizer.registrable_label(canonical).as_deref() == Some(label)
                        })
                })
            })
    }

    pub fn is_canonical_domain(&self, domain: &str, brand: &str) -> bool {
        self.dictionary
            .get(&brand.trim().to_lowercase())
            .is_some_and(|entry| entry.is_canonical(domain))
    }

    pub fn detect_brand_typosquatting(&self, url: &str) -> DetectionResult {
        let host = match Url::parse(url.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                parsed.host_str().unwrap_or_default().to_string()
            }
            _ => {
                return DetectionResult::NotWebScheme {
                    scheme: Scheme::of(url),
                }
            }
        };
        let domain = normalize_domain(&host);

        if let Some(brand) = self.extract_brand_from_domain(&domain) {
            debug!("Brand {} referenced by {}", brand.name, domain);
            return if brand.is_canonical(&domain) {
                DetectionResult::ValidCanonicalDomain {
                    brand: brand.name.clone(),
                    domain,
                }
            } else {
                DetectionResult::BrandNotCanonical {
                    brand: brand.name.clone(),
                    domain,
                    canonical_domains: brand.domains.clone(),
                }
            };
        }

        let Some(label) = self.normalizer.registrable_label(&domain) else {
            return DetectionResult::NoBrandMatch { domain };
        };

        for brand in self.dictionary.iter() {
            let Some((distance, nearest)) = self.nearest_candidate(&label, brand) else {
                continue;
            };
            if distance > 0 && distance <= self.threshold && !brand.is_canonical(&domain) {
                debug!(
                    "Typosquatting suspected: {} is {} edit(s) from {} ({})",
                    label, distance, nearest, brand.name
                );
                return DetectionResult::Typosquatting {
                    brand: brand.name.clone(),
                    domain,
                    label,
                    distance,
                    nearest_match: nearest,
                };
            }
        }

        DetectionResult::NoBrandMatch { domain }
    }

    // Ties keep the earlier candidate.
    fn nearest_candidate(&self, label: &str, brand: &BrandEntry) -> Option<(usize, String)> {
        std::iter::once(brand.name.clone())
            .chain(
                brand
                    .domains
                    .iter()
                    .filter_map(|canonical| self.normalizer.registrable_label(canonical)),
            )
            .fold(None, |best: Option<(usize, String)>, candidate| {
                let distance = levenshtein_distance(label, &candidate);
                match best {
                    Some((best_distance, _)) if best_distance <= distance => best,
                    _ => Some((distance, candidate)),
                }
            })
    }
}

impl Default for BrandMatcher {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
