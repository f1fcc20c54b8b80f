mod common;

use common::{analyzer_with, StubResolver};
use linkguard_engine::{
    BrandDictionary, BrandEntry, BrandMatcher, DetectionResult, DomainNormalizer, EngineConfig,
    LinkAnalyzer, LinkContext, MultiLevelTldTable, ReasonCode,
};
use std::sync::Arc;

#[tokio::test]
async fn domain_mismatch_reports_both_domains() {
    let analyzer = analyzer_with(StubResolver::passthrough());
    let result = analyzer
        .analyze_link("Go to google.com", "https://evil-site.com")
        .await;

    assert!(result.is_suspicious());
    assert_eq!(result.message(), "Domain mismatch");
    let details = serde_json::to_value(&result).unwrap();
    assert_eq!(details["reason"], "domain_mismatch");
    assert_eq!(details["visible_domain"], "google.com");
    assert_eq!(details["actual_domain"], "evil-site.com");
}

#[tokio::test]
async fn matching_domain_with_www_is_clean() {
    let analyzer = analyzer_with(StubResolver::passthrough());
    let result = analyzer
        .analyze_link("Go to google.com", "https://www.google.com")
        .await;
    assert!(!result.is_suspicious(), "{:?}", result);
}

#[tokio::test]
async fn plain_http_is_flagged_before_anything_else() {
    let resolver = StubResolver::passthrough();
    let analyzer = analyzer_with(resolver.clone());
    let result = analyzer.analyze_link("example.com", "http://example.com").await;

    assert_eq!(result.reason(), ReasonCode::InsecureHttp);
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn phone_numbers_are_compared_by_digits() {
    let analyzer = analyzer_with(StubResolver::passthrough());

    let mismatch = analyzer
        .analyze_link("Call (555) 123-4567", "tel:+1-555-999-8888")
        .await;
    assert_eq!(mismatch.reason(), ReasonCode::PhoneMismatch);
    assert_eq!(mismatch.message(), "Phone number mismatch");

    let matched = analyzer
        .analyze_link("Call (555) 123-4567", "tel:+1-555-123-4567")
        .await;
    assert!(!matched.is_suspicious());
}

#[tokio::test]
async fn order_numbers_in_text_are_not_phone_numbers() {
    let analyzer = analyzer_with(StubResolver::passthrough());
    let result = analyzer
        .analyze_link("Order 1234567890123 - call (555) 123-4567", "tel:+1-555-123-4567")
        .await;
    assert!(!result.is_suspicious(), "{:?}", result);
}

#[tokio::test]
async fn root_dot_host_is_the_same_site() {
    let analyzer = analyzer_with(StubResolver::passthrough());
    let result = analyzer.analyze_link("google.com", "https://google.com./").await;
    assert!(!result.is_suspicious(), "{:?}", result);
}

#[tokio::test]
async fn network_error_alone_never_flags_a_link() {
    let resolver = StubResolver::failing();
    let analyzer = analyzer_with(resolver.clone());

    let result = analyzer
        .analyze_link("Go to google.com", "https://www.google.com")
        .await;
    assert!(!result.is_suspicious(), "{:?}", result);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn non_ascii_href_short_circuits_other_checks() {
    let resolver = StubResolver::passthrough();
    let analyzer = analyzer_with(resolver.clone());

    let result = analyzer
        .analyze_link("apple.com", "https://\u{0430}pple.com/signin")
        .await;

    assert_eq!(result.reason(), ReasonCode::NonAsciiUrl);
    assert_eq!(resolver.calls(), 0);
    let details = serde_json::to_value(&result).unwrap();
    assert!(details.get("distance").is_none());
    assert!(details.get("final_url").is_none());
    assert_eq!(details["ascii_host"], "xn--pple-43d.com");
}

#[tokio::test]
async fn cross_site_redirect_is_flagged() {
    let analyzer = analyzer_with(StubResolver::with_redirects(&[(
        "https://short.example/x1",
        "https://collect-credentials.net/login",
    )]));

    let result = analyzer
        .analyze_link("short.example", "https://short.example/x1")
        .await;
    match result {
        DetectionResult::CrossSiteRedirect {
            original_url,
            final_url,
            ..
        } => {
            assert_eq!(original_url, "https://short.example/x1");
            assert_eq!(final_url, "https://collect-credentials.net/login");
        }
        other => panic!("unexpected verdict: {:?}", other),
    }
}

#[tokio::test]
async fn terminal_download_is_flagged() {
    let analyzer = analyzer_with(StubResolver::passthrough());
    let result = analyzer
        .analyze_link("example.com", "https://example.com/invoice.zip")
        .await;
    assert_eq!(result.reason(), ReasonCode::FileDownload);
}

#[tokio::test]
async fn typosquat_is_flagged_through_the_analyzer() {
    let config = EngineConfig {
        brands: BrandDictionary::new(vec![BrandEntry::new("npm", ["npmjs.com"])]),
        ..EngineConfig::default()
    };
    let analyzer = LinkAnalyzer::new(config, StubResolver::passthrough());

    let result = analyzer
        .analyze_link("nompjs.com", "https://nompjs.com/package/left-pad")
        .await;
    match result {
        DetectionResult::Typosquatting {
            brand,
            distance,
            nearest_match,
            ..
        } => {
            assert_eq!(brand, "npm");
            assert_eq!(distance, 2);
            assert_eq!(nearest_match, "npmjs");
        }
        other => panic!("unexpected verdict: {:?}", other),
    }
}

#[tokio::test]
async fn brand_impersonation_in_compound_label() {
    let analyzer = analyzer_with(StubResolver::passthrough());
    let result = analyzer
        .analyze_link("paypal-security-alert.com", "https://paypal-security-alert.com")
        .await;
    assert_eq!(result.reason(), ReasonCode::BrandNotCanonical);
}

#[tokio::test]
async fn concurrent_analysis_is_order_independent() {
    let analyzer = Arc::new(analyzer_with(StubResolver::passthrough()));
    let links = vec![
        LinkContext::new("Go to google.com", "https://evil-site.com"),
        LinkContext::new("Go to google.com", "https://www.google.com"),
        LinkContext::new("Call (555) 123-4567", "tel:+1-555-999-8888"),
    ];

    let forward = analyzer.analyze_many(&links).await;
    let mut reversed_links = links.clone();
    reversed_links.reverse();
    let mut backward = analyzer.analyze_many(&reversed_links).await;
    backward.reverse();
    assert_eq!(forward, backward);

    let handles: Vec<_> = links
        .iter()
        .cloned()
        .map(|link| {
            let analyzer = analyzer.clone();
            tokio::spawn(async move { analyzer.analyze(&link).await })
        })
        .collect();
    for (handle, expected) in handles.into_iter().zip(forward) {
        assert_eq!(handle.await.unwrap(), expected);
    }
}

#[test]
fn pure_checks_are_callable_without_a_runtime() {
    let matcher = BrandMatcher::new(
        BrandDictionary::new(vec![BrandEntry::new("npm", ["npmjs.com"])]),
        DomainNormalizer::new(MultiLevelTldTable::default()),
        2,
    );
    assert!(matcher.detect_brand_typosquatting("https://nompjs.com").is_suspicious());
    assert_eq!(
        matcher.detect_brand_typosquatting("https://npmjs.com").message(),
        "Valid canonical domain"
    );
    assert!(linkguard_engine::detect_insecure_http("http://example.com").is_suspicious());
    assert!(!linkguard_engine::detect_punycode("https://example.com").is_suspicious());
    assert_eq!(linkguard_engine::normalize_domain("https://WWW.Example.com/a"), "example.com");
    assert_eq!(linkguard_engine::levenshtein_distance("npmjs", "nompjs"), 2);
}
