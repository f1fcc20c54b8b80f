use crate::types::DetectionResult;

// Any non-ASCII character anywhere in the URL, whatever its scheme.
pub fn detect_punycode(url: &str) -> DetectionResult {
    if url.is_ascii() {
        return DetectionResult::AsciiOnly;
    }

    let non_ascii: String = url.chars().filter(|c| !c.is_ascii()).collect();
    DetectionResult::NonAsciiUrl {
        url: url.to_string(),
        non_ascii,
        ascii_host: raw_host(url).and_then(|host| idna::domain_to_ascii(host).ok()),
    }
}

pub fn detect_insecure_http(url: &str) -> DetectionResult {
    match url.trim().split_once(':') {
        Some((scheme, _)) if scheme.eq_ignore_ascii_case("http") => DetectionResult::InsecureHttp {
            url: url.to_string(),
        },
        _ => DetectionResult::SecureTransport,
    }
}

// Host portion of `scheme://[userinfo@]host[:port]/...` without any decoding.
fn raw_host(url: &str) -> Option<&str> {
    let (_, rest) = url.trim().split_once("://")?;
    let authority = rest.split(&['/', '?', '#'][..]).next()?;
    let host_port = authority.rsplit('@').next()?;
    let host = host_port.split(':').next()?;
    (!host.is_empty()).then_some(host)
}
