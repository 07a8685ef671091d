// Engine error diagnostics - why a site refused to resolve
//
// Analyzes yt-dlp error output to determine:
// - Type of refusal (unsupported URL, geo-block, 403, rate limit, ...)
// - A cleaned single-line detail suitable for a client response

use lazy_static::lazy_static;
use regex::Regex;

/// Reasons why a site might refuse a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// No extractor knows this URL
    UnsupportedUrl,

    /// HTTP 403 Forbidden - general access denied
    Http403Forbidden,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Geographic restriction
    GeoBlocked,

    /// Network timeout (soft IP block)
    NetworkTimeout,

    /// Rate limiting (429 or similar)
    RateLimited,

    /// Bot detection / login wall triggered
    BotDetection,

    /// Private video requiring authorization
    PrivateVideo,

    /// Video deleted or unavailable
    VideoUnavailable,

    /// DRM-protected content
    DrmProtected,

    /// Member-only content
    MembersOnly,

    /// Generic/unknown refusal
    Unknown,
}

impl BlockingReason {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnsupportedUrl => "Unsupported URL",
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::NetworkTimeout => "Network timeout (possible IP throttling)",
            Self::RateLimited => "Rate limited by site",
            Self::BotDetection => "Bot detection triggered",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::MembersOnly => "Members-only content",
            Self::Unknown => "Unknown blocking reason",
        }
    }
}

/// Analyze error message and return blocking reason
pub fn diagnose_error(error: &str) -> BlockingReason {
    let lower = error.to_lowercase();

    // Check patterns in order of specificity

    if lower.contains("unsupported url") || lower.contains("is not a valid url") {
        return BlockingReason::UnsupportedUrl;
    }

    if lower.contains("drm")
        || lower.contains("widevine")
        || lower.contains("playready")
        || lower.contains("fairplay")
        || lower.contains("requires purchase")
        || lower.contains("rental")
    {
        return BlockingReason::DrmProtected;
    }

    if lower.contains("members only")
        || lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("available to members")
    {
        return BlockingReason::MembersOnly;
    }

    if lower.contains("age-restricted")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age_verification")
    {
        return BlockingReason::AgeRestricted;
    }

    if lower.contains("private video")
        || lower.contains("video is private")
        || lower.contains("sign in if you've been granted access")
    {
        return BlockingReason::PrivateVideo;
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("no longer available")
        || lower.contains("video is unavailable")
        || lower.contains("404")
    {
        return BlockingReason::VideoUnavailable;
    }

    if lower.contains("not available in your country")
        || lower.contains("geo restriction")
        || lower.contains("geo-restricted")
        || lower.contains("blocked in your country")
    {
        return BlockingReason::GeoBlocked;
    }

    if lower.contains("429") || lower.contains("rate limit") || lower.contains("too many requests") {
        return BlockingReason::RateLimited;
    }

    if lower.contains("not a bot")
        || lower.contains("captcha")
        || lower.contains("unusual traffic")
        || lower.contains("login required")
        || lower.contains("requires login")
    {
        return BlockingReason::BotDetection;
    }

    if lower.contains("403") || lower.contains("forbidden") {
        return BlockingReason::Http403Forbidden;
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network unreachable")
    {
        return BlockingReason::NetworkTimeout;
    }

    BlockingReason::Unknown
}

/// Reduce raw engine stderr to a single presentable line.
///
/// Prefers the last `ERROR:` line; strips ANSI colors, the `ERROR:` marker
/// and the `[extractor] id:` prefix yt-dlp puts in front of the message.
pub fn clean_error_message(error: &str) -> String {
    lazy_static! {
        static ref ANSI_RE: Regex = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        static ref ERROR_PREFIX_RE: Regex = Regex::new(r"^\s*ERROR:\s*").unwrap();
        static ref EXTRACTOR_PREFIX_RE: Regex =
            Regex::new(r"^\[[^\]]+\]\s*(?:[A-Za-z0-9_-]+:\s+)?").unwrap();
    }

    let plain = ANSI_RE.replace_all(error, "");
    let line = plain
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with("ERROR:"))
        .or_else(|| plain.lines().rev().find(|l| !l.trim().is_empty()))
        .unwrap_or("");

    let line = ERROR_PREFIX_RE.replace(line, "");
    let line = EXTRACTOR_PREFIX_RE.replace(&line, "");
    let cleaned = line.trim();

    if cleaned.is_empty() {
        "extraction failed".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_url_detection() {
        let error = "ERROR: Unsupported URL: https://example.com/";
        assert_eq!(diagnose_error(error), BlockingReason::UnsupportedUrl);
    }

    #[test]
    fn test_403_detection() {
        let error = "ERROR: unable to download video data: HTTP Error 403: Forbidden";
        assert_eq!(diagnose_error(error), BlockingReason::Http403Forbidden);
    }

    #[test]
    fn test_rate_limit_detection() {
        let error = "ERROR: [instagram] abc: HTTP Error 429: Too Many Requests";
        assert_eq!(diagnose_error(error), BlockingReason::RateLimited);
    }

    #[test]
    fn test_bot_detection() {
        let error = "ERROR: [youtube] dQw4w9WgXcQ: Sign in to confirm you're not a bot";
        assert_eq!(diagnose_error(error), BlockingReason::BotDetection);
    }

    #[test]
    fn test_geo_detection() {
        let error = "Video not available in your country";
        assert_eq!(diagnose_error(error), BlockingReason::GeoBlocked);
    }

    #[test]
    fn test_unavailable_detection() {
        let error = "ERROR: [youtube] xyz: Video unavailable. This video has been removed";
        assert_eq!(diagnose_error(error), BlockingReason::VideoUnavailable);
    }

    #[test]
    fn test_timeout_detection() {
        let error = "Read timed out. (read timeout=30)";
        assert_eq!(diagnose_error(error), BlockingReason::NetworkTimeout);
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(diagnose_error("something odd"), BlockingReason::Unknown);
    }

    #[test]
    fn test_clean_strips_prefixes() {
        let stderr = "WARNING: [youtube] falling back\n\
                      ERROR: [youtube] dQw4w9WgXcQ: Video unavailable\n";
        assert_eq!(clean_error_message(stderr), "Video unavailable");
    }

    #[test]
    fn test_clean_strips_ansi() {
        let stderr = "\x1b[0;31mERROR:\x1b[0m Unsupported URL: https://example.com/";
        assert_eq!(
            clean_error_message(stderr),
            "Unsupported URL: https://example.com/"
        );
    }

    #[test]
    fn test_clean_without_error_marker() {
        assert_eq!(clean_error_message("\nsomething broke\n\n"), "something broke");
        assert_eq!(clean_error_message(""), "extraction failed");
    }
}
