// Extraction profile - options handed to the engine on every call
//
// Tuned for reachability: mobile-client impersonation, per-site API hints,
// certificate checks off. Site-specific behavior lives only in the
// `sites` map; the orchestrator never branches per platform.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Slack on top of the engine's own timeout/retry budget
const DEADLINE_GRACE: Duration = Duration::from_secs(5);

/// A single per-site hint value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl HintValue {
    /// Engine-side representation: always a list of strings
    pub fn as_values(&self) -> Vec<String> {
        match self {
            Self::Flag(b) => vec![b.to_string()],
            Self::Text(s) => vec![s.clone()],
            Self::List(items) => items.clone(),
        }
    }
}

impl From<bool> for HintValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for HintValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<&[&str]> for HintValue {
    fn from(items: &[&str]) -> Self {
        Self::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// Opaque bag of engine hints for one site (extractor key)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub hints: BTreeMap<String, HintValue>,
}

impl SiteProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hint(mut self, key: &str, value: impl Into<HintValue>) -> Self {
        self.hints.insert(key.to_string(), value.into());
        self
    }

    /// `key=v1,v2;key2=v` as accepted by `--extractor-args site:...`
    fn to_cli_value(&self) -> String {
        self.hints
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.as_values().join(",")))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Immutable configuration for extraction calls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionProfile {
    pub format_preference: String,
    pub simulate_only: bool,
    pub force_direct_url: bool,
    pub allow_playlist_expansion: bool,
    pub network_timeout: Duration,
    pub retry_budget: u32,
    pub geo_bypass: bool,
    pub certificate_verification: bool,
    pub sites: BTreeMap<String, SiteProfile>,
    pub headers: Vec<(String, String)>,
}

impl ExtractionProfile {
    /// Default profile used for every resolution
    pub fn build() -> Self {
        let mut sites = BTreeMap::new();

        sites.insert(
            "youtube".to_string(),
            SiteProfile::new()
                .hint("player_client", &["android_creator", "android", "ios"][..])
                .hint("player_skip", &["webpage", "configs", "js"][..])
                .hint("skip", &["hls", "dash", "translated_subs"][..]),
        );
        sites.insert(
            "instagram".to_string(),
            SiteProfile::new().hint("skip_hls", true),
        );
        sites.insert(
            "tiktok".to_string(),
            SiteProfile::new()
                .hint("api_hostname", "api22-normal-c-useast2a.tiktokv.com")
                .hint("app_version", "34.1.2")
                .hint("manifest_app_version", "2023401020"),
        );
        sites.insert(
            "twitter".to_string(),
            SiteProfile::new().hint("api", "syndication"),
        );
        sites.insert(
            "reddit".to_string(),
            SiteProfile::new().hint("skip_hls", true),
        );

        Self {
            format_preference: "best".to_string(),
            simulate_only: true,
            force_direct_url: true,
            allow_playlist_expansion: false,
            network_timeout: Duration::from_secs(30),
            retry_budget: 3,
            geo_bypass: true,
            certificate_verification: false,
            sites,
            headers: vec![
                (
                    "User-Agent".to_string(),
                    "com.google.android.youtube/19.09.37 (Linux; U; Android 11) gzip".to_string(),
                ),
                ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
                ("Accept".to_string(), "*/*".to_string()),
            ],
        }
    }

    pub fn with_site(mut self, key: &str, site: SiteProfile) -> Self {
        self.sites.insert(key.to_string(), site);
        self
    }

    /// Replace a header of the same name (case-insensitive) or append it
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    pub fn with_retry_budget(mut self, retries: u32) -> Self {
        self.retry_budget = retries;
        self
    }

    /// Worst-case wall time of one engine call: every attempt hits the
    /// socket timeout, plus a little grace for process startup.
    pub fn engine_deadline(&self) -> Duration {
        self.network_timeout * (self.retry_budget + 1) + DEADLINE_GRACE
    }

    /// Options dictionary for `yt_dlp.YoutubeDL(...)`
    pub fn to_ydl_options(&self) -> Value {
        let extractor_args: Map<String, Value> = self
            .sites
            .iter()
            .map(|(site, profile)| {
                let hints: Map<String, Value> = profile
                    .hints
                    .iter()
                    .map(|(k, v)| (k.clone(), json!(v.as_values())))
                    .collect();
                (site.clone(), Value::Object(hints))
            })
            .collect();

        let http_headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        json!({
            "format": self.format_preference,
            "quiet": true,
            "no_warnings": true,
            "simulate": self.simulate_only,
            "skip_download": self.simulate_only,
            "force_url": self.force_direct_url,
            "noplaylist": !self.allow_playlist_expansion,
            "socket_timeout": self.network_timeout.as_secs_f64(),
            "retries": self.retry_budget,
            "geo_bypass": self.geo_bypass,
            "nocheckcertificate": !self.certificate_verification,
            "extractor_args": extractor_args,
            "http_headers": http_headers,
        })
    }

    /// Command-line flags for the `yt-dlp` binary (URL not included)
    pub fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-warnings".to_string(),
            "-f".to_string(),
            self.format_preference.clone(),
            "--socket-timeout".to_string(),
            self.network_timeout.as_secs_f64().to_string(),
            "--retries".to_string(),
            self.retry_budget.to_string(),
        ];

        if self.simulate_only {
            args.push("--simulate".to_string());
        }

        // Prefer progressive https renditions over HLS/DASH manifests
        if self.force_direct_url {
            args.push("--format-sort".to_string());
            args.push("proto".to_string());
        }

        if self.allow_playlist_expansion {
            args.push("--yes-playlist".to_string());
        } else {
            args.push("--no-playlist".to_string());
        }

        if self.geo_bypass {
            args.push("--geo-bypass".to_string());
        }

        if !self.certificate_verification {
            args.push("--no-check-certificates".to_string());
        }

        for (site, profile) in &self.sites {
            if profile.hints.is_empty() {
                continue;
            }
            args.push("--extractor-args".to_string());
            args.push(format!("{}:{}", site, profile.to_cli_value()));
        }

        for (name, value) in &self.headers {
            args.push("--add-header".to_string());
            args.push(format!("{}:{}", name, value));
        }

        args
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::build()
    }
}
