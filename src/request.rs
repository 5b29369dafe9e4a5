//! Request/response model and request classification.
//!
//! The proxy is transport-agnostic: it only ever inspects a request's
//! method, URL path and mode, and a response's status. This module holds
//! those minimal shapes plus the classifier that routes each request to
//! one of the four fetch strategies.
//!
//! Classification is evaluated in priority order:
//!
//! 1. **Navigation** - top-level page load (`RequestMode::Navigate`)
//! 2. **Static asset** - URL path ends in a known asset extension
//! 3. **API call** - URL path matches a configured backend prefix
//! 4. **Default** - anything else

use serde::{Deserialize, Serialize};

/// HTTP method, restricted to what the proxy needs to inspect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// True for GET. Only GET responses are eligible for the API
    /// partition; mutating requests are never cached.
    pub fn is_get(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        };
        write!(f, "{}", s)
    }
}

/// How the request was issued by the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestMode {
    /// Top-level page load.
    Navigate,
    /// Everything else: scripts, styles, data fetches.
    Subresource,
}

/// An outgoing request as seen by the proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub mode: RequestMode,
}

impl Request {
    /// A subresource GET, the overwhelmingly common case.
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            method: Method::Get,
            url: url.into(),
            mode: RequestMode::Subresource,
        }
    }

    /// A top-level navigation.
    pub fn navigate(url: impl Into<String>) -> Self {
        Request {
            method: Method::Get,
            url: url.into(),
            mode: RequestMode::Navigate,
        }
    }

    /// A subresource request with an explicit method.
    pub fn with_method(method: Method, url: impl Into<String>) -> Self {
        Request {
            method,
            url: url.into(),
            mode: RequestMode::Subresource,
        }
    }

    /// Cache identity: `"{method} {url}"`.
    ///
    /// Two requests with the same identity share a cache entry; entries
    /// are last-write-wins per identity.
    pub fn cache_identity(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// The path component of the URL (no scheme/host/query).
    pub fn path(&self) -> &str {
        let rest = match self.url.find("://") {
            Some(idx) => {
                let after = &self.url[idx + 3..];
                match after.find('/') {
                    Some(slash) => &after[slash..],
                    None => "/",
                }
            }
            None => self.url.as_str(),
        };
        match rest.find(['?', '#']) {
            Some(idx) => &rest[..idx],
            None => rest,
        }
    }
}

/// A response snapshot as seen by the proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Response {
            status,
            body: body.into(),
            content_type: None,
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Response::new(200, body)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Cache-eligibility: strictly status 200. Redirects, partial
    /// content and errors are never stored.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Which strategy family a request falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestClass {
    Navigation,
    StaticAsset,
    Api,
    Default,
}

impl std::fmt::Display for RequestClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestClass::Navigation => write!(f, "Navigation"),
            RequestClass::StaticAsset => write!(f, "StaticAsset"),
            RequestClass::Api => write!(f, "Api"),
            RequestClass::Default => write!(f, "Default"),
        }
    }
}

/// Classifier configuration: the static-extension set and API prefixes.
#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    /// Path extensions treated as static assets (no leading dot).
    pub static_extensions: Vec<String>,
    /// Path prefixes treated as backend API calls.
    pub api_prefixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            static_extensions: [
                "js", "mjs", "css", "map", "woff", "woff2", "ttf", "otf", "png", "jpg", "jpeg",
                "gif", "svg", "webp", "ico",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            api_prefixes: ["/functions/", "/rest/", "/auth/"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ClassifierConfig {
    /// Classify a request. Navigation wins over everything, then static
    /// extension, then API prefix.
    pub fn classify(&self, request: &Request) -> RequestClass {
        if request.mode == RequestMode::Navigate {
            return RequestClass::Navigation;
        }

        let path = request.path();
        if let Some((_, ext)) = path.rsplit_once('.') {
            if !ext.contains('/') && self.static_extensions.iter().any(|e| e == ext) {
                return RequestClass::StaticAsset;
            }
        }

        if self.api_prefixes.iter().any(|p| path.starts_with(p)) {
            return RequestClass::Api;
        }

        RequestClass::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_identity() {
        let req = Request::get("https://app.example/rest/ideas");
        assert_eq!(req.cache_identity(), "GET https://app.example/rest/ideas");

        let post = Request::with_method(Method::Post, "https://app.example/rest/ideas");
        assert_eq!(post.cache_identity(), "POST https://app.example/rest/ideas");
    }

    #[test]
    fn test_path_extraction() {
        let req = Request::get("https://app.example/assets/main.js?v=3");
        assert_eq!(req.path(), "/assets/main.js");

        let bare = Request::get("/offline.html");
        assert_eq!(bare.path(), "/offline.html");

        let root = Request::get("https://app.example");
        assert_eq!(root.path(), "/");
    }

    #[test]
    fn test_classify_navigation_wins() {
        let config = ClassifierConfig::default();
        // A navigation to a .html-free path and even an asset-looking URL
        // is still a navigation.
        let req = Request::navigate("https://app.example/dashboard");
        assert_eq!(config.classify(&req), RequestClass::Navigation);

        let odd = Request {
            method: Method::Get,
            url: "https://app.example/page.png".to_string(),
            mode: RequestMode::Navigate,
        };
        assert_eq!(config.classify(&odd), RequestClass::Navigation);
    }

    #[test]
    fn test_classify_static_asset() {
        let config = ClassifierConfig::default();
        for url in [
            "https://app.example/assets/app.js",
            "https://app.example/styles/site.css",
            "https://app.example/fonts/inter.woff2",
            "https://app.example/logo.svg",
        ] {
            assert_eq!(
                config.classify(&Request::get(url)),
                RequestClass::StaticAsset,
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_classify_api() {
        let config = ClassifierConfig::default();
        let req = Request::get("https://backend.example/rest/v1/ideas?select=*");
        assert_eq!(config.classify(&req), RequestClass::Api);

        let auth = Request::with_method(Method::Post, "https://backend.example/auth/v1/token");
        assert_eq!(config.classify(&auth), RequestClass::Api);
    }

    #[test]
    fn test_classify_default() {
        let config = ClassifierConfig::default();
        let req = Request::get("https://app.example/api-docs");
        assert_eq!(config.classify(&req), RequestClass::Default);
    }

    #[test]
    fn test_classify_query_does_not_break_extension() {
        let config = ClassifierConfig::default();
        let req = Request::get("https://app.example/app.js?cachebust=1.2");
        assert_eq!(config.classify(&req), RequestClass::StaticAsset);
    }
}
