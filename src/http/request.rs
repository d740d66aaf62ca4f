/// HTTP request methods.
///
/// Only `GET` is ever served. `HEAD` and `POST` are recognised so they show up
/// by name in logs, and every other token collapses into `OTHER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Submit data
    POST,
    /// Anything else, including lowercase spellings of the above
    OTHER,
}

impl Method {
    /// Classifies a method token from the request line.
    ///
    /// Matching is case-sensitive, as method tokens are in HTTP.
    ///
    /// # Example
    ///
    /// ```
    /// # use webserver::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::OTHER);
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            _ => Method::OTHER,
        }
    }
}

/// The request line of one connection, as matched by the classifier.
///
/// Produced once per connection and never mutated. Header lines that follow
/// the request line are read but not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// The HTTP method
    pub method: Method,
    /// The request target exactly as sent (e.g. "/file1.html")
    pub target_path: String,
    /// HTTP version token (e.g. "HTTP/1.1")
    pub http_version: String,
}

impl ParsedRequest {
    pub fn new(method: Method, target_path: impl Into<String>, http_version: impl Into<String>) -> Self {
        Self {
            method,
            target_path: target_path.into(),
            http_version: http_version.into(),
        }
    }
}
