use crate::http::request::{Method, ParsedRequest};
use regex::Regex;

/// Request line: method, whitespace, target, exactly one space, version, CRLF.
pub const REQUEST_LINE_PATTERN: &str = r"^(\S+)\s+(\S+)\s(HTTP/\d\.\d)\r\n";

/// The only resources this server hands out.
pub const FILENAME_PATTERN: &str = r"^(?:file[0-9]\.html|image[0-9]\.jpg)$";

/// The only protocol version accepted on the request line.
pub const SUPPORTED_VERSION: &str = "HTTP/1.1";

/// Classification of one request, decided before any byte is written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A `GET` for a name in the filename grammar. Existence on disk is not
    /// checked yet.
    Success { filename: String },
    /// Well-formed `GET` for a name outside the grammar
    NotFound,
    /// Anything that is not a well-formed `GET ... HTTP/1.1` request line
    BadRequest,
}

/// Matches header text against the request-line and filename grammars.
///
/// Both grammars are compiled once and the classifier is shared read-only
/// between connections.
#[derive(Debug, Clone)]
pub struct Classifier {
    request_line: Regex,
    filename: Regex,
}

impl Classifier {
    /// Compiles the default grammars.
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_patterns(REQUEST_LINE_PATTERN, FILENAME_PATTERN)
    }

    /// Compiles custom grammars. The request-line pattern must expose three
    /// capture groups: method, target, version.
    pub fn with_patterns(request_line: &str, filename: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            request_line: Regex::new(request_line)?,
            filename: Regex::new(filename)?,
        })
    }

    /// Extracts the request line from the start of the header text, if it is
    /// well formed.
    pub fn parse_request_line(&self, header: &str) -> Option<ParsedRequest> {
        let caps = self.request_line.captures(header)?;

        Some(ParsedRequest::new(
            Method::from_token(caps.get(1)?.as_str()),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
        ))
    }

    /// Whether a bare name (no leading `/`) belongs to the filename grammar.
    pub fn is_valid_filename(&self, name: &str) -> bool {
        self.filename.is_match(name)
    }

    /// Maps a wire target such as `/file3.html` onto the filename it names.
    ///
    /// The target must start with a single `/`; the remainder must match the
    /// filename grammar as a whole.
    pub fn filename_from_target<'a>(&self, target: &'a str) -> Option<&'a str> {
        let name = target.strip_prefix('/')?;
        self.is_valid_filename(name).then_some(name)
    }

    pub fn classify(&self, header: &str) -> Outcome {
        self.classify_request(header).1
    }

    /// Like [`Classifier::classify`], also handing back the request line when
    /// it was well formed.
    pub fn classify_request(&self, header: &str) -> (Option<ParsedRequest>, Outcome) {
        let Some(request) = self.parse_request_line(header) else {
            tracing::debug!("Request line did not match");
            return (None, Outcome::BadRequest);
        };

        tracing::debug!(
            method = ?request.method,
            path = %request.target_path,
            version = %request.http_version,
            "Parsed request line"
        );

        let outcome = if request.method != Method::GET || request.http_version != SUPPORTED_VERSION {
            Outcome::BadRequest
        } else {
            match self.filename_from_target(&request.target_path) {
                Some(name) => Outcome::Success {
                    filename: name.to_string(),
                },
                None => Outcome::NotFound,
            }
        };

        (Some(request), outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_simple_get() {
        let classifier = Classifier::new().unwrap();
        let outcome = classifier.classify("GET /file1.html HTTP/1.1\r\nHost: example.com\r\n\r\n");

        assert_eq!(
            outcome,
            Outcome::Success {
                filename: "file1.html".to_string()
            }
        );
    }

    #[test]
    fn filename_dots_are_literal() {
        let classifier = Classifier::new().unwrap();

        assert!(!classifier.is_valid_filename("file1xhtml"));
        assert!(!classifier.is_valid_filename("image1-jpg"));
    }
}
