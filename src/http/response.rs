/// Body of every 400 response.
pub const BAD_REQUEST_BODY: &str =
    "Bad request. Please send a GET request using the standard HTTP/1.1.";

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "File not found. Please request a file of the following format: \
fileX.html or imageX.jpg where X is a single digit 0-9.";

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): file found and streamed
/// - `BadRequest` (400): malformed request line or a method other than GET
/// - `NotFound` (404): name outside the filename grammar, or file missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webserver::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webserver::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// A response ready to be serialized.
///
/// Headers keep insertion order, which is the order they go out on the wire.
/// For a file response the body is empty and `content-length` describes the
/// bytes streamed afterwards by the file transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Header name/value pairs, in wire order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
    /// Whether the body is sent as a line of its own, i.e. followed by a line
    /// terminator and a blank line. Those trailing bytes are not counted in
    /// `content-length`.
    pub body_as_line: bool,
}

/// Builder for constructing responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("content-type", "text/html")
///     .body(b"<p>hi</p>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    body_as_line: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            body_as_line: false,
        }
    }

    /// Adds a header, or replaces the value of an existing one with the same
    /// name (compared case-insensitively) in place.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets a raw body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self.body_as_line = false;
        self
    }

    /// Sets a text body that is sent as its own line, followed by a blank line.
    pub fn text_line(mut self, text: &str) -> Self {
        self.body = text.as_bytes().to_vec();
        self.body_as_line = true;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `content-length` from the body size unless one was set explicitly.
    pub fn build(self) -> Response {
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-length"));

        let mut headers = self.headers;
        if !has_length {
            headers.push(("content-length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers,
            body: self.body,
            body_as_line: self.body_as_line,
        }
    }
}

impl Response {
    /// The fixed 400 response.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .header("content-type", "text/html")
            .text_line(BAD_REQUEST_BODY)
            .build()
    }

    /// The fixed 404 response.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("content-type", "text/html")
            .text_line(NOT_FOUND_BODY)
            .build()
    }

    /// Status line and headers of a 200 response whose body is streamed
    /// separately.
    pub fn file_head(content_type: &str, size: u64) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("content-type", content_type)
            .header("content-length", size.to_string())
            .build()
    }

    /// Looks a header up by name, case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
