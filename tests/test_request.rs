use webserver::http::parser::Classifier;
use webserver::http::request::{Method, ParsedRequest};

#[test]
fn test_method_from_token() {
    assert_eq!(Method::from_token("GET"), Method::GET);
    assert_eq!(Method::from_token("HEAD"), Method::HEAD);
    assert_eq!(Method::from_token("POST"), Method::POST);
    assert_eq!(Method::from_token("PATCH"), Method::OTHER);
    assert_eq!(Method::from_token("post"), Method::OTHER);
    assert_eq!(Method::from_token(""), Method::OTHER);
}

#[test]
fn test_parse_request_line_fields() {
    let c = Classifier::new().unwrap();
    let parsed = c
        .parse_request_line("GET /file3.html HTTP/1.1\r\nHost: example.com\r\n\r\n")
        .unwrap();

    assert_eq!(parsed, ParsedRequest::new(Method::GET, "/file3.html", "HTTP/1.1"));
}

#[test]
fn test_parse_request_line_keeps_other_methods() {
    let c = Classifier::new().unwrap();

    let post = c.parse_request_line("POST /upload HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(post.method, Method::POST);
    assert_eq!(post.target_path, "/upload");

    let other = c.parse_request_line("BREW /pot HTTP/1.0\r\n\r\n").unwrap();
    assert_eq!(other.method, Method::OTHER);
    assert_eq!(other.http_version, "HTTP/1.0");
}

#[test]
fn test_parse_request_line_requires_terminator() {
    let c = Classifier::new().unwrap();

    assert!(c.parse_request_line("GET /file3.html HTTP/1.1").is_none());
    assert!(c.parse_request_line("GET /file3.html HTTP/1.1\n").is_none());
}

#[test]
fn test_parse_request_line_only_looks_at_start() {
    let c = Classifier::new().unwrap();

    assert!(c
        .parse_request_line("Host: x\r\nGET /file3.html HTTP/1.1\r\n\r\n")
        .is_none());
}
