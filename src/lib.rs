//! webserver - a minimal file server speaking a subset of HTTP/1.1
//!
//! Serves `file<d>.html` and `image<d>.jpg` from one directory, one request
//! per connection.

pub mod config;
pub mod http;
pub mod server;
