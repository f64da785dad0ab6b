//! Request/response types and the `Origin` seam the cache fetches through.
//!
//! `Origin` stands in for the network. The crate ships a filesystem-backed
//! implementation so a directory of built assets can play the origin role;
//! tests substitute in-memory fakes that can be switched offline.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get)
    }
}

/// What the requested resource will be used for. `Document` marks a
/// full-page navigation, the only destination eligible for the offline
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Document,
    Script,
    Style,
    Image,
    Other,
}

/// An intercepted request: method, root-relative path, destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub destination: Destination,
}

impl Request {
    /// A plain GET for a subresource.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            destination: Destination::Other,
        }
    }

    /// A GET that represents a full-page navigation.
    pub fn navigate(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            destination: Destination::Document,
        }
    }

    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }
}

/// Same-origin responses are `Basic`; cross-origin responses arrive
/// `Opaque` and are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Basic,
    Opaque,
}

/// A fetched or cached response: status, kind, headers, body bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            kind: ResponseKind::Basic,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            kind: ResponseKind::Basic,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Only successful same-origin responses are eligible for the store.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

/// The thing the cache fetches from on a miss.
pub trait Origin {
    fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Serves GET requests from a directory of assets, mapping root-relative
/// request paths onto files under `root`.
#[derive(Debug)]
pub struct FsOrigin {
    root: PathBuf,
}

impl FsOrigin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a request path under the asset root, rejecting traversal.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl Origin for FsOrigin {
    fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        if !self.root.is_dir() {
            return Err(FetchError::Unreachable(format!(
                "asset root {} does not exist",
                self.root.display()
            )));
        }

        if !request.method.is_get() {
            // Read-only origin; mirror a static file server.
            return Ok(Response {
                status: 405,
                kind: ResponseKind::Basic,
                headers: Vec::new(),
                body: Vec::new(),
            });
        }

        let Some(file) = self.resolve(&request.path) else {
            return Ok(Response::not_found());
        };

        match fs::read(&file) {
            Ok(body) => {
                Ok(Response::ok(body).with_header("content-type", content_type(&request.path)))
            }
            Err(_) => Ok(Response::not_found()),
        }
    }
}

fn content_type(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fs_origin_serves_files_with_content_type() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("index.html"), "<html></html>").unwrap();

        let origin = FsOrigin::new(root.path());
        let response = origin.fetch(&Request::get("/index.html")).unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"<html></html>");
        assert!(response
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value == "text/html"));
    }

    #[test]
    fn fs_origin_missing_file_is_a_404_not_a_fetch_error() {
        let root = TempDir::new().unwrap();
        let origin = FsOrigin::new(root.path());

        let response = origin.fetch(&Request::get("/missing.css")).unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_cacheable());
    }

    #[test]
    fn fs_origin_missing_root_is_unreachable() {
        let origin = FsOrigin::new("/nonexistent/asset/root");
        assert!(origin.fetch(&Request::get("/index.html")).is_err());
    }

    #[test]
    fn fs_origin_rejects_path_traversal() {
        let root = TempDir::new().unwrap();
        let origin = FsOrigin::new(root.path());

        let response = origin.fetch(&Request::get("/../etc/passwd")).unwrap();
        assert_eq!(response.status, 404);
    }

    #[test]
    fn only_basic_200_responses_are_cacheable() {
        assert!(Response::ok("body").is_cacheable());
        assert!(!Response::not_found().is_cacheable());

        let opaque = Response {
            kind: ResponseKind::Opaque,
            ..Response::ok("cross-origin")
        };
        assert!(!opaque.is_cacheable());
    }
}
