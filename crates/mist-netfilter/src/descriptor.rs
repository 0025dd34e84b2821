//! Request Descriptor
//!
//! The narrow view of an outgoing request that middleware reads and
//! rewrites. The host engine owns the real request object; it builds a
//! descriptor before dispatch and obeys the verdict the pipeline returns.

use std::fmt;
use url::Url;

/// HTTP method of an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Unknown,
}

impl Method {
    /// Short name used in request log lines; `?` for unknown operations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Unknown => "?",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request as seen by the pipeline.
///
/// Threaded by value through every middleware: a stage consumes the
/// descriptor and returns it, rewritten or voided. Voiding is an explicit
/// tag rather than an invalid URL; the original URL stays readable for
/// logging after the drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: Url,
    method: Method,
    voided: bool,
}

impl RequestDescriptor {
    pub fn new(url: Url, method: Method) -> Self {
        Self {
            url,
            method,
            voided: false,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Rewrite the request target.
    pub fn set_url(&mut self, url: Url) {
        self.url = url;
    }

    /// Mark the request as not-to-be-dispatched.
    pub fn void(mut self) -> Self {
        self.voided = true;
        self
    }

    /// Whether some stage decided this request must not reach the network.
    pub fn is_voided(&self) -> bool {
        self.voided
    }

    /// `METHOD url` representation for log lines.
    pub fn repr(&self, operation: Method) -> String {
        format!("{} {}", operation, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(url: &str) -> RequestDescriptor {
        RequestDescriptor::new(Url::parse(url).unwrap(), Method::Get)
    }

    #[test]
    fn test_repr_uses_operation() {
        let req = descriptor("https://example.com/page");
        assert_eq!(req.repr(Method::Post), "POST https://example.com/page");
        assert_eq!(req.repr(Method::Unknown), "? https://example.com/page");
    }

    #[test]
    fn test_void_keeps_url_readable() {
        let req = descriptor("https://example.com/page").void();
        assert!(req.is_voided());
        assert_eq!(req.url().as_str(), "https://example.com/page");
    }

    #[test]
    fn test_set_url_rewrites_target() {
        let mut req = descriptor("http://example.com/a");
        req.set_url(Url::parse("https://example.com/b").unwrap());
        assert_eq!(req.url().as_str(), "https://example.com/b");
        assert!(!req.is_voided());
    }
}
