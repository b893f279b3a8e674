use bytes::Bytes;
use url::Url;

/// Origin that relative request URLs are resolved against.
pub const APP_ORIGIN: &str = "http://localhost/";

/// A request as far as the cache policy cares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
    /// Top-level page navigation, eligible for the offline root fallback.
    pub navigate: bool,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            url: url.into(),
            navigate: false,
        }
    }

    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            navigate: true,
            ..Self::get(url)
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// The request URL resolved against [`APP_ORIGIN`]. `None` if it does
    /// not parse.
    pub fn resolve(&self) -> Option<Url> {
        Url::parse(APP_ORIGIN).ok()?.join(&self.url).ok()
    }

    /// The URL scheme, lowercased. Relative URLs take the app origin's.
    pub fn scheme(&self) -> Option<String> {
        self.resolve().map(|url| url.scheme().to_string())
    }

    /// Only GETs over http(s), or relative to the app origin, are cached.
    pub fn is_cacheable(&self) -> bool {
        self.is_get() && matches!(self.scheme().as_deref(), Some("http") | Some("https"))
    }
}

/// How the response relates to the requesting origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin.
    Basic,
    Cors,
    Opaque,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, kind: ResponseKind, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            kind,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// A same-origin `200 OK`.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, ResponseKind::Basic, body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a fetched response may be stored: `200` and same-origin.
    pub fn is_storable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}
