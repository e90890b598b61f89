//! Request and response descriptors

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::RestClientResult;
use crate::identity::SimulatedIdentity;

/// Target URI of a request, kept as assembled text
///
/// Nothing is validated when a `ServiceUri` is built. The text is parsed only
/// when the request is sent, so a malformed path surfaces as
/// `RestClientError::InvalidUri` at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUri {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
}

impl ServiceUri {
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: Option<u16>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            path: path.into(),
        }
    }

    /// Split a parsed URL into its parts (query and fragment are kept in the path)
    pub fn from_url(url: &Url) -> Self {
        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            path.push('#');
            path.push_str(fragment);
        }
        Self {
            scheme: url.scheme().to_string(),
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port_or_known_default(),
            path,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path exactly as it was supplied
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parse the assembled text into a URL
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.to_string())
    }
}

impl fmt::Display for ServiceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        if !self.path.is_empty() && !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)
    }
}

/// Immutable description of an authenticated request, ready to be sent
#[derive(Debug, Clone)]
pub struct RequestEntity<B> {
    uri: ServiceUri,
    method: Method,
    body: Option<B>,
    headers: HeaderMap,
    identity: SimulatedIdentity,
}

impl<B> RequestEntity<B> {
    pub(crate) fn new(
        identity: SimulatedIdentity,
        body: Option<B>,
        headers: HeaderMap,
        method: Method,
        uri: ServiceUri,
    ) -> Self {
        Self {
            uri,
            method,
            body,
            headers,
            identity,
        }
    }

    pub fn uri(&self) -> &ServiceUri {
        &self.uri
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Identity the request will be signed for
    pub fn identity(&self) -> &SimulatedIdentity {
        &self.identity
    }
}

/// Status, headers and decoded body of a response
#[derive(Debug, Clone)]
pub struct ResponseEntity<T> {
    status: StatusCode,
    headers: HeaderMap,
    body: T,
}

impl<T> ResponseEntity<T> {
    pub fn new(status: StatusCode, headers: HeaderMap, body: T) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    pub fn into_body(self) -> T {
        self.body
    }
}

impl ResponseEntity<Vec<u8>> {
    /// Decode the raw body
    ///
    /// An empty body decodes as JSON `null`. A body that is not JSON is
    /// offered to `T` as a plain string before giving up.
    pub fn decode<T: DeserializeOwned>(self) -> RestClientResult<ResponseEntity<T>> {
        let body = decode_body(&self.body)?;
        Ok(ResponseEntity {
            status: self.status,
            headers: self.headers,
            body,
        })
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> RestClientResult<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    match serde_json::from_slice(bytes) {
        Ok(body) => Ok(body),
        Err(e) => {
            let text = String::from_utf8_lossy(bytes).into_owned();
            serde_json::from_value(serde_json::Value::String(text)).map_err(|_| e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_display_inserts_leading_slash() {
        let uri = ServiceUri::new("https", "localhost", Some(8443), "v1/status");
        assert_eq!(uri.to_string(), "https://localhost:8443/v1/status");
        assert_eq!(uri.path(), "v1/status");
    }

    #[test]
    fn test_display_without_port() {
        let uri = ServiceUri::new("https", "example.org", None, "/a");
        assert_eq!(uri.to_string(), "https://example.org/a");
    }

    #[test]
    fn test_from_url_keeps_query() {
        let url = Url::parse("http://127.0.0.1:4000/lookup?table=t1").unwrap();
        let uri = ServiceUri::from_url(&url);
        assert_eq!(uri.port(), Some(4000));
        assert_eq!(uri.path(), "/lookup?table=t1");
        assert_eq!(uri.to_url().unwrap(), url);
    }

    #[test]
    fn test_malformed_host_fails_to_parse() {
        let uri = ServiceUri::new("https", "bad host", Some(8443), "/x");
        assert!(uri.to_url().is_err());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Table {
        name: String,
    }

    #[test]
    fn test_decode_json_body() {
        let entity = ResponseEntity::new(StatusCode::OK, HeaderMap::new(), br#"{"name":"t1"}"#.to_vec());
        let decoded = entity.decode::<Table>().unwrap();
        assert_eq!(decoded.body(), &Table { name: "t1".into() });
    }

    #[test]
    fn test_decode_empty_body_as_null() {
        let entity = ResponseEntity::new(StatusCode::NO_CONTENT, HeaderMap::new(), Vec::new());
        let decoded = entity.decode::<Option<Table>>().unwrap();
        assert_eq!(decoded.into_body(), None);
    }

    #[test]
    fn test_decode_plain_text_into_string() {
        let entity = ResponseEntity::new(StatusCode::OK, HeaderMap::new(), b"OK".to_vec());
        assert_eq!(entity.decode::<String>().unwrap().into_body(), "OK");
    }

    #[test]
    fn test_decode_plain_text_into_struct_fails() {
        let entity = ResponseEntity::new(StatusCode::OK, HeaderMap::new(), b"OK".to_vec());
        assert!(entity.decode::<Table>().is_err());
    }
}
