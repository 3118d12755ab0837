//! The book catalog API client.

use crate::config::{parse_base_url, ClientConfig};
use crate::error::{CatalogError, Result};
use crate::routes::Route;
use crate::types::SessionToken;
use reqwest::{Client, Method};
use serde::Serialize;
use url::Url;

/// Async client for the book catalog API.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> bookshelf_client::error::Result<()> {
/// let client = bookshelf_client::CatalogClient::from_env()?;
/// let books = client.books_by_author("J.K. Rowling").await?;
/// println!("{}", serde_json::to_string_pretty(&books)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    pub(crate) http: Client,
    pub(crate) base_url: Url,
    pub(crate) user_agent: String,
}

impl CatalogClient {
    /// Create a client from a full configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            user_agent: config.user_agent,
        })
    }

    /// Create a client from `BOOKSHELF_BASE_URL` / `BOOKSHELF_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Base URL every route is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for a route, with every path parameter percent-encoded as a
    /// single segment.
    ///
    /// Empty, `.` and `..` parameters are rejected: URL normalization would
    /// drop or collapse them and the request would reach another endpoint.
    pub fn url_for(&self, route: &Route<'_>) -> Result<Url> {
        if let Some(param) = route.param() {
            if matches!(param, "" | "." | "..") {
                return Err(CatalogError::InvalidInput(format!(
                    "{:?} is not a valid path parameter for {}",
                    param,
                    route.display_path()
                )));
            }
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CatalogError::Config(format!("base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(route.segments());
        Ok(url)
    }

    /// Make an unauthenticated GET request.
    pub(crate) async fn get(&self, route: Route<'_>) -> Result<serde_json::Value> {
        self.execute::<()>(Method::GET, route, None, None).await
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        route: Route<'_>,
        body: &B,
    ) -> Result<serde_json::Value> {
        self.execute(Method::POST, route, Some(body), None).await
    }

    /// Make a bearer-authenticated PUT request with a JSON body.
    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        route: Route<'_>,
        body: &B,
        token: &SessionToken,
    ) -> Result<serde_json::Value> {
        self.execute(Method::PUT, route, Some(body), Some(token))
            .await
    }

    /// Make a bearer-authenticated DELETE request.
    pub(crate) async fn delete(
        &self,
        route: Route<'_>,
        token: &SessionToken,
    ) -> Result<serde_json::Value> {
        self.execute::<()>(Method::DELETE, route, None, Some(token))
            .await
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        route: Route<'_>,
        body: Option<&B>,
        token: Option<&SessionToken>,
    ) -> Result<serde_json::Value> {
        let url = self.url_for(&route)?;
        tracing::debug!(method = %method, url = %url, authenticated = token.is_some(), "sending request");

        let mut request = self
            .http
            .request(method, url)
            .header("User-Agent", self.user_agent.as_str());
        if let Some(token) = token {
            request = request.header("Authorization", token.bearer());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        handle_response(response, &route).await
    }
}

/// Handle the HTTP response, mapping status codes to errors.
async fn handle_response(response: reqwest::Response, route: &Route<'_>) -> Result<serde_json::Value> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    tracing::debug!(status, path = %route.display_path(), bytes = text.len(), "received response");

    match status {
        200..=299 => parse_body(&text),
        401 => Err(CatalogError::Unauthorized {
            message: error_message(&text, "invalid credentials or token"),
        }),
        404 => Err(CatalogError::NotFound(route.display_path())),
        _ => Err(CatalogError::Api {
            status,
            message: error_message(&text, "no error message"),
        }),
    }
}

/// Decode a success body. An empty body is `null`.
fn parse_body(text: &str) -> Result<serde_json::Value> {
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(text)
        .map_err(|e| CatalogError::Parse(format!("Invalid JSON response: {}", e)))
}

/// Pull a message out of an error body: `message` or `error` field of a JSON
/// object, else the raw text.
fn error_message(text: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if let Some(msg) = value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use crate::test_support::client_for;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url_for_encodes_segments() {
        let client = CatalogClient::new(ClientConfig::default()).unwrap();
        let url = client.url_for(&Route::BooksByAuthor("J.K. Rowling")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books/author/J.K.%20Rowling");

        let url = client.url_for(&Route::BooksByTitle("AC/DC?#")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books/title/AC%2FDC%3F%23");
    }

    #[test]
    fn test_url_for_rejects_dot_and_empty_params() {
        let client = CatalogClient::new(ClientConfig::default()).unwrap();
        for route in [
            Route::BooksByTitle(".."),
            Route::BooksByTitle(""),
            Route::BookByIsbn("."),
            Route::BookByIsbn(".."),
            Route::BooksByAuthor("."),
            Route::Review(".."),
        ] {
            let result = client.url_for(&route);
            assert!(
                matches!(result, Err(CatalogError::InvalidInput(_))),
                "{:?} gave {:?}",
                route,
                result
            );
        }

        // Dots inside a longer value are fine.
        let url = client.url_for(&Route::BooksByTitle("...")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books/title/...");
        let url = client.url_for(&Route::BooksByAuthor("J.K.")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books/author/J.K.");
    }

    #[tokio::test]
    async fn test_dot_segment_lookup_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).books_by_title("..").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
    }

    #[test]
    fn test_url_for_trailing_slash_base() {
        let client = CatalogClient::new(ClientConfig::default())
            .unwrap()
            .with_base_url("http://localhost:5000/")
            .unwrap();
        let url = client.url_for(&Route::Books).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/books");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message":"Invalid login"}"#, "x"), "Invalid login");
        assert_eq!(error_message(r#"{"error":"nope"}"#, "x"), "nope");
        assert_eq!(error_message("plain text", "x"), "plain text");
        assert_eq!(error_message("  ", "fallback"), "fallback");
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("").unwrap(), serde_json::Value::Null);
        assert_eq!(parse_body(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
        assert!(matches!(parse_body("<html>"), Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_get_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books"))
            .and(header(
                "User-Agent",
                concat!("bookshelf-client/", env!("CARGO_PKG_VERSION")),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).get(Route::Books).await.unwrap();
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/isbn/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/books/isbn/broken"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "database down"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Login"))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let err = client.get(Route::BookByIsbn("missing")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref p) if p == "/books/isbn/missing"));

        let err = client.get(Route::BookByIsbn("broken")).await.unwrap_err();
        match err {
            CatalogError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database down");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = client
            .post_json(Route::Login, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized { ref message } if message == "Invalid Login"));
    }

    #[tokio::test]
    async fn test_non_json_success_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get(Route::Books).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Nothing listens on port 1.
        let client = CatalogClient::new(ClientConfig::default())
            .unwrap()
            .with_base_url("http://127.0.0.1:1")
            .unwrap();
        let err = client.get(Route::Books).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
