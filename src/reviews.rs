//! Authenticated review management endpoints.

use crate::client::CatalogClient;
use crate::error::Result;
use crate::routes::Route;
use crate::types::{ReviewSubmission, SessionToken};

impl CatalogClient {
    /// Add or replace the caller's review of the book with the given ISBN.
    pub async fn put_review(
        &self,
        isbn: &str,
        review: &str,
        token: &SessionToken,
    ) -> Result<serde_json::Value> {
        let body = ReviewSubmission {
            review: review.to_string(),
        };
        self.put_json(Route::Review(isbn), &body, token).await
    }

    /// Delete the caller's review of the book with the given ISBN.
    pub async fn delete_review(&self, isbn: &str, token: &SessionToken) -> Result<serde_json::Value> {
        self.delete(Route::Review(isbn), token).await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CatalogError;
    use crate::test_support::client_for;
    use crate::SessionToken;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_put_review_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/books/review/12345"))
            .and(header("Authorization", "Bearer abc"))
            .and(body_json(json!({"review": "This book is amazing!"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "saved"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = SessionToken::new("abc").unwrap();
        let body = client
            .put_review("12345", "This book is amazing!", &token)
            .await
            .unwrap();
        assert_eq!(body["message"], "saved");
    }

    #[tokio::test]
    async fn test_delete_review_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/books/review/12345"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = SessionToken::new("abc").unwrap();
        let body = client.delete_review("12345", &token).await.unwrap();
        assert!(body.is_null());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let auth = requests[0].headers.get("authorization").unwrap();
        assert_eq!(auth.as_bytes(), b"Bearer abc");
    }

    #[tokio::test]
    async fn test_review_with_stale_token() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/books/review/12345"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = SessionToken::new("expired").unwrap();
        let err = client.put_review("12345", "meh", &token).await.unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized { .. }));
    }
}
