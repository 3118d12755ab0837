//! Account endpoints: registration and login.

use crate::client::CatalogClient;
use crate::error::Result;
use crate::routes::Route;
use crate::types::{Credentials, LoginResponse, SessionToken};

impl CatalogClient {
    /// Register a new account. Returns the server's response body.
    pub async fn register(&self, username: &str, password: &str) -> Result<serde_json::Value> {
        let body = Credentials::new(username, password);
        self.post_json(Route::Register, &body).await
    }

    /// Log in and return the session token.
    ///
    /// `Ok(None)` means the server accepted the request but its response had
    /// no usable `token` field.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<SessionToken>> {
        Ok(self.login_response(username, password).await?.token)
    }

    /// Log in and keep the whole response body next to the token.
    pub async fn login_response(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = Credentials::new(username, password);
        let response = LoginResponse::from_body(self.post_json(Route::Login, &body).await?);
        if response.token.is_none() {
            tracing::warn!(username, "login response carried no token");
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CatalogError;
    use crate::test_support::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_register_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_json(json!({"username": "testuser", "password": "password123"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "User successfully registered"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body = client.register("testuser", "password123").await.unwrap();
        assert_eq!(body["message"], "User successfully registered");
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"username": "testuser", "password": "password123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = client.login("testuser", "password123").await.unwrap().unwrap();
        assert_eq!(token.as_str(), "abc");
    }

    #[tokio::test]
    async fn test_login_response_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "User successfully logged in",
                "token": "abc"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let login = client.login_response("testuser", "password123").await.unwrap();
        assert_eq!(login.body["message"], "User successfully logged in");
        assert_eq!(login.token.unwrap().as_str(), "abc");
    }

    #[tokio::test]
    async fn test_login_without_token_field_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "welcome"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.login("u", "p").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid Login"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.login("u", "wrong").await.unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized { .. }));
    }
}
