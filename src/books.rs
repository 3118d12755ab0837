//! Catalog read endpoints.
//!
//! Covers: full listing, lookup by ISBN/author/title, and review listing.

use crate::client::CatalogClient;
use crate::error::Result;
use crate::routes::Route;
use crate::types::SearchKey;
use tokio::task::JoinHandle;
use tracing::Instrument;

impl CatalogClient {
    /// Fetch the whole catalog.
    pub async fn list_books(&self) -> Result<serde_json::Value> {
        self.get(Route::Books).await
    }

    /// Fetch the whole catalog on a background task and hand the outcome to
    /// `callback`.
    ///
    /// The callback runs exactly once, with either the catalog or the error.
    /// Must be called from within a Tokio runtime.
    pub fn list_books_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<serde_json::Value>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(
            async move {
                let result = client.list_books().await;
                callback(result);
            }
            .in_current_span(),
        )
    }

    /// Look up books by ISBN, author, or title.
    ///
    /// Errors are returned as-is; nothing is logged here.
    pub async fn search(&self, key: &SearchKey) -> Result<serde_json::Value> {
        self.get(Route::for_search(key)).await
    }

    /// Fetch the book with the given ISBN.
    pub async fn book_by_isbn(&self, isbn: &str) -> Result<serde_json::Value> {
        self.search(&SearchKey::Isbn(isbn.to_string())).await
    }

    /// Fetch books written by `author`.
    pub async fn books_by_author(&self, author: &str) -> Result<serde_json::Value> {
        self.search(&SearchKey::Author(author.to_string())).await
    }

    /// Fetch books whose title matches `title`.
    pub async fn books_by_title(&self, title: &str) -> Result<serde_json::Value> {
        self.search(&SearchKey::Title(title.to_string())).await
    }

    /// Fetch the reviews of the book with the given ISBN.
    pub async fn reviews(&self, isbn: &str) -> Result<serde_json::Value> {
        self.get(Route::Review(isbn)).await
    }
}
