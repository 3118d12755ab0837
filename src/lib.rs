//! # bookshelf-client
//!
//! A Rust client for a book catalog web API.
//!
//! Provides:
//! - **Library**: Async API client for listing and searching books, reading
//!   reviews, account registration/login, and review management
//! - **Demo driver**: runs every operation once and logs what happened
//! - **CLI**: `bookshelf` binary for terminal use (`cli` feature)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> bookshelf_client::error::Result<()> {
//! use bookshelf_client::CatalogClient;
//!
//! // Base URL from BOOKSHELF_BASE_URL, or the built-in default
//! let client = CatalogClient::from_env()?;
//!
//! let books = client.books_by_author("J.K. Rowling").await?;
//! println!("{}", serde_json::to_string_pretty(&books)?);
//!
//! if let Some(token) = client.login("testuser", "password123").await? {
//!     client.put_review("12345", "This book is amazing!", &token).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod books;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod reviews;
pub mod routes;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export key types at the crate root.
pub use client::CatalogClient;
pub use config::ClientConfig;
pub use demo::{run_demo, DemoReport, DemoScenario};
pub use error::CatalogError;
pub use types::*;
