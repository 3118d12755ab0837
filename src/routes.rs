//! Catalog endpoints and their path segments.
//!
//! Path parameters are kept as whole segments here and percent-encoded when
//! the client joins them onto the base URL, so `AC/DC` stays one segment.

use crate::types::SearchKey;

/// One endpoint of the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/books`
    Books,
    /// `/books/isbn/{isbn}`
    BookByIsbn(&'a str),
    /// `/books/author/{author}`
    BooksByAuthor(&'a str),
    /// `/books/title/{title}`
    BooksByTitle(&'a str),
    /// `/books/review/{isbn}`
    Review(&'a str),
    /// `/register`
    Register,
    /// `/login`
    Login,
}

impl<'a> Route<'a> {
    /// Route for a catalog lookup.
    pub fn for_search(key: &'a SearchKey) -> Self {
        match key {
            SearchKey::Isbn(isbn) => Route::BookByIsbn(isbn),
            SearchKey::Author(author) => Route::BooksByAuthor(author),
            SearchKey::Title(title) => Route::BooksByTitle(title),
        }
    }

    /// Unencoded path segments, relative to the base URL.
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Route::Books => vec!["books"],
            Route::BookByIsbn(isbn) => vec!["books", "isbn", isbn],
            Route::BooksByAuthor(author) => vec!["books", "author", author],
            Route::BooksByTitle(title) => vec!["books", "title", title],
            Route::Review(isbn) => vec!["books", "review", isbn],
            Route::Register => vec!["register"],
            Route::Login => vec!["login"],
        }
    }

    /// The caller-supplied path parameter, if the route has one.
    pub fn param(&self) -> Option<&'a str> {
        match *self {
            Route::BookByIsbn(v)
            | Route::BooksByAuthor(v)
            | Route::BooksByTitle(v)
            | Route::Review(v) => Some(v),
            Route::Books | Route::Register | Route::Login => None,
        }
    }

    /// Unencoded path for logs and error messages, e.g. `/books/isbn/12345`.
    pub fn display_path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }
}
