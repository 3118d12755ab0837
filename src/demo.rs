//! Demo driver: exercises every catalog operation once, in a fixed order.
//!
//! The five reads, registration, and login run one after another. The two
//! review steps run only if login produced a token. Afterwards the callback
//! listing and the three searches run concurrently; their completion order is
//! not fixed, but the driver waits for all of them before returning.
//!
//! Every outcome is logged: successes at `info` with the response body,
//! failures once at `error`. API errors never abort the run.

use crate::client::CatalogClient;
use crate::error::Result;
use crate::types::{SearchKey, SessionToken};
use std::fmt;
use tracing::{error, info};

/// Inputs for one demo run.
#[derive(Debug, Clone)]
pub struct DemoScenario {
    pub isbn: String,
    pub author: String,
    pub title: String,
    pub username: String,
    pub password: String,
    pub review: String,
}

impl Default for DemoScenario {
    fn default() -> Self {
        Self {
            isbn: "12345".to_string(),
            author: "J.K. Rowling".to_string(),
            title: "Harry Potter".to_string(),
            username: "testuser".to_string(),
            password: "password123".to_string(),
            review: "This book is amazing!".to_string(),
        }
    }
}

/// Steps of a demo run, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoStep {
    ListBooks,
    BookByIsbn,
    BooksByAuthor,
    BooksByTitle,
    Reviews,
    Register,
    Login,
    PutReview,
    DeleteReview,
    CallbackListing,
    SearchIsbn,
    SearchAuthor,
    SearchTitle,
}

impl DemoStep {
    /// Every step, in reporting order.
    pub const ALL: [DemoStep; 13] = [
        DemoStep::ListBooks,
        DemoStep::BookByIsbn,
        DemoStep::BooksByAuthor,
        DemoStep::BooksByTitle,
        DemoStep::Reviews,
        DemoStep::Register,
        DemoStep::Login,
        DemoStep::PutReview,
        DemoStep::DeleteReview,
        DemoStep::CallbackListing,
        DemoStep::SearchIsbn,
        DemoStep::SearchAuthor,
        DemoStep::SearchTitle,
    ];

    /// Log label for this step, filled in from the scenario.
    pub fn label(&self, scenario: &DemoScenario) -> String {
        match self {
            Self::ListBooks => "All books".to_string(),
            Self::BookByIsbn => format!("Book with ISBN {}", scenario.isbn),
            Self::BooksByAuthor => format!("Books by {}", scenario.author),
            Self::BooksByTitle => format!("Books with title \"{}\"", scenario.title),
            Self::Reviews => format!("Reviews for ISBN {}", scenario.isbn),
            Self::Register => format!("Register user {}", scenario.username),
            Self::Login => format!("Login as {}", scenario.username),
            Self::PutReview => format!("Add/modify review for ISBN {}", scenario.isbn),
            Self::DeleteReview => format!("Delete review for ISBN {}", scenario.isbn),
            Self::CallbackListing => "All books (callback)".to_string(),
            Self::SearchIsbn => format!("Search by ISBN {}", scenario.isbn),
            Self::SearchAuthor => format!("Search by author {}", scenario.author),
            Self::SearchTitle => format!("Search by title \"{}\"", scenario.title),
        }
    }
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
    Skipped,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "ok"),
            Self::Failed(msg) => write!(f, "FAILED ({})", msg),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// One row of the run report.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: DemoStep,
    pub label: String,
    pub outcome: StepOutcome,
}

/// Result of a demo run. Always produced, whatever the API did.
#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    pub steps: Vec<StepRecord>,
    pub token_obtained: bool,
}

impl DemoReport {
    /// Outcome of a given step, if it was recorded.
    pub fn outcome(&self, step: DemoStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }

    /// Number of failed steps.
    pub fn failures(&self) -> usize {
        self.steps
            .iter()
            .filter(|r| matches!(r.outcome, StepOutcome::Failed(_)))
            .count()
    }

    fn record(&mut self, step: DemoStep, scenario: &DemoScenario, outcome: StepOutcome) {
        self.steps.push(StepRecord {
            step,
            label: step.label(scenario),
            outcome,
        });
    }
}

/// Log a step's result and turn it into an outcome.
fn report(label: &str, result: Result<serde_json::Value>) -> StepOutcome {
    match result {
        Ok(body) => {
            let pretty = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
            info!(step = label, "{}: {}", label, pretty);
            StepOutcome::Succeeded
        }
        Err(e) => {
            error!(step = label, "{} failed: {}", label, e);
            StepOutcome::Failed(e.to_string())
        }
    }
}

/// Run the whole demo against `client`.
pub async fn run_demo(client: &CatalogClient, scenario: &DemoScenario) -> DemoReport {
    let mut report_card = DemoReport::default();
    let label = |step: DemoStep| step.label(scenario);

    info!(base_url = %client.base_url(), "starting catalog demo");

    // Sequential reads.
    let outcome = report(&label(DemoStep::ListBooks), client.list_books().await);
    report_card.record(DemoStep::ListBooks, scenario, outcome);

    let outcome = report(
        &label(DemoStep::BookByIsbn),
        client.book_by_isbn(&scenario.isbn).await,
    );
    report_card.record(DemoStep::BookByIsbn, scenario, outcome);

    let outcome = report(
        &label(DemoStep::BooksByAuthor),
        client.books_by_author(&scenario.author).await,
    );
    report_card.record(DemoStep::BooksByAuthor, scenario, outcome);

    let outcome = report(
        &label(DemoStep::BooksByTitle),
        client.books_by_title(&scenario.title).await,
    );
    report_card.record(DemoStep::BooksByTitle, scenario, outcome);

    let outcome = report(&label(DemoStep::Reviews), client.reviews(&scenario.isbn).await);
    report_card.record(DemoStep::Reviews, scenario, outcome);

    // Account.
    let outcome = report(
        &label(DemoStep::Register),
        client.register(&scenario.username, &scenario.password).await,
    );
    report_card.record(DemoStep::Register, scenario, outcome);

    let token = login_step(client, scenario, &mut report_card).await;
    report_card.token_obtained = token.is_some();

    // Reviews need a session.
    match &token {
        Some(token) => {
            let outcome = report(
                &label(DemoStep::PutReview),
                client
                    .put_review(&scenario.isbn, &scenario.review, token)
                    .await,
            );
            report_card.record(DemoStep::PutReview, scenario, outcome);

            let outcome = report(
                &label(DemoStep::DeleteReview),
                client.delete_review(&scenario.isbn, token).await,
            );
            report_card.record(DemoStep::DeleteReview, scenario, outcome);
        }
        None => {
            info!("no session token, skipping review steps");
            report_card.record(DemoStep::PutReview, scenario, StepOutcome::Skipped);
            report_card.record(DemoStep::DeleteReview, scenario, StepOutcome::Skipped);
        }
    }

    // Concurrent tail.
    let (tx, rx) = tokio::sync::oneshot::channel();
    let callback_label = label(DemoStep::CallbackListing);
    let handle = client.list_books_with(move |result| {
        let _ = tx.send(report(&callback_label, result));
    });

    let isbn_key = SearchKey::Isbn(scenario.isbn.clone());
    let author_key = SearchKey::Author(scenario.author.clone());
    let title_key = SearchKey::Title(scenario.title.clone());
    let (by_isbn, by_author, by_title) = tokio::join!(
        async { report(&label(DemoStep::SearchIsbn), client.search(&isbn_key).await) },
        async { report(&label(DemoStep::SearchAuthor), client.search(&author_key).await) },
        async { report(&label(DemoStep::SearchTitle), client.search(&title_key).await) },
    );

    let callback_outcome = match handle.await {
        Ok(()) => rx
            .await
            .unwrap_or_else(|_| StepOutcome::Failed("callback was never invoked".to_string())),
        Err(e) => {
            error!("callback listing task failed: {}", e);
            StepOutcome::Failed(format!("callback task failed: {}", e))
        }
    };

    report_card.record(DemoStep::CallbackListing, scenario, callback_outcome);
    report_card.record(DemoStep::SearchIsbn, scenario, by_isbn);
    report_card.record(DemoStep::SearchAuthor, scenario, by_author);
    report_card.record(DemoStep::SearchTitle, scenario, by_title);

    info!(
        failures = report_card.failures(),
        token_obtained = report_card.token_obtained,
        "catalog demo finished"
    );
    report_card
}

async fn login_step(
    client: &CatalogClient,
    scenario: &DemoScenario,
    report_card: &mut DemoReport,
) -> Option<SessionToken> {
    let label = DemoStep::Login.label(scenario);
    match client.login_response(&scenario.username, &scenario.password).await {
        Ok(login) => {
            let body = login.redacted_body();
            let pretty = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
            info!(step = %label, token_received = login.token.is_some(), "{}: {}", label, pretty);
            report_card.record(DemoStep::Login, scenario, StepOutcome::Succeeded);
            login.token
        }
        Err(e) => {
            error!(step = %label, "{} failed: {}", label, e);
            report_card.record(DemoStep::Login, scenario, StepOutcome::Failed(e.to_string()));
            None
        }
    }
}
