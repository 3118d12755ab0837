//! CLI binary for the book catalog client.
//!
//! Usage: bookshelf author "J.K. Rowling" --output json

#[cfg(feature = "cli")]
mod cli {
    use bookshelf_client::demo::{DemoStep, StepOutcome};
    use bookshelf_client::error::{CatalogError, Result};
    use bookshelf_client::{CatalogClient, ClientConfig, DemoScenario, SessionToken};
    use clap::{Parser, Subcommand};
    use serde_json::{Map, Value};
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(name = "bookshelf", about = "Book catalog API client", version)]
    struct Cli {
        /// API base URL (overrides BOOKSHELF_BASE_URL and the config file)
        #[arg(long, global = true)]
        base_url: Option<String>,

        /// Config file (defaults to <config dir>/bookshelf/config.toml)
        #[arg(long, global = true)]
        config: Option<PathBuf>,

        /// Session token for review commands (from `bookshelf login`)
        #[arg(long, global = true)]
        token: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "table")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// List every book in the catalog
        List,
        /// Look up a book by ISBN
        Isbn { isbn: String },
        /// Look up books by author
        Author { author: String },
        /// Look up books by title
        Title { title: String },
        /// Show the reviews of a book
        Reviews { isbn: String },
        /// Register a new account
        Register {
            username: String,
            /// Password (prompted if omitted)
            #[arg(short, long)]
            password: Option<String>,
        },
        /// Log in and print the session token
        Login {
            username: String,
            /// Password (prompted if omitted)
            #[arg(short, long)]
            password: Option<String>,
        },
        /// Manage your reviews (needs --token)
        Review {
            #[command(subcommand)]
            action: ReviewAction,
        },
        /// Run every operation once against the API and log the results
        Demo {
            #[arg(long)]
            isbn: Option<String>,
            #[arg(long)]
            author: Option<String>,
            #[arg(long)]
            title: Option<String>,
            #[arg(long)]
            username: Option<String>,
            #[arg(long)]
            password: Option<String>,
            #[arg(long)]
            review: Option<String>,
        },
    }

    #[derive(Subcommand)]
    enum ReviewAction {
        /// Add or replace your review of a book
        Put { isbn: String, review: String },
        /// Delete your review of a book
        Delete { isbn: String },
    }

    fn init_logging() {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bookshelf_client=info,bookshelf=info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

    fn make_client(base_url: Option<&str>, config: Option<PathBuf>) -> Result<CatalogClient> {
        let mut config = ClientConfig::resolve(config.as_deref())?;
        if let Some(url) = base_url {
            config = config.with_base_url(url)?;
        }
        CatalogClient::new(config)
    }

    fn require_token(token: Option<String>) -> Result<SessionToken> {
        token
            .and_then(SessionToken::new)
            .ok_or_else(|| CatalogError::Unauthorized {
                message: "pass --token (get one with `bookshelf login`)".to_string(),
            })
    }

    fn password_or_prompt(password: Option<String>) -> Result<String> {
        match password {
            Some(p) => Ok(p),
            None => dialoguer::Password::new()
                .with_prompt("Password")
                .interact()
                .map_err(|e| CatalogError::Config(format!("password prompt failed: {}", e))),
        }
    }

    /// Column names across a set of JSON objects, in first-seen order.
    fn columns<'a>(rows: impl Iterator<Item = &'a Map<String, Value>>) -> Vec<String> {
        let mut cols: Vec<String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !cols.contains(key) {
                    cols.push(key.clone());
                }
            }
        }
        cols
    }

    fn cell(value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(map)) if map.is_empty() => "-".to_string(),
            Some(Value::Object(map)) => format!("{} entries", map.len()),
            Some(other) => other.to_string(),
        }
    }

    fn print_value_table(value: &Value) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);

        match value {
            // Keyed collection, e.g. the catalog: {"1": {...}, "2": {...}}
            Value::Object(map) if !map.is_empty() && map.values().all(Value::is_object) => {
                let rows: Vec<(&String, &Map<String, Value>)> = map
                    .iter()
                    .filter_map(|(k, v)| v.as_object().map(|o| (k, o)))
                    .collect();
                let cols = columns(rows.iter().map(|(_, o)| *o));
                let mut header = vec!["Key".to_string()];
                header.extend(cols.iter().cloned());
                table.set_header(header);
                for (key, obj) in rows {
                    let mut line = vec![key.clone()];
                    line.extend(cols.iter().map(|c| cell(obj.get(c))));
                    table.add_row(line);
                }
            }
            Value::Object(map) => {
                table.set_header(vec!["Field", "Value"]);
                for (key, val) in map {
                    table.add_row(vec![key.clone(), cell(Some(val))]);
                }
            }
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                let objects: Vec<&Map<String, Value>> =
                    items.iter().filter_map(Value::as_object).collect();
                let cols = columns(objects.iter().copied());
                table.set_header(cols.clone());
                for obj in objects {
                    table.add_row(cols.iter().map(|c| cell(obj.get(c))).collect::<Vec<_>>());
                }
            }
            other => {
                println!("{}", serde_json::to_string_pretty(other).unwrap_or_default());
                return;
            }
        }

        println!("{table}");
    }

    fn print_value(output: OutputFormat, heading: &str, value: &Value) -> Result<()> {
        match output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Table => {
                println!("{}:", heading);
                print_value_table(value);
            }
        }
        Ok(())
    }

    fn print_demo_summary(report: &bookshelf_client::DemoReport) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Step", "Outcome"]);
        for (i, record) in report.steps.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                record.label.clone(),
                record.outcome.to_string(),
            ]);
        }
        println!("{table}");
        if report.outcome(DemoStep::PutReview) == Some(&StepOutcome::Skipped) {
            println!("No session token was obtained; review steps were skipped.");
        }
    }

    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        init_logging();
        let client = make_client(cli.base_url.as_deref(), cli.config)?;

        match cli.command {
            Commands::List => {
                let books = client.list_books().await?;
                print_value(cli.output, "All books", &books)?;
            }

            Commands::Isbn { isbn } => {
                let book = client.book_by_isbn(&isbn).await?;
                print_value(cli.output, &format!("Book with ISBN {}", isbn), &book)?;
            }

            Commands::Author { author } => {
                let books = client.books_by_author(&author).await?;
                print_value(cli.output, &format!("Books by {}", author), &books)?;
            }

            Commands::Title { title } => {
                let books = client.books_by_title(&title).await?;
                print_value(cli.output, &format!("Books with title \"{}\"", title), &books)?;
            }

            Commands::Reviews { isbn } => {
                let reviews = client.reviews(&isbn).await?;
                print_value(cli.output, &format!("Reviews for ISBN {}", isbn), &reviews)?;
            }

            Commands::Register { username, password } => {
                let password = password_or_prompt(password)?;
                let response = client.register(&username, &password).await?;
                print_value(cli.output, "User registered", &response)?;
            }

            Commands::Login { username, password } => {
                let password = password_or_prompt(password)?;
                match client.login(&username, &password).await? {
                    Some(token) => match cli.output {
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::json!({ "token": token.as_str() })
                        ),
                        OutputFormat::Table => println!("{}", token.as_str()),
                    },
                    None => {
                        return Err(CatalogError::Parse(
                            "login succeeded but the response had no token".to_string(),
                        ))
                    }
                }
            }

            Commands::Review { action } => {
                let token = require_token(cli.token)?;
                match action {
                    ReviewAction::Put { isbn, review } => {
                        let response = client.put_review(&isbn, &review, &token).await?;
                        print_value(
                            cli.output,
                            &format!("Review added/modified for ISBN {}", isbn),
                            &response,
                        )?;
                    }
                    ReviewAction::Delete { isbn } => {
                        let response = client.delete_review(&isbn, &token).await?;
                        print_value(
                            cli.output,
                            &format!("Review deleted for ISBN {}", isbn),
                            &response,
                        )?;
                    }
                }
            }

            Commands::Demo {
                isbn,
                author,
                title,
                username,
                password,
                review,
            } => {
                let defaults = DemoScenario::default();
                let scenario = DemoScenario {
                    isbn: isbn.unwrap_or(defaults.isbn),
                    author: author.unwrap_or(defaults.author),
                    title: title.unwrap_or(defaults.title),
                    username: username.unwrap_or(defaults.username),
                    password: password.unwrap_or(defaults.password),
                    review: review.unwrap_or(defaults.review),
                };
                let report = bookshelf_client::run_demo(&client, &scenario).await;
                match cli.output {
                    OutputFormat::Json => {
                        let steps: Vec<Value> = report
                            .steps
                            .iter()
                            .map(|r| {
                                serde_json::json!({
                                    "step": r.label,
                                    "outcome": r.outcome.to_string(),
                                })
                            })
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&steps)?);
                    }
                    OutputFormat::Table => print_demo_summary(&report),
                }
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
