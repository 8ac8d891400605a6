//! ean-search - command-line client for the ean-search.org barcode API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ean_search::api::client::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};
use ean_search::api::{EanSearch, Language};
use ean_search::commands::{ImageCommand, LookupCommand, SearchCommand, SearchQuery};
use ean_search::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ean-search",
    version,
    about = "Barcode and product lookups against the ean-search.org database",
    long_about = "Look up EAN/GTIN/UPC and ISBN codes, search products by name, prefix or category, verify checksums and download barcode images."
)]
struct Cli {
    /// API access token
    #[arg(long, global = true, env = "EAN_SEARCH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Preferred language for product names (name, ISO code or number)
    #[arg(short, long, global = true)]
    language: Option<Language>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Print the remaining API credits to stderr when done
    #[arg(long, global = true)]
    credits: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a barcode (EAN, GTIN, UPC)
    #[command(alias = "l")]
    Lookup {
        /// Barcode to look up
        ean: String,

        /// Show the full product record instead of just the name
        #[arg(long)]
        full: bool,
    },

    /// Look up a book by ISBN-10
    Isbn {
        /// ISBN-10 (hyphens allowed)
        isbn: String,
    },

    /// Verify the checksum digit of a barcode
    Verify {
        /// Barcode to verify
        ean: String,
    },

    /// Show the country that issued a barcode
    Country {
        /// Barcode to inspect
        ean: String,
    },

    /// Search products by name
    #[command(alias = "s")]
    Search {
        /// Product name or keywords
        name: String,

        /// Result page (0-based)
        #[arg(short, long, default_value = "0")]
        page: u32,

        /// Find products with similar names instead of exact matches
        #[arg(long)]
        similar: bool,
    },

    /// List products whose barcode starts with a prefix
    Prefix {
        /// Barcode prefix
        prefix: String,

        /// Result page (0-based)
        #[arg(short, long, default_value = "0")]
        page: u32,
    },

    /// Search products within a category
    Category {
        /// Numeric category id
        category: u32,

        /// Optional name filter
        #[arg(short, long, default_value = "")]
        name: String,

        /// Result page (0-based)
        #[arg(short, long, default_value = "0")]
        page: u32,
    },

    /// Download a barcode image as PNG
    Image {
        /// Barcode to render
        ean: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = DEFAULT_IMAGE_WIDTH)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = DEFAULT_IMAGE_HEIGHT)]
        height: u32,
    },

    /// List supported result languages
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let output = match cli.command {
        Commands::Languages => languages_table(),
        command => run(command, config, cli.credits).await?,
    };

    println!("{}", output);

    Ok(())
}

/// Runs an API command and reports the credit balance afterwards.
async fn run(command: Commands, config: Config, show_credits: bool) -> Result<String> {
    let client = EanSearch::from_config(&config).context("Failed to create API client")?;

    let output = match command {
        Commands::Lookup { ean, full } => {
            let cmd = LookupCommand::new(config);
            if full {
                cmd.record(&client, &ean).await?
            } else {
                cmd.name(&client, &ean).await?
            }
        }

        Commands::Isbn { isbn } => LookupCommand::new(config).isbn(&client, &isbn).await?,

        Commands::Verify { ean } => LookupCommand::new(config).verify(&client, &ean).await?,

        Commands::Country { ean } => LookupCommand::new(config).country(&client, &ean).await?,

        Commands::Search { name, page, similar } => {
            let query = if similar {
                SearchQuery::Similar { name, page }
            } else {
                SearchQuery::Name { name, page }
            };
            SearchCommand::new(config).execute(&client, &query).await?
        }

        Commands::Prefix { prefix, page } => {
            let query = SearchQuery::Prefix { prefix, page };
            SearchCommand::new(config).execute(&client, &query).await?
        }

        Commands::Category { category, name, page } => {
            let query = SearchQuery::Category { category, name, page };
            SearchCommand::new(config).execute(&client, &query).await?
        }

        Commands::Image { ean, output, width, height } => {
            ImageCommand::new(width, height).execute(&client, &ean, &output).await?
        }

        Commands::Languages => unreachable!("languages is handled without a client"),
    };

    let credits = client.credits_remaining();
    info!("Credits remaining: {}", credits);
    if show_credits {
        eprintln!("Credits remaining: {}", credits);
    }

    Ok(output)
}

fn languages_table() -> String {
    let mut lines = vec![
        "Supported result languages:\n".to_string(),
        format!("{:<6} {:<12} {:<4}", "Code", "Name", "ISO"),
        format!("{:-<6} {:-<12} {:-<4}", "", "", ""),
    ];

    for language in Language::all() {
        lines.push(format!(
            "{:<6} {:<12} {:<4}",
            language.code(),
            language.to_string(),
            language.iso_code()
        ));
    }

    lines.join("\n")
}
