use std::{path::PathBuf, process::exit};

use clap::Parser;

use spendwatch::{
    Config, Error, browser,
    chart::save_chart,
    config::{DEFAULT_CHART_PATH, DEFAULT_CREDENTIALS_PATH, DEFAULT_LOG_PATH, DEFAULT_TOKEN_PATH},
    gmail::{DEFAULT_MAX_RESULTS, DEFAULT_NEWER_THAN_DAYS, GmailClient, SearchQuery},
    logging::setup_logging,
    report::{DEFAULT_MONTHLY_BUDGET, Report, category_totals},
    scan_inbox,
};

/// Reads bank and wallet alerts from your Gmail inbox and summarises your
/// spending.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the OAuth client secret downloaded from the Google Cloud
    /// console.
    #[arg(long, default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials_path: PathBuf,

    /// File path to the cached access and refresh tokens.
    #[arg(long, default_value = DEFAULT_TOKEN_PATH)]
    token_path: PathBuf,

    /// The monthly budget in rupees.
    #[arg(short, long, default_value_t = DEFAULT_MONTHLY_BUDGET)]
    budget: u64,

    /// The largest number of emails to read.
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: u32,

    /// Only read emails received in the last N days.
    #[arg(long, default_value_t = DEFAULT_NEWER_THAN_DAYS)]
    newer_than_days: u32,

    /// File path to write the spending chart to.
    #[arg(long, default_value = DEFAULT_CHART_PATH)]
    chart_path: PathBuf,

    /// Do not open the browser, print the URLs instead.
    #[arg(long)]
    no_open: bool,

    /// File path to append debug logs to.
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    log_path: PathBuf,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            credentials_path: args.credentials_path,
            token_path: args.token_path,
            search: SearchQuery {
                newer_than_days: args.newer_than_days,
                max_results: args.max_results,
                ..Default::default()
            },
            monthly_budget: args.budget,
            chart_path: args.chart_path,
            open_browser: !args.no_open,
            log_path: args.log_path,
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from(Args::parse());

    if let Err(error) = setup_logging(&config.log_path) {
        print_error(error);
        exit(1);
    }

    if let Err(error) = run(&config).await {
        tracing::error!("{error}");
        print_error(error);
        exit(1);
    }
}

async fn run(config: &Config) -> Result<(), Error> {
    let http = reqwest::Client::new();

    let access_token = spendwatch::auth::obtain_access_token(&config.auth_settings(), &http).await?;
    let client = GmailClient::new(http, access_token);

    let scan = scan_inbox(&client, &config.search).await?;
    println!("\nFound {} possible transaction emails\n", scan.messages_found);

    print!("{}", Report::new(&scan.transactions, config.monthly_budget));

    save_chart(&category_totals(&scan.transactions), &config.chart_path)?;
    let chart_path = config.chart_path.to_string_lossy();

    if config.open_browser {
        if let Err(error) = browser::open(&chart_path) {
            tracing::warn!("Could not open {chart_path} in the browser: {error}");
            println!("\nSaved the spending chart to {chart_path}");
        }
    } else {
        println!("\nSaved the spending chart to {chart_path}");
    }

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
