use censys::config::DEFAULT_BASE_URL;
use censys::{ClientConfig, GetOptions, Index, SearchClient, SearchResult};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Search a Censys index and print matching records as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "censys")]
struct Cli {
    /// Index to search: certificates, ipv4 or websites
    #[arg(long, short, default_value = "ipv4")]
    index: Index,
    /// Search value; reserved characters are escaped before sending
    #[arg(long, short)]
    query: String,
    /// Field to request (repeatable)
    #[arg(long = "field", short = 'f')]
    fields: Vec<String>,
    /// Stop after this many records (0 for no limit)
    #[arg(long, default_value_t = 100)]
    max_results: usize,
    /// Pause between page fetches, in milliseconds
    #[arg(long, default_value_t = 0)]
    sleep_ms: u64,
    #[arg(long, default_value_t = 1)]
    start_page: u32,
    /// Fetch only this page instead of walking pages
    #[arg(long, conflicts_with_all = ["max_results", "sleep_ms", "start_page"])]
    page: Option<u32>,
    #[arg(long, env = "CENSYS_API_ID")]
    api_id: Option<String>,
    #[arg(long, env = "CENSYS_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,
    #[arg(long, env = "CENSYS_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Cli {
    fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_credentials(self.api_id.clone(), self.api_secret.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    fn get_options(&self) -> GetOptions {
        GetOptions::default()
            .query(self.query.clone())
            .fields(self.fields.clone())
            .max_results(self.max_results)
            .sleep(Duration::from_millis(self.sleep_ms))
            .start_page(self.start_page)
    }
}

fn print_record(out: &mut impl Write, result: &SearchResult) -> std::io::Result<()> {
    writeln!(out, "{}", result)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut api = SearchClient::new(cli.index, cli.config());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(page) = cli.page {
        let result_set = api.call(&cli.query, page, cli.fields.as_slice()).await?;
        tracing::info!(
            page = result_set.current_page(),
            pages = result_set.total_pages(),
            count = result_set.count(),
            backend_time = result_set.backend_time(),
            "Fetched page"
        );
        for result in &result_set {
            print_record(&mut out, result)?;
        }
    } else {
        let mut cursor = api.get(cli.get_options());
        while let Some(result) = cursor.next().await? {
            print_record(&mut out, &result)?;
        }
        tracing::info!(records = cursor.count(), "Search complete");
    }

    api.close();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli).await
}
