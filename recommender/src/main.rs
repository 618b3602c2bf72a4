//! Recommender binary entry point

use anyhow::Context;
use clap::Parser;

use recommender::{
    CatalogConfig, RecommendError, RecommendationSlate, Recommender, RecommenderConfig, SolvedAcClient,
    DEFAULT_SLATE_SIZE,
};
use shared::logging::init_tracing;

#[derive(Parser)]
#[command(name = "recommender")]
#[command(about = "Recommend unsolved practice problems for an online judge handle")]
struct Args {
    /// Handle to recommend problems for
    #[arg(long)]
    handle: String,

    /// Page number, 1-based; later pages give different problems
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Number of problems to recommend
    #[arg(long, default_value_t = DEFAULT_SLATE_SIZE)]
    count: usize,

    /// Print the slate as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Catalog API base URL, overrides CATALOG_BASE_URL
    #[arg(long)]
    base_url: Option<String>,
}

const EXIT_UNKNOWN_HANDLE: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(Some(args.log_level.as_str()));

    let mut config = RecommenderConfig::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = &args.base_url {
        config.catalog.base_url = CatalogConfig::with_base_url(base_url)?.base_url;
    }

    let client = SolvedAcClient::new(config.catalog.clone()).context("Failed to build catalog client")?;
    let recommender = Recommender::new(client, config);

    let slate = match recommender.recommend(&args.handle, args.page, args.count).await {
        Ok(slate) => slate,
        Err(RecommendError::UserNotFound { handle }) => {
            eprintln!("No user named '{handle}' was found. Check the handle and try again.");
            std::process::exit(EXIT_UNKNOWN_HANDLE);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&slate)?);
    } else {
        print_slate(&slate);
    }
    Ok(())
}

fn print_slate(slate: &RecommendationSlate) {
    println!("Recommendations for {} (target {}, page {})", slate.handle, slate.target_tier.name(), slate.page);
    for entry in &slate.problems {
        println!("[{}] {} : {}", entry.problem.level.name(), entry.problem.title, entry.problem.url());
    }
    if slate.is_short() {
        println!(
            "Only {} of {} problems could be found right now; try again later or another page.",
            slate.len(),
            slate.requested
        );
    }
}
