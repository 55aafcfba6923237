//! adcraft — build ad combinations from creatives and copy, preview them and
//! bulk-create the ads.
//!
//! Runs one session against the in-memory demo store.

use std::path::PathBuf;

use adcraft_combinator::{load_snapshot, AdBuilderSession};
use adcraft_core::config::AppConfig;
use adcraft_core::types::{CommitContext, ItemFlavor};
use adcraft_store::InMemoryAdStore;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adcraft")]
#[command(about = "Generate, preview and create ad combinations")]
#[command(version)]
struct Cli {
    /// TOML config file (environment variables still apply on top)
    #[arg(long, env = "ADCRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Number of creatives to select (default: all)
    #[arg(long)]
    creatives: Option<usize>,

    /// Number of headlines to select (default: all)
    #[arg(long)]
    headlines: Option<usize>,

    /// Number of primary texts to select (default: all)
    #[arg(long)]
    primaries: Option<usize>,

    /// Number of descriptions to select (default: all)
    #[arg(long)]
    descriptions: Option<usize>,

    /// Auto-preview limit (overrides config)
    #[arg(long, env = "ADCRAFT__PREVIEW__AUTO_PREVIEW_LIMIT")]
    auto_preview_limit: Option<usize>,

    /// Page size of the preview window (overrides config)
    #[arg(long, env = "ADCRAFT__PREVIEW__PAGE_SIZE")]
    page_size: Option<usize>,

    /// Request the preview even above the auto-preview limit
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Number of scroll (proximity) signals to simulate
    #[arg(long, default_value_t = 0)]
    scroll: usize,

    /// User id stamped on created ads (overrides config)
    #[arg(long)]
    user_id: Option<String>,

    /// Project id stamped on created ads (overrides config)
    #[arg(long)]
    project_id: Option<String>,

    /// Skip the bulk create
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adcraft=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
    };

    if let Some(limit) = cli.auto_preview_limit {
        config.preview.auto_preview_limit = limit;
    }
    if let Some(page_size) = cli.page_size {
        config.preview.page_size = page_size;
    }
    if let Some(user_id) = cli.user_id.clone() {
        config.commit.user_id = user_id;
    }
    if let Some(project_id) = cli.project_id.clone() {
        config.commit.project_id = Some(project_id);
    }
    config.validate()?;

    info!(
        auto_preview_limit = config.preview.auto_preview_limit,
        page_size = config.preview.page_size,
        user_id = %config.commit.user_id,
        "Configuration loaded"
    );

    let store = InMemoryAdStore::with_demo_data(&config.storage);
    let snapshot = load_snapshot(&store).await?;

    let mut session = AdBuilderSession::new(&config.preview);
    for (flavor, limit) in [
        (ItemFlavor::Creative, cli.creatives),
        (ItemFlavor::Headline, cli.headlines),
        (ItemFlavor::PrimaryText, cli.primaries),
        (ItemFlavor::Description, cli.descriptions),
    ] {
        let ids = snapshot.ids(flavor);
        let take = limit.unwrap_or(ids.len());
        session.replace_items(flavor, ids.into_iter().take(take));
    }

    let summary = session.summary();
    info!(
        total = summary.total,
        preview = ?session.preview_state(),
        missing = ?session.selections().missing(),
        "Combinations generated"
    );

    if cli.preview {
        session.request_preview();
    }
    for _ in 0..cli.scroll {
        session.on_proximity_signal();
    }

    let cards = session.preview_cards(&snapshot, &store);
    println!("{}", serde_json::to_string_pretty(&cards)?);
    info!(
        visible = cards.len(),
        total = summary.total,
        preview = ?session.preview_state(),
        "Preview rendered"
    );

    if cli.dry_run {
        info!(included = summary.included, "Dry run, no ads created");
        return Ok(());
    }

    let context = CommitContext {
        user_id: config.commit.user_id.clone(),
        project_id: config.commit.project_id.clone(),
        subproject_id: config.commit.subproject_id.clone(),
    };
    let outcome = session.commit(&store, &context).await?;
    info!(
        created = outcome.created,
        stored = store.ad_count(),
        "Ads created"
    );

    Ok(())
}
