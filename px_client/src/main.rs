//! Terminal host for the Pixdex hangman game.
//!
//! The client loads the catalog from the Pixdex API (falling back to the
//! bundled dataset), keeps scores in PostgreSQL or in memory, and runs the
//! lobby and game screens on stdin/stdout.

use anyhow::{Context, Result};
use log::{info, warn};
use pico_args::Arguments;
use pixdex::{
    catalog::{Catalog, FallbackCatalog, StaticCatalog},
    db::{Database, DatabaseConfig},
    game::GameConfig,
    leaderboard::{InMemoryLeaderboard, LeaderboardManager, LeaderboardRepository},
};
use std::{
    io::{self, Write},
    sync::Arc,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use px_client::{
    api_client::{DEFAULT_API_URL, HttpCatalog},
    app::{App, validate_player_name},
};

const HELP: &str = "\
Play Pixdex: guess audiovisual titles letter by letter

USAGE:
  px_client [OPTIONS]

OPTIONS:
  --api        URL         Catalog API base URL  [default: env PIXDEX_API_URL or http://localhost:8081]
  --player     NAME        Player name           [default: your login name]
  --db-url     URL         Leaderboard database  [default: env DATABASE_URL, else in memory]
  --seed       N           Fixed seed for title selection

FLAGS:
  --offline                Use the bundled catalog only
  -h, --help               Print help information

ENVIRONMENT:
  PIXDEX_INTERMISSION_MS   Pause after a solved title  [default: 1000]
  DB_MAX_CONNECTIONS       Leaderboard pool size
  RUST_LOG                 Log filter (e.g., info, pixdex=debug)
";

struct Args {
    api_url: String,
    player: Option<String>,
    database_url: Option<String>,
    seed: Option<u64>,
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        api_url: pargs.value_from_str("--api").unwrap_or_else(|_| {
            std::env::var("PIXDEX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
        }),
        player: pargs.opt_value_from_str("--player").ok().flatten(),
        database_url: pargs
            .opt_value_from_str("--db-url")
            .ok()
            .flatten()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url: &String| !url.is_empty()),
        seed: pargs.opt_value_from_str("--seed").ok().flatten(),
        offline: pargs.contains("--offline"),
    };

    env_logger::builder().format_target(false).init();

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let (repository, db) = open_leaderboard(args.database_url.as_deref()).await?;
    let leaderboard = Arc::new(LeaderboardManager::new(repository));
    let catalog = load_catalog(&args).await?;

    let mut config = GameConfig::from_env();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();

    let mut candidate = args.player.unwrap_or_else(whoami::username);
    let player = loop {
        match validate_player_name(&leaderboard, &candidate).await {
            Ok(name) => break Some(name),
            Err(e) => {
                println!("{e}");
                print!("Your name: ");
                stdout.flush()?;
                match input.next_line().await.context("Failed to read name")? {
                    Some(line) => candidate = line,
                    None => break None,
                }
            }
        }
    };

    if let Some(player) = player {
        let mut app = App::new(catalog, leaderboard, config, player);
        app.run(&mut input, &mut stdout).await?;
        println!("\nBye, {}!", app.player());
    }

    if let Some(db) = db {
        db.close().await;
    }
    Ok(())
}

async fn open_leaderboard(
    database_url: Option<&str>,
) -> Result<(Arc<dyn LeaderboardRepository>, Option<Database>)> {
    let Some(url) = database_url else {
        info!("No database configured, keeping scores in memory");
        return Ok((Arc::new(InMemoryLeaderboard::seeded()), None));
    };

    let db = Database::connect(&DatabaseConfig::with_url(url))
        .await
        .context("Failed to open leaderboard database")?;

    Ok((Arc::new(db.leaderboard()), Some(db)))
}

async fn load_catalog(args: &Args) -> Result<Catalog> {
    let catalog = if args.offline {
        Catalog::load(&StaticCatalog::bundled().context("Bundled catalog is malformed")?).await
    } else {
        let provider = FallbackCatalog::with_bundled(HttpCatalog::new(&args.api_url))
            .context("Bundled catalog is malformed")?;
        Catalog::load(&provider).await
    }
    .context("Failed to load catalog")?;

    if catalog.items().is_empty() {
        warn!("Catalog has no titles");
    }
    Ok(catalog)
}
