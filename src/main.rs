mod cli;

use cinelog::metadata::MovieMetadataProvider;
use cinelog::{config, metadata, server};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Cinelog server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            // Verbose mode: trace for cinelog, debug for HTTP
            "cinelog=trace,cinelog_db=debug,cinelog_core=debug,tower_http=debug".to_string()
        } else {
            // Normal mode: debug for cinelog crates, info for HTTP requests
            "cinelog=debug,cinelog_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Fetch { title, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(fetch_title(&title, json, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("cinelog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn fetch_title(title: &str, json: bool, config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let api_key = config.omdb.resolve_api_key().context(
        "OMDb API key is not configured (set [omdb] api_key or the OMDB_API_KEY environment variable)",
    )?;

    let provider = metadata::OmdbProvider::with_base_url(api_key, config.omdb.base_url.clone());
    let movie = provider.fetch(title).await?;

    if json {
        let json_str = serde_json::to_string_pretty(&movie)?;
        println!("{}", json_str);
    } else {
        println!("Title: {}", movie.name);
        if let Some(ref director) = movie.director {
            println!("Director: {}", director);
        }
        if let Some(year) = movie.year {
            println!("Year: {}", year);
        }
        if let Some(rating) = movie.rating {
            println!("Rating: {:.1}", rating);
        }
        if let Some(ref poster) = movie.poster_url {
            println!("Poster: {}", poster);
        }
        if let Some(ref link) = movie.imdb_link {
            println!("IMDb: {}", link);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {}", config.server.db_path);
            println!(
                "  OMDb key configured: {}",
                config.omdb.resolve_api_key().is_some()
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
