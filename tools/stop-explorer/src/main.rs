use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod output;

use stop_explorer_core::render::{MarkerLayer, TableView};
use stop_explorer_core::{
    explorer_link, ExplorerConfig, ExplorerSession, FixedLocation, HttpBackend, LatLng,
    LocationSource, NearestOutcome, Unsupported,
};
use stop_explorer_transit::{AuthorityName, StopIdentifier};

#[derive(Parser, Debug)]
#[command(
    name = "stop-explorer",
    author,
    version,
    about = "Browse bus stops and manage favorites from the command line",
    long_about = "Loads the bus stop feed from a stop explorer backend and shows it as a \
                  table or GeoJSON, filtered by text, local authority or distance.\n\n\
                  Favorite commands need a signed-in session: pass the session cookie \
                  and CSRF token, or put them in the config file."
)]
struct Args {
    /// JSON config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// CSRF token sent with favorite changes
    #[arg(long, global = true)]
    csrf_token: Option<String>,

    /// Cookie header value for the signed-in session
    #[arg(long, global = true)]
    cookie: Option<String>,

    /// Most stops kept from the feed
    #[arg(long, global = true)]
    max_stops: Option<usize>,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stops, optionally filtered
    List {
        /// Map search: name, street, locality, authority or lines
        #[arg(long, requires = "geojson", conflicts_with = "authorities")]
        search: Option<String>,

        /// Table search: like --search, but also matches ATCO codes
        #[arg(long, conflicts_with_all = ["geojson", "authorities"])]
        table_search: Option<String>,

        /// Only stops of this local authority (repeatable)
        #[arg(long = "authority")]
        authorities: Vec<String>,

        /// Print map markers as GeoJSON instead of a table
        #[arg(long)]
        geojson: bool,
    },

    /// List the local authorities in the feed
    Authorities,

    /// Show the stops nearest to a position
    Nearest {
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// How many stops to show
        #[arg(short)]
        k: Option<usize>,

        /// Print map markers as GeoJSON instead of a list
        #[arg(long)]
        geojson: bool,
    },

    /// List your favorite stops
    Favorites,

    /// Add a stop to favorites, or remove it if it is one already
    Toggle { atco: String },

    /// Remove a stop from favorites
    Remove { atco: String },

    /// Check whether a stop is a favorite
    Check { atco: String },

    /// Remove all favorites
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Print the explorer link centered on a position
    Link {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<ExplorerConfig> {
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ExplorerConfig::default(),
    };

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(token) = &args.csrf_token {
        config.csrf_token = Some(token.clone());
    }
    if let Some(cookie) = &args.cookie {
        config.session_cookie = Some(cookie.clone());
    }
    if let Some(max_stops) = args.max_stops {
        config.max_stops = max_stops;
    }
    if let Command::Nearest { k: Some(k), .. } = args.command {
        config.nearest_k = k;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    tracing::debug!(base_url = %config.base_url, "using backend");

    let backend = HttpBackend::new(&config).context("Failed to create HTTP client")?;
    let session = ExplorerSession::new(backend, config);

    match args.command {
        Command::List {
            search,
            table_search,
            authorities,
            geojson,
        } => {
            session.load().await;
            if let Some(query) = table_search {
                session.search_table(&query).await;
            } else if let Some(query) = search {
                session.search(&query).await;
            } else if !authorities.is_empty() {
                let selected: BTreeSet<AuthorityName> =
                    authorities.into_iter().map(AuthorityName::from).collect();
                session.filter_authorities(selected).await;
            }
            output::print_status(session.status().await);

            if geojson {
                let mut layer = MarkerLayer::new();
                session.render(&mut layer).await;
                output::print_geojson(&layer)?;
            } else {
                let mut table = TableView::new();
                session.render(&mut table).await;
                output::print_table(&table);
            }
        }

        Command::Authorities => {
            session.load().await;
            output::print_status(session.status().await);
            for authority in session.authorities().await {
                println!("{authority}");
            }
        }

        Command::Nearest {
            lat, lng, geojson, ..
        } => {
            session.load().await;

            let source: Box<dyn LocationSource> = match (lat, lng) {
                (Some(lat), Some(lng)) => Box::new(FixedLocation(LatLng::new(lat, lng))),
                _ => Box::new(Unsupported),
            };
            let outcome = session.find_nearest(source.as_ref()).await;
            output::print_status(session.status().await);

            match outcome {
                NearestOutcome::Found(_) if geojson => {
                    let mut layer = MarkerLayer::new();
                    session.render(&mut layer).await;
                    output::print_geojson(&layer)?;
                }
                NearestOutcome::Found(nearest) => output::print_nearest(&nearest),
                NearestOutcome::Fallback | NearestOutcome::Superseded => {}
            }
        }

        Command::Favorites => {
            let favorites = session
                .user_favorites()
                .await
                .context("Failed to load favorites")?;

            for feature in &favorites.features {
                let props = &feature.properties;
                let link = feature
                    .geometry
                    .as_ref()
                    .and_then(|geometry| geometry.lng_lat())
                    .and_then(|(lng, lat)| explorer_link(lat, lng))
                    .unwrap_or_default();
                println!(
                    "{}\t{}\t{}\t{}",
                    props.atco,
                    props.name.as_deref().unwrap_or("Unnamed Stop"),
                    props.locality.as_deref().unwrap_or("N/A"),
                    link
                );
            }
            eprintln!("{} favorites", favorites.features.len());
        }

        Command::Toggle { atco } => {
            session.load().await;
            let id = StopIdentifier::from(atco);
            let result = session.toggle_favorite(&id).await;
            output::print_status(session.status().await);

            let action = result.with_context(|| format!("Failed to toggle favorite {id}"))?;
            println!("{id} {action}");
            let badge = session.badge().await;
            tracing::info!(favorites = badge, "favorites updated");
        }

        Command::Remove { atco } => {
            let id = StopIdentifier::from(atco);
            let result = session.remove_favorite(&id).await;
            output::print_status(session.status().await);

            result.with_context(|| format!("Failed to remove favorite {id}"))?;
            let badge = session.badge().await;
            tracing::info!(favorites = badge, "favorites updated");
        }

        Command::Check { atco } => {
            let id = StopIdentifier::from(atco);
            println!("{}", session.check_favorite(&id).await);
        }

        Command::Clear { yes } => {
            if !yes && !output::confirm("Are you sure you want to remove all favorites?")? {
                eprintln!("Cancelled");
                return Ok(());
            }

            let result = session.clear_all_favorites().await;
            output::print_status(session.status().await);
            result.context("Failed to clear favorites")?;
        }

        Command::Link { lat, lng } => match explorer_link(lat, lng) {
            Some(link) => println!("{link}"),
            None => bail!("Invalid coordinates: {lat}, {lng}"),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "stop-explorer",
            "--base-url",
            "https://stops.example.org",
            "--max-stops",
            "50",
            "nearest",
            "--lat",
            "51.45",
            "--lng",
            "-2.58",
            "-k",
            "3",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.base_url, "https://stops.example.org");
        assert_eq!(config.max_stops, 50);
        assert_eq!(config.nearest_k, 3);
    }

    #[test]
    fn test_each_search_targets_its_own_view() {
        let map_search_as_table =
            Args::try_parse_from(["stop-explorer", "list", "--search", "church"]);
        assert!(map_search_as_table.is_err());

        let table_search_as_geojson = Args::try_parse_from([
            "stop-explorer",
            "list",
            "--table-search",
            "0100brp",
            "--geojson",
        ]);
        assert!(table_search_as_geojson.is_err());
    }

    #[test]
    fn test_search_conflicts_with_authority() {
        let parsed = Args::try_parse_from([
            "stop-explorer",
            "list",
            "--search",
            "church",
            "--geojson",
            "--authority",
            "Bristol",
        ]);
        assert!(parsed.is_err());
    }
}
