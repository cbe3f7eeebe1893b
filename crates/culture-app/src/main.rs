//! CultureGuide binary - composition root.
//!
//! Wires the location provider, the point-of-interest catalog, the
//! conversation orchestrator and the map sync together, with terminal
//! adapters standing in for the browser collaborators.

mod cli;

use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use culture_chat::{ChatCompletion, ConversationOrchestrator, Message, OpenRouterClient};
use culture_core::{ContextReader, Coordinates, GuideConfig, PointOfInterest};
use culture_location::{GeoFailure, Geolocation, LocationProvider, PositionOptions};
use culture_map::{
    DirectionsOpener, MapError, MapView, MapViewSync, Marker, MarkerCommand, MarkerDispatcher,
    MarkerOutcome, Viewport,
};
use culture_places::{parse_category_filter, PlacesClient, PlacesSearch, PointOfInterestCatalog};
use uuid::Uuid;

use crate::cli::{CliArgs, Command};

/// Position source reporting coordinates given on the command line.
struct FixedPosition(Coordinates);

#[async_trait]
impl Geolocation for FixedPosition {
    async fn request_position(&self, _options: &PositionOptions) -> Result<Coordinates, GeoFailure> {
        Ok(self.0)
    }
}

/// Map view that logs what a graphical map would draw.
struct LoggingMapView;

impl MapView for LoggingMapView {
    fn set_view(&self, viewport: Viewport) {
        tracing::debug!(
            lat = viewport.center.lat,
            lng = viewport.center.lng,
            zoom = viewport.zoom,
            "Map view"
        );
    }

    fn replace_markers(&self, user: Option<Coordinates>, markers: &[Marker]) {
        tracing::debug!(user = ?user, markers = markers.len(), "Map markers");
    }
}

/// Directions opener that prints the link for the user to follow.
struct PrintingOpener;

impl DirectionsOpener for PrintingOpener {
    fn open(&self, url: &str) -> Result<(), MapError> {
        println!("Directions: {}", url);
        Ok(())
    }
}

fn print_points(points: &[PointOfInterest]) {
    for p in points {
        let mut line = format!("[{}] {} ({})", p.id, p.name, p.category);
        if let Some(d) = &p.distance {
            line.push_str(&format!(" {}", d));
        }
        if let Some(r) = p.rating {
            line.push_str(&format!(" {:.1}★", r));
        }
        println!("{}", line);
        if !p.description.is_empty() {
            println!("    {}", p.description);
        }
    }
}

fn print_reply(orchestrator: &ConversationOrchestrator, pending_id: Uuid) {
    match orchestrator.message(pending_id) {
        Ok(Some(Message { content, .. })) => println!("{}", content),
        Ok(None) => tracing::warn!(%pending_id, "Reply not found in transcript"),
        Err(e) => tracing::error!(error = %e, "Failed to read transcript"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = GuideConfig::load_or_default(&config_file);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting CultureGuide v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Catalog with live search.
    let places = PlacesClient::from_config(&config.places)?;
    if !places.has_credential() {
        tracing::info!(var = %config.places.api_key_env, "No places credential, search disabled");
    }
    let search: Arc<dyn PlacesSearch> = Arc::new(places);
    let catalog = Arc::new(PointOfInterestCatalog::new(Some(search)));

    // Location.
    let geolocation = args
        .fixed_position()
        .map(|c| Arc::new(FixedPosition(c)) as Arc<dyn Geolocation>);
    let provider = LocationProvider::new(geolocation, &config.location, Arc::clone(&catalog));
    let context = ContextReader::new(provider.subscribe(), catalog.subscribe());

    // Map.
    let map = MapViewSync::new(
        Arc::new(LoggingMapView),
        &context,
        catalog.focus_receiver(),
        config.map.clone(),
        config.location.default_coordinates(),
    );
    let map_task = tokio::spawn(map.run());

    // Conversation.
    let model = OpenRouterClient::from_config(&config.model)?;
    if !model.is_available() {
        tracing::info!(var = %config.model.api_key_env, "No model credential, answering locally");
    }
    let options = args.preset.options().with_chat_config(&config.chat);
    let orchestrator = ConversationOrchestrator::new(
        options,
        Some(Arc::new(model) as Arc<dyn ChatCompletion>),
        context.clone(),
    );
    let dispatcher = MarkerDispatcher::new(
        Arc::clone(&catalog),
        context.location_receiver(),
        orchestrator.clone(),
        Arc::new(PrintingOpener),
        config.map.directions_base_url.clone(),
    );

    if let Some(acquisition) = provider.acquire().await {
        tracing::info!(
            status = %acquisition.status,
            lat = acquisition.coordinates.lat,
            lng = acquisition.coordinates.lng,
            "Location settled"
        );
        if let Some(error) = acquisition.error {
            eprintln!("{}: {}", acquisition.status, error);
        }
    }

    match args.command {
        Command::Ask { text } => {
            let dispatch = orchestrator.submit(&text.join(" "))?;
            dispatch.handle.await??;
            print_reply(&orchestrator, dispatch.pending_id);
        }
        Command::Quick { index } => {
            let dispatch = orchestrator.quick_reply(index)?;
            dispatch.handle.await??;
            print_reply(&orchestrator, dispatch.pending_id);
        }
        Command::Nearby => {
            print_points(&catalog.snapshot().points);
        }
        Command::Search { query, category } => {
            let category = parse_category_filter(&category)?;
            match catalog.search(&query.join(" "), category).await {
                Ok(count) => {
                    tracing::info!(count, "Search complete");
                    print_points(&catalog.snapshot().points);
                }
                Err(e) => eprintln!("Search failed: {}", e),
            }
        }
        Command::AskAbout { id } => {
            if let MarkerOutcome::Submitted(dispatch) =
                dispatcher.handle(MarkerCommand::AskAbout(id))?
            {
                dispatch.handle.await??;
                print_reply(&orchestrator, dispatch.pending_id);
            }
        }
        Command::Directions { id } => match dispatcher.handle(MarkerCommand::Directions(id))? {
            MarkerOutcome::Blocked(notice) => eprintln!("{}", notice.message()),
            outcome => tracing::debug!(?outcome, "Directions handled"),
        },
    }

    map_task.abort();
    Ok(())
}
