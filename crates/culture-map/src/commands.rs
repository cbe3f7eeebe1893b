//! Typed marker actions.
//!
//! Each marker offers "ask about", "get directions" and "focus"; the
//! dispatcher resolves the marker id against the current catalog and routes
//! the action to its collaborator.

use std::sync::Arc;

use culture_chat::{ConversationOrchestrator, Dispatch};
use culture_core::{Coordinates, LocationState, PointOfInterest};
use culture_places::PointOfInterestCatalog;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::directions::{directions_url, DirectionsOpener};
use crate::error::MapError;

/// Which surface currently has the user's attention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    #[default]
    Map,
    Conversation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerCommand {
    AskAbout(String),
    Directions(String),
    Focus(String),
}

impl MarkerCommand {
    pub fn point_id(&self) -> &str {
        match self {
            MarkerCommand::AskAbout(id)
            | MarkerCommand::Directions(id)
            | MarkerCommand::Focus(id) => id,
        }
    }
}

/// A blocking message shown instead of performing the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LocationRequired,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LocationRequired => "Location not available. Please enable location services.",
        }
    }
}

#[derive(Debug)]
pub enum MarkerOutcome {
    /// "Tell me more about ..." was submitted to the conversation.
    Submitted(Dispatch),
    /// The directions URL was handed to the opener.
    Opened(String),
    Focused(Coordinates),
    Blocked(Notice),
}

pub struct MarkerDispatcher {
    catalog: Arc<PointOfInterestCatalog>,
    location: watch::Receiver<LocationState>,
    orchestrator: ConversationOrchestrator,
    opener: Arc<dyn DirectionsOpener>,
    directions_base_url: String,
    active: watch::Sender<ActiveView>,
}

impl MarkerDispatcher {
    pub fn new(
        catalog: Arc<PointOfInterestCatalog>,
        location: watch::Receiver<LocationState>,
        orchestrator: ConversationOrchestrator,
        opener: Arc<dyn DirectionsOpener>,
        directions_base_url: impl Into<String>,
    ) -> Self {
        let (active, _) = watch::channel(ActiveView::default());
        Self {
            catalog,
            location,
            orchestrator,
            opener,
            directions_base_url: directions_base_url.into(),
            active,
        }
    }

    pub fn active_view(&self) -> ActiveView {
        *self.active.borrow()
    }

    pub fn subscribe_active_view(&self) -> watch::Receiver<ActiveView> {
        self.active.subscribe()
    }

    pub fn show(&self, view: ActiveView) {
        self.active.send_if_modified(|current| {
            let changed = *current != view;
            *current = view;
            changed
        });
    }

    /// Run `command`. Conversation submission needs a Tokio runtime.
    pub fn handle(&self, command: MarkerCommand) -> Result<MarkerOutcome, MapError> {
        let point = self.point(command.point_id())?;

        match command {
            MarkerCommand::AskAbout(_) => {
                let dispatch = self
                    .orchestrator
                    .submit(&format!("Tell me more about {}", point.name))?;
                self.show(ActiveView::Conversation);
                Ok(MarkerOutcome::Submitted(dispatch))
            }
            MarkerCommand::Directions(_) => {
                let Some(origin) = self.location.borrow().settled_coordinates() else {
                    warn!(id = %point.id, "Directions requested before location settled");
                    return Ok(MarkerOutcome::Blocked(Notice::LocationRequired));
                };
                let url = directions_url(&self.directions_base_url, origin, point.coordinates)?;
                self.opener.open(&url)?;
                info!(id = %point.id, url = %url, "Opened directions");
                Ok(MarkerOutcome::Opened(url))
            }
            MarkerCommand::Focus(_) => {
                self.catalog.recenter(&point);
                self.show(ActiveView::Map);
                Ok(MarkerOutcome::Focused(point.coordinates))
            }
        }
    }

    fn point(&self, id: &str) -> Result<PointOfInterest, MapError> {
        self.catalog
            .snapshot()
            .find(id)
            .cloned()
            .ok_or_else(|| MapError::UnknownPoint(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use culture_chat::{ExchangeState, OrchestratorOptions, Role};
    use culture_core::{ContextReader, LocationStatus};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingOpener {
        urls: Mutex<Vec<String>>,
    }

    impl DirectionsOpener for RecordingOpener {
        fn open(&self, url: &str) -> Result<(), MapError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    struct Setup {
        catalog: Arc<PointOfInterestCatalog>,
        location: watch::Sender<LocationState>,
        orchestrator: ConversationOrchestrator,
        opener: Arc<RecordingOpener>,
        dispatcher: MarkerDispatcher,
    }

    fn setup(base_url: &str) -> Setup {
        let catalog = Arc::new(PointOfInterestCatalog::new(None));
        let (location, location_rx) = watch::channel(LocationState::default());
        let context = ContextReader::new(location_rx.clone(), catalog.subscribe());
        let orchestrator = ConversationOrchestrator::new(
            OrchestratorOptions {
                greeting: None,
                ..OrchestratorOptions::guide()
            },
            None,
            context,
        );
        let opener = Arc::new(RecordingOpener::default());
        let dispatcher = MarkerDispatcher::new(
            catalog.clone(),
            location_rx,
            orchestrator.clone(),
            opener.clone(),
            base_url,
        );
        Setup {
            catalog,
            location,
            orchestrator,
            opener,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn test_ask_about_submits_and_switches_view() {
        let s = setup("https://www.google.com/maps/dir");
        let name = s.catalog.snapshot().find("1").unwrap().name.clone();
        assert_eq!(s.dispatcher.active_view(), ActiveView::Map);

        let outcome = s.dispatcher.handle(MarkerCommand::AskAbout("1".to_string())).unwrap();
        let MarkerOutcome::Submitted(dispatch) = outcome else {
            panic!("expected submission");
        };
        assert_eq!(s.dispatcher.active_view(), ActiveView::Conversation);

        assert_eq!(dispatch.handle.await.unwrap().unwrap(), ExchangeState::Resolved);
        let messages = s.orchestrator.messages().unwrap();
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, format!("Tell me more about {}", name));
    }

    #[test]
    fn test_directions_blocked_until_location_settles() {
        let s = setup("https://www.google.com/maps/dir");
        let outcome = s.dispatcher.handle(MarkerCommand::Directions("2".to_string())).unwrap();
        assert!(matches!(outcome, MarkerOutcome::Blocked(Notice::LocationRequired)));
        assert!(s.opener.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_directions_opens_url_after_fallback() {
        let s = setup("https://www.google.com/maps/dir");
        s.location.send_replace(LocationState::settled(
            LocationStatus::TimedOut,
            Coordinates::new(40.7128, -74.006),
        ));
        let dest = s.catalog.snapshot().find("2").unwrap().coordinates;

        let outcome = s.dispatcher.handle(MarkerCommand::Directions("2".to_string())).unwrap();
        let expected = format!(
            "https://www.google.com/maps/dir/40.7128,-74.006/{},{}",
            dest.lat, dest.lng
        );
        assert!(matches!(outcome, MarkerOutcome::Opened(ref url) if *url == expected));
        assert_eq!(*s.opener.urls.lock().unwrap(), vec![expected]);
    }

    #[test]
    fn test_directions_rejects_non_http_base() {
        let s = setup("javascript:alert(1)");
        s.location.send_replace(LocationState::settled(
            LocationStatus::Detected,
            Coordinates::DEFAULT,
        ));
        let err = s
            .dispatcher
            .handle(MarkerCommand::Directions("1".to_string()))
            .unwrap_err();
        assert!(matches!(err, MapError::UnsupportedScheme(_)));
        assert!(s.opener.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_focus_recenters_without_touching_points() {
        let s = setup("https://www.google.com/maps/dir");
        let before = s.catalog.snapshot();
        s.dispatcher.show(ActiveView::Conversation);

        let outcome = s.dispatcher.handle(MarkerCommand::Focus("3".to_string())).unwrap();
        let target = before.find("3").unwrap().coordinates;
        assert!(matches!(outcome, MarkerOutcome::Focused(c) if c == target));
        assert_eq!(s.catalog.focus(), Some(target));
        assert_eq!(s.catalog.snapshot(), before);
        assert_eq!(s.dispatcher.active_view(), ActiveView::Map);
    }

    #[test]
    fn test_unknown_point() {
        let s = setup("https://www.google.com/maps/dir");
        let err = s
            .dispatcher
            .handle(MarkerCommand::Focus("404".to_string()))
            .unwrap_err();
        assert!(matches!(err, MapError::UnknownPoint(ref id) if id == "404"));
    }

    #[test]
    fn test_active_view_is_observable() {
        let s = setup("https://www.google.com/maps/dir");
        let mut rx = s.dispatcher.subscribe_active_view();
        s.dispatcher.show(ActiveView::Conversation);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ActiveView::Conversation);

        s.dispatcher.show(ActiveView::Conversation);
        assert!(!rx.has_changed().unwrap());
    }
}
