//! Keeps a map view in step with the shared context.
//!
//! The center is derived: the catalog's re-center target when set, else the
//! current location, else the configured default. Every render replaces the
//! whole marker layer.

use std::sync::Arc;

use culture_core::config::MapConfig;
use culture_core::{
    CatalogSnapshot, Category, ContextReader, Coordinates, LocationState, PointOfInterest,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

/// One rendered point of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub color: &'static str,
    pub coordinates: Coordinates,
    pub distance: Option<String>,
    pub rating: Option<f32>,
}

impl From<&PointOfInterest> for Marker {
    fn from(point: &PointOfInterest) -> Self {
        Self {
            id: point.id.clone(),
            name: point.name.clone(),
            description: point.description.clone(),
            category: point.category,
            color: point.category.marker_color(),
            coordinates: point.coordinates,
            distance: point.distance.clone(),
            rating: point.rating,
        }
    }
}

/// Map-rendering collaborator.
pub trait MapView: Send + Sync {
    fn set_view(&self, viewport: Viewport);

    /// Replace every marker. `user` is the user's own position, if known.
    fn replace_markers(&self, user: Option<Coordinates>, markers: &[Marker]);
}

pub struct MapViewSync {
    view: Arc<dyn MapView>,
    location: watch::Receiver<LocationState>,
    catalog: watch::Receiver<CatalogSnapshot>,
    focus: watch::Receiver<Option<Coordinates>>,
    config: MapConfig,
    fallback: Coordinates,
}

impl MapViewSync {
    pub fn new(
        view: Arc<dyn MapView>,
        context: &ContextReader,
        focus: watch::Receiver<Option<Coordinates>>,
        config: MapConfig,
        fallback: Coordinates,
    ) -> Self {
        Self {
            view,
            location: context.location_receiver(),
            catalog: context.catalog_receiver(),
            focus,
            config,
            fallback,
        }
    }

    pub fn viewport(&self) -> Viewport {
        if let Some(center) = *self.focus.borrow() {
            return Viewport {
                center,
                zoom: self.config.focus_zoom,
            };
        }
        let center = self.location.borrow().coordinates.unwrap_or(self.fallback);
        Viewport {
            center,
            zoom: self.config.default_zoom,
        }
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.catalog.borrow().points.iter().map(Marker::from).collect()
    }

    /// Push the current viewport and the full marker set to the view.
    pub fn sync(&self) {
        let viewport = self.viewport();
        let markers = self.markers();
        let user = self.location.borrow().coordinates;

        debug!(
            lat = viewport.center.lat,
            lng = viewport.center.lng,
            zoom = viewport.zoom,
            markers = markers.len(),
            "Rendering map"
        );
        self.view.set_view(viewport);
        self.view.replace_markers(user, &markers);
    }

    /// Render now and again on every context change.
    ///
    /// Returns once every writer has been dropped.
    pub async fn run(self) {
        let mut location = self.location.clone();
        let mut catalog = self.catalog.clone();
        let mut focus = self.focus.clone();

        self.sync();

        let (mut location_open, mut catalog_open, mut focus_open) = (true, true, true);
        while location_open || catalog_open || focus_open {
            tokio::select! {
                changed = location.changed(), if location_open => {
                    location_open = changed.is_ok();
                }
                changed = catalog.changed(), if catalog_open => {
                    catalog_open = changed.is_ok();
                }
                changed = focus.changed(), if focus_open => {
                    focus_open = changed.is_ok();
                }
            }
            self.sync();
        }

        info!("Map sync stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use culture_core::{CatalogSource, LocationStatus};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingView {
        viewports: Mutex<Vec<Viewport>>,
        layers: Mutex<Vec<(Option<Coordinates>, Vec<String>)>>,
    }

    impl RecordingView {
        fn last_viewport(&self) -> Viewport {
            *self.viewports.lock().unwrap().last().unwrap()
        }

        fn last_layer(&self) -> (Option<Coordinates>, Vec<String>) {
            self.layers.lock().unwrap().last().unwrap().clone()
        }

        fn renders(&self) -> usize {
            self.layers.lock().unwrap().len()
        }
    }

    impl MapView for RecordingView {
        fn set_view(&self, viewport: Viewport) {
            self.viewports.lock().unwrap().push(viewport);
        }

        fn replace_markers(&self, user: Option<Coordinates>, markers: &[Marker]) {
            let ids = markers.iter().map(|m| m.id.clone()).collect();
            self.layers.lock().unwrap().push((user, ids));
        }
    }

    fn point(id: &str, coordinates: Coordinates) -> PointOfInterest {
        PointOfInterest {
            id: id.to_string(),
            name: format!("Place {}", id),
            description: String::new(),
            coordinates,
            category: Category::Museum,
            distance: None,
            rating: None,
        }
    }

    fn snapshot(ids: &[&str]) -> CatalogSnapshot {
        CatalogSnapshot {
            revision: 0,
            source: CatalogSource::Seed,
            points: ids.iter().map(|id| point(id, Coordinates::DEFAULT)).collect(),
        }
    }

    struct Harness {
        location: watch::Sender<LocationState>,
        catalog: watch::Sender<CatalogSnapshot>,
        focus: watch::Sender<Option<Coordinates>>,
        view: Arc<RecordingView>,
        sync: MapViewSync,
    }

    fn harness() -> Harness {
        let (location, location_rx) = watch::channel(LocationState::default());
        let (catalog, catalog_rx) = watch::channel(snapshot(&["1", "2"]));
        let (focus, focus_rx) = watch::channel(None);
        let view = Arc::new(RecordingView::default());
        let sync = MapViewSync::new(
            view.clone(),
            &ContextReader::new(location_rx, catalog_rx),
            focus_rx,
            MapConfig::default(),
            Coordinates::new(1.0, 2.0),
        );
        Harness {
            location,
            catalog,
            focus,
            view,
            sync,
        }
    }

    #[test]
    fn test_center_precedence() {
        let h = harness();
        assert_eq!(
            h.sync.viewport(),
            Viewport {
                center: Coordinates::new(1.0, 2.0),
                zoom: 11
            }
        );

        let here = Coordinates::new(48.8566, 2.3522);
        h.location
            .send_replace(LocationState::settled(LocationStatus::Detected, here));
        assert_eq!(h.sync.viewport().center, here);
        assert_eq!(h.sync.viewport().zoom, 11);

        let target = Coordinates::new(48.8606, 2.3376);
        h.focus.send_replace(Some(target));
        assert_eq!(
            h.sync.viewport(),
            Viewport {
                center: target,
                zoom: 16
            }
        );

        h.focus.send_replace(None);
        assert_eq!(h.sync.viewport().center, here);
    }

    #[test]
    fn test_sync_replaces_all_markers() {
        let h = harness();
        h.sync.sync();
        assert_eq!(h.view.last_layer(), (None, vec!["1".to_string(), "2".to_string()]));

        h.catalog.send_replace(snapshot(&["7"]));
        h.sync.sync();
        assert_eq!(h.view.last_layer().1, vec!["7".to_string()]);
    }

    #[test]
    fn test_user_marker_once_location_known() {
        let h = harness();
        let here = Coordinates::new(35.6762, 139.6503);
        h.location
            .send_replace(LocationState::settled(LocationStatus::Detected, here));
        h.sync.sync();
        assert_eq!(h.view.last_layer().0, Some(here));
    }

    #[test]
    fn test_marker_carries_category_color() {
        let mut poi = point("3", Coordinates::DEFAULT);
        poi.category = Category::Local;
        let marker = Marker::from(&poi);
        assert_eq!(marker.color, "#f59e0b");
        assert_eq!(marker.name, "Place 3");
    }

    #[tokio::test]
    async fn test_run_follows_changes_and_stops() {
        let h = harness();
        let view = h.view.clone();
        let task = tokio::spawn(h.sync.run());

        tokio::task::yield_now().await;
        let target = Coordinates::new(10.0, 20.0);
        h.focus.send_replace(Some(target));
        h.catalog.send_replace(snapshot(&["9"]));

        drop(h.location);
        drop(h.catalog);
        drop(h.focus);
        task.await.unwrap();

        assert!(view.renders() >= 2);
        assert_eq!(view.last_viewport().center, target);
        assert_eq!(view.last_layer().1, vec!["9".to_string()]);
    }
}
