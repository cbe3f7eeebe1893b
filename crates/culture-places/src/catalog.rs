//! The point-of-interest catalog.
//!
//! Sole writer of the catalog snapshot and the re-center target. Every
//! change is a replace-all: readers never see a partially updated set.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use culture_core::{CatalogSnapshot, CatalogSource, Category, Coordinates, PointOfInterest};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::generator::{nearby_points, seed_points};
use crate::search::PlacesSearch;

pub struct PointOfInterestCatalog {
    snapshot: watch::Sender<CatalogSnapshot>,
    focus: watch::Sender<Option<Coordinates>>,
    last_center: Mutex<Option<Coordinates>>,
    search: Option<Arc<dyn PlacesSearch>>,
}

impl PointOfInterestCatalog {
    /// Create a catalog holding the static seed.
    pub fn new(search: Option<Arc<dyn PlacesSearch>>) -> Self {
        let (snapshot, _) = watch::channel(CatalogSnapshot {
            revision: 0,
            source: CatalogSource::Seed,
            points: seed_points(),
        });
        let (focus, _) = watch::channel(None);
        Self {
            snapshot,
            focus,
            last_center: Mutex::new(None),
            search,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn focus_receiver(&self) -> watch::Receiver<Option<Coordinates>> {
        self.focus.subscribe()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn focus(&self) -> Option<Coordinates> {
        *self.focus.borrow()
    }

    /// Replace the point set with the generated nearby set for `center`.
    ///
    /// Also clears any re-center target so the map follows the new center.
    pub fn refresh(&self, center: Coordinates) -> CatalogSnapshot {
        let points = nearby_points(center);
        *self
            .last_center
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(center);
        self.clear_focus();
        let snapshot = self.replace(CatalogSource::Generated { center }, points);
        info!(
            revision = snapshot.revision,
            count = snapshot.len(),
            center = %center,
            "Catalog refreshed"
        );
        snapshot
    }

    /// Replace the point set with live search results.
    ///
    /// Returns the number of points installed. An empty query is rejected
    /// without touching the catalog; any other failure leaves it empty.
    pub async fn search(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Result<usize, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let source = CatalogSource::Search {
            query: query.to_string(),
            category,
        };

        match self.run_search(query, category).await {
            Ok(points) => {
                let snapshot = self.replace(source, points);
                info!(
                    revision = snapshot.revision,
                    count = snapshot.len(),
                    query,
                    "Catalog replaced from search"
                );
                Ok(snapshot.len())
            }
            Err(e) => {
                if e.clears_catalog() {
                    self.replace(source, Vec::new());
                }
                warn!(query, "Places search failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_search(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Result<Vec<PointOfInterest>, SearchError> {
        let search = self.search.as_ref().ok_or(SearchError::MissingCredential)?;
        let response = search.search(query, category).await?;
        let origin = *self
            .last_center
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut seen = HashSet::new();
        let points: Vec<PointOfInterest> = response
            .places
            .into_iter()
            .filter_map(|record| record.into_point(origin))
            .filter(|p| {
                let fresh = seen.insert(p.id.clone());
                if !fresh {
                    debug!(id = %p.id, "Dropping duplicate place");
                }
                fresh
            })
            .collect();

        if points.is_empty() {
            return Err(SearchError::NoResults(query.to_string()));
        }
        Ok(points)
    }

    /// Point the map at `point`. The point set is unchanged.
    pub fn recenter(&self, point: &PointOfInterest) {
        debug!(id = %point.id, name = %point.name, "Recentering on point");
        self.focus.send_replace(Some(point.coordinates));
    }

    pub fn clear_focus(&self) {
        self.focus.send_if_modified(|focus| focus.take().is_some());
    }

    fn replace(&self, source: CatalogSource, points: Vec<PointOfInterest>) -> CatalogSnapshot {
        self.snapshot.send_modify(|snapshot| {
            snapshot.revision += 1;
            snapshot.source = source;
            snapshot.points = points;
        });
        self.snapshot()
    }
}

/// Parse a category filter where `"all"` (or blank) means no filter.
pub fn parse_category_filter(value: &str) -> Result<Option<Category>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        trimmed.parse::<Category>().map(Some)
    }
}
