//! Shared location/catalog context.
//!
//! Each field has exactly one writer: the location provider owns the
//! `watch::Sender<LocationState>`, the catalog owns the
//! `watch::Sender<CatalogSnapshot>`. Everyone else holds a [`ContextReader`].

use tokio::sync::watch;

use crate::types::{CatalogSnapshot, ConversationContext, LocationState};

/// Read-only handle on the current location and point set.
#[derive(Clone, Debug)]
pub struct ContextReader {
    location: watch::Receiver<LocationState>,
    catalog: watch::Receiver<CatalogSnapshot>,
}

impl ContextReader {
    pub fn new(
        location: watch::Receiver<LocationState>,
        catalog: watch::Receiver<CatalogSnapshot>,
    ) -> Self {
        Self { location, catalog }
    }

    /// A reader over fixed values with no live writer behind it.
    pub fn detached(location: LocationState, catalog: CatalogSnapshot) -> Self {
        let (_location_tx, location_rx) = watch::channel(location);
        let (_catalog_tx, catalog_rx) = watch::channel(catalog);
        Self::new(location_rx, catalog_rx)
    }

    /// Point-in-time copy for answer generation.
    pub fn snapshot(&self) -> ConversationContext {
        let location = self.location.borrow().clone();
        let points = self.catalog.borrow().points.clone();
        ConversationContext {
            location: location.coordinates,
            points,
            status: location.status,
        }
    }

    pub fn location(&self) -> LocationState {
        self.location.borrow().clone()
    }

    pub fn catalog(&self) -> CatalogSnapshot {
        self.catalog.borrow().clone()
    }

    pub fn location_receiver(&self) -> watch::Receiver<LocationState> {
        self.location.clone()
    }

    pub fn catalog_receiver(&self) -> watch::Receiver<CatalogSnapshot> {
        self.catalog.clone()
    }
}
