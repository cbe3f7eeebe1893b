//! Places-search collaborator and its HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use culture_core::config::PlacesConfig;
use culture_core::{Category, Coordinates, PointOfInterest};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::SearchError;

/// Provider ids arrive as either JSON strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

/// One record as returned by the places provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    #[serde(
        default,
        deserialize_with = "id_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cid: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl PlaceRecord {
    /// Provider id, or a composite of coordinates and title.
    pub fn point_id(&self) -> String {
        match self.cid.as_deref().map(str::trim) {
            Some(cid) if !cid.is_empty() => cid.to_string(),
            _ => format!("{},{}:{}", self.latitude, self.longitude, self.title),
        }
    }

    /// Map into a point, measuring distance from `origin` when known.
    ///
    /// Returns `None` for records with out-of-range coordinates.
    pub fn into_point(self, origin: Option<Coordinates>) -> Option<PointOfInterest> {
        let coordinates = match Coordinates::try_new(self.latitude, self.longitude) {
            Ok(c) => c,
            Err(e) => {
                warn!(title = %self.title, "Skipping place record: {}", e);
                return None;
            }
        };
        let id = self.point_id();
        let category = self
            .category
            .as_deref()
            .map(Category::from_provider_label)
            .unwrap_or(Category::Local);
        let description = self
            .address
            .filter(|a| !a.trim().is_empty())
            .or(self.category)
            .unwrap_or_default();
        let distance = origin.map(|o| format!("{:.1} km", o.distance_km(&coordinates)));

        Some(PointOfInterest {
            id,
            name: self.title,
            description,
            coordinates,
            category,
            distance,
            rating: PointOfInterest::clamp_rating(self.rating),
        })
    }
}

/// Response envelope: `{"places": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<PlaceRecord>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Remote places lookup.
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Result<PlacesResponse, SearchError>;
}

/// HTTP GET client for a places endpoint taking `q` and `apiKey` parameters.
pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Build from configuration, resolving the key from the environment.
    pub fn from_config(config: &PlacesConfig) -> Result<Self, SearchError> {
        Self::new(
            config.base_url.clone(),
            config.credential(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Search text with the category appended as a hint.
pub fn query_with_hint(query: &str, category: Option<Category>) -> String {
    match category {
        Some(c) => format!("{} {}", query.trim(), c.as_str()),
        None => query.trim().to_string(),
    }
}

#[async_trait]
impl PlacesSearch for PlacesClient {
    async fn search(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Result<PlacesResponse, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingCredential)?;
        let q = query_with_hint(query, category);
        debug!(query = %q, "Searching places");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", q.as_str()), ("apiKey", api_key)])
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        "Unknown error".to_string()
                    } else {
                        body
                    }
                });
            return Err(SearchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        serde_json::from_str::<PlacesResponse>(&body)
            .map_err(|e| SearchError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cid: Option<&str>, title: &str) -> PlaceRecord {
        PlaceRecord {
            cid: cid.map(String::from),
            title: title.to_string(),
            address: Some("1 Main St".to_string()),
            category: Some("Art museum".to_string()),
            latitude: 40.7794,
            longitude: -73.9632,
            rating: Some(4.7),
        }
    }

    #[test]
    fn test_point_id_prefers_cid() {
        assert_eq!(record(Some("12345"), "Met").point_id(), "12345");
        assert_eq!(
            record(None, "Met").point_id(),
            "40.7794,-73.9632:Met"
        );
        assert_eq!(
            record(Some("  "), "Met").point_id(),
            "40.7794,-73.9632:Met"
        );
    }

    #[test]
    fn test_into_point_maps_fields() {
        let poi = record(Some("1"), "The Met")
            .into_point(Some(Coordinates::DEFAULT))
            .unwrap();
        assert_eq!(poi.name, "The Met");
        assert_eq!(poi.description, "1 Main St");
        assert_eq!(poi.category, Category::Museum);
        assert_eq!(poi.rating, Some(4.7));
        let distance = poi.distance.unwrap();
        assert!(distance.ends_with(" km"));
        assert!(distance.starts_with("8."), "got {}", distance);
    }

    #[test]
    fn test_into_point_description_falls_back_to_category() {
        let mut r = record(None, "Corner Cafe");
        r.address = None;
        r.category = Some("Coffee shop".to_string());
        let poi = r.into_point(None).unwrap();
        assert_eq!(poi.description, "Coffee shop");
        assert_eq!(poi.category, Category::Local);
        assert!(poi.distance.is_none());
    }

    #[test]
    fn test_into_point_rejects_bad_coordinates() {
        let mut r = record(None, "Nowhere");
        r.latitude = 123.0;
        assert!(r.into_point(None).is_none());
    }

    #[test]
    fn test_into_point_clamps_rating() {
        let mut r = record(None, "Overrated");
        r.rating = Some(9.0);
        assert_eq!(r.into_point(None).unwrap().rating, Some(5.0));
    }

    #[test]
    fn test_query_with_hint() {
        assert_eq!(query_with_hint(" jazz ", None), "jazz");
        assert_eq!(
            query_with_hint("jazz", Some(Category::Performance)),
            "jazz performance"
        );
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"places":[{"title":"A","latitude":1.0,"longitude":2.0},
            {"cid":"9","title":"B","latitude":3.0,"longitude":4.0,"rating":4.1,"category":"Museum"}]}"#;
        let parsed: PlacesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.places.len(), 2);
        assert!(parsed.places[0].cid.is_none());
        assert_eq!(parsed.places[1].cid.as_deref(), Some("9"));
    }

    #[test]
    fn test_numeric_cid_is_stringified() {
        let json = r#"{"places":[{"cid":12345678901234,"title":"Louvre","latitude":48.86,"longitude":2.33},
            {"cid":null,"title":"Orsay","latitude":48.86,"longitude":2.32}]}"#;
        let parsed: PlacesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.places[0].cid.as_deref(), Some("12345678901234"));
        assert_eq!(parsed.places[0].point_id(), "12345678901234");
        assert!(parsed.places[1].cid.is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let client = PlacesClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        assert!(!client.has_credential());
        let err = client.search("museum", None).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingCredential));
    }
}
