//! Provider implementation for the collection point REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use coleta_core::{
    backend::Backend,
    model::{
        Category, CategoryId, CollectionPoint, Coordinate, ItemLabel, PointDetail, PointId,
        PointProfile,
    },
    ports::{CatalogPort, PointQuery, PointsPort, PortError},
};

/// Base URL of a locally running API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Entry from GET /items
#[derive(Debug, Deserialize)]
struct ItemEntry {
    id: i64,
    title: String,
    #[serde(rename = "imageUrl", alias = "image_url", default)]
    image_url: String,
}

/// Coordinate as sent by the API; some deployments store it as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    fn value(&self, field: &str) -> Result<f64, PortError> {
        match self {
            WireNumber::Number(value) => Ok(*value),
            WireNumber::Text(text) => text
                .trim()
                .parse()
                .map_err(|_err| PortError::Decode(format!("{field} is not a number: {text:?}"))),
        }
    }
}

/// Entry from GET /points
#[derive(Debug, Deserialize)]
struct PointEntry {
    id: i64,
    name: String,
    #[serde(rename = "imageUrl", alias = "image_url", default)]
    image_url: String,
    latitude: WireNumber,
    longitude: WireNumber,
}

/// Title-only item inside GET /points/:id
#[derive(Debug, Deserialize)]
struct ItemTitle {
    title: String,
}

/// `point` object of GET /points/:id
#[derive(Debug, Deserialize)]
struct PointRecord {
    id: i64,
    name: String,
    #[serde(rename = "imageUrl", alias = "image_url", default)]
    image_url: String,
    latitude: WireNumber,
    longitude: WireNumber,
    #[serde(default)]
    whatsapp: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    city: String,
    #[serde(alias = "uf", default)]
    state: String,
    #[serde(default)]
    items: Vec<ItemTitle>,
}

/// Response of GET /points/:id
#[derive(Debug, Deserialize)]
struct PointResponse {
    point: PointRecord,
    #[serde(default)]
    items: Vec<ItemTitle>,
}

impl From<ItemEntry> for Category {
    fn from(entry: ItemEntry) -> Self {
        Category {
            id: CategoryId(entry.id),
            title: entry.title,
            image_url: entry.image_url,
        }
    }
}

impl From<ItemTitle> for ItemLabel {
    fn from(item: ItemTitle) -> Self {
        ItemLabel { title: item.title }
    }
}

impl PointEntry {
    fn into_point(self) -> Result<CollectionPoint, PortError> {
        Ok(CollectionPoint {
            id: PointId(self.id),
            name: self.name,
            image_url: self.image_url,
            position: Coordinate::new(
                self.latitude.value("latitude")?,
                self.longitude.value("longitude")?,
            ),
        })
    }
}

impl PointResponse {
    fn into_detail(self) -> Result<PointDetail, PortError> {
        let record = self.point;
        let position = Coordinate::new(
            record.latitude.value("latitude")?,
            record.longitude.value("longitude")?,
        );
        Ok(PointDetail {
            point: PointProfile {
                id: PointId(record.id),
                name: record.name,
                image_url: record.image_url,
                position,
                whatsapp: record.whatsapp,
                email: record.email,
                city: record.city,
                state: record.state,
                items: record.items.into_iter().map(ItemLabel::from).collect(),
            },
            items: self.items.into_iter().map(ItemLabel::from).collect(),
        })
    }
}

/// Category catalog backed by GET /items.
pub struct HttpCatalogPort {
    client: Client,
    base_url: String,
}

impl HttpCatalogPort {
    /// Create a new catalog port bound to the given HTTP client and API base URL.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl CatalogPort for HttpCatalogPort {
    async fn categories(&self) -> Result<Vec<Category>, PortError> {
        let req = self.client.get(format!("{}/items", self.base_url));
        let entries = fetch_json::<Vec<ItemEntry>>(req).await?;
        Ok(entries.into_iter().map(Category::from).collect())
    }
}

/// Point lookups backed by GET /points and GET /points/:id.
pub struct HttpPointsPort {
    client: Client,
    base_url: String,
}

impl HttpPointsPort {
    /// Create a new points port bound to the given HTTP client and API base URL.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl PointsPort for HttpPointsPort {
    async fn points(&self, query: &PointQuery) -> Result<Vec<CollectionPoint>, PortError> {
        let pairs = query.query_pairs();
        debug!(?pairs, "GET /points");
        let req = self
            .client
            .get(format!("{}/points", self.base_url))
            .query(&pairs);

        fetch_json::<Vec<PointEntry>>(req)
            .await?
            .into_iter()
            .map(PointEntry::into_point)
            .collect()
    }

    async fn point(&self, id: PointId) -> Result<PointDetail, PortError> {
        let resp = self
            .client
            .get(format!("{}/points/{id}", self.base_url))
            .send()
            .await
            .map_err(PortError::from)?;

        if let Some(err) = point_status_error(resp.status()) {
            return Err(err);
        }

        resp.error_for_status()
            .map_err(PortError::from)?
            .json::<PointResponse>()
            .await
            .map_err(PortError::from)?
            .into_detail()
    }
}

/// Build the backend bundle for the HTTP API.
#[must_use]
pub fn backend(client: Client, base_url: &str) -> Backend {
    let catalog = Arc::new(HttpCatalogPort::new(client.clone(), base_url));
    let points = Arc::new(HttpPointsPort::new(client, base_url));

    Backend::new(normalize_base_url(base_url), catalog, points)
}

/// Error implied by the status of GET /points/:id, before the body is read.
///
/// The API answers an unknown id with 400 "Point not found." rather than 404.
/// Other failure statuses are left to `error_for_status`.
fn point_status_error(status: StatusCode) -> Option<PortError> {
    match status {
        StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Some(PortError::NotFound),
        _ => None,
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_owned()
    } else {
        trimmed.to_owned()
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
