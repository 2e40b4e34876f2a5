//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::model::{
    Category, CategoryId, CollectionPoint, Coordinate, ItemLabel, PointDetail, PointId,
    PointProfile,
};
use crate::ports::{CatalogPort, LocationPort, Permission, PointQuery, PointsPort, PortError};

pub(crate) fn category(id: i64, title: &str) -> Category {
    Category {
        id: CategoryId(id),
        title: title.to_owned(),
        image_url: format!("http://localhost:3333/uploads/{id}.svg"),
    }
}

pub(crate) fn point(id: i64, name: &str, latitude: f64, longitude: f64) -> CollectionPoint {
    CollectionPoint {
        id: PointId(id),
        name: name.to_owned(),
        image_url: format!("http://localhost:3333/uploads/point-{id}.jpg"),
        position: Coordinate::new(latitude, longitude),
    }
}

pub(crate) fn detail(id: i64, items: &[&str]) -> PointDetail {
    let items = items
        .iter()
        .map(|title| ItemLabel {
            title: (*title).to_owned(),
        })
        .collect::<Vec<_>>();
    PointDetail {
        point: PointProfile {
            id: PointId(id),
            name: "Mercado Central".to_owned(),
            image_url: String::new(),
            position: Coordinate::new(-8.05, -34.9),
            whatsapp: "5581999990000".to_owned(),
            email: "contato@mercado.example".to_owned(),
            city: "Recife".to_owned(),
            state: "PE".to_owned(),
            items: items.clone(),
        },
        items,
    }
}

pub(crate) struct FakeCatalog {
    categories: Vec<Category>,
}

impl FakeCatalog {
    pub(crate) fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CatalogPort for FakeCatalog {
    async fn categories(&self) -> Result<Vec<Category>, PortError> {
        Ok(self.categories.clone())
    }
}

/// Point port whose list responses are released one by one through oneshot gates.
pub(crate) struct GatedPoints {
    gates: Mutex<Vec<(Vec<CategoryId>, oneshot::Receiver<Vec<CollectionPoint>>)>>,
    details: HashMap<PointId, PointDetail>,
}

impl GatedPoints {
    pub(crate) fn new(
        gates: Vec<(Vec<CategoryId>, oneshot::Receiver<Vec<CollectionPoint>>)>,
    ) -> Self {
        Self {
            gates: Mutex::new(gates),
            details: HashMap::new(),
        }
    }

    pub(crate) fn with_detail(mut self, detail: PointDetail) -> Self {
        self.details.insert(detail.point.id, detail);
        self
    }
}

#[async_trait]
impl PointsPort for GatedPoints {
    async fn points(&self, query: &PointQuery) -> Result<Vec<CollectionPoint>, PortError> {
        let gate = {
            let mut gates = self
                .gates
                .lock()
                .map_err(|err| PortError::Internal(err.to_string()))?;
            let position = gates
                .iter()
                .position(|(ids, _)| ids.as_slice() == query.items.ids());
            position.map(|index| gates.swap_remove(index).1)
        };
        match gate {
            Some(receiver) => receiver
                .await
                .map_err(|err| PortError::Internal(err.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn point(&self, id: PointId) -> Result<PointDetail, PortError> {
        self.details.get(&id).cloned().ok_or(PortError::NotFound)
    }
}

pub(crate) struct FakeLocation {
    permission: Permission,
    fix: Option<Coordinate>,
}

impl FakeLocation {
    pub(crate) fn granted(fix: Coordinate) -> Self {
        Self {
            permission: Permission::Granted,
            fix: Some(fix),
        }
    }

    pub(crate) fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            fix: None,
        }
    }

    pub(crate) fn without_fix() -> Self {
        Self {
            permission: Permission::Granted,
            fix: None,
        }
    }
}

#[async_trait]
impl LocationPort for FakeLocation {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn current_position(&self) -> Result<Coordinate, PortError> {
        self.fix
            .ok_or_else(|| PortError::LocationUnavailable("no satellites".to_owned()))
    }
}
