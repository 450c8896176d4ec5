//! Load service
//!
//! CRUD over the load board plus the booking audit listing.

use std::{fmt, sync::Arc};

use domain::{BookingRecord, Load, LoadId, LoadUpdate};
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::LoadStore};

/// Service for reading and editing loads
#[derive(Clone)]
pub struct LoadService {
    store: Arc<dyn LoadStore>,
}

impl fmt::Debug for LoadService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadService").finish_non_exhaustive()
    }
}

impl LoadService {
    /// Create a new load service
    #[must_use]
    pub fn new(store: Arc<dyn LoadStore>) -> Self {
        Self { store }
    }

    /// All loads, newest pickup first
    #[instrument(skip(self))]
    pub async fn list_loads(&self) -> Result<Vec<Load>, ApplicationError> {
        let loads = self.store.list_all().await?;
        debug!(count = loads.len(), "Listed loads");
        Ok(loads)
    }

    /// Fetch one load
    ///
    /// # Errors
    /// `NotFound` if no load has this id.
    #[instrument(skip_all, fields(load_id = %load_id))]
    pub async fn get_load(&self, load_id: &LoadId) -> Result<Load, ApplicationError> {
        self.store
            .get(load_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Load {load_id}")))
    }

    /// Validate and insert a new load
    #[instrument(skip_all, fields(load_id = %load.load_id))]
    pub async fn create_load(&self, load: Load) -> Result<Load, ApplicationError> {
        load.validate()?;
        self.store.create(&load).await?;
        info!(origin = %load.origin, destination = %load.destination, "Load created");
        Ok(load)
    }

    /// Apply a partial update
    ///
    /// The merged load must still satisfy the load invariants; an update
    /// without any field is rejected.
    #[instrument(skip_all, fields(load_id = %load_id))]
    pub async fn update_load(
        &self,
        load_id: &LoadId,
        update: LoadUpdate,
    ) -> Result<Load, ApplicationError> {
        if update.is_empty() {
            return Err(ApplicationError::Validation(
                "update must contain at least one field".to_string(),
            ));
        }

        let mut merged = self.get_load(load_id).await?;
        update.apply(&mut merged);
        merged.validate()?;

        let updated = self.store.update(load_id, &update).await?;
        info!(status = %updated.status, "Load updated");
        Ok(updated)
    }

    /// Remove a load
    #[instrument(skip_all, fields(load_id = %load_id))]
    pub async fn delete_load(&self, load_id: &LoadId) -> Result<(), ApplicationError> {
        self.store.delete(load_id).await?;
        info!("Load deleted");
        Ok(())
    }

    /// The booking audit log joined with loads
    #[instrument(skip(self))]
    pub async fn list_bookings(&self) -> Result<Vec<BookingRecord>, ApplicationError> {
        self.store.list_bookings().await
    }

    /// Whether storage answers
    pub async fn is_store_ready(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use domain::LoadStatus;

    use super::*;
    use crate::ports::MockLoadStore;

    fn load_id(s: &str) -> LoadId {
        LoadId::parse(s).unwrap()
    }

    fn sample_load(id: &str) -> Load {
        Load::new(load_id(id), "Dallas, TX", "Houston, TX", 45000.0)
            .with_pickup_datetime("2024-01-15 06:00:00")
    }

    #[tokio::test]
    async fn get_load_missing_is_not_found() {
        let mut mock = MockLoadStore::new();
        mock.expect_get().times(1).returning(|_| Ok(None));

        let service = LoadService::new(Arc::new(mock));
        let result = service.get_load(&load_id("LOAD404")).await;

        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_load_validates_before_store() {
        let mut mock = MockLoadStore::new();
        mock.expect_create().never();

        let service = LoadService::new(Arc::new(mock));
        let mut load = sample_load("LOAD010");
        load.weight = -5.0;

        let result = service.create_load(load).await;
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[tokio::test]
    async fn create_load_propagates_conflict() {
        let mut mock = MockLoadStore::new();
        mock.expect_create()
            .times(1)
            .returning(|l| Err(ApplicationError::Conflict(format!("Load {}", l.load_id))));

        let service = LoadService::new(Arc::new(mock));
        let result = service.create_load(sample_load("LOAD001")).await;

        assert!(matches!(result, Err(ApplicationError::Conflict(_))));
    }

    #[tokio::test]
    async fn empty_update_rejected_without_store_access() {
        let mock = MockLoadStore::new();
        let service = LoadService::new(Arc::new(mock));

        let result = service
            .update_load(&load_id("LOAD001"), LoadUpdate::default())
            .await;

        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }

    #[tokio::test]
    async fn update_rejects_invalid_merged_load() {
        let mut mock = MockLoadStore::new();
        mock.expect_get()
            .times(1)
            .returning(|id| Ok(Some(sample_load(id.as_str()))));
        mock.expect_update().never();

        let service = LoadService::new(Arc::new(mock));
        let update = LoadUpdate {
            origin: Some("   ".to_string()),
            ..LoadUpdate::default()
        };

        let result = service.update_load(&load_id("LOAD003"), update).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_returns_stored_load() {
        let mut mock = MockLoadStore::new();
        mock.expect_get()
            .times(1)
            .returning(|id| Ok(Some(sample_load(id.as_str()))));
        mock.expect_update().times(1).returning(|id, update| {
            let mut load = sample_load(id.as_str());
            update.apply(&mut load);
            Ok(load)
        });

        let service = LoadService::new(Arc::new(mock));
        let update = LoadUpdate {
            status: Some(LoadStatus::Ready),
            ..LoadUpdate::default()
        };

        let updated = service
            .update_load(&load_id("LOAD003"), update)
            .await
            .unwrap();
        assert_eq!(updated.status, LoadStatus::Ready);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let mut mock = MockLoadStore::new();
        mock.expect_delete()
            .times(1)
            .returning(|id| Err(ApplicationError::NotFound(format!("Load {id}"))));

        let service = LoadService::new(Arc::new(mock));
        let result = service.delete_load(&load_id("LOAD404")).await;

        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn store_readiness_follows_ping() {
        let mut mock = MockLoadStore::new();
        mock.expect_ping()
            .times(1)
            .returning(|| Err(ApplicationError::Internal("pool exhausted".into())));

        let service = LoadService::new(Arc::new(mock));
        assert!(!service.is_store_ready().await);
    }
}
