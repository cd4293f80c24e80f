//! Catalog service: validation and composition over a storage backend.
//!
//! The service owns add-path validation (non-empty title, rating in
//! range) so invalid data never reaches the store, and seeds the
//! selection workflow for the delete/update/search paths.

use thiserror::Error;

use crate::selection::SelectionFlow;
use crate::storage::{Catalog, MovieStorage, StorageError};

/// Errors for catalog service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Thin composition layer over a [`MovieStorage`] backend.
pub struct CatalogService {
    storage: Box<dyn MovieStorage>,
}

impl CatalogService {
    pub fn new(storage: Box<dyn MovieStorage>) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Result<Catalog, ServiceError> {
        Ok(self.storage.list()?)
    }

    /// Exact, case-sensitive existence check.
    pub fn exists(&self, title: &str) -> Result<bool, ServiceError> {
        Ok(self.storage.exists(title)?)
    }

    /// Validate and insert a new movie. Validation happens before any
    /// write; the duplicate check is part of the storage protocol.
    pub fn add(
        &self,
        title: &str,
        year: i32,
        rating: f64,
        poster: &str,
        imdb_id: &str,
    ) -> Result<(), ServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::Validation("title cannot be empty".to_string()));
        }
        validate_rating(rating)?;
        Ok(self.storage.add(title, year, rating, poster, imdb_id)?)
    }

    pub fn delete(&self, title: &str) -> Result<(), ServiceError> {
        Ok(self.storage.delete(title)?)
    }

    pub fn update(&self, title: &str, rating: f64, notes: &str) -> Result<(), ServiceError> {
        validate_rating(rating)?;
        Ok(self.storage.update(title, rating, notes)?)
    }

    /// Start a fuzzy selection over the current catalog titles.
    pub fn start_selection(&self) -> Result<SelectionFlow, ServiceError> {
        let titles = self.storage.list()?.keys().cloned().collect();
        Ok(SelectionFlow::new(titles))
    }
}

/// Ratings live in the inclusive range [0, 10].
pub fn validate_rating(rating: f64) -> Result<(), ServiceError> {
    if !(0.0..=10.0).contains(&rating) {
        return Err(ServiceError::Validation(format!(
            "rating must be between 0 and 10, got {rating}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionStep;
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    fn service_in(dir: &TempDir) -> CatalogService {
        let storage = JsonStorage::open(dir.path().join("movies.json")).unwrap();
        CatalogService::new(Box::new(storage))
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        let result = service.add("   ", 2024, 9.5, "p", "tt1");
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_out_of_range_rating() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        assert!(matches!(
            service.add("Anora", 2024, 10.5, "p", "tt1"),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service.add("Anora", 2024, -0.1, "p", "tt1"),
            Err(ServiceError::Validation(_))
        ));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(10.0).is_ok());
    }

    #[test]
    fn test_add_trims_title() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        service.add("  Anora  ", 2024, 9.5, "p", "tt1").unwrap();
        assert!(service.exists("Anora").unwrap());
    }

    #[test]
    fn test_update_validates_rating_before_write() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 9.5, "p", "tt1").unwrap();

        let result = service.update("Anora", 11.0, "notes");
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(service.list().unwrap()["Anora"].rating, 9.5);
    }

    #[test]
    fn test_conflict_propagates_from_storage() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 9.5, "p", "tt1").unwrap();

        let result = service.add("Anora", 2024, 9.5, "p", "tt1");
        assert!(matches!(
            result,
            Err(ServiceError::Storage(StorageError::AlreadyExists(_)))
        ));
    }

    #[test]
    fn test_selection_runs_against_current_titles() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 9.5, "p", "tt1").unwrap();
        service
            .add("The Godfather", 1972, 9.2, "p", "tt0068646")
            .unwrap();

        let mut flow = service.start_selection().unwrap();
        match flow.submit("anora") {
            SelectionStep::Menu(matches) => assert_eq!(matches[0].title, "Anora"),
            other => panic!("expected menu, got {:?}", other),
        }
        assert_eq!(flow.submit("1"), SelectionStep::Resolved("Anora".to_string()));

        service.delete("Anora").unwrap();
        let catalog = service.list().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains_key("The Godfather"));
    }
}
