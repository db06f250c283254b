use std::sync::{Arc, RwLock};

use thiserror::Error;

use stockdesk_core::{DomainError, Entity};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("record already exists: {0}")]
    Duplicate(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => DomainError::not_found(),
            RepositoryError::Duplicate(id) => DomainError::conflict(format!("duplicate id {id}")),
            RepositoryError::Poisoned => DomainError::invariant("store lock poisoned"),
        }
    }
}

/// Ordered entity store backing one screen.
///
/// Store order is the order rows appear in before any sort is applied, so
/// `insert` appends and `prepend` puts a record in front.
pub trait Repository<T: Entity>: Send + Sync {
    fn list(&self) -> Vec<T>;
    fn get(&self, id: &T::Id) -> Option<T>;
    fn insert(&self, record: T) -> Result<(), RepositoryError>;
    fn prepend(&self, record: T) -> Result<(), RepositoryError>;
    /// Replace the stored record that has the same id.
    fn update(&self, record: T) -> Result<(), RepositoryError>;
    fn remove(&self, id: &T::Id) -> Result<T, RepositoryError>;
    /// Remove every listed id that exists; returns the removed records in store order.
    fn remove_many(&self, ids: &[T::Id]) -> Result<Vec<T>, RepositoryError>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, R> Repository<T> for Arc<R>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    fn list(&self) -> Vec<T> {
        (**self).list()
    }

    fn get(&self, id: &T::Id) -> Option<T> {
        (**self).get(id)
    }

    fn insert(&self, record: T) -> Result<(), RepositoryError> {
        (**self).insert(record)
    }

    fn prepend(&self, record: T) -> Result<(), RepositoryError> {
        (**self).prepend(record)
    }

    fn update(&self, record: T) -> Result<(), RepositoryError> {
        (**self).update(record)
    }

    fn remove(&self, id: &T::Id) -> Result<T, RepositoryError> {
        (**self).remove(id)
    }

    fn remove_many(&self, ids: &[T::Id]) -> Result<Vec<T>, RepositoryError> {
        (**self).remove_many(ids)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// In-memory ordered store for tests/dev and snapshot-backed runs.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    inner: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    /// Seed from existing records; later duplicates of an id are dropped.
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let mut seeded: Vec<T> = Vec::new();
        for record in records {
            if seeded.iter().any(|r| r.id() == record.id()) {
                tracing::warn!(id = ?record.id(), "dropping duplicate record while seeding");
                continue;
            }
            seeded.push(record);
        }
        Self {
            inner: RwLock::new(seeded),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Entity + Clone + Send + Sync + 'static,
{
    fn list(&self) -> Vec<T> {
        match self.inner.read() {
            Ok(records) => records.clone(),
            Err(_) => vec![],
        }
    }

    fn get(&self, id: &T::Id) -> Option<T> {
        let records = self.inner.read().ok()?;
        records.iter().find(|r| r.id() == id).cloned()
    }

    fn insert(&self, record: T) -> Result<(), RepositoryError> {
        let mut records = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(RepositoryError::Duplicate(format!("{:?}", record.id())));
        }
        records.push(record);
        Ok(())
    }

    fn prepend(&self, record: T) -> Result<(), RepositoryError> {
        let mut records = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(RepositoryError::Duplicate(format!("{:?}", record.id())));
        }
        records.insert(0, record);
        Ok(())
    }

    fn update(&self, record: T) -> Result<(), RepositoryError> {
        let mut records = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| RepositoryError::NotFound(format!("{:?}", record.id())))?;
        *slot = record;
        Ok(())
    }

    fn remove(&self, id: &T::Id) -> Result<T, RepositoryError> {
        let mut records = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("{id:?}")))?;
        Ok(records.remove(index))
    }

    fn remove_many(&self, ids: &[T::Id]) -> Result<Vec<T>, RepositoryError> {
        let mut records = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        let (removed, kept): (Vec<T>, Vec<T>) =
            records.drain(..).partition(|r| ids.contains(r.id()));
        *records = kept;
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.inner.read().map(|r| r.len()).unwrap_or(0)
    }
}
