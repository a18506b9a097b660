//! # Entity Mapping
//!
//! Converts decoded JSON payloads into typed records carrying an `exists`
//! flag. Pure transformation: the mapper never inspects field names. What a
//! payload must look like is decided entirely by the record type's
//! `Deserialize` implementation, the caller-supplied capability for building
//! models out of flat key/value data.
//!
//! Relationships between entities are not populated here.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::connection::RemoteConnection;
use crate::query::Query;

/// Result type for entity mapping
pub type EntityResult<T> = Result<T, EntityError>;

/// Entity mapping errors
#[derive(Debug, Error)]
pub enum EntityError {
    /// The payload did not map into the record type
    #[error("Payload did not map into the record type: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A typed record plus the flag telling whether it reflects persisted remote
/// state (`true`) or a freshly constructed, unsaved entity (`false`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity<T> {
    pub record: T,
    pub exists: bool,
}

impl<T> Entity<T> {
    /// Wrap an already-constructed record as a new, unsaved entity
    pub fn new(record: T) -> Self {
        Self {
            record,
            exists: false,
        }
    }

    /// Unwrap into the bare record
    pub fn into_record(self) -> T {
        self.record
    }
}

impl<T> Deref for Entity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T> DerefMut for Entity<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.record
    }
}

/// Map one decoded JSON payload into a typed record
pub fn to_entity<T: DeserializeOwned>(payload: Value, exists: bool) -> EntityResult<Entity<T>> {
    let record = serde_json::from_value(payload)?;
    Ok(Entity { record, exists })
}

/// Map a decoded JSON payload into an ordered, fully materialized list of
/// records. A non-array payload is treated as a single-element collection.
pub fn to_collection<T: DeserializeOwned>(
    payload: Value,
    exists: bool,
) -> EntityResult<Vec<Entity<T>>> {
    let elements = match payload {
        Value::Array(elements) => elements,
        other => vec![other],
    };
    elements
        .into_iter()
        .map(|element| to_entity(element, exists))
        .collect()
}

/// A record type bound to one remote entity collection.
///
/// This is the whole model-side contract: a model declares which collection
/// it lives in, and the finite query vocabulary hangs off the builder it
/// opens. There is no dynamic dispatch surface to deny-list.
pub trait RemoteModel: DeserializeOwned {
    /// Entity collection name on the remote API
    const ENTITY: &'static str;

    /// Open a query builder for this model's collection
    fn query(connection: Arc<RemoteConnection>) -> Query<Self>
    where
        Self: Sized,
    {
        Query::new(connection, Self::ENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
    struct Widget {
        id: u64,
        name: String,
    }

    #[test]
    fn test_to_entity_marks_persisted_records() {
        let entity: Entity<Widget> = to_entity(json!({"id": 1, "name": "gear"}), true).unwrap();
        assert!(entity.exists);
        assert_eq!(entity.record, Widget { id: 1, name: "gear".to_string() });
    }

    #[test]
    fn test_to_entity_keeps_the_given_flag() {
        let entity: Entity<Widget> = to_entity(json!({"id": 1, "name": "gear"}), false).unwrap();
        assert!(!entity.exists);
    }

    #[test]
    fn test_to_entity_rejects_unmappable_payloads() {
        let result: EntityResult<Entity<Widget>> = to_entity(json!([1, 2, 3]), true);
        assert!(matches!(result, Err(EntityError::Decode(_))));
    }

    #[test]
    fn test_to_collection_wraps_a_single_object() {
        let entities: Vec<Entity<Widget>> =
            to_collection(json!({"id": 1, "name": "gear"}), true).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, 1);
    }

    #[test]
    fn test_to_collection_round_trips_order_and_count() {
        let widgets = vec![
            Widget { id: 3, name: "rotor".to_string() },
            Widget { id: 1, name: "gear".to_string() },
            Widget { id: 2, name: "cam".to_string() },
        ];
        let payload = serde_json::to_value(&widgets).unwrap();

        let entities: Vec<Entity<Widget>> = to_collection(payload, true).unwrap();
        assert_eq!(entities.len(), widgets.len());
        let mapped: Vec<Widget> = entities.into_iter().map(Entity::into_record).collect();
        assert_eq!(mapped, widgets);
    }

    #[test]
    fn test_entity_derefs_to_the_record() {
        let mut entity = Entity::new(Widget { id: 1, name: "gear".to_string() });
        assert!(!entity.exists);
        assert_eq!(entity.name, "gear");
        entity.name = "cam".to_string();
        assert_eq!(entity.record.name, "cam");
    }
}
