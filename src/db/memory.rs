// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store with Firestore-like semantics.
//!
//! Documents are JSON objects grouped by collection. Writes replace or
//! merge whole top-level fields, matching what the Firestore backend does
//! with `update().fields(..)`. Merges need an existing document and creates
//! need a free ID, like the Firestore preconditions.

use crate::error::AppError;
use dashmap::DashMap;
use std::collections::btree_map::Entry;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Collection name -> (document ID -> document).
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned())
    }

    /// Create or overwrite a document.
    pub fn set(&self, collection: &str, id: &str, doc: Value) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    /// Insert a document only if the ID is free.
    pub fn create(&self, collection: &str, id: &str, doc: Value) -> Result<(), AppError> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        match docs.entry(id.to_string()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Document {}/{} already exists",
                collection, id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(())
            }
        }
    }

    /// Overwrite only the given top-level fields of an existing document.
    pub fn merge(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<(), AppError> {
        let missing = || AppError::NotFound(format!("Document {}/{}", collection, id));
        let mut docs = self.collections.get_mut(collection).ok_or_else(missing)?;
        let doc = docs.get_mut(id).ok_or_else(missing)?;

        match doc {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        Ok(())
    }

    /// All documents whose `field` equals `value`, in document-ID order.
    pub fn find_eq(&self, collection: &str, field: &str, value: &Value, limit: usize) -> Vec<Value> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field) == Some(value))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every document in a collection, optionally sorted by a field.
    pub fn list(&self, collection: &str, order_by: Option<(&str, bool)>, limit: Option<usize>) -> Vec<Value> {
        let mut docs: Vec<Value> = self
            .collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();

        if let Some((field, descending)) = order_by {
            docs.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        if let Some(limit) = limit {
            docs.truncate(limit);
        }
        docs
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

/// Order missing < numbers < strings, like a loosely typed index would.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(_)), Some(_)) => Ordering::Less,
        (Some(_), Some(Value::Number(_))) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
