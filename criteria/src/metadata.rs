//! Filterable field metadata, computed once per record type and memoized.

use crate::value::TypeTag;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub type_tag: TypeTag,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self { Self { name: name.into(), type_tag } }
}

/// A record type whose fields can be referenced from filter expressions.
/// Usually implemented with `#[derive(Filterable)]`.
pub trait Filterable: 'static {
    fn record_type() -> &'static str;
    fn filterable_fields() -> Vec<FieldInfo>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordMetadata {
    record_type: String,
    fields: BTreeMap<String, FieldInfo>,
}

impl RecordMetadata {
    pub fn of<R: Filterable>() -> Self {
        let fields = R::filterable_fields().into_iter().map(|info| (info.name.clone(), info)).collect();
        Self { record_type: R::record_type().to_string(), fields }
    }

    pub fn record_type(&self) -> &str { &self.record_type }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> { self.fields.get(name) }

    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo> { self.fields.values() }

    /// `{name -> type name}` for discovery responses.
    pub fn describe(&self) -> BTreeMap<String, String> {
        self.fields.values().map(|info| (info.name.clone(), info.type_tag.type_name().to_string())).collect()
    }
}

/// Injectable cache of [`RecordMetadata`] keyed by record type. Safe to share across threads;
/// concurrent first use of a type computes identical metadata and the first insert wins.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: DashMap<TypeId, Arc<RecordMetadata>>,
}

impl MetadataCache {
    pub fn new() -> Self { Self::default() }

    pub fn metadata_for<R: Filterable>(&self) -> Arc<RecordMetadata> {
        let key = TypeId::of::<R>();
        if let Some(existing) = self.entries.get(&key) {
            return existing.value().clone();
        }
        let computed = Arc::new(RecordMetadata::of::<R>());
        debug!("cached {} filterable field(s) for {}", computed.fields.len(), computed.record_type);
        self.entries.entry(key).or_insert(computed).value().clone()
    }

    pub fn describe<R: Filterable>(&self) -> BTreeMap<String, String> { self.metadata_for::<R>().describe() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn clear(&self) { self.entries.clear(); }
}
