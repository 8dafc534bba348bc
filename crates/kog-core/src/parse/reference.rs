use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::ref_name;
use crate::error::GenerateError;

/// A component `$ref` or an inline definition.
///
/// Schemas keep their own [`SchemaOrRef`](super::schema::SchemaOrRef); the
/// model builder resolves those lazily. Everything else is chased up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Referenced<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Inline(T),
}

impl<T: Clone> Referenced<T> {
    /// Follow `$ref`s through one component table to an inline definition.
    ///
    /// Components may alias one another. A chain longer than the table is a cycle.
    pub fn resolve(&self, components: &IndexMap<String, Referenced<T>>) -> Result<T, GenerateError> {
        let mut current = self;
        for _ in 0..=components.len() {
            match current {
                Referenced::Inline(item) => return Ok(item.clone()),
                Referenced::Ref { ref_path } => {
                    current = components
                        .get(ref_name(ref_path))
                        .ok_or_else(|| GenerateError::UnresolvedReference(ref_path.clone()))?;
                }
            }
        }
        let start = match self {
            Referenced::Ref { ref_path } => ref_path.clone(),
            Referenced::Inline(_) => String::new(),
        };
        Err(GenerateError::UnresolvedReference(start))
    }
}
