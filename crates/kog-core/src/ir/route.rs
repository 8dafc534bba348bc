use indexmap::IndexMap;
use serde::Serialize;

use super::model::{Model, Property};

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// A fully resolved API operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub operation_id: Option<String>,
    /// camelCase function name: the operationId, a route-derived name, or an alias.
    pub function_name: String,
    pub summary: Option<String>,
    pub path: String,
    pub method: HttpMethod,
    pub body: Bodies,
    pub input: Vec<Input>,
    pub return_type: Returns,
    /// Inline models this route introduced, declared before use.
    pub nested: Vec<Model>,
}

/// Request bodies keyed by content type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bodies {
    pub required: bool,
    pub types: IndexMap<String, Body>,
}

impl Bodies {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Body {
    Json(Model),
    Multipart(Multipart),
    OctetStream,
    /// Parsed but not supported by any lowering.
    Xml,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Multipart {
    /// Inline form fields, expanded into one parameter each.
    Parameters(Vec<Property>),
    /// A component object passed whole; its fields are attached one by one.
    ObjectRef {
        model: Model,
        properties: Vec<Property>,
    },
}

/// A path/query/header/cookie input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Input {
    pub name: String,
    pub location: InputLocation,
    pub model: Model,
    pub is_required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// Response models keyed by status code (`"200"`, `"2XX"`, `"default"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Returns {
    pub types: IndexMap<String, Model>,
}

impl Returns {
    /// The response model when exactly one status is declared.
    pub fn single(&self) -> Option<&Model> {
        match self.types.len() {
            1 => self.types.values().next(),
            _ => None,
        }
    }
}
