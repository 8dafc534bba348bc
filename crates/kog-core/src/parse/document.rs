use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::components::Components;
use super::operation::{Operation, PathItem};
use super::parameter::Parameter;
use super::reference::Referenced;
use super::request_body::RequestBody;
use super::response::Response;
use crate::error::GenerateError;
use crate::ir::HttpMethod;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub version: String,
}

/// Top-level OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub openapi: String,

    pub info: Info,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub components: Components,
}

/// One operation with every component `$ref` around it already chased.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationEntry {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, Response>,
}

impl Document {
    /// Flatten `paths` into operations, in document order.
    ///
    /// Path-level parameters come first; an operation parameter with the same
    /// name and location replaces the path-level one.
    pub fn operations(&self) -> Result<Vec<OperationEntry>, GenerateError> {
        let mut out = Vec::new();
        for (path, item) in &self.paths {
            let shared = self.resolve_parameters(&item.parameters)?;
            for (method, op) in methods(item) {
                out.push(self.entry(path, method, op, &shared)?);
            }
        }
        Ok(out)
    }

    fn entry(
        &self,
        path: &str,
        method: HttpMethod,
        op: &Operation,
        shared: &[Parameter],
    ) -> Result<OperationEntry, GenerateError> {
        let own = self.resolve_parameters(&op.parameters)?;
        let mut parameters: Vec<Parameter> = shared
            .iter()
            .filter(|p| {
                !own.iter()
                    .any(|o| o.name == p.name && o.location == p.location)
            })
            .cloned()
            .collect();
        parameters.extend(own);

        let request_body = op
            .request_body
            .as_ref()
            .map(|b| b.resolve(&self.components.request_bodies))
            .transpose()?;

        let mut responses = IndexMap::new();
        for (status, response) in &op.responses {
            responses.insert(status.clone(), response.resolve(&self.components.responses)?);
        }

        Ok(OperationEntry {
            path: path.to_string(),
            method,
            operation_id: op.operation_id.clone(),
            summary: op.summary.clone(),
            description: op.description.clone(),
            parameters,
            request_body,
            responses,
        })
    }

    fn resolve_parameters(
        &self,
        params: &[Referenced<Parameter>],
    ) -> Result<Vec<Parameter>, GenerateError> {
        params
            .iter()
            .map(|p| p.resolve(&self.components.parameters))
            .collect()
    }
}

fn methods(item: &PathItem) -> Vec<(HttpMethod, &Operation)> {
    [
        (HttpMethod::Get, &item.get),
        (HttpMethod::Post, &item.post),
        (HttpMethod::Put, &item.put),
        (HttpMethod::Delete, &item.delete),
        (HttpMethod::Patch, &item.patch),
        (HttpMethod::Options, &item.options),
        (HttpMethod::Head, &item.head),
        (HttpMethod::Trace, &item.trace),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    .collect()
}
