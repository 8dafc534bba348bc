use indexmap::IndexMap;

use crate::config::NamingStrategy;
use crate::error::GenerateError;
use crate::ir::{
    Bodies, Body, Input, InputLocation, Model, Multipart, NamingContext, Returns, Route,
};
use crate::parse::document::OperationEntry;
use crate::parse::media_type::{ContentKind, MediaType};
use crate::parse::parameter::{Parameter, ParameterLocation};
use crate::parse::request_body::RequestBody;
use crate::parse::response::Response;
use crate::parse::schema::SchemaOrRef;

use super::model_builder::ModelBuilder;
use super::name_normalizer::{normalize_name, pascal, route_to_name};
use super::spec_to_ir::TransformOptions;

/// Turns flattened operations into [`Route`]s.
pub struct RouteBuilder<'a> {
    models: &'a ModelBuilder<'a>,
    options: &'a TransformOptions,
}

/// Collects the inline models a route declares.
struct Nested<'e> {
    entry: &'e OperationEntry,
    models: Vec<Model>,
}

impl<'e> Nested<'e> {
    /// The operationId, required as soon as an inline model has to be named.
    fn operation_id(&self, what: &str) -> Result<&'e str, GenerateError> {
        self.entry
            .operation_id
            .as_deref()
            .ok_or_else(|| GenerateError::MissingOperationId {
                method: self.entry.method.as_str().to_string(),
                path: self.entry.path.clone(),
                what: what.to_string(),
            })
    }

    fn push(&mut self, model: &Model) {
        match model {
            Model::Object(_) | Model::Enum(_) | Model::Union(_) => self.models.push(model.clone()),
            Model::Collection { collection } => self.push(collection.inner()),
            Model::Primitive { .. }
            | Model::FreeFormJson
            | Model::OctetStream
            | Model::Reference { .. } => {}
        }
    }
}

impl<'a> RouteBuilder<'a> {
    pub fn new(models: &'a ModelBuilder<'a>, options: &'a TransformOptions) -> Self {
        RouteBuilder { models, options }
    }

    pub fn build(&self, entry: &OperationEntry) -> Result<Route, GenerateError> {
        let mut nested = Nested {
            entry,
            models: Vec::new(),
        };

        let input = entry
            .parameters
            .iter()
            .map(|p| self.input(p, &mut nested))
            .collect::<Result<Vec<_>, _>>()?;

        let body = match &entry.request_body {
            Some(rb) => self.bodies(rb, &mut nested)?,
            None => Bodies::default(),
        };

        let return_type = self.returns(&entry.responses, &mut nested)?;

        let route = Route {
            operation_id: entry.operation_id.clone(),
            function_name: self.function_name(entry),
            summary: entry.summary.clone(),
            path: entry.path.clone(),
            method: entry.method,
            body,
            input,
            return_type,
            nested: nested.models,
        };
        log::debug!(
            "built route {} {} as `{}`",
            entry.method.as_str(),
            entry.path,
            route.function_name
        );
        Ok((self.options.interceptor.route)(route))
    }

    fn function_name(&self, entry: &OperationEntry) -> String {
        let raw = match (self.options.naming_strategy, &entry.operation_id) {
            (NamingStrategy::UseOperationId, Some(id)) => id.clone(),
            _ => route_to_name(entry.method.as_str(), &entry.path),
        };
        let name = self.options.aliases.get(&raw).cloned().unwrap_or(raw);
        normalize_name(&name).camel_case
    }

    /// Resolve a schema that may need a route-derived name.
    fn resolve_named(
        &self,
        schema: &SchemaOrRef,
        nested: &mut Nested<'_>,
        what: &str,
        context: impl FnOnce(&str) -> NamingContext,
    ) -> Result<Model, GenerateError> {
        let model = match schema {
            SchemaOrRef::Ref { .. } => self.models.resolve(schema, &NamingContext::named(what))?,
            SchemaOrRef::Schema(_) => {
                let placeholder = NamingContext::named(what);
                let provisional = self.models.resolve(schema, &placeholder)?;
                if !needs_name(&provisional) {
                    provisional
                } else {
                    let id = nested.operation_id(what)?;
                    self.models.resolve(schema, &context(id))?
                }
            }
        };
        nested.push(&model);
        Ok(model)
    }

    fn input(&self, parameter: &Parameter, nested: &mut Nested<'_>) -> Result<Input, GenerateError> {
        let model = match &parameter.schema {
            Some(schema) => {
                let name = parameter.name.as_str();
                self.resolve_named(schema, nested, &format!("parameter `{name}`"), |id| {
                    NamingContext::route_param(name, id, pascal(name))
                })?
            }
            None => Model::primitive(crate::ir::Primitive::String),
        };
        let location = match parameter.location {
            ParameterLocation::Path => InputLocation::Path,
            ParameterLocation::Query => InputLocation::Query,
            ParameterLocation::Header => InputLocation::Header,
            ParameterLocation::Cookie => InputLocation::Cookie,
        };
        Ok(Input {
            name: parameter.name.clone(),
            location,
            model,
            is_required: parameter.required || location == InputLocation::Path,
            description: parameter.description.clone(),
        })
    }

    fn bodies(&self, rb: &RequestBody, nested: &mut Nested<'_>) -> Result<Bodies, GenerateError> {
        let mut types = IndexMap::new();
        for (content_type, media) in &rb.content {
            let body = match ContentKind::of(content_type) {
                ContentKind::Json => Body::Json(self.json_body(media, nested)?),
                ContentKind::Multipart => Body::Multipart(self.multipart(media, nested)?),
                ContentKind::OctetStream => Body::OctetStream,
                ContentKind::Xml => Body::Xml,
                ContentKind::Other => {
                    return Err(GenerateError::unsupported(
                        describe(nested.entry),
                        format!("request body of type {content_type}"),
                    ));
                }
            };
            types.insert(content_type.clone(), body);
        }
        Ok(Bodies {
            required: rb.required,
            types,
        })
    }

    fn json_body(&self, media: &MediaType, nested: &mut Nested<'_>) -> Result<Model, GenerateError> {
        match &media.schema {
            Some(schema) => self.resolve_named(schema, nested, "request body", |id| {
                NamingContext::route_body(id, "Request")
            }),
            None => Ok(Model::FreeFormJson),
        }
    }

    fn multipart(&self, media: &MediaType, nested: &mut Nested<'_>) -> Result<Multipart, GenerateError> {
        let context = describe(nested.entry);
        let schema = media
            .schema
            .as_ref()
            .ok_or_else(|| GenerateError::unsupported(&context, "multipart body without schema"))?;

        match schema {
            SchemaOrRef::Ref { ref_path } => {
                let name = schema.ref_name().unwrap_or(ref_path);
                let target = self
                    .models
                    .component(name)
                    .ok_or_else(|| GenerateError::UnresolvedReference(ref_path.clone()))?;
                match self.models.resolve(target, &NamingContext::named(name))? {
                    Model::Object(object) => Ok(Multipart::ObjectRef {
                        model: Model::reference(NamingContext::named(name)),
                        properties: object.properties,
                    }),
                    _ => Err(GenerateError::unsupported(
                        context,
                        format!("multipart body referencing non-object schema {name}"),
                    )),
                }
            }
            SchemaOrRef::Schema(_) => {
                let id = nested.operation_id("multipart body")?;
                match self.models.resolve(schema, &NamingContext::route_body(id, "Request"))? {
                    Model::Object(object) => {
                        // The form is expanded into parameters; only its children are declared.
                        for child in &object.inline {
                            nested.push(child);
                        }
                        Ok(Multipart::Parameters(object.properties))
                    }
                    _ => Err(GenerateError::unsupported(context, "multipart body that is not an object")),
                }
            }
        }
    }

    fn returns(
        &self,
        responses: &IndexMap<String, Response>,
        nested: &mut Nested<'_>,
    ) -> Result<Returns, GenerateError> {
        let mut types = IndexMap::new();
        for (index, (status, response)) in responses.iter().enumerate() {
            let postfix = if index == 0 {
                "Response".to_string()
            } else {
                format!("Response{}", pascal(status))
            };
            let model = match response.content.len() {
                0 => Model::primitive(crate::ir::Primitive::Unit),
                1 => {
                    let (content_type, media) = response.content.first().ok_or_else(|| {
                        GenerateError::unsupported(describe(nested.entry), "empty response")
                    })?;
                    self.response(content_type, media, &postfix, nested)?
                }
                _ if is_success(status) => {
                    return Err(GenerateError::MultipleResponseFormatsUnsupported {
                        operation: describe(nested.entry),
                        status: status.clone(),
                    });
                }
                _ => {
                    let (content_type, media) = preferred_format(response).ok_or_else(|| {
                        GenerateError::unsupported(describe(nested.entry), "empty response")
                    })?;
                    log::debug!(
                        "{}: status {status} keeps {content_type} out of {} formats",
                        describe(nested.entry),
                        response.content.len()
                    );
                    self.response(content_type, media, &postfix, nested)?
                }
            };
            types.insert(status.clone(), model);
        }
        Ok(Returns { types })
    }

    fn response(
        &self,
        content_type: &str,
        media: &MediaType,
        postfix: &str,
        nested: &mut Nested<'_>,
    ) -> Result<Model, GenerateError> {
        match ContentKind::of(content_type) {
            ContentKind::OctetStream => Ok(Model::OctetStream),
            ContentKind::Xml => Err(GenerateError::unsupported(
                describe(nested.entry),
                format!("response of type {content_type}"),
            )),
            ContentKind::Json | ContentKind::Multipart | ContentKind::Other => match &media.schema {
                Some(schema) => self.resolve_named(schema, nested, "response", |id| {
                    NamingContext::route_body(id, postfix)
                }),
                None => Ok(Model::FreeFormJson),
            },
        }
    }
}

/// Whether resolving produced a model that has to be declared under a name.
fn needs_name(model: &Model) -> bool {
    match model {
        Model::Object(_) | Model::Enum(_) | Model::Union(_) => true,
        Model::Collection { collection } => needs_name(collection.inner()),
        Model::Primitive { .. } | Model::FreeFormJson | Model::OctetStream | Model::Reference { .. } => {
            false
        }
    }
}

/// `200`, `204` and `2XX` are success statuses; `4XX` and `default` are not.
fn is_success(status: &str) -> bool {
    status.starts_with('2')
}

/// The format kept for a non-success status that declares several: JSON first, else the first.
fn preferred_format(response: &Response) -> Option<(&String, &MediaType)> {
    response
        .content
        .iter()
        .find(|(content_type, _)| ContentKind::of(content_type) == ContentKind::Json)
        .or_else(|| response.content.first())
}

fn describe(entry: &OperationEntry) -> String {
    match &entry.operation_id {
        Some(id) => id.clone(),
        None => format!("{} {}", entry.method.as_str(), entry.path),
    }
}
