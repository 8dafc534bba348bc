use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::GenerateError;
use crate::ir::{
    Enum, Model, NamingContext, Object, Primitive, Property, TopLevelModel, Union, UnionCase,
};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType};

use super::interceptor::Interceptor;

/// Resolves schema nodes into [`Model`]s against one document's component schemas.
pub struct ModelBuilder<'a> {
    schemas: &'a IndexMap<String, SchemaOrRef>,
    interceptor: &'a Interceptor,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(schemas: &'a IndexMap<String, SchemaOrRef>, interceptor: &'a Interceptor) -> Self {
        ModelBuilder {
            schemas,
            interceptor,
        }
    }

    /// Resolve every component schema, in document order.
    pub fn components(&self) -> Result<Vec<TopLevelModel>, GenerateError> {
        self.schemas
            .iter()
            .map(|(name, schema)| {
                let context = NamingContext::named(name);
                let model = self.resolve(schema, &context)?;
                log::debug!("resolved component {name} as {}", kind(&model));
                Ok(TopLevelModel { context, model })
            })
            .collect()
    }

    /// Look up a component schema by name.
    pub fn component(&self, name: &str) -> Option<&'a SchemaOrRef> {
        self.schemas.get(name)
    }

    pub fn resolve(
        &self,
        schema: &SchemaOrRef,
        context: &NamingContext,
    ) -> Result<Model, GenerateError> {
        match schema {
            SchemaOrRef::Ref { ref_path } => {
                let name = schema.ref_name().unwrap_or(ref_path);
                if !self.schemas.contains_key(name) {
                    return Err(GenerateError::UnresolvedReference(ref_path.clone()));
                }
                Ok(Model::reference(NamingContext::named(name)))
            }
            SchemaOrRef::Schema(s) => {
                let model = self.resolve_schema(s, context)?;
                Ok((self.interceptor.model)(model))
            }
        }
    }

    fn resolve_schema(&self, schema: &Schema, context: &NamingContext) -> Result<Model, GenerateError> {
        if !schema.any_of.is_empty() {
            return self.resolve_union(schema, &schema.any_of, context, false);
        }
        if !schema.one_of.is_empty() {
            return self.resolve_union(schema, &schema.one_of, context, true);
        }
        if !schema.all_of.is_empty() {
            return match schema.all_of.as_slice() {
                [single] => self.resolve(single, context),
                _ => Err(GenerateError::unsupported(context.flatten(), "allOf")),
            };
        }
        if !schema.enum_values.is_empty() {
            return Ok(Model::Enum(Enum::Closed {
                context: context.clone(),
                inner: enum_inner(schema),
                values: enum_values(&schema.enum_values),
                default: schema.default_value.as_ref().and_then(scalar_string),
                description: schema.description.clone(),
            }));
        }
        if !schema.properties.is_empty() {
            return self.resolve_object(schema, context).map(Model::Object);
        }
        self.resolve_type(schema, context)
    }

    fn resolve_type(&self, schema: &Schema, context: &NamingContext) -> Result<Model, GenerateError> {
        let declared = schema
            .schema_type
            .as_ref()
            .map(|t| t.non_null())
            .unwrap_or_default();
        let ty = match declared.as_slice() {
            [] if schema.schema_type.is_some() => return Ok(Model::primitive(Primitive::Unit)),
            [] => None,
            [single] => Some(*single),
            _ => {
                return Err(GenerateError::unsupported(
                    context.flatten(),
                    format!("type {declared:?}"),
                ));
            }
        };

        let model = match ty {
            Some(SchemaType::String) => match schema.format.as_deref() {
                Some("binary") => Model::OctetStream,
                _ => Model::primitive(Primitive::String),
            },
            Some(SchemaType::Integer) => Model::primitive(Primitive::Int),
            Some(SchemaType::Number) => Model::primitive(Primitive::Double),
            Some(SchemaType::Boolean) => Model::primitive(Primitive::Boolean),
            Some(SchemaType::Null) => Model::primitive(Primitive::Unit),
            Some(SchemaType::Array) => self.resolve_array(schema, context)?,
            Some(SchemaType::Object) => self.resolve_map(schema, context)?,
            None if schema.items.is_some() => self.resolve_array(schema, context)?,
            None => self.resolve_map(schema, context)?,
        };
        Ok(model)
    }

    fn resolve_array(&self, schema: &Schema, context: &NamingContext) -> Result<Model, GenerateError> {
        let inner = match &schema.items {
            Some(items) => self.resolve(items, context)?,
            None => Model::FreeFormJson,
        };
        Ok(if schema.unique_items.unwrap_or(false) {
            Model::set(inner)
        } else {
            Model::list(inner)
        })
    }

    /// Objects without properties: a typed map or free-form JSON.
    fn resolve_map(&self, schema: &Schema, context: &NamingContext) -> Result<Model, GenerateError> {
        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(inner)) => Ok(Model::map(self.resolve(inner, context)?)),
            Some(AdditionalProperties::Bool(_)) | None => Ok(Model::FreeFormJson),
        }
    }

    fn resolve_object(&self, schema: &Schema, context: &NamingContext) -> Result<Object, GenerateError> {
        let mut properties = Vec::with_capacity(schema.properties.len());
        let mut inline = Vec::new();

        for (name, property) in &schema.properties {
            let property_context = (self.interceptor.property_context)(context, name);
            let model = self.resolve(property, &property_context)?;
            collect_inline(&model, &mut inline);

            let (description, default) = match property {
                SchemaOrRef::Schema(s) => (s.description.clone(), s.default_value.clone()),
                SchemaOrRef::Ref { .. } => (None, None),
            };
            properties.push(Property {
                base_name: name.clone(),
                model,
                is_required: schema.required.contains(name),
                is_nullable: is_nullable(property),
                description,
                default,
            });
        }

        Ok(Object {
            context: context.clone(),
            description: schema.description.clone(),
            properties,
            inline,
        })
    }

    fn resolve_union(
        &self,
        schema: &Schema,
        cases: &[SchemaOrRef],
        context: &NamingContext,
        is_one_of: bool,
    ) -> Result<Model, GenerateError> {
        let cases: Vec<&SchemaOrRef> = cases.iter().filter(|c| !c.is_null()).collect();

        // A one-entry oneOf is the entry itself, even when it is an enum.
        if let [single] = cases.as_slice()
            && is_one_of
        {
            return self.resolve(single, context);
        }
        if let Some(open) = open_enum(schema, &cases, context) {
            return Ok(open);
        }
        match cases.as_slice() {
            [] => return Ok(Model::FreeFormJson),
            [single] => return self.resolve(single, context),
            _ => {}
        }

        let mut models = Vec::with_capacity(cases.len());
        let mut inline = Vec::new();
        for (index, case) in cases.iter().enumerate() {
            let local = (self.interceptor.union_case_context)(context, case, index);
            let inline_context = NamingContext::nested(local.clone(), context.clone());
            let model = self.resolve(case, &inline_context)?;
            collect_inline(&model, &mut inline);
            models.push((local, model));
        }

        // Declared cases keep their names; structural ones are suffixed until unique.
        let mut seen: HashSet<String> = models
            .iter()
            .filter(|(_, model)| model.is_declared())
            .map(|(local, _)| local.flatten())
            .collect();
        let resolved = models
            .into_iter()
            .map(|(local, model)| {
                let case_context = if model.is_declared() {
                    local
                } else {
                    let base = model.structural_name();
                    let mut name = base.clone();
                    let mut n = 2;
                    while !seen.insert(name.clone()) {
                        name = format!("{base}{n}");
                        n += 1;
                    }
                    NamingContext::named(name)
                };
                UnionCase {
                    context: case_context,
                    model,
                }
            })
            .collect();

        Ok(Model::Union(Union {
            context: context.clone(),
            description: schema.description.clone(),
            cases: resolved,
            discriminator: schema
                .discriminator
                .as_ref()
                .map(|d| d.property_name.clone()),
            inline,
        }))
    }
}

/// A union whose only case, once plain strings are set aside, is an inline
/// string enumeration.
fn open_enum(schema: &Schema, cases: &[&SchemaOrRef], context: &NamingContext) -> Option<Model> {
    let mut enumeration: Option<&Schema> = None;
    for case in cases {
        match case {
            SchemaOrRef::Schema(s) if !s.enum_values.is_empty() => {
                if enumeration.replace(s).is_some() {
                    return None;
                }
            }
            SchemaOrRef::Schema(s) if is_plain_string(s) => {}
            _ => return None,
        }
    }
    let found = enumeration?;
    if enum_inner(found) != Primitive::String {
        return None;
    }
    let default = found
        .default_value
        .as_ref()
        .or(schema.default_value.as_ref())
        .and_then(scalar_string);
    Some(Model::Enum(Enum::Open {
        context: context.clone(),
        values: enum_values(&found.enum_values),
        default,
        description: schema.description.clone().or_else(|| found.description.clone()),
    }))
}

fn is_plain_string(schema: &Schema) -> bool {
    schema.enum_values.is_empty()
        && schema.properties.is_empty()
        && schema.one_of.is_empty()
        && schema.any_of.is_empty()
        && schema
            .schema_type
            .as_ref()
            .is_some_and(|t| t.non_null() == [SchemaType::String])
}

/// Push every declared model reachable without crossing a declaration.
fn collect_inline(model: &Model, out: &mut Vec<Model>) {
    match model {
        Model::Object(_) | Model::Enum(_) | Model::Union(_) => out.push(model.clone()),
        Model::Collection { collection } => collect_inline(collection.inner(), out),
        Model::Primitive { .. } | Model::FreeFormJson | Model::OctetStream | Model::Reference { .. } => {}
    }
}

/// Whether a property schema admits `null`.
pub fn is_nullable(schema: &SchemaOrRef) -> bool {
    match schema {
        SchemaOrRef::Schema(s) => {
            s.is_nullable()
                || s.one_of.iter().any(SchemaOrRef::is_null)
                || s.any_of.iter().any(SchemaOrRef::is_null)
        }
        SchemaOrRef::Ref { .. } => false,
    }
}

fn enum_inner(schema: &Schema) -> Primitive {
    match schema.schema_type.as_ref().map(|t| t.non_null()).as_deref() {
        Some([SchemaType::Integer]) => Primitive::Int,
        Some([SchemaType::Number]) => Primitive::Double,
        Some([SchemaType::Boolean]) => Primitive::Boolean,
        _ => Primitive::String,
    }
}

fn enum_values(values: &[serde_json::Value]) -> Vec<String> {
    values.iter().filter_map(scalar_string).collect()
}

fn scalar_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

fn kind(model: &Model) -> &'static str {
    match model {
        Model::Primitive { .. } => "primitive",
        Model::FreeFormJson => "free-form json",
        Model::OctetStream => "octet stream",
        Model::Collection { .. } => "collection",
        Model::Object(_) => "object",
        Model::Enum(_) => "enum",
        Model::Union(_) => "union",
        Model::Reference { .. } => "reference",
    }
}
