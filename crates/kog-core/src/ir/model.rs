use serde::Serialize;

use super::naming::NamingContext;

/// The resolved, closed type model every schema node is turned into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    Primitive { primitive: Primitive },
    FreeFormJson,
    OctetStream,
    Collection { collection: Collection },
    Object(Object),
    Enum(Enum),
    Union(Union),
    /// A named pointer, resolved through the registry. Owns no data.
    Reference { context: NamingContext },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    Int,
    Double,
    Boolean,
    String,
    Unit,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "Int",
            Primitive::Double => "Double",
            Primitive::Boolean => "Boolean",
            Primitive::String => "String",
            Primitive::Unit => "Unit",
        }
    }
}

/// Map keys are always strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "of", content = "inner")]
pub enum Collection {
    List(Box<Model>),
    Set(Box<Model>),
    Map(Box<Model>),
}

impl Collection {
    pub fn inner(&self) -> &Model {
        match self {
            Collection::List(inner) | Collection::Set(inner) | Collection::Map(inner) => inner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    pub context: NamingContext,
    pub description: Option<String>,
    pub properties: Vec<Property>,
    /// Nested models that must be declared before this object, in encounter order.
    pub inline: Vec<Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub base_name: String,
    pub model: Model,
    pub is_required: bool,
    pub is_nullable: bool,
    pub description: Option<String>,
    /// The schema's own `default`, if any.
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "openness", rename_all = "snake_case")]
pub enum Enum {
    Closed {
        context: NamingContext,
        inner: Primitive,
        values: Vec<String>,
        default: Option<String>,
        description: Option<String>,
    },
    /// Accepts values outside `values` through an extensibility case.
    Open {
        context: NamingContext,
        values: Vec<String>,
        default: Option<String>,
        description: Option<String>,
    },
}

impl Enum {
    pub fn context(&self) -> &NamingContext {
        match self {
            Enum::Closed { context, .. } | Enum::Open { context, .. } => context,
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            Enum::Closed { values, .. } | Enum::Open { values, .. } => values,
        }
    }

    pub fn default(&self) -> Option<&str> {
        match self {
            Enum::Closed { default, .. } | Enum::Open { default, .. } => default.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Enum::Closed { description, .. } | Enum::Open { description, .. } => {
                description.as_deref()
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Enum::Open { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Union {
    pub context: NamingContext,
    pub description: Option<String>,
    pub cases: Vec<UnionCase>,
    pub discriminator: Option<String>,
    pub inline: Vec<Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionCase {
    pub context: NamingContext,
    pub model: Model,
}

impl Model {
    pub fn primitive(primitive: Primitive) -> Self {
        Model::Primitive { primitive }
    }

    pub fn list(inner: Model) -> Self {
        Model::Collection {
            collection: Collection::List(Box::new(inner)),
        }
    }

    pub fn set(inner: Model) -> Self {
        Model::Collection {
            collection: Collection::Set(Box::new(inner)),
        }
    }

    pub fn map(inner: Model) -> Self {
        Model::Collection {
            collection: Collection::Map(Box::new(inner)),
        }
    }

    pub fn reference(context: NamingContext) -> Self {
        Model::Reference { context }
    }

    /// The context of models that are declared under their own name.
    pub fn context(&self) -> Option<&NamingContext> {
        match self {
            Model::Object(o) => Some(&o.context),
            Model::Enum(e) => Some(e.context()),
            Model::Union(u) => Some(&u.context),
            Model::Reference { context } => Some(context),
            Model::Primitive { .. }
            | Model::FreeFormJson
            | Model::OctetStream
            | Model::Collection { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Model::Object(o) => o.description.as_deref(),
            Model::Enum(e) => e.description(),
            Model::Union(u) => u.description.as_deref(),
            Model::Primitive { .. }
            | Model::FreeFormJson
            | Model::OctetStream
            | Model::Collection { .. }
            | Model::Reference { .. } => None,
        }
    }

    /// Whether this model is an Object, Enum or Union, i.e. needs its own declaration.
    pub fn is_declared(&self) -> bool {
        matches!(self, Model::Object(_) | Model::Enum(_) | Model::Union(_))
    }

    /// Nested models that must be declared ahead of this one.
    pub fn inline(&self) -> &[Model] {
        match self {
            Model::Object(o) => &o.inline,
            Model::Union(u) => &u.inline,
            Model::Primitive { .. }
            | Model::FreeFormJson
            | Model::OctetStream
            | Model::Collection { .. }
            | Model::Enum(_)
            | Model::Reference { .. } => &[],
        }
    }

    /// A name derived from the model's shape.
    ///
    /// Named models use their flat name. Collections follow a fixed table:
    /// the innermost collection appends `s` (List, Set) or `Map`, every
    /// enclosing level appends `List`, `Set` or `Map`.
    pub fn structural_name(&self) -> String {
        match self {
            Model::Primitive { primitive } => primitive.name().to_string(),
            Model::FreeFormJson => "JsonElement".to_string(),
            Model::OctetStream => "ByteArray".to_string(),
            Model::Collection { collection } => collection_name(collection),
            Model::Object(_) | Model::Enum(_) | Model::Union(_) | Model::Reference { .. } => self
                .context()
                .map(NamingContext::flatten)
                .unwrap_or_default(),
        }
    }
}

fn collection_name(collection: &Collection) -> String {
    match collection.inner() {
        Model::Collection { collection: inner } => {
            let suffix = match collection {
                Collection::List(_) => "List",
                Collection::Set(_) => "Set",
                Collection::Map(_) => "Map",
            };
            format!("{}{suffix}", collection_name(inner))
        }
        inner => {
            let suffix = match collection {
                Collection::List(_) | Collection::Set(_) => "s",
                Collection::Map(_) => "Map",
            };
            format!("{}{suffix}", inner.structural_name())
        }
    }
}
