use kog_core::ir::{Collection, Model, ModelRegistry, NamingContext, Primitive};

use crate::ast::{ClassName, TypeName, known};

/// Maps resolved models to Kotlin types in the generated model package.
pub struct TypeMapper<'a> {
    registry: &'a ModelRegistry,
    model_package: String,
}

impl<'a> TypeMapper<'a> {
    pub fn new(registry: &'a ModelRegistry, model_package: impl Into<String>) -> Self {
        TypeMapper {
            registry,
            model_package: model_package.into(),
        }
    }

    pub fn registry(&self) -> &'a ModelRegistry {
        self.registry
    }

    pub fn model_package(&self) -> &str {
        &self.model_package
    }

    pub fn model_class(&self, context: &NamingContext) -> ClassName {
        ClassName::new(&self.model_package, context.flatten())
    }

    pub fn type_of(&self, model: &Model) -> TypeName {
        match model {
            Model::Primitive { primitive } => TypeName::class(known::kotlin(match primitive {
                Primitive::Int => "Int",
                Primitive::Double => "Double",
                Primitive::Boolean => "Boolean",
                Primitive::String => "String",
                Primitive::Unit => "Unit",
            })),
            Model::FreeFormJson => TypeName::class(known::json_element()),
            Model::OctetStream => TypeName::class(known::kotlin("ByteArray")),
            Model::Collection { collection } => match collection {
                Collection::List(inner) => TypeName::generic(known::list(), vec![self.type_of(inner)]),
                Collection::Set(inner) => TypeName::generic(known::set(), vec![self.type_of(inner)]),
                Collection::Map(inner) => TypeName::generic(
                    known::map(),
                    vec![TypeName::class(known::kotlin("String")), self.type_of(inner)],
                ),
            },
            Model::Object(o) => TypeName::class(self.model_class(&o.context)),
            Model::Enum(e) => TypeName::class(self.model_class(e.context())),
            Model::Union(u) => TypeName::class(self.model_class(&u.context)),
            Model::Reference { context } => TypeName::class(self.model_class(self.alias_target(context))),
        }
    }

    /// Top-level references get no declaration of their own; follow them to
    /// the model that does.
    fn alias_target<'c>(&'c self, context: &'c NamingContext) -> &'c NamingContext {
        let mut current = context;
        for _ in 0..=self.registry.len() {
            match self.registry.lookup(current) {
                Some(Model::Reference { context: next }) if next != current => current = next,
                _ => return current,
            }
        }
        current
    }
}
