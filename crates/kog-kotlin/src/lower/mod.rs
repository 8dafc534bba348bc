//! Lowering of resolved models and routes into the declaration tree.

pub mod api;
pub mod model;
pub mod union;

use kog_core::ir::Model;

use crate::ast::{Declaration, TypeAlias};
use crate::type_mapper::TypeMapper;

pub use api::ApiLowering;
pub use model::ModelLowering;
pub use union::UnionLowering;

/// Dispatches every declared model to the pass that lowers it.
pub struct Lowering<'a> {
    models: ModelLowering<'a>,
    unions: UnionLowering<'a>,
}

impl<'a> Lowering<'a> {
    pub fn new(types: &'a TypeMapper<'a>) -> Self {
        Lowering {
            models: ModelLowering::new(types),
            unions: UnionLowering::new(types),
        }
    }

    /// Declarations for one top-level model, inline children first, depth-first.
    ///
    /// References and non-declared models produce nothing here; see [`Lowering::alias`].
    pub fn declarations(&self, model: &Model) -> Vec<Declaration> {
        let mut out = Vec::new();
        self.declare(model, &mut out);
        out
    }

    fn declare(&self, model: &Model, out: &mut Vec<Declaration>) {
        for child in model.inline() {
            self.declare(child, out);
        }
        match model {
            Model::Object(object) => out.push(Declaration::Class(self.models.object(object))),
            Model::Enum(enumeration) => {
                out.push(Declaration::Class(self.models.enumeration(enumeration)))
            }
            Model::Union(union) => out.push(Declaration::Class(self.unions.union(union))),
            Model::Primitive { .. }
            | Model::FreeFormJson
            | Model::OctetStream
            | Model::Collection { .. }
            | Model::Reference { .. } => {}
        }
    }

    pub fn alias(&self, name: &str, model: &Model) -> Option<TypeAlias> {
        self.models.alias(name, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kog_core::ir::{Enum, ModelRegistry, NamingContext, Object, Primitive, Property};

    fn status() -> Model {
        Model::Enum(Enum::Closed {
            context: NamingContext::named("PetOwnerStatus"),
            inner: Primitive::String,
            values: vec!["active".to_string()],
            default: None,
            description: None,
        })
    }

    #[test]
    fn test_inline_children_come_first() {
        let owner = Model::Object(Object {
            context: NamingContext::named("PetOwner"),
            description: None,
            properties: vec![Property {
                base_name: "status".to_string(),
                model: status(),
                is_required: true,
                is_nullable: false,
                description: None,
                default: None,
            }],
            inline: vec![status()],
        });
        let pet = Model::Object(Object {
            context: NamingContext::named("Pet"),
            description: None,
            properties: vec![],
            inline: vec![owner],
        });
        let registry = ModelRegistry::default();
        let types = TypeMapper::new(&registry, "p.model");
        let names: Vec<String> = Lowering::new(&types)
            .declarations(&pet)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["PetOwnerStatus", "PetOwner", "Pet"]);
    }

    #[test]
    fn test_references_and_primitives_declare_nothing() {
        let registry = ModelRegistry::default();
        let types = TypeMapper::new(&registry, "p.model");
        let lowering = Lowering::new(&types);
        assert!(
            lowering
                .declarations(&Model::reference(NamingContext::named("Pet")))
                .is_empty()
        );
        let tags = Model::list(Model::primitive(Primitive::String));
        assert!(lowering.declarations(&tags).is_empty());
        assert_eq!(lowering.alias("tags", &tags).map(|a| a.name), Some("Tags".to_string()));
        assert!(
            lowering
                .alias("PetAlias", &Model::reference(NamingContext::named("Pet")))
                .is_none()
        );
    }
}
