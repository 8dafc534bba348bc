use indexmap::IndexMap;
use indexmap::map::Entry;

use super::model::Model;
use super::naming::NamingContext;
use super::types::TopLevelModel;
use crate::error::GenerateError;

/// Flat name → model index over every declared model of a run, inline ones included.
///
/// Primitives and collections are never registered: their names are derived
/// from their shape and cannot collide.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: IndexMap<String, Model>,
}

impl ModelRegistry {
    /// Build the registry in two passes: collect every model, then index them.
    pub fn from_models(models: &[TopLevelModel]) -> Result<Self, GenerateError> {
        let mut collected: Vec<(String, &Model)> = Vec::new();
        for top in models {
            match &top.model {
                // A top-level reference is an alias registered under its own name.
                Model::Reference { .. } => collected.push((top.context.flatten(), &top.model)),
                model => collect(model, &mut collected),
            }
        }

        let mut index: IndexMap<String, Model> = IndexMap::with_capacity(collected.len());
        for (name, model) in collected {
            match index.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(model.clone());
                }
                Entry::Occupied(slot) if slot.get() == model => {}
                Entry::Occupied(slot) => {
                    return Err(GenerateError::RegistryNameCollision(slot.key().clone()));
                }
            }
        }

        log::debug!("registry holds {} models", index.len());
        Ok(ModelRegistry { models: index })
    }

    pub fn lookup(&self, context: &NamingContext) -> Option<&Model> {
        self.models.get(&context.flatten())
    }

    pub fn get(&self, flat_name: &str) -> Option<&Model> {
        self.models.get(flat_name)
    }

    /// Chase exactly one level of reference indirection.
    pub fn resolve<'a>(&'a self, model: &'a Model) -> &'a Model {
        match model {
            Model::Reference { context } => self.lookup(context).unwrap_or(model),
            other => other,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

fn collect<'a>(model: &'a Model, out: &mut Vec<(String, &'a Model)>) {
    if let Some(context) = model.context()
        && model.is_declared()
    {
        out.push((context.flatten(), model));
    }
    for child in model.inline() {
        collect(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Enum, Object, Primitive, Property};

    fn object(name: &str, inline: Vec<Model>) -> Model {
        Model::Object(Object {
            context: NamingContext::named(name),
            description: None,
            properties: vec![],
            inline,
        })
    }

    fn status_enum(name: &str) -> Model {
        Model::Enum(Enum::Closed {
            context: NamingContext::named(name),
            inner: Primitive::String,
            values: vec!["active".to_string()],
            default: Some("active".to_string()),
            description: None,
        })
    }

    fn top(name: &str, model: Model) -> TopLevelModel {
        TopLevelModel {
            context: NamingContext::named(name),
            model,
        }
    }

    #[test]
    fn test_collects_inline_transitively() {
        let inner = object("PetOwnerAddress", vec![status_enum("PetOwnerAddressKind")]);
        let owner = object("PetOwner", vec![inner]);
        let pet = object("Pet", vec![owner]);

        let registry = ModelRegistry::from_models(&[top("Pet", pet)]).unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["Pet", "PetOwner", "PetOwnerAddress", "PetOwnerAddressKind"]
        );
    }

    #[test]
    fn test_primitives_are_not_registered() {
        let models = vec![
            top("Id", Model::primitive(Primitive::String)),
            top("Tags", Model::list(Model::primitive(Primitive::String))),
        ];
        let registry = ModelRegistry::from_models(&models).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_collision_is_an_error() {
        let models = vec![
            top("Pet", object("Pet", vec![])),
            top("Status", object("Pet", vec![status_enum("X")])),
        ];
        let err = ModelRegistry::from_models(&models).unwrap_err();
        assert!(matches!(err, GenerateError::RegistryNameCollision(name) if name == "Pet"));
    }

    #[test]
    fn test_identical_models_share_a_name() {
        let models = vec![
            top("Status", status_enum("Status")),
            top("Status", status_enum("Status")),
        ];
        assert_eq!(ModelRegistry::from_models(&models).unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_chases_one_reference() {
        let models = vec![top("Status", status_enum("Status"))];
        let registry = ModelRegistry::from_models(&models).unwrap();
        let reference = Model::reference(NamingContext::named("Status"));
        match registry.resolve(&reference) {
            Model::Enum(e) => assert_eq!(e.default(), Some("active")),
            other => panic!("expected enum, got {other:?}"),
        }

        let property = Property {
            base_name: "status".to_string(),
            model: reference.clone(),
            is_required: false,
            is_nullable: false,
            description: None,
            default: None,
        };
        assert!(matches!(registry.resolve(&property.model), Model::Enum(_)));
    }

    #[test]
    fn test_top_level_reference_is_an_alias() {
        let models = vec![
            top("Status", status_enum("Status")),
            top("State", Model::reference(NamingContext::named("Status"))),
        ];
        let registry = ModelRegistry::from_models(&models).unwrap();
        assert!(matches!(
            registry.get("State"),
            Some(Model::Reference { .. })
        ));
    }
}
