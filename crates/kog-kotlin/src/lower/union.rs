use kog_core::ir::Union;

use crate::ast::{
    Annotation, Binding, ClassKind, ClassLike, Code, Declaration, Modifier, Parameter, TypeName,
    known, string_literal,
};
use crate::type_mapper::TypeMapper;

/// Lowers a union into a sealed interface with one value-class wrapper per case.
pub struct UnionLowering<'a> {
    types: &'a TypeMapper<'a>,
}

impl<'a> UnionLowering<'a> {
    pub fn new(types: &'a TypeMapper<'a>) -> Self {
        UnionLowering { types }
    }

    pub fn union(&self, union: &Union) -> ClassLike {
        let class_name = self.types.model_class(&union.context);
        let mut sealed = ClassLike::new(ClassKind::Interface, class_name.simple_name());
        sealed.modifiers = vec![Modifier::Sealed];
        sealed.doc = union.description.clone();
        sealed.annotations = vec![Annotation::new(known::serializable())];
        if let Some(property) = &union.discriminator {
            sealed.annotations.push(
                Annotation::new(known::json_class_discriminator())
                    .with_arg(Code::of(string_literal(property))),
            );
        }

        let supertype = TypeName::class(class_name);
        sealed.members = union
            .cases
            .iter()
            .map(|case| {
                let mut value = Parameter::new("value", self.types.type_of(&case.model));
                value.binding = Binding::Val;

                let mut wrapper =
                    ClassLike::new(ClassKind::Class, format!("Case{}", case.context.flatten()));
                wrapper.modifiers = vec![Modifier::Value];
                wrapper.annotations = vec![
                    Annotation::new(known::serializable()),
                    Annotation::new(known::jvm_inline()),
                ];
                wrapper.constructor = Some(vec![value]);
                wrapper.supertypes = vec![supertype.clone()];
                Declaration::Class(wrapper)
            })
            .collect();
        sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kog_core::ir::{Model, ModelRegistry, NamingContext, Primitive, UnionCase};

    use crate::ast::File;
    use crate::emitter::emit;

    #[test]
    fn test_union_wraps_each_case() {
        let union = Union {
            context: NamingContext::named("ToolChoice"),
            description: None,
            cases: vec![
                UnionCase {
                    context: NamingContext::named("String"),
                    model: Model::primitive(Primitive::String),
                },
                UnionCase {
                    context: NamingContext::named("Strings"),
                    model: Model::list(Model::primitive(Primitive::String)),
                },
                UnionCase {
                    context: NamingContext::named("Function"),
                    model: Model::reference(NamingContext::named("Function")),
                },
            ],
            discriminator: Some("type".to_string()),
            inline: vec![],
        };
        let registry = ModelRegistry::default();
        let types = TypeMapper::new(&registry, "p.model");
        let mut file = File::new("ToolChoice", "p.model");
        file.declarations = vec![Declaration::Class(UnionLowering::new(&types).union(&union))];

        assert_eq!(
            emit(&file),
            "package p.model

import kotlin.jvm.JvmInline
import kotlinx.serialization.Serializable
import kotlinx.serialization.json.JsonClassDiscriminator

@Serializable
@JsonClassDiscriminator(\"type\")
sealed interface ToolChoice {
  @Serializable
  @JvmInline
  value class CaseString(
    val value: String,
  ) : ToolChoice

  @Serializable
  @JvmInline
  value class CaseStrings(
    val value: List<String>,
  ) : ToolChoice

  @Serializable
  @JvmInline
  value class CaseFunction(
    val value: Function,
  ) : ToolChoice
}
"
        );
    }
}
