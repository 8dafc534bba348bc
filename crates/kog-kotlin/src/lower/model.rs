use std::collections::HashSet;

use kog_core::ir::{Collection, Enum, Model, Object, Primitive, Property};
use kog_core::transform::name_normalizer::{normalize_name, pascal};
use serde_json::Value;

use crate::ast::{
    Annotation, Binding, ClassKind, ClassLike, Code, Declaration, EnumEntry, Function,
    FunctionBody, Modifier, Parameter, TypeAlias, TypeName, Visibility, ident, known,
    string_literal,
};
use crate::type_mapper::TypeMapper;

/// Lowers objects, enums and aliases into declarations.
pub struct ModelLowering<'a> {
    types: &'a TypeMapper<'a>,
}

impl<'a> ModelLowering<'a> {
    pub fn new(types: &'a TypeMapper<'a>) -> Self {
        ModelLowering { types }
    }

    /// `@Serializable data class` with one constructor property per field.
    pub fn object(&self, object: &Object) -> ClassLike {
        let mut class = ClassLike::new(ClassKind::Class, object.context.flatten());
        class.modifiers = vec![Modifier::Data];
        class.annotations = vec![Annotation::new(known::serializable())];
        class.doc = object_doc(object);
        class.constructor = Some(object.properties.iter().map(|p| self.property(p)).collect());
        class
    }

    fn property(&self, property: &Property) -> Parameter {
        let name = normalize_name(&property.base_name).camel_case;
        let default = self.default_value(property);
        let nullable = property.is_nullable || (!property.is_required && default.is_none());

        let mut annotations = Vec::new();
        if name != property.base_name {
            annotations.push(serial_name(&property.base_name));
        }
        // Without it, kotlinx.serialization drops fields equal to their default.
        if property.is_required && default.is_some() {
            annotations.push(Annotation::new(known::required()));
        }

        let default = match default {
            Some(code) => Some(code),
            None if nullable && !property.is_required => Some(Code::of("null")),
            None => None,
        };

        Parameter {
            annotations,
            binding: Binding::Val,
            default,
            ..Parameter::new(name, self.types.type_of(&property.model).nullable(nullable))
        }
    }

    /// The property's schema default, or the default of the enum it points at.
    fn default_value(&self, property: &Property) -> Option<Code> {
        let inherited;
        let value = match &property.default {
            Some(value) => value,
            None => match self.types.registry().resolve(&property.model) {
                Model::Enum(e) => {
                    inherited = Value::String(e.default()?.to_string());
                    &inherited
                }
                _ => return None,
            },
        };
        self.literal(&property.model, value)
    }

    /// A Kotlin expression for `value` typed as `model`, when one exists.
    fn literal(&self, model: &Model, value: &Value) -> Option<Code> {
        let resolved = self.types.registry().resolve(model);
        let text = match (resolved, value) {
            (Model::Primitive { primitive }, value) => primitive_literal(*primitive, value)?,
            (Model::Collection { collection }, Value::Array(items)) => {
                let (empty, of) = match collection {
                    Collection::List(_) => ("emptyList()", "listOf"),
                    Collection::Set(_) => ("emptySet()", "setOf"),
                    Collection::Map(_) => return None,
                };
                if items.is_empty() {
                    return Some(Code::of(empty));
                }
                let mut code = Code::new();
                code.text(format!("{of}("));
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        code.text(", ");
                    }
                    code.append(self.literal(collection.inner(), item)?);
                }
                code.text(")");
                return Some(code);
            }
            (Model::Collection { collection: Collection::Map(inner) }, Value::Object(entries)) => {
                if entries.is_empty() {
                    return Some(Code::of("emptyMap()"));
                }
                let mut code = Code::new();
                code.text("mapOf(");
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        code.text(", ");
                    }
                    code.text(format!("{} to ", string_literal(key)));
                    code.append(self.literal(inner, item)?);
                }
                code.text(")");
                return Some(code);
            }
            (Model::Enum(e), value) => {
                let raw = scalar(value)?;
                let index = e.values().iter().position(|v| *v == raw)?;
                let entry = entry_names(e.values()).swap_remove(index);
                let mut code = Code::new();
                code.ty(self.types.type_of(model)).text(format!(".{}", ident(&entry)));
                return Some(code);
            }
            _ => return None,
        };
        Some(Code::of(text))
    }

    /// `enum class`; open enums add an extensibility entry and a `fromValue` lookup.
    pub fn enumeration(&self, enumeration: &Enum) -> ClassLike {
        let name = enumeration.context().flatten();
        let mut class = ClassLike::new(ClassKind::Enum, &name);
        class.annotations = vec![Annotation::new(known::serializable())];
        class.doc = enumeration.description().map(str::to_string);

        let values = enumeration.values();
        let entries = entry_names(values);
        for (entry, raw) in entries.iter().zip(values) {
            let annotations = if entry == raw {
                vec![]
            } else {
                vec![serial_name(raw)]
            };
            class.members.push(Declaration::EnumEntry(EnumEntry {
                name: entry.clone(),
                doc: None,
                annotations,
            }));
        }

        if let Enum::Open { .. } = enumeration {
            let unknown = if entries.iter().any(|e| e == "Unknown") {
                "UnknownValue"
            } else {
                "Unknown"
            };
            class.members.push(Declaration::EnumEntry(EnumEntry {
                name: unknown.to_string(),
                doc: None,
                annotations: vec![],
            }));
            let mut companion = ClassLike::new(ClassKind::Singleton, "");
            companion.modifiers = vec![Modifier::Companion];
            let enum_type = TypeName::class(self.types.model_class(enumeration.context()));
            companion.members = vec![Declaration::Function(from_value(
                enum_type, values, &entries, unknown,
            ))];
            class.members.push(Declaration::Class(companion));
        }
        class
    }

    /// `typealias` for models that are only a name for another type.
    pub fn alias(&self, name: &str, model: &Model) -> Option<TypeAlias> {
        match model {
            Model::Primitive { .. }
            | Model::FreeFormJson
            | Model::OctetStream
            | Model::Collection { .. } => Some(TypeAlias {
                name: pascal(name),
                doc: None,
                visibility: Visibility::Public,
                type_params: vec![],
                ty: self.types.type_of(model),
            }),
            Model::Object(_) | Model::Enum(_) | Model::Union(_) | Model::Reference { .. } => None,
        }
    }
}

/// `fun fromValue(value: String): E = when (value) { ... }`
fn from_value(enum_type: TypeName, values: &[String], entries: &[String], unknown: &str) -> Function {
    let mut body = Code::new();
    body.line("when (value) {").indented(|c| {
        for (raw, entry) in values.iter().zip(entries) {
            c.line(format!("{} -> {}", string_literal(raw), ident(entry)));
        }
        c.line(format!("else -> {unknown}"));
    });
    body.text("}");

    Function {
        params: vec![Parameter::new("value", TypeName::class(known::kotlin("String")))],
        returns: Some(enum_type),
        body: Some(FunctionBody::Expression(body)),
        ..Function::new("fromValue")
    }
}

fn serial_name(raw: &str) -> Annotation {
    Annotation::new(known::serial_name()).with_arg(Code::of(string_literal(raw)))
}

fn object_doc(object: &Object) -> Option<String> {
    let mut lines: Vec<String> = object.description.iter().cloned().collect();
    let tags: Vec<String> = object
        .properties
        .iter()
        .filter_map(|p| {
            let description = p.description.as_deref()?.lines().next()?;
            let name = normalize_name(&p.base_name).camel_case;
            Some(format!("@property {name} {description}"))
        })
        .collect();
    if !tags.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(tags);
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Case-normalized entry names, suffixed when two values normalize alike.
pub fn entry_names(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|raw| {
            let base = pascal(raw);
            let mut name = base.clone();
            let mut n = 2;
            while !seen.insert(name.clone()) {
                name = format!("{base}{n}");
                n += 1;
            }
            name
        })
        .collect()
}

fn primitive_literal(primitive: Primitive, value: &Value) -> Option<String> {
    match (primitive, value) {
        (Primitive::Int, Value::Number(n)) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        (Primitive::Double, Value::Number(n)) => {
            let f = n.as_f64()?;
            Some(if f.fract() == 0.0 && f.is_finite() {
                format!("{f:.1}")
            } else {
                n.to_string()
            })
        }
        (Primitive::Boolean, Value::Bool(b)) => Some(b.to_string()),
        (Primitive::String, Value::String(s)) => Some(string_literal(s)),
        _ => None,
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kog_core::ir::{ModelRegistry, NamingContext, TopLevelModel};
    use serde_json::json;

    use crate::ast::File;
    use crate::emitter::emit;

    fn prop(name: &str, model: Model, required: bool, default: Option<Value>) -> Property {
        Property {
            base_name: name.to_string(),
            model,
            is_required: required,
            is_nullable: false,
            description: None,
            default,
        }
    }

    fn render(registry: &ModelRegistry, object: &Object) -> String {
        let types = TypeMapper::new(registry, "p.model");
        let lowering = ModelLowering::new(&types);
        let mut file = File::new(object.context.flatten(), "p.model");
        file.declarations = vec![Declaration::Class(lowering.object(object))];
        emit(&file)
    }

    fn object(name: &str, properties: Vec<Property>) -> Object {
        Object {
            context: NamingContext::named(name),
            description: None,
            properties,
            inline: vec![],
        }
    }

    #[test]
    fn test_required_default_gets_marker() {
        let int = Model::primitive(Primitive::Int);
        let o = object(
            "Limits",
            vec![
                prop("count", int.clone(), true, Some(json!(42))),
                prop("page", int, false, Some(json!(42))),
            ],
        );
        assert_eq!(
            render(&ModelRegistry::default(), &o),
            "package p.model

import kotlinx.serialization.Required
import kotlinx.serialization.Serializable

@Serializable
data class Limits(
  @Required val count: Int = 42,
  val page: Int = 42,
)
"
        );
    }

    #[test]
    fn test_nullability_combinations() {
        let string = Model::primitive(Primitive::String);
        let mut nullable_required = prop("note", string.clone(), true, None);
        nullable_required.is_nullable = true;
        let o = object(
            "Shapes",
            vec![
                prop("id", string.clone(), true, None),
                prop("nick_name", string.clone(), false, None),
                nullable_required,
                prop("ratio", Model::primitive(Primitive::Double), false, Some(json!(1))),
            ],
        );
        assert_eq!(
            render(&ModelRegistry::default(), &o),
            "package p.model

import kotlinx.serialization.SerialName
import kotlinx.serialization.Serializable

@Serializable
data class Shapes(
  val id: String,
  @SerialName(\"nick_name\") val nickName: String? = null,
  val note: String?,
  val ratio: Double = 1.0,
)
"
        );
    }

    #[test]
    fn test_collection_defaults() {
        let strings = Model::list(Model::primitive(Primitive::String));
        let o = object(
            "Tags",
            vec![
                prop("empty", strings.clone(), false, Some(json!([]))),
                prop("some", strings, false, Some(json!(["a", "b"]))),
                prop(
                    "unique",
                    Model::set(Model::primitive(Primitive::Int)),
                    false,
                    Some(json!([])),
                ),
                prop(
                    "labels",
                    Model::map(Model::primitive(Primitive::String)),
                    false,
                    Some(json!({"k": "v"})),
                ),
            ],
        );
        assert_eq!(
            render(&ModelRegistry::default(), &o),
            "package p.model

import kotlinx.serialization.Serializable

@Serializable
data class Tags(
  val empty: List<String> = emptyList(),
  val some: List<String> = listOf(\"a\", \"b\"),
  val unique: Set<Int> = emptySet(),
  val labels: Map<String, String> = mapOf(\"k\" to \"v\"),
)
"
        );
    }

    #[test]
    fn test_enum_default_through_reference() {
        let status = Model::Enum(Enum::Closed {
            context: NamingContext::named("Status"),
            inner: Primitive::String,
            values: vec!["in_progress".into(), "done".into()],
            default: Some("in_progress".into()),
            description: None,
        });
        let registry = ModelRegistry::from_models(&[TopLevelModel {
            context: NamingContext::named("Status"),
            model: status,
        }])
        .unwrap();
        let o = object(
            "Task",
            vec![prop(
                "status",
                Model::reference(NamingContext::named("Status")),
                false,
                None,
            )],
        );
        assert_eq!(
            render(&registry, &o),
            "package p.model

import kotlinx.serialization.Serializable

@Serializable
data class Task(
  val status: Status = Status.InProgress,
)
"
        );
    }

    fn render_enum(e: &Enum) -> String {
        let registry = ModelRegistry::default();
        let types = TypeMapper::new(&registry, "p.model");
        let lowering = ModelLowering::new(&types);
        let mut file = File::new(e.context().flatten(), "p.model");
        file.declarations = vec![Declaration::Class(lowering.enumeration(e))];
        emit(&file)
    }

    #[test]
    fn test_normalized_enum_has_no_serial_names() {
        let e = Enum::Closed {
            context: NamingContext::named("Mode"),
            inner: Primitive::String,
            values: vec!["Auto".into(), "Manual".into()],
            default: None,
            description: None,
        };
        assert_eq!(
            render_enum(&e),
            "package p.model

import kotlinx.serialization.Serializable

@Serializable
enum class Mode {
  Auto,
  Manual,
}
"
        );
    }

    #[test]
    fn test_raw_enum_values_get_serial_names() {
        let e = Enum::Closed {
            context: NamingContext::named("Mode"),
            inner: Primitive::String,
            values: vec!["auto".into(), "manual".into()],
            default: None,
            description: Some("How it runs.".into()),
        };
        assert_eq!(
            render_enum(&e),
            "package p.model

import kotlinx.serialization.SerialName
import kotlinx.serialization.Serializable

/**
 * How it runs.
 */
@Serializable
enum class Mode {
  @SerialName(\"auto\") Auto,
  @SerialName(\"manual\") Manual,
}
"
        );
    }

    #[test]
    fn test_open_enum() {
        let e = Enum::Open {
            context: NamingContext::named("Model"),
            values: vec!["gpt-4o".into(), "unknown".into()],
            default: None,
            description: None,
        };
        assert_eq!(
            render_enum(&e),
            "package p.model

import kotlinx.serialization.SerialName
import kotlinx.serialization.Serializable

@Serializable
enum class Model {
  @SerialName(\"gpt-4o\") Gpt4o,
  @SerialName(\"unknown\") Unknown,
  UnknownValue,
  ;

  companion object {
    fun fromValue(value: String): Model = when (value) {
      \"gpt-4o\" -> Gpt4o
      \"unknown\" -> Unknown
      else -> UnknownValue
    }
  }
}
"
        );
    }

    #[test]
    fn test_entry_names_are_unique() {
        let values = vec!["auto".to_string(), "AUTO".to_string(), "1024x1024".to_string()];
        let names = entry_names(&values);
        assert_eq!(names[..2], ["Auto".to_string(), "Auto2".to_string()]);
        assert_eq!(ident(&names[2]), "`1024x1024`");
    }

    #[test]
    fn test_aliases() {
        let registry = ModelRegistry::default();
        let types = TypeMapper::new(&registry, "p.model");
        let lowering = ModelLowering::new(&types);
        assert!(lowering.alias("Ids", &Model::list(Model::primitive(Primitive::Int))).is_some());
        assert!(lowering
            .alias("Pet", &Model::reference(NamingContext::named("Other")))
            .is_none());
    }
}
