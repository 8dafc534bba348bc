use crate::ir::{Model, NamingContext, Route};
use crate::parse::schema::SchemaOrRef;

/// Pluggable naming and rewrite hooks used while building models and routes.
///
/// Every entry is a plain function; callers replace the entries they care
/// about and keep the rest of [`Interceptor::default`].
///
/// ```
/// use kog_core::ir::NamingContext;
/// use kog_core::transform::Interceptor;
///
/// fn flat_property(_: &NamingContext, name: &str) -> NamingContext {
///     NamingContext::named(name)
/// }
///
/// let interceptor = Interceptor {
///     property_context: flat_property,
///     ..Interceptor::default()
/// };
/// let ctx = (interceptor.property_context)(&NamingContext::named("Pet"), "owner");
/// assert_eq!(ctx.flatten(), "Owner");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Interceptor {
    /// Context of an object property, given the owning object's context.
    pub property_context: fn(&NamingContext, &str) -> NamingContext,
    /// Local context of the `index`-th case of a union whose case schema is inline.
    pub union_case_context: fn(&NamingContext, &SchemaOrRef, usize) -> NamingContext,
    /// Rewrite applied to every model resolved from an inline schema.
    pub model: fn(Model) -> Model,
    /// Rewrite applied to every built route.
    pub route: fn(Route) -> Route,
}

impl Default for Interceptor {
    fn default() -> Self {
        Interceptor {
            property_context: default_property_context,
            union_case_context: default_union_case_context,
            model: identity,
            route: identity,
        }
    }
}

fn default_property_context(owner: &NamingContext, property: &str) -> NamingContext {
    owner.child(property)
}

fn default_union_case_context(
    _union: &NamingContext,
    case: &SchemaOrRef,
    index: usize,
) -> NamingContext {
    match case {
        SchemaOrRef::Schema(schema) => match &schema.title {
            Some(title) => NamingContext::named(title),
            None => NamingContext::named(format!("Variant{}", index + 1)),
        },
        SchemaOrRef::Ref { .. } => NamingContext::named(format!("Variant{}", index + 1)),
    }
}

fn identity<T>(value: T) -> T {
    value
}
