use serde::Serialize;

use crate::transform::name_normalizer::pascal;

/// Recursive descriptor from which a stable identifier is derived.
///
/// Contexts are never used for storage; they only feed [`NamingContext::flatten`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamingContext {
    Named {
        name: String,
    },
    /// `outer` is the coarser context; its segments come first.
    Nested {
        inner: Box<NamingContext>,
        outer: Box<NamingContext>,
    },
    /// Flattens to `operation_id ++ postfix`; `name` does not take part.
    RouteParam {
        name: String,
        operation_id: String,
        postfix: String,
    },
    RouteBody {
        name: String,
        postfix: String,
    },
}

impl NamingContext {
    pub fn named(name: impl Into<String>) -> Self {
        NamingContext::Named { name: name.into() }
    }

    pub fn nested(inner: NamingContext, outer: NamingContext) -> Self {
        NamingContext::Nested {
            inner: Box::new(inner),
            outer: Box::new(outer),
        }
    }

    pub fn route_param(
        name: impl Into<String>,
        operation_id: impl Into<String>,
        postfix: impl Into<String>,
    ) -> Self {
        NamingContext::RouteParam {
            name: name.into(),
            operation_id: operation_id.into(),
            postfix: postfix.into(),
        }
    }

    pub fn route_body(name: impl Into<String>, postfix: impl Into<String>) -> Self {
        NamingContext::RouteBody {
            name: name.into(),
            postfix: postfix.into(),
        }
    }

    /// Nest `inner` under this context.
    pub fn child(&self, inner: impl Into<String>) -> Self {
        NamingContext::nested(NamingContext::named(inner), self.clone())
    }

    /// The flat name: every leaf case-normalized and concatenated outer-first.
    pub fn flatten(&self) -> String {
        match self {
            NamingContext::Named { name } => pascal(name),
            NamingContext::Nested { inner, outer } => {
                format!("{}{}", outer.flatten(), inner.flatten())
            }
            NamingContext::RouteParam {
                operation_id,
                postfix,
                ..
            } => format!("{}{}", pascal(operation_id), pascal(postfix)),
            NamingContext::RouteBody { name, postfix } => {
                format!("{}{}", pascal(name), pascal(postfix))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named() {
        assert_eq!(NamingContext::named("chat_message").flatten(), "ChatMessage");
    }

    #[test]
    fn test_nested_outer_first() {
        let ctx = NamingContext::nested(
            NamingContext::named("Files"),
            NamingContext::named("Assistants"),
        );
        insta::assert_snapshot!(ctx.flatten(), @"AssistantsFiles");
    }

    #[test]
    fn test_deeply_nested() {
        let ctx = NamingContext::named("pet").child("category").child("tags");
        assert_eq!(ctx.flatten(), "PetCategoryTags");
    }

    #[test]
    fn test_route_param_ignores_name() {
        let ctx = NamingContext::route_param("order", "listAssistantFiles", "Request");
        assert_eq!(ctx.flatten(), "ListAssistantFilesRequest");

        let other = NamingContext::route_param("limit", "listAssistantFiles", "Request");
        assert_eq!(ctx.flatten(), other.flatten());
    }

    #[test]
    fn test_route_body() {
        let ctx = NamingContext::route_body("createUser", "Request");
        assert_eq!(ctx.flatten(), "CreateUserRequest");
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let ctx = NamingContext::nested(
            NamingContext::route_body("create_run", "response"),
            NamingContext::named("threads"),
        );
        assert_eq!(ctx.flatten(), ctx.clone().flatten());
        assert_eq!(ctx.flatten(), "ThreadsCreateRunResponse");
    }
}
