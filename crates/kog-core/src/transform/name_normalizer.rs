use heck::{ToLowerCamelCase, ToPascalCase};

use crate::ir::NormalizedName;

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
    }
}

/// Word-boundary split, capitalized concatenation: the flat-name casing.
pub fn pascal(name: &str) -> String {
    normalize_name(name).pascal_case
}

/// Derive a camelCase operation name from HTTP method + path.
///
/// Examples:
/// - `GET /users` → `listUsers`
/// - `POST /users` → `createUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `DELETE /users/{userId}` → `deleteUser`
/// - `GET /users/{userId}/messages` → `listUsersMessages`
pub fn route_to_name(method: &str, path: &str) -> String {
    let mut resource_parts: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if is_path_param(seg) {
            ends_with_param = true;
        } else {
            resource_parts.push(seg);
            ends_with_param = false;
        }
    }

    let method_upper = method.to_uppercase();
    let prefix = match method_upper.as_str() {
        "GET" if ends_with_param => "get",
        "GET" => "list",
        "POST" => "create",
        "PUT" => "update",
        "DELETE" => "delete",
        "PATCH" => "patch",
        "OPTIONS" => "options",
        "HEAD" => "head",
        "TRACE" => "trace",
        _ => "call",
    };

    if resource_parts.is_empty() {
        return prefix.to_string();
    }

    // Single-resource ops (trailing param) singularize the last segment.
    let mut pascal_parts = String::new();
    for (i, part) in resource_parts.iter().enumerate() {
        let is_last = i == resource_parts.len() - 1;
        let word = if is_last && ends_with_param {
            singularize(part)
        } else {
            part.to_string()
        };
        pascal_parts.push_str(&word.to_pascal_case());
    }

    format!("{prefix}{pascal_parts}")
}

/// `{name}` path segment.
pub fn is_path_param(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Naive singularization: strips trailing 's' if present.
fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let n = normalize_name("listModels");
        assert_eq!(n.pascal_case, "ListModels");
        assert_eq!(n.camel_case, "listModels");
    }

    #[test]
    fn test_snake_and_kebab() {
        assert_eq!(pascal("first_name"), "FirstName");
        assert_eq!(normalize_name("pet-store").camel_case, "petStore");
    }

    #[test]
    fn test_special_chars() {
        assert_eq!(pascal("application/json"), "ApplicationJson");
        assert_eq!(pascal("gpt-4o.mini"), "Gpt4oMini");
        assert_eq!(pascal("???"), "Unnamed");
    }

    #[test]
    fn test_route_to_name() {
        assert_eq!(route_to_name("GET", "/users"), "listUsers");
        assert_eq!(route_to_name("POST", "/users"), "createUsers");
        assert_eq!(route_to_name("GET", "/users/{userId}"), "getUser");
        assert_eq!(route_to_name("PUT", "/users/{userId}"), "updateUser");
        assert_eq!(route_to_name("DELETE", "/categories/{id}"), "deleteCategory");
        assert_eq!(
            route_to_name("GET", "/users/{userId}/messages"),
            "listUsersMessages"
        );
        assert_eq!(route_to_name("GET", "/"), "list");
    }

    #[test]
    fn test_path_param() {
        assert!(is_path_param("{id}"));
        assert!(!is_path_param("users"));
        assert!(!is_path_param("{}"));
    }
}
