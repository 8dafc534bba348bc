use std::fmt;

/// A fully qualified class name, possibly nested (`io.ktor.http.ContentType.Application`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    pub package: String,
    /// Outermost first; never empty.
    pub simple_names: Vec<String>,
}

impl ClassName {
    pub fn new(package: impl Into<String>, simple: impl Into<String>) -> Self {
        ClassName {
            package: package.into(),
            simple_names: vec![simple.into()],
        }
    }

    pub fn nested(&self, simple: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(simple.into());
        ClassName {
            package: self.package.clone(),
            simple_names,
        }
    }

    /// The top-level class this name lives in; the unit that gets imported.
    pub fn top_level(&self) -> ClassName {
        ClassName {
            package: self.package.clone(),
            simple_names: self.simple_names[..1].to_vec(),
        }
    }

    pub fn top_level_simple(&self) -> &str {
        &self.simple_names[0]
    }

    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map(String::as_str).unwrap_or_default()
    }

    /// `A.B` relative to the package.
    pub fn relative(&self) -> String {
        self.simple_names.join(".")
    }

    pub fn canonical(&self) -> String {
        if self.package.is_empty() {
            self.relative()
        } else {
            format!("{}.{}", self.package, self.relative())
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// A top-level function or extension, always imported and rendered short.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberName {
    pub package: String,
    pub name: String,
}

impl MemberName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        MemberName {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn canonical(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }
}

/// A type reference as it appears in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Class {
        name: ClassName,
        args: Vec<TypeName>,
        nullable: bool,
    },
    /// `Receiver.(P1, P2) -> R`
    Lambda {
        receiver: Option<Box<TypeName>>,
        params: Vec<TypeName>,
        returns: Box<TypeName>,
        nullable: bool,
    },
}

impl TypeName {
    pub fn class(name: ClassName) -> Self {
        TypeName::Class {
            name,
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn generic(name: ClassName, args: Vec<TypeName>) -> Self {
        TypeName::Class {
            name,
            args,
            nullable: false,
        }
    }

    pub fn lambda(receiver: Option<TypeName>, params: Vec<TypeName>, returns: TypeName) -> Self {
        TypeName::Lambda {
            receiver: receiver.map(Box::new),
            params,
            returns: Box::new(returns),
            nullable: false,
        }
    }

    pub fn nullable(self, value: bool) -> Self {
        match self {
            TypeName::Class { name, args, .. } => TypeName::Class {
                name,
                args,
                nullable: value,
            },
            TypeName::Lambda {
                receiver,
                params,
                returns,
                ..
            } => TypeName::Lambda {
                receiver,
                params,
                returns,
                nullable: value,
            },
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeName::Class { nullable, .. } | TypeName::Lambda { nullable, .. } => *nullable,
        }
    }

    /// The class, when this is a plain class type.
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            TypeName::Class { name, .. } => Some(name),
            TypeName::Lambda { .. } => None,
        }
    }
}

/// Hard keywords that cannot be used as plain identifiers.
const KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Back-quote identifiers that are keywords or do not start like an identifier.
pub fn ident(name: &str) -> String {
    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if KEYWORDS.contains(&name) || !starts_ok {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// A Kotlin string literal, with `$` and quotes escaped.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_class_names() {
        let content_type = ClassName::new("io.ktor.http", "ContentType");
        let json = content_type.nested("Application");
        assert_eq!(json.canonical(), "io.ktor.http.ContentType.Application");
        assert_eq!(json.relative(), "ContentType.Application");
        assert_eq!(json.top_level(), content_type);
        assert_eq!(json.simple_name(), "Application");
    }

    #[test]
    fn test_ident_escapes_keywords() {
        assert_eq!(ident("object"), "`object`");
        assert_eq!(ident("in"), "`in`");
        assert_eq!(ident("1024x1024"), "`1024x1024`");
        assert_eq!(ident("value"), "value");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("plain"), "\"plain\"");
        assert_eq!(string_literal("a\"b$c"), "\"a\\\"b\\$c\"");
    }
}
