use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{
    Annotation, Chunk, ClassLike, ClassName, Code, Declaration, File, FunctionBody, MemberName,
    Parameter, TypeName, TypeParam,
};

/// Packages whose classes are visible in every Kotlin file without an import.
const ALWAYS_AVAILABLE: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
];

/// Which names of one file render short, and the imports that makes necessary.
///
/// Classes are grouped by the simple name of their top-level class. A group
/// with a single distinct class renders short; a group with several renders
/// every member fully qualified and imports none of them.
#[derive(Debug, Clone, Default)]
pub struct Symbols {
    short: BTreeSet<ClassName>,
    imports: BTreeSet<String>,
}

impl Symbols {
    pub fn resolve(file: &File) -> Symbols {
        let mut refs = References::default();
        for decl in &file.declarations {
            refs.declaration(decl);
        }

        // Top-level declarations of this file occupy their simple names.
        let mut groups: BTreeMap<String, BTreeSet<ClassName>> = BTreeMap::new();
        for decl in &file.declarations {
            let own = ClassName::new(&file.package, decl.name());
            groups
                .entry(own.top_level_simple().to_string())
                .or_default()
                .insert(own);
        }
        for class in &refs.classes {
            let top = class.top_level();
            groups
                .entry(top.top_level_simple().to_string())
                .or_default()
                .insert(top);
        }

        let mut symbols = Symbols::default();
        for (simple, classes) in groups {
            if classes.len() > 1 {
                log::debug!(
                    "{} classes named {simple} in {}: qualifying all",
                    classes.len(),
                    file.name
                );
                continue;
            }
            for class in classes {
                if !class.package.is_empty()
                    && class.package != file.package
                    && !is_always_available(&class.package)
                {
                    symbols.imports.insert(class.canonical());
                }
                symbols.short.insert(class);
            }
        }

        for member in &refs.members {
            if member.package != file.package {
                symbols.imports.insert(member.canonical());
            }
        }
        symbols.imports.extend(file.imports.iter().cloned());
        symbols
    }

    /// Import lines, sorted.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn class(&self, name: &ClassName) -> String {
        if self.short.contains(&name.top_level()) {
            name.relative()
        } else {
            name.canonical()
        }
    }

    pub fn member(&self, member: &MemberName) -> String {
        member.name.clone()
    }
}

/// `kotlin.jvm` and other sub-packages are not part of the default imports.
fn is_always_available(package: &str) -> bool {
    ALWAYS_AVAILABLE.contains(&package)
}

#[derive(Default)]
struct References {
    classes: BTreeSet<ClassName>,
    members: BTreeSet<MemberName>,
}

impl References {
    fn declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::TypeAlias(alias) => {
                self.type_params(&alias.type_params);
                self.ty(&alias.ty);
            }
            Declaration::Class(class) => self.class(class),
            Declaration::Function(function) => {
                self.annotations(&function.annotations);
                self.type_params(&function.type_params);
                if let Some(receiver) = &function.receiver {
                    self.ty(receiver);
                }
                self.params(&function.params);
                if let Some(returns) = &function.returns {
                    self.ty(returns);
                }
                match &function.body {
                    Some(FunctionBody::Block(code) | FunctionBody::Expression(code)) => {
                        self.code(code)
                    }
                    None => {}
                }
            }
            Declaration::Property(property) => {
                self.annotations(&property.annotations);
                if let Some(ty) = &property.ty {
                    self.ty(ty);
                }
                if let Some(init) = &property.initializer {
                    self.code(init);
                }
            }
            Declaration::EnumEntry(entry) => self.annotations(&entry.annotations),
        }
    }

    fn class(&mut self, class: &ClassLike) {
        self.annotations(&class.annotations);
        self.type_params(&class.type_params);
        if let Some(params) = &class.constructor {
            self.params(params);
        }
        for supertype in &class.supertypes {
            self.ty(supertype);
        }
        for member in &class.members {
            self.declaration(member);
        }
    }

    fn params(&mut self, params: &[Parameter]) {
        for param in params {
            self.annotations(&param.annotations);
            self.ty(&param.ty);
            if let Some(default) = &param.default {
                self.code(default);
            }
        }
    }

    fn annotations(&mut self, annotations: &[Annotation]) {
        for annotation in annotations {
            self.classes.insert(annotation.class.clone());
            for arg in &annotation.args {
                self.code(arg);
            }
        }
    }

    fn type_params(&mut self, params: &[TypeParam]) {
        for param in params {
            for bound in &param.bounds {
                self.ty(bound);
            }
        }
    }

    fn ty(&mut self, ty: &TypeName) {
        match ty {
            TypeName::Class { name, args, .. } => {
                self.classes.insert(name.clone());
                for arg in args {
                    self.ty(arg);
                }
            }
            TypeName::Lambda {
                receiver,
                params,
                returns,
                ..
            } => {
                if let Some(receiver) = receiver {
                    self.ty(receiver);
                }
                for param in params {
                    self.ty(param);
                }
                self.ty(returns);
            }
        }
    }

    fn code(&mut self, code: &Code) {
        for chunk in code.references() {
            match chunk {
                Chunk::Type(ty) => self.ty(ty),
                Chunk::Member(member) => {
                    self.members.insert(member.clone());
                }
                Chunk::Text(_) | Chunk::Newline | Chunk::Indent | Chunk::Unindent => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassKind, Property, known};

    fn file_with(types: Vec<TypeName>) -> File {
        let mut class = ClassLike::new(ClassKind::Class, "Holder");
        class.members = types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| Declaration::Property(Property::new(format!("p{i}"), ty)))
            .collect();
        let mut file = File::new("Holder", "com.example");
        file.declarations.push(Declaration::Class(class));
        file
    }

    #[test]
    fn test_conflicting_simple_names_stay_qualified() {
        let abc = ClassName::new("a.b", "C");
        let xyc = ClassName::new("x.y", "C");
        let file = file_with(vec![TypeName::class(abc.clone()), TypeName::class(xyc.clone())]);
        let symbols = Symbols::resolve(&file);

        assert_eq!(symbols.class(&abc), "a.b.C");
        assert_eq!(symbols.class(&xyc), "x.y.C");
        assert_eq!(symbols.imports().count(), 0);
    }

    #[test]
    fn test_unique_names_are_imported() {
        let client = known::http_client();
        let file = file_with(vec![TypeName::class(client.clone())]);
        let symbols = Symbols::resolve(&file);

        assert_eq!(symbols.class(&client), "HttpClient");
        assert_eq!(
            symbols.imports().collect::<Vec<_>>(),
            vec!["io.ktor.client.HttpClient"]
        );
    }

    #[test]
    fn test_default_namespaces_are_not_imported() {
        let string = known::kotlin("String");
        let list = TypeName::generic(known::list(), vec![TypeName::class(string.clone())]);
        let local = ClassName::new("com.example", "Pet");
        let file = file_with(vec![list, TypeName::class(local.clone())]);
        let symbols = Symbols::resolve(&file);

        assert_eq!(symbols.class(&string), "String");
        assert_eq!(symbols.class(&known::list()), "List");
        assert_eq!(symbols.class(&local), "Pet");
        assert_eq!(symbols.imports().count(), 0);
    }

    #[test]
    fn test_jvm_package_needs_an_import() {
        let inline = known::jvm_inline();
        let file = file_with(vec![TypeName::class(inline.clone())]);
        let symbols = Symbols::resolve(&file);
        assert_eq!(symbols.class(&inline), "JvmInline");
        assert_eq!(
            symbols.imports().collect::<Vec<_>>(),
            vec!["kotlin.jvm.JvmInline"]
        );
    }

    #[test]
    fn test_declared_names_shadow_imports() {
        // A model named `String` forces the builtin to be qualified.
        let builtin = known::kotlin("String");
        let model = ClassName::new("com.example", "String");
        let mut file = file_with(vec![TypeName::class(builtin.clone())]);
        file.declarations.push(Declaration::Class(ClassLike::new(
            ClassKind::Class,
            "String",
        )));
        let symbols = Symbols::resolve(&file);
        assert_eq!(symbols.class(&builtin), "kotlin.String");
        assert_eq!(symbols.class(&model), "com.example.String");
    }

    #[test]
    fn test_nested_classes_import_their_top_level() {
        let json = known::content_type().nested("Application");
        let mut code = Code::new();
        code.class(json.clone()).text(".Json");
        let mut property = Property::new("kind", TypeName::class(known::content_type()));
        property.initializer = Some(code);

        let mut file = File::new("Kinds", "com.example");
        file.imports.push("kotlinx.serialization.json.Json".to_string());
        file.declarations.push(Declaration::Property(property));
        let symbols = Symbols::resolve(&file);

        assert_eq!(symbols.class(&json), "ContentType.Application");
        assert_eq!(
            symbols.imports().collect::<Vec<_>>(),
            vec!["io.ktor.http.ContentType", "kotlinx.serialization.json.Json"]
        );
    }

    #[test]
    fn test_members_are_always_imported() {
        let mut code = Code::new();
        code.text("client.").member(known::request()).text(" {}");
        let mut property = Property::new("x", TypeName::class(known::kotlin("Unit")));
        property.initializer = Some(code);
        let mut file = File::new("X", "com.example");
        file.declarations.push(Declaration::Property(property));

        let symbols = Symbols::resolve(&file);
        assert_eq!(
            symbols.imports().collect::<Vec<_>>(),
            vec!["io.ktor.client.request.request"]
        );
        assert_eq!(symbols.member(&known::request()), "request");
    }
}
