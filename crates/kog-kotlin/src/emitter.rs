use crate::ast::{
    Annotation, Binding, Chunk, ClassKind, ClassLike, Code, Declaration, EnumEntry, File,
    Function, FunctionBody, Modifier, Parameter, Property, TypeAlias, TypeName, TypeParam,
    Visibility, ident,
};
use crate::symbols::Symbols;

const INDENT: &str = "  ";

/// Render a file to source text.
///
/// Output depends only on the declaration tree: the same file always renders
/// to the same bytes.
pub fn emit(file: &File) -> String {
    let symbols = Symbols::resolve(file);
    let mut emitter = Emitter {
        symbols: &symbols,
        out: String::new(),
        depth: 0,
        line_start: true,
    };
    emitter.file(file);
    emitter.out
}

struct Emitter<'a> {
    symbols: &'a Symbols,
    out: String,
    depth: usize,
    line_start: bool,
}

impl Emitter<'_> {
    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.line_start {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.line_start = false;
        }
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.line_start = true;
    }

    fn line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    /// Run `body` one level deeper; the level is restored afterwards.
    fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn file(&mut self, file: &File) {
        if !file.package.is_empty() {
            self.line(&format!("package {}", file.package));
            self.newline();
        }
        let imports: Vec<String> = self.symbols.imports().map(str::to_string).collect();
        if !imports.is_empty() {
            for import in &imports {
                self.line(&format!("import {import}"));
            }
            self.newline();
        }
        for (i, decl) in file.declarations.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.declaration(decl);
        }
    }

    fn declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::TypeAlias(alias) => self.type_alias(alias),
            Declaration::Class(class) => self.class(class),
            Declaration::Function(function) => self.function(function),
            Declaration::Property(property) => self.property(property),
            Declaration::EnumEntry(entry) => self.enum_entry(entry),
        }
    }

    fn doc(&mut self, doc: Option<&str>) {
        let Some(doc) = doc else { return };
        self.line("/**");
        for line in doc.trim().lines() {
            let line = line.trim_end().replace("*/", "*\\/");
            if line.is_empty() {
                self.line(" *");
            } else {
                self.line(&format!(" * {line}"));
            }
        }
        self.line(" */");
    }

    /// Declaration-level annotations, one per line.
    fn annotation_lines(&mut self, annotations: &[Annotation]) {
        for annotation in annotations {
            let text = self.annotation(annotation);
            self.line(&text);
        }
    }

    /// Parameter and entry annotations, space-separated before the name.
    fn annotations_inline(&self, annotations: &[Annotation]) -> String {
        annotations
            .iter()
            .map(|a| format!("{} ", self.annotation(a)))
            .collect()
    }

    fn annotation(&self, annotation: &Annotation) -> String {
        let class = self.symbols.class(&annotation.class);
        if annotation.args.is_empty() {
            format!("@{class}")
        } else {
            let args: Vec<String> = annotation.args.iter().map(|a| self.inline(a)).collect();
            format!("@{class}({})", args.join(", "))
        }
    }

    fn modifiers(visibility: Visibility, modifiers: &[Modifier]) -> String {
        let mut out = String::new();
        if let Some(keyword) = visibility.keyword() {
            out.push_str(keyword);
            out.push(' ');
        }
        for modifier in modifiers {
            out.push_str(modifier.keyword());
            out.push(' ');
        }
        out
    }

    fn type_params(&self, params: &[TypeParam]) -> String {
        if params.is_empty() {
            return String::new();
        }
        let rendered: Vec<String> = params
            .iter()
            // Only the first bound is rendered inline; there is no `where` clause.
            .map(|p| match p.bounds.first() {
                None => p.name.clone(),
                Some(bound) => format!("{}: {}", p.name, self.ty(bound)),
            })
            .collect();
        format!("<{}>", rendered.join(", "))
    }

    fn ty(&self, ty: &TypeName) -> String {
        match ty {
            TypeName::Class {
                name,
                args,
                nullable,
            } => {
                let mut out = self.symbols.class(name);
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(|a| self.ty(a)).collect();
                    out.push_str(&format!("<{}>", args.join(", ")));
                }
                if *nullable {
                    out.push('?');
                }
                out
            }
            TypeName::Lambda {
                receiver,
                params,
                returns,
                nullable,
            } => {
                let params: Vec<String> = params.iter().map(|p| self.ty(p)).collect();
                let receiver = receiver
                    .as_ref()
                    .map(|r| format!("{}.", self.ty(r)))
                    .unwrap_or_default();
                let lambda = format!("{receiver}({}) -> {}", params.join(", "), self.ty(returns));
                if *nullable {
                    format!("({lambda})?")
                } else {
                    lambda
                }
            }
        }
    }

    fn parameter(&self, param: &Parameter) -> String {
        let mut out = self.annotations_inline(&param.annotations);
        out.push_str(&Self::modifiers(param.visibility, &param.modifiers));
        match param.binding {
            Binding::None => {}
            Binding::Val => out.push_str("val "),
            Binding::Var => out.push_str("var "),
        }
        out.push_str(&format!("{}: {}", ident(&param.name), self.ty(&param.ty)));
        if let Some(default) = &param.default {
            out.push_str(" = ");
            out.push_str(&self.inline(default));
        }
        out
    }

    /// Render a fragment that is known to fit on one line.
    fn inline(&self, code: &Code) -> String {
        let mut out = String::new();
        for chunk in code.chunks() {
            match chunk {
                Chunk::Text(text) => out.push_str(text),
                Chunk::Type(ty) => out.push_str(&self.ty(ty)),
                Chunk::Member(member) => out.push_str(&self.symbols.member(member)),
                Chunk::Newline => out.push(' '),
                Chunk::Indent | Chunk::Unindent => {}
            }
        }
        out
    }

    /// Render a multi-line fragment starting at the current position.
    fn code(&mut self, code: &Code) {
        let base = self.depth;
        for chunk in code.chunks() {
            match chunk {
                Chunk::Text(text) => self.write(text),
                Chunk::Type(ty) => {
                    let text = self.ty(ty);
                    self.write(&text);
                }
                Chunk::Member(member) => {
                    let text = self.symbols.member(member);
                    self.write(&text);
                }
                Chunk::Newline => self.newline(),
                Chunk::Indent => self.depth += 1,
                Chunk::Unindent => self.depth = self.depth.saturating_sub(1).max(base),
            }
        }
        self.depth = base;
    }

    fn type_alias(&mut self, alias: &TypeAlias) {
        self.doc(alias.doc.as_deref());
        let modifiers = Self::modifiers(alias.visibility, &[]);
        let type_params = self.type_params(&alias.type_params);
        let target = self.ty(&alias.ty);
        self.line(&format!(
            "{modifiers}typealias {}{type_params} = {target}",
            ident(&alias.name)
        ));
    }

    fn class(&mut self, class: &ClassLike) {
        self.doc(class.doc.as_deref());
        self.annotation_lines(&class.annotations);

        let keyword = match class.kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Singleton => "object",
            ClassKind::Enum => "enum class",
        };
        let mut header = Self::modifiers(class.visibility, &class.modifiers);
        header.push_str(keyword);
        if !class.name.is_empty() {
            header.push(' ');
            header.push_str(&ident(&class.name));
        }
        header.push_str(&self.type_params(&class.type_params));
        self.write(&header);

        if let Some(params) = &class.constructor {
            if params.is_empty() {
                self.write("()");
            } else {
                self.write("(");
                self.newline();
                self.indented(|e| {
                    for param in params {
                        let text = e.parameter(param);
                        e.line(&format!("{text},"));
                    }
                });
                self.write(")");
            }
        }

        if !class.supertypes.is_empty() {
            let supertypes: Vec<String> = class.supertypes.iter().map(|t| self.ty(t)).collect();
            self.write(&format!(" : {}", supertypes.join(", ")));
        }

        if class.members.is_empty() {
            self.newline();
            return;
        }
        self.write(" {");
        self.newline();
        self.indented(|e| e.members(&class.members));
        self.line("}");
    }

    /// Body members: entries back to back, everything else separated by blank lines.
    fn members(&mut self, members: &[Declaration]) {
        let entries = members
            .iter()
            .take_while(|m| matches!(m, Declaration::EnumEntry(_)))
            .count();
        for member in &members[..entries] {
            self.declaration(member);
        }
        let rest = &members[entries..];
        if entries > 0 && !rest.is_empty() {
            self.line(";");
            self.newline();
        }
        for (i, member) in rest.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.declaration(member);
        }
    }

    fn enum_entry(&mut self, entry: &EnumEntry) {
        self.doc(entry.doc.as_deref());
        let annotations = self.annotations_inline(&entry.annotations);
        self.line(&format!("{annotations}{},", ident(&entry.name)));
    }

    fn function(&mut self, function: &Function) {
        self.doc(function.doc.as_deref());
        self.annotation_lines(&function.annotations);

        let mut header = Self::modifiers(function.visibility, &function.modifiers);
        header.push_str("fun ");
        let type_params = self.type_params(&function.type_params);
        if !type_params.is_empty() {
            header.push_str(&type_params);
            header.push(' ');
        }
        if let Some(receiver) = &function.receiver {
            header.push_str(&self.ty(receiver));
            header.push('.');
        }
        header.push_str(&ident(&function.name));
        let params: Vec<String> = function.params.iter().map(|p| self.parameter(p)).collect();
        header.push_str(&format!("({})", params.join(", ")));
        if let Some(returns) = &function.returns {
            header.push_str(&format!(": {}", self.ty(returns)));
        }
        self.write(&header);

        match &function.body {
            None => self.newline(),
            Some(FunctionBody::Expression(code)) => {
                self.write(" = ");
                self.code(code);
                if !self.line_start {
                    self.newline();
                }
            }
            Some(FunctionBody::Block(code)) => {
                self.write(" {");
                self.newline();
                self.indented(|e| e.code(code));
                if !self.line_start {
                    self.newline();
                }
                self.line("}");
            }
        }
    }

    fn property(&mut self, property: &Property) {
        self.doc(property.doc.as_deref());
        self.annotation_lines(&property.annotations);

        let mut header = Self::modifiers(property.visibility, &property.modifiers);
        header.push_str(if property.mutable { "var " } else { "val " });
        header.push_str(&ident(&property.name));
        if let Some(ty) = &property.ty {
            header.push_str(&format!(": {}", self.ty(ty)));
        }
        self.write(&header);
        if let Some(init) = &property.initializer {
            self.write(" = ");
            self.code(init);
        }
        if !self.line_start {
            self.newline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassName, known};

    fn string() -> TypeName {
        TypeName::class(known::kotlin("String"))
    }

    #[test]
    fn test_data_class_with_defaults() {
        let mut class = ClassLike::new(ClassKind::Class, "Pet");
        class.modifiers = vec![Modifier::Data];
        class.annotations = vec![Annotation::new(known::serializable())];
        let mut id = Parameter::new("id", string());
        id.binding = Binding::Val;
        let mut tag = Parameter::new("tag", string().nullable(true)).with_default(Code::of("null"));
        tag.binding = Binding::Val;
        tag.annotations = vec![Annotation::new(known::serial_name()).with_arg(Code::of("\"pet_tag\""))];
        class.constructor = Some(vec![id, tag]);

        let mut file = File::new("Pet", "com.example.model");
        file.declarations.push(Declaration::Class(class));

        assert_eq!(
            emit(&file),
            "package com.example.model

import kotlinx.serialization.SerialName
import kotlinx.serialization.Serializable

@Serializable
data class Pet(
  val id: String,
  @SerialName(\"pet_tag\") val tag: String? = null,
)
"
        );
    }

    #[test]
    fn test_enum_separator_only_when_members_follow() {
        let entry = |name: &str| {
            Declaration::EnumEntry(EnumEntry {
                name: name.to_string(),
                doc: None,
                annotations: vec![],
            })
        };
        let mut plain = ClassLike::new(ClassKind::Enum, "Mode");
        plain.members = vec![entry("Auto"), entry("Manual")];

        let mut with_member = plain.clone();
        with_member.name = "Kind".to_string();
        let mut companion = ClassLike::new(ClassKind::Singleton, "");
        companion.modifiers = vec![Modifier::Companion];
        companion.members = vec![Declaration::Property(Property {
            initializer: Some(Code::of("Auto")),
            ..Property::new("DEFAULT", TypeName::class(ClassName::new("", "Kind")))
        })];
        with_member.members.push(Declaration::Class(companion));

        let mut file = File::new("Modes", "");
        file.declarations = vec![Declaration::Class(plain), Declaration::Class(with_member)];
        assert_eq!(
            emit(&file),
            "enum class Mode {
  Auto,
  Manual,
}

enum class Kind {
  Auto,
  Manual,
  ;

  companion object {
    val DEFAULT: Kind = Auto
  }
}
"
        );
    }

    #[test]
    fn test_function_types_and_bodies() {
        let configure = TypeName::lambda(
            Some(TypeName::class(known::http_request_builder())),
            vec![],
            TypeName::class(known::kotlin("Unit")),
        );
        let callback = TypeName::lambda(None, vec![string(), string()], string()).nullable(true);

        let mut function = Function::new("run");
        function.modifiers = vec![Modifier::Suspend];
        function.params = vec![
            Parameter::new("configure", configure).with_default(Code::of("{}")),
            Parameter::new("callback", callback),
        ];
        let mut body = Code::new();
        body.line("if (callback != null) {")
            .indented(|c| {
                c.line("callback(\"a\", \"b\")");
            })
            .line("}");
        function.body = Some(FunctionBody::Block(body));
        function.doc = Some("Runs it.\n\nNever returns */ early.".to_string());

        let mut file = File::new("Run", "com.example");
        file.declarations.push(Declaration::Function(function));
        assert_eq!(
            emit(&file),
            "package com.example

import io.ktor.client.request.HttpRequestBuilder

/**
 * Runs it.
 *
 * Never returns *\\/ early.
 */
suspend fun run(configure: HttpRequestBuilder.() -> Unit = {}, callback: ((String, String) -> String)?) {
  if (callback != null) {
    callback(\"a\", \"b\")
  }
}
"
        );
    }

    #[test]
    fn test_type_alias_and_generics() {
        let t = TypeName::class(ClassName::new("", "T"));
        let alias = TypeAlias {
            name: "Page".to_string(),
            doc: None,
            visibility: Visibility::Public,
            type_params: vec![TypeParam {
                name: "T".to_string(),
                bounds: vec![TypeName::class(known::kotlin("Any"))],
            }],
            ty: TypeName::generic(known::list(), vec![t]),
        };
        let keyword = TypeAlias {
            name: "object".to_string(),
            doc: None,
            visibility: Visibility::Internal,
            type_params: vec![],
            ty: TypeName::class(known::json_element()),
        };
        let mut file = File::new("Aliases", "com.example");
        file.declarations = vec![Declaration::TypeAlias(alias), Declaration::TypeAlias(keyword)];
        assert_eq!(
            emit(&file),
            "package com.example

import kotlinx.serialization.json.JsonElement

typealias Page<T: Any> = List<T>

internal typealias `object` = JsonElement
"
        );
    }

    #[test]
    fn test_emission_is_deterministic() {
        let mut file = File::new("X", "p");
        file.declarations.push(Declaration::Property(Property::new(
            "client",
            TypeName::class(known::http_client()),
        )));
        assert_eq!(emit(&file), emit(&file.clone()));
    }
}
