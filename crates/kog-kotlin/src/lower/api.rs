use std::collections::HashSet;

use kog_core::GenerateError;
use kog_core::ir::{
    ApiGroup, Body, HttpMethod, Input, InputLocation, Model, Multipart, Primitive, Property, Route,
};
use kog_core::transform::name_normalizer::normalize_name;

use crate::ast::{
    Binding, ClassKind, ClassLike, ClassName, Code, Declaration, File, Function, FunctionBody,
    Modifier, Parameter, Property as KotlinProperty, TypeName, Visibility, ident, known,
    string_literal,
};
use crate::type_mapper::TypeMapper;

/// Lowers API groups into an interface, a factory function and a private
/// Ktor-backed implementation per group.
pub struct ApiLowering<'a> {
    types: &'a TypeMapper<'a>,
    package: String,
}

/// One interface member and its override in the implementation.
struct Member {
    declared: Declaration,
    implemented: Declaration,
}

/// What a route's body parameters add to the signature and the request block.
#[derive(Default)]
struct Payload {
    params: Vec<Parameter>,
    code: Code,
}

enum Returned {
    Nothing,
    Decoded(TypeName),
    /// The raw `HttpResponse`, left for the caller to decode.
    Raw,
}

impl<'a> ApiLowering<'a> {
    pub fn new(types: &'a TypeMapper<'a>, package: impl Into<String>) -> Self {
        ApiLowering {
            types,
            package: package.into(),
        }
    }

    /// The file for one group. Nested groups get their own files.
    pub fn group(&self, group: &ApiGroup) -> Result<File, GenerateError> {
        let mut members: Vec<Member> = group.nested.iter().map(|g| self.accessor(g)).collect();
        for route in &group.routes {
            members.push(self.endpoint(route)?);
        }
        log::debug!(
            "lowered group {} with {} routes",
            group.flat_name(),
            group.routes.len()
        );
        Ok(self.file(&group.flat_name(), members))
    }

    /// The aggregator exposing every top-level group plus `close()`.
    pub fn root(&self, name: &str, groups: &[ApiGroup]) -> File {
        let mut members: Vec<Member> = groups.iter().map(|g| self.accessor(g)).collect();

        let mut close = Code::new();
        close.line("client.close()");
        members.push(Member {
            declared: Declaration::Function(Function::new("close")),
            implemented: Declaration::Function(Function {
                modifiers: vec![Modifier::Override],
                body: Some(FunctionBody::Block(close)),
                ..Function::new("close")
            }),
        });
        self.file(name, members)
    }

    fn file(&self, name: &str, members: Vec<Member>) -> File {
        let interface_type = TypeName::class(ClassName::new(&self.package, name));
        let implementation = format!("{name}Ktor");
        let (declared, implemented): (Vec<_>, Vec<_>) = members
            .into_iter()
            .map(|m| (m.declared, m.implemented))
            .unzip();

        let mut interface = ClassLike::new(ClassKind::Interface, name);
        interface.members = declared;

        let factory = Function {
            params: vec![Parameter::new("client", TypeName::class(known::http_client()))],
            returns: Some(interface_type.clone()),
            body: Some(FunctionBody::Expression(Code::of(format!(
                "{implementation}(client)"
            )))),
            ..Function::new(name)
        };

        let mut client = Parameter::new("client", TypeName::class(known::http_client()));
        client.visibility = Visibility::Private;
        client.binding = Binding::Val;
        let mut class = ClassLike::new(ClassKind::Class, implementation);
        class.visibility = Visibility::Private;
        class.constructor = Some(vec![client]);
        class.supertypes = vec![interface_type];
        class.members = implemented;

        let mut file = File::new(name, &self.package);
        file.declarations = vec![
            Declaration::Class(interface),
            Declaration::Function(factory),
            Declaration::Class(class),
        ];
        file
    }

    fn accessor(&self, group: &ApiGroup) -> Member {
        let flat = group.flat_name();
        let ty = TypeName::class(ClassName::new(&self.package, &flat));
        let name = group.accessor_name();
        Member {
            declared: Declaration::Property(KotlinProperty::new(&name, ty.clone())),
            implemented: Declaration::Property(KotlinProperty {
                modifiers: vec![Modifier::Override],
                initializer: Some(Code::of(format!("{flat}(client)"))),
                ..KotlinProperty::new(&name, ty)
            }),
        }
    }

    fn endpoint(&self, route: &Route) -> Result<Member, GenerateError> {
        let mut params: Vec<Parameter> = route.input.iter().map(|i| self.input(i)).collect();
        let payload = self.payload(route)?;
        params.extend(payload.params);
        params.push(
            Parameter::new(
                "configure",
                TypeName::lambda(
                    Some(TypeName::class(known::http_request_builder())),
                    vec![],
                    TypeName::class(known::kotlin("Unit")),
                ),
            )
            .with_default(Code::of("{}")),
        );
        let mut seen = HashSet::new();
        if let Some(clash) = params.iter().find(|p| !seen.insert(p.name.as_str())) {
            return Err(GenerateError::unsupported(
                &route.function_name,
                format!("two parameters named `{}`", clash.name),
            ));
        }

        let returned = self.returned(route);
        let returns = match &returned {
            Returned::Nothing => None,
            Returned::Decoded(ty) => Some(ty.clone()),
            Returned::Raw => Some(TypeName::class(known::http_response())),
        };

        let url = self.url(route)?;
        let mut inputs = Code::new();
        for input in &route.input {
            self.attach(input, &mut inputs);
        }

        let mut body = Code::new();
        if !matches!(returned, Returned::Nothing) {
            body.text("return ");
        }
        body.text("client.")
            .member(known::request())
            .line(" {")
            .indented(|c| {
                c.text("method = ").append(method(route.method)).newline();
                c.append(url).append(inputs).append(payload.code);
                c.line("configure()");
            })
            .text("}");
        if let Returned::Decoded(_) = returned {
            body.text(".").member(known::body()).text("()");
        }
        body.newline();

        // Defaults only belong on the interface; overrides may not redeclare them.
        let overridden = params
            .iter()
            .cloned()
            .map(|p| Parameter { default: None, ..p })
            .collect();
        Ok(Member {
            declared: Declaration::Function(Function {
                doc: route_doc(route),
                modifiers: vec![Modifier::Suspend],
                params,
                returns: returns.clone(),
                ..Function::new(&route.function_name)
            }),
            implemented: Declaration::Function(Function {
                modifiers: vec![Modifier::Override, Modifier::Suspend],
                params: overridden,
                returns,
                body: Some(FunctionBody::Block(body)),
                ..Function::new(&route.function_name)
            }),
        })
    }

    fn input(&self, input: &Input) -> Parameter {
        let ty = self.types.type_of(&input.model).nullable(!input.is_required);
        let param = Parameter::new(param_name(&input.name), ty);
        if input.is_required {
            param
        } else {
            param.with_default(Code::of("null"))
        }
    }

    /// The request-builder call that sends one input. Path inputs go through the URL.
    fn attach(&self, input: &Input, code: &mut Code) {
        let name = ident(&param_name(&input.name));
        let key = string_literal(&input.name);
        match input.location {
            InputLocation::Path => {}
            InputLocation::Query => {
                code.member(known::parameter())
                    .line(format!("({key}, {name})"));
            }
            InputLocation::Header => {
                code.member(known::header()).line(format!("({key}, {name})"));
            }
            InputLocation::Cookie => {
                let string = self.is_string(&input.model);
                if input.is_required {
                    let value = if string {
                        name.clone()
                    } else {
                        format!("{name}.toString()")
                    };
                    code.member(known::cookie())
                        .line(format!("({key}, {value})"));
                } else {
                    let value = if string { "it" } else { "it.toString()" };
                    code.text(format!("{name}?.let {{ "))
                        .member(known::cookie())
                        .line(format!("({key}, {value}) }}"));
                }
            }
        }
    }

    fn payload(&self, route: &Route) -> Result<Payload, GenerateError> {
        let mut bodies = route.body.types.iter();
        let Some((content_type, body)) = bodies.next() else {
            return Ok(Payload::default());
        };
        if bodies.next().is_some() {
            return Err(GenerateError::unsupported(
                &route.function_name,
                "several request body content types",
            ));
        }

        let required = route.body.required;
        let payload = match body {
            Body::Json(model) => Payload {
                params: vec![body_param(self.types.type_of(model), required)],
                code: send_body("Json", required),
            },
            Body::OctetStream => Payload {
                params: vec![body_param(
                    TypeName::class(known::kotlin("ByteArray")),
                    required,
                )],
                code: send_body("OctetStream", required),
            },
            Body::Multipart(Multipart::Parameters(fields)) => {
                let params = fields
                    .iter()
                    .map(|field| {
                        let nullable = is_optional(field);
                        let param = Parameter::new(
                            param_name(&field.base_name),
                            self.types.type_of(&field.model).nullable(nullable),
                        );
                        if nullable {
                            param.with_default(Code::of("null"))
                        } else {
                            param
                        }
                    })
                    .collect();
                Payload {
                    params,
                    code: self.form(fields, ""),
                }
            }
            Body::Multipart(Multipart::ObjectRef { model, properties }) => {
                let form = self.form(properties, "body.");
                Payload {
                    params: vec![body_param(self.types.type_of(model), required)],
                    code: if required { form } else { when_present("body", form) },
                }
            }
            Body::Xml => {
                return Err(GenerateError::unsupported(
                    &route.function_name,
                    format!("request body of type {content_type}"),
                ));
            }
        };
        Ok(payload)
    }

    /// `setBody(MultiPartFormDataContent(formData { ... }))`, one `append` per field.
    fn form(&self, fields: &[Property], receiver: &str) -> Code {
        let mut appends = Code::new();
        for field in fields {
            let key = string_literal(&field.base_name);
            let value = format!("{receiver}{}", ident(&param_name(&field.base_name)));
            let direct = self.is_form_value(&field.model);
            if is_optional(field) {
                let it = if direct { "it" } else { "it.toString()" };
                appends.line(format!("{value}?.let {{ append({key}, {it}) }}"));
            } else if direct {
                appends.line(format!("append({key}, {value})"));
            } else {
                appends.line(format!("append({key}, {value}.toString())"));
            }
        }

        let mut code = Code::new();
        code.member(known::set_body())
            .line("(")
            .indented(|c| {
                c.class(known::multipart_content())
                    .line("(")
                    .indented(|c| {
                        c.member(known::form_data())
                            .line(" {")
                            .indented(|c| {
                                c.append(appends);
                            })
                            .line("}");
                    })
                    .line(")");
            })
            .line(")");
        code
    }

    fn url(&self, route: &Route) -> Result<Code, GenerateError> {
        let segments = route
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| self.segment(s, route))
            .collect::<Result<Vec<_>, _>>()?;

        let mut code = Code::new();
        if segments.is_empty() {
            return Ok(code);
        }
        code.line("url {")
            .indented(|c| {
                c.member(known::path())
                    .line(format!("({})", segments.join(", ")));
            })
            .line("}");
        Ok(code)
    }

    /// A Kotlin `String` expression for one path segment.
    fn segment(&self, segment: &str, route: &Route) -> Result<String, GenerateError> {
        let pieces = pieces(segment);
        if let [Piece::Param(name)] = pieces.as_slice() {
            let input = path_input(route, name)?;
            let value = ident(&param_name(&input.name));
            return Ok(if self.is_string(&input.model) {
                value
            } else {
                format!("{value}.toString()")
            });
        }
        if pieces.iter().all(|p| matches!(p, Piece::Literal(_))) {
            return Ok(string_literal(segment));
        }

        let mut template = String::from("\"");
        for piece in pieces {
            match piece {
                Piece::Literal(text) => {
                    let quoted = string_literal(text);
                    template.push_str(&quoted[1..quoted.len() - 1]);
                }
                Piece::Param(name) => {
                    let input = path_input(route, name)?;
                    template.push_str(&format!("${{{}}}", ident(&param_name(&input.name))));
                }
            }
        }
        template.push('"');
        Ok(template)
    }

    fn returned(&self, route: &Route) -> Returned {
        if route.return_type.types.is_empty() {
            return Returned::Nothing;
        }
        match route.return_type.single() {
            None => Returned::Raw,
            Some(Model::OctetStream) => Returned::Raw,
            Some(Model::Primitive {
                primitive: Primitive::Unit,
            }) => Returned::Nothing,
            Some(model) => Returned::Decoded(self.types.type_of(model)),
        }
    }

    fn is_string(&self, model: &Model) -> bool {
        self.types.type_of(model).class_name() == Some(&known::kotlin("String"))
    }

    /// Types `FormBuilder.append` accepts without conversion.
    fn is_form_value(&self, model: &Model) -> bool {
        let ty = self.types.type_of(model);
        ["String", "Int", "Double", "ByteArray"]
            .iter()
            .any(|simple| ty.class_name() == Some(&known::kotlin(simple)))
    }
}

fn param_name(name: &str) -> String {
    normalize_name(name).camel_case
}

fn is_optional(field: &Property) -> bool {
    field.is_nullable || !field.is_required
}

fn body_param(ty: TypeName, required: bool) -> Parameter {
    let param = Parameter::new("body", ty.nullable(!required));
    if required {
        param
    } else {
        param.with_default(Code::of("null"))
    }
}

/// `contentType(ContentType.Application.<kind>)` followed by `setBody(body)`.
fn send_body(kind: &str, required: bool) -> Code {
    let mut code = Code::new();
    code.member(known::content_type_of())
        .text("(")
        .class(known::content_type().nested("Application"))
        .line(format!(".{kind})"));
    code.member(known::set_body()).line("(body)");
    if required {
        code
    } else {
        when_present("body", code)
    }
}

fn when_present(name: &str, inner: Code) -> Code {
    let mut code = Code::new();
    code.line(format!("if ({name} != null) {{"))
        .indented(|c| {
            c.append(inner);
        })
        .line("}");
    code
}

fn method(method: HttpMethod) -> Code {
    let companion = match method {
        HttpMethod::Get => Some("Get"),
        HttpMethod::Post => Some("Post"),
        HttpMethod::Put => Some("Put"),
        HttpMethod::Delete => Some("Delete"),
        HttpMethod::Patch => Some("Patch"),
        HttpMethod::Options => Some("Options"),
        HttpMethod::Head => Some("Head"),
        HttpMethod::Trace => None,
    };
    let mut code = Code::new();
    code.class(known::http_method());
    match companion {
        Some(name) => code.text(format!(".{name}")),
        None => code.text(format!("({})", string_literal(method.as_str()))),
    };
    code
}

fn route_doc(route: &Route) -> Option<String> {
    let mut lines: Vec<String> = route.summary.iter().map(|s| s.trim().to_string()).collect();
    let params: Vec<String> = route
        .input
        .iter()
        .filter_map(|input| {
            let description = input.description.as_deref()?.trim();
            Some(format!("@param {} {description}", param_name(&input.name)))
        })
        .collect();
    if !params.is_empty() && !lines.is_empty() {
        lines.push(String::new());
    }
    lines.extend(params);
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn path_input<'r>(route: &'r Route, name: &str) -> Result<&'r Input, GenerateError> {
    route
        .input
        .iter()
        .find(|i| i.location == InputLocation::Path && i.name == name)
        .ok_or_else(|| {
            GenerateError::unsupported(
                &route.function_name,
                format!("undeclared path parameter `{name}`"),
            )
        })
}

enum Piece<'s> {
    Literal(&'s str),
    Param(&'s str),
}

/// Split `{id}.json` into its parameter and literal parts.
fn pieces(segment: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        if open > 0 {
            out.push(Piece::Literal(&rest[..open]));
        }
        out.push(Piece::Param(&rest[open + 1..open + close]));
        rest = &rest[open + close + 1..];
    }
    if !rest.is_empty() {
        out.push(Piece::Literal(rest));
    }
    out
}
