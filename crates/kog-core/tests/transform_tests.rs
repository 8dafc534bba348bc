use kog_core::config::NamingStrategy;
use kog_core::ir::{
    Body, Collection, Enum, InputLocation, Model, Multipart, NamingContext, Primitive,
};
use kog_core::parse;
use kog_core::transform::{self, TransformOptions};
use kog_core::GenerateError;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const ASSISTANTS: &str = include_str!("fixtures/assistants.yaml");

fn route<'a>(api: &'a kog_core::ir::ApiSpec, name: &str) -> &'a kog_core::ir::Route {
    let mut found = None;
    for group in &api.groups {
        group.visit_routes(&mut |r| {
            if r.function_name == name {
                found = Some(r);
            }
        });
    }
    found.unwrap_or_else(|| panic!("no route named {name}"))
}

#[test]
fn transform_petstore_models() {
    let doc = parse::from_yaml(PETSTORE).unwrap();
    let api = transform::transform(&doc).unwrap();

    assert_eq!(api.info.title, "Petstore");
    let names: Vec<String> = api.models.iter().map(|m| m.context.flatten()).collect();
    assert_eq!(names, vec!["Pet", "PetAlias", "Pets"]);

    let Model::Object(pet) = &api.models[0].model else {
        panic!("Pet should be an object");
    };
    let props: Vec<&str> = pet.properties.iter().map(|p| p.base_name.as_str()).collect();
    assert_eq!(props, vec!["id", "name", "status", "tags", "owner"]);
    assert!(pet.properties[0].is_required);
    assert!(!pet.properties[2].is_required);
    assert_eq!(
        pet.properties[2].default,
        Some(serde_json::Value::String("available".into()))
    );
    assert!(matches!(
        &pet.properties[3].model,
        Model::Collection {
            collection: Collection::Set(_)
        }
    ));

    let Model::Object(owner) = &pet.properties[4].model else {
        panic!("owner should be an inline object");
    };
    assert_eq!(owner.context.flatten(), "PetOwner");
    assert!(owner.properties[0].is_nullable);

    assert!(matches!(&api.models[1].model, Model::Reference { context } if context.flatten() == "Pet"));
}

#[test]
fn transform_petstore_registry() {
    let doc = parse::from_yaml(PETSTORE).unwrap();
    let api = transform::transform(&doc).unwrap();

    let names: Vec<&str> = api.registry.names().collect();
    assert_eq!(
        names,
        vec![
            "Pet",
            "PetStatus",
            "PetOwner",
            "PetAlias",
            "ListPetsStatus",
            "CreatePetRequest"
        ]
    );
    // Collections are never registered, even at the top level.
    assert!(api.registry.get("Pets").is_none());

    let alias = api.registry.get("PetAlias").unwrap();
    assert!(matches!(api.registry.resolve(alias), Model::Object(_)));
}

#[test]
fn transform_petstore_routes() {
    let doc = parse::from_yaml(PETSTORE).unwrap();
    let api = transform::transform(&doc).unwrap();

    assert_eq!(api.groups.len(), 1);
    let pets = &api.groups[0];
    assert_eq!(pets.flat_name(), "Pets");
    let functions: Vec<&str> = pets.routes.iter().map(|r| r.function_name.as_str()).collect();
    assert_eq!(functions, vec!["listPets", "createPet", "showPetById", "deletePet"]);
    assert_eq!(pets.nested[0].flat_name(), "PetsPhoto");

    let list = route(&api, "listPets");
    assert_eq!(list.input.len(), 2);
    assert_eq!(list.input[0].location, InputLocation::Query);
    assert!(!list.input[0].is_required);
    assert!(matches!(&list.input[1].model, Model::Enum(e) if e.context().flatten() == "ListPetsStatus"));
    assert_eq!(list.nested.len(), 1);

    let create = route(&api, "createPet");
    assert!(create.body.required);
    match create.body.types.get("application/json") {
        Some(Body::Json(Model::Object(o))) => assert_eq!(o.context.flatten(), "CreatePetRequest"),
        other => panic!("unexpected body {other:?}"),
    }
    assert!(matches!(
        create.return_type.single(),
        Some(Model::Reference { context }) if context.flatten() == "Pet"
    ));

    // Path-level parameters are inherited and always required.
    let show = route(&api, "showPetById");
    assert_eq!(show.input[0].name, "petId");
    assert_eq!(show.input[0].location, InputLocation::Path);
    assert!(show.input[0].is_required);
    assert_eq!(show.input[0].model, Model::primitive(Primitive::Int));

    let delete = route(&api, "deletePet");
    assert_eq!(delete.operation_id, None);
    assert_eq!(
        delete.return_type.single(),
        Some(&Model::primitive(Primitive::Unit))
    );
}

#[test]
fn transform_multipart_upload() {
    let doc = parse::from_yaml(PETSTORE).unwrap();
    let api = transform::transform(&doc).unwrap();

    let upload = route(&api, "uploadPetPhoto");
    // The operation repeats the path parameter; it is not duplicated.
    assert_eq!(upload.input.len(), 1);
    match upload.body.types.get("multipart/form-data") {
        Some(Body::Multipart(Multipart::Parameters(fields))) => {
            assert_eq!(fields[0].base_name, "file");
            assert_eq!(fields[0].model, Model::OctetStream);
            assert!(fields[0].is_required);
            assert_eq!(fields[1].base_name, "caption");
        }
        other => panic!("unexpected body {other:?}"),
    }
    assert_eq!(upload.return_type.single(), Some(&Model::OctetStream));
    assert!(upload.nested.is_empty());
}

#[test]
fn transform_assistants() {
    let doc = parse::from_yaml(ASSISTANTS).unwrap();
    let api = transform::transform(&doc).unwrap();

    let Model::Object(assistant) = &api.models[0].model else {
        panic!("Assistant should be an object");
    };
    match &assistant.properties[1].model {
        Model::Enum(e @ Enum::Open { .. }) => {
            assert_eq!(e.context().flatten(), "AssistantModel");
            assert_eq!(e.values(), ["gpt-4o", "gpt-4o-mini"]);
        }
        other => panic!("expected open enum, got {other:?}"),
    }
    assert_eq!(
        assistant.properties[2].model,
        Model::map(Model::primitive(Primitive::String))
    );

    let Model::Object(run) = &api.models[2].model else {
        panic!("Run should be an object");
    };
    assert!(run.properties[1].is_nullable);
    assert_eq!(run.properties[1].model, Model::primitive(Primitive::String));

    let assistants = &api.groups[0];
    assert_eq!(assistants.nested[0].flat_name(), "AssistantsFiles");
    assert_eq!(api.groups[1].nested[0].flat_name(), "ThreadsRuns");

    let files = route(&api, "listAssistantFiles");
    let nested: Vec<String> = files
        .nested
        .iter()
        .filter_map(|m| m.context().map(NamingContext::flatten))
        .collect();
    assert_eq!(nested, vec!["ListAssistantFilesOrder", "ListAssistantFilesResponse"]);
}

#[test]
fn transform_union_case_names() {
    let doc = parse::from_yaml(ASSISTANTS).unwrap();
    let api = transform::transform(&doc).unwrap();

    let Some(Model::Union(union)) = api.registry.get("CreateRunRequestToolChoice") else {
        panic!("tool_choice should be a registered union");
    };
    let cases: Vec<String> = union.cases.iter().map(|c| c.context.flatten()).collect();
    assert_eq!(cases, vec!["String", "ToolChoice"]);
}

#[test]
fn transform_route_based_names_and_aliases() {
    let doc = parse::from_yaml(PETSTORE).unwrap();
    let mut options = TransformOptions {
        naming_strategy: NamingStrategy::UseRouteBased,
        ..TransformOptions::default()
    };
    options
        .aliases
        .insert("getPet".to_string(), "fetchPet".to_string());
    let api = transform::transform_with_options(&doc, &options).unwrap();

    let functions: Vec<&str> = api.groups[0]
        .routes
        .iter()
        .map(|r| r.function_name.as_str())
        .collect();
    assert_eq!(functions, vec!["listPets", "createPets", "fetchPet", "deletePet"]);
}

#[test]
fn transform_inline_body_without_operation_id_fails() {
    let doc = parse::from_yaml(
        r#"
openapi: "3.0.0"
info: { title: T, version: "1" }
paths:
  /users:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                name: { type: string }
      responses:
        "204": { description: ok }
"#,
    )
    .unwrap();
    let err = transform::transform(&doc).unwrap_err();
    assert!(
        matches!(&err, GenerateError::MissingOperationId { method, path, .. } if method == "POST" && path == "/users"),
        "got {err}"
    );
}

#[test]
fn transform_anonymous_primitive_body_needs_no_operation_id() {
    let doc = parse::from_yaml(
        r#"
openapi: "3.0.0"
info: { title: T, version: "1" }
paths:
  /ping:
    post:
      requestBody:
        content:
          application/json:
            schema: { type: string }
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { type: array, items: { type: integer } }
"#,
    )
    .unwrap();
    let api = transform::transform(&doc).unwrap();
    let ping = route(&api, "createPing");
    assert_eq!(
        ping.return_type.single(),
        Some(&Model::list(Model::primitive(Primitive::Int)))
    );
}

#[test]
fn transform_multipart_non_object_ref_fails() {
    let doc = parse::from_yaml(
        r##"
openapi: "3.0.0"
info: { title: T, version: "1" }
paths:
  /files:
    post:
      operationId: upload
      requestBody:
        content:
          multipart/form-data:
            schema: { $ref: "#/components/schemas/Blob" }
      responses:
        "204": { description: ok }
components:
  schemas:
    Blob: { type: string, format: binary }
"##,
    )
    .unwrap();
    let err = transform::transform(&doc).unwrap_err();
    assert!(matches!(err, GenerateError::UnsupportedSchemaConstruct { .. }), "got {err}");
}

#[test]
fn transform_multiple_response_formats_fails() {
    let doc = parse::from_yaml(
        r#"
openapi: "3.0.0"
info: { title: T, version: "1" }
paths:
  /report:
    get:
      operationId: getReport
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { type: string }
            text/csv:
              schema: { type: string }
"#,
    )
    .unwrap();
    let err = transform::transform(&doc).unwrap_err();
    assert!(
        matches!(&err, GenerateError::MultipleResponseFormatsUnsupported { operation, status } if operation == "getReport" && status == "200")
    );
}

#[test]
fn transform_error_statuses_keep_one_format() {
    let doc = parse::from_yaml(
        r##"
openapi: "3.0.0"
info: { title: T, version: "1" }
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { type: array, items: { type: string } }
        "400":
          description: bad request
          content:
            text/plain:
              schema: { type: string }
            application/json:
              schema: { $ref: "#/components/schemas/Error" }
        default:
          description: unexpected
          content:
            application/octet-stream: {}
            text/plain:
              schema: { type: string }
components:
  schemas:
    Error:
      type: object
      properties:
        message: { type: string }
"##,
    )
    .unwrap();
    let api = transform::transform(&doc).unwrap();
    let types = &route(&api, "listPets").return_type.types;

    let statuses: Vec<&str> = types.keys().map(String::as_str).collect();
    assert_eq!(statuses, vec!["200", "400", "default"]);
    assert_eq!(types["400"], Model::reference(NamingContext::named("Error")));
    assert_eq!(types["default"], Model::OctetStream);
}

#[test]
fn transform_success_range_with_several_formats_fails() {
    let doc = parse::from_yaml(
        r#"
openapi: "3.0.0"
info: { title: T, version: "1" }
paths:
  /report:
    get:
      operationId: getReport
      responses:
        "2XX":
          description: ok
          content:
            application/json:
              schema: { type: string }
            text/plain:
              schema: { type: string }
"#,
    )
    .unwrap();
    let err = transform::transform(&doc).unwrap_err();
    assert!(
        matches!(&err, GenerateError::MultipleResponseFormatsUnsupported { status, .. } if status == "2XX"),
        "got {err}"
    );
}

#[test]
fn transform_colliding_inline_names_fail() {
    let doc = parse::from_yaml(
        r#"
openapi: "3.0.0"
info: { title: T, version: "1" }
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        owner:
          type: object
          properties:
            name: { type: string }
    PetOwner:
      type: object
      properties:
        id: { type: integer }
"#,
    )
    .unwrap();
    let err = transform::transform(&doc).unwrap_err();
    assert!(matches!(err, GenerateError::RegistryNameCollision(name) if name == "PetOwner"));
}
