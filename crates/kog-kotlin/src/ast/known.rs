//! Names from the Kotlin standard library, kotlinx.serialization and Ktor.

use super::names::{ClassName, MemberName};

const KOTLIN: &str = "kotlin";
const COLLECTIONS: &str = "kotlin.collections";
const SERIALIZATION: &str = "kotlinx.serialization";
const KTOR_HTTP: &str = "io.ktor.http";
const KTOR_REQUEST: &str = "io.ktor.client.request";

pub fn kotlin(simple: &str) -> ClassName {
    ClassName::new(KOTLIN, simple)
}

pub fn list() -> ClassName {
    ClassName::new(COLLECTIONS, "List")
}

pub fn set() -> ClassName {
    ClassName::new(COLLECTIONS, "Set")
}

pub fn map() -> ClassName {
    ClassName::new(COLLECTIONS, "Map")
}

pub fn json_element() -> ClassName {
    ClassName::new("kotlinx.serialization.json", "JsonElement")
}

pub fn json_class_discriminator() -> ClassName {
    ClassName::new("kotlinx.serialization.json", "JsonClassDiscriminator")
}

pub fn serializable() -> ClassName {
    ClassName::new(SERIALIZATION, "Serializable")
}

pub fn serial_name() -> ClassName {
    ClassName::new(SERIALIZATION, "SerialName")
}

pub fn required() -> ClassName {
    ClassName::new(SERIALIZATION, "Required")
}

pub fn jvm_inline() -> ClassName {
    ClassName::new("kotlin.jvm", "JvmInline")
}

pub fn http_client() -> ClassName {
    ClassName::new("io.ktor.client", "HttpClient")
}

pub fn http_request_builder() -> ClassName {
    ClassName::new(KTOR_REQUEST, "HttpRequestBuilder")
}

pub fn http_response() -> ClassName {
    ClassName::new("io.ktor.client.statement", "HttpResponse")
}

pub fn http_method() -> ClassName {
    ClassName::new(KTOR_HTTP, "HttpMethod")
}

pub fn content_type() -> ClassName {
    ClassName::new(KTOR_HTTP, "ContentType")
}

pub fn multipart_content() -> ClassName {
    ClassName::new("io.ktor.client.request.forms", "MultiPartFormDataContent")
}

pub fn request() -> MemberName {
    MemberName::new(KTOR_REQUEST, "request")
}

pub fn parameter() -> MemberName {
    MemberName::new(KTOR_REQUEST, "parameter")
}

pub fn header() -> MemberName {
    MemberName::new(KTOR_REQUEST, "header")
}

pub fn cookie() -> MemberName {
    MemberName::new(KTOR_REQUEST, "cookie")
}

pub fn set_body() -> MemberName {
    MemberName::new(KTOR_REQUEST, "setBody")
}

pub fn form_data() -> MemberName {
    MemberName::new("io.ktor.client.request.forms", "formData")
}

pub fn path() -> MemberName {
    MemberName::new(KTOR_HTTP, "path")
}

pub fn content_type_of() -> MemberName {
    MemberName::new(KTOR_HTTP, "contentType")
}

pub fn body() -> MemberName {
    MemberName::new("io.ktor.client.call", "body")
}
