use indexmap::IndexMap;

use crate::config::{NamingConfig, NamingStrategy};
use crate::error::GenerateError;
use crate::ir::{ApiInfo, ApiSpec, ModelRegistry, TopLevelModel, group_routes};
use crate::parse::document::Document;

use super::interceptor::Interceptor;
use super::model_builder::ModelBuilder;
use super::route_builder::RouteBuilder;

/// Options controlling how the transform phase names and rewrites things.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub naming_strategy: NamingStrategy,
    pub aliases: IndexMap<String, String>,
    pub interceptor: Interceptor,
}

impl From<&NamingConfig> for TransformOptions {
    fn from(naming: &NamingConfig) -> Self {
        TransformOptions {
            naming_strategy: naming.strategy,
            aliases: naming.aliases.clone(),
            interceptor: Interceptor::default(),
        }
    }
}

/// Transform a parsed document into the resolved API with default options.
pub fn transform(document: &Document) -> Result<ApiSpec, GenerateError> {
    transform_with_options(document, &TransformOptions::default())
}

/// Transform with explicit naming options and hooks.
pub fn transform_with_options(
    document: &Document,
    options: &TransformOptions,
) -> Result<ApiSpec, GenerateError> {
    // Phase 1: component schemas
    let builder = ModelBuilder::new(&document.components.schemas, &options.interceptor);
    let models = builder.components()?;

    // Phase 2: operations, each with its own inline models
    let routes = RouteBuilder::new(&builder, options);
    let routes = document
        .operations()?
        .iter()
        .map(|entry| routes.build(entry))
        .collect::<Result<Vec<_>, _>>()?;

    // Phase 3: groups by literal path segments
    let groups = group_routes(routes);

    let mut api = ApiSpec {
        info: ApiInfo {
            title: document.info.title.clone(),
            version: document.info.version.clone(),
        },
        models,
        groups,
        registry: ModelRegistry::default(),
    };

    // Phase 4: index every declared model once the whole document is resolved
    let all: Vec<TopLevelModel> = api.all_models();
    api.registry = ModelRegistry::from_models(&all)?;

    log::info!(
        "resolved {} component models, {} groups, {} registered names",
        api.models.len(),
        api.groups.len(),
        api.registry.len()
    );
    Ok(api)
}
