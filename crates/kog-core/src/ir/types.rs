use std::fmt;

use serde::Serialize;

use super::grouping::ApiGroup;
use super::model::Model;
use super::naming::NamingContext;
use super::registry::ModelRegistry;

/// Everything one generation run works from: immutable once built.
#[derive(Debug, Clone)]
pub struct ApiSpec {
    pub info: ApiInfo,
    /// Component models, in document order.
    pub models: Vec<TopLevelModel>,
    /// API groups, in order of first appearance in the document.
    pub groups: Vec<ApiGroup>,
    pub registry: ModelRegistry,
}

impl ApiSpec {
    /// Component models followed by every route's inline models.
    pub fn all_models(&self) -> Vec<TopLevelModel> {
        let mut out = self.models.clone();
        for group in &self.groups {
            group.visit_routes(&mut |route| {
                out.extend(route.nested.iter().map(TopLevelModel::inline));
            });
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
}

/// A model bound to the name it is declared under.
///
/// Object, Enum and Union models carry their own context; primitives and
/// collections only get a name when they are declared at the top level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLevelModel {
    pub context: NamingContext,
    pub model: Model,
}

impl TopLevelModel {
    pub fn inline(model: &Model) -> Self {
        let context = model
            .context()
            .cloned()
            .unwrap_or_else(|| NamingContext::named(model.structural_name()));
        TopLevelModel {
            context,
            model: model.clone(),
        }
    }
}

/// A name with the casing variants the generators need pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
