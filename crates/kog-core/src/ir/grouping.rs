use serde::Serialize;

use super::naming::NamingContext;
use super::route::Route;
use crate::transform::name_normalizer::{is_path_param, normalize_name};

/// A collection of routes sharing a path prefix, possibly with sub-resources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiGroup {
    /// Local segment name, e.g. `files`.
    pub name: String,
    /// Ancestors outermost-first, then this group.
    pub context: NamingContext,
    pub routes: Vec<Route>,
    pub nested: Vec<ApiGroup>,
}

impl ApiGroup {
    fn new(name: &str, parent: Option<&NamingContext>) -> Self {
        let context = match parent {
            Some(outer) => outer.child(name),
            None => NamingContext::named(name),
        };
        ApiGroup {
            name: name.to_string(),
            context,
            routes: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Concatenation of every ancestor name and this one.
    pub fn flat_name(&self) -> String {
        self.context.flatten()
    }

    /// camelCase accessor name used by the enclosing group.
    pub fn accessor_name(&self) -> String {
        normalize_name(&self.name).camel_case
    }

    /// Visit this group's routes, then every nested group's, depth-first.
    pub fn visit_routes<'a>(&'a self, f: &mut dyn FnMut(&'a Route)) {
        for route in &self.routes {
            f(route);
        }
        for child in &self.nested {
            child.visit_routes(f);
        }
    }

    /// This group followed by every nested group, depth-first.
    pub fn flatten_groups(&self) -> Vec<&ApiGroup> {
        let mut out = vec![self];
        for child in &self.nested {
            out.extend(child.flatten_groups());
        }
        out
    }
}

/// Group routes by the literal segments of their paths.
///
/// `/users/{id}` belongs to `users`; `/users/{id}/posts` to `users` › `posts`.
/// Paths without literal segments land in `default`.
pub fn group_routes(routes: Vec<Route>) -> Vec<ApiGroup> {
    let mut roots: Vec<ApiGroup> = Vec::new();
    for route in routes {
        let segments = literal_segments(&route.path);
        insert(&mut roots, None, &segments, route);
    }
    roots
}

fn insert(
    groups: &mut Vec<ApiGroup>,
    parent: Option<&NamingContext>,
    segments: &[String],
    route: Route,
) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };
    let idx = match groups.iter().position(|g| &g.name == head) {
        Some(idx) => idx,
        None => {
            groups.push(ApiGroup::new(head, parent));
            groups.len() - 1
        }
    };
    let group = &mut groups[idx];
    if rest.is_empty() {
        group.routes.push(route);
    } else {
        let context = group.context.clone();
        insert(&mut group.nested, Some(&context), rest, route);
    }
}

/// Non-parameter path segments; `["default"]` when there are none.
fn literal_segments(path: &str) -> Vec<String> {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty() && !is_path_param(s))
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        vec!["default".to_string()]
    } else {
        segments
    }
}
