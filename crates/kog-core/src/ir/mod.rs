pub mod grouping;
pub mod model;
pub mod naming;
pub mod registry;
pub mod route;
pub mod types;

pub use grouping::{ApiGroup, group_routes};
pub use model::*;
pub use naming::NamingContext;
pub use registry::ModelRegistry;
pub use route::*;
pub use types::{ApiInfo, ApiSpec, NormalizedName, TopLevelModel};
