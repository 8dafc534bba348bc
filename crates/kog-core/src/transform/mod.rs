pub mod interceptor;
pub mod model_builder;
pub mod name_normalizer;
pub mod route_builder;
pub mod spec_to_ir;

pub use interceptor::Interceptor;
pub use spec_to_ir::{TransformOptions, transform, transform_with_options};
