pub mod ast;
pub mod emitter;
pub mod generator;
pub mod lower;
pub mod symbols;
pub mod type_mapper;

pub use generator::KotlinGenerator;
