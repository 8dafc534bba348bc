//! Declaration tree for generated Kotlin sources.

pub mod code;
pub mod decl;
pub mod known;
pub mod names;

pub use code::{Chunk, Code};
pub use decl::*;
pub use names::{ClassName, MemberName, TypeName, ident, string_literal};
