//! Core pipeline: LESS file → class names → TypeScript definitions.

pub mod class_names;
pub mod less;
pub mod reporter;
pub mod typescript;
