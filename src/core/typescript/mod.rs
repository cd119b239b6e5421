//! Rendering of class names as TypeScript type definitions.

mod keywords;
mod options;
mod path;
mod render;
mod validate;

pub use keywords::is_reserved_keyword;
pub use options::{ExportType, LineEnding, RenderOptions, UnknownExportType, UnknownLineEnding};
pub use path::type_definition_path;
pub use render::{Rendered, TypeDefinitionRenderer};
pub use validate::{InvalidReason, Validity, classify};
