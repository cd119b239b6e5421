//! typed-less - TypeScript definitions for LESS class names
//!
//! typed-less is a CLI tool and library that reads LESS stylesheets, collects
//! the class names they define and generates `.d.ts` (or `.const.ts`) files
//! so that importing a stylesheet module is type checked.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`generate`, `init`, watch mode)
//! - `config`: Configuration file loading and parsing
//! - `core`: LESS compilation, class name extraction and type definition rendering
//! - `file_scanner`: Resolution of the file pattern to LESS files

pub mod cli;
pub mod config;
pub mod core;
pub mod file_scanner;
