use std::{ffi::OsString, path::{Path, PathBuf}};

use super::options::ExportType;

/// Path of the type definition file generated for `file`.
///
/// `values` replaces a trailing `.less` with `.const.ts`; the other export
/// types append `.d.ts` to the full file name.
pub fn type_definition_path(file: &Path, export_type: ExportType) -> PathBuf {
    let (base, suffix) = match export_type {
        ExportType::Values => (
            file.extension()
                .filter(|ext| *ext == "less")
                .map_or(file.to_path_buf(), |_| file.with_extension("")),
            ".const.ts",
        ),
        ExportType::Named | ExportType::Default => (file.to_path_buf(), ".d.ts"),
    };

    let mut path = OsString::from(base);
    path.push(suffix);
    PathBuf::from(path)
}
