use super::keywords::is_reserved_keyword;

/// Why a class name cannot be rendered as a named export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    ReservedKeyword,
    ContainsDashes,
}

impl InvalidReason {
    /// The warning shown when `name` is skipped for this reason.
    pub fn warning(self, name: &str) -> String {
        match self {
            InvalidReason::ReservedKeyword => format!(
                "[SKIPPING] '{name}' is a reserved keyword (consider renaming or using --export-type default)."
            ),
            InvalidReason::ContainsDashes => format!(
                "[SKIPPING] '{name}' contains dashes (consider using 'camel' or 'dashes' for --name-format or using --export-type default)."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(InvalidReason),
}

/// Check a formatted class name against the binding rules of named exports.
///
/// The keyword check runs before the dash check; the first failure is the
/// reported reason.
pub fn classify(name: &str) -> Validity {
    if is_reserved_keyword(name) {
        Validity::Invalid(InvalidReason::ReservedKeyword)
    } else if name.contains('-') {
        Validity::Invalid(InvalidReason::ContainsDashes)
    } else {
        Validity::Valid
    }
}
