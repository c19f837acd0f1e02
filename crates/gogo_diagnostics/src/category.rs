//! Closed vocabulary of compiler message categories.

use std::fmt;

/// The category of a diagnostic, taken from the prefix of the compiler message.
///
/// Only an exact, case-sensitive match of a known prefix selects a specific
/// category; every other message falls under [`Category::Error`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    /// `undefined: name`
    Undefined,
    /// `cannot find package: path`
    CannotFindPackage,
    /// `imported and not used: path`
    ImportedAndNotUsed,
    /// `declared but not used: name`
    DeclaredButNotUsed,
    /// `declared and not used: name` (current compiler wording)
    DeclaredAndNotUsed,
    /// `syntax error: ...`
    SyntaxError,
    /// `invalid operation: ...`
    InvalidOperation,
    /// Generic fallback for messages without a known prefix.
    Error,
}

impl Category {
    /// Every category with a recognized message prefix.
    pub const KNOWN: [Category; 7] = [
        Category::Undefined,
        Category::CannotFindPackage,
        Category::ImportedAndNotUsed,
        Category::DeclaredButNotUsed,
        Category::DeclaredAndNotUsed,
        Category::SyntaxError,
        Category::InvalidOperation,
    ];

    /// Returns the category whose token is exactly `token`, if any.
    ///
    /// The generic `error` token is not part of the vocabulary.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::KNOWN.into_iter().find(|c| c.as_str() == token)
    }

    /// Returns the message token for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Undefined => "undefined",
            Category::CannotFindPackage => "cannot find package",
            Category::ImportedAndNotUsed => "imported and not used",
            Category::DeclaredButNotUsed => "declared but not used",
            Category::DeclaredAndNotUsed => "declared and not used",
            Category::SyntaxError => "syntax error",
            Category::InvalidOperation => "invalid operation",
            Category::Error => "error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
