//! Source location information for extracted GraphQL.

/// Where a tagged literal body sits in the original source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Byte offset of the first character after the opening backtick
    pub offset: usize,
    /// Length in bytes of the literal body
    pub length: usize,
}

impl SourceLocation {
    /// Create a new source location.
    #[must_use]
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Byte offset one past the end of the literal body.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.length
    }
}
