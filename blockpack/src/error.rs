use thiserror::Error;

/// The ways a packing run can fail.
///
/// Both variants are terminal: the packer never retries past them, and no
/// partial `MapDefinition` is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// Two input rectangles shared a tag. Detected before any placement work
    /// begins.
    #[error("duplicate rectangle tag \"{tag}\"; all tags must be unique")]
    DuplicateTag { tag: String },

    /// No arrangement was found on any canvas up to `2^max_order` pixels per
    /// axis. Not a bug: the inputs genuinely don't fit within the bound.
    #[error("no suitable canvas found within 2^{max_order} pixels per axis")]
    CanvasExceeded { max_order: u32 },
}
