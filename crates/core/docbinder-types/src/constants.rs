//! Field limits and storage constants.

/// Maximum title length (characters).
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum length of the free-text external authors field.
pub const MAX_EXTERNAL_AUTHORS_LEN: usize = 255;

/// Maximum length of a document type or program name.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a hyperlink.
pub const MAX_HYPERLINK_LEN: usize = 200;

/// Storage prefix under which uploaded files are kept.
pub const DOCUMENTS_PREFIX: &str = "documents";

/// Group whose members only see documents of their own program.
pub const GUEST_GROUP: &str = "Guest";
