//! Model-level validation of a cleaned document.

use url::Url;

use docbinder_types::{MAX_EXTERNAL_AUTHORS_LEN, MAX_HYPERLINK_LEN, MAX_TITLE_LEN};

use crate::error::{fields, FormErrors, ValidationResult, REQUIRED};
use crate::form::DocumentDraft;

/// Message when a document has neither a file nor a hyperlink.
pub const MISSING_FILE_OR_LINK: &str = "You must either attach a file or provide a hyperlink";

/// Message when a document has both a file and a hyperlink.
pub const BOTH_FILE_AND_LINK: &str = "Please either attach a file or provide a hyperlink, not both";

fn too_long(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

/// Whether `link` is an absolute http(s) URL with a host.
pub fn is_valid_hyperlink(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Validate a draft.
///
/// Checks:
/// - exactly one of file and hyperlink is present
/// - title is present and at most 255 characters
/// - external authors are at most 255 characters
/// - the hyperlink, if any, is an absolute http(s) URL
/// - a document type is selected
pub fn validate_document(draft: &DocumentDraft) -> ValidationResult<()> {
    let mut errors = FormErrors::new();

    match (draft.attachment.is_present(), draft.hyperlink.is_some()) {
        (false, false) => errors.add_non_field(MISSING_FILE_OR_LINK),
        (true, true) => errors.add_non_field(BOTH_FILE_AND_LINK),
        _ => {}
    }

    let title_len = draft.title.chars().count();
    if title_len == 0 {
        errors.add_field(fields::TITLE, REQUIRED);
    } else if title_len > MAX_TITLE_LEN {
        errors.add_field(fields::TITLE, too_long(MAX_TITLE_LEN, title_len));
    }

    let external_len = draft.external_authors.chars().count();
    if external_len > MAX_EXTERNAL_AUTHORS_LEN {
        errors.add_field(
            fields::EXTERNAL_AUTHORS,
            too_long(MAX_EXTERNAL_AUTHORS_LEN, external_len),
        );
    }

    if let Some(link) = &draft.hyperlink {
        let link_len = link.chars().count();
        if link_len > MAX_HYPERLINK_LEN {
            errors.add_field(fields::HYPERLINK, too_long(MAX_HYPERLINK_LEN, link_len));
        } else if !is_valid_hyperlink(link) {
            errors.add_field(fields::HYPERLINK, "Enter a valid URL.");
        }
    }

    if draft.document_type.is_none() {
        errors.add_field(fields::DOCUMENT_TYPE, REQUIRED);
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Attachment;
    use docbinder_types::{
        DocumentState, DocumentTypeId, FileUpload, StoredFile, Transition, UserId,
    };

    fn draft() -> DocumentDraft {
        DocumentDraft {
            id: None,
            title: "Budget".into(),
            document_type: Some(DocumentTypeId(1)),
            programs: vec![],
            attachment: Attachment::Upload(FileUpload::new("budget.xls", b"x".to_vec())),
            hyperlink: None,
            notes: String::new(),
            authors: vec![UserId(1)],
            external_authors: String::new(),
            uploader: Some(UserId(1)),
            created: None,
            confidential: false,
            state: DocumentState::Active,
            transition: Transition::Edit,
        }
    }

    #[test]
    fn test_valid_file_document() {
        assert!(validate_document(&draft()).is_ok());
    }

    #[test]
    fn test_valid_hyperlink_document() {
        let mut d = draft();
        d.attachment = Attachment::None;
        d.hyperlink = Some("https://intranet.example.org/minutes".into());
        assert!(validate_document(&d).is_ok());
    }

    #[test]
    fn test_neither_file_nor_hyperlink() {
        let mut d = draft();
        d.attachment = Attachment::None;
        let errors = validate_document(&d).unwrap_err();
        assert_eq!(errors.non_field().collect::<Vec<_>>(), vec![MISSING_FILE_OR_LINK]);
    }

    #[test]
    fn test_both_file_and_hyperlink() {
        let mut d = draft();
        d.attachment = Attachment::Stored(StoredFile::new("documents/a.pdf"));
        d.hyperlink = Some("http://example.org/".into());
        let errors = validate_document(&d).unwrap_err();
        assert_eq!(errors.non_field().collect::<Vec<_>>(), vec![BOTH_FILE_AND_LINK]);
    }

    #[test]
    fn test_title_limits() {
        let mut d = draft();
        d.title = String::new();
        assert!(validate_document(&d).unwrap_err().has_field(fields::TITLE));

        d.title = "x".repeat(MAX_TITLE_LEN);
        assert!(validate_document(&d).is_ok());
        d.title.push('x');
        let errors = validate_document(&d).unwrap_err();
        assert_eq!(
            errors.for_field(fields::TITLE).next(),
            Some("Ensure this value has at most 255 characters (it has 256).")
        );
    }

    #[test]
    fn test_external_authors_limit() {
        let mut d = draft();
        d.external_authors = "é".repeat(MAX_EXTERNAL_AUTHORS_LEN + 1);
        assert!(validate_document(&d)
            .unwrap_err()
            .has_field(fields::EXTERNAL_AUTHORS));
    }

    #[test]
    fn test_hyperlink_must_be_http() {
        let mut d = draft();
        d.attachment = Attachment::None;
        for bad in ["intranet/minutes", "ftp://example.org/x", "javascript:alert(1)"] {
            d.hyperlink = Some(bad.into());
            assert!(
                validate_document(&d).unwrap_err().has_field(fields::HYPERLINK),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn test_document_type_required() {
        let mut d = draft();
        d.document_type = None;
        assert!(validate_document(&d)
            .unwrap_err()
            .has_field(fields::DOCUMENT_TYPE));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut d = draft();
        d.attachment = Attachment::None;
        d.title = String::new();
        d.document_type = None;
        assert_eq!(validate_document(&d).unwrap_err().len(), 3);
    }
}
