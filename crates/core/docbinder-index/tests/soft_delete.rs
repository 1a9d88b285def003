//! Soft-delete visibility against an on-disk index.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use docbinder_index::{DeletedFilter, DocumentIndex, EntryContext, IndexEntry, SearchQuery};
use docbinder_types::{
    Document, DocumentId, DocumentState, DocumentTypeId, ProgramId, StoredFile, UserId,
};

fn document() -> Document {
    Document {
        id: DocumentId(11),
        title: "Annual Report".into(),
        document_type: DocumentTypeId(1),
        programs: vec![ProgramId(1)],
        file: Some(StoredFile::new("documents/annual.docx")),
        hyperlink: None,
        notes: String::new(),
        authors: vec![UserId(1)],
        external_authors: String::new(),
        uploader: Some(UserId(1)),
        created: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        confidential: false,
        state: DocumentState::Active,
    }
}

fn context() -> EntryContext {
    EntryContext::new(vec!["John Lennon".into()], Some("John Lennon".into()))
}

fn titles(index: &DocumentIndex, filter: DeletedFilter) -> usize {
    index
        .search(&SearchQuery::new("annual").with_deleted(filter))
        .unwrap()
        .len()
}

#[test]
fn test_flag_round_trip_keeps_one_entry() {
    let dir = TempDir::new().unwrap();
    let index = DocumentIndex::open(dir.path()).unwrap();
    let mut doc = document();

    index
        .upsert(&IndexEntry::build(&doc, &context(), Some("turnover")))
        .unwrap();
    assert_eq!(titles(&index, DeletedFilter::Active), 1);
    assert_eq!(titles(&index, DeletedFilter::Deleted), 0);

    doc.state = DocumentState::Deleted;
    index
        .upsert(&IndexEntry::build(&doc, &context(), Some("turnover")))
        .unwrap();
    assert_eq!(titles(&index, DeletedFilter::Active), 0);
    assert_eq!(titles(&index, DeletedFilter::Deleted), 1);
    assert_eq!(index.count_entries(doc.id).unwrap(), 1);

    doc.state = DocumentState::Active;
    index
        .upsert(&IndexEntry::build(&doc, &context(), Some("turnover")))
        .unwrap();
    assert_eq!(titles(&index, DeletedFilter::Active), 1);
    assert_eq!(titles(&index, DeletedFilter::Deleted), 0);
    assert_eq!(index.count_entries(doc.id).unwrap(), 1);
}

#[test]
fn test_entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let entry = IndexEntry::build(&document(), &context(), Some("turnover"));
    {
        let index = DocumentIndex::open(dir.path()).unwrap();
        index.upsert(&entry).unwrap();
    }
    let index = DocumentIndex::open(dir.path()).unwrap();
    assert_eq!(index.entry(entry.id).unwrap().unwrap(), entry);
}

#[test]
fn test_filters_by_program_and_author() {
    let index = DocumentIndex::in_memory().unwrap();
    let mut other = document();
    other.id = DocumentId(12);
    other.title = "Annual Budget".into();
    other.programs = vec![ProgramId(2)];
    other.authors = vec![UserId(2)];
    index
        .upsert(&IndexEntry::build(&document(), &context(), None))
        .unwrap();
    index
        .upsert(&IndexEntry::build(&other, &context(), None))
        .unwrap();

    let youth = index
        .search(&SearchQuery::new("annual").with_program(ProgramId(1)))
        .unwrap();
    assert_eq!(youth.len(), 1);
    assert_eq!(youth[0].id, DocumentId(11));

    let either = index
        .search(
            &SearchQuery::new("annual")
                .with_program(ProgramId(1))
                .with_program(ProgramId(2)),
        )
        .unwrap();
    assert_eq!(either.len(), 2);

    let by_ringo = index
        .search(&SearchQuery::new("").with_author(UserId(2)))
        .unwrap();
    assert_eq!(by_ringo.len(), 1);
    assert_eq!(by_ringo[0].id, DocumentId(12));
}

#[test]
fn test_external_authors_searchable() {
    let index = DocumentIndex::in_memory().unwrap();
    let mut doc = document();
    doc.external_authors = "Brian Epstein".into();
    index
        .upsert(&IndexEntry::build(&doc, &context(), None))
        .unwrap();
    assert_eq!(index.search(&SearchQuery::new("epstein")).unwrap().len(), 1);
}
