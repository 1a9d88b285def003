//! Tantivy-backed document index.
//!
//! Exactly one entry exists per document id: every write deletes the id's
//! term before adding the new entry, in the same commit.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, OwnedValue, Schema, Value, FAST, INDEXED, STORED, TEXT,
};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info, warn};

use docbinder_types::{DocumentId, DocumentTypeId, ProgramId, UserId};

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};
use crate::query::{SearchHit, SearchQuery};

/// Writer heap budget.
const WRITER_MEMORY_BYTES: usize = 50_000_000;

/// Schema fields.
#[derive(Debug, Clone, Copy)]
struct Fields {
    id: Field,
    text: Field,
    title: Field,
    notes: Field,
    uploader: Field,
    authors: Field,
    author_names: Field,
    programs: Field,
    document_type: Field,
    created: Field,
    deleted: Field,
    external_authors: Field,
}

fn build_schema() -> (Schema, Fields) {
    let mut builder = Schema::builder();
    let fields = Fields {
        id: builder.add_u64_field("id", INDEXED | STORED | FAST),
        text: builder.add_text_field("text", TEXT | STORED),
        title: builder.add_text_field("title", TEXT | STORED),
        notes: builder.add_text_field("notes", TEXT | STORED),
        uploader: builder.add_text_field("uploader", TEXT | STORED),
        authors: builder.add_u64_field("authors", INDEXED | STORED),
        author_names: builder.add_text_field("author_names", TEXT | STORED),
        programs: builder.add_u64_field("programs", INDEXED | STORED),
        document_type: builder.add_u64_field("document_type", INDEXED | STORED),
        created: builder.add_date_field("created", INDEXED | STORED),
        deleted: builder.add_bool_field("deleted", INDEXED | STORED | FAST),
        external_authors: builder.add_text_field("external_authors", TEXT | STORED),
    };
    (builder.build(), fields)
}

fn id_value(id: i64) -> u64 {
    id.max(0) as u64
}

fn u64_term(field: Field, id: i64) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_u64(field, id_value(id)),
        IndexRecordOption::Basic,
    ))
}

/// Search index over document entries.
pub struct DocumentIndex {
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: Fields,
}

impl DocumentIndex {
    /// Open (or create) an index stored in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> IndexResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let (schema, fields) = build_schema();
        let directory = MmapDirectory::open(dir)?;
        let index = Index::open_or_create(directory, schema)?;
        info!(path = %dir.display(), "Opened search index");
        Self::from_index(index, fields)
    }

    /// Create a throwaway in-memory index.
    pub fn in_memory() -> IndexResult<Self> {
        let (schema, fields) = build_schema();
        Self::from_index(Index::create_in_ram(schema), fields)
    }

    fn from_index(index: Index, fields: Fields) -> IndexResult<Self> {
        let writer = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(Self {
            index,
            reader,
            writer: Mutex::new(writer),
            fields,
        })
    }

    fn writer(&self) -> IndexResult<MutexGuard<'_, IndexWriter>> {
        self.writer
            .lock()
            .map_err(|_| IndexError::LockPoisoned("index writer lock poisoned".into()))
    }

    fn commit(&self, writer: &mut IndexWriter) -> IndexResult<()> {
        writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    fn make_document(&self, entry: &IndexEntry) -> TantivyDocument {
        let f = &self.fields;
        let mut doc = TantivyDocument::default();
        doc.add_u64(f.id, id_value(entry.id.get()));
        doc.add_text(f.text, &entry.text);
        doc.add_text(f.title, &entry.title);
        doc.add_text(f.notes, &entry.notes);
        if let Some(uploader) = &entry.uploader {
            doc.add_text(f.uploader, uploader);
        }
        for author in &entry.authors {
            doc.add_u64(f.authors, id_value(author.get()));
        }
        for name in &entry.author_names {
            doc.add_text(f.author_names, name);
        }
        for program in &entry.programs {
            doc.add_u64(f.programs, id_value(program.get()));
        }
        doc.add_u64(f.document_type, id_value(entry.document_type.get()));
        doc.add_date(
            f.created,
            tantivy::DateTime::from_timestamp_secs(entry.created.timestamp()),
        );
        doc.add_bool(f.deleted, entry.deleted);
        doc.add_text(f.external_authors, &entry.external_authors);
        doc
    }

    fn read_entry(&self, doc: &TantivyDocument) -> IndexResult<IndexEntry> {
        let f = &self.fields;
        let text = |field: Field| -> String {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let texts = |field: Field| -> Vec<String> {
            doc.get_all(field)
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        };
        let numbers = |field: Field| -> Vec<i64> {
            doc.get_all(field)
                .filter_map(|v| v.as_u64())
                .map(|n| n as i64)
                .collect()
        };
        let first_u64 = |field: Field, name: &str| -> IndexResult<i64> {
            doc.get_first(field)
                .and_then(|v| v.as_u64())
                .map(|n| n as i64)
                .ok_or_else(|| IndexError::invalid_entry(format!("missing {name}")))
        };

        let created_secs = doc
            .get_first(f.created)
            .and_then(|v: &OwnedValue| v.as_datetime())
            .map(|d| d.into_timestamp_secs())
            .ok_or_else(|| IndexError::invalid_entry("missing created"))?;
        let created = DateTime::<Utc>::from_timestamp(created_secs, 0)
            .ok_or_else(|| IndexError::invalid_entry("created out of range"))?;

        Ok(IndexEntry {
            id: DocumentId(first_u64(f.id, "id")?),
            text: text(f.text),
            title: text(f.title),
            notes: text(f.notes),
            uploader: doc
                .get_first(f.uploader)
                .and_then(|v| v.as_str())
                .map(str::to_string),
            authors: numbers(f.authors).into_iter().map(UserId).collect(),
            author_names: texts(f.author_names),
            programs: numbers(f.programs).into_iter().map(ProgramId).collect(),
            document_type: DocumentTypeId(first_u64(f.document_type, "document_type")?),
            created,
            deleted: doc
                .get_first(f.deleted)
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            external_authors: text(f.external_authors),
        })
    }

    /// Add or replace the entry for `entry.id`, then commit.
    pub fn upsert(&self, entry: &IndexEntry) -> IndexResult<()> {
        let mut writer = self.writer()?;
        writer.delete_term(Term::from_field_u64(self.fields.id, id_value(entry.id.get())));
        writer.add_document(self.make_document(entry))?;
        self.commit(&mut writer)?;
        info!(document_id = %entry.id, deleted = entry.deleted, "Indexed document");
        Ok(())
    }

    /// Replace every entry with `entries` in a single commit.
    pub fn rebuild(&self, entries: &[IndexEntry]) -> IndexResult<()> {
        let mut writer = self.writer()?;
        writer.delete_all_documents()?;
        for entry in entries {
            writer.add_document(self.make_document(entry))?;
        }
        self.commit(&mut writer)?;
        info!(entries = entries.len(), "Rebuilt search index");
        Ok(())
    }

    /// Remove the entry for `id`, if any.
    pub fn remove(&self, id: DocumentId) -> IndexResult<()> {
        let mut writer = self.writer()?;
        writer.delete_term(Term::from_field_u64(self.fields.id, id_value(id.get())));
        self.commit(&mut writer)?;
        debug!(document_id = %id, "Removed index entry");
        Ok(())
    }

    /// Remove every entry.
    pub fn clear(&self) -> IndexResult<()> {
        let mut writer = self.writer()?;
        writer.delete_all_documents()?;
        self.commit(&mut writer)
    }

    /// Number of entries for `id` (0 or 1).
    pub fn count_entries(&self, id: DocumentId) -> IndexResult<usize> {
        let searcher = self.reader.searcher();
        let query = u64_term(self.fields.id, id.get());
        Ok(searcher.search(&query, &Count)?)
    }

    /// Total number of entries.
    pub fn len(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored entry for `id`.
    pub fn entry(&self, id: DocumentId) -> IndexResult<Option<IndexEntry>> {
        let searcher = self.reader.searcher();
        let query = u64_term(self.fields.id, id.get());
        let top = searcher.search(&query, &TopDocs::with_limit(1))?;
        match top.first() {
            Some((_, address)) => {
                let doc: TantivyDocument = searcher.doc(*address)?;
                self.read_entry(&doc).map(Some)
            }
            None => Ok(None),
        }
    }

    fn build_query(&self, query: &SearchQuery) -> Box<dyn Query> {
        let f = &self.fields;
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        let text = query.text.trim();
        if text.is_empty() {
            clauses.push((Occur::Must, Box::new(AllQuery)));
        } else {
            let mut parser = QueryParser::for_index(
                &self.index,
                vec![
                    f.text,
                    f.title,
                    f.notes,
                    f.uploader,
                    f.author_names,
                    f.external_authors,
                ],
            );
            parser.set_conjunction_by_default();
            let (parsed, errors) = parser.parse_query_lenient(text);
            if !errors.is_empty() {
                warn!(query = %text, errors = errors.len(), "Ignored unparseable parts of search query");
            }
            clauses.push((Occur::Must, parsed));
        }

        if let Some(flag) = query.deleted.required_flag() {
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(
                    Term::from_field_bool(f.deleted, flag),
                    IndexRecordOption::Basic,
                )),
            ));
        }

        if let Some(document_type) = query.document_type {
            clauses.push((Occur::Must, u64_term(f.document_type, document_type.get())));
        }

        if !query.programs.is_empty() {
            let any_program: Vec<(Occur, Box<dyn Query>)> = query
                .programs
                .iter()
                .map(|p| (Occur::Should, u64_term(f.programs, p.get())))
                .collect();
            clauses.push((Occur::Must, Box::new(BooleanQuery::new(any_program))));
        }

        if !query.authors.is_empty() {
            let any_author: Vec<(Occur, Box<dyn Query>)> = query
                .authors
                .iter()
                .map(|a| (Occur::Should, u64_term(f.authors, a.get())))
                .collect();
            clauses.push((Occur::Must, Box::new(BooleanQuery::new(any_author))));
        }

        Box::new(BooleanQuery::new(clauses))
    }

    /// Run a search, best matches first.
    pub fn search(&self, query: &SearchQuery) -> IndexResult<Vec<SearchHit>> {
        let searcher = self.reader.searcher();
        let tantivy_query = self.build_query(query);
        let top = searcher.search(&tantivy_query, &TopDocs::with_limit(query.limit.max(1)))?;

        let mut hits = Vec::with_capacity(top.len());
        for (score, address) in top {
            let doc: TantivyDocument = searcher.doc(address)?;
            let entry = self.read_entry(&doc)?;
            hits.push(SearchHit {
                id: entry.id,
                score,
                title: entry.title,
                deleted: entry.deleted,
            });
        }
        debug!(query = %query.text, hits = hits.len(), "Search finished");
        Ok(hits)
    }

    /// Number of entries matching `query`, ignoring its limit.
    pub fn count(&self, query: &SearchQuery) -> IndexResult<usize> {
        let searcher = self.reader.searcher();
        Ok(searcher.search(&self.build_query(query), &Count)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DeletedFilter;

    fn entry(id: i64, title: &str, text: &str) -> IndexEntry {
        IndexEntry {
            id: DocumentId(id),
            text: text.into(),
            title: title.into(),
            notes: String::new(),
            uploader: Some("John Lennon".into()),
            authors: vec![UserId(1)],
            author_names: vec!["John Lennon".into()],
            programs: vec![ProgramId(1)],
            document_type: DocumentTypeId(1),
            created: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            deleted: false,
            external_authors: String::new(),
        }
    }

    #[test]
    fn test_upsert_and_entry_roundtrip() {
        let index = DocumentIndex::in_memory().unwrap();
        let e = entry(1, "Budget", "revenue forecast");
        index.upsert(&e).unwrap();
        assert_eq!(index.entry(DocumentId(1)).unwrap().unwrap(), e);
        assert!(index.entry(DocumentId(2)).unwrap().is_none());
    }

    #[test]
    fn test_upsert_keeps_single_entry() {
        let index = DocumentIndex::in_memory().unwrap();
        let e = entry(1, "Budget", "revenue");
        index.upsert(&e).unwrap();
        index.upsert(&e).unwrap();
        index.upsert(&e).unwrap();
        assert_eq!(index.count_entries(DocumentId(1)).unwrap(), 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_search_text_and_title() {
        let index = DocumentIndex::in_memory().unwrap();
        index.upsert(&entry(1, "Budget", "revenue forecast")).unwrap();
        index.upsert(&entry(2, "Minutes", "attendance list")).unwrap();

        let hits = index.search(&SearchQuery::new("revenue")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, DocumentId(1));

        let hits = index.search(&SearchQuery::new("minutes")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Minutes");

        assert_eq!(index.search(&SearchQuery::new("")).unwrap().len(), 2);
    }

    #[test]
    fn test_deleted_filter() {
        let index = DocumentIndex::in_memory().unwrap();
        let mut e = entry(1, "Budget", "revenue");
        e.deleted = true;
        index.upsert(&e).unwrap();

        assert!(index.search(&SearchQuery::new("Budget")).unwrap().is_empty());
        let deleted = index
            .search(&SearchQuery::new("Budget").with_deleted(DeletedFilter::Deleted))
            .unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(deleted[0].deleted);
        assert_eq!(
            index
                .count(&SearchQuery::new("Budget").with_deleted(DeletedFilter::Any))
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_lenient_query_syntax() {
        let index = DocumentIndex::in_memory().unwrap();
        index.upsert(&entry(1, "Budget", "revenue")).unwrap();
        // unknown field prefix and dangling quote must not fail the search
        index.search(&SearchQuery::new("nosuchfield:revenue")).unwrap();
        index.search(&SearchQuery::new("\"revenue")).unwrap();
    }

    #[test]
    fn test_remove_and_clear() {
        let index = DocumentIndex::in_memory().unwrap();
        index.upsert(&entry(1, "A", "")).unwrap();
        index.upsert(&entry(2, "B", "")).unwrap();
        index.remove(DocumentId(1)).unwrap();
        assert_eq!(index.count_entries(DocumentId(1)).unwrap(), 0);
        assert_eq!(index.len(), 1);
        index.clear().unwrap();
        assert!(index.is_empty());
    }
}
