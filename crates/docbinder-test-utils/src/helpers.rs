//! Helper functions for creating test fixtures.
//!
//! Provides a populated directory (users, programs, document types), a
//! pre-configured `DocumentOperations` and input builders.

use std::collections::BTreeSet;
use std::sync::Arc;

use docbinder_index::DocumentIndex;
use docbinder_ops::{DocumentOperations, HookChain, MemoryMailer, OpsConfig};
use docbinder_store::{DirectoryStore, StoreConfig, StoreState};
use docbinder_types::{
    DocumentType, FileUpload, Permission, Program, User, UserId, GUEST_GROUP,
};
use docbinder_valid::DocumentInput;
use tempfile::TempDir;

use crate::MockExtractor;

/// A user that has not been stored yet.
pub fn test_user(username: &str, full_name: &str, permissions: &[Permission]) -> User {
    User {
        id: UserId(0),
        username: username.to_string(),
        full_name: full_name.to_string(),
        email: format!("{username}@example.com"),
        is_superuser: false,
        permissions: permissions.iter().copied().collect(),
        groups: BTreeSet::new(),
        program: None,
    }
}

/// Stored fixtures.
#[derive(Debug, Clone)]
pub struct Fixtures {
    /// Uploads and edits; no general delete permission.
    pub john: User,
    /// Another staff member; no general delete permission.
    pub ringo: User,
    /// Holds every document permission.
    pub admin: User,
    /// Guest limited to `programs[0]`.
    pub guest: User,
    /// Guest without a program.
    pub lost_guest: User,
    /// "Business Support", "Enterprise Development".
    pub programs: Vec<Program>,
    /// "Report", "Minutes".
    pub document_types: Vec<DocumentType>,
}

impl Fixtures {
    pub fn report(&self) -> &DocumentType {
        &self.document_types[0]
    }

    pub fn minutes(&self) -> &DocumentType {
        &self.document_types[1]
    }
}

/// Add the standard users, programs and document types to `state`.
pub fn populate(state: &mut StoreState) -> Fixtures {
    let staff = [Permission::View, Permission::Add, Permission::Change];

    let programs = vec![
        state.directory.add_program("Business Support").unwrap(),
        state.directory.add_program("Enterprise Development").unwrap(),
    ];
    let document_types = vec![
        state.directory.add_document_type("Report").unwrap(),
        state.directory.add_document_type("Minutes").unwrap(),
    ];

    let john = state
        .directory
        .add_user(&test_user("john", "John Lennon", &staff))
        .unwrap();
    let ringo = state
        .directory
        .add_user(&test_user("ringo", "Ringo Starr", &staff))
        .unwrap();
    let admin = state
        .directory
        .add_user(&test_user("admin", "Site Admin", &Permission::ALL))
        .unwrap();

    let mut guest = test_user("guest", "Visiting Guest", &[Permission::View]);
    guest.groups.insert(GUEST_GROUP.to_string());
    guest.program = Some(programs[0].id);
    let guest = state.directory.add_user(&guest).unwrap();

    let mut lost_guest = test_user("nomad", "Guest Without Program", &[Permission::View]);
    lost_guest.groups.insert(GUEST_GROUP.to_string());
    let lost_guest = state.directory.add_user(&lost_guest).unwrap();

    Fixtures {
        john,
        ringo,
        admin,
        guest,
        lost_guest,
        programs,
        document_types,
    }
}

/// Everything a document-operations test needs.
pub struct TestEnv {
    pub ops: DocumentOperations,
    pub extractor: MockExtractor,
    pub mailer: Arc<MemoryMailer>,
    pub fixtures: Fixtures,
    /// Keeps the data directory alive for the duration of the test.
    pub temp_dir: TempDir,
}

/// Create test ops over a temp directory with the standard hook chain.
pub fn create_test_env() -> TestEnv {
    create_test_env_with(MockExtractor::new())
}

/// Create test ops using `extractor`.
pub fn create_test_env_with(extractor: MockExtractor) -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::new(temp_dir.path());
    let index_dir = config.index_dir();
    let mut state = StoreState::open(config).unwrap();
    let fixtures = populate(&mut state);
    let index = DocumentIndex::open(index_dir).unwrap();

    let mailer = Arc::new(MemoryMailer::new());
    let ops = DocumentOperations::new(
        state,
        index,
        Arc::new(extractor.clone()),
        HookChain::with_indexability(Arc::new(extractor.clone())),
        mailer.clone(),
        OpsConfig::default().with_site_name("Test Intranet"),
    );

    TestEnv {
        ops,
        extractor,
        mailer,
        fixtures,
        temp_dir,
    }
}

/// Input for a file upload with everything else left blank.
pub fn file_input(document_type: &DocumentType, name: &str, content: &[u8]) -> DocumentInput {
    DocumentInput {
        document_type: Some(document_type.id),
        upload: Some(FileUpload::new(name, content.to_vec())),
        ..DocumentInput::default()
    }
}

/// Input for a hyperlink-only document.
pub fn hyperlink_input(document_type: &DocumentType, title: &str, url: &str) -> DocumentInput {
    DocumentInput {
        title: title.to_string(),
        document_type: Some(document_type.id),
        hyperlink: url.to_string(),
        ..DocumentInput::default()
    }
}
