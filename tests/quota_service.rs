//! Integration test: quota-gated manuscript processing

mod common;

use manuscript_format::{
    Document, Error, InMemoryUsageStore, ManuscriptService, NormalizeConfig, UsageProfile,
    UsageStore, WordCountScope,
};

fn service_with(user: &str, profile: UsageProfile) -> ManuscriptService<InMemoryUsageStore> {
    common::init_logger();
    let mut store = InMemoryUsageStore::new();
    store.insert(user, profile);
    ManuscriptService::new(store, NormalizeConfig::manuscript_default().normalizer())
}

#[test]
fn test_process_records_usage() {
    let mut service = service_with("alice", UsageProfile::new("free", 1000));

    let processed = service
        .process("alice", &common::manuscript_docx())
        .expect("within quota");

    assert_eq!(processed.word_count, 23);
    assert_eq!(processed.estimated_pages, 1);
    assert_eq!(processed.report.sections_updated, 2);
    assert_eq!(service.store().get_usage("alice").unwrap().words_used, 23);

    let doc = Document::from_bytes(&processed.bytes).unwrap();
    let run = doc.paragraph(1).unwrap().runs().next().unwrap();
    assert_eq!(run.font_name(), Some("Times New Roman"));
    assert_eq!(run.font_size_pt(), Some(12.0));
}

#[test]
fn test_quota_exceeded_records_nothing() {
    let mut profile = UsageProfile::new("free", 1000);
    profile.words_used = 990;
    let mut service = service_with("bob", profile);

    let err = service
        .process("bob", &common::manuscript_docx())
        .unwrap_err();

    match err {
        Error::QuotaExceeded {
            requested,
            remaining,
        } => {
            assert_eq!(requested, 23);
            assert_eq!(remaining, 10);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(service.store().get_usage("bob").unwrap().words_used, 990);
}

#[test]
fn test_exact_remaining_is_accepted() {
    let mut profile = UsageProfile::new("free", 100);
    profile.words_used = 77;
    let mut service = service_with("carol", profile);

    service.process("carol", &common::manuscript_docx()).unwrap();

    let usage = service.store().get_usage("carol").unwrap();
    assert_eq!(usage.remaining(), 0);
    assert!(usage.is_near_limit());
}

#[test]
fn test_unknown_user() {
    let mut service = service_with("alice", UsageProfile::new("free", 1000));

    let result = service.process("mallory", &common::manuscript_docx());
    assert!(matches!(result, Err(Error::UnknownUser(ref id)) if id == "mallory"));
}

#[test]
fn test_include_tables_scope() {
    let mut service = service_with("dave", UsageProfile::new("pro", 1000))
        .with_scope(WordCountScope::IncludeTables);

    let processed = service.process("dave", &common::manuscript_docx()).unwrap();
    assert_eq!(processed.word_count, 29);
    assert_eq!(service.store().get_usage("dave").unwrap().words_used, 29);
}

#[test]
fn test_long_manuscript_page_estimate() {
    let mut service = service_with("erin", UsageProfile::new("pro", 10_000));

    let processed = service
        .process("erin", &common::docx_with_words(100, 25))
        .unwrap();

    assert_eq!(processed.word_count, 2500);
    assert_eq!(processed.estimated_pages, 8);
    assert_eq!(processed.report.paragraphs_rewritten, 100);
}

#[test]
fn test_invalid_upload_is_not_charged() {
    let mut service = service_with("frank", UsageProfile::new("free", 1000));

    assert!(service.process("frank", b"not a docx").is_err());
    assert_eq!(service.store().get_usage("frank").unwrap().words_used, 0);
}

#[test]
fn test_truncated_upload_is_not_charged() {
    let mut service = service_with("grace", UsageProfile::new("free", 1000));

    let result = service.process("grace", &common::truncated_manuscript_docx());
    assert!(matches!(result, Err(Error::InvalidDocument(_))));
    assert_eq!(service.store().get_usage("grace").unwrap().words_used, 0);
}
