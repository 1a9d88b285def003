//! Command extractor against real processes.
#![cfg(unix)]

use std::collections::BTreeMap;
use std::path::Path;

use docbinder_extract::{CommandExtractor, ConverterCommand, ExtractionError, TextExtractor};

fn extractor_with(ext: &str, command: ConverterCommand) -> CommandExtractor {
    let mut table = BTreeMap::new();
    table.insert(ext.to_string(), command);
    CommandExtractor::new(table)
}

fn shell(format: &str, script: &str) -> ConverterCommand {
    ConverterCommand::new(format, "sh").with_args(["-c", script, "sh", "{path}"])
}

#[tokio::test]
async fn test_stdout_is_text() {
    let extractor = extractor_with("txt", ConverterCommand::new("text", "cat"));
    let text = extractor.extract("notes.txt", b"plain words").await.unwrap();
    assert_eq!(text, "plain words");
}

#[tokio::test]
async fn test_whitelisted_stderr_is_ignored() {
    let extractor = extractor_with(
        "xls",
        shell("Excel", r#"printf 'Using XLS parser.\n' >&2; cat "$1""#),
    );
    let text = extractor.extract("budget.xls", b"1,2,3").await.unwrap();
    assert_eq!(text, "1,2,3");
}

#[tokio::test]
async fn test_other_stderr_fails() {
    let extractor = extractor_with("doc", shell("Word", "echo 'not a Word file' >&2"));
    let err = extractor.extract("broken.doc", b"junk").await.unwrap_err();
    assert_eq!(
        err,
        ExtractionError::Conversion {
            format: "Word".into(),
            message: "not a Word file\n".into(),
        }
    );
    assert!(!err.is_configuration());
}

#[tokio::test]
async fn test_nonzero_exit_fails() {
    let extractor = extractor_with("doc", shell("Word", "exit 3"));
    let err = extractor.extract("broken.doc", b"junk").await.unwrap_err();
    assert!(matches!(err, ExtractionError::Conversion { .. }));
}

#[tokio::test]
async fn test_missing_tool_is_conversion_error() {
    let extractor = extractor_with(
        "doc",
        ConverterCommand::new("Word", "docbinder-no-such-converter"),
    );
    let err = extractor.extract("a.doc", b"x").await.unwrap_err();
    match err {
        ExtractionError::Conversion { format, message } => {
            assert_eq!(format, "Word");
            assert!(message.contains("docbinder-no-such-converter"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_extension() {
    let extractor = CommandExtractor::default();
    let err = extractor.extract("boink.png", b"png").await.unwrap_err();
    assert!(matches!(err, ExtractionError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn test_temp_file_removed_on_success() {
    let extractor = extractor_with("txt", shell("text", r#"printf '%s' "$1""#));
    let path = extractor.extract("a.txt", b"x").await.unwrap();
    assert!(path.ends_with(".txt"));
    assert!(!Path::new(&path).exists());
}

#[tokio::test]
async fn test_temp_file_removed_on_failure() {
    let extractor = extractor_with("txt", shell("text", r#"printf '%s' "$1" >&2; exit 1"#));
    let err = extractor.extract("a.txt", b"x").await.unwrap_err();
    let ExtractionError::Conversion { message, .. } = err else {
        panic!("expected conversion error");
    };
    assert!(!message.is_empty());
    assert!(!Path::new(&message).exists());
}

#[tokio::test]
async fn test_concurrent_calls_use_distinct_files() {
    let extractor = extractor_with("txt", shell("text", r#"printf '%s' "$1""#));
    let (a, b) = tokio::join!(
        extractor.extract("a.txt", b"1"),
        extractor.extract("a.txt", b"2")
    );
    assert_ne!(a.unwrap(), b.unwrap());
}
