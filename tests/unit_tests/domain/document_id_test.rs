use std::path::Path;

use medingest::domain::DocumentId;

#[test]
fn given_stem_with_spaces_and_dashes_when_generating_then_they_become_underscores() {
    let id = DocumentId::generate(Path::new("/tmp/Clinical Study-Report.pdf"));

    assert!(id.as_str().starts_with("clinical_study_report_"));
    assert!(!id.as_str().contains(' '));
    assert!(!id.as_str().contains('-'));
}

#[test]
fn given_any_path_when_generating_then_suffix_is_eight_lowercase_hex_chars() {
    let id = DocumentId::generate(Path::new("report.pdf"));
    let suffix = id.as_str().rsplit('_').next().unwrap();

    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn given_same_path_when_generating_twice_then_ids_differ() {
    let path = Path::new("report.pdf");

    assert_ne!(DocumentId::generate(path), DocumentId::generate(path));
}

#[test]
fn given_id_when_serializing_then_it_is_a_plain_string() {
    let id = DocumentId::from_raw("report_1a2b3c4d");

    assert_eq!(serde_json::to_string(&id).unwrap(), "\"report_1a2b3c4d\"");
}
