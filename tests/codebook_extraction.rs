use survey_codebook::codebook::{
    extract_codebook, load_codebook, save_codebook, CodebookExtractor, VariableType,
};
use survey_codebook::ingestion::{
    read_document_pages, DocumentFormat, DocumentOptions, PageSource, TextPages,
};
use survey_codebook::pipeline::build_codebook;
use survey_codebook::CodebookError;

const PAGES: &str = "tests/fixtures/codebook_pages.txt";

fn fixture_pages() -> Vec<String> {
    TextPages::from_path(PAGES).unwrap().pages().unwrap()
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("survey_codebook_{}_{name}", std::process::id()))
}

#[test]
fn extracts_variables_in_document_order() {
    let cb = extract_codebook(fixture_pages());
    assert_eq!(
        cb.names().collect::<Vec<_>>(),
        vec!["AA4", "AA5", "AG2", "AG3", "BA50", "BE56", "BH10"]
    );
}

#[test]
fn ba50_has_three_branching_codes() {
    let cb = extract_codebook(fixture_pages());
    let ba50 = cb.get("BA50").unwrap();

    assert_eq!(ba50.codes.len(), 3);
    assert_eq!(ba50.label(1), Some("New firm"));
    assert_eq!(ba50.label(2), Some("Active start-up"));
    assert_eq!(ba50.label(3), Some("Quit"));
}

#[test]
fn ag2_is_continuous_and_keeps_sentinel_labels() {
    let cb = extract_codebook(fixture_pages());
    let ag2 = cb.get("AG2").unwrap();

    assert_eq!(ag2.kind, VariableType::Continuous);
    assert_eq!(ag2.label(98), Some("Don't know"));
    assert_eq!(ag2.label(99), Some("Refused"));
    assert_eq!(cb.get("BH10").unwrap().kind, VariableType::Continuous);
    assert_eq!(cb.get("AG3").unwrap().kind, VariableType::Categorical);
}

#[test]
fn later_wave_labels_replace_earlier_ones() {
    let mut ex = CodebookExtractor::new();
    for page in fixture_pages() {
        ex.push_page(&page);
    }
    let stats = ex.stats();
    let cb = ex.finish();

    let aa4 = cb.get("AA4").unwrap();
    assert_eq!(aa4.label(1), Some("Yes"));
    assert_eq!(aa4.label(5), Some("No"));
    assert_eq!(aa4.label(8), Some("Don't know"));
    assert_eq!(aa4.label(9), Some("Refused"));
    assert_eq!(stats.overwrites, 2);
    assert_eq!(stats.pages, 4);
}

#[test]
fn saved_codebook_reloads_identically() {
    let cb = extract_codebook(fixture_pages());
    let path = temp_path("roundtrip.json");

    save_codebook(&cb, &path).unwrap();
    let back = load_codebook(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(back, cb);
}

#[test]
fn build_codebook_reads_text_document_and_writes_json() {
    let out = temp_path("built.json");
    let cb = build_codebook(PAGES, &out, &DocumentOptions::default()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let _ = std::fs::remove_file(&out);

    assert_eq!(cb.len(), 7);
    assert_eq!(json["BE56"]["codes"]["4"], "No longer worked on by anyone");
    assert_eq!(json["AG2"]["type"], "continuous");
}

#[test]
fn missing_document_is_an_io_error() {
    let err = read_document_pages("tests/fixtures/does_not_exist.txt", &DocumentOptions::default())
        .unwrap_err();
    assert!(matches!(err, CodebookError::Io(_)));
}

#[test]
fn unknown_extension_is_unsupported() {
    let err =
        read_document_pages("tests/fixtures/waves.tsv", &DocumentOptions::default()).unwrap_err();
    assert!(matches!(err, CodebookError::UnsupportedDocument { .. }));
}

#[cfg(feature = "pdf")]
#[test]
fn default_options_route_pdf_documents_to_the_pdf_reader() {
    let missing =
        read_document_pages("tests/fixtures/does_not_exist.pdf", &DocumentOptions::default())
            .unwrap_err();
    assert!(matches!(missing, CodebookError::Io(_)), "got {missing:?}");

    let path = std::env::temp_dir().join(format!("survey_codebook_{}_bad.pdf", std::process::id()));
    std::fs::write(&path, "AA4 not really a pdf\n1. Yes\n").unwrap();
    let result = build_codebook(&path, path.with_extension("json"), &DocumentOptions::default());
    let _ = std::fs::remove_file(&path);
    assert!(matches!(result, Err(CodebookError::Pdf(_))), "got {result:?}");
}

#[cfg(not(feature = "pdf"))]
#[test]
fn pdf_without_the_feature_is_unsupported() {
    let err = read_document_pages("tests/fixtures/does_not_exist.pdf", &DocumentOptions::default())
        .unwrap_err();
    assert!(matches!(err, CodebookError::UnsupportedDocument { .. }));
}

#[test]
fn forced_text_format_ignores_extension() {
    let opts = DocumentOptions {
        format: Some(DocumentFormat::Text),
        ..Default::default()
    };
    let pages = read_document_pages("tests/fixtures/waves.tsv", &opts).unwrap();
    assert_eq!(pages.len(), 1);
    assert!(extract_codebook(pages).is_empty());
}
