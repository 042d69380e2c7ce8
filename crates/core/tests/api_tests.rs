//! Library API integration tests
use referent_core::*;
use rstest::rstest;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

fn article_page(text: &str) -> String {
    format!("<html><head><title>Boundary</title></head><body><article>{}</article></body></html>", text)
}

#[test]
fn test_article_text_is_returned_cleaned() {
    let html = read_fixture("news_article.html");
    let extraction = extract(&html).expect("should extract");

    assert_eq!(extraction.strategy, Some(Strategy::SemanticContainer));
    let content = extraction.content().expect("article should be accepted");
    assert!(content.starts_with("Council approves bridge survey"));
    assert!(content.ends_with("before the end of the year."));
}

#[test]
fn test_excluded_elements_never_appear() {
    let html = read_fixture("news_article.html");
    let content = extract(&html).unwrap().content().unwrap().to_string();

    for excluded in ["Advertisement", "Share this story", "window.analytics", "Sport", "Most read", "Copyright"] {
        assert!(!content.contains(excluded), "content should not contain {excluded:?}");
    }
}

#[test]
fn test_metadata_from_fixture() {
    let html = read_fixture("news_article.html");
    let extraction = extract(&html).unwrap();

    assert_eq!(extraction.metadata.title.as_deref(), Some("Council approves bridge survey"));
    assert_eq!(extraction.metadata.date.as_deref(), Some("2024-03-05T09:00:00Z"));
}

#[test]
fn test_paywall_page_is_classified_paywalled() {
    let html = read_fixture("paywall.html");
    let extraction = extract(&html).unwrap();

    assert_eq!(extraction.outcome.failure_reason(), Some(FailureReason::Paywalled));
    assert_eq!(extraction.outcome.http_status(), 403);
}

#[test]
fn test_paragraph_aggregation_joins_in_document_order() {
    let html = read_fixture("paragraphs.html");
    let extraction = extract(&html).unwrap();

    let expected = [
        "The harbour master reported calm water throughout the weekend.",
        "Fishing boats returned early on Saturday with a larger catch than usual.",
        "Volunteers repainted the lifeboat station before the summer season.",
        "The ferry timetable will change on the first Monday of next month.",
        "Visitors are asked to keep to the marked paths along the cliff top.",
    ]
    .join("\n\n");

    assert_eq!(extraction.strategy, Some(Strategy::ParagraphAggregation));
    assert_eq!(extraction.content(), Some(expected.as_str()));
}

#[test]
fn test_paywalled_container_falls_through_to_dense_div() {
    let html = read_fixture("dense_div.html");
    let extraction = extract(&html).unwrap();

    assert_eq!(extraction.strategy, Some(Strategy::DenseDiv));
    let content = extraction.content().unwrap();
    assert!(content.starts_with("The new tram line will connect"));
    assert!(content.ends_with("opens at the central library next week."));
    assert!(!content.to_lowercase().contains("subscribe"));
}

#[test]
fn test_extraction_is_idempotent() {
    let html = read_fixture("news_article.html");
    let doc = Document::parse(&html).unwrap();
    let config = ExtractConfig::default();

    let first = extract_content(&doc, &config);
    let second = extract_content(&doc, &config);
    assert_eq!(first, second);
    assert_eq!(classify(&first, &doc, &config), classify(&second, &doc, &config));
}

#[test]
fn test_unicode_article() {
    let html = read_fixture("unicode_article.html");
    let extraction = extract(&html).unwrap();

    let content = extraction.content().unwrap();
    assert!(content.contains("Городской совет"));
    assert!(content.contains("🌉"));
    assert!(!content.contains("Спорт"));
    assert_eq!(extraction.metadata.title.as_deref(), Some("Новый мост через реку"));
}

#[test]
fn test_malformed_html_degrades_gracefully() {
    let html = read_fixture("malformed.html");
    let doc = Document::parse(&html).expect("should parse malformed HTML");
    assert!(!doc.text_content().is_empty());

    assert!(extract(&html).is_ok());
}

#[test]
fn test_empty_page_is_not_found() {
    let html = read_fixture("empty.html");
    let extraction = extract(&html).unwrap();

    assert_eq!(extraction.outcome.failure_reason(), Some(FailureReason::NotFound));
    assert_eq!(extraction.outcome.http_status(), 400);
    assert_eq!(extraction.metadata.title.as_deref(), Some("Nothing here"));
}

#[rstest]
#[case(100, false)]
#[case(101, true)]
#[case(200, true)]
#[case(201, true)]
fn test_container_boundaries(#[case] len: usize, #[case] accepted: bool) {
    let text = "x".repeat(len);
    let extraction = extract(&article_page(&text)).unwrap();

    if accepted {
        assert_eq!(extraction.content(), Some(text.as_str()));
        assert_eq!(extraction.strategy, Some(Strategy::SemanticContainer));
    } else {
        assert_eq!(extraction.outcome.failure_reason(), Some(FailureReason::NotFound));
    }
}

#[rstest]
#[case(200, false)]
#[case(201, true)]
fn test_primary_rule_is_strict(#[case] len: usize, #[case] accepted: bool) {
    let config = ReaderConfig::builder()
        .extract(ExtractConfig { selector_relaxed_chars: 10_000, ..Default::default() })
        .build();
    let extraction = Reader::with_config(config).extract_html(&article_page(&"x".repeat(len))).unwrap();

    assert_eq!(extraction.strategy == Some(Strategy::SemanticContainer), accepted);
}

#[rstest]
#[case(299, false)]
#[case(300, true)]
fn test_paywall_window_boundary(#[case] len: usize, #[case] success: bool) {
    let mut text = String::from("Premium ");
    text.push_str(&"x".repeat(len - text.len()));
    let result = ExtractionResult { content: Some(text), ..Default::default() };
    let doc = Document::parse("<html><body></body></html>").unwrap();

    let outcome = classify(&result, &doc, &ExtractConfig::default());
    assert_eq!(outcome.is_success(), success);
}

#[test]
fn test_short_paywalled_article_is_gated() {
    let text = format!("Members only. {}", "x".repeat(250));
    let extraction = extract(&article_page(&text)).unwrap();

    assert_eq!(extraction.outcome.failure_reason(), Some(FailureReason::Paywalled));
    assert_eq!(extraction.outcome.http_status(), 403);
}

#[test]
fn test_extraction_serializes() {
    let html = read_fixture("news_article.html");
    let extraction = extract(&html).unwrap();
    let json = serde_json::to_value(&extraction).unwrap();

    assert_eq!(json["outcome"]["kind"], "success");
    assert_eq!(json["strategy"], "semantic_container");
    assert_eq!(json["metadata"]["title"], "Council approves bridge survey");
}
