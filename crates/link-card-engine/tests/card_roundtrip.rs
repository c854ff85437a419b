use link_card_engine::card::{CardError, decode_block, decode_document, encode, encode_all};
use link_card_engine::models::LinkMetadata;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn card(url: &str, title: &str) -> LinkMetadata {
    LinkMetadata::new(url, title).unwrap()
}

fn full(url: &str) -> LinkMetadata {
    card(url, "Example Domain")
        .with_description("For use in illustrative examples")
        .with_host("example.com")
        .with_image("https://example.com/og.png")
}

#[rstest]
#[case::single_minimal(vec![card("https://example.com", "https://example.com")])]
#[case::single_full(vec![full("https://example.com")])]
#[case::empty_block(vec![])]
#[case::varying_indent(vec![
    full("https://example.com/a"),
    card("https://example.com/b", "B").with_indent(1),
    card("https://example.com/c", "C").with_host("c.example.com").with_indent(2),
    card("https://example.com/d", "D").with_indent(1),
    card("https://example.com/e", "E"),
])]
#[case::siblings_at_same_depth(vec![
    card("a", "A").with_indent(3),
    card("b", "B").with_indent(3),
])]
#[case::present_but_empty(vec![
    card("https://example.com", "").with_description("").with_host("").with_image(""),
])]
#[case::deep_before_shallow(vec![
    card("x", "X").with_indent(2),
    card("y", "Y"),
])]
fn decode_inverts_encode(#[case] records: Vec<LinkMetadata>) {
    let text = encode_all(&records);
    assert_eq!(decode_block(&text).unwrap(), records);
}

#[test]
fn nesting_recovers_depths_in_order() {
    let records = vec![card("a", "a"), card("b", "b").with_indent(1)];
    let decoded = decode_block(&encode_all(&records)).unwrap();

    assert_eq!(decoded.len(), 2);
    assert_eq!((decoded[0].url(), decoded[0].indent()), ("a", 0));
    assert_eq!((decoded[1].url(), decoded[1].indent()), ("b", 1));
}

#[rstest]
#[case("Rust: \"fearless\"\nconcurrency")]
#[case("A\u{2028}B: C")]
#[case("  ```\n```cardlink\n")]
#[case("url: https://evil.example.com")]
#[case("\\\"")]
#[case("trailing colon:")]
fn awkward_titles_survive(#[case] title: &str) {
    let record = card("https://example.com", title).with_description(title);
    let text = encode(&record);

    assert_eq!(text.lines().count(), 5, "every value stays on one line");
    assert_eq!(decode_block(&text).unwrap(), vec![record]);
}

#[test]
fn encoding_is_deterministic() {
    let records = vec![full("https://example.com"), card("x", "y: z").with_indent(1)];
    assert_eq!(encode_all(&records), encode_all(&records.clone()));
}

#[test]
fn malformed_block_does_not_affect_its_neighbours() {
    let good = encode(&full("https://example.com"));
    let text = format!(
        "# Notes\n\n```cardlink\nurl: https://broken.example.com\nthis line has no delimiter\n```\n\nprose\n\n{good}"
    );

    let blocks = decode_document(&text);

    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0].result,
        Err(CardError::Malformed {
            line: 5,
            reason: "expected `key: value`".to_string(),
        })
    );
    assert_eq!(blocks[1].result, Ok(vec![full("https://example.com")]));
    assert_eq!(blocks[1].span.slice(&text), good);
}

#[test]
fn missing_url_block_is_isolated() {
    let text = format!(
        "```cardlink\ntitle: lonely\n```\n{}",
        encode(&card("https://example.com", "ok"))
    );
    let results: Vec<_> = decode_document(&text)
        .into_iter()
        .map(|block| block.result.map(|records| records.len()))
        .collect();

    assert_eq!(
        results,
        vec![
            Err(CardError::MissingField {
                line: 2,
                field: "url"
            }),
            Ok(1),
        ]
    );
}

#[test]
fn hand_edited_block_with_extra_keys_and_spacing() {
    let text = "```cardlink\nurl:https://example.com\ntitle:    Example   \nfavicon: https://example.com/favicon.ico\n\n```\n";

    assert_eq!(
        decode_block(text).unwrap(),
        vec![card("https://example.com", "Example")]
    );
}
