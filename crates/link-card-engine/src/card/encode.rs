use crate::models::LinkMetadata;

use super::{
    escape::format_value,
    fence::{CardFence, INDENT_UNIT, Key},
};

/// Encodes a single record as a card block.
pub fn encode(metadata: &LinkMetadata) -> String {
    encode_all(std::slice::from_ref(metadata))
}

/// Encodes an ordered list of records, each at its own indent, as one block.
///
/// Output is deterministic and always ends with a newline.
pub fn encode_all(records: &[LinkMetadata]) -> String {
    encode_indented(records, "")
}

/// Like [`encode_all`], with every line (fences included) prefixed by
/// `prefix`, e.g. the indentation of the list item the block belongs to.
///
/// `prefix` should be whitespace; the decoder strips the opening fence's
/// leading whitespace from the lines that follow it.
pub fn encode_indented(records: &[LinkMetadata], prefix: &str) -> String {
    let mut out = String::new();
    out.push_str(prefix);
    out.push_str(CardFence::BACKTICKS);
    push_line(&mut out, "", CardFence::INFO);
    for record in records {
        encode_record(&mut out, prefix, record);
    }
    push_line(&mut out, prefix, CardFence::CLOSE);
    out
}

fn encode_record(out: &mut String, prefix: &str, record: &LinkMetadata) {
    let indent = INDENT_UNIT.repeat(record.indent());
    for key in Key::ALL {
        let Some(value) = key.value(record) else {
            continue;
        };
        out.push_str(prefix);
        out.push_str(&indent);
        out.push_str(key.as_str());
        out.push_str(": ");
        out.push_str(&format_value(value));
        out.push('\n');
    }
}

fn push_line(out: &mut String, prefix: &str, line: &str) {
    out.push_str(prefix);
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> LinkMetadata {
        LinkMetadata::new("https://example.com", "Example Domain")
            .unwrap()
            .with_description("This domain is for use in illustrative examples.")
            .with_host("example.com")
    }

    #[test]
    fn encodes_populated_fields_in_order() {
        insta::assert_snapshot!(encode(&example()), @r"
        ```cardlink
        url: https://example.com
        title: Example Domain
        description: This domain is for use in illustrative examples.
        host: example.com
        ```
        ");
    }

    #[test]
    fn nested_records_are_indented_per_level() {
        let records = vec![
            example(),
            LinkMetadata::new("https://example.com/a", "Child: A")
                .unwrap()
                .with_indent(1),
            LinkMetadata::new("https://example.com/b", "Grandchild")
                .unwrap()
                .with_image("https://example.com/b.png")
                .with_indent(2),
        ];

        insta::assert_snapshot!(encode_all(&records), @r#"
        ```cardlink
        url: https://example.com
        title: Example Domain
        description: This domain is for use in illustrative examples.
        host: example.com
          url: https://example.com/a
          title: "Child: A"
            url: https://example.com/b
            title: Grandchild
            image: https://example.com/b.png
        ```
        "#);
    }

    #[test]
    fn prefix_applies_to_every_line() {
        let record = LinkMetadata::fallback("https://example.com").unwrap();
        assert_eq!(
            encode_indented(&[record], "    "),
            "    ```cardlink\n    url: https://example.com\n    title: https://example.com\n    ```\n"
        );
    }

    #[test]
    fn empty_optional_field_is_written_quoted() {
        let record = LinkMetadata::new("https://example.com", "t")
            .unwrap()
            .with_description("");
        assert!(encode(&record).contains("description: \"\"\n"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let records = vec![example(), example().with_indent(1)];
        assert_eq!(encode_all(&records), encode_all(&records));
    }
}
