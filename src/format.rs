//! Turns echo values into display-ready lines
//!
//! Text is split at its own line breaks. Structured values are pretty-printed
//! first, with JSON syntax and a fixed target width. Every space is replaced
//! by a non-breaking space so indentation survives layout.

use std::borrow::Cow;

use serde_json::Value;

use crate::echo::EchoValue;

/// Target line width for pretty-printed values
pub const LINE_WIDTH: usize = 90;

/// One indentation level in pretty-printed output
const INDENT: &str = "    ";

/// Space marker that neither collapses nor allows a line break
pub const NBSP: char = '\u{00A0}';

/// Format a value into lines that can be rendered literally
///
/// Always returns at least one line; an empty value gives one empty line.
pub fn format_value(value: &EchoValue) -> Vec<String> {
    let text: Cow<'_, str> = match value {
        EchoValue::Text(text) => Cow::Borrowed(text),
        EchoValue::Structured(value) => Cow::Owned(pretty(value, LINE_WIDTH)),
    };

    let mut lines: Vec<String> = split_lines(&text).into_iter().map(protect_spaces).collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Characters that end a line; `\r\n` counts as one break
fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{1C}' | '\u{1D}' | '\u{1E}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split at every line break, without a trailing empty line
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if !is_line_break(ch) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Replace spaces with [`NBSP`] and expand tabs to one indentation level
fn protect_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            ' ' => out.push(NBSP),
            '\t' => out.extend(std::iter::repeat(NBSP).take(INDENT.len())),
            _ => out.push(ch),
        }
    }
    out
}

/// Undo the space protection applied by [`format_value`]
pub fn restore_spaces(line: &str) -> String {
    line.replace(NBSP, " ")
}

/// Pretty-print a structured value
///
/// A container is written on one line when it fits in the remaining width;
/// otherwise each member goes on its own line, one level deeper.
pub fn pretty(value: &Value, width: usize) -> String {
    let mut out = String::new();
    write_pretty(&mut out, value, 0, 0, 0, width);
    out
}

fn write_pretty(
    out: &mut String,
    value: &Value,
    depth: usize,
    used: usize,
    trailing: usize,
    width: usize,
) {
    let one_line = flat(value);
    let fits = used + one_line.chars().count() + trailing <= width;

    match value {
        Value::Array(items) if !fits && !items.is_empty() => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                let comma = usize::from(i + 1 < items.len());
                push_indent(out, depth + 1);
                write_pretty(out, item, depth + 1, (depth + 1) * INDENT.len(), comma, width);
                if comma == 1 {
                    out.push(',');
                }
            }
            push_indent(out, depth);
            out.push(']');
        }
        Value::Object(map) if !fits && !map.is_empty() => {
            out.push('{');
            for (i, (key, member)) in map.iter().enumerate() {
                let comma = usize::from(i + 1 < map.len());
                let key = quote(key);
                push_indent(out, depth + 1);
                out.push_str(&key);
                out.push_str(": ");
                let used = (depth + 1) * INDENT.len() + key.chars().count() + 2;
                write_pretty(out, member, depth + 1, used, comma, width);
                if comma == 1 {
                    out.push(',');
                }
            }
            push_indent(out, depth);
            out.push('}');
        }
        _ => out.push_str(&one_line),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// One-line form with `", "` and `": "` separators
fn flat(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(flat).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(key, member)| format!("{}: {}", quote(key), flat(member)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        scalar => scalar.to_string(),
    }
}

fn quote(key: &str) -> String {
    Value::from(key).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rejoin(lines: &[String]) -> String {
        lines
            .iter()
            .map(|line| restore_spaces(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_small_mapping_stays_on_one_line() {
        assert_eq!(pretty(&json!({"a": 1}), LINE_WIDTH), r#"{"a": 1}"#);
        assert_eq!(pretty(&json!([1, "two", null]), LINE_WIDTH), r#"[1, "two", null]"#);
    }

    #[test]
    fn test_wide_mapping_is_broken_per_member() {
        let value = json!({
            "first": "a".repeat(40),
            "second": "b".repeat(40),
        });
        let text = pretty(&value, LINE_WIDTH);
        let expected = format!(
            "{{\n    \"first\": \"{}\",\n    \"second\": \"{}\"\n}}",
            "a".repeat(40),
            "b".repeat(40)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_nested_members_fit_independently() {
        let value = json!({
            "parameters": {"length": 10, "width": 12},
            "messages": ["x".repeat(50), "y".repeat(50)],
        });
        let text = pretty(&value, LINE_WIDTH);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "{");
        assert_eq!(lines[1], r#"    "parameters": {"length": 10, "width": 12},"#);
        assert_eq!(lines[2], r#"    "messages": ["#);
        assert_eq!(lines[3], format!("        \"{}\",", "x".repeat(50)));
        assert_eq!(lines.last(), Some(&"}"));
        for line in &lines {
            assert!(line.len() <= LINE_WIDTH, "line too long: {}", line);
        }
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(pretty(&json!({}), 2), "{}");
        assert_eq!(pretty(&json!([]), 2), "[]");
    }

    #[test]
    fn test_text_is_split_at_line_breaks() {
        let lines = format_value(&EchoValue::from("one\ntwo  spaced\r\nthree"));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "two\u{a0}\u{a0}spaced");
        assert!(!lines.iter().any(|line| line.contains(' ')));
    }

    #[test]
    fn test_every_line_break_kind_splits() {
        assert_eq!(format_value(&EchoValue::from("a\rb")), vec!["a", "b"]);
        assert_eq!(
            format_value(&EchoValue::from("a\r\nb\u{0B}c\u{0C}d\u{85}e\u{2028}f\u{2029}g\u{1C}h")),
            vec!["a", "b", "c", "d", "e", "f", "g", "h"]
        );
    }

    #[test]
    fn test_blank_lines_survive_and_trailing_break_is_dropped() {
        assert_eq!(format_value(&EchoValue::from("a\r\rb\n")), vec!["a", "", "b"]);
        assert_eq!(format_value(&EchoValue::from("\n")), vec![String::new()]);
    }

    #[test]
    fn test_empty_value_gives_one_empty_line() {
        assert_eq!(format_value(&EchoValue::from("")), vec![String::new()]);
    }

    #[test]
    fn test_structured_lines_rejoin_losslessly() {
        let values = vec![
            json!(42),
            json!("plain string with  spaces"),
            json!({"a": 1}),
            json!({"nested": {"deep": [1, 2, {"k": "v".repeat(100)}]}, "list": [[], {}]}),
            json!([{"role": "system", "content": "z".repeat(80)}, true, 1.5]),
        ];

        for value in values {
            let lines = format_value(&EchoValue::Structured(value.clone()));
            assert!(!lines.is_empty());
            assert_eq!(rejoin(&lines), pretty(&value, LINE_WIDTH));
            let reparsed: Value = serde_json::from_str(&rejoin(&lines)).unwrap();
            assert_eq!(reparsed, value);
        }
    }
}
