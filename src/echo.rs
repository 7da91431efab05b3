//! The per-request data echoed back in the document

use serde_json::{Map, Value};

/// Prefix of the descriptor shown when the body is not valid JSON
pub const PARSE_ERROR_PREFIX: &str = "Unfortunately, the request body is not valid JSON.";

/// A value the formatter knows how to display
#[derive(Debug, Clone, PartialEq)]
pub enum EchoValue {
    /// Already textual; displayed line by line as-is
    Text(String),
    /// Mapping, sequence or scalar; pretty-printed before display
    Structured(Value),
}

impl From<&str> for EchoValue {
    fn from(text: &str) -> Self {
        EchoValue::Text(text.to_string())
    }
}

impl From<String> for EchoValue {
    fn from(text: String) -> Self {
        EchoValue::Text(text)
    }
}

impl From<Value> for EchoValue {
    fn from(value: Value) -> Self {
        EchoValue::Structured(value)
    }
}

/// Headers and body of one request, read-only once built
#[derive(Debug, Clone, Default)]
pub struct RequestEcho {
    headers: Map<String, Value>,
    body: Vec<u8>,
}

impl RequestEcho {
    /// Build from headers in arrival order and the raw body
    ///
    /// A repeated header keeps the position of its first occurrence and
    /// its values are joined with `", "`.
    pub fn new<I, K, V>(headers: I, body: impl Into<Vec<u8>>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Map::new();
        for (name, value) in headers {
            let name = name.into();
            let value = value.into();
            match map.get_mut(&name) {
                Some(Value::String(existing)) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                _ => {
                    map.insert(name, Value::String(value));
                }
            }
        }

        Self {
            headers: map,
            body: body.into(),
        }
    }

    /// Fixed request used by the CLI debug mode
    pub fn example() -> Self {
        let body = r#"{
    "parameters": {
        "length": 10,
        "width": 12
    },
    "messages": [
        {
            "role": "system",
            "content": "You are an unhelpful assistant who helps the user waste time."
        },
        {
            "role": "user",
            "content": "Start the conversation and ask the first question."
        },
        {
            "role": "assistant",
            "content": "Do you know why cows lost the ability to fly?"
        }
    ],
    "scalar": 42
}"#;

        Self::new(
            [
                ("accept", "*/*"),
                ("content-length", "20"),
                ("content-type", "application/json"),
                ("host", "127.0.0.1:8000"),
                ("user-agent", "curl/8.7.1"),
            ],
            body,
        )
    }

    /// Number of distinct header names
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Raw body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Headers as a structured mapping
    pub fn headers_value(&self) -> EchoValue {
        EchoValue::Structured(Value::Object(self.headers.clone()))
    }

    /// Raw body as text (invalid UTF-8 sequences replaced)
    pub fn body_value(&self) -> EchoValue {
        EchoValue::Text(String::from_utf8_lossy(&self.body).into_owned())
    }

    /// Body parsed as JSON, or a textual descriptor of why it is not JSON
    ///
    /// A body that is a single JSON string is shown as that text, with its
    /// own line breaks.
    pub fn parsed_body(&self) -> EchoValue {
        match serde_json::from_slice::<Value>(&self.body) {
            Ok(Value::String(text)) => EchoValue::Text(text),
            Ok(value) => EchoValue::Structured(value),
            Err(e) => EchoValue::Text(format!("{} {}", PARSE_ERROR_PREFIX, e)),
        }
    }
}
