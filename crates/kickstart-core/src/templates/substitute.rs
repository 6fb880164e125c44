//! `{{placeholder}}` substitution for text and JSON templates

use crate::answers::AnswerSet;
use serde_json::Value;

/// Replace every known `{{key}}` in `content`; unknown placeholders are left as-is
pub fn substitute(content: &str, answers: &AnswerSet) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match answers.placeholder(key) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Substitute placeholders inside the string values (and keys) of a JSON document
pub fn substitute_json(value: Value, answers: &AnswerSet) -> Value {
    match value {
        Value::String(s) => Value::String(substitute(&s, answers)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| substitute_json(item, answers))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (substitute(&k, answers), substitute_json(v, answers)))
                .collect(),
        ),
        other => other,
    }
}
