//! Prompt templates with `{{field}}` placeholders.
//!
//! Rendering is plain substitution. The only conditional behavior is that a
//! line whose placeholder refers to an absent optional field is dropped.

use serde_json::Value;

use vaidya_contracts::{
    error::{VaidyaError, VaidyaResult},
    schema::Shape,
};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// An operation's immutable instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    text: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every placeholder name in the template, in order of appearance.
    /// Duplicates are reported once.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names = Vec::new();
        for line in self.text.lines() {
            for (_, name) in line_placeholders(line) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Render against `input`, using `shape` to decide what an absent value means.
    ///
    /// A missing required field is a validation failure; a missing, null or
    /// blank optional field drops every line that references it.
    pub fn render(&self, input: &Value, shape: &Shape) -> VaidyaResult<String> {
        let mut rendered = Vec::new();

        'lines: for line in self.text.lines() {
            let mut out = line.to_string();

            for (token, name) in line_placeholders(line) {
                let required = shape.field(name).map(|f| f.required).unwrap_or(true);
                match lookup(input, name) {
                    Some(text) if required || !text.trim().is_empty() => {
                        out = out.replace(token, &text);
                    }
                    None if required => {
                        return Err(VaidyaError::validation(
                            name,
                            "required field is missing at render time",
                        ));
                    }
                    _ => continue 'lines,
                }
            }

            rendered.push(out);
        }

        Ok(rendered.join("\n"))
    }
}

/// `(token, name)` pairs for every placeholder on a single line, where
/// `token` is the raw `{{ name }}` text as written.
fn line_placeholders(line: &str) -> Vec<(&str, &str)> {
    let mut found = Vec::new();
    let mut offset = 0;
    while let Some(start) = line[offset..].find(OPEN) {
        let open_at = offset + start;
        let inner_at = open_at + OPEN.len();
        match line[inner_at..].find(CLOSE) {
            Some(end) => {
                let close_at = inner_at + end + CLOSE.len();
                let name = line[inner_at..inner_at + end].trim();
                if !name.is_empty() {
                    found.push((&line[open_at..close_at], name));
                }
                offset = close_at;
            }
            None => break,
        }
    }
    found
}

/// Textual value of `name` in `input`, or `None` when absent or null.
fn lookup(input: &Value, name: &str) -> Option<String> {
    let text = match input.get(name)? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use vaidya_contracts::{
        error::VaidyaError,
        schema::{FieldSpec, FieldType, Shape},
    };

    use super::PromptTemplate;

    fn shape() -> Shape {
        Shape::new(vec![
            FieldSpec::required("term", FieldType::String, "The term."),
            FieldSpec::optional("context", FieldType::String, "Context."),
            FieldSpec::required("codes", FieldType::StringArray, "Codes."),
        ])
    }

    fn template() -> PromptTemplate {
        PromptTemplate::new(
            "test",
            "Role line.\nTerm: {{term}}\nContext: {{ context }}\nCodes: {{codes}}",
        )
    }

    #[test]
    fn placeholders_are_listed_once_in_order() {
        let t = PromptTemplate::new("t", "{{a}} {{b}}\n{{a}}");
        assert_eq!(t.placeholders(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            template().placeholders(),
            vec!["term".to_string(), "context".to_string(), "codes".to_string()]
        );
    }

    #[test]
    fn render_substitutes_every_field() {
        let rendered = template()
            .render(
                &json!({ "term": "Agnimandya", "context": "bloating", "codes": ["DA01", "DA02"] }),
                &shape(),
            )
            .unwrap();
        assert_eq!(
            rendered,
            "Role line.\nTerm: Agnimandya\nContext: bloating\nCodes: DA01, DA02"
        );
    }

    #[test]
    fn render_omits_line_of_absent_optional_field() {
        let rendered = template()
            .render(&json!({ "term": "Agnimandya", "codes": [] }), &shape())
            .unwrap();
        assert!(!rendered.contains("Context:"), "context line must be omitted: {rendered}");
        assert!(rendered.contains("Term: Agnimandya"));
    }

    #[test]
    fn render_omits_line_of_blank_optional_field() {
        let rendered = template()
            .render(&json!({ "term": "Agnimandya", "context": "  ", "codes": ["X"] }), &shape())
            .unwrap();
        assert!(!rendered.contains("Context:"));
    }

    #[test]
    fn render_rejects_missing_required_field() {
        let err = template()
            .render(&json!({ "codes": ["X"] }), &shape())
            .unwrap_err();
        match err {
            VaidyaError::Validation { field, .. } => assert_eq!(field, "term"),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_placeholder_is_left_verbatim() {
        let t = PromptTemplate::new("t", "Value: {{term");
        assert!(t.placeholders().is_empty());
        assert_eq!(t.render(&json!({}), &shape()).unwrap(), "Value: {{term");
    }
}
