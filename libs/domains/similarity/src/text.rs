//! Embedding input text.
//!
//! Attributes are rendered as `Label: value` segments joined by `". "`, in the
//! order they are added. Absent or blank values drop their label too, so the
//! same attributes always give the same text.

#[derive(Debug, Default)]
pub struct EmbeddingText {
    parts: Vec<String>,
}

impl EmbeddingText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, label: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.parts.push(format!("{}: {}", label, value));
        }
        self
    }

    pub fn list(self, label: &str, values: &[String]) -> Self {
        let joined = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        self.field(label, Some(&joined))
    }

    pub fn number<N: std::fmt::Display>(mut self, label: &str, value: Option<N>) -> Self {
        if let Some(value) = value {
            self.parts.push(format!("{}: {}", label, value));
        }
        self
    }

    pub fn build(self) -> String {
        self.parts.join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_in_order() {
        let text = EmbeddingText::new()
            .field("Name", Some("Alice"))
            .field("Bio", Some("loves hiking"))
            .list("Interests", &["trails".into(), "maps".into()])
            .field("Location", Some("Denver"))
            .number("Age", Some(31))
            .build();

        assert_eq!(
            text,
            "Name: Alice. Bio: loves hiking. Interests: trails, maps. Location: Denver. Age: 31"
        );
    }

    #[test]
    fn test_blank_and_missing_values_are_skipped() {
        let text = EmbeddingText::new()
            .field("Name", None)
            .field("Bio", Some("  hiking in mountains "))
            .list("Interests", &[" ".into()])
            .number::<u8>("Age", None)
            .build();

        assert_eq!(text, "Bio: hiking in mountains");
    }

    #[test]
    fn test_nothing_present_is_empty() {
        assert!(EmbeddingText::new().field("Name", Some("")).build().is_empty());
    }
}
