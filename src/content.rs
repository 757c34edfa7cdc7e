//! User-authored content as seen by the translation subsystem.
//!
//! Storage, pagination and authentication live elsewhere; this module only
//! describes what they hand over: an id, a text, and the language the text
//! was written in.

use crate::policy::DEFAULT_CONTENT_LANGUAGE;
use serde::{Deserialize, Serialize};

/// A single translatable string with its identity and authored language.
pub trait AuthoredContent {
    fn id(&self) -> &str;

    fn text(&self) -> &str;

    fn language(&self) -> &str {
        DEFAULT_CONTENT_LANGUAGE
    }
}

fn default_language() -> String {
    DEFAULT_CONTENT_LANGUAGE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Identity of the authenticated author, supplied by the session layer
    pub author_id: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub body: String,
    pub author_id: String,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Borrowed view of one translatable field of a question or answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentField<'a> {
    id: &'a str,
    text: &'a str,
    language: &'a str,
}

impl<'a> ContentField<'a> {
    pub fn new(id: &'a str, text: &'a str, language: &'a str) -> Self {
        Self { id, text, language }
    }
}

impl AuthoredContent for ContentField<'_> {
    fn id(&self) -> &str {
        self.id
    }

    fn text(&self) -> &str {
        self.text
    }

    fn language(&self) -> &str {
        self.language
    }
}

impl Question {
    pub fn title_content(&self) -> ContentField<'_> {
        ContentField::new(&self.id, &self.title, &self.language)
    }

    pub fn body_content(&self) -> ContentField<'_> {
        ContentField::new(&self.id, &self.body, &self.language)
    }
}

impl Answer {
    pub fn body_content(&self) -> ContentField<'_> {
        ContentField::new(&self.id, &self.body, &self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_defaults_to_native_language() {
        let question: Question = serde_json::from_str(
            r#"{"id":"q1","title":"質問","body":"本文","authorId":"u1"}"#,
        )
        .expect("Should parse");

        assert_eq!(question.language, "ja");
        assert_eq!(question.title_content().text(), "質問");
        assert_eq!(question.body_content().text(), "本文");
        assert_eq!(question.body_content().id(), "q1");
        assert_eq!(question.body_content().language(), "ja");
    }

    #[test]
    fn test_answer_body_content() {
        let answer = Answer {
            id: "a1".to_string(),
            question_id: "q1".to_string(),
            body: "Answer body".to_string(),
            author_id: "u2".to_string(),
            language: "en".to_string(),
        };

        let field = answer.body_content();
        assert_eq!(field.id(), "a1");
        assert_eq!(field.text(), "Answer body");
        assert_eq!(field.language(), "en");
    }

    #[test]
    fn test_trait_default_language() {
        struct Plain;
        impl AuthoredContent for Plain {
            fn id(&self) -> &str {
                "p"
            }
            fn text(&self) -> &str {
                "text"
            }
        }

        assert_eq!(Plain.language(), DEFAULT_CONTENT_LANGUAGE);
    }
}
