//! Decides whether a message asks for the payload to be saved.

pub const DEFAULT_TRIGGERS: &[&str] = &[
    "save",
    "send to notion",
    "summary send",
    "要約送信",
    "notion送信",
    "保存",
    "送って",
    "notionに送って",
];

#[derive(Clone, Debug)]
pub struct TriggerClassifier {
    phrases: Vec<String>,
}

impl Default for TriggerClassifier {
    fn default() -> Self {
        TriggerClassifier::new(DEFAULT_TRIGGERS.iter().copied())
    }
}

impl TriggerClassifier {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TriggerClassifier {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    /// Expects already lower-cased text. Matching is plain, case-sensitive
    /// substring containment.
    pub fn should_save(&self, message: &str) -> bool {
        self.phrases
            .iter()
            .any(|phrase| message.contains(phrase.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_default_phrases() {
        let classifier = TriggerClassifier::default();
        assert!(classifier.should_save("send to notion"));
        assert!(classifier.should_save("please save this"));
        assert!(classifier.should_save("この会話を保存して"));
        assert!(classifier.should_save("notionに送ってください"));
    }

    #[test]
    fn test_ignores_other_text() {
        let classifier = TriggerClassifier::default();
        assert!(!classifier.should_save("hello there"));
        assert!(!classifier.should_save("no message"));
        assert!(!classifier.should_save(""));
    }

    #[test]
    fn test_is_case_sensitive() {
        // Callers lower-case first; the phrases themselves are not folded.
        let classifier = TriggerClassifier::default();
        assert!(!classifier.should_save("SAVE"));
        assert!(classifier.should_save(&"SAVE".to_lowercase()));
    }

    #[test]
    fn test_custom_phrases() {
        let classifier = TriggerClassifier::new(["archive"]);
        assert!(classifier.should_save("archive it"));
        assert!(!classifier.should_save("save it"));
    }
}
