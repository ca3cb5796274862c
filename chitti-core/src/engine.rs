//! The response engine: match, render, detect, score.
//!
//! `ChatEngine` is a pure, synchronous computation over the read-only
//! knowledge and rule tables. It holds no mutable state, so one engine can
//! serve any number of concurrent requests without locking; persistence of
//! the result is the caller's concern.

use crate::knowledge::{fact, KnowledgeBase, TemplateKeyNotFound};
use crate::language::{self, Language};
use crate::rules::{self, Reply, Rule, RULEBOOK};
use serde::{Deserialize, Serialize};

/// Result of classifying one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The rendered reply text.
    pub response: String,
    /// Detected language of the question.
    pub language: Language,
    /// Lexical confidence heuristic in [0, 1].
    pub confidence: f64,
}

/// The rule-based response engine.
#[derive(Debug)]
pub struct ChatEngine {
    knowledge: KnowledgeBase,
}

impl ChatEngine {
    /// Build an engine over a knowledge base.
    ///
    /// Every template reference in the rulebook is validated here, so a
    /// rule naming a missing template fails at startup instead of on a
    /// request path.
    pub fn new(knowledge: KnowledgeBase) -> Result<Self, TemplateKeyNotFound> {
        for rule in RULEBOOK {
            if let Reply::Template { key, .. } = rule.reply {
                if !knowledge.has_template(key) {
                    return Err(TemplateKeyNotFound(key.to_string()));
                }
            }
        }
        Ok(Self { knowledge })
    }

    /// Engine over the built-in knowledge base.
    pub fn builtin() -> Result<Self, TemplateKeyNotFound> {
        Self::new(KnowledgeBase::builtin())
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Classify a question: resolve the first matching rule, render its
    /// reply, detect the question's language and score the rendered
    /// response.
    ///
    /// Never fails. Unmatched input resolves to the fallback rule, not an
    /// error.
    pub fn classify(&self, question: &str) -> Classification {
        let question = question.trim();
        let normalized = rules::normalize(question);
        let rule = rules::match_rule(&normalized);

        let response = self.render(rule);
        let language = language::detect(question);
        let confidence = self.confidence(&response);

        tracing::debug!(
            rule = rule.name,
            %language,
            confidence,
            "question classified"
        );

        Classification {
            response,
            language,
            confidence,
        }
    }

    fn render(&self, rule: &Rule) -> String {
        match rule.reply {
            Reply::Inline { body, bindings } => self.knowledge.fill(body, bindings),
            Reply::Template { key, bindings } => self
                .knowledge
                .render(key, bindings)
                // Checked when the engine was built.
                .expect("rulebook template keys are validated at construction"),
        }
    }

    /// Lexical confidence heuristic over the rendered response.
    ///
    /// 0.95 when the reply names one of the owner's family facts, 0.80 for
    /// first-person phrasing, 0.50 otherwise. Token matching is
    /// case-sensitive; this is a heuristic score with no probabilistic
    /// basis.
    fn confidence(&self, response: &str) -> f64 {
        const FAMILY_FACTS: [&str; 5] = [
            fact::CREATOR,
            fact::OWNER_WIFE,
            fact::OWNER_MOTHER,
            fact::OWNER_FATHER,
            fact::OWNER_SISTER,
        ];
        let named_fact = FAMILY_FACTS
            .iter()
            .filter_map(|key| self.knowledge.fact(key))
            .any(|value| response.contains(value));
        if named_fact {
            return 0.95;
        }

        const FIRST_PERSON: [&str; 3] = ["Main", "Mera", "Mujhe"];
        if FIRST_PERSON.iter().any(|token| response.contains(token)) {
            return 0.80;
        }

        0.50
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ChatEngine {
        ChatEngine::builtin().expect("builtin knowledge base is valid")
    }

    #[test]
    fn test_builtin_validates() {
        assert!(ChatEngine::builtin().is_ok());
    }

    #[test]
    fn test_missing_template_fails_at_build() {
        use std::collections::HashMap;
        // Facts without any templates: every Template rule is now broken.
        let kb = KnowledgeBase::new(HashMap::new(), HashMap::new());
        let err = ChatEngine::new(kb).unwrap_err();
        assert!(!err.0.is_empty());
    }

    #[test]
    fn test_classify_mother() {
        let result = engine().classify("mummy");
        assert!(result.response.contains("Alka Dwivedi"));
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_classify_creator() {
        let result = engine().classify("who created you");
        assert_eq!(
            result.response,
            "Mujhe Ayush Dwivedi ne banaya hai. Wo mere creator hai."
        );
        assert_eq!(result.language, Language::English);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_confidence_first_person_without_facts() {
        // Purpose reply opens with "Mera" and names no family member.
        let result = engine().classify("what is your purpose");
        assert_eq!(result.confidence, 0.80);
    }

    #[test]
    fn test_fallback_confidence() {
        let result = engine().classify("qqqq zzzz");
        assert_eq!(result.response, rules::fallback_message());
        assert_eq!(result.confidence, 0.50);
    }
}
