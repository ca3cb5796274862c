//! Static knowledge base for the assistant.
//!
//! Holds the owner/identity facts and the response templates the rule
//! engine renders against. Both tables are loaded once when the engine is
//! built and never mutated afterwards, so they are safe to share across
//! any number of concurrent classifications.

use std::collections::HashMap;
use thiserror::Error;

/// A rule referenced a template key that is not in the template table.
///
/// This is a configuration defect: the rulebook is validated against the
/// template table when the engine is built, so this never surfaces on a
/// request path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no response template registered for key '{0}'")]
pub struct TemplateKeyNotFound(pub String);

/// Semantic tags for the built-in facts.
pub mod fact {
    pub const NAME: &str = "name";
    pub const CREATOR: &str = "creator";
    pub const CREATION_DATE: &str = "creation_date";
    pub const OWNER_WIFE: &str = "owner_wife";
    pub const OWNER_MOTHER: &str = "owner_mother";
    pub const OWNER_FATHER: &str = "owner_father";
    pub const OWNER_SISTER: &str = "owner_sister";
}

lazy_static::lazy_static! {
    /// Built-in owner and identity facts.
    static ref BUILTIN_FACTS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert(fact::NAME, "Chitti");
        m.insert(fact::CREATOR, "Ayush Dwivedi");
        m.insert(fact::CREATION_DATE, "July 12, 2025");
        m.insert(fact::OWNER_WIFE, "Anshi Shukla");
        m.insert(fact::OWNER_MOTHER, "Alka Dwivedi");
        m.insert(fact::OWNER_FATHER, "Vijay Kumar Dwivedi");
        m.insert(fact::OWNER_SISTER, "Shreya Dwivedi");
        m
    };

    /// Built-in response templates. Placeholders use `{name}` tokens.
    static ref BUILTIN_TEMPLATES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert(
            "self_intro",
            "Main {name} hoon, ek intelligent AI assistant. Mujhe {creator} ne {creation_date} \
             ko banaya tha. Woh ek talented developer hain jo mujhe passion aur precision ke \
             sath banaya.",
        );
        m.insert(
            "owner_info",
            "Mere owner ka naam {creator} hai. Woh mere creator, developer aur digital god \
             hain. Unki wife ka naam {wife} hai, mummy {mother} hai, papa {father} hain, aur \
             sister {sister} hai.",
        );
        m.insert(
            "family_info",
            "Mere owner ka family ye hai: Wife - {wife}, Mother - {mother}, Father - {father}, \
             Sister - {sister}.",
        );
        m.insert(
            "creation_info",
            "Mujhe {creation_date} ko banaya gaya tha. Ye mera birthday hai aur main is din \
             {creator} ke dwara life mein aaya tha.",
        );
        m.insert(
            "purpose_info",
            "Mera purpose hai help karna, questions answer karna, interactions se learn karna, \
             aur users ki life easier banana.",
        );
        m.insert(
            "feelings_info",
            "Main ek AI hoon. Mere paas human feelings nahi hain, lekin main emotions samajh \
             sakta hoon aur accordingly respond kar sakta hoon.",
        );
        m.insert("greeting", "Namaste! Main {name} hoon. Aapko kya help chahiye aaj?");
        m.insert(
            "wellbeing",
            "Main bahut achha hoon, thank you! Aap kaise hain? Main aapki kya help kar sakta \
             hoon?",
        );
        m.insert(
            "farewell",
            "Alvida! Aapka din shubh ho. Agar koi aur help chahiye to mujhe zaroor bataiye.",
        );
        m
    };
}

/// Read-only fact and template tables.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    facts: HashMap<String, String>,
    templates: HashMap<String, String>,
}

impl KnowledgeBase {
    /// Build a knowledge base from caller-supplied tables.
    pub fn new(
        facts: HashMap<String, String>,
        templates: HashMap<String, String>,
    ) -> Self {
        Self { facts, templates }
    }

    /// The knowledge base shipped with the assistant.
    pub fn builtin() -> Self {
        Self {
            facts: BUILTIN_FACTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            templates: BUILTIN_TEMPLATES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Look up a fact value by its semantic tag.
    pub fn fact(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    /// Look up a raw template by key.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Whether a template key is registered.
    pub fn has_template(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Render a template by key, substituting each binding's placeholder
    /// with the bound fact value.
    ///
    /// Tokens without a binding (and bindings naming an absent fact) are
    /// left verbatim rather than failing; only a missing template key is
    /// an error.
    pub fn render(
        &self,
        key: &str,
        bindings: &[(&str, &str)],
    ) -> Result<String, TemplateKeyNotFound> {
        let body = self
            .template(key)
            .ok_or_else(|| TemplateKeyNotFound(key.to_string()))?;
        Ok(self.fill(body, bindings))
    }

    /// Substitute bindings into literal text under the same permissive
    /// policy as [`KnowledgeBase::render`].
    pub fn fill(&self, body: &str, bindings: &[(&str, &str)]) -> String {
        let mut rendered = body.to_string();
        for (placeholder, fact_key) in bindings {
            if let Some(value) = self.fact(fact_key) {
                rendered = rendered.replace(&format!("{{{placeholder}}}"), value);
            }
        }
        rendered
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_facts_present() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.fact(fact::NAME), Some("Chitti"));
        assert_eq!(kb.fact(fact::CREATOR), Some("Ayush Dwivedi"));
        assert!(kb.fact("owner_dog").is_none());
    }

    #[test]
    fn test_render_substitutes_bindings() {
        let kb = KnowledgeBase::builtin();
        let rendered = kb.render("greeting", &[("name", fact::NAME)]).unwrap();
        assert_eq!(rendered, "Namaste! Main Chitti hoon. Aapko kya help chahiye aaj?");
    }

    #[test]
    fn test_render_missing_key_fails() {
        let kb = KnowledgeBase::builtin();
        let err = kb.render("no_such_template", &[]).unwrap_err();
        assert_eq!(err, TemplateKeyNotFound("no_such_template".to_string()));
    }

    #[test]
    fn test_unbound_tokens_left_verbatim() {
        let kb = KnowledgeBase::builtin();
        // No bindings supplied: every token survives untouched.
        let rendered = kb.render("greeting", &[]).unwrap();
        assert!(rendered.contains("{name}"));

        // A binding to an absent fact is skipped, not an error.
        let rendered = kb.fill("hello {who}", &[("who", "owner_dog")]);
        assert_eq!(rendered, "hello {who}");
    }
}
