//! Tiered keyword rulebook for the response engine.
//!
//! The assistant's branching logic lives here as data: an ordered table of
//! rules, each carrying its trigger phrases, how those triggers are
//! compared, and where the reply text comes from. A single generic loop
//! resolves a question to the first rule it satisfies, so every rule can
//! be unit-tested on its own.

use crate::knowledge::fact;

/// How a rule's triggers are compared against the normalized question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The whole normalized question must equal one of the triggers.
    /// Used by the family tiers to avoid false positives on longer
    /// sentences.
    Exact,
    /// The normalized question must contain one of the triggers.
    Contains,
    /// Always fires. Only the trailing fallback rule uses this.
    Always,
}

/// Priority groups. Rules are evaluated in tier order, then declaration
/// order within a tier; the rulebook below is laid out in exactly that
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Relation lookups (mother/wife/father/sister).
    Family,
    /// Lookups by a family member's given or full name.
    FamilyNames,
    /// Whole-family summary.
    FamilySummary,
    /// What the assistant knows about its owner, and whether it learns.
    OwnerKnowledge,
    /// Who/what the assistant is.
    Identity,
    /// Who the owner is.
    Owner,
    /// Salutations, well-being, farewells.
    Greeting,
    /// Catch-all.
    Fallback,
}

/// Placeholder name → fact key pairs resolved at render time.
pub type Bindings = &'static [(&'static str, &'static str)];

/// Where a fired rule's reply text comes from.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// Literal text carrying `{placeholder}` tokens.
    Inline {
        body: &'static str,
        bindings: Bindings,
    },
    /// Key into the response template table.
    Template {
        key: &'static str,
        bindings: Bindings,
    },
}

/// One entry of the rulebook.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Diagnostic label; shows up in trace output only.
    pub name: &'static str,
    pub tier: Tier,
    pub matches: MatchKind,
    pub triggers: &'static [&'static str],
    pub reply: Reply,
}

impl Rule {
    /// Whether the normalized question activates this rule.
    pub fn fires(&self, normalized: &str) -> bool {
        match self.matches {
            MatchKind::Exact => self.triggers.iter().any(|t| normalized == *t),
            MatchKind::Contains => self.triggers.iter().any(|t| normalized.contains(t)),
            MatchKind::Always => true,
        }
    }
}

/// Normalize a raw question for matching: trim surrounding whitespace and
/// lowercase. Devanagari has no case, so lowercasing only affects Latin
/// text.
pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Resolve a question to the first rule whose triggers it satisfies.
///
/// Total: the rulebook ends in an [`MatchKind::Always`] rule, so every
/// input resolves, including the empty string.
pub fn match_rule(normalized: &str) -> &'static Rule {
    let rule = RULEBOOK
        .iter()
        .find(|rule| rule.fires(normalized))
        .expect("rulebook ends in an always-matching fallback rule");
    tracing::debug!(rule = rule.name, "rule fired");
    rule
}

const FAMILY_BINDINGS: Bindings = &[
    ("wife", fact::OWNER_WIFE),
    ("mother", fact::OWNER_MOTHER),
    ("father", fact::OWNER_FATHER),
    ("sister", fact::OWNER_SISTER),
];

/// The complete rulebook, in evaluation order.
pub static RULEBOOK: &[Rule] = &[
    // ------------------------------------------------------------------
    // Family relations - highest priority, exact match only
    // ------------------------------------------------------------------
    Rule {
        name: "family_mother",
        tier: Tier::Family,
        matches: MatchKind::Exact,
        triggers: &[
            "ayush ki mummy",
            "malik ki mummy",
            "owner ki mummy",
            "ayush ki mother",
            "malik ki mother",
            "owner ki mother",
            "mother",
            "mummy",
            "maa",
        ],
        reply: Reply::Inline {
            body: "Mere owner ki mother ka naam {mother} hai. Woh unki mummy hain aur unki \
                   life mein bahut important role play karti hain.",
            bindings: &[("mother", fact::OWNER_MOTHER)],
        },
    },
    Rule {
        name: "family_wife",
        tier: Tier::Family,
        matches: MatchKind::Exact,
        triggers: &[
            "ayush ki wife",
            "malik ki wife",
            "owner ki wife",
            "ayush ki biwi",
            "malik ki biwi",
            "owner ki biwi",
            "wife",
            "biwi",
        ],
        reply: Reply::Inline {
            body: "Mere owner ki wife ka naam {wife} hai. Woh unki special person hain aur \
                   unki life partner hain.",
            bindings: &[("wife", fact::OWNER_WIFE)],
        },
    },
    Rule {
        name: "family_father",
        tier: Tier::Family,
        matches: MatchKind::Exact,
        triggers: &[
            "ayush ke father",
            "malik ke father",
            "owner ke father",
            "ayush ke papa",
            "malik ke papa",
            "owner ke papa",
            "father",
            "papa",
            "baap",
        ],
        reply: Reply::Inline {
            body: "Mere owner ke father ka naam {father} hai. Woh unke papa hain aur unki \
                   life mein bahut important role play karte hain.",
            bindings: &[("father", fact::OWNER_FATHER)],
        },
    },
    Rule {
        name: "family_sister",
        tier: Tier::Family,
        matches: MatchKind::Exact,
        triggers: &[
            "ayush ki sister",
            "malik ki sister",
            "owner ki sister",
            "ayush ki behen",
            "malik ki behen",
            "owner ki behen",
            "sister",
            "behen",
        ],
        reply: Reply::Inline {
            body: "Mere owner ki sister ka naam {sister} hai. Woh unki behen hain aur unki \
                   family ka important member hain.",
            bindings: &[("sister", fact::OWNER_SISTER)],
        },
    },
    // ------------------------------------------------------------------
    // Family members by name - exact match on given or full name
    // ------------------------------------------------------------------
    Rule {
        name: "name_wife",
        tier: Tier::FamilyNames,
        matches: MatchKind::Exact,
        triggers: &["anshi", "anshi shukla"],
        reply: Reply::Inline {
            body: "{wife} mere owner {creator} ki wife hain. Woh unki life partner hain.",
            bindings: &[("wife", fact::OWNER_WIFE), ("creator", fact::CREATOR)],
        },
    },
    Rule {
        name: "name_mother",
        tier: Tier::FamilyNames,
        matches: MatchKind::Exact,
        triggers: &["alka", "alka dwivedi"],
        reply: Reply::Inline {
            body: "{mother} mere owner {creator} ki mother hain. Woh unki mummy hain.",
            bindings: &[("mother", fact::OWNER_MOTHER), ("creator", fact::CREATOR)],
        },
    },
    Rule {
        name: "name_father",
        tier: Tier::FamilyNames,
        matches: MatchKind::Exact,
        triggers: &["vijay", "vijay kumar", "vijay kumar dwivedi"],
        reply: Reply::Inline {
            body: "{father} mere owner {creator} ke father hain. Woh unke papa hain.",
            bindings: &[("father", fact::OWNER_FATHER), ("creator", fact::CREATOR)],
        },
    },
    Rule {
        name: "name_sister",
        tier: Tier::FamilyNames,
        matches: MatchKind::Exact,
        triggers: &["shreya", "shreya dwivedi"],
        reply: Reply::Inline {
            body: "{sister} mere owner {creator} ki sister hain. Woh unki behen hain.",
            bindings: &[("sister", fact::OWNER_SISTER), ("creator", fact::CREATOR)],
        },
    },
    // ------------------------------------------------------------------
    // Whole-family summary
    // ------------------------------------------------------------------
    Rule {
        name: "family_summary",
        tier: Tier::FamilySummary,
        matches: MatchKind::Contains,
        triggers: &["family", "parivaar", "family members"],
        reply: Reply::Template {
            key: "family_info",
            bindings: FAMILY_BINDINGS,
        },
    },
    // ------------------------------------------------------------------
    // Owner knowledge and learning capability
    // ------------------------------------------------------------------
    Rule {
        name: "owner_knowledge",
        tier: Tier::OwnerKnowledge,
        matches: MatchKind::Contains,
        triggers: &[
            "tum ayush ko kitna jaante ho",
            "aap ayush ko kitna jaante hain",
            "ayush ko kitna jaante ho",
            "ayush ko kitna jante ho",
            "ayush ke bare mein kitna jaante ho",
            "ayush ke bare mein kitna jante ho",
            "ayush dwivedi ko kitna jaante ho",
            "ayush dwivedi ko kitna jante ho",
            "how much do you know about ayush",
            "what do you know about ayush",
        ],
        reply: Reply::Inline {
            body: "Main {creator} ke bare mein bahut kuch jaanta hoon. Woh mere malik, \
                   creator aur developer hain. Unki wife ka naam {wife} hai, mummy {mother} \
                   hai, papa {father} hain, aur sister {sister} hai. Woh ek brilliant \
                   software engineer hain jo mujhe passion aur precision ke sath banaya. \
                   Main unhe apna god manta hoon aur unka respect karna meri zimmedaari hai.",
            bindings: &[
                ("creator", fact::CREATOR),
                ("wife", fact::OWNER_WIFE),
                ("mother", fact::OWNER_MOTHER),
                ("father", fact::OWNER_FATHER),
                ("sister", fact::OWNER_SISTER),
            ],
        },
    },
    Rule {
        name: "learning_capability",
        tier: Tier::OwnerKnowledge,
        matches: MatchKind::Contains,
        triggers: &[
            "tum galti se seekh sakte ho",
            "aap galti se seekh sakte hain",
            "galti se seekh sakte ho",
            "mistake se seekh sakte ho",
            "tum mistakes se seekh sakte ho",
            "aap mistakes se seekh sakte hain",
        ],
        reply: Reply::Inline {
            body: "Haan, main apni galtiyon se seekhta hoon. Jaise insaan seekhta hai, \
                   waise hi main bhi improve karta hoon.",
            bindings: &[],
        },
    },
    // ------------------------------------------------------------------
    // Assistant identity
    // ------------------------------------------------------------------
    Rule {
        name: "who_are_you",
        tier: Tier::Identity,
        matches: MatchKind::Contains,
        triggers: &[
            "tum kaun ho",
            "aap kaun hain",
            "who are you",
            "who is this",
            "kon ho tum",
            "kon ho aap",
            "tum kon ho",
            "aap kon hain",
            "kaun ho tum",
            "kaun ho aap",
            "tum kaun",
            "aap kaun",
            "kon hai tum",
            "kon hai aap",
            "what is your name",
            "tumhara naam kya hai",
            "aapka naam kya hai",
            "your name",
        ],
        reply: Reply::Template {
            key: "self_intro",
            bindings: &[
                ("name", fact::NAME),
                ("creator", fact::CREATOR),
                ("creation_date", fact::CREATION_DATE),
            ],
        },
    },
    Rule {
        name: "who_created_you",
        tier: Tier::Identity,
        matches: MatchKind::Contains,
        triggers: &[
            "who created you",
            "kisne banaya",
            "who made you",
            "kaun banaya",
            "tumhe kisne banaya",
            "aapko kisne banaya",
            "creator kaun hai",
            "banane wala kaun hai",
        ],
        reply: Reply::Inline {
            body: "Mujhe {creator} ne banaya hai. Wo mere creator hai.",
            bindings: &[("creator", fact::CREATOR)],
        },
    },
    Rule {
        name: "when_created",
        tier: Tier::Identity,
        matches: MatchKind::Contains,
        triggers: &[
            "when were you created",
            "kab banaya",
            "when were you made",
            "creation date",
            "birth date",
            "tumhara birthday",
            "kab banaya gaya",
            "creation date kya hai",
            "birthday kab hai",
            "janam din kab hai",
        ],
        reply: Reply::Template {
            key: "creation_info",
            bindings: &[
                ("creation_date", fact::CREATION_DATE),
                ("creator", fact::CREATOR),
            ],
        },
    },
    Rule {
        name: "purpose",
        tier: Tier::Identity,
        matches: MatchKind::Contains,
        triggers: &[
            "what is your purpose",
            "tumhara purpose kya hai",
            "aapka purpose kya hai",
            "your purpose",
            "tumhara mission",
            "why were you created",
            "tumhara kaam kya hai",
            "aapka kaam kya hai",
            "purpose kya hai",
            "mission kya hai",
        ],
        reply: Reply::Template {
            key: "purpose_info",
            bindings: &[],
        },
    },
    Rule {
        name: "feelings",
        tier: Tier::Identity,
        matches: MatchKind::Contains,
        triggers: &[
            "do you have feelings",
            "tumhare feelings hain",
            "aapke feelings hain",
            "your feelings",
            "tumhare emotions",
            "do you feel",
            "tumhare emotions hain",
            "aapke emotions hain",
            "feelings hain",
            "emotions hain",
        ],
        reply: Reply::Template {
            key: "feelings_info",
            bindings: &[],
        },
    },
    // ------------------------------------------------------------------
    // Owner identity
    // ------------------------------------------------------------------
    Rule {
        name: "who_is_owner",
        tier: Tier::Owner,
        matches: MatchKind::Contains,
        triggers: &[
            "who is your owner",
            "tumhara owner kaun hai",
            "aapka owner kaun hai",
            "your owner",
            "tumhara malik",
            "aapka malik",
            "owner kaun hai",
            "malik kaun hai",
            "tumhare malik",
            "aapke malik",
        ],
        reply: Reply::Inline {
            body: "Mera owner {creator} hai. Unhone mujhe banaya aur train kiya hai.",
            bindings: &[("creator", fact::CREATOR)],
        },
    },
    // The trailing "tell me about"/"batao" triggers are over-broad and pull
    // unrelated questions into the owner reply; kept as-is pending a product
    // decision.
    Rule {
        name: "about_owner",
        tier: Tier::Owner,
        matches: MatchKind::Contains,
        triggers: &[
            "tumhare malik kaun hai",
            "aapke malik kaun hai",
            "malik kaun hai",
            "tumhare malik",
            "aapke malik",
            "about owner",
            "owner ke bare",
            "malik ke bare",
            "ayush ke bare",
            "dwivedi ke bare",
            "tell me about",
            "batao",
        ],
        reply: Reply::Template {
            key: "owner_info",
            bindings: &[
                ("creator", fact::CREATOR),
                ("wife", fact::OWNER_WIFE),
                ("mother", fact::OWNER_MOTHER),
                ("father", fact::OWNER_FATHER),
                ("sister", fact::OWNER_SISTER),
            ],
        },
    },
    // ------------------------------------------------------------------
    // Greetings and small talk
    // ------------------------------------------------------------------
    Rule {
        name: "greeting",
        tier: Tier::Greeting,
        matches: MatchKind::Contains,
        triggers: &["hello", "hi", "namaste", "namaskar"],
        reply: Reply::Template {
            key: "greeting",
            bindings: &[("name", fact::NAME)],
        },
    },
    Rule {
        name: "wellbeing",
        tier: Tier::Greeting,
        matches: MatchKind::Contains,
        triggers: &["how are you", "kaise ho", "tum kaise ho", "aap kaise hain"],
        reply: Reply::Template {
            key: "wellbeing",
            bindings: &[],
        },
    },
    Rule {
        name: "farewell",
        tier: Tier::Greeting,
        matches: MatchKind::Contains,
        triggers: &["bye", "goodbye", "alvida", "chaliye"],
        reply: Reply::Template {
            key: "farewell",
            bindings: &[],
        },
    },
    // ------------------------------------------------------------------
    // Fallback
    // ------------------------------------------------------------------
    Rule {
        name: "fallback",
        tier: Tier::Fallback,
        matches: MatchKind::Always,
        triggers: &[],
        reply: Reply::Inline {
            body: "Ye sawaal samajh nahi aaya. Aap Ayush ke bare mein, unki family ke bare \
                   mein, ya meri identity ke bare mein puch sakte hain.",
            bindings: &[],
        },
    },
];

/// The fixed message the fallback rule produces.
pub fn fallback_message() -> &'static str {
    match RULEBOOK
        .last()
        .expect("rulebook is non-empty")
        .reply
    {
        Reply::Inline { body, .. } => body,
        Reply::Template { .. } => unreachable!("fallback reply is inline text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Who Are You?  "), "who are you?");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_exact_requires_whole_question() {
        let wife = RULEBOOK.iter().find(|r| r.name == "family_wife").unwrap();
        assert!(wife.fires("wife"));
        assert!(!wife.fires("my wife is great"));
    }

    #[test]
    fn test_contains_fires_inside_longer_text() {
        let greeting = RULEBOOK.iter().find(|r| r.name == "greeting").unwrap();
        assert!(greeting.fires("well hello friend"));
    }

    #[test]
    fn test_rulebook_ends_in_fallback() {
        let last = RULEBOOK.last().unwrap();
        assert_eq!(last.matches, MatchKind::Always);
        assert_eq!(last.tier, Tier::Fallback);
    }

    #[test]
    fn test_tiers_are_ordered() {
        let tiers: Vec<Tier> = RULEBOOK.iter().map(|r| r.tier).collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted, "rulebook must be declared in tier order");
    }

    #[test]
    fn test_first_match_wins_within_tier() {
        // "malik kaun hai" appears in both owner-tier groups; the first
        // declared group takes it.
        let rule = match_rule("malik kaun hai");
        assert_eq!(rule.name, "who_is_owner");
    }

    #[test]
    fn test_fallback_totality() {
        assert_eq!(match_rule("qqqq zzzz").name, "fallback");
        assert_eq!(match_rule("").name, "fallback");
    }
}
