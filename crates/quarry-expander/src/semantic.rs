//! Local semantic expansion: keyword triggers mapped to related concepts
//!
//! The rule table is hand-curated domain knowledge. Rules are evaluated
//! independently and additively, in table order; no rule suppresses another.

use crate::filter::tokenize;

/// Predicate deciding whether a rule fires for a normalized query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires when the query contains the text anywhere
    Contains(&'static str),
    /// Fires when the query contains the text as whole word(s)
    Word(&'static str),
}

impl Trigger {
    fn matches(&self, query: &str, padded_words: &str) -> bool {
        match self {
            Trigger::Contains(needle) => query.contains(needle),
            Trigger::Word(word) => padded_words.contains(&format!(" {} ", word)),
        }
    }
}

/// One thematic cluster of the local expander
#[derive(Debug, Clone, Copy)]
pub struct SemanticRule {
    /// Cluster name, for logs
    pub name: &'static str,
    /// Any matching trigger fires the rule
    pub triggers: &'static [Trigger],
    /// Concepts emitted when the rule fires
    pub concepts: &'static [&'static str],
}

use Trigger::{Contains, Word};

/// Ordered rule table
pub static SEMANTIC_RULES: &[SemanticRule] = &[
    SemanticRule {
        name: "optimism",
        triggers: &[Contains("optimis"), Contains("utopia"), Contains("abundance"), Contains("accelerat"), Word("boomer")],
        concepts: &["optimist", "accelerationist", "abundance", "progress", "opportunity", "transformative"],
    },
    SemanticRule {
        name: "pessimism",
        triggers: &[Contains("doom"), Contains("pessimis"), Contains("extinction"), Contains("apocalyp"), Contains("catastroph")],
        concepts: &["doomer", "pessimist", "existential", "catastrophic", "warning", "collapse"],
    },
    SemanticRule {
        name: "skepticism",
        triggers: &[Contains("bubble"), Contains("hype"), Contains("overhyped")],
        concepts: &["realist", "skeptic", "grounding", "limitation", "critical", "bubble"],
    },
    SemanticRule {
        name: "safety",
        triggers: &[Contains("safety"), Contains("alignment"), Contains("danger"), Word("risk"), Word("risks")],
        concepts: &["safety", "alignment", "risk", "guardrails", "interpretability", "oversight"],
    },
    SemanticRule {
        name: "scaling",
        triggers: &[Contains("scaling"), Contains("compute"), Contains("parameters"), Word("scale"), Word("gpu"), Word("gpus")],
        concepts: &["scaling", "compute", "scaling laws", "emergent", "capabilities", "training"],
    },
    SemanticRule {
        name: "labor",
        triggers: &[Contains("employ"), Contains("labor"), Contains("labour"), Contains("automation"), Contains("replace"), Word("job"), Word("jobs"), Word("work"), Word("workers")],
        concepts: &["labor", "automation", "displacement", "employment", "workforce", "economy"],
    },
    SemanticRule {
        name: "regulation",
        triggers: &[Contains("regulat"), Contains("policy"), Contains("govern"), Contains("legislat"), Word("law"), Word("laws")],
        concepts: &["regulation", "policy", "governance", "legislation", "compliance", "oversight"],
    },
    SemanticRule {
        name: "open_source",
        triggers: &[Contains("open source"), Contains("open-source"), Contains("open weight"), Contains("open-weight"), Word("llama")],
        concepts: &["open source", "open weights", "transparency", "community", "democratization"],
    },
    SemanticRule {
        name: "enterprise",
        triggers: &[Contains("enterprise"), Contains("business"), Contains("adoption"), Contains("productivity"), Contains("compan"), Word("roi")],
        concepts: &["enterprise", "adoption", "productivity", "business value", "deployment", "integration"],
    },
    SemanticRule {
        name: "ethics",
        triggers: &[Contains("ethic"), Contains("bias"), Contains("fairness"), Contains("moral"), Contains("responsib")],
        concepts: &["ethics", "bias", "fairness", "accountability", "responsible", "harm"],
    },
    SemanticRule {
        name: "agi",
        triggers: &[Contains("superintelligen"), Contains("general intelligence"), Contains("singularity"), Contains("sentien"), Word("agi"), Word("asi")],
        concepts: &["agi", "superintelligence", "general intelligence", "timelines", "singularity"],
    },
    SemanticRule {
        name: "research",
        triggers: &[Contains("research"), Contains("academ"), Contains("benchmark"), Word("paper"), Word("papers"), Word("study")],
        concepts: &["research", "academic", "benchmark", "evidence", "peer review"],
    },
];

/// Lexical variants for recognized domain terms, matched on whole words
static SYNONYMS: &[(&str, &[&str])] = &[
    ("ai", &["artificial intelligence", "machine learning"]),
    ("artificial intelligence", &["machine intelligence"]),
    ("ml", &["machine learning"]),
    ("llm", &["large language model", "language model"]),
    ("llms", &["large language models", "language models"]),
    ("agi", &["artificial general intelligence", "superintelligence"]),
    ("gpt", &["chatgpt", "openai"]),
    ("job", &["employment", "work", "labor"]),
    ("jobs", &["employment", "work", "labor"]),
    ("regulation", &["policy", "governance", "legislation"]),
    ("risk", &["danger", "threat"]),
    ("risks", &["dangers", "threats"]),
    ("safety", &["alignment", "security"]),
    ("bubble", &["hype", "overvaluation"]),
    ("open source", &["open-source", "open weights"]),
    ("automation", &["robots", "mechanization"]),
];

/// Pad tokenized words with spaces so whole-word checks are plain substring checks
fn padded(query: &str) -> String {
    format!(" {} ", tokenize(query).join(" "))
}

/// Concepts from every rule that fires for the query, in table order, deduplicated
pub fn expand_semantics(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let words = padded(&lowered);

    let mut concepts: Vec<String> = Vec::new();
    for rule in SEMANTIC_RULES {
        if rule.triggers.iter().any(|t| t.matches(&lowered, &words)) {
            tracing::trace!(rule = rule.name, "Semantic rule fired");
            for concept in rule.concepts {
                if !concepts.iter().any(|c| c == concept) {
                    concepts.push((*concept).to_string());
                }
            }
        }
    }
    concepts
}

/// Fixed lexical variants for recognized domain terms in the query
pub fn expand_with_synonyms(query: &str) -> Vec<String> {
    let words = padded(query);

    let mut out: Vec<String> = Vec::new();
    for (term, variants) in SYNONYMS {
        if words.contains(&format!(" {} ", term)) {
            for variant in *variants {
                if !out.iter().any(|v| v == variant) {
                    out.push((*variant).to_string());
                }
            }
        }
    }
    out
}
