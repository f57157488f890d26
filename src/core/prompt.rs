//! Prompt construction for the classification and objective flows.
//!
//! The formatting rules in [`objectives_prompt`] are instructions to the
//! model only; nothing checks the reply against them.

use crate::domain::model::{ClassMatch, NicEntry, Objective};

pub const CLASSIFICATION_SYSTEM_PROMPT: &str = "You are a trademark classification assistant.";

pub const OBJECTIVES_SYSTEM_PROMPT: &str =
    "You are an expert corporate secretary who drafts the main objects clause of company incorporation documents.";

pub const OBJECTIVE_OPENING_PHRASE: &str = "To carry on the business of";

pub const MAX_OBJECTIVES_CHARS: usize = 4000;

pub fn class_context(matches: &[ClassMatch]) -> String {
    matches
        .iter()
        .map(|m| format!("Class {}: {}", m.id, m.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn classification_prompt(objective: &Objective, matches: &[ClassMatch]) -> String {
    format!(
        "You are an expert in trademark classification. Given the following objective:\n\
         \n\
         \"{objective}\"\n\
         \n\
         And these possible trademark classes:\n\
         {context}\n\
         \n\
         Pick the single class that best fits the objective. \
         Reply with the class number followed by a short justification.",
        objective = objective.original,
        context = class_context(matches),
    )
}

pub fn nic_context(entries: &[NicEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("NIC {}: {}", e.code, e.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn objectives_prompt(entries: &[NicEntry]) -> String {
    format!(
        "Write the main objects of a company for each of the following NIC codes:\n\
         \n\
         {context}\n\
         \n\
         Follow these rules:\n\
         1. Write exactly one paragraph for each NIC code, in the order given.\n\
         2. Do not end a paragraph with the NIC code number.\n\
         3. Use a formal, professional tone.\n\
         4. Do not use first-person phrasing such as \"we\", \"our\" or \"I\".\n\
         5. Keep the whole response under {max_chars} characters.\n\
         6. Begin every paragraph with \"{opening}\".",
        context = nic_context(entries),
        max_chars = MAX_OBJECTIVES_CHARS,
        opening = OBJECTIVE_OPENING_PHRASE,
    )
}
