//! Input normalization for both flows.
//!
//! Everything here is a pure function of its input: the same raw text always
//! produces the same [`Objective`] or [`NicParse`].

use crate::domain::model::{NicEntry, NicParse, Objective, SkipReason, SkippedLine};
use crate::utils::error::{AssistError, Result};

pub const MIN_OBJECTIVE_CHARS: usize = 5;

pub const INVALID_OBJECTIVE_MESSAGE: &str =
    "Invalid input. Please provide a meaningful objective.";
pub const EMPTY_NIC_INPUT_MESSAGE: &str = "Please enter at least one NIC code and description.";
pub const NO_VALID_NIC_ENTRIES_MESSAGE: &str =
    "No valid NIC entries could be parsed. Enter one entry per line as '<code> - <description>'.";

pub fn normalize_objective(raw: &str) -> Result<Objective> {
    let original = raw.trim();

    if original.chars().count() < MIN_OBJECTIVE_CHARS {
        return Err(AssistError::invalid_input(INVALID_OBJECTIVE_MESSAGE));
    }

    Ok(Objective {
        original: original.to_string(),
        normalized: original.to_lowercase(),
    })
}

/// Parses `<code> - <description>` lines, splitting on the first hyphen only.
///
/// Malformed lines are reported in [`NicParse::skipped`] rather than failing.
pub fn parse_nic_entries(raw: &str) -> NicParse {
    let mut parsed = NicParse::default();

    for (index, line) in raw.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        match parse_nic_line(line) {
            Ok(entry) => parsed.entries.push(entry),
            Err(reason) => parsed.skipped.push(SkippedLine {
                line_number: index + 1,
                text: line.trim().to_string(),
                reason,
            }),
        }
    }

    parsed
}

fn parse_nic_line(line: &str) -> std::result::Result<NicEntry, SkipReason> {
    let (code_part, description_part) = line.split_once('-').ok_or(SkipReason::MissingHyphen)?;

    let code: String = code_part
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if code.is_empty() {
        return Err(SkipReason::NoDigitsInCode);
    }

    let description = description_part.trim();
    if description.is_empty() {
        return Err(SkipReason::EmptyDescription);
    }

    Ok(NicEntry::new(code, description))
}

/// Like [`parse_nic_entries`] but fails when nothing usable was entered.
///
/// Blank input and input with no parseable line are reported with different
/// messages.
pub fn require_nic_entries(raw: &str) -> Result<NicParse> {
    if raw.trim().is_empty() {
        return Err(AssistError::invalid_input(EMPTY_NIC_INPUT_MESSAGE));
    }

    let parsed = parse_nic_entries(raw);
    if parsed.entries.is_empty() {
        return Err(AssistError::invalid_input(NO_VALID_NIC_ENTRIES_MESSAGE));
    }

    Ok(parsed)
}
