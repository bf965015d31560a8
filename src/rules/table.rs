use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::error::RewriteError;
use crate::models::{CaseMode, Replacement, Rule};

/// Ordered `(key, replacement)` entries of one rule category
pub type Entries = Vec<(String, Replacement)>;

/// Declarative rule categories, in the order they are applied
///
/// Keys are regular expressions. Whole-word keys are additionally wrapped so
/// they cannot match inside a longer word.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleTableConfig {
    /// Case-sensitive, matched anywhere
    pub exact: Entries,
    /// Case-sensitive, whole words only
    pub exact_whole_word: Entries,
    /// Case-insensitive, replacement used as written
    pub insensitive: Entries,
    pub insensitive_whole_word: Entries,
    /// Case-insensitive, replacement's first letter follows the match
    pub preserving: Entries,
    pub preserving_whole_word: Entries,
    /// Words whose immediate repeats are deleted
    pub repeats: Vec<String>,
    /// Whether "The the" counts as a repeat
    pub repeats_ignore_case: bool,
}

impl Default for RuleTableConfig {
    fn default() -> Self {
        Self {
            exact: Vec::new(),
            exact_whole_word: Vec::new(),
            insensitive: Vec::new(),
            insensitive_whole_word: Vec::new(),
            preserving: Vec::new(),
            preserving_whole_word: Vec::new(),
            repeats: Vec::new(),
            repeats_ignore_case: true,
        }
    }
}

impl RuleTableConfig {
    /// Load a rule table from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule file: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid rule file: {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse rule table JSON")
    }

    /// Append every category of `other` after this table's own entries
    pub fn extend(&mut self, other: RuleTableConfig) {
        self.exact.extend(other.exact);
        self.exact_whole_word.extend(other.exact_whole_word);
        self.insensitive.extend(other.insensitive);
        self.insensitive_whole_word.extend(other.insensitive_whole_word);
        self.preserving.extend(other.preserving);
        self.preserving_whole_word.extend(other.preserving_whole_word);
        self.repeats.extend(other.repeats);
        self.repeats_ignore_case = other.repeats_ignore_case;
    }

    /// Number of declared entries, before repeat rules are generated
    pub fn entry_count(&self) -> usize {
        self.exact.len()
            + self.exact_whole_word.len()
            + self.insensitive.len()
            + self.insensitive_whole_word.len()
            + self.preserving.len()
            + self.preserving_whole_word.len()
    }
}

/// A participant's real name and the alias that replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantAlias {
    pub name: String,
    pub alias: String,
}

/// Builds the ordered rule list for one run
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    config: RuleTableConfig,
    participant: Option<ParticipantAlias>,
}

impl RuleTable {
    pub fn new(config: RuleTableConfig) -> Self {
        Self {
            config,
            participant: None,
        }
    }

    /// Replace `name` with `alias` before any other rule runs
    pub fn with_participant(mut self, participant: Option<ParticipantAlias>) -> Self {
        self.participant = participant;
        self
    }

    /// Compile every category into one ordered list
    ///
    /// Order: participant alias, exact, exact whole-word, insensitive,
    /// insensitive whole-word, preserving, preserving whole-word, repeats.
    pub fn build(&self) -> Result<Vec<Rule>, RewriteError> {
        let config = &self.config;
        let mut rules = Vec::with_capacity(config.entry_count() + config.repeats.len() + 1);

        if let Some(participant) = &self.participant {
            // Names are copied from meeting software and may contain regex syntax
            rules.push(Rule::labeled(
                participant.name.as_str(),
                &regex::escape(&participant.name),
                Replacement::verbatim(&participant.alias),
                CaseMode::Sensitive,
            )?);
        }

        push_category(&mut rules, &config.exact, CaseMode::Sensitive, false)?;
        push_category(&mut rules, &config.exact_whole_word, CaseMode::Sensitive, true)?;
        push_category(&mut rules, &config.insensitive, CaseMode::Insensitive, false)?;
        push_category(&mut rules, &config.insensitive_whole_word, CaseMode::Insensitive, true)?;
        push_category(&mut rules, &config.preserving, CaseMode::Preserving, false)?;
        push_category(&mut rules, &config.preserving_whole_word, CaseMode::Preserving, true)?;

        for word in &config.repeats {
            rules.push(repeat_rule(word, config.repeats_ignore_case)?);
        }

        debug!("Built {} rules", rules.len());
        Ok(rules)
    }
}

fn push_category(
    rules: &mut Vec<Rule>,
    entries: &Entries,
    case_mode: CaseMode,
    whole_words: bool,
) -> Result<(), RewriteError> {
    for (key, replacement) in entries {
        let rule = if whole_words {
            Rule::labeled(key.as_str(), &whole_word(key), replacement.clone(), case_mode)?
        } else {
            Rule::new(key, replacement.clone(), case_mode)?
        };
        rules.push(rule);
    }
    Ok(())
}

/// Wrap `key` so it only matches when not flanked by word characters
///
/// Half boundaries assert on the neighbouring character alone, so keys with
/// optional or grouped edges (`home kits?`, `(?:a|b) c`) are wrapped correctly.
pub fn whole_word(key: &str) -> String {
    format!(r"\b{{start-half}}(?:{key})\b{{end-half}}")
}

/// Collapse `word` repeated with only spaces or commas in between
pub fn repeat_rule(word: &str, ignore_case: bool) -> Result<Rule, RewriteError> {
    let escaped = regex::escape(word);
    let pattern = whole_word(&format!("(?P<first>{escaped})(?:[ ,]+{escaped})+"));
    let case_mode = if ignore_case {
        CaseMode::Insensitive
    } else {
        CaseMode::Sensitive
    };
    Rule::labeled(format!("repeated {word:?}"), &pattern, "${first}", case_mode)
}
