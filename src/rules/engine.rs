use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::RewriteError;
use crate::models::{CaseMode, Rule};

/// Upper bound on whole-text passes a single rule may take to settle
pub const MAX_PASSES: usize = 20;

/// What one rule did to the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    /// Rule label (its authored key or pattern)
    pub rule: String,
    pub case_mode: CaseMode,
    /// Replacements summed over all passes
    pub replacements: usize,
    /// Passes run, including the final pass that found nothing
    pub passes: usize,
}

/// Per-rule replacement counts for one run, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub rules: Vec<RuleOutcome>,
}

impl RewriteReport {
    /// Total replacements across every rule
    pub fn total(&self) -> usize {
        self.rules.iter().map(|r| r.replacements).sum()
    }

    /// Rules that changed something
    pub fn applied(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.rules.iter().filter(|r| r.replacements > 0)
    }

    /// Replacement count for the first rule with the given label
    pub fn count_for(&self, rule: &str) -> Option<usize> {
        self.rules
            .iter()
            .find(|r| r.rule == rule)
            .map(|r| r.replacements)
    }
}

/// Apply `rules` in order, each to fixpoint
///
/// The input is never modified. If any rule fails to settle within
/// [`MAX_PASSES`], the whole run is abandoned and no text is returned.
pub fn apply(text: &str, rules: &[Rule]) -> Result<(String, RewriteReport), RewriteError> {
    let mut text = text.to_string();
    let mut report = RewriteReport::default();

    for rule in rules {
        let (rewritten, outcome) = apply_rule(text, rule)?;
        if outcome.replacements > 0 {
            debug!(
                "{} replacements for {:?} in {} passes",
                outcome.replacements, outcome.rule, outcome.passes
            );
        }
        text = rewritten;
        report.rules.push(outcome);
    }

    Ok((text, report))
}

/// Re-run a single rule until a pass makes no replacement
pub fn apply_rule(mut text: String, rule: &Rule) -> Result<(String, RuleOutcome), RewriteError> {
    let mut replacements = 0;

    for pass in 1..=MAX_PASSES {
        let (rewritten, count) = substitute(&text, rule);
        if count == 0 {
            let outcome = RuleOutcome {
                rule: rule.label().to_string(),
                case_mode: rule.case_mode(),
                replacements,
                passes: pass,
            };
            return Ok((text, outcome));
        }

        trace!("pass {} of {:?}: {} replacements", pass, rule.label(), count);
        replacements += count;
        text = rewritten.into_owned();
    }

    Err(RewriteError::NonConvergent {
        rule: rule.label().to_string(),
        passes: MAX_PASSES,
    })
}

/// One left-to-right pass replacing every non-overlapping accepted match
///
/// A match rejected by the rule's guard is skipped and the search resumes one
/// character past its start, so a later overlapping candidate can still match.
pub fn substitute<'t>(text: &'t str, rule: &Rule) -> (Cow<'t, str>, usize) {
    let regex = rule.regex();
    let mut out = String::new();
    let mut copied = 0;
    let mut at = 0;
    let mut count = 0;

    while at <= text.len() {
        let Some(caps) = regex.captures_at(text, at) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        if !rule.accepts(&caps) {
            at = step_past(text, whole.start());
            continue;
        }

        out.push_str(&text[copied..whole.start()]);
        out.push_str(&rule.render(&caps));
        copied = whole.end();
        count += 1;

        at = if whole.is_empty() {
            step_past(text, whole.end())
        } else {
            whole.end()
        };
    }

    if count == 0 {
        return (Cow::Borrowed(text), 0);
    }
    out.push_str(&text[copied..]);
    (Cow::Owned(out), count)
}

/// Byte offset of the character after `at`, or past the end
fn step_past(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}
