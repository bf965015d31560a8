use crate::error::RewriteError;
use crate::models::{CaseMode, Rule};

/// Optional cue number line plus a `start --> end` line, reduced to the start
/// time at tenth-of-a-second precision
pub const SIMPLIFY_TIMESTAMPS: &str = r"(?m)^(?:\d+\n)?(?P<start>(?:\d{2}:)?\d{2}:\d{2}\.\d)\d{2} --> (?:\d{2}:)?\d{2}:\d{2}\.\d{3}[^\n]*";

/// Two simplified captions whose single text lines both start with a speaker
/// prefix; only merged when the prefixes are identical
pub const MERGE_SAME_SPEAKER: &str = r"(?m)^(?P<stamp>(?:\d{2}:)?\d{2}:\d{2}\.\d)\n(?P<speaker>[^:\n]+): (?P<first>.+)\n\n(?:\d{2}:)?\d{2}:\d{2}\.\d\n(?P<next_speaker>[^:\n]+): (?P<second>.+)";

/// Structural rules that run before the lexical rule table
pub fn format_rules() -> Result<Vec<Rule>, RewriteError> {
    let simplify = Rule::labeled(
        "simplify timestamps",
        SIMPLIFY_TIMESTAMPS,
        "${start}",
        CaseMode::Sensitive,
    )?;

    let merge = Rule::labeled(
        "merge same-speaker lines",
        MERGE_SAME_SPEAKER,
        "${stamp}\n${speaker}: ${first} ${second}",
        CaseMode::Sensitive,
    )?
    .only_if(|caps| caps["speaker"] == caps["next_speaker"]);

    Ok(vec![simplify, merge])
}
