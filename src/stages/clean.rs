use tracing::info;

use crate::error::RewriteError;
use crate::rules::{apply, format_rules, ParticipantAlias, RewriteReport, RuleTable, RuleTableConfig};

/// Configuration for transcript cleanup
#[derive(Debug, Clone, Default)]
pub struct CleanConfig {
    /// Lexical rule categories
    pub table: RuleTableConfig,
    /// Optional real name to alias before any other rule runs
    pub participant: Option<ParticipantAlias>,
}

/// Result of cleaning one document
#[derive(Debug, Clone)]
pub struct CleanResult {
    /// Rewritten document, trimmed
    pub text: String,
    /// Counts from the structural timestamp and speaker rules
    pub format: RewriteReport,
    /// Counts from the lexical rule table
    pub replacements: RewriteReport,
}

/// Clean a whole transcript in memory
///
/// Structural rules run first so lexical rules see one simplified line per
/// caption. Nothing is returned unless every rule settles.
pub fn clean_transcript(text: &str, config: &CleanConfig) -> Result<CleanResult, RewriteError> {
    let (text, format) = apply(text, &format_rules()?)?;
    info!(
        "Format: {} timestamp and speaker-merge replacements",
        format.total()
    );

    let rules = RuleTable::new(config.table.clone())
        .with_participant(config.participant.clone())
        .build()?;
    let (text, replacements) = apply(&text, &rules)?;
    info!(
        "Rules: {} replacements from {} of {} rules",
        replacements.total(),
        replacements.applied().count(),
        rules.len()
    );

    Ok(CleanResult {
        text: text.trim().to_string(),
        format,
        replacements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Replacement;
    use crate::rules::builtin_table;

    const ZOOM_VTT: &str = "WEBVTT

1
00:00:01.500 --> 00:00:03.200
Alice: so the the plan is

2
00:00:03.300 --> 00:00:05.000
Alice: to buy an iphone

3
00:00:06.000 --> 00:00:07.000
Bob: Um, sounds good
";

    #[test]
    fn test_clean_zoom_transcript() {
        let config = CleanConfig {
            table: builtin_table(),
            participant: None,
        };
        let result = clean_transcript(ZOOM_VTT, &config).unwrap();

        assert_eq!(
            result.text,
            "00:00:01.5\nAlice: so the plan is to buy an iPhone\n\n00:00:06.0\nBob: Sounds good"
        );
        assert_eq!(result.format.count_for("simplify timestamps"), Some(3));
        assert_eq!(result.format.count_for("merge same-speaker lines"), Some(1));
        assert_eq!(result.replacements.count_for("iphone"), Some(1));
        assert_eq!(result.replacements.count_for("repeated \"the\""), Some(1));
    }

    #[test]
    fn test_participant_alias() {
        let config = CleanConfig {
            table: builtin_table(),
            participant: Some(ParticipantAlias {
                name: "Alice".to_string(),
                alias: "P7".to_string(),
            }),
        };
        let result = clean_transcript(ZOOM_VTT, &config).unwrap();

        assert!(result.text.contains("P7: so the plan is to buy an iPhone"));
        assert!(!result.text.contains("Alice"));
    }

    #[test]
    fn test_non_convergent_rule_returns_no_text() {
        let config = CleanConfig {
            table: RuleTableConfig {
                exact: vec![("a".to_string(), Replacement::from("aa"))],
                ..Default::default()
            },
            participant: None,
        };

        assert!(matches!(
            clean_transcript("a cat", &config),
            Err(RewriteError::NonConvergent { .. })
        ));
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let result = clean_transcript("\n  hello world \n\n", &CleanConfig::default()).unwrap();
        assert_eq!(result.text, "hello world");
        assert_eq!(result.replacements.total(), 0);
    }
}
