use std::collections::BTreeMap;

use chrono::TimeDelta;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::MergeError;
use crate::models::{add_wrapping, Caption};

/// Configuration for speaker attribution
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Added to each text caption's start time, for the comparison only.
    /// A small lead helps when the speaker track labels a line slightly
    /// after the text track starts it.
    pub lead: TimeDelta,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            lead: TimeDelta::zero(),
        }
    }
}

/// Result of attributing speakers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Captions labelled per speaker
    pub speaker_counts: BTreeMap<String, usize>,
    /// Captions left without a speaker
    pub unattributed: usize,
}

impl MergeReport {
    pub fn attributed(&self) -> usize {
        self.speaker_counts.values().sum()
    }
}

/// Copy speaker labels from `speakers` onto `captions`
///
/// Both tracks must be sorted by start time. A cursor walks the speaker track
/// forward only, carrying the most recent speaker whose caption started at or
/// before each text caption.
pub fn merge_speakers(
    captions: &mut [Caption],
    speakers: &[Caption],
    config: &MergeConfig,
) -> Result<MergeReport, MergeError> {
    if speakers.is_empty() {
        return Err(MergeError::invalid_source("it contains no captions"));
    }

    let mut cursor = speakers.iter().peekable();
    let mut current: Option<&str> = None;
    let mut report = MergeReport::default();

    for caption in captions.iter_mut() {
        let compare_at = add_wrapping(caption.start, config.lead);

        while let Some(next) = cursor.next_if(|s| s.start <= compare_at) {
            if let Some(name) = speaker_of(&next.text) {
                current = Some(name);
            }
        }

        match current {
            Some(name) => {
                caption.text = format!("{}: {}", name, caption.text);
                *report.speaker_counts.entry(name.to_string()).or_default() += 1;
            }
            None => {
                debug!("No speaker yet at {}", caption.start);
                report.unattributed += 1;
            }
        }
    }

    info!(
        "Attributed {} captions to {} speakers, {} unattributed",
        report.attributed(),
        report.speaker_counts.len(),
        report.unattributed
    );
    Ok(report)
}

/// Speaker named before the first colon, if anything follows it
pub fn speaker_of(text: &str) -> Option<&str> {
    let (name, rest) = text.split_once(':')?;
    (!rest.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn caption(secs: u32, text: &str) -> Caption {
        let start = NaiveTime::from_hms_opt(0, 0, secs).unwrap();
        Caption::new(start, add_wrapping(start, TimeDelta::seconds(1)), text)
    }

    fn texts(captions: &[Caption]) -> Vec<&str> {
        captions.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_speaker_propagation() {
        let speakers = vec![caption(0, "Alice: hi"), caption(10, "Bob: yo")];
        let mut captions = vec![caption(1, "hello there"), caption(11, "what's up")];

        let report = merge_speakers(&mut captions, &speakers, &MergeConfig::default()).unwrap();

        assert_eq!(texts(&captions), vec!["Alice: hello there", "Bob: what's up"]);
        assert_eq!(report.speaker_counts.get("Alice"), Some(&1));
        assert_eq!(report.speaker_counts.get("Bob"), Some(&1));
        assert_eq!(report.unattributed, 0);
    }

    #[test]
    fn test_caption_before_first_speaker_is_unattributed() {
        let speakers = vec![caption(5, "Alice: hi")];
        let mut captions = vec![caption(1, "too early"), caption(6, "on time")];

        let report = merge_speakers(&mut captions, &speakers, &MergeConfig::default()).unwrap();

        assert_eq!(texts(&captions), vec!["too early", "Alice: on time"]);
        assert_eq!(report.unattributed, 1);
        assert_eq!(report.attributed(), 1);
    }

    #[test]
    fn test_equal_timestamps_take_the_new_speaker() {
        let speakers = vec![caption(0, "Alice: hi"), caption(10, "Bob: yo")];
        let mut captions = vec![caption(10, "same instant")];

        merge_speakers(&mut captions, &speakers, &MergeConfig::default()).unwrap();

        assert_eq!(texts(&captions), vec!["Bob: same instant"]);
    }

    #[test]
    fn test_unlabelled_speaker_caption_keeps_current_speaker() {
        let speakers = vec![
            caption(0, "Alice: hi"),
            caption(4, "no label here"),
            caption(8, "Bob:"),
        ];
        let mut captions = vec![caption(5, "first"), caption(9, "second")];

        merge_speakers(&mut captions, &speakers, &MergeConfig::default()).unwrap();

        assert_eq!(texts(&captions), vec!["Alice: first", "Alice: second"]);
    }

    #[test]
    fn test_lead_moves_comparison_forward() {
        let speakers = vec![caption(2, "Alice: hi")];
        let mut captions = vec![caption(1, "close enough")];
        let config = MergeConfig {
            lead: TimeDelta::seconds(1),
        };

        merge_speakers(&mut captions, &speakers, &config).unwrap();

        assert_eq!(texts(&captions), vec!["Alice: close enough"]);
        assert_eq!(captions[0].start, NaiveTime::from_hms_opt(0, 0, 1).unwrap());
    }

    #[test]
    fn test_empty_speaker_track_fails_without_changes() {
        let mut captions = vec![caption(1, "untouched")];

        let result = merge_speakers(&mut captions, &[], &MergeConfig::default());

        assert!(matches!(result, Err(MergeError::InvalidSource { .. })));
        assert_eq!(texts(&captions), vec!["untouched"]);
    }

    #[test]
    fn test_speaker_of() {
        assert_eq!(speaker_of("Alice: hi: there"), Some("Alice"));
        assert_eq!(speaker_of("Alice:"), None);
        assert_eq!(speaker_of("no colon"), None);
    }
}
