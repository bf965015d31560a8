use chrono::{NaiveTime, TimeDelta};

/// A single timed caption
///
/// Times are wall-clock times of day; arithmetic wraps at midnight, so tracks
/// longer than 24 hours are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// Optional cue identifier line preceding the timing line
    pub identifier: Option<String>,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Cue settings following the end time, kept verbatim
    pub settings: Option<String>,
    /// Caption text, possibly spanning several lines
    pub text: String,
}

impl Caption {
    pub fn new(start: NaiveTime, end: NaiveTime, text: impl Into<String>) -> Self {
        Self {
            identifier: None,
            start,
            end,
            settings: None,
            text: text.into(),
        }
    }

    /// Move both start and end by `delta`, wrapping around midnight
    pub fn shift(&mut self, delta: TimeDelta) {
        self.start = add_wrapping(self.start, delta);
        self.end = add_wrapping(self.end, delta);
    }
}

/// An ordered caption file: header lines followed by chronological captions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// `WEBVTT` signature line and any header metadata lines after it
    pub header: Vec<String>,
    /// `STYLE` and `REGION` blocks, each kept verbatim
    pub blocks: Vec<String>,
    pub captions: Vec<Caption>,
}

impl CaptionTrack {
    pub fn new(captions: Vec<Caption>) -> Self {
        Self {
            header: vec!["WEBVTT".to_string()],
            blocks: Vec::new(),
            captions,
        }
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }
}

/// Add a signed offset to a time of day, modulo one day
pub fn add_wrapping(time: NaiveTime, delta: TimeDelta) -> NaiveTime {
    time.overflowing_add_signed(delta).0
}

/// Convert fractional seconds to a millisecond-precision offset
pub fn seconds_to_delta(seconds: f64) -> Option<TimeDelta> {
    if !seconds.is_finite() {
        return None;
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
}
