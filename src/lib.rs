pub mod error;
pub mod io;
pub mod models;
pub mod rules;
pub mod stages;

pub use error::{CaptionError, ConfirmError, MergeError, RewriteError};
pub use io::{parse_vtt, read_document, read_vtt_file, write_document, write_vtt_file};
pub use models::{Caption, CaptionTrack, CaseMode, Replacement, Rule};
pub use rules::{
    builtin_table, format_rules, ParticipantAlias, RewriteReport, RuleTable, RuleTableConfig,
};
pub use stages::{
    clean_transcript, merge_speakers, shift_captions, CleanConfig, CleanResult, MergeConfig,
    MergeReport,
};
