pub mod defaults;
pub mod engine;
pub mod format;
pub mod table;

pub use defaults::builtin_table;
pub use engine::{apply, apply_rule, RewriteReport, RuleOutcome, MAX_PASSES};
pub use format::format_rules;
pub use table::{whole_word, ParticipantAlias, RuleTable, RuleTableConfig};
