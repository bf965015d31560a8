use std::fmt;
use std::sync::Arc;

use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RewriteError;

/// Function computing replacement text from a match
pub type ComputeFn = Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

/// Predicate deciding whether a candidate match may be replaced
pub type GuardFn = Arc<dyn Fn(&Captures<'_>) -> bool + Send + Sync>;

/// How a rule treats letter case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Pattern matched exactly as written
    Sensitive,
    /// Case-folded match, replacement emitted as authored
    Insensitive,
    /// Case-folded match, replacement's leading letter follows the matched text
    Preserving,
}

impl CaseMode {
    pub fn ignores_case(self) -> bool {
        !matches!(self, CaseMode::Sensitive)
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseMode::Sensitive => "sensitive",
            CaseMode::Insensitive => "insensitive",
            CaseMode::Preserving => "preserving",
        };
        f.pad(name)
    }
}

/// Replacement for a matched span
///
/// `Literal` templates may reference named groups as `${name}`; a literal `$`
/// must be written `$$`.
#[derive(Clone)]
pub enum Replacement {
    Literal(String),
    Computed(ComputeFn),
}

impl Replacement {
    pub fn computed(f: impl Fn(&Captures<'_>) -> String + Send + Sync + 'static) -> Self {
        Replacement::Computed(Arc::new(f))
    }

    /// Replacement that emits `text` exactly, with no group expansion
    pub fn verbatim(text: &str) -> Self {
        Replacement::Literal(text.replace('$', "$$"))
    }

    pub fn render(&self, caps: &Captures<'_>) -> String {
        match self {
            Replacement::Literal(template) => {
                let mut out = String::with_capacity(template.len());
                caps.expand(template, &mut out);
                out
            }
            Replacement::Computed(f) => f(caps),
        }
    }

    /// Wrap this replacement so its first character mirrors the case of the
    /// first character of the matched span
    pub fn preserving_case(self) -> Self {
        Replacement::computed(move |caps| {
            let rendered = self.render(caps);
            let matched = caps.get(0).map_or("", |m| m.as_str());
            recase_leading(&rendered, matched)
        })
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Literal(template) => f.debug_tuple("Literal").field(template).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Replacement {
    fn from(template: &str) -> Self {
        Replacement::Literal(template.to_string())
    }
}

impl From<String> for Replacement {
    fn from(template: String) -> Self {
        Replacement::Literal(template)
    }
}

// Rule files can only carry templates; computed replacements are built in code.
impl<'de> Deserialize<'de> for Replacement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Replacement::Literal)
    }
}

/// Upper- or lower-case the first character of `replacement` to match the
/// first character of `matched`
pub fn recase_leading(replacement: &str, matched: &str) -> String {
    let mut chars = replacement.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let upper = matched.chars().next().is_some_and(char::is_uppercase);

    let mut out = String::with_capacity(replacement.len());
    if upper {
        out.extend(first.to_uppercase());
    } else {
        out.extend(first.to_lowercase());
    }
    out.push_str(chars.as_str());
    out
}

/// A single compiled rewrite rule
#[derive(Clone)]
pub struct Rule {
    label: String,
    regex: Regex,
    replacement: Replacement,
    case_mode: CaseMode,
    guard: Option<GuardFn>,
}

impl Rule {
    /// Compile a rule labelled by its own pattern
    pub fn new(
        pattern: &str,
        replacement: impl Into<Replacement>,
        case_mode: CaseMode,
    ) -> Result<Self, RewriteError> {
        Self::labeled(pattern, pattern, replacement, case_mode)
    }

    /// Compile a rule whose reported name differs from its pattern
    pub fn labeled(
        label: impl Into<String>,
        pattern: &str,
        replacement: impl Into<Replacement>,
        case_mode: CaseMode,
    ) -> Result<Self, RewriteError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_mode.ignores_case())
            .build()
            .map_err(|e| RewriteError::invalid_pattern(pattern, e))?;

        let replacement = replacement.into();
        let replacement = if case_mode == CaseMode::Preserving {
            replacement.preserving_case()
        } else {
            replacement
        };

        Ok(Self {
            label: label.into(),
            regex,
            replacement,
            case_mode,
            guard: None,
        })
    }

    /// Only replace matches for which `guard` returns true
    pub fn only_if(mut self, guard: impl Fn(&Captures<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn accepts(&self, caps: &Captures<'_>) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(caps))
    }

    pub fn render(&self, caps: &Captures<'_>) -> String {
        self.replacement.render(caps)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("label", &self.label)
            .field("pattern", &self.regex.as_str())
            .field("replacement", &self.replacement)
            .field("case_mode", &self.case_mode)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
