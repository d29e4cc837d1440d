use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Text fields of the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Name,
    Boat,
    Email,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [FieldId::Name, FieldId::Boat, FieldId::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Boat => "boat",
            FieldId::Email => "email",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate supplied in code rather than configuration.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Extra format rule on top of the minimum length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    Email,
    #[serde(skip)]
    Custom(Predicate),
}

impl FieldFormat {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        FieldFormat::Custom(Predicate(Arc::new(predicate)))
    }

    pub fn accepts(&self, content: &str) -> bool {
        match self {
            FieldFormat::Email => looks_like_email(content),
            FieldFormat::Custom(Predicate(predicate)) => predicate(content),
        }
    }
}

/// Line breaks, including the Unicode line and paragraph separators.
const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// `local@domain.tld`: a local part without spaces, then anything on one
/// line, then a final two- or three-character suffix.
fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains(' ') {
        return false;
    }
    let Some((host, suffix)) = domain.rsplit_once('.') else {
        return false;
    };
    let suffix_len = suffix.chars().count();
    !host.is_empty() && !host.contains(LINE_TERMINATORS) && (2..=3).contains(&suffix_len)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: FieldId,
    pub min_length: usize,
    #[serde(default)]
    pub format: Option<FieldFormat>,
}

impl FieldSpec {
    pub fn new(field: FieldId, min_length: usize) -> Self {
        Self {
            field,
            min_length,
            format: None,
        }
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn is_valid(&self, content: &str) -> bool {
        content.chars().count() >= self.min_length
            && self.format.as_ref().map_or(true, |format| format.accepts(content))
    }
}

/// Live validity of one form field. Consecutive equal results are swallowed,
/// so callers only see edges.
#[derive(Debug, Clone)]
pub struct FieldValidityStream {
    spec: FieldSpec,
    last: Option<bool>,
}

impl FieldValidityStream {
    pub fn new(spec: FieldSpec) -> Self {
        Self { spec, last: None }
    }

    pub fn field(&self) -> FieldId {
        self.spec.field
    }

    /// Recompute from the field's current content. Returns the new validity
    /// only if it differs from the previous emission; the first content
    /// event always emits.
    pub fn on_content(&mut self, content: &str) -> Option<bool> {
        let valid = self.spec.is_valid(content);
        if self.last == Some(valid) {
            return None;
        }
        self.last = Some(valid);
        Some(valid)
    }

    pub fn current(&self) -> Option<bool> {
        self.last
    }
}
