//! Submission intake: trim and validate text before it reaches the harness.

/// Longest accepted submitter name, in characters.
pub const MAX_NAME_LEN: usize = 20;

/// Reasons a submission is turned away at intake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("submitter name must not be empty")]
    EmptyName,

    #[error("submitted code must not be empty")]
    EmptySource,

    #[error("submitter name is {len} characters, at most {max} allowed")]
    NameTooLong { len: usize, max: usize },
}

/// A validated submission: trimmed, non-empty name and source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    name: String,
    source: String,
}

impl Submission {
    pub fn parse(name: &str, source: &str) -> Result<Self, IntakeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IntakeError::EmptyName);
        }
        let source = normalize_source(source)?;
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(IntakeError::NameTooLong {
                len,
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Trimmed program text; empty after trimming is rejected.
pub fn normalize_source(source: &str) -> Result<&str, IntakeError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(IntakeError::EmptySource);
    }
    Ok(source)
}
