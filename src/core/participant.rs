use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Single-character code identifying a participant in a shared ledger.
///
/// Codes are case-insensitive and always stored uppercase, so `k` and `K`
/// name the same person. A participant is the key of every per-person map
/// in the crate (balances, advances, transfers).
///
/// # Examples
///
/// ```
/// use household_ledger::core::participant::Participant;
///
/// let k = Participant::parse(" k ").unwrap();
/// assert_eq!(k, Participant::parse("K").unwrap());
/// assert_eq!(k.to_string(), "K");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(char);

/// Errors arising from participant code normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    #[error("participant code is empty")]
    Empty,
    #[error("participant code '{0}' must be a single character")]
    TooLong(String),
    #[error("'{0}' is not a valid participant code")]
    InvalidCharacter(char),
}

impl Participant {
    /// Normalize a participant code: strip whitespace and control
    /// characters, then uppercase the single remaining character.
    pub fn parse(raw: &str) -> Result<Self, ParticipantError> {
        let mut chars = raw.chars().filter(|c| !is_ignorable(*c));
        let code = chars.next().ok_or(ParticipantError::Empty)?;
        if chars.next().is_some() {
            return Err(ParticipantError::TooLong(raw.trim().to_string()));
        }
        Self::from_char(code)
    }

    /// Build a participant from one character, uppercasing it.
    pub fn from_char(code: char) -> Result<Self, ParticipantError> {
        if !code.is_alphanumeric() {
            return Err(ParticipantError::InvalidCharacter(code));
        }
        let mut upper = code.to_uppercase();
        // Characters whose uppercase form expands (e.g. 'ß') keep their original form.
        let normalized = match (upper.next(), upper.next()) {
            (Some(u), None) => u,
            _ => code,
        };
        Ok(Self(normalized))
    }

    /// Parse every character of a beneficiary string, in order.
    ///
    /// Repeated codes are kept: a participant listed twice carries
    /// two shares of the expense.
    pub fn parse_many(raw: &str) -> Result<Vec<Self>, ParticipantError> {
        raw.chars()
            .filter(|c| !is_ignorable(*c))
            .map(Self::from_char)
            .collect()
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

fn is_ignorable(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Participant {
    type Error = ParticipantError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<char> for Participant {
    type Error = ParticipantError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c)
    }
}
