//! Yes/no answers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::SessionError;

/// A user's answer to one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn from_bool(observed: bool) -> Self {
        if observed {
            Answer::Yes
        } else {
            Answer::No
        }
    }

    /// Evidence value: `true` for yes
    pub fn as_bool(&self) -> bool {
        matches!(self, Answer::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accepts `yes` and `no`, ignoring case and surrounding whitespace.
impl FromStr for Answer {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("yes") {
            Ok(Answer::Yes)
        } else if trimmed.eq_ignore_ascii_case("no") {
            Ok(Answer::No)
        } else {
            Err(SessionError::InvalidAnswer(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("yes".parse::<Answer>().unwrap(), Answer::Yes);
        assert_eq!("  NO\n".parse::<Answer>().unwrap(), Answer::No);
        assert_eq!("Yes".parse::<Answer>().unwrap(), Answer::Yes);
    }

    #[test]
    fn test_parse_rejects_other_values() {
        for raw in ["maybe", "", "y", "n", "true", "yes please"] {
            let err = raw.parse::<Answer>().unwrap_err();
            assert!(matches!(err, SessionError::InvalidAnswer(_)), "{}", raw);
        }
    }

    #[test]
    fn test_bool_mapping() {
        assert!(Answer::Yes.as_bool());
        assert!(!Answer::No.as_bool());
        assert_eq!(Answer::from_bool(true), Answer::Yes);
        assert_eq!(Answer::No.to_string(), "no");
    }
}
