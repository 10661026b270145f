//! Validated free-text descriptions shared by categories and transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated, non-empty description of at most [Description::MAX_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    /// The maximum number of characters in a description.
    pub const MAX_LENGTH: usize = 400;

    /// Create a description, ignoring leading and trailing whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyDescription] if `text` is
    /// empty or only whitespace, or an [Error::DescriptionTooLong] if it has
    /// more than [Description::MAX_LENGTH] characters.
    pub fn new(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        if text.is_empty() {
            Err(Error::EmptyDescription)
        } else if text.chars().count() > Self::MAX_LENGTH {
            Err(Error::DescriptionTooLong(Self::MAX_LENGTH))
        } else {
            Ok(Self(text.to_owned()))
        }
    }

    /// Create a description without validation.
    ///
    /// The caller should ensure that the string is not empty and not too long.
    pub fn new_unchecked(text: &str) -> Self {
        Self(text.to_owned())
    }

    /// The key used to compare descriptions ignoring case.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
