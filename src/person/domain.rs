//! Core person domain types.

use std::fmt::Display;

use serde::{
    Deserialize, Serialize, Serializer,
    ser::SerializeStruct,
};

use crate::{Error, database_id::DatabaseId};

/// Database identifier for a person.
pub type PersonId = DatabaseId;

/// A validated, non-empty person name of at most [PersonName::MAX_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// The maximum number of characters in a name.
    pub const MAX_LENGTH: usize = 200;

    /// Create a person name, ignoring leading and trailing whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyPersonName] if `name` is an
    /// empty string, or an [Error::PersonNameTooLong] if `name` has more than
    /// [PersonName::MAX_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyPersonName)
        } else if name.chars().count() > Self::MAX_LENGTH {
            Err(Error::PersonNameTooLong(Self::MAX_LENGTH))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a person name without validation.
    ///
    /// The caller should ensure that the string is not empty and not too long.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariants
    /// are violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// The key used to compare names ignoring case.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person's age in whole years, between 0 and [Age::MAX] inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Age(u8);

impl Age {
    /// The oldest accepted age.
    pub const MAX: u8 = 150;

    /// People younger than this are minors.
    pub const ADULTHOOD: u8 = 18;

    /// Create an age from a whole number of years.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAge] if `years` is negative
    /// or greater than [Age::MAX].
    pub fn new(years: i64) -> Result<Self, Error> {
        match u8::try_from(years) {
            Ok(years) if years <= Self::MAX => Ok(Self(years)),
            _ => Err(Error::InvalidAge(years)),
        }
    }

    /// The age in years.
    pub fn years(&self) -> u8 {
        self.0
    }

    /// Whether a person of this age is a minor.
    pub fn is_minor(&self) -> bool {
        self.0 < Self::ADULTHOOD
    }
}

/// A member of the household that owns transactions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Hash)]
pub struct Person {
    /// The ID of the person.
    pub id: PersonId,
    /// The person's name, unique ignoring case.
    #[serde(rename = "nome")]
    pub name: PersonName,
    /// The person's age.
    #[serde(rename = "idade")]
    pub age: Age,
}

impl Person {
    /// Whether the person is a minor and may only have expenses.
    pub fn is_minor(&self) -> bool {
        self.age.is_minor()
    }
}

impl Serialize for Person {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Person", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("nome", &self.name)?;
        state.serialize_field("idade", &self.age)?;
        state.serialize_field("menorDeIdade", &self.is_minor())?;
        state.end()
    }
}

/// The JSON body for creating or updating a person.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonForm {
    /// The person's name.
    #[serde(rename = "nome")]
    pub name: String,
    /// The person's age in years.
    ///
    /// This is a signed integer so that out of range values are reported as
    /// an invalid age instead of a malformed request.
    #[serde(rename = "idade")]
    pub age: i64,
}
