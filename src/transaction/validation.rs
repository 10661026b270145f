//! Business rules that decide whether a transaction may be stored.
//!
//! The same checks back both the create/update endpoints, where a failure
//! blocks the write, and the pre-flight validation endpoint, where the reasons
//! are only reported.

use std::fmt::Display;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    Error,
    category::{Category, CategoryId},
    person::{Person, PersonId},
    repository::Repository,
    transaction::{TransactionBuilder, TransactionType},
};

/// A business rule that a proposed transaction breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The person does not exist.
    PersonNotFound,
    /// The category does not exist.
    CategoryNotFound,
    /// The person is a minor and the transaction is income.
    MinorCannotReceiveIncome,
    /// The category's purpose does not allow the transaction type.
    CategoryTypeMismatch,
}

impl FailureReason {
    /// A stable code clients can match on.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::PersonNotFound => "PersonNotFound",
            FailureReason::CategoryNotFound => "CategoryNotFound",
            FailureReason::MinorCannotReceiveIncome => "MinorCannotReceiveIncome",
            FailureReason::CategoryTypeMismatch => "CategoryTypeMismatch",
        }
    }

    /// A message that explains the problem to a person.
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::PersonNotFound => "The person could not be found.",
            FailureReason::CategoryNotFound => "The category could not be found.",
            FailureReason::MinorCannotReceiveIncome => {
                "People under 18 years old can only have expenses."
            }
            FailureReason::CategoryTypeMismatch => {
                "The category's purpose does not allow this type of transaction."
            }
        }
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FailureReason", 2)?;
        state.serialize_field("codigo", self.code())?;
        state.serialize_field("mensagem", self.message())?;
        state.end()
    }
}

/// Check a proposed transaction against the person and category it refers to.
///
/// `None` means the person or category could not be found. Every rule is
/// checked, so all of the problems are reported at once, in this order:
/// 1. the person must exist,
/// 2. the category must exist,
/// 3. a minor cannot receive income,
/// 4. the category's purpose must permit the transaction type.
///
/// # Errors
///
/// Returns the reasons the transaction is not allowed, if any.
pub fn validate_transaction(
    person: Option<&Person>,
    category: Option<&Category>,
    transaction_type: TransactionType,
) -> Result<(), Vec<FailureReason>> {
    let mut reasons = Vec::new();

    if person.is_none() {
        reasons.push(FailureReason::PersonNotFound);
    }

    if category.is_none() {
        reasons.push(FailureReason::CategoryNotFound);
    }

    if person.is_some_and(|person| person.is_minor() && transaction_type == TransactionType::Income)
    {
        reasons.push(FailureReason::MinorCannotReceiveIncome);
    }

    if category.is_some_and(|category| !category.permits(transaction_type)) {
        reasons.push(FailureReason::CategoryTypeMismatch);
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(reasons)
    }
}

/// Look up the person and category and check the transaction rules.
///
/// A missing ID is treated the same as an ID that does not exist.
///
/// # Errors
///
/// Returns an [Error] if the repository could not be read. Broken rules are
/// not errors here, they are returned in the [ValidationReport].
pub fn check_transaction<R: Repository + ?Sized>(
    repository: &R,
    person_id: Option<PersonId>,
    category_id: Option<CategoryId>,
    transaction_type: TransactionType,
) -> Result<ValidationReport, Error> {
    let person = match person_id {
        Some(id) => repository.find_person_by_id(id)?,
        None => None,
    };

    let category = match category_id {
        Some(id) => repository.find_category_by_id(id)?,
        None => None,
    };

    let result = validate_transaction(person.as_ref(), category.as_ref(), transaction_type);

    Ok(ValidationReport::from(result))
}

/// Check a transaction that is about to be stored.
///
/// # Errors
///
/// Returns an [Error::InvalidTransaction] listing every broken rule, or an
/// [Error] if the repository could not be read.
pub fn ensure_transaction_allowed<R: Repository + ?Sized>(
    repository: &R,
    builder: &TransactionBuilder,
) -> Result<(), Error> {
    let report = check_transaction(
        repository,
        Some(builder.person_id),
        Some(builder.category_id),
        builder.transaction_type,
    )?;

    if !report.valid {
        tracing::warn!(
            "rejected {} for person {} in category {}: {:?}",
            builder.transaction_type,
            builder.person_id,
            builder.category_id,
            report.reasons
        );
    }

    report.into_result()
}

/// The outcome of checking a transaction against the business rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Whether the transaction may be stored.
    #[serde(rename = "valido")]
    pub valid: bool,
    /// Every rule the transaction breaks, in the order they are checked.
    #[serde(rename = "motivos")]
    pub reasons: Vec<FailureReason>,
}

impl ValidationReport {
    /// Turn a report with broken rules into an [Error::InvalidTransaction].
    pub fn into_result(self) -> Result<(), Error> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::InvalidTransaction(self.reasons))
        }
    }
}

impl From<Result<(), Vec<FailureReason>>> for ValidationReport {
    fn from(result: Result<(), Vec<FailureReason>>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                reasons: Vec::new(),
            },
            Err(reasons) => Self {
                valid: false,
                reasons,
            },
        }
    }
}
