//! Core transaction domain types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, category::CategoryId, database_id::DatabaseId, description::Description,
    money::Amount, person::PersonId,
};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum TransactionType {
    /// Money was spent.
    #[serde(rename = "Despesa")]
    Expense,
    /// Money was earned.
    #[serde(rename = "Receita")]
    Income,
}

impl TransactionType {
    /// The name used for the type in the API and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Despesa",
            TransactionType::Income => "Receita",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Despesa" => Ok(TransactionType::Expense),
            "Receita" => Ok(TransactionType::Income),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    #[serde(rename = "descricao")]
    pub description: Description,
    /// The amount of money spent or earned, always positive.
    #[serde(rename = "valor")]
    pub amount: Amount,
    /// Whether the money was spent or earned.
    #[serde(rename = "tipo")]
    pub transaction_type: TransactionType,
    /// When the transaction was recorded. Set by the server and never changed.
    #[serde(rename = "dataCriacao", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The person the transaction belongs to.
    #[serde(rename = "pessoaId")]
    pub person_id: PersonId,
    /// The category the transaction belongs to.
    #[serde(rename = "categoriaId")]
    pub category_id: CategoryId,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        description: Description,
        amount: Amount,
        transaction_type: TransactionType,
        person_id: PersonId,
        category_id: CategoryId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            description,
            amount,
            transaction_type,
            person_id,
            category_id,
        }
    }

    /// The amount with income as positive and expenses as negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount.value(),
            TransactionType::Expense => -self.amount.value(),
        }
    }
}

/// The fields of a transaction that a client may set.
///
/// The ID and creation time are assigned when the transaction is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBuilder {
    /// A text description of what the transaction was for.
    pub description: Description,
    /// The amount of money spent or earned, always positive.
    pub amount: Amount,
    /// Whether the money was spent or earned.
    pub transaction_type: TransactionType,
    /// The person the transaction belongs to.
    pub person_id: PersonId,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
}

/// The JSON body for creating or updating a transaction.
///
/// The type is kept as text so that unknown values are reported as an invalid
/// type instead of a malformed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    #[serde(rename = "descricao")]
    pub description: String,
    /// The value of the transaction, e.g. "12.30".
    #[serde(rename = "valor")]
    pub amount: Decimal,
    /// Either "Despesa" or "Receita".
    #[serde(rename = "tipo")]
    pub transaction_type: String,
    /// The person the transaction belongs to.
    #[serde(rename = "pessoaId")]
    pub person_id: PersonId,
    /// The category the transaction belongs to.
    #[serde(rename = "categoriaId")]
    pub category_id: CategoryId,
}

impl TryFrom<TransactionForm> for TransactionBuilder {
    type Error = Error;

    /// Check the individual fields of the form.
    ///
    /// The business rules that involve the person and category are checked
    /// separately, see [crate::transaction::validate_transaction].
    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        Ok(Transaction::build(
            Description::new(&form.description)?,
            Amount::new(form.amount)?,
            TransactionType::from_str(&form.transaction_type)?,
            form.person_id,
            form.category_id,
        ))
    }
}
