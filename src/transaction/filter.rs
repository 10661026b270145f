//! Filtering and ordering of transaction listings.

use std::{cmp::Ordering, str::FromStr};

use serde::Deserialize;

use crate::{
    Error,
    category::CategoryId,
    person::PersonId,
    transaction::{Transaction, TransactionType},
};

/// The query parameters that pick out transactions.
///
/// The type is kept as text so that unknown values are reported as an invalid
/// type instead of a malformed request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionQuery {
    /// The person the transactions belong to.
    #[serde(rename = "pessoaId", default)]
    pub person_id: Option<PersonId>,
    /// The category the transactions belong to.
    #[serde(rename = "categoriaId", default)]
    pub category_id: Option<CategoryId>,
    /// Either "Despesa" or "Receita".
    #[serde(rename = "tipo", default)]
    pub transaction_type: Option<String>,
}

/// Restricts which transactions are listed.
///
/// Every field that is set must match (AND). A field that is not set places no
/// restriction on the transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only include transactions belonging to this person.
    pub person_id: Option<PersonId>,
    /// Only include transactions belonging to this category.
    pub category_id: Option<CategoryId>,
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    /// A filter that matches every transaction.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only include transactions belonging to `person_id`.
    pub fn person(mut self, person_id: PersonId) -> Self {
        self.person_id = Some(person_id);
        self
    }

    /// Only include transactions belonging to `category_id`.
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Only include transactions of `transaction_type`.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Whether `transaction` passes every restriction in the filter.
    ///
    /// Uses the same equality on person, category and type that the reports
    /// use to group transactions.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.person_id
            .is_none_or(|person_id| transaction.person_id == person_id)
            && self
                .category_id
                .is_none_or(|category_id| transaction.category_id == category_id)
            && self
                .transaction_type
                .is_none_or(|transaction_type| transaction.transaction_type == transaction_type)
    }
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = Error;

    /// A blank type places no restriction, like a missing one.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTransactionType] if the type is not blank and
    /// not a known type.
    fn try_from(query: TransactionQuery) -> Result<Self, Self::Error> {
        let transaction_type = match query.transaction_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(TransactionType::from_str(text)?),
        };

        Ok(Self {
            person_id: query.person_id,
            category_id: query.category_id,
            transaction_type,
        })
    }
}

/// Orders transactions from the most recently created to the oldest.
///
/// Transactions created at the same time are ordered by descending ID so the
/// order is stable.
fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Keep the transactions that match `filter`, newest first.
pub fn filter_transactions(
    transactions: impl IntoIterator<Item = Transaction>,
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    let mut matching: Vec<Transaction> = transactions
        .into_iter()
        .filter(|transaction| filter.matches(transaction))
        .collect();

    matching.sort_by(newest_first);

    matching
}
