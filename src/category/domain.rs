//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, description::Description, transaction::TransactionType};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// Which types of transactions a category may classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum CategoryPurpose {
    /// Only expenses.
    #[serde(rename = "Despesa")]
    Expense,
    /// Only income.
    #[serde(rename = "Receita")]
    Income,
    /// Both expenses and income.
    #[serde(rename = "Ambas")]
    Both,
}

impl CategoryPurpose {
    /// Whether a transaction of `transaction_type` may use a category with this purpose.
    pub fn permits(&self, transaction_type: TransactionType) -> bool {
        match (self, transaction_type) {
            (CategoryPurpose::Both, _) => true,
            (CategoryPurpose::Expense, TransactionType::Expense) => true,
            (CategoryPurpose::Income, TransactionType::Income) => true,
            (CategoryPurpose::Expense, TransactionType::Income) => false,
            (CategoryPurpose::Income, TransactionType::Expense) => false,
        }
    }

    /// The name used for the purpose in the API and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryPurpose::Expense => "Despesa",
            CategoryPurpose::Income => "Receita",
            CategoryPurpose::Both => "Ambas",
        }
    }
}

impl FromStr for CategoryPurpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Despesa" => Ok(CategoryPurpose::Expense),
            "Receita" => Ok(CategoryPurpose::Income),
            "Ambas" => Ok(CategoryPurpose::Both),
            other => Err(Error::InvalidPurpose(other.to_owned())),
        }
    }
}

impl Display for CategoryPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category for classifying transactions (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// What the category is for, unique ignoring case.
    #[serde(rename = "descricao")]
    pub description: Description,
    /// Which transaction types the category may classify.
    #[serde(rename = "finalidade")]
    pub purpose: CategoryPurpose,
}

impl Category {
    /// Whether a transaction of `transaction_type` may use this category.
    pub fn permits(&self, transaction_type: TransactionType) -> bool {
        self.purpose.permits(transaction_type)
    }
}

/// The JSON body for creating a category.
///
/// The purpose is kept as text so that unknown values are reported as an
/// invalid purpose instead of a malformed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryForm {
    /// What the category is for.
    #[serde(rename = "descricao")]
    pub description: String,
    /// One of "Despesa", "Receita" or "Ambas".
    #[serde(rename = "finalidade")]
    pub purpose: String,
}
