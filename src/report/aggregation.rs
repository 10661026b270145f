//! Income and expense totals grouped by person or category.
//!
//! Every group that exists gets a row, even with no transactions, and the
//! grand total is the sum of the rows so the two always agree.

use std::{
    collections::HashMap,
    hash::Hash,
    iter::Sum,
    ops::Add,
};

use rust_decimal::Decimal;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    category::{Category, CategoryId, CategoryPurpose},
    description::Description,
    money,
    person::{Person, PersonId, PersonName},
    transaction::{Transaction, TransactionType},
};

/// The number of transactions and the income and expenses they add up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// How many transactions were counted.
    pub transaction_count: u32,
    /// The sum of the income transactions.
    pub income: Decimal,
    /// The sum of the expense transactions, as a positive number.
    pub expense: Decimal,
}

impl Totals {
    /// Totals with no transactions, all zero.
    pub fn zero() -> Self {
        Self {
            transaction_count: 0,
            income: money::zero(),
            expense: money::zero(),
        }
    }

    /// Sum up `transactions`.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Self::zero();

        for transaction in transactions {
            totals.record(transaction);
        }

        totals
    }

    /// Count `transaction` towards the totals.
    pub fn record(&mut self, transaction: &Transaction) {
        self.transaction_count += 1;

        match transaction.transaction_type {
            TransactionType::Income => self.income += transaction.amount.value(),
            TransactionType::Expense => self.expense += transaction.amount.value(),
        }
    }

    /// Income minus expenses.
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }
}

impl Default for Totals {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Totals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            transaction_count: self.transaction_count + rhs.transaction_count,
            income: self.income + rhs.income,
            expense: self.expense + rhs.expense,
        }
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |total, totals| total + totals)
    }
}

impl<'a> Sum<&'a Totals> for Totals {
    fn sum<I: Iterator<Item = &'a Totals>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Totals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Totals", 4)?;
        state.serialize_field("quantidadeTransacoes", &self.transaction_count)?;
        state.serialize_field("totalReceitas", &self.income)?;
        state.serialize_field("totalDespesas", &self.expense)?;
        state.serialize_field("saldo", &self.balance())?;
        state.end()
    }
}

/// Sum up `transactions` for each key returned by `key_of`.
///
/// Keys without transactions are absent from the map, use [Totals::zero] for them.
pub fn totals_by<'a, K, F>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    key_of: F,
) -> HashMap<K, Totals>
where
    K: Eq + Hash,
    F: Fn(&Transaction) -> K,
{
    let mut totals: HashMap<K, Totals> = HashMap::new();

    for transaction in transactions {
        totals
            .entry(key_of(transaction))
            .or_default()
            .record(transaction);
    }

    totals
}

/// One row per group plus the sum of all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report<T> {
    /// The totals for each group.
    #[serde(rename = "itens")]
    pub items: Vec<T>,
    /// The sum of the totals of every group.
    #[serde(rename = "totalGeral")]
    pub grand_total: Totals,
}

/// The totals for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonTotals {
    /// The ID of the person.
    #[serde(rename = "pessoaId")]
    pub person_id: PersonId,
    /// The person's name.
    #[serde(rename = "nome")]
    pub name: PersonName,
    /// The totals of the person's transactions.
    #[serde(flatten)]
    pub totals: Totals,
}

/// The totals for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    /// The ID of the category.
    #[serde(rename = "categoriaId")]
    pub category_id: CategoryId,
    /// What the category is for.
    #[serde(rename = "descricao")]
    pub description: Description,
    /// Which transaction types the category may classify.
    #[serde(rename = "finalidade")]
    pub purpose: CategoryPurpose,
    /// The totals of the category's transactions.
    #[serde(flatten)]
    pub totals: Totals,
}

/// Total up the income and expenses of each person.
///
/// The rows follow the order of `people`. Transactions of people that are not
/// in `people` are ignored.
pub fn aggregate_by_person(people: &[Person], transactions: &[Transaction]) -> Report<PersonTotals> {
    let mut totals = totals_by(transactions, |transaction| transaction.person_id);

    let items: Vec<PersonTotals> = people
        .iter()
        .map(|person| PersonTotals {
            person_id: person.id,
            name: person.name.clone(),
            totals: totals.remove(&person.id).unwrap_or_default(),
        })
        .collect();

    let grand_total = items.iter().map(|item| item.totals).sum();

    Report { items, grand_total }
}

/// Total up the income and expenses of each category.
///
/// The rows follow the order of `categories`. Transactions of categories that
/// are not in `categories` are ignored.
pub fn aggregate_by_category(
    categories: &[Category],
    transactions: &[Transaction],
) -> Report<CategoryTotals> {
    let mut totals = totals_by(transactions, |transaction| transaction.category_id);

    let items: Vec<CategoryTotals> = categories
        .iter()
        .map(|category| CategoryTotals {
            category_id: category.id,
            description: category.description.clone(),
            purpose: category.purpose,
            totals: totals.remove(&category.id).unwrap_or_default(),
        })
        .collect();

    let grand_total = items.iter().map(|item| item.totals).sum();

    Report { items, grand_total }
}
