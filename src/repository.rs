//! The lookups the business rules need from storage.
//!
//! The rules in [crate::transaction::validation], [crate::category::guard] and
//! [crate::report] only read through [Repository], so they can be tested
//! against [InMemoryRepository] instead of a database.

use rusqlite::Connection;

use crate::{
    Error,
    category::{self, Category, CategoryId},
    description::Description,
    person::{self, Person, PersonId, PersonName},
    transaction::{self, Transaction, TransactionFilter},
};

/// Read access to people, categories and transactions.
pub trait Repository {
    /// Get a person by ID, or `None` if there is no such person.
    fn find_person_by_id(&self, id: PersonId) -> Result<Option<Person>, Error>;

    /// Get a category by ID, or `None` if there is no such category.
    fn find_category_by_id(&self, id: CategoryId) -> Result<Option<Category>, Error>;

    /// The number of transactions that belong to the category `id`.
    fn count_transactions_referencing_category(&self, id: CategoryId) -> Result<u32, Error>;

    /// The number of transactions that belong to the person `id`.
    fn count_transactions_referencing_person(&self, id: PersonId) -> Result<u32, Error>;

    /// Every person, ordered by name.
    fn list_people(&self) -> Result<Vec<Person>, Error>;

    /// Every category, ordered by description.
    fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// The transactions that match `filter`, newest first.
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error>;

    /// Whether a person other than `excluding` already uses `name`, ignoring case.
    fn name_exists(&self, name: &PersonName, excluding: Option<PersonId>) -> Result<bool, Error>;

    /// Whether a category already uses `description`, ignoring case.
    fn description_exists(&self, description: &Description) -> Result<bool, Error>;
}

impl Repository for Connection {
    fn find_person_by_id(&self, id: PersonId) -> Result<Option<Person>, Error> {
        person::find_person(id, self)
    }

    fn find_category_by_id(&self, id: CategoryId) -> Result<Option<Category>, Error> {
        category::find_category(id, self)
    }

    fn count_transactions_referencing_category(&self, id: CategoryId) -> Result<u32, Error> {
        category::count_category_references(id, self)
    }

    fn count_transactions_referencing_person(&self, id: PersonId) -> Result<u32, Error> {
        transaction::count_person_transactions(id, self)
    }

    fn list_people(&self) -> Result<Vec<Person>, Error> {
        person::get_all_people(self)
    }

    fn list_categories(&self) -> Result<Vec<Category>, Error> {
        category::get_all_categories(self)
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        transaction::get_transactions(filter, self)
    }

    fn name_exists(&self, name: &PersonName, excluding: Option<PersonId>) -> Result<bool, Error> {
        person::name_exists(name, excluding, self)
    }

    fn description_exists(&self, description: &Description) -> Result<bool, Error> {
        category::description_exists(description, self)
    }
}

#[cfg(test)]
pub use in_memory::InMemoryRepository;
