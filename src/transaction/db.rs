//! Database operations for transactions.

use std::str::FromStr;

use rusqlite::{Connection, Row, ToSql};
use time::OffsetDateTime;

use crate::{
    Error,
    description::Description,
    money::Amount,
    transaction::{Transaction, TransactionBuilder, TransactionFilter, TransactionId, TransactionType},
};

const SELECT_COLUMNS: &str = "SELECT id, description, amount_cents, transaction_type, created_at, \
    person_id, category_id FROM \"transaction\"";

/// Create the transaction table in the database.
///
/// Deleting a person deletes their transactions, while a category cannot be
/// deleted while a transaction refers to it.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
            transaction_type TEXT NOT NULL CHECK (transaction_type IN ('Despesa', 'Receita')),
            created_at TEXT NOT NULL,
            person_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(person_id) REFERENCES person(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_person ON \"transaction\"(person_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);",
    )?;

    Ok(())
}

/// Create a new transaction in the database from a builder.
///
/// The creation time is set to `created_at`, callers should pass in the current time.
///
/// # Errors
/// This function will return a:
/// - [Error::IntegrityConflict] if the person or category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\"
                (description, amount_cents, transaction_type, created_at, person_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, description, amount_cents, transaction_type, created_at, person_id, category_id",
        )?
        .query_row(
            (
                builder.description.as_ref(),
                builder.amount.cents(),
                builder.transaction_type.as_str(),
                created_at,
                builder.person_id,
                builder.category_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the transactions that match `filter`, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(person_id) = filter.person_id {
        params.push(Box::new(person_id));
        conditions.push(format!("person_id = ?{}", params.len()));
    }

    if let Some(category_id) = filter.category_id {
        params.push(Box::new(category_id));
        conditions.push(format!("category_id = ?{}", params.len()));
    }

    if let Some(transaction_type) = filter.transaction_type {
        params.push(Box::new(transaction_type.as_str()));
        conditions.push(format!("transaction_type = ?{}", params.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    // Sort by creation time, and then ID to keep the order stable for transactions created together.
    let query = format!("{SELECT_COLUMNS}{where_clause} ORDER BY created_at DESC, id DESC");

    connection
        .prepare(&query)?
        .query_map(rusqlite::params_from_iter(params.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Replace the user editable fields of a transaction, keeping its creation time.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::IntegrityConflict] if the person or category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET description = ?1, amount_cents = ?2, transaction_type = ?3, person_id = ?4, category_id = ?5
         WHERE id = ?6",
        (
            builder.description.as_ref(),
            builder.amount.cents(),
            builder.transaction_type.as_str(),
            builder.person_id,
            builder.category_id,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_transaction(id, connection)
}

/// Delete a transaction by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Count the transactions that belong to the person `person_id`.
pub fn count_person_transactions(
    person_id: crate::person::PersonId,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE person_id = ?1",
            [person_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_description: String = row.get(1)?;
    let cents = row.get(2)?;
    let raw_type: String = row.get(3)?;
    let created_at = row.get(4)?;
    let person_id = row.get(5)?;
    let category_id = row.get(6)?;

    let transaction_type = TransactionType::from_str(&raw_type).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, error.into())
    })?;

    Ok(Transaction {
        id,
        description: Description::new_unchecked(&raw_description),
        amount: Amount::from_cents(cents),
        transaction_type,
        created_at,
        person_id,
        category_id,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Duration, macros::datetime};

    use crate::{
        Error,
        category::{Category, CategoryPurpose, count_category_references, create_category, delete_category},
        db::initialize,
        description::Description,
        money::Amount,
        person::{Age, Person, PersonName, create_person, delete_person},
        transaction::{
            Transaction, TransactionFilter, TransactionType, count_person_transactions,
            count_transactions, create_transaction, delete_transaction, get_transaction,
            get_transactions, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_person(name: &str, connection: &Connection) -> Person {
        create_person(PersonName::new_unchecked(name), Age::new(30).unwrap(), connection)
            .expect("Could not create test person")
    }

    fn create_test_category(description: &str, connection: &Connection) -> Category {
        create_category(
            Description::new_unchecked(description),
            CategoryPurpose::Both,
            connection,
        )
        .expect("Could not create test category")
    }

    fn insert(
        person: &Person,
        category: &Category,
        transaction_type: TransactionType,
        minutes: i64,
        connection: &Connection,
    ) -> Transaction {
        create_transaction(
            Transaction::build(
                Description::new_unchecked("test"),
                Amount::from_cents(1000),
                transaction_type,
                person.id,
                category.id,
            ),
            datetime!(2025-10-05 9:00 UTC) + Duration::minutes(minutes),
            connection,
        )
        .expect("Could not create transaction")
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let person = create_test_person("Bob", &conn);
        let category = create_test_category("Mercado", &conn);
        let created_at = datetime!(2025-10-05 12:34:56.789 UTC);

        let transaction = create_transaction(
            Transaction::build(
                Description::new_unchecked("Compras"),
                Amount::from_cents(12_345),
                TransactionType::Expense,
                person.id,
                category.id,
            ),
            created_at,
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.amount, Amount::from_cents(12_345));
        assert_eq!(transaction.created_at, created_at);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn create_fails_on_invalid_person() {
        let conn = get_test_connection();
        let category = create_test_category("Mercado", &conn);

        let result = create_transaction(
            Transaction::build(
                Description::new_unchecked("Compras"),
                Amount::from_cents(100),
                TransactionType::Expense,
                42,
                category.id,
            ),
            datetime!(2025-10-05 9:00 UTC),
            &conn,
        );

        assert!(
            matches!(result, Err(Error::IntegrityConflict(_))),
            "want integrity conflict, got {result:?}"
        );
    }

    #[test]
    fn get_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(1, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_transactions_orders_newest_first() {
        let conn = get_test_connection();
        let person = create_test_person("Bob", &conn);
        let category = create_test_category("Mercado", &conn);
        let older = insert(&person, &category, TransactionType::Expense, 0, &conn);
        let newer = insert(&person, &category, TransactionType::Expense, 5, &conn);
        let same_time = insert(&person, &category, TransactionType::Expense, 5, &conn);

        let got = get_transactions(&TransactionFilter::all(), &conn).unwrap();

        assert_eq!(got, vec![same_time, newer, older]);
    }

    #[test]
    fn get_transactions_applies_every_filter() {
        let conn = get_test_connection();
        let ana = create_test_person("Ana", &conn);
        let bob = create_test_person("Bob", &conn);
        let groceries = create_test_category("Mercado", &conn);
        let salary = create_test_category("Salário", &conn);
        let want = insert(&bob, &salary, TransactionType::Income, 1, &conn);
        insert(&bob, &salary, TransactionType::Expense, 2, &conn);
        insert(&bob, &groceries, TransactionType::Income, 3, &conn);
        insert(&ana, &salary, TransactionType::Income, 4, &conn);

        let filter = TransactionFilter::all()
            .person(bob.id)
            .category(salary.id)
            .transaction_type(TransactionType::Income);
        let got = get_transactions(&filter, &conn).unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn update_keeps_creation_time() {
        let conn = get_test_connection();
        let person = create_test_person("Bob", &conn);
        let category = create_test_category("Mercado", &conn);
        let original = insert(&person, &category, TransactionType::Expense, 0, &conn);

        let updated = update_transaction(
            original.id,
            Transaction::build(
                Description::new_unchecked("Feira"),
                Amount::from_cents(2_500),
                TransactionType::Income,
                person.id,
                category.id,
            ),
            &conn,
        )
        .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.description.as_ref(), "Feira");
        assert_eq!(updated.amount, Amount::from_cents(2_500));
        assert_eq!(updated.transaction_type, TransactionType::Income);
    }

    #[test]
    fn update_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();
        let person = create_test_person("Bob", &conn);
        let category = create_test_category("Mercado", &conn);

        let result = update_transaction(
            99,
            Transaction::build(
                Description::new_unchecked("Feira"),
                Amount::from_cents(2_500),
                TransactionType::Income,
                person.id,
                category.id,
            ),
            &conn,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_succeeds() {
        let conn = get_test_connection();
        let person = create_test_person("Bob", &conn);
        let category = create_test_category("Mercado", &conn);
        let transaction = insert(&person, &category, TransactionType::Expense, 0, &conn);

        assert_eq!(delete_transaction(transaction.id, &conn), Ok(()));
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
        assert_eq!(delete_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn deleting_person_cascades_to_transactions() {
        let conn = get_test_connection();
        let ana = create_test_person("Ana", &conn);
        let bob = create_test_person("Bob", &conn);
        let category = create_test_category("Mercado", &conn);
        for minutes in 0..5 {
            insert(&bob, &category, TransactionType::Expense, minutes, &conn);
        }
        insert(&ana, &category, TransactionType::Expense, 10, &conn);

        assert_eq!(count_person_transactions(bob.id, &conn), Ok(5));
        assert_eq!(delete_person(bob.id, &conn), Ok(5));

        let remaining = get_transactions(&TransactionFilter::all().person(bob.id), &conn).unwrap();
        assert!(remaining.is_empty());
        assert_eq!(count_transactions(&conn), Ok(1));
    }

    #[test]
    fn deleting_referenced_category_is_restricted() {
        let conn = get_test_connection();
        let person = create_test_person("Bob", &conn);
        let category = create_test_category("Mercado", &conn);
        insert(&person, &category, TransactionType::Expense, 0, &conn);
        insert(&person, &category, TransactionType::Expense, 1, &conn);

        assert_eq!(count_category_references(category.id, &conn), Ok(2));
        assert_eq!(delete_category(category.id, &conn), Err(Error::CategoryInUse(2)));
        assert_eq!(count_transactions(&conn), Ok(2));
    }
}
