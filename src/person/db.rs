//! Database operations for people.

use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};

use crate::{
    Error,
    person::{Age, Person, PersonId, PersonName},
};

/// Initialize the person table.
///
/// `name_key` holds the lower case name so that the database rejects names
/// that only differ by case.
pub fn create_person_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL UNIQUE,
            age INTEGER NOT NULL CHECK (age BETWEEN 0 AND 150)
        );

        CREATE INDEX IF NOT EXISTS idx_person_name ON person(name);",
    )?;

    Ok(())
}

/// Create a person and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicatePersonName] if another person has the same name ignoring case,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_person(name: PersonName, age: Age, connection: &Connection) -> Result<Person, Error> {
    connection
        .execute(
            "INSERT INTO person (name, name_key, age) VALUES (?1, ?2, ?3)",
            (name.as_ref(), name.key(), age.years()),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Person { id, name, age })
}

/// Retrieve a single person by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid person,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_person(id: PersonId, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare("SELECT id, name, age FROM person WHERE id = :id")?
        .query_row(&[(":id", &id)], map_person_row)
        .map_err(|error| error.into())
}

/// Retrieve a single person by ID, or `None` if there is no such person.
pub fn find_person(id: PersonId, connection: &Connection) -> Result<Option<Person>, Error> {
    connection
        .prepare("SELECT id, name, age FROM person WHERE id = :id")?
        .query_row(&[(":id", &id)], map_person_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all people ordered by name, then ID.
pub fn get_all_people(connection: &Connection) -> Result<Vec<Person>, Error> {
    connection
        .prepare("SELECT id, name, age FROM person ORDER BY name ASC, id ASC")?
        .query_map([], map_person_row)?
        .map(|maybe_person| maybe_person.map_err(|error| error.into()))
        .collect()
}

/// Update a person's name and age.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid person,
/// - [Error::DuplicatePersonName] if another person has the same name ignoring case,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_person(
    id: PersonId,
    name: PersonName,
    age: Age,
    connection: &Connection,
) -> Result<Person, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE person SET name = ?1, name_key = ?2, age = ?3 WHERE id = ?4",
            (name.as_ref(), name.key(), age.years(), id),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(Person { id, name, age })
}

/// Delete a person and, through the foreign key cascade, all of their transactions.
///
/// Returns the number of transactions that were removed with the person.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid person,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_person(id: PersonId, connection: &Connection) -> Result<u32, Error> {
    let sql_transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let removed_transactions: u32 = sql_transaction.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE person_id = ?1",
        [id],
        |row| row.get(0),
    )?;

    let rows_affected = sql_transaction.execute("DELETE FROM person WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    sql_transaction.commit()?;

    Ok(removed_transactions)
}

/// Whether a person other than `excluding` already uses `name`, ignoring case.
pub fn name_exists(
    name: &PersonName,
    excluding: Option<PersonId>,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM person WHERE name_key = ?1 AND id IS NOT ?2)",
            (name.key(), excluding),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_duplicate_name(error: rusqlite::Error, name: &PersonName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, Some(ref description))
            if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && description.contains("person.name_key") =>
        {
            Error::DuplicatePersonName(name.to_string())
        }
        error => error.into(),
    }
}

fn map_person_row(row: &Row) -> Result<Person, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_age: u8 = row.get(2)?;

    Ok(Person {
        id,
        name: PersonName::new_unchecked(&raw_name),
        age: Age::new(raw_age.into()).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, error.into())
        })?,
    })
}

#[cfg(test)]
mod person_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        person::{
            Age, PersonName, create_person, delete_person, find_person, get_all_people, get_person,
            name_exists, update_person,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn age(years: i64) -> Age {
        Age::new(years).unwrap()
    }

    #[test]
    fn create_person_succeeds() {
        let connection = get_test_connection();
        let name = PersonName::new("Ana").unwrap();

        let person = create_person(name.clone(), age(10), &connection).unwrap();

        assert!(person.id > 0);
        assert_eq!(person.name, name);
        assert_eq!(person.age, age(10));
    }

    #[test]
    fn create_person_fails_on_duplicate_name_ignoring_case() {
        let connection = get_test_connection();
        create_person(PersonName::new_unchecked("Ana"), age(10), &connection).unwrap();

        let result = create_person(PersonName::new_unchecked("aNA"), age(40), &connection);

        assert_eq!(result, Err(Error::DuplicatePersonName("aNA".to_owned())));
    }

    #[test]
    fn get_person_succeeds() {
        let connection = get_test_connection();
        let inserted = create_person(PersonName::new_unchecked("Bob"), age(30), &connection)
            .expect("Could not create test person");

        let selected = get_person(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_person_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_person(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn find_person_with_invalid_id_returns_none() {
        let connection = get_test_connection();

        assert_eq!(find_person(42, &connection), Ok(None));
    }

    #[test]
    fn get_all_people_orders_by_name() {
        let connection = get_test_connection();
        let carla = create_person(PersonName::new_unchecked("Carla"), age(50), &connection).unwrap();
        let ana = create_person(PersonName::new_unchecked("Ana"), age(10), &connection).unwrap();
        let bob = create_person(PersonName::new_unchecked("Bob"), age(30), &connection).unwrap();

        let people = get_all_people(&connection).unwrap();

        assert_eq!(people, vec![ana, bob, carla]);
    }

    #[test]
    fn update_person_succeeds() {
        let connection = get_test_connection();
        let person = create_person(PersonName::new_unchecked("Ana"), age(10), &connection).unwrap();

        let updated =
            update_person(person.id, PersonName::new_unchecked("Ana Maria"), age(11), &connection)
                .unwrap();

        assert_eq!(get_person(person.id, &connection), Ok(updated));
    }

    #[test]
    fn update_person_can_change_case_of_own_name() {
        let connection = get_test_connection();
        let person = create_person(PersonName::new_unchecked("ana"), age(10), &connection).unwrap();

        let result = update_person(person.id, PersonName::new_unchecked("Ana"), age(10), &connection);

        assert!(result.is_ok(), "got {result:?}");
    }

    #[test]
    fn update_person_fails_on_name_of_other_person() {
        let connection = get_test_connection();
        create_person(PersonName::new_unchecked("Ana"), age(10), &connection).unwrap();
        let bob = create_person(PersonName::new_unchecked("Bob"), age(30), &connection).unwrap();

        let result = update_person(bob.id, PersonName::new_unchecked("ANA"), age(30), &connection);

        assert_eq!(result, Err(Error::DuplicatePersonName("ANA".to_owned())));
    }

    #[test]
    fn update_person_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let result = update_person(999, PersonName::new_unchecked("Ana"), age(10), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_person_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(delete_person(999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_person_without_transactions_removes_nothing_else() {
        let connection = get_test_connection();
        let person = create_person(PersonName::new_unchecked("Ana"), age(10), &connection).unwrap();

        assert_eq!(delete_person(person.id, &connection), Ok(0));
        assert_eq!(get_person(person.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn name_exists_ignores_case_and_excluded_person() {
        let connection = get_test_connection();
        let ana = create_person(PersonName::new_unchecked("Ana"), age(10), &connection).unwrap();
        let name = PersonName::new_unchecked("ANA");

        assert_eq!(name_exists(&name, None, &connection), Ok(true));
        assert_eq!(name_exists(&name, Some(ana.id), &connection), Ok(false));
        assert_eq!(
            name_exists(&PersonName::new_unchecked("Bob"), None, &connection),
            Ok(false)
        );
    }
}
