//! Defines the core data model and database queries for investments.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::Error;

/// A named holding and its current worth, e.g. a savings account or an index
/// fund position.
#[derive(Debug, Clone, PartialEq)]
pub struct Investment {
    /// The ID of the investment.
    pub id: i64,
    /// The name of the holding.
    pub name: String,
    /// The current value of the holding in dollars.
    pub value: Decimal,
}

/// Create a new investment in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyInvestmentName] if the name is empty or whitespace,
/// - or [Error::NegativeInvestmentValue] if the value is below zero,
/// - or [Error::DuplicateInvestmentName] if an investment with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_investment(
    name: &str,
    value: Decimal,
    connection: &Connection,
) -> Result<Investment, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyInvestmentName);
    }

    if value < Decimal::ZERO {
        return Err(Error::NegativeInvestmentValue(value));
    }

    let investment = connection
        .prepare(
            "INSERT INTO investment (name, value)
             VALUES (?1, ?2)
             RETURNING id, name, value",
        )?
        .query_row((name, value.to_string()), map_investment_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateInvestmentName(name.to_owned()),
            error => error.into(),
        })?;

    Ok(investment)
}

/// Retrieve all investments in insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_investments(connection: &Connection) -> Result<Vec<Investment>, Error> {
    let mut statement =
        connection.prepare("SELECT id, name, value FROM investment ORDER BY id ASC")?;
    let investments = statement
        .query_map([], map_investment_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(investments)
}

/// Delete the investment with `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingInvestment] if `id` does not refer to an investment,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_investment(id: i64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM investment WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingInvestment);
    }

    Ok(())
}

/// Create the investment table in the database.
///
/// Values are stored as text so that exact decimal values survive the round
/// trip through SQLite.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_investment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS investment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_investment_row(row: &Row) -> Result<Investment, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let value_text: String = row.get(2)?;
    let value = Decimal::from_str(&value_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(error)))?;

    Ok(Investment { id, name, value })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::{Error, db::initialize};

    use super::{create_investment, delete_investment, get_investments};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_investment("Index fund", Decimal::new(500000, 2), &conn);

        match result {
            Ok(investment) => {
                assert_eq!(investment.name, "Index fund");
                assert_eq!(investment.value, Decimal::new(500000, 2));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_empty_name() {
        let conn = get_test_connection();

        let result = create_investment("   ", Decimal::ONE, &conn);

        assert_eq!(result, Err(Error::EmptyInvestmentName));
    }

    #[test]
    fn create_fails_on_negative_value() {
        let conn = get_test_connection();
        let value = Decimal::new(-100, 0);

        let result = create_investment("Index fund", value, &conn);

        assert_eq!(result, Err(Error::NegativeInvestmentValue(value)));
    }

    #[test]
    fn create_fails_on_duplicate_name() {
        let conn = get_test_connection();
        create_investment("Index fund", Decimal::ONE, &conn).unwrap();

        let result = create_investment("Index fund", Decimal::TWO, &conn);

        assert_eq!(
            result,
            Err(Error::DuplicateInvestmentName("Index fund".to_owned()))
        );
    }

    #[test]
    fn zero_value_is_allowed() {
        let conn = get_test_connection();

        let investment = create_investment("New position", Decimal::ZERO, &conn).unwrap();

        assert_eq!(investment.value, Decimal::ZERO);
    }

    #[test]
    fn get_returns_investments_in_insertion_order() {
        let conn = get_test_connection();
        create_investment("Index fund", Decimal::ONE, &conn).unwrap();
        create_investment("Savings", Decimal::TWO, &conn).unwrap();

        let investments = get_investments(&conn).unwrap();

        let names = investments
            .iter()
            .map(|investment| investment.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Index fund", "Savings"]);
    }

    #[test]
    fn delete_removes_investment() {
        let conn = get_test_connection();
        let investment = create_investment("Index fund", Decimal::ONE, &conn).unwrap();

        delete_investment(investment.id, &conn).unwrap();

        assert!(get_investments(&conn).unwrap().is_empty());
    }

    #[test]
    fn delete_fails_on_missing_investment() {
        let conn = get_test_connection();

        let result = delete_investment(42, &conn);

        assert_eq!(result, Err(Error::DeleteMissingInvestment));
    }
}
