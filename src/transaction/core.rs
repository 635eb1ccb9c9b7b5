//! Defines the core data model and database queries for transactions.

use std::{ops::RangeInclusive, str::FromStr};

use rusqlite::{Connection, Row, params, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::normalize_amount};

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Amounts follow the accounting convention: income is positive, expenses are
/// negative. The sign is set from the category when the transaction is
/// created, see [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The amount of money spent or earned in this transaction.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to, e.g. "Food", "Salary".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
}

/// The data needed to create a transaction.
///
/// The amount is a magnitude as entered by the user; its sign is decided by
/// the category when the transaction is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The value of the transaction in dollars.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
}

/// Create a new transaction in the database.
///
/// The amount's sign is normalized to match the category: income categories
/// store positive amounts, everything else stores negative amounts.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyCategory] if the category is empty or whitespace,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if new_transaction.category.trim().is_empty() {
        return Err(Error::EmptyCategory);
    }

    let amount = normalize_amount(new_transaction.amount, &new_transaction.category);

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, date, category, description)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, date, category, description",
        )?
        .query_row(
            (
                amount.to_string(),
                new_transaction.date,
                &new_transaction.category,
                &new_transaction.description,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve transactions, oldest first.
///
/// If `period` is given, only transactions whose dates fall within the
/// inclusive range are returned. Transactions on the same date keep their
/// insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions(
    period: Option<&RangeInclusive<Date>>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    match period {
        Some(period) => {
            let mut statement = connection.prepare(
                "SELECT id, amount, date, category, description FROM \"transaction\"
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date ASC, id ASC",
            )?;
            let transactions = statement
                .query_map(params![period.start(), period.end()], map_transaction_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(transactions)
        }
        None => {
            let mut statement = connection.prepare(
                "SELECT id, amount, date, category, description FROM \"transaction\"
                 ORDER BY date ASC, id ASC",
            )?;
            let transactions = statement
                .query_map([], map_transaction_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(transactions)
        }
    }
}

/// Retrieve the `limit` most recent transactions, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_recent_transactions(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(
        "SELECT id, amount, date, category, description FROM \"transaction\"
         ORDER BY date DESC, id DESC
         LIMIT ?1",
    )?;
    let transactions = statement
        .query_map(params![limit], map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

/// Retrieve the distinct categories of the most recent transactions, most
/// recently used first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_recent_categories(limit: u32, connection: &Connection) -> Result<Vec<String>, Error> {
    let mut statement = connection.prepare(
        "SELECT category FROM \"transaction\"
         GROUP BY category
         ORDER BY MAX(id) DESC
         LIMIT ?1",
    )?;
    let categories = statement
        .query_map(params![limit], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories)
}

/// Delete the transaction with `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: i64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// Amounts are stored as text so that exact decimal values survive the round
/// trip through SQLite.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount TEXT NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Add index used by the dashboard and transactions pages.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount_text: String = row.get(1)?;
    let amount = Decimal::from_str(&amount_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error)))?;
    let date = row.get(2)?;
    let category = row.get(3)?;
    let description = row.get(4)?;

    Ok(Transaction {
        id,
        amount,
        date,
        category,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{Error, db::initialize};

    use super::{
        NewTransaction, create_transaction, delete_transaction, get_recent_categories,
        get_recent_transactions, get_transactions,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(amount: Decimal, date: time::Date, category: &str) -> NewTransaction {
        NewTransaction {
            amount,
            date,
            category: category.to_owned(),
            description: "".to_owned(),
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_transaction(
            new_transaction(Decimal::new(1230, 2), date!(2025 - 10 - 05), "Salary"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, Decimal::new(1230, 2));
                assert_eq!(transaction.category, "Salary");
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_negates_expense_amounts() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            new_transaction(Decimal::new(5000, 2), date!(2025 - 10 - 05), "Food"),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.amount, Decimal::new(-5000, 2));
    }

    #[test]
    fn create_fails_on_empty_category() {
        let conn = get_test_connection();

        let result = create_transaction(
            new_transaction(Decimal::ONE, date!(2025 - 10 - 05), "  "),
            &conn,
        );

        assert_eq!(result, Err(Error::EmptyCategory));
    }

    #[test]
    fn get_returns_transactions_oldest_first() {
        let conn = get_test_connection();
        create_transaction(
            new_transaction(Decimal::new(200, 0), date!(2025 - 10 - 05), "Salary"),
            &conn,
        )
        .unwrap();
        create_transaction(
            new_transaction(Decimal::new(100, 0), date!(2025 - 10 - 01), "Salary"),
            &conn,
        )
        .unwrap();

        let transactions = get_transactions(None, &conn).unwrap();

        let dates = transactions
            .iter()
            .map(|transaction| transaction.date)
            .collect::<Vec<_>>();
        assert_eq!(dates, vec![date!(2025 - 10 - 01), date!(2025 - 10 - 05)]);
    }

    #[test]
    fn same_date_transactions_keep_insertion_order() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        for i in 1..=3 {
            create_transaction(new_transaction(Decimal::new(i, 0), today, "Salary"), &conn)
                .unwrap();
        }

        let transactions = get_transactions(None, &conn).unwrap();

        let ids = transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn get_filters_by_period() {
        let conn = get_test_connection();
        create_transaction(
            new_transaction(Decimal::ONE, date!(2025 - 09 - 30), "Salary"),
            &conn,
        )
        .unwrap();
        create_transaction(
            new_transaction(Decimal::ONE, date!(2025 - 10 - 01), "Salary"),
            &conn,
        )
        .unwrap();
        create_transaction(
            new_transaction(Decimal::ONE, date!(2025 - 10 - 31), "Salary"),
            &conn,
        )
        .unwrap();
        create_transaction(
            new_transaction(Decimal::ONE, date!(2025 - 11 - 01), "Salary"),
            &conn,
        )
        .unwrap();

        let period = date!(2025 - 10 - 01)..=date!(2025 - 10 - 31);
        let transactions = get_transactions(Some(&period), &conn).unwrap();

        assert_eq!(transactions.len(), 2);
        assert!(
            transactions
                .iter()
                .all(|transaction| period.contains(&transaction.date))
        );
    }

    #[test]
    fn recent_returns_newest_first_up_to_limit() {
        let conn = get_test_connection();
        for day in 1..=5 {
            create_transaction(
                new_transaction(
                    Decimal::new(day as i64, 0),
                    date!(2025 - 10 - 01).replace_day(day).unwrap(),
                    "Salary",
                ),
                &conn,
            )
            .unwrap();
        }

        let transactions = get_recent_transactions(3, &conn).unwrap();

        let dates = transactions
            .iter()
            .map(|transaction| transaction.date)
            .collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 10 - 05),
                date!(2025 - 10 - 04),
                date!(2025 - 10 - 03)
            ]
        );
    }

    #[test]
    fn recent_categories_are_distinct_and_most_recent_first() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        for category in ["Food", "Rent", "Food", "Transport"] {
            create_transaction(new_transaction(Decimal::ONE, today, category), &conn).unwrap();
        }

        let categories = get_recent_categories(6, &conn).unwrap();

        assert_eq!(categories, vec!["Transport", "Food", "Rent"]);
    }

    #[test]
    fn recent_categories_respects_the_limit() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        for category in ["Food", "Rent", "Transport"] {
            create_transaction(new_transaction(Decimal::ONE, today, category), &conn).unwrap();
        }

        let categories = get_recent_categories(2, &conn).unwrap();

        assert_eq!(categories, vec!["Transport", "Rent"]);
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            new_transaction(Decimal::ONE, date!(2025 - 10 - 05), "Salary"),
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, &conn).unwrap();

        assert!(get_transactions(None, &conn).unwrap().is_empty());
    }

    #[test]
    fn delete_fails_on_missing_transaction() {
        let conn = get_test_connection();

        let result = delete_transaction(42, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn malformed_amount_surfaces_invalid_record() {
        let conn = get_test_connection();
        // Bypass create_transaction to simulate a database edited outside the
        // application.
        conn.execute(
            "INSERT INTO \"transaction\" (amount, date, category, description)
             VALUES ('not-a-number', '2025-10-05', 'Food', '')",
            (),
        )
        .unwrap();

        let result = get_transactions(None, &conn);

        assert!(
            matches!(result, Err(Error::InvalidRecord(_))),
            "want InvalidRecord error, got {result:?}"
        );
    }

    #[test]
    fn amounts_survive_the_round_trip_exactly() {
        let conn = get_test_connection();
        // A value that cannot be represented exactly as a binary float.
        create_transaction(
            new_transaction(Decimal::new(1010, 2), date!(2025 - 10 - 05), "Food"),
            &conn,
        )
        .unwrap();

        let transactions = get_transactions(None, &conn).unwrap();

        assert_eq!(transactions[0].amount, Decimal::new(-1010, 2));
    }
}
