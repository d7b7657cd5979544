//! Creating the application's database schema.

use rusqlite::{Connection, Transaction};

use crate::entry::create_spread_table;

/// Create the application's database tables if they do not exist yet.
///
/// # Errors
/// Returns an error if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        Transaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_spread_table(&transaction)?;

    transaction.commit()
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_spread_table() {
        let connection = Connection::open_in_memory().expect("Could not open database");

        initialize(&connection).expect("Could not initialize database");

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'spread'",
                [],
                |row| row.get(0),
            )
            .expect("Could not query sqlite_master");

        assert_eq!(count, 1);
    }

    #[test]
    fn initialize_twice_is_a_no_op() {
        let connection = Connection::open_in_memory().expect("Could not open database");

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database a second time");
    }
}
