//! Defines the spread entry model and its database queries.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    spread::{self, round2, round4},
    Error,
};

// ============================================================================
// MODELS
// ============================================================================

/// The ID of a row in the spread table.
pub type EntryId = i64;

/// The mutable attributes of a spread entry, without the row ID.
///
/// Every field is optional: the sanitizer maps cells it cannot parse to
/// `None` and the database stores them as NULL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryFields {
    /// The external transaction reference.
    pub ref_kpm: Option<String>,
    /// The transaction date.
    pub data: Option<Date>,
    /// The agent the transaction was made through.
    pub agente: Option<String>,
    /// The transaction currency.
    pub moeda: Option<String>,
    /// The signed transaction amount.
    pub valor: Option<f64>,
    /// The absolute transaction amount.
    pub abs_valor: Option<f64>,
    /// The converted amount.
    pub conversao: Option<f64>,
    /// The rate charged to the client.
    pub taxa_rec_cliente: Option<f64>,
    /// The rate paid to the bank.
    pub taxa_pgto_banco: Option<f64>,
    /// The spread between the two rates.
    pub fator_conversao: Option<f64>,
    /// The gain made on the spread.
    pub ganho: Option<f64>,
}

impl EntryFields {
    /// Recompute the four derived fields from `valor` and the two rates.
    ///
    /// Does nothing when any of the three inputs is missing, leaving the
    /// derived fields as they were.
    pub fn recalculate(&mut self) {
        if let (Some(valor), Some(taxa_rec), Some(taxa_banco)) =
            (self.valor, self.taxa_rec_cliente, self.taxa_pgto_banco)
        {
            let derived = spread::calculate(valor, taxa_rec, taxa_banco);
            self.abs_valor = Some(derived.abs_valor);
            self.conversao = Some(derived.conversao);
            self.fator_conversao = Some(derived.fator_conversao);
            self.ganho = Some(derived.ganho);
        }
    }

    /// A copy with amounts rounded to 2 decimal places and rates to 4.
    fn rounded_for_storage(&self) -> Self {
        Self {
            ref_kpm: self.ref_kpm.clone(),
            data: self.data,
            agente: self.agente.clone(),
            moeda: self.moeda.clone(),
            valor: self.valor.map(round2),
            abs_valor: self.abs_valor.map(round2),
            conversao: self.conversao.map(round2),
            taxa_rec_cliente: self.taxa_rec_cliente.map(round4),
            taxa_pgto_banco: self.taxa_pgto_banco.map(round4),
            fator_conversao: self.fator_conversao.map(round4),
            ganho: self.ganho.map(round2),
        }
    }
}

/// A row of the spread table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadEntry {
    /// The ID of the entry.
    pub id: EntryId,
    /// The entry's mutable attributes.
    pub fields: EntryFields,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the spread table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_spread_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS spread (
                id INTEGER PRIMARY KEY,
                ref_kpm TEXT,
                data TEXT,
                agente TEXT,
                moeda TEXT,
                valor REAL,
                abs_valor REAL,
                conversao REAL,
                taxa_rec_cliente REAL,
                taxa_pgto_banco REAL,
                fator_conversao REAL,
                ganho REAL
                )",
        (),
    )?;

    Ok(())
}

const ALL_COLUMNS: &str = "id, ref_kpm, data, agente, moeda, valor, abs_valor, conversao, \
    taxa_rec_cliente, taxa_pgto_banco, fator_conversao, ganho";

/// Insert a new entry and let the database assign its ID.
///
/// Amounts are rounded to 2 decimal places and rates to 4 before storage.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn insert_entry(fields: &EntryFields, connection: &Connection) -> Result<SpreadEntry, Error> {
    let fields = fields.rounded_for_storage();

    let entry = connection
        .prepare(&format!(
            "INSERT INTO spread (ref_kpm, data, agente, moeda, valor, abs_valor, conversao, \
             taxa_rec_cliente, taxa_pgto_banco, fator_conversao, ganho)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING {ALL_COLUMNS}"
        ))?
        .query_row(
            (
                &fields.ref_kpm,
                &fields.data,
                &fields.agente,
                &fields.moeda,
                fields.valor,
                fields.abs_valor,
                fields.conversao,
                fields.taxa_rec_cliente,
                fields.taxa_pgto_banco,
                fields.fator_conversao,
                fields.ganho,
            ),
            map_spread_row,
        )?;

    Ok(entry)
}

/// Insert a new entry with a caller-assigned ID.
///
/// Used by the upload save flow, which assigns contiguous IDs itself.
///
/// # Errors
/// This function will return a [Error::SqlError] if the ID is already taken
/// or there is some other SQL error.
pub fn insert_entry_with_id(
    id: EntryId,
    fields: &EntryFields,
    connection: &Connection,
) -> Result<SpreadEntry, Error> {
    let fields = fields.rounded_for_storage();

    connection.execute(
        "INSERT INTO spread (id, ref_kpm, data, agente, moeda, valor, abs_valor, conversao, \
         taxa_rec_cliente, taxa_pgto_banco, fator_conversao, ganho)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        (
            id,
            &fields.ref_kpm,
            &fields.data,
            &fields.agente,
            &fields.moeda,
            fields.valor,
            fields.abs_valor,
            fields.conversao,
            fields.taxa_rec_cliente,
            fields.taxa_pgto_banco,
            fields.fator_conversao,
            fields.ganho,
        ),
    )?;

    Ok(SpreadEntry { id, fields })
}

/// Retrieve an entry from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_entry(id: EntryId, connection: &Connection) -> Result<SpreadEntry, Error> {
    let entry = connection
        .prepare(&format!("SELECT {ALL_COLUMNS} FROM spread WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_spread_row)?;

    Ok(entry)
}

/// Overwrite all mutable attributes of the entry `id`.
///
/// Amounts and rates get the same storage rounding as inserts.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingEntry] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_entry(
    id: EntryId,
    fields: &EntryFields,
    connection: &Connection,
) -> Result<(), Error> {
    let fields = fields.rounded_for_storage();

    let rows_affected = connection.execute(
        "UPDATE spread SET ref_kpm = ?1, data = ?2, agente = ?3, moeda = ?4, valor = ?5, \
         abs_valor = ?6, conversao = ?7, taxa_rec_cliente = ?8, taxa_pgto_banco = ?9, \
         fator_conversao = ?10, ganho = ?11 WHERE id = ?12",
        (
            &fields.ref_kpm,
            &fields.data,
            &fields.agente,
            &fields.moeda,
            fields.valor,
            fields.abs_valor,
            fields.conversao,
            fields.taxa_rec_cliente,
            fields.taxa_pgto_banco,
            fields.fator_conversao,
            fields.ganho,
            id,
        ),
    )?;

    if rows_affected == 0 {
        Err(Error::UpdateMissingEntry)
    } else {
        Ok(())
    }
}

/// Delete the entry `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingEntry] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_entry(id: EntryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM spread WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingEntry)
    } else {
        Ok(())
    }
}

/// Retrieve all entries, ordered by ID.
///
/// `filter`, when given, keeps only entries whose `ref_kpm`, `agente` or
/// `moeda` contains the string (case-insensitive, per SQLite LIKE).
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn all_entries(filter: Option<&str>, connection: &Connection) -> Result<Vec<SpreadEntry>, Error> {
    match filter {
        Some(filter) if !filter.is_empty() => {
            let pattern = format!("%{filter}%");

            connection
                .prepare(&format!(
                    "SELECT {ALL_COLUMNS} FROM spread
                     WHERE ref_kpm LIKE :pattern OR agente LIKE :pattern OR moeda LIKE :pattern
                     ORDER BY id"
                ))?
                .query_map(&[(":pattern", &pattern)], map_spread_row)?
                .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
                .collect()
        }
        _ => connection
            .prepare(&format!("SELECT {ALL_COLUMNS} FROM spread ORDER BY id"))?
            .query_map([], map_spread_row)?
            .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
            .collect(),
    }
}

/// Get the largest entry ID in the database, or zero when the table is empty.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn max_entry_id(connection: &Connection) -> Result<EntryId, Error> {
    connection
        .query_row("SELECT COALESCE(MAX(id), 0) FROM spread", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a SpreadEntry.
fn map_spread_row(row: &Row) -> Result<SpreadEntry, rusqlite::Error> {
    Ok(SpreadEntry {
        id: row.get(0)?,
        fields: EntryFields {
            ref_kpm: row.get(1)?,
            data: row.get(2)?,
            agente: row.get(3)?,
            moeda: row.get(4)?,
            valor: row.get(5)?,
            abs_valor: row.get(6)?,
            conversao: row.get(7)?,
            taxa_rec_cliente: row.get(8)?,
            taxa_pgto_banco: row.get(9)?,
            fator_conversao: row.get(10)?,
            ganho: row.get(11)?,
        },
    })
}

// ============================================================================
// TESTS
// ============================================================================
