//! SQLite-backed [`ScheduleStore`].

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, error, info};

use crate::calendar::is_weekend;
use crate::models::{Covenant, Frequency, ScheduleEntry, ScheduleStatus, Transaction};

use super::migrations::apply_migrations;
use super::{ScheduleStore, StoreError, StoreResult};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Schedule store over a single SQLite connection.
///
/// Every returned store has `foreign_keys=ON` and a fully migrated schema.
///
/// # Example
///
/// ```
/// use covenant_schedule::store::{ScheduleStore, SqliteScheduleStore};
///
/// let store = SqliteScheduleStore::open_in_memory()?;
/// assert!(store.get_schedules(None)?.is_empty());
/// # Ok::<(), covenant_schedule::store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct SqliteScheduleStore {
    conn: Connection,
}

impl SqliteScheduleStore {
    /// Opens (creating if needed) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let conn = Connection::open(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to open schedule database");
        })?;
        let store = Self::bootstrap(conn)?;
        info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Opened schedule database"
        );
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self::bootstrap(conn)?;
        debug!("Opened in-memory schedule database");
        Ok(store)
    }

    fn bootstrap(mut conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn save_transaction(&mut self, transaction: &Transaction) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        insert_transaction(&tx, transaction)?;
        tx.commit()?;
        info!(transaction_id = %transaction.transaction_id, "Saved transaction");
        Ok(())
    }

    fn save_covenants(&mut self, covenants: &[Covenant]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        insert_covenants(&tx, covenants)?;
        tx.commit()?;
        info!(count = covenants.len(), "Saved covenants");
        Ok(())
    }

    fn save_schedules(
        &mut self,
        entries: &[ScheduleEntry],
        holidays: Option<&BTreeSet<NaiveDate>>,
    ) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        insert_schedules(&tx, entries, holidays)?;
        tx.commit()?;
        info!(count = entries.len(), "Saved schedules");
        Ok(())
    }

    fn save_generated(
        &mut self,
        transaction: &Transaction,
        covenants: &[Covenant],
        entries: &[ScheduleEntry],
        holidays: Option<&BTreeSet<NaiveDate>>,
    ) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        insert_transaction(&tx, transaction)?;
        insert_covenants(&tx, covenants)?;
        insert_schedules(&tx, entries, holidays)?;
        tx.commit()?;
        info!(
            transaction_id = %transaction.transaction_id,
            covenant_count = covenants.len(),
            schedule_count = entries.len(),
            "Saved generated schedules"
        );
        Ok(())
    }

    fn get_schedules(&self, covenant_id: Option<&str>) -> StoreResult<Vec<ScheduleEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT schedule_id, covenant_id, due_date, status, period_start, period_end
             FROM schedules
             WHERE (?1 IS NULL OR covenant_id = ?1)
             ORDER BY rowid;",
        )?;
        let rows = stmt
            .query_map(params![covenant_id], ScheduleRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ScheduleRow::into_entry).collect()
    }

    fn get_transaction(&self, transaction_id: &str) -> StoreResult<Option<Transaction>> {
        let transaction = self
            .conn
            .query_row(
                "SELECT transaction_id, name, start_date, end_date
                 FROM transactions
                 WHERE transaction_id = ?1;",
                params![transaction_id],
                read_transaction,
            )
            .optional()?;
        Ok(transaction)
    }

    fn get_covenants(&self, transaction_id: Option<&str>) -> StoreResult<Vec<Covenant>> {
        let mut stmt = self.conn.prepare(
            "SELECT covenant_id, transaction_id, description, frequency, owner_email
             FROM covenants
             WHERE (?1 IS NULL OR transaction_id = ?1)
             ORDER BY rowid;",
        )?;
        let rows = stmt
            .query_map(params![transaction_id], CovenantRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(CovenantRow::into_covenant).collect()
    }

    fn update_schedule_status(
        &mut self,
        schedule_id: &str,
        status: ScheduleStatus,
    ) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE schedules
             SET status = ?1, updated_at = CURRENT_TIMESTAMP
             WHERE schedule_id = ?2;",
            params![status.as_str(), schedule_id],
        )?;
        if changed == 0 {
            return Err(StoreError::ScheduleNotFound {
                schedule_id: schedule_id.to_string(),
            });
        }
        info!(schedule_id = %schedule_id, status = %status, "Updated schedule status");
        Ok(())
    }

    fn delete_schedule(&mut self, schedule_id: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM schedules WHERE schedule_id = ?1;",
            params![schedule_id],
        )?;
        if changed == 0 {
            return Err(StoreError::ScheduleNotFound {
                schedule_id: schedule_id.to_string(),
            });
        }
        info!(schedule_id = %schedule_id, "Deleted schedule");
        Ok(())
    }
}

fn exists(conn: &Connection, sql: &str, id: &str) -> StoreResult<bool> {
    Ok(conn
        .query_row(sql, params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

fn insert_transaction(conn: &Connection, transaction: &Transaction) -> StoreResult<()> {
    transaction.validate()?;

    if exists(
        conn,
        "SELECT 1 FROM transactions WHERE transaction_id = ?1;",
        &transaction.transaction_id,
    )? {
        return Err(StoreError::DuplicateTransaction {
            transaction_id: transaction.transaction_id.clone(),
        });
    }

    conn.execute(
        "INSERT INTO transactions (transaction_id, name, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            transaction.transaction_id,
            transaction.name,
            transaction.start_date,
            transaction.end_date,
        ],
    )?;
    Ok(())
}

fn insert_covenants(conn: &Connection, covenants: &[Covenant]) -> StoreResult<()> {
    let mut batch_ids = HashSet::with_capacity(covenants.len());
    for covenant in covenants {
        covenant.validate()?;

        if !exists(
            conn,
            "SELECT 1 FROM transactions WHERE transaction_id = ?1;",
            &covenant.transaction_id,
        )? {
            return Err(StoreError::UnknownTransaction {
                covenant_id: covenant.covenant_id.clone(),
                transaction_id: covenant.transaction_id.clone(),
            });
        }
        if !batch_ids.insert(covenant.covenant_id.as_str())
            || exists(
                conn,
                "SELECT 1 FROM covenants WHERE covenant_id = ?1;",
                &covenant.covenant_id,
            )?
        {
            return Err(StoreError::DuplicateCovenant {
                covenant_id: covenant.covenant_id.clone(),
            });
        }
    }

    let mut stmt = conn.prepare(
        "INSERT INTO covenants (covenant_id, transaction_id, description, frequency, owner_email)
         VALUES (?1, ?2, ?3, ?4, ?5);",
    )?;
    for covenant in covenants {
        stmt.execute(params![
            covenant.covenant_id,
            covenant.transaction_id,
            covenant.description,
            covenant.frequency.as_str(),
            covenant.owner_email,
        ])?;
    }
    Ok(())
}

fn check_due_date(
    entry: &ScheduleEntry,
    holidays: Option<&BTreeSet<NaiveDate>>,
) -> StoreResult<()> {
    if holidays.is_some_and(|set| set.contains(&entry.due_date)) {
        return Err(StoreError::DueDateOnHoliday {
            schedule_id: entry.schedule_id.clone(),
            due_date: entry.due_date,
        });
    }
    if is_weekend(entry.due_date) {
        return Err(StoreError::DueDateOnWeekend {
            schedule_id: entry.schedule_id.clone(),
            due_date: entry.due_date,
        });
    }
    Ok(())
}

fn insert_schedules(
    conn: &Connection,
    entries: &[ScheduleEntry],
    holidays: Option<&BTreeSet<NaiveDate>>,
) -> StoreResult<()> {
    let mut batch_ids = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !batch_ids.insert(entry.schedule_id.as_str()) {
            return Err(StoreError::DuplicateScheduleInBatch {
                schedule_id: entry.schedule_id.clone(),
            });
        }
        if exists(
            conn,
            "SELECT 1 FROM schedules WHERE schedule_id = ?1;",
            &entry.schedule_id,
        )? {
            return Err(StoreError::DuplicateSchedule {
                schedule_id: entry.schedule_id.clone(),
            });
        }
        if !exists(
            conn,
            "SELECT 1 FROM covenants WHERE covenant_id = ?1;",
            &entry.covenant_id,
        )? {
            return Err(StoreError::UnknownCovenant {
                schedule_id: entry.schedule_id.clone(),
                covenant_id: entry.covenant_id.clone(),
            });
        }
        check_due_date(entry, holidays)?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO schedules (schedule_id, covenant_id, due_date, status, period_start, period_end)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;
    for entry in entries {
        stmt.execute(params![
            entry.schedule_id,
            entry.covenant_id,
            entry.due_date,
            entry.status.as_str(),
            entry.period_start,
            entry.period_end,
        ])?;
    }
    Ok(())
}

fn read_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        transaction_id: row.get(0)?,
        name: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
    })
}

struct ScheduleRow {
    schedule_id: String,
    covenant_id: String,
    due_date: NaiveDate,
    status: String,
    period_start: NaiveDate,
    period_end: NaiveDate,
}

impl ScheduleRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            schedule_id: row.get(0)?,
            covenant_id: row.get(1)?,
            due_date: row.get(2)?,
            status: row.get(3)?,
            period_start: row.get(4)?,
            period_end: row.get(5)?,
        })
    }

    fn into_entry(self) -> StoreResult<ScheduleEntry> {
        let status = self
            .status
            .parse::<ScheduleStatus>()
            .map_err(|e| StoreError::InvalidData(format!("{}: {}", self.schedule_id, e)))?;
        Ok(ScheduleEntry {
            schedule_id: self.schedule_id,
            covenant_id: self.covenant_id,
            due_date: self.due_date,
            status,
            period_start: self.period_start,
            period_end: self.period_end,
        })
    }
}

struct CovenantRow {
    covenant_id: String,
    transaction_id: String,
    description: String,
    frequency: String,
    owner_email: String,
}

impl CovenantRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            covenant_id: row.get(0)?,
            transaction_id: row.get(1)?,
            description: row.get(2)?,
            frequency: row.get(3)?,
            owner_email: row.get(4)?,
        })
    }

    fn into_covenant(self) -> StoreResult<Covenant> {
        let frequency = self
            .frequency
            .parse::<Frequency>()
            .map_err(|e| StoreError::InvalidData(format!("{}: {}", self.covenant_id, e)))?;
        Ok(Covenant {
            covenant_id: self.covenant_id,
            transaction_id: self.transaction_id,
            description: self.description,
            frequency,
            owner_email: self.owner_email,
        })
    }
}
