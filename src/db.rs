use std::path::Path;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::curriculum::DayPlan;
use crate::parser::roots::ParsedRoot;

pub fn connect(path: &str) -> Result<Connection> {
    if path != ":memory:" {
        if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS units (
            id          INTEGER PRIMARY KEY,
            unit_number INTEGER UNIQUE NOT NULL,
            title       TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS days (
            id          INTEGER PRIMARY KEY,
            day_number  INTEGER UNIQUE NOT NULL,
            unit_id     INTEGER NOT NULL REFERENCES units(id),
            topic       TEXT NOT NULL,
            imported_at TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_days_unit ON days(unit_id);

        CREATE TABLE IF NOT EXISTS hanja_roots (
            id              INTEGER PRIMARY KEY,
            day_id          INTEGER NOT NULL REFERENCES days(id) ON DELETE CASCADE,
            hanja_character TEXT NOT NULL,
            reading         TEXT NOT NULL,
            native_meaning  TEXT NOT NULL,
            meaning_en      TEXT NOT NULL DEFAULT '',
            meaning_ja      TEXT NOT NULL DEFAULT '',
            meaning_zh      TEXT NOT NULL DEFAULT '',
            meaning_vi      TEXT NOT NULL DEFAULT '',
            display_order   INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_roots_day ON hanja_roots(day_id, display_order);

        CREATE TABLE IF NOT EXISTS hanja_words (
            id             INTEGER PRIMARY KEY,
            root_id        INTEGER NOT NULL REFERENCES hanja_roots(id) ON DELETE CASCADE,
            word           TEXT NOT NULL,
            native_meaning TEXT,
            meaning_en     TEXT NOT NULL DEFAULT '',
            meaning_ja     TEXT NOT NULL DEFAULT '',
            meaning_zh     TEXT NOT NULL DEFAULT '',
            meaning_vi     TEXT NOT NULL DEFAULT '',
            display_order  INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_words_root ON hanja_words(root_id, display_order);
        ",
    )?;
    Ok(())
}

// ── Import ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveCounts {
    pub roots: usize,
    pub words: usize,
}

/// Replace everything stored for `plan.day_number` with `roots`.
///
/// Unit and day rows are looked up or created; roots and words are deleted
/// and re-inserted with `display_order` following slice order. Runs in one
/// transaction, so a failure leaves the previous import in place.
pub fn replace_day(conn: &Connection, plan: &DayPlan, roots: &[ParsedRoot]) -> Result<SaveCounts> {
    let tx = conn.unchecked_transaction()?;

    let unit_id = ensure_unit(&tx, plan.unit_number, &plan.unit_title)?;
    let day_id = ensure_day(&tx, plan.day_number, unit_id, &plan.topic)?;

    tx.execute(
        "DELETE FROM hanja_words
         WHERE root_id IN (SELECT id FROM hanja_roots WHERE day_id = ?1)",
        [day_id],
    )?;
    tx.execute("DELETE FROM hanja_roots WHERE day_id = ?1", [day_id])?;

    let mut counts = SaveCounts { roots: 0, words: 0 };
    {
        let mut root_stmt = tx.prepare(
            "INSERT INTO hanja_roots
             (day_id, hanja_character, reading, native_meaning,
              meaning_en, meaning_ja, meaning_zh, meaning_vi, display_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        let mut word_stmt = tx.prepare(
            "INSERT INTO hanja_words
             (root_id, word, native_meaning, meaning_en, meaning_ja, meaning_zh, meaning_vi, display_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        for (root_order, r) in roots.iter().enumerate() {
            let [en, ja, zh, vi] = &r.meanings;
            let root_id = root_stmt.insert(params![
                day_id, r.hanja, r.reading, r.meaning_ko, en, ja, zh, vi, root_order as i64,
            ])?;
            counts.roots += 1;

            for (word_order, w) in r.words.iter().enumerate() {
                word_stmt.execute(params![
                    root_id, w.word, w.native_meaning, w.meaning_en, w.meaning_ja,
                    w.meaning_zh, w.meaning_vi, word_order as i64,
                ])?;
                counts.words += 1;
            }
        }
    }

    tx.execute(
        "UPDATE days SET imported_at = ?1 WHERE id = ?2",
        params![chrono::Utc::now().to_rfc3339(), day_id],
    )?;
    tx.commit()?;
    Ok(counts)
}

fn ensure_unit(conn: &Connection, unit_number: u32, title: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO units (unit_number, title) VALUES (?1, ?2)",
        params![unit_number, title],
    )?;
    let id = conn.query_row(
        "SELECT id FROM units WHERE unit_number = ?1",
        [unit_number],
        |r| r.get(0),
    )?;
    Ok(id)
}

fn ensure_day(conn: &Connection, day_number: u32, unit_id: i64, topic: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO days (day_number, unit_id, topic) VALUES (?1, ?2, ?3)",
        params![day_number, unit_id, topic],
    )?;
    let id = conn.query_row(
        "SELECT id FROM days WHERE day_number = ?1",
        [day_number],
        |r| r.get(0),
    )?;
    Ok(id)
}

// ── Read back ──

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWord {
    pub word: String,
    pub native_meaning: Option<String>,
    pub meaning_en: String,
    pub meaning_ja: String,
    pub meaning_zh: String,
    pub meaning_vi: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRoot {
    #[serde(skip)]
    pub id: i64,
    pub hanja_character: String,
    pub reading: String,
    pub native_meaning: String,
    pub meaning_en: String,
    pub meaning_ja: String,
    pub meaning_zh: String,
    pub meaning_vi: String,
    pub display_order: i64,
    pub words: Vec<StoredWord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDay {
    pub day_number: u32,
    pub topic: String,
    pub unit_number: u32,
    pub unit_title: String,
    pub imported_at: Option<String>,
    pub roots: Vec<StoredRoot>,
}

/// Load a day with its roots and words in display order.
pub fn fetch_day(conn: &Connection, day_number: u32) -> Result<Option<StoredDay>> {
    let header = conn
        .query_row(
            "SELECT d.id, d.day_number, d.topic, u.unit_number, u.title, d.imported_at
             FROM days d JOIN units u ON u.id = d.unit_id
             WHERE d.day_number = ?1",
            [day_number],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    StoredDay {
                        day_number: row.get(1)?,
                        topic: row.get(2)?,
                        unit_number: row.get(3)?,
                        unit_title: row.get(4)?,
                        imported_at: row.get(5)?,
                        roots: Vec::new(),
                    },
                ))
            },
        )
        .optional()?;
    let Some((day_id, mut day)) = header else {
        return Ok(None);
    };

    let mut root_stmt = conn.prepare(
        "SELECT id, hanja_character, reading, native_meaning,
                meaning_en, meaning_ja, meaning_zh, meaning_vi, display_order
         FROM hanja_roots WHERE day_id = ?1 ORDER BY display_order",
    )?;
    day.roots = root_stmt
        .query_map([day_id], |row| {
            Ok(StoredRoot {
                id: row.get(0)?,
                hanja_character: row.get(1)?,
                reading: row.get(2)?,
                native_meaning: row.get(3)?,
                meaning_en: row.get(4)?,
                meaning_ja: row.get(5)?,
                meaning_zh: row.get(6)?,
                meaning_vi: row.get(7)?,
                display_order: row.get(8)?,
                words: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut word_stmt = conn.prepare(
        "SELECT word, native_meaning, meaning_en, meaning_ja, meaning_zh, meaning_vi, display_order
         FROM hanja_words WHERE root_id = ?1 ORDER BY display_order",
    )?;
    for root in &mut day.roots {
        root.words = word_stmt
            .query_map([root.id], |row| {
                Ok(StoredWord {
                    word: row.get(0)?,
                    native_meaning: row.get(1)?,
                    meaning_en: row.get(2)?,
                    meaning_ja: row.get(3)?,
                    meaning_zh: row.get(4)?,
                    meaning_vi: row.get(5)?,
                    display_order: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(Some(day))
}

// ── Stats ──

pub struct Stats {
    pub units: usize,
    pub days: usize,
    pub roots: usize,
    pub words: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |table: &str| -> Result<usize> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?)
    };
    Ok(Stats {
        units: count("units")?,
        days: count("days")?,
        roots: count("hanja_roots")?,
        words: count("hanja_words")?,
    })
}

// ── Tests ──
