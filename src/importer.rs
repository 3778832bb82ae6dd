use rayon::prelude::*;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{info, warn};

use crate::curriculum::Curriculum;
use crate::db;
use crate::parser::{self, sections::LocatedDay};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Day {0} is not part of the curriculum")]
    UnknownDay(u32),

    #[error("No hanja content found for Day {day}")]
    NotFound { day: u32, lines_scanned: usize },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub day_number: u32,
    pub roots_count: usize,
    pub words_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub imported: Vec<ImportSummary>,
    /// Curriculum days with no content in the document.
    pub missing: Vec<u32>,
}

impl BatchSummary {
    pub fn roots_count(&self) -> usize {
        self.imported.iter().map(|s| s.roots_count).sum()
    }

    pub fn words_count(&self) -> usize {
        self.imported.iter().map(|s| s.words_count).sum()
    }
}

/// Locate and parse `day` in `markdown` without touching storage.
pub fn parse_day(
    curriculum: &Curriculum,
    markdown: &str,
    day: u32,
) -> Result<LocatedDay, ImportError> {
    if curriculum.plan(day).is_none() {
        return Err(ImportError::UnknownDay(day));
    }
    let lines: Vec<&str> = markdown.lines().collect();
    parser::locate_day(&lines, day, curriculum.topic(day)).ok_or(ImportError::NotFound {
        day,
        lines_scanned: lines.len(),
    })
}

/// Persist an already located day, replacing what was stored before.
pub fn store_day(
    conn: &Connection,
    curriculum: &Curriculum,
    day: u32,
    located: &LocatedDay,
) -> Result<ImportSummary, ImportError> {
    let plan = curriculum.plan(day).ok_or(ImportError::UnknownDay(day))?;
    let counts = db::replace_day(conn, &plan, &located.roots)?;
    info!(
        day,
        roots = counts.roots,
        words = counts.words,
        lines = ?located.lines,
        strategy = ?located.strategy,
        "Imported day"
    );
    Ok(ImportSummary {
        day_number: day,
        roots_count: counts.roots,
        words_count: counts.words,
    })
}

pub fn import_day(
    conn: &Connection,
    curriculum: &Curriculum,
    markdown: &str,
    day: u32,
) -> Result<ImportSummary, ImportError> {
    let located = parse_day(curriculum, markdown, day)?;
    store_day(conn, curriculum, day, &located)
}

/// Parse every curriculum day in parallel, then save the found ones in day
/// order, each in its own transaction. `on_parsed` runs on the worker
/// threads once per parsed day.
pub fn import_all<F>(
    conn: &Connection,
    curriculum: &Curriculum,
    markdown: &str,
    on_parsed: F,
) -> Result<BatchSummary, ImportError>
where
    F: Fn() + Sync,
{
    let days: Vec<u32> = curriculum.day_numbers().collect();
    let parsed: Vec<_> = days
        .par_iter()
        .map(|&day| {
            let result = parse_day(curriculum, markdown, day);
            on_parsed();
            (day, result)
        })
        .collect();

    let mut batch = BatchSummary::default();
    for (day, result) in parsed {
        match result {
            Ok(located) => batch.imported.push(store_day(conn, curriculum, day, &located)?),
            Err(ImportError::NotFound { .. }) => batch.missing.push(day),
            Err(e) => return Err(e),
        }
    }

    if !batch.missing.is_empty() {
        warn!(missing = ?batch.missing, "No content found for some days");
    }
    Ok(batch)
}

// ── Tests ──
