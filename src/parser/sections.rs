use std::ops::Range;

use tracing::debug;

use super::lines::{classify_block, day_heading, is_unit_heading, strip_markup};
use super::roots::{build_roots, count_words, ParsedRoot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DayHeading,
    TopicLine,
}

/// A block of the document that parsed into real content.
#[derive(Debug, Clone)]
pub struct LocatedDay {
    pub roots: Vec<ParsedRoot>,
    /// Line range of the block body, heading excluded.
    pub lines: Range<usize>,
    pub strategy: Strategy,
}

/// Find the block for `day` and parse it. Candidates are tried in document
/// order and the first one yielding at least one root wins. Falls back to a
/// standalone `topic` line when no `Day N` heading works.
pub fn locate_day(lines: &[&str], day: u32, topic: Option<&str>) -> Option<LocatedDay> {
    let heading_candidates = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| day_heading(l) == Some(day))
        .map(|(i, _)| i);

    if let Some(found) = first_parsing(lines, day, heading_candidates, Strategy::DayHeading) {
        return Some(found);
    }

    let topic = topic?.trim();
    if topic.is_empty() {
        return None;
    }
    let topic_candidates = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| strip_markup(l) == topic)
        .map(|(i, _)| i);

    first_parsing(lines, day, topic_candidates, Strategy::TopicLine)
}

fn first_parsing(
    lines: &[&str],
    day: u32,
    candidates: impl Iterator<Item = usize>,
    strategy: Strategy,
) -> Option<LocatedDay> {
    for start in candidates {
        let range = block_range(lines, start, day);
        let classified = classify_block(&lines[range.clone()], range.start);
        let roots = build_roots(classified);
        if roots.is_empty() {
            debug!(day, line = start + 1, ?strategy, "Candidate has no roots, skipping");
            continue;
        }
        debug!(
            day,
            line = start + 1,
            ?strategy,
            roots = roots.len(),
            words = count_words(&roots),
            "Accepted candidate"
        );
        return Some(LocatedDay {
            roots,
            lines: range,
            strategy,
        });
    }
    None
}

/// Body of the block opened at `start`: up to the next heading for another
/// day or the next unit heading.
pub fn block_range(lines: &[&str], start: usize, day: u32) -> Range<usize> {
    let body = start + 1;
    let end = lines[body.min(lines.len())..]
        .iter()
        .position(|l| is_unit_heading(l) || day_heading(l).is_some_and(|d| d != day))
        .map(|offset| body + offset)
        .unwrap_or(lines.len());
    body.min(end)..end
}

// ── Tests ──
