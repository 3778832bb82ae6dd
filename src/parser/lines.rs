use std::sync::LazyLock;

use regex::Regex;

static DAY_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:#{1,6}\s*)?(?:\*\*)?\s*day\s*0*(\d{1,3})(?:\D|$)").unwrap()
});
static UNIT_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s*\d{1,2}\.?\s*$").unwrap());
static HEADING_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s*").unwrap());
static LIST_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+").unwrap());
static ANSWER_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\(?\d{1,2}\)|[\x{2460}-\x{2473}])").unwrap());
static EXERCISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:연습|확인\s*문제|문제|복습|exercise|quiz|review|practice)").unwrap()
});
static ROOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([가-힣][가-힣\s,()~]*?)\s+([가-힣]{1,2})\s*(\p{Han}(?:\s*[·・]?\s*\p{Han})*)$")
        .unwrap()
});
static MEANING_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[가-힣][가-힣\s,()~]{0,19}$").unwrap());
static READING_HANJA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([가-힣]{1,2})\s*(\p{Han}(?:\s*[·・]?\s*\p{Han})*)$").unwrap()
});
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([가-힣\p{Han}]+)(?:\s*[(\[]\p{Han}+[)\]]|\s+\p{Han}+)?\s+(.+)$").unwrap()
});

const EXAMPLE_MARKERS: &[&str] = &["예)", "예:", "<보기>", "보기"];

/// Number of target-language glosses on a word line and meanings under a root.
pub const GLOSS_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHeader {
    pub meaning: String,
    pub reading: String,
    pub hanja: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLine {
    pub word: String,
    pub glosses: [String; GLOSS_COUNT],
}

/// One classified source line. Skip covers blanks, images, tables, answer
/// markers, exercise headings, example markers and day/unit headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Skip,
    RootHeader(RootHeader),
    WordLine(WordLine),
    MalformedWord { segments: usize },
    Unrecognized { text: String, is_heading: bool },
}

#[derive(Debug, Clone)]
pub struct Classified {
    /// Zero-based line number within the whole document.
    pub line_no: usize,
    pub line: Line,
}

/// Day number of a `Day N` heading, if the line is one.
pub fn day_heading(line: &str) -> Option<u32> {
    DAY_HEADING_RE
        .captures(line.trim())
        .and_then(|c| c[1].parse().ok())
}

pub fn is_unit_heading(line: &str) -> bool {
    UNIT_HEADING_RE.is_match(line.trim())
}

/// Drop heading markers, list bullets and bold/underline emphasis.
pub fn strip_markup(line: &str) -> String {
    let t = HEADING_PREFIX_RE.replace(line.trim(), "");
    let t = LIST_PREFIX_RE.replace(&t, "");
    t.replace("**", "").replace("__", "").trim().to_string()
}

/// Classify the lines of one block. `first_line_no` is the document line
/// number of `lines[0]`. A two-line root header yields a single entry.
pub fn classify_block(lines: &[&str], first_line_no: usize) -> Vec<Classified> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line_no = first_line_no + i;
        let raw = lines[i].trim();

        if is_skipped(raw) {
            out.push(Classified { line_no, line: Line::Skip });
            i += 1;
            continue;
        }

        let text = strip_markup(raw);

        // ── Root header on one line: 그림 도圖 ──
        if let Some(header) = single_line_root(&text) {
            out.push(Classified { line_no, line: Line::RootHeader(header) });
            i += 1;
            continue;
        }

        // ── Root header split across two lines: 길다 / **장長** ──
        if let Some(next) = lines.get(i + 1) {
            if let Some(header) = two_line_root(&text, next) {
                out.push(Classified { line_no, line: Line::RootHeader(header) });
                i += 2;
                continue;
            }
        }

        // ── Word line: 도서관 library / 図書館 / 图书馆 / thư viện ──
        if let Some(line) = word_line(&text) {
            out.push(Classified { line_no, line });
            i += 1;
            continue;
        }

        out.push(Classified {
            line_no,
            line: Line::Unrecognized {
                text,
                is_heading: raw.starts_with('#'),
            },
        });
        i += 1;
    }

    out
}

fn is_skipped(raw: &str) -> bool {
    if raw.is_empty()
        || raw.starts_with("![")
        || raw.starts_with("[![")
        || raw.starts_with('|')
        || ANSWER_MARKER_RE.is_match(raw)
        || day_heading(raw).is_some()
        || is_unit_heading(raw)
    {
        return true;
    }

    let text = strip_markup(raw);
    if is_sub_heading(raw) && EXERCISE_RE.is_match(&text) {
        return true;
    }
    EXAMPLE_MARKERS
        .iter()
        .any(|m| text == *m || (m.ends_with(')') || m.ends_with(':')) && text.starts_with(m))
}

/// A `#` heading or a line that is bold from end to end.
fn is_sub_heading(raw: &str) -> bool {
    raw.starts_with('#') || (raw.len() > 4 && raw.starts_with("**") && raw.ends_with("**"))
}

fn single_line_root(text: &str) -> Option<RootHeader> {
    if text.contains('/') {
        return None;
    }
    let caps = ROOT_RE.captures(text)?;
    Some(RootHeader {
        meaning: caps[1].trim().to_string(),
        reading: caps[2].to_string(),
        hanja: first_hanja(&caps[3])?,
    })
}

fn two_line_root(text: &str, next: &str) -> Option<RootHeader> {
    if !MEANING_ONLY_RE.is_match(text) {
        return None;
    }
    let next = next.trim();
    if next.is_empty() || is_skipped(next) {
        return None;
    }
    let next = strip_markup(next);
    let caps = READING_HANJA_RE.captures(&next)?;
    Some(RootHeader {
        meaning: text.trim().to_string(),
        reading: caps[1].to_string(),
        hanja: first_hanja(&caps[2])?,
    })
}

fn word_line(text: &str) -> Option<Line> {
    if !text.contains('/') {
        return None;
    }
    let caps = WORD_RE.captures(text)?;
    let word: String = caps[1].chars().filter(|c| is_hangul(*c)).collect();
    if word.is_empty() {
        return None;
    }

    let segments: Vec<&str> = caps[2].split('/').map(str::trim).collect();
    if segments.len() != GLOSS_COUNT || segments.iter().any(|s| s.is_empty()) {
        return Some(Line::MalformedWord { segments: segments.len() });
    }

    let glosses = [
        segments[0].to_string(),
        segments[1].to_string(),
        segments[2].to_string(),
        segments[3].to_string(),
    ];
    Some(Line::WordLine(WordLine { word, glosses }))
}

fn first_hanja(group: &str) -> Option<String> {
    group.chars().find(|c| is_han(*c)).map(String::from)
}

fn is_hangul(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

fn is_han(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}
