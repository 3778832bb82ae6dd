use tracing::{debug, warn};

use super::lines::{Classified, Line, RootHeader, WordLine, GLOSS_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedWord {
    pub word: String,
    pub native_meaning: Option<String>,
    pub meaning_en: String,
    pub meaning_ja: String,
    pub meaning_zh: String,
    pub meaning_vi: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRoot {
    pub hanja: String,
    pub reading: String,
    pub meaning_ko: String,
    /// en, ja, zh, vi
    pub meanings: [String; GLOSS_COUNT],
    pub words: Vec<ParsedWord>,
}

impl ParsedRoot {
    fn open(header: RootHeader) -> Self {
        Self {
            hanja: header.hanja,
            reading: header.reading,
            meaning_ko: header.meaning,
            ..Default::default()
        }
    }
}

impl From<WordLine> for ParsedWord {
    fn from(line: WordLine) -> Self {
        let [en, ja, zh, vi] = line.glosses;
        Self {
            word: line.word,
            native_meaning: None,
            meaning_en: en,
            meaning_ja: ja,
            meaning_zh: zh,
            meaning_vi: vi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ScanningForRoot,
    CollectingMeanings { collected: usize },
    CollectingWords,
}

/// Folds classified lines into roots. Roots without words are dropped when
/// they are closed.
struct RootBuilder {
    state: State,
    open: Option<ParsedRoot>,
    done: Vec<ParsedRoot>,
}

impl RootBuilder {
    fn new() -> Self {
        Self {
            state: State::ScanningForRoot,
            open: None,
            done: Vec::new(),
        }
    }

    fn step(&mut self, item: Classified) {
        self.state = match (self.state, item.line) {
            (_, Line::RootHeader(header)) => {
                self.close();
                self.open = Some(ParsedRoot::open(header));
                State::CollectingMeanings { collected: 0 }
            }

            (State::ScanningForRoot, _) => State::ScanningForRoot,

            (_, Line::WordLine(word)) => {
                if let Some(root) = self.open.as_mut() {
                    root.words.push(word.into());
                }
                State::CollectingWords
            }

            (State::CollectingMeanings { collected }, Line::Unrecognized { text, is_heading })
                if !is_heading && !text.contains('/') =>
            {
                if let Some(root) = self.open.as_mut() {
                    root.meanings[collected] = text;
                }
                if collected + 1 == GLOSS_COUNT {
                    State::CollectingWords
                } else {
                    State::CollectingMeanings { collected: collected + 1 }
                }
            }

            (state, Line::MalformedWord { segments }) => {
                warn!(
                    line = item.line_no + 1,
                    segments, "Word line needs {} glosses, ignoring", GLOSS_COUNT
                );
                state
            }

            (state, _) => state,
        };
    }

    fn close(&mut self) {
        if let Some(root) = self.open.take() {
            if root.words.is_empty() {
                debug!(hanja = %root.hanja, "Dropping root without words");
            } else {
                self.done.push(root);
            }
        }
    }

    fn finish(mut self) -> Vec<ParsedRoot> {
        self.close();
        self.done
    }
}

/// Parse classified lines of one block into roots with their words, in
/// encounter order.
pub fn build_roots(lines: Vec<Classified>) -> Vec<ParsedRoot> {
    let mut builder = RootBuilder::new();
    for item in lines {
        builder.step(item);
    }
    builder.finish()
}

pub fn count_words(roots: &[ParsedRoot]) -> usize {
    roots.iter().map(|r| r.words.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::classify_block;

    fn parse(text: &str) -> Vec<ParsedRoot> {
        let lines: Vec<&str> = text.lines().collect();
        build_roots(classify_block(&lines, 0))
    }

    #[test]
    fn root_with_meanings_and_words() {
        let roots = parse(
            "### 그림 도圖\nmeaning-en\nmeaning-ja\nmeaning-zh\nmeaning-vi\n\
             도서관 library / 図書館 / 图书馆 / thư viện\n\
             지도 map / 地図 / 地图 / bản đồ",
        );
        assert_eq!(roots.len(), 1);
        let r = &roots[0];
        assert_eq!((r.hanja.as_str(), r.reading.as_str(), r.meaning_ko.as_str()), ("圖", "도", "그림"));
        assert_eq!(r.meanings, ["meaning-en", "meaning-ja", "meaning-zh", "meaning-vi"].map(String::from));
        let words: Vec<&str> = r.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["도서관", "지도"]);
        assert_eq!(r.words[1].meaning_vi, "bản đồ");
        assert!(r.words[0].native_meaning.is_none());
    }

    #[test]
    fn bold_exercise_heading_does_not_shift_meanings() {
        let roots = parse(
            "그림 도圖\n**연습**\npicture\n絵\n图\ntranh\n\
             도서관 library / 図書館 / 图书馆 / thư viện",
        );
        assert_eq!(roots[0].meanings, ["picture", "絵", "图", "tranh"].map(String::from));
        assert_eq!(roots[0].words.len(), 1);
    }

    #[test]
    fn spaced_word_hanja_stay_out_of_glosses() {
        let roots = parse("그림 도圖\n지도 地圖 map / 地図 / 地图 / bản đồ");
        assert_eq!(roots[0].words[0].word, "지도");
        assert_eq!(roots[0].words[0].meaning_en, "map");
    }

    #[test]
    fn word_stops_meaning_collection() {
        let roots = parse("그림 도圖\npicture\n도서관 library / 図書館 / 图书馆 / thư viện\nlate text");
        assert_eq!(roots[0].meanings[0], "picture");
        assert_eq!(roots[0].meanings[1], "");
        assert_eq!(roots[0].words.len(), 1);
    }

    #[test]
    fn meanings_skip_slash_and_heading_lines() {
        let roots = parse(
            "그림 도圖\n## 메모\nen / x\npicture\n絵\n图\ntranh\n\
             도서관 library / 図書館 / 图书馆 / thư viện",
        );
        assert_eq!(roots[0].meanings, ["picture", "絵", "图", "tranh"].map(String::from));
    }

    #[test]
    fn empty_root_is_dropped() {
        let roots = parse(
            "그림 도圖\n\
             글 서書\n\
             서점 bookstore / 書店 / 书店 / nhà sách",
        );
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].hanja, "書");
    }

    #[test]
    fn trailing_empty_root_is_dropped() {
        let roots = parse("글 서書\n서점 bookstore / 書店 / 书店 / nhà sách\n그림 도圖\npicture");
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn malformed_word_keeps_other_words() {
        let roots = parse(
            "그림 도圖\n\
             도서관 library / 図書館 / 图书馆 / thư viện\n\
             도면 drawing / 図面 / 图纸\n\
             지도 map / 地図 / 地图 / bản đồ",
        );
        let words: Vec<&str> = roots[0].words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["도서관", "지도"]);
    }

    #[test]
    fn words_before_any_root_are_ignored() {
        let roots = parse("도서관 library / 図書館 / 图书馆 / thư viện");
        assert!(roots.is_empty());
    }

    #[test]
    fn skipped_lines_do_not_disturb_state() {
        let roots = parse(
            "그림 도圖\n![img](a.png)\n1) 보기\n| a | b |\n예) 도서관에 갔다.\n\
             도서관 library / 図書館 / 图书馆 / thư viện",
        );
        assert_eq!(roots[0].words.len(), 1);
        assert_eq!(roots[0].meanings[0], "");
    }

    #[test]
    fn two_line_headers_in_antonym_section() {
        let roots = parse(
            "길다\n**장長**\nlong\n長い\n长\ndài\n\
             장점 strength / 長所 / 长处 / điểm mạnh\n\
             짧다\n**단短**\n\
             단점 weakness / 短所 / 短处 / điểm yếu\n\
             단기 short term / 短期 / 短期 / ngắn hạn",
        );
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].meaning_ko, "길다");
        assert_eq!(roots[0].meanings[0], "long");
        assert_eq!(roots[1].hanja, "短");
        assert_eq!(count_words(&roots), 3);
    }
}
