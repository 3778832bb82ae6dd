//! Static curriculum tables: day → (unit, topic) and unit → title.
//!
//! The tables are plain data. [`Curriculum::load`] turns them into lookup
//! maps and refuses to start when a day in `1..=LAST_DAY` is missing,
//! duplicated, or points at a unit without a title.

use std::collections::BTreeMap;

use anyhow::{bail, Result};

pub const LAST_DAY: u32 = 82;

const UNITS: &[(u32, &str)] = &[
    (1, "Arts and Culture"),
    (2, "Nature and Environment"),
    (3, "Society and Community"),
    (4, "Economy and Work"),
    (5, "Science and Technology"),
    (6, "Health and Body"),
    (7, "Education and Learning"),
    (8, "Politics and Law"),
    (9, "History and Tradition"),
    (10, "Daily Life"),
    (11, "Emotions and Relationships"),
    (12, "Antonym Pairs"),
];

// (day, unit, topic)
const DAYS: &[(u32, u32, &str)] = &[
    (1, 1, "예술과 문화"),
    (2, 1, "음악과 공연"),
    (3, 1, "미술과 전시"),
    (4, 1, "문학과 출판"),
    (5, 1, "영화와 방송"),
    (6, 1, "전통 예술"),
    (7, 1, "축제와 행사"),
    (8, 2, "날씨와 기후"),
    (9, 2, "산과 바다"),
    (10, 2, "동물과 식물"),
    (11, 2, "환경 보호"),
    (12, 2, "자원과 에너지"),
    (13, 2, "자연재해"),
    (14, 2, "계절과 시간"),
    (15, 3, "가족과 이웃"),
    (16, 3, "사회 문제"),
    (17, 3, "도시와 농촌"),
    (18, 3, "교통과 통신"),
    (19, 3, "복지와 봉사"),
    (20, 3, "인구와 세대"),
    (21, 3, "대중 매체"),
    (22, 4, "경제 활동"),
    (23, 4, "직업과 직장"),
    (24, 4, "금융과 투자"),
    (25, 4, "무역과 산업"),
    (26, 4, "소비와 생산"),
    (27, 4, "회사 생활"),
    (28, 4, "창업과 경영"),
    (29, 5, "과학 연구"),
    (30, 5, "정보 기술"),
    (31, 5, "우주와 천체"),
    (32, 5, "발명과 발견"),
    (33, 5, "의학의 발전"),
    (34, 5, "기계와 장치"),
    (35, 5, "실험과 관찰"),
    (36, 6, "몸과 건강"),
    (37, 6, "질병과 치료"),
    (38, 6, "음식과 영양"),
    (39, 6, "운동과 스포츠"),
    (40, 6, "마음 건강"),
    (41, 6, "병원 이용"),
    (42, 6, "생활 습관"),
    (43, 7, "학교 생활"),
    (44, 7, "시험과 평가"),
    (45, 7, "언어 학습"),
    (46, 7, "독서와 토론"),
    (47, 7, "대학과 전공"),
    (48, 7, "평생 교육"),
    (49, 7, "지식과 지혜"),
    (50, 8, "정치와 선거"),
    (51, 8, "법과 질서"),
    (52, 8, "국가와 정부"),
    (53, 8, "권리와 의무"),
    (54, 8, "국제 관계"),
    (55, 8, "범죄와 처벌"),
    (56, 8, "평화와 전쟁"),
    (57, 9, "역사 이야기"),
    (58, 9, "왕조와 인물"),
    (59, 9, "전통 명절"),
    (60, 9, "문화유산"),
    (61, 9, "예절과 풍습"),
    (62, 9, "종교와 사상"),
    (63, 9, "옛날 생활"),
    (64, 10, "집과 주거"),
    (65, 10, "쇼핑과 물건"),
    (66, 10, "여행과 관광"),
    (67, 10, "취미와 여가"),
    (68, 10, "요리와 식사"),
    (69, 10, "옷과 패션"),
    (70, 10, "하루 일과"),
    (71, 11, "기쁨과 슬픔"),
    (72, 11, "사랑과 우정"),
    (73, 11, "갈등과 화해"),
    (74, 11, "성격과 태도"),
    (75, 11, "감사와 존경"),
    (76, 11, "희망과 꿈"),
    (77, 11, "말과 대화"),
    (78, 12, "크기와 길이"),
    (79, 12, "많고 적음"),
    (80, 12, "높고 낮음"),
    (81, 12, "시작과 끝"),
    (82, 12, "있음과 없음"),
];

/// Where a day sits in the curriculum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub day_number: u32,
    pub unit_number: u32,
    pub unit_title: String,
    pub topic: String,
}

#[derive(Debug, Clone)]
pub struct Curriculum {
    units: BTreeMap<u32, String>,
    days: BTreeMap<u32, (u32, String)>,
}

impl Curriculum {
    /// Build the built-in curriculum, checking that it covers every day.
    pub fn load() -> Result<Self> {
        Self::from_tables(UNITS, DAYS, LAST_DAY)
    }

    fn from_tables(
        units: &[(u32, &str)],
        days: &[(u32, u32, &str)],
        last_day: u32,
    ) -> Result<Self> {
        let mut unit_map = BTreeMap::new();
        for &(number, title) in units {
            if unit_map.insert(number, title.to_string()).is_some() {
                bail!("unit {} is listed twice", number);
            }
        }

        let mut day_map = BTreeMap::new();
        for &(day, unit, topic) in days {
            if !unit_map.contains_key(&unit) {
                bail!("day {} refers to unit {} which has no title", day, unit);
            }
            if topic.trim().is_empty() {
                bail!("day {} has an empty topic", day);
            }
            if day_map.insert(day, (unit, topic.to_string())).is_some() {
                bail!("day {} is listed twice", day);
            }
        }

        let missing: Vec<u32> = (1..=last_day).filter(|d| !day_map.contains_key(d)).collect();
        if !missing.is_empty() {
            bail!("curriculum is missing days {:?}", missing);
        }
        if let Some(extra) = day_map.keys().find(|&&d| d == 0 || d > last_day) {
            bail!("day {} is outside 1..={}", extra, last_day);
        }

        Ok(Self {
            units: unit_map,
            days: day_map,
        })
    }

    pub fn plan(&self, day_number: u32) -> Option<DayPlan> {
        let (unit_number, topic) = self.days.get(&day_number)?;
        let unit_title = self.units.get(unit_number)?;
        Some(DayPlan {
            day_number,
            unit_number: *unit_number,
            unit_title: unit_title.clone(),
            topic: topic.clone(),
        })
    }

    pub fn topic(&self, day_number: u32) -> Option<&str> {
        self.days.get(&day_number).map(|(_, t)| t.as_str())
    }

    pub fn day_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_complete() {
        let c = Curriculum::load().unwrap();
        assert_eq!(c.day_numbers().count(), LAST_DAY as usize);
        assert_eq!(c.day_numbers().next(), Some(1));
        assert_eq!(c.day_numbers().last(), Some(LAST_DAY));
    }

    #[test]
    fn day_one_plan() {
        let c = Curriculum::load().unwrap();
        let p = c.plan(1).unwrap();
        assert_eq!(p.unit_number, 1);
        assert_eq!(p.unit_title, "Arts and Culture");
        assert_eq!(p.topic, "예술과 문화");
    }

    #[test]
    fn unknown_day_has_no_plan() {
        let c = Curriculum::load().unwrap();
        assert!(c.plan(0).is_none());
        assert!(c.plan(LAST_DAY + 1).is_none());
        assert!(c.topic(999).is_none());
    }

    #[test]
    fn rejects_gap() {
        let days = [(1, 1, "a"), (3, 1, "c")];
        let err = Curriculum::from_tables(&[(1, "U")], &days, 3).unwrap_err();
        assert!(err.to_string().contains("missing days [2]"));
    }

    #[test]
    fn rejects_untitled_unit() {
        let days = [(1, 2, "a")];
        assert!(Curriculum::from_tables(&[(1, "U")], &days, 1).is_err());
    }

    #[test]
    fn rejects_duplicate_day() {
        let days = [(1, 1, "a"), (1, 1, "b")];
        assert!(Curriculum::from_tables(&[(1, "U")], &days, 1).is_err());
    }
}
