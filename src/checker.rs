//! Fast local spelling check for Korean text.
//!
//! Runs before any LLM call. Only patterns that are unambiguously wrong are
//! listed here, so a hit lets the grading endpoint skip the API entirely.

/// Known-wrong spelling patterns: (wrong, corrected, message).
///
/// The corrected form is kept alongside the message so the table stays
/// reviewable on its own.
const SPELLING_PATTERNS: &[(&str, &str, &str)] = &[
    // 모음 오류
    ("메운맛", "매운맛", "\"메운맛\" → \"매운맛\" (모음 오류)"),
    ("오새요", "오세요", "\"오새요\" → \"오세요\" (모음 오류)"),
    ("계새요", "계세요", "\"계새요\" → \"계세요\" (모음 오류)"),
    ("되요", "돼요", "\"되요\" → \"돼요\" (맞춤법 오류)"),
    // 자음 오류
    ("어떻해", "어떻게", "\"어떻해\" → \"어떻게\" (자음 오류)"),
    ("다체로운", "다채로운", "\"다체로운\" → \"다채로운\" (자음 누락)"),
    ("다체롭게", "다채롭게", "\"다체롭게\" → \"다채롭게\" (자음 누락)"),
    // 띄어쓰기
    ("궁금한점이", "궁금한 점이", "\"궁금한점이\" → \"궁금한 점이\" (띄어쓰기)"),
    ("할수있다", "할 수 있다", "\"할수있다\" → \"할 수 있다\" (띄어쓰기)"),
    (
        "할수있습니다",
        "할 수 있습니다",
        "\"할수있습니다\" → \"할 수 있습니다\" (띄어쓰기)",
    ),
    // 기타 오타
    ("잇습니다", "있습니다", "\"잇습니다\" → \"있습니다\" (오타)"),
    ("읍니다", "습니다", "\"읍니다\" → \"습니다\" (맞춤법 오류)"),
];

/// Check text against the known-wrong patterns.
///
/// Returns the matched error messages in table order. Matching is plain
/// substring containment; repeated occurrences of the same pattern still
/// count as a single match.
pub fn check(text: &str) -> Vec<String> {
    SPELLING_PATTERNS
        .iter()
        .filter(|(wrong, _correct, _)| text.contains(wrong))
        .map(|(_, _, message)| (*message).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_single_pattern_match() {
        let errors = check("이렇게 하면 되요");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("되요"));
        assert!(errors[0].contains("돼요"));
    }

    #[test]
    fn test_clean_text_no_match() {
        let errors = check("매운맛 고추나라에 오세요. 무엇이든 할 수 있습니다.");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_matches_preserve_table_order() {
        // 잇습니다 appears later in the table than 메운맛 regardless of
        // position in the input text
        let errors = check("잇습니다만 메운맛이 좋다");

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("메운맛"));
        assert!(errors[1].contains("잇습니다"));
    }

    #[test]
    fn test_repeated_occurrence_counts_once() {
        let errors = check("되요 되요 되요");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_spacing_variants_match_independently() {
        let errors = check("할수있습니다");

        // 할수있다 is not contained in 할수있습니다, so only the longer
        // table entry matches
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("할수있습니다"));
    }

    #[test]
    fn test_empty_input() {
        assert!(check("").is_empty());
    }
}
