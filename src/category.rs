//! Grading categories and their prompt templates.
//!
//! The category set is closed: each variant carries its own maximum score
//! and Korean prompt. Unknown category strings fall back to [`Category::Grammar`],
//! which mirrors the original behavior of the front-end contract.

/// Grading dimension requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// 문법 구조 (조사/어미 중복)
    Grammar,
    /// 맞춤법과 띄어쓰기
    Word,
    /// HTML 기본 구조
    Completeness,
}

impl Category {
    /// Parse the request parameter, falling back to grammar when absent or
    /// unrecognized.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("grammar") => Category::Grammar,
            Some("word") => Category::Word,
            Some("completeness") => Category::Completeness,
            _ => Category::Grammar,
        }
    }

    /// Maximum score awarded for a perfect submission in this category.
    pub fn max_score(&self) -> u32 {
        match self {
            Category::Grammar | Category::Word => 30,
            Category::Completeness => 40,
        }
    }

    /// Build the grading prompt with the submission text substituted in.
    pub fn build_prompt(&self, text: &str) -> String {
        match self {
            Category::Grammar => format!(
                r#"문법 구조 오류만 찾으세요.

중요: 실제로 존재하는 오류만! 없으면 {{"errorCount": 0, "errors": []}}

찾을 것: "을를"처럼 조사 중복, "했어요었어요"처럼 어미 중복
무시: 단어 반복

텍스트: {text}

JSON: {{"errorCount": 숫자, "errors": ["설명"]}}

주의: 텍스트에 없는 오류를 만들지 마세요!"#
            ),
            Category::Word => format!(
                r#"맞춤법과 띄어쓰기 오류만 찾으세요.

중요: 실제로 존재하는 오류만! 없으면 {{"errorCount": 0, "errors": []}}

올바른 표현 (오류 아님!):
- "매운맛" ✓ (정확함)
- "고추나라" ✓ (정확함)
- "오세요" ✓ (정확함)

찾을 오류:
- "메운맛" → "매운맛" (잘못된 표현)
- "오새요" → "오세요" (잘못된 표현)
- "되요" → "돼요" (잘못된 표현)

무시: 단어 반복

텍스트: {text}

JSON: {{"errorCount": 숫자, "errors": ["설명"]}}

⚠️ "매운맛"은 올바른 표현입니다. 오류로 판단하지 마세요!"#
            ),
            Category::Completeness => format!(
                r#"HTML 기본 구조 확인.

확인: <html>, <head>, <body>, <title> 존재? 태그 닫힘?
무시: DOCTYPE, alt, 시맨틱태그

HTML: {text}

JSON: {{"errorCount": 숫자, "errors": ["설명"]}}"#
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_param_known_values() {
        assert_eq!(Category::from_param(Some("grammar")), Category::Grammar);
        assert_eq!(Category::from_param(Some("word")), Category::Word);
        assert_eq!(
            Category::from_param(Some("completeness")),
            Category::Completeness
        );
    }

    #[test]
    fn test_from_param_absent_defaults_to_grammar() {
        assert_eq!(Category::from_param(None), Category::Grammar);
    }

    #[test]
    fn test_from_param_unknown_falls_back_to_grammar() {
        // Questionable contract inherited from the front-end: an unknown
        // category silently grades as grammar instead of being rejected.
        assert_eq!(Category::from_param(Some("words")), Category::Grammar);
        assert_eq!(Category::from_param(Some("")), Category::Grammar);
    }

    #[test]
    fn test_max_scores() {
        assert_eq!(Category::Grammar.max_score(), 30);
        assert_eq!(Category::Word.max_score(), 30);
        assert_eq!(Category::Completeness.max_score(), 40);
    }

    #[test]
    fn test_prompt_substitutes_text() {
        let prompt = Category::Grammar.build_prompt("검사할 문장");
        assert!(prompt.contains("검사할 문장"));
        assert!(prompt.contains("조사 중복"));
    }

    #[test]
    fn test_word_prompt_carries_allow_list() {
        let prompt = Category::Word.build_prompt("아무 텍스트");
        assert!(prompt.contains("매운맛"));
        assert!(prompt.contains("고추나라"));
    }

    #[test]
    fn test_completeness_prompt_names_structure_tags() {
        let prompt = Category::Completeness.build_prompt("<html></html>");
        for tag in ["<html>", "<head>", "<body>", "<title>"] {
            assert!(prompt.contains(tag), "missing {}", tag);
        }
    }
}
