use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::ResourceScope;

// 题型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_choice" => Ok(QuestionType::SingleChoice),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "true_false" => Ok(QuestionType::TrueFalse),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

// 难度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {s}")),
        }
    }
}

/// 标准答案，JSON 形态随题型不同：
/// 单选为选项下标，多选为下标数组，判断为布尔值，简答为文本
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    Choice(usize),
    Choices(Vec<usize>),
    Boolean(bool),
    Text(String),
}

// 题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub tenant_id: i64,
    /// 为空表示全租户共享
    pub campus_id: Option<i64>,
    pub subject: String,
    pub question_type: QuestionType,
    pub body: String,
    pub options: Vec<String>,
    pub answer: Answer,
    pub marks: i32,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

impl Question {
    pub fn scope(&self) -> ResourceScope {
        ResourceScope {
            tenant_id: self.tenant_id,
            campus_id: self.campus_id,
        }
    }

    /// 题目能否出现在某校区的试卷中
    pub fn visible_from(&self, tenant_id: i64, campus_id: i64) -> bool {
        self.tenant_id == tenant_id && self.campus_id.is_none_or(|c| c == campus_id)
    }
}

/// 校验题目内容与答案是否匹配题型
pub fn validate_question_content(
    question_type: QuestionType,
    options: &[String],
    answer: &Answer,
    marks: i32,
) -> Result<(), String> {
    if marks <= 0 {
        return Err("marks must be greater than 0".to_string());
    }

    if question_type.has_options() {
        if options.len() < 2 {
            return Err("choice questions need at least 2 options".to_string());
        }
        if options.iter().any(|o| o.trim().is_empty()) {
            return Err("options must not be empty".to_string());
        }
    } else if !options.is_empty() {
        return Err(format!("{question_type} questions must not have options"));
    }

    match (question_type, answer) {
        (QuestionType::SingleChoice, Answer::Choice(idx)) => {
            if *idx >= options.len() {
                return Err(format!("answer index {idx} is out of range"));
            }
        }
        (QuestionType::MultipleChoice, Answer::Choices(indices)) => {
            if indices.is_empty() {
                return Err("multiple choice answer must select at least one option".to_string());
            }
            let mut seen = std::collections::HashSet::new();
            for idx in indices {
                if *idx >= options.len() {
                    return Err(format!("answer index {idx} is out of range"));
                }
                if !seen.insert(*idx) {
                    return Err(format!("answer index {idx} is duplicated"));
                }
            }
        }
        (QuestionType::TrueFalse, Answer::Boolean(_)) => {}
        (QuestionType::ShortAnswer, Answer::Text(text)) => {
            if text.trim().is_empty() {
                return Err("short answer must not be empty".to_string());
            }
        }
        (question_type, _) => {
            return Err(format!("answer does not match question type {question_type}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_choice() {
        let options = opts(&["2", "3", "4"]);
        assert!(
            validate_question_content(QuestionType::SingleChoice, &options, &Answer::Choice(1), 2)
                .is_ok()
        );
        assert!(
            validate_question_content(QuestionType::SingleChoice, &options, &Answer::Choice(3), 2)
                .is_err()
        );
        assert!(
            validate_question_content(
                QuestionType::SingleChoice,
                &opts(&["only"]),
                &Answer::Choice(0),
                2
            )
            .is_err()
        );
    }

    #[test]
    fn test_multiple_choice() {
        let options = opts(&["a", "b", "c"]);
        let check = |answer: Answer| {
            validate_question_content(QuestionType::MultipleChoice, &options, &answer, 4)
        };
        assert!(check(Answer::Choices(vec![0, 2])).is_ok());
        assert!(check(Answer::Choices(vec![])).is_err());
        assert!(check(Answer::Choices(vec![1, 1])).is_err());
        assert!(check(Answer::Choices(vec![5])).is_err());
        assert!(check(Answer::Choice(0)).is_err());
    }

    #[test]
    fn test_blank_option_rejected() {
        let options = opts(&["a", "  "]);
        assert!(
            validate_question_content(QuestionType::SingleChoice, &options, &Answer::Choice(0), 1)
                .is_err()
        );
    }

    #[test]
    fn test_true_false_and_short_answer() {
        assert!(
            validate_question_content(QuestionType::TrueFalse, &[], &Answer::Boolean(true), 1)
                .is_ok()
        );
        assert!(
            validate_question_content(
                QuestionType::TrueFalse,
                &opts(&["yes", "no"]),
                &Answer::Boolean(true),
                1
            )
            .is_err()
        );
        assert!(
            validate_question_content(
                QuestionType::ShortAnswer,
                &[],
                &Answer::Text("photosynthesis".to_string()),
                5
            )
            .is_ok()
        );
        assert!(
            validate_question_content(
                QuestionType::ShortAnswer,
                &[],
                &Answer::Text(" ".to_string()),
                5
            )
            .is_err()
        );
    }

    #[test]
    fn test_marks_must_be_positive() {
        assert!(
            validate_question_content(QuestionType::TrueFalse, &[], &Answer::Boolean(false), 0)
                .is_err()
        );
    }

    #[test]
    fn test_answer_json_shapes() {
        assert_eq!(serde_json::from_str::<Answer>("2").unwrap(), Answer::Choice(2));
        assert_eq!(
            serde_json::from_str::<Answer>("[0,1]").unwrap(),
            Answer::Choices(vec![0, 1])
        );
        assert_eq!(
            serde_json::from_str::<Answer>("false").unwrap(),
            Answer::Boolean(false)
        );
        assert_eq!(
            serde_json::from_str::<Answer>("\"H2O\"").unwrap(),
            Answer::Text("H2O".to_string())
        );
    }

    #[test]
    fn test_visibility() {
        let now = Utc::now();
        let mut q = Question {
            id: 1,
            tenant_id: 1,
            campus_id: None,
            subject: "math".to_string(),
            question_type: QuestionType::TrueFalse,
            body: "1 + 1 = 2".to_string(),
            options: vec![],
            answer: Answer::Boolean(true),
            marks: 1,
            difficulty: Difficulty::Easy,
            created_at: now,
            updated_at: now,
            created_by: None,
        };
        assert!(q.visible_from(1, 9));
        assert!(!q.visible_from(2, 9));
        q.campus_id = Some(3);
        assert!(q.visible_from(1, 3));
        assert!(!q.visible_from(1, 9));
    }
}
