use serde::Serialize;

use super::entities::{Exam, ExamQuestionItem};

// 考试详情（含有序题目）
#[derive(Debug, Serialize)]
pub struct ExamDetailResponse {
    pub exam: Exam,
    pub questions: Vec<ExamQuestionItem>,
    pub total_marks: i64,
}
