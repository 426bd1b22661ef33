//! Question list → summary statistics

use super::evaluate::{is_answered, is_question_correct};
use crate::models::{Question, Summary};

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count answered, correct and incorrect questions in one pass
pub fn calculate_summary(questions: &[Question]) -> Summary {
    let mut answered = 0;
    let mut correct = 0;

    for question in questions.iter().filter(|q| is_answered(q)) {
        answered += 1;
        if is_question_correct(question) {
            correct += 1;
        }
    }

    let total = questions.len();
    let score_percentage = if total > 0 {
        round2(correct as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    Summary {
        total_questions: total,
        answered_questions: answered,
        correct_answers: correct,
        incorrect_answers: answered - correct,
        score_percentage,
    }
}
