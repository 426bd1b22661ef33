//! Per-question correctness

use crate::models::Question;

/// A question is answered once any of its answers is selected
pub fn is_answered(question: &Question) -> bool {
    question.answers.iter().any(|a| a.selected)
}

/// Whether the user's selection for a question is correct
///
/// Multi-answer questions need the selected set to equal the correct set.
/// Single-answer questions look only at the first selected answer in input
/// order. No selection is never correct for either kind.
pub fn is_question_correct(question: &Question) -> bool {
    if !is_answered(question) {
        return false;
    }

    if question.has_multiple_answers {
        question.answers.iter().all(|a| a.selected == a.correct)
    } else {
        question
            .answers
            .iter()
            .find(|a| a.selected)
            .map(|a| a.correct)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;

    /// (correct, selected) pairs in order
    fn question(multi: bool, answers: &[(bool, bool)]) -> Question {
        Question {
            id: 1,
            content: "q".into(),
            has_multiple_answers: multi,
            answers: answers
                .iter()
                .enumerate()
                .map(|(i, &(correct, selected))| Answer {
                    id: i as i64 + 1,
                    content: format!("a{}", i),
                    correct,
                    selected,
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_no_selection() {
        let q = question(false, &[(true, false), (false, false)]);
        assert!(!is_answered(&q));
        assert!(!is_question_correct(&q));
    }

    #[test]
    fn test_single_first_selected_decides() {
        assert!(is_question_correct(&question(false, &[(true, true), (false, false)])));
        assert!(!is_question_correct(&question(false, &[(true, false), (false, true)])));

        // Two selections: only the first in input order counts
        assert!(is_question_correct(&question(false, &[(true, true), (false, true)])));
        assert!(!is_question_correct(&question(false, &[(false, true), (true, true)])));
    }

    #[test]
    fn test_multi_requires_set_equality() {
        // exact match
        assert!(is_question_correct(&question(
            true,
            &[(true, true), (true, true), (false, false)]
        )));
        // missing one correct answer
        assert!(!is_question_correct(&question(
            true,
            &[(true, true), (true, false), (false, false)]
        )));
        // extra wrong answer
        assert!(!is_question_correct(&question(
            true,
            &[(true, true), (true, true), (false, true)]
        )));
    }

    #[test]
    fn test_multi_empty_selection_not_correct() {
        let q = question(true, &[(false, false), (false, false)]);
        assert!(!is_answered(&q));
        assert!(!is_question_correct(&q));
    }

    #[test]
    fn test_no_answers() {
        let q = question(true, &[]);
        assert!(!is_answered(&q));
        assert!(!is_question_correct(&q));
    }
}
