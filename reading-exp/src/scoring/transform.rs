//! Raw question records → normalized questions

use std::collections::HashSet;

use crate::db::models::{RawQuestion, Reply};
use crate::models::{Answer, Question};

/// Answer ids the user picked in this experience
pub fn selected_answer_ids(replies: &[Reply]) -> HashSet<i64> {
    replies.iter().map(|r| r.answer_id).collect()
}

/// Fill defaults and mark selections
///
/// Order of questions and answers is preserved. Missing `answers` becomes
/// an empty list, missing `correct` / `has_multiple_answers` become false.
pub fn transform_questions(raw: Vec<RawQuestion>, selected: &HashSet<i64>) -> Vec<Question> {
    raw.into_iter()
        .map(|q| Question {
            id: q.id,
            content: q.content,
            has_multiple_answers: q.has_multiple_answers.unwrap_or(false),
            answers: q
                .answers
                .unwrap_or_default()
                .into_iter()
                .map(|a| Answer {
                    selected: selected.contains(&a.id),
                    id: a.id,
                    content: a.content,
                    correct: a.correct.unwrap_or(false),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RawAnswer;

    fn raw_answer(id: i64, correct: Option<bool>) -> RawAnswer {
        RawAnswer {
            id,
            content: format!("answer {}", id),
            correct,
        }
    }

    fn reply(answer_id: i64) -> Reply {
        Reply {
            id: answer_id * 10,
            experience_id: 1,
            answer_id,
            question_id: None,
        }
    }

    #[test]
    fn test_defaults_filled() {
        let raw = vec![
            RawQuestion {
                id: 1,
                content: "q1".into(),
                has_multiple_answers: None,
                answers: Some(vec![raw_answer(11, None), raw_answer(12, Some(true))]),
            },
            RawQuestion {
                id: 2,
                content: "q2".into(),
                has_multiple_answers: Some(true),
                answers: None,
            },
        ];

        let questions = transform_questions(raw, &HashSet::new());

        assert_eq!(questions.len(), 2);
        assert!(!questions[0].has_multiple_answers);
        assert!(!questions[0].answers[0].correct);
        assert!(questions[0].answers[1].correct);
        assert!(questions[0].answers.iter().all(|a| !a.selected));
        assert!(questions[1].has_multiple_answers);
        assert!(questions[1].answers.is_empty());
    }

    #[test]
    fn test_selection_marked_from_replies() {
        let raw = vec![RawQuestion {
            id: 1,
            content: "q".into(),
            has_multiple_answers: Some(false),
            answers: Some(vec![
                raw_answer(3, Some(false)),
                raw_answer(1, Some(true)),
                raw_answer(2, None),
            ]),
        }];

        let selected = selected_answer_ids(&[reply(2), reply(99)]);
        let questions = transform_questions(raw, &selected);

        let ids: Vec<i64> = questions[0].answers.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 1, 2], "input order preserved");

        let picked: Vec<bool> = questions[0].answers.iter().map(|a| a.selected).collect();
        assert_eq!(picked, vec![false, false, true]);
    }
}
