use log::{debug, info};
use std::collections::HashMap;

use crate::config::*;

/// The first answer given to each question of a response.
///
/// Questions with an empty list of answers are treated as unanswered.
pub fn first_answers(response: &Response) -> HashMap<&str, &str> {
    response
        .answers
        .iter()
        .filter_map(|(qid, values)| values.first().map(|v| (qid.as_str(), v.as_str())))
        .collect()
}

/// Expands the responses into one row per (response, candidate position).
///
/// Answers are coerced to numbers when possible; unanswered questions get the
/// missing marker. Rows in which no criterion was answered are removed: they
/// correspond to candidates the judge did not reach.
pub fn normalize(index: &QuestionIndex, responses: &[Response]) -> ResponseTable {
    let mut table = ResponseTable {
        columns: index.headers(),
        candidates: index.candidates().to_vec(),
        rows: Vec::new(),
    };
    if responses.is_empty() {
        info!("normalize: no responses yet");
        return table;
    }

    let width = index.width();
    for response in responses.iter() {
        let answers = first_answers(response);
        debug!(
            "normalize: response {}: {} answers",
            response.response_id,
            answers.len()
        );
        for pos in 0..width {
            let row: Vec<Cell> = index
                .columns
                .iter()
                .map(|col| read_cell(col, pos, &answers))
                .collect();
            table.rows.push(row);
        }
    }

    let num_rows = table.rows.len();
    drop_unscored_rows(&mut table);
    debug!(
        "normalize: {} rows, {} dropped without any criterion answered",
        num_rows,
        num_rows - table.rows.len()
    );
    table
}

fn read_cell(col: &Column, pos: usize, answers: &HashMap<&str, &str>) -> Cell {
    match col.header.kind {
        ColumnKind::Candidate => match col.values.get(pos) {
            Some(name) => Cell::Text(name.clone()),
            None => Cell::Missing,
        },
        ColumnKind::Criterion | ColumnKind::Metadata => col
            .values
            .get(pos)
            .and_then(|qid| answers.get(qid.as_str()))
            .map(|answer| Cell::from_answer(answer))
            .unwrap_or(Cell::Missing),
    }
}

/// Removes the rows for which every criterion cell is missing.
/// Metadata and candidate cells are not looked at.
fn drop_unscored_rows(table: &mut ResponseTable) {
    let criteria = table.criterion_positions();
    table.rows.retain(|row| {
        criteria
            .iter()
            .any(|pos| row.get(*pos).map(|c| !c.is_missing()).unwrap_or(false))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_index() -> QuestionIndex {
        QuestionIndex::from_columns(vec![
            Column::candidates(&["Alice", "Bob"]),
            Column::criterion("Clarity", &["q1", "q2"]),
            Column::metadata("Judge Name", &["q3", "q3"]),
        ])
    }

    #[test]
    fn fills_rows_and_drops_unreached_candidates() {
        let responses = vec![Response::new("r1").answer("q1", "8").answer("q3", "Jane")];
        let table = normalize(&scenario_index(), &responses);

        // Bob has no criterion answered: the row is dropped.
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0],
            vec![
                Cell::Text("Alice".to_string()),
                Cell::Integer(8),
                Cell::Text("Jane".to_string())
            ]
        );
        // The candidate is still known to the table.
        assert_eq!(table.candidates, vec!["Alice", "Bob"]);
    }

    #[test]
    fn partial_rows_are_kept() {
        let index = QuestionIndex::from_columns(vec![
            Column::candidates(&["Alice", "Bob"]),
            Column::criterion("Impact", &["a1", "b1"]),
            Column::criterion("Clarity", &["a2", "b2"]),
            Column::metadata("Judge Name", &["j", "j"]),
        ]);
        let responses = vec![Response::new("r1")
            .answer("a1", "5")
            .answer("a2", "7")
            .answer("b2", "9")
            .answer("j", "Sam")];
        let table = normalize(&index, &responses);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(1, "Impact"), Some(&Cell::Missing));
        assert_eq!(table.cell(1, "Clarity"), Some(&Cell::Integer(9)));
        assert_eq!(table.cell(1, "Judge Name"), Some(&Cell::Text("Sam".to_string())));
    }

    #[test]
    fn metadata_alone_does_not_keep_a_row() {
        let responses = vec![Response::new("r1").answer("q3", "Jane")];
        let table = normalize(&scenario_index(), &responses);
        assert!(table.is_empty());
    }

    #[test]
    fn coerces_numbers_and_keeps_text() {
        let index = QuestionIndex::from_columns(vec![
            Column::candidates(&["Alice"]),
            Column::criterion("Impact", &["a1"]),
            Column::criterion("Clarity", &["a2"]),
            Column::criterion("Notes", &["a3"]),
        ]);
        let responses = vec![Response::new("r1")
            .answer("a1", "7.5")
            .answer("a2", " 10 ")
            .answer("a3", "great work")];
        let table = normalize(&index, &responses);
        assert_eq!(table.cell(0, "Impact"), Some(&Cell::Float(7.5)));
        assert_eq!(table.cell(0, "Clarity"), Some(&Cell::Integer(10)));
        assert_eq!(
            table.cell(0, "Notes"),
            Some(&Cell::Text("great work".to_string()))
        );
    }

    #[test]
    fn only_the_first_answer_is_used() {
        let mut response = Response::new("r1");
        response
            .answers
            .insert("q1".to_string(), vec!["3".to_string(), "4".to_string()]);
        response.answers.insert("q2".to_string(), vec![]);
        let table = normalize(&scenario_index(), &[response]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, "Clarity"), Some(&Cell::Integer(3)));
        assert_eq!(table.cell(0, "Judge Name"), Some(&Cell::Missing));
    }

    #[test]
    fn rows_follow_response_then_candidate_order() {
        let responses = vec![
            Response::new("r1").answer("q1", "1").answer("q2", "2"),
            Response::new("r2").answer("q1", "3").answer("q2", "4"),
        ];
        let table = normalize(&scenario_index(), &responses);
        let clarity: Vec<Cell> = (0..4)
            .map(|i| table.cell(i, "Clarity").unwrap().clone())
            .collect();
        assert_eq!(
            clarity,
            vec![
                Cell::Integer(1),
                Cell::Integer(2),
                Cell::Integer(3),
                Cell::Integer(4)
            ]
        );
        assert_eq!(table.cell(2, "candidate"), Some(&Cell::Text("Alice".to_string())));
    }

    #[test]
    fn no_responses_gives_an_empty_table() {
        let table = normalize(&scenario_index(), &[]);
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 3);
    }

    #[test]
    fn normalization_is_repeatable() {
        let responses = vec![
            Response::new("r1").answer("q1", "8").answer("q3", "Jane"),
            Response::new("r2").answer("q2", "x").answer("q3", "Joe"),
        ];
        let index = scenario_index();
        assert_eq!(normalize(&index, &responses), normalize(&index, &responses));
    }
}
