/*!
Scoring core for award nomination forms.

A scoring form has one grid question per candidate (one row per criterion,
scored from 1 to 10) and a few questions that identify the judge. This crate
turns the definition of such a form and the responses of the judges into a
table with one row per (judge, candidate), then into a ranking of the
candidates.

```
use award_scoring::*;

let form = FormDefinition {
    items: vec![
        Item::Grid {
            item_id: "i1".to_string(),
            title: "Alice".to_string(),
            sub_questions: vec![SubQuestion {
                question_id: "q1".to_string(),
                row_title: "Impact".to_string(),
            }],
        },
        Item::Single {
            item_id: "i2".to_string(),
            title: "Judge Name".to_string(),
            question_id: "q2".to_string(),
        },
    ],
};
let responses = vec![
    Response::new("r1").answer("q1", "8").answer("q2", "Jane"),
    Response::new("r2").answer("q1", "6").answer("q2", "Joe"),
];

let scores = score_form(&form, &responses)?;
assert_eq!(scores.ranking[0].candidate, "Alice");
assert_eq!(scores.ranking[0].score, Some(7.0));
# Ok::<(), ScoringErrors>(())
```

Nothing in this crate performs I/O.
*/

mod aggregate;
pub mod builder;
mod config;
mod normalize;
mod question_index;

use log::info;

pub use crate::aggregate::{aggregate, detect_missing, detect_missing_by};
pub use crate::builder::{
    build_award_form, rename_form, FormBuilder, FormRequest, JudgeMetadataSpec, NewItem,
    DEFAULT_AFFILIATIONS, SCORE_SCALE,
};
pub use crate::config::*;
pub use crate::normalize::{first_answers, normalize};
pub use crate::question_index::build_question_index;

/// Everything derived from one form.
#[derive(PartialEq, Debug, Clone)]
pub struct FormScores {
    pub index: QuestionIndex,
    pub table: ResponseTable,
    pub ranking: RankingTable,
    pub missing: Vec<MissingScoreReport>,
}

/// Runs the whole pipeline for one form: question index, response table,
/// ranking and missing score reports.
///
/// Fails only when the form has no questions yet.
pub fn score_form(
    form: &FormDefinition,
    responses: &[Response],
) -> Result<FormScores, ScoringErrors> {
    score_form_by(form, responses, JUDGE_NAME_COLUMN)
}

/// Same as [`score_form`], for forms in which the judges enter their name
/// in the question titled `judge_column`.
pub fn score_form_by(
    form: &FormDefinition,
    responses: &[Response],
    judge_column: &str,
) -> Result<FormScores, ScoringErrors> {
    info!(
        "Scoring {} items against {} responses",
        form.items.len(),
        responses.len()
    );
    let index = build_question_index(form)?;
    let table = normalize(&index, responses);
    let ranking = aggregate(&table);
    let missing = detect_missing_by(&table, judge_column);
    info!(
        "Scored {} candidates from {} rows, {} rows with missing scores",
        ranking.len(),
        table.rows.len(),
        missing.len()
    );
    Ok(FormScores {
        index,
        table,
        ranking,
        missing,
    })
}
