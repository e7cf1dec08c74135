use log::{debug, warn};

use crate::config::*;

/// Builds the mapping from logical columns to question ids for a form.
///
/// Single questions become metadata columns named after their title, except
/// one titled like the candidate column, which is skipped. Each grid
/// item contributes its title to the candidate column and one question id per
/// criterion. Columns that end up shorter than the longest one are repeated
/// cyclically, since a single question applies to every candidate of the
/// submission.
pub fn build_question_index(form: &FormDefinition) -> Result<QuestionIndex, ScoringErrors> {
    if form.items.is_empty() {
        return Err(ScoringErrors::EmptyForm);
    }

    let mut index = QuestionIndex::default();
    for item in form.items.iter() {
        match item {
            Item::Single {
                item_id,
                title,
                question_id,
            } => {
                if title == CANDIDATE_COLUMN {
                    let err = ScoringErrors::SchemaMismatch {
                        item_id: item_id.clone(),
                        reason: format!("question title {:?} is reserved", CANDIDATE_COLUMN),
                    };
                    warn!("build_question_index: skipping item: {}", err);
                    continue;
                }
                debug!(
                    "build_question_index: item {}: question {} -> {:?}",
                    item_id, question_id, title
                );
                index.push(title, ColumnKind::Metadata, question_id.clone());
            }
            Item::Grid {
                item_id,
                title,
                sub_questions,
            } => {
                if sub_questions.is_empty() {
                    let err = ScoringErrors::SchemaMismatch {
                        item_id: item_id.clone(),
                        reason: "grid question without rows".to_string(),
                    };
                    warn!("build_question_index: skipping item: {}", err);
                    continue;
                }
                debug!(
                    "build_question_index: item {}: candidate {:?} with {} criteria",
                    item_id,
                    title,
                    sub_questions.len()
                );
                index.push(CANDIDATE_COLUMN, ColumnKind::Candidate, title.clone());
                for sq in sub_questions.iter() {
                    index.push(&sq.row_title, ColumnKind::Criterion, sq.question_id.clone());
                }
            }
        }
    }

    tile_columns(&mut index.columns);
    Ok(index)
}

/// Repeats every non-empty column until it reaches the length of the longest one.
/// The last cycle is truncated to the exact length.
fn tile_columns(columns: &mut [Column]) {
    let max_len = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
    for col in columns.iter_mut() {
        let len = col.values.len();
        if len > 0 && len < max_len {
            col.values = col.values.iter().cycle().take(max_len).cloned().collect();
        }
    }
}
