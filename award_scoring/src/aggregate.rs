use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::*;

/// Ranks the candidates of a response table.
///
/// The score of a row is the mean of its numeric criteria. The score of a
/// candidate is the mean of its row scores. Missing values are skipped at
/// both levels. Candidates without any usable score are kept at the end of
/// the ranking with a missing score.
///
/// A table without rows (nobody answered yet) gives an empty ranking.
pub fn aggregate(table: &ResponseTable) -> RankingTable {
    if table.is_empty() {
        debug!("aggregate: empty table, no ranking");
        return RankingTable::new();
    }
    let criteria = table.criterion_positions();

    // Groups, in order of first appearance.
    let mut groups: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    let mut group_ids: HashMap<String, usize> = HashMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let candidate = match candidate_of(table, row) {
            Some(c) => c,
            None => {
                debug!("aggregate: row {} has no candidate, skipping", idx);
                continue;
            }
        };
        let gid = *group_ids.entry(candidate.clone()).or_insert_with(|| {
            groups.push((candidate, Vec::new()));
            groups.len() - 1
        });
        groups[gid].1.push(row_mean(row, &criteria));
    }

    // Candidates that nobody scored.
    for candidate in table.candidates.iter() {
        if !group_ids.contains_key(candidate) {
            debug!("aggregate: candidate {:?} has no rows", candidate);
            group_ids.insert(candidate.clone(), groups.len());
            groups.push((candidate.clone(), Vec::new()));
        }
    }

    let mut ranking: RankingTable = groups
        .into_iter()
        .map(|(candidate, row_means)| {
            let valid: Vec<f64> = row_means.into_iter().flatten().collect();
            CandidateScore {
                candidate,
                score: mean(&valid),
                scored_rows: valid.len(),
            }
        })
        .collect();
    sort_ranking(&mut ranking);
    ranking
}

/// Reports the rows that have at least one missing criterion, using the
/// default judge name column.
pub fn detect_missing(table: &ResponseTable) -> Vec<MissingScoreReport> {
    detect_missing_by(table, JUDGE_NAME_COLUMN)
}

/// Reports the rows that have at least one missing criterion.
///
/// This is diagnostic only: the rows stay in the table.
pub fn detect_missing_by(table: &ResponseTable, judge_column: &str) -> Vec<MissingScoreReport> {
    let criteria = table.criterion_positions();
    let judge_pos = table.position(judge_column);
    let mut reports: Vec<MissingScoreReport> = Vec::new();
    for row in table.rows.iter() {
        let missing_criteria: Vec<String> = criteria
            .iter()
            .filter(|pos| row.get(**pos).map(|c| c.is_missing()).unwrap_or(true))
            .map(|pos| table.columns[*pos].name.clone())
            .collect();
        if missing_criteria.is_empty() {
            continue;
        }
        let judge_name = judge_pos
            .and_then(|pos| row.get(pos))
            .filter(|c| !c.is_missing())
            .map(|c| c.to_string());
        reports.push(MissingScoreReport {
            candidate: candidate_of(table, row).unwrap_or_default(),
            judge_name,
            missing_criteria,
        });
    }
    reports
}

fn candidate_of(table: &ResponseTable, row: &[Cell]) -> Option<String> {
    let pos = table.position(CANDIDATE_COLUMN)?;
    match row.get(pos) {
        Some(Cell::Missing) | None => None,
        Some(c) => Some(c.to_string()),
    }
}

/// The mean of the numeric criteria of a row. Missing and text values are skipped.
fn row_mean(row: &[Cell], criteria: &[usize]) -> Option<f64> {
    let values: Vec<f64> = criteria
        .iter()
        .filter_map(|pos| row.get(*pos).and_then(|c| c.as_number()))
        .collect();
    mean(&values)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Decreasing score, missing scores last. The sort is stable: ties keep their
/// order of appearance.
fn sort_ranking(ranking: &mut RankingTable) {
    ranking.sort_by(|a, b| match (a.score, b.score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
