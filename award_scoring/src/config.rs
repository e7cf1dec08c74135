// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The reserved column that holds the candidate names.
pub const CANDIDATE_COLUMN: &str = "candidate";

/// The default title of the free-text question in which judges enter their name.
pub const JUDGE_NAME_COLUMN: &str = "Judge Name";

/// The default title of the dropdown question in which judges select their affiliation.
pub const AFFILIATION_COLUMN: &str = "Affiliation";

/// One row of a grid question: a scoring criterion for the candidate of the grid.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SubQuestion {
    pub question_id: String,
    pub row_title: String,
}

/// An element of a form, as far as scoring is concerned.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Item {
    /// A question that applies to the whole submission (judge name, affiliation).
    Single {
        item_id: String,
        title: String,
        question_id: String,
    },
    /// One candidate (the title) with one sub-question per criterion.
    Grid {
        item_id: String,
        title: String,
        sub_questions: Vec<SubQuestion>,
    },
}

impl Item {
    pub fn item_id(&self) -> &str {
        match self {
            Item::Single { item_id, .. } => item_id,
            Item::Grid { item_id, .. } => item_id,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FormDefinition {
    pub items: Vec<Item>,
}

/// A submission of a judge.
///
/// The answers are given as a list per question. Only the first value is
/// used for scoring.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Response {
    pub response_id: String,
    pub answers: HashMap<String, Vec<String>>,
}

impl Response {
    pub fn new(response_id: &str) -> Response {
        Response {
            response_id: response_id.to_string(),
            answers: HashMap::new(),
        }
    }

    /// Adds a single-valued answer. Convenient for building responses by hand.
    pub fn answer(mut self, question_id: &str, value: &str) -> Response {
        self.answers
            .insert(question_id.to_string(), vec![value.to_string()]);
        self
    }
}

// ******** Intermediate and output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ColumnKind {
    /// The reserved candidate column. Its values are names, not question ids.
    Candidate,
    /// A scoring criterion (row of a grid question).
    Criterion,
    /// Judge metadata (free text or dropdown question).
    Metadata,
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ColumnHeader {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Column {
    pub header: ColumnHeader,
    pub values: Vec<String>,
}

impl Column {
    pub fn new(name: &str, kind: ColumnKind, values: &[&str]) -> Column {
        Column {
            header: ColumnHeader {
                name: name.to_string(),
                kind,
            },
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn candidates(names: &[&str]) -> Column {
        Column::new(CANDIDATE_COLUMN, ColumnKind::Candidate, names)
    }

    pub fn criterion(name: &str, question_ids: &[&str]) -> Column {
        Column::new(name, ColumnKind::Criterion, question_ids)
    }

    pub fn metadata(name: &str, question_ids: &[&str]) -> Column {
        Column::new(name, ColumnKind::Metadata, question_ids)
    }
}

/// The mapping from logical columns to the question ids that carry them.
///
/// Columns are kept in order of first insertion, which fixes the column
/// order of the response table.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct QuestionIndex {
    pub columns: Vec<Column>,
}

impl QuestionIndex {
    pub fn from_columns(columns: Vec<Column>) -> QuestionIndex {
        QuestionIndex { columns }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|c| c.header.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn candidates(&self) -> &[String] {
        self.columns
            .iter()
            .find(|c| c.header.kind == ColumnKind::Candidate)
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    /// The number of positions (rows per response) described by this index.
    pub fn width(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.len())
            .max()
            .unwrap_or(0)
    }

    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Appends a value to a column, creating the column when it does not exist yet.
    pub(crate) fn push(&mut self, name: &str, kind: ColumnKind, value: String) {
        match self.columns.iter_mut().find(|c| c.header.name == name) {
            Some(col) => {
                if col.header.kind != kind {
                    log::warn!(
                        "QuestionIndex: column {:?} used both as {:?} and {:?}",
                        name,
                        col.header.kind,
                        kind
                    );
                }
                col.values.push(value);
            }
            None => self.columns.push(Column {
                header: ColumnHeader {
                    name: name.to_string(),
                    kind,
                },
                values: vec![value],
            }),
        }
    }
}

/// A value in the response table.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Integer(i64),
    Float(f64),
    Text(String),
    /// The question was not answered. Skipped by all the averages.
    Missing,
}

impl Cell {
    /// Coerces an answer to a number when it looks like one.
    ///
    /// Non-finite floats ("NaN", "inf") are kept as text so that they never
    /// leak into the averages.
    pub fn from_answer(answer: &str) -> Cell {
        let trimmed = answer.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Integer(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Cell::Float(f),
            _ => Cell::Text(answer.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Missing => Ok(()),
        }
    }
}

/// One row per (judge submission, candidate).
///
/// All the rows have one cell per column, in the order of `columns`.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ResponseTable {
    pub columns: Vec<ColumnHeader>,
    /// The candidates of the form, in form order. Some of them may have no row.
    pub candidates: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResponseTable {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|h| h.name == name)
    }

    pub fn criterion_positions(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, h)| h.kind == ColumnKind::Criterion)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let pos = self.position(name)?;
        self.rows.get(row).and_then(|r| r.get(pos))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct CandidateScore {
    pub candidate: String,
    /// The mean over the judges. None if no judge gave a usable score.
    pub score: Option<f64>,
    /// The number of rows that contributed a per-judge mean.
    pub scored_rows: usize,
}

/// Candidates ordered by decreasing score, unscored candidates last.
pub type RankingTable = Vec<CandidateScore>;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MissingScoreReport {
    pub candidate: String,
    pub judge_name: Option<String>,
    pub missing_criteria: Vec<String>,
}

/// Errors raised by the scoring core.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoringErrors {
    /// The form has no items yet.
    EmptyForm,
    /// An item does not have the structure expected for its type.
    SchemaMismatch { item_id: String, reason: String },
    /// A scoring form cannot be built without criteria.
    EmptyCriteria,
    /// The affiliation dropdown has no option to offer.
    EmptyAffiliationOptions,
}

impl Error for ScoringErrors {}

impl Display for ScoringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringErrors::EmptyForm => write!(f, "the form has no questions yet"),
            ScoringErrors::SchemaMismatch { item_id, reason } => {
                write!(f, "unexpected structure for item {}: {}", item_id, reason)
            }
            ScoringErrors::EmptyCriteria => write!(f, "no scoring criteria were provided"),
            ScoringErrors::EmptyAffiliationOptions => {
                write!(f, "the affiliation question has no options")
            }
        }
    }
}
