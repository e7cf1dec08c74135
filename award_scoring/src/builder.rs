pub use crate::config::*;

/// The radio scale offered to judges for every criterion.
pub const SCORE_SCALE: std::ops::RangeInclusive<u32> = 1..=10;

/// The affiliations offered when none are configured.
pub const DEFAULT_AFFILIATIONS: [&str; 3] = ["Board", "Alumni", "External"];

/// Describes the questions that identify the judge.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct JudgeMetadataSpec {
    pub affiliation_title: String,
    pub affiliation_options: Vec<String>,
    pub judge_name_title: String,
}

impl Default for JudgeMetadataSpec {
    fn default() -> Self {
        JudgeMetadataSpec {
            affiliation_title: AFFILIATION_COLUMN.to_string(),
            affiliation_options: DEFAULT_AFFILIATIONS.iter().map(|s| s.to_string()).collect(),
            judge_name_title: JUDGE_NAME_COLUMN.to_string(),
        }
    }
}

/// A new question to add to a form.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NewItem {
    /// One candidate: one row per criterion, one radio column per score.
    Grid {
        title: String,
        rows: Vec<String>,
        columns: Vec<String>,
    },
    Dropdown {
        title: String,
        options: Vec<String>,
    },
    Text {
        title: String,
    },
}

/// A mutation of a form. The gateway translates these into remote calls.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FormRequest {
    UpdateTitle { title: String },
    CreateItem { index: u32, item: NewItem },
}

/// Sets the title of a form.
pub fn rename_form(title: &str) -> FormRequest {
    FormRequest::UpdateTitle {
        title: title.to_string(),
    }
}

/// A builder for the questions of a scoring form.
///
/// ```
/// use award_scoring::builder::{FormBuilder, JudgeMetadataSpec};
/// # use award_scoring::ScoringErrors;
///
/// let mut builder = FormBuilder::new(&JudgeMetadataSpec::default())
///     .criteria(&["Impact".to_string(), "Originality".to_string()])?;
///
/// builder.add_candidate("Alice");
/// builder.add_candidate("Bob");
///
/// // Two grids, the affiliation and the judge name.
/// assert_eq!(builder.requests()?.len(), 4);
/// # Ok::<(), ScoringErrors>(())
/// ```
pub struct FormBuilder {
    pub(crate) _judge: JudgeMetadataSpec,
    pub(crate) _criteria: Vec<String>,
    pub(crate) _candidates: Vec<String>,
}

impl FormBuilder {
    pub fn new(judge: &JudgeMetadataSpec) -> FormBuilder {
        FormBuilder {
            _judge: judge.clone(),
            _criteria: Vec::new(),
            _candidates: Vec::new(),
        }
    }

    pub fn criteria(self, criteria: &[String]) -> Result<FormBuilder, ScoringErrors> {
        let criteria: Vec<String> = criteria
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if criteria.is_empty() {
            return Err(ScoringErrors::EmptyCriteria);
        }
        Ok(FormBuilder {
            _judge: self._judge,
            _criteria: criteria,
            _candidates: self._candidates,
        })
    }

    pub fn add_candidate(&mut self, name: &str) {
        self._candidates.push(name.to_string());
    }

    /// The requests that add all the questions, in form order.
    ///
    /// The affiliation dropdown needs at least one non-blank option.
    pub fn requests(&self) -> Result<Vec<FormRequest>, ScoringErrors> {
        let options: Vec<String> = self
            ._judge
            .affiliation_options
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if options.is_empty() {
            return Err(ScoringErrors::EmptyAffiliationOptions);
        }
        let scale: Vec<String> = SCORE_SCALE.map(|s| s.to_string()).collect();
        let mut items: Vec<NewItem> = self
            ._candidates
            .iter()
            .map(|name| NewItem::Grid {
                title: name.clone(),
                rows: self._criteria.clone(),
                columns: scale.clone(),
            })
            .collect();
        items.push(NewItem::Dropdown {
            title: self._judge.affiliation_title.clone(),
            options,
        });
        items.push(NewItem::Text {
            title: self._judge.judge_name_title.clone(),
        });
        Ok(items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| FormRequest::CreateItem {
                index: idx as u32,
                item,
            })
            .collect())
    }
}

/// All the questions of a scoring form for the given candidates.
pub fn build_award_form(
    criteria: &[String],
    candidates: &[String],
    judge: &JudgeMetadataSpec,
) -> Result<Vec<FormRequest>, ScoringErrors> {
    let mut builder = FormBuilder::new(judge).criteria(criteria)?;
    for name in candidates.iter() {
        builder.add_candidate(name);
    }
    builder.requests()
}
