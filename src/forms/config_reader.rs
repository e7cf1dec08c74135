use crate::forms::*;

use award_scoring::{JudgeMetadataSpec, DEFAULT_AFFILIATIONS};
use serde::{Deserialize, Serialize};

/// Where an award is described in the criteria document, and which applicants it concerns.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AwardSettings {
    pub name: String,
    /// Index in the document body of the paragraph holding the award title.
    #[serde(rename = "titleParagraph")]
    pub title_paragraph: usize,
    /// Index in the document body of the table listing the criteria.
    #[serde(rename = "criteriaTable")]
    pub criteria_table: usize,
    /// The value of the applicant type column in the roster.
    #[serde(rename = "applicantType")]
    pub applicant_type: String,
}

/// An award category. Each category gets its own form, titled after the category.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CategorySettings {
    pub name: String,
    pub award: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantsSettings {
    #[serde(rename = "spreadsheetId")]
    pub spreadsheet_id: Option<String>,
    pub range: Option<String>,
    #[serde(rename = "majorDimension")]
    pub major_dimension: Option<String>,
    /// A local Excel export of the roster. Takes precedence over the spreadsheet.
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "nameColumn", default = "default_name_column")]
    pub name_column: String,
    #[serde(rename = "applicantTypeColumn", default = "default_applicant_type_column")]
    pub applicant_type_column: String,
    #[serde(rename = "categoryColumn", default = "default_category_column")]
    pub category_column: String,
}

fn default_name_column() -> String {
    "Name".to_string()
}

fn default_applicant_type_column() -> String {
    "Applicant Type".to_string()
}

fn default_category_column() -> String {
    "Category".to_string()
}

impl Default for ApplicantsSettings {
    fn default() -> Self {
        ApplicantsSettings {
            spreadsheet_id: None,
            range: None,
            major_dimension: None,
            file_path: None,
            excel_worksheet_name: None,
            name_column: default_name_column(),
            applicant_type_column: default_applicant_type_column(),
            category_column: default_category_column(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JudgeSettings {
    #[serde(rename = "judgeNameTitle")]
    pub judge_name_title: String,
    #[serde(rename = "affiliationTitle")]
    pub affiliation_title: String,
    #[serde(rename = "affiliationOptions", default = "default_affiliation_options")]
    pub affiliation_options: Vec<String>,
}

fn default_affiliation_options() -> Vec<String> {
    DEFAULT_AFFILIATIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for JudgeSettings {
    fn default() -> Self {
        let spec = JudgeMetadataSpec::default();
        JudgeSettings {
            judge_name_title: spec.judge_name_title,
            affiliation_title: spec.affiliation_title,
            affiliation_options: spec.affiliation_options,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    pub forms: String,
    pub drive: String,
    pub docs: String,
    pub sheets: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        EndpointSettings {
            forms: "https://forms.googleapis.com/v1/forms".to_string(),
            drive: "https://www.googleapis.com/drive/v3/files".to_string(),
            docs: "https://docs.googleapis.com/v1/documents".to_string(),
            sheets: "https://sheets.googleapis.com/v4/spreadsheets".to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    /// Where the log file of each run is written.
    #[serde(rename = "logDirectory")]
    pub log_directory: Option<String>,
    #[serde(rename = "documentId")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub applicants: ApplicantsSettings,
    #[serde(default)]
    pub judge: JudgeSettings,
    #[serde(default)]
    pub endpoints: EndpointSettings,
    #[serde(default = "default_awards")]
    pub awards: Vec<AwardSettings>,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategorySettings>,
}

impl Default for FormsConfig {
    fn default() -> Self {
        FormsConfig {
            output_directory: None,
            log_directory: None,
            document_id: None,
            applicants: ApplicantsSettings::default(),
            judge: JudgeSettings::default(),
            endpoints: EndpointSettings::default(),
            awards: default_awards(),
            categories: default_categories(),
        }
    }
}

impl FormsConfig {
    pub fn award_for(&self, category: &str) -> Option<&AwardSettings> {
        let cat = self.categories.iter().find(|c| c.name == category)?;
        self.awards.iter().find(|a| a.name == cat.award)
    }

    pub fn judge_spec(&self) -> JudgeMetadataSpec {
        JudgeMetadataSpec {
            affiliation_title: self.judge.affiliation_title.clone(),
            affiliation_options: self.judge.affiliation_options.clone(),
            judge_name_title: self.judge.judge_name_title.clone(),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.output_directory.as_deref().unwrap_or("data"))
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(self.log_directory.as_deref().unwrap_or("logs"))
    }

    /// Applies the overrides found in the environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(x) = lookup("SPREADSHEET_ID") {
            self.applicants.spreadsheet_id = Some(x);
        }
        if let Some(x) = lookup("RANGE") {
            self.applicants.range = Some(x);
        }
        if let Some(x) = lookup("MAJOR_DIMENSION") {
            self.applicants.major_dimension = Some(x);
        }
        if let Some(x) = lookup("DOCUMENT_ID") {
            self.document_id = Some(x);
        }
        if let Some(x) = lookup("DATA_DIRECTORY_PATH") {
            self.output_directory = Some(x);
        }
        if let Some(x) = lookup("LOG_DIRECTORY_PATH") {
            self.log_directory = Some(x);
        }
    }
}

const INDIVIDUAL: &str = "Individual";
const PROJECT: &str = "Project";
const ALUMNI_ASSOCIATION: &str = "Alumni Association";

fn default_awards() -> Vec<AwardSettings> {
    [
        (INDIVIDUAL, 3, 4),
        (PROJECT, 6, 7),
        (ALUMNI_ASSOCIATION, 19, 20),
    ]
    .iter()
    .map(|(name, title_paragraph, criteria_table)| AwardSettings {
        name: name.to_string(),
        title_paragraph: *title_paragraph,
        criteria_table: *criteria_table,
        applicant_type: name.to_string(),
    })
    .collect()
}

fn default_categories() -> Vec<CategorySettings> {
    [
        ("Alumni Association", ALUMNI_ASSOCIATION),
        ("Achievement in Human Rights", INDIVIDUAL),
        ("Achievement in Innovations and Entrepreneurship", INDIVIDUAL),
        ("Achievement in Politics", INDIVIDUAL),
        ("Achievement in Science", INDIVIDUAL),
        ("Achievement in Social & Environmental Impact", INDIVIDUAL),
        (
            "Achievement in the industry of expertise (professional)",
            INDIVIDUAL,
        ),
        ("Other Area", INDIVIDUAL),
        ("Outstanding Publications", INDIVIDUAL),
        ("Project", PROJECT),
    ]
    .iter()
    .map(|(name, award)| CategorySettings {
        name: name.to_string(),
        award: award.to_string(),
    })
    .collect()
}

/// Reads the configuration file (if any), then applies the environment overrides.
/// A `.env` file in the working directory is loaded first when present.
pub fn read_config(path: Option<&str>) -> FResult<FormsConfig> {
    let mut config: FormsConfig = match path {
        Some(p) => {
            let contents = fs::read_to_string(p).context(OpeningJsonSnafu { path: p })?;
            serde_json::from_str(&contents).context(ParsingJsonSnafu {})?
        }
        None => FormsConfig::default(),
    };
    dotenvy::dotenv().ok();
    config.apply_overrides(|name| std::env::var(name).ok());
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// True when the DEBUG variable is set to something else than an empty string, 0 or false.
pub fn debug_enabled() -> bool {
    dotenvy::dotenv().ok();
    match std::env::var("DEBUG") {
        Ok(v) => {
            let v = v.trim().to_lowercase();
            !(v.is_empty() || v == "0" || v == "false")
        }
        Err(_) => false,
    }
}
