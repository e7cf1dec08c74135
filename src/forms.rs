use log::{debug, info, warn};

use award_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::{json, Value as JSValue};

use crate::args::{Action, Args};
use crate::forms::config_reader::*;
use crate::forms::gateway::{FormGateway, GoogleGateway, RemoteForm};
use crate::forms::io_common::{RANKING_LABEL, RESPONSES_LABEL};

pub mod config_reader;
mod gateway;
mod io_common;
mod io_csv;
mod io_docs;
mod io_forms_api;
pub mod io_log;
mod io_roster;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FormsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error calling {url}"))]
    Http { source: reqwest::Error, url: String },
    #[snafu(display("Access denied (status {status}) for {url}: check the access token"))]
    Auth { url: String, status: u16 },
    #[snafu(display("Not found: {url}"))]
    NotFound { url: String },
    #[snafu(display("Unexpected status {status} for {url}: {body}"))]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },
    #[snafu(display("Invalid url {url}"))]
    InvalidUrl { url: String },
    #[snafu(display("Missing environment variable {name}"))]
    MissingEnv {
        name: String,
        source: std::env::VarError,
    },
    #[snafu(display("Unexpected document layout: {message}"))]
    DocumentLayout { message: String },
    #[snafu(display("Cannot read the applicants: {message}"))]
    Roster { message: String },
    #[snafu(display("Error writing CSV to {path}"))]
    Csv { source: csv::Error, path: String },
    #[snafu(display("Error writing {path}"))]
    Io {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error scoring form {form_id}: {source}"))]
    Scoring {
        source: ScoringErrors,
        form_id: String,
    },
    #[snafu(display("{failed} out of {total} forms failed"))]
    BatchFailed { failed: usize, total: usize },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type FResult<T> = Result<T, FormsError>;

/// Scores a form. Returns None when the form has no question yet.
fn score_remote_form(
    gateway: &dyn FormGateway,
    form: &RemoteForm,
    config: &FormsConfig,
) -> FResult<Option<FormScores>> {
    let responses = gateway.list_responses(&form.form_id)?;
    let judge_column = config.judge.judge_name_title.as_str();
    let scores = match score_form_by(&form.definition, &responses, judge_column) {
        Err(ScoringErrors::EmptyForm) => {
            info!(
                "No questions yet for form [{}] with id [{}]",
                form.title, form.form_id
            );
            return Ok(None);
        }
        x => x.context(ScoringSnafu {
            form_id: form.form_id.as_str(),
        })?,
    };
    if responses.is_empty() {
        info!(
            "No responses yet for form [{}] with id [{}]",
            form.title, form.form_id
        );
    }
    for report in scores.missing.iter() {
        warn!(
            "Form [{}]: judge {} did not score {} on {:?}",
            form.title,
            report.judge_name.as_deref().unwrap_or("<unknown>"),
            report.candidate,
            report.missing_criteria
        );
    }
    Ok(Some(scores))
}

/// What a run needs besides the gateway.
struct RunSettings<'a> {
    config: &'a FormsConfig,
    out_dir: PathBuf,
    form_ids: &'a [String],
    timestamp: NaiveDateTime,
}

fn export_responses(gateway: &dyn FormGateway, form: &RemoteForm, rs: &RunSettings) -> FResult<()> {
    let scores = match score_remote_form(gateway, form, rs.config)? {
        Some(s) if !s.table.is_empty() => s,
        _ => {
            info!("Nothing to export for form [{}]", form.title);
            return Ok(());
        }
    };
    let contents = io_csv::response_table_csv(&scores.table, &form.title)?;
    io_csv::write_export(
        &rs.out_dir,
        RESPONSES_LABEL,
        &form.title,
        &rs.timestamp,
        &contents,
    )?;
    Ok(())
}

fn export_ranking(gateway: &dyn FormGateway, form: &RemoteForm, rs: &RunSettings) -> FResult<()> {
    let scores = match score_remote_form(gateway, form, rs.config)? {
        Some(s) if !s.table.is_empty() => s,
        _ => {
            info!("No ranking for form [{}]", form.title);
            return Ok(());
        }
    };
    for (idx, cs) in scores.ranking.iter().enumerate() {
        debug!("export_ranking: {} {:?}", idx, cs);
    }
    let contents = io_csv::ranking_csv(&scores.ranking, &form.title)?;
    io_csv::write_export(
        &rs.out_dir,
        RANKING_LABEL,
        &form.title,
        &rs.timestamp,
        &contents,
    )?;
    Ok(())
}

fn print_responses(gateway: &dyn FormGateway, form: &RemoteForm, rs: &RunSettings) -> FResult<()> {
    if let Some(scores) = score_remote_form(gateway, form, rs.config)? {
        let contents = io_csv::response_table_csv(&scores.table, "stdout")?;
        println!("# {} ({})", form.title, form.form_id);
        print!("{}", String::from_utf8_lossy(&contents));
    }
    Ok(())
}

/// Runs an action on every form (or on the requested ones). A failing form
/// does not stop the others; the batch fails at the end if any form failed.
fn for_each_form<F>(gateway: &dyn FormGateway, rs: &RunSettings, mut action: F) -> FResult<()>
where
    F: FnMut(&RemoteForm) -> FResult<()>,
{
    let form_ids: Vec<String> = if rs.form_ids.is_empty() {
        gateway.list_form_ids()?
    } else {
        rs.form_ids.to_vec()
    };
    info!("Processing {} forms", form_ids.len());
    let mut failed: usize = 0;
    for form_id in form_ids.iter() {
        let res = gateway.get_form(form_id).and_then(|form| {
            info!(
                "Form [{}] with id [{}] at revision [{}]",
                form.title,
                form.form_id,
                form.revision_id.as_deref().unwrap_or("<none>")
            );
            action(&form)
        });
        if let Err(e) = res {
            warn!("Form {} failed: {}", form_id, e);
            failed += 1;
        }
    }
    ensure!(
        failed == 0,
        BatchFailedSnafu {
            failed,
            total: form_ids.len()
        }
    );
    Ok(())
}

fn create_category_form(
    gateway: &dyn FormGateway,
    config: &FormsConfig,
    document: &JSValue,
    roster: &io_roster::Roster,
    category: &CategorySettings,
) -> FResult<String> {
    let award = match config.award_for(&category.name) {
        Some(a) => a,
        None => whatever!(
            "Category {:?} refers to an unknown award {:?}",
            category.name,
            category.award
        ),
    };
    let info = io_docs::award_info(document, award.title_paragraph, award.criteria_table)?;
    info!("Award [{}]: criteria {:?}", info.title, info.criteria);
    let candidates = roster.group(&award.applicant_type, &category.name);
    if candidates.is_empty() {
        warn!("No applicants for category [{}]", category.name);
    }

    let mut requests = vec![rename_form(&category.name)];
    requests.extend(
        build_award_form(&info.criteria, &candidates, &config.judge_spec()).context(
            ScoringSnafu {
                form_id: category.name.as_str(),
            },
        )?,
    );

    let document_title = format!("{} document", category.name);
    let form_id = gateway.create_form(&category.name, &document_title)?;
    gateway.batch_update(&form_id, &requests)?;
    let created = gateway.get_form(&form_id)?;
    info!(
        "Created form for: {} form url {}",
        category.name,
        created.responder_uri.as_deref().unwrap_or("<none>")
    );
    Ok(form_id)
}

/// Creates one scoring form per category.
fn create_all(gateway: &dyn FormGateway, config: &FormsConfig) -> FResult<Vec<String>> {
    let document_id = match config.document_id.as_deref() {
        Some(x) => x,
        None => whatever!("No criteria document: set documentId or DOCUMENT_ID"),
    };
    let document = gateway.get_document(document_id)?;
    let roster = io_roster::read_roster(gateway, &config.applicants)?;

    let mut created: Vec<String> = Vec::new();
    let mut failed: usize = 0;
    for category in config.categories.iter() {
        match create_category_form(gateway, config, &document, &roster, category) {
            Ok(form_id) => created.push(form_id),
            Err(e) => {
                warn!("Could not create the form for [{}]: {}", category.name, e);
                failed += 1;
            }
        }
    }
    ensure!(
        failed == 0,
        BatchFailedSnafu {
            failed,
            total: config.categories.len()
        }
    );
    Ok(created)
}

fn run_with(gateway: &dyn FormGateway, action: &Action, rs: &RunSettings) -> FResult<()> {
    match action {
        Action::ExportAllCandidates => {
            for_each_form(gateway, rs, |form| export_responses(gateway, form, rs))
        }
        Action::ExportRanking => for_each_form(gateway, rs, |form| export_ranking(gateway, form, rs)),
        Action::Temp => for_each_form(gateway, rs, |form| print_responses(gateway, form, rs)),
        Action::CreateAll => {
            let created = create_all(gateway, rs.config)?;
            info!("Created {} forms", created.len());
            Ok(())
        }
    }
}

pub fn run(args: &Args, config: &FormsConfig) -> FResult<()> {
    let out_dir = match args.out.as_deref() {
        Some(p) => Path::new(p).to_path_buf(),
        None => config.output_dir(),
    };
    let gateway = GoogleGateway::from_env(&config.endpoints)?;
    let rs = RunSettings {
        config,
        out_dir,
        form_ids: &args.form_id,
        timestamp: chrono::Local::now().naive_local(),
    };
    info!("Running {:?}", args.action);
    run_with(&gateway, &args.action, &rs)
}
