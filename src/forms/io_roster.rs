// The roster of applicants, read from a spreadsheet.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::forms::config_reader::ApplicantsSettings;
use crate::forms::gateway::FormGateway;
use crate::forms::*;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Applicant {
    pub name: String,
    pub applicant_type: String,
    pub category: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Roster {
    pub applicants: Vec<Applicant>,
}

impl Roster {
    /// The names of the applicants of a given type in a category, in roster order.
    pub fn group(&self, applicant_type: &str, category: &str) -> Vec<String> {
        self.applicants
            .iter()
            .filter(|a| a.applicant_type == applicant_type && a.category == category)
            .map(|a| a.name.clone())
            .collect()
    }
}

fn column_position(header: &[String], name: &str) -> FResult<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .context(RosterSnafu {
            message: format!("missing column {:?} in header {:?}", name, header),
        })
}

/// Builds the roster from rows of cells. The first row is the header. Rows
/// without a name are skipped, short rows are padded with empty cells.
pub fn roster_from_rows(rows: &[Vec<String>], settings: &ApplicantsSettings) -> FResult<Roster> {
    let header = rows.first().context(RosterSnafu {
        message: "the roster is empty".to_string(),
    })?;
    let name_idx = column_position(header, &settings.name_column)?;
    let type_idx = column_position(header, &settings.applicant_type_column)?;
    let category_idx = column_position(header, &settings.category_column)?;

    let cell = |row: &Vec<String>, idx: usize| -> String {
        row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
    };

    let mut applicants: Vec<Applicant> = Vec::new();
    for (lineno, row) in rows.iter().enumerate().skip(1) {
        let name = cell(row, name_idx);
        if name.is_empty() {
            debug!("roster_from_rows: line {}: no name, skipping", lineno + 1);
            continue;
        }
        applicants.push(Applicant {
            name,
            applicant_type: cell(row, type_idx),
            category: cell(row, category_idx),
        });
    }
    info!("Read {} applicants", applicants.len());
    Ok(Roster { applicants })
}

/// Turns column-major values into row-major ones.
fn transpose(columns: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let height = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    (0..height)
        .map(|i| {
            columns
                .iter()
                .map(|c| c.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

fn read_calamine_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        x => format!("{:?}", x),
    }
}

fn read_excel_rows(path: &str, worksheet_name: Option<&str>) -> FResult<Vec<Vec<String>>> {
    debug!("read_excel_rows: path: {:?} worksheet: {:?}", path, worksheet_name);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange_o = match worksheet_name {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    let wrange = wrange_o
        .context(RosterSnafu {
            message: format!("no worksheet {:?} in {}", worksheet_name, path),
        })?
        .context(OpeningExcelSnafu { path })?;
    Ok(wrange
        .rows()
        .map(|row| row.iter().map(read_calamine_cell).collect())
        .collect())
}

/// Reads the roster from the local Excel file when one is configured, and
/// from the remote spreadsheet otherwise.
pub fn read_roster(gateway: &dyn FormGateway, settings: &ApplicantsSettings) -> FResult<Roster> {
    let rows = if let Some(path) = settings.file_path.as_deref() {
        info!("Reading the roster from {:?}", path);
        read_excel_rows(path, settings.excel_worksheet_name.as_deref())?
    } else {
        let spreadsheet_id = settings.spreadsheet_id.as_deref().context(RosterSnafu {
            message: "no spreadsheet id (SPREADSHEET_ID) and no roster file".to_string(),
        })?;
        let range = settings.range.as_deref().context(RosterSnafu {
            message: "no range (RANGE) for the roster spreadsheet".to_string(),
        })?;
        let major_dimension = settings.major_dimension.as_deref().unwrap_or("ROWS");
        info!("Reading the roster from spreadsheet {} ({})", spreadsheet_id, range);
        let values = gateway.get_sheet_values(spreadsheet_id, range, major_dimension)?;
        if major_dimension.eq_ignore_ascii_case("COLUMNS") {
            transpose(values)
        } else {
            values
        }
    };
    roster_from_rows(&rows, settings)
}
