// Primitives for writing CSV files.

use chrono::NaiveDateTime;
use csv::Writer;

use crate::forms::{io_common::export_file_name, *};

/// The response table as CSV: a header row, then one row per table row. The
/// first column is the row number, with an empty header.
pub fn response_table_csv(table: &ResponseTable, target: &str) -> FResult<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());
    let mut header: Vec<&str> = vec![""];
    header.extend(table.columns.iter().map(|h| h.name.as_str()));
    wtr.write_record(&header)
        .context(CsvSnafu { path: target })?;
    for (idx, row) in table.rows.iter().enumerate() {
        let mut record: Vec<String> = vec![idx.to_string()];
        record.extend(row.iter().map(|c| c.to_string()));
        wtr.write_record(&record)
            .context(CsvSnafu { path: target })?;
    }
    finish(wtr, target)
}

/// The ranking as CSV, best candidate first. Unscored candidates have an empty score.
pub fn ranking_csv(ranking: &[CandidateScore], target: &str) -> FResult<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["", CANDIDATE_COLUMN, "score", "scored_rows"])
        .context(CsvSnafu { path: target })?;
    for (idx, cs) in ranking.iter().enumerate() {
        let score = cs.score.map(|s| s.to_string()).unwrap_or_default();
        wtr.write_record([
            idx.to_string(),
            cs.candidate.clone(),
            score,
            cs.scored_rows.to_string(),
        ])
        .context(CsvSnafu { path: target })?;
    }
    finish(wtr, target)
}

fn finish(wtr: Writer<Vec<u8>>, target: &str) -> FResult<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| e.into_error())
        .context(IoSnafu { path: target })
}

/// Writes a finished export into the output directory (created when needed).
/// Returns the path of the new file.
pub fn write_export(
    out_dir: &Path,
    label: &str,
    form_title: &str,
    timestamp: &NaiveDateTime,
    contents: &[u8],
) -> FResult<PathBuf> {
    fs::create_dir_all(out_dir).context(IoSnafu {
        path: out_dir.display().to_string(),
    })?;
    let p = out_dir.join(export_file_name(label, form_title, timestamp));
    fs::write(&p, contents).context(IoSnafu {
        path: p.display().to_string(),
    })?;
    info!("Wrote {:?}", p);
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResponseTable {
        ResponseTable {
            columns: vec![
                ColumnHeader {
                    name: CANDIDATE_COLUMN.to_string(),
                    kind: ColumnKind::Candidate,
                },
                ColumnHeader {
                    name: "Impact".to_string(),
                    kind: ColumnKind::Criterion,
                },
                ColumnHeader {
                    name: "Judge Name".to_string(),
                    kind: ColumnKind::Metadata,
                },
            ],
            candidates: vec!["Alice".to_string(), "Bob".to_string()],
            rows: vec![
                vec![
                    Cell::Text("Alice".to_string()),
                    Cell::Integer(8),
                    Cell::Text("Jane, PhD".to_string()),
                ],
                vec![Cell::Text("Bob".to_string()), Cell::Float(7.5), Cell::Missing],
            ],
        }
    }

    #[test]
    fn writes_response_table() {
        let bytes = response_table_csv(&table(), "test").unwrap();
        let s = String::from_utf8(bytes).unwrap();
        assert_eq!(
            s,
            ",candidate,Impact,Judge Name\n0,Alice,8,\"Jane, PhD\"\n1,Bob,7.5,\n"
        );
    }

    #[test]
    fn writes_ranking() {
        let ranking = vec![
            CandidateScore {
                candidate: "Bob".to_string(),
                score: Some(8.0),
                scored_rows: 2,
            },
            CandidateScore {
                candidate: "Carol".to_string(),
                score: None,
                scored_rows: 0,
            },
        ];
        let s = String::from_utf8(ranking_csv(&ranking, "test").unwrap()).unwrap();
        assert_eq!(s, ",candidate,score,scored_rows\n0,Bob,8,2\n1,Carol,,0\n");
    }

    #[test]
    fn creates_the_output_directory() {
        let dir = std::env::temp_dir().join(format!("awardforms-csv-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let p = write_export(&dir.join("nested"), "rank", "Project", &ts, b"x\n").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "x\n");
        assert!(p
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("rank_2024-01-02T03_04_05"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
