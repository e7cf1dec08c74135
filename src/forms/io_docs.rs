// Reads the award descriptions out of the structured content of a document.

use crate::forms::*;

/// The title of an award and its scoring criteria.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AwardInfo {
    pub title: String,
    pub criteria: Vec<String>,
}

fn text_at<'a>(js: &'a JSValue, pointer: &str) -> FResult<&'a str> {
    js.pointer(pointer)
        .and_then(|v| v.as_str())
        .context(DocumentLayoutSnafu {
            message: format!("no text at {}", pointer),
        })
}

/// The award title is the first text run of the paragraph at `title_paragraph`
/// in the document body. The criteria are the first cells of the rows of the
/// table at `criteria_table`, without the header row.
pub fn award_info(
    document: &JSValue,
    title_paragraph: usize,
    criteria_table: usize,
) -> FResult<AwardInfo> {
    let title = text_at(
        document,
        &format!(
            "/body/content/{}/paragraph/elements/0/textRun/content",
            title_paragraph
        ),
    )?
    .trim()
    .to_string();

    let rows_ptr = format!("/body/content/{}/table/tableRows", criteria_table);
    let rows = document
        .pointer(&rows_ptr)
        .and_then(|v| v.as_array())
        .context(DocumentLayoutSnafu {
            message: format!("no table at {}", rows_ptr),
        })?;
    let mut criteria: Vec<String> = Vec::new();
    for row in rows.iter().skip(1) {
        let cell = text_at(
            row,
            "/tableCells/0/content/0/paragraph/elements/0/textRun/content",
        )?;
        criteria.push(cell.trim().to_string());
    }
    debug!("award_info: {:?}: {:?}", title, criteria);
    Ok(AwardInfo { title, criteria })
}
