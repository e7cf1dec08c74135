use chrono::NaiveDateTime;

pub const RESPONSES_LABEL: &str = "responses";
pub const RANKING_LABEL: &str = "rank";

/// Replaces the characters that cannot appear in a file name on common platforms.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

/// The name of an export: `{label}_{timestamp}_{formTitle}.csv`.
pub fn export_file_name(label: &str, form_title: &str, timestamp: &NaiveDateTime) -> String {
    let ts = timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    sanitize_file_name(&format!("{}_{}_{}.csv", label, ts, form_title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn file_names_are_safe() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(14, 5, 9, 120)
            .unwrap();
        assert_eq!(
            export_file_name(RANKING_LABEL, "Project", &ts),
            "rank_2024-03-01T14_05_09.000120_Project.csv"
        );
        assert_eq!(
            export_file_name(
                RESPONSES_LABEL,
                "Achievement in Social & Environmental Impact/2024",
                &ts
            ),
            "responses_2024-03-01T14_05_09.000120_Achievement in Social & Environmental Impact_2024.csv"
        );
    }
}
