use chrono::NaiveDate;

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect()
}

/// `{subject}_{kind}_{YYYY-MM-DD}.pdf`, dated by the export, not by the data.
pub fn output_file_name(subject: &str, report_kind: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.pdf",
        sanitize(subject),
        sanitize(report_kind),
        date.format("%Y-%m-%d")
    )
}

pub fn output_file_name_today(subject: &str, report_kind: &str) -> String {
    output_file_name(subject, report_kind, chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            output_file_name("Jane Doe", "cards", date),
            "Jane Doe_cards_2024-03-07.pdf"
        );
    }

    #[test]
    fn separators_replaced() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            output_file_name("a/b", r"c\d", date),
            "a-b_c-d_2024-12-31.pdf"
        );
    }
}
