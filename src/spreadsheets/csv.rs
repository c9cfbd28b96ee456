// src/spreadsheets/csv.rs

//! Minimal CSV reader/writer for the fixed import and export schemas.

/// Split CSV text into records. Handles quoted fields, doubled quotes,
/// separators and line breaks inside quotes, and CRLF endings.
/// Blank lines are dropped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.iter().any(|f| !f.trim().is_empty()) {
        records.push(record);
    }
}

/// Quote every field, doubling embedded quotes.
pub fn write_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| format!("\"{}\"", f.as_ref().replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn write_csv<S: AsRef<str>>(header: &[&str], rows: &[Vec<S>]) -> String {
    let mut out = write_record(header);
    out.push_str("\r\n");
    for row in rows {
        out.push_str(&write_record(row));
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_and_embedded_separators() {
        let text = "Name,Remarks\r\n\"Shah, Priya\",\"said \"\"call later\"\"\"\r\n\r\nRavi,\"two\nlines\"\n";
        let rows = parse_csv(text);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["Shah, Priya", "said \"call later\""]);
        assert_eq!(rows[2], vec!["Ravi", "two\nlines"]);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let rows = parse_csv("a,b\n1,");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", ""]]);
    }

    #[test]
    fn writer_quotes_everything() {
        assert_eq!(write_record(&["a", "He said \"hi\"", ""]), "\"a\",\"He said \"\"hi\"\"\",\"\"");
        let parsed = parse_csv(&write_csv(&["x"], &[vec!["1, 2"]]));
        assert_eq!(parsed, vec![vec!["x"], vec!["1, 2"]]);
    }
}
