use crate::model::entry::Entry;

pub const TABLE_HEADER: [&str; 8] = [
    "RowNumber",
    "SheetName",
    "Context",
    "Key",
    "Utterer",
    "SourceEnglish",
    "TranslatedDutch",
    "ProcessedAt",
];

pub fn parse(text: &str) -> Result<Vec<Entry>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format!("failed to read csv header: {e}"))?;
    let got: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    if got != TABLE_HEADER {
        return Err(format!(
            "unexpected csv header: expected {:?}, got {:?}",
            TABLE_HEADER.join(","),
            got.join(",")
        ));
    }

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        if record.len() != TABLE_HEADER.len() {
            skipped += 1;
            continue;
        }

        // RowNumber inválido não derruba a linha: cai na posição 1-based
        let row_number = record[0]
            .trim()
            .parse::<usize>()
            .unwrap_or(i + 1);

        entries.push(Entry {
            row_number,
            sheet_name: record[1].to_string(),
            context: record[2].to_string(),
            utterer: record[4].to_string(),
            source_text: record[5].to_string(),
            translated_text: record[6].to_string(),
        });
    }

    if skipped > 0 {
        eprintln!("[table] skipped {skipped} malformed csv rows");
    }

    Ok(entries)
}

// Serializa de volta no mesmo layout de 8 colunas. Key é derivada
// (sheet:row) e ProcessedAt vem do chamador.
pub fn render(entries: &[Entry], processed_at: &str) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(TABLE_HEADER)
        .map_err(|e| format!("failed to write csv header: {e}"))?;

    for entry in entries {
        writer
            .write_record([
                entry.row_number.to_string().as_str(),
                &entry.sheet_name,
                &entry.context,
                &entry.row_key(),
                &entry.utterer,
                &entry.source_text,
                &entry.translated_text,
                processed_at,
            ])
            .map_err(|e| format!("failed to write csv row: {e}"))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("failed to flush csv: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("csv output was not utf-8: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
RowNumber,SheetName,Context,Key,Utterer,SourceEnglish,TranslatedDutch,ProcessedAt
2,Chapter1,intro,Chapter1:2,Trusty Ass,\"Well, Hello there, friend\",\"Nou, hallo daar, vriend\",2024-01-01
3,Chapter1,intro,Chapter1:3,,Hello there,Hallo daar,2024-01-01
";

    #[test]
    fn parses_the_eight_column_layout() {
        let entries = parse(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].row_number, 2);
        assert_eq!(entries[0].sheet_name, "Chapter1");
        assert_eq!(entries[0].utterer, "Trusty Ass");
        assert_eq!(entries[0].source_text, "Well, Hello there, friend");
        assert_eq!(entries[0].translated_text, "Nou, hallo daar, vriend");
        assert_eq!(entries[1].utterer, "");
    }

    #[test]
    fn rejects_foreign_header() {
        let err = parse("a,b,c\n1,2,3\n").unwrap_err();
        assert!(err.contains("unexpected csv header"));
    }

    #[test]
    fn bad_row_number_falls_back_to_position() {
        let text = "\
RowNumber,SheetName,Context,Key,Utterer,SourceEnglish,TranslatedDutch,ProcessedAt
oops,S,,S:1,,src,dst,
";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].row_number, 1);
    }

    #[test]
    fn short_rows_are_skipped() {
        let text = "\
RowNumber,SheetName,Context,Key,Utterer,SourceEnglish,TranslatedDutch,ProcessedAt
1,S,,k,,src,dst,
2,S,only-three
";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_text, "src");
    }

    #[test]
    fn render_round_trips_quotes_and_newlines() {
        let entries = vec![Entry {
            row_number: 7,
            sheet_name: "Chapter2".to_string(),
            context: "sign text".to_string(),
            utterer: "Wise Ox".to_string(),
            source_text: "He said \"go\",\nthen left".to_string(),
            translated_text: "Hij zei \"ga\",\ntoen vertrok hij".to_string(),
        }];

        let text = render(&entries, "2024-06-01T12:00:00Z").unwrap();
        let back = parse(&text).unwrap();

        assert_eq!(back, entries);
        assert!(text.contains("Chapter2:7"));
        assert!(text.contains("2024-06-01T12:00:00Z"));
    }

    #[test]
    fn render_emits_the_expected_header() {
        let text = render(&[], "").unwrap();
        assert!(text.starts_with(
            "RowNumber,SheetName,Context,Key,Utterer,SourceEnglish,TranslatedDutch,ProcessedAt"
        ));
    }
}
