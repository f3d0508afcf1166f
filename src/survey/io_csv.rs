// Primitives for reading CSV files.

use crate::survey::{
    io_common::{assemble_choices, make_default_id, rank_columns},
    *,
};

pub fn read_csv_ranking(path: String, cfs: &FileSource) -> BRankResult<Vec<ParsedRanking>> {
    let default_id = make_default_id(&path);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&path)
        .context(CsvOpenSnafu { path: path.clone() })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_ranking: header: {:?}", header);
    let columns = rank_columns(&header, &cfs.choices)?;

    let mut res: Vec<ParsedRanking> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let row: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        let id = default_id(lineno);
        match assemble_choices(&row, &columns, &id)? {
            Some(choices) => {
                debug!(
                    "read_csv_ranking: lineno: {:?} choices: {:?}",
                    lineno, &choices
                );
                res.push(ParsedRanking { id, choices });
            }
            None => {
                warn!("read_csv_ranking: lineno: {:?}: empty row, skipping", lineno);
            }
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(file: &str) -> (String, FileSource) {
        let path = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), file);
        (
            path.clone(),
            FileSource {
                provider: "csv".to_string(),
                file_path: path,
                excel_worksheet_name: None,
                choices: None,
            },
        )
    }

    #[test]
    fn google_forms_export() {
        let (path, cfs) = source("lunch.csv");
        let res = read_csv_ranking(path, &cfs).unwrap();
        assert_eq!(res.len(), 3);
        assert_eq!(res[0].id, "lunch.csv-00000002");
        assert_eq!(res[0].choices, vec!["Pizza", "Sushi", "Tacos"]);
        assert_eq!(res[2].choices, vec!["Sushi", "Tacos", "Pizza"]);
    }

    #[test]
    fn shuffled_rank_columns_and_blank_rows() {
        let (path, cfs) = source("shuffled_columns.csv");
        let res = read_csv_ranking(path, &cfs).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].choices, vec!["A", "B", "C"]);
        assert_eq!(res[1].choices, vec!["C", "A", "B"]);
        assert_eq!(res[1].id, "shuffled_columns.csv-00000004");
    }

    #[test]
    fn explicit_choices() {
        let (path, mut cfs) = source("plain.csv");
        cfs.choices = Some(vec!["first".to_string(), "second".to_string()]);
        let res = read_csv_ranking(path, &cfs).unwrap();
        assert_eq!(res[0].choices, vec!["X", "Y"]);
    }

    #[test]
    fn partial_ranking_in_first_row() {
        let (path, cfs) = source("partial.csv");
        let err = read_csv_ranking(path, &cfs).unwrap_err();
        match *err {
            RankError::PartialRanking { ref id } => assert_eq!(id, "partial.csv-00000002"),
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn missing_file() {
        let (path, cfs) = source("does_not_exist.csv");
        let err = read_csv_ranking(path, &cfs).unwrap_err();
        assert!(matches!(*err, RankError::CsvOpen { .. }));
    }
}
