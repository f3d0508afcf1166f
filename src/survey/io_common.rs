use std::path::Path;

use regex::Regex;

use crate::survey::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Finds the columns holding the ranks, in rank order.
///
/// If the labels of the choices are provided, they must all appear in the header. Otherwise the
/// rank columns are the ones marked with `(#N)`, ordered by `N`.
pub fn rank_columns(header: &[String], choices: &Option<Vec<String>>) -> RankResult<Vec<usize>> {
    if let Some(labels) = choices {
        let mut res: Vec<usize> = Vec::new();
        for label in labels.iter() {
            let idx = header
                .iter()
                .position(|h| h.trim() == label.trim())
                .context(MissingChoiceColumnSnafu { name: label })?;
            res.push(idx);
        }
        return Ok(res);
    }

    let rank_re = Regex::new(r"\(#([0-9]+)\)").map_err(|e| RankError::Whatever {
        message: "invalid rank marker pattern".to_string(),
        source: Some(Box::new(e)),
    })?;
    let mut ranked: Vec<(u32, usize)> = Vec::new();
    for (idx, h) in header.iter().enumerate() {
        if let Some(rank) = rank_re
            .captures(h)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            ensure!(
                !ranked.iter().any(|(r, _)| *r == rank),
                DuplicateRankColumnSnafu { rank }
            );
            ranked.push((rank, idx));
        }
    }
    ensure!(!ranked.is_empty(), NoRankColumnsSnafu {});
    ranked.sort_by_key(|(rank, _)| *rank);
    debug!("rank_columns: {:?}", ranked);
    Ok(ranked.iter().map(|(_, idx)| *idx).collect())
}

/// Extracts the ranking of one row, or None if the row has no choice at all.
///
/// A row with some of the rank cells left blank is a partial ranking, and is rejected.
pub fn assemble_choices(
    row: &[String],
    columns: &[usize],
    id: &str,
) -> RankResult<Option<Vec<String>>> {
    let choices: Vec<String> = columns
        .iter()
        .map(|idx| row.get(*idx).map(|s| s.trim().to_string()).unwrap_or_default())
        .collect();
    if choices.iter().all(|s| s.is_empty()) {
        return Ok(None);
    }
    ensure!(
        choices.iter().all(|s| !s.is_empty()),
        PartialRankingSnafu { id }
    );
    Ok(Some(choices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rank_markers() {
        let h = header(&[
            "Timestamp",
            "Rank [Third (#3)]",
            "Rank [First (#1)]",
            "Email",
            "Rank [Second (#2)]",
        ]);
        assert_eq!(rank_columns(&h, &None).unwrap(), vec![2, 4, 1]);
    }

    #[test]
    fn explicit_choices() {
        let h = header(&["id", "second", "first"]);
        let choices = Some(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(rank_columns(&h, &choices).unwrap(), vec![2, 1]);
        let choices = Some(vec!["third".to_string()]);
        assert!(matches!(
            rank_columns(&h, &choices),
            Err(RankError::MissingChoiceColumn { .. })
        ));
    }

    #[test]
    fn missing_or_duplicate_markers() {
        assert!(matches!(
            rank_columns(&header(&["a", "b"]), &None),
            Err(RankError::NoRankColumns {})
        ));
        assert!(matches!(
            rank_columns(&header(&["a (#1)", "b (#1)"]), &None),
            Err(RankError::DuplicateRankColumn { rank: 1 })
        ));
    }

    #[test]
    fn blank_rows() {
        let row = header(&["x", " A ", "C", "B"]);
        assert_eq!(
            assemble_choices(&row, &[1, 3, 2], "r1").unwrap(),
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
        assert_eq!(
            assemble_choices(&header(&["x", " ", ""]), &[1, 2], "r2").unwrap(),
            None
        );
    }

    #[test]
    fn partial_rows() {
        let row = header(&["x", " A ", "", "B"]);
        match assemble_choices(&row, &[1, 3, 2], "r3") {
            Err(RankError::PartialRanking { id }) => assert_eq!(id, "r3"),
            res => panic!("unexpected result {:?}", res),
        }
        // A missing trailing cell counts as blank.
        assert!(matches!(
            assemble_choices(&header(&["x", "A"]), &[1, 2], "r4"),
            Err(RankError::PartialRanking { .. })
        ));
    }

    #[test]
    fn default_ids() {
        let f = make_default_id("/tmp/data/votes.csv");
        assert_eq!(f(3), "votes.csv-00000003");
    }
}
