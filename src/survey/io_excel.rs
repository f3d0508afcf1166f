// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::survey::{
    io_common::{assemble_choices, make_default_id, rank_columns},
    *,
};

pub fn read_excel_ranking(path: String, cfs: &FileSource) -> BRankResult<Vec<ParsedRanking>> {
    let default_id = make_default_id(&path);
    let wrange = get_range(&path, cfs)?;

    let mut iter = wrange.rows();
    let header_cells = iter.next().context(EmptyExcelSnafu { path: path.clone() })?;
    let header: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| read_cell(cell, 1, idx))
        .collect::<RankResult<Vec<String>>>()?;
    debug!("read_excel_ranking: header: {:?}", header);
    let columns = rank_columns(&header, &cfs.choices)?;

    let mut res: Vec<ParsedRanking> = Vec::new();
    for (idx, cells) in iter.enumerate() {
        // The header is row 1.
        let lineno = idx + 2;
        let row: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| read_cell(cell, lineno, col))
            .collect::<RankResult<Vec<String>>>()?;
        let id = default_id(lineno);
        match assemble_choices(&row, &columns, &id)? {
            Some(choices) => {
                debug!(
                    "read_excel_ranking: lineno: {:?} choices: {:?}",
                    lineno, &choices
                );
                res.push(ParsedRanking { id, choices });
            }
            None => {
                warn!(
                    "read_excel_ranking: lineno: {:?}: empty row, skipping",
                    lineno
                );
            }
        }
    }
    Ok(res)
}

fn get_range(path: &str, cfs: &FileSource) -> BRankResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &cfs.excel_worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

// Option names may be typed as numbers in a spreadsheet.
fn read_cell(cell: &DataType, lineno: usize, col: usize) -> RankResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("column {}: {:?}", col + 1, cell),
        }
        .fail(),
    }
}
