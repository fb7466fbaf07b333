// Microsoft Forms exports: one response per row, the ranking in a single
// cell with the choices separated by ';'.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::tally::{io_common::make_default_id_lineno, *};

pub fn read_msforms_ranking(path: String, cfs: &FileSource) -> BVoteItResult<Vec<ParsedBallot>> {
    let default_id = make_default_id_lineno(&path);

    let wrange = get_range(&path, cfs)?;

    let header = wrange.rows().next().context(EmptyExcelSnafu {})?;
    debug!("read_msforms_ranking: header: {:?}", header);
    let start_range = cfs.first_vote_column_index()?;

    let mut iter = wrange.rows();
    // The first row holds the questions.
    iter.next();
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let choices: Vec<String> = match row.get(start_range) {
            Some(DataType::String(s)) => s.split(';').map(|s| s.to_string()).collect(),
            Some(DataType::Empty) | None => vec![],
            Some(cell) => {
                return Err(Box::new(VoteItError::ExcelWrongCellType {
                    lineno,
                    content: format!("{:?}", cell),
                }));
            }
        };
        debug!("read_msforms_ranking: lineno: {:?} row: {:?}", lineno, &choices);

        res.push(ParsedBallot {
            id: Some(default_id(lineno)),
            // Forms responses carry no weight.
            count: Some(1),
            choices,
        });
    }
    Ok(res)
}

fn get_range(path: &str, cfs: &FileSource) -> BVoteItResult<Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &cfs.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &cfs.excel_worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?,
        None => workbook
            .worksheet_range_at(0)
            .context(MissingWorksheetSnafu { name: "<first>" })?,
    }
    .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}
