// Ranked ballots stored one per line, one column per rank.

use std::fs::File;

use crate::tally::{io_common::make_default_id_lineno, *};

pub fn read_csv_ranking(path: String, cfs: &FileSource) -> BVoteItResult<Vec<ParsedBallot>> {
    let default_id = make_default_id_lineno(&path);

    let id_idx_o = cfs.id_column_index()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let count_idx_o = cfs.count_column_index()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    let (records, row_offset) = get_records(&path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        let id = match id_idx_o {
            Some(id_idx) => line
                .get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .to_string(),
            None => default_id(lineno),
        };

        let count: Option<u64> = match count_idx_o {
            Some(count_idx) => {
                let content = line
                    .get(count_idx)
                    .context(CsvLineTooShortSnafu { lineno })?
                    .trim();
                let count = content
                    .parse::<u64>()
                    .ok()
                    .context(CsvWrongCountSnafu { lineno, content })?;
                Some(count)
            }
            None => None,
        };

        let choices: Vec<String> = line
            .iter()
            .skip(choices_start_col)
            .map(|s| s.to_string())
            .collect();
        debug!("read_csv_ranking: lineno: {:?} row: {:?}", lineno, &choices);

        res.push(ParsedBallot {
            id: Some(id),
            count,
            choices,
        });
    }
    Ok(res)
}

fn get_records(
    path: &str,
    cfs: &FileSource,
) -> VoteItResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn plain_rankings() {
        let f = write_csv("Anna,Bob\nBob,,Clara\n");
        let path = f.path().display().to_string();
        let cfs = FileSource::new("csv", &path);
        let res = read_csv_ranking(path, &cfs).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].choices, vec!["Anna", "Bob"]);
        assert_eq!(res[0].count, None);
        assert!(res[0].id.as_ref().unwrap().ends_with("-00000001"));
        assert_eq!(res[1].choices, vec!["Bob", "", "Clara"]);
    }

    #[test]
    fn header_ids_and_counts() {
        let f = write_csv("id,count,r1,r2\nb1,3,Anna,Bob\nb2,1,Bob\n");
        let path = f.path().display().to_string();
        let mut cfs = FileSource::new("csv", &path);
        cfs.first_vote_row_index = Some(json!(2));
        cfs.id_column_index = Some(json!("A"));
        cfs.count_column_index = Some(json!(2));
        cfs.first_vote_column_index = Some(json!(3));
        let res = read_csv_ranking(path, &cfs).unwrap();
        assert_eq!(
            res,
            vec![
                ParsedBallot {
                    id: Some("b1".to_string()),
                    count: Some(3),
                    choices: vec!["Anna".to_string(), "Bob".to_string()],
                },
                ParsedBallot {
                    id: Some("b2".to_string()),
                    count: Some(1),
                    choices: vec!["Bob".to_string()],
                },
            ]
        );
    }

    #[test]
    fn bad_count() {
        let f = write_csv("x,Anna\n");
        let path = f.path().display().to_string();
        let mut cfs = FileSource::new("csv", &path);
        cfs.count_column_index = Some(json!(1));
        cfs.first_vote_column_index = Some(json!(2));
        let res = read_csv_ranking(path, &cfs);
        assert!(matches!(
            res.map_err(|e| *e),
            Err(VoteItError::CsvWrongCount { lineno: 1, .. })
        ));
    }

    #[test]
    fn missing_file() {
        let cfs = FileSource::new("csv", "/nonexistent/votes.csv");
        assert!(read_csv_ranking("/nonexistent/votes.csv".to_string(), &cfs).is_err());
    }
}
