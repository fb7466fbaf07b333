use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Ballot ids for sources without an id column: `<file name>-<line number>`.
pub fn make_default_id_lineno(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids() {
        let default_id = make_default_id_lineno("/tmp/data/votes.csv");
        assert_eq!(default_id(3), "votes.csv-00000003");
        assert_eq!(simplify_file_name("ballots.xlsx"), "ballots.xlsx");
    }
}
