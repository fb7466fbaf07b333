use crate::tally::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The `config` block of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
    pub method: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    pub first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    pub first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "countColumnIndex")]
    pub count_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

// All the indices in the configuration are 1-based. The accessors return
// 0-based positions.
impl FileSource {
    pub fn new(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            first_vote_column_index: None,
            first_vote_row_index: None,
            id_column_index: None,
            count_column_index: None,
            excel_worksheet_name: None,
        }
    }

    pub fn first_vote_column_index(&self) -> VoteItResult<usize> {
        Ok(read_js_int(&self.first_vote_column_index)?.unwrap_or(1) - 1)
    }

    pub fn first_vote_row_index(&self) -> VoteItResult<usize> {
        Ok(read_js_int(&self.first_vote_row_index)?.unwrap_or(1) - 1)
    }

    pub fn id_column_index(&self) -> VoteItResult<Option<usize>> {
        Ok(read_js_int(&self.id_column_index)?.map(|x| x - 1))
    }

    pub fn count_column_index(&self) -> VoteItResult<Option<usize>> {
        Ok(read_js_int(&self.count_column_index)?.map(|x| x - 1))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    pub name: String,
    pub code: Option<String>,
    pub excluded: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    pub method: String,
    #[serde(rename = "rulesDescription")]
    pub rules_description: Option<String>,
}

impl ConfigRules {
    pub fn method_kind(&self) -> VoteItResult<MethodKind> {
        parse_method(&self.method)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources")]
    pub cvr_file_sources: Vec<FileSource>,
    #[serde(default)]
    pub candidates: Vec<ConfigCandidate>,
    pub rules: ConfigRules,
}

impl ElectionConfig {
    /// The running candidates, in configuration order.
    pub fn running_candidates(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|c| !c.excluded.unwrap_or(false))
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn excluded_candidates(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|c| c.excluded.unwrap_or(false))
            .map(|c| c.name.clone())
            .collect()
    }
}

pub fn parse_method(name: &str) -> VoteItResult<MethodKind> {
    match name.to_lowercase().as_str() {
        "majority" | "plurality" => Ok(MethodKind::Majority),
        "schulze" => Ok(MethodKind::Schulze),
        _ => Err(VoteItError::UnknownMethod {
            method: name.to_string(),
        }),
    }
}

pub fn read_config(path: &str) -> VoteItResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> VoteItResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

// Numbers, numeric strings or Excel-style column letters (A, B, ..., AA).
fn read_js_int(x: &Option<JSValue>) -> VoteItResult<Option<usize>> {
    let idx = match x {
        None | Some(JSValue::Null) => return Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {})?,
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_uppercase()
                .bytes()
                .try_fold(0usize, |acc, b| {
                    acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize)
                })
                .context(ParsingJsonNumberSnafu {})?
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {})?,
        Some(v) => whatever!("cannot read a column or row index from {}", v),
    };
    if idx == 0 {
        whatever!("indices are 1-based, found 0");
    }
    Ok(Some(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let js = r#"{
            "outputSettings": {
                "contestName": "Lunch",
                "contestDate": "2026-10-16"
            },
            "cvrFileSources": [
                {
                    "provider": "csv",
                    "filePath": "votes.csv",
                    "firstVoteColumnIndex": "C",
                    "firstVoteRowIndex": 2,
                    "idColumnIndex": "1",
                    "countColumnIndex": 2
                }
            ],
            "candidates": [
                {"name": "Pizza"},
                {"name": "Sushi", "code": "S"},
                {"name": "Kebab", "excluded": true}
            ],
            "rules": {"method": "Schulze"}
        }"#;
        let config: ElectionConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.contest_name, "Lunch");
        assert_eq!(config.rules.method_kind().unwrap(), MethodKind::Schulze);
        assert_eq!(config.running_candidates(), vec!["Pizza", "Sushi"]);
        assert_eq!(config.excluded_candidates(), vec!["Kebab"]);

        let cfs = &config.cvr_file_sources[0];
        assert_eq!(cfs.first_vote_column_index().unwrap(), 2);
        assert_eq!(cfs.first_vote_row_index().unwrap(), 1);
        assert_eq!(cfs.id_column_index().unwrap(), Some(0));
        assert_eq!(cfs.count_column_index().unwrap(), Some(1));
    }

    #[test]
    fn default_indices() {
        let cfs = FileSource::new("csv", "votes.csv");
        assert_eq!(cfs.first_vote_column_index().unwrap(), 0);
        assert_eq!(cfs.first_vote_row_index().unwrap(), 0);
        assert_eq!(cfs.id_column_index().unwrap(), None);
        assert_eq!(cfs.count_column_index().unwrap(), None);
    }

    #[test]
    fn column_letters() {
        assert_eq!(read_js_int(&Some(JSValue::from("a"))).unwrap(), Some(1));
        assert_eq!(read_js_int(&Some(JSValue::from("Z"))).unwrap(), Some(26));
        assert_eq!(read_js_int(&Some(JSValue::from("AB"))).unwrap(), Some(28));
        assert!(read_js_int(&Some(JSValue::from(0))).is_err());
        assert!(read_js_int(&Some(JSValue::from("1x"))).is_err());
    }

    #[test]
    fn overlong_column_letters_are_rejected() {
        let letters = "Z".repeat(20);
        assert!(matches!(
            read_js_int(&Some(JSValue::from(letters.as_str()))),
            Err(VoteItError::ParsingJsonNumber {})
        ));
        let mut cfs = FileSource::new("csv", "votes.csv");
        cfs.first_vote_column_index = Some(JSValue::from("Z".repeat(14)));
        assert!(cfs.first_vote_column_index().is_err());
    }

    #[test]
    fn method_names() {
        assert_eq!(parse_method("majority").unwrap(), MethodKind::Majority);
        assert_eq!(parse_method("Plurality").unwrap(), MethodKind::Majority);
        assert!(matches!(
            parse_method("irv"),
            Err(VoteItError::UnknownMethod { .. })
        ));
    }
}
