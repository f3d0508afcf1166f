use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub office: Option<String>,
    pub respondents: usize,
    pub method: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    /// The headers of the rank columns, in rank order.
    #[serde(rename = "choices")]
    pub choices: Option<Vec<String>>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RankRules {
    #[serde(rename = "stationaryMethod")]
    pub stationary_method: Option<String>,
    pub tolerance: Option<f64>,
    #[serde(rename = "maxIterations")]
    pub max_iterations: Option<u32>,
}

impl RankRules {
    pub fn validate(&self) -> RankResult<RankingRules> {
        let defaults = RankingRules::DEFAULT_RULES;
        let stationary_method = match self.stationary_method.as_deref() {
            None | Some("powerIteration") => StationaryMethod::PowerIteration,
            Some("directSolve") => StationaryMethod::DirectSolve,
            Some(x) => whatever!("unknown stationary method: {}", x),
        };
        let tolerance = match self.tolerance {
            None => defaults.tolerance,
            Some(x) if x > 0.0 && x.is_finite() => x,
            Some(x) => whatever!("tolerance must be a positive number, got {}", x),
        };
        let max_iterations = match self.max_iterations {
            None => defaults.max_iterations,
            Some(x) if x > 0 => x,
            Some(x) => whatever!("maxIterations must be positive, got {}", x),
        };
        Ok(RankingRules {
            stationary_method,
            tolerance,
            max_iterations,
        })
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "fileSources")]
    pub file_sources: Vec<FileSource>,
    #[serde(default)]
    pub rules: RankRules,
}

pub fn read_config(path: &str) -> BRankResult<RankConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RankConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: String) -> BRankResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let js = r#"{
            "outputSettings": {"contestName": "Lunch", "contestDate": "2022-10-21"},
            "fileSources": [{"provider": "csv", "filePath": "votes.csv"}],
            "rules": {"stationaryMethod": "directSolve", "maxIterations": 10}
        }"#;
        let config: RankConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.contest_name, "Lunch");
        assert_eq!(config.file_sources[0].provider, "csv");
        assert_eq!(config.file_sources[0].choices, None);
        let rules = config.rules.validate().unwrap();
        assert_eq!(rules.stationary_method, StationaryMethod::DirectSolve);
        assert_eq!(rules.max_iterations, 10);
        assert_eq!(rules.tolerance, RankingRules::DEFAULT_RULES.tolerance);
    }

    #[test]
    fn minimal_config() {
        let js = r#"{"fileSources": [{"provider": "xlsx", "filePath": "votes.xlsx",
            "excelWorksheetName": "Form1", "choices": ["first", "second"]}]}"#;
        let config: RankConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings, OutputSettings::default());
        assert_eq!(
            config.file_sources[0].excel_worksheet_name.as_deref(),
            Some("Form1")
        );
        assert_eq!(
            config.rules.validate().unwrap(),
            RankingRules::DEFAULT_RULES
        );
    }

    #[test]
    fn invalid_rules() {
        let rules = RankRules {
            stationary_method: Some("eigen".to_string()),
            ..RankRules::default()
        };
        assert!(rules.validate().is_err());
        let rules = RankRules {
            tolerance: Some(-1.0),
            ..RankRules::default()
        };
        assert!(rules.validate().is_err());
    }
}
