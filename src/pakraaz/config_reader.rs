use crate::pakraaz::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PakraazConfig {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "feedbackFilter")]
    pub feedback_filter: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

pub fn read_config(path: &str) -> PakraazResult<PakraazConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: PakraazConfig =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    info!("config: {:?}", config);
    Ok(config)
}

pub fn validate_tiebreak(mode: &str) -> PakraazResult<TieBreakMode> {
    match mode {
        "inputOrder" => Ok(TieBreakMode::InputOrder),
        "alphabetical" => Ok(TieBreakMode::Alphabetical),
        x => UnknownTieBreakSnafu { mode: x }.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiebreak_names() {
        assert_eq!(
            validate_tiebreak("inputOrder").unwrap(),
            TieBreakMode::InputOrder
        );
        assert_eq!(
            validate_tiebreak("alphabetical").unwrap(),
            TieBreakMode::Alphabetical
        );
        assert!(matches!(
            validate_tiebreak("random"),
            Err(PakraazError::UnknownTieBreak { .. })
        ));
    }

    #[test]
    fn config_file() {
        let path = format!("{}/testdata/pakraaz.json", env!("CARGO_MANIFEST_DIR"));
        let config = read_config(&path).unwrap();
        assert_eq!(config.tiebreak_mode.as_deref(), Some("alphabetical"));
        assert_eq!(config.feedback_filter.as_deref(), Some("recent"));
        assert_eq!(config.output_path, None);
    }

    #[test]
    fn config_rejects_unknown_keys() {
        let res = serde_json::from_str::<PakraazConfig>(r#"{"tiebreak": "alphabetical"}"#);
        assert!(res.is_err());
        let empty: PakraazConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PakraazConfig::default());
    }
}
