use crate::error::SentimentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TV programs tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Program {
    #[serde(rename = "Master Chef")]
    MasterChef,
    #[serde(rename = "The Voice")]
    TheVoice,
}

impl Program {
    pub const ALL: [Program; 2] = [Program::MasterChef, Program::TheVoice];

    pub fn name(self) -> &'static str {
        match self {
            Program::MasterChef => "Master Chef",
            Program::TheVoice => "The Voice",
        }
    }

    /// Name with spaces replaced by underscores, as used in data file names.
    pub fn file_stem(self) -> String {
        self.name().replace(' ', "_")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Program {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Program::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s) || p.file_stem().eq_ignore_ascii_case(s))
            .ok_or_else(|| SentimentError::UnknownProgram(s.to_string()))
    }
}

/// Closed set of sentiment labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Draw probability used by the mock generator.
    pub fn weight(self) -> f64 {
        match self {
            Sentiment::Positive => 0.60,
            Sentiment::Neutral => 0.25,
            Sentiment::Negative => 0.15,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Sentiment::Positive => "green",
            Sentiment::Neutral => "lightblue",
            Sentiment::Negative => "red",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_program_by_name_or_file_stem() {
        assert_eq!("Master Chef".parse::<Program>().unwrap(), Program::MasterChef);
        assert_eq!("the_voice".parse::<Program>().unwrap(), Program::TheVoice);
        assert!("Big Brother".parse::<Program>().is_err());
    }

    #[test]
    fn file_stem_replaces_spaces() {
        assert_eq!(Program::MasterChef.file_stem(), "Master_Chef");
        assert_eq!(Program::TheVoice.file_stem(), "The_Voice");
    }

    #[test]
    fn sentiment_weights_sum_to_one() {
        let total: f64 = Sentiment::ALL.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sentiment_serde_is_lowercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
        let back: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(back, Sentiment::Neutral);
    }
}
