// models/src/serializers.rs
//
// Lenient field decoders for snapshots written by older front ends, which
// stored ids and ages as JSON numbers and occasionally stringified scores.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

use crate::medical::Scores;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::UInt(u) => u.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

pub mod string_or_number {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
        Ok(value.map(StringOrNumber::into_string))
    }
}

pub mod string_or_number_non_option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
    }
}

pub mod scores_or_json_string {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScoresOrString {
        Scores(Scores),
        Encoded(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Scores, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<ScoresOrString>::deserialize(deserializer)? {
            Some(ScoresOrString::Scores(scores)) => Ok(scores),
            Some(ScoresOrString::Encoded(raw)) => serde_json::from_str(&raw)
                .map_err(|e| D::Error::custom(format!("invalid encoded scores: {}", e))),
            None => Ok(Scores::new()),
        }
    }
}
