use crate::error::KeywordConfigError;
use serde::{Deserialize, Serialize};

const DEFAULT_RULE_KEYWORDS: &[&str] = &[
    "is", "does", "valid", "invalid", "has", "can", "should", "verify", "check", "validate",
];

const DEFAULT_BEHAVIOR_KEYWORDS: &[&str] = &[
    "click", "enter", "submit", "select", "choose", "provide", "answer", "upload",
];

/// The keyword sets the name heuristics match against.
///
/// Keywords are stored trimmed and lower-cased, however the config was
/// built or deserialized. `Default` gives the restore-defaults sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawKeywordConfig")]
pub struct KeywordConfig {
    rule_keywords: Vec<String>,
    behavior_keywords: Vec<String>,
}

/// The wire form, validated into a [`KeywordConfig`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawKeywordConfig {
    #[serde(alias = "rule_keywords", alias = "rule")]
    rule_keywords: Vec<String>,
    #[serde(alias = "behavior_keywords", alias = "behavior")]
    behavior_keywords: Vec<String>,
}

impl TryFrom<RawKeywordConfig> for KeywordConfig {
    type Error = KeywordConfigError;

    fn try_from(raw: RawKeywordConfig) -> Result<Self, Self::Error> {
        Self::new(raw.rule_keywords, raw.behavior_keywords)
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            rule_keywords: DEFAULT_RULE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            behavior_keywords: DEFAULT_BEHAVIOR_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl KeywordConfig {
    pub fn new<R, B>(rule_keywords: R, behavior_keywords: B) -> Result<Self, KeywordConfigError>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            rule_keywords: rule_keywords.into_iter().map(Into::into).collect(),
            behavior_keywords: behavior_keywords.into_iter().map(Into::into).collect(),
        }
        .normalized()
    }

    /// Parses an exported configuration.
    pub fn from_json(json: &str) -> Result<Self, KeywordConfigError> {
        let raw: RawKeywordConfig = serde_json::from_str(json)?;
        raw.try_into()
    }

    pub fn rule_keywords(&self) -> &[String] {
        &self.rule_keywords
    }

    pub fn behavior_keywords(&self) -> &[String] {
        &self.behavior_keywords
    }

    pub fn to_json(&self) -> Result<String, KeywordConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lower-cases, trims and deduplicates both lists, keeping first occurrences.
    fn normalized(self) -> Result<Self, KeywordConfigError> {
        Ok(Self {
            rule_keywords: normalize_list(self.rule_keywords, "rule")?,
            behavior_keywords: normalize_list(self.behavior_keywords, "behavior")?,
        })
    }
}

fn normalize_list(
    keywords: Vec<String>,
    list: &'static str,
) -> Result<Vec<String>, KeywordConfigError> {
    let mut normalized: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(KeywordConfigError::EmptyKeyword { list });
        }
        if !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }
    Ok(normalized)
}
