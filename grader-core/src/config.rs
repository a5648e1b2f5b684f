//! Grader configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How mistakes are marked up in the rendered diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStyle {
    /// Combining strikethrough (U+0336) and underline (U+0332) on every character
    #[default]
    Unicode,
    /// `~~expected~~ __actual__`
    Markdown,
}

impl DiffStyle {
    pub fn strike(&self, text: &str) -> String {
        match self {
            Self::Unicode => text.chars().flat_map(|c| [c, '\u{0336}']).collect(),
            Self::Markdown => format!("~~{text}~~"),
        }
    }

    pub fn underline(&self, text: &str) -> String {
        match self {
            Self::Unicode => text.chars().flat_map(|c| [c, '\u{0332}']).collect(),
            Self::Markdown => format!("__{text}__"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Reject texts with more tokens than this. Lookahead cost grows with the
    /// product of the remaining tokens on each side, so long passages should be capped.
    pub max_tokens: Option<usize>,
    pub diff_style: DiffStyle,
}

impl GraderConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == Some(0) {
            return Err(Error::Config("max_tokens must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Enforce `max_tokens` on a tokenized text
    pub fn check_token_count(&self, count: usize) -> Result<()> {
        match self.max_tokens {
            Some(limit) if count > limit => Err(Error::TooManyTokens { count, limit }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraderConfig::default();
        assert_eq!(config.max_tokens, None);
        assert_eq!(config.diff_style, DiffStyle::Unicode);
        assert!(config.check_token_count(1_000_000).is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = GraderConfig::from_json(r#"{"max_tokens": 200}"#).unwrap();
        assert_eq!(config.max_tokens, Some(200));
        assert_eq!(config.diff_style, DiffStyle::Unicode);

        let config = GraderConfig::from_json(r#"{"diff_style": "markdown"}"#).unwrap();
        assert_eq!(config.diff_style, DiffStyle::Markdown);
        assert_eq!(GraderConfig::from_json("{}").unwrap(), GraderConfig::default());
    }

    #[test]
    fn test_from_json_rejects_zero_limit() {
        assert!(matches!(
            GraderConfig::from_json(r#"{"max_tokens": 0}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GraderConfig::from_json("not json"),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            GraderConfig::from_json(r#"{"diff_style": "html"}"#),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_token_limit() {
        let config = GraderConfig {
            max_tokens: Some(3),
            ..Default::default()
        };
        assert!(config.check_token_count(3).is_ok());
        assert!(matches!(
            config.check_token_count(4),
            Err(Error::TooManyTokens { count: 4, limit: 3 })
        ));
    }

    #[test]
    fn test_marks() {
        assert_eq!(DiffStyle::Markdown.strike("was"), "~~was~~");
        assert_eq!(DiffStyle::Markdown.underline("is"), "__is__");
        assert_eq!(DiffStyle::Unicode.strike("ab"), "a\u{0336}b\u{0336}");
        assert_eq!(DiffStyle::Unicode.underline("ab"), "a\u{0332}b\u{0332}");
    }
}
