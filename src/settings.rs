use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, HeaderKeywords};
use crate::dates::{DateParser, DEFAULT_DATETIME_FORMATS, DEFAULT_DATE_FORMATS};
use crate::error::{Result, TallyError};
use crate::extractor::{Extractor, DEFAULT_FALLBACK_DESCRIPTION};
use crate::table::{LoadOptions, DEFAULT_MISSING_MARKERS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_credit_keywords")]
    pub credit_keywords: Vec<String>,
    #[serde(default = "default_debit_keywords")]
    pub debit_keywords: Vec<String>,
    #[serde(default = "default_missing_markers")]
    pub missing_markers: Vec<String>,
    #[serde(default = "default_datetime_formats")]
    pub datetime_formats: Vec<String>,
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
    #[serde(default = "default_fallback_description")]
    pub fallback_description: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_credit_keywords() -> Vec<String> {
    HeaderKeywords::default().credit
}

fn default_debit_keywords() -> Vec<String> {
    HeaderKeywords::default().debit
}

fn default_missing_markers() -> Vec<String> {
    strings(DEFAULT_MISSING_MARKERS)
}

fn default_datetime_formats() -> Vec<String> {
    strings(DEFAULT_DATETIME_FORMATS)
}

fn default_date_formats() -> Vec<String> {
    strings(DEFAULT_DATE_FORMATS)
}

fn default_fallback_description() -> String {
    DEFAULT_FALLBACK_DESCRIPTION.to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credit_keywords: default_credit_keywords(),
            debit_keywords: default_debit_keywords(),
            missing_markers: default_missing_markers(),
            datetime_formats: default_datetime_formats(),
            date_formats: default_date_formats(),
            fallback_description: default_fallback_description(),
            delimiter: default_delimiter(),
        }
    }
}

impl Settings {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: u8::try_from(self.delimiter).unwrap_or(b','),
            missing_markers: self.missing_markers.clone(),
        }
    }

    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.datetime_formats.clone(), self.date_formats.clone())
    }

    pub fn keywords(&self) -> HeaderKeywords {
        HeaderKeywords {
            credit: self.credit_keywords.clone(),
            debit: self.debit_keywords.clone(),
        }
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.keywords(), self.date_parser())
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(self.date_parser(), self.fallback_description.clone())
    }

    fn validate(self) -> Result<Self> {
        if !self.delimiter.is_ascii() {
            return Err(TallyError::Settings(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        Ok(self)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Settings from the default location. A missing or unreadable file yields defaults.
pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str::<Settings>(&content)
            .ok()
            .and_then(|s| s.validate().ok())
            .unwrap_or_default()
    } else {
        Settings::default()
    }
}

/// Settings from an explicitly requested file; every problem is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TallyError::Settings(format!("{}: {e}", path.display())))?;
    let settings: Settings = serde_json::from_str(&content)
        .map_err(|e| TallyError::Settings(format!("{}: {e}", path.display())))?;
    settings.validate()
}

pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
