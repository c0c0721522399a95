//! User-facing text, keyed by language code and message key.
//!
//! The built-in catalog is embedded from `messages.ron`. A catalog read from
//! a file can be laid over it to replace or add messages and languages.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::table::TableLabels;

pub const DEFAULT_LANGUAGE: &str = "de";

const BUILTIN: &str = include_str!("messages.ron");

#[derive(Debug, Default)]
pub struct Catalog {
    languages: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn builtin() -> Result<Self> {
        Self::from_str(BUILTIN).context("parsing built-in message catalog")
    }

    pub fn from_str(s: &str) -> Result<Self> {
        let languages = ron::de::from_str(s)?;
        Ok(Catalog { languages })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let reader =
            File::open(path).with_context(|| format!("opening message catalog {:?}", path))?;
        let languages = ron::de::from_reader(reader)
            .with_context(|| format!("parsing message catalog {:?}", path))?;
        Ok(Catalog { languages })
    }

    /// Replaces or adds every message present in `other`.
    pub fn overlay(mut self, other: Catalog) -> Self {
        for (lang, messages) in other.languages {
            self.languages.entry(lang).or_default().extend(messages);
        }
        self
    }

    pub fn has_language(&self, lang: &str) -> bool {
        self.languages.contains_key(lang)
    }

    /// Looks up `key` in `lang`, then in the default language. Unknown keys
    /// come back as the key itself.
    pub fn text<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        [lang, DEFAULT_LANGUAGE]
            .iter()
            .find_map(|l| self.languages.get(*l).and_then(|m| m.get(key)))
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Like `text`, with each `{name}` in the message replaced by its value
    /// from `args`.
    pub fn render(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.text(lang, key).to_string(), |msg, (name, value)| {
                msg.replace(&format!("{{{}}}", name), value)
            })
    }

    pub fn table_labels(&self, lang: &str) -> TableLabels {
        let text = |key: &'static str| self.text(lang, key).to_string();
        TableLabels {
            number: text("table_number"),
            date: text("table_date"),
            category: text("table_category"),
            description: text("table_description"),
            amount: text("table_amount"),
            total: text("table_total"),
            empty: text("table_empty"),
        }
    }
}
