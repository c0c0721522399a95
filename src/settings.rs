use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Args;

use crate::ledger::Ledger;
use crate::messages::{Catalog, DEFAULT_LANGUAGE};

#[derive(Debug, Args)]
pub struct Settings {
    /// The ledger file to read and write.
    #[arg(
        long = "ledger",
        env = "EXPLEDGER_FILE",
        default_value = "expenses.csv",
        global = true
    )]
    ledger_path: PathBuf,
    /// The credential file checked at login. Created with default accounts
    /// if missing.
    #[arg(
        long = "users",
        env = "EXPLEDGER_USERS",
        default_value = "users.csv",
        global = true
    )]
    users_path: PathBuf,
    /// Language for prompts and messages.
    #[arg(long = "lang", default_value = DEFAULT_LANGUAGE, global = true)]
    lang: String,
    /// A RON message catalog whose entries replace or extend the built-in
    /// ones.
    #[arg(long = "messages", global = true)]
    messages: Option<PathBuf>,
    /// The secret that must be entered before an entry is deleted.
    #[arg(
        long = "admin-secret",
        env = "EXPLEDGER_ADMIN_SECRET",
        default_value = "654321!",
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    admin_secret: String,
}

impl Settings {
    pub fn context(&self) -> Result<Context> {
        let mut catalog = Catalog::builtin()?;
        if let Some(path) = &self.messages {
            catalog = catalog.overlay(Catalog::from_path(path)?);
        }
        if !catalog.has_language(&self.lang) {
            bail!("no messages for language {:?}", self.lang);
        }
        Ok(Context {
            ledger_path: self.ledger_path.clone(),
            users_path: self.users_path.clone(),
            lang: self.lang.clone(),
            catalog,
            admin_secret: self.admin_secret.clone(),
        })
    }
}

/// Resolved settings shared by every command.
#[derive(Debug)]
pub struct Context {
    pub ledger_path: PathBuf,
    pub users_path: PathBuf,
    pub lang: String,
    pub catalog: Catalog,
    pub admin_secret: String,
}

impl Context {
    pub fn load_ledger(&self) -> Result<Ledger> {
        Ledger::load(&self.ledger_path)
            .with_context(|| format!("loading ledger {:?}", self.ledger_path))
    }

    #[cfg(test)]
    pub fn for_test(dir: &std::path::Path, lang: &str) -> Self {
        Context {
            ledger_path: dir.join("expenses.csv"),
            users_path: dir.join("users.csv"),
            lang: lang.to_string(),
            catalog: Catalog::builtin().expect("built-in catalog"),
            admin_secret: "654321!".to_string(),
        }
    }
}
