//! The interactive, numbered menu behind a login prompt.

use std::io::Write;

use anyhow::{Context as _, Result};
use clap::Args;
use log::{debug, error, info, warn};

use crate::amount;
use crate::cmd::{self, Terminal};
use crate::credentials::CredentialStore;
use crate::ledger::{Ledger, LedgerError};
use crate::record::{self, Polarity, Record};
use crate::settings::Context;

pub const MAX_LOGIN_ATTEMPTS: usize = 3;

const OPTIONS: [&str; 8] = [
    "menu_add",
    "menu_view",
    "menu_search_category",
    "menu_search_date",
    "menu_summary",
    "menu_exit",
    "menu_delete",
    "menu_language",
];

#[derive(Debug, Default, Args)]
pub struct Command {}

impl Command {
    pub fn run(&self, ctx: &Context, term: &mut Terminal) -> Result<()> {
        let store = CredentialStore::open(&ctx.users_path)
            .with_context(|| format!("reading credentials from {:?}", ctx.users_path))?;
        let user = match login(ctx, &store, term)? {
            Some(user) => user,
            None => return Ok(()),
        };
        info!("{:?} logged in", user);

        let ledger = ctx.load_ledger()?;
        Session {
            ctx,
            lang: ctx.lang.clone(),
            ledger,
        }
        .run(term)
    }
}

/// Asks for a username and password until they match the store or the
/// attempts run out. Returns the username on success.
fn login(ctx: &Context, store: &CredentialStore, term: &mut Terminal) -> Result<Option<String>> {
    let lang = ctx.lang.as_str();
    for attempt in 0..MAX_LOGIN_ATTEMPTS {
        let left = (MAX_LOGIN_ATTEMPTS - attempt).to_string();
        writeln!(
            term.out,
            "{}",
            ctx.catalog
                .render(lang, "login_attempts_left", &[("attempts", &left)])
        )?;
        let user = match term.prompter.line(ctx.catalog.text(lang, "login_user"))? {
            Some(user) => user.trim().to_string(),
            None => break,
        };
        let password = term.prompter.secret(ctx.catalog.text(lang, "login_pw"))?;
        if store.verify(&user, &password) {
            writeln!(
                term.out,
                "{}",
                ctx.catalog.render(lang, "logged_in_as", &[("user", &user)])
            )?;
            return Ok(Some(user));
        }
        warn!("failed login for {:?}", user);
        term.say(ctx, lang, "login_fail")?;
    }
    term.say(ctx, lang, "login_aborted")?;
    Ok(None)
}

struct Session<'a> {
    ctx: &'a Context,
    lang: String,
    ledger: Ledger,
}

impl<'a> Session<'a> {
    fn run(&mut self, term: &mut Terminal) -> Result<()> {
        loop {
            self.show_menu(term)?;
            let choice = match term.prompter.line(self.text("choose"))? {
                Some(choice) => choice,
                None => break,
            };
            let outcome = match choice.trim() {
                "1" => self.add(term),
                "2" => cmd::show_table(self.ctx, &self.lang, &self.ledger, term),
                "3" => self.search_category(term),
                "4" => self.search_date(term),
                "5" => cmd::show_summary(self.ctx, &self.lang, &self.ledger, term),
                "6" => break,
                "7" => self.delete(term),
                "8" => self.choose_language(term),
                _ => self.say(term, "invalid_option"),
            };
            if let Err(e) = outcome {
                self.report(term, e)?;
            }
        }
        self.say(term, "goodbye")
    }

    fn text(&self, key: &'static str) -> &'a str {
        self.ctx.catalog.text(&self.lang, key)
    }

    fn say(&self, term: &mut Terminal, key: &'static str) -> Result<()> {
        term.say(self.ctx, &self.lang, key)
    }

    /// Reads a trimmed answer to the message under `key`.
    fn ask(&self, term: &mut Terminal, key: &'static str) -> Result<Option<String>> {
        let answer = term.prompter.line(self.text(key))?;
        Ok(answer.map(|s| s.trim().to_string()))
    }

    /// Storage failures are shown and the menu carries on. Anything else,
    /// such as a broken terminal, ends the session.
    fn report(&self, term: &mut Terminal, e: anyhow::Error) -> Result<()> {
        if let Some(ledger_err) = e.downcast_ref::<LedgerError>() {
            error!("{:?}: {}", self.ledger.path(), ledger_err);
            let msg = ledger_err.to_string();
            writeln!(
                term.out,
                "{}",
                self.ctx
                    .catalog
                    .render(&self.lang, "storage_failed", &[("error", &msg)])
            )?;
            return Ok(());
        }
        Err(e)
    }

    fn show_menu(&self, term: &mut Terminal) -> Result<()> {
        writeln!(term.out, "\n=== {} ===", self.text("title"))?;
        for (i, key) in OPTIONS.into_iter().enumerate() {
            writeln!(term.out, "{}. {}", i + 1, self.text(key))?;
        }
        Ok(())
    }

    fn add(&mut self, term: &mut Terminal) -> Result<()> {
        match self.read_entry(term)? {
            Some(record) => {
                self.ledger.append(record)?;
                self.say(term, "saved")
            }
            None => self.say(term, "entry_cancelled"),
        }
    }

    /// Walks through the entry prompts. `None` means the user gave up.
    fn read_entry(&self, term: &mut Terminal) -> Result<Option<Record>> {
        let date = loop {
            let input = match self.ask(term, "enter_date")? {
                Some(s) if !s.is_empty() => s,
                _ => return Ok(None),
            };
            match record::validate_date(&input) {
                Ok(()) => break input,
                Err(e) => {
                    debug!("{}", e);
                    self.say(term, "invalid_date")?;
                }
            }
        };
        let category = match self.ask(term, "enter_category")? {
            Some(s) => s,
            None => return Ok(None),
        };
        let description = match self.ask(term, "enter_description")? {
            Some(s) => s,
            None => return Ok(None),
        };
        let magnitude = loop {
            let input = match self.ask(term, "enter_amount")? {
                Some(s) if !s.is_empty() => s,
                _ => return Ok(None),
            };
            match amount::parse(Some(&input)) {
                Ok(magnitude) => break magnitude,
                Err(e) => {
                    debug!("{}", e);
                    self.say(term, "invalid_amount")?;
                }
            }
        };
        let polarity = match self.ask(term, "select_sign")? {
            Some(token) => match Polarity::from_token(&token) {
                Some(polarity) => polarity,
                None => {
                    self.say(term, "sign_invalid")?;
                    Polarity::from_token_or_expense(&token)
                }
            },
            None => return Ok(None),
        };
        let record = Record::from_entry(date, category, description, magnitude, polarity)?;
        Ok(Some(record))
    }

    fn search_category(&self, term: &mut Terminal) -> Result<()> {
        match self.ask(term, "enter_category")? {
            Some(category) => {
                cmd::show_category(self.ctx, &self.lang, &self.ledger, &category, term)
            }
            None => Ok(()),
        }
    }

    fn search_date(&self, term: &mut Terminal) -> Result<()> {
        match self.ask(term, "enter_date")? {
            Some(date) => cmd::show_date(self.ctx, &self.lang, &self.ledger, &date, term),
            None => Ok(()),
        }
    }

    fn delete(&mut self, term: &mut Terminal) -> Result<()> {
        let input = match self.ask(term, "delete_prompt")? {
            Some(input) => input,
            None => return Ok(()),
        };
        let position = match input.parse::<usize>() {
            Ok(n) if input.bytes().all(|b| b.is_ascii_digit()) => n,
            _ => return self.say(term, "delete_invalid"),
        };
        cmd::delete_with_secret(self.ctx, &self.lang, &mut self.ledger, position, term)
    }

    fn choose_language(&mut self, term: &mut Terminal) -> Result<()> {
        let input = self
            .ask(term, "choose_language")?
            .unwrap_or_default()
            .to_lowercase();
        let lang = match input.as_str() {
            "1" | "de" | "deutsch" => "de",
            "2" | "en" | "english" | "englisch" => "en",
            other if self.ctx.catalog.has_language(other) => other,
            _ => {
                writeln!(
                    term.out,
                    "{}",
                    self.ctx
                        .catalog
                        .render(&self.lang, "language_unchanged", &[("lang", &self.lang)])
                )?;
                return Ok(());
            }
        };
        self.lang = lang.to_string();
        info!("language set to {:?}", self.lang);
        Ok(())
    }
}
