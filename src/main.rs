use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[cfg(test)]
mod testutil;

mod amount;
mod cmd;
mod credentials;
mod ledger;
mod menu;
mod messages;
mod prompt;
mod record;
mod settings;
mod storage;
mod summary;
mod table;

#[derive(Debug, Parser)]
#[command(version)]
/// A personal income and expense ledger kept in a CSV file.
struct Command {
    #[command(flatten)]
    settings: settings::Settings,
    #[command(subcommand)]
    subcmd: Option<SubCommand>,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Logs in and runs the interactive menu. This is the default.
    Menu(menu::Command),
    /// Records one entry.
    Add(cmd::Add),
    /// Prints every entry as a table with the net total.
    View(cmd::View),
    /// Lists the entries in a category.
    SearchCategory(cmd::SearchCategory),
    /// Lists the entries on a date.
    SearchDate(cmd::SearchDate),
    /// Charts the positive totals per category.
    Summary(cmd::Summary),
    /// Removes an entry after asking for the admin secret.
    Delete(cmd::Delete),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cmd = Command::parse();
    let ctx = cmd.settings.context()?;

    let mut out = io::stdout();
    let mut prompter = prompt::TerminalPrompter;
    let mut chart = summary::TextChart::new(io::stdout());
    let mut term = cmd::Terminal {
        out: &mut out,
        prompter: &mut prompter,
        chart: &mut chart,
    };

    use SubCommand::*;
    match cmd.subcmd.unwrap_or_else(|| Menu(Default::default())) {
        Menu(cmd) => cmd.run(&ctx, &mut term),
        Add(cmd) => cmd.run(&ctx, &mut term),
        View(cmd) => cmd.run(&ctx, &mut term),
        SearchCategory(cmd) => cmd.run(&ctx, &mut term),
        SearchDate(cmd) => cmd.run(&ctx, &mut term),
        Summary(cmd) => cmd.run(&ctx, &mut term),
        Delete(cmd) => cmd.run(&ctx, &mut term),
    }
}
