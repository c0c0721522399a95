//! One-shot subcommands, and the display and delete steps they share with
//! the interactive menu.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use log::debug;

use crate::amount;
use crate::ledger::Ledger;
use crate::prompt::Prompter;
use crate::record::{self, Polarity, Record};
use crate::settings::Context;
use crate::summary::{self, ChartSink, NoPlottableData};
use crate::table::TableRenderer;

/// Where commands write their output and read their answers from.
pub struct Terminal<'a> {
    pub out: &'a mut dyn Write,
    pub prompter: &'a mut dyn Prompter,
    pub chart: &'a mut dyn ChartSink,
}

impl Terminal<'_> {
    pub fn say(&mut self, ctx: &Context, lang: &str, key: &str) -> Result<()> {
        writeln!(self.out, "{}", ctx.catalog.text(lang, key))?;
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct Add {
    /// Date of the entry, YYYY-MM-DD.
    date: String,
    category: String,
    description: String,
    /// The amount, e.g. "1.234,50", "1,50" or "1234.50".
    #[arg(allow_hyphen_values = true)]
    amount: String,
    /// "+" records income, "-" an expense. Anything else is an expense.
    #[arg(long = "type", default_value = "-", allow_hyphen_values = true)]
    polarity: String,
}

impl Add {
    pub fn run(&self, ctx: &Context, term: &mut Terminal) -> Result<()> {
        record::validate_date(&self.date)?;
        let magnitude = amount::parse(Some(&self.amount))?;
        let polarity = Polarity::from_token_or_expense(&self.polarity);
        let record = Record::from_entry(
            self.date.as_str(),
            self.category.as_str(),
            self.description.as_str(),
            magnitude,
            polarity,
        )?;
        let mut ledger = ctx.load_ledger()?;
        ledger.append(record)?;
        term.say(ctx, &ctx.lang, "saved")
    }
}

#[derive(Debug, Args)]
pub struct View {}

impl View {
    pub fn run(&self, ctx: &Context, term: &mut Terminal) -> Result<()> {
        let ledger = ctx.load_ledger()?;
        show_table(ctx, &ctx.lang, &ledger, term)
    }
}

#[derive(Debug, Args)]
pub struct SearchCategory {
    /// Category to list, compared ignoring case.
    category: String,
}

impl SearchCategory {
    pub fn run(&self, ctx: &Context, term: &mut Terminal) -> Result<()> {
        let ledger = ctx.load_ledger()?;
        show_category(ctx, &ctx.lang, &ledger, &self.category, term)
    }
}

#[derive(Debug, Args)]
pub struct SearchDate {
    /// Date to list, compared exactly.
    date: String,
}

impl SearchDate {
    pub fn run(&self, ctx: &Context, term: &mut Terminal) -> Result<()> {
        let ledger = ctx.load_ledger()?;
        show_date(ctx, &ctx.lang, &ledger, &self.date, term)
    }
}

#[derive(Debug, Args)]
pub struct Summary {}

impl Summary {
    pub fn run(&self, ctx: &Context, term: &mut Terminal) -> Result<()> {
        let ledger = ctx.load_ledger()?;
        show_summary(ctx, &ctx.lang, &ledger, term)
    }
}

#[derive(Debug, Args)]
pub struct Delete {
    /// Position of the entry as shown by `view`.
    position: usize,
}

impl Delete {
    pub fn run(&self, ctx: &Context, term: &mut Terminal) -> Result<()> {
        let mut ledger = ctx.load_ledger()?;
        delete_with_secret(ctx, &ctx.lang, &mut ledger, self.position, term)
    }
}

pub fn show_table(ctx: &Context, lang: &str, ledger: &Ledger, term: &mut Terminal) -> Result<()> {
    debug!("showing {} records, net {}", ledger.len(), ledger.total());
    let renderer = TableRenderer::new(ctx.catalog.table_labels(lang));
    term.out.write_all(renderer.render(ledger.records()).as_bytes())?;
    Ok(())
}

pub fn show_category(
    ctx: &Context,
    lang: &str,
    ledger: &Ledger,
    category: &str,
    term: &mut Terminal,
) -> Result<()> {
    let heading = ctx
        .catalog
        .render(lang, "category_results", &[("category", category)]);
    show_matches(ctx, lang, &heading, &ledger.find_by_category(category), term)
}

pub fn show_date(
    ctx: &Context,
    lang: &str,
    ledger: &Ledger,
    date: &str,
    term: &mut Terminal,
) -> Result<()> {
    let heading = ctx.catalog.render(lang, "date_results", &[("date", date)]);
    show_matches(ctx, lang, &heading, &ledger.find_by_date(date), term)
}

fn show_matches(
    ctx: &Context,
    lang: &str,
    heading: &str,
    matches: &[&Record],
    term: &mut Terminal,
) -> Result<()> {
    writeln!(term.out, "{}", heading)?;
    if matches.is_empty() {
        return term.say(ctx, lang, "no_matches");
    }
    for r in matches {
        writeln!(term.out, "{}", r)?;
    }
    Ok(())
}

/// Hands the positive category totals to the chart sink, or tells the user
/// there is nothing to chart.
pub fn show_summary(ctx: &Context, lang: &str, ledger: &Ledger, term: &mut Terminal) -> Result<()> {
    match summary::plottable(ledger.records()) {
        Ok(slices) => term
            .chart
            .draw(ctx.catalog.text(lang, "chart_title"), &slices),
        Err(NoPlottableData) => term.say(ctx, lang, "no_plottable"),
    }
}

/// Asks for the admin secret and, if it matches, removes the entry at
/// `position`.
pub fn delete_with_secret(
    ctx: &Context,
    lang: &str,
    ledger: &mut Ledger,
    position: usize,
    term: &mut Terminal,
) -> Result<()> {
    let secret = term
        .prompter
        .secret(ctx.catalog.text(lang, "admin_pw_prompt"))?;
    if secret != ctx.admin_secret {
        return term.say(ctx, lang, "pw_wrong");
    }
    if ledger.remove_at(position)? {
        term.say(ctx, lang, "delete_success")
    } else {
        term.say(ctx, lang, "delete_invalid")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::assert_text_eq;
    use crate::testutil::{RecordingChart, ScriptedPrompter};

    struct Harness {
        _dir: tempfile::TempDir,
        ctx: Context,
        out: Vec<u8>,
        prompter: ScriptedPrompter,
        chart: RecordingChart,
    }

    impl Harness {
        fn new(answers: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let ctx = Context::for_test(dir.path(), "en");
            Harness {
                _dir: dir,
                ctx,
                out: Vec::new(),
                prompter: ScriptedPrompter::new(answers),
                chart: RecordingChart::default(),
            }
        }

        fn run<F>(&mut self, f: F) -> Result<()>
        where
            F: FnOnce(&Context, &mut Terminal) -> Result<()>,
        {
            let mut term = Terminal {
                out: &mut self.out,
                prompter: &mut self.prompter,
                chart: &mut self.chart,
            };
            f(&self.ctx, &mut term)
        }

        fn output(&self) -> String {
            String::from_utf8(self.out.clone()).unwrap()
        }

        fn add(&mut self, date: &str, category: &str, description: &str, amount: &str, sign: &str) {
            let cmd = Add {
                date: date.to_string(),
                category: category.to_string(),
                description: description.to_string(),
                amount: amount.to_string(),
                polarity: sign.to_string(),
            };
            self.run(|ctx, term| cmd.run(ctx, term)).expect("add");
        }
    }

    #[test]
    fn add_then_view() {
        let mut h = Harness::new(&[]);
        h.add("2024-01-01", "Salary", "January", "2.500,00", "+");
        h.add("2024-01-02", "Food", "Bakery", "3,50", "-");
        h.out.clear();

        h.run(|ctx, term| View {}.run(ctx, term)).unwrap();

        let want = textwrap::dedent(
            "
            No. | Date       | Category | Description |    Amount
            -----------------------------------------------------
            1   | 2024-01-01 | Salary   | January     | 2.500,00€
            2   | 2024-01-02 | Food     | Bakery      |    -3,50€
            -----------------------------------------------------
            Net total:                                  2.496,50€
            ",
        );
        assert_text_eq!(want.trim_start(), h.output());
        assert_eq!(
            "date,category,description,amount\n\
             2024-01-01,Salary,January,2500.00\n\
             2024-01-02,Food,Bakery,-3.50\n",
            fs::read_to_string(&h.ctx.ledger_path).unwrap()
        );
    }

    #[test]
    fn add_rejects_bad_input_without_writing() {
        let mut h = Harness::new(&[]);
        let bad_date = Add {
            date: "2024-02-30".to_string(),
            category: "Food".to_string(),
            description: String::new(),
            amount: "1".to_string(),
            polarity: "-".to_string(),
        };
        let err = h.run(|ctx, term| bad_date.run(ctx, term)).unwrap_err();
        assert!(err.downcast_ref::<record::InvalidDate>().is_some());

        let bad_amount = Add {
            date: "2024-02-03".to_string(),
            category: "Food".to_string(),
            description: String::new(),
            amount: "1,2,3".to_string(),
            polarity: "-".to_string(),
        };
        let err = h.run(|ctx, term| bad_amount.run(ctx, term)).unwrap_err();
        assert!(err.downcast_ref::<amount::InvalidAmount>().is_some());

        assert!(!h.ctx.ledger_path.exists());
    }

    #[test]
    fn view_empty_ledger() {
        let mut h = Harness::new(&[]);
        h.run(|ctx, term| View {}.run(ctx, term)).unwrap();
        assert_eq!("No entries yet.\n", h.output());
    }

    #[test]
    fn search_by_category_and_date() {
        let mut h = Harness::new(&[]);
        h.add("2024-01-01", "Food", "Bakery", "3,50", "-");
        h.add("2024-01-02", "Rent", "Flat", "900", "-");
        h.out.clear();

        h.run(|ctx, term| {
            SearchCategory {
                category: "FOOD".to_string(),
            }
            .run(ctx, term)
        })
        .unwrap();
        h.run(|ctx, term| {
            SearchDate {
                date: "2024-01-03".to_string(),
            }
            .run(ctx, term)
        })
        .unwrap();

        let want = format!(
            "Entries in category 'FOOD':\n\
             {}\n\
             Entries on date '2024-01-03':\n\
             No matching entries found.\n",
            Record::new("2024-01-01", "Food", "Bakery", -3.5).unwrap()
        );
        assert_text_eq!(want, h.output());
    }

    #[test]
    fn summary_sends_positive_categories_to_chart() {
        let mut h = Harness::new(&[]);
        h.add("2024-01-01", "Salary", "", "2000", "+");
        h.add("2024-01-02", "Food", "", "20", "-");
        h.add("2024-01-03", "Gift", "", "50", "+");

        h.run(|ctx, term| Summary {}.run(ctx, term)).unwrap();

        assert_eq!(1, h.chart.drawn.len());
        let (title, slices) = &h.chart.drawn[0];
        assert_eq!("Breakdown by category", title);
        let names: Vec<&str> = slices.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(vec!["Salary", "Gift"], names);
    }

    #[test]
    fn summary_of_expenses_only_is_a_notice() {
        let mut h = Harness::new(&[]);
        h.add("2024-01-01", "Food", "", "20", "-");
        h.add("2024-01-02", "Food", "", "5", "-");
        h.out.clear();

        h.run(|ctx, term| Summary {}.run(ctx, term)).unwrap();

        assert!(h.chart.drawn.is_empty());
        assert_eq!("No positive amounts to chart.\n", h.output());
    }

    #[test]
    fn delete_needs_admin_secret() {
        let mut h = Harness::new(&["wrong", "654321!", "654321!"]);
        h.add("2024-01-01", "Food", "Bakery", "3,50", "-");
        h.add("2024-01-02", "Rent", "Flat", "900", "-");
        h.out.clear();

        let delete = |position| Delete { position };
        h.run(|ctx, term| delete(1).run(ctx, term)).unwrap();
        assert_eq!(2, h.ctx.load_ledger().unwrap().len());

        h.run(|ctx, term| delete(3).run(ctx, term)).unwrap();
        assert_eq!(2, h.ctx.load_ledger().unwrap().len());

        h.run(|ctx, term| delete(1).run(ctx, term)).unwrap();
        let ledger = h.ctx.load_ledger().unwrap();
        assert_eq!(1, ledger.len());
        assert_eq!("Flat", ledger.records()[0].description);

        assert_eq!(
            "Wrong password. Deletion aborted.\n\
             Invalid number. No entry deleted.\n\
             Entry deleted successfully.\n",
            h.output()
        );
        assert_eq!(0, h.prompter.remaining());
    }
}
