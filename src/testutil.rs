use std::collections::VecDeque;
use std::io;

use crate::prompt::Prompter;
use crate::summary::{ChartSink, Slice};

/// Compares two multi-line strings, printing a line diff on mismatch.
#[macro_export]
macro_rules! assert_text_eq {
    ($want:expr, $got:expr, $($context_arg:expr),*) => {
        let want_str: &str = &$want;
        let got_str: &str = &$got;
        if want_str != got_str {
            eprintln!($($context_arg,)*);
            text_diff::assert_diff(want_str, got_str, "\n", 0);
        }
    };
    ($want:expr, $got:expr) => {
        let want_str: &str = &$want;
        let got_str: &str = &$got;
        if want_str != got_str {
            text_diff::assert_diff(want_str, got_str, "\n", 0);
        }
    };
}

/// Answers prompts from a fixed script, recording every prompt shown.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        ScriptedPrompter {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn secret(&mut self, prompt: &str) -> io::Result<String> {
        Ok(self.line(prompt)?.unwrap_or_default())
    }
}

/// Keeps whatever it was asked to draw.
#[derive(Default)]
pub struct RecordingChart {
    pub drawn: Vec<(String, Vec<Slice>)>,
}

impl ChartSink for RecordingChart {
    fn draw(&mut self, title: &str, slices: &[Slice]) -> anyhow::Result<()> {
        self.drawn.push((title.to_string(), slices.to_vec()));
        Ok(())
    }
}
