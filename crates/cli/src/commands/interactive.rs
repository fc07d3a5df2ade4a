//! Terminal survey loop
//!
//! Asks each question in turn, submits the answers through a
//! [`PredictionSession`] and shows the result. Pressing enter keeps the
//! value shown in brackets; `q` or end of input leaves the loop.

use anyhow::Result;
use colored::Colorize;
use expense_core::collector::{
    encode_discipline, Choice, EatOutFrequency, LivingArrangement, ShopFrequency, YesNo,
};
use expense_core::predictor::{PredictionSession, PredictorAdapter, PART_TIME_INCOME};
use expense_core::RawAnswers;
use std::io::{BufRead, Write};

use crate::output::{write_outcome, OutputFormat};

/// Run the survey until the user quits
pub fn run<R: BufRead, W: Write>(adapter: &PredictorAdapter, input: R, out: W) -> Result<()> {
    let mut prompter = Prompter { input, out };
    let mut session = PredictionSession::new(adapter);
    let asks_income = adapter
        .model()
        .schema()
        .fields()
        .contains(&PART_TIME_INCOME);

    writeln!(prompter.out, "{}", "Student Expense Predictor".bold())?;
    writeln!(
        prompter.out,
        "Answer each question; press enter to keep the value in brackets, q to quit."
    )?;

    // Each round starts from the previous round's answers
    let mut answers = RawAnswers::default();
    loop {
        match prompter.survey(&answers, asks_income)? {
            Some(next) => answers = next,
            None => break,
        }

        match session.submit(&answers) {
            Ok(outcome) => write_outcome(&mut prompter.out, &outcome, OutputFormat::Table)?,
            Err(e) => writeln!(prompter.out, "{} {}", "✗".red().bold(), e)?,
        }

        if !prompter.confirm("Predict again?")? {
            break;
        }
    }

    writeln!(prompter.out, "Goodbye.")?;
    Ok(())
}

struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Collect one full set of answers; `None` when the user quits
    fn survey(&mut self, previous: &RawAnswers, asks_income: bool) -> Result<Option<RawAnswers>> {
        let Some(allowance) =
            self.amount("Monthly allowance from parents/guardians", previous.allowance)?
        else {
            return Ok(None);
        };

        let part_time_income = if asks_income {
            match self.amount("Monthly part-time income", previous.part_time_income)? {
                Some(v) => v,
                None => return Ok(None),
            }
        } else {
            0
        };

        let Some(living) = self.choice::<LivingArrangement>("Living arrangement", &previous.living)?
        else {
            return Ok(None);
        };
        let Some(shop_frequency) = self.choice::<ShopFrequency>(
            "How often do you shop for non-essentials?",
            &previous.shop_frequency,
        )?
        else {
            return Ok(None);
        };
        let Some(eat_out) =
            self.choice::<EatOutFrequency>("How often do you eat out?", &previous.eat_out)?
        else {
            return Ok(None);
        };
        let Some(laptop) = self.choice::<YesNo>("Do you own a laptop?", &previous.laptop)? else {
            return Ok(None);
        };
        let Some(track_expenses) =
            self.choice::<YesNo>("Do you track your expenses?", &previous.track_expenses)?
        else {
            return Ok(None);
        };
        let Some(discipline) = self.discipline(previous.discipline)? else {
            return Ok(None);
        };

        Ok(Some(RawAnswers {
            allowance,
            part_time_income,
            living,
            shop_frequency,
            eat_out,
            laptop,
            track_expenses,
            discipline,
        }))
    }

    /// Read one reply; `None` on quit or end of input
    fn ask(&mut self, question: &str, default: &str) -> Result<Option<String>> {
        write!(self.out, "{} [{}]: ", question, default)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }

        let reply = line.trim();
        if reply.eq_ignore_ascii_case("q") || reply.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        if reply.is_empty() {
            return Ok(Some(default.to_string()));
        }
        Ok(Some(reply.to_string()))
    }

    fn amount(&mut self, question: &str, default: i64) -> Result<Option<i64>> {
        loop {
            let Some(reply) = self.ask(question, &default.to_string())? else {
                return Ok(None);
            };
            match reply.parse::<i64>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.out, "Please enter a whole number.")?,
            }
        }
    }

    /// Offer the options by number; a number or a label is accepted
    fn choice<C: Choice>(&mut self, question: &str, default: &str) -> Result<Option<String>> {
        writeln!(self.out, "{}", question)?;
        for (i, option) in C::ALL.iter().enumerate() {
            writeln!(self.out, "  {}) {}", i + 1, option.label())?;
        }

        loop {
            let Some(reply) = self.ask("Choice", default)? else {
                return Ok(None);
            };

            if let Ok(n) = reply.parse::<usize>() {
                if let Some(option) = n.checked_sub(1).and_then(|i| C::ALL.get(i)) {
                    return Ok(Some(option.label().to_string()));
                }
            }

            match C::parse_alias(&reply) {
                Ok(option) => return Ok(Some(option.label().to_string())),
                Err(_) => writeln!(
                    self.out,
                    "Please pick one of: {}",
                    C::labels().join(", ")
                )?,
            }
        }
    }

    fn discipline(&mut self, default: i64) -> Result<Option<i64>> {
        loop {
            let Some(value) = self.amount("Financial discipline (1-5)", default)? else {
                return Ok(None);
            };
            if encode_discipline(value).is_ok() {
                return Ok(Some(value));
            }
            writeln!(self.out, "Please enter a number from 1 to 5.")?;
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let Some(reply) = self.ask(question, "Y/n")? else {
            return Ok(false);
        };
        Ok(!matches!(YesNo::parse_alias(&reply), Ok(YesNo::No)))
    }
}
