//! Line-oriented prompter
//!
//! Options are listed as `<index>\t<name>`; answers are typed index lists.
//! Works over any `BufRead`/`Write` pair so tests can script it.

use std::io::{BufRead, Write};

use console::style;

use crate::error::Result;
use crate::error::wizard::prompt_failed;
use crate::prompt::{Cardinality, Notice, Prompter, parse_selection, parse_yes_no};

pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        self.output.flush().map_err(|e| prompt_failed(e.to_string()))?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| prompt_failed(e.to_string()))?;
        if read == 0 {
            return Err(prompt_failed("input closed before an answer was given"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: std::fmt::Arguments<'_>) -> Result<()> {
        self.output
            .write_fmt(text)
            .map_err(|e| prompt_failed(e.to_string()))
    }

    fn reject(&mut self, reason: &str) -> Result<()> {
        let message = format!("Invalid choice - {reason}");
        self.say(format_args!("{}\n", style(message).yellow().bold()))
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn notice(&mut self, notice: Notice<'_>) -> Result<()> {
        match notice {
            Notice::Module { name } => {
                self.say(format_args!("{}{}\n", style("Module: ").dim(), style(name).bold()))
            }
            Notice::Step { number, name } => self.say(format_args!(
                "{}{}\n",
                style(format!("Install step {number}: ")).dim(),
                style(name).blue()
            )),
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            self.say(format_args!("{question} {} : ", style("(y/n)").dim()))?;
            let answer = self.read_answer()?;
            match parse_yes_no(&answer) {
                Some(yes) => return Ok(yes),
                None => self.reject("please answer y or n")?,
            }
        }
    }

    fn choose(
        &mut self,
        question: &str,
        options: &[&str],
        cardinality: Cardinality,
    ) -> Result<Vec<usize>> {
        self.say(format_args!("\t{}\n", style(question).green()))?;
        for (index, name) in options.iter().enumerate() {
            self.say(format_args!("\t\t{index}\t{name}\n"))?;
        }
        let indices = (0..options.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("/");

        loop {
            self.say(format_args!(
                "\t{} {} : ",
                cardinality.hint(),
                style(format!("({indices})")).dim()
            ))?;
            let answer = self.read_answer()?;
            match parse_selection(&answer, options.len(), cardinality) {
                Ok(picked) => return Ok(picked),
                Err(e) => self.reject(&e.to_string())?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModlayerError;
    use std::io::Cursor;

    fn prompter(script: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: &LinePrompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        console::strip_ansi_codes(&String::from_utf8_lossy(&p.output)).into_owned()
    }

    #[test]
    fn test_choose_lists_options() {
        let mut p = prompter("1\n");
        let picked = p
            .choose("Edition", &["Full", "Lite"], Cardinality::ExactlyOne)
            .unwrap();
        assert_eq!(picked, vec![1]);
        let out = transcript(&p);
        assert!(out.contains("\t\t0\tFull\n"));
        assert!(out.contains("\t\t1\tLite\n"));
        assert!(out.contains("Select one (0/1)"));
    }

    #[test]
    fn test_choose_reprompts_until_valid() {
        let mut p = prompter("x\n0,0\n5\n0,1\n1\n");
        let picked = p
            .choose("Edition", &["Full", "Lite"], Cardinality::ExactlyOne)
            .unwrap();
        assert_eq!(picked, vec![1]);
        assert_eq!(transcript(&p).matches("Invalid choice").count(), 4);
    }

    #[test]
    fn test_choose_any_accepts_empty_line() {
        let mut p = prompter("\n");
        let picked = p.choose("Extras", &["Maps"], Cardinality::Any).unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn test_end_of_input_fails() {
        let mut p = prompter("");
        let err = p
            .choose("Edition", &["Full"], Cardinality::ExactlyOne)
            .unwrap_err();
        assert!(matches!(err, ModlayerError::PromptFailed { .. }));
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("what\nY\n");
        assert!(p.confirm("Required files - Install?").unwrap());
        assert!(transcript(&p).contains("please answer y or n"));

        let mut p = prompter("no\n");
        assert!(!p.confirm("Required files - Install?").unwrap());
    }

    #[test]
    fn test_notice_step() {
        let mut p = prompter("");
        p.notice(Notice::Step {
            number: 2,
            name: "Textures",
        })
        .unwrap();
        assert_eq!(transcript(&p), "Install step 2: Textures\n");
    }
}
