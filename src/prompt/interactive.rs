//! Terminal menus for wizard questions

use console::style;
use inquire::list_option::ListOption;
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, MultiSelect, Select};

use crate::error::Result;
use crate::prompt::{Cardinality, Notice, Prompter};

/// Arrow-key prompter backed by `inquire`
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for InquirePrompter {
    fn notice(&mut self, notice: Notice<'_>) -> Result<()> {
        match notice {
            Notice::Module { name } => {
                println!("{}{}", style("Module: ").dim(), style(name).bold());
            }
            Notice::Step { number, name } => {
                println!();
                println!(
                    "{}{}",
                    style(format!("Install step {number}: ")).dim(),
                    style(name).blue()
                );
            }
        }
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(Confirm::new(question)
            .with_default(true)
            .with_help_message("Press Enter to confirm, or 'n' to cancel")
            .prompt()?)
    }

    fn choose(
        &mut self,
        question: &str,
        options: &[&str],
        cardinality: Cardinality,
    ) -> Result<Vec<usize>> {
        let items: Vec<String> = options.iter().map(|s| (*s).to_string()).collect();
        let message = format!("{question} ({})", cardinality.hint());

        if cardinality == Cardinality::ExactlyOne {
            let picked = Select::new(&message, items)
                .with_page_size(10)
                .without_filtering()
                .with_help_message("↑↓ to move, ENTER to select")
                .raw_prompt()?;
            return Ok(vec![picked.index]);
        }

        let validator = move |picked: &[ListOption<&String>]| -> std::result::Result<
            Validation,
            CustomUserError,
        > {
            if cardinality.accepts(picked.len()) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(cardinality.requirement().into()))
            }
        };
        let picked = MultiSelect::new(&message, items)
            .with_page_size(10)
            .with_help_message("↑↓ navigate  space select  enter confirm")
            .with_validator(validator)
            .raw_prompt()?;

        let mut indices: Vec<usize> = picked.iter().map(|o| o.index).collect();
        indices.sort_unstable();
        Ok(indices)
    }
}
