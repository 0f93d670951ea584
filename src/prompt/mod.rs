//! Prompt protocol between the wizard interpreter and the user
//!
//! The interpreter only talks to the [`Prompter`] trait. Two front ends
//! implement it:
//! - [`line::LinePrompter`]: index-list protocol over any reader/writer,
//!   used for piped stdin, `--plain` and tests
//! - [`interactive::InquirePrompter`]: arrow-key menus on a terminal
//!
//! Both validate answers before returning them; invalid input is met with
//! a re-prompt, never an error.

pub mod interactive;
pub mod line;

use thiserror::Error;

use crate::error::Result;

/// How many indices a selection question accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ExactlyOne,
    AtMostOne,
    Any,
    AtLeastOne,
}

impl Cardinality {
    /// Short instruction shown next to the question
    pub fn hint(self) -> &'static str {
        match self {
            Self::ExactlyOne => "Select one",
            Self::AtMostOne => "Select one or none",
            Self::Any => "Select none or any",
            Self::AtLeastOne => "Select one or more",
        }
    }

    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::ExactlyOne => count == 1,
            Self::AtMostOne => count <= 1,
            Self::Any => true,
            Self::AtLeastOne => count >= 1,
        }
    }

    fn requirement(self) -> &'static str {
        match self {
            Self::ExactlyOne => "please provide just one",
            Self::AtMostOne => "please provide just one or none",
            Self::Any => "any number is fine",
            Self::AtLeastOne => "please provide at least one",
        }
    }
}

/// Progress announcements that need no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Module { name: &'a str },
    Step { number: usize, name: &'a str },
}

/// Synchronous question/answer channel used by the wizard interpreter
pub trait Prompter {
    fn notice(&mut self, notice: Notice<'_>) -> Result<()>;

    /// Yes/no question
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Ask for option indices
    ///
    /// Implementations return sorted, distinct indices below
    /// `options.len()` whose count satisfies `cardinality`.
    fn choose(
        &mut self,
        question: &str,
        options: &[&str],
        cardinality: Cardinality,
    ) -> Result<Vec<usize>>;
}

/// Why a typed answer was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not an option number")]
    NotANumber(String),

    #[error("answer not in the list ({index} is not below {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("{0} was given more than once")]
    Duplicate(usize),

    #[error("{}", .0.requirement())]
    Count(Cardinality),
}

/// Parse a typed index list such as `0, 2` or `1 3`
///
/// Tokens are separated by commas and/or whitespace. The result is sorted.
pub fn parse_selection(
    input: &str,
    len: usize,
    cardinality: Cardinality,
) -> std::result::Result<Vec<usize>, SelectionError> {
    let mut picked = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let index: usize = token
            .parse()
            .map_err(|_| SelectionError::NotANumber(token.to_string()))?;
        if index >= len {
            return Err(SelectionError::OutOfRange { index, len });
        }
        if picked.contains(&index) {
            return Err(SelectionError::Duplicate(index));
        }
        picked.push(index);
    }

    if !cardinality.accepts(picked.len()) {
        return Err(SelectionError::Count(cardinality));
    }
    picked.sort_unstable();
    Ok(picked)
}

/// Interpret a yes/no answer; `None` for anything else
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().chars().next() {
        Some('y' | 'Y') => Some(true),
        Some('n' | 'N') => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_selection_separators() {
        assert_eq!(parse_selection("2, 0", 3, Cardinality::Any), Ok(vec![0, 2]));
        assert_eq!(parse_selection("1 2", 3, Cardinality::Any), Ok(vec![1, 2]));
        assert_eq!(parse_selection("  ", 3, Cardinality::Any), Ok(vec![]));
    }

    #[test]
    fn test_parse_selection_rejects_bad_tokens() {
        assert_eq!(
            parse_selection("one", 2, Cardinality::Any),
            Err(SelectionError::NotANumber("one".to_string()))
        );
        assert_eq!(
            parse_selection("-1", 2, Cardinality::Any),
            Err(SelectionError::NotANumber("-1".to_string()))
        );
        assert_eq!(
            parse_selection("2", 2, Cardinality::Any),
            Err(SelectionError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            parse_selection("1,1", 2, Cardinality::Any),
            Err(SelectionError::Duplicate(1))
        );
    }

    #[test]
    fn test_parse_selection_cardinality() {
        assert!(parse_selection("", 2, Cardinality::ExactlyOne).is_err());
        assert!(parse_selection("0,1", 2, Cardinality::ExactlyOne).is_err());
        assert!(parse_selection("", 2, Cardinality::AtMostOne).is_ok());
        assert!(parse_selection("0 1", 2, Cardinality::AtMostOne).is_err());
        assert!(parse_selection("", 2, Cardinality::AtLeastOne).is_err());
    }

    #[test]
    fn test_count_error_message() {
        let err = parse_selection("", 2, Cardinality::AtLeastOne).unwrap_err();
        assert_eq!(err.to_string(), "please provide at least one");
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no(" Yes"), Some(true));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no(""), None);
        assert_eq!(parse_yes_no("maybe"), None);
    }

    fn cardinality_strategy() -> impl Strategy<Value = Cardinality> {
        prop_oneof![
            Just(Cardinality::ExactlyOne),
            Just(Cardinality::AtMostOne),
            Just(Cardinality::Any),
            Just(Cardinality::AtLeastOne),
        ]
    }

    proptest! {
        /// Accepted answers are in range, distinct and of a valid count
        #[test]
        fn accepted_answers_are_valid(
            input in "[0-9 ,a]{0,12}",
            len in 0usize..6,
            cardinality in cardinality_strategy(),
        ) {
            if let Ok(picked) = parse_selection(&input, len, cardinality) {
                prop_assert!(cardinality.accepts(picked.len()));
                prop_assert!(picked.iter().all(|i| *i < len));
                prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
            }
        }

        /// ExactlyOne never yields zero or several indices
        #[test]
        fn exactly_one_yields_one(input in "[0-9 ,]{0,10}", len in 1usize..6) {
            if let Ok(picked) = parse_selection(&input, len, Cardinality::ExactlyOne) {
                prop_assert_eq!(picked.len(), 1);
            }
        }
    }
}
