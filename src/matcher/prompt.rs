use std::io::{BufRead, Write};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input closed before an answer was given")]
    Closed,
    #[error("No options to choose from for \"{0}\"")]
    NoOptions(String),
    #[error("Choice {index} for \"{question}\" is not one of the {options} options")]
    InvalidChoice {
        question: String,
        index: usize,
        options: usize,
    },
}

pub type Result<T> = std::result::Result<T, PromptError>;

/// Everything the matcher needs from a human. Choices are returned as an
/// index into `options`.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> Result<bool>;

    fn choose(&mut self, question: &str, options: &[String]) -> Result<usize>;

    fn choose_with_default(
        &mut self,
        question: &str,
        options: &[String],
        default: usize,
    ) -> Result<usize>;
}

/// Accept `index` only if it points into a list of `options` entries.
pub fn checked_choice(question: &str, index: usize, options: usize) -> Result<usize> {
    if index < options {
        Ok(index)
    } else {
        Err(PromptError::InvalidChoice {
            question: question.to_string(),
            index,
            options,
        })
    }
}

/// Line-based prompter over any reader/writer pair (normally stdin/stdout).
///
/// Choices accept either the option number or the exact option text
/// (case-insensitive). An empty answer takes the default where there is one.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
    /// Answer every confirmation with yes without reading input.
    assume_yes: bool,
}

impl ConsolePrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self { input, output, assume_yes }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_string())
    }

    fn list(&mut self, options: &[String], default: Option<usize>) -> Result<()> {
        for (i, option) in options.iter().enumerate() {
            let marker = if Some(i) == default { '*' } else { ' ' };
            writeln!(self.output, "  {marker}{:>3}) {option}", i + 1)?;
        }
        Ok(())
    }

    fn pick(&mut self, question: &str, options: &[String], default: Option<usize>) -> Result<usize> {
        if options.is_empty() {
            return Err(PromptError::NoOptions(question.to_string()));
        }
        self.list(options, default)?;
        loop {
            match default {
                Some(d) => write!(self.output, "[>] {question} [{}] ", options[d])?,
                None => write!(self.output, "[>] {question} ")?,
            }
            self.output.flush()?;

            let answer = self.read_line()?;
            if answer.is_empty() {
                if let Some(d) = default {
                    return Ok(d);
                }
            } else if let Some(i) = parse_choice(&answer, options) {
                return Ok(i);
            }
            writeln!(self.output, "    Enter a number from 1 to {} or an option name.", options.len())?;
        }
    }
}

/// Interpret an answer as a 1-based option number or an option's text.
fn parse_choice(answer: &str, options: &[String]) -> Option<usize> {
    if let Ok(n) = answer.parse::<usize>() {
        if (1..=options.len()).contains(&n) {
            return Some(n - 1);
        }
    }
    options.iter().position(|o| o.eq_ignore_ascii_case(answer))
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            writeln!(self.output, "[>] {question} (Y/n) y")?;
            return Ok(true);
        }
        loop {
            write!(self.output, "[>] {question} (Y/n) ")?;
            self.output.flush()?;
            match self.read_line()?.to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "    Please answer y or n.")?,
            }
        }
    }

    fn choose(&mut self, question: &str, options: &[String]) -> Result<usize> {
        self.pick(question, options, None)
    }

    fn choose_with_default(
        &mut self,
        question: &str,
        options: &[String],
        default: usize,
    ) -> Result<usize> {
        let default = (default < options.len()).then_some(default);
        self.pick(question, options, default)
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Answer {
        Yes,
        No,
        /// Pick the option with this exact text.
        Pick(&'static str),
        /// Accept the offered default.
        Default,
        /// Return this raw index, valid or not.
        Index(usize),
    }

    /// Replays queued answers and records every question with the options it offered.
    #[derive(Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        pub asked: Vec<(String, Vec<String>, Option<usize>)>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self) -> Result<Answer> {
            self.answers.pop_front().ok_or(PromptError::Closed)
        }

        fn pick(&mut self, question: &str, options: &[String], default: Option<usize>) -> Result<usize> {
            self.asked.push((question.to_string(), options.to_vec(), default));
            match self.next()? {
                Answer::Pick(text) => options
                    .iter()
                    .position(|o| o == text)
                    .ok_or_else(|| PromptError::NoOptions(format!("{question}: {text}"))),
                Answer::Default => default.ok_or(PromptError::Closed),
                Answer::Index(i) => Ok(i),
                other => panic!("expected a choice for {question}, got {other:?}"),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn confirm(&mut self, question: &str) -> Result<bool> {
            self.asked.push((question.to_string(), Vec::new(), None));
            match self.next()? {
                Answer::Yes => Ok(true),
                Answer::No => Ok(false),
                other => panic!("expected yes/no for {question}, got {other:?}"),
            }
        }

        fn choose(&mut self, question: &str, options: &[String]) -> Result<usize> {
            self.pick(question, options, None)
        }

        fn choose_with_default(
            &mut self,
            question: &str,
            options: &[String],
            default: usize,
        ) -> Result<usize> {
            self.pick(question, options, Some(default))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> ConsolePrompter<&[u8], Vec<u8>> {
        ConsolePrompter::new(input.as_bytes(), Vec::new(), false)
    }

    fn options() -> Vec<String> {
        vec!["Rain".into(), "Sun".into(), "Snow".into()]
    }

    #[test]
    fn test_confirm_answers() {
        assert!(prompter("y\n").confirm("Go?").unwrap());
        assert!(prompter("\n").confirm("Go?").unwrap());
        assert!(!prompter("no\n").confirm("Go?").unwrap());
        assert!(!prompter("maybe\nn\n").confirm("Go?").unwrap());
    }

    #[test]
    fn test_confirm_assume_yes_reads_nothing() {
        let mut p = ConsolePrompter::new("".as_bytes(), Vec::new(), true);
        assert!(p.confirm("Go?").unwrap());
    }

    #[test]
    fn test_choose_by_number_or_name() {
        assert_eq!(prompter("2\n").choose("Pick", &options()).unwrap(), 1);
        assert_eq!(prompter("snow\n").choose("Pick", &options()).unwrap(), 2);
        assert_eq!(prompter("9\nhail\n1\n").choose("Pick", &options()).unwrap(), 0);
    }

    #[test]
    fn test_choose_with_default_on_empty_answer() {
        assert_eq!(
            prompter("\n").choose_with_default("Pick", &options(), 2).unwrap(),
            2
        );
    }

    #[test]
    fn test_choose_without_default_requires_answer() {
        assert!(matches!(
            prompter("\n").choose("Pick", &options()),
            Err(PromptError::Closed)
        ));
    }

    #[test]
    fn test_closed_input() {
        assert!(matches!(prompter("").confirm("Go?"), Err(PromptError::Closed)));
    }

    #[test]
    fn test_empty_options() {
        assert!(matches!(
            prompter("1\n").choose("Pick", &[]),
            Err(PromptError::NoOptions(_))
        ));
    }
}
