//! File-to-track matching: similarity scoring, assignment, and the prompts
//! used to settle anything the scores cannot.

pub mod prompt;
pub mod report;
pub mod resolver;
pub mod similarity;

pub use prompt::{ConsolePrompter, PromptError, Prompter};
pub use resolver::{EqualPlan, Mapping, MatchError, SlotStatus, check_counts, resolve};
pub use similarity::{ScoreMatrix, score};
