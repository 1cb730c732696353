pub mod snapshot;

use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::db::Database;
use crate::errors::TriageError;
use crate::models::Classification;
use crate::parser;

pub const PROMPT: &str = "[y]es/[n]o/[m]aybe/[s]kip/[q]uit: ";

/// One keystroke command accepted by the review prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Yes,
    No,
    Maybe,
    Skip,
    Quit,
}

impl ReviewCommand {
    /// First character of the response, lowercase only. Anything else is
    /// rejected and the operator is re-prompted.
    pub fn parse(input: &str) -> Option<Self> {
        match input.chars().next() {
            Some('y') => Some(Self::Yes),
            Some('n') => Some(Self::No),
            Some('m') => Some(Self::Maybe),
            Some('s') => Some(Self::Skip),
            Some('q') => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Source of operator responses, so the loop can be driven by a scripted
/// fake in tests.
pub trait ReviewPrompt {
    fn ask(&mut self, prompt: &str) -> Result<String, TriageError>;
}

/// Terminal prompt backed by rustyline.
pub struct TerminalPrompt {
    editor: DefaultEditor,
}

impl TerminalPrompt {
    pub fn new() -> Result<Self, TriageError> {
        let editor = DefaultEditor::new()
            .map_err(|e| TriageError::Internal(format!("Failed to initialize prompt: {}", e)))?;
        Ok(Self { editor })
    }
}

impl ReviewPrompt for TerminalPrompt {
    fn ask(&mut self, prompt: &str) -> Result<String, TriageError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line),
            // Ctrl-C / Ctrl-D end the session like an explicit quit.
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok("q".to_string()),
            Err(e) => Err(TriageError::Internal(format!("Input error: {}", e))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewOutcome {
    pub reviewed: usize,
    pub skipped: usize,
    pub quit: bool,
}

/// Walk every advisory that still needs a human judgment, presenting the
/// parsed vulnerability text and recording each verdict as it is entered.
pub fn run_review(
    db: &Database,
    prompt: &mut dyn ReviewPrompt,
) -> Result<ReviewOutcome, TriageError> {
    let candidates = db.unreviewed_maybes()?;
    println!("{} advisories need to be classified", candidates.len());

    let mut outcome = ReviewOutcome::default();
    'candidates: for candidate in candidates {
        let parsed = parser::parse(&candidate.html)?;
        let text = parsed.overview.unwrap_or(parsed.full_text);

        println!();
        println!(
            "{} {}",
            style(&candidate.docid).cyan().bold(),
            style(&candidate.title).bold()
        );
        println!("{}", style(&candidate.url).dim());
        println!("{}", text);

        loop {
            let line = prompt.ask(PROMPT)?;
            let Some(command) = ReviewCommand::parse(&line) else {
                continue;
            };
            match command {
                ReviewCommand::Quit => {
                    outcome.quit = true;
                    break 'candidates;
                }
                ReviewCommand::Skip => {
                    outcome.skipped += 1;
                    continue 'candidates;
                }
                ReviewCommand::Yes | ReviewCommand::No | ReviewCommand::Maybe => {
                    let classification = match command {
                        ReviewCommand::Yes => Classification::Yes,
                        ReviewCommand::No => Classification::No,
                        _ => Classification::Maybe,
                    };
                    db.upsert_override(&candidate.docid, classification)?;
                    outcome.reviewed += 1;
                    continue 'candidates;
                }
            }
        }
    }

    Ok(outcome)
}
