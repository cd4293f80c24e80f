//! Interactive title selection.
//!
//! A small state machine that turns a title fragment into a single
//! catalog title: fuzzy-match the fragment, show a numbered menu of
//! the ranked candidates, resolve the user's pick. It performs no I/O;
//! callers feed user input through [`SelectionFlow::submit`] and
//! render the returned step.

use crate::matcher::{best_matches, filter_ranked, TitleMatch, MATCH_LIMIT, MATCH_THRESHOLD};

/// Token that cancels the workflow at any prompt (case-insensitive).
pub const CANCEL_TOKEN: &str = "q";

/// Workflow state. `Resolved` and `Cancelled` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    AwaitingFragment,
    AwaitingChoice,
    Resolved(String),
    Cancelled,
}

/// What the caller should do after feeding one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep {
    /// Stay at the current prompt and show this message.
    RePrompt(String),
    /// Show the ranked matches as a 1-based numbered menu and ask for
    /// a number.
    Menu(Vec<TitleMatch>),
    /// The workflow finished with a selected title.
    Resolved(String),
    /// The user cancelled.
    Cancelled,
}

/// Fragment-to-title selection over a fixed set of catalog titles.
#[derive(Debug)]
pub struct SelectionFlow {
    titles: Vec<String>,
    ranked: Vec<TitleMatch>,
    state: SelectionState,
}

impl SelectionFlow {
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            ranked: Vec::new(),
            state: SelectionState::AwaitingFragment,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The ranked list shown in the menu, empty before the first
    /// successful match.
    pub fn ranked(&self) -> &[TitleMatch] {
        &self.ranked
    }

    /// Feed one line of user input and advance the state machine.
    /// Terminal states stick: further input returns the terminal step
    /// again.
    pub fn submit(&mut self, input: &str) -> SelectionStep {
        let input = input.trim();
        match &self.state {
            SelectionState::AwaitingFragment => self.on_fragment(input),
            SelectionState::AwaitingChoice => self.on_choice(input),
            SelectionState::Resolved(title) => SelectionStep::Resolved(title.clone()),
            SelectionState::Cancelled => SelectionStep::Cancelled,
        }
    }

    fn on_fragment(&mut self, input: &str) -> SelectionStep {
        if input.eq_ignore_ascii_case(CANCEL_TOKEN) {
            self.state = SelectionState::Cancelled;
            return SelectionStep::Cancelled;
        }
        if input.is_empty() {
            return SelectionStep::RePrompt("Invalid input! Title cannot be empty.".to_string());
        }

        let ranked = filter_ranked(best_matches(input, &self.titles, MATCH_LIMIT), MATCH_THRESHOLD);
        if ranked.is_empty() {
            return SelectionStep::RePrompt("No matches found, try again ...".to_string());
        }

        self.ranked = ranked.clone();
        self.state = SelectionState::AwaitingChoice;
        SelectionStep::Menu(ranked)
    }

    fn on_choice(&mut self, input: &str) -> SelectionStep {
        if input.eq_ignore_ascii_case(CANCEL_TOKEN) {
            self.state = SelectionState::Cancelled;
            return SelectionStep::Cancelled;
        }
        if input.is_empty() {
            return SelectionStep::RePrompt(
                "Invalid input! Your choice cannot be empty.".to_string(),
            );
        }

        let choice: usize = match input.parse() {
            Ok(n) => n,
            Err(_) => {
                return SelectionStep::RePrompt(
                    "Invalid input! Pick the number for the movie.".to_string(),
                )
            }
        };

        if choice < 1 || choice > self.ranked.len() {
            return SelectionStep::RePrompt(format!(
                "Invalid input! Pick a number between 1 and {}.",
                self.ranked.len()
            ));
        }

        let title = self.ranked[choice - 1].title.clone();
        self.state = SelectionState::Resolved(title.clone());
        SelectionStep::Resolved(title)
    }
}
