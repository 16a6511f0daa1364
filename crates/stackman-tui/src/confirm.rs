//! Two-stage confirmation for destroying a stack
//!
//! Destroy removes named volumes, so it needs two exact, case-sensitive
//! answers: `yes`, then `destroy`. Wrong answers clear the field and keep
//! the prompt; Esc is the only way out.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Answer required at the first prompt
pub const FIRST_ANSWER: &str = "yes";

/// Answer required at the second prompt
pub const SECOND_ANSWER: &str = "destroy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmStage {
    #[default]
    Idle = 0,
    FirstPrompt = 1,
    SecondPrompt = 2,
}

/// What a key did to the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Still waiting for input
    Pending,
    Cancelled,
    /// Both answers matched; the flow is back to idle
    Confirmed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationFlow {
    stage: ConfirmStage,
    first_input: String,
    second_input: String,
}

impl ConfirmationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> ConfirmStage {
        self.stage
    }

    pub fn first_input(&self) -> &str {
        &self.first_input
    }

    pub fn second_input(&self) -> &str {
        &self.second_input
    }

    /// Whether the flow owns the keyboard
    pub fn is_active(&self) -> bool {
        self.stage != ConfirmStage::Idle
    }

    /// Open the first prompt with empty fields
    pub fn begin(&mut self) {
        self.stage = ConfirmStage::FirstPrompt;
        self.first_input.clear();
        self.second_input.clear();
    }

    pub fn reset(&mut self) {
        self.stage = ConfirmStage::Idle;
        self.first_input.clear();
        self.second_input.clear();
    }

    fn active_input(&mut self) -> Option<&mut String> {
        match self.stage {
            ConfirmStage::Idle => None,
            ConfirmStage::FirstPrompt => Some(&mut self.first_input),
            ConfirmStage::SecondPrompt => Some(&mut self.second_input),
        }
    }

    /// Feed one key event to the flow
    pub fn handle_key(&mut self, key: KeyEvent) -> ConfirmOutcome {
        if !self.is_active() {
            return ConfirmOutcome::Pending;
        }

        match key.code {
            KeyCode::Esc => {
                self.reset();
                ConfirmOutcome::Cancelled
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                if let Some(input) = self.active_input() {
                    input.pop();
                }
                ConfirmOutcome::Pending
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let Some(input) = self.active_input() {
                    input.push(c);
                }
                ConfirmOutcome::Pending
            }
            _ => ConfirmOutcome::Pending,
        }
    }

    fn submit(&mut self) -> ConfirmOutcome {
        match self.stage {
            ConfirmStage::Idle => ConfirmOutcome::Pending,
            ConfirmStage::FirstPrompt => {
                if self.first_input == FIRST_ANSWER {
                    self.stage = ConfirmStage::SecondPrompt;
                    self.second_input.clear();
                } else {
                    self.first_input.clear();
                }
                ConfirmOutcome::Pending
            }
            ConfirmStage::SecondPrompt => {
                if self.second_input == SECOND_ANSWER {
                    self.reset();
                    ConfirmOutcome::Confirmed
                } else {
                    self.second_input.clear();
                    ConfirmOutcome::Pending
                }
            }
        }
    }
}
