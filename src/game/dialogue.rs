//! Dialogues: narrative text plus an ordered, non-empty list of choices.

use serde::Serialize;

use crate::game::EndingKind;

/// What happens when a choice is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "ending", rename_all = "snake_case")]
pub enum ChoiceAction {
    /// Close the dialogue and continue playing.
    Resume,
    /// End the session with the given ending.
    Conclude(EndingKind),
}

/// One selectable option of a dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    label: String,
    action: ChoiceAction,
}

impl Choice {
    /// Create a choice.
    #[must_use]
    pub fn new(label: impl Into<String>, action: ChoiceAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }

    /// Button text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resolution action.
    #[must_use]
    pub const fn action(&self) -> ChoiceAction {
        self.action
    }
}

/// An open dialogue. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dialogue {
    text: String,
    choices: Vec<Choice>,
}

impl Dialogue {
    /// Build a dialogue from a fixed, non-empty array of choices.
    #[must_use]
    pub fn from_choices<const N: usize>(text: impl Into<String>, choices: [Choice; N]) -> Self {
        const { assert!(N > 0, "a dialogue needs at least one choice") };
        Self {
            text: text.into(),
            choices: choices.into(),
        }
    }

    /// A dialogue with a single resume choice.
    #[must_use]
    pub fn acknowledge(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: vec![Choice::new(label, ChoiceAction::Resume)],
        }
    }

    /// Body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Choices in display order. Never empty.
    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// The choice at `index`, if any.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }
}
