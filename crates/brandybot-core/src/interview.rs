//! The logo interview: three fixed questions answered in order.

use serde::{Deserialize, Serialize};

use crate::error::{BrandyError, Result};

/// Greeting shown before the first answer.
pub const GREETING: &str =
    "Hi! I'm BrandyBot. Let's design your perfect logo. Tell me your brand name to get started!";

/// Reply once all answers are in.
pub const GENERATING: &str = "Perfect! Generating some logo options for you...";

/// A question in the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    /// Brand name.
    BrandName,
    /// Preferred style.
    Style,
    /// Industry.
    Industry,
}

impl Question {
    /// Questions in the order they are asked.
    pub const SEQUENCE: [Self; 3] = [Self::BrandName, Self::Style, Self::Industry];

    /// Prompt shown to the user.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self {
            Self::BrandName => GREETING,
            Self::Style => "Great! Now tell me your preferred style (e.g., modern, playful, classic).",
            Self::Industry => "Nice! Finally, what industry is your brand in?",
        }
    }
}

/// Answers collected by a finished interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewAnswers {
    /// Brand name.
    pub brand_name: String,
    /// Style as typed.
    pub style: String,
    /// Industry as typed.
    pub industry: String,
}

impl InterviewAnswers {
    /// The free-text prompt the interview sends to the generator.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "A {} logo for {} in {} industry",
            self.style, self.brand_name, self.industry
        )
    }
}

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask the next question.
    Ask(Question),
    /// All questions answered.
    Done(InterviewAnswers),
}

/// Linear interview state: an index into [`Question::SEQUENCE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interview {
    answers: Vec<String>,
}

impl Interview {
    /// Start a new interview.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn current(&self) -> Option<Question> {
        Question::SEQUENCE.get(self.answers.len()).copied()
    }

    /// Whether every question is answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current().is_none()
    }

    /// Answer the current question. Blank answers re-ask the same question.
    ///
    /// # Errors
    ///
    /// Returns `InterviewComplete` when there is nothing left to answer.
    pub fn answer(&mut self, text: &str) -> Result<Step> {
        let question = self.current().ok_or(BrandyError::InterviewComplete)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(Step::Ask(question));
        }
        self.answers.push(text.to_string());

        Ok(match (self.current(), self.answers.as_slice()) {
            (Some(next), _) => Step::Ask(next),
            (None, [brand_name, style, industry]) => Step::Done(InterviewAnswers {
                brand_name: brand_name.clone(),
                style: style.clone(),
                industry: industry.clone(),
            }),
            (None, _) => return Err(BrandyError::InterviewComplete),
        })
    }

    /// Start over.
    pub fn reset(&mut self) {
        self.answers.clear();
    }
}
