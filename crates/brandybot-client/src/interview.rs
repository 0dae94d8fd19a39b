//! Chat-style logo interview driven against the API.
//!
//! The session asks the fixed questions from [`brandybot_core::Interview`]
//! and, once the last one is answered, requests a logo built from the answers.

use brandybot_core::interview::GENERATING;
use brandybot_core::{Interview, InterviewAnswers, Question, Step};

use crate::client::BrandyBotClient;
use crate::error::ClientError;
use crate::types::{GenerateLogoRequest, GeneratedLogo};

/// Reply after a successful generation.
pub const LOGO_READY: &str = "Here is a logo option based on your inputs!";

/// Reply after a failed generation.
pub const LOGO_FAILED: &str =
    "Sorry, I encountered an error generating your logo. Please try again.";

/// Who wrote a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// BrandyBot.
    Bot,
    /// The user.
    User,
}

/// One line of the interview transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Author.
    pub sender: Sender,
    /// Text.
    pub text: String,
}

/// Outcome of sending one answer.
#[derive(Debug)]
pub enum Turn {
    /// Blank input; nothing was recorded.
    Ignored,
    /// The next question to show.
    Asked(Question),
    /// The logo was generated.
    Generated(Box<GeneratedLogo>),
    /// Generation failed; the session can be [reset](InterviewSession::reset).
    Failed(ClientError),
}

/// A logo interview with its transcript.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    interview: Interview,
    transcript: Vec<Message>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    /// Start a session with the greeting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interview: Interview::new(),
            transcript: vec![bot(Question::BrandName.prompt())],
        }
    }

    /// Lines exchanged so far, oldest first.
    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn current(&self) -> Option<Question> {
        self.interview.current()
    }

    /// Answer the current question; the final answer triggers generation.
    ///
    /// # Errors
    ///
    /// Returns `InterviewComplete` when every question is already answered.
    pub async fn send(
        &mut self,
        client: &BrandyBotClient,
        input: &str,
    ) -> Result<Turn, ClientError> {
        if input.trim().is_empty() {
            return Ok(Turn::Ignored);
        }

        let step = self.interview.answer(input)?;
        self.transcript.push(Message {
            sender: Sender::User,
            text: input.to_string(),
        });

        let answers = match step {
            Step::Ask(question) => {
                self.transcript.push(bot(question.prompt()));
                return Ok(Turn::Asked(question));
            }
            Step::Done(answers) => answers,
        };

        self.transcript.push(bot(GENERATING));
        match client.generate_logo(&logo_request(&answers)).await {
            Ok(logo) => {
                self.transcript.push(bot(LOGO_READY));
                Ok(Turn::Generated(Box::new(logo)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Interview logo generation failed");
                self.transcript.push(bot(LOGO_FAILED));
                Ok(Turn::Failed(e))
            }
        }
    }

    /// Start over with a fresh transcript.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// The generation request built from finished interview answers.
#[must_use]
pub fn logo_request(answers: &InterviewAnswers) -> GenerateLogoRequest {
    GenerateLogoRequest {
        brand_name: answers.brand_name.clone(),
        prompt: answers.prompt(),
        style: Some(answers.style.clone()),
        industry: Some(answers.industry.clone()),
        colors: Vec::new(),
    }
}

fn bot(text: &str) -> Message {
    Message {
        sender: Sender::Bot,
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_interview_prompt() {
        let request = logo_request(&InterviewAnswers {
            brand_name: "Hoot".into(),
            style: "playful".into(),
            industry: "education".into(),
        });
        assert_eq!(request.brand_name, "Hoot");
        assert_eq!(request.prompt, "A playful logo for Hoot in education industry");
        assert_eq!(request.style.as_deref(), Some("playful"));
        assert_eq!(request.industry.as_deref(), Some("education"));
    }

    #[test]
    fn new_session_greets() {
        let session = InterviewSession::new();
        assert_eq!(session.current(), Some(Question::BrandName));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].sender, Sender::Bot);
    }
}
