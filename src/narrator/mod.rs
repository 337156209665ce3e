//! Generative text collaborator.
//!
//! ```text
//!   prompt ──▶ Narrator::ask ──▶ full text ──▶ RevealSequence ──▶ UI frames
//!                 │
//!          GeminiNarrator (HTTP) or CannedNarrator (tests)
//! ```
//!
//! The UI never blocks on a request: [`PendingAnswer::spawn`] runs `ask` on
//! its own thread and the UI polls for the reply once per frame.

pub mod gemini;
pub mod reveal;

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use crate::error::{DashboardError, Result};

pub use gemini::GeminiNarrator;
pub use reveal::RevealSequence;

// ---------------------------------------------------------------------------
// Narrator trait
// ---------------------------------------------------------------------------

pub trait Narrator: Send + Sync {
    /// Send one prompt and return the generated text.
    fn ask(&self, prompt: &str) -> Result<String>;
}

/// Returns the same text (or error) for every prompt.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct CannedNarrator {
    reply: Result<String>,
}

#[cfg(test)]
impl CannedNarrator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(DashboardError::ServiceError(message.to_string())),
        }
    }
}

#[cfg(test)]
impl Narrator for CannedNarrator {
    fn ask(&self, _prompt: &str) -> Result<String> {
        self.reply.clone()
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

const PLANET_AI_PREAMBLE: &str = "You are PlanetAI, an expert in climate change, natural disasters, \
environmental protection, CO₂ emissions, deforestation, and sustainability. Only answer questions \
related to these topics. If the user's question is irrelevant (like gaming, politics, or gossip), \
politely reply: 'I'm here to assist only with climate, environment, and Earth-related topics! 🌍' \
Here is the user's question:\n";

/// Wrap a user question in the domain-restricting instructions.
pub fn question_prompt(question: &str) -> String {
    format!("{PLANET_AI_PREAMBLE}{}", question.trim())
}

/// Ask for a short narrative of the disaster trend over the horizon.
pub fn forecast_prompt(first_year: i32, last_year: i32) -> String {
    format!(
        "Predict the trend of global natural disasters between {first_year} and {last_year} \
         considering rising climate change impacts. Give a short futuristic summary."
    )
}

// ---------------------------------------------------------------------------
// Off-thread request
// ---------------------------------------------------------------------------

/// One in-flight `ask`. There is no cancellation: dropping this only
/// discards the reply.
pub struct PendingAnswer {
    rx: Receiver<Result<String>>,
}

impl PendingAnswer {
    pub fn spawn(narrator: Arc<dyn Narrator>, prompt: String) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            log::debug!("Narrator request ({} chars)", prompt.len());
            let reply = narrator.ask(&prompt);
            if let Err(e) = &reply {
                log::error!("Narrator request failed: {e}");
            }
            // Receiver gone means the UI moved on.
            let _ = tx.send(reply);
        });
        Self { rx }
    }

    /// `None` while the request is still running.
    pub fn poll(&self) -> Option<Result<String>> {
        match self.rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DashboardError::ServiceError(
                "request ended without a reply".to_string(),
            ))),
        }
    }

    /// Block until the reply arrives.
    #[cfg(test)]
    pub fn wait(self) -> Result<String> {
        self.rx.recv().unwrap_or_else(|_| {
            Err(DashboardError::ServiceError(
                "request ended without a reply".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_prompt_carries_preamble_and_question() {
        let p = question_prompt("  Why are glaciers shrinking? ");
        assert!(p.starts_with("You are PlanetAI"));
        assert!(p.contains("Only answer questions related to these topics"));
        assert!(p.ends_with("\nWhy are glaciers shrinking?"));
    }

    #[test]
    fn forecast_prompt_names_the_horizon() {
        let p = forecast_prompt(2025, 2040);
        assert!(p.contains("between 2025 and 2040"));
        assert!(p.contains("short futuristic summary"));
    }

    #[test]
    fn pending_answer_delivers_reply() {
        let narrator: Arc<dyn Narrator> = Arc::new(CannedNarrator::replying("Sea levels rise."));
        let pending = PendingAnswer::spawn(narrator, question_prompt("sea level?"));
        assert_eq!(pending.wait().unwrap(), "Sea levels rise.");
    }

    #[test]
    fn pending_answer_delivers_service_error() {
        let narrator: Arc<dyn Narrator> = Arc::new(CannedNarrator::failing("quota exceeded"));
        let pending = PendingAnswer::spawn(narrator, "x".into());
        assert_eq!(
            pending.wait().unwrap_err(),
            DashboardError::ServiceError("quota exceeded".into())
        );
    }
}
