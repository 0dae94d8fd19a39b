//! BrandyBot Client SDK.
//!
//! Typed access to the BrandyBot REST API plus the chat-style logo interview.
//!
//! # Example
//!
//! ```no_run
//! use brandybot_client::{BrandyBotClient, InterviewSession, Turn};
//!
//! # async fn example() -> Result<(), brandybot_client::ClientError> {
//! let client = BrandyBotClient::new("http://localhost:5000")?.with_token("firebase-id-token");
//!
//! let mut session = InterviewSession::new();
//! session.send(&client, "Hoot").await?;
//! session.send(&client, "playful").await?;
//! if let Turn::Generated(logo) = session.send(&client, "education").await? {
//!     println!("Logo: {}", logo.logo.logo_url);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
pub mod interview;
mod types;

pub use client::{BrandyBotClient, ClientOptions};
pub use error::ClientError;
pub use interview::{InterviewSession, Message, Sender, Turn};
pub use types::*;
