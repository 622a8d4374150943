//! Voice-platform surface: request/response envelopes and the intent
//! orchestrator that answers them.

pub mod orchestrator;
pub mod request;
pub mod response;

pub use orchestrator::IntentOrchestrator;
pub use request::{Intent, RequestEnvelope, Session, SkillRequest, Slot};
pub use response::{Card, Image, OutputSpeech, ResponseEnvelope, SpeechletResponse};
