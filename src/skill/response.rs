use serde::Serialize;

/// Outbound response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub version: String,
    pub response: SpeechletResponse,
}

impl ResponseEnvelope {
    pub fn new(response: SpeechletResponse) -> Self {
        Self {
            version: "1.0".to_string(),
            response,
        }
    }
}

/// Speech to be rendered by the platform
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        OutputSpeech::PlainText { text: text.into() }
    }

    pub fn ssml(ssml: impl Into<String>) -> Self {
        OutputSpeech::Ssml { ssml: ssml.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            OutputSpeech::PlainText { text } => text,
            OutputSpeech::Ssml { ssml } => ssml,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image_url: Option<String>,
}

/// Visual card shown alongside the speech
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    Standard { title: String, text: String, image: Image },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

impl SpeechletResponse {
    /// Final answer; ends the session.
    pub fn tell(speech: OutputSpeech, card: Option<Card>) -> Self {
        Self {
            output_speech: Some(speech),
            card,
            reprompt: None,
            should_end_session: true,
        }
    }

    /// Prompt expecting a reply.
    pub fn ask(speech: OutputSpeech, reprompt: OutputSpeech) -> Self {
        Self {
            output_speech: Some(speech),
            card: None,
            reprompt: Some(Reprompt {
                output_speech: reprompt,
            }),
            should_end_session: false,
        }
    }

    /// No speech at all (session-ended acknowledgement).
    pub fn empty() -> Self {
        Self {
            output_speech: None,
            card: None,
            reprompt: None,
            should_end_session: true,
        }
    }

    pub fn speech_text(&self) -> Option<&str> {
        self.output_speech.as_ref().map(OutputSpeech::text)
    }
}
