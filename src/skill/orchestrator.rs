use std::sync::Arc;

use crate::claims::{self, ClaimsQuery};
use crate::config::Config;
use crate::lookup::{
    build_client, ClaimsFetcher, EntityResolver, HttpClaimsFetcher, HttpEntityResolver, RetryPolicy,
};
use crate::skill::request::{Intent, RequestEnvelope, Session, SkillRequest};
use crate::skill::response::{Card, Image, OutputSpeech, ResponseEnvelope, SpeechletResponse};
use crate::{ConceptMapError, Result};

pub const CLAIMS_INTENT: &str = "OneshotClaimsIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";

pub const SLOT_ITEM: &str = "Item";
pub const SLOT_RELATIONSHIP: &str = "Relationship";

const DEFAULT_CARD_TITLE: &str = "Concept Map";
const WELCOME_PROMPT: &str = "Which item and relationship would you like claims for?";
const WELCOME_REPROMPT: &str = "I can lead you through providing an item and relationship to get claims, \
     or you can simply open Concept Map and ask a question like, what teams has Lionel Messi played on. ";
const MISSING_SLOTS: &str = "I need both an Item and a Relationship";
const GOODBYE: &str = "Goodbye";
const SERVICE_UNAVAILABLE: &str =
    "Sorry, the Concept Map claims service is experiencing a problem. Please try again later.";

/// Spoken answer plus the picture for the card
struct ClaimsAnswer {
    speech: String,
    picture_url: Option<String>,
}

/// Answers claims questions: resolve the item, fetch its one-hop claims,
/// project them and render the speech and card.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct IntentOrchestrator {
    resolver: Arc<dyn EntityResolver>,
    fetcher: Arc<dyn ClaimsFetcher>,
    relationship_id: String,
    card_title: String,
}

impl IntentOrchestrator {
    pub fn new(
        resolver: Arc<dyn EntityResolver>,
        fetcher: Arc<dyn ClaimsFetcher>,
        relationship_id: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            relationship_id: relationship_id.into(),
            card_title: DEFAULT_CARD_TITLE.to_string(),
        }
    }

    pub fn with_card_title(mut self, card_title: impl Into<String>) -> Self {
        self.card_title = card_title.into();
        self
    }

    /// Wire the HTTP-backed resolver and fetcher from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let services = &config.services;
        let client = build_client(services.timeout())?;
        let policy = RetryPolicy::new(services.max_retries, services.timeout());

        let resolver = HttpEntityResolver::new(
            client.clone(),
            services.id_locator_url.clone(),
            services.language.clone(),
            policy,
        );
        let fetcher = HttpClaimsFetcher::new(client, services.traversal_url.clone(), policy);

        Ok(Self::new(Arc::new(resolver), Arc::new(fetcher), services.relationship_id.clone())
            .with_card_title(config.conceptmap.card_title.clone()))
    }

    /// Dispatch one request envelope.
    ///
    /// Only an unrecognized intent is an error; every other failure is
    /// turned into speech.
    pub async fn handle(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope> {
        let session = &envelope.session;
        if session.new {
            self.on_session_started(envelope.request.request_id(), session);
        }

        let response = match &envelope.request {
            SkillRequest::Launch(request) => self.on_launch(&request.request_id, session),
            SkillRequest::SessionStarted(request) => {
                if !session.new {
                    self.on_session_started(&request.request_id, session);
                }
                SpeechletResponse::empty()
            }
            SkillRequest::Intent(request) => {
                self.on_intent(&request.request_id, &request.intent, session).await?
            }
            SkillRequest::SessionEnded(request) => {
                log::info!(
                    "onSessionEnded requestId={}, sessionId={}, reason={}",
                    request.request_id,
                    session.session_id,
                    request.reason.as_deref().unwrap_or("unknown")
                );
                SpeechletResponse::empty()
            }
        };

        Ok(ResponseEnvelope::new(response))
    }

    pub fn on_session_started(&self, request_id: &str, session: &Session) {
        log::info!("onSessionStarted requestId={}, sessionId={}", request_id, session.session_id);
    }

    pub fn on_launch(&self, request_id: &str, session: &Session) -> SpeechletResponse {
        log::info!("onLaunch requestId={}, sessionId={}", request_id, session.session_id);
        welcome_response()
    }

    pub async fn on_intent(&self, request_id: &str, intent: &Intent, session: &Session) -> Result<SpeechletResponse> {
        log::info!(
            "onIntent requestId={}, sessionId={}, intent={}",
            request_id,
            session.session_id,
            intent.name
        );

        match intent.name.as_str() {
            CLAIMS_INTENT => {
                let item = intent.slot_value(SLOT_ITEM);
                let relationship = intent.slot_value(SLOT_RELATIONSHIP);
                match (item, relationship) {
                    (Some(item), Some(relationship)) => {
                        log::info!("Claims request: item='{}', relationship='{}'", item, relationship);
                        Ok(self.answer_claims(&ClaimsQuery::new(item, relationship)).await)
                    }
                    _ => {
                        log::info!("Claims request missing slots: item={:?}, relationship={:?}", item, relationship);
                        Ok(SpeechletResponse::ask(
                            OutputSpeech::plain(MISSING_SLOTS),
                            OutputSpeech::plain(MISSING_SLOTS),
                        ))
                    }
                }
            }
            STOP_INTENT | CANCEL_INTENT => Ok(SpeechletResponse::tell(OutputSpeech::plain(GOODBYE), None)),
            other => {
                log::error!("Invalid intent {} for requestId={}", other, request_id);
                Err(ConceptMapError::InvalidIntent(other.to_string()))
            }
        }
    }

    /// Answer one claims question with a tell response and card.
    pub async fn answer_claims(&self, query: &ClaimsQuery) -> SpeechletResponse {
        let answer = self.claims_answer(query).await;

        let card = Card::Standard {
            title: self.card_title.clone(),
            text: answer.speech.clone(),
            image: Image {
                large_image_url: answer.picture_url,
            },
        };

        SpeechletResponse::tell(OutputSpeech::plain(answer.speech), Some(card))
    }

    async fn claims_answer(&self, query: &ClaimsQuery) -> ClaimsAnswer {
        log::debug!("resolving '{}'", query.item);
        let item_id = match self.resolver.resolve(&query.item).await {
            Some(id) => id,
            None => {
                return ClaimsAnswer {
                    speech: format!("Couldn't locate an Item ID for item {}", query.item),
                    picture_url: None,
                };
            }
        };

        // The spoken relationship is only echoed back; the configured id is queried.
        log::debug!("fetching claims for {} / {}", item_id, self.relationship_id);
        let document = match self.fetcher.fetch_claims(&item_id, &self.relationship_id).await {
            Some(doc) => doc,
            None => {
                return ClaimsAnswer {
                    speech: SERVICE_UNAVAILABLE.to_string(),
                    picture_url: None,
                };
            }
        };

        let not_found = format!("Item {} not found", query.item);
        let claims = match claims::project(&document, &item_id) {
            Ok(claims) => claims,
            Err(e) => {
                log::error!("Exception occurred while parsing traversal response for {}: {}", item_id, e);
                return ClaimsAnswer {
                    speech: not_found,
                    picture_url: None,
                };
            }
        };
        log::info!("claimsInfo: {:?}", claims);

        let speech = if claims.item_labels.is_empty() {
            not_found
        } else {
            format!(
                "{} has been a member of {} {}",
                query.item,
                query.relationship,
                claims.to_item_labels_speech()
            )
        };

        ClaimsAnswer {
            speech,
            picture_url: claims.picture_url,
        }
    }
}

fn welcome_response() -> SpeechletResponse {
    let speech = format!("<speak>Welcome to Concept Map. {}</speak>", WELCOME_PROMPT);
    SpeechletResponse::ask(OutputSpeech::ssml(speech), OutputSpeech::plain(WELCOME_REPROMPT))
}
