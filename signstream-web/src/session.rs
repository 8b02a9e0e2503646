//! Per-user pipeline state and the per-frame pass
//!
//! Every user gets their own tic history, gesture buffer and transcript.
//! Frames are processed one at a time, in timestamp order, against whichever
//! session is active. Frames seen while nobody is identified go to a guest
//! session that is never persisted.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::{
    extract_features, InferenceRequest, RecognitionResult, SequenceModel, SignRecognizer,
    SignVocabulary,
};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::identity::{FaceDescriptor, FaceMatcher, IdentityMatch};
use crate::landmarks::{
    extract_hand_shape, HandLandmarks, HandShape, Landmark, LandmarkFrame, LandmarkSet,
};
use crate::mood::{classify_mood, MoodLabel};
use crate::record::{TranslationRecord, Transcript};
use crate::tic::{TicFilter, TicProfile};

/// State owned by one tracked user
pub struct UserSession {
    profile: TicProfile,
    tic_filter: TicFilter,
    recognizer: SignRecognizer,
    transcript: Transcript,
}

impl UserSession {
    fn new(config: &PipelineConfig, profile: TicProfile) -> Self {
        Self {
            profile,
            tic_filter: TicFilter::new(config.tics.clone()),
            recognizer: SignRecognizer::new(
                config.buffer_capacity,
                SignVocabulary::new(config.vocabulary.iter().cloned()),
                config.confidence_threshold,
            ),
            transcript: Transcript::default(),
        }
    }

    /// Drop temporal state so the next frame starts clean
    fn reset_tracking(&mut self) {
        self.tic_filter.reset();
        self.recognizer.clear_buffer();
    }

    pub fn profile(&self) -> &TicProfile {
        &self.profile
    }

    pub fn tic_filter(&self) -> &TicFilter {
        &self.tic_filter
    }

    pub fn recognizer(&self) -> &SignRecognizer {
        &self.recognizer
    }

    pub fn transcript(&self) -> String {
        self.transcript.text()
    }
}

/// Result of one pass over a frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub face: LandmarkSet,
    pub pose: LandmarkSet,
    pub hands: Vec<HandLandmarks>,
    pub mood: MoodLabel,
    pub hand_shapes: Vec<HandShape>,
    /// Gesture buffer holds a full window after this frame
    pub ready: bool,
    /// Set on the frame that identified the active user
    pub identified_user: Option<IdentityMatch>,
}

/// A sign that passed the confidence gate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignEvent {
    pub result: RecognitionResult,
    pub transcript: String,
    /// Present when the active user is a registered one
    pub record: Option<TranslationRecord>,
}

/// Outstanding asynchronous request: which session issued it, and its local ticket
struct InFlight {
    owner: Option<String>,
    local_ticket: u64,
}

pub struct SessionContext {
    config: PipelineConfig,
    users: HashMap<String, UserSession>,
    guest: UserSession,
    active: Option<String>,
    matcher: FaceMatcher,
    recording: bool,
    model_ready: bool,
    last_timestamp_ms: Option<f64>,
    next_ticket: u64,
    in_flight: HashMap<u64, InFlight>,
}

impl SessionContext {
    pub fn new(config: PipelineConfig) -> Self {
        let guest = UserSession::new(&config, TicProfile::empty());
        let matcher = FaceMatcher::new(config.face_match_threshold);
        Self {
            config,
            users: HashMap::new(),
            guest,
            active: None,
            matcher,
            recording: true,
            model_ready: false,
            last_timestamp_ms: None,
            next_ticket: 1,
            in_flight: HashMap::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ========================================================================
    // USERS
    // ========================================================================

    /// Create or replace a user. Replacing starts them from empty history.
    pub fn register_user(&mut self, user_id: &str, profile: TicProfile) {
        let mut session = UserSession::new(&self.config, profile);
        session.recognizer.set_model_ready(self.model_ready);
        self.drop_requests_of(Some(user_id));
        if self.users.insert(user_id.to_string(), session).is_some() {
            info!("Re-registered user '{}', history reset", user_id);
        } else {
            info!("Registered user '{}'", user_id);
        }
    }

    /// Attach a face descriptor used to identify an existing user
    pub fn register_face(&mut self, user_id: &str, descriptor: FaceDescriptor) -> Result<()> {
        if !self.users.contains_key(user_id) {
            return Err(Error::UnknownUser(user_id.to_string()));
        }
        self.matcher.register(user_id, descriptor);
        Ok(())
    }

    pub fn remove_user(&mut self, user_id: &str) {
        if self.active.as_deref() == Some(user_id) {
            self.switch_to(None);
        }
        self.drop_requests_of(Some(user_id));
        self.users.remove(user_id);
        self.matcher.forget(user_id);
    }

    /// Switch the active session. `None` goes back to the guest session.
    pub fn set_active_user(&mut self, user_id: Option<&str>) -> Result<()> {
        if let Some(id) = user_id {
            if !self.users.contains_key(id) {
                return Err(Error::UnknownUser(id.to_string()));
            }
        }
        self.switch_to(user_id.map(str::to_string));
        Ok(())
    }

    /// Change the active session. The outgoing user's requests are dropped
    /// and the incoming session starts a fresh window.
    fn switch_to(&mut self, user_id: Option<String>) {
        if self.active == user_id {
            return;
        }
        debug!("Active user {:?} -> {:?}", self.active, user_id);
        let outgoing = self.active.take();
        self.drop_requests_of(outgoing.as_deref());
        self.active = user_id;
        self.active_session_mut().reset_tracking();
    }

    fn drop_requests_of(&mut self, owner: Option<&str>) {
        self.in_flight.retain(|_, pending| pending.owner.as_deref() != owner);
    }

    pub fn active_user(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn user(&self, user_id: &str) -> Option<&UserSession> {
        self.users.get(user_id)
    }

    pub fn active_session(&self) -> &UserSession {
        self.active
            .as_ref()
            .and_then(|id| self.users.get(id))
            .unwrap_or(&self.guest)
    }

    fn active_session_mut(&mut self) -> &mut UserSession {
        match self.active.as_ref().and_then(|id| self.users.get_mut(id)) {
            Some(session) => session,
            None => &mut self.guest,
        }
    }

    // ========================================================================
    // RECORDING LIFECYCLE
    // ========================================================================

    pub fn start_recording(&mut self) {
        self.active_session_mut().reset_tracking();
        self.in_flight.clear();
        self.recording = true;
        info!("Recording started");
    }

    pub fn stop_recording(&mut self) {
        self.recording = false;
        self.active_session_mut().reset_tracking();
        self.in_flight.clear();
        info!("Recording stopped");
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// The external model finished (or failed) loading
    pub fn set_model_ready(&mut self, ready: bool) {
        self.model_ready = ready;
        self.guest.recognizer.set_model_ready(ready);
        for session in self.users.values_mut() {
            session.recognizer.set_model_ready(ready);
        }
    }

    pub fn is_model_ready(&self) -> bool {
        self.model_ready
    }

    // ========================================================================
    // FRAME PASS
    // ========================================================================

    /// Tic filter → {mood, features} → gesture buffer, for one frame
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> Result<FrameOutput> {
        let now = frame.timestamp_ms;
        if !now.is_finite() {
            return Err(Error::InvalidInput(format!("frame timestamp {} is not finite", now)));
        }
        if let Some(last) = self.last_timestamp_ms {
            if now < last {
                return Err(Error::OutOfOrderFrame { last_ms: last, got_ms: now });
            }
        }
        self.last_timestamp_ms = Some(now);

        let identified_user = self.identify(&frame.face);
        let recording = self.recording;
        let session = self.active_session_mut();

        let face = session.tic_filter.filter_facial_tics(&frame.face, &session.profile, now);
        let pose = session.tic_filter.filter_postural_tics(&frame.pose, &session.profile, now);
        let hands = frame.hands.clone();

        let mood = classify_mood(&face);
        let hand_shapes = hands.iter().filter_map(extract_hand_shape).collect();

        let ready = if recording {
            session.recognizer.add_frame(extract_features(&hands, &pose))
        } else {
            session.recognizer.is_ready()
        };

        Ok(FrameOutput {
            face,
            pose,
            hands,
            mood,
            hand_shapes,
            ready,
            identified_user,
        })
    }

    /// Activate a registered user whose face matches, if nobody is active
    fn identify(&mut self, face: &[Landmark]) -> Option<IdentityMatch> {
        if self.active.is_some() || self.matcher.is_empty() || face.is_empty() {
            return None;
        }
        let found = self.matcher.recognize(face)?;
        if !self.users.contains_key(&found.user_id) {
            return None;
        }
        info!("Identified user '{}' ({:.2})", found.user_id, found.confidence);
        self.switch_to(Some(found.user_id.clone()));
        Some(found)
    }

    // ========================================================================
    // RECOGNITION
    // ========================================================================

    /// Classify the active session's window in place
    pub fn recognize_sign(&mut self, model: Option<&mut dyn SequenceModel>) -> Option<SignEvent> {
        let result = self.active_session_mut().recognizer.recognize_sign(model)?;
        Some(self.emit(result))
    }

    /// Cut a window for an external model. The returned ticket is only valid
    /// for this context.
    pub fn request_inference(&mut self) -> Option<InferenceRequest> {
        let owner = self.active.clone();
        let mut request = self.active_session_mut().recognizer.request_inference()?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(ticket, InFlight { owner, local_ticket: request.ticket });
        // An unanswered request is superseded once a full window has passed
        let oldest_kept = ticket.saturating_sub(self.config.buffer_capacity as u64);
        self.in_flight.retain(|t, _| *t > oldest_kept);
        request.ticket = ticket;
        Some(request)
    }

    /// Apply an external model's answer. Answers for requests that were
    /// superseded, cleared, or issued for another user are dropped.
    pub fn complete_inference(&mut self, ticket: u64, probabilities: &[f32]) -> Option<SignEvent> {
        let Some(pending) = self.in_flight.remove(&ticket) else {
            debug!("No request in flight for ticket {}", ticket);
            return None;
        };
        self.in_flight.retain(|t, _| *t > ticket);

        if pending.owner != self.active {
            warn!("Dropping result for ticket {}: user changed", ticket);
            return None;
        }
        let result = self
            .active_session_mut()
            .recognizer
            .complete_inference(pending.local_ticket, probabilities)?;
        Some(self.emit(result))
    }

    fn emit(&mut self, result: RecognitionResult) -> SignEvent {
        let timestamp = self.last_timestamp_ms.unwrap_or_default();
        let record = self
            .active
            .as_deref()
            .map(|id| TranslationRecord::from_sign(id, &result, timestamp));

        let session = self.active_session_mut();
        session.transcript.push(&result.label);
        info!("Recognized '{}' ({:.2})", result.label, result.confidence);

        SignEvent {
            transcript: session.transcript.text(),
            result,
            record,
        }
    }

    pub fn transcript(&self) -> String {
        self.active_session().transcript()
    }

    pub fn clear_transcript(&mut self) {
        self.active_session_mut().transcript.clear();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
