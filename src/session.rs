use crate::feedback::{FeedbackEvent, FeedbackSink};
use crate::progress::ProgressSink;
use crate::prompt::{PracticePrompt, Projection, Tier};
use crate::stroke_order;
use crate::strokes::{StrokeShape, StrokeVerdict};
use crate::util::normalize_answer;
use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

pub const DEFAULT_TARGET_SCORE: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("prompt pool is empty")]
    EmptyPromptPool,
    #[error("target score must be positive")]
    InvalidTargetScore,
}

/// Whether a correct typed answer scores on its own, or only once the
/// character has also been fully drawn. Completing the drawing never scores
/// by itself under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringPolicy {
    #[default]
    TypedOnly,
    RequireDrawing,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub target_score: u32,
    pub time_limit_secs: Option<u32>,
    pub scoring: ScoringPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            time_limit_secs: None,
            scoring: ScoringPolicy::TypedOnly,
        }
    }
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Per-prompt state; rebuilt from scratch on every draw.
#[derive(Debug, Clone)]
pub struct ActivePrompt {
    pub prompt: PracticePrompt,
    /// Projection shown as the question, fixed at draw time (the tier2 coin
    /// flips here, not at answer time).
    pub shown: Projection,
    pub stroke_order: Option<&'static [StrokeShape]>,
    pub stroke_index: usize,
    pub last_stroke: Option<StrokeVerdict>,
}

impl ActivePrompt {
    /// The text displayed as the question.
    pub fn question(&self) -> &str {
        self.prompt
            .projection(self.shown)
            .unwrap_or(&self.prompt.native)
    }

    /// Projections accepted as a correct answer for this prompt.
    ///
    /// tier1 shows the native text and takes either the native text back or
    /// its romaji; tier2 expects the projection it did not show; tier3 shows
    /// the translation and expects native script. A tier2 prompt authored
    /// without romaji degrades to the tier1 rule.
    pub fn accepted_answers(&self) -> Vec<&str> {
        let p = &self.prompt;
        match (p.tier, self.shown) {
            (Tier::Tier1, _) => {
                let mut answers = vec![p.native.as_str()];
                if let Some(romaji) = p.romaji.as_deref() {
                    answers.push(romaji);
                }
                answers
            }
            (Tier::Tier2, Projection::Native) => match p.romaji.as_deref() {
                Some(romaji) => vec![romaji],
                None => vec![p.native.as_str()],
            },
            (Tier::Tier2, _) => vec![p.native.as_str()],
            (Tier::Tier3, _) => vec![p.native.as_str()],
        }
    }

    pub fn answer_matches(&self, normalized: &str) -> bool {
        if normalized.is_empty() {
            return false;
        }
        self.accepted_answers()
            .iter()
            .any(|a| normalize_answer(a) == normalized)
    }

    /// Shape the learner should draw next, if stroke validation is available
    /// and strokes remain.
    pub fn expected_stroke(&self) -> Option<StrokeShape> {
        let order = self.stroke_order?;
        order.get(self.stroke_index).copied()
    }

    /// True once every expected stroke has been matched. A prompt with no
    /// stroke-order entry has nothing to draw and counts as complete.
    pub fn drawing_complete(&self) -> bool {
        self.stroke_order
            .map_or(true, |order| self.stroke_index == order.len())
    }
}

/// Drives the question/answer loop and owns all session-scoped mutable
/// state. One instance per active session, driven synchronously by the
/// embedding's event loop.
#[derive(Debug)]
pub struct PracticeSession {
    pub pool: Vec<PracticePrompt>,
    pub config: SessionConfig,
    pub current: Option<ActivePrompt>,
    pub score: u32,
    pub attempts: u32,
    pub time_remaining_secs: Option<u32>,
    pub session_complete: bool,
    progress: Option<Box<dyn ProgressSink>>,
    feedback: Option<Box<dyn FeedbackSink>>,
}

impl PracticeSession {
    /// Validate the configuration and draw the initial prompt.
    pub fn start(pool: Vec<PracticePrompt>, config: SessionConfig) -> Result<Self, ConfigError> {
        if pool.is_empty() {
            return Err(ConfigError::EmptyPromptPool);
        }
        if config.target_score == 0 {
            return Err(ConfigError::InvalidTargetScore);
        }

        let mut session = Self {
            pool,
            config,
            current: None,
            score: 0,
            attempts: 0,
            time_remaining_secs: None,
            session_complete: false,
            progress: None,
            feedback: None,
        };
        session.next_prompt();
        Ok(session)
    }

    pub fn with_progress(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn with_feedback(mut self, sink: Box<dyn FeedbackSink>) -> Self {
        self.feedback = Some(sink);
        self
    }

    /// Draw a new prompt uniformly at random from the full pool. Repeats are
    /// allowed; there is no exclusion set. Resets per-prompt stroke state
    /// and the countdown.
    pub fn next_prompt(&mut self) {
        if self.session_complete {
            return;
        }

        let mut rng = rand::thread_rng();
        let prompt = match self.pool.choose(&mut rng) {
            Some(p) => p.clone(),
            None => return,
        };

        let shown = match prompt.tier {
            Tier::Tier1 => Projection::Native,
            Tier::Tier2 => {
                if prompt.romaji.is_some() && rng.gen_bool(0.5) {
                    Projection::Transliteration
                } else {
                    Projection::Native
                }
            }
            Tier::Tier3 => Projection::Translation,
        };

        let order = stroke_order::stroke_order_for(&prompt);
        self.current = Some(ActivePrompt {
            prompt,
            shown,
            stroke_order: order,
            stroke_index: 0,
            last_stroke: None,
        });
        self.time_remaining_secs = self.config.time_limit_secs;
    }

    /// Check a typed answer against the tier's accepted projections.
    ///
    /// Every submission terminates the current prompt: the outcome is
    /// recorded, counters advance, and unless the session just completed a
    /// fresh prompt is drawn. Returns `None` when the session is already
    /// complete (the call is a no-op).
    pub fn submit_typed_answer(&mut self, raw: &str) -> Option<Outcome> {
        if self.session_complete {
            return None;
        }

        let normalized = normalize_answer(raw);
        let (prompt_id, matched, drawing_done) = {
            let active = self.current.as_ref()?;
            (
                active.prompt.native.clone(),
                active.answer_matches(&normalized),
                active.drawing_complete(),
            )
        };

        let correct = matched
            && (self.config.scoring == ScoringPolicy::TypedOnly || drawing_done);

        self.attempts += 1;
        if correct {
            self.score += 1;
        }
        self.record_outcome(&prompt_id, correct);

        if correct && self.score >= self.config.target_score {
            self.session_complete = true;
            self.play(FeedbackEvent::Complete);
        } else {
            self.play(if correct {
                FeedbackEvent::Correct
            } else {
                FeedbackEvent::Incorrect
            });
            self.next_prompt();
        }

        Some(if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        })
    }

    /// Feed one classified stroke into the current prompt. A matched verdict
    /// advances the stroke cursor; completing the drawing never scores by
    /// itself. Callers should not invoke this for prompts without a
    /// stroke-order entry; such calls are ignored.
    pub fn submit_stroke(&mut self, verdict: StrokeVerdict) {
        if self.session_complete {
            return;
        }
        let Some(active) = self.current.as_mut() else {
            return;
        };
        let Some(order) = active.stroke_order else {
            return;
        };

        active.last_stroke = Some(verdict);
        if verdict.matched && active.stroke_index < order.len() {
            active.stroke_index += 1;
        }
    }

    /// Cooperative one-second countdown. Reaching zero treats the prompt as
    /// incorrect and draws the next one; sessions without a time limit
    /// ignore ticks.
    pub fn tick(&mut self) {
        if self.session_complete {
            return;
        }
        let Some(remaining) = self.time_remaining_secs else {
            return;
        };

        let remaining = remaining.saturating_sub(1);
        self.time_remaining_secs = Some(remaining);

        if remaining == 0 {
            let prompt_id = match &self.current {
                Some(active) => active.prompt.native.clone(),
                None => return,
            };
            self.attempts += 1;
            self.record_outcome(&prompt_id, false);
            self.play(FeedbackEvent::Incorrect);
            self.next_prompt();
        }
    }

    /// Shape the learner should draw next, for the embedding to hand to the
    /// classifier.
    pub fn expected_stroke(&self) -> Option<StrokeShape> {
        self.current.as_ref().and_then(|a| a.expected_stroke())
    }

    // Best-effort, at-most-once; sink failures never touch session state.
    fn record_outcome(&mut self, prompt_id: &str, was_correct: bool) {
        if let Some(sink) = self.progress.as_mut() {
            let _ = sink.record_attempt(prompt_id, was_correct, Local::now());
        }
    }

    fn play(&mut self, event: FeedbackEvent) {
        if let Some(sink) = self.feedback.as_mut() {
            sink.play(event);
        }
    }
}
