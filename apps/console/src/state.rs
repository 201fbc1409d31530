use dioxus::prelude::*;

use crate::api::{ClientResult, ErrorPayload};
use crate::models::{PredictionResult, ReferenceRecord};
use crate::schedule::{BrowserStore, CursorSettings, ScheduleCursor};

pub type AppSignal = Signal<AppState>;

/// Primary track: `Idle -> Predicting -> Displaying | Failed -> Predicting ...`
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PredictionPhase {
    #[default]
    Idle,
    Predicting,
    Displaying(PredictionResult),
    Failed(ErrorPayload),
}

/// Side track for the reference lookup; independent of the primary phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ReferencePhase {
    #[default]
    Idle,
    Fetching,
    Displayed(ReferenceRecord),
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictionView {
    pub phase: PredictionPhase,
    pub reference: ReferencePhase,
}

impl PredictionView {
    pub fn begin_prediction(&mut self) {
        self.phase = PredictionPhase::Predicting;
        self.reference = ReferencePhase::Idle;
    }

    /// Whichever response lands last wins; there is no request sequencing.
    pub fn apply_prediction(&mut self, outcome: ClientResult<PredictionResult>) {
        self.phase = match outcome {
            Ok(result) => PredictionPhase::Displaying(result),
            Err(err) => PredictionPhase::Failed(ErrorPayload::from(&err)),
        };
    }

    pub fn is_predicting(&self) -> bool {
        matches!(self.phase, PredictionPhase::Predicting)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.phase {
            PredictionPhase::Displaying(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        match &self.phase {
            PredictionPhase::Failed(payload) => Some(payload),
            _ => None,
        }
    }

    /// Returns false when no result is on screen to compare against.
    pub fn begin_reference(&mut self) -> bool {
        if self.result().is_none() {
            return false;
        }
        self.reference = ReferencePhase::Fetching;
        true
    }

    pub fn apply_reference(&mut self, record: Option<ReferenceRecord>) {
        self.reference = match record {
            Some(record) => ReferencePhase::Displayed(record),
            None => ReferencePhase::Failed,
        };
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendHealth {
    #[default]
    Unknown,
    Healthy,
    Unreachable,
}

#[derive(Clone, Debug)]
pub struct ScheduleSlot {
    pub cursor: ScheduleCursor<BrowserStore>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub schedule: ScheduleSlot,
    pub view: PredictionView,
    pub backend: BackendHealth,
}

impl AppState {
    pub fn new(settings: CursorSettings) -> Self {
        Self {
            schedule: ScheduleSlot {
                cursor: ScheduleCursor::new(BrowserStore, settings),
                is_loading: true,
                error: None,
            },
            view: PredictionView::default(),
            backend: BackendHealth::Unknown,
        }
    }
}

#[derive(Clone, Copy)]
pub struct AppActions {
    state: AppSignal,
}

impl AppActions {
    fn update(&self, apply: impl FnOnce(&mut AppState)) {
        let mut state = self.state;
        apply(&mut state.write());
    }

    pub fn set_schedule_loading(&self, loading: bool) {
        self.update(|state| state.schedule.is_loading = loading);
    }

    pub fn set_schedule_error(&self, message: Option<String>) {
        self.update(|state| state.schedule.error = message);
    }

    pub fn set_schedule(&self, cursor: ScheduleCursor<BrowserStore>) {
        self.update(|state| {
            state.schedule.cursor = cursor;
            state.schedule.error = None;
            state.schedule.is_loading = false;
        });
    }

    pub fn advance_schedule(&self) {
        self.update(|state| state.schedule.cursor.advance());
    }

    /// Clears the persisted schedule and reloads the page. Returns false when
    /// no page reload was possible and the caller must re-run initialization.
    pub fn reset_schedule(&self) -> bool {
        self.update(|state| {
            state.schedule.cursor.reset();
            state.schedule.is_loading = true;
        });
        reload_page()
    }

    pub fn begin_prediction(&self) {
        self.update(|state| state.view.begin_prediction());
    }

    pub fn finish_prediction(&self, outcome: ClientResult<PredictionResult>) {
        self.update(|state| state.view.apply_prediction(outcome));
    }

    pub fn begin_reference(&self) -> bool {
        let mut started = false;
        self.update(|state| started = state.view.begin_reference());
        started
    }

    pub fn finish_reference(&self, record: Option<ReferenceRecord>) {
        self.update(|state| state.view.apply_reference(record));
    }

    pub fn set_backend_health(&self, health: BackendHealth) {
        self.update(|state| state.backend = health);
    }
}

#[cfg(target_arch = "wasm32")]
fn reload_page() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.location().reload() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("page reload failed: {err:?}");
            false
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn reload_page() -> bool {
    false
}

pub fn use_app_state() -> AppSignal {
    use_context::<AppSignal>()
}

pub fn use_app_actions() -> AppActions {
    let state = use_app_state();
    AppActions { state }
}
