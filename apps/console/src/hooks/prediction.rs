use dioxus::prelude::*;

use crate::api::{ClientError, ClientResult, PolicyGameClient};
use crate::models::{PredictionResult, ReferenceRecord};
use crate::shaping::reference_from_meta;
use crate::state::AppActions;
use crate::API_CLIENT;

/// Starts one prediction cycle. Overlapping calls are not cancelled; the
/// last response to arrive is the one displayed.
pub fn spawn_prediction(actions: AppActions, text: String) {
    actions.begin_prediction();

    spawn(async move {
        let outcome = match API_CLIENT.get().cloned() {
            Some(client) => predict(&client, &text).await,
            None => {
                tracing::error!("prediction requested before client bootstrap");
                Err(ClientError::NotInitialised)
            }
        };
        actions.finish_prediction(outcome);
    });
}

/// Looks up the reference record for the id under the schedule cursor.
pub fn spawn_reference(actions: AppActions, budget_id: Option<String>) {
    if !actions.begin_reference() {
        return;
    }

    spawn(async move {
        let record = match (API_CLIENT.get().cloned(), budget_id) {
            (Some(client), Some(id)) => fetch_reference(&client, &id).await,
            (_, None) => {
                tracing::warn!("no event under the schedule cursor");
                None
            }
            (None, _) => None,
        };
        actions.finish_reference(record);
    });
}

pub async fn predict(client: &PolicyGameClient, text: &str) -> ClientResult<PredictionResult> {
    let outcome = client.predict_budget(text).await;
    match &outcome {
        Ok(result) => tracing::info!(topk = result.entries().len(), "prediction received"),
        Err(err) => tracing::error!(status = ?err.status(), "prediction failed: {err}"),
    }
    outcome
}

pub async fn fetch_reference(client: &PolicyGameClient, budget_id: &str) -> Option<ReferenceRecord> {
    match client.get_event_meta(budget_id).await {
        Ok(meta) => Some(reference_from_meta(&meta)),
        Err(err) => {
            tracing::warn!(budget_id, status = ?err.status(), "reference lookup failed: {err}");
            None
        }
    }
}
