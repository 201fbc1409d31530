use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::schedule::{BrowserStore, CursorSettings, InitOutcome, ScheduleCursor};
use crate::state::{use_app_actions, AppActions};
use crate::{API_CLIENT, APP_CONFIG};

/// Loads the persisted schedule on mount, or builds a fresh one. The returned
/// handle re-runs the load when restarted.
pub fn use_schedule_cursor() -> UseFuture {
    let actions = use_app_actions();

    use_future(move || async move {
        TimeoutFuture::new(0).await;
        load_schedule(actions).await;
    })
}

async fn load_schedule(actions: AppActions) {
    actions.set_schedule_loading(true);
    actions.set_schedule_error(None);

    let settings = APP_CONFIG
        .get()
        .map(CursorSettings::from_config)
        .unwrap_or_default();
    let mut cursor = ScheduleCursor::new(BrowserStore, settings);

    let Some(client) = API_CLIENT.get().cloned() else {
        actions.set_schedule_error(Some("API クライアントが初期化されていません".into()));
        actions.set_schedule_loading(false);
        return;
    };

    let mut rng = rand::thread_rng();
    match cursor
        .initialize(&mut rng, || async move { client.get_event_ids().await })
        .await
    {
        Ok(outcome) => {
            if outcome == InitOutcome::ColdStart {
                tracing::info!(ids = cursor.state().ids.len(), "fresh overview schedule");
            }
            actions.set_schedule(cursor);
        }
        Err(err) => {
            tracing::error!(status = ?err.status(), "event id fetch failed: {err}");
            actions.set_schedule(cursor);
            actions.set_schedule_error(Some(format!("事業一覧を取得できませんでした: {err}")));
        }
    }
}
