use dioxus::prelude::*;

use crate::state::{use_app_actions, BackendHealth};
use crate::API_CLIENT;

pub fn use_backend_health() {
    let actions = use_app_actions();

    use_future(move || async move {
        let Some(client) = API_CLIENT.get().cloned() else {
            actions.set_backend_health(BackendHealth::Unreachable);
            return;
        };

        let health = match client.get_health().await {
            Ok(status) if status.is_ok() => BackendHealth::Healthy,
            Ok(status) => {
                tracing::warn!(status = %status.status, "backend reported unhealthy");
                BackendHealth::Unreachable
            }
            Err(err) => {
                tracing::warn!("health probe failed: {err}");
                BackendHealth::Unreachable
            }
        };
        actions.set_backend_health(health);
    });
}
