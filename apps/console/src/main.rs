#![allow(non_snake_case)]

mod api;
mod config;
mod hooks;
mod models;
mod schedule;
mod shaping;
mod state;
mod ui;

use api::{ClientError, PolicyGameClient};
use config::AppConfig;
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use hooks::health::use_backend_health;
use once_cell::sync::OnceCell;
use schedule::CursorSettings;
use state::{use_app_state, AppState, BackendHealth};
use tracing::{error, info};
use ui::prediction::PredictionPanel;
use ui::schedule::SchedulePanel;

pub(crate) static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();
pub(crate) static API_CLIENT: OnceCell<PolicyGameClient> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    let config = AppConfig::from_env();
    init_logging(config.profile.log_level());
    bootstrap_infrastructure(config);
    launch(App);
}

fn init_logging(level: tracing::Level) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(level);
    });
}

fn bootstrap_infrastructure(config: AppConfig) {
    match PolicyGameClient::new(&config) {
        Ok(client) => {
            info!(base_url = client.base_url(), "policy game client initialized");
            let _ = API_CLIENT.set(client);
        }
        Err(err) => {
            report_client_error("failed to build policy game client", &err);
        }
    }

    let _ = APP_CONFIG.set(config);
}

fn report_client_error(context: &str, err: &ClientError) {
    error!(%context, ?err, status = ?err.status(), "api bootstrap error");
}

#[component]
fn App() -> Element {
    let settings = APP_CONFIG
        .get()
        .map(CursorSettings::from_config)
        .unwrap_or_default();
    let app_state = use_signal(move || AppState::new(settings));

    use_context_provider(|| app_state);

    rsx! {
        div { class: "relative",
            Router::<Route> {}
        }
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Dashboard {},
}

#[component]
fn Dashboard() -> Element {
    use_backend_health();

    let api_endpoint = API_CLIENT
        .get()
        .map(|client| client.base_url().to_string())
        .unwrap_or_else(|| "API 未設定".to_string());
    let health = use_app_state().read().backend;
    let (health_label, health_class) = match health {
        BackendHealth::Unknown => ("確認中", "text-slate-400"),
        BackendHealth::Healthy => ("接続OK", "text-emerald-600"),
        BackendHealth::Unreachable => ("接続不可", "text-red-500"),
    };

    rsx! {
        div { class: "app-shell space-y-4 p-5 font-sans",
            section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
                h1 { class: "text-xl font-semibold text-slate-900", "Policy Game Frontend" }
                p { class: "text-sm text-slate-600",
                    "API: {api_endpoint} "
                    span { class: "{health_class}", "({health_label})" }
                }
            }
            SchedulePanel {}
            PredictionPanel {}
        }
    }
}
