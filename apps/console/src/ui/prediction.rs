use dioxus::prelude::*;

use crate::hooks::prediction::{spawn_prediction, spawn_reference};
use crate::models::PredictionResult;
use crate::shaping::format_currency;
use crate::state::{use_app_actions, use_app_state, ReferencePhase};
use crate::ui::similar::SimilarList;

#[component]
pub fn PredictionPanel() -> Element {
    let actions = use_app_actions();
    let mut text = use_signal(String::new);

    let snapshot = use_app_state().read().clone();
    let view = snapshot.view;
    let current_id = snapshot.schedule.cursor.current_id().map(str::to_string);

    let can_submit = !view.is_predicting() && !text.read().trim().is_empty();
    let entries = view
        .result()
        .map(|result| result.entries().to_vec())
        .unwrap_or_default();

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm space-y-2",
            h2 { class: "text-lg font-semibold text-slate-900", "予算推定" }
            input {
                class: "w-full rounded border border-slate-300 p-2 text-sm",
                value: "{text}",
                placeholder: "テキストを入力",
                oninput: move |evt| text.set(evt.value()),
            }
            button {
                class: "rounded bg-slate-900 px-3 py-1 text-sm text-white disabled:opacity-50",
                disabled: !can_submit,
                onclick: move |_| spawn_prediction(actions, text.read().clone()),
                "テキストで予測"
            }
            if view.is_predicting() {
                p { class: "text-xs text-slate-500", "推定中..." }
            }
            if let Some(result) = view.result() {
                div { class: "space-y-1",
                    p { class: "text-xs text-slate-500", "✅ 推定当初予算" }
                    p { class: "text-2xl font-bold text-slate-900", "{estimate_text(result)}" }
                    if let Some(reason) = result.reason.as_ref() {
                        p { class: "text-xs text-amber-600", "{reason}" }
                    }
                    button {
                        class: "rounded border border-slate-300 px-3 py-1 text-sm hover:bg-slate-50",
                        onclick: move |_| spawn_reference(actions, current_id.clone()),
                        "今月の事業の当初予算を確認"
                    }
                    {reference_line(&view.reference)}
                }
            }
            if let Some(err) = view.error() {
                pre { class: "whitespace-pre-wrap text-xs text-red-600", "{err.pretty()}" }
            }
        }
        SimilarList { entries }
    }
}

pub fn estimate_text(result: &PredictionResult) -> String {
    format!(
        "{} {}",
        format_currency(result.estimate_initial.as_ref()),
        result.currency_label()
    )
}

fn reference_line(phase: &ReferencePhase) -> Element {
    match phase {
        ReferencePhase::Idle => rsx! {},
        ReferencePhase::Fetching => rsx! {
            p { class: "text-xs text-slate-500", "確認中..." }
        },
        ReferencePhase::Displayed(record) => {
            let budget = format_currency(record.initial_budget.as_ref());
            rsx! {
                p { class: "text-xs text-slate-500", "事業名: {record.name} / 当初予算: {budget} 円" }
            }
        }
        ReferencePhase::Failed => rsx! {
            p { class: "text-xs text-red-500", "当初予算を取得できませんでした" }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn estimate_is_grouped_with_yen_label() {
        let result: PredictionResult = serde_json::from_value(json!({
            "estimate_initial": 500000,
            "topk": [{"rank": 1, "name": "X", "similarity": 0.8, "initial_budget": 400000}]
        }))
        .unwrap();
        assert_eq!(estimate_text(&result), "500,000 円");
    }

    #[test]
    fn missing_estimate_leaves_blank_amount() {
        let result = PredictionResult {
            reason: Some("no valid initial budget in top-k".into()),
            ..Default::default()
        };
        assert_eq!(estimate_text(&result), " 円");
    }
}
