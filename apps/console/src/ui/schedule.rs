use dioxus::prelude::*;

use crate::hooks::schedule::use_schedule_cursor;
use crate::state::{use_app_actions, use_app_state};

#[component]
pub fn SchedulePanel() -> Element {
    let mut loader = use_schedule_cursor();
    let actions = use_app_actions();
    let slot = use_app_state().read().schedule.clone();

    let period = slot.cursor.current_period();
    let idx = slot.cursor.state().idx;
    let total = slot.cursor.state().ids.len();
    let complete = slot.cursor.is_complete();
    let advance_disabled = slot.is_loading || complete || total == 0;

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm space-y-2",
            h2 { class: "text-lg font-semibold text-slate-900", "目的と課題" }
            div { class: "text-base font-medium text-slate-800", "{period}" }
            if slot.is_loading {
                p { class: "text-xs text-slate-500", "スケジュールを読み込み中..." }
            } else {
                p { class: "text-xs text-slate-500 font-mono", "進捗 {idx} / {total}" }
            }
            if complete {
                p { class: "text-xs text-emerald-600", "すべての月を確認しました" }
            }
            if let Some(err) = slot.error.as_ref() {
                p { class: "text-xs text-red-500", "{err}" }
            }
            div { class: "flex gap-2",
                button {
                    class: "rounded border border-slate-300 px-3 py-1 text-sm hover:bg-slate-50 disabled:opacity-50",
                    disabled: advance_disabled,
                    onclick: move |_| actions.advance_schedule(),
                    "更新"
                }
                button {
                    class: "rounded border border-slate-300 px-3 py-1 text-sm hover:bg-slate-50",
                    onclick: move |_| {
                        if !actions.reset_schedule() {
                            loader.restart();
                        }
                    },
                    "最初から"
                }
            }
        }
    }
}
