use dioxus::prelude::*;

use crate::models::TopkEntry;
use crate::shaping::{format_currency, format_similarity, normalize_similarity, weight_percent};

/// Display-ready copy of one ranked entry.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarRow {
    pub rank: String,
    pub name: String,
    pub similarity: String,
    pub percent: u8,
    pub initial_budget: String,
    pub weight_percent: Option<u8>,
}

impl SimilarRow {
    pub fn from_entry(entry: &TopkEntry) -> Self {
        let similarity = entry.similarity_or_zero();
        Self {
            rank: entry.rank_label(),
            name: entry.name.clone().unwrap_or_default(),
            similarity: format_similarity(similarity),
            percent: normalize_similarity(similarity),
            initial_budget: format_currency(entry.initial_budget.as_ref()),
            weight_percent: entry.weight.map(weight_percent),
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct SimilarListProps {
    pub entries: Vec<TopkEntry>,
}

/// Ranked entries in the order the backend sent them.
#[component]
pub fn SimilarList(props: SimilarListProps) -> Element {
    if props.entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        section { class: "space-y-3",
            h3 { class: "text-sm font-semibold text-slate-500", "類似事業" }
            div { class: "grid grid-cols-1 gap-3",
                for (position, entry) in props.entries.iter().enumerate() {
                    SimilarCard { key: "{position}", row: SimilarRow::from_entry(entry) }
                }
            }
        }
    }
}

#[component]
fn SimilarCard(row: SimilarRow) -> Element {
    rsx! {
        div { class: "rounded-xl border border-slate-700 bg-slate-950 p-3 text-slate-200",
            div { class: "flex items-center gap-2",
                span { class: "rounded-full border border-slate-600 px-2 py-0.5 text-xs font-mono", "#{row.rank}" }
                span { class: "font-semibold", "{row.name}" }
            }
            div { class: "mt-2 h-2 w-full rounded-full border border-slate-600",
                div {
                    class: "h-full rounded-full bg-gradient-to-r from-blue-400 to-violet-400",
                    style: "width: {row.percent}%",
                }
            }
            div { class: "mt-2 flex justify-between text-xs text-slate-400",
                span { "sim {row.similarity} ({row.percent}%)" }
                if let Some(weight) = row.weight_percent {
                    span { "重み {weight}%" }
                }
                span { "当初 {row.initial_budget}" }
            }
        }
    }
}
