//! UI Components
//!
//! Render widgets for the three segmented regions of an agent reply.

use leptos::prelude::*;

use crate::api::TableView;

/// One news snippet card
#[component]
pub fn NewsCard(item: String) -> impl IntoView {
    view! {
        <div class="news-card">
            <span class="news-icon">"📰"</span>
            <p class="news-text">{item}</p>
        </div>
    }
}

/// The analysis data grid, or a placeholder when the reply held no table
#[component]
pub fn AnalysisTable(table: Option<TableView>) -> impl IntoView {
    match table {
        Some(table) => view! {
            <table class="analysis-table">
                <thead>
                    <tr>
                        {table
                            .headers
                            .into_iter()
                            .map(|h| view! { <th>{h}</th> })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {table
                        .rows
                        .into_iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    {row
                                        .into_iter()
                                        .map(|cell| view! { <td>{cell}</td> })
                                        .collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any(),
        None => view! {
            <p class="placeholder">"No analysis found"</p>
        }
        .into_any(),
    }
}

/// Informational callout for the notes region
#[component]
pub fn NotesCallout(notes: String) -> impl IntoView {
    view! {
        <Show when={
            let notes = notes.clone();
            move || !notes.is_empty()
        }>
            <div class="notes-callout">
                <span class="notes-icon">"ℹ️"</span>
                <p class="notes-text">{notes.clone()}</p>
            </div>
        </Show>
    }
}
