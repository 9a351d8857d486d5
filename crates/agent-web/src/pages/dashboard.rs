//! Dashboard Page
//!
//! Query box plus the three render regions: news cards, the analysis table,
//! and the notes callout.

use leptos::prelude::*;

use crate::api::{self, AgentView, QueryView};
use crate::components::{AnalysisTable, NewsCard, NotesCallout};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let (agents, set_agents) = signal(Vec::<AgentView>::new());
    let (selected, set_selected) = signal(String::from("team"));
    let (query, set_query) = signal(String::new());
    let (result, set_result) = signal(Option::<QueryView>::None);
    let (error, set_error) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);

    // Load the agent roster once
    leptos::task::spawn_local(async move {
        if let Ok(roster) = api::fetch_agents().await {
            set_agents.set(roster);
        }
    });

    let submit = move |_| {
        let text = query.get();
        if text.trim().is_empty() || loading.get() {
            return;
        }

        set_loading.set(true);
        set_error.set(None);

        let agent = selected.get();
        leptos::task::spawn_local(async move {
            match api::run_query(text.trim(), Some(&agent)).await {
                Ok(view) => set_result.set(Some(view)),
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="dashboard">
            <header class="dashboard-header">
                <h1>"Market Dashboard"</h1>
                <select
                    prop:value=move || selected.get()
                    on:change=move |ev| set_selected.set(event_target_value(&ev))
                >
                    <option value="team">"Multi AI Agent"</option>
                    <For
                        each=move || agents.get().into_iter().filter(|a| a.id != "team")
                        key=|agent| agent.id.clone()
                        children=move |agent| {
                            view! { <option value=agent.id.clone()>{agent.name.clone()}</option> }
                        }
                    />
                </select>
            </header>

            <div class="query-area">
                <input
                    type="text"
                    placeholder="e.g. Summarize analyst recommendations and latest news for NVDA"
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            submit(());
                        }
                    }
                />
                <button on:click=move |_| submit(()) disabled=move || loading.get()>
                    {move || if loading.get() { "..." } else { "Ask" }}
                </button>
            </div>

            <Show when=move || error.get().is_some()>
                <div class="error-banner">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <Show when=move || result.get().is_some()>
                {move || {
                    let view = result.get().unwrap_or_else(|| QueryView {
                        agent: String::new(),
                        model: String::new(),
                        news: Vec::new(),
                        table: None,
                        notes: String::new(),
                        tool_calls: Vec::new(),
                    });

                    view! {
                        <div class="results">
                            <section class="news-section">
                                <h2>"Latest News"</h2>
                                <Show
                                    when={
                                        let has_news = !view.news.is_empty();
                                        move || has_news
                                    }
                                    fallback=|| view! { <p class="placeholder">"No news found"</p> }
                                >
                                    {view
                                        .news
                                        .clone()
                                        .into_iter()
                                        .map(|item| view! { <NewsCard item=item /> })
                                        .collect_view()}
                                </Show>
                            </section>

                            <section class="table-section">
                                <h2>"Analysis"</h2>
                                <AnalysisTable table=view.table.clone() />
                            </section>

                            <NotesCallout notes=view.notes.clone() />

                            <footer class="result-meta">
                                <span>{format!("{} · {}", view.agent, view.model)}</span>
                            </footer>
                        </div>
                    }
                }}
            </Show>
        </div>
    }
}
