//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"market-pulse"</h1>
                <p class="tagline">"AI market research agents built in Rust"</p>
                <div class="cta">
                    <a href="/dashboard" class="btn btn-primary">"Open Dashboard"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"🔎 Web Search"</h3>
                    <p>"A search agent that scans the web and always cites its sources."</p>
                </div>
                <div class="feature">
                    <h3>"📈 Market Data"</h3>
                    <p>"Quotes, analyst recommendations, fundamentals, and company news in tables."</p>
                </div>
                <div class="feature">
                    <h3>"🤝 Agent Team"</h3>
                    <p>"A composite agent merges both specialists into one answer."</p>
                </div>
            </section>
        </div>
    }
}
