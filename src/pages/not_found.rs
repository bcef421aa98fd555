use leptos::prelude::*;

/// 404 fallback route
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Nothing here"</h1>
		<a href="/">"Back to the portfolio"</a>
	}
}
