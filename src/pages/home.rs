use leptos::prelude::*;

use crate::components::node_graph::{
	DriftingParticles, NeuralBackground, ParticleField, SkillDetails, SkillTreeCanvas,
};

/// Side panel describing the focused skill.
#[component]
fn SkillDetailsPanel(selected: ReadSignal<Option<SkillDetails>>) -> impl IntoView {
	view! {
		<div class="skill-details">
			{move || match selected.get() {
				None => view! { <p class="hint">"Click a node to explore that area."</p> }.into_any(),
				Some(d) => {
					let swatch = format!("background-color: {}", d.color);
					let bullet = swatch.clone();
					view! {
						<div class="skill-heading">
							<span class="skill-icon" style=swatch>{d.icon}</span>
							<div>
								<h3>{d.name}</h3>
								<p>{d.description}</p>
							</div>
						</div>
						<h4>"Key Skills:"</h4>
						<ul>
							{d.skills
								.into_iter()
								.map(|s| {
									let bullet = bullet.clone();
									view! { <li><span class="bullet" style=bullet></span>{s}</li> }
								})
								.collect_view()}
						</ul>
					}
						.into_any()
				}
			}}
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (selected, set_selected) = signal(None::<SkillDetails>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<section class="hero">
				<ParticleField />
				<div class="hero-overlay">
					<DriftingParticles />
					<h1>"Hello, I build learning machines."</h1>
				</div>
			</section>

			<section class="skills" style="position: relative;">
				<NeuralBackground />
				<h2>"Skill Tree"</h2>
				<div class="skill-layout">
					<div id="skill-tree-container" class="skill-tree">
						<SkillTreeCanvas selected=set_selected />
					</div>
					<SkillDetailsPanel selected=selected />
				</div>
			</section>
		</ErrorBoundary>
	}
}
