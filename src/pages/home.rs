use leptos::prelude::*;
use log::info;
use web_sys::File;

use crate::components::force_graph::{ForceGraphCanvas, NodeKey};
use crate::components::sidebar::Sidebar;
use crate::config::AppConfig;
use crate::explorer::Explorer;

fn selected_file(input: NodeRef<leptos::html::Input>) -> Option<File> {
	input.get()?.files()?.get(0)
}

/// Knowledge-graph explorer page
#[component]
pub fn Home() -> impl IntoView {
	let explorer = Explorer::new(AppConfig::load());
	explorer.load_databases();
	explorer.spawn_refresh();

	let csv_input = NodeRef::<leptos::html::Input>::new();
	let (search_query, set_search_query) = signal(String::new());
	let (ai_query, set_ai_query) = signal(String::new());

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

			<div class="explorer">
				<header class="toolbar">
					<select
						id="db-selector"
						prop:value=move || explorer.selected_db.get()
						on:change=move |ev| explorer.change_database(event_target_value(&ev))
					>
						<option value="" disabled=true>
							"Select a database"
						</option>
						{move || {
							explorer
								.databases
								.get()
								.into_iter()
								.map(|db| {
									let value = db.clone();
									view! { <option value=value>{db}</option> }
								})
								.collect_view()
						}}
					</select>
					<button id="refresh-btn" on:click=move |_| explorer.spawn_refresh()>
						"Refresh"
					</button>

					<input
						id="search-box"
						type="text"
						placeholder="Ask the graph"
						prop:value=move || search_query.get()
						on:input=move |ev| set_search_query.set(event_target_value(&ev))
					/>
					<button
						id="search-btn"
						on:click=move |_| explorer.search(search_query.get_untracked())
					>
						"Search"
					</button>

					<button id="add-data-btn" on:click=move |_| explorer.show_form.set(true)>
						"Add data"
					</button>

					<input
						id="csv-file-input"
						type="file"
						accept=".csv"
						node_ref=csv_input
						on:change=move |_| {
							if let Some(file) = selected_file(csv_input) {
								info!("File selected: {}", file.name());
							}
						}
					/>
					<button
						id="csv-upload-btn"
						on:click=move |_| explorer.upload_csv(selected_file(csv_input))
					>
						"Upload CSV"
					</button>
				</header>

				<Show when=move || explorer.show_form.get()>
					<div id="add-data-form" class="add-data-form">
						<select
							id="input-type-selector"
							prop:value=move || explorer.input_kind.get()
							on:change=move |ev| explorer.input_kind.set(event_target_value(&ev))
						>
							<option value="natural_input">"Natural language"</option>
							<option value="url_input">"URL"</option>
							<option value="latent_input">"Latent input"</option>
						</select>
						<textarea
							id="data-box"
							prop:value=move || explorer.data_text.get()
							on:input=move |ev| explorer.data_text.set(event_target_value(&ev))
						/>
						<button id="submit-data-btn" on:click=move |_| explorer.submit_data()>
							"Submit"
						</button>
					</div>
				</Show>

				<main class="workspace">
					<div id="cy" class="graph-pane">
						<ForceGraphCanvas
							data=explorer.graph
							highlighted=explorer.highlighted
							selected=explorer.selected_node
							on_select=Callback::new(move |key: NodeKey| explorer.select_node(key))
							warmup_ticks=explorer.warmup_ticks()
						/>
					</div>
					<Sidebar
						content=explorer.sidebar
						notices=explorer.notices
						on_delete=Callback::new(move |node| explorer.delete_node(node))
					/>
				</main>

				<section id="answer" class="answer">
					{move || {
						explorer
							.answer
							.get()
							.map(|a| {
								view! {
									<small>{a.triplets}</small>
									<br />
									<p>{a.answer}</p>
								}
							})
					}}
				</section>

				<section class="ai-search">
					<input
						id="ai-search-input"
						type="text"
						placeholder="Free-text AI search"
						prop:value=move || ai_query.get()
						on:input=move |ev| set_ai_query.set(event_target_value(&ev))
					/>
					<button
						id="ai-search-btn"
						on:click=move |_| explorer.ai_search(ai_query.get_untracked())
					>
						"AI search"
					</button>
					<p id="search-quality-reflection">
						{move || {
							explorer
								.ai_reply
								.with(|r| {
									r.as_ref().and_then(|r| r.search_quality_reflection.clone())
								})
								.unwrap_or_default()
						}}
					</p>
					<p id="search-quality-score">
						{move || {
							explorer.ai_reply.with(|r| r.as_ref().map(|r| r.score_text())).unwrap_or_default()
						}}
					</p>
					<div id="result">
						{move || {
							explorer
								.ai_reply
								.with(|r| r.as_ref().and_then(|r| r.result.clone()))
								.unwrap_or_default()
						}}
					</div>
				</section>
			</div>
		</ErrorBoundary>
	}
}
