use leptos::prelude::*;

use super::force_graph::GraphNode;

/// What the sidebar panel currently shows. Each update replaces the
/// previous content.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SidebarContent {
	#[default]
	Empty,
	Message(String),
	Node(GraphNode),
}

impl SidebarContent {
	pub fn message(text: impl Into<String>) -> Self {
		Self::Message(text.into())
	}
}

/// Short-lived line appended under the sidebar content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	pub id: u64,
	pub text: String,
}

#[component]
pub fn Sidebar(
	#[prop(into)] content: Signal<SidebarContent>,
	#[prop(into)] notices: Signal<Vec<Notice>>,
	on_delete: Callback<GraphNode>,
) -> impl IntoView {
	view! {
		<aside id="sidebar" class="sidebar">
			{move || match content.get() {
				SidebarContent::Empty => ().into_any(),
				SidebarContent::Message(text) => view! { <p>{text}</p> }.into_any(),
				SidebarContent::Node(node) => {
					let heading = node.name.clone();
					let details = format!("Details about {}", node.name);
					let kind = node.kind.to_string();
					view! {
						<h2>{heading}</h2>
						<p>{details}</p>
						<p class="node-kind">{kind}</p>
						<button id="deleteBtn" on:click=move |_| on_delete.run(node.clone())>
							"Delete"
						</button>
					}
						.into_any()
				}
			}}
			{move || {
				notices
					.get()
					.into_iter()
					.map(|notice| view! { <div class="notice">{notice.text}</div> })
					.collect_view()
			}}
		</aside>
	}
}
