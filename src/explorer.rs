//! Page-level controller: the reactive state shared by the toolbar, the
//! graph canvas and the sidebar, and one handler per UI action.

use std::collections::HashSet;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};
use serde_json::Value;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::api::{AiSearchResponse, ApiClient, ApiError, IntegrationSearchResponse, routes};
use crate::components::force_graph::{GraphData, GraphNode, NodeKey};
use crate::components::sidebar::{Notice, SidebarContent};
use crate::config::AppConfig;
use crate::graph::{GraphPayload, transform};
use crate::ingest::{InputKind, UrlBatch, extract_urls, natural_input};
use crate::view::{RefreshTicket, ViewState};

pub const SEARCH_PLACEHOLDER: &str = "Finding the most relevant graph...";
pub const NO_FILE_SELECTED: &str = "Please select a CSV file to upload.";
pub const NODE_DELETED: &str = "Node deleted.";
pub const DELETE_FAILED: &str = "Delete failed.";

/// Triplets and answer returned by the search integration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchAnswer {
	pub triplets: String,
	pub answer: String,
}

#[derive(Clone, Copy)]
pub struct Explorer {
	client: StoredValue<ApiClient>,
	config: StoredValue<AppConfig>,
	refreshes: StoredValue<RefreshTicket>,
	notice_seq: StoredValue<u64>,

	pub databases: RwSignal<Vec<String>>,
	pub selected_db: RwSignal<String>,
	pub view: RwSignal<ViewState>,
	/// Slices of `view` for the canvas, each notifying only on its own change.
	pub graph: Memo<GraphData>,
	pub highlighted: Memo<HashSet<NodeKey>>,
	pub selected_node: Memo<Option<NodeKey>>,
	pub sidebar: RwSignal<SidebarContent>,
	pub notices: RwSignal<Vec<Notice>>,
	pub answer: RwSignal<Option<SearchAnswer>>,
	pub ai_reply: RwSignal<Option<AiSearchResponse>>,

	pub show_form: RwSignal<bool>,
	pub input_kind: RwSignal<String>,
	pub data_text: RwSignal<String>,
}

impl Explorer {
	pub fn new(config: AppConfig) -> Self {
		let view = RwSignal::new(ViewState::default());
		Self {
			client: StoredValue::new(ApiClient::new(config.api_base.clone())),
			config: StoredValue::new(config),
			refreshes: StoredValue::new(RefreshTicket::default()),
			notice_seq: StoredValue::new(0),
			databases: RwSignal::new(Vec::new()),
			selected_db: RwSignal::new(String::new()),
			view,
			graph: Memo::new(move |_| view.with(|v| v.graph.clone())),
			highlighted: Memo::new(move |_| view.with(|v| v.highlighted.clone())),
			selected_node: Memo::new(move |_| view.with(|v| v.selected.clone())),
			sidebar: RwSignal::new(SidebarContent::Empty),
			notices: RwSignal::new(Vec::new()),
			answer: RwSignal::new(None),
			ai_reply: RwSignal::new(None),
			show_form: RwSignal::new(false),
			input_kind: RwSignal::new(InputKind::Natural.integration().to_string()),
			data_text: RwSignal::new(String::new()),
		}
	}

	fn client(&self) -> ApiClient {
		self.client.get_value()
	}

	pub fn warmup_ticks(&self) -> usize {
		self.config.with_value(|c| c.layout_warmup_ticks)
	}

	pub fn load_databases(self) {
		spawn_local(async move {
			match self.client().databases().await {
				Ok(databases) => {
					info!("{} databases available", databases.len());
					self.databases.set(databases);
				}
				Err(e) => error!("Error listing databases: {}", e),
			}
		});
	}

	/// Fetch and show the graph of the active database. Returns whether the
	/// response was applied; a response overtaken by a newer refresh is
	/// dropped.
	pub async fn refresh(self) -> bool {
		let mut generation = 0;
		self.refreshes.update_value(|t| generation = t.issue());

		match self.client().graph().await {
			Ok(payload) => {
				if !self.refreshes.with_value(|t| t.is_current(generation)) {
					debug!("graph response #{} superseded, dropped", generation);
					return false;
				}
				self.apply(&payload);
				true
			}
			Err(e) => {
				error!("Error fetching graph data: {}", e);
				false
			}
		}
	}

	fn apply(self, payload: &GraphPayload) {
		let out = transform(payload);
		for rejected in &out.rejected {
			warn!("relationship #{} skipped: {}", rejected.index, rejected.reason);
		}
		info!(
			"graph loaded: {} nodes, {} edges, {} relationships skipped",
			out.data.nodes.len(),
			out.data.links.len(),
			out.rejected.len()
		);
		self.view.update(|v| v.replace(out.data));
	}

	pub fn spawn_refresh(self) {
		spawn_local(async move {
			self.refresh().await;
		});
	}

	/// Make `db` the active database on the backend, then refresh.
	pub async fn switch_database(self, db: String) -> bool {
		self.selected_db.set(db.clone());
		match self.client().set_database(&db).await {
			Ok(reply) => {
				info!(
					"Database switched to {}: {}",
					db,
					reply.message.unwrap_or_default()
				);
				self.refresh().await
			}
			Err(e) => {
				error!("Error switching database: {}", e);
				false
			}
		}
	}

	pub fn change_database(self, db: String) {
		if db.is_empty() {
			return;
		}
		spawn_local(async move {
			self.switch_database(db).await;
		});
	}

	/// Ask the search integration, switch to the database it picked and
	/// highlight the nodes whose name matches the query.
	pub fn search(self, query: String) {
		self.sidebar.set(SidebarContent::message(SEARCH_PLACEHOLDER));
		let delay = self.config.with_value(|c| c.search_delay_ms);

		spawn_local(async move {
			// Give the placeholder a frame to paint
			TimeoutFuture::new(delay).await;

			let reply: IntegrationSearchResponse =
				match self.client().trigger(routes::SEARCH_INTEGRATION, &query).await {
					Ok(reply) => reply,
					Err(e) => {
						error!("Search failed: {}", e);
						self.sidebar.set(SidebarContent::message(format!("Search failed: {}", e)));
						return;
					}
				};

			info!("search answered from database {}", reply.selected_db);
			self.answer.set(Some(SearchAnswer {
				triplets: reply.triplets_text(),
				answer: reply.answer.clone(),
			}));
			self.sidebar.set(SidebarContent::Empty);
			self.show_notice(&reply.selected_db);

			if self.switch_database(reply.selected_db).await {
				let mut hits = 0;
				self.view.update(|v| hits = v.highlight(&query));
				info!("search: {} nodes match {:?}", hits, query);
			}
		});
	}

	/// Append a "Selected Database" line that removes itself after the
	/// configured time.
	pub fn show_notice(self, db: &str) {
		self.notice_seq.update_value(|n| *n += 1);
		let id = self.notice_seq.get_value();
		self.notices.update(|notices| {
			notices.push(Notice {
				id,
				text: format!("Selected Database: {}", db),
			})
		});

		let ttl = self.config.with_value(|c| c.notice_ms);
		spawn_local(async move {
			TimeoutFuture::new(ttl).await;
			self.notices.update(|notices| notices.retain(|n| n.id != id));
		});
	}

	pub fn submit_data(self) {
		self.show_form.set(false);
		let kind = InputKind::parse(&self.input_kind.get_untracked());
		let body = natural_input(&kind, &self.data_text.get_untracked());

		spawn_local(async move {
			match self
				.client()
				.trigger::<_, Value>(kind.integration(), &body)
				.await
			{
				Ok(reply) => {
					info!("{} accepted: {}", kind.integration(), reply);
					self.data_text.set(String::new());
					self.refresh().await;
				}
				Err(e) => error!("Error submitting {}: {}", kind.integration(), e),
			}
		});
	}

	/// Read the chosen CSV, post the URLs in its first column and refresh.
	pub fn upload_csv(self, file: Option<File>) {
		let Some(file) = file else {
			self.sidebar.set(SidebarContent::message(NO_FILE_SELECTED));
			return;
		};

		spawn_local(async move {
			let text = match read_text(&file).await {
				Ok(text) => text,
				Err(e) => {
					error!("Error reading {}: {}", file.name(), e);
					return;
				}
			};
			let urls = extract_urls(&text);
			let count = urls.len();
			info!("{}: {} URLs found", file.name(), count);

			match self
				.client()
				.trigger::<_, Value>(routes::URL_BATCH_INTEGRATION, &UrlBatch { urls })
				.await
			{
				Ok(reply) => {
					info!("URL processing success: {}", reply);
					self.sidebar.set(SidebarContent::message(format!(
						"Submitted {} URLs for processing.",
						count
					)));
					self.refresh().await;
				}
				Err(e) => error!("Error processing URLs: {}", e),
			}
		});
	}

	pub fn select_node(self, key: NodeKey) {
		let mut picked = None;
		self.view.update(|v| picked = v.select(&key));
		match picked {
			Some(node) => self.sidebar.set(SidebarContent::Node(node)),
			None => debug!("{} is no longer in the view", key),
		}
	}

	pub fn delete_node(self, node: GraphNode) {
		spawn_local(async move {
			match self.client().delete_entity(node.kind.tag(), &node.id).await {
				Ok(()) => {
					info!("Deleted {} {}", node.kind, node.id);
					self.view.update(|v| v.remove(&node.key()));
					self.sidebar.set(SidebarContent::message(NODE_DELETED));
				}
				Err(e) if e.is_status() => {
					error!("Delete failed: {}", e);
					self.sidebar.set(SidebarContent::message(DELETE_FAILED));
				}
				Err(e) => error!("Error deleting {}: {}", node.id, e),
			}
		});
	}

	pub fn ai_search(self, query: String) {
		spawn_local(async move {
			match self.client().ai_search(&query).await {
				Ok(reply) => {
					if let Some(db) = &reply.selected_db {
						info!("AI search picked {}", db);
						self.show_notice(db);
					}
					debug!("search quality score: {}", reply.score_text());
					self.ai_reply.set(Some(reply));
				}
				Err(e) => error!("AI search failed: {}", e),
			}
		});
	}
}

async fn read_text(file: &File) -> Result<String, ApiError> {
	let text = JsFuture::from(file.text())
		.await
		.map_err(|e| ApiError::Browser(format!("{:?}", e)))?;
	text.as_string()
		.ok_or_else(|| ApiError::Browser("file contents are not text".into()))
}
