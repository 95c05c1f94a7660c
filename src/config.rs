//! Runtime settings, read from an optional
//! `<script id="app-config" type="application/json">` element.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Prefix for every backend path; empty means same origin.
	pub api_base: String,
	/// How long a "Selected Database" notice stays in the sidebar.
	pub notice_ms: u32,
	/// Pause between showing the search placeholder and sending the query.
	pub search_delay_ms: u32,
	/// Simulation steps run before a freshly loaded graph is shown.
	pub layout_warmup_ticks: usize,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			notice_ms: 10_000,
			search_delay_ms: 100,
			layout_warmup_ticks: 300,
		}
	}
}

impl AppConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Settings from the page, or defaults when the element is absent or
	/// unreadable.
	pub fn load() -> Self {
		let Some(text) = config_text() else {
			return Self::default();
		};
		match Self::from_json(&text) {
			Ok(config) => {
				info!("config: loaded from #{}", CONFIG_ELEMENT_ID);
				config
			}
			Err(e) => {
				warn!("config: ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
				Self::default()
			}
		}
	}
}

fn config_text() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}
