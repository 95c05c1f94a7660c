//! Backend paths. Dynamic segments are percent-encoded.

use urlencoding::encode;

pub const DATABASES: &str = "/databases";
pub const GRAPH_DATA: &str = "/get-graph-data";

/// Integration that picks a database for a question and answers it.
pub const SEARCH_INTEGRATION: &str = "ai_search";
/// Integration that ingests a batch of URLs.
pub const URL_BATCH_INTEGRATION: &str = "url_array_processor";

pub fn set_database(db: &str) -> String {
	format!("/set-database/{}", encode(db))
}

pub fn entity(entity_type: &str, entity_id: &str) -> String {
	format!("/{}/{}", encode(entity_type), encode(entity_id))
}

pub fn integration(name: &str) -> String {
	format!("/trigger-integration/{}", encode(name))
}

pub fn ai_search(query: &str) -> String {
	format!("/ai-search?q={}", encode(query))
}

/// Join a configured base (possibly empty, possibly with a trailing slash)
/// and a rooted path.
pub fn join(base: &str, path: &str) -> String {
	format!("{}{}", base.trim_end_matches('/'), path)
}
