//! HTTP client for the knowledge-graph backend.

use gloo_net::http::{Request, Response};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

mod error;
pub mod routes;
mod types;

pub use error::ApiError;
pub use types::{AiSearchResponse, IntegrationSearchResponse, SwitchResponse};

use crate::graph::GraphPayload;

#[derive(Clone, Debug, Default)]
pub struct ApiClient {
	base: String,
}

impl ApiClient {
	/// `base` is prepended to every path; empty means same origin.
	pub fn new(base: impl Into<String>) -> Self {
		Self { base: base.into() }
	}

	fn url(&self, path: &str) -> String {
		routes::join(&self.base, path)
	}

	pub async fn databases(&self) -> Result<Vec<String>, ApiError> {
		self.get(routes::DATABASES).await
	}

	pub async fn set_database(&self, db: &str) -> Result<SwitchResponse, ApiError> {
		let url = self.url(&routes::set_database(db));
		debug!("POST {}", url);
		let response = Request::post(&url).send().await.map_err(network)?;
		read(response).await
	}

	pub async fn graph(&self) -> Result<GraphPayload, ApiError> {
		self.get(routes::GRAPH_DATA).await
	}

	/// `DELETE /{type}/{id}`. Any 2xx counts as success; the body is ignored.
	pub async fn delete_entity(&self, entity_type: &str, entity_id: &str) -> Result<(), ApiError> {
		let url = self.url(&routes::entity(entity_type, entity_id));
		debug!("DELETE {}", url);
		let response = Request::delete(&url).send().await.map_err(network)?;
		if !response.ok() {
			return Err(status_error(response).await);
		}
		Ok(())
	}

	/// `POST /trigger-integration/{name}` with a JSON body.
	pub async fn trigger<B, T>(&self, name: &str, body: &B) -> Result<T, ApiError>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let url = self.url(&routes::integration(name));
		debug!("POST {}", url);
		let request = Request::post(&url)
			.json(body)
			.map_err(|e| ApiError::Encode(e.to_string()))?;
		let response = request.send().await.map_err(network)?;
		read(response).await
	}

	pub async fn ai_search(&self, query: &str) -> Result<AiSearchResponse, ApiError> {
		self.get(&routes::ai_search(query)).await
	}

	async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		let url = self.url(path);
		debug!("GET {}", url);
		let response = Request::get(&url).send().await.map_err(network)?;
		read(response).await
	}
}

fn network(err: gloo_net::Error) -> ApiError {
	ApiError::Network(err.to_string())
}

async fn status_error(response: Response) -> ApiError {
	ApiError::Status {
		status: response.status(),
		body: response.text().await.unwrap_or_default(),
	}
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
	if !response.ok() {
		return Err(status_error(response).await);
	}
	response
		.json::<T>()
		.await
		.map_err(|e| ApiError::Decode(e.to_string()))
}
