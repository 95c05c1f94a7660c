use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
	#[error("network error: {0}")]
	Network(String),
	#[error("HTTP {status}: {body}")]
	Status { status: u16, body: String },
	#[error("unexpected response: {0}")]
	Decode(String),
	#[error("could not encode request: {0}")]
	Encode(String),
	#[error("browser error: {0}")]
	Browser(String),
}

impl ApiError {
	pub fn is_status(&self) -> bool {
		matches!(self, Self::Status { .. })
	}
}
