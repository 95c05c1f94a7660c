//! Request bodies for the add-data form and the CSV URL upload.

use serde::Serialize;

/// Input type chosen in the add-data form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
	Url,
	Natural,
	/// Any other integration, posted to the endpoint of the same name.
	Latent(String),
}

impl InputKind {
	pub fn parse(value: &str) -> Self {
		match value {
			"url_input" => Self::Url,
			"natural_input" => Self::Natural,
			other => Self::Latent(other.to_string()),
		}
	}

	/// Integration endpoint name.
	pub fn integration(&self) -> &str {
		match self {
			Self::Url => "url_input",
			Self::Natural => "natural_input",
			Self::Latent(name) => name.as_str(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NaturalInput {
	pub natural_input: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UrlBatch {
	pub urls: Vec<String>,
}

/// Body for the add-data form. URL input is percent-encoded; everything
/// else is sent as typed.
pub fn natural_input(kind: &InputKind, text: &str) -> NaturalInput {
	let natural_input = match kind {
		InputKind::Url => urlencoding::encode(text).into_owned(),
		InputKind::Natural | InputKind::Latent(_) => text.to_string(),
	};
	NaturalInput { natural_input }
}

/// First column of every CSV line, trimmed, keeping only http(s) URLs.
pub fn extract_urls(csv: &str) -> Vec<String> {
	csv.lines()
		.filter_map(|line| line.split(',').next())
		.map(str::trim)
		.filter(|cell| cell.starts_with("http://") || cell.starts_with("https://"))
		.map(String::from)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_map_to_their_integrations() {
		assert_eq!(InputKind::parse("url_input"), InputKind::Url);
		assert_eq!(InputKind::parse("natural_input").integration(), "natural_input");
		let latent = InputKind::parse("latent_input");
		assert_eq!(latent, InputKind::Latent("latent_input".into()));
		assert_eq!(latent.integration(), "latent_input");
	}

	#[test]
	fn url_input_is_percent_encoded() {
		let body = natural_input(&InputKind::Url, "https://example.com/a b?x=1");
		assert_eq!(body.natural_input, "https%3A%2F%2Fexample.com%2Fa%20b%3Fx%3D1");
	}

	#[test]
	fn other_inputs_are_sent_raw() {
		let text = "Ada Lovelace wrote the first program.";
		assert_eq!(natural_input(&InputKind::Natural, text).natural_input, text);
		assert_eq!(
			natural_input(&InputKind::Latent("latent_input".into()), text).natural_input,
			text
		);
	}

	#[test]
	fn bodies_serialize_with_backend_field_names() {
		let body = serde_json::to_value(natural_input(&InputKind::Natural, "hi")).unwrap();
		assert_eq!(body, serde_json::json!({ "natural_input": "hi" }));
		let batch = serde_json::to_value(UrlBatch {
			urls: vec!["https://a.io".into()],
		})
		.unwrap();
		assert_eq!(batch, serde_json::json!({ "urls": ["https://a.io"] }));
	}

	#[test]
	fn csv_keeps_first_column_urls_only() {
		let csv = "url,title\n https://a.io/x , A\nftp://nope,B\n\nhttp://b.io,C\r\nnot a url\n";
		assert_eq!(extract_urls(csv), vec!["https://a.io/x", "http://b.io"]);
	}

	#[test]
	fn empty_csv_yields_nothing() {
		assert!(extract_urls("").is_empty());
	}
}
