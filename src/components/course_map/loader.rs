use gloo_net::http::Request;
use log::{info, warn};

use super::settings::Department;
use super::types::Dataset;
use crate::error::MapError;

/// Fetch and validate one dataset file.
pub async fn fetch_dataset(url: &str) -> Result<Dataset, MapError> {
	let response = Request::get(url)
		.send()
		.await
		.map_err(|e| MapError::Fetch {
			url: url.to_owned(),
			reason: e.to_string(),
		})?;
	if !response.ok() {
		return Err(MapError::Status {
			url: url.to_owned(),
			status: response.status(),
		});
	}
	let text = response.text().await.map_err(|e| MapError::Fetch {
		url: url.to_owned(),
		reason: e.to_string(),
	})?;
	Dataset::from_json(&text)
}

/// Load a department's dataset plus its hierarchical layout, if published.
/// Only the main dataset is required.
pub async fn load_department(
	department: Department,
) -> Result<(Dataset, Option<Dataset>), MapError> {
	info!("loading {}", department.data_url());
	let dataset = fetch_dataset(department.data_url()).await?;
	let hierarchical = match fetch_dataset(&department.hierarchical_url()).await {
		Ok(h) => Some(h),
		Err(err) => {
			warn!("no hierarchical layout for {department}: {err}");
			None
		}
	};
	Ok((dataset, hierarchical))
}
