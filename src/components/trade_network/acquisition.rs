//! Fetching and filtering raw trade rows.

use gloo_net::http::Request;
use log::{debug, error, warn};
use serde_json::Value;
use thiserror::Error;

use super::config::TradeNetworkConfig;
use super::types::TradeRecord;

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("request failed: {0}")]
	Network(#[from] gloo_net::Error),
	#[error("backend answered {status}: {text}")]
	Status { status: u16, text: String },
	#[error("malformed trade data: {0}")]
	Malformed(#[from] serde_json::Error),
}

/// Decode a JSON array of trade rows. Elements that don't decode are skipped.
pub fn decode_records(body: &str) -> Result<Vec<TradeRecord>, FetchError> {
	let raw: Vec<Value> = serde_json::from_str(body)?;
	let total = raw.len();
	let records: Vec<TradeRecord> = raw
		.into_iter()
		.enumerate()
		.filter_map(|(i, v)| match serde_json::from_value(v) {
			Ok(record) => Some(record),
			Err(e) => {
				warn!("skipping trade row {i}: {e}");
				None
			}
		})
		.collect();
	if records.len() < total {
		debug!("decoded {} of {} trade rows", records.len(), total);
	}
	Ok(records)
}

/// Keep rows whose commodity descriptor contains `phrase`, ignoring case.
pub fn filter_commodity(records: Vec<TradeRecord>, phrase: &str) -> Vec<TradeRecord> {
	let needle = phrase.to_lowercase();
	records
		.into_iter()
		.filter(|r| r.commodity.to_lowercase().contains(&needle))
		.collect()
}

pub async fn load_trade_records(
	config: &TradeNetworkConfig,
) -> Result<Vec<TradeRecord>, FetchError> {
	let response = Request::get(&config.endpoint).send().await?;
	if !response.ok() {
		return Err(FetchError::Status {
			status: response.status(),
			text: response.status_text(),
		});
	}
	let body = response.text().await?;
	let records = decode_records(&body)?;
	let total = records.len();
	let records = filter_commodity(records, &config.commodity);
	debug!(
		"{} of {} trade rows match {:?}",
		records.len(),
		total,
		config.commodity
	);
	Ok(records)
}

/// Like [`load_trade_records`], but a failure is logged and yields no rows.
pub async fn load_or_empty(config: &TradeNetworkConfig) -> Vec<TradeRecord> {
	match load_trade_records(config).await {
		Ok(records) => records,
		Err(e) => {
			error!("failed to load trade data from {}: {e}", config.endpoint);
			Vec::new()
		}
	}
}
