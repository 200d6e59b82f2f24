//! Filter accepted by `GET Command`.

// std
use std::num::NonZeroU32;
// self
use crate::_prelude::*;

/// Optional filter for listing submitted commands; unset and blank fields are left out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCommandFilter {
	/// Lower bound of the creation date.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub filter_date_create_from: Option<String>,
	/// Upper bound of the creation date.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub filter_date_create_to: Option<String>,
	/// Lower bound of the last update date.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub filter_date_update_from: Option<String>,
	/// Upper bound of the last update date.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub filter_date_update_to: Option<String>,
	/// Lower bound of the result date.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub filter_date_result_from: Option<String>,
	/// Upper bound of the result date.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub filter_date_result_to: Option<String>,
	/// One-based page number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page: Option<NonZeroU32>,
	/// Receipt number.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub c_num: Option<String>,
}
impl DataCommandFilter {
	/// Restricts results to commands created within the bounds.
	pub fn created(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
		self.filter_date_create_from = Some(from.into());
		self.filter_date_create_to = Some(to.into());

		self
	}

	/// Restricts results to commands updated within the bounds.
	pub fn updated(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
		self.filter_date_update_from = Some(from.into());
		self.filter_date_update_to = Some(to.into());

		self
	}

	/// Restricts results to commands whose result arrived within the bounds.
	pub fn resulted(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
		self.filter_date_result_from = Some(from.into());
		self.filter_date_result_to = Some(to.into());

		self
	}

	/// Selects a result page; `0` clears the selection.
	pub fn page(mut self, page: u32) -> Self {
		self.page = NonZeroU32::new(page);

		self
	}

	/// Restricts results to one receipt number.
	pub fn receipt_number(mut self, c_num: impl Into<String>) -> Self {
		self.c_num = Some(c_num.into());

		self
	}
}

fn is_blank(value: &Option<String>) -> bool {
	value.as_deref().is_none_or(str::is_empty)
}
