use std::fmt;
use std::str::FromStr;

use super::graph::HighlightMode;
use crate::error::MapError;

/// The departments with a published dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Department {
	Stats,
	#[default]
	DataScience,
}

impl Department {
	pub const ALL: [Department; 2] = [Department::DataScience, Department::Stats];

	pub fn key(self) -> &'static str {
		match self {
			Self::Stats => "stats",
			Self::DataScience => "dsci",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::Stats => "Statistics",
			Self::DataScience => "Data Science",
		}
	}

	pub fn data_url(self) -> &'static str {
		match self {
			Self::Stats => "data/data.json",
			Self::DataScience => "data/dsci_data.json",
		}
	}

	/// Optional precomputed hierarchical coordinates for the same courses.
	pub fn hierarchical_url(self) -> String {
		format!("data/{}_hierarchical.json", self.key())
	}
}

impl FromStr for Department {
	type Err = MapError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"stats" => Ok(Self::Stats),
			"dsci" => Ok(Self::DataScience),
			_ => Err(MapError::UnknownDepartment(s.to_owned())),
		}
	}
}

impl fmt::Display for Department {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutKind {
	#[default]
	Standard,
	Hierarchical,
}

/// Debug toggles exposed in the bottom-right panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplaySettings {
	pub lines_visible: bool,
	pub highlight_mode: HighlightMode,
	pub bursts_enabled: bool,
	pub layout: LayoutKind,
}

impl Default for DisplaySettings {
	fn default() -> Self {
		Self {
			lines_visible: true,
			highlight_mode: HighlightMode::Direct,
			bursts_enabled: true,
			layout: LayoutKind::Standard,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn department_names_round_trip() {
		for dept in Department::ALL {
			assert_eq!(dept.key().parse::<Department>().unwrap(), dept);
		}
		assert_eq!(" STATS ".parse::<Department>().unwrap(), Department::Stats);
		assert!("math".parse::<Department>().is_err());
		assert_eq!(Department::default().data_url(), "data/dsci_data.json");
		assert_eq!(
			Department::Stats.hierarchical_url(),
			"data/stats_hierarchical.json"
		);
	}
}
