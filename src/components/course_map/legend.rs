//! Legend contents and responsive layout.
//!
//! Only course types present in the loaded data get a row. Sizes step at
//! three viewport-width breakpoints and the panel hangs off the top-right
//! corner.

use super::palette::{self, COURSE_TYPES, CourseType, Rgba};
use super::types::Course;

const SMALL_BREAKPOINT: f64 = 1000.0;
const LARGE_BREAKPOINT: f64 = 1400.0;
pub const REQUIRED_CIRCLE_SPACING: f64 = 22.0;
pub const DASH_PATTERN: [f64; 2] = [6.0, 4.0];

#[derive(Clone, Debug, PartialEq)]
pub enum LegendItem {
	CourseType { color: Rgba, label: &'static str },
	Required { colors: Vec<Rgba> },
	PrimaryLine,
	AlternativeLine,
}

impl LegendItem {
	pub fn label(&self) -> &'static str {
		match self {
			Self::CourseType { label, .. } => label,
			Self::Required { .. } => "Required Course",
			Self::PrimaryLine => "Recommended Prerequisites",
			Self::AlternativeLine => "Alternative Prerequisites",
		}
	}
}

pub fn legend_items(courses: &[Course]) -> Vec<LegendItem> {
	let present: Vec<&CourseType> = COURSE_TYPES
		.iter()
		.filter(|t| {
			courses
				.iter()
				.any(|c| palette::course_type(&c.course_number).is_some_and(|ct| ct.tag == t.tag))
		})
		.collect();

	let mut items: Vec<LegendItem> = present
		.iter()
		.map(|t| LegendItem::CourseType {
			color: t.color,
			label: t.label,
		})
		.collect();
	items.push(LegendItem::Required {
		colors: present.iter().map(|t| t.color).collect(),
	});
	items.push(LegendItem::PrimaryLine);
	items.push(LegendItem::AlternativeLine);
	items
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
	pub left: f64,
}

/// Sizes for one breakpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendConfig {
	pub padding: Insets,
	pub margin: f64,
	pub row_height: f64,
	pub circle_radius: f64,
	pub circle_stroke_width: f64,
	pub line_length: f64,
	pub line_stroke_width: f64,
	pub icon_x: f64,
	pub icon_y: f64,
	pub label_x: f64,
	pub font_size: f64,
	pub content_width: f64,
}

impl LegendConfig {
	pub fn for_width(viewport_width: f64) -> Self {
		if viewport_width < SMALL_BREAKPOINT {
			Self {
				padding: Insets {
					top: 10.0,
					right: 10.0,
					bottom: 10.0,
					left: 15.0,
				},
				margin: 10.0,
				row_height: 18.0,
				circle_radius: 5.0,
				circle_stroke_width: 1.25,
				line_length: 35.0,
				line_stroke_width: 1.5,
				icon_x: 30.0,
				icon_y: 7.0,
				label_x: 65.0,
				font_size: 11.0,
				content_width: 210.0,
			}
		} else if viewport_width < LARGE_BREAKPOINT {
			Self {
				padding: Insets {
					top: 15.0,
					right: 15.0,
					bottom: 15.0,
					left: 20.0,
				},
				margin: 15.0,
				row_height: 22.0,
				circle_radius: 6.0,
				circle_stroke_width: 1.25,
				line_length: 42.0,
				line_stroke_width: 2.0,
				icon_x: 38.0,
				icon_y: 9.0,
				label_x: 83.0,
				font_size: 13.0,
				content_width: 245.0,
			}
		} else {
			Self {
				padding: Insets {
					top: 18.0,
					right: 18.0,
					bottom: 18.0,
					left: 25.0,
				},
				margin: 20.0,
				row_height: 24.0,
				circle_radius: 7.0,
				circle_stroke_width: 1.25,
				line_length: 50.0,
				line_stroke_width: 2.0,
				icon_x: 45.0,
				icon_y: 10.0,
				label_x: 100.0,
				font_size: 14.0,
				content_width: 280.0,
			}
		}
	}
}

/// A placed legend panel in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
	pub items: Vec<LegendItem>,
	pub config: LegendConfig,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Legend {
	pub fn layout(items: Vec<LegendItem>, viewport_width: f64) -> Self {
		let config = LegendConfig::for_width(viewport_width);
		let width = config.content_width + config.padding.left + config.padding.right;
		let height =
			items.len() as f64 * config.row_height + config.padding.top + config.padding.bottom;
		Self {
			x: viewport_width - width - config.margin,
			y: config.margin,
			items,
			config,
			width,
			height,
		}
	}

	/// Top-left corner of row `i`, in screen space.
	pub fn row_origin(&self, i: usize) -> (f64, f64) {
		(
			self.x + self.config.padding.left,
			self.y + self.config.padding.top + i as f64 * self.config.row_height,
		)
	}

	/// Centers of the filled circles in the "required" row, relative to the
	/// row origin.
	pub fn required_circle_xs(&self, count: usize) -> Vec<f64> {
		let start = self.config.icon_x - (count.saturating_sub(1) as f64 * REQUIRED_CIRCLE_SPACING) / 2.0;
		(0..count)
			.map(|i| start + i as f64 * REQUIRED_CIRCLE_SPACING)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn course(n: &str) -> Course {
		Course {
			course_number: n.into(),
			x: 0.0,
			y: 0.0,
			required: false,
			title: String::new(),
			description: String::new(),
			notes: String::new(),
		}
	}

	#[test]
	fn only_present_types_in_table_order() {
		let items = legend_items(&[course("M1"), course("S2"), course("X9")]);
		let labels: Vec<_> = items.iter().map(LegendItem::label).collect();
		assert_eq!(
			labels,
			[
				"STAT",
				"MATH",
				"Required Course",
				"Recommended Prerequisites",
				"Alternative Prerequisites"
			]
		);
		assert_eq!(
			items[2],
			LegendItem::Required {
				colors: vec![Rgba::hex(0x00a896), Rgba::hex(0xe84855)]
			}
		);
	}

	#[test]
	fn lowercase_tags_count_as_present() {
		let items = legend_items(&[course("s100")]);
		assert_eq!(items[0].label(), "STAT");
		assert_eq!(
			items[1],
			LegendItem::Required {
				colors: vec![Rgba::hex(0x00a896)]
			}
		);
	}

	#[test]
	fn breakpoints_pick_sizes() {
		assert_eq!(LegendConfig::for_width(999.0).font_size, 11.0);
		assert_eq!(LegendConfig::for_width(1000.0).font_size, 13.0);
		assert_eq!(LegendConfig::for_width(1400.0).font_size, 14.0);
	}

	#[test]
	fn panel_anchored_top_right() {
		let legend = Legend::layout(legend_items(&[course("S1")]), 1200.0);
		assert_eq!(legend.width, 245.0 + 35.0);
		assert_eq!(legend.height, 4.0 * 22.0 + 30.0);
		assert_eq!(legend.x, 1200.0 - 280.0 - 15.0);
		assert_eq!(legend.y, 15.0);
		assert_eq!(legend.row_origin(1), (legend.x + 20.0, 15.0 + 15.0 + 22.0));
	}

	#[test]
	fn required_circles_centered_on_icon() {
		let legend = Legend::layout(Vec::new(), 1500.0);
		assert_eq!(legend.required_circle_xs(3), [23.0, 45.0, 67.0]);
		assert_eq!(legend.required_circle_xs(1), [45.0]);
		assert!(legend.required_circle_xs(0).is_empty());
	}
}
