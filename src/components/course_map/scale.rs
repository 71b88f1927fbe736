//! Data-space to screen-space mapping.
//!
//! Layout coordinates come from the "All Courses" program. The mapped extent
//! fills the viewport minus a padding band and is centered, with the y axis
//! flipped so larger data y lands higher on screen.

use super::types::Dataset;

/// Fraction of each viewport axis left empty around the data extent.
pub const COORD_PADDING: f64 = 0.2;

const FALLBACK_X_DIVISOR: f64 = 10.0;
const FALLBACK_Y_DIVISOR: f64 = 8.0;

/// Scale and offset shared by every entity in one render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateScale {
	pub scale_x: f64,
	pub scale_y: f64,
	pub offset_x: f64,
	pub offset_y: f64,
}

impl CoordinateScale {
	pub fn compute(dataset: &Dataset, width: f64, height: f64) -> Self {
		let points = dataset
			.default_program()
			.map(|p| dataset.courses_for(p.program_id))
			.unwrap_or(&[])
			.iter()
			.map(|c| (c.x, c.y));
		Self::fit(points, width, height)
	}

	/// Fits a set of data points; an empty set uses the fallback divisors
	/// centered on the viewport.
	pub fn fit(points: impl IntoIterator<Item = (f64, f64)>, width: f64, height: f64) -> Self {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for (x, y) in points {
			if !x.is_finite() || !y.is_finite() {
				continue;
			}
			bounds = Some(match bounds {
				None => (x, x, y, y),
				Some((min_x, max_x, min_y, max_y)) => {
					(min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
				}
			});
		}

		let Some((min_x, max_x, min_y, max_y)) = bounds else {
			return Self {
				scale_x: width / FALLBACK_X_DIVISOR,
				scale_y: height / FALLBACK_Y_DIVISOR,
				offset_x: width / 2.0,
				offset_y: height / 2.0,
			};
		};

		let (range_x, range_y) = (max_x - min_x, max_y - min_y);
		let usable_w = width * (1.0 - COORD_PADDING);
		let usable_h = height * (1.0 - COORD_PADDING);
		let scale_x = if range_x > 0.0 {
			usable_w / range_x
		} else {
			width / FALLBACK_X_DIVISOR
		};
		let scale_y = if range_y > 0.0 {
			usable_h / range_y
		} else {
			height / FALLBACK_Y_DIVISOR
		};

		let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		Self {
			scale_x,
			scale_y,
			offset_x: width / 2.0 - mid_x * scale_x,
			offset_y: height / 2.0 + mid_y * scale_y,
		}
	}

	#[inline]
	pub fn x(&self, x: f64) -> f64 {
		x * self.scale_x + self.offset_x
	}

	#[inline]
	pub fn y(&self, y: f64) -> f64 {
		self.offset_y - y * self.scale_y
	}

	#[inline]
	pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
		(self.x(x), self.y(y))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn centers_extent_and_flips_y() {
		let s = CoordinateScale::fit([(0.0, 0.0), (1.0, 1.0)], 1000.0, 500.0);
		assert_eq!(s.scale_x, 800.0);
		assert_eq!(s.scale_y, 400.0);
		assert_eq!(s.point(0.5, 0.5), (500.0, 250.0));
		// Higher data y is higher on screen.
		assert!(s.y(1.0) < s.y(0.0));
		assert_eq!(s.point(0.0, 0.0), (100.0, 450.0));
		assert_eq!(s.point(1.0, 1.0), (900.0, 50.0));
	}

	#[test]
	fn empty_data_uses_fallback() {
		let s = CoordinateScale::fit([], 1000.0, 800.0);
		assert_eq!((s.scale_x, s.scale_y), (100.0, 100.0));
		assert_eq!(s.point(0.0, 0.0), (500.0, 400.0));
	}

	#[test]
	fn zero_range_axis_falls_back_on_that_axis_only() {
		let s = CoordinateScale::fit([(2.0, 0.0), (2.0, 4.0)], 1000.0, 800.0);
		assert_eq!(s.scale_x, 100.0);
		assert_eq!(s.scale_y, 160.0);
		assert!(s.x(2.0).is_finite());
		assert_eq!(s.x(2.0), 500.0);
		assert_eq!(s.y(2.0), 400.0);
	}

	#[test]
	fn non_finite_points_are_ignored() {
		let s = CoordinateScale::fit([(f64::NAN, 1.0), (0.0, 0.0), (2.0, 2.0)], 100.0, 100.0);
		assert_eq!(s.scale_x, 40.0);
	}
}
