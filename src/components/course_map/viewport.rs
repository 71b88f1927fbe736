//! Pan/zoom camera over the scene.

use super::tween::{Animated, Lerp};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
pub const FIT_PADDING: f64 = 50.0;
pub const FIT_DURATION: f64 = 0.5;
const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	pub const IDENTITY: ViewTransform = ViewTransform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	pub fn apply(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Lerp for ViewTransform {
	fn lerp(self, to: Self, t: f64) -> Self {
		Self {
			x: self.x.lerp(to.x, t),
			y: self.y.lerp(to.y, t),
			k: self.k.lerp(to.k, t),
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	transform: Animated<ViewTransform>,
	pub pan: PanState,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			transform: Animated::new(ViewTransform::IDENTITY),
			pan: PanState::default(),
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform.get()
	}

	/// The transform once any running camera animation settles.
	pub fn target_transform(&self) -> ViewTransform {
		self.transform.target()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn tick(&mut self, dt: f64) {
		self.transform.tick(dt);
	}

	pub fn set_transform(&mut self, t: ViewTransform, duration: f64) {
		if duration > 0.0 {
			self.transform.animate(t, 0.0, duration);
		} else {
			self.transform.set(t);
		}
	}

	pub fn reset(&mut self, duration: f64) {
		self.pan.active = false;
		self.set_transform(ViewTransform::IDENTITY, duration);
	}

	/// Transform framing `points` (screen-space node centers) with padding,
	/// never zooming past 100%. `None` when there is nothing to frame.
	pub fn fit_transform(
		&self,
		points: impl IntoIterator<Item = (f64, f64)>,
	) -> Option<ViewTransform> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for (x, y) in points {
			if !x.is_finite() || !y.is_finite() {
				continue;
			}
			bounds = Some(match bounds {
				None => (x, x, y, y),
				Some((a, b, c, d)) => (a.min(x), b.max(x), c.min(y), d.max(y)),
			});
		}
		let (min_x, max_x, min_y, max_y) = bounds?;

		let content_w = max_x - min_x + FIT_PADDING * 2.0;
		let content_h = max_y - min_y + FIT_PADDING * 2.0;
		let k = (self.width / content_w)
			.min(self.height / content_h)
			.min(1.0)
			.max(MIN_ZOOM);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		Some(ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		})
	}

	/// Frames the given points; returns false (and changes nothing) if there
	/// are none.
	pub fn fit_to_content(
		&mut self,
		points: impl IntoIterator<Item = (f64, f64)>,
		animate: bool,
	) -> bool {
		let Some(t) = self.fit_transform(points) else {
			return false;
		};
		self.set_transform(t, if animate { FIT_DURATION } else { 0.0 });
		true
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		let t = self.transform.get();
		self.transform.interrupt();
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: t.x,
			transform_start_y: t.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let t = self.transform.get();
		self.transform.set(ViewTransform {
			x: self.pan.transform_start_x + (sx - self.pan.start_x),
			y: self.pan.transform_start_y + (sy - self.pan.start_y),
			k: t.k,
		});
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Wheel zoom about the pointer.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let t = self.transform.get();
		let factor = if delta_y > 0.0 {
			WHEEL_ZOOM_OUT
		} else {
			WHEEL_ZOOM_IN
		};
		let k = (t.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / t.k;
		self.transform.set(ViewTransform {
			x: sx - (sx - t.x) * ratio,
			y: sy - (sy - t.y) * ratio,
			k,
		});
	}

	pub fn cursor(&self) -> &'static str {
		if self.pan.active { "grabbing" } else { "default" }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fit_centers_and_caps_zoom_at_one() {
		let mut v = Viewport::new(1000.0, 800.0);
		assert!(v.fit_to_content([(100.0, 100.0), (200.0, 300.0)], false));
		let t = v.transform();
		assert_eq!(t.k, 1.0);
		assert_eq!(t.apply(150.0, 200.0), (500.0, 400.0));
	}

	#[test]
	fn fit_shrinks_large_content() {
		let v = Viewport::new(500.0, 500.0);
		let t = v.fit_transform([(0.0, 0.0), (1900.0, 900.0)]).unwrap();
		assert_eq!(t.k, 0.25);
		let (x0, y0) = t.apply(0.0, 0.0);
		let (x1, y1) = t.apply(1900.0, 900.0);
		assert!(x0 >= 0.0 && x1 <= 500.0 && y0 >= 0.0 && y1 <= 500.0);
	}

	#[test]
	fn fit_without_points_is_noop() {
		let mut v = Viewport::new(500.0, 500.0);
		v.set_transform(
			ViewTransform {
				x: 3.0,
				y: 4.0,
				k: 2.0,
			},
			0.0,
		);
		assert!(!v.fit_to_content(std::iter::empty(), true));
		assert_eq!(v.transform().k, 2.0);
	}

	#[test]
	fn animated_fit_settles_on_target() {
		let mut v = Viewport::new(1000.0, 800.0);
		v.fit_to_content([(0.0, 0.0), (10.0, 10.0)], true);
		assert_eq!(v.transform(), ViewTransform::IDENTITY);
		let target = v.target_transform();
		v.tick(FIT_DURATION);
		assert_eq!(v.transform(), target);
	}

	#[test]
	fn wheel_zoom_is_clamped_and_keeps_pointer_fixed() {
		let mut v = Viewport::new(500.0, 500.0);
		let before = v.transform().invert(120.0, 80.0);
		v.zoom_at(120.0, 80.0, -1.0);
		let after = v.transform().invert(120.0, 80.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		for _ in 0..100 {
			v.zoom_at(0.0, 0.0, -1.0);
		}
		assert_eq!(v.transform().k, MAX_ZOOM);
		for _ in 0..100 {
			v.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(v.transform().k, MIN_ZOOM);
	}

	#[test]
	fn pan_tracks_drag_and_sets_cursor() {
		let mut v = Viewport::new(500.0, 500.0);
		assert_eq!(v.cursor(), "default");
		v.begin_pan(10.0, 10.0);
		assert_eq!(v.cursor(), "grabbing");
		v.pan_to(40.0, 0.0);
		assert_eq!(v.transform().x, 30.0);
		assert_eq!(v.transform().y, -10.0);
		v.end_pan();
		assert_eq!(v.cursor(), "default");
		v.pan_to(100.0, 100.0);
		assert_eq!(v.transform().x, 30.0);
	}
}
