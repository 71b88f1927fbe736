//! Delayed, interruptible property transitions.
//!
//! Every animated scene property is an [`Animated`] value. Starting a new
//! transition replaces the pending one; interrupting keeps whatever value
//! the property had reached.

pub fn ease_out_cubic(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	1.0 - (1.0 - t).powi(3)
}

pub trait Lerp: Copy {
	fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
	fn lerp(self, to: Self, t: f64) -> Self {
		self + (to - self) * t
	}
}

impl Lerp for (f64, f64) {
	fn lerp(self, to: Self, t: f64) -> Self {
		(self.0.lerp(to.0, t), self.1.lerp(to.1, t))
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Tween<T> {
	// Captured when the delay runs out, like a transition reading its
	// starting attribute at start time.
	from: Option<T>,
	to: T,
	delay: f64,
	duration: f64,
	elapsed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animated<T> {
	value: T,
	tween: Option<Tween<T>>,
}

impl<T: Lerp> Animated<T> {
	pub fn new(value: T) -> Self {
		Self { value, tween: None }
	}

	pub fn get(&self) -> T {
		self.value
	}

	/// Where the property ends up once any pending transition finishes.
	pub fn target(&self) -> T {
		self.tween.map_or(self.value, |t| t.to)
	}

	pub fn is_animating(&self) -> bool {
		self.tween.is_some()
	}

	/// Cancel the pending transition and jump to `value`.
	pub fn set(&mut self, value: T) {
		self.tween = None;
		self.value = value;
	}

	/// Cancel the pending transition, keeping the current value.
	pub fn interrupt(&mut self) {
		self.tween = None;
	}

	/// Transition to `to` after `delay` seconds over `duration` seconds.
	/// A zero delay and duration applies immediately.
	pub fn animate(&mut self, to: T, delay: f64, duration: f64) {
		if delay <= 0.0 && duration <= 0.0 {
			self.set(to);
			return;
		}
		self.tween = Some(Tween {
			from: None,
			to,
			delay: delay.max(0.0),
			duration: duration.max(0.0),
			elapsed: 0.0,
		});
	}

	/// Advance by `dt` seconds. Returns true when a transition finished
	/// during this step.
	pub fn tick(&mut self, dt: f64) -> bool {
		let Some(tween) = self.tween.as_mut() else {
			return false;
		};
		tween.elapsed += dt;
		if tween.elapsed < tween.delay {
			return false;
		}
		let from = *tween.from.get_or_insert(self.value);
		let run = tween.elapsed - tween.delay;
		if tween.duration <= 0.0 || run >= tween.duration {
			self.value = tween.to;
			self.tween = None;
			return true;
		}
		self.value = from.lerp(tween.to, ease_out_cubic(run / tween.duration));
		false
	}
}

impl<T: Lerp + Default> Default for Animated<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn waits_for_delay_then_eases_to_target() {
		let mut a = Animated::new(0.0);
		a.animate(10.0, 0.5, 1.0);
		a.tick(0.4);
		assert_eq!(a.get(), 0.0);
		a.tick(0.6);
		assert!(a.get() > 0.0 && a.get() < 10.0);
		assert_eq!(a.target(), 10.0);
		assert!(a.tick(1.0));
		assert_eq!(a.get(), 10.0);
		assert!(!a.is_animating());
	}

	#[test]
	fn start_value_is_read_when_delay_ends() {
		let mut a = Animated::new(0.0);
		a.animate(10.0, 1.0, 1.0);
		a.tick(0.5);
		// Something else moves the value before the delay elapses.
		a.value = 4.0;
		a.tick(0.5);
		assert_eq!(a.get(), 4.0);
		a.tick(2.0);
		assert_eq!(a.get(), 10.0);
	}

	#[test]
	fn interrupt_keeps_intermediate_value() {
		let mut a = Animated::new(12.0);
		a.animate(16.0, 0.0, 0.2);
		a.tick(0.1);
		let mid = a.get();
		a.interrupt();
		a.tick(1.0);
		assert_eq!(a.get(), mid);
		assert!(mid > 12.0 && mid < 16.0);
	}

	#[test]
	fn zero_duration_applies_immediately() {
		let mut a = Animated::new((0.0, 0.0));
		a.animate((3.0, 4.0), 0.0, 0.0);
		assert_eq!(a.get(), (3.0, 4.0));
		assert!(!a.is_animating());
	}

	#[test]
	fn zero_duration_after_delay_snaps() {
		let mut a = Animated::new(1.0);
		a.animate(0.0, 0.3, 0.0);
		a.tick(0.2);
		assert_eq!(a.get(), 1.0);
		assert!(a.tick(0.2));
		assert_eq!(a.get(), 0.0);
	}
}
