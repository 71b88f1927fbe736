//! Course-type colors shared by nodes, bursts and the legend.

use super::tween::Lerp;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
	pub r: f64,
	pub g: f64,
	pub b: f64,
	pub a: f64,
}

impl Rgba {
	pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
	pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
	pub const TRANSPARENT: Rgba = Rgba {
		r: 0.0,
		g: 0.0,
		b: 0.0,
		a: 0.0,
	};

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self {
			r: r as f64,
			g: g as f64,
			b: b as f64,
			a: 1.0,
		}
	}

	pub const fn hex(v: u32) -> Self {
		Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
	}

	pub fn is_white(&self) -> bool {
		*self == Self::WHITE
	}

	pub fn css(&self) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			self.r.round(),
			self.g.round(),
			self.b.round(),
			self.a
		)
	}
}

impl Lerp for Rgba {
	fn lerp(self, to: Self, t: f64) -> Self {
		Self {
			r: self.r.lerp(to.r, t),
			g: self.g.lerp(to.g, t),
			b: self.b.lerp(to.b, t),
			a: self.a.lerp(to.a, t),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CourseType {
	pub tag: char,
	pub color: Rgba,
	pub label: &'static str,
}

/// Known course types, in legend order.
pub const COURSE_TYPES: [CourseType; 4] = [
	CourseType {
		tag: 'S',
		color: Rgba::hex(0x00a896),
		label: "STAT",
	},
	CourseType {
		tag: 'M',
		color: Rgba::hex(0xe84855),
		label: "MATH",
	},
	CourseType {
		tag: 'D',
		color: Rgba::hex(0xff7d00),
		label: "DSCI",
	},
	CourseType {
		tag: 'C',
		color: Rgba::hex(0x6a4c93),
		label: "CPSC",
	},
];

/// Used for filled courses whose type tag is unknown.
pub const HIGHLIGHT_FALLBACK: Rgba = Rgba::rgb(0, 85, 183);
/// Used for burst decorations whose type tag is unknown.
pub const BURST_FALLBACK: Rgba = Rgba::hex(0xffba49);

pub fn course_type(course_number: &str) -> Option<&'static CourseType> {
	let tag = course_number.chars().next()?.to_ascii_uppercase();
	COURSE_TYPES.iter().find(|t| t.tag == tag)
}

/// "S200" -> "200"
pub fn numeric_part(course_number: &str) -> &str {
	let mut chars = course_number.chars();
	chars.next();
	chars.as_str()
}

/// "S200" -> "STAT 200"; unknown tags keep only the digits.
pub fn display_name(course_number: &str) -> String {
	let digits = numeric_part(course_number);
	match course_type(course_number) {
		Some(t) => format!("{} {digits}", t.label),
		None => digits.to_owned(),
	}
}

pub fn fill_color(course_number: &str, filled: bool) -> Rgba {
	if filled {
		course_type(course_number).map_or(HIGHLIGHT_FALLBACK, |t| t.color)
	} else {
		Rgba::WHITE
	}
}

pub fn stroke_color(course_number: &str, filled: bool) -> Rgba {
	match course_type(course_number) {
		Some(t) => t.color,
		None if filled => HIGHLIGHT_FALLBACK,
		None => Rgba::BLACK,
	}
}

pub fn label_color(filled: bool) -> Rgba {
	if filled { Rgba::WHITE } else { Rgba::BLACK }
}
