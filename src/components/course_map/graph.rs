use std::collections::{HashMap, HashSet};

use super::types::Requisite;

/// Recursion cap for prerequisite chains. Real curricula are a handful of
/// levels deep.
pub const MAX_CHAIN_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HighlightMode {
	/// Only the hovered course's immediate prerequisites.
	#[default]
	Direct,
	/// The full transitive prerequisite closure.
	Chain,
}

/// Prerequisite adjacency for one program, built once per program switch.
#[derive(Clone, Debug, Default)]
pub struct RequisiteIndex {
	prereqs: HashMap<String, Vec<String>>,
}

impl RequisiteIndex {
	pub fn new(requisites: &[Requisite]) -> Self {
		let mut prereqs: HashMap<String, Vec<String>> = HashMap::new();
		for r in requisites {
			prereqs
				.entry(r.course_number.clone())
				.or_default()
				.push(r.requisite_number.clone());
		}
		Self { prereqs }
	}

	pub fn direct_prereqs(&self, course: &str) -> Vec<String> {
		let mut seen = HashSet::new();
		self.prereqs
			.get(course)
			.into_iter()
			.flatten()
			.filter(|p| seen.insert(p.as_str()))
			.cloned()
			.collect()
	}

	/// Transitive prerequisites of `course`, in discovery order, without
	/// duplicates and never including `course` itself.
	///
	/// Each branch carries its own copy of the visited set, so an ancestor
	/// shared by two branches is still explored on both and a cycle only
	/// stops the branch that closes it.
	pub fn prerequisite_chain(&self, course: &str) -> Vec<String> {
		let mut out = Vec::new();
		self.walk(course, HashSet::new(), 0, &mut out);

		let mut seen = HashSet::new();
		out.retain(|c| c != course && seen.insert(c.clone()));
		out
	}

	fn walk<'a>(
		&'a self,
		course: &'a str,
		mut visited: HashSet<&'a str>,
		depth: usize,
		out: &mut Vec<String>,
	) {
		if depth >= MAX_CHAIN_DEPTH || !visited.insert(course) {
			return;
		}
		let Some(direct) = self.prereqs.get(course) else {
			return;
		};
		out.extend(direct.iter().cloned());
		for prereq in direct {
			self.walk(prereq, visited.clone(), depth + 1, out);
		}
	}

	pub fn prerequisites(&self, course: &str, mode: HighlightMode) -> Vec<String> {
		match mode {
			HighlightMode::Direct => self.direct_prereqs(course),
			HighlightMode::Chain => self.prerequisite_chain(course),
		}
	}
}

/// The hovered course plus the prerequisites it pulls into view.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightSet {
	pub course: String,
	pub prereqs: Vec<String>,
	pub mode: HighlightMode,
}

impl HighlightSet {
	pub fn compute(index: &RequisiteIndex, course: &str, mode: HighlightMode) -> Self {
		Self {
			course: course.to_owned(),
			prereqs: index.prerequisites(course, mode),
			mode,
		}
	}

	pub fn contains(&self, course: &str) -> bool {
		self.course == course || self.prereqs.iter().any(|p| p == course)
	}

	/// All member courses, hovered course first.
	pub fn members(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.course.as_str()).chain(self.prereqs.iter().map(String::as_str))
	}

	/// Whether a requisite line belongs to this highlight. Chain mode shows
	/// every line inside the set; direct mode only the hovered course's own
	/// prerequisite lines.
	pub fn shows_edge(&self, requisite: &Requisite) -> bool {
		match self.mode {
			HighlightMode::Chain => {
				self.contains(&requisite.course_number)
					&& self.contains(&requisite.requisite_number)
			}
			HighlightMode::Direct => {
				requisite.course_number == self.course
					&& self.prereqs.contains(&requisite.requisite_number)
			}
		}
	}
}
