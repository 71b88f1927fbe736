//! Keyed scene entities and enter/update/exit reconciliation.

use std::collections::{BTreeMap, HashSet};

use super::graph::HighlightSet;
use super::palette::{self, BURST_FALLBACK, Rgba};
use super::scale::CoordinateScale;
use super::tween::Animated;
use super::types::{Course, Dataset, Requisite};

pub const NODE_RADIUS: f64 = 12.0;
pub const HIGHLIGHT_RADIUS: f64 = 16.0;
pub const LABEL_SIZE: f64 = 11.0;
pub const HIGHLIGHT_LABEL_SIZE: f64 = 14.0;
pub const DIMMED_OPACITY: f64 = 0.3;
pub const PRIMARY_LINE_OPACITY: f64 = 0.2;
pub const STROKE_WIDTH: f64 = 1.25;
pub const MAX_BURSTS: usize = 4;
pub const BURST_DURATION: f64 = 0.3;
const BURST_OFFSET: f64 = 60.0;
const BURST_SPACING: f64 = 45.0;

/// A course circle and its number label.
///
/// `opacity` and `label_opacity` belong to reconciliation (enter, exit,
/// revive). Hover only drives `radius`, `label_size` and `emphasis`, a dim
/// factor multiplied in when drawing.
#[derive(Clone, Debug)]
pub struct CourseNode {
	pub course: Course,
	pub pos: Animated<(f64, f64)>,
	pub radius: Animated<f64>,
	pub opacity: Animated<f64>,
	pub fill: Animated<Rgba>,
	pub stroke: Animated<Rgba>,
	pub label_size: Animated<f64>,
	pub label_opacity: Animated<f64>,
	pub emphasis: Animated<f64>,
	pub label_fill: Rgba,
	pub exiting: bool,
}

impl CourseNode {
	fn entering(course: &Course, scale: &CoordinateScale, d: f64) -> Self {
		let filled = course.required;
		let mut node = Self {
			course: course.clone(),
			pos: Animated::new(scale.point(course.x, course.y)),
			radius: Animated::new(NODE_RADIUS),
			opacity: Animated::new(0.0),
			fill: Animated::new(Rgba::WHITE),
			stroke: Animated::new(Rgba::TRANSPARENT),
			label_size: Animated::new(LABEL_SIZE),
			label_opacity: Animated::new(0.0),
			emphasis: Animated::new(1.0),
			label_fill: palette::label_color(filled),
			exiting: false,
		};
		let n = course.course_number.as_str();
		node.opacity.animate(1.0, 2.0 * d, d);
		node.label_opacity.animate(1.0, 2.0 * d, d);
		node.fill.animate(palette::fill_color(n, filled), 2.0 * d, d);
		node.stroke.animate(palette::stroke_color(n, filled), 2.0 * d, d);
		node
	}

	fn update(&mut self, course: &Course, scale: &CoordinateScale, d: f64) {
		let filled = course.required;
		let n = course.course_number.as_str();
		self.fill.set(palette::fill_color(n, filled));
		self.stroke.set(palette::stroke_color(n, filled));
		self.label_fill = palette::label_color(filled);
		self.pos.animate(scale.point(course.x, course.y), d, d);
		if self.exiting {
			self.exiting = false;
			self.opacity.animate(1.0, d, d);
			self.label_opacity.animate(1.0, d, d);
		}
		self.course = course.clone();
	}

	fn exit(&mut self, d: f64) {
		self.exiting = true;
		self.opacity.animate(0.0, 0.0, d);
		self.label_opacity.animate(0.0, 0.0, d);
		self.fill.animate(Rgba::WHITE, 0.0, d);
		self.stroke.animate(Rgba::TRANSPARENT, 0.0, d);
	}

	pub fn key(&self) -> &str {
		&self.course.course_number
	}

	pub fn label(&self) -> &str {
		palette::numeric_part(&self.course.course_number)
	}

	/// Circle opacity as drawn.
	pub fn drawn_opacity(&self) -> f64 {
		self.opacity.get() * self.emphasis.get()
	}

	pub fn drawn_label_opacity(&self) -> f64 {
		self.label_opacity.get() * self.emphasis.get()
	}

	/// Snap the hover properties back to rest, cancelling any hover
	/// transition in flight. Enter and exit fades are untouched.
	pub fn reset_emphasis(&mut self) {
		self.radius.set(NODE_RADIUS);
		self.label_size.set(LABEL_SIZE);
		self.emphasis.set(1.0);
	}

	pub fn animate_emphasis(&mut self, highlighted: bool, duration: f64) {
		if highlighted {
			self.radius.animate(HIGHLIGHT_RADIUS, 0.0, duration);
			self.label_size.animate(HIGHLIGHT_LABEL_SIZE, 0.0, duration);
		} else {
			self.emphasis.animate(DIMMED_OPACITY, 0.0, duration);
		}
	}

	/// Ease the hover properties back to rest from wherever they are.
	pub fn animate_rest(&mut self, duration: f64) {
		self.radius.animate(NODE_RADIUS, 0.0, duration);
		self.label_size.animate(LABEL_SIZE, 0.0, duration);
		self.emphasis.animate(1.0, 0.0, duration);
	}

	pub fn at_rest(&self) -> bool {
		self.radius.get() == NODE_RADIUS
			&& self.label_size.get() == LABEL_SIZE
			&& self.drawn_opacity() == 1.0
			&& self.drawn_label_opacity() == 1.0
	}

	fn tick(&mut self, dt: f64) {
		self.pos.tick(dt);
		self.radius.tick(dt);
		self.opacity.tick(dt);
		self.fill.tick(dt);
		self.stroke.tick(dt);
		self.label_size.tick(dt);
		self.label_opacity.tick(dt);
		self.emphasis.tick(dt);
	}

	fn exit_finished(&self) -> bool {
		self.exiting && !self.opacity.is_animating()
	}
}

/// A requisite line; `from` is the dependent course's end, `to` the
/// prerequisite's.
#[derive(Clone, Debug)]
pub struct RequisiteEdge {
	pub requisite: Requisite,
	pub from: Animated<(f64, f64)>,
	pub to: Animated<(f64, f64)>,
	pub opacity: Animated<f64>,
	pub dashed: bool,
	pub exiting: bool,
}

pub fn base_line_opacity(requisite: &Requisite, lines_visible: bool) -> f64 {
	if lines_visible && requisite.requisite_is_primary {
		PRIMARY_LINE_OPACITY
	} else {
		0.0
	}
}

fn edge_points(r: &Requisite, scale: &CoordinateScale) -> ((f64, f64), (f64, f64)) {
	(
		scale.point(r.course_x, r.course_y),
		scale.point(r.requisite_x, r.requisite_y),
	)
}

impl RequisiteEdge {
	fn entering(r: &Requisite, scale: &CoordinateScale, d: f64, lines_visible: bool) -> Self {
		let (from, to) = edge_points(r, scale);
		let mut edge = Self {
			requisite: r.clone(),
			from: Animated::new(from),
			to: Animated::new(to),
			opacity: Animated::new(0.0),
			dashed: !r.requisite_is_primary,
			exiting: false,
		};
		edge.opacity
			.animate(base_line_opacity(r, lines_visible), 2.0 * d, d);
		edge
	}

	fn update(&mut self, r: &Requisite, scale: &CoordinateScale, d: f64, lines_visible: bool) {
		let (from, to) = edge_points(r, scale);
		self.from.animate(from, d, d);
		self.to.animate(to, d, d);
		self.opacity
			.animate(base_line_opacity(r, lines_visible), d, d);
		self.dashed = !r.requisite_is_primary;
		self.exiting = false;
		self.requisite = r.clone();
	}

	fn exit(&mut self, d: f64) {
		self.exiting = true;
		self.opacity.animate(0.0, 0.0, d);
	}

	fn tick(&mut self, dt: f64) {
		self.from.tick(dt);
		self.to.tick(dt);
		self.opacity.tick(dt);
	}

	fn exit_finished(&self) -> bool {
		self.exiting && !self.opacity.is_animating()
	}
}

/// Burst decorations are keyed by the index of their source among the
/// highlighted prerequisites that have equivalencies, then by slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstKey {
	pub source_index: usize,
	pub slot: usize,
}

#[derive(Clone, Debug)]
pub struct BurstNode {
	pub key: BurstKey,
	pub source: String,
	pub equivalency: String,
	pub pos: Animated<(f64, f64)>,
	pub radius: Animated<f64>,
	pub label_opacity: Animated<f64>,
	pub fill: Rgba,
	pub stroke: Rgba,
	pub label_fill: Rgba,
}

impl BurstNode {
	pub fn label(&self) -> &str {
		palette::numeric_part(&self.equivalency)
	}

	fn tick(&mut self, dt: f64) {
		self.pos.tick(dt);
		self.radius.tick(dt);
		self.label_opacity.tick(dt);
	}
}

/// The mutable visual model: every entity currently drawn, keyed for
/// reconciliation.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub nodes: BTreeMap<String, CourseNode>,
	pub edges: BTreeMap<String, RequisiteEdge>,
	pub bursts: Vec<BurstNode>,
}

impl Scene {
	/// Reconcile against a new course/requisite set. Exits start at once,
	/// updates after `d`, enters after `2d`, each running for `d`.
	pub fn reconcile(
		&mut self,
		courses: &[Course],
		requisites: &[Requisite],
		scale: &CoordinateScale,
		d: f64,
		lines_visible: bool,
	) {
		let keys: HashSet<&str> = courses.iter().map(|c| c.course_number.as_str()).collect();
		for (key, node) in self.nodes.iter_mut() {
			if !node.exiting && !keys.contains(key.as_str()) {
				node.exit(d);
			}
		}
		for course in courses {
			match self.nodes.get_mut(&course.course_number) {
				Some(node) => node.update(course, scale, d),
				None => {
					self.nodes.insert(
						course.course_number.clone(),
						CourseNode::entering(course, scale, d),
					);
				}
			}
		}

		let keys: HashSet<&str> = requisites
			.iter()
			.map(|r| r.course_requisite_number.as_str())
			.collect();
		for (key, edge) in self.edges.iter_mut() {
			if !edge.exiting && !keys.contains(key.as_str()) {
				edge.exit(d);
			}
		}
		for r in requisites {
			match self.edges.get_mut(&r.course_requisite_number) {
				Some(edge) => edge.update(r, scale, d, lines_visible),
				None => {
					self.edges.insert(
						r.course_requisite_number.clone(),
						RequisiteEdge::entering(r, scale, d, lines_visible),
					);
				}
			}
		}
		self.prune();
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.bursts.clear();
	}

	pub fn tick(&mut self, dt: f64) {
		self.nodes.values_mut().for_each(|n| n.tick(dt));
		self.edges.values_mut().for_each(|e| e.tick(dt));
		self.bursts.iter_mut().for_each(|b| b.tick(dt));
		self.prune();
	}

	fn prune(&mut self) {
		self.nodes.retain(|_, n| !n.exit_finished());
		self.edges.retain(|_, e| !e.exit_finished());
	}

	/// Nodes that are part of the current program (not fading out).
	pub fn live_nodes(&self) -> impl Iterator<Item = &CourseNode> {
		self.nodes.values().filter(|n| !n.exiting)
	}

	pub fn live_nodes_mut(&mut self) -> impl Iterator<Item = &mut CourseNode> {
		self.nodes.values_mut().filter(|n| !n.exiting)
	}

	pub fn live_edges_mut(&mut self) -> impl Iterator<Item = &mut RequisiteEdge> {
		self.edges.values_mut().filter(|e| !e.exiting)
	}

	pub fn live_node(&self, course: &str) -> Option<&CourseNode> {
		self.nodes.get(course).filter(|n| !n.exiting)
	}

	/// Final screen positions of the live course nodes.
	pub fn content_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
		self.live_nodes().map(|n| n.pos.target())
	}

	/// Lay out burst decorations for every highlighted prerequisite that has
	/// equivalencies. Fill follows the source node's currently drawn fill.
	pub fn spawn_bursts(&mut self, dataset: &Dataset, set: &HighlightSet) {
		self.bursts.clear();
		let mut source_index = 0;
		for prereq in &set.prereqs {
			let equivalencies: Vec<&str> =
				dataset.equivalencies_of(prereq).take(MAX_BURSTS).collect();
			if equivalencies.is_empty() {
				continue;
			}
			let Some(node) = self.live_node(prereq) else {
				continue;
			};
			let origin = node.pos.target();
			let filled = !node.fill.get().is_white();

			for (slot, eq) in equivalencies.into_iter().enumerate() {
				let color = palette::course_type(eq).map_or(BURST_FALLBACK, |t| t.color);
				let fill = if filled { color } else { Rgba::WHITE };
				let mut burst = BurstNode {
					key: BurstKey { source_index, slot },
					source: prereq.clone(),
					equivalency: eq.to_owned(),
					pos: Animated::new(origin),
					radius: Animated::new(0.0),
					label_opacity: Animated::new(0.0),
					fill,
					stroke: color,
					label_fill: palette::label_color(!fill.is_white()),
				};
				let target = (origin.0 + BURST_OFFSET + slot as f64 * BURST_SPACING, origin.1);
				burst.pos.animate(target, 0.0, BURST_DURATION);
				burst.radius.animate(HIGHLIGHT_RADIUS, 0.0, BURST_DURATION);
				burst.label_opacity.animate(1.0, 0.0, BURST_DURATION);
				self.bursts.push(burst);
			}
			source_index += 1;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::RequisiteKind;
	use super::*;

	fn course(n: &str, x: f64, y: f64, required: bool) -> Course {
		Course {
			course_number: n.into(),
			x,
			y,
			required,
			title: String::new(),
			description: String::new(),
			notes: String::new(),
		}
	}

	fn req(course: &str, prereq: &str, primary: bool) -> Requisite {
		Requisite {
			course_number: course.into(),
			requisite_number: prereq.into(),
			kind: RequisiteKind::Pre,
			requisite_is_primary: primary,
			course_x: 0.0,
			course_y: 0.0,
			requisite_x: 1.0,
			requisite_y: 1.0,
			course_requisite_number: format!("{course}-{prereq}"),
		}
	}

	fn scale() -> CoordinateScale {
		CoordinateScale::fit([(0.0, 0.0), (1.0, 1.0)], 1000.0, 1000.0)
	}

	#[test]
	fn zero_duration_pass_is_immediate() {
		let mut scene = Scene::default();
		scene.reconcile(
			&[course("S1", 0.0, 0.0, true)],
			&[],
			&scale(),
			0.0,
			true,
		);
		let node = &scene.nodes["S1"];
		assert_eq!(node.opacity.get(), 1.0);
		assert_eq!(node.fill.get(), Rgba::hex(0x00a896));
		assert!(!node.pos.is_animating());
	}

	#[test]
	fn exit_update_enter_are_time_offset() {
		let s = scale();
		let mut scene = Scene::default();
		scene.reconcile(
			&[course("S1", 0.0, 0.0, false), course("S2", 1.0, 1.0, false)],
			&[],
			&s,
			0.0,
			true,
		);
		scene.reconcile(
			&[course("S2", 0.0, 1.0, false), course("S3", 1.0, 0.0, false)],
			&[],
			&s,
			1.0,
			true,
		);

		scene.tick(0.5);
		// Exit is underway, nothing else has started.
		assert!(scene.nodes["S1"].opacity.get() < 1.0);
		assert_eq!(scene.nodes["S2"].pos.get(), s.point(1.0, 1.0));
		assert_eq!(scene.nodes["S3"].opacity.get(), 0.0);

		scene.tick(1.0);
		assert!(!scene.nodes.contains_key("S1"));
		assert_ne!(scene.nodes["S2"].pos.get(), s.point(1.0, 1.0));
		assert_eq!(scene.nodes["S3"].opacity.get(), 0.0);

		scene.tick(1.6);
		assert_eq!(scene.nodes["S2"].pos.get(), s.point(0.0, 1.0));
		assert_eq!(scene.nodes["S3"].opacity.get(), 1.0);
	}

	#[test]
	fn re_included_exiting_node_is_revived() {
		let s = scale();
		let mut scene = Scene::default();
		let a = course("S1", 0.0, 0.0, false);
		scene.reconcile(std::slice::from_ref(&a), &[], &s, 0.0, true);
		scene.reconcile(&[], &[], &s, 1.0, true);
		scene.tick(0.5);
		assert!(scene.nodes["S1"].exiting);
		scene.reconcile(std::slice::from_ref(&a), &[], &s, 1.0, true);
		assert_eq!(scene.nodes.len(), 1);
		scene.tick(5.0);
		let node = &scene.nodes["S1"];
		assert!(!node.exiting);
		assert_eq!(node.opacity.get(), 1.0);
	}

	#[test]
	fn hover_emphasis_leaves_enter_fade_pending() {
		let mut scene = Scene::default();
		scene.reconcile(&[course("S1", 0.0, 0.0, false)], &[], &scale(), 1.0, true);
		let node = scene.nodes.get_mut("S1").unwrap();
		node.animate_emphasis(false, 0.2);
		node.tick(0.5);
		node.reset_emphasis();
		node.animate_rest(0.2);
		node.tick(0.5);
		assert_eq!(node.drawn_opacity(), 0.0);
		assert!(node.opacity.is_animating());
		node.tick(2.5);
		assert!(node.at_rest());
	}

	#[test]
	fn edges_rest_at_base_opacity() {
		let mut scene = Scene::default();
		scene.reconcile(
			&[course("S1", 0.0, 0.0, false), course("S2", 1.0, 1.0, false)],
			&[req("S2", "S1", true), req("S1", "S2", false)],
			&scale(),
			0.0,
			true,
		);
		assert_eq!(scene.edges["S2-S1"].opacity.get(), PRIMARY_LINE_OPACITY);
		assert!(!scene.edges["S2-S1"].dashed);
		assert_eq!(scene.edges["S1-S2"].opacity.get(), 0.0);
		assert!(scene.edges["S1-S2"].dashed);
	}

	#[test]
	fn bursts_follow_source_fill_and_cap() {
		let data = Dataset::from_json(
			r#"{
				"programs": [{"program_id": 1, "name": "All"}],
				"courses_program1": [
					{"course_number": "S1", "x": 0, "y": 0, "required": 1},
					{"course_number": "S2", "x": 1, "y": 1}
				],
				"equivalencies": [
					{"course_number": "S1", "equivalency_number": "M10"},
					{"course_number": "S1", "equivalency_number": "X11"},
					{"course_number": "S1", "equivalency_number": "M12"},
					{"course_number": "S1", "equivalency_number": "M13"},
					{"course_number": "S1", "equivalency_number": "M14"}
				]
			}"#,
		)
		.unwrap();
		let s = scale();
		let mut scene = Scene::default();
		scene.reconcile(data.courses_for(1), &[], &s, 0.0, true);
		let set = HighlightSet {
			course: "S2".into(),
			prereqs: vec!["S1".into()],
			mode: super::super::graph::HighlightMode::Direct,
		};
		scene.spawn_bursts(&data, &set);
		assert_eq!(scene.bursts.len(), MAX_BURSTS);
		assert_eq!(scene.bursts[0].fill, Rgba::hex(0xe84855));
		assert_eq!(scene.bursts[1].fill, BURST_FALLBACK);
		assert_eq!(scene.bursts[0].label_fill, Rgba::WHITE);
		assert_eq!(scene.bursts[3].key, BurstKey { source_index: 0, slot: 3 });

		scene.tick(BURST_DURATION);
		let (ox, oy) = s.point(0.0, 0.0);
		assert_eq!(scene.bursts[2].pos.get(), (ox + 60.0 + 90.0, oy));
		assert_eq!(scene.bursts[2].radius.get(), HIGHLIGHT_RADIUS);
		assert_eq!(scene.bursts[2].label(), "12");
	}
}
