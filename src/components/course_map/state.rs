use log::{debug, error, info, warn};

use super::graph::{HighlightMode, HighlightSet, RequisiteIndex};
use super::legend::{Legend, legend_items};
use super::palette;
use super::scale::CoordinateScale;
use super::scene::{CourseNode, Scene, base_line_opacity};
use super::settings::{Department, DisplaySettings, LayoutKind};
use super::tween::Animated;
use super::types::{Dataset, Program, Requisite, RequisiteKind};
use super::viewport::Viewport;
use crate::error::MapError;

pub const PROGRAM_TRANSITION: f64 = 0.6;
pub const RESIZE_TRANSITION: f64 = 0.3;
pub const HOVER_DURATION: f64 = 0.2;
pub const SWAP_FADE: f64 = 0.3;
pub const RESIZE_DEBOUNCE: f64 = 0.15;
pub const RESIZE_THRESHOLD: f64 = 50.0;
const INITIAL_FIT_DELAY: f64 = 0.1;
const RESIZE_FIT_DELAY: f64 = 0.35;
const LAYOUT_FIT_DELAY: f64 = 0.7;
const CONTROLS_INSET_X: f64 = 180.0;
const CONTROLS_INSET_Y: f64 = 60.0;

/// Phase of the latest render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneStatus {
	Idle,
	Exiting,
	Transitioning,
	Entering,
}

/// Record handed to the side panel's course template.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseInfo {
	pub number: String,
	pub title: String,
	pub description: String,
	pub prereqs: Vec<Requisite>,
	pub coreqs: Vec<Requisite>,
	pub notes: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum InfoPanel {
	#[default]
	Empty,
	ProgramHtml(String),
	Course(CourseInfo),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Followup {
	Fit { animate: bool },
	FinishSwap,
}

#[derive(Clone, Copy, Debug)]
struct Deferred {
	due: f64,
	generation: u64,
	followup: Followup,
}

#[derive(Clone, Copy, Debug)]
struct PendingResize {
	width: f64,
	height: f64,
	due: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct RenderPass {
	started_at: f64,
	duration: f64,
}

/// Everything the map knows between frames. Created on the first dataset
/// load, mutated only through its commands, rebuilt in place on a
/// department swap.
pub struct CourseMapState {
	dataset: Dataset,
	hierarchical: Option<Dataset>,
	department: Department,
	pending_department: Option<Department>,
	pub settings: DisplaySettings,
	scale: CoordinateScale,
	scene: Scene,
	index: RequisiteIndex,
	highlight: Option<HighlightSet>,
	hovered: Option<String>,
	selected_program: u32,
	info: InfoPanel,
	legend: Legend,
	viewport: Viewport,
	chrome_opacity: Animated<f64>,
	transitioning: bool,
	clock: f64,
	generation: u64,
	pass: RenderPass,
	deferred: Vec<Deferred>,
	pending_resize: Option<PendingResize>,
	revision: u64,
}

impl CourseMapState {
	pub fn new(
		dataset: Dataset,
		hierarchical: Option<Dataset>,
		department: Department,
		width: f64,
		height: f64,
	) -> Self {
		let mut state = Self {
			scale: CoordinateScale::compute(&dataset, width, height),
			legend: Legend::layout(legend_items(&dataset.courses), width),
			dataset,
			hierarchical,
			department,
			pending_department: None,
			settings: DisplaySettings::default(),
			scene: Scene::default(),
			index: RequisiteIndex::default(),
			highlight: None,
			hovered: None,
			selected_program: 0,
			info: InfoPanel::Empty,
			viewport: Viewport::new(width, height),
			chrome_opacity: Animated::new(1.0),
			transitioning: false,
			clock: 0.0,
			generation: 0,
			pass: RenderPass::default(),
			deferred: Vec::new(),
			pending_resize: None,
			revision: 0,
		};
		state.show_default_program();
		info!(
			"course map ready: {} programs, {} courses",
			state.dataset.programs.len(),
			state.dataset.courses.len()
		);
		state
	}

	fn show_default_program(&mut self) {
		self.selected_program = self
			.dataset
			.default_program()
			.map_or(0, |p| p.program_id);
		self.info = self
			.dataset
			.requirements_html(self.selected_program)
			.map_or(InfoPanel::Empty, |html| InfoPanel::ProgramHtml(html.to_owned()));
		self.render_program(0.0);
		self.schedule(INITIAL_FIT_DELAY, Followup::Fit { animate: false });
	}

	// --- accessors ---

	pub fn dataset(&self) -> &Dataset {
		&self.dataset
	}

	pub fn programs(&self) -> &[Program] {
		&self.dataset.programs
	}

	pub fn selected_program(&self) -> u32 {
		self.selected_program
	}

	pub fn department(&self) -> Department {
		self.department
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn node(&self, course: &str) -> Option<&CourseNode> {
		self.scene.live_node(course)
	}

	/// Keys of the nodes belonging to the current program.
	pub fn node_keys(&self) -> Vec<&str> {
		self.scene.live_nodes().map(CourseNode::key).collect()
	}

	pub fn highlight(&self) -> Option<&HighlightSet> {
		self.highlight.as_ref()
	}

	pub fn info(&self) -> &InfoPanel {
		&self.info
	}

	pub fn legend(&self) -> &Legend {
		&self.legend
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn scale(&self) -> CoordinateScale {
		self.scale
	}

	pub fn chrome_opacity(&self) -> f64 {
		self.chrome_opacity.get()
	}

	pub fn is_transitioning(&self) -> bool {
		self.transitioning
	}

	pub fn has_hierarchical_layout(&self) -> bool {
		self.hierarchical.is_some()
	}

	/// Bumped on every render pass or swap; follow-ups from older
	/// generations are dropped.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Bumped whenever chrome-facing state (programs, info panel,
	/// selection, toggles) changes.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn width(&self) -> f64 {
		self.viewport.width
	}

	pub fn height(&self) -> f64 {
		self.viewport.height
	}

	/// Top-left corner of the debug toggle panel.
	pub fn controls_position(&self) -> (f64, f64) {
		(
			self.viewport.width - CONTROLS_INSET_X,
			self.viewport.height - CONTROLS_INSET_Y,
		)
	}

	pub fn status(&self) -> SceneStatus {
		let d = self.pass.duration;
		let elapsed = self.clock - self.pass.started_at;
		if d <= 0.0 || elapsed >= 3.0 * d {
			SceneStatus::Idle
		} else if elapsed < d {
			SceneStatus::Exiting
		} else if elapsed < 2.0 * d {
			SceneStatus::Transitioning
		} else {
			SceneStatus::Entering
		}
	}

	pub fn cursor(&self) -> &'static str {
		self.viewport.cursor()
	}

	fn source(&self) -> &Dataset {
		layout_source(self.settings.layout, &self.dataset, self.hierarchical.as_ref())
	}

	// --- rendering ---

	fn render_program(&mut self, duration: f64) {
		self.generation += 1;
		self.revision += 1;
		self.pass = RenderPass {
			started_at: self.clock,
			duration,
		};
		let source = layout_source(self.settings.layout, &self.dataset, self.hierarchical.as_ref());
		let courses = source.courses_for(self.selected_program);
		let requisites = source.requisites_for(self.selected_program);
		self.scene.reconcile(
			courses,
			requisites,
			&self.scale,
			duration,
			self.settings.lines_visible,
		);
		self.index = RequisiteIndex::new(requisites);
	}

	fn schedule(&mut self, delay: f64, followup: Followup) {
		self.deferred.push(Deferred {
			due: self.clock + delay,
			generation: self.generation,
			followup,
		});
	}

	/// Advance the engine clock by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		self.clock += dt;
		self.scene.tick(dt);
		self.viewport.tick(dt);
		self.chrome_opacity.tick(dt);

		let clock = self.clock;
		let (due, pending): (Vec<Deferred>, Vec<Deferred>) =
			self.deferred.drain(..).partition(|d| d.due <= clock);
		self.deferred = pending;
		for d in due {
			match d.followup {
				Followup::Fit { animate } => {
					if d.generation == self.generation {
						self.fit_to_content(animate);
					} else {
						debug!("dropping fit from render generation {}", d.generation);
					}
				}
				// Always honored: a swap must not stay locked.
				Followup::FinishSwap => {
					self.transitioning = false;
					self.revision += 1;
				}
			}
		}

		if let Some(p) = self.pending_resize
			&& p.due <= self.clock
			&& !self.transitioning
		{
			self.pending_resize = None;
			self.apply_resize(p.width, p.height);
		}
	}

	/// Frame every live course node. No-op when the scene is empty.
	pub fn fit_to_content(&mut self, animate: bool) -> bool {
		self.viewport
			.fit_to_content(self.scene.content_points(), animate)
	}

	// --- commands ---

	pub fn select_program(&mut self, program_id: u32) -> Result<(), MapError> {
		if self.transitioning {
			debug!("program {program_id} ignored during department swap");
			return Ok(());
		}
		if self.dataset.program(program_id).is_none() {
			return Err(MapError::UnknownProgram(program_id));
		}
		info!("showing program {program_id}");
		self.clear_highlight();
		self.selected_program = program_id;
		self.render_program(PROGRAM_TRANSITION);
		if let Some(html) = self.dataset.requirements_html(program_id) {
			self.info = InfoPanel::ProgramHtml(html.to_owned());
		}
		Ok(())
	}

	/// Drop the active highlight without animation: nodes snap back to rest,
	/// its lines return to base opacity and bursts go away.
	fn clear_highlight(&mut self) {
		self.hovered = None;
		if let Some(prev) = self.highlight.take() {
			for node in self.scene.live_nodes_mut() {
				node.reset_emphasis();
			}
			let visible = self.settings.lines_visible;
			for edge in self.scene.live_edges_mut() {
				if prev.shows_edge(&edge.requisite) {
					edge.opacity
						.set(base_line_opacity(&edge.requisite, visible));
				}
			}
		}
		self.scene.bursts.clear();
	}

	/// Highlight `course` and its prerequisites. Returns false when the
	/// hover was refused.
	pub fn hover_course(&mut self, course: &str) -> bool {
		if self.transitioning {
			debug!("hover on {course} ignored during department swap");
			return false;
		}
		if self.scene.live_node(course).is_none() {
			debug!("hover on {course} ignored, not in the current program");
			return false;
		}

		self.clear_highlight();
		let set = HighlightSet::compute(&self.index, course, self.settings.highlight_mode);

		for node in self.scene.live_nodes_mut() {
			let on = set.contains(node.key());
			node.animate_emphasis(on, HOVER_DURATION);
		}
		for edge in self.scene.live_edges_mut() {
			if set.shows_edge(&edge.requisite) {
				edge.opacity.set(1.0);
			}
		}
		if self.settings.bursts_enabled {
			self.scene.spawn_bursts(&self.dataset, &set);
		}

		if let Some(info) = self.course_info(course) {
			self.info = InfoPanel::Course(info);
			self.revision += 1;
		}
		self.highlight = Some(set);
		true
	}

	pub fn unhover_course(&mut self, course: &str) {
		if self.transitioning {
			debug!("unhover on {course} ignored during department swap");
			return;
		}
		match &self.highlight {
			Some(active) if active.course != course => {
				debug!("stale unhover on {course}, {} is highlighted", active.course);
				return;
			}
			Some(_) => {}
			None => {
				// Already cleared by a program switch or resize.
				self.show_program_info();
				return;
			}
		}

		for node in self.scene.live_nodes_mut() {
			node.animate_rest(HOVER_DURATION);
		}

		// Hide by the same rule that showed them, under the current
		// settings, plus whatever the stored highlight revealed.
		let set = HighlightSet::compute(&self.index, course, self.settings.highlight_mode);
		let prev = self.highlight.take();
		let visible = self.settings.lines_visible;
		for edge in self.scene.live_edges_mut() {
			let shown = set.shows_edge(&edge.requisite)
				|| prev.as_ref().is_some_and(|p| p.shows_edge(&edge.requisite));
			if shown {
				edge.opacity
					.set(base_line_opacity(&edge.requisite, visible));
			}
		}

		let chain_has_equivalencies = set.members().any(|c| self.dataset.has_equivalencies(c));
		if chain_has_equivalencies || prev.is_some() {
			self.scene.bursts.clear();
		}

		self.show_program_info();
	}

	fn show_program_info(&mut self) {
		if let Some(html) = self.dataset.requirements_html(self.selected_program) {
			let info = InfoPanel::ProgramHtml(html.to_owned());
			if self.info != info {
				self.info = info;
				self.revision += 1;
			}
		}
	}

	fn course_info(&self, course: &str) -> Option<CourseInfo> {
		let record = self.dataset.find_course(self.selected_program, course)?;
		let (prereqs, coreqs) = self
			.dataset
			.requisites
			.iter()
			.filter(|r| r.course_number == course)
			.cloned()
			.partition(|r| r.kind == RequisiteKind::Pre);
		Some(CourseInfo {
			number: format!("{}:", palette::display_name(course)),
			title: record.title.clone(),
			description: record.description.clone(),
			prereqs,
			coreqs,
			notes: record.notes.clone(),
		})
	}

	/// Queue a viewport size change; bursts coalesce and only the last size
	/// is applied once input settles.
	pub fn request_resize(&mut self, width: f64, height: f64) {
		self.pending_resize = Some(PendingResize {
			width,
			height,
			due: self.clock + RESIZE_DEBOUNCE,
		});
	}

	/// Apply a settled viewport size. Returns false when the change is
	/// within the noise threshold.
	pub fn apply_resize(&mut self, width: f64, height: f64) -> bool {
		let (dw, dh) = (
			(width - self.viewport.width).abs(),
			(height - self.viewport.height).abs(),
		);
		if dw <= RESIZE_THRESHOLD && dh <= RESIZE_THRESHOLD {
			debug!("resize to {width}x{height} below threshold, ignored");
			return false;
		}
		self.viewport.resize(width, height);
		self.scale = CoordinateScale::compute(self.source(), width, height);
		self.legend = Legend::layout(legend_items(&self.dataset.courses), width);
		self.clear_highlight();
		self.render_program(RESIZE_TRANSITION);
		self.schedule(RESIZE_FIT_DELAY, Followup::Fit { animate: true });
		true
	}

	pub fn set_lines_visible(&mut self, visible: bool) {
		self.settings.lines_visible = visible;
		self.revision += 1;
		let highlight = self.highlight.as_ref();
		for edge in self.scene.edges.values_mut().filter(|e| !e.exiting) {
			if highlight.is_some_and(|h| h.shows_edge(&edge.requisite)) {
				continue;
			}
			edge.opacity
				.set(base_line_opacity(&edge.requisite, visible));
		}
	}

	pub fn set_highlight_mode(&mut self, mode: HighlightMode) {
		self.settings.highlight_mode = mode;
		self.revision += 1;
	}

	pub fn set_bursts_enabled(&mut self, enabled: bool) {
		self.settings.bursts_enabled = enabled;
		self.revision += 1;
	}

	/// Switch coordinate sets. Returns false when refused (swap in flight or
	/// no hierarchical layout loaded).
	pub fn set_layout(&mut self, layout: LayoutKind) -> bool {
		if self.transitioning || layout == self.settings.layout {
			return false;
		}
		if layout == LayoutKind::Hierarchical && self.hierarchical.is_none() {
			warn!("no hierarchical layout for {}", self.department);
			return false;
		}
		info!("switching to {layout:?} layout");
		self.settings.layout = layout;
		self.scale = CoordinateScale::compute(self.source(), self.width(), self.height());
		self.clear_highlight();
		self.render_program(PROGRAM_TRANSITION);
		self.schedule(LAYOUT_FIT_DELAY, Followup::Fit { animate: true });
		true
	}

	// --- department swap ---

	/// Start switching departments: lock out other commands and fade the
	/// chrome. Returns false if a swap is already running or `department`
	/// is already shown.
	pub fn begin_swap(&mut self, department: Department) -> bool {
		if self.transitioning || department == self.department {
			return false;
		}
		info!("switching department {} -> {department}", self.department);
		self.transitioning = true;
		self.pending_department = Some(department);
		self.generation += 1;
		self.revision += 1;
		self.chrome_opacity.animate(0.0, 0.0, SWAP_FADE);
		true
	}

	/// Rebuild the whole scene from a freshly loaded dataset.
	pub fn complete_swap(&mut self, dataset: Dataset, hierarchical: Option<Dataset>) {
		let Some(department) = self.pending_department.take() else {
			warn!("dataset arrived with no department swap in progress, ignored");
			return;
		};
		self.department = department;
		self.dataset = dataset;
		self.hierarchical = hierarchical;
		if self.hierarchical.is_none() {
			self.settings.layout = LayoutKind::Standard;
		}
		self.highlight = None;
		self.hovered = None;
		self.scene.clear();
		self.chrome_opacity.set(0.0);

		let (w, h) = (self.width(), self.height());
		self.scale = CoordinateScale::compute(self.source(), w, h);
		self.legend = Legend::layout(legend_items(&self.dataset.courses), w);
		self.viewport.reset(SWAP_FADE);
		self.show_default_program();
		self.chrome_opacity.animate(1.0, 0.0, SWAP_FADE);
		self.schedule(SWAP_FADE, Followup::FinishSwap);
		info!(
			"department {department} loaded: {} programs, {} courses",
			self.dataset.programs.len(),
			self.dataset.courses.len()
		);
	}

	/// The new dataset could not be loaded: keep the current scene and
	/// department, fade the chrome back in.
	pub fn abort_swap(&mut self, err: &MapError) {
		let department = self.pending_department.take();
		error!(
			"failed to load department {}: {err}",
			department.map_or("?", Department::key)
		);
		self.transitioning = false;
		self.revision += 1;
		self.chrome_opacity.animate(1.0, 0.0, SWAP_FADE);
	}

	// --- pointer input ---

	/// Topmost live course node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&str> {
		let (gx, gy) = self.viewport.transform().invert(sx, sy);
		self.scene
			.live_nodes()
			.filter(|n| {
				let (x, y) = n.pos.get();
				let (dx, dy) = (x - gx, y - gy);
				(dx * dx + dy * dy).sqrt() < n.radius.get()
			})
			.last()
			.map(CourseNode::key)
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if self.node_at_position(sx, sy).is_none() {
			self.viewport.begin_pan(sx, sy);
		}
	}

	pub fn pointer_moved(&mut self, sx: f64, sy: f64) {
		if self.viewport.pan.active {
			self.viewport.pan_to(sx, sy);
			return;
		}
		let hit = self.node_at_position(sx, sy).map(str::to_owned);
		if hit == self.hovered {
			return;
		}
		if let Some(prev) = self.hovered.take() {
			self.unhover_course(&prev);
		}
		if let Some(course) = hit
			&& self.hover_course(&course)
		{
			self.hovered = Some(course);
		}
	}

	pub fn pointer_up(&mut self) {
		self.viewport.end_pan();
	}

	pub fn pointer_left(&mut self) {
		self.viewport.end_pan();
		if let Some(prev) = self.hovered.take() {
			self.unhover_course(&prev);
		}
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.viewport.zoom_at(sx, sy, delta_y);
	}
}

fn layout_source<'a>(
	layout: LayoutKind,
	dataset: &'a Dataset,
	hierarchical: Option<&'a Dataset>,
) -> &'a Dataset {
	match (layout, hierarchical) {
		(LayoutKind::Hierarchical, Some(h)) => h,
		_ => dataset,
	}
}

#[cfg(test)]
mod tests {
	use super::super::scene::{HIGHLIGHT_RADIUS, LABEL_SIZE, NODE_RADIUS, PRIMARY_LINE_OPACITY};
	use super::*;

	const DATA: &str = r#"{
		"courses": [
			{"course_number": "S100", "x": 0, "y": 0, "required": 1, "title": "Intro Stats", "description": "basics", "notes": ""},
			{"course_number": "S200", "x": 1, "y": 1, "title": "Regression", "description": "", "notes": "n"},
			{"course_number": "M100", "x": 0, "y": 1, "title": "Calculus"}
		],
		"requisites": [
			{"course_number": "S200", "requisite_number": "S100", "type": "pre", "requisite_is_primary": 1,
			 "course_x": 1, "course_y": 1, "requisite_x": 0, "requisite_y": 0, "course_requisite_number": "r1"},
			{"course_number": "S200", "requisite_number": "M100", "type": "co", "requisite_is_primary": 0,
			 "course_x": 1, "course_y": 1, "requisite_x": 0, "requisite_y": 1, "course_requisite_number": "r2"}
		],
		"programs": [
			{"program_id": 1, "name": "All Courses", "requirements_html": "<p>all</p>"},
			{"program_id": 2, "name": "Minor"}
		],
		"equivalencies": [{"course_number": "S100", "equivalency_number": "M150"}],
		"courses_program1": [
			{"course_number": "S100", "x": 0, "y": 0, "required": 1},
			{"course_number": "S200", "x": 1, "y": 1},
			{"course_number": "M100", "x": 0, "y": 1}
		],
		"requisites_program1": [
			{"course_number": "S200", "requisite_number": "S100", "type": "pre", "requisite_is_primary": 1,
			 "course_x": 1, "course_y": 1, "requisite_x": 0, "requisite_y": 0, "course_requisite_number": "r1"},
			{"course_number": "S200", "requisite_number": "M100", "type": "co", "requisite_is_primary": 0,
			 "course_x": 1, "course_y": 1, "requisite_x": 0, "requisite_y": 1, "course_requisite_number": "r2"}
		],
		"courses_program2": [
			{"course_number": "S100", "x": 0, "y": 0, "required": 1}
		]
	}"#;

	fn state() -> CourseMapState {
		let data = Dataset::from_json(DATA).unwrap();
		CourseMapState::new(data, None, Department::Stats, 1000.0, 800.0)
	}

	fn settle(state: &mut CourseMapState) {
		for _ in 0..300 {
			state.tick(0.016);
		}
	}

	#[test]
	fn initial_render_is_immediate_and_fits() {
		let mut s = state();
		assert_eq!(s.node_keys(), ["M100", "S100", "S200"]);
		assert_eq!(s.status(), SceneStatus::Idle);
		assert_eq!(s.info(), &InfoPanel::ProgramHtml("<p>all</p>".into()));
		s.wheel(0.0, 0.0, -1.0);
		assert_ne!(s.viewport().transform().k, 1.0);
		settle(&mut s);
		assert_eq!(s.viewport().transform().k, 1.0);
	}

	#[test]
	fn hover_reports_course_info_and_bursts() {
		let mut s = state();
		s.hover_course("S200");
		let InfoPanel::Course(info) = s.info() else {
			panic!("expected course info");
		};
		assert_eq!(info.number, "STAT 200:");
		assert_eq!(info.prereqs.len(), 1);
		assert_eq!(info.coreqs.len(), 1);
		assert_eq!(s.scene().bursts.len(), 1);
		assert_eq!(s.scene().bursts[0].source, "S100");

		s.unhover_course("S200");
		assert!(s.scene().bursts.is_empty());
		assert_eq!(s.info(), &InfoPanel::ProgramHtml("<p>all</p>".into()));
	}

	#[test]
	fn hover_reveals_dashed_alternatives() {
		let mut s = state();
		assert_eq!(s.scene().edges["r2"].opacity.get(), 0.0);
		s.hover_course("S200");
		assert_eq!(s.scene().edges["r2"].opacity.get(), 1.0);
		assert!(s.scene().edges["r2"].dashed);
		s.unhover_course("S200");
		assert_eq!(s.scene().edges["r2"].opacity.get(), 0.0);
		assert_eq!(s.scene().edges["r1"].opacity.get(), PRIMARY_LINE_OPACITY);
	}

	#[test]
	fn rapid_hover_unhover_hover_ends_consistent() {
		let mut s = state();
		s.hover_course("S200");
		s.tick(0.05);
		s.unhover_course("S200");
		s.tick(0.05);
		s.hover_course("S100");
		settle(&mut s);
		assert_eq!(s.node("S100").unwrap().radius.get(), HIGHLIGHT_RADIUS);
		assert_eq!(s.node("S200").unwrap().radius.get(), NODE_RADIUS);
		assert_eq!(s.node("S200").unwrap().drawn_opacity(), 0.3);
		assert_eq!(s.node("M100").unwrap().label_size.get(), LABEL_SIZE);
	}

	#[test]
	fn unknown_hover_is_silent() {
		let mut s = state();
		s.hover_course("Z999");
		assert!(s.highlight().is_none());
		assert_eq!(s.info(), &InfoPanel::ProgramHtml("<p>all</p>".into()));
	}

	#[test]
	fn stale_unhover_keeps_new_highlight() {
		let mut s = state();
		s.hover_course("S100");
		s.hover_course("S200");
		s.unhover_course("S100");
		assert_eq!(s.highlight().unwrap().course, "S200");
	}

	#[test]
	fn select_program_rejects_unknown_and_scopes_nodes() {
		let mut s = state();
		assert!(matches!(
			s.select_program(9),
			Err(MapError::UnknownProgram(9))
		));
		s.select_program(2).unwrap();
		assert_eq!(s.status(), SceneStatus::Exiting);
		assert_eq!(s.node_keys(), ["S100"]);
		settle(&mut s);
		assert_eq!(s.scene().nodes.len(), 1);
		assert!(s.scene().edges.is_empty());
		assert_eq!(s.status(), SceneStatus::Idle);
	}

	#[test]
	fn swap_locks_commands_until_done() {
		let mut s = state();
		assert!(!s.begin_swap(Department::Stats));
		assert!(s.begin_swap(Department::DataScience));
		assert!(!s.begin_swap(Department::DataScience));
		s.hover_course("S100");
		assert!(s.highlight().is_none());
		s.select_program(2).unwrap();
		assert_eq!(s.selected_program(), 1);

		s.complete_swap(Dataset::from_json(DATA).unwrap(), None);
		assert_eq!(s.department(), Department::DataScience);
		assert!(s.is_transitioning());
		settle(&mut s);
		assert!(!s.is_transitioning());
		assert_eq!(s.chrome_opacity(), 1.0);
		s.hover_course("S100");
		assert!(s.highlight().is_some());
	}

	#[test]
	fn failed_swap_keeps_scene() {
		let mut s = state();
		assert!(s.begin_swap(Department::DataScience));
		s.abort_swap(&MapError::NoPrograms);
		settle(&mut s);
		assert_eq!(s.department(), Department::Stats);
		assert!(!s.is_transitioning());
		assert_eq!(s.node_keys().len(), 3);
		assert_eq!(s.chrome_opacity(), 1.0);
	}

	#[test]
	fn resize_is_debounced_and_thresholded() {
		let mut s = state();
		settle(&mut s);
		let generation = s.generation();
		s.request_resize(1030.0, 820.0);
		settle(&mut s);
		assert_eq!(s.generation(), generation);

		s.request_resize(1100.0, 800.0);
		s.tick(0.1);
		s.request_resize(1200.0, 900.0);
		s.tick(0.1);
		assert_eq!(s.generation(), generation);
		s.tick(0.1);
		assert_eq!(s.generation(), generation + 1);
		assert_eq!((s.width(), s.height()), (1200.0, 900.0));
		assert_eq!(s.controls_position(), (1020.0, 840.0));
	}

	#[test]
	fn resize_waits_for_swap() {
		let mut s = state();
		s.begin_swap(Department::DataScience);
		s.request_resize(1400.0, 800.0);
		for _ in 0..20 {
			s.tick(0.016);
		}
		assert_eq!(s.width(), 1000.0);
		s.complete_swap(Dataset::from_json(DATA).unwrap(), None);
		settle(&mut s);
		assert_eq!(s.width(), 1400.0);
	}

	#[test]
	fn line_toggle_hides_base_lines_but_not_highlight() {
		let mut s = state();
		s.hover_course("S200");
		s.set_lines_visible(false);
		assert_eq!(s.scene().edges["r1"].opacity.get(), 1.0);
		s.unhover_course("S200");
		assert_eq!(s.scene().edges["r1"].opacity.get(), 0.0);
		s.set_lines_visible(true);
		assert_eq!(s.scene().edges["r1"].opacity.get(), PRIMARY_LINE_OPACITY);
	}

	#[test]
	fn hierarchical_layout_requires_data() {
		let mut s = state();
		assert!(!s.set_layout(LayoutKind::Hierarchical));
		let data = Dataset::from_json(DATA).unwrap();
		let alt = Dataset::from_json(&DATA.replace("\"x\": 1, \"y\": 1", "\"x\": -1, \"y\": 0.5")).unwrap();
		let mut s = CourseMapState::new(data, Some(alt), Department::Stats, 1000.0, 800.0);
		let before = s.node("S200").unwrap().pos.get();
		assert!(s.set_layout(LayoutKind::Hierarchical));
		settle(&mut s);
		assert_ne!(s.node("S200").unwrap().pos.get(), before);
	}

	#[test]
	fn pointer_hover_and_pan() {
		let mut s = state();
		settle(&mut s);
		let t = s.viewport().transform();
		let (gx, gy) = s.node("S100").unwrap().pos.get();
		let (sx, sy) = t.apply(gx, gy);
		s.pointer_moved(sx, sy);
		assert_eq!(s.highlight().unwrap().course, "S100");
		s.pointer_left();
		assert!(s.highlight().is_none());

		s.pointer_down(1.0, 1.0);
		assert_eq!(s.cursor(), "grabbing");
		s.pointer_moved(11.0, 1.0);
		assert_eq!(s.viewport().transform().x, t.x + 10.0);
		s.pointer_up();
		assert_eq!(s.cursor(), "default");
	}

	#[test]
	fn refused_pointer_hover_is_retried_after_swap() {
		let mut s = state();
		settle(&mut s);
		let (gx, gy) = s.node("S100").unwrap().pos.get();
		let (sx, sy) = s.viewport().transform().apply(gx, gy);
		assert!(s.begin_swap(Department::DataScience));
		s.pointer_moved(sx, sy);
		assert!(s.highlight().is_none());
		s.abort_swap(&MapError::NoPrograms);
		settle(&mut s);
		s.pointer_moved(sx + 1.0, sy);
		assert_eq!(s.highlight().unwrap().course, "S100");
	}
}
