use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::graph::HighlightMode;
use super::loader::load_department;
use super::palette;
use super::render;
use super::settings::{Department, DisplaySettings, LayoutKind};
use super::state::{CourseInfo, CourseMapState, InfoPanel, SWAP_FADE};
use super::types::{Program, Requisite};

type SharedState = Rc<RefCell<Option<CourseMapState>>>;

/// Longest step fed to the engine clock; a backgrounded tab resumes without
/// skipping whole transitions in one frame.
const MAX_FRAME_STEP: f64 = 0.1;

/// Snapshot of the engine state the HTML chrome shows.
#[derive(Clone, Debug, Default, PartialEq)]
struct Chrome {
	programs: Vec<Program>,
	selected_program: u32,
	info: InfoPanel,
	settings: DisplaySettings,
	department: Department,
	transitioning: bool,
	hierarchical: bool,
	controls: (f64, f64),
}

impl Chrome {
	fn capture(s: &CourseMapState) -> Self {
		Self {
			programs: s.programs().to_vec(),
			selected_program: s.selected_program(),
			info: s.info().clone(),
			settings: s.settings,
			department: s.department(),
			transitioning: s.is_transitioning(),
			hierarchical: s.has_hierarchical_layout(),
			controls: s.controls_position(),
		}
	}
}

/// Chrome clicks, drained by the frame loop.
#[derive(Clone, Copy, Debug)]
enum ChromeCommand {
	SelectProgram(u32),
	SwitchDepartment(Department),
	ToggleLines,
	ToggleChainMode,
	ToggleBursts,
	ToggleLayout,
}

fn apply_command(shared: &SharedState, command: ChromeCommand) {
	let mut guard = shared.borrow_mut();
	let Some(s) = guard.as_mut() else {
		return;
	};
	match command {
		ChromeCommand::SelectProgram(id) => {
			if let Err(err) = s.select_program(id) {
				warn!("{err}");
			}
		}
		ChromeCommand::SwitchDepartment(department) => {
			if s.begin_swap(department) {
				spawn_swap(shared.clone(), department);
			}
		}
		ChromeCommand::ToggleLines => {
			let visible = !s.settings.lines_visible;
			s.set_lines_visible(visible);
		}
		ChromeCommand::ToggleChainMode => {
			let mode = match s.settings.highlight_mode {
				HighlightMode::Direct => HighlightMode::Chain,
				HighlightMode::Chain => HighlightMode::Direct,
			};
			s.set_highlight_mode(mode);
		}
		ChromeCommand::ToggleBursts => {
			let enabled = !s.settings.bursts_enabled;
			s.set_bursts_enabled(enabled);
		}
		ChromeCommand::ToggleLayout => {
			let layout = match s.settings.layout {
				LayoutKind::Standard => LayoutKind::Hierarchical,
				LayoutKind::Hierarchical => LayoutKind::Standard,
			};
			s.set_layout(layout);
		}
	}
}

/// Wait out the chrome fade, fetch the new department, then rebuild or
/// roll back.
fn spawn_swap(shared: SharedState, department: Department) {
	wasm_bindgen_futures::spawn_local(async move {
		gloo_timers::future::sleep(Duration::from_secs_f64(SWAP_FADE)).await;
		let loaded = load_department(department).await;
		let mut guard = shared.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		match loaded {
			Ok((dataset, hierarchical)) => s.complete_swap(dataset, hierarchical),
			Err(err) => s.abort_swap(&err),
		}
	});
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn canvas_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen && let Some(window) = web_sys::window() {
		return window_size(&window);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn CourseMapCanvas(
	#[prop(optional)] department: Department,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, frame_init, resize_cb_init) = (state.clone(), frame.clone(), resize_cb.clone());

	let chrome = RwSignal::new(Chrome::default());
	let chrome_alpha = RwSignal::new(1.0_f64);
	let commands = RwSignal::new(Vec::<ChromeCommand>::new());
	let load_error = RwSignal::new(None::<String>);
	let push = move |command: ChromeCommand| commands.update(|q| q.push(command));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};

		let (state_load, canvas_load) = (state_init.clone(), canvas.clone());
		wasm_bindgen_futures::spawn_local(async move {
			match load_department(department).await {
				Ok((dataset, hierarchical)) => {
					// The window may have changed size while the fetch ran.
					let (w, h) = canvas_size(&canvas_load, fullscreen, width, height);
					*state_load.borrow_mut() =
						Some(CourseMapState::new(dataset, hierarchical, department, w, h));
				}
				Err(err) => {
					error!("failed to load department {department}: {err}");
					load_error.set(Some(err.to_string()));
				}
			}
		});

		if fullscreen {
			let state_resize = state_init.clone();
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				if let Some(s) = state_resize.borrow_mut().as_mut() {
					s.request_resize(nw, nh);
				}
			}));
			if let Some(cb) = resize_cb_init.borrow().as_ref() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, frame_inner, canvas_anim) =
			(state_init.clone(), frame_init.clone(), canvas.clone());
		let mut last_frame: Option<f64> = None;
		let mut last_revision: Option<u64> = None;
		let mut last_cursor = "";
		*frame_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let dt = last_frame.map_or(0.0, |prev| ((now - prev) / 1000.0).clamp(0.0, MAX_FRAME_STEP));
			last_frame = Some(now);

			let queued = commands
				.try_update_untracked(std::mem::take)
				.unwrap_or_default();
			for command in queued {
				apply_command(&state_anim, command);
			}

			if let Some(s) = state_anim.borrow_mut().as_mut() {
				s.tick(dt);
				let (cw, ch) = (s.width() as u32, s.height() as u32);
				if canvas_anim.width() != cw || canvas_anim.height() != ch {
					canvas_anim.set_width(cw);
					canvas_anim.set_height(ch);
				}
				render::render(s, &ctx);

				if last_revision != Some(s.revision()) {
					last_revision = Some(s.revision());
					chrome.set(Chrome::capture(s));
				}
				if chrome_alpha.get_untracked() != s.chrome_opacity() {
					chrome_alpha.set(s.chrome_opacity());
				}
				if s.cursor() != last_cursor {
					last_cursor = s.cursor();
					let _ = web_sys::HtmlElement::style(&canvas_anim)
						.set_property("cursor", last_cursor);
				}
			}

			if let (Some(cb), Some(win)) = (frame_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = frame_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_md.borrow_mut().as_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_mm.borrow_mut().as_mut() {
			s.pointer_moved(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(s) = state_mu.borrow_mut().as_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.pointer_left();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_wh.borrow_mut().as_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let opacity = move || chrome_alpha.get().to_string();

	view! {
		<div class="course-map">
			<canvas
				node_ref=canvas_ref
				class="course-map-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block;"
			/>

			<nav id="program-track-nav" style:opacity=opacity>
				{move || {
					chrome
						.with(|c| {
							c.programs
								.iter()
								.map(|p| {
									let id = p.program_id;
									view! {
										<div
											class="program"
											class:highlight={id == c.selected_program}
											on:click=move |_| push(ChromeCommand::SelectProgram(id))
										>
											{p.name.clone()}
										</div>
									}
								})
								.collect_view()
						})
				}}
			</nav>

			<aside id="course-info" style:opacity=opacity>
				{move || chrome.with(|c| info_view(&c.info))}
			</aside>

			<div class="department-switch">
				{Department::ALL
					.into_iter()
					.map(|dept| {
						view! {
							<button
								class:active=move || chrome.with(|c| c.department == dept)
								prop:disabled=move || chrome.with(|c| c.transitioning)
								on:click=move |_| push(ChromeCommand::SwitchDepartment(dept))
							>
								{dept.title()}
							</button>
						}
					})
					.collect_view()}
			</div>

			<div
				class="debug-controls"
				style:position="absolute"
				style:left=move || format!("{}px", chrome.with(|c| c.controls.0))
				style:top=move || format!("{}px", chrome.with(|c| c.controls.1))
				style:opacity=opacity
			>
				<label>
					<input
						type="checkbox"
						prop:checked=move || chrome.with(|c| c.settings.lines_visible)
						on:change=move |_| push(ChromeCommand::ToggleLines)
					/>
					"Show lines"
				</label>
				<label>
					<input
						type="checkbox"
						prop:checked=move || {
							chrome.with(|c| c.settings.highlight_mode == HighlightMode::Chain)
						}
						on:change=move |_| push(ChromeCommand::ToggleChainMode)
					/>
					"Highlight chain"
				</label>
				<label>
					<input
						type="checkbox"
						prop:checked=move || chrome.with(|c| c.settings.bursts_enabled)
						on:change=move |_| push(ChromeCommand::ToggleBursts)
					/>
					"Equivalency bursts"
				</label>
				<label>
					<input
						type="checkbox"
						prop:checked=move || {
							chrome.with(|c| c.settings.layout == LayoutKind::Hierarchical)
						}
						prop:disabled=move || chrome.with(|c| !c.hierarchical)
						on:change=move |_| push(ChromeCommand::ToggleLayout)
					/>
					"Hierarchical layout"
				</label>
			</div>

			{move || load_error.get().map(|e| view! { <p class="load-error">{e}</p> })}
		</div>
	}
}

fn info_view(info: &InfoPanel) -> AnyView {
	match info {
		InfoPanel::Empty => ().into_any(),
		InfoPanel::ProgramHtml(html) => {
			view! { <div class="program-requirements" inner_html=html.clone()></div> }.into_any()
		}
		InfoPanel::Course(info) => course_info_view(info).into_any(),
	}
}

/// Side panel markup for a hovered course.
fn course_info_view(info: &CourseInfo) -> impl IntoView {
	view! {
		<h2>
			<span class="course-number">{info.number.clone()}</span>
			" "
			{info.title.clone()}
		</h2>
		<p class="description">{info.description.clone()}</p>
		{requisite_list("Prerequisites", &info.prereqs)}
		{requisite_list("Corequisites", &info.coreqs)}
		{(!info.notes.is_empty()).then(|| view! { <p class="notes">{info.notes.clone()}</p> })}
	}
}

fn requisite_list(heading: &'static str, items: &[Requisite]) -> Option<impl IntoView> {
	if items.is_empty() {
		return None;
	}
	let entries = items
		.iter()
		.map(|r| {
			let name = palette::display_name(&r.requisite_number);
			let text = if r.requisite_is_primary {
				name
			} else {
				format!("{name} (alternative)")
			};
			view! { <li>{text}</li> }
		})
		.collect_view();
	Some(view! {
		<div class="requisites">
			<h3>{heading}</h3>
			<ul>{entries}</ul>
		</div>
	})
}
