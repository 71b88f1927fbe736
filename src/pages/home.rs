use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::warn;

use crate::components::course_map::{CourseMapCanvas, Department};

/// Department named by `?dept=`, falling back to the default one.
fn requested_department() -> Department {
	let Some(name) = use_query_map().with_untracked(|q| q.get("dept")) else {
		return Department::default();
	};
	name.parse().unwrap_or_else(|err| {
		warn!("{err}, showing {}", Department::default());
		Department::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let department = requested_department();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div id="course-map" class="fullscreen-map">
				<CourseMapCanvas department=department fullscreen=true />
			</div>
		</ErrorBoundary>
	}
}
