//! Dataset records and load-time validation.

use std::collections::{HashMap, HashSet};

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::MapError;

/// One course as laid out in data space.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Course {
	#[serde(deserialize_with = "de_key")]
	pub course_number: String,
	pub x: f64,
	pub y: f64,
	#[serde(default, deserialize_with = "de_flag")]
	pub required: bool,
	#[serde(default, deserialize_with = "de_text")]
	pub title: String,
	#[serde(default, deserialize_with = "de_text")]
	pub description: String,
	#[serde(default, deserialize_with = "de_text")]
	pub notes: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum RequisiteKind {
	#[serde(rename = "pre")]
	Pre,
	#[serde(rename = "co")]
	Co,
}

/// Directed edge from `requisite_number` (the prerequisite) to `course_number`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Requisite {
	#[serde(deserialize_with = "de_key")]
	pub course_number: String,
	#[serde(deserialize_with = "de_key")]
	pub requisite_number: String,
	#[serde(rename = "type")]
	pub kind: RequisiteKind,
	#[serde(default, deserialize_with = "de_flag")]
	pub requisite_is_primary: bool,
	pub course_x: f64,
	pub course_y: f64,
	pub requisite_x: f64,
	pub requisite_y: f64,
	#[serde(deserialize_with = "de_key")]
	pub course_requisite_number: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Program {
	pub program_id: u32,
	#[serde(deserialize_with = "de_text")]
	pub name: String,
	#[serde(default, deserialize_with = "de_opt_text")]
	pub requirements_html: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Equivalency {
	#[serde(deserialize_with = "de_key")]
	pub course_number: String,
	#[serde(deserialize_with = "de_key")]
	pub equivalency_number: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProgramRequirement {
	pub program_id: u32,
	#[serde(default, deserialize_with = "de_opt_text")]
	pub html_content: Option<String>,
}

#[derive(Deserialize)]
struct RawDataset {
	#[serde(default)]
	courses: Vec<Course>,
	#[serde(default)]
	requisites: Vec<Requisite>,
	#[serde(default)]
	programs: Vec<Program>,
	#[serde(default)]
	tracks: Vec<Value>,
	#[serde(default)]
	courses_tracks: Vec<Value>,
	#[serde(default)]
	reflections: Vec<Value>,
	#[serde(default)]
	equivalencies: Vec<Equivalency>,
	#[serde(default)]
	program_requirements: Option<Vec<ProgramRequirement>>,
	#[serde(flatten)]
	partitions: HashMap<String, Value>,
}

/// A whole department's data, validated and split per program.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
	pub courses: Vec<Course>,
	pub requisites: Vec<Requisite>,
	pub programs: Vec<Program>,
	pub tracks: Vec<Value>,
	pub courses_tracks: Vec<Value>,
	pub reflections: Vec<Value>,
	pub equivalencies: Vec<Equivalency>,
	program_courses: HashMap<u32, Vec<Course>>,
	program_requisites: HashMap<u32, Vec<Requisite>>,
	program_html: HashMap<u32, String>,
}

const COURSES_PREFIX: &str = "courses_program";
const REQUISITES_PREFIX: &str = "requisites_program";

impl Dataset {
	pub fn from_json(text: &str) -> Result<Self, MapError> {
		let raw: RawDataset = serde_json::from_str(text)?;
		Self::from_raw(raw)
	}

	fn from_raw(mut raw: RawDataset) -> Result<Self, MapError> {
		if raw.programs.is_empty() {
			return Err(MapError::NoPrograms);
		}

		let mut program_courses = HashMap::new();
		let mut program_requisites = HashMap::new();
		for program in &raw.programs {
			let id = program.program_id;
			let courses: Vec<Course> =
				match raw.partitions.remove(&format!("{COURSES_PREFIX}{id}")) {
					Some(value) => serde_json::from_value(value)?,
					None => return Err(MapError::MissingPartition(id)),
				};
			let mut seen = HashSet::new();
			for course in &courses {
				if !seen.insert(course.course_number.as_str()) {
					return Err(MapError::DuplicateCourse {
						program_id: id,
						course_number: course.course_number.clone(),
					});
				}
			}

			let requisites: Vec<Requisite> =
				match raw.partitions.remove(&format!("{REQUISITES_PREFIX}{id}")) {
					Some(value) => serde_json::from_value(value)?,
					None => {
						warn!("program {id} has no requisite partition, drawing no lines");
						Vec::new()
					}
				};
			let before = requisites.len();
			let requisites: Vec<Requisite> = requisites
				.into_iter()
				.filter(|r| seen.contains(r.course_number.as_str()))
				.filter(|r| seen.contains(r.requisite_number.as_str()))
				.collect();
			if requisites.len() < before {
				warn!(
					"program {id}: dropped {} requisites with endpoints outside the program",
					before - requisites.len()
				);
			}

			program_courses.insert(id, courses);
			program_requisites.insert(id, requisites);
		}

		let mut program_html = HashMap::new();
		for program in &raw.programs {
			if let Some(html) = &program.requirements_html {
				program_html.insert(program.program_id, html.clone());
			}
		}
		for req in raw.program_requirements.iter().flatten() {
			if let Some(html) = &req.html_content {
				program_html.insert(req.program_id, html.clone());
			}
		}

		Ok(Self {
			courses: raw.courses,
			requisites: raw.requisites,
			programs: raw.programs,
			tracks: raw.tracks,
			courses_tracks: raw.courses_tracks,
			reflections: raw.reflections,
			equivalencies: raw.equivalencies,
			program_courses,
			program_requisites,
			program_html,
		})
	}

	/// The default "All Courses" program.
	pub fn default_program(&self) -> Option<&Program> {
		self.programs.first()
	}

	pub fn program(&self, program_id: u32) -> Option<&Program> {
		self.programs.iter().find(|p| p.program_id == program_id)
	}

	pub fn courses_for(&self, program_id: u32) -> &[Course] {
		self.program_courses
			.get(&program_id)
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	pub fn requisites_for(&self, program_id: u32) -> &[Requisite] {
		self.program_requisites
			.get(&program_id)
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	pub fn requirements_html(&self, program_id: u32) -> Option<&str> {
		self.program_html.get(&program_id).map(String::as_str)
	}

	pub fn equivalencies_of<'a>(&'a self, course: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.equivalencies
			.iter()
			.filter(move |e| e.course_number == course)
			.map(|e| e.equivalency_number.as_str())
	}

	pub fn has_equivalencies(&self, course: &str) -> bool {
		self.equivalencies_of(course).next().is_some()
	}

	/// Looks a course up in the top-level list, then in the given program.
	pub fn find_course(&self, program_id: u32, course: &str) -> Option<&Course> {
		self.courses
			.iter()
			.find(|c| c.course_number == course)
			.or_else(|| {
				self.courses_for(program_id)
					.iter()
					.find(|c| c.course_number == course)
			})
	}
}

// Spreadsheet exports write missing cells as "" and numbers where text is expected.

fn de_key<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	match Value::deserialize(de)? {
		Value::String(s) => Ok(s),
		Value::Number(n) => Ok(n.to_string()),
		other => Err(serde::de::Error::custom(format!(
			"expected a course key, got {other}"
		))),
	}
}

fn de_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	Ok(match Value::deserialize(de)? {
		Value::String(s) => s,
		Value::Null => String::new(),
		other => other.to_string(),
	})
}

fn de_opt_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
	let text = de_text(de)?;
	Ok(if text.trim().is_empty() {
		None
	} else {
		Some(text)
	})
}

fn de_flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
	Ok(match Value::deserialize(de)? {
		Value::Bool(b) => b,
		Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
		Value::String(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
		_ => false,
	})
}
