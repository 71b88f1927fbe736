use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
	#[error("failed to fetch {url}: {reason}")]
	Fetch { url: String, reason: String },

	#[error("fetching {url} returned HTTP {status}")]
	Status { url: String, status: u16 },

	#[error("malformed dataset: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("dataset defines no programs")]
	NoPrograms,

	#[error("dataset has no course partition for program {0}")]
	MissingPartition(u32),

	#[error("program {program_id} lists course {course_number} more than once")]
	DuplicateCourse {
		program_id: u32,
		course_number: String,
	},

	#[error("unknown department {0:?}")]
	UnknownDepartment(String),

	#[error("unknown program {0}")]
	UnknownProgram(u32),
}
