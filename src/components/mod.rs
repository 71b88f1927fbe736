pub mod course_map;
