pub mod absence_justification;
pub mod attendance_code;
pub mod attendance_record;
pub mod class_session;
pub mod course;
pub mod course_teacher;
pub mod enrollment;
pub mod user;
