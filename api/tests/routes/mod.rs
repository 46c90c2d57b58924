mod attendance_test;
mod auth_test;
mod courses_test;
mod health_test;
mod justifications_test;
mod me_test;
