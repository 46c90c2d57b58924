//! Notification group names.

/// Personal group of one user.
pub fn user_topic(user_id: i64) -> String {
    format!("user_{user_id}_notifications")
}

/// Everyone following one class session: its teachers and enrolled students.
pub fn session_topic(session_id: i64) -> String {
    format!("class_session_{session_id}_notifications")
}

/// Teacher-wide announcements such as freshly generated codes.
pub fn teacher_general_topic(teacher_id: i64) -> String {
    format!("teacher_{teacher_id}_general_notifications")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names_are_stable() {
        assert_eq!(user_topic(7), "user_7_notifications");
        assert_eq!(session_topic(3), "class_session_3_notifications");
        assert_eq!(teacher_general_topic(2), "teacher_2_general_notifications");
    }
}
