use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    /// Only the literal query value "teacher" elects the teacher role;
    /// anything else (including absent) is a student.
    pub fn from_param(role: &str) -> Self {
        if role == "teacher" {
            Role::Teacher
        } else {
            Role::Student
        }
    }
}

/// Query parameters supplied on the WebSocket upgrade request.
/// `id` is the student identity (ignored for the teacher).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectParams {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub channel: String,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    #[error("no teacher connected")]
    NoTeacherConnected,

    #[error("student not found")]
    StudentNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_teacher_param_elects_teacher() {
        assert_eq!(Role::from_param("teacher"), Role::Teacher);
        assert_eq!(Role::from_param(""), Role::Student);
        assert_eq!(Role::from_param("Teacher"), Role::Student);
        assert_eq!(Role::from_param("admin"), Role::Student);
    }
}
