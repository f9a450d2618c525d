//! The single-window form, modelled as explicit state plus events.
//!
//! [`handle`] takes the current [`Form`] and one [`Event`], runs the matching flow on the
//! [`AttendanceManager`], and returns the updated form together with the dialog to show. User
//! mistakes (empty fields, bad IDs, unreadable codes) become error dialogs. Database and file
//! system failures are returned as `Err` and abort the action.

use crate::display;
use crate::error::AttendanceError;
use crate::manager::{AttendanceManager, MarkOutcome};
use crate::qr;
use std::path::Path;

/// The contents of the form's text inputs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Form {
    pub name: String,
    pub email: String,
    pub delete_id: String,
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    EditName(String),
    EditEmail(String),
    EditDeleteId(String),
    /// The "Register Student" button.
    Register,
    /// The "Delete Student" button.
    Delete,
    /// The "View Attendance" button.
    View,
    /// A file was dropped on the drop target. The path is passed as delivered.
    Drop(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A modal message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            title: "Warning".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// The outcome of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub form: Form,
    pub dialog: Option<Dialog>,
}

impl Reaction {
    fn quiet(form: Form) -> Self {
        Self { form, dialog: None }
    }

    fn show(form: Form, dialog: Dialog) -> Self {
        Self {
            form,
            dialog: Some(dialog),
        }
    }
}

/// Applies one event to the form.
pub fn handle(
    manager: &mut AttendanceManager,
    mut form: Form,
    event: Event,
) -> Result<Reaction, AttendanceError> {
    match event {
        Event::EditName(name) => {
            form.name = name;
            Ok(Reaction::quiet(form))
        }
        Event::EditEmail(email) => {
            form.email = email;
            Ok(Reaction::quiet(form))
        }
        Event::EditDeleteId(delete_id) => {
            form.delete_id = delete_id;
            Ok(Reaction::quiet(form))
        }
        Event::Register => register(manager, form),
        Event::Delete => delete(manager, form),
        Event::View => {
            let rows = manager.attendance_report()?;
            let dialog = Dialog::info("Attendance Records", display::render_report(&rows));
            Ok(Reaction::show(form, dialog))
        }
        Event::Drop(raw_path) => {
            let dialog = drop_file(manager, &raw_path)?;
            Ok(Reaction::show(form, dialog))
        }
    }
}

fn register(manager: &mut AttendanceManager, mut form: Form) -> Result<Reaction, AttendanceError> {
    match manager.register_student(&form.name, &form.email) {
        Ok(registration) => {
            form.name.clear();
            form.email.clear();

            let message = format!(
                "Student registered with ID {}!\nQR Code generated: {}",
                registration.student.id,
                registration.qr_path.display()
            );
            Ok(Reaction::show(form, Dialog::info("Success", message)))
        }
        Err(err) if err.is_user_error() => Ok(Reaction::show(form, Dialog::error(err.to_string()))),
        Err(err) => Err(err),
    }
}

fn delete(manager: &mut AttendanceManager, form: Form) -> Result<Reaction, AttendanceError> {
    let student_id = match parse_student_id(&form.delete_id) {
        Ok(id) => id,
        Err(err) => return Ok(Reaction::show(form, Dialog::error(err.to_string()))),
    };

    let deletion = manager.delete_student(student_id)?;

    let message = match (&deletion.student, deletion.qr_removed) {
        (Some(student), _) => format!(
            "Student {} ({}) deleted successfully.",
            student_id, student.name
        ),
        (None, true) => format!("QR code of student {student_id} deleted successfully."),
        (None, false) => format!("No student with ID {student_id} was registered."),
    };

    Ok(Reaction::show(form, Dialog::info("Success", message)))
}

/// Reads the student ID out of a dropped image and marks that student present.
fn drop_file(manager: &mut AttendanceManager, raw_path: &str) -> Result<Dialog, AttendanceError> {
    let path = Path::new(qr::clean_drop_path(raw_path));

    let student_id = match qr::scan_student_id(path) {
        Ok(id) => id,
        Err(err) => {
            log::warn!("could not read a student code from {}: {err:?}", path.display());
            return Ok(Dialog::error(err.to_string()));
        }
    };

    Ok(match manager.mark_attendance(student_id)? {
        MarkOutcome::Marked(_) => Dialog::info("Success", "Attendance Marked!"),
        MarkOutcome::AlreadyMarked { .. } => Dialog::warning("Attendance already marked today!"),
    })
}

/// Parses a student ID typed by the user.
pub fn parse_student_id(text: &str) -> Result<i32, AttendanceError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| AttendanceError::InvalidStudentId(text.to_string()))
}
