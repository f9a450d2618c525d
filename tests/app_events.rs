mod test_support;

use image::{Rgb, RgbImage};
use qr_attendance::app::{self, Event, Form, Severity};
use qr_attendance::manager::AttendanceManager;
use qr_attendance::qr;
use test_support::{open_manager, temp_dir};

fn send(manager: &mut AttendanceManager, form: Form, event: Event) -> (Form, app::Dialog) {
    let reaction = app::handle(manager, form, event).expect("handle event");
    let dialog = reaction.dialog.expect("a dialog");
    (reaction.form, dialog)
}

fn register(manager: &mut AttendanceManager, name: &str, email: &str) -> Form {
    let mut form = Form::default();
    for event in [
        Event::EditName(name.to_string()),
        Event::EditEmail(email.to_string()),
    ] {
        let reaction = app::handle(manager, form, event).expect("edit");
        assert!(reaction.dialog.is_none());
        form = reaction.form;
    }

    let (form, dialog) = send(manager, form, Event::Register);
    assert_eq!(dialog.severity, Severity::Info);
    form
}

#[test]
fn register_clears_the_form() {
    let (mut manager, qr_dir) = open_manager("qr-attendance-app-register");

    let form = register(&mut manager, "Alice", "a@x.com");

    assert_eq!(form, Form::default());
    assert!(qr::code_path(&qr_dir, 1).is_file());
}

#[test]
fn register_with_empty_field_keeps_the_form() {
    let (mut manager, _qr_dir) = open_manager("qr-attendance-app-empty");
    let form = Form {
        name: "Alice".to_string(),
        ..Form::default()
    };

    let (form, dialog) = send(&mut manager, form, Event::Register);

    assert_eq!(dialog.severity, Severity::Error);
    assert_eq!(dialog.message, "Email cannot be empty");
    assert_eq!(form.name, "Alice");
    assert_eq!(manager.num_students().expect("count"), 0);
}

#[test]
fn delete_confirms_even_without_a_code_file() {
    let (mut manager, qr_dir) = open_manager("qr-attendance-app-delete");
    register(&mut manager, "Alice", "a@x.com");
    std::fs::remove_file(qr::code_path(&qr_dir, 1)).expect("remove code");

    let form = Form {
        delete_id: "1".to_string(),
        ..Form::default()
    };
    let (_, dialog) = send(&mut manager, form, Event::Delete);

    assert_eq!(dialog.severity, Severity::Info);
    assert!(dialog.message.contains("deleted successfully"));
    assert_eq!(manager.num_students().expect("count"), 0);
}

#[test]
fn delete_with_non_numeric_id_changes_nothing() {
    let (mut manager, _qr_dir) = open_manager("qr-attendance-app-bad-id");
    register(&mut manager, "Alice", "a@x.com");

    let form = Form {
        delete_id: "abc".to_string(),
        ..Form::default()
    };
    let (_, dialog) = send(&mut manager, form, Event::Delete);

    assert_eq!(dialog.severity, Severity::Error);
    assert_eq!(manager.num_students().expect("count"), 1);
}

#[test]
fn view_without_records() {
    let (mut manager, _qr_dir) = open_manager("qr-attendance-app-view");

    let (_, dialog) = send(&mut manager, Form::default(), Event::View);

    assert_eq!(dialog.title, "Attendance Records");
    assert_eq!(dialog.message, "No attendance records found.");
}

#[test]
fn dropping_a_student_code_marks_attendance_once() {
    let (mut manager, qr_dir) = open_manager("qr-attendance-app-drop");
    register(&mut manager, "Alice", "a@x.com");
    register(&mut manager, "Bob", "b@x.com");

    let dropped = format!("{{{}}}", qr::code_path(&qr_dir, 2).display());

    let (_, first) = send(&mut manager, Form::default(), Event::Drop(dropped.clone()));
    assert_eq!(first.severity, Severity::Info);
    assert_eq!(first.message, "Attendance Marked!");

    let (_, second) = send(&mut manager, Form::default(), Event::Drop(dropped));
    assert_eq!(second.severity, Severity::Warning);
    assert_eq!(second.message, "Attendance already marked today!");

    assert_eq!(manager.student_attendance(2).expect("records").len(), 1);
    assert!(manager.student_attendance(1).expect("records").is_empty());

    let (_, view) = send(&mut manager, Form::default(), Event::View);
    assert!(view.message.starts_with("Name: Bob | Date: "));
}

#[test]
fn dropping_an_unreadable_file_reports_an_error() {
    let (mut manager, _qr_dir) = open_manager("qr-attendance-app-unreadable");
    let path = temp_dir("qr-attendance-not-an-image").join("notes.png");
    std::fs::write(&path, "definitely not a png").expect("write");

    let (_, dialog) = send(
        &mut manager,
        Form::default(),
        Event::Drop(path.display().to_string()),
    );

    assert_eq!(dialog.severity, Severity::Error);
    assert!(!dialog.message.is_empty());
    assert!(manager.attendance_report().expect("report").is_empty());
}

#[test]
fn dropping_an_image_without_a_code_reports_an_error() {
    let (mut manager, _qr_dir) = open_manager("qr-attendance-app-blank");
    let path = temp_dir("qr-attendance-blank").join("blank.png");
    RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]))
        .save(&path)
        .expect("save blank image");

    let (_, dialog) = send(
        &mut manager,
        Form::default(),
        Event::Drop(path.display().to_string()),
    );

    assert_eq!(dialog.severity, Severity::Error);
    assert_eq!(dialog.message, "No QR Code detected");
}

#[test]
fn dropping_a_foreign_code_reports_an_invalid_code() {
    let (mut manager, _qr_dir) = open_manager("qr-attendance-app-foreign");
    let path = temp_dir("qr-attendance-foreign").join("link.png");
    qrism::QRBuilder::new(b"https://example.com")
        .build()
        .expect("build code")
        .to_image(10)
        .save(&path)
        .expect("save code");

    let (_, dialog) = send(
        &mut manager,
        Form::default(),
        Event::Drop(path.display().to_string()),
    );

    assert_eq!(dialog.severity, Severity::Error);
    assert_eq!(dialog.message, "Invalid QR Code");
}
