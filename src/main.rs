use clap::Parser;
use qr_attendance::app::{self, Dialog, Event, Form, Severity};
use qr_attendance::cli::{self, Cli, Command, ShellCommand};
use qr_attendance::manager::{AttendanceManager, MarkOutcome};
use qr_attendance::{AttendanceError, display};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> Result<ExitCode, AttendanceError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut manager = qr_attendance::create_default_manager()?;

    let dialog = match cli.command {
        Command::Register { name, email } => {
            let form = Form {
                name,
                email,
                ..Form::default()
            };
            app::handle(&mut manager, form, Event::Register)?.dialog
        }
        Command::Delete { id } => {
            let form = Form {
                delete_id: id,
                ..Form::default()
            };
            app::handle(&mut manager, form, Event::Delete)?.dialog
        }
        Command::Scan { path } => app::handle(&mut manager, Form::default(), Event::Drop(path))?.dialog,
        Command::Mark { id } => Some(mark(&mut manager, &id)?),
        Command::View { table: true } => {
            println!("{}", display::report_table(&manager.attendance_report()?));
            None
        }
        Command::View { table: false } => {
            app::handle(&mut manager, Form::default(), Event::View)?.dialog
        }
        Command::Roster => {
            println!("Roster:\n{}", display::roster_table(&manager.roster()?));
            None
        }
        Command::Export { path } => {
            let rows = manager.attendance_report()?;
            let file = File::create(&path)?;
            display::write_report_csv(&rows, file).map_err(io::Error::from)?;
            Some(Dialog::info(
                "Success",
                format!("Exported {} record(s) to {}", rows.len(), path.display()),
            ))
        }
        Command::Shell => {
            run_shell(&mut manager)?;
            None
        }
    };

    Ok(match dialog {
        Some(dialog) => {
            show(&dialog);
            if dialog.severity == Severity::Error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        None => ExitCode::SUCCESS,
    })
}

/// Marks a student present by typed ID, without going through a QR code.
fn mark(manager: &mut AttendanceManager, id: &str) -> Result<Dialog, AttendanceError> {
    let student_id = match app::parse_student_id(id) {
        Ok(student_id) => student_id,
        Err(err) => return Ok(Dialog::error(err.to_string())),
    };

    Ok(match manager.mark_attendance(student_id)? {
        MarkOutcome::Marked(record) => Dialog::info(
            "Success",
            format!("Attendance Marked! ({} {})", record.date, record.time),
        ),
        MarkOutcome::AlreadyMarked { .. } => Dialog::warning("Attendance already marked today!"),
    })
}

/// Runs the interactive form until `quit` or end of input.
fn run_shell(manager: &mut AttendanceManager) -> Result<(), AttendanceError> {
    let stdin = io::stdin();
    let mut form = Form::default();

    println!("QR Attendance System. Type 'help' for commands.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match cli::parse_shell_line(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Event(event))) => {
                let reaction = app::handle(manager, form, event)?;
                form = reaction.form;
                if let Some(dialog) = reaction.dialog {
                    show(&dialog);
                }
            }
            Ok(Some(ShellCommand::ShowForm)) => println!("{form:#?}"),
            Ok(Some(ShellCommand::Help)) => println!("{}", cli::SHELL_HELP),
            Ok(Some(ShellCommand::Quit)) => break,
            Err(message) => eprintln!("{message}"),
        }
    }

    Ok(())
}

fn show(dialog: &Dialog) {
    match dialog.severity {
        Severity::Info => println!("[{}] {}", dialog.title, dialog.message),
        Severity::Warning | Severity::Error => {
            eprintln!("[{}] {}", dialog.title, dialog.message)
        }
    }
}
