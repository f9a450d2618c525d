//! Generating a student's QR code image and reading a student ID back out of a dropped image.
//!
//! Every code carries the payload `ID:<student id>` and lives at `<qr dir>/student_<id>.png`.

use qrism::QRBuilder;
use qrism::reader::detect_qr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::AttendanceError;

/// The prefix every student payload starts with.
pub const PAYLOAD_PREFIX: &str = "ID:";

/// Why a dropped image did not yield a student ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The file could not be opened or decoded as an image.
    ImageUnreadable(String),
    /// The image contains no QR code that could be decoded.
    NoCodeFound,
    /// A QR code was found, but its payload is not a student payload.
    MalformedPayload(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::ImageUnreadable(reason) => write!(f, "{}", reason),
            ScanError::NoCodeFound => write!(f, "No QR Code detected"),
            ScanError::MalformedPayload(_) => write!(f, "Invalid QR Code"),
        }
    }
}

impl std::error::Error for ScanError {}

/// The text encoded into the QR code of the given student.
pub fn payload_for(student_id: i32) -> String {
    format!("{PAYLOAD_PREFIX}{student_id}")
}

/// Where the QR code of the given student is stored.
pub fn code_path(qr_dir: &Path, student_id: i32) -> PathBuf {
    qr_dir.join(format!("student_{student_id}.png"))
}

/// Generates the student's QR code and saves it as a PNG, creating `qr_dir` if needed.
///
/// Returns the path of the written file.
pub fn write_student_code(qr_dir: &Path, student_id: i32) -> Result<PathBuf, AttendanceError> {
    fs::create_dir_all(qr_dir)?;

    let payload = payload_for(student_id);
    let qr = QRBuilder::new(payload.as_bytes())
        .build()
        .map_err(|err| AttendanceError::QrEncode(err.to_string()))?;

    let path = code_path(qr_dir, student_id);
    // 10 pixels per module.
    qr.to_image(10)
        .save(&path)
        .map_err(|err| AttendanceError::QrEncode(err.to_string()))?;

    Ok(path)
}

/// Removes the student's QR code file. Returns `false` if there was no file to remove.
pub fn remove_student_code(qr_dir: &Path, student_id: i32) -> io::Result<bool> {
    match fs::remove_file(code_path(qr_dir, student_id)) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Strips the whitespace and wrapping braces that drag-and-drop sources put around paths
/// containing spaces.
pub fn clean_drop_path(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '{' || c == '}')
}

/// Extracts the student ID from a payload of the form `ID:<id>`.
///
/// Anything after a second `:` is ignored.
pub fn parse_payload(payload: &str) -> Result<i32, ScanError> {
    let malformed = || ScanError::MalformedPayload(payload.to_string());

    let rest = payload.strip_prefix(PAYLOAD_PREFIX).ok_or_else(malformed)?;
    let id_text = rest.split(':').next().unwrap_or_default().trim();

    id_text.parse::<i32>().map_err(|_| malformed())
}

/// Decodes the first readable QR code in the image at `path` and returns the student ID it
/// carries.
pub fn scan_student_id(path: &Path) -> Result<i32, ScanError> {
    let img = image::open(path).map_err(|err| ScanError::ImageUnreadable(err.to_string()))?;

    let mut result = detect_qr(&img);
    let symbols = result.symbols();
    log::debug!("found {} QR symbol(s) in {}", symbols.len(), path.display());

    let payload = symbols
        .iter_mut()
        .find_map(|symbol| symbol.decode().ok())
        .map(|(_, message)| message.to_string())
        .ok_or(ScanError::NoCodeFound)?;

    parse_payload(&payload)
}
