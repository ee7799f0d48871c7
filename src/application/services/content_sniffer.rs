pub const PDF_MIME: &str = "application/pdf";

/// Bytes callers should read from the start of a file before sniffing.
pub const SNIFF_LEN: usize = 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
const LINE_BREAKS: [&[u8]; 3] = [b"\r\n", b"\n", b"\r"];
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE2_MAGIC: &[u8] = b"\xd0\xcf\x11\xe0\xa1\xb1\x1a\xe1";

/// Detects a MIME type from leading file bytes rather than the file name.
///
/// `%PDF-` must open the file, optionally after a UTF-8 BOM or one line break.
pub fn sniff_mime_type(header: &[u8]) -> &'static str {
    let header = &header[..header.len().min(SNIFF_LEN)];

    if header.is_empty() {
        return "application/x-empty";
    }
    if has_pdf_header(header) {
        return PDF_MIME;
    }
    if header.starts_with(PNG_MAGIC) {
        return "image/png";
    }
    if header.starts_with(JPEG_MAGIC) {
        return "image/jpeg";
    }
    if header.starts_with(GIF87_MAGIC) || header.starts_with(GIF89_MAGIC) {
        return "image/gif";
    }
    if header.starts_with(ZIP_MAGIC) {
        return "application/zip";
    }
    if header.starts_with(OLE2_MAGIC) {
        return "application/x-ole-storage";
    }
    if looks_like_text(header) {
        return "text/plain";
    }
    "application/octet-stream"
}

fn has_pdf_header(header: &[u8]) -> bool {
    let body = header.strip_prefix(UTF8_BOM).unwrap_or(header);
    let body = LINE_BREAKS
        .iter()
        .find_map(|newline| body.strip_prefix(*newline))
        .unwrap_or(body);
    body.starts_with(PDF_MAGIC)
}

fn looks_like_text(header: &[u8]) -> bool {
    let valid = match std::str::from_utf8(header) {
        Ok(s) => s,
        // A multi-byte character cut off by the read window is still text.
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&header[..e.valid_up_to()]) {
            Ok(s) => s,
            Err(_) => return false,
        },
        Err(_) => return false,
    };

    valid
        .chars()
        .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t' | '\x0c'))
}
