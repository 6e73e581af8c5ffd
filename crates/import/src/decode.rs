use std::io::{Cursor, Read};

use crate::error::ImportError;

/// Charset of a dataset family. Fixed per family by the publisher, never
/// auto-detected from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    /// The national 8-bit code page used by the historical exports.
    Windows1250,
}

impl Charset {
    pub fn label(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Windows1250 => "Windows-1250",
        }
    }
}

/// Decode raw file bytes in the family's declared charset. Strict: bytes
/// that do not belong to the charset are a dataset-level failure, not a
/// lossy replacement.
pub fn decode_text(bytes: &[u8], charset: Charset) -> Result<String, ImportError> {
    match charset {
        Charset::Utf8 => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string()),
            Err(e) => Err(ImportError::Decode {
                charset: charset.label(),
                detail: e.to_string(),
            }),
        },
        Charset::Windows1250 => {
            let (text, had_errors) =
                encoding_rs::WINDOWS_1250.decode_without_bom_handling(bytes);
            if had_errors {
                return Err(ImportError::Decode {
                    charset: charset.label(),
                    detail: "byte sequence outside the code page".to_string(),
                });
            }
            Ok(text.into_owned())
        }
    }
}

/// Pull one member CSV out of a ZIP container. Member names are matched
/// case-insensitively because the publisher has shipped both spellings.
pub fn unzip_member(bytes: &[u8], member: &str) -> Result<Vec<u8>, ImportError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ImportError::Zip(e.to_string()))?;

    let name = archive
        .file_names()
        .find(|n| n.eq_ignore_ascii_case(member))
        .map(str::to_string)
        .ok_or_else(|| ImportError::ZipMemberMissing {
            member: member.to_string(),
        })?;

    let mut file = archive
        .by_name(&name)
        .map_err(|e| ImportError::Zip(e.to_string()))?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| ImportError::Zip(e.to_string()))?;
    Ok(content)
}

/// One decoded CSV: the header line plus every data record.
#[derive(Debug, Clone)]
pub struct Table {
    pub header: csv::StringRecord,
    pub rows: Vec<csv::StringRecord>,
}

/// Split decoded text into header and data records. Semicolon-delimited,
/// flexible field counts (older revisions drop trailing columns).
pub fn parse_table(text: &str) -> Result<Table, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(Ok(record)) => record,
        Some(Err(e)) => return Err(ImportError::Csv(e.to_string())),
        None => return Err(ImportError::Csv("file has no header line".to_string())),
    };

    let mut rows = Vec::new();
    for record in records {
        rows.push(record.map_err(|e| ImportError::Csv(e.to_string()))?);
    }

    Ok(Table { header, rows })
}
