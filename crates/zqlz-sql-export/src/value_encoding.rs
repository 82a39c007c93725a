//! SQL literal encoding for dumped row values
//!
//! The column metadata of the result set decides the literal form, checked in
//! this order: NULL, plain number, hex blob, bit string, hex for binary data
//! that is not UTF-8, quoted string.

use zqlz_core::{ColumnMeta, Value};

/// Encode one value as an SQL literal.
///
/// `escape` is the connection's string escaping rule; control characters are
/// escaped on top of it.
pub fn encode_value<F>(value: &Value, column: &ColumnMeta, hex_for_blob: bool, escape: F) -> String
where
    F: Fn(&str) -> String,
{
    if value.is_null() {
        return "NULL".to_string();
    }

    // TIMESTAMP is flagged numeric by some servers and BLOBs sometimes are too
    if column.is_numeric && !column.is_timestamp() && !column.is_blob {
        return value.to_sql_text().into_owned();
    }

    // TEXT columns report BLOB as well; only true blobs carry BINARY
    if column.is_binary && column.is_blob && hex_for_blob {
        let bytes = value.to_bytes();
        if bytes.is_empty() {
            return "''".to_string();
        }
        return format!("0x{}", hex::encode(bytes.as_ref()));
    }

    if column.is_bit() {
        return format!("b'{}'", printable_bit_value(value, column.max_length));
    }

    // BINARY/VARBINARY data, or blobs without hex_for_blob, that is not text
    if let Some(bytes) = value.non_utf8_bytes() {
        return format!("0x{}", hex::encode(bytes));
    }

    format!("'{}'", escape_control_chars(&escape(&value.to_sql_text())))
}

/// Binary digits of a BIT value, left-padded to the column width
pub fn printable_bit_value(value: &Value, width: Option<i64>) -> String {
    let bits = match value {
        Value::Bool(v) => format!("{:b}", u64::from(*v)),
        Value::UInt64(v) => format!("{:b}", v),
        Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
            format!("{:b}", value.as_i64().unwrap_or_default() as u64)
        }
        other => other
            .to_bytes()
            .iter()
            .map(|byte| format!("{:08b}", byte))
            .collect(),
    };

    let Some(width) = width.and_then(|w| usize::try_from(w).ok()).filter(|w| *w > 0) else {
        return bits;
    };

    if bits.len() >= width {
        bits[bits.len() - width..].to_string()
    } else {
        format!("{}{}", "0".repeat(width - bits.len()), bits)
    }
}

/// Escape NUL, LF, CR and Ctrl-Z as `\0`, `\n`, `\r` and `\Z`
pub fn escape_control_chars(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\0' => escaped.push_str("\\0"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\x1a' => escaped.push_str("\\Z"),
            other => escaped.push(other),
        }
    }
    escaped
}
