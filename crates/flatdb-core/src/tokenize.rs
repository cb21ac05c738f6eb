//! Character-level tokenizer for delimited source text.
//!
//! Input is treated as a single-byte-per-character encoding: each byte is
//! widened to a `char` without multi-byte decoding, so Latin-1 sources pass
//! through unchanged. The machine is eager; the store consumes the full row
//! list before returning.

use derive_more::{Deref, DerefMut, IntoIterator};

///
/// Row
///
/// One tokenized logical line as an ordered list of optional fields.
/// `None` marks a field whose accumulated text was blank.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Eq, IntoIterator, PartialEq)]
pub struct Row(#[into_iterator(owned, ref)] Vec<Option<String>>);

impl Row {
    #[must_use]
    pub fn new(fields: Vec<Option<String>>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn into_fields(self) -> Vec<Option<String>> {
        self.0
    }
}

///
/// ParseState
///
/// Quoting state of the tokenizer. `EscapePending` is entered on a
/// backslash inside a quoted field; `QuoteClosed` is entered on a quote
/// inside a quoted field and decides between a doubled-quote escape and a
/// real closing quote.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ParseState {
    OutsideQuote,
    InsideQuote,
    EscapePending,
    QuoteClosed,
}

/// Tokenize raw source bytes into rows.
///
/// A trailing `\n` is synthesized when missing so the final row is always
/// terminated. `\r` is discarded in every state. Rows whose fields are all
/// blank are dropped entirely; this is how blank interior and trailing
/// lines are skipped.
#[must_use]
pub fn tokenize(raw: &[u8]) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut fields: Vec<Option<String>> = Vec::new();
    let mut buffer = String::new();
    let mut state = ParseState::OutsideQuote;

    let terminated = raw.last() == Some(&b'\n');
    let chars = raw.iter().map(|&b| char::from(b));

    for c in chars.chain((!terminated).then_some('\n')) {
        match state {
            ParseState::OutsideQuote => match c {
                '"' => state = ParseState::InsideQuote,
                ',' => flush_field(&mut fields, &mut buffer),
                '\n' => {
                    flush_field(&mut fields, &mut buffer);
                    flush_row(&mut rows, &mut fields);
                }
                '\r' => {}
                _ => buffer.push(c),
            },

            ParseState::InsideQuote => match c {
                '"' => state = ParseState::QuoteClosed,
                '\\' => state = ParseState::EscapePending,
                '\r' => {}
                _ => buffer.push(c),
            },

            ParseState::EscapePending => match c {
                '"' => {
                    buffer.push('"');
                    state = ParseState::InsideQuote;
                }
                '\r' => {}
                _ => {
                    buffer.push('\\');
                    buffer.push(c);
                    state = ParseState::InsideQuote;
                }
            },

            ParseState::QuoteClosed => match c {
                ',' => {
                    flush_field(&mut fields, &mut buffer);
                    state = ParseState::OutsideQuote;
                }
                '\n' => {
                    flush_field(&mut fields, &mut buffer);
                    flush_row(&mut rows, &mut fields);
                    state = ParseState::OutsideQuote;
                }
                '\r' => {}
                '"' => {
                    // doubled-quote escape
                    buffer.push('"');
                    state = ParseState::InsideQuote;
                }
                _ => {
                    // stray text after a closing quote re-opens the field
                    buffer.push('"');
                    buffer.push(c);
                    state = ParseState::InsideQuote;
                }
            },
        }
    }

    rows
}

/// Push the accumulated field buffer, blank text becoming `None`.
fn flush_field(fields: &mut Vec<Option<String>>, buffer: &mut String) {
    if buffer.trim().is_empty() {
        fields.push(None);
    } else {
        fields.push(Some(buffer.clone()));
    }
    buffer.clear();
}

/// Push the accumulated field list as one row, discarding all-blank rows.
fn flush_row(rows: &mut Vec<Row>, fields: &mut Vec<Option<String>>) {
    if fields.iter().any(Option::is_some) {
        rows.push(Row(std::mem::take(fields)));
    } else {
        fields.clear();
    }
}
