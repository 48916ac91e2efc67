//! Record tokenizer for the registry dialect.
//!
//! The registries escape with a backslash both inside and outside quoted
//! fields (`Smith\, Jones`, `O\'Neill`). The `csv` reader honours its escape
//! byte only inside quotes, so the source side is tokenized here and the
//! canonical side is left to `csv`.
//!
//! Lenient like the registry tooling: a quote after a closing quote that is
//! not doubled is kept as data, blank lines are skipped, and end of input
//! inside a quoted field closes the field.

use csv::ByteRecord;

use super::dialect::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartRecord,
    StartField,
    InField,
    Escaped,
    InQuoted,
    EscapedInQuoted,
    QuoteInQuoted,
}

/// Splits a byte buffer into records, unescaping as it goes.
#[derive(Debug)]
pub(crate) struct EscapedTokenizer<'a> {
    input: &'a [u8],
    pos: usize,
    dialect: Dialect,
}

impl<'a> EscapedTokenizer<'a> {
    pub(crate) fn new(input: &'a [u8], dialect: Dialect) -> Self {
        Self {
            input,
            pos: 0,
            dialect,
        }
    }

    /// Read the next record into `record`. Returns `false` at end of input.
    pub(crate) fn read_record(&mut self, record: &mut ByteRecord) -> bool {
        record.clear();
        let mut field = Vec::new();
        let mut state = State::StartRecord;

        while let Some(&byte) = self.input.get(self.pos) {
            self.pos += 1;

            state = match state {
                State::StartRecord if is_terminator(byte) => State::StartRecord,
                State::StartField | State::InField if is_terminator(byte) => {
                    record.push_field(&field);
                    self.skip_lf_after_cr(byte);
                    return true;
                }
                State::StartRecord | State::StartField if byte == self.dialect.quote => State::InQuoted,
                State::StartRecord | State::StartField | State::InField if self.is_escape(byte) => {
                    State::Escaped
                }
                State::StartRecord | State::StartField | State::InField
                    if byte == self.dialect.delimiter =>
                {
                    record.push_field(&field);
                    field.clear();
                    State::StartField
                }
                State::StartRecord | State::StartField | State::InField | State::Escaped => {
                    field.push(byte);
                    State::InField
                }
                State::InQuoted if self.is_escape(byte) => State::EscapedInQuoted,
                State::InQuoted if byte == self.dialect.quote => State::QuoteInQuoted,
                State::InQuoted | State::EscapedInQuoted => {
                    field.push(byte);
                    State::InQuoted
                }
                State::QuoteInQuoted if byte == self.dialect.quote => {
                    field.push(byte);
                    State::InQuoted
                }
                State::QuoteInQuoted if byte == self.dialect.delimiter => {
                    record.push_field(&field);
                    field.clear();
                    State::StartField
                }
                State::QuoteInQuoted if is_terminator(byte) => {
                    record.push_field(&field);
                    self.skip_lf_after_cr(byte);
                    return true;
                }
                State::QuoteInQuoted => {
                    field.push(byte);
                    State::InField
                }
            };
        }

        match state {
            State::StartRecord => false,
            State::Escaped | State::EscapedInQuoted => {
                // Dangling escape at end of input is kept as data.
                if let Some(escape) = self.dialect.escape {
                    field.push(escape);
                }
                record.push_field(&field);
                true
            }
            _ => {
                record.push_field(&field);
                true
            }
        }
    }

    fn is_escape(&self, byte: u8) -> bool {
        self.dialect.escape == Some(byte)
    }

    fn skip_lf_after_cr(&mut self, byte: u8) {
        if byte == b'\r' && self.input.get(self.pos) == Some(&b'\n') {
            self.pos += 1;
        }
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}
