//! Record decoder for BITFIELD write logs
//!
//! Each tile write is recorded in the append-only log as a
//! `BITFIELD <key> SET u4 #<offset> <color>` command, one argument per
//! line with a bulk-length header before each:
//!
//! ```text
//! SET      <- begin marker
//! $2       bulk length
//! u4       type tag
//! $4       bulk length
//! #101     position (one-character prefix + offset)
//! $2       bulk length
//! 15       color
//! ```
//!
//! Everything before a begin marker is scan noise. A record that cannot be
//! decoded is reported as [`Decoded::Skipped`] and scanning continues with
//! the next marker.

use crate::command::RawCommand;
use crate::error::{Error, Field, Result, SkipReason};
use crate::frame::FrameReader;
use std::io::BufRead;
use tracing::trace;

/// Line that opens a write record
pub const BEGIN_MARKER: &str = "SET";

/// Outcome of decoding one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Both payload fields parsed
    Command(RawCommand),
    /// The record was dropped
    Skipped(SkipReason),
}

/// Classification of a single log line
#[derive(Debug, PartialEq, Eq)]
enum Tag<'a> {
    Marker,
    BulkLength,
    Text(&'a str),
}

impl<'a> Tag<'a> {
    fn of(line: &'a str) -> Self {
        if line == BEGIN_MARKER {
            return Self::Marker;
        }
        match line.strip_prefix('$') {
            Some(len) if !len.is_empty() && len.bytes().all(|b| b.is_ascii_digit()) => {
                Self::BulkLength
            }
            _ => Self::Text(line),
        }
    }
}

/// Per-record failure inside the decoder
enum Fault {
    Skip(SkipReason),
    Source(Error),
}

impl From<SkipReason> for Fault {
    fn from(reason: SkipReason) -> Self {
        Self::Skip(reason)
    }
}

impl From<Error> for Fault {
    fn from(err: Error) -> Self {
        Self::Source(err)
    }
}

type Step<T> = std::result::Result<T, Fault>;

/// Stateful decoder that turns framed records into [`RawCommand`]s
#[derive(Debug, Default)]
pub struct RecordDecoder {
    resume_at_marker: bool,
    records_seen: u64,
}

impl RecordDecoder {
    /// Create a decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next record, or return `None` once input is exhausted.
    ///
    /// A malformed record never ends the scan; only a failure of the
    /// source itself is returned as an error.
    pub fn decode_next<R: BufRead>(
        &mut self,
        reader: &mut FrameReader<R>,
    ) -> Result<Option<Decoded>> {
        if !self.find_marker(reader)? {
            return Ok(None);
        }
        self.records_seen += 1;

        match self.decode_body(reader) {
            Ok(raw) => Ok(Some(Decoded::Command(raw))),
            Err(Fault::Skip(reason)) => Ok(Some(Decoded::Skipped(reason))),
            Err(Fault::Source(err)) => Err(err),
        }
    }

    /// Number of begin markers consumed so far
    #[must_use]
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    fn find_marker<R: BufRead>(&mut self, reader: &mut FrameReader<R>) -> Result<bool> {
        if std::mem::take(&mut self.resume_at_marker) {
            return Ok(true);
        }
        while let Some(line) = reader.next_line()? {
            if Tag::of(&line) == Tag::Marker {
                return Ok(true);
            }
            trace!(line = %line, "scan noise");
        }
        Ok(false)
    }

    fn decode_body<R: BufRead>(&mut self, reader: &mut FrameReader<R>) -> Step<RawCommand> {
        self.bulk_length(reader)?;
        let type_tag = self.line(reader, "type tag")?;
        if type_tag.is_empty() {
            return Err(SkipReason::UnexpectedFraming {
                expected: "type tag",
                line: type_tag,
            }
            .into());
        }
        self.bulk_length(reader)?;

        let position_line = self.line(reader, "position")?;
        let mut token = position_line.chars();
        token.next();
        let position = parse_field(token.as_str(), Field::Position)?;

        self.bulk_length(reader)?;
        let color_line = self.line(reader, "color")?;
        let color = parse_field(&color_line, Field::Color)?;

        Ok(RawCommand::new(position, color))
    }

    fn bulk_length<R: BufRead>(&mut self, reader: &mut FrameReader<R>) -> Step<()> {
        let line = self.line(reader, "bulk length")?;
        match Tag::of(&line) {
            Tag::BulkLength => Ok(()),
            _ => Err(SkipReason::UnexpectedFraming {
                expected: "bulk length",
                line,
            }
            .into()),
        }
    }

    /// Next body line. A begin marker here means the current record was cut
    /// short; the marker is kept so the next call starts from it.
    fn line<R: BufRead>(
        &mut self,
        reader: &mut FrameReader<R>,
        expected: &'static str,
    ) -> Step<String> {
        match reader.next_line()? {
            None => Err(SkipReason::Truncated { expected }.into()),
            Some(line) if Tag::of(&line) == Tag::Marker => {
                self.resume_at_marker = true;
                Err(SkipReason::Interrupted.into())
            }
            Some(line) => Ok(line),
        }
    }
}

fn parse_field(token: &str, field: Field) -> Step<i64> {
    token.parse::<i64>().map_err(|_| {
        SkipReason::MalformedInteger {
            field,
            token: token.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::aof_record as record;

    fn decode_all(log: &str) -> Vec<Decoded> {
        let mut reader = FrameReader::new(log.as_bytes());
        let mut decoder = RecordDecoder::new();
        let mut out = Vec::new();
        while let Some(decoded) = decoder.decode_next(&mut reader).unwrap() {
            out.push(decoded);
        }
        out
    }

    #[test]
    fn test_single_record() {
        let out = decode_all(&record("#101", "15"));
        assert_eq!(out, vec![Decoded::Command(RawCommand::new(101, 15))]);
    }

    #[test]
    fn test_empty_log() {
        assert!(decode_all("").is_empty());
        assert!(decode_all("*2\r\n$6\r\nSELECT\r\n$1\r\n0\r\n").is_empty());
    }

    #[test]
    fn test_truncated_record_between_good_ones() {
        let truncated = "*6\r\n$8\r\nBITFIELD\r\n$5\r\nboard\r\n$3\r\nSET\r\n$2\r\nu4\r\n$2\r\n#7\r\n$1\r\n";
        let log = format!(
            "{}{}{}",
            record("#0", "0"),
            truncated,
            record("#5", "3")
        );
        let out = decode_all(&log);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0], Decoded::Command(RawCommand::new(0, 0)));
        assert!(matches!(out[1], Decoded::Skipped(_)));
        assert_eq!(out[2], Decoded::Command(RawCommand::new(5, 3)));
    }

    #[test]
    fn test_non_integer_position_is_skipped() {
        let log = format!("{}{}", record("#abc", "2"), record("#42", "2"));
        let out = decode_all(&log);

        assert_eq!(
            out[0],
            Decoded::Skipped(SkipReason::MalformedInteger {
                field: Field::Position,
                token: "abc".to_string(),
            })
        );
        assert_eq!(out[1], Decoded::Command(RawCommand::new(42, 2)));
    }

    #[test]
    fn test_non_integer_color_is_skipped() {
        let out = decode_all(&record("#1", "red"));
        assert_eq!(
            out,
            vec![Decoded::Skipped(SkipReason::MalformedInteger {
                field: Field::Color,
                token: "red".to_string(),
            })]
        );
    }

    #[test]
    fn test_truncated_at_end_of_input() {
        let out = decode_all("SET\r\n$2\r\nu4\r\n");
        assert_eq!(
            out,
            vec![Decoded::Skipped(SkipReason::Truncated {
                expected: "bulk length"
            })]
        );
    }

    #[test]
    fn test_final_line_without_terminator() {
        let out = decode_all("SET\r\n$2\r\nu4\r\n$2\r\n#9\r\n$1\r\n4");
        assert_eq!(out, vec![Decoded::Command(RawCommand::new(9, 4))]);
    }

    #[test]
    fn test_bad_framing_is_skipped() {
        let out = decode_all("SET\r\nu4\r\n$2\r\n#9\r\n$1\r\n4\r\n");
        assert_eq!(
            out,
            vec![Decoded::Skipped(SkipReason::UnexpectedFraming {
                expected: "bulk length",
                line: "u4".to_string(),
            })]
        );
    }

    #[test]
    fn test_interrupted_record_keeps_next_marker() {
        let log = "SET\r\n$2\r\nSET\r\n$2\r\nu4\r\n$2\r\n#3\r\n$1\r\n1\r\n";
        let out = decode_all(log);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Decoded::Skipped(SkipReason::Interrupted));
        assert_eq!(out[1], Decoded::Command(RawCommand::new(3, 1)));
    }

    #[test]
    fn test_out_of_range_values_still_decode() {
        let out = decode_all(&record("#-1", "99"));
        assert_eq!(out, vec![Decoded::Command(RawCommand::new(-1, 99))]);
    }

    #[test]
    fn test_newline_only_log() {
        let log = record("#8", "8").replace("\r\n", "\n");
        assert_eq!(decode_all(&log), vec![Decoded::Command(RawCommand::new(8, 8))]);
    }

    #[test]
    fn test_records_seen() {
        let log = format!("{}{}", record("#1", "1"), record("#x", "1"));
        let mut reader = FrameReader::new(log.as_bytes());
        let mut decoder = RecordDecoder::new();
        while decoder.decode_next(&mut reader).unwrap().is_some() {}
        assert_eq!(decoder.records_seen(), 2);
    }

    #[test]
    fn test_tag_classification() {
        assert_eq!(Tag::of("SET"), Tag::Marker);
        assert_eq!(Tag::of("set"), Tag::Text("set"));
        assert_eq!(Tag::of("$12"), Tag::BulkLength);
        assert_eq!(Tag::of("$"), Tag::Text("$"));
        assert_eq!(Tag::of("$1a"), Tag::Text("$1a"));
    }
}
