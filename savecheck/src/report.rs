//! Human-readable output, one line per event, each prefixed with the file's path.
//!
//! Quiet mode hides version and success lines; every problem is always printed.

use std::{
    fmt::Display,
    io::{self, Write},
    path::Path,
};

use savecheck_format::{
    chunk::MIB, ChunkCount, ChunkError, ChunkFailure, DecompressionPhase, SaveBody, SaveCheck,
    ValidationOutcome,
};

use crate::check::FileReport;

#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    pub quiet: bool,
    pub chunk_count: ChunkCount,
}

impl Reporter {
    pub fn report(&self, out: &mut impl Write, path: &Path, report: &FileReport) -> io::Result<()> {
        let file = path.display();
        match report {
            FileReport::NotFound(_) => writeln!(out, "{file}: Not found"),
            FileReport::Unreadable(error) => writeln!(out, "{file}: {error}"),
            FileReport::HeaderUnreadable(error) => writeln!(out, "{file}: {error}"),
            FileReport::Checked(check) => self.report_check(out, &file, check),
        }
    }

    fn report_check(
        &self,
        out: &mut impl Write,
        file: &impl Display,
        check: &SaveCheck,
    ) -> io::Result<()> {
        if !self.quiet {
            let version = check.header.version;
            let label = &check.version.label;
            if check.version.known {
                writeln!(out, "{file}: Save version {label} ({version})")?;
            } else {
                writeln!(out, "{file}: Unknown save version: {label} ({version})")?;
            }
        }

        match &check.body {
            SaveBody::NotCompressed => writeln!(out, "{file}: Not compressed"),
            SaveBody::Chunks(ValidationOutcome::Success(summary)) => {
                if !self.quiet {
                    writeln!(
                        out,
                        "{file}: No compression errors detected ({} chunks)",
                        summary.reported_count(self.chunk_count)
                    )?;
                }
                Ok(())
            }
            SaveBody::Chunks(ValidationOutcome::Failure(failure)) => {
                report_failure(out, file, failure)?;
                writeln!(
                    out,
                    "{file}: {} bytes unread, {} bytes read",
                    failure.bytes_remaining, failure.bytes_read
                )
            }
        }
    }
}

fn report_failure(
    out: &mut impl Write,
    file: &impl Display,
    failure: &ChunkFailure,
) -> io::Result<()> {
    let chunk = failure.chunk_index;
    let start = failure.start_offset;
    match &failure.error {
        ChunkError::TruncatedLengthPrefix { available } => writeln!(
            out,
            "{file}: chunk {chunk}: Truncated length prefix at offset {start}: got {available} of 4 bytes"
        ),
        ChunkError::ThresholdExceeded { declared_length } => writeln!(
            out,
            "{file}: chunk {chunk}: Memory threshold exceeded: tried to read {} MB",
            declared_length / MIB
        ),
        ChunkError::ShortRead {
            declared_length,
            actual,
        } => writeln!(
            out,
            "{file}: chunk {chunk} (start={start}): Expected {declared_length} bytes, got {actual}"
        ),
        ChunkError::Decompression {
            phase,
            declared_length,
            source,
        } => {
            let what = match phase {
                DecompressionPhase::StreamHeader => "Read failed",
                DecompressionPhase::Body => "Compression error",
            };
            writeln!(
                out,
                "{file}: chunk {chunk} (start={start}, length={declared_length}): {what}: {source}"
            )
        }
        ChunkError::Io(error) => writeln!(out, "{file}: chunk {chunk}: I/O error: {error}"),
    }
}

/// Running count of files checked, for the end-of-run log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tally {
    pub checked: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, report: &FileReport) {
        self.checked += 1;
        if report.is_failure() {
            self.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Cursor},
        path::Path,
    };

    use indoc::indoc;
    use savecheck_format::{
        testing::{zlib, SaveImage},
        ChunkCount, SaveVersions,
    };

    use crate::check::{check_stream, FileReport};

    use super::{Reporter, Tally};

    fn render(quiet: bool, chunk_count: ChunkCount, path: &str, report: &FileReport) -> String {
        let mut out = vec![];
        Reporter { quiet, chunk_count }
            .report(&mut out, Path::new(path), report)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn check(bytes: Vec<u8>) -> FileReport {
        check_stream(Cursor::new(bytes), &SaveVersions::builtin())
    }

    #[test]
    fn success() {
        let report = check(SaveImage::compressed().chunk(b"abc").chunk(b"def").into_bytes());
        assert_eq!(
            render(false, ChunkCount::Decoded, "region1.sav", &report),
            indoc! {"
                region1.sav: Save version 0.47.05 (1710)
                region1.sav: No compression errors detected (2 chunks)
            "}
        );
        assert_eq!(
            render(false, ChunkCount::Iterations, "region1.sav", &report),
            indoc! {"
                region1.sav: Save version 0.47.05 (1710)
                region1.sav: No compression errors detected (3 chunks)
            "}
        );
        assert_eq!(render(true, ChunkCount::Decoded, "region1.sav", &report), "");
    }

    #[test]
    fn decompression_failure_is_printed_even_when_quiet() {
        let report = check(SaveImage::new(500, 1).raw_chunk(&[0xff, 0xff]).into_bytes());
        assert_eq!(
            render(false, ChunkCount::Decoded, "a.sav", &report),
            indoc! {"
                a.sav: Unknown save version: unknown (500)
                a.sav: chunk 1 (start=8, length=2): Read failed: invalid zlib stream header ff ff: compression method is not deflate
                a.sav: 0 bytes unread, 14 bytes read
            "}
        );
        assert_eq!(
            render(true, ChunkCount::Decoded, "a.sav", &report),
            indoc! {"
                a.sav: chunk 1 (start=8, length=2): Read failed: invalid zlib stream header ff ff: compression method is not deflate
                a.sav: 0 bytes unread, 14 bytes read
            "}
        );
    }

    #[test]
    fn body_corruption() {
        let mut payload = zlib(&[7; 500]);
        payload[2] |= 0x06;
        let good = zlib(b"later");
        let report = check(
            SaveImage::compressed()
                .raw_chunk(&payload)
                .raw_chunk(&good)
                .into_bytes(),
        );
        let output = render(true, ChunkCount::Decoded, "b.sav", &report);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!(
            "b.sav: chunk 1 (start=8, length={}): Compression error: corrupt deflate data",
            payload.len()
        )));
        assert_eq!(
            lines[1],
            format!(
                "b.sav: {} bytes unread, {} bytes read",
                4 + good.len(),
                12 + payload.len()
            )
        );
    }

    #[test]
    fn threshold_and_short_read() {
        let bytes = SaveImage::compressed()
            .length_prefix(20 * 1024 * 1024)
            .bytes(&[0; 6])
            .into_bytes();
        assert_eq!(
            render(true, ChunkCount::Decoded, "c.sav", &check(bytes)),
            indoc! {"
                c.sav: chunk 1: Memory threshold exceeded: tried to read 20 MB
                c.sav: 6 bytes unread, 12 bytes read
            "}
        );

        let bytes = SaveImage::compressed()
            .length_prefix(100)
            .bytes(&[0; 30])
            .into_bytes();
        assert_eq!(
            render(true, ChunkCount::Decoded, "d.sav", &check(bytes)),
            indoc! {"
                d.sav: chunk 1 (start=8): Expected 100 bytes, got 30
                d.sav: 0 bytes unread, 42 bytes read
            "}
        );
    }

    #[test]
    fn truncated_prefix() {
        let image = SaveImage::compressed().chunk(b"x");
        let start = image.len();
        let bytes = image.bytes(&[1, 0]).into_bytes();
        assert_eq!(
            render(true, ChunkCount::Decoded, "e.sav", &check(bytes.clone())),
            format!(
                "e.sav: chunk 2: Truncated length prefix at offset {start}: got 2 of 4 bytes\n\
                 e.sav: 0 bytes unread, {} bytes read\n",
                bytes.len()
            )
        );
    }

    #[test]
    fn file_level_problems_ignore_quiet() {
        let not_found = FileReport::NotFound(io::ErrorKind::NotFound.into());
        assert_eq!(
            render(true, ChunkCount::Decoded, "gone.sav", &not_found),
            "gone.sav: Not found\n"
        );

        let short = check(vec![0xf4, 0x01]);
        assert_eq!(
            render(true, ChunkCount::Decoded, "tiny.sav", &short),
            "tiny.sav: cannot read save header (2 of 8 bytes available)\n"
        );

        let plain = check(SaveImage::new(500, 0).into_bytes());
        assert_eq!(
            render(true, ChunkCount::Decoded, "plain.sav", &plain),
            "plain.sav: Not compressed\n"
        );
        assert_eq!(
            render(false, ChunkCount::Decoded, "plain.sav", &plain),
            indoc! {"
                plain.sav: Unknown save version: unknown (500)
                plain.sav: Not compressed
            "}
        );
    }

    #[test]
    fn tally_counts_failures() {
        let mut tally = Tally::default();
        tally.record(&check(SaveImage::new(500, 0).into_bytes()));
        tally.record(&check(SaveImage::new(500, 1).raw_chunk(&[0xff, 0xff]).into_bytes()));
        tally.record(&FileReport::NotFound(io::ErrorKind::NotFound.into()));
        tally.record(&check(SaveImage::compressed().chunk(b"ok").into_bytes()));
        assert_eq!(tally.checked, 4);
        assert_eq!(tally.failed, 2);
    }
}
