use std::fs::File;
use std::io::{BufRead, BufReader, Stdin};
use std::path::Path;

use crate::{MatchOptions, Matcher, Reporting, Result};

/// A line-oriented scanner over a buffered reader.
///
/// The scanner reads one line at a time, strips the trailing newline, hands the line
/// to a [`Matcher`] and advances a line counter. The matcher keeps the staged matches
/// and the line itself (via [`Matcher::last_string`]), so the scanner stays a thin
/// driving loop.
#[derive(Debug)]
pub struct LineScanner<R> {
    reader: R,
    line: usize,
}

impl LineScanner<BufReader<File>> {
    /// Create a line scanner over the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(LineScanner::new(BufReader::new(File::open(path)?)))
    }
}

impl LineScanner<BufReader<Stdin>> {
    /// Create a line scanner over the standard input.
    pub fn from_stdin() -> Self {
        LineScanner::new(BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead> LineScanner<R> {
    /// Create a line scanner over a buffered reader.
    pub fn new(reader: R) -> Self {
        LineScanner { reader, line: 0 }
    }

    /// The 1-based number of the most recently read line, 0 before the first read.
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Read and scan the next line.
    ///
    /// Returns the number of matches staged in the matcher, or `None` at the end of
    /// the input.
    pub fn scan_line(
        &mut self,
        matcher: &mut Matcher,
        options: MatchOptions,
    ) -> Result<Option<usize>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        if buf.ends_with('\n') {
            buf.pop();
        }
        Ok(Some(matcher.match_string(&buf, options)?))
    }

    /// Advance to the next line with at least one match.
    ///
    /// Returns the match count of that line, or `None` when the input is exhausted
    /// first. The matching line itself is available via [`Matcher::last_string`].
    pub fn next_matching_line(
        &mut self,
        matcher: &mut Matcher,
        options: MatchOptions,
    ) -> Result<Option<usize>> {
        while let Some(hits) = self.scan_line(matcher, options)? {
            if hits > 0 {
                return Ok(Some(hits));
            }
        }
        Ok(None)
    }

    /// Advance to the next line without any match.
    ///
    /// Returns `true` when such a line was found, `false` when the input is exhausted
    /// first.
    pub fn next_non_matching_line(
        &mut self,
        matcher: &mut Matcher,
        options: MatchOptions,
    ) -> Result<bool> {
        while let Some(hits) = self.scan_line(matcher, options)? {
            if hits == 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Scan the remaining input and count the lines with at least one match.
    ///
    /// Per-line reporting is forced to [`Reporting::First`], which is all a line count
    /// needs.
    pub fn count_lines(&mut self, matcher: &mut Matcher, options: MatchOptions) -> Result<usize> {
        let options = options.with_reporting(Reporting::First);
        let mut count = 0;
        while let Some(hits) = self.scan_line(matcher, options)? {
            if hits > 0 {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Scan the remaining input and count all matching positions.
    ///
    /// Per-line reporting is forced to [`Reporting::All`].
    pub fn count_matches(&mut self, matcher: &mut Matcher, options: MatchOptions) -> Result<usize> {
        let options = options.with_reporting(Reporting::All);
        let mut count = 0;
        while let Some(hits) = self.scan_line(matcher, options)? {
            count += hits;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LINES: &str = "TTACGTTT\nGGGGGGGG\nACGTACGT\n";

    #[test]
    fn test_count_lines() {
        let mut matcher = Matcher::new("ACGT", 0).unwrap();
        let mut scanner = LineScanner::new(Cursor::new(LINES));
        let count = scanner
            .count_lines(&mut matcher, MatchOptions::new())
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(scanner.line_number(), 3);
    }

    #[test]
    fn test_count_matches() {
        let mut matcher = Matcher::new("ACGT", 0).unwrap();
        let mut scanner = LineScanner::new(Cursor::new(LINES));
        let count = scanner
            .count_matches(&mut matcher, MatchOptions::new())
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_next_matching_line() {
        let mut matcher = Matcher::new("ACGT", 0).unwrap();
        let mut scanner = LineScanner::new(Cursor::new(LINES));
        assert!(scanner
            .next_matching_line(&mut matcher, MatchOptions::new())
            .unwrap()
            .is_some());
        assert_eq!(scanner.line_number(), 1);
        assert_eq!(matcher.last_string(), "TTACGTTT");
        assert!(scanner
            .next_matching_line(&mut matcher, MatchOptions::new())
            .unwrap()
            .is_some());
        assert_eq!(scanner.line_number(), 3);
        assert!(scanner
            .next_matching_line(&mut matcher, MatchOptions::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_next_non_matching_line() {
        let mut matcher = Matcher::new("ACGT", 0).unwrap();
        let mut scanner = LineScanner::new(Cursor::new(LINES));
        assert!(scanner
            .next_non_matching_line(&mut matcher, MatchOptions::new())
            .unwrap());
        assert_eq!(scanner.line_number(), 2);
        assert_eq!(matcher.last_string(), "GGGGGGGG");
        assert!(!scanner
            .next_non_matching_line(&mut matcher, MatchOptions::new())
            .unwrap());
    }
}
