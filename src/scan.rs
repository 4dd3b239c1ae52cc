/// Offset of the first `\n` at or after `offset`, or `buf.len()` if there is none.
#[inline]
pub fn find_newline(buf: &[u8], offset: usize) -> usize {
    match buf.get(offset..) {
        Some(rest) => rest
            .iter()
            .position(|b| *b == b'\n')
            .map_or(buf.len(), |pos| offset + pos),
        None => buf.len(),
    }
}

/// Iterator over the records of a buffer, without their `\n` terminators.
/// A final record with no terminator is still yielded.
pub struct Lines<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Lines<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Offset of the next record to be yielded, relative to the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.buf.len() {
            return None;
        }
        let end = find_newline(self.buf, self.offset);
        let line = &self.buf[self.offset..end];
        self.offset = end + 1;
        Some(line)
    }
}

#[cfg(test)]
mod test {
    use super::{find_newline, Lines};

    #[test]
    fn find_newline_cases() {
        for (input, offset, expected) in [
            ("", 0, 0),
            ("abc", 0, 3),
            ("a\nb", 0, 1),
            ("a\nb", 1, 1),
            ("a\nb", 2, 3),
            ("a\nb\n", 2, 3),
            ("a\n", 5, 2),
        ] {
            assert_eq!(
                find_newline(input.as_bytes(), offset),
                expected,
                "input: `{input:?}`, offset {offset}"
            );
        }
    }

    #[test]
    fn lines_yield_records() {
        for (input, expected) in [
            ("", vec![]),
            ("Z;7.5", vec!["Z;7.5"]),
            ("A;1.0\nB;2.0\n", vec!["A;1.0", "B;2.0"]),
            ("A;1.0\nB;2.0", vec!["A;1.0", "B;2.0"]),
            ("A;1.0\n\nB;2.0\n", vec!["A;1.0", "", "B;2.0"]),
            ("\n", vec![""]),
        ] {
            let lines: Vec<&[u8]> = Lines::new(input.as_bytes()).collect();
            let expected: Vec<&[u8]> = expected.iter().map(|s| s.as_bytes()).collect();
            assert_eq!(lines, expected, "input: `{input:?}`");
        }
    }

    #[test]
    fn offset_tracks_line_starts() {
        let mut lines = Lines::new(b"ab;1\nc;2\n");
        assert_eq!(lines.offset(), 0);
        lines.next();
        assert_eq!(lines.offset(), 5);
        lines.next();
        assert_eq!(lines.offset(), 9);
        assert_eq!(lines.next(), None);
    }
}
