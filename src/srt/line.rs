use std::fmt;

use super::ARROW;

/// Default max line width when wrapping dialogue.
pub const DEFAULT_LINE_WIDTH: usize = 35;

/// One caption in an SRT file: number, time range and dialogue lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SrtLine {
    /// 0 when the number could not be parsed
    pub num: u32,
    /// `start --> end`
    pub time_range: String,
    pub dialogue: Vec<String>,
}

impl SrtLine {
    /// Builds a caption, wrapping `text` at `width` columns.
    pub fn new(num: u32, time_range: impl Into<String>, text: &str, width: usize) -> Self {
        Self {
            num,
            time_range: time_range.into(),
            dialogue: wrap(text, width),
        }
    }

    /// Parses a single caption block.
    pub fn parse(block: &str) -> Self {
        let mut lines = block.trim().split('\n');
        let num = lines
            .next()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or_default();
        let time_range = lines.next().unwrap_or_default().to_string();
        let dialogue = lines.map(str::to_string).collect();

        Self {
            num,
            time_range,
            dialogue,
        }
    }

    pub fn start_ts(&self) -> &str {
        self.time_range.split(ARROW).next().unwrap_or_default().trim()
    }

    pub fn end_ts(&self) -> &str {
        self.time_range.rsplit(ARROW).next().unwrap_or_default().trim()
    }

    /// Dialogue joined into a single line.
    pub fn text(&self) -> String {
        self.dialogue
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn set_time_range_if_empty(&mut self, time_range: &str) {
        if self.time_range.is_empty() {
            self.time_range = time_range.to_string();
        }
    }
}

impl fmt::Display for SrtLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.num, self.time_range)?;
        for line in &self.dialogue {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

/// Greedy word wrap on character counts.
///
/// A word longer than `width` fills what is left of the current line and
/// continues over as many lines as it needs.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let sep = usize::from(current_len > 0);

        if current_len + sep + word_len <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_len += sep + word_len;
            continue;
        }

        if word_len <= width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
            continue;
        }

        let mut rest = word;
        if current_len > 0 {
            let space_left = width.saturating_sub(current_len + 1);
            if space_left > 0 {
                let split = char_boundary(rest, space_left);
                current.push(' ');
                current.push_str(&rest[..split]);
                rest = &rest[split..];
            }
            lines.push(std::mem::take(&mut current));
        }
        while rest.chars().count() > width {
            let split = char_boundary(rest, width);
            lines.push(rest[..split].to_string());
            rest = &rest[split..];
        }
        current = rest.to_string();
        current_len = rest.chars().count();
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Byte offset of the `n`th character, or the end of `s`.
fn char_boundary(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// The captions of an SRT file, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SrtDocument {
    lines: Vec<SrtLine>,
}

impl SrtDocument {
    pub fn parse(srt_contents: &str) -> Self {
        let lines = srt_contents
            .split("\n\n")
            .filter(|block| !block.trim().is_empty())
            .map(SrtLine::parse)
            .collect();
        Self { lines }
    }

    /// The file contents with captions separated by blank lines.
    pub fn contents(&self) -> String {
        self.lines
            .iter()
            .map(SrtLine::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Inserts a caption at `index`, renumbering the captions after it.
    pub fn insert(&mut self, index: usize, line: SrtLine) {
        let index = index.min(self.lines.len());
        for rest in &mut self.lines[index..] {
            if rest.num == 0 {
                rest.num = u32::try_from(index + 1).unwrap_or(u32::MAX);
            }
            rest.num = rest.num.saturating_add(1);
        }
        self.lines.insert(index, line);
    }

    pub fn lines(&self) -> &[SrtLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [SrtLine] {
        &mut self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SrtLine> {
        self.lines.iter()
    }
}

impl<'a> IntoIterator for &'a SrtDocument {
    type Item = &'a SrtLine;
    type IntoIter = std::slice::Iter<'a, SrtLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello there.\n\n2\n00:00:02,500 --> 00:00:05,000\nSecond line\nwith two rows.";

    #[test]
    fn test_parse_and_contents() {
        let doc = SrtDocument::parse(SRT);
        assert_eq!(doc.len(), 2);

        let second = &doc.lines()[1];
        assert_eq!(second.num, 2);
        assert_eq!(second.start_ts(), "00:00:02,500");
        assert_eq!(second.end_ts(), "00:00:05,000");
        assert_eq!(second.text(), "Second line with two rows.");

        assert_eq!(doc.contents(), SRT);
    }

    #[test]
    fn test_insert_renumbers() {
        let mut doc = SrtDocument::parse(SRT);
        let intro = SrtLine::new(1, "00:00:00,000 --> 00:00:01,000", "Intro", DEFAULT_LINE_WIDTH);
        doc.insert(0, intro);

        let nums: Vec<u32> = doc.iter().map(|line| line.num).collect();
        assert_eq!(nums, vec![1, 2, 3]);
        assert_eq!(doc.lines()[1].text(), "Hello there.");
    }

    #[test]
    fn test_unparsable_number() {
        let mut line = SrtLine::parse("x\n\nText");
        assert_eq!(line.num, 0);
        assert!(line.time_range.is_empty());
        line.set_time_range_if_empty("00:00:01,000 --> 00:00:02,000");
        assert_eq!(line.start_ts(), "00:00:01,000");
    }

    #[test]
    fn test_wrap() {
        let line = SrtLine::new(
            3,
            "00:00:05,000 --> 00:00:09,000",
            "This caption is long enough that it has to be wrapped",
            20,
        );
        assert!(line.dialogue.len() > 1);
        assert!(line.dialogue.iter().all(|row| row.len() <= 20));
        assert_eq!(line.text(), "This caption is long enough that it has to be wrapped");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(
            wrap("see https://example.com/a/very/long/path", 10),
            vec!["see https:", "//example.", "com/a/very", "/long/path"]
        );
        assert_eq!(wrap("abcdefghij klm", 5), vec!["abcde", "fghij", "klm"]);
        assert_eq!(wrap("çàéèùôîïëü", 4), vec!["çàéè", "ùôîï", "ëü"]);

        let line = SrtLine::new(
            1,
            "00:00:00,000 --> 00:00:02,000",
            "Visit https://www.3playmedia.com/support/captions-and-transcripts today",
            DEFAULT_LINE_WIDTH,
        );
        assert!(line
            .dialogue
            .iter()
            .all(|row| row.chars().count() <= DEFAULT_LINE_WIDTH));
    }
}
