//! Line framing for the monitor's echo-contaminated output.
//!
//! Everything the monitor sends back (command echo, payload lines, the
//! prompt it prints when it is ready again) arrives as one undifferentiated
//! character stream. The framer splits that stream on line feeds and deals
//! with the one ambiguous piece: the final fragment left over when the line
//! goes silent, which is usually the bare prompt but can be a legitimate
//! line that never got its terminator.

use memchr::memchr;

/// The character the remote prints as its command prompt. A trailing
/// fragment ending in this carries no payload and is dropped.
const PROMPT_MARKER: char = '%';

/// A framed response: the accumulated log text plus what was learned about
/// the trailing fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedResponse {
    /// Framed text, one `\n`-terminated entry per logical line.
    pub text: String,

    /// A final line that arrived without a terminator and was kept (it did
    /// not look like a prompt). Already included in `text`; surfaced here
    /// so the caller can emit it live like the completed lines.
    pub tail: Option<String>,

    /// Whether a trailing prompt artifact was stripped.
    pub had_prompt: bool,
}

/// Incremental line framer.
///
/// Feed it chunks as they arrive; each call returns the lines completed by
/// that chunk so they can be surfaced immediately. When the channel goes
/// silent, [`finish`](Self::finish) classifies whatever is left in the
/// current-line buffer.
#[derive(Debug, Default)]
pub struct LineFramer {
    line: String,
    log: String,
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk of raw bytes, returning the lines it completed.
    ///
    /// Lines are split on `\n` only; carriage returns are payload and stay
    /// in the line. The returned lines carry no terminator; the accumulated
    /// log keeps one per line.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut completed = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = memchr(b'\n', rest) {
            self.line.push_str(&String::from_utf8_lossy(&rest[..pos]));
            let line = std::mem::take(&mut self.line);
            self.log.push_str(&line);
            self.log.push('\n');
            completed.push(line);
            rest = &rest[pos + 1..];
        }

        self.line.push_str(&String::from_utf8_lossy(rest));
        completed
    }

    /// End of input: classify the final unterminated fragment.
    ///
    /// An empty fragment means the response ended cleanly on a line feed:
    /// there is nothing to inspect and nothing to strip. A fragment ending
    /// in the prompt marker is the echoed prompt and is dropped. Anything
    /// else could be a real line that lost its terminator, so it is kept.
    pub fn finish(mut self) -> FramedResponse {
        if self.line.is_empty() {
            return FramedResponse {
                text: self.log,
                tail: None,
                had_prompt: false,
            };
        }

        if self.line.ends_with(PROMPT_MARKER) {
            return FramedResponse {
                text: self.log,
                tail: None,
                had_prompt: true,
            };
        }

        self.log.push_str(&self.line);
        self.log.push('\n');
        FramedResponse {
            text: self.log,
            tail: Some(self.line),
            had_prompt: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input_round_trips() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"first\nsecond\n");
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);

        let framed = framer.finish();
        assert_eq!(framed.text, "first\nsecond\n");
        assert_eq!(framed.tail, None);
        assert!(!framed.had_prompt);
    }

    #[test]
    fn test_prompt_fragment_is_stripped() {
        let mut framer = LineFramer::new();
        framer.feed(b"CHS = 99 2 4  0\ndeadbeef\n%");

        let framed = framer.finish();
        assert_eq!(framed.text, "CHS = 99 2 4  0\ndeadbeef\n");
        assert_eq!(framed.tail, None);
        assert!(framed.had_prompt);
    }

    #[test]
    fn test_fragment_ending_in_prompt_is_dropped_whole() {
        let mut framer = LineFramer::new();
        framer.feed(b"line\npartial garbage%");

        let framed = framer.finish();
        assert_eq!(framed.text, "line\n");
        assert!(framed.had_prompt);
    }

    #[test]
    fn test_unterminated_line_is_kept() {
        let mut framer = LineFramer::new();
        framer.feed(b"done\nlast words");

        let framed = framer.finish();
        assert_eq!(framed.text, "done\nlast words\n");
        assert_eq!(framed.tail, Some("last words".to_string()));
        assert!(!framed.had_prompt);
    }

    #[test]
    fn test_empty_input_is_safe() {
        let framed = LineFramer::new().finish();
        assert_eq!(framed.text, "");
        assert_eq!(framed.tail, None);
        assert!(!framed.had_prompt);
    }

    #[test]
    fn test_carriage_returns_stay_in_the_line() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"echo\r\n");
        assert_eq!(lines, vec!["echo\r".to_string()]);
        assert_eq!(framer.finish().text, "echo\r\n");
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut framer = LineFramer::new();
        assert!(framer.feed(b"hel").is_empty());
        assert_eq!(framer.feed(b"lo\nwor"), vec!["hello".to_string()]);
        assert_eq!(framer.feed(b"ld\n"), vec!["world".to_string()]);
        assert_eq!(framer.finish().text, "hello\nworld\n");
    }

    #[test]
    fn test_lone_prompt_leaves_log_empty() {
        let mut framer = LineFramer::new();
        framer.feed(b"%");

        let framed = framer.finish();
        assert_eq!(framed.text, "");
        assert!(framed.had_prompt);
    }
}
