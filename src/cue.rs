use chrono::TimeDelta;
use std::fmt;

use crate::markup::MarkupRun;
use crate::timestamp::format_srt_timestamp;

// @module: Timed subtitle entries

// @struct: One timed subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Start of display
    pub begin: TimeDelta,

    // @field: End of display, expected but not required to be >= begin
    pub end: TimeDelta,

    // @field: Styled text, in order
    pub runs: Vec<MarkupRun>,
}

impl Cue {
    /// Create a cue with no text
    pub fn new(begin: TimeDelta, end: TimeDelta) -> Self {
        Cue {
            begin,
            end,
            runs: Vec::new(),
        }
    }

    /// Create a cue holding a single unstyled run
    pub fn with_text(begin: TimeDelta, end: TimeDelta, text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![MarkupRun::plain(text)]
        };
        Cue { begin, end, runs }
    }

    /// Display duration
    pub fn duration(&self) -> TimeDelta {
        self.end - self.begin
    }

    /// Plain text: all run contents concatenated
    pub fn text(&self) -> String {
        self.runs.iter().map(MarkupRun::content).collect()
    }

    /// Whether the cue is on screen at `time` (end exclusive)
    pub fn contains(&self, time: TimeDelta) -> bool {
        self.begin <= time && time < self.end
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {} {}",
            format_srt_timestamp(self.begin),
            format_srt_timestamp(self.end),
            self.text().replace("\r\n", " | ")
        )
    }
}
