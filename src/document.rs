use chrono::TimeDelta;
use log::debug;
use std::fmt;
use std::io::{self, Read, Write};

use crate::cue::Cue;
use crate::errors::{SubtitleError, TimingError};
use crate::formats::SubtitleFormat;
use crate::timestamp::from_millis_f64;
use crate::timing;

// @module: Subtitle document, the format-agnostic core API

/// An ordered sequence of cues, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    /// Cues in file order; never re-sorted
    pub cues: Vec<Cue>,
}

impl SubtitleDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from existing cues
    pub fn from_cues(cues: Vec<Cue>) -> Self {
        SubtitleDocument { cues }
    }

    /// Parse decoded text in the given format
    pub fn parse(text: &str, format: SubtitleFormat) -> Result<Self, SubtitleError> {
        let cues = format.codec().parse(text)?;
        debug!("Parsed {} cues as {}", cues.len(), format);
        Ok(Self::from_cues(cues))
    }

    /// Read a whole UTF-8 stream and parse it
    pub fn parse_reader<R: Read>(mut reader: R, format: SubtitleFormat) -> Result<Self, SubtitleError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text, format)
    }

    /// Serialize to `writer`. `.sub` writes nothing.
    pub fn serialize<W: Write>(&self, format: SubtitleFormat, writer: &mut W) -> io::Result<()> {
        format.codec().write(&self.cues, writer)
    }

    /// Serialize into a string
    pub fn to_string_as(&self, format: SubtitleFormat) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail and the codecs only emit UTF-8
        let written = self.serialize(format, &mut buffer);
        debug_assert!(written.is_ok(), "in-memory {} serialization failed: {:?}", format, written);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Move every cue by `delta`
    pub fn shift_time(&mut self, delta: TimeDelta) {
        timing::shift(&mut self.cues, delta);
    }

    /// Rescale the whole document so the first cue begins at `start` and the last at `end`
    pub fn rescale_time(&mut self, start: TimeDelta, end: TimeDelta) -> Result<(), TimingError> {
        timing::rescale(&mut self.cues, start, end)
    }

    /// Rescale cues `first..=last` only
    pub fn rescale_range(
        &mut self,
        first: usize,
        last: usize,
        start: TimeDelta,
        end: TimeDelta,
    ) -> Result<(), TimingError> {
        timing::rescale_range(&mut self.cues, first, last, start, end)
    }

    /// Take timings from another document
    pub fn resync(&mut self, reference: &SubtitleDocument) -> Result<(), TimingError> {
        timing::resync(&mut self.cues, &reference.cues)
    }

    /// The cue on screen at `time`.
    ///
    /// Looks at the first cue that has not ended yet; if that one has not started,
    /// nothing is shown even when a later overlapping cue would cover `time`.
    pub fn cue_at(&self, time: TimeDelta) -> Option<&Cue> {
        self.cues
            .iter()
            .find(|cue| cue.end > time)
            .filter(|cue| cue.begin <= time)
    }

    /// Same as `cue_at`, with the time given in milliseconds
    pub fn cue_at_millis(&self, millis: f64) -> Option<&Cue> {
        self.cue_at(from_millis_f64(millis))
    }

    /// Begin of the first cue and end of the last
    pub fn time_span(&self) -> Option<(TimeDelta, TimeDelta)> {
        Some((self.cues.first()?.begin, self.cues.last()?.end))
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
