use log::warn;
use std::io::{self, Write};

use super::{SubtitleCodec, SubtitleFormat};
use crate::cue::Cue;
use crate::errors::SubtitleError;

// @module: MicroDVD/VobSub (.sub) placeholder

/// Recognized by extension only; every parse fails and writing produces nothing
pub struct SubCodec;

impl SubtitleCodec for SubCodec {
    fn parse(&self, _text: &str) -> Result<Vec<Cue>, SubtitleError> {
        Err(SubtitleError::ParseUnsupported(SubtitleFormat::Sub))
    }

    fn write(&self, cues: &[Cue], _writer: &mut dyn Write) -> io::Result<()> {
        warn!("Writing .sub subtitles is not supported, {} cues skipped", cues.len());
        Ok(())
    }
}
