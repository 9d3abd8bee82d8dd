/*!
 * Subtitle formats and their codecs.
 *
 * - `srt`: SubRip, `<b>`-style tags and numbered cue blocks
 * - `ass`: Advanced SubStation Alpha, `{\b1}`-style overrides in `Dialogue:` lines
 * - `sub`: placeholder, nothing is parsed or written
 */

pub mod ass;
pub mod srt;
pub mod sub;

use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::cue::Cue;
use crate::errors::SubtitleError;

pub use ass::AssCodec;
pub use srt::SrtCodec;
pub use sub::SubCodec;

/// Reads and writes cues in one on-disk format
pub trait SubtitleCodec {
    /// Parse decoded file text into cues
    fn parse(&self, text: &str) -> Result<Vec<Cue>, SubtitleError>;

    /// Serialize cues to `writer`
    fn write(&self, cues: &[Cue], writer: &mut dyn Write) -> io::Result<()>;
}

/// Supported subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    Ass,
    Srt,
    Sub,
}

impl SubtitleFormat {
    /// Known file extensions, with leading dot
    pub const EXTENSIONS: [&'static str; 3] = [".ass", ".srt", ".sub"];

    /// Resolve a file name, dotted extension or bare extension, ignoring case
    pub fn from_name(file_or_extension: &str) -> Result<Self, SubtitleError> {
        let lower = file_or_extension.to_lowercase();
        [Self::Ass, Self::Srt, Self::Sub]
            .into_iter()
            .find(|format| {
                let ext = format.extension();
                lower == ext || lower.ends_with(&format!(".{}", ext))
            })
            .ok_or_else(|| SubtitleError::UnsupportedFormat(file_or_extension.to_string()))
    }

    /// Resolve the format of a path from its file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        Self::from_name(&path.as_ref().to_string_lossy())
    }

    /// Lowercase extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ass => "ass",
            Self::Srt => "srt",
            Self::Sub => "sub",
        }
    }

    /// The codec for this format
    pub fn codec(&self) -> &'static dyn SubtitleCodec {
        match self {
            Self::Ass => &AssCodec,
            Self::Srt => &SrtCodec,
            Self::Sub => &SubCodec,
        }
    }

    /// Whether `extension` (with or without leading dot) is a subtitle extension
    pub fn is_subtitle_extension(extension: &str) -> bool {
        let dotted = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };
        Self::EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(&dotted))
    }

    /// Whether the path has a subtitle extension
    pub fn is_subtitle_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| Self::is_subtitle_extension(&ext.to_string_lossy()))
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Write `line` followed by CRLF
pub(crate) fn write_line(writer: &mut dyn Write, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\r\n")
}
