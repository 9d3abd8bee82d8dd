use anyhow::{Context, Result};
use chrono::TimeDelta;
use log::{debug, info};
use std::io;
use std::path::Path;

use crate::app_config::Config;
use crate::cue::Cue;
use crate::document::SubtitleDocument;
use crate::file_utils::FileManager;
use crate::formats::SubtitleFormat;

// @module: Application controller for file-level subtitle operations

/// Runs whole-file operations: read, transform, write back
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Input format forced from the command line, instead of the extension
    input_format: Option<SubtitleFormat>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            input_format: None,
        })
    }

    /// Read every input as `format` regardless of its extension
    pub fn with_input_format(mut self, format: Option<SubtitleFormat>) -> Self {
        self.input_format = format;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Format used to read `path`: the forced one, else the extension's
    pub fn input_format_for<P: AsRef<Path>>(&self, path: P) -> Result<SubtitleFormat> {
        match self.input_format {
            Some(format) => Ok(format),
            None => Ok(SubtitleFormat::from_path(path)?),
        }
    }

    /// Load and parse a subtitle file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<SubtitleDocument> {
        let path = path.as_ref();
        self.load_as(path, self.input_format_for(path)?)
    }

    /// Load and parse a subtitle file in an explicit format
    pub fn load_as<P: AsRef<Path>>(&self, path: P, format: SubtitleFormat) -> Result<SubtitleDocument> {
        let path = path.as_ref();
        let text = FileManager::read_text(path)?;
        let document = SubtitleDocument::parse(&text, format)
            .with_context(|| format!("Failed to parse {} subtitle: {:?}", format, path))?;
        debug!("Loaded {} cues from {:?}", document.len(), path);
        Ok(document)
    }

    /// Write a document in the format implied by `path`
    pub fn save<P: AsRef<Path>>(&self, document: &SubtitleDocument, path: P) -> Result<()> {
        let path = path.as_ref();
        self.save_as(document, path, SubtitleFormat::from_path(path)?)
    }

    /// Write a document in an explicit format. `.sub` output creates no file.
    pub fn save_as<P: AsRef<Path>>(
        &self,
        document: &SubtitleDocument,
        path: P,
        format: SubtitleFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        if format == SubtitleFormat::Sub {
            document.serialize(format, &mut io::sink())?;
            return Ok(());
        }

        let encoding = self.config.encoding_for(format);
        FileManager::write_text(path, &document.to_string_as(format), encoding)?;
        debug!("Wrote {} cues to {:?} as {} ({})", document.len(), path, format, encoding);
        Ok(())
    }

    /// Convert between formats, each picked from its file extension
    pub fn convert<P1: AsRef<Path>, P2: AsRef<Path>>(&self, source: P1, destination: P2) -> Result<()> {
        let document = self.load(source.as_ref())?;
        self.save(&document, destination.as_ref())?;
        info!("Converted {:?} -> {:?}", source.as_ref(), destination.as_ref());
        Ok(())
    }

    /// Shift every cue by `delta`
    pub fn shift<P: AsRef<Path>>(&self, source: P, delta: TimeDelta, destination: Option<&Path>) -> Result<()> {
        let source = source.as_ref();
        let mut document = self.load(source)?;
        document.shift_time(delta);
        self.write_back(&document, source, destination)
    }

    /// Rescale all cues, or only `first..=last`, between `start` and `end`
    pub fn rescale<P: AsRef<Path>>(
        &self,
        source: P,
        range: Option<(usize, usize)>,
        start: TimeDelta,
        end: TimeDelta,
        destination: Option<&Path>,
    ) -> Result<()> {
        let source = source.as_ref();
        let mut document = self.load(source)?;
        match range {
            Some((first, last)) => document.rescale_range(first, last, start, end),
            None => document.rescale_time(start, end),
        }
        .with_context(|| format!("Failed to rescale {:?}", source))?;
        self.write_back(&document, source, destination)
    }

    /// Take timings from `reference`
    pub fn sync<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        source: P1,
        reference: P2,
        destination: Option<&Path>,
    ) -> Result<()> {
        let source = source.as_ref();
        let mut document = self.load(source)?;
        let reference_document = self.load(reference.as_ref())?;
        document
            .resync(&reference_document)
            .with_context(|| format!("Failed to sync {:?} to {:?}", source, reference.as_ref()))?;
        self.write_back(&document, source, destination)
    }

    /// The cue shown at `time`, if any
    pub fn cue_at<P: AsRef<Path>>(&self, source: P, time: TimeDelta) -> Result<Option<Cue>> {
        let document = self.load(source)?;
        Ok(document.cue_at(time).cloned())
    }

    /// Save to `destination`, or over `source` when none is given
    fn write_back(&self, document: &SubtitleDocument, source: &Path, destination: Option<&Path>) -> Result<()> {
        let target = destination.unwrap_or(source);
        if target == source && self.config.create_backup {
            let backup = FileManager::backup_file(source)?;
            info!("Backed up {:?} to {:?}", source, backup);
        }
        self.save(document, target)?;
        info!("Success: {:?}", target);
        Ok(())
    }
}
