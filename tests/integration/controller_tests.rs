/*!
 * File-level controller tests
 */

use anyhow::Result;
use std::fs;

use subshift::app_config::Config;
use subshift::encoding::{self, OutputEncoding};
use subshift::{Controller, SubtitleError, SubtitleFormat};

use crate::common::{self, ms, SAMPLE_ASS, SAMPLE_SRT};

fn utf8_controller(create_backup: bool) -> Result<Controller> {
    Controller::with_config(Config {
        srt_encoding: OutputEncoding::Utf8,
        ass_encoding: OutputEncoding::Utf8,
        create_backup,
        ..Config::default()
    })
}

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let config = Config {
        ass_encoding: OutputEncoding::Utf16be,
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_convert_srtToAss_shouldWriteConfiguredEncoding() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let output = temp_dir.path().join("out").join("movie.ass");

    let controller = Controller::with_config(Config::default())?;
    controller.convert(&input, &output)?;

    let bytes = fs::read(&output)?;
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let converted = controller.load(&output)?;
    assert_eq!(converted.len(), 3);
    assert_eq!(converted.cues[2].text(), "For testing\r\npurposes.");
    Ok(())
}

#[test]
fn test_save_withDefaultConfig_shouldWriteUtf16Srt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.ass", SAMPLE_ASS)?;
    let output = temp_dir.path().join("movie.srt");

    let controller = Controller::with_config(Config::default())?;
    controller.convert(&input, &output)?;

    let bytes = fs::read(&output)?;
    assert_eq!(encoding::detect(&bytes), encoding::TextEncoding::Utf16Le);
    assert!(encoding::decode(&bytes).starts_with("1\r\n00:00:01,000 --> 00:00:03,500\r\n"));
    Ok(())
}

#[test]
fn test_load_withUtf16BeInput_shouldDecode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "movie.srt",
        OutputEncoding::Utf16be.encode(SAMPLE_SRT),
    )?;

    let document = utf8_controller(false)?.load(&input)?;

    assert_eq!(document.len(), 3);
    assert_eq!(document.cues[1].runs[1].color(), Some("red"));
    Ok(())
}

#[test]
fn test_shift_inPlace_shouldRewriteAndBackUp() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;

    utf8_controller(true)?.shift(&input, ms(1_500), None)?;

    let backup = temp_dir.path().join("movie.srt.bak");
    assert_eq!(fs::read_to_string(&backup)?, SAMPLE_SRT);
    let shifted = fs::read_to_string(&input)?;
    assert!(shifted.starts_with("1\r\n00:00:02,500 --> 00:00:05,500\r\n"));
    Ok(())
}

#[test]
fn test_shift_toDestination_shouldLeaveSourceAlone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let output = temp_dir.path().join("shifted.ass");

    utf8_controller(true)?.shift(&input, ms(-1_000), Some(&output))?;

    assert_eq!(fs::read_to_string(&input)?, SAMPLE_SRT);
    assert!(!temp_dir.path().join("movie.srt.bak").exists());
    assert!(fs::read_to_string(&output)?.contains("Dialogue: 0,0:00:00.00,0:00:03.00,"));
    Ok(())
}

#[test]
fn test_rescale_withRange_shouldOnlyTouchRange() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let controller = utf8_controller(false)?;

    controller.rescale(&input, Some((1, 2)), ms(6_000), ms(11_000), None)?;

    let document = controller.load(&input)?;
    assert_eq!(document.cues[0].begin, ms(1_000));
    assert_eq!(document.cues[1].begin, ms(6_000));
    assert_eq!(document.cues[1].end, ms(10_000));
    assert_eq!(document.cues[2].begin, ms(11_000));
    assert_eq!(document.cues[2].end, ms(15_500));
    Ok(())
}

#[test]
fn test_rescale_withInvalidRange_shouldFailAndKeepFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;

    let result = utf8_controller(false)?.rescale(&input, Some((2, 7)), ms(0), ms(1_000), None);

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&input)?, SAMPLE_SRT);
    Ok(())
}

#[test]
fn test_sync_withSameCueCount_shouldCopyReferenceTimings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "movie.fr.srt",
        "1\r\n00:00:00,000 --> 00:00:00,500\r\nBonjour\r\n\r\n2\r\n00:00:01,000 --> 00:00:01,500\r\nMonde\r\n",
    )?;
    let reference = common::create_test_file(temp_dir.path(), "movie.en.ass", SAMPLE_ASS)?;
    let output = temp_dir.path().join("movie.synced.srt");
    let controller = utf8_controller(false)?;

    controller.sync(&input, &reference, Some(&output))?;

    let synced = controller.load(&output)?;
    assert_eq!((synced.cues[0].begin, synced.cues[0].end), (ms(1_000), ms(3_500)));
    assert_eq!((synced.cues[1].begin, synced.cues[1].end), (ms(4_000), ms(6_000)));
    assert_eq!(synced.cues[0].text(), "Bonjour");
    Ok(())
}

#[test]
fn test_cueAt_shouldReturnVisibleCue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let controller = utf8_controller(false)?;

    let cue = controller.cue_at(&input, ms(6_000))?;
    assert_eq!(cue.map(|c| c.text()), Some("It contains multiple entries.".to_string()));
    assert!(controller.cue_at(&input, ms(4_500))?.is_none());
    Ok(())
}

#[test]
fn test_save_asSub_shouldNotCreateFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let output = temp_dir.path().join("movie.sub");

    utf8_controller(false)?.convert(&input, &output)?;

    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_load_withUnsupportedExtension_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.txt", SAMPLE_SRT)?;

    let error = utf8_controller(false)?.load(&input).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<SubtitleError>(),
        Some(SubtitleError::UnsupportedFormat(_))
    ));
    Ok(())
}

#[test]
fn test_load_withForcedFormat_shouldIgnoreExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.txt", SAMPLE_ASS)?;

    let controller = utf8_controller(false)?.with_input_format(Some(SubtitleFormat::Ass));
    let document = controller.load(&input)?;

    assert_eq!(document.len(), 2);
    Ok(())
}

#[test]
fn test_load_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.srt");

    assert!(utf8_controller(false)?.load(&missing).is_err());
    Ok(())
}

#[test]
fn test_inputFormatFor_shouldPreferForcedFormat() -> Result<()> {
    let controller = utf8_controller(false)?;
    assert_eq!(controller.input_format_for("a.ass")?, SubtitleFormat::Ass);
    assert!(controller.input_format_for("a.txt").is_err());

    let forced = controller.with_input_format(Some(SubtitleFormat::Srt));
    assert_eq!(forced.input_format_for("a.ass")?, SubtitleFormat::Srt);
    Ok(())
}
