/*!
 * Tests for the Advanced SubStation Alpha codec
 */

use subshift::formats::ass::{render_text, AssCodec};
use subshift::formats::SubtitleCodec;
use subshift::markup::{MarkupRun, TextStyle};
use subshift::{Cue, SubtitleError};

use crate::common::{ms, SAMPLE_ASS};

fn events(dialogue: &str) -> String {
    format!(
        "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n{}",
        dialogue
    )
}

fn serialize(cues: &[Cue]) -> String {
    let mut buffer = Vec::new();
    AssCodec.write(cues, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_parse_withSampleFile_shouldReadDialogues() {
    let cues = AssCodec.parse(SAMPLE_ASS).unwrap();

    assert_eq!(cues.len(), 2);
    assert_eq!((cues[0].begin, cues[0].end), (ms(1_000), ms(3_500)));
    assert_eq!(cues[0].text(), "Hello, world");
    assert!(cues[0].runs[0].bold());
    assert!(!cues[0].runs[1].bold());

    assert_eq!(cues[1].text(), "Line one\r\nLine two");
    assert_eq!(cues[1].runs[1].content(), "two");
    assert!(cues[1].runs[1].italic());
}

#[test]
fn test_parse_withCommasInText_shouldKeepThemInLastField() {
    let cues = AssCodec
        .parse(&events("Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,One, two, three\n"))
        .unwrap();
    assert_eq!(cues[0].text(), "One, two, three");
}

#[test]
fn test_parse_withLowercaseLineBreak_shouldConvertToCrlf() {
    let cues = AssCodec
        .parse(&events(r"Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,a\nb"))
        .unwrap();
    assert_eq!(cues[0].text(), "a\r\nb");
}

#[test]
fn test_parse_withMixedCaseHeaders_shouldMatch() {
    let input = "[EVENTS]\nformat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDIALOGUE: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Loud\n";
    let cues = AssCodec.parse(input).unwrap();
    assert_eq!(cues[0].text(), "Loud");
}

#[test]
fn test_parse_withoutEventsSection_shouldFail() {
    let result = AssCodec.parse("[Script Info]\nTitle: nothing\n");
    assert!(matches!(result, Err(SubtitleError::MissingSection("[Events]"))));
}

#[test]
fn test_parse_withoutFormatLine_shouldFail() {
    let result = AssCodec.parse("[Events]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,x\n");
    assert!(matches!(result, Err(SubtitleError::MissingSection("Format:"))));
}

#[test]
fn test_parse_withNoDialogues_shouldReturnEmpty() {
    let cues = AssCodec.parse(&events("")).unwrap();
    assert!(cues.is_empty());
}

#[test]
fn test_parse_withShortDialogue_shouldReportMissingFields() {
    let result = AssCodec.parse(&events("Dialogue: 0,0:00:01.00,0:00:02.00,Default\n"));

    match result {
        Err(SubtitleError::MissingFields { line, found, expected }) => {
            assert_eq!(line, 3);
            assert_eq!(found, 4);
            assert_eq!(expected, 10);
        }
        other => panic!("Expected MissingFields, got {:?}", other),
    }
}

#[test]
fn test_parse_withBadStartTime_shouldReportTimestamp() {
    let result = AssCodec.parse(&events("Dialogue: 0,soon,0:00:02.00,Default,,0,0,0,,x\n"));

    match result {
        Err(SubtitleError::MalformedTimestamp { line, value }) => {
            assert_eq!(line, 3);
            assert_eq!(value, "soon");
        }
        other => panic!("Expected MalformedTimestamp, got {:?}", other),
    }
}

#[test]
fn test_parse_withCommentBetweenDialogues_shouldStopAtComment() {
    let input = events(
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,kept\n\
         Comment: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,note\n\
         Dialogue: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,dropped\n",
    );
    let cues = AssCodec.parse(&input).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "kept");
}

#[test]
fn test_parse_withCommentsBeforeFirstDialogue_shouldSkipThem() {
    let input = events(
        "Comment: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,intro\n\
         Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,first\n",
    );
    let cues = AssCodec.parse(&input).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "first");
}

#[test]
fn test_write_shouldEmitHeaderAndDialogueLines() {
    let cue = Cue {
        begin: ms(3_723_456),
        end: ms(3_725_000),
        runs: vec![
            MarkupRun::new("Hi", TextStyle::BOLD, None),
            MarkupRun::plain(" there\r\nfriend"),
        ],
    };
    let output = serialize(&[cue]);

    assert!(output.starts_with("[Script Info]\r\n"));
    assert!(output.contains("[V4+ Styles]\r\n"));
    assert!(output.contains(
        "[Events]\r\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\r\n"
    ));
    assert!(output.ends_with(
        "Dialogue: 0,1:02:03.45,1:02:05.00,Default,,0,0,0,,{\\b1}Hi{\\b0} there\\Nfriend\r\n"
    ));
}

#[test]
fn test_write_thenParse_shouldPreserveCues() {
    let cues = AssCodec.parse(SAMPLE_ASS).unwrap();
    let reparsed = AssCodec.parse(&serialize(&cues)).unwrap();

    assert_eq!(reparsed, cues);
}

#[test]
fn test_renderText_withColor_shouldDropIt() {
    let runs = vec![MarkupRun::new("red", TextStyle::empty(), Some("red".to_string()))];
    assert_eq!(render_text(&runs), "red");
}
