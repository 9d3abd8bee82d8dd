use log::debug;
use std::io::{self, Write};

use super::{write_line, SubtitleCodec};
use crate::cue::Cue;
use crate::errors::SubtitleError;
use crate::markup::{decompose, Attribute, Directive, InlineSyntax, MarkupRun, StyleChange, TextStyle};
use crate::timestamp::{format_ass_timestamp, parse_timestamp};

// @module: Advanced SubStation Alpha (.ass) codec

const EVENTS_HEADER: &str = "[Events]";
const FORMAT_PREFIX: &str = "Format:";
const DIALOGUE_PREFIX: &str = "dialogue:";

// @const: Everything written before the first Dialogue line
const SCRIPT_HEADER: [&str; 11] = [
    "[Script Info]",
    "ScriptType: v4.00+",
    "WrapStyle: 0",
    "ScaledBorderAndShadow: yes",
    "",
    "[V4+ Styles]",
    "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding",
    "Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1",
    "",
    "[Events]",
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text",
];

/// ASS override codes: `{\b1}`, `{\i0}`, `{\u}`, ...
pub struct AssSyntax;

impl InlineSyntax for AssSyntax {
    const OPEN: char = '{';
    const CLOSE: char = '}';

    fn directive(token: &str) -> Option<Directive> {
        let change = match token {
            "\\b1" => StyleChange::Set(Attribute::Bold),
            "\\i1" => StyleChange::Set(Attribute::Italic),
            "\\u1" => StyleChange::Set(Attribute::Underline),
            "\\s1" => StyleChange::Set(Attribute::Strikethrough),
            "\\b" | "\\b0" => StyleChange::Clear(Attribute::Bold),
            "\\i" | "\\i0" => StyleChange::Clear(Attribute::Italic),
            "\\u" | "\\u0" => StyleChange::Clear(Attribute::Underline),
            "\\s" | "\\s0" => StyleChange::Clear(Attribute::Strikethrough),
            _ => return None,
        };
        Some(Directive::Style(change))
    }
}

fn override_code(change: StyleChange) -> &'static str {
    match change {
        StyleChange::Set(Attribute::Bold) => "\\b1",
        StyleChange::Set(Attribute::Italic) => "\\i1",
        StyleChange::Set(Attribute::Underline) => "\\u1",
        StyleChange::Set(Attribute::Strikethrough) => "\\s1",
        StyleChange::Clear(Attribute::Bold) => "\\b0",
        StyleChange::Clear(Attribute::Italic) => "\\i0",
        StyleChange::Clear(Attribute::Underline) => "\\u0",
        StyleChange::Clear(Attribute::Strikethrough) => "\\s0",
    }
}

fn push_overrides(out: &mut String, from: TextStyle, to: TextStyle) {
    let changes = from.transition_to(to);
    if changes.is_empty() {
        return;
    }
    out.push('{');
    for change in changes {
        out.push_str(override_code(change));
    }
    out.push('}');
}

/// Rebuild ASS dialogue text from runs. Colors are not carried over.
pub fn render_text(runs: &[MarkupRun]) -> String {
    let mut out = String::new();
    let mut style = TextStyle::empty();

    for run in runs {
        push_overrides(&mut out, style, run.style());
        out.push_str(&run.content().replace("\r\n", "\\N").replace('\n', "\\N"));
        style = run.style();
    }
    push_overrides(&mut out, style, TextStyle::empty());

    if runs.iter().any(|run| run.color().is_some()) {
        debug!("Dropping font colors not representable in ASS dialogue text");
    }

    out
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn is_dialogue(line: &str) -> bool {
    starts_with_ignore_case(line, DIALOGUE_PREFIX)
}

/// Advanced SubStation Alpha codec
pub struct AssCodec;

impl AssCodec {
    fn parse_dialogue(line_number: usize, line: &str, field_count: usize) -> Result<Cue, SubtitleError> {
        // The text field is last and may itself contain commas
        let fields: Vec<&str> = line.splitn(field_count, ',').collect();
        if fields.len() < field_count {
            return Err(SubtitleError::MissingFields {
                line: line_number,
                found: fields.len(),
                expected: field_count,
            });
        }

        let timestamp = |idx: usize| {
            fields
                .get(idx)
                .and_then(|field| parse_timestamp(field))
                .ok_or_else(|| SubtitleError::MalformedTimestamp {
                    line: line_number,
                    value: fields.get(idx).unwrap_or(&line).to_string(),
                })
        };
        let begin = timestamp(1)?;
        let end = timestamp(2)?;

        let text = fields
            .last()
            .copied()
            .unwrap_or_default()
            .replace("\\N", "\r\n")
            .replace("\\n", "\r\n");

        Ok(Cue {
            begin,
            end,
            runs: decompose::<AssSyntax>(&text),
        })
    }
}

impl SubtitleCodec for AssCodec {
    fn parse(&self, text: &str) -> Result<Vec<Cue>, SubtitleError> {
        let mut lines = text.lines().enumerate();

        lines
            .by_ref()
            .find(|(_, line)| starts_with_ignore_case(line, EVENTS_HEADER))
            .ok_or(SubtitleError::MissingSection(EVENTS_HEADER))?;

        let (_, format_line) = lines
            .by_ref()
            .find(|(_, line)| starts_with_ignore_case(line, FORMAT_PREFIX))
            .ok_or(SubtitleError::MissingSection(FORMAT_PREFIX))?;
        let field_count = format_line.split(',').count();

        let mut cues = Vec::new();
        for (index, line) in lines.skip_while(|(_, line)| !is_dialogue(line)) {
            // Dialogue lines must be contiguous; anything else ends the event list
            if !is_dialogue(line) {
                break;
            }
            cues.push(Self::parse_dialogue(index + 1, line, field_count)?);
        }

        debug!("Parsed {} ASS dialogue lines ({} fields each)", cues.len(), field_count);
        Ok(cues)
    }

    fn write(&self, cues: &[Cue], writer: &mut dyn Write) -> io::Result<()> {
        for line in SCRIPT_HEADER {
            write_line(writer, line)?;
        }
        for cue in cues {
            write_line(
                writer,
                &format!(
                    "Dialogue: 0,{},{},Default,,0,0,0,,{}",
                    format_ass_timestamp(cue.begin),
                    format_ass_timestamp(cue.end),
                    render_text(&cue.runs)
                ),
            )?;
        }
        writer.flush()
    }
}
