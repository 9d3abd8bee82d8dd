use chrono::TimeDelta;
use log::debug;
use std::io::{self, Write};

use super::{write_line, SubtitleCodec};
use crate::cue::Cue;
use crate::errors::SubtitleError;
use crate::markup::{decompose, Attribute, Directive, InlineSyntax, MarkupRun, StyleChange, TextStyle};
use crate::timestamp::{format_srt_timestamp, parse_timestamp};

// @module: SubRip (.srt) codec

// @const: Separator between begin and end on a timing line
const TIME_SEPARATOR: &str = " --> ";

// @const: Opening of a font color tag, up to and including the quote
const FONT_COLOR_PREFIX: &str = "font color=\"";

/// SRT inline tags: `<b>`, `</b>`, ..., `<font color="...">`, `</font>`
pub struct SrtSyntax;

impl InlineSyntax for SrtSyntax {
    const OPEN: char = '<';
    const CLOSE: char = '>';

    fn directive(token: &str) -> Option<Directive> {
        let change = match token {
            "b" => StyleChange::Set(Attribute::Bold),
            "i" => StyleChange::Set(Attribute::Italic),
            "u" => StyleChange::Set(Attribute::Underline),
            "s" => StyleChange::Set(Attribute::Strikethrough),
            "/b" => StyleChange::Clear(Attribute::Bold),
            "/i" => StyleChange::Clear(Attribute::Italic),
            "/u" => StyleChange::Clear(Attribute::Underline),
            "/s" => StyleChange::Clear(Attribute::Strikethrough),
            "/font" => return Some(Directive::PopColor),
            _ => {
                // The color ends one character before the token does (the closing quote)
                let rest = token.strip_prefix(FONT_COLOR_PREFIX)?;
                let mut chars = rest.chars();
                chars.next_back()?;
                return Some(Directive::PushColor(chars.as_str().to_string()));
            }
        };
        Some(Directive::Style(change))
    }
}

fn tag(change: StyleChange) -> &'static str {
    match change {
        StyleChange::Set(Attribute::Bold) => "<b>",
        StyleChange::Set(Attribute::Italic) => "<i>",
        StyleChange::Set(Attribute::Underline) => "<u>",
        StyleChange::Set(Attribute::Strikethrough) => "<s>",
        StyleChange::Clear(Attribute::Bold) => "</b>",
        StyleChange::Clear(Attribute::Italic) => "</i>",
        StyleChange::Clear(Attribute::Underline) => "</u>",
        StyleChange::Clear(Attribute::Strikethrough) => "</s>",
    }
}

/// Append the tags that move from one style/color state to another.
///
/// The font tag wraps the style tags: it opens before the style sets and closes
/// after the style clears.
fn push_transition(
    out: &mut String,
    (from_style, from_color): (TextStyle, Option<&str>),
    (to_style, to_color): (TextStyle, Option<&str>),
) {
    let changes = from_style.transition_to(to_style);
    let (clears, sets): (Vec<_>, Vec<_>) = changes
        .into_iter()
        .partition(|change| matches!(change, StyleChange::Clear(_)));

    for change in clears {
        out.push_str(tag(change));
    }
    if from_color != to_color {
        if from_color.is_some() {
            out.push_str("</font>");
        }
        if let Some(color) = to_color {
            out.push_str(&format!("<font color=\"{}\">", color));
        }
    }
    for change in sets {
        out.push_str(tag(change));
    }
}

/// Rebuild tagged SRT text from runs, closing everything at the end
pub fn render_text(runs: &[MarkupRun]) -> String {
    let mut out = String::new();
    let mut state = (TextStyle::empty(), None);

    for run in runs {
        let next = (run.style(), run.color());
        push_transition(&mut out, state, next);
        out.push_str(run.content());
        state = next;
    }
    push_transition(&mut out, state, (TextStyle::empty(), None));

    out
}

/// Parse the begin/end pair of a timing line.
///
/// Tokens 0 and 2 after whitespace splitting are the bounds; whatever sits in
/// position 1 is not checked.
fn parse_time_range(line: &str) -> Option<(TimeDelta, TimeDelta)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }
    Some((parse_timestamp(tokens[0])?, parse_timestamp(tokens[2])?))
}

/// SubRip codec
pub struct SrtCodec;

impl SubtitleCodec for SrtCodec {
    fn parse(&self, text: &str) -> Result<Vec<Cue>, SubtitleError> {
        let mut cues = Vec::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            // Index numbers and stray text are skipped until a timing line shows up
            if !line.contains(TIME_SEPARATOR) {
                continue;
            }

            let (begin, end) =
                parse_time_range(line).ok_or_else(|| SubtitleError::MalformedTimestamp {
                    line: index + 1,
                    value: line.to_string(),
                })?;

            let mut block = Vec::new();
            for (_, text_line) in lines.by_ref() {
                if text_line.is_empty() {
                    break;
                }
                block.push(text_line);
            }
            let raw = block.join("\r\n");

            cues.push(Cue {
                begin,
                end,
                runs: decompose::<SrtSyntax>(raw.trim_end_matches(['\r', '\n'])),
            });
        }

        if cues.is_empty() {
            return Err(SubtitleError::NoCues);
        }

        debug!("Parsed {} SRT cues", cues.len());
        Ok(cues)
    }

    fn write(&self, cues: &[Cue], writer: &mut dyn Write) -> io::Result<()> {
        for (i, cue) in cues.iter().enumerate() {
            write_line(writer, &(i + 1).to_string())?;
            write_line(
                writer,
                &format!(
                    "{}{}{}",
                    format_srt_timestamp(cue.begin),
                    TIME_SEPARATOR,
                    format_srt_timestamp(cue.end)
                ),
            )?;
            write_line(writer, &render_text(&cue.runs))?;
            write_line(writer, "")?;
        }
        writer.flush()
    }
}
