use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveTime;

use crate::error::CaptionError;
use crate::models::{Caption, CaptionTrack};

/// Read a WebVTT file into a caption track
pub fn read_vtt_file(path: &Path) -> Result<CaptionTrack> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_vtt(&content).with_context(|| format!("Failed to parse captions in {:?}", path))
}

/// Write a caption track back to disk, replacing the file
pub fn write_vtt_file(path: &Path, track: &CaptionTrack) -> Result<()> {
    std::fs::write(path, export_vtt(track))
        .with_context(|| format!("Failed to write file: {:?}", path))
}

/// Parse WebVTT content
///
/// ```text
/// WEBVTT
///
/// 1
/// 00:00:01.000 --> 00:00:04.000
/// First caption text
/// ```
pub fn parse_vtt(content: &str) -> Result<CaptionTrack, CaptionError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().enumerate().peekable();

    let header: Vec<String> = match lines.next() {
        Some((_, first)) if first.starts_with("WEBVTT") => {
            let mut header = vec![first.to_string()];
            while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
                header.push(line.to_string());
            }
            header
        }
        _ => return Err(CaptionError::invalid_format("missing WEBVTT signature")),
    };

    let mut blocks = Vec::new();
    let mut captions = Vec::new();

    loop {
        while lines.next_if(|(_, l)| l.trim().is_empty()).is_some() {}
        let Some((number, first)) = lines.next() else {
            break;
        };

        // Comments are dropped; style and region definitions are kept as written
        if let Some(keyword) = block_keyword(first) {
            let mut block = vec![first];
            while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
                block.push(line);
            }
            if keyword != "NOTE" {
                blocks.push(block.join("\n"));
            }
            continue;
        }

        let (identifier, (timing_number, timing)) = if first.contains("-->") {
            (None, (number, first))
        } else {
            let timing = lines
                .next()
                .ok_or_else(|| CaptionError::invalid_format(format!("cue {first:?} has no timing line")))?;
            (Some(first.to_string()), timing)
        };

        let (start, end, settings) = parse_timing_line(timing, timing_number + 1)?;

        let mut text_lines = Vec::new();
        while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
            text_lines.push(line);
        }

        captions.push(Caption {
            identifier,
            start,
            end,
            settings,
            text: text_lines.join("\n"),
        });
    }

    Ok(CaptionTrack {
        header,
        blocks,
        captions,
    })
}

/// `NOTE`, `STYLE` or `REGION` when `line` opens such a block
fn block_keyword(line: &str) -> Option<&'static str> {
    ["NOTE", "STYLE", "REGION"].into_iter().find(|keyword| {
        line.strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
    })
}

/// Parse `start --> end [settings]`
fn parse_timing_line(
    line: &str,
    line_number: usize,
) -> Result<(NaiveTime, NaiveTime, Option<String>), CaptionError> {
    let Some((start, rest)) = line.split_once("-->") else {
        return Err(CaptionError::invalid_format(format!(
            "expected 'start --> end' on line {line_number}: {line:?}"
        )));
    };

    let rest = rest.trim();
    let (end, settings) = match rest.split_once(char::is_whitespace) {
        Some((end, settings)) => (end, Some(settings.trim().to_string())),
        None => (rest, None),
    };

    Ok((
        parse_timestamp(start.trim(), line_number)?,
        parse_timestamp(end, line_number)?,
        settings.filter(|s| !s.is_empty()),
    ))
}

/// Parse `hh:mm:ss.fff` or `mm:ss.fff`
pub fn parse_timestamp(value: &str, line: usize) -> Result<NaiveTime, CaptionError> {
    let invalid = || CaptionError::InvalidTimestamp {
        value: value.to_string(),
        line,
    };

    let full = match value.matches(':').count() {
        1 => format!("00:{value}"),
        2 => value.to_string(),
        _ => return Err(invalid()),
    };
    if !full.contains('.') {
        return Err(invalid());
    }

    NaiveTime::parse_from_str(&full, "%H:%M:%S%.f").map_err(|_| invalid())
}

/// Format a time as `hh:mm:ss.fff`
pub fn format_timestamp(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.3f").to_string()
}

/// Render a caption track as WebVTT
pub fn export_vtt(track: &CaptionTrack) -> String {
    let mut output = track.header.join("\n");
    if output.is_empty() {
        output.push_str("WEBVTT");
    }
    output.push('\n');

    for block in &track.blocks {
        output.push('\n');
        output.push_str(block);
        output.push('\n');
    }

    for caption in &track.captions {
        output.push('\n');
        if let Some(identifier) = &caption.identifier {
            output.push_str(identifier);
            output.push('\n');
        }
        output.push_str(&format_timestamp(caption.start));
        output.push_str(" --> ");
        output.push_str(&format_timestamp(caption.end));
        if let Some(settings) = &caption.settings {
            output.push(' ');
            output.push_str(settings);
        }
        output.push('\n');
        if !caption.text.is_empty() {
            output.push_str(&caption.text);
            output.push('\n');
        }
    }

    output
}
