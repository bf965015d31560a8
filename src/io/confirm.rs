use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfirmError;

static PARTICIPANT_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P\d+\.(txt|vtt)$").expect("valid participant file pattern"));

/// Whether `path` is named like a participant transcript (`P12.vtt`)
pub fn is_participant_transcript(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| PARTICIPANT_FILE.is_match(name))
}

/// Whether `path` has a `.vtt` extension, in any case
pub fn is_vtt(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("vtt"))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question; anything but "y" or "yes" declines
pub fn confirm<R: BufRead, W: Write>(
    question: &str,
    target: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<(), ConfirmError> {
    write!(output, "{} (Y/N): ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    if is_yes(&answer) {
        Ok(())
    } else {
        Err(ConfirmError::Declined {
            target: target.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_transcript_names() {
        assert!(is_participant_transcript(Path::new("P12.vtt")));
        assert!(is_participant_transcript(Path::new("/data/P3.txt")));
        assert!(!is_participant_transcript(Path::new("P3.md")));
        assert!(!is_participant_transcript(Path::new("notes.txt")));
    }

    #[test]
    fn test_vtt_extension() {
        assert!(is_vtt(Path::new("a.vtt")));
        assert!(is_vtt(Path::new("a.VTT")));
        assert!(!is_vtt(Path::new("a.srt")));
        assert!(!is_vtt(Path::new("vtt")));
    }

    #[test]
    fn test_confirm_answers() {
        let target = Path::new("notes.md");
        let mut prompt = Vec::new();

        assert!(confirm("Sure?", target, &mut "Yes\n".as_bytes(), &mut prompt).is_ok());
        assert_eq!(String::from_utf8(prompt).unwrap(), "Sure? (Y/N): ");

        let declined = confirm("Sure?", target, &mut "nope\n".as_bytes(), &mut Vec::new());
        assert!(matches!(declined, Err(ConfirmError::Declined { .. })));

        let eof = confirm("Sure?", target, &mut "".as_bytes(), &mut Vec::new());
        assert!(matches!(eof, Err(ConfirmError::Declined { .. })));
    }
}
