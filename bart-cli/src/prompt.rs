//! Participant and session entry before the task starts.
use std::io::{self, BufRead, Write};

use bart_task::SessionInfo;
use bart_task::constants::{DEFAULT_PARTICIPANT, DEFAULT_SESSION};
use colored::Colorize;

const CANCEL_TOKEN: &str = "escape";

/// Ask for whichever identifiers were not given on the command line.
///
/// An empty answer keeps the default. Answering `escape`, or closing input,
/// cancels the whole dialog and yields `None`.
pub fn session_info<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    participant: Option<String>,
    session: Option<String>,
) -> io::Result<Option<SessionInfo>> {
    if participant.is_none() || session.is_none() {
        writeln!(output, "{}", "BART Session Info".bright_cyan().bold())?;
    }
    let participant = match participant {
        Some(value) => value,
        None => match ask(input, output, "Participant", DEFAULT_PARTICIPANT)? {
            Some(value) => value,
            None => return Ok(None),
        },
    };
    let session = match session {
        Some(value) => value,
        None => match ask(input, output, "Session", DEFAULT_SESSION)? {
            Some(value) => value,
            None => return Ok(None),
        },
    };
    Ok(Some(SessionInfo::new(participant, session)))
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    default: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label} [{}]: ", default.dimmed())?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    if answer.eq_ignore_ascii_case(CANCEL_TOKEN) {
        return Ok(None);
    }
    if answer.is_empty() {
        return Ok(Some(default.to_string()));
    }
    Ok(Some(answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, participant: Option<&str>, session: Option<&str>) -> Option<SessionInfo> {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        session_info(
            &mut input,
            &mut output,
            participant.map(str::to_string),
            session.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn empty_answers_keep_defaults() {
        let info = run("\n\n", None, None).unwrap();
        assert_eq!(info, SessionInfo::new("P001", "001"));
    }

    #[test]
    fn typed_answers_are_trimmed() {
        let info = run("  P017 \n 003\n", None, None).unwrap();
        assert_eq!(info, SessionInfo::new("P017", "003"));
    }

    #[test]
    fn command_line_values_skip_questions() {
        let info = run("", Some("P100"), None);
        assert_eq!(info, None);
        let info = run("004\n", Some("P100"), None).unwrap();
        assert_eq!(info, SessionInfo::new("P100", "004"));
        let info = run("", Some("P100"), Some("009")).unwrap();
        assert_eq!(info.session, "009");
    }

    #[test]
    fn escape_cancels() {
        assert_eq!(run("P005\nESCAPE\n", None, None), None);
    }
}
