//! Small wrappers around dialoguer prompts.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::{Input, Password};

use super::{CommandError, Result};

/// Fails with a hint about `flag` unless stdin is a terminal.
pub fn require_terminal(flag: &str) -> Result<()> {
    if io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CommandError::Config(format!(
            "not running interactively; pass {}",
            flag
        )))
    }
}

/// Returns `value` or asks for it. Blank answers are rejected by the prompt.
pub fn text_or_prompt(value: Option<&str>, prompt: &str, flag: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value.trim().to_string());
    }
    require_terminal(flag)?;
    let answer: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("value cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(answer.trim().to_string())
}

/// Asks for a password without echo.
pub fn password(prompt: &str) -> Result<String> {
    require_terminal("--password-stdin")?;
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Reads a password from the first line of stdin.
pub fn password_from_stdin() -> Result<String> {
    read_password_line(io::stdin().lock())
}

fn read_password_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(CommandError::Config(
            "no password received on stdin".to_string(),
        ));
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_password_line_strips_newline_only() {
        let password = read_password_line(" s3cret \n".as_bytes()).unwrap();
        assert_eq!(password, " s3cret ");

        let password = read_password_line("pw\r\nignored\n".as_bytes()).unwrap();
        assert_eq!(password, "pw");
    }

    #[test]
    fn test_read_password_line_rejects_empty_input() {
        assert!(read_password_line("".as_bytes()).is_err());
        assert!(read_password_line("\n".as_bytes()).is_err());
    }

    #[test]
    fn test_text_or_prompt_uses_given_value() {
        let value = text_or_prompt(Some("  a@b.c "), "Email", "--email").unwrap();
        assert_eq!(value, "a@b.c");
    }
}
