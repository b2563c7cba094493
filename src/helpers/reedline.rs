use clap_repl::reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use colored::*;
use eyre::{Result, eyre};

pub fn read_line(prompt: &str) -> Result<String> {
    let mut rl = Reedline::create();
    match rl.read_line(&DefaultPrompt::new(
        DefaultPromptSegment::Basic(prompt.to_owned()),
        DefaultPromptSegment::Empty,
    ))? {
        Signal::Success(x) => Ok(x),
        _ => Err(eyre!("Cancelled")),
    }
}

pub fn confirm(prompt: &str, expected: &str) -> Result<bool> {
    Ok(is_confirmation(&read_line(prompt)?, expected))
}

/// Exact match, only surrounding whitespace is ignored
pub fn is_confirmation(input: &str, expected: &str) -> bool {
    input.trim() == expected
}

/// Reads a line without echoing it, used for secrets
pub fn read_password(prompt: &str) -> Result<String> {
    print!("{}", prompt.green());
    use termion::input::TermRead;
    let mut stdout = std::io::stdout().lock();
    let mut stdin = std::io::stdin().lock();
    let password = stdin.read_passwd(&mut stdout)?;
    match password {
        Some(password) => Ok(password),
        None => Err(eyre!("Cancelled")),
    }
}

pub fn unwrap_or_prompt_for_secret(value: &Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value.clone()),
        None => read_password(prompt),
    }
}

pub fn unwrap_or_prompt_for_password(password: &Option<String>, prompt: &str) -> Result<String> {
    match password {
        // Explicitly supplied passwords are not confirmed
        Some(password) => Ok(password.clone()),
        None => {
            let password = read_password(prompt)?;
            match password == read_password("Please confirm your password.\n")? {
                true => Ok(password),
                false => Err(eyre!("Passwords do not match!")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_is_case_sensitive() {
        assert!(is_confirmation("YES", "YES"));
        assert!(is_confirmation("  YES\n", "YES"));
        assert!(!is_confirmation("yes", "YES"));
        assert!(!is_confirmation("Yes", "YES"));
        assert!(!is_confirmation("", "YES"));
    }

    #[test]
    fn supplied_secrets_skip_the_prompt() {
        let value = Some("secret".to_string());
        assert_eq!(unwrap_or_prompt_for_secret(&value, "").unwrap(), "secret");
        assert_eq!(unwrap_or_prompt_for_password(&value, "").unwrap(), "secret");
    }
}
