//! Interactive user prompting

use std::io::{self, BufRead, Write};

use crate::error::Result;

/// Prompt user for yes/no confirmation
///
/// # Arguments
/// * `prompt` - The prompt message to display (without [y/N] suffix)
///
/// # Returns
/// * `true` if user confirms with 'y' or 'Y'
/// * `false` otherwise, including when stdin is closed
///
/// # Example
/// ```no_run
/// # use ticketdesk::commands::interactive::confirm;
/// let confirmed = confirm("Are you sure you want to delete").unwrap();
/// if confirmed {
///     // proceed with deletion
/// }
/// ```
pub fn confirm(prompt: &str) -> Result<bool> {
    confirm_with(prompt, &mut io::stdout(), &mut io::stdin().lock())
}

/// Like [`confirm`], but the prompt goes to stderr so stdout stays machine-readable.
pub fn confirm_on_stderr(prompt: &str) -> Result<bool> {
    confirm_with(prompt, &mut io::stderr(), &mut io::stdin().lock())
}

fn confirm_with(prompt: &str, out: &mut impl Write, input: &mut impl BufRead) -> Result<bool> {
    write!(out, "{}? [y/N] ", prompt)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(is_affirmative(&answer))
}

fn is_affirmative(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
