//! User input utilities for interactive command-line prompts.
//!
//! Each prompt has a pure `parse_*` counterpart so answers can be checked
//! without a terminal.

use std::io::{self, Write};

use anyhow::{Context, Result};

/// Prompts the user for a string input.
///
/// The input is read from stdin and returned with whitespace trimmed.
pub fn prompt_string(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush().ok();

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;

    Ok(input.trim().to_string())
}

/// Prompts the user for a string input with a default value.
///
/// If the user just presses Enter, the default value is returned.
pub fn prompt_string_with_default(prompt: &str, default: Option<&str>) -> Result<String> {
    let input = match default {
        Some(default_val) => prompt_string(&format!("{prompt} [{default_val}]"))?,
        None => prompt_string(prompt)?,
    };

    if input.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(input)
    }
}

/// Prompts the user for a yes/no confirmation. Empty input is 'no'.
pub fn prompt_confirmation(prompt: &str) -> Result<bool> {
    prompt_yes_no(prompt, false)
}

/// Prompts for yes/no, returning `default` on empty input.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        let input = prompt_string(&format!("{prompt} ({hint})"))?;
        match parse_yes_no(&input, default) {
            Some(answer) => return Ok(answer),
            None => eprintln!("Please enter 'y' for yes or 'n' for no."),
        }
    }
}

/// Prompts for an integer in `min..=max`, returning `default` on empty input.
pub fn prompt_number_in_range(prompt: &str, min: u32, max: u32, default: u32) -> Result<u32> {
    loop {
        let input = prompt_string(&format!("{prompt} ({min}-{max}) [{default}]"))?;
        match parse_number_in_range(&input, min, max, default) {
            Some(value) => return Ok(value),
            None => eprintln!("Please enter a number between {min} and {max}."),
        }
    }
}

/// Prompts the user to pick one of `options` by number or by name.
///
/// Returns the index of the chosen option.
pub fn prompt_choice(prompt: &str, options: &[&str], default: usize) -> Result<usize> {
    println!("{prompt}");
    for (i, option) in options.iter().enumerate() {
        let marker = if i == default { " (default)" } else { "" };
        println!("  {}. {option}{marker}", i + 1);
    }
    loop {
        let input = prompt_string(&format!("Choose 1-{}", options.len()))?;
        match parse_choice(&input, options, default) {
            Some(index) => return Ok(index),
            None => eprintln!("Please enter a number between 1 and {}.", options.len()),
        }
    }
}

/// Parse a yes/no answer. Empty input gives `default`; anything else unknown is `None`.
pub fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parse an integer in `min..=max`. Empty input gives `default`.
pub fn parse_number_in_range(input: &str, min: u32, max: u32, default: u32) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(default);
    }
    trimmed
        .parse::<u32>()
        .ok()
        .filter(|value| (min..=max).contains(value))
}

/// Parse a menu answer: a 1-based number or an option name (case-insensitive).
pub fn parse_choice(input: &str, options: &[&str], default: usize) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(default);
    }
    if let Ok(n) = trimmed.parse::<usize>() {
        return (1..=options.len()).contains(&n).then(|| n - 1);
    }
    options
        .iter()
        .position(|option| option.eq_ignore_ascii_case(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("", true), Some(true));
        assert_eq!(parse_yes_no("", false), Some(false));
        assert_eq!(parse_yes_no(" YES ", false), Some(true));
        assert_eq!(parse_yes_no("n", true), Some(false));
        assert_eq!(parse_yes_no("maybe", true), None);
    }

    #[test]
    fn test_parse_number_in_range() {
        assert_eq!(parse_number_in_range("", 1, 10, 2), Some(2));
        assert_eq!(parse_number_in_range("4", 1, 10, 2), Some(4));
        assert_eq!(parse_number_in_range("10", 1, 10, 2), Some(10));
        assert_eq!(parse_number_in_range("0", 1, 10, 2), None);
        assert_eq!(parse_number_in_range("11", 1, 10, 2), None);
        assert_eq!(parse_number_in_range("four", 1, 10, 2), None);
    }

    #[test]
    fn test_parse_choice() {
        let options = ["flac", "mp3", "m4a"];
        assert_eq!(parse_choice("", &options, 0), Some(0));
        assert_eq!(parse_choice("2", &options, 0), Some(1));
        assert_eq!(parse_choice("MP3", &options, 0), Some(1));
        assert_eq!(parse_choice("4", &options, 0), None);
        assert_eq!(parse_choice("0", &options, 0), None);
        assert_eq!(parse_choice("wav", &options, 0), None);
    }
}
