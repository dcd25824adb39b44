//! Interactive prompts for age and sex
//!
//! Both prompts repeat until the answer parses. End of input is an error
//! rather than an endless loop.

use std::io::{self, BufRead, Write};

use crate::table::Sex;

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

/// Ask for a whole-number age; no upper bound is imposed
pub fn prompt_age<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<u32> {
    loop {
        let answer = read_answer(input, output, "Enter your age: ")?;
        match answer.parse::<u32>() {
            Ok(age) => return Ok(age),
            Err(_) => writeln!(output, "'{}' is not a valid age.", answer)?,
        }
    }
}

/// Ask for `m` or `f`
pub fn prompt_sex<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Sex> {
    loop {
        let answer = read_answer(input, output, "Enter your sex (m/f): ")?;
        match parse_sex_selector(&answer) {
            Some(sex) => return Ok(sex),
            None => writeln!(output, "Please answer 'm' or 'f'.")?,
        }
    }
}

/// Single-character sex selector, case-insensitive
pub fn parse_sex_selector(answer: &str) -> Option<Sex> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "m" => Some(Sex::Male),
        "f" => Some(Sex::Female),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_age_reprompts() {
        let mut input = Cursor::new("abc\n-4\n 42 \n");
        let mut output = Vec::new();

        let age = prompt_age(&mut input, &mut output).unwrap();
        assert_eq!(age, 42);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Enter your age: ").count(), 3);
        assert!(text.contains("'abc' is not a valid age."));
    }

    #[test]
    fn test_prompt_age_accepts_large_values() {
        let mut input = Cursor::new("250\n");
        assert_eq!(prompt_age(&mut input, &mut io::sink()).unwrap(), 250);
    }

    #[test]
    fn test_prompt_sex_reprompts() {
        let mut input = Cursor::new("x\nall\nF\n");
        let mut output = Vec::new();

        assert_eq!(prompt_sex(&mut input, &mut output).unwrap(), Sex::Female);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Please answer 'm' or 'f'.").count(), 2);
    }

    #[test]
    fn test_prompt_eof_is_error() {
        let mut input = Cursor::new("");
        let err = prompt_sex(&mut input, &mut io::sink()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_selector_has_no_all_option() {
        assert_eq!(parse_sex_selector("m"), Some(Sex::Male));
        assert_eq!(parse_sex_selector("a"), None);
        assert_eq!(parse_sex_selector(""), None);
    }
}
