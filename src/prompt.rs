//! Interactive stdin prompts

use std::io::{self, Write};

use crate::error::Result;

/// Print `label`, flush, and read one trimmed line from stdin.
pub fn read_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
