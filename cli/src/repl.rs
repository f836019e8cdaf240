use std::io::Write;

const PROMPT: &str = "conflux> ";

/// Print the prompt and read one line from stdin.
///
/// End of input reads as `exit` so piped scripts terminate cleanly.
pub fn readline() -> Result<String, String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{PROMPT}").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())?;

    let mut buffer = String::new();
    let read = std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Ok("exit".to_string());
    }
    Ok(buffer)
}
