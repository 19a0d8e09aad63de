/// Number of log file names available, `LOGGER00.CSV` to `LOGGER99.CSV`
pub const MAX_LOG_FILES: u8 = 100;

/// An 8.3 file name
pub type LogFileName = heapless::String<12>;

const PREFIX: &str = "LOGGER";
const EXTENSION: &str = ".CSV";

/// Build the name for log file `index`. Only the last two decimal digits of
/// `index` are used.
pub fn log_file_name(index: u8) -> LogFileName {
    let mut name = LogFileName::new();
    let digits = [b'0' + index / 10 % 10, b'0' + index % 10];
    // 6 + 2 + 4 characters, always fits
    let _ = name.push_str(PREFIX);
    for digit in digits {
        let _ = name.push(digit as char);
    }
    let _ = name.push_str(EXTENSION);
    name
}

/// Find the lowest-numbered log file name that doesn't exist yet.
///
/// `exists` is asked about names in ascending order until it answers
/// `false`. Returns `Ok(None)` when all names are taken.
pub fn first_unused_name<E, F>(mut exists: F) -> Result<Option<LogFileName>, E>
where
    F: FnMut(&str) -> Result<bool, E>,
{
    for index in 0..MAX_LOG_FILES {
        let name = log_file_name(index);
        if !exists(name.as_str())? {
            return Ok(Some(name));
        }
    }
    Ok(None)
}
