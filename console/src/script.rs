//! Script directives understood by the console.

/// One line of a console script.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `send <text>`: send a command line (the rest of the line, verbatim).
    Send(String),
    /// `readln`: read one line from the server.
    ReadLine,
    /// `readi <n>`: read `n` integers.
    ReadInts(usize),
    /// `readd <n>`: read `n` doubles.
    ReadFloats(usize),
    /// `writei <v>...`: write integers.
    WriteInts(Vec<i32>),
    /// `writed <v>...`: write doubles.
    WriteFloats(Vec<f64>),
    /// `close`: close the channel and stop.
    Close,
}

impl Directive {
    /// Parse one script line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let trimmed = line.trim_start();
        if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest),
            None => (trimmed.trim_end(), ""),
        };

        let directive = match keyword {
            // Everything after the single separator is the command, spaces included.
            "send" => Directive::Send(rest.to_string()),
            "readln" => {
                no_arguments(keyword, rest)?;
                Directive::ReadLine
            }
            "readi" => Directive::ReadInts(parse_count(keyword, rest)?),
            "readd" => Directive::ReadFloats(parse_count(keyword, rest)?),
            "writei" => Directive::WriteInts(parse_values(keyword, rest)?),
            "writed" => Directive::WriteFloats(parse_values(keyword, rest)?),
            "close" => {
                no_arguments(keyword, rest)?;
                Directive::Close
            }
            other => return Err(format!("unknown directive `{}`", other)),
        };

        Ok(Some(directive))
    }
}

fn no_arguments(keyword: &str, rest: &str) -> Result<(), String> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(format!("`{}` takes no arguments", keyword))
    }
}

fn parse_count(keyword: &str, rest: &str) -> Result<usize, String> {
    let mut words = rest.split_whitespace();
    let count = words
        .next()
        .ok_or_else(|| format!("`{}` needs an element count", keyword))?;
    if words.next().is_some() {
        return Err(format!("`{}` takes exactly one count", keyword));
    }
    count
        .parse()
        .map_err(|e| format!("`{}` count {:?}: {}", keyword, count, e))
}

fn parse_values<T>(keyword: &str, rest: &str) -> Result<Vec<T>, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    rest.split_whitespace()
        .map(|word| {
            word.parse()
                .map_err(|e| format!("`{}` value {:?}: {}", keyword, word, e))
        })
        .collect()
}

/// Render array values the way the console prints them: space separated.
pub fn join_values<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
