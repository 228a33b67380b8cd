//! Module containing the argument list used when launching
//! the devenv executable.
use std::fmt;

/// An ordered list of command line arguments, the first one
/// being the executable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    args: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument.
    pub fn add(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a flag followed by its value.
    pub fn add_pair(&mut self, flag: &str, value: impl Into<String>) -> &mut Self {
        self.add(flag).add(value)
    }

    pub fn args(&self) -> &[String] {
        self.args.as_slice()
    }

    /// Wraps the arguments in a `cmd.exe /C` invocation so that the exit
    /// code of the command survives on windows.
    ///
    /// When `escape_vars` is set, `%NAME` sequences are broken up so that
    /// cmd.exe does not expand them.
    ///
    /// # Examples
    ///
    /// ```
    /// use devenv::ArgumentList;
    ///
    /// let mut args = ArgumentList::new();
    /// args.add("devenv.com").add("My App.sln");
    /// assert_eq!(
    ///     args.to_windows_command(false).args(),
    ///     ["cmd.exe", "/C", "\"devenv.com", "\"My App.sln\"", "&&", "exit", "%%ERRORLEVEL%%\""]
    /// );
    /// ```
    pub fn to_windows_command(&self, escape_vars: bool) -> ArgumentList {
        let mut command = ArgumentList::new();
        command.add("cmd.exe").add("/C");
        for (i, arg) in self.args.iter().enumerate() {
            let mut quoted = windows_quote(arg, escape_vars);
            // Opens the quote around the whole /C payload.
            if i == 0 {
                quoted.insert(0, '"');
            }
            command.add(quoted);
        }
        command.add("&&").add("exit").add("%%ERRORLEVEL%%\"");
        command
    }
}

impl fmt::Display for ArgumentList {
    /// Formats the arguments the way they are written to the build log.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if arg.is_empty() || arg.contains(' ') {
                write!(f, "\"{arg}\"")?;
            } else {
                f.write_str(arg)?;
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ArgumentList {
            args: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// Quotes a single argument for the cmd.exe command line.
fn windows_quote(arg: &str, escape_vars: bool) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    let mut quoted = false;
    let mut percent = false;
    for mut c in arg.chars() {
        match c {
            ' ' | '*' | '?' | ',' | ';' | '^' | '&' | '<' | '>' | '|' => quoted = true,
            '"' => {
                quoted = true;
                out.push('"');
            }
            _ if percent && escape_vars && c.is_ascii_alphabetic() => {
                quoted = true;
                out.push('"');
                out.push(c);
                c = '"';
            }
            _ => {}
        }
        percent = c == '%';
        out.push(c);
    }
    if quoted {
        format!("\"{out}\"")
    } else {
        out
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Unit tests of the private functions and methods
// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_windows_quote_plain_argument() {
        assert_eq!(windows_quote("/rebuild", true), "/rebuild");
    }

    #[test]
    fn test_windows_quote_special_characters() {
        assert_eq!(windows_quote("My App.sln", false), "\"My App.sln\"");
        assert_eq!(windows_quote("Debug|x64", false), "\"Debug|x64\"");
        assert_eq!(windows_quote("say \"hi\"", false), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_windows_quote_percent_variables() {
        assert_eq!(windows_quote("%CONFIG%", false), "%CONFIG%");
        assert_eq!(windows_quote("%CONFIG%", true), "\"%\"C\"ONFIG%\"");
        // A percent followed by something other than a letter is kept.
        assert_eq!(windows_quote("100%1", true), "100%1");
    }

    #[test]
    fn test_to_windows_command_quoted_executable() {
        let args: ArgumentList = ["C:\\Program Files\\devenv.com", "/clean"].into_iter().collect();
        assert_eq!(
            args.to_windows_command(true).args(),
            [
                "cmd.exe",
                "/C",
                "\"\"C:\\Program Files\\devenv.com\"",
                "/clean",
                "&&",
                "exit",
                "%%ERRORLEVEL%%\"",
            ]
        );
    }

    #[test]
    fn test_display_quotes_spaces_and_empty_arguments() {
        let args: ArgumentList = ["devenv.com", "My App.sln", "", "/rebuild"].into_iter().collect();
        assert_eq!(args.to_string(), "devenv.com \"My App.sln\" \"\" /rebuild");
    }
}
