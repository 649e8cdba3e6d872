use chrono::{DateTime, Local};

/// One parsed control channel line.
#[derive(Debug, Clone)]
pub struct FtpRequest {
    /// The line as received, terminator stripped.
    pub line: String,
    /// Upper-cased verb; empty for a blank line.
    pub command: String,
    /// Everything after the first whitespace run following the verb.
    pub argument: String,
    pub received_at: DateTime<Local>,
}

impl FtpRequest {
    /// Parses a control line. Never fails: garbage becomes a verb that simply
    /// misses the registry.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        let (command, argument) = match trimmed.find(char::is_whitespace) {
            Some(idx) => (&trimmed[..idx], trimmed[idx..].trim_start()),
            None => (trimmed, ""),
        };

        Self {
            line: line.to_string(),
            command: command.to_ascii_uppercase(),
            argument: argument.to_string(),
            received_at: Local::now(),
        }
    }

    /// First whitespace separated token of the argument, used to pick
    /// OPTS and SITE sub-commands.
    pub fn sub_command(&self) -> Option<String> {
        self.argument
            .split_whitespace()
            .next()
            .map(|s| s.to_ascii_uppercase())
    }

    /// Argument remainder after the sub-command token.
    pub fn sub_argument(&self) -> &str {
        let arg = self.argument.trim_start();
        match arg.find(char::is_whitespace) {
            Some(idx) => arg[idx..].trim_start(),
            None => "",
        }
    }

    /// Line suitable for logs: PASS arguments are masked.
    pub fn loggable(&self) -> String {
        if self.command == "PASS" {
            "PASS ******".to_string()
        } else {
            self.line.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_and_argument() {
        let req = FtpRequest::parse("retr some file.txt\r\n");
        assert_eq!(req.command, "RETR");
        assert_eq!(req.argument, "some file.txt");
        assert_eq!(req.line, "retr some file.txt");
    }

    #[test]
    fn test_whitespace_run_is_consumed() {
        let req = FtpRequest::parse("CWD   \t/pub/a  b");
        assert_eq!(req.command, "CWD");
        assert_eq!(req.argument, "/pub/a  b");
    }

    #[test]
    fn test_no_argument() {
        let req = FtpRequest::parse("pwd");
        assert_eq!(req.command, "PWD");
        assert_eq!(req.argument, "");
    }

    #[test]
    fn test_empty_line() {
        let req = FtpRequest::parse("\r\n");
        assert_eq!(req.command, "");
        assert_eq!(req.argument, "");
    }

    #[test]
    fn test_sub_command() {
        let req = FtpRequest::parse("SITE who extra args");
        assert_eq!(req.sub_command().as_deref(), Some("WHO"));
        assert_eq!(req.sub_argument(), "extra args");
        assert_eq!(FtpRequest::parse("SITE").sub_command(), None);
    }

    #[test]
    fn test_password_is_masked() {
        let req = FtpRequest::parse("PASS hunter2");
        assert_eq!(req.loggable(), "PASS ******");
        assert_eq!(FtpRequest::parse("USER bob").loggable(), "USER bob");
    }
}
