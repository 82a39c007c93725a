//! Comment and identifier formatting shared by every dump section

/// Renders `--` comment lines, or nothing when comments are switched off
#[derive(Debug, Clone, Copy)]
pub struct SqlComments<'a> {
    crlf: &'a str,
    enabled: bool,
}

impl<'a> SqlComments<'a> {
    pub fn new(crlf: &'a str, enabled: bool) -> Self {
        Self { crlf, enabled }
    }

    pub fn crlf(&self) -> &'a str {
        self.crlf
    }

    /// `-- text` followed by the line terminator; an empty text gives `--`
    pub fn comment(&self, text: &str) -> String {
        if !self.enabled {
            return String::new();
        }
        if text.is_empty() {
            format!("--{}", self.crlf)
        } else {
            format!("-- {}{}", text, self.crlf)
        }
    }

    /// Bare `--` line
    pub fn blank(&self) -> String {
        self.comment("")
    }

    /// Line terminator, only when comments are on
    pub fn possible_crlf(&self) -> &'a str {
        if self.enabled { self.crlf } else { "" }
    }
}

/// Wrap an identifier in backquotes, doubling embedded ones
pub fn backquote(name: &str, enabled: bool) -> String {
    if enabled {
        format!("`{}`", name.replace('`', "``"))
    } else {
        name.to_string()
    }
}

/// Table name as shown in section headings
pub fn heading_name(name: &str, backquotes: bool) -> String {
    if backquotes {
        backquote(name, true)
    } else {
        format!("'{}'", name)
    }
}
