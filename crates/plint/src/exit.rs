use std::process::ExitCode;

/// Process outcome plus an optional summary line printed on exit.
#[derive(Debug)]
pub struct Exit {
    code: u8,
    message: Option<String>,
}

impl Exit {
    #[must_use]
    pub fn success() -> Self {
        Self {
            code: 0,
            message: None,
        }
    }

    #[must_use]
    pub fn error() -> Self {
        Self {
            code: 1,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn process(self) -> ExitCode {
        if let Some(message) = &self.message {
            eprintln!("{message}");
        }
        ExitCode::from(self.code)
    }
}
