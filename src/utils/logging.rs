use crate::core::message::{Message, MessageRole};
use std::error::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends the conversation to a user-chosen file as it happens.
#[derive(Debug, Default)]
pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// A path given up front (`--log`) starts logging immediately.
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn Error>> {
        let mut logging = LoggingState::default();
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn Error>> {
        // Fail now rather than on the first message.
        OpenOptions::new().create(true).append(true).open(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;
        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn Error>> {
        match &self.file_path {
            Some(path) => {
                self.is_active = !self.is_active;
                if self.is_active {
                    Ok(format!("Logging resumed to: {path}"))
                } else {
                    Ok(format!("Logging paused (file: {path})"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    pub fn log_message(&self, message: &Message) -> Result<(), Box<dyn Error>> {
        let Some(path) = self.file_path.as_deref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", format_entry(message))?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        let file_name = |path: &str| {
            Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }
}

fn format_entry(message: &Message) -> String {
    let time = message.timestamp.format("%H:%M");
    match message.role {
        MessageRole::User => format!("[{time}] You: {}", message.content),
        MessageRole::Assistant | MessageRole::Processing => {
            format!("[{time}] Agent:\n{}", message.content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageId;
    use tempfile::TempDir;

    #[test]
    fn inactive_logger_writes_nothing() {
        let logging = LoggingState::new(None).unwrap();
        assert!(!logging.is_active());
        assert_eq!(logging.get_status_string(), "disabled");
        logging
            .log_message(&Message::user(MessageId(1), "hello"))
            .unwrap();
    }

    #[test]
    fn logs_user_and_agent_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.log");
        let path_str = path.to_string_lossy().into_owned();
        let logging = LoggingState::new(Some(path_str)).unwrap();
        assert!(logging.is_active());
        assert_eq!(logging.get_status_string(), "active (chat.log)");

        logging
            .log_message(&Message::user(MessageId(1), "Search for Python tutorials"))
            .unwrap();
        logging
            .log_message(&Message::assistant(MessageId(2), "Here are five tutorials."))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].ends_with("] You: Search for Python tutorials"));
        assert!(lines[2].ends_with("] Agent:"));
        assert_eq!(lines[3], "Here are five tutorials.");
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.log");
        let mut logging = LoggingState::default();
        assert!(logging.toggle_logging().is_err());

        logging
            .set_log_file(path.to_string_lossy().into_owned())
            .unwrap();
        let paused = logging.toggle_logging().unwrap();
        assert!(paused.starts_with("Logging paused"));
        logging
            .log_message(&Message::user(MessageId(1), "not logged"))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        let resumed = logging.toggle_logging().unwrap();
        assert!(resumed.starts_with("Logging resumed"));
    }

    #[test]
    fn unwritable_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("chat.log");
        let mut logging = LoggingState::default();
        assert!(logging
            .set_log_file(path.to_string_lossy().into_owned())
            .is_err());
        assert!(!logging.is_active());
    }
}
