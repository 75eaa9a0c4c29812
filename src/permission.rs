use crate::config::Config;
use std::io::{BufRead, IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Not asked yet
    NotDetermined,
}

/// Gate in front of microphone access
pub trait MicrophonePermission {
    fn status(&self) -> PermissionStatus;

    /// Ask the user. Returns the resulting status.
    fn request(&mut self) -> PermissionStatus;
}

/// Asks once on the terminal and remembers a grant in the config file
pub struct PromptPermission {
    config: Config,
    status: PermissionStatus,
}

impl PromptPermission {
    pub fn new(config: Config) -> Self {
        let status = match config.microphone_access {
            Some(true) => PermissionStatus::Granted,
            _ => PermissionStatus::NotDetermined,
        };
        Self { config, status }
    }

    fn persist_grant(&mut self) {
        self.config.microphone_access = Some(true);
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to remember microphone permission: {:#}", e);
        }
    }
}

impl MicrophonePermission for PromptPermission {
    fn status(&self) -> PermissionStatus {
        self.status
    }

    fn request(&mut self) -> PermissionStatus {
        if self.status == PermissionStatus::Granted {
            return self.status;
        }

        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            let config = Config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string());
            tracing::warn!(
                "No terminal to ask for microphone access; set \"microphone_access\": true in {}",
                config
            );
            self.status = PermissionStatus::Denied;
            return self.status;
        }

        print!("Allow voicerecord to use the microphone? [y/N] ");
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        let granted = match stdin.lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!("Failed to read permission answer: {}", e);
                false
            }
        };

        if granted {
            self.status = PermissionStatus::Granted;
            self.persist_grant();
        } else {
            self.status = PermissionStatus::Denied;
        }
        tracing::info!("Microphone permission: {:?}", self.status);
        self.status
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("  YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn test_status_from_config() {
        let mut config = Config::default();
        assert_eq!(
            PromptPermission::new(config.clone()).status(),
            PermissionStatus::NotDetermined
        );

        config.microphone_access = Some(true);
        let mut permission = PromptPermission::new(config);
        assert_eq!(permission.status(), PermissionStatus::Granted);
        // Already granted: no prompt
        assert_eq!(permission.request(), PermissionStatus::Granted);
    }
}
