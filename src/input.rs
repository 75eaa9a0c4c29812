use crate::messages::{Command, Control};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub const USAGE: &str = "Commands: record (r), play (p), stop (s), quit (q)";

/// Read control presses from stdin, one command per line.
///
/// Sends `Command::Quit` when stdin reaches EOF.
pub async fn monitor_stdin(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::debug!("stdin closed");
                let _ = tx.send(Command::Quit).await;
                return;
            }
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                let _ = tx.send(Command::Quit).await;
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Some(cmd) => {
                tracing::debug!("Command: {:?}", cmd);
                if tx.send(cmd).await.is_err() {
                    return;
                }
            }
            None => println!("Unknown command {:?}. {}", line.trim(), USAGE),
        }
    }
}

pub fn parse_command(line: &str) -> Option<Command> {
    let cmd = match line.trim().to_ascii_lowercase().as_str() {
        "record" | "r" => Command::Press(Control::Record),
        "play" | "p" => Command::Press(Control::Play),
        "stop" | "s" => Command::Press(Control::Stop),
        "quit" | "q" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("record"), Some(Command::Press(Control::Record)));
        assert_eq!(parse_command(" P \n"), Some(Command::Press(Control::Play)));
        assert_eq!(parse_command("s"), Some(Command::Press(Control::Stop)));
        assert_eq!(parse_command("Quit"), Some(Command::Quit));
        assert_eq!(parse_command("rewind"), None);
    }
}
