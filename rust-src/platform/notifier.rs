//! User-facing notifications.

use std::fmt;
use std::process::Command;

use super::process::spawn_reaped;
use super::Notifier;


/// Logical notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Ongoing monitor status, low priority.
    Status,
    Alert,
    Idle,
}


impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Alert => "alerts",
            Self::Idle => "idle",
        }
    }

    fn urgency(&self) -> &'static str {
        match self {
            Self::Status => "low",
            Self::Alert => "critical",
            Self::Idle => "normal",
        }
    }
}


impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel: Channel,
    pub title: String,
    pub body: String,
}


impl Notification {
    pub fn status() -> Self {
        Self {
            channel: Channel::Status,
            title: "Mobile Data Guard".to_string(),
            body: "Monitoring mobile data usage".to_string(),
        }
    }

    pub fn high_usage(used_mb: u64) -> Self {
        Self {
            channel: Channel::Alert,
            title: "High Data Usage".to_string(),
            body: format!("Used {used_mb}MB today"),
        }
    }

    pub fn idle() -> Self {
        Self {
            channel: Channel::Idle,
            title: "Device Idle".to_string(),
            body: "Mobile data disabled due to inactivity".to_string(),
        }
    }

    pub fn app_high_usage(app_name: &str, used_mb: u64) -> Self {
        Self {
            channel: Channel::Alert,
            title: "App High Usage".to_string(),
            body: format!("{app_name} used {used_mb}MB"),
        }
    }
}


/// Emits notifications as tracing events.
pub struct LogNotifier;


impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.channel {
            Channel::Alert => tracing::warn!(
                channel = %notification.channel,
                "{}: {}",
                notification.title,
                notification.body
            ),
            Channel::Status | Channel::Idle => tracing::info!(
                channel = %notification.channel,
                "{}: {}",
                notification.title,
                notification.body
            ),
        }
    }
}


/// Spawns a desktop notifier such as `notify-send`.
///
/// Invoked as `<command...> --urgency <level> <title> <body>`. Also logs,
/// since a spawned notifier gives no delivery feedback.
pub struct CommandNotifier {
    command: Vec<String>,
}


impl CommandNotifier {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}


impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) {
        LogNotifier.notify(notification);

        let Some((program, args)) = self.command.split_first() else {
            return;
        };
        let spawned = spawn_reaped(
            Command::new(program)
                .args(args)
                .arg("--urgency")
                .arg(notification.channel.urgency())
                .arg(&notification.title)
                .arg(&notification.body),
        );
        if let Err(e) = spawned {
            tracing::warn!(program = %program, error = %e, "notification command failed");
        }
    }
}
