use std::io::{self, BufRead, Write};

use super::client::{ClientError, TasksApi};
use crate::database::models::TaskId;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

/// A blocking yes/no question put to the user
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Asks on stderr and reads one line from stdin. Only `y`/`yes` accept.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// For `--yes`: every question is answered in the affirmative
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Remove `id` only after the user agrees. Returns whether the remove was sent.
pub async fn delete_with_confirmation(
    api: &dyn TasksApi,
    confirm: &mut dyn Confirm,
    id: &TaskId,
) -> Result<bool, ClientError> {
    if !confirm.confirm(DELETE_PROMPT) {
        return Ok(false);
    }
    api.remove(id).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::recording::{Call, RecordingApi};

    struct Scripted {
        answer: bool,
        asked: Vec<String>,
    }

    impl Confirm for Scripted {
        fn confirm(&mut self, prompt: &str) -> bool {
            self.asked.push(prompt.to_string());
            self.answer
        }
    }

    #[tokio::test]
    async fn declining_sends_nothing() {
        let api = RecordingApi::default();
        let mut confirm = Scripted { answer: false, asked: vec![] };

        let removed = delete_with_confirmation(&api, &mut confirm, &TaskId::from("t1")).await.unwrap();
        assert!(!removed);
        assert_eq!(confirm.asked, vec![DELETE_PROMPT.to_string()]);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn accepting_removes_once() {
        let api = RecordingApi::default();
        let mut confirm = Scripted { answer: true, asked: vec![] };

        assert!(delete_with_confirmation(&api, &mut confirm, &TaskId::from("t1")).await.unwrap());
        assert_eq!(api.calls(), vec![Call::Remove(TaskId::from("t1"))]);
    }

    #[tokio::test]
    async fn assume_yes_skips_the_question() {
        let api = RecordingApi::default();
        assert!(delete_with_confirmation(&api, &mut AssumeYes, &TaskId::from("t2")).await.unwrap());
    }
}
