//! Per-user dialog state, held in memory only.

use super::dialog::DialogState;
use std::collections::HashMap;
use std::sync::Mutex;

/// Pending multi-step dialogs keyed by user id. Absent means idle.
#[derive(Default)]
pub(super) struct SessionStore {
    states: Mutex<HashMap<String, DialogState>>,
}

impl SessionStore {
    pub(super) fn get(&self, user_id: &str) -> DialogState {
        self.lock().get(user_id).cloned().unwrap_or_default()
    }

    /// Replace the user's state. Setting idle drops the entry.
    pub(super) fn set(&self, user_id: &str, state: DialogState) {
        let mut states = self.lock();
        if state == DialogState::Idle {
            states.remove(user_id);
        } else {
            states.insert(user_id.to_string(), state);
        }
    }

    pub(super) fn clear(&self, user_id: &str) {
        self.lock().remove(user_id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, DialogState>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_per_user() {
        let sessions = SessionStore::default();
        sessions.set("1", DialogState::DailyName);
        assert_eq!(sessions.get("1"), DialogState::DailyName);
        assert_eq!(sessions.get("2"), DialogState::Idle);

        sessions.set("1", DialogState::Idle);
        assert!(sessions.lock().is_empty());

        sessions.set("2", DialogState::OneTimeName);
        sessions.clear("2");
        assert_eq!(sessions.get("2"), DialogState::Idle);
    }
}
