use super::backend::BackendEvent;

/// Last transport state reported by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing reported yet.
    Idle,
    Playing,
    Paused,
    Ended,
}

impl Default for TransportState {
    fn default() -> Self {
        Self::Idle
    }
}

/// What the watcher should do after a transport change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WatcherCommand {
    Arm,
    Disarm,
}

impl TransportState {
    /// Apply a backend event. Only `Playing` arms the watcher.
    pub fn on_event(&mut self, event: BackendEvent) -> WatcherCommand {
        *self = match event {
            BackendEvent::Playing => TransportState::Playing,
            BackendEvent::Paused => TransportState::Paused,
            BackendEvent::Ended => TransportState::Ended,
        };
        if self.is_playing() {
            WatcherCommand::Arm
        } else {
            WatcherCommand::Disarm
        }
    }

    pub fn is_playing(&self) -> bool {
        *self == TransportState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_arms_everything_else_disarms() {
        let mut state = TransportState::default();
        assert_eq!(state, TransportState::Idle);

        assert_eq!(state.on_event(BackendEvent::Playing), WatcherCommand::Arm);
        assert!(state.is_playing());

        assert_eq!(state.on_event(BackendEvent::Paused), WatcherCommand::Disarm);
        assert_eq!(state, TransportState::Paused);

        assert_eq!(state.on_event(BackendEvent::Playing), WatcherCommand::Arm);
        assert_eq!(state.on_event(BackendEvent::Ended), WatcherCommand::Disarm);
        assert_eq!(state, TransportState::Ended);
        assert!(!state.is_playing());
    }
}
