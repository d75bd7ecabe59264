//! Game phases and the transition table between them
//!
//! `PhaseMachine` owns the current phase and a registry of enter callbacks.
//! Only transitions listed in `GamePhase::valid_transitions` are accepted by
//! `change`; `force` bypasses the table for debugging.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamePhase {
    /// Assets and layout being prepared
    Loading,
    /// Title screen, waiting for start
    Menu,
    /// Countdown before play begins
    Ready,
    /// Active gameplay
    Playing,
    Paused,
    /// No lives left
    GameOver,
    /// All pellets eaten, short pause before the next level
    LevelComplete,
    Victory,
}

impl GamePhase {
    pub const ALL: [GamePhase; 8] = [
        GamePhase::Loading,
        GamePhase::Menu,
        GamePhase::Ready,
        GamePhase::Playing,
        GamePhase::Paused,
        GamePhase::GameOver,
        GamePhase::LevelComplete,
        GamePhase::Victory,
    ];

    /// Phases reachable from this one through `PhaseMachine::change`
    pub fn valid_transitions(self) -> &'static [GamePhase] {
        use GamePhase::*;
        match self {
            Loading => &[Menu],
            Menu => &[Ready, Loading],
            Ready => &[Playing, Menu],
            Playing => &[Paused, GameOver, LevelComplete],
            Paused => &[Playing, Menu, GameOver],
            LevelComplete => &[Ready, Victory, Menu],
            GameOver => &[Menu, Ready],
            Victory => &[Menu],
        }
    }

    pub fn can_transition_to(self, to: GamePhase) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Lowercase name, used for CSS classes and logs
    pub fn name(self) -> &'static str {
        match self {
            GamePhase::Loading => "loading",
            GamePhase::Menu => "menu",
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game-over",
            GamePhase::LevelComplete => "level-complete",
            GamePhase::Victory => "victory",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A completed transition, handed to enter callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Result type returned by enter callbacks
pub type CallbackResult = std::result::Result<(), Box<dyn std::error::Error>>;

type PhaseCallback = Box<dyn FnMut(PhaseChange) -> CallbackResult>;

/// Handle returned by `on_enter`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Snapshot for debugging overlays and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDebugInfo {
    pub current: GamePhase,
    pub previous: GamePhase,
    pub valid_transitions: Vec<GamePhase>,
    pub subscribers: usize,
}

/// Current/previous phase plus enter-callback registry
pub struct PhaseMachine {
    current: GamePhase,
    previous: GamePhase,
    callbacks: BTreeMap<SubscriptionId, (GamePhase, PhaseCallback)>,
    next_id: u64,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhaseMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

impl PhaseMachine {
    /// Starts in `Loading`
    pub fn new() -> Self {
        Self {
            current: GamePhase::Loading,
            previous: GamePhase::Loading,
            callbacks: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    pub fn previous(&self) -> GamePhase {
        self.previous
    }

    pub fn is(&self, phase: GamePhase) -> bool {
        self.current == phase
    }

    pub fn is_playable(&self) -> bool {
        self.current == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.current == GamePhase::Paused
    }

    pub fn valid_transitions(&self) -> &'static [GamePhase] {
        self.current.valid_transitions()
    }

    /// Move to `to` if the table allows it, then run its enter callbacks
    pub fn change(&mut self, to: GamePhase) -> Result<PhaseChange> {
        let from = self.current;
        if !from.can_transition_to(to) {
            log::warn!("Invalid state transition from {} to {}", from, to);
            return Err(GameError::InvalidTransition { from, to });
        }

        let change = self.apply(to);
        log::info!("State changed: {} -> {}", from, to);
        Ok(change)
    }

    /// Move to `to` unconditionally
    pub fn force(&mut self, to: GamePhase) -> PhaseChange {
        log::warn!("Force changing state to: {}", to);
        self.apply(to)
    }

    fn apply(&mut self, to: GamePhase) -> PhaseChange {
        self.previous = self.current;
        self.current = to;
        let change = PhaseChange {
            from: self.previous,
            to,
        };
        self.notify(change);
        change
    }

    fn notify(&mut self, change: PhaseChange) {
        for (id, (phase, callback)) in self.callbacks.iter_mut() {
            if *phase != change.to {
                continue;
            }
            if let Err(err) = callback(change) {
                log::error!("Error in state callback {:?} for {}: {}", id, change.to, err);
            }
        }
    }

    /// Register a callback run every time `phase` is entered
    pub fn on_enter<F>(&mut self, phase: GamePhase, callback: F) -> SubscriptionId
    where
        F: FnMut(PhaseChange) -> CallbackResult + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.insert(id, (phase, Box::new(callback)));
        id
    }

    /// Remove a callback; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    pub fn debug_info(&self) -> PhaseDebugInfo {
        PhaseDebugInfo {
            current: self.current,
            previous: self.previous,
            valid_transitions: self.valid_transitions().to_vec(),
            subscribers: self.callbacks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_starts_in_loading() {
        let machine = PhaseMachine::new();
        assert_eq!(machine.current(), GamePhase::Loading);
        assert_eq!(machine.previous(), GamePhase::Loading);
        assert!(!machine.is_playable());
    }

    #[test]
    fn test_valid_sequence() {
        let mut machine = PhaseMachine::new();
        for to in [
            GamePhase::Menu,
            GamePhase::Ready,
            GamePhase::Playing,
            GamePhase::Paused,
            GamePhase::Playing,
            GamePhase::LevelComplete,
            GamePhase::Victory,
            GamePhase::Menu,
        ] {
            machine.change(to).expect("valid transition");
        }
        assert_eq!(machine.current(), GamePhase::Menu);
        assert_eq!(machine.previous(), GamePhase::Victory);
    }

    #[test]
    fn test_invalid_transition_keeps_phase() {
        let mut machine = PhaseMachine::new();
        let err = machine.change(GamePhase::Playing).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTransition {
                from: GamePhase::Loading,
                to: GamePhase::Playing
            }
        ));
        assert_eq!(machine.current(), GamePhase::Loading);
    }

    #[test]
    fn test_self_transitions_are_not_listed() {
        for phase in GamePhase::ALL {
            assert!(!phase.can_transition_to(phase), "{phase} -> {phase}");
        }
    }

    #[test]
    fn test_callbacks_run_on_enter_only() {
        let mut machine = PhaseMachine::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        machine.on_enter(GamePhase::Menu, move |change| {
            sink.borrow_mut().push(change);
            Ok(())
        });

        machine.change(GamePhase::Menu).expect("valid");
        machine.change(GamePhase::Ready).expect("valid");
        machine.change(GamePhase::Menu).expect("valid");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[1],
            PhaseChange {
                from: GamePhase::Ready,
                to: GamePhase::Menu
            }
        );
    }

    #[test]
    fn test_failing_callback_does_not_block_others() {
        let mut machine = PhaseMachine::new();
        let count = Rc::new(RefCell::new(0));

        machine.on_enter(GamePhase::Menu, |_| Err("boom".into()));
        let counter = count.clone();
        machine.on_enter(GamePhase::Menu, move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        machine.change(GamePhase::Menu).expect("valid");
        assert_eq!(*count.borrow(), 1);
        assert_eq!(machine.current(), GamePhase::Menu);
    }

    #[test]
    fn test_unsubscribe() {
        let mut machine = PhaseMachine::new();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let id = machine.on_enter(GamePhase::Menu, move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        assert!(machine.unsubscribe(id));
        assert!(!machine.unsubscribe(id));
        machine.change(GamePhase::Menu).expect("valid");
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_force_bypasses_table_and_notifies() {
        let mut machine = PhaseMachine::new();
        let hit = Rc::new(RefCell::new(false));
        let flag = hit.clone();
        machine.on_enter(GamePhase::GameOver, move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        let change = machine.force(GamePhase::GameOver);
        assert_eq!(change.from, GamePhase::Loading);
        assert!(machine.is(GamePhase::GameOver));
        assert!(*hit.borrow());
    }

    #[test]
    fn test_debug_info() {
        let mut machine = PhaseMachine::new();
        machine.change(GamePhase::Menu).expect("valid");
        let info = machine.debug_info();
        assert_eq!(info.current, GamePhase::Menu);
        assert_eq!(info.previous, GamePhase::Loading);
        assert_eq!(info.valid_transitions, vec![GamePhase::Ready, GamePhase::Loading]);
        assert_eq!(info.subscribers, 0);

        let json = serde_json::to_string(&info).expect("serializable");
        assert!(json.contains("\"Menu\""));
    }
}
