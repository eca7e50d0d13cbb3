//! Screen registry: the closed set of screens and the edges between them.
//!
//! The experience is a simple path. Every screen names exactly one
//! successor, except `Sealed`, which is the true terminal. Two screens
//! also carry a restart edge back to the start of the path.

use std::fmt;

// ============================================================================
// SCREEN IDENTIFIERS
// ============================================================================

/// A screen in the experience, in path order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScreenId {
    Loading,
    Welcome,
    Game,
    Letter,
    Songs,
    Cards,
    FinalMessage,
    Wrapping,
    Sealed,
}

/// What causes a screen to leave along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The screen's own timer elapsed.
    Completion,
    /// The user confirmed on the screen's designated target.
    UserConfirm,
    /// The user asked to see everything again.
    Restart,
}

/// A single edge of the screen graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: ScreenId,
    pub trigger: Trigger,
    pub to: ScreenId,
}

impl ScreenId {
    /// Where every run (and every restart) begins.
    pub const START: ScreenId = ScreenId::Loading;

    /// All screens in path order.
    pub const ALL: [ScreenId; 9] = [
        ScreenId::Loading,
        ScreenId::Welcome,
        ScreenId::Game,
        ScreenId::Letter,
        ScreenId::Songs,
        ScreenId::Cards,
        ScreenId::FinalMessage,
        ScreenId::Wrapping,
        ScreenId::Sealed,
    ];

    /// The screen this one advances to. `None` only for the terminal.
    pub fn next(self) -> Option<ScreenId> {
        match self {
            ScreenId::Loading => Some(ScreenId::Welcome),
            ScreenId::Welcome => Some(ScreenId::Game),
            ScreenId::Game => Some(ScreenId::Letter),
            ScreenId::Letter => Some(ScreenId::Songs),
            ScreenId::Songs => Some(ScreenId::Cards),
            ScreenId::Cards => Some(ScreenId::FinalMessage),
            ScreenId::FinalMessage => Some(ScreenId::Wrapping),
            ScreenId::Wrapping => Some(ScreenId::Sealed),
            ScreenId::Sealed => None,
        }
    }

    /// How this screen decides to advance.
    pub fn advance_trigger(self) -> Option<Trigger> {
        match self {
            ScreenId::Loading | ScreenId::Wrapping => Some(Trigger::Completion),
            ScreenId::Sealed => None,
            _ => Some(Trigger::UserConfirm),
        }
    }

    /// Whether the screen exposes the restart callback.
    pub fn can_restart(self) -> bool {
        matches!(self, ScreenId::FinalMessage | ScreenId::Sealed)
    }

    /// Stable kebab-case name, used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            ScreenId::Loading => "loading",
            ScreenId::Welcome => "welcome",
            ScreenId::Game => "game",
            ScreenId::Letter => "letter",
            ScreenId::Songs => "songs",
            ScreenId::Cards => "cards",
            ScreenId::FinalMessage => "final-message",
            ScreenId::Wrapping => "wrapping",
            ScreenId::Sealed => "sealed",
        }
    }

    /// Inverse of [`ScreenId::name`].
    pub fn from_name(name: &str) -> Option<ScreenId> {
        ScreenId::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every edge of the graph: the forward path first, then restart edges.
pub fn edges() -> Vec<Edge> {
    let forward = ScreenId::ALL.into_iter().filter_map(|from| {
        let to = from.next()?;
        let trigger = from.advance_trigger()?;
        Some(Edge { from, trigger, to })
    });

    let restarts = ScreenId::ALL
        .into_iter()
        .filter(|id| id.can_restart())
        .map(|from| Edge {
            from,
            trigger: Trigger::Restart,
            to: ScreenId::START,
        });

    forward.chain(restarts).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_visits_every_screen_once() {
        let mut visited = vec![ScreenId::START];
        let mut current = ScreenId::START;
        while let Some(next) = current.next() {
            assert!(!visited.contains(&next), "cycle through {}", next);
            visited.push(next);
            current = next;
        }
        assert_eq!(visited, ScreenId::ALL.to_vec());
    }

    #[test]
    fn only_sealed_is_terminal() {
        for id in ScreenId::ALL {
            assert_eq!(id.next().is_none(), id == ScreenId::Sealed, "{}", id);
        }
    }

    #[test]
    fn restart_edges_lead_to_start() {
        let restarts: Vec<Edge> = edges()
            .into_iter()
            .filter(|e| e.trigger == Trigger::Restart)
            .collect();

        assert_eq!(restarts.len(), 2);
        assert!(restarts.iter().all(|e| e.to == ScreenId::Loading));
        let sources: Vec<ScreenId> = restarts.iter().map(|e| e.from).collect();
        assert_eq!(sources, vec![ScreenId::FinalMessage, ScreenId::Sealed]);
    }

    #[test]
    fn every_non_terminal_has_an_outgoing_edge() {
        let all = edges();
        for id in ScreenId::ALL {
            let outgoing = all.iter().filter(|e| e.from == id).count();
            if id == ScreenId::Sealed {
                assert_eq!(outgoing, 1); // restart only
            } else {
                assert!(outgoing >= 1, "{} has no edge", id);
            }
        }
    }

    #[test]
    fn timed_screens_complete_on_their_own() {
        assert_eq!(ScreenId::Loading.advance_trigger(), Some(Trigger::Completion));
        assert_eq!(ScreenId::Wrapping.advance_trigger(), Some(Trigger::Completion));
        assert_eq!(ScreenId::Game.advance_trigger(), Some(Trigger::UserConfirm));
    }

    #[test]
    fn names_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_name(id.name()), Some(id));
        }
        assert_eq!(ScreenId::from_name("final-message"), Some(ScreenId::FinalMessage));
        assert_eq!(ScreenId::from_name("tictactoe"), None);
    }
}
