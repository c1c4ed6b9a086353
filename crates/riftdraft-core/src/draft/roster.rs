// Roster assignments and the focus ("active selection") of the picker.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::role::{Role, Side};

/// One side's five role assignments. Always holds exactly one entry per role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    slots: [Option<String>; 5],
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The champion assigned to `role`, if any.
    pub fn get(&self, role: Role) -> Option<&str> {
        self.slots[role.index()].as_deref()
    }

    /// All five (role, champion) entries in role order.
    pub fn entries(&self) -> impl Iterator<Item = (Role, Option<&str>)> + '_ {
        Role::ALL.iter().map(move |&role| (role, self.get(role)))
    }

    /// Only the filled entries, in role order.
    pub fn filled(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        self.entries()
            .filter_map(|(role, champ)| champ.map(|c| (role, c)))
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    fn set(&mut self, role: Role, champion: Option<String>) {
        self.slots[role.index()] = champion;
    }
}

/// The (side, role) slot the next assignment is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSelection {
    pub side: Side,
    pub role: Role,
}

#[derive(Debug, Default)]
struct RosterState {
    blue: Roster,
    red: Roster,
    active: Option<ActiveSelection>,
}

impl RosterState {
    fn roster_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }
}

/// Owner of both rosters. Shared behind an `Arc`; every accessor takes the
/// lock for a short, non-async critical section.
#[derive(Debug, Default)]
pub struct RosterStore {
    state: Mutex<RosterState>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RosterState> {
        self.state.lock().expect("roster store mutex poisoned")
    }

    /// Overwrite the entry for (side, role) and end the picking interaction.
    ///
    /// The active selection is cleared unconditionally, even when the
    /// assignment targets a different slot than the focused one. An empty or
    /// whitespace-only champion clears the slot.
    pub fn set_champion(&self, side: Side, role: Role, champion: &str) {
        let champion = champion.trim();
        let value = (!champion.is_empty()).then(|| champion.to_string());

        let mut state = self.state();
        debug!(%side, %role, champion = value.as_deref().unwrap_or(""), "roster slot assigned");
        state.roster_mut(side).set(role, value);
        state.active = None;
    }

    pub fn set_active_selection(&self, side: Side, role: Role) {
        self.state().active = Some(ActiveSelection { side, role });
    }

    pub fn active_selection(&self) -> Option<ActiveSelection> {
        self.state().active
    }

    /// Snapshot of one side's roster.
    pub fn roster(&self, side: Side) -> Roster {
        self.state().roster(side).clone()
    }

    pub fn champion(&self, side: Side, role: Role) -> Option<String> {
        self.state().roster(side).get(role).map(str::to_string)
    }
}
