/// Session: a roster being collected, the mode it will be split under, and
/// the current result.
///
/// Any change to the roster or the mode throws the current result away; a
/// result always describes the roster it was built from.
use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use crate::constants::ROLE_ROSTER_SIZE;
use crate::engine::TeamBuilder;
use crate::error::SplitError;
use crate::manual::swap_slots;
use crate::types::{Mode, Participant, PreviousPartition, Slot, TeamResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No participants.
    Empty,
    /// Some participants, but not a roster the mode can split.
    Collecting,
    /// The roster satisfies the mode; teams can be built.
    Ready,
    /// Teams have been built for the current roster.
    Resolved,
}

pub struct Session {
    builder: TeamBuilder,
    mode: Mode,
    roster: Vec<Participant>,
    result: Option<TeamResult>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(TeamBuilder::default(), Mode::default())
    }
}

impl Session {
    pub fn new(builder: TeamBuilder, mode: Mode) -> Self {
        Session {
            builder,
            mode,
            roster: Vec::new(),
            result: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.result.is_some() {
            SessionState::Resolved
        } else if self.roster.is_empty() {
            SessionState::Empty
        } else if self.mode.validate_roster_size(self.roster.len()).is_ok() {
            SessionState::Ready
        } else {
            SessionState::Collecting
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn result(&self) -> Option<&TeamResult> {
        self.result.as_ref()
    }

    pub fn builder(&self) -> &TeamBuilder {
        &self.builder
    }

    /// Add a participant. Role mode stops taking registrations at ten.
    pub fn add_participant(&mut self, mut participant: Participant) -> Result<(), SplitError> {
        if self.roster.iter().any(|p| p.id == participant.id) {
            return Err(SplitError::DuplicateParticipant { id: participant.id });
        }
        if self.mode.assigns_roles() && self.roster.len() >= ROLE_ROSTER_SIZE {
            return Err(SplitError::RosterFull { capacity: ROLE_ROSTER_SIZE });
        }
        participant.assigned_role = None;
        self.roster.push(participant);
        self.discard_result();
        Ok(())
    }

    pub fn remove_participant(&mut self, id: i64) -> Result<Participant, SplitError> {
        let index = self.index_of(id)?;
        let removed = self.roster.remove(index);
        self.discard_result();
        Ok(removed)
    }

    /// Edit a participant in place (rating, roles, flags). The id cannot change.
    pub fn update_participant(&mut self, id: i64, edit: impl FnOnce(&mut Participant)) -> Result<(), SplitError> {
        let index = self.index_of(id)?;
        let participant = &mut self.roster[index];
        edit(participant);
        participant.id = id;
        participant.assigned_role = None;
        self.discard_result();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            self.mode = mode;
            self.discard_result();
        }
    }

    /// Build teams from scratch, replacing any current result.
    pub fn build(&mut self) -> Result<&TeamResult, SplitError> {
        self.build_with_rng(&mut rand::rng())
    }

    pub fn build_with_rng(&mut self, rng: &mut impl Rng) -> Result<&TeamResult, SplitError> {
        let result = self.builder.build_teams_with_rng(&self.roster, self.mode, None, rng)?;
        Ok(&*self.result.insert(result))
    }

    /// Build again, avoiding the current grouping. On error the current result is kept.
    pub fn reroll(&mut self) -> Result<&TeamResult, SplitError> {
        self.reroll_with_rng(&mut rand::rng())
    }

    pub fn reroll_with_rng(&mut self, rng: &mut impl Rng) -> Result<&TeamResult, SplitError> {
        let current = self.result.as_ref().ok_or(SplitError::NotResolved)?;
        let previous = PreviousPartition::from_result(current);
        let result = self
            .builder
            .build_teams_with_rng(&self.roster, self.mode, Some(&previous), rng)?;
        Ok(&*self.result.insert(result))
    }

    /// Adopt a result built earlier for this roster, e.g. one loaded from disk.
    ///
    /// The result must cover exactly the current roster.
    pub fn restore_result(&mut self, result: TeamResult) -> Result<(), SplitError> {
        let roster_ids: BTreeSet<i64> = self.roster.iter().map(|p| p.id).collect();
        let result_ids: BTreeSet<i64> = result.blue.ids().union(&result.red.ids()).copied().collect();
        if let Some(&id) = result_ids.difference(&roster_ids).next() {
            return Err(SplitError::UnknownParticipant { id });
        }
        if result_ids.len() != roster_ids.len() {
            return Err(SplitError::InvalidRosterSize { mode: self.mode, actual: result_ids.len() });
        }
        self.result = Some(result);
        Ok(())
    }

    /// Manual override on the current result.
    pub fn swap(&mut self, a: Slot, b: Slot) -> Result<&TeamResult, SplitError> {
        let result = self.result.as_mut().ok_or(SplitError::NotResolved)?;
        swap_slots(result, a, b, self.builder.tiers())?;
        Ok(&*result)
    }

    /// Drop the roster and the result.
    pub fn reset(&mut self) {
        self.roster.clear();
        self.result = None;
    }

    fn index_of(&self, id: i64) -> Result<usize, SplitError> {
        self.roster
            .iter()
            .position(|p| p.id == id)
            .ok_or(SplitError::UnknownParticipant { id })
    }

    fn discard_result(&mut self) {
        if self.result.take().is_some() {
            debug!("roster changed, current result discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, Side};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled(mode: Mode, n: i64) -> Session {
        let mut session = Session::new(TeamBuilder::default(), mode);
        for i in 0..n {
            session
                .add_participant(Participant::new(i, format!("p{i}"), 800.0 + 150.0 * i as f64))
                .unwrap();
        }
        session
    }

    #[test]
    fn test_state_progression() {
        let mut session = Session::default();
        assert_eq!(session.state(), SessionState::Empty);

        session.add_participant(Participant::new(1, "a", 1000.0)).unwrap();
        assert_eq!(session.state(), SessionState::Collecting);

        let mut session = filled(Mode::Roles, 10);
        assert_eq!(session.state(), SessionState::Ready);

        let mut rng = StdRng::seed_from_u64(1);
        session.build_with_rng(&mut rng).unwrap();
        assert_eq!(session.state(), SessionState::Resolved);

        session.reset();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.roster().is_empty());
    }

    #[test]
    fn test_build_requires_valid_roster() {
        let mut session = filled(Mode::Roles, 9);
        let err = session.build().unwrap_err();
        assert_eq!(err, SplitError::InvalidRosterSize { mode: Mode::Roles, actual: 9 });
        assert_eq!(session.state(), SessionState::Collecting);
    }

    #[test]
    fn test_registration_rules() {
        let mut session = filled(Mode::Roles, 10);
        assert_eq!(
            session.add_participant(Participant::new(99, "late", 1000.0)),
            Err(SplitError::RosterFull { capacity: 10 })
        );

        let mut session = filled(Mode::Free, 3);
        assert_eq!(
            session.add_participant(Participant::new(2, "again", 1000.0)),
            Err(SplitError::DuplicateParticipant { id: 2 })
        );
        assert_eq!(session.remove_participant(42), Err(SplitError::UnknownParticipant { id: 42 }));

        // Free mode has no registration cap beyond the split limit.
        let mut session = filled(Mode::Free, 12);
        assert_eq!(session.state(), SessionState::Ready);
        session.add_participant(Participant::new(12, "extra", 1000.0)).unwrap();
        assert_eq!(session.state(), SessionState::Collecting);
    }

    #[test]
    fn test_roster_edits_discard_result() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = filled(Mode::Roles, 10);

        session.build_with_rng(&mut rng).unwrap();
        session.update_participant(3, |p| p.rating = 2500.0).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.roster()[3].rating, 2500.0);

        session.build_with_rng(&mut rng).unwrap();
        session.remove_participant(4).unwrap();
        assert_eq!(session.state(), SessionState::Collecting);

        session.add_participant(Participant::new(4, "back", 1000.0)).unwrap();
        session.build_with_rng(&mut rng).unwrap();
        session.set_mode(Mode::Free);
        assert!(session.result().is_none());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_update_cannot_change_id() {
        let mut session = filled(Mode::Free, 2);
        session
            .update_participant(1, |p| {
                p.id = 7;
                p.preferred_roles = [Role::Mid].into_iter().collect();
            })
            .unwrap();
        assert_eq!(session.roster()[1].id, 1);
        assert!(session.roster()[1].preferred_roles.contains(Role::Mid));
    }

    #[test]
    fn test_reroll_replaces_result() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = filled(Mode::Roles, 10);
        assert_eq!(session.reroll().unwrap_err(), SplitError::NotResolved);

        let first = session.build_with_rng(&mut rng).unwrap().blue.ids();
        let second = session.reroll_with_rng(&mut rng).unwrap();
        assert_ne!(second.blue.ids(), first);
        assert_ne!(second.red.ids(), first);
        assert_eq!(session.state(), SessionState::Resolved);
    }

    #[test]
    fn test_reroll_error_keeps_current_result() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = filled(Mode::Roles, 10);
        session.build_with_rng(&mut rng).unwrap();
        let kept = session.result().cloned();

        // Rebuild the builder so every search comes back empty.
        let config = crate::types::SearchConfig { max_combinations: 0, ..Default::default() };
        session.builder = TeamBuilder::new(config);
        assert!(matches!(session.reroll_with_rng(&mut rng), Err(SplitError::SearchExhausted { .. })));
        assert_eq!(session.result().cloned(), kept);
    }

    #[test]
    fn test_restore_then_reroll() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut source = filled(Mode::Roles, 10);
        let saved = source.build_with_rng(&mut rng).unwrap().clone();

        let mut session = filled(Mode::Roles, 10);
        session.restore_result(saved.clone()).unwrap();
        assert_eq!(session.state(), SessionState::Resolved);
        let next = session.reroll_with_rng(&mut rng).unwrap();
        assert_ne!(next.blue.ids(), saved.blue.ids());
    }

    #[test]
    fn test_restore_rejects_foreign_result() {
        let mut rng = StdRng::seed_from_u64(7);
        let saved = filled(Mode::Roles, 10).build_with_rng(&mut rng).unwrap().clone();

        let mut session = filled(Mode::Roles, 9);
        session.add_participant(Participant::new(50, "new", 1000.0)).unwrap();
        assert_eq!(session.restore_result(saved.clone()), Err(SplitError::UnknownParticipant { id: 9 }));

        let mut bigger = filled(Mode::Free, 12);
        assert_eq!(
            bigger.restore_result(saved),
            Err(SplitError::InvalidRosterSize { mode: Mode::Free, actual: 10 })
        );
        assert_eq!(bigger.state(), SessionState::Ready);
    }

    #[test]
    fn test_swap_in_place() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = filled(Mode::Roles, 10);
        let slot_a = Slot::role(Side::Blue, Role::Top);
        let slot_b = Slot::role(Side::Red, Role::Jungle);
        assert_eq!(session.swap(slot_a, slot_b).unwrap_err(), SplitError::NotResolved);

        let before = session.build_with_rng(&mut rng).unwrap().clone();
        let after = session.swap(slot_a, slot_b).unwrap();
        assert_eq!(
            after.blue.member_with_role(Role::Top).unwrap().id,
            before.red.member_with_role(Role::Jungle).unwrap().id
        );
        assert_eq!(session.state(), SessionState::Resolved);
    }
}
