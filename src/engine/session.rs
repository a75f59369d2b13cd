//! The session: one general, at most one battle, one chronicle.
//!
//! Every mutation goes through [`Session::handle`] or
//! [`Session::merge_narration`]. Flavor text requested along the way is queued
//! as [`NarrationJob`]s for the caller to run wherever it likes.

use crate::engine::combat::resolve_exchange;
use crate::engine::economy::{self, EconomyOutcome};
use crate::engine::encounter::EncounterFactory;
use crate::engine::progression::apply_update;
use crate::engine::rng::GameRng;
use crate::model::battle::{BattleReport, BattleState};
use crate::model::event_result::{CommandOutcome, CommandRejected, PlayerCommand};
use crate::model::game_context::SessionView;
use crate::model::game_state::{Character, CharacterSetup, GamePhase};
use crate::model::message::{GameLog, LogCategory};
use crate::model::narrative::{NarrationJob, NarrationKind, NarrationResult, NarrationTarget};

pub const OPENING_NARRATION: &str = "enter the age of chaos";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("a general needs a name")]
    EmptyName,
}

pub struct Session {
    character: Character,
    battle: Option<BattleState>,
    log: GameLog,
    rng: GameRng,
    factory: EncounterFactory,
    encounters: u64,
    next_job: u64,
    pending: Vec<NarrationJob>,
}

impl Session {
    pub fn new(
        setup: CharacterSetup,
        factory: EncounterFactory,
        rng: GameRng,
    ) -> Result<Self, SetupError> {
        let name = setup.name.trim();
        if name.is_empty() {
            return Err(SetupError::EmptyName);
        }

        let character = Character::new(name, setup.faction, setup.role);
        let mut session = Self {
            character,
            battle: None,
            log: GameLog::new(),
            rng,
            factory,
            encounters: 0,
            next_job: 0,
            pending: Vec::new(),
        };

        let banner = match session.character.faction.leader() {
            Some(leader) => format!(
                "{}, a {} sworn to {} of {}, rides out into a realm torn by war.",
                session.character.name,
                session.character.role.label(),
                leader,
                session.character.faction.label(),
            ),
            None => format!(
                "{}, a {} beholden to no lord, rides out into a realm torn by war.",
                session.character.name,
                session.character.role.label(),
            ),
        };
        session.log.push(LogCategory::Event, banner);
        session.queue_event(OPENING_NARRATION);

        tracing::info!(
            name = %session.character.name,
            faction = session.character.faction.label(),
            role = ?session.character.role,
            "session started"
        );
        Ok(session)
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn battle(&self) -> Option<&BattleState> {
        self.battle.as_ref()
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub fn phase(&self) -> GamePhase {
        if self.battle.is_some() {
            GamePhase::Battle
        } else {
            GamePhase::Roaming
        }
    }

    /// Copy of the current state, with chronicle entries from `cursor` on.
    pub fn view(&self, cursor: usize, report: Option<BattleReport>) -> SessionView {
        SessionView {
            character: self.character.clone(),
            phase: self.phase(),
            battle: self.battle.clone(),
            new_entries: self.log.since(cursor).to_vec(),
            report,
        }
    }

    pub fn handle(&mut self, command: PlayerCommand) -> Result<CommandOutcome, CommandRejected> {
        tracing::debug!(?command, phase = ?self.phase(), "handling command");

        if let Some(action) = command.battle_action() {
            let battle = self.battle.as_mut().ok_or(CommandRejected::NotInBattle)?;
            let exchange = resolve_exchange(
                battle,
                &mut self.character,
                action,
                &mut self.rng,
                &mut self.log,
            )?;

            let encounter = exchange.report.encounter;
            for request in exchange.commentary {
                self.queue(NarrationKind::Commentary { encounter, request });
            }
            if exchange.report.conclusion.is_some() {
                self.battle = None;
            }
            return Ok(CommandOutcome::Battle(exchange.report));
        }

        if self.battle.is_some() {
            return Err(CommandRejected::InBattle(command.keyword().to_string()));
        }

        let outcome = match command {
            PlayerCommand::Patrol => economy::patrol(&self.character, &mut self.rng),
            PlayerCommand::Recruit => economy::recruit(&self.character, &mut self.rng),
            PlayerCommand::Govern => economy::govern(&self.character),
            PlayerCommand::Rest => economy::rest(&self.character),
            PlayerCommand::Attack | PlayerCommand::Skill | PlayerCommand::Defend => {
                return Err(CommandRejected::NotInBattle)
            }
        };
        let ambush = self.commit(outcome);

        Ok(CommandOutcome::Economy { command, ambush })
    }

    /// Drain the flavor-text requests queued since the last call.
    pub fn take_narration_jobs(&mut self) -> Vec<NarrationJob> {
        std::mem::take(&mut self.pending)
    }

    /// Append finished flavor text. Never touches the character or the battle outcome.
    pub fn merge_narration(&mut self, result: NarrationResult) {
        tracing::debug!(job = result.job, degraded = result.degraded, "merging narration");

        match result.target {
            NarrationTarget::Chronicle => {
                self.log.push(LogCategory::Event, result.text);
            }
            NarrationTarget::Battle { encounter } => match self.battle.as_mut() {
                Some(battle) if battle.encounter == encounter && battle.active => {
                    battle.log.push(result.text);
                }
                _ => {
                    self.log.push(LogCategory::Combat, result.text);
                }
            },
        }
    }

    fn commit(&mut self, outcome: EconomyOutcome) -> Option<u64> {
        for (category, text) in outcome.logs {
            self.log.push(category, text);
        }
        if !outcome.update.is_empty() {
            apply_update(&mut self.character, outcome.update, &mut self.log);
        }
        if let Some(action) = outcome.narration {
            self.queue_event(&action);
        }
        outcome.ambush.then(|| self.start_encounter())
    }

    fn start_encounter(&mut self) -> u64 {
        self.encounters += 1;
        let enemy = self
            .factory
            .create_enemy(self.character.level, &mut self.rng);
        tracing::info!(
            encounter = self.encounters,
            enemy = %enemy.name,
            difficulty = enemy.difficulty.label(),
            "encounter started"
        );

        let battle = BattleState::new(self.encounters, enemy);
        if let Some(opening) = battle.log.first() {
            self.log.push(LogCategory::Combat, opening.clone());
        }
        self.battle = Some(battle);
        self.encounters
    }

    fn queue_event(&mut self, action: &str) {
        self.queue(NarrationKind::Event {
            character: self.character.clone(),
            action: action.to_string(),
        });
    }

    fn queue(&mut self, kind: NarrationKind) {
        self.next_job += 1;
        self.pending.push(NarrationJob {
            id: self.next_job,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::combat::PEERLESS_ONSLAUGHT;
    use crate::engine::narrator::OfflineNarrator;
    use crate::model::battle::Conclusion;
    use crate::model::game_state::{Faction, Role};

    fn session(seed: u64) -> Session {
        Session::new(
            CharacterSetup {
                name: "  Guan Yu ".into(),
                faction: Faction::Shu,
                role: Role::Warrior,
            },
            EncounterFactory::new(Arc::new(OfflineNarrator)),
            GameRng::seeded(seed),
        )
        .unwrap()
    }

    /// Patrol until an ambush starts a battle.
    fn ambushed(s: &mut Session) -> u64 {
        for _ in 0..100 {
            if let Ok(CommandOutcome::Economy { ambush: Some(id), .. }) = s.handle(PlayerCommand::Patrol) {
                return id;
            }
        }
        panic!("no ambush in 100 patrols");
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = Session::new(
            CharacterSetup {
                name: "   ".into(),
                faction: Faction::Wei,
                role: Role::Strategist,
            },
            EncounterFactory::new(Arc::new(OfflineNarrator)),
            GameRng::seeded(1),
        );
        assert_eq!(result.err(), Some(SetupError::EmptyName));
    }

    #[test]
    fn setup_logs_opening_and_queues_narration() {
        let mut s = session(1);
        assert_eq!(s.character().name, "Guan Yu");
        assert_eq!(s.phase(), GamePhase::Roaming);
        assert_eq!(s.log().count(LogCategory::Event), 1);

        let jobs = s.take_narration_jobs();
        assert_eq!(jobs.len(), 1);
        assert!(matches!(
            &jobs[0].kind,
            NarrationKind::Event { action, .. } if action == OPENING_NARRATION
        ));
        assert!(s.take_narration_jobs().is_empty());
    }

    #[test]
    fn battle_commands_need_a_battle() {
        let mut s = session(1);
        let before = s.character().clone();
        assert_eq!(s.handle(PlayerCommand::Attack), Err(CommandRejected::NotInBattle));
        assert_eq!(s.character(), &before);
    }

    #[test]
    fn ambush_starts_battle_and_blocks_economy() {
        let mut s = session(2);
        let id = ambushed(&mut s);

        assert_eq!(s.phase(), GamePhase::Battle);
        let battle = s.battle().unwrap();
        assert_eq!(battle.encounter, id);
        assert_eq!(battle.round, 1);
        // offline narrator: every enemy is the fallback
        assert_eq!(battle.enemy.name, crate::engine::encounter::FALLBACK_NAME);

        let gold = s.character().gold;
        assert_eq!(
            s.handle(PlayerCommand::Govern),
            Err(CommandRejected::InBattle("govern".into()))
        );
        assert_eq!(s.character().gold, gold);
    }

    #[test]
    fn fighting_to_the_end_returns_to_roaming() {
        let mut s = session(3);
        ambushed(&mut s);
        s.take_narration_jobs();

        let mut conclusion = None;
        for _ in 0..200 {
            match s.handle(PlayerCommand::Attack).unwrap() {
                CommandOutcome::Battle(report) => {
                    if report.conclusion.is_some() {
                        conclusion = report.conclusion;
                        break;
                    }
                }
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        assert!(conclusion.is_some());
        assert!(s.battle().is_none());
        assert_eq!(s.phase(), GamePhase::Roaming);
        assert!(!s.take_narration_jobs().is_empty());
        if let Some(Conclusion::Loss { .. }) = conclusion {
            assert_eq!(s.character().hp, 10);
        }
    }

    #[test]
    fn last_skill_line_survives_the_encounter() {
        let mut s = session(7);
        ambushed(&mut s);
        let cursor = s.log().len();

        let mut concluded = false;
        for _ in 0..50 {
            if let CommandOutcome::Battle(report) = s.handle(PlayerCommand::Skill).unwrap() {
                if report.conclusion.is_some() {
                    concluded = true;
                    break;
                }
            }
        }

        assert!(concluded);
        let view = s.view(cursor, None);
        assert!(view.battle.is_none());
        assert!(view
            .new_entries
            .iter()
            .any(|e| e.category == LogCategory::Combat && e.text == PEERLESS_ONSLAUGHT));
    }

    #[test]
    fn commentary_routes_by_encounter() {
        let mut s = session(4);
        let id = ambushed(&mut s);

        s.merge_narration(NarrationResult {
            job: 1,
            target: NarrationTarget::Battle { encounter: id },
            text: "Blades clash.".into(),
            degraded: false,
        });
        assert_eq!(s.battle().unwrap().log.last().map(String::as_str), Some("Blades clash."));

        let combat_before = s.log().count(LogCategory::Combat);
        s.merge_narration(NarrationResult {
            job: 2,
            target: NarrationTarget::Battle { encounter: id + 10 },
            text: "An echo from an old fight.".into(),
            degraded: true,
        });
        assert_eq!(s.log().count(LogCategory::Combat), combat_before + 1);
        assert_eq!(s.log().last().unwrap().text, "An echo from an old fight.");
    }

    #[test]
    fn merge_never_changes_mechanics() {
        let mut s = session(5);
        let before = s.character().clone();
        s.merge_narration(NarrationResult {
            job: 1,
            target: NarrationTarget::Chronicle,
            text: "The wind carries rumours of war.".into(),
            degraded: false,
        });
        assert_eq!(s.character(), &before);
        assert_eq!(s.log().last().unwrap().category, LogCategory::Event);
    }

    #[test]
    fn view_carries_only_new_entries() {
        let mut s = session(6);
        let cursor = s.log().len();
        s.handle(PlayerCommand::Rest).unwrap();
        let view = s.view(cursor, None);
        assert_eq!(view.new_entries.len(), 1);
        assert_eq!(view.phase, GamePhase::Roaming);
        assert_eq!(view.character, *s.character());
    }
}
