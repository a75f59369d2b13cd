//! Turn-based battle resolution.
//!
//! Mechanical changes commit synchronously inside [`resolve_exchange`]; the
//! only thing handed back for later is the commentary to request.

use crate::engine::progression::{apply_update, CharacterUpdate};
use crate::engine::rng::GameRng;
use crate::model::battle::{
    BattleAction, BattleOutcome, BattleReport, BattleState, Conclusion, Strike, TurnPhase,
};
use crate::model::event_result::CommandRejected;
use crate::model::game_state::Character;
use crate::model::message::{GameLog, LogCategory};
use crate::model::narrative::CommentaryRequest;

pub const CRITICAL_CHANCE: f64 = 0.2;
pub const SPREAD: (f64, f64) = (0.8, 1.2);
pub const REVIVAL_HP: i64 = 10;

pub const FIRE_STRATAGEM: &str = "You unleash a Fire Stratagem upon the enemy ranks!";
pub const PEERLESS_ONSLAUGHT: &str = "You unleash a Peerless Onslaught!";
pub const SHIELD_WALL: &str = "You brace behind your shield wall.";

/* =========================
   Damage formulas
   ========================= */

/// floor(strength × U[0.8, 1.2)), with a 20% chance of ×1.5 (floored).
pub fn attack_damage(strength: u32, rng: &mut GameRng) -> Strike {
    let base = (f64::from(strength) * rng.uniform(SPREAD.0, SPREAD.1)).floor() as u32;
    let critical = rng.chance(CRITICAL_CHANCE);
    let damage = if critical {
        (f64::from(base) * 1.5).floor() as u32
    } else {
        base
    };
    Strike { damage, critical }
}

/// Strategists burn, warriors charge. Skills never crit.
pub fn skill_damage(character: &Character) -> (Strike, &'static str) {
    if character.intellect > character.strength {
        // floor(intellect * 1.5)
        let damage = (u64::from(character.intellect) * 3 / 2).min(u64::from(u32::MAX)) as u32;
        (Strike { damage, critical: false }, FIRE_STRATAGEM)
    } else {
        // floor(strength * 1.2) + 10
        let damage = (u64::from(character.strength) * 6 / 5 + 10).min(u64::from(u32::MAX)) as u32;
        (Strike { damage, critical: false }, PEERLESS_ONSLAUGHT)
    }
}

/// floor(strength × U[0.8, 1.2)), halved (floored) if the player defended.
pub fn enemy_damage(strength: u32, defending: bool, rng: &mut GameRng) -> Strike {
    let damage = (f64::from(strength) * rng.uniform(SPREAD.0, SPREAD.1)).floor() as u32;
    let damage = if defending { damage / 2 } else { damage };
    Strike {
        damage,
        critical: false,
    }
}

/* =========================
   Exchange
   ========================= */

/// One player command and everything it set off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub report: BattleReport,
    /// Flavor text to request, in the order the blows landed.
    pub commentary: Vec<CommentaryRequest>,
}

/// Resolve a full exchange: the player's action, the win check, the enemy's
/// answer and the loss check. Rejected without mutation when it is not the
/// player's turn.
pub fn resolve_exchange(
    battle: &mut BattleState,
    character: &mut Character,
    action: BattleAction,
    rng: &mut GameRng,
    log: &mut GameLog,
) -> Result<Exchange, CommandRejected> {
    if !battle.active || battle.is_concluded() {
        return Err(CommandRejected::NotInBattle);
    }
    if !battle.player_turn || battle.phase != TurnPhase::PlayerTurn {
        return Err(CommandRejected::NotPlayerTurn);
    }

    let round = battle.round;
    let mut commentary = Vec::new();

    // Player turn
    let (player_strike, action_line) = match action {
        BattleAction::Attack => (Some(attack_damage(character.strength, rng)), None),
        BattleAction::Skill => {
            let (strike, line) = skill_damage(character);
            (Some(strike), Some(line))
        }
        BattleAction::Defend => {
            battle.defending = true;
            (None, Some(SHIELD_WALL))
        }
    };
    if let Some(line) = action_line {
        battle.log.push(line.to_string());
    }
    battle.player_turn = false;
    battle.phase = TurnPhase::Resolving;

    if let Some(strike) = player_strike {
        battle.enemy.hp = battle.enemy.hp.saturating_sub(strike.damage);
        commentary.push(CommentaryRequest {
            attacker: character.name.clone(),
            defender: battle.enemy.name.clone(),
            damage: strike.damage,
            critical: strike.critical,
            attacker_is_player: true,
        });
    }
    tracing::debug!(
        encounter = battle.encounter,
        round,
        ?action,
        enemy_hp = battle.enemy.hp,
        "player action resolved"
    );

    if battle.enemy.is_defeated() {
        // The battle log goes away with the encounter.
        if let Some(line) = action_line {
            log.push(LogCategory::Combat, line);
        }
        let conclusion = conclude_win(battle, character, log);
        return Ok(Exchange {
            report: BattleReport {
                encounter: battle.encounter,
                round,
                action,
                player_strike,
                enemy_strike: None,
                conclusion: Some(conclusion),
            },
            commentary,
        });
    }

    // Enemy turn
    battle.phase = TurnPhase::EnemyTurn;
    let enemy_strike = enemy_damage(battle.enemy.strength, battle.defending, rng);
    apply_update(
        character,
        CharacterUpdate::default()
            .hp(i64::from(character.hp) - i64::from(enemy_strike.damage)),
        log,
    );
    commentary.push(CommentaryRequest {
        attacker: battle.enemy.name.clone(),
        defender: character.name.clone(),
        damage: enemy_strike.damage,
        critical: false,
        attacker_is_player: false,
    });
    battle.phase = TurnPhase::Resolving;
    battle.defending = false;
    battle.round += 1;

    let conclusion = if character.is_defeated() {
        if let Some(line) = action_line {
            log.push(LogCategory::Combat, line);
        }
        Some(conclude_loss(battle, character, log))
    } else {
        battle.phase = TurnPhase::PlayerTurn;
        battle.player_turn = true;
        None
    };

    Ok(Exchange {
        report: BattleReport {
            encounter: battle.encounter,
            round,
            action,
            player_strike,
            enemy_strike: Some(enemy_strike),
            conclusion,
        },
        commentary,
    })
}

fn conclude_win(battle: &mut BattleState, character: &mut Character, log: &mut GameLog) -> Conclusion {
    let gold = battle.enemy.max_hp;
    let exp = battle.enemy.max_hp / 2;

    log.push(
        LogCategory::Gain,
        format!("Victory! You have defeated {}.", battle.enemy.name),
    );
    log.push(
        LogCategory::Gain,
        format!("Gained {exp} experience and seized {gold} gold."),
    );
    apply_update(
        character,
        CharacterUpdate::default()
            .gold(i64::from(character.gold) + i64::from(gold))
            .exp(i64::from(character.exp) + i64::from(exp)),
        log,
    );

    close(battle, BattleOutcome::Win);
    Conclusion::Win { gold, exp }
}

fn conclude_loss(battle: &mut BattleState, character: &mut Character, log: &mut GameLog) -> Conclusion {
    // floor(x * 0.8)
    let gold = u64::from(character.gold) * 4 / 5;
    let troops = u64::from(character.troops) * 4 / 5;
    let gold_lost = character.gold - gold as u32;
    let troops_lost = character.troops - troops as u32;

    log.push(
        LogCategory::Loss,
        format!(
            "Defeat! Routed by {}, you flee the field in disarray...",
            battle.enemy.name
        ),
    );
    log.push(
        LogCategory::Loss,
        format!("You lost {gold_lost} gold and {troops_lost} troops."),
    );
    apply_update(
        character,
        CharacterUpdate::default()
            .gold(gold as i64)
            .troops(troops as i64)
            .hp(REVIVAL_HP),
        log,
    );

    close(battle, BattleOutcome::Loss);
    Conclusion::Loss {
        gold_lost,
        troops_lost,
    }
}

fn close(battle: &mut BattleState, outcome: BattleOutcome) {
    battle.phase = TurnPhase::Concluded(outcome);
    battle.active = false;
    battle.player_turn = false;
    tracing::info!(encounter = battle.encounter, ?outcome, rounds = battle.round, "encounter concluded");
}
