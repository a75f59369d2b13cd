use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;

use crate::engine::engine::Engine;
use crate::engine::narrator::Narrator;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::battle::{BattleReport, Conclusion};
use crate::model::event_result::PlayerCommand;
use crate::model::game_context::SessionView;
use crate::model::game_state::{CharacterSetup, Faction, GamePhase, Role};
use crate::ui::settings::GameSettings;

/* =========================
   UI State
   ========================= */

#[derive(Default)]
struct UiState {
    view: Option<SessionView>,
    /// (encounter, battle log lines already printed)
    battle_cursor: Option<(u64, usize)>,
}

/* =========================
   App
   ========================= */

pub struct TerminalApp {
    ui: UiState,
    reveal_delay: Duration,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
    engine: Option<JoinHandle<()>>,
}

impl TerminalApp {
    pub fn new(settings: &GameSettings, narrator: Arc<dyn Narrator>) -> Self {
        let (cmd_tx, resp_rx, engine) = Engine::spawn(narrator, settings.seed);

        Self {
            ui: UiState::default(),
            reveal_delay: Duration::from_millis(settings.reveal_delay_ms),
            cmd_tx,
            resp_rx,
            engine: Some(engine),
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        println!("=== Warring Heroes ===");
        println!("The Han dynasty crumbles. Heroes rise across the land.\n");

        let Some(setup) = setup_character(&mut lines)? else {
            return self.shutdown();
        };
        self.send(EngineCommand::CreateCharacter(setup))?;
        self.wait_for_engine()?;

        loop {
            self.drain();
            print_prompt(self.ui.view.as_ref());

            let Some(line) = lines.next().transpose().context("reading stdin")? else {
                break;
            };
            let line = line.trim();
            match line {
                "" => continue,
                "q" | "quit" | "exit" => break,
                "h" | "help" => {
                    print_help();
                    continue;
                }
                "status" => {
                    if let Some(view) = &self.ui.view {
                        print_status(view);
                    }
                    continue;
                }
                _ => {}
            }

            match PlayerCommand::parse(line) {
                Some(command) => {
                    self.send(EngineCommand::Player(command))?;
                    self.wait_for_engine()?;
                }
                None => println!("Unknown order '{line}'. Type 'help' for the list."),
            }
        }

        self.shutdown()
    }

    fn send(&self, cmd: EngineCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("engine thread has stopped"))
    }

    /// Block for the answer to the command just sent, showing any narration
    /// that lands first.
    fn wait_for_engine(&mut self) -> anyhow::Result<()> {
        loop {
            let resp = self
                .resp_rx
                .recv()
                .map_err(|_| anyhow::anyhow!("engine thread has stopped"))?;
            let answered = resp.is_answer();
            self.show(resp);
            if answered {
                return Ok(());
            }
        }
    }

    /// Print whatever narration arrived in the background.
    fn drain(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            self.show(resp);
        }
    }

    fn show(&mut self, resp: EngineResponse) {
        match resp {
            EngineResponse::Rejected { reason } => println!("  ✖ {reason}"),
            EngineResponse::Answered(view) | EngineResponse::Narration(view) => {
                if let Some(report) = &view.report {
                    self.show_report(report);
                }
                for entry in &view.new_entries {
                    println!("  [{}] {}", entry.category.label(), entry.text);
                }
                self.show_battle_log(&view);
                self.ui.view = Some(view);
            }
        }
    }

    fn show_report(&self, report: &BattleReport) {
        if let Some(strike) = report.player_strike {
            let crit = if strike.critical { " Critical hit!" } else { "" };
            println!("  ⚔ You deal {} damage.{crit}", strike.damage);
        }
        if let Some(strike) = report.enemy_strike {
            let _ = io::stdout().flush();
            std::thread::sleep(self.reveal_delay);
            println!("  ⚔ The enemy answers for {} damage.", strike.damage);
        }
        match report.conclusion {
            Some(Conclusion::Win { gold, exp }) => {
                println!("  ★ Victory after {} rounds: +{gold} gold, +{exp} exp.", report.round)
            }
            Some(Conclusion::Loss { gold_lost, troops_lost }) => {
                println!("  ☠ Defeat: -{gold_lost} gold, -{troops_lost} troops.")
            }
            None => {}
        }
    }

    fn show_battle_log(&mut self, view: &SessionView) {
        let Some(battle) = &view.battle else {
            self.ui.battle_cursor = None;
            return;
        };

        let printed = match self.ui.battle_cursor {
            Some((encounter, printed)) if encounter == battle.encounter => printed,
            _ => 0,
        };
        for line in battle.log.iter().skip(printed) {
            println!("    » {line}");
        }
        self.ui.battle_cursor = Some((battle.encounter, battle.log.len()));
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(handle) = self.engine.take() {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("engine thread panicked"))?;
        }
        println!("Farewell, hero.");
        Ok(())
    }
}

/* =========================
   Setup
   ========================= */

fn setup_character<B: BufRead>(lines: &mut io::Lines<B>) -> anyhow::Result<Option<CharacterSetup>> {
    let Some(name) = ask(lines, "Your name, hero: ", |s| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    })?
    else {
        return Ok(None);
    };

    println!();
    for faction in Faction::PLAYABLE {
        let leader = faction.leader().unwrap_or("no one");
        println!("  {:<4} led by {leader}: {}", faction.label(), faction.description());
    }
    let Some(faction) = ask(lines, "Pledge to which kingdom? ", Faction::parse_playable)? else {
        return Ok(None);
    };

    println!();
    for role in [Role::Warrior, Role::Strategist] {
        let (strength, intellect) = role.base_stats();
        println!(
            "  {:<10} {} (strength {strength}, intellect {intellect})",
            format!("{role:?}").to_lowercase(),
            role.label()
        );
    }
    let Some(role) = ask(lines, "Warrior or strategist? ", Role::parse)? else {
        return Ok(None);
    };

    Ok(Some(CharacterSetup { name, faction, role }))
}

/// Prompt until `parse` accepts a line. `None` on end of input.
fn ask<B, T, F>(lines: &mut io::Lines<B>, prompt: &str, parse: F) -> anyhow::Result<Option<T>>
where
    B: BufRead,
    F: Fn(&str) -> Option<T>,
{
    loop {
        print!("{prompt}");
        io::stdout().flush().ok();
        let Some(line) = lines.next().transpose().context("reading stdin")? else {
            return Ok(None);
        };
        if let Some(value) = parse(&line) {
            return Ok(Some(value));
        }
        println!("  That is not an answer the court understands.");
    }
}

/* =========================
   Printing helpers
   ========================= */

fn print_prompt(view: Option<&SessionView>) {
    let hint = match view.map(|v| v.phase) {
        Some(GamePhase::Battle) => "attack / skill / defend",
        _ => "patrol / recruit / govern / rest",
    };
    print!("\n[{hint}] > ");
    io::stdout().flush().ok();
}

fn print_status(view: &SessionView) {
    let c = &view.character;
    println!(
        "  {} of {} ({}), level {}  exp {}/{}",
        c.name,
        c.faction.label(),
        c.role.label(),
        c.level,
        c.exp,
        c.max_exp
    );
    println!(
        "  hp {}/{}  strength {}  intellect {}  gold {}  troops {}",
        c.hp, c.max_hp, c.strength, c.intellect, c.gold, c.troops
    );
    if let Some(battle) = &view.battle {
        println!(
            "  facing {} {} ({}), hp {}/{}, round {}",
            battle.enemy.title,
            battle.enemy.name,
            battle.enemy.difficulty.label(),
            battle.enemy.hp,
            battle.enemy.max_hp,
            battle.round
        );
    }
}

fn print_help() {
    println!("  Orders:");
    for command in PlayerCommand::ALL {
        println!("    {}", command.keyword());
    }
    println!("    status, help, quit");
}
