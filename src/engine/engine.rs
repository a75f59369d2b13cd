use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::encounter::EncounterFactory;
use crate::engine::narrator::{run_job, Narrator};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::rng::GameRng;
use crate::engine::session::Session;
use crate::model::battle::BattleReport;
use crate::model::event_result::{CommandOutcome, CommandRejected, PlayerCommand};
use crate::model::game_state::CharacterSetup;
use crate::model::narrative::NarrationResult;

/// Why a view is being published.
enum Reply {
    Answer(Option<BattleReport>),
    Narration,
}

/// Owns the session and applies commands one at a time, in arrival order.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    /// Handed to narration workers so their results queue behind player input.
    loopback: Sender<EngineCommand>,
    narrator: Arc<dyn Narrator>,
    seed: Option<u64>,
    session: Option<Session>,
    cursor: usize,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        loopback: Sender<EngineCommand>,
        narrator: Arc<dyn Narrator>,
        seed: Option<u64>,
    ) -> Self {
        Self {
            rx,
            tx,
            loopback,
            narrator,
            seed,
            session: None,
            cursor: 0,
        }
    }

    /// Start an engine on its own thread.
    pub fn spawn(
        narrator: Arc<dyn Narrator>,
        seed: Option<u64>,
    ) -> (Sender<EngineCommand>, Receiver<EngineResponse>, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let loopback = cmd_tx.clone();

        let handle = std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, loopback, narrator, seed);
            engine.run();
        });

        (cmd_tx, resp_rx, handle)
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::CreateCharacter(setup) => self.create_character(setup),
                EngineCommand::Player(command) => self.player(command),
                EngineCommand::NarrationReady(result) => self.narration_ready(result),
                EngineCommand::Shutdown => {
                    tracing::debug!("engine shutting down");
                    break;
                }
            }
        }
    }

    fn create_character(&mut self, setup: CharacterSetup) {
        if self.session.is_some() {
            self.reject("a general has already taken the field".into());
            return;
        }

        let rng = match self.seed {
            Some(seed) => GameRng::seeded(seed),
            None => GameRng::from_entropy(),
        };
        let factory = EncounterFactory::new(Arc::clone(&self.narrator));

        match Session::new(setup, factory, rng) {
            Ok(session) => {
                self.session = Some(session);
                self.cursor = 0;
                self.publish(Reply::Answer(None));
            }
            Err(err) => self.reject(err.to_string()),
        }
    }

    fn player(&mut self, command: PlayerCommand) {
        let Some(session) = self.session.as_mut() else {
            self.reject(CommandRejected::NoCharacter.to_string());
            return;
        };

        match session.handle(command) {
            Ok(CommandOutcome::Battle(report)) => self.publish(Reply::Answer(Some(report))),
            Ok(CommandOutcome::Economy { .. }) => self.publish(Reply::Answer(None)),
            Err(rejected) => {
                tracing::debug!(?command, reason = %rejected, "command rejected");
                self.reject(rejected.to_string());
            }
        }
    }

    fn narration_ready(&mut self, result: NarrationResult) {
        if let Some(session) = self.session.as_mut() {
            session.merge_narration(result);
            self.publish(Reply::Narration);
        }
    }

    /// Send the fresh view and hand any queued narration to workers.
    fn publish(&mut self, reply: Reply) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let jobs = session.take_narration_jobs();
        let response = match reply {
            Reply::Answer(report) => EngineResponse::Answered(session.view(self.cursor, report)),
            Reply::Narration => EngineResponse::Narration(session.view(self.cursor, None)),
        };
        self.cursor = session.log().len();
        let _ = self.tx.send(response);

        for job in jobs {
            let narrator = Arc::clone(&self.narrator);
            let loopback = self.loopback.clone();
            std::thread::spawn(move || {
                let result = run_job(narrator.as_ref(), &job);
                // The engine may be gone by now; late text is dropped.
                let _ = loopback.send(EngineCommand::NarrationReady(result));
            });
        }
    }

    fn reject(&self, reason: String) {
        let _ = self.tx.send(EngineResponse::Rejected { reason });
    }
}
