//! Single-writer session service.
//!
//! One tokio task owns the [`GameSession`]; everything else talks to it
//! through an mpsc command channel and reads back immutable [`Snapshot`]
//! values over oneshot replies. The timer sweep shares the loop, so it
//! serializes with user actions by construction.
//!
//! ```text
//!  SessionHandle ──SessionCommand──►  service loop  ──► GameSession
//!       ▲                                  │                 │
//!       └────────── Snapshot ◄─(oneshot)───┘           ProfileStore
//!                                          ▲
//!                              sweep interval (500 ms)
//! ```

use std::time::Duration;

use chrono::Utc;
use grimoire_types::{Goal, Task, Wizard};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::context::AppConfig;
use crate::store::ProfileStore;

mod session;

pub use session::{GameSession, NewGoalRequest, NewTaskRequest, TaskPatch};

/// Immutable view of the session, cloned out of the loop after every
/// operation. Receivers can never observe a half-applied mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub wizard: Option<Wizard>,
    /// Current task list, builtin and custom.
    pub tasks: Vec<Task>,
    /// Merged goal view: builtin definitions with claim state applied,
    /// then stored custom goals.
    pub goals: Vec<Goal>,
    /// Number of currently-completed tasks.
    pub completed_count: u32,
    /// Stored profile names.
    pub profiles: Vec<String>,
}

type Reply = oneshot::Sender<Snapshot>;

enum SessionCommand {
    CreateProfile { name: String, reply: Reply },
    SwitchProfile { name: String, reply: Reply },
    ClearProfile { name: String, reply: Reply },
    CompleteTask { task_id: String, reply: Reply },
    AddTask { request: NewTaskRequest, reply: Reply },
    EditTask { task_id: String, patch: TaskPatch, reply: Reply },
    DeleteTask { task_id: String, reply: Reply },
    AddGoal { request: NewGoalRequest, reply: Reply },
    ClaimGoal { goal_id: String, reply: Reply },
    DeleteGoal { goal_id: String, reply: Reply },
    StartTimer { task_id: String, reply: Reply },
    StopTimer { task_id: String, reply: Reply },
    GetSnapshot { reply: Reply },
    Shutdown,
}

/// Build the store from config, resolve the active profile, and start the
/// service loop.
pub fn spawn(config: &AppConfig) -> SessionHandle {
    spawn_with(ProfileStore::new(config.store_path()), config.sweep_interval())
}

/// Start the service loop over an explicit store and sweep cadence.
pub fn spawn_with(store: ProfileStore, sweep_interval: Duration) -> SessionHandle {
    let (tx, rx) = mpsc::channel(32);
    let session = GameSession::new(store, Utc::now());
    tokio::spawn(run(session, rx, sweep_interval));
    SessionHandle { tx }
}

async fn run(
    mut session: GameSession,
    mut rx: mpsc::Receiver<SessionCommand>,
    sweep_interval: Duration,
) {
    let mut sweep = tokio::time::interval(sweep_interval);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            cmd = rx.recv() => {
                // A closed channel means every handle is gone.
                let Some(cmd) = cmd else { break };
                if !handle_command(&mut session, cmd) {
                    break;
                }
            }
            _ = sweep.tick() => {
                session.sweep_timers(Utc::now());
            }
        }
    }
    debug!("session service stopped");
}

/// Apply one command and reply with the resulting snapshot. Returns false
/// when the loop should stop.
fn handle_command(session: &mut GameSession, cmd: SessionCommand) -> bool {
    let now = Utc::now();
    let reply = match cmd {
        SessionCommand::CreateProfile { name, reply } => {
            session.create_profile(&name);
            reply
        }
        SessionCommand::SwitchProfile { name, reply } => {
            session.switch_profile(&name, now);
            reply
        }
        SessionCommand::ClearProfile { name, reply } => {
            session.clear_profile(&name, now);
            reply
        }
        SessionCommand::CompleteTask { task_id, reply } => {
            session.complete_task(&task_id, now);
            reply
        }
        SessionCommand::AddTask { request, reply } => {
            session.add_task(request, now);
            reply
        }
        SessionCommand::EditTask { task_id, patch, reply } => {
            session.edit_task(&task_id, patch);
            reply
        }
        SessionCommand::DeleteTask { task_id, reply } => {
            session.delete_task(&task_id);
            reply
        }
        SessionCommand::AddGoal { request, reply } => {
            session.add_goal(request, now);
            reply
        }
        SessionCommand::ClaimGoal { goal_id, reply } => {
            session.claim_goal(&goal_id);
            reply
        }
        SessionCommand::DeleteGoal { goal_id, reply } => {
            session.delete_goal(&goal_id);
            reply
        }
        SessionCommand::StartTimer { task_id, reply } => {
            session.start_timer(&task_id, now);
            reply
        }
        SessionCommand::StopTimer { task_id, reply } => {
            session.stop_timer(&task_id);
            reply
        }
        SessionCommand::GetSnapshot { reply } => reply,
        SessionCommand::Shutdown => return false,
    };
    let _ = reply.send(session.snapshot());
    true
}

/// Cloneable client for the service loop.
///
/// Every method resolves to the post-operation [`Snapshot`]. Once the
/// service has stopped, requests resolve to the empty default snapshot;
/// callers treat that the same as an empty save.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn create_profile(&self, name: impl Into<String>) -> Snapshot {
        let name = name.into();
        self.request(move |reply| SessionCommand::CreateProfile { name, reply })
            .await
    }

    pub async fn switch_profile(&self, name: impl Into<String>) -> Snapshot {
        let name = name.into();
        self.request(move |reply| SessionCommand::SwitchProfile { name, reply })
            .await
    }

    pub async fn clear_profile(&self, name: impl Into<String>) -> Snapshot {
        let name = name.into();
        self.request(move |reply| SessionCommand::ClearProfile { name, reply })
            .await
    }

    pub async fn complete_task(&self, task_id: impl Into<String>) -> Snapshot {
        let task_id = task_id.into();
        self.request(move |reply| SessionCommand::CompleteTask { task_id, reply })
            .await
    }

    pub async fn add_task(&self, request: NewTaskRequest) -> Snapshot {
        self.request(move |reply| SessionCommand::AddTask { request, reply })
            .await
    }

    pub async fn edit_task(&self, task_id: impl Into<String>, patch: TaskPatch) -> Snapshot {
        let task_id = task_id.into();
        self.request(move |reply| SessionCommand::EditTask { task_id, patch, reply })
            .await
    }

    pub async fn delete_task(&self, task_id: impl Into<String>) -> Snapshot {
        let task_id = task_id.into();
        self.request(move |reply| SessionCommand::DeleteTask { task_id, reply })
            .await
    }

    pub async fn add_goal(&self, request: NewGoalRequest) -> Snapshot {
        self.request(move |reply| SessionCommand::AddGoal { request, reply })
            .await
    }

    pub async fn claim_goal(&self, goal_id: impl Into<String>) -> Snapshot {
        let goal_id = goal_id.into();
        self.request(move |reply| SessionCommand::ClaimGoal { goal_id, reply })
            .await
    }

    pub async fn delete_goal(&self, goal_id: impl Into<String>) -> Snapshot {
        let goal_id = goal_id.into();
        self.request(move |reply| SessionCommand::DeleteGoal { goal_id, reply })
            .await
    }

    pub async fn start_timer(&self, task_id: impl Into<String>) -> Snapshot {
        let task_id = task_id.into();
        self.request(move |reply| SessionCommand::StartTimer { task_id, reply })
            .await
    }

    pub async fn stop_timer(&self, task_id: impl Into<String>) -> Snapshot {
        let task_id = task_id.into();
        self.request(move |reply| SessionCommand::StopTimer { task_id, reply })
            .await
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.request(|reply| SessionCommand::GetSnapshot { reply }).await
    }

    /// Stop the loop deterministically. Dropping every handle stops it
    /// too, via channel close.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SessionCommand::Shutdown).await;
    }

    async fn request(
        &self,
        make: impl FnOnce(oneshot::Sender<Snapshot>) -> SessionCommand,
    ) -> Snapshot {
        let (reply, response) = oneshot::channel();
        if self.tx.send(make(reply)).await.is_err() {
            return Snapshot::default();
        }
        response.await.unwrap_or_default()
    }
}
