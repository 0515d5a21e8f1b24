pub mod content;
pub mod errors;
pub mod game_settings;
pub mod guess_ledger;
pub mod jobs;
pub mod keys;
pub mod post_store;
pub mod scheduler;
pub mod score_board;
pub mod scoring;
pub mod service;
pub mod submission_gate;
pub mod username_cache;

// Re-export main components
pub use content::{ContentApi, ContentError};
pub use errors::ServiceError;
pub use game_settings::GameSettingsStore;
pub use guess_ledger::{FIRST_SOLVER_COMMENT_DELAY, GuessLedger};
pub use jobs::CommentJobRunner;
pub use keys::KeyLayout;
pub use post_store::PostStore;
pub use scheduler::{
    Job, JobRunner, NoopScheduler, ScheduledJob, Scheduler, SchedulerError, TokioScheduler,
};
pub use score_board::ScoreBoard;
pub use scoring::{RewardSettings, ScoringEngine};
pub use service::{GameService, ServiceSettings};
pub use submission_gate::{DEFAULT_SUBMISSION_LOCK, SubmissionGate};
pub use username_cache::UsernameCache;
