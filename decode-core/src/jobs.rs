use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::content::ContentApi;
use crate::scheduler::{Job, JobRunner};

/// Executes scheduled jobs against the content API.
pub struct CommentJobRunner {
    content: Arc<dyn ContentApi>,
}

impl CommentJobRunner {
    pub fn new(content: Arc<dyn ContentApi>) -> Self {
        Self { content }
    }

    pub fn first_solver_text(username: &str) -> String {
        format!("u/{} was the first to decode this post!", username)
    }
}

#[async_trait]
impl JobRunner for CommentJobRunner {
    async fn run(&self, job: Job) -> anyhow::Result<()> {
        match job {
            Job::FirstSolverComment { post_id, username } => {
                let comment_id = self
                    .content
                    .submit_comment(&post_id, &Self::first_solver_text(&username))
                    .await?;
                info!(
                    "Posted first solver comment {} for {} on {}",
                    comment_id, username, post_id
                );
            }
        }
        Ok(())
    }
}
