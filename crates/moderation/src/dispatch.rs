//! Executes mutation intents through an [`IssueMutator`].

use tracing::{info, info_span, Instrument};

use crate::ports::IssueMutator;
use crate::{ModerationError, MutationIntent};

/// Applies `intents` one after another, in order.
///
/// Later intents may depend on the state produced by earlier ones (a lock
/// follows a close), so nothing runs concurrently. The first failure aborts
/// the remaining intents and is returned.
///
/// Returns the number of intents applied.
pub async fn apply<M>(mutator: &M, intents: &[MutationIntent]) -> Result<usize, ModerationError>
where
    M: IssueMutator + ?Sized,
{
    for (index, intent) in intents.iter().enumerate() {
        let span = info_span!(
            "mutation",
            step = index + 1,
            of = intents.len(),
            operation = intent.operation(),
            node = %intent.target(),
        );
        async {
            match intent {
                MutationIntent::AddComment { subject_id, body } => {
                    mutator.add_comment(subject_id, body).await
                }
                MutationIntent::CloseIssue { issue_id } => mutator.close_issue(issue_id).await,
                MutationIntent::LockLockable { lockable_id } => {
                    mutator.lock_lockable(lockable_id).await
                }
                MutationIntent::DeleteIssueComment { comment_id } => {
                    mutator.delete_issue_comment(comment_id).await
                }
            }?;
            info!("Mutation applied");
            Ok::<_, ModerationError>(())
        }
        .instrument(span)
        .await?;
    }
    Ok(intents.len())
}
