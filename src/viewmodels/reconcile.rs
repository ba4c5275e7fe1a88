// ============================================================================
// RECONCILE - optimistic updates against an authoritative server
// ============================================================================
// 1. apply the tentative change locally (the UI shows it immediately)
// 2. run the remote mutation
// 3. on failure, do not undo from memory: re-read the server and let that
//    replace local state wholesale
// ============================================================================

use std::future::Future;

use crate::error::ApiError;
use crate::state::reactivity::ReactiveState;

/// Applies `tentative` to `state`, then awaits `mutation`. When the mutation
/// fails, `resync` runs (it is expected to re-read the server and overwrite
/// the state) and the original error is returned.
pub async fn optimistic_update<T, M, Mut, Re, ReFut>(
    state: &ReactiveState<T>,
    tentative: impl FnOnce(&mut T),
    mutation: Mut,
    resync: Re,
) -> Result<M, ApiError>
where
    Mut: Future<Output = Result<M, ApiError>>,
    Re: FnOnce() -> ReFut,
    ReFut: Future<Output = ()>,
{
    state.update(tentative);

    match mutation.await {
        Ok(value) => Ok(value),
        Err(e) => {
            log::warn!("↩️ Optimistic change rejected ({}), re-reading server state", e);
            resync().await;
            Err(e)
        }
    }
}

/// Fires a server-side action, then re-reads unconditionally. The action's
/// own response is never used to build local state.
pub async fn mutate_then_refetch<M, Mut, Re, ReFut>(mutation: Mut, refetch: Re) -> Result<M, ApiError>
where
    Mut: Future<Output = Result<M, ApiError>>,
    Re: FnOnce() -> ReFut,
    ReFut: Future<Output = ()>,
{
    let result = mutation.await;
    if let Err(ref e) = result {
        log::warn!("⚠️ Server action failed ({}), refreshing anyway", e);
    }
    refetch().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn success_keeps_tentative_value() {
        let state = ReactiveState::new("old".to_string());
        let resynced = Cell::new(false);
        let flag = &resynced;

        let result = block_on(optimistic_update(
            &state,
            |v| *v = "new".to_string(),
            async { Ok::<_, ApiError>(()) },
            || async move { flag.set(true) },
        ));

        assert!(result.is_ok());
        assert_eq!(state.get(), "new");
        assert!(!resynced.get());
    }

    #[test]
    fn failure_replaces_state_from_resync() {
        let state = ReactiveState::new("old".to_string());
        let server_copy = state.clone();

        let result = block_on(optimistic_update(
            &state,
            |v| *v = "new".to_string(),
            async { Err::<(), _>(ApiError::transport("Network Error")) },
            || async move { server_copy.set("server".to_string()) },
        ));

        assert_eq!(result, Err(ApiError::Transport("Network Error".into())));
        assert_eq!(state.get(), "server");
    }

    #[test]
    fn refetch_runs_whatever_the_action_returned() {
        let refetches = Rc::new(Cell::new(0));

        for outcome in [Ok(()), Err(ApiError::Timeout(15_000))] {
            let counter = refetches.clone();
            let expected = outcome.clone();
            let result = block_on(mutate_then_refetch(async move { outcome }, || async move {
                counter.set(counter.get() + 1)
            }));
            assert_eq!(result, expected);
        }

        assert_eq!(refetches.get(), 2);
    }
}
