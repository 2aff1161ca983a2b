//! Reducer for the module loader lifecycle.

use crate::ui::mvi::Reducer;

use super::intent::LoaderIntent;
use super::state::LoaderLifecycleState;

/// Reducer for loader lifecycle transitions.
///
/// Pure function: attaching and invoking happen in the loader service, which
/// reports progress as intents. Intents that don't apply to the current state
/// leave it unchanged.
pub struct LoaderReducer;

impl Reducer for LoaderReducer {
    type State = LoaderLifecycleState;
    type Intent = LoaderIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        use LoaderLifecycleState as S;

        match (state, intent) {
            (S::Unattached, LoaderIntent::Start) => S::Attaching,
            (S::Unattached, LoaderIntent::AlreadyAttached) => S::Initializing,
            (S::Attaching, LoaderIntent::HandleAcquired) => S::Initializing,
            (S::Initializing, LoaderIntent::InitSucceeded) => S::Ready,
            (S::Attaching | S::Initializing, LoaderIntent::Failed { message }) => {
                S::Failed { message }
            }
            (other, _) => other,
        }
    }
}
