//! Stage selection — the one real decision in the system.

use crate::state::ClientState;

use super::classify::Category;
use super::prompts;
use super::stage::Stage;

/// Walk the fixed stage order and return the first stage the client has not
/// completed, paired with its instruction text. `None` means the flow is
/// complete and nothing should be sent.
pub fn next_stage(state: &ClientState) -> Option<(Stage, String)> {
    let category = state.category.unwrap_or(Category::Unknown);
    Stage::ORDER
        .into_iter()
        .find(|stage| !state.completed.contains(stage))
        .map(|stage| (stage, prompts::instruction(stage, category)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(completed: &[Stage]) -> ClientState {
        let mut state = ClientState::new("+1555");
        for stage in completed {
            state.completed.insert(*stage);
        }
        state
    }

    #[test]
    fn fresh_client_gets_first_stage() {
        let (stage, instruction) = next_stage(&state_with(&[])).unwrap();
        assert_eq!(stage, Stage::Greeting);
        assert!(instruction.contains("Suelen"));
    }

    #[test]
    fn stages_come_back_strictly_in_order() {
        let mut state = state_with(&[]);
        for expected in Stage::ORDER {
            let (stage, _) = next_stage(&state).unwrap();
            assert_eq!(stage, expected);
            state.completed.insert(stage);
        }
        assert!(next_stage(&state).is_none());
    }

    #[test]
    fn completed_stage_is_never_returned_again() {
        let state = state_with(&[Stage::Greeting]);
        let (stage, _) = next_stage(&state).unwrap();
        assert_eq!(stage, Stage::Qualify);
    }

    #[test]
    fn all_complete_means_silence() {
        let state = state_with(&Stage::ORDER);
        assert!(next_stage(&state).is_none());
    }

    #[test]
    fn showcase_instruction_follows_client_category() {
        let mut state = state_with(&[Stage::Greeting, Stage::Qualify]);
        state.category = Some(Category::Man);
        let (stage, instruction) = next_stage(&state).unwrap();
        assert_eq!(stage, Stage::Showcase);
        assert!(instruction.contains("talesgabbi"));
    }

    #[test]
    fn unset_category_is_treated_as_unknown() {
        let state = state_with(&[Stage::Greeting, Stage::Qualify]);
        let (_, instruction) = next_stage(&state).unwrap();
        assert!(instruction.contains("Pergunte"));
    }
}
