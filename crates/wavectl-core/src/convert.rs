// Wire → domain conversions.

use wavectl_api::types::{ExpandedInteraction, UserActionMessage, WavelengthOutput};

use crate::model::{Interaction, TuneStatus, UserPrompt};

impl From<WavelengthOutput> for TuneStatus {
    fn from(output: WavelengthOutput) -> Self {
        Self {
            fraction_complete: output.completion_part.clamp(0.0, 1.0),
            in_progress: output.setting_in_progress,
            awaiting_user_action: output.waiting_for_user_action,
            prompts: output.messages.into_iter().map(UserPrompt::from).collect(),
        }
    }
}

impl From<UserActionMessage> for UserPrompt {
    fn from(msg: UserActionMessage) -> Self {
        Self {
            text: msg.text,
            image: msg.image,
        }
    }
}

impl From<ExpandedInteraction> for Interaction {
    fn from(wire: ExpandedInteraction) -> Self {
        Self {
            name: wire.interaction_type,
            from_nm: wire.output_range.from,
            to_nm: wire.output_range.to,
        }
    }
}
