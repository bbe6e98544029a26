//! Expected bot texts and activity builders

use multiturn_prompts_bot::models::{Activity, ChannelAccount};

pub const CHANNEL_ID: &str = "console";
pub const SENTINEL_USER: &str = "default-user";

pub const NAME_PROMPT: &str = "What is your name, human?";
pub const AGE_RETRY: &str = "Sorry, please specify your age as a positive number or say cancel.";
pub const NEGATIVE_AGE: &str = "Your age can't be less than zero.";
pub const CANCELLED: &str = "Ok... Cancelled.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";
pub const DESCRIPTION: &str = "I am a bot that demonstrates the TextPrompt and NumberPrompt classes \
to collect your name and age, then store those values in UserState for later use. \
Say anything to continue.";

pub fn age_prompt(name: &str) -> String {
    format!("And what is your age, {}?", name)
}

pub fn age_confirmation(age: u32) -> String {
    format!("I will remember that you are {} years old.", age)
}

pub fn greeting(name: &str, age: u32) -> String {
    format!("Your name is {} and you are {} years old.", name, age)
}

pub fn message(conversation_id: &str, user_id: &str, text: &str) -> Activity {
    Activity::message(CHANNEL_ID, conversation_id, user_id, text)
}

pub fn members_added(conversation_id: &str, members: &[&str]) -> Activity {
    Activity::conversation_update(
        CHANNEL_ID,
        conversation_id,
        members.first().copied().unwrap_or("someone"),
        members.iter().map(|id| ChannelAccount::new(*id)).collect(),
    )
}
