//! Console host
//!
//! Reads one utterance per line and prints the bot's replies. The session
//! opens with a conversation update that adds the configured user, so the
//! bot introduces itself before the first prompt.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::{error, info, warn};

use crate::bot::PromptBot;
use crate::models::{Activity, ChannelAccount};
use crate::utils::errors::Result;
use crate::utils::helpers::generate_uuid;

/// Bot's own account id in console conversations
pub const BOT_ACCOUNT_ID: &str = "bot";

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Line-oriented adapter between a reader/writer pair and the bot
pub struct ConsoleAdapter<R, W> {
    reader: R,
    writer: W,
    conversation_id: String,
}

impl ConsoleAdapter<BufReader<Stdin>, Stdout> {
    /// Adapter over the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> ConsoleAdapter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            conversation_id: generate_uuid(),
        }
    }

    /// Pin the conversation id instead of generating one
    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = conversation_id.into();
        self
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Drive the conversation until end of input or a quit command
    ///
    /// Returns the number of activities read. Failed turns are logged and
    /// the loop keeps reading; only console I/O errors end the session.
    pub async fn run(&mut self, bot: &PromptBot) -> Result<usize> {
        let channel_id = bot.config().channel_id.clone();
        let user_id = bot.config().description_member_id.clone();
        info!(conversation_id = %self.conversation_id, channel_id = %channel_id, "Console session started");

        let greeting = Activity::conversation_update(
            &channel_id,
            &self.conversation_id,
            &user_id,
            vec![ChannelAccount::new(user_id.as_str()), ChannelAccount::new(BOT_ACCOUNT_ID)],
        );
        let mut processed = 0;
        self.process(bot, greeting).await?;
        processed += 1;

        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                break;
            }

            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            if QUIT_COMMANDS.contains(&text) {
                break;
            }

            let activity = Activity::message(&channel_id, &self.conversation_id, &user_id, text);
            self.process(bot, activity).await?;
            processed += 1;
        }

        self.writer.flush().await?;
        info!(conversation_id = %self.conversation_id, processed, "Console session ended");
        Ok(processed)
    }

    async fn process(&mut self, bot: &PromptBot, activity: Activity) -> Result<()> {
        match bot.process_activity(activity).await {
            Ok(replies) => {
                for reply in replies {
                    self.writer.write_all(reply.as_bytes()).await?;
                    self.writer.write_all(b"\n").await?;
                }
                self.writer.flush().await?;
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Turn failed, waiting for next input");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, severity = %e.severity(), "Turn failed, waiting for next input");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::BotConfig;
    use crate::handlers::messages::BOT_DESCRIPTION;
    use crate::state::MemoryStorage;

    async fn transcript(input: &str) -> (Vec<String>, usize) {
        let bot = PromptBot::new(Arc::new(MemoryStorage::new()), BotConfig::default());
        let mut output = Vec::new();
        let processed = {
            let mut adapter = ConsoleAdapter::new(input.as_bytes(), &mut output);
            adapter.run(&bot).await.unwrap()
        };
        let text = String::from_utf8(output).unwrap();
        (text.lines().map(str::to_string).collect(), processed)
    }

    #[tokio::test]
    async fn test_session_starts_with_description() {
        let (lines, processed) = transcript("").await;
        assert_eq!(lines, [BOT_DESCRIPTION]);
        assert_eq!(processed, 1);
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let (lines, processed) = transcript("hi\nAda\n\n30\nhello\n").await;
        assert_eq!(
            lines,
            [
                BOT_DESCRIPTION,
                "What is your name, human?",
                "And what is your age, Ada?",
                "I will remember that you are 30 years old.",
                "Your name is Ada and you are 30 years old.",
            ]
        );
        assert_eq!(processed, 5);
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let (lines, processed) = transcript("hi\n/quit\nAda\n").await;
        assert_eq!(lines, [BOT_DESCRIPTION, "What is your name, human?"]);
        assert_eq!(processed, 2);
    }
}
