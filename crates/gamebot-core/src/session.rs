use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::Config,
    dispatch::{log_store_failure, Dispatcher, Reply},
    domain::InboundMessage,
    formatting::split_message,
    messaging::{port::MessagingPort, types::ReplyKeyboard},
    persistence::{RetryPolicy, RetryingStore},
    ports::{RandomSource, TranscriptStore},
    registry::CommandRegistry,
};

/// Per-process bot state: the dispatcher plus the outbound side of the pipeline.
///
/// One call to [`BotSession::handle`] processes one inbound message end to end:
/// dispatch (which records the inbound line), send, then record the reply.
pub struct BotSession {
    dispatcher: Dispatcher,
    store: Arc<dyn TranscriptStore>,
    messenger: Arc<dyn MessagingPort>,
    menu: ReplyKeyboard,
}

impl BotSession {
    /// Wire a session from config. The store is wrapped with the configured retry policy.
    pub fn new(
        cfg: &Config,
        store: Arc<dyn TranscriptStore>,
        messenger: Arc<dyn MessagingPort>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        let store: Arc<dyn TranscriptStore> = Arc::new(RetryingStore::new(
            store,
            RetryPolicy {
                max_retries: cfg.persist_max_retries,
                delay: cfg.persist_retry_delay,
            },
        ));
        let dispatcher = Dispatcher::new(CommandRegistry::new(), rng, store.clone());
        Self::with_parts(dispatcher, store, messenger)
    }

    pub fn with_parts(
        dispatcher: Dispatcher,
        store: Arc<dyn TranscriptStore>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        let menu = ReplyKeyboard::main_menu();
        info!(buttons = menu.labels().count(), "main menu ready");
        Self {
            dispatcher,
            store,
            messenger,
            menu,
        }
    }

    /// Handle one inbound message. Never fails: transport and store errors are
    /// logged and the pipeline carries on.
    pub async fn handle(&self, msg: InboundMessage) -> Reply {
        let reply = self.dispatcher.dispatch(&msg).await;
        self.send(&msg, &reply).await;

        log_store_failure(
            "append_message",
            self.store
                .append_message(msg.sender.id, &reply.text, true)
                .await,
        );

        reply
    }

    async fn send(&self, msg: &InboundMessage, reply: &Reply) {
        let caps = self.messenger.capabilities();
        let keyboard = (reply.show_menu && caps.supports_reply_keyboards).then_some(&self.menu);

        let chunks = split_message(&reply.text, caps.max_message_len);
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.iter().enumerate() {
            let kb = if i == last { keyboard } else { None };
            if let Err(e) = self.messenger.send_text(msg.chat_id, chunk, kb).await {
                warn!(
                    chat_id = msg.chat_id.0,
                    user_id = msg.sender.id.0,
                    "failed to send reply: {e}"
                );
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, MessageId, MessageRef, UserId, UserProfile};
    use crate::errors::Error;
    use crate::messaging::types::MessagingCapabilities;
    use crate::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Upsert(i64, Option<String>, String),
        Append(i64, String, bool),
        Send(i64, String, bool),
    }

    /// Store and messenger share one event log so ordering can be asserted.
    #[derive(Default)]
    struct Journal {
        events: Mutex<Vec<Event>>,
    }

    impl Journal {
        fn push(&self, e: Event) {
            self.events.lock().unwrap().push(e);
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    struct FakeStore {
        journal: Arc<Journal>,
        fail: bool,
    }

    #[async_trait]
    impl TranscriptStore for FakeStore {
        async fn upsert_user(
            &self,
            id: UserId,
            handle: Option<&str>,
            first_name: &str,
        ) -> Result<()> {
            if self.fail {
                return Err(Error::Persistence("read-only database".to_string()));
            }
            self.journal.push(Event::Upsert(
                id.0,
                handle.map(str::to_string),
                first_name.to_string(),
            ));
            Ok(())
        }

        async fn append_message(&self, user_id: UserId, text: &str, is_bot: bool) -> Result<()> {
            if self.fail {
                return Err(Error::Persistence("read-only database".to_string()));
            }
            self.journal
                .push(Event::Append(user_id.0, text.to_string(), is_bot));
            Ok(())
        }
    }

    struct FakeMessenger {
        journal: Arc<Journal>,
        max_len: usize,
        fail: bool,
        keyboards: Mutex<Vec<ReplyKeyboard>>,
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_reply_keyboards: true,
                max_message_len: self.max_len,
            }
        }

        async fn send_text(
            &self,
            chat_id: ChatId,
            text: &str,
            keyboard: Option<&ReplyKeyboard>,
        ) -> Result<MessageRef> {
            if self.fail {
                return Err(Error::Transport("Bad Gateway".to_string()));
            }
            self.journal
                .push(Event::Send(chat_id.0, text.to_string(), keyboard.is_some()));
            if let Some(kb) = keyboard {
                self.keyboards.lock().unwrap().push(kb.clone());
            }
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }
    }

    /// Pops scripted values; counts draws.
    #[derive(Default)]
    struct ScriptedRandom {
        values: Mutex<VecDeque<u32>>,
        draws: AtomicUsize,
    }

    impl ScriptedRandom {
        fn new(values: &[u32]) -> Self {
            Self {
                values: Mutex::new(values.iter().copied().collect()),
                draws: AtomicUsize::new(0),
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn uniform(&self, low: u32, _high: u32) -> u32 {
            self.draws.fetch_add(1, Ordering::SeqCst);
            self.values.lock().unwrap().pop_front().unwrap_or(low)
        }
    }

    struct Harness {
        journal: Arc<Journal>,
        messenger: Arc<FakeMessenger>,
        rng: Arc<ScriptedRandom>,
        session: BotSession,
    }

    fn cfg() -> Config {
        Config {
            bot_token: "x".to_string(),
            admin_id: 0,
            database_path: ":memory:".into(),
            persist_max_retries: 0,
            persist_retry_delay: Duration::from_millis(1),
        }
    }

    fn harness(draws: &[u32], store_fails: bool, send_fails: bool, max_len: usize) -> Harness {
        let journal = Arc::new(Journal::default());
        let store = Arc::new(FakeStore {
            journal: journal.clone(),
            fail: store_fails,
        });
        let messenger = Arc::new(FakeMessenger {
            journal: journal.clone(),
            max_len,
            fail: send_fails,
            keyboards: Mutex::new(Vec::new()),
        });
        let rng = Arc::new(ScriptedRandom::new(draws));
        let session = BotSession::new(&cfg(), store, messenger.clone(), rng.clone());
        Harness {
            journal,
            messenger,
            rng,
            session,
        }
    }

    fn from_ann(text: &str) -> InboundMessage {
        InboundMessage {
            chat_id: ChatId(1),
            text: text.to_string(),
            sender: UserProfile {
                id: UserId(1),
                handle: None,
                first_name: "Ann".to_string(),
                last_name: None,
                is_bot: false,
            },
        }
    }

    #[tokio::test]
    async fn start_scenario_orders_upsert_log_send_log() {
        let h = harness(&[], false, false, 4096);
        let reply = h.session.handle(from_ann("/start")).await;

        assert!(reply.text.contains("Ann"));
        assert!(reply.text.contains("/profile"));
        assert_eq!(
            h.journal.events(),
            vec![
                Event::Upsert(1, None, "Ann".to_string()),
                Event::Append(1, "/start".to_string(), false),
                Event::Send(1, reply.text.clone(), true),
                Event::Append(1, reply.text.clone(), true),
            ]
        );
        assert_eq!(
            *h.messenger.keyboards.lock().unwrap(),
            vec![ReplyKeyboard::main_menu()]
        );
    }

    #[tokio::test]
    async fn guess_scenario_win() {
        let h = harness(&[50], false, false, 4096);
        let reply = h.session.handle(from_ann("50")).await;

        assert_eq!(reply.text, "🎉 HOORAY! You guessed it! The number was 50");
        let events = h.journal.events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], Event::Upsert(1, None, "Ann".to_string()));
        assert_eq!(events[1], Event::Append(1, "50".to_string(), false));
        assert_eq!(events[2], Event::Send(1, reply.text.clone(), false));
        assert_eq!(events[3], Event::Append(1, reply.text.clone(), true));
    }

    #[tokio::test]
    async fn guess_scenario_out_of_range() {
        let h = harness(&[50], false, false, 4096);
        let reply = h.session.handle(from_ann("200")).await;

        assert!(reply.text.contains("from 1 to 100"));
        assert_eq!(h.rng.draws.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rps_scenario_rock_beats_scissors() {
        let h = harness(&[1], false, false, 4096);
        let reply = h.session.handle(from_ann("rock")).await;

        assert!(reply.text.contains("Your choice: rock"));
        assert!(reply.text.contains("My choice: scissors"));
        assert!(reply.text.contains("You won!"));
    }

    #[tokio::test]
    async fn echo_scenario() {
        let h = harness(&[], false, false, 4096);
        let reply = h.session.handle(from_ann("hello world")).await;

        assert!(reply.text.contains("hello world"));
        assert_eq!(h.journal.events().len(), 4);
    }

    #[tokio::test]
    async fn reply_is_sent_when_store_fails() {
        let h = harness(&[], true, false, 4096);
        let reply = h.session.handle(from_ann("/help")).await;

        assert_eq!(
            h.journal.events(),
            vec![Event::Send(1, reply.text.clone(), false)]
        );
    }

    #[tokio::test]
    async fn outbound_is_logged_when_send_fails() {
        let h = harness(&[], false, true, 4096);
        let reply = h.session.handle(from_ann("hi")).await;

        assert_eq!(
            h.journal.events(),
            vec![
                Event::Upsert(1, None, "Ann".to_string()),
                Event::Append(1, "hi".to_string(), false),
                Event::Append(1, reply.text.clone(), true),
            ]
        );
    }

    #[tokio::test]
    async fn long_replies_are_split_but_logged_once() {
        let h = harness(&[], false, false, 64);
        let long = "x".repeat(200);
        let reply = h.session.handle(from_ann(&long)).await;

        let events = h.journal.events();
        let sends: Vec<&Event> = events
            .iter()
            .filter(|e| matches!(e, Event::Send(..)))
            .collect();
        assert!(sends.len() > 1);
        let outbound: Vec<&Event> = events
            .iter()
            .filter(|e| matches!(e, Event::Append(_, _, true)))
            .collect();
        assert_eq!(outbound, vec![&Event::Append(1, reply.text.clone(), true)]);
    }
}
