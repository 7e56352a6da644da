use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use modebot_core::{ApplicationError, DomainError, Mode};
use modebot_db::{ConfigStore, StorageError};

use crate::{
    commands::{
        parse_bot_command, CommandParseError, CommandRouteError, CommandRouter,
        SlashCommandPayload,
    },
    components::InteractionResponse,
    settings::BotSettings,
    views::{self, CONFIG_MODE_ID, CONFIG_OPEN_ID},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionEnvelope {
    pub interaction_id: String,
    pub event: InteractionEvent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
    SlashCommand(SlashCommandPayload),
    Component(ComponentInteraction),
    Unsupported { event_type: String },
}

impl InteractionEvent {
    pub fn event_type(&self) -> InteractionEventType {
        match self {
            Self::SlashCommand(_) => InteractionEventType::SlashCommand,
            Self::Component(_) => InteractionEventType::Component,
            Self::Unsupported { .. } => InteractionEventType::Unsupported,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionEventType {
    SlashCommand,
    Component,
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentInteraction {
    pub custom_id: String,
    pub values: Vec<String>,
    pub user_id: String,
    pub channel_id: String,
}

/// Known component identifiers. Matching is exact; anything else is
/// `Unrecognized` and dropped without a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentAction {
    OpenConfig,
    SelectMode { values: Vec<String> },
    Unrecognized { custom_id: String },
}

impl ComponentAction {
    pub fn parse(interaction: &ComponentInteraction) -> Self {
        match interaction.custom_id.as_str() {
            CONFIG_OPEN_ID => Self::OpenConfig,
            CONFIG_MODE_ID => Self::SelectMode { values: interaction.values.clone() },
            other => Self::Unrecognized { custom_id: other.to_owned() },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(InteractionResponse),
    Ignored,
}

#[derive(Debug, Error)]
pub enum EventHandlerError {
    #[error(transparent)]
    Parse(#[from] CommandParseError),
    #[error(transparent)]
    Route(#[from] CommandRouteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

impl From<DispatchError> for ApplicationError {
    fn from(value: DispatchError) -> Self {
        let DispatchError::Handler(error) = value;
        match error {
            EventHandlerError::Parse(CommandParseError::UnsupportedCommand(command))
            | EventHandlerError::Parse(CommandParseError::MissingSubcommand(command)) => {
                DomainError::UnsupportedCommand(command).into()
            }
            EventHandlerError::Route(CommandRouteError::Storage(error))
            | EventHandlerError::Storage(error) => error.into(),
        }
    }
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> InteractionEventType;
    async fn handle(
        &self,
        envelope: &InteractionEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<InteractionEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &InteractionEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&envelope.event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Dispatcher for the `/bot` command group and its views, backed by `store`.
pub fn bot_dispatcher(store: Arc<dyn ConfigStore>) -> EventDispatcher {
    let settings = BotSettings::new(store);
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(SlashCommandHandler::new(settings.clone()));
    dispatcher.register(ComponentInteractionHandler::new(settings));
    dispatcher
}

pub struct SlashCommandHandler {
    router: CommandRouter,
}

impl SlashCommandHandler {
    pub fn new(settings: BotSettings) -> Self {
        Self { router: CommandRouter::new(settings) }
    }
}

#[async_trait]
impl EventHandler for SlashCommandHandler {
    fn event_type(&self) -> InteractionEventType {
        InteractionEventType::SlashCommand
    }

    async fn handle(
        &self,
        envelope: &InteractionEnvelope,
        _ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let InteractionEvent::SlashCommand(payload) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let command = parse_bot_command(payload)?;
        let response = self.router.route(command, payload).await?;
        Ok(HandlerResult::Responded(response))
    }
}

/// Routes button and select interactions from rendered views.
pub struct ComponentInteractionHandler {
    settings: BotSettings,
}

impl ComponentInteractionHandler {
    pub fn new(settings: BotSettings) -> Self {
        Self { settings }
    }

    async fn config_response(&self) -> Result<HandlerResult, EventHandlerError> {
        let mode = self.settings.current_mode().await?;
        Ok(HandlerResult::Responded(InteractionResponse::ephemeral(views::config_view(&mode))))
    }
}

#[async_trait]
impl EventHandler for ComponentInteractionHandler {
    fn event_type(&self) -> InteractionEventType {
        InteractionEventType::Component
    }

    async fn handle(
        &self,
        envelope: &InteractionEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let InteractionEvent::Component(interaction) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        match ComponentAction::parse(interaction) {
            ComponentAction::OpenConfig => self.config_response().await,
            ComponentAction::SelectMode { values } => {
                if let Some(selected) = values.first() {
                    match selected.parse::<Mode>() {
                        Ok(mode) => self.settings.set_mode(mode, &ctx.correlation_id).await?,
                        Err(error) => warn!(
                            event_name = "config.mode.rejected",
                            correlation_id = %ctx.correlation_id,
                            user_id = %interaction.user_id,
                            error = %error,
                            "ignoring unsupported mode selection"
                        ),
                    }
                }
                self.config_response().await
            }
            ComponentAction::Unrecognized { custom_id } => {
                debug!(
                    event_name = "ingress.discord.component_ignored",
                    correlation_id = %ctx.correlation_id,
                    custom_id = %custom_id,
                    "ignoring unrecognized component interaction"
                );
                Ok(HandlerResult::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use modebot_core::{ApplicationError, InterfaceError};
    use modebot_db::{ConfigStore, InMemoryConfigStore, StorageError};

    use super::{
        bot_dispatcher, ComponentAction, ComponentInteraction, DispatchError, EventContext,
        EventDispatcher, HandlerResult, InteractionEnvelope, InteractionEvent,
    };
    use crate::commands::SlashCommandPayload;
    use crate::views::{CONFIG_MODE_ID, CONFIG_OPEN_ID};

    struct UnavailableStore;

    #[async_trait]
    impl ConfigStore for UnavailableStore {
        async fn get(
            &self,
            _key: &str,
            _default: Option<&str>,
        ) -> Result<Option<String>, StorageError> {
            Err(StorageError::Database(sqlx::Error::PoolClosed))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Database(sqlx::Error::PoolClosed))
        }
    }

    fn component(custom_id: &str, values: &[&str]) -> InteractionEnvelope {
        InteractionEnvelope {
            interaction_id: "int-1".to_owned(),
            event: InteractionEvent::Component(ComponentInteraction {
                custom_id: custom_id.to_owned(),
                values: values.iter().map(|value| (*value).to_owned()).collect(),
                user_id: "U1".to_owned(),
                channel_id: "C1".to_owned(),
            }),
        }
    }

    fn slash(subcommand: &str) -> InteractionEnvelope {
        InteractionEnvelope {
            interaction_id: "int-2".to_owned(),
            event: InteractionEvent::SlashCommand(SlashCommandPayload {
                command: "bot".to_owned(),
                subcommand: Some(subcommand.to_owned()),
                user_id: "U1".to_owned(),
                channel_id: "C1".to_owned(),
                guild_id: None,
                request_id: "req-1".to_owned(),
            }),
        }
    }

    fn responded(result: HandlerResult) -> crate::components::InteractionResponse {
        match result {
            HandlerResult::Responded(response) => response,
            other => panic!("expected a response, got {other:?}"),
        }
    }

    #[test]
    fn component_identifiers_parse_into_closed_actions() {
        let open = ComponentInteraction {
            custom_id: CONFIG_OPEN_ID.to_owned(),
            values: Vec::new(),
            user_id: "U1".to_owned(),
            channel_id: "C1".to_owned(),
        };
        assert_eq!(ComponentAction::parse(&open), ComponentAction::OpenConfig);

        let select = ComponentInteraction {
            custom_id: CONFIG_MODE_ID.to_owned(),
            values: vec!["quiet".to_owned()],
            ..open.clone()
        };
        assert_eq!(
            ComponentAction::parse(&select),
            ComponentAction::SelectMode { values: vec!["quiet".to_owned()] }
        );

        let prefixed = ComponentInteraction { custom_id: "bot:config:open:extra".to_owned(), ..open };
        assert_eq!(
            ComponentAction::parse(&prefixed),
            ComponentAction::Unrecognized { custom_id: "bot:config:open:extra".to_owned() }
        );
    }

    #[test]
    fn bot_dispatcher_registers_command_and_component_handlers() {
        let dispatcher = bot_dispatcher(Arc::new(InMemoryConfigStore::default()));
        assert_eq!(dispatcher.handler_count(), 2);
    }

    #[tokio::test]
    async fn mode_selection_writes_first_value_and_rerenders() {
        let store = Arc::new(InMemoryConfigStore::default());
        let dispatcher = bot_dispatcher(store.clone());

        let result = dispatcher
            .dispatch(&component(CONFIG_MODE_ID, &["verbose"]), &EventContext::default())
            .await
            .expect("dispatch");

        assert_eq!(store.get("mode", None).await.expect("get"), Some("verbose".to_owned()));
        let response = responded(result);
        assert!(response.ephemeral);
        assert!(response.view.text_contents().contains(&"Current mode: **verbose**"));
        let select = response.view.find_select(CONFIG_MODE_ID).expect("mode select");
        assert_eq!(select.selected_value(), Some("verbose"));
    }

    #[tokio::test]
    async fn empty_mode_selection_keeps_prior_value() {
        let store = Arc::new(InMemoryConfigStore::with_entries([("mode", "quiet")]));
        let dispatcher = bot_dispatcher(store.clone());

        let result = dispatcher
            .dispatch(&component(CONFIG_MODE_ID, &[]), &EventContext::default())
            .await
            .expect("dispatch");

        assert_eq!(store.get("mode", None).await.expect("get"), Some("quiet".to_owned()));
        let response = responded(result);
        assert!(response.view.text_contents().contains(&"Current mode: **quiet**"));
    }

    #[tokio::test]
    async fn unsupported_mode_value_is_not_written() {
        let store = Arc::new(InMemoryConfigStore::with_entries([("mode", "quiet")]));
        let dispatcher = bot_dispatcher(store.clone());

        let result = dispatcher
            .dispatch(&component(CONFIG_MODE_ID, &["loud", "verbose"]), &EventContext::default())
            .await
            .expect("dispatch");

        assert_eq!(store.get("mode", None).await.expect("get"), Some("quiet".to_owned()));
        assert!(matches!(result, HandlerResult::Responded(_)));
    }

    #[tokio::test]
    async fn open_button_renders_config_view_without_writing() {
        let store = Arc::new(InMemoryConfigStore::default());
        let dispatcher = bot_dispatcher(store.clone());

        let result = dispatcher
            .dispatch(&component(CONFIG_OPEN_ID, &[]), &EventContext::default())
            .await
            .expect("dispatch");

        assert!(store.is_empty().await);
        let response = responded(result);
        let select = response.view.find_select(CONFIG_MODE_ID).expect("mode select");
        assert_eq!(select.selected_value(), Some("standard"));
    }

    #[tokio::test]
    async fn unrelated_identifier_is_ignored_without_write() {
        let store = Arc::new(InMemoryConfigStore::default());
        let dispatcher = bot_dispatcher(store.clone());

        let result = dispatcher
            .dispatch(&component("some:other:id", &["verbose"]), &EventContext::default())
            .await
            .expect("dispatch");

        assert_eq!(result, HandlerResult::Ignored);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unsupported_event_kinds_are_ignored() {
        let dispatcher = bot_dispatcher(Arc::new(InMemoryConfigStore::default()));
        let envelope = InteractionEnvelope {
            interaction_id: "int-3".to_owned(),
            event: InteractionEvent::Unsupported { event_type: "autocomplete".to_owned() },
        };

        let result =
            dispatcher.dispatch(&envelope, &EventContext::default()).await.expect("dispatch");

        assert_eq!(result, HandlerResult::Ignored);
    }

    #[tokio::test]
    async fn dispatcher_returns_ignored_when_no_handler_registered() {
        let dispatcher = EventDispatcher::new();

        let result = dispatcher
            .dispatch(&component(CONFIG_OPEN_ID, &[]), &EventContext::default())
            .await
            .expect("dispatch");

        assert_eq!(result, HandlerResult::Ignored);
    }

    #[tokio::test]
    async fn slash_commands_render_info_then_config() {
        let store = Arc::new(InMemoryConfigStore::with_entries([("mode", "verbose")]));
        let dispatcher = bot_dispatcher(store);

        let info = responded(
            dispatcher.dispatch(&slash("info"), &EventContext::default()).await.expect("info"),
        );
        assert!(info.view.text_contents()[0].contains("**verbose**"));
        assert!(info.view.find_button(CONFIG_OPEN_ID).is_some());

        let config = responded(
            dispatcher.dispatch(&slash("config"), &EventContext::default()).await.expect("config"),
        );
        assert_eq!(
            config.view.find_select(CONFIG_MODE_ID).and_then(|select| select.selected_value()),
            Some("verbose")
        );
    }

    #[tokio::test]
    async fn storage_failures_propagate_as_persistence_errors() {
        let dispatcher = bot_dispatcher(Arc::new(UnavailableStore));

        let error = dispatcher
            .dispatch(&component(CONFIG_MODE_ID, &["quiet"]), &EventContext::default())
            .await
            .expect_err("storage failure should surface");

        assert!(matches!(ApplicationError::from(error), ApplicationError::Persistence(_)));
    }

    #[tokio::test]
    async fn foreign_slash_command_maps_to_bad_request() {
        let dispatcher = bot_dispatcher(Arc::new(InMemoryConfigStore::default()));
        let mut envelope = slash("info");
        if let InteractionEvent::SlashCommand(payload) = &mut envelope.event {
            payload.command = "quote".to_owned();
        }

        let error = dispatcher
            .dispatch(&envelope, &EventContext::default())
            .await
            .expect_err("foreign command should be rejected");

        let interface = ApplicationError::from(error).into_interface("int-2");
        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
        assert_eq!(interface.correlation_id(), "int-2");
    }

    #[tokio::test]
    async fn slash_command_storage_failure_is_reported() {
        let dispatcher = bot_dispatcher(Arc::new(UnavailableStore));

        let result = dispatcher.dispatch(&slash("info"), &EventContext::default()).await;

        assert!(matches!(result, Err(DispatchError::Handler(_))));
    }
}
