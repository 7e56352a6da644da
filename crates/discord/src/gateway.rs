use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use modebot_core::{ApplicationError, RegistrationScope};

use crate::{
    commands::{command_definitions, ApplicationCommand},
    components::InteractionResponse,
    events::{
        ComponentAction, EventContext, EventDispatcher, HandlerResult, InteractionEnvelope,
        InteractionEvent,
    },
    views,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("command registration failed: {0}")]
    Register(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    #[error("interaction response failed: {0}")]
    Respond(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("registering commands for {scope:?} failed: {source}")]
    Registration { scope: RegistrationScope, source: TransportError },
}

/// Identity reported by the platform once a session is established.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewaySession {
    pub user_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn connect(&self) -> Result<GatewaySession, TransportError>;
    async fn register_commands(
        &self,
        scope: RegistrationScope,
        commands: &[ApplicationCommand],
    ) -> Result<(), TransportError>;
    async fn next_envelope(&self) -> Result<Option<InteractionEnvelope>, TransportError>;
    async fn respond(
        &self,
        interaction_id: &str,
        response: &InteractionResponse,
    ) -> Result<(), TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

/// Transport that connects and immediately reports a closed stream.
#[derive(Default)]
pub struct NoopGatewayTransport;

#[async_trait]
impl GatewayTransport for NoopGatewayTransport {
    async fn connect(&self) -> Result<GatewaySession, TransportError> {
        Ok(GatewaySession { user_name: "modebot".to_owned() })
    }

    async fn register_commands(
        &self,
        _scope: RegistrationScope,
        _commands: &[ApplicationCommand],
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_envelope(&self) -> Result<Option<InteractionEnvelope>, TransportError> {
        Ok(None)
    }

    async fn respond(
        &self,
        _interaction_id: &str,
        _response: &InteractionResponse,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

pub struct GatewayRunner {
    transport: Arc<dyn GatewayTransport>,
    dispatcher: EventDispatcher,
    reconnect_policy: ReconnectPolicy,
    scope: RegistrationScope,
}

impl GatewayRunner {
    pub fn new(
        transport: Arc<dyn GatewayTransport>,
        dispatcher: EventDispatcher,
        reconnect_policy: ReconnectPolicy,
        scope: RegistrationScope,
    ) -> Self {
        Self { transport, dispatcher, reconnect_policy, scope }
    }

    pub fn scope(&self) -> RegistrationScope {
        self.scope
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.connect_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(gateway_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %gateway_error,
                        "gateway transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "gateway retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), GatewayError> {
        debug!(attempt, "opening gateway connection");
        let session = self.transport.connect().await?;
        info!(
            event_name = "system.gateway.ready",
            attempt,
            user_name = %session.user_name,
            "logged in as {}",
            session.user_name
        );

        self.transport
            .register_commands(self.scope, &command_definitions())
            .await
            .map_err(|source| GatewayError::Registration { scope: self.scope, source })?;
        info!(
            event_name = "system.gateway.commands_registered",
            scope = ?self.scope,
            "slash commands registered"
        );

        loop {
            let Some(envelope) = self.transport.next_envelope().await? else {
                info!(attempt, "gateway stream closed");
                self.transport.disconnect().await?;
                return Ok(());
            };

            info!(
                event_name = "ingress.discord.interaction_received",
                interaction_id = %envelope.interaction_id,
                event_type = ?envelope.event.event_type(),
                route = route_label(&envelope.event),
                correlation_id = %envelope.interaction_id,
                "received interaction"
            );

            let Some(response) = self.process(&envelope).await else {
                continue;
            };

            if let Err(error) = self.transport.respond(&envelope.interaction_id, &response).await {
                warn!(
                    event_name = "ingress.discord.response_sent",
                    interaction_id = %envelope.interaction_id,
                    correlation_id = %envelope.interaction_id,
                    error = %error,
                    "failed to send interaction response"
                );
            } else {
                debug!(
                    event_name = "ingress.discord.response_sent",
                    interaction_id = %envelope.interaction_id,
                    correlation_id = %envelope.interaction_id,
                    "interaction response sent"
                );
            }
        }
    }

    async fn process(&self, envelope: &InteractionEnvelope) -> Option<InteractionResponse> {
        let context = EventContext { correlation_id: envelope.interaction_id.clone() };
        match self.dispatcher.dispatch(envelope, &context).await {
            Ok(HandlerResult::Responded(response)) => Some(response),
            Ok(HandlerResult::Ignored) => None,
            Err(error) => {
                warn!(
                    interaction_id = %envelope.interaction_id,
                    correlation_id = %context.correlation_id,
                    error = %error,
                    "interaction dispatch failed; replying with error view"
                );
                let interface =
                    ApplicationError::from(error).into_interface(context.correlation_id);
                Some(InteractionResponse::ephemeral(views::error_view(
                    interface.user_message(),
                    interface.correlation_id(),
                )))
            }
        }
    }
}

fn route_label(event: &InteractionEvent) -> String {
    match event {
        InteractionEvent::SlashCommand(payload) => match &payload.subcommand {
            Some(subcommand) => format!("/{} {subcommand}", payload.command),
            None => format!("/{}", payload.command),
        },
        InteractionEvent::Component(interaction) => match ComponentAction::parse(interaction) {
            ComponentAction::OpenConfig => "config.open".to_owned(),
            ComponentAction::SelectMode { .. } => "config.mode".to_owned(),
            ComponentAction::Unrecognized { .. } => "unrecognized".to_owned(),
        },
        InteractionEvent::Unsupported { event_type } => event_type.clone(),
    }
}
