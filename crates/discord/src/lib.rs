//! Discord interface for modebot.
//!
//! - **Gateway** (`gateway`) - connection loop, command registration, reconnect backoff
//! - **Slash commands** (`commands`) - the `/bot info` and `/bot config` group
//! - **Events** (`events`) - dispatcher and the component interaction router
//! - **Components** (`components`) - typed components-v2 layouts
//! - **Views** (`views`) - layouts rendered from the current mode
//!
//! # Architecture
//!
//! ```text
//! Gateway → EventDispatcher → Handlers → BotSettings → ConfigStore
//!                ↓
//!          LayoutView ← Response
//! ```

pub mod commands;
pub mod components;
pub mod events;
pub mod gateway;
pub mod settings;
pub mod views;
