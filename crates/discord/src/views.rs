//! Layouts rendered for `/bot` commands and their follow-up interactions.
//!
//! Views are pure functions of the current mode; callers read settings first
//! and pass the value in.

use modebot_core::Mode;

use crate::components::{
    Button, ButtonStyle, LayoutBuilder, LayoutView, MediaGalleryItem, SelectOption, StringSelect,
};

/// Button on the info view that opens the configuration view.
pub const CONFIG_OPEN_ID: &str = "bot:config:open";
/// Select on the configuration view carrying the chosen mode.
pub const CONFIG_MODE_ID: &str = "bot:config:mode";

pub const PREVIEW_IMAGE_URL: &str = "https://placehold.co/600x400/png";

const ERROR_ACCENT: u32 = 0xED4245;

pub fn info_view(current_mode: &str) -> LayoutView {
    LayoutBuilder::new()
        .container(|container| {
            container
                .text(format!(
                    "Bot is running in **{current_mode}** mode and uses Components V2."
                ))
                .separator()
                .text("Use `/bot config` to change settings or press the button below.")
                .action_row(|row| {
                    row.button(
                        Button::new(CONFIG_OPEN_ID, "Open configuration")
                            .style(ButtonStyle::Primary),
                    );
                })
                .media_gallery([
                    MediaGalleryItem::new(PREVIEW_IMAGE_URL).description("Bot preview")
                ]);
        })
        .build()
}

pub fn config_view(current_mode: &str) -> LayoutView {
    let select = Mode::ALL.iter().fold(
        StringSelect::new(CONFIG_MODE_ID).placeholder("Choose a mode"),
        |select, mode| {
            select.option(
                SelectOption::new(mode.label(), mode.as_str())
                    .default_selected(mode.as_str() == current_mode),
            )
        },
    );

    LayoutBuilder::new()
        .container(|container| {
            container
                .text("Bot settings")
                .separator()
                .text(format!("Current mode: **{current_mode}**"))
                .action_row(|row| {
                    row.select(select);
                });
        })
        .build()
}

pub fn error_view(summary: &str, correlation_id: &str) -> LayoutView {
    LayoutBuilder::new()
        .container(|container| {
            container
                .accent_color(ERROR_ACCENT)
                .text(format!(":warning: {summary}"))
                .separator()
                .text(format!("-# Correlation ID: {correlation_id}"));
        })
        .build()
}
