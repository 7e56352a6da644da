use serde::{Serialize, Serializer};

/// Interaction callback type for "respond with a channel message".
pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
pub const EPHEMERAL_FLAG: u64 = 1 << 6;
pub const COMPONENTS_V2_FLAG: u64 = 1 << 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    ActionRow = 1,
    Button = 2,
    StringSelect = 3,
    TextDisplay = 10,
    MediaGallery = 12,
    Separator = 14,
    Container = 17,
}

impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary = 1,
    Secondary = 2,
    Success = 3,
    Danger = 4,
}

impl Serialize for ButtonStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Container(Container),
    TextDisplay(TextDisplay),
    Separator(Separator),
    ActionRow(ActionRow),
    MediaGallery(MediaGallery),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Interactive {
    Button(Button),
    StringSelect(StringSelect),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Container {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub components: Vec<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextDisplay {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub content: String,
}

impl TextDisplay {
    pub fn new(content: impl Into<String>) -> Self {
        Self { kind: ComponentType::TextDisplay, content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Separator {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub divider: bool,
    pub spacing: u8,
}

impl Default for Separator {
    fn default() -> Self {
        Self { kind: ComponentType::Separator, divider: true, spacing: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub components: Vec<Interactive>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
}

impl Button {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ComponentType::Button,
            custom_id: custom_id.into(),
            label: label.into(),
            style: ButtonStyle::Secondary,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StringSelect {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub custom_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
    pub min_values: u8,
    pub max_values: u8,
}

impl StringSelect {
    pub fn new(custom_id: impl Into<String>) -> Self {
        Self {
            kind: ComponentType::StringSelect,
            custom_id: custom_id.into(),
            placeholder: None,
            options: Vec::new(),
            min_values: 1,
            max_values: 1,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.options.iter().find(|option| option.default).map(|option| option.value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into(), default: false }
    }

    pub fn default_selected(mut self, default: bool) -> Self {
        self.default = default;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MediaGallery {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub items: Vec<MediaGalleryItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MediaGalleryItem {
    pub media: UnfurledMedia,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MediaGalleryItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self { media: UnfurledMedia { url: url.into() }, description: None }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnfurledMedia {
    pub url: String,
}

/// A complete message layout. Every response replaces the previous view whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LayoutView {
    pub components: Vec<Component>,
}

impl LayoutView {
    /// Text of every text display in document order, including nested ones.
    pub fn text_contents(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        collect_texts(&self.components, &mut texts);
        texts
    }

    pub fn interactive(&self) -> Vec<&Interactive> {
        let mut elements = Vec::new();
        collect_interactive(&self.components, &mut elements);
        elements
    }

    pub fn find_select(&self, custom_id: &str) -> Option<&StringSelect> {
        self.interactive().into_iter().find_map(|element| match element {
            Interactive::StringSelect(select) if select.custom_id == custom_id => Some(select),
            _ => None,
        })
    }

    pub fn find_button(&self, custom_id: &str) -> Option<&Button> {
        self.interactive().into_iter().find_map(|element| match element {
            Interactive::Button(button) if button.custom_id == custom_id => Some(button),
            _ => None,
        })
    }
}

fn collect_texts<'a>(components: &'a [Component], texts: &mut Vec<&'a str>) {
    for component in components {
        match component {
            Component::TextDisplay(text) => texts.push(text.content.as_str()),
            Component::Container(container) => collect_texts(&container.components, texts),
            Component::Separator(_) | Component::ActionRow(_) | Component::MediaGallery(_) => {}
        }
    }
}

fn collect_interactive<'a>(components: &'a [Component], elements: &mut Vec<&'a Interactive>) {
    for component in components {
        match component {
            Component::ActionRow(row) => elements.extend(row.components.iter()),
            Component::Container(container) => {
                collect_interactive(&container.components, elements)
            }
            Component::TextDisplay(_) | Component::Separator(_) | Component::MediaGallery(_) => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionResponse {
    pub view: LayoutView,
    pub ephemeral: bool,
}

#[derive(Debug, Serialize)]
pub struct CallbackPayload<'a> {
    #[serde(rename = "type")]
    kind: u8,
    data: CallbackData<'a>,
}

#[derive(Debug, Serialize)]
struct CallbackData<'a> {
    flags: u64,
    components: &'a [Component],
}

impl InteractionResponse {
    /// A reply only the invoking user can see.
    pub fn ephemeral(view: LayoutView) -> Self {
        Self { view, ephemeral: true }
    }

    pub fn flags(&self) -> u64 {
        let visibility = if self.ephemeral { EPHEMERAL_FLAG } else { 0 };
        visibility | COMPONENTS_V2_FLAG
    }

    pub fn payload(&self) -> CallbackPayload<'_> {
        CallbackPayload {
            kind: CHANNEL_MESSAGE_WITH_SOURCE,
            data: CallbackData { flags: self.flags(), components: &self.view.components },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.payload())
    }
}

pub struct LayoutBuilder {
    components: Vec<Component>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self { components: Vec::new() }
    }

    pub fn container<F>(mut self, build: F) -> Self
    where
        F: FnOnce(&mut ContainerBuilder),
    {
        let mut builder = ContainerBuilder::default();
        build(&mut builder);
        self.components.push(Component::Container(builder.build()));
        self
    }

    pub fn build(self) -> LayoutView {
        LayoutView { components: self.components }
    }
}

impl Default for LayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct ContainerBuilder {
    components: Vec<Component>,
    accent_color: Option<u32>,
}

impl ContainerBuilder {
    pub fn accent_color(&mut self, color: u32) -> &mut Self {
        self.accent_color = Some(color);
        self
    }

    pub fn text(&mut self, content: impl Into<String>) -> &mut Self {
        self.components.push(Component::TextDisplay(TextDisplay::new(content)));
        self
    }

    pub fn separator(&mut self) -> &mut Self {
        self.components.push(Component::Separator(Separator::default()));
        self
    }

    pub fn action_row<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut ActionRowBuilder),
    {
        let mut builder = ActionRowBuilder::default();
        build(&mut builder);
        self.components.push(Component::ActionRow(builder.build()));
        self
    }

    pub fn media_gallery<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = MediaGalleryItem>,
    {
        self.components.push(Component::MediaGallery(MediaGallery {
            kind: ComponentType::MediaGallery,
            items: items.into_iter().collect(),
        }));
        self
    }

    fn build(self) -> Container {
        Container {
            kind: ComponentType::Container,
            components: self.components,
            accent_color: self.accent_color,
        }
    }
}

#[derive(Default)]
pub struct ActionRowBuilder {
    components: Vec<Interactive>,
}

impl ActionRowBuilder {
    pub fn button(&mut self, button: Button) -> &mut Self {
        self.components.push(Interactive::Button(button));
        self
    }

    pub fn select(&mut self, select: StringSelect) -> &mut Self {
        self.components.push(Interactive::StringSelect(select));
        self
    }

    fn build(self) -> ActionRow {
        ActionRow { kind: ComponentType::ActionRow, components: self.components }
    }
}
