use dioxus::prelude::*;

/// Colour of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BadgeVariant {
    #[default]
    Neutral,
    Ok,
    Info,
    Warn,
    Danger,
    Muted,
}

impl BadgeVariant {
    fn class(&self) -> &'static str {
        match self {
            BadgeVariant::Neutral => "neutral",
            BadgeVariant::Ok => "ok",
            BadgeVariant::Info => "info",
            BadgeVariant::Warn => "warn",
            BadgeVariant::Danger => "danger",
            BadgeVariant::Muted => "muted",
        }
    }

    /// Parse a tone name (`ok`, `info`, `warn`, `danger`, `muted`).
    pub fn from_tone(tone: &str) -> Self {
        match tone {
            "ok" => BadgeVariant::Ok,
            "info" => BadgeVariant::Info,
            "warn" => BadgeVariant::Warn,
            "danger" => BadgeVariant::Danger,
            "muted" => BadgeVariant::Muted,
            _ => BadgeVariant::Neutral,
        }
    }
}

/// Inline label for statuses and course names.
#[component]
pub fn Badge(
    #[props(default)] variant: BadgeVariant,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![
        Attribute::new("class", "badge", None, false),
        Attribute::new("data-style", variant.class(), None, false),
    ];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        span {
            ..merged,
            {children}
        }
    }
}

/// Toggleable filter chip.
#[component]
pub fn ChipButton(active: bool, onclick: EventHandler<MouseEvent>, children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        button {
            r#type: "button",
            class: "chip-button",
            "data-active": if active { "true" } else { "false" },
            "aria-pressed": if active { "true" } else { "false" },
            onclick: move |evt| onclick.call(evt),
            {children}
        }
    }
}

/// Horizontal group of chips.
#[component]
pub fn ChipGroup(children: Element) -> Element {
    rsx! {
        div { class: "chip-group", {children} }
    }
}
