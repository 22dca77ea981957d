use std::fmt::{Display, Formatter, Write};

use clap::crate_version;
use maud::{html, Escaper, Markup, Render};

pub fn headers() -> Markup {
    html! {
        meta name="viewport" content="width=device-width, initial-scale=1";
        meta charset="UTF-8";
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@0.9.4/css/bulma.min.css" crossorigin="anonymous" referrerpolicy="no-referrer";
        link rel="stylesheet" href="/static/theme.css?v1";
    }
}

pub fn footer() -> Markup {
    html! {
        footer.footer {
            div.content.has-text-centered {
                p {
                    "Realty Estimator " (crate_version!())
                    " · made with " a href="https://www.rust-lang.org/" { "Rust" }
                    " and " a href="https://bulma.io/" { "Bulma" }
                }
            }
        }
    }
}

/// Number input bounded by the widget range.
pub fn number_field<T: Render>(label: &str, name: &str, min: T, max: T, value: T) -> Markup {
    html! {
        div.field {
            label.label for=(name) { (label) }
            div.control {
                input.input id=(name) name=(name) type="number" min=(min) max=(max) step="1" value=(value) required;
            }
            p.help { (min) "–" (max) }
        }
    }
}

pub fn select_field<T: Render + PartialEq>(
    label: &str,
    name: &str,
    options: impl IntoIterator<Item = T>,
    selected: &T,
) -> Markup {
    html! {
        div.field {
            label.label for=(name) { (label) }
            div.control {
                div.select.is-fullwidth {
                    select id=(name) name=(name) {
                        @for choice in options {
                            option value=(choice) selected[&choice == selected] { (choice) }
                        }
                    }
                }
            }
        }
    }
}

/// US dollars with thousands separators, like `$1,234.50`.
#[derive(Copy, Clone)]
pub struct Currency(pub f64);

impl Display for Currency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.0.is_finite() {
            return write!(formatter, "${}", self.0);
        }
        let formatted = format!("{:.2}", self.0.abs());
        let (integer, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
        let is_zero = formatted.bytes().all(|byte| matches!(byte, b'0' | b'.'));
        if self.0.is_sign_negative() && !is_zero {
            formatter.write_char('-')?;
        }
        write!(formatter, "${}.{}", group_thousands(integer), fraction)
    }
}

impl Render for Currency {
    fn render_to(&self, buffer: &mut String) {
        let _ = write!(buffer, "{}", self);
    }
}

/// Integer with thousands separators.
pub struct Thousands(pub u32);

impl Render for Thousands {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&group_thousands(&self.0.to_string()));
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Rounded value with the exact one in the tooltip.
pub struct Float {
    value: f64,
    precision: usize,
}

impl From<f64> for Float {
    fn from(value: f64) -> Self {
        Self {
            value,
            precision: 0,
        }
    }
}

impl Float {
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl Render for Float {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(r#"<span title=""#);
        let _ = write!(Escaper::new(buffer), "{}", self.value);
        buffer.push_str(r#"">"#);
        let _ = write!(Escaper::new(buffer), "{0:.1$}", self.value, self.precision);
        buffer.push_str("</span>");
    }
}
