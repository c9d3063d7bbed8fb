//! The four color buttons.

use crate::backend::GlBackend;
use crate::color::Rgba;
use crate::App;
use serde::Serialize;

/// A color button. Each press replaces the current color and redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Maroon,
    Tosca,
    Pastel,
    /// Back to opaque white.
    Reset,
}

const ALL: [Control; 4] = [Control::Maroon, Control::Tosca, Control::Pastel, Control::Reset];

impl Control {
    /// Every control, in page order.
    pub fn all() -> &'static [Control] {
        &ALL
    }

    /// The DOM element id of the button.
    pub fn id(self) -> &'static str {
        match self {
            Control::Maroon => "Maroon",
            Control::Tosca => "Tosca",
            Control::Pastel => "Pastel",
            Control::Reset => "reset",
        }
    }

    /// Lowercase name, as accepted by [`Control::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Control::Maroon => "maroon",
            Control::Tosca => "tosca",
            Control::Pastel => "pastel",
            Control::Reset => "reset",
        }
    }

    /// The color the scene shows after this control is pressed.
    pub fn color(self) -> Rgba {
        match self {
            Control::Maroon => Rgba::opaque(0.5, 0.0, 0.0),
            Control::Tosca => Rgba::opaque(0.29, 0.69, 0.61),
            Control::Pastel => Rgba::opaque(1.0, 0.87, 0.82),
            Control::Reset => Rgba::WHITE,
        }
    }

    /// Looks a control up by its exact DOM id.
    pub fn from_id(id: &str) -> Option<Self> {
        ALL.into_iter().find(|c| c.id() == id)
    }

    /// Looks a control up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.into_iter().find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Presses this control on `app`.
    pub fn apply<B: GlBackend>(self, app: &mut App<B>) {
        match self {
            Control::Reset => app.reset_color(),
            other => {
                let Rgba { r, g, b, .. } = other.color();
                app.set_color(r, g, b);
            }
        }
    }
}
