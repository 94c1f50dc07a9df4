use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.53, 0.53, 0.53);
    pub const RED: Self = Self::rgb(0.99, 0.38, 0.33);
    pub const BLUE: Self = Self::rgb(0.35, 0.77, 0.93);
    pub const GREEN: Self = Self::rgb(0.51, 0.76, 0.34);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
}

#[cfg(all(feature = "preview", not(target_arch = "wasm32")))]
impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::linear_rgba(c.r, c.g, c.b, c.a)
    }
}

/// Visual convention for histogram bars.
///
/// Passed explicitly into every geometry constructor; nothing here is global.
/// `min_height` and the opacities are cosmetic and safe to change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarStyle {
    pub fill: Color,
    pub opacity: f32,
    pub stroke_width: f32,
    /// Placeholder color for empty bins; `None` reuses `fill`.
    pub empty_color: Option<Color>,
    pub empty_opacity: f32,
    /// Smallest drawn height in scene units.
    pub min_height: f32,
    /// Fraction of the ceiling the tallest bar may reach after rescaling.
    pub headroom: f32,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            fill: Color::RED,
            opacity: 0.7,
            stroke_width: 1.0,
            empty_color: None,
            empty_opacity: 0.1,
            min_height: 0.01,
            headroom: 0.9,
        }
    }
}

impl BarStyle {
    #[inline]
    pub const fn fill(mut self, c: Color) -> Self {
        self.fill = c;
        self
    }

    #[inline]
    pub const fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[inline]
    pub const fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    #[inline]
    pub const fn empty(mut self, color: Color, opacity: f32) -> Self {
        self.empty_color = Some(color);
        self.empty_opacity = opacity;
        self
    }

    /// Fill used for the placeholder bars of empty bins.
    #[inline]
    pub const fn empty_fill(&self) -> Color {
        match self.empty_color {
            Some(c) => c,
            None => self.fill,
        }
    }

    #[inline]
    pub const fn min_height(mut self, height: f32) -> Self {
        self.min_height = height;
        self
    }

    #[inline]
    pub const fn headroom(mut self, headroom: f32) -> Self {
        self.headroom = headroom;
        self
    }
}
