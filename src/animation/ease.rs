/// Easing functions used to shape transition progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
}

impl Ease {
    /// Every easing variant, in declaration order.
    pub const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ];

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    ///
    /// Every non-linear curve is a power curve: `In` is `t^p`, `Out` mirrors it through the
    /// centre point, `InOut` runs `In` over the first half and `Out` over the second.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => power_in(t, 2),
            Self::OutQuad => power_out(t, 2),
            Self::InOutQuad => power_in_out(t, 2),
            Self::InCubic => power_in(t, 3),
            Self::OutCubic => power_out(t, 3),
            Self::InOutCubic => power_in_out(t, 3),
        }
    }
}

fn power_in(t: f64, p: i32) -> f64 {
    t.powi(p)
}

fn power_out(t: f64, p: i32) -> f64 {
    1.0 - power_in(1.0 - t, p)
}

fn power_in_out(t: f64, p: i32) -> f64 {
    if t < 0.5 {
        power_in(2.0 * t, p) / 2.0
    } else {
        1.0 - power_in(2.0 - 2.0 * t, p) / 2.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
