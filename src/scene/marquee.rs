/// Animation phase of the dashed selection outline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Marquee {
    dash_offset: u32,
    elapsed: f32,
}

impl Marquee {
    /// Dash pattern period in pen-width units (4 on, 4 off)
    pub const DASH: f32 = 4.0;
    const PERIOD: u32 = 10;

    pub fn dash_offset(&self) -> u32 {
        self.dash_offset
    }

    /// Accumulates `dt` seconds and advances the offset by one for every
    /// full `interval`. Returns true if the offset changed.
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        if interval <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        self.elapsed += dt;
        let steps = (self.elapsed / interval).floor();
        if steps < 1.0 {
            return false;
        }
        self.elapsed -= steps * interval;
        let steps = (steps as u64 % u64::from(Self::PERIOD)) as u32;
        self.dash_offset = (self.dash_offset + steps) % Self::PERIOD;
        steps != 0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
