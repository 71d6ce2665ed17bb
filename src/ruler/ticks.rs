//! Multi-resolution tick levels with continuous strengths.
//!
//! Every entry of the modulo table is a candidate tick spacing. Given the
//! visible value range and its pixel span, [`TickHandler`] works out which
//! spacings are dense enough to draw and how strongly, so that levels fade in
//! and out as the view zooms instead of popping.

/// Allowed tick spacings, 1x/5x steps from 1e-7 to 1e7.
pub const TICK_MODULOS: [f32; 29] = [
    1e-7, 5e-7, 1e-6, 5e-6, 1e-5, 5e-5, 1e-4, 5e-4, 1e-3, 5e-3, 1e-2, 5e-2, 0.1, 0.5, 1.0, 5.0,
    10.0, 50.0, 100.0, 500.0, 1e3, 5e3, 1e4, 5e4, 1e5, 5e5, 1e6, 5e6, 1e7,
];

/// Upper bound on the ticks one level yields, whatever the range.
const MAX_TICKS_PER_LEVEL: usize = 1 << 16;

#[derive(Debug, Clone)]
pub struct TickHandler {
    modulos: Vec<f32>,
    strengths: Vec<f32>,
    smallest_tick: usize,
    biggest_tick: usize,
    min_value: f32,
    max_value: f32,
    pixel_range: f32,
}

impl Default for TickHandler {
    fn default() -> Self {
        Self::new(&TICK_MODULOS)
    }
}

impl TickHandler {
    /// Creates a handler over an ascending modulo table.
    pub fn new(modulos: &[f32]) -> Self {
        assert!(!modulos.is_empty(), "tick modulo table must not be empty");
        debug_assert!(
            modulos.windows(2).all(|pair| pair[0] < pair[1]),
            "tick modulos must be strictly increasing"
        );
        let last = modulos.len() - 1;
        let mut strengths = vec![0.0; modulos.len()];
        strengths[last] = 1.0;
        Self {
            modulos: modulos.to_vec(),
            strengths,
            smallest_tick: last,
            biggest_tick: last,
            min_value: 0.0,
            max_value: 1.0,
            pixel_range: 1.0,
        }
    }

    pub fn modulos(&self) -> &[f32] {
        &self.modulos
    }

    pub fn set_ranges(&mut self, min_value: f32, max_value: f32, min_pixel: f32, max_pixel: f32) {
        self.min_value = min_value;
        self.max_value = max_value;
        self.pixel_range = max_pixel - min_pixel;
    }

    fn value_range(&self) -> f32 {
        self.max_value - self.min_value
    }

    fn is_degenerate(&self) -> bool {
        let range = self.value_range();
        !(range > 0.0 && range.is_finite() && self.pixel_range > 0.0 && self.pixel_range.is_finite())
    }

    /// Pixel distance between two adjacent ticks of `modulo`.
    pub fn spacing_of(&self, modulo: f32) -> f32 {
        modulo * self.pixel_range / self.value_range()
    }

    /// Recomputes the active level window and per-level strengths.
    ///
    /// Spacings at or below `min_spacing` are never drawn; spacings at or
    /// above `max_spacing` have full strength. With `sqrt` the active
    /// strengths are square-rooted so faint levels gain weight sooner.
    pub fn set_tick_strengths(&mut self, min_spacing: f32, max_spacing: f32, sqrt: bool) {
        let last = self.modulos.len() - 1;
        self.strengths = vec![0.0; self.modulos.len()];

        if self.is_degenerate() || max_spacing <= min_spacing {
            self.smallest_tick = last;
            self.biggest_tick = last;
            self.strengths[last] = 1.0;
            return;
        }

        self.smallest_tick = 0;
        self.biggest_tick = last;

        for i in (0..self.modulos.len()).rev() {
            let spacing = self.spacing_of(self.modulos[i]);
            self.strengths[i] = (spacing - min_spacing) / (max_spacing - min_spacing);
            // Coarser levels add nothing once a finer one is at full strength.
            if self.strengths[i] >= 1.0 {
                self.biggest_tick = i;
            }
            if spacing <= min_spacing {
                self.smallest_tick = i;
                break;
            }
        }

        for strength in &mut self.strengths[self.smallest_tick..=self.biggest_tick] {
            *strength = strength.clamp(0.0, 1.0);
            if sqrt {
                *strength = strength.sqrt();
            }
        }
    }

    pub fn tick_levels(&self) -> usize {
        self.biggest_tick - self.smallest_tick + 1
    }

    fn modulo_index(&self, level: usize) -> usize {
        assert!(
            level < self.tick_levels(),
            "tick level {level} out of range (0..{})",
            self.tick_levels()
        );
        self.smallest_tick + level
    }

    pub fn strength_of_level(&self, level: usize) -> f32 {
        self.strengths[self.modulo_index(level)]
    }

    pub fn period_of_level(&self, level: usize) -> f32 {
        self.modulos[self.modulo_index(level)]
    }

    /// Tick values of `level` covering the current range.
    ///
    /// With `exclude_higher_levels`, ticks shared with the next coarser
    /// active level are left out so each position is drawn once.
    pub fn ticks_at_level(&self, level: usize, exclude_higher_levels: bool) -> Vec<f32> {
        let index = self.modulo_index(level);
        let modulo = self.modulos[index];
        if !self.min_value.is_finite() || !self.max_value.is_finite() {
            return Vec::new();
        }

        // i128 keeps the span between saturated ends representable.
        let mut start = (self.min_value / modulo).floor() as i64 as i128;
        let mut end = (self.max_value / modulo).ceil() as i64 as i128;
        let ratio = if index < self.biggest_tick {
            (self.modulos[index + 1] / modulo).round() as i128
        } else {
            0
        };

        // Even the coarsest modulo can be sub-pixel on huge ranges; keep at
        // most about one tick per pixel.
        let limit = self.pixel_range.clamp(1.0, MAX_TICKS_PER_LEVEL as f32) as i128 + 2;
        let count = end - start;
        let mut stride = 1;
        if count > limit {
            stride = count / limit + 1;
            start = start.div_euclid(stride) * stride;
            end = (end + stride - 1).div_euclid(stride) * stride;
        }

        (start..=end)
            .step_by(stride as usize)
            .filter(|i| !(exclude_higher_levels && ratio > 0 && i % ratio == 0))
            .map(|i| i as f32 * modulo)
            .collect()
    }

    /// Finest active level whose ticks are at least `pixel_separation`
    /// apart, or the coarsest level when none is.
    pub fn level_with_min_separation(&self, pixel_separation: f32) -> usize {
        if self.is_degenerate() {
            return self.tick_levels() - 1;
        }
        (self.smallest_tick..=self.biggest_tick)
            .find(|&i| self.spacing_of(self.modulos[i]) >= pixel_separation)
            .map(|i| i - self.smallest_tick)
            .unwrap_or(self.tick_levels() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(min: f32, max: f32, width: f32) -> TickHandler {
        let mut ticks = TickHandler::default();
        ticks.set_ranges(min, max, 0.0, width);
        ticks.set_tick_strengths(3.0, 80.0, true);
        ticks
    }

    fn strength_of_period(ticks: &TickHandler, period: f32) -> f32 {
        (0..ticks.tick_levels())
            .find(|&level| ticks.period_of_level(level) == period)
            .map(|level| ticks.strength_of_level(level))
            .unwrap_or(0.0)
    }

    #[test]
    fn strengths_are_normalized_and_increase_with_coarseness() {
        let ticks = handler(0.0, 10.0, 1000.0);
        assert!(ticks.tick_levels() >= 2);
        let mut previous = -1.0;
        for level in 0..ticks.tick_levels() {
            let strength = ticks.strength_of_level(level);
            assert!((0.0..=1.0).contains(&strength));
            assert!(strength >= previous);
            previous = strength;
        }
        assert_eq!(ticks.strength_of_level(ticks.tick_levels() - 1), 1.0);
    }

    #[test]
    fn active_window_for_ten_seconds_over_thousand_pixels() {
        // 100 px per second: 0.01 is 1px (too dense), 0.05 is 5px, 1.0 is 100px.
        let ticks = handler(0.0, 10.0, 1000.0);
        assert_eq!(ticks.period_of_level(0), 0.01);
        assert_eq!(ticks.period_of_level(ticks.tick_levels() - 1), 1.0);
        assert_eq!(ticks.strength_of_level(0), 0.0);
    }

    #[test]
    fn zooming_out_never_increases_strength() {
        let widths = [0.5, 1.0, 2.0, 5.0, 10.0, 40.0, 100.0];
        for period in [0.1, 0.5, 1.0, 5.0] {
            let mut previous = f32::INFINITY;
            for width in widths {
                let strength = strength_of_period(&handler(0.0, width, 800.0), period);
                assert!(
                    strength <= previous + 1e-6,
                    "period {period} grew at width {width}"
                );
                if strength > 0.0 {
                    previous = strength;
                }
            }
        }
    }

    #[test]
    fn min_separation_returns_finest_qualifying_level() {
        let ticks = handler(0.0, 10.0, 1000.0);
        let level = ticks.level_with_min_separation(40.0);
        let period = ticks.period_of_level(level);
        assert_eq!(period, 0.5);
        assert!(ticks.spacing_of(period) >= 40.0);
        if level > 0 {
            assert!(ticks.spacing_of(ticks.period_of_level(level - 1)) < 40.0);
        }
    }

    #[test]
    fn min_separation_falls_back_to_coarsest_level() {
        let ticks = handler(0.0, 10.0, 1000.0);
        assert_eq!(
            ticks.level_with_min_separation(10_000.0),
            ticks.tick_levels() - 1
        );
    }

    #[test]
    fn ticks_cover_range_with_floor_and_ceil() {
        let ticks = handler(0.25, 3.75, 400.0);
        let level = (0..ticks.tick_levels())
            .find(|&level| ticks.period_of_level(level) == 1.0)
            .unwrap();
        assert_eq!(ticks.ticks_at_level(level, false), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn excluding_higher_levels_skips_shared_ticks() {
        let ticks = handler(0.0, 10.0, 1000.0);
        let level = (0..ticks.tick_levels())
            .find(|&level| ticks.period_of_level(level) == 0.5)
            .unwrap();
        let all = ticks.ticks_at_level(level, false);
        let own = ticks.ticks_at_level(level, true);
        assert!(all.contains(&0.0));
        assert!(!own.contains(&0.0));
        assert!(!own.contains(&1.0));
        assert!(own.contains(&0.5));
        assert_eq!(own.len(), 10);
    }

    #[test]
    fn zero_width_range_yields_coarsest_level_only() {
        let ticks = handler(5.0, 5.0, 1000.0);
        assert_eq!(ticks.tick_levels(), 1);
        assert_eq!(ticks.period_of_level(0), 1e7);
        assert_eq!(ticks.strength_of_level(0), 1.0);
        assert_eq!(ticks.level_with_min_separation(40.0), 0);
        assert!(ticks.ticks_at_level(0, true).len() <= 2);
    }

    #[test]
    fn zero_pixel_range_yields_coarsest_level_only() {
        let ticks = handler(0.0, 10.0, 0.0);
        assert_eq!(ticks.tick_levels(), 1);
        assert_eq!(ticks.period_of_level(0), 1e7);
    }

    #[test]
    fn huge_range_ticks_stay_bounded() {
        let ticks = handler(0.0, 1e20, 1000.0);
        assert_eq!(ticks.tick_levels(), 1);
        let label_level = ticks.level_with_min_separation(40.0);
        let values = ticks.ticks_at_level(label_level, false);
        assert!(!values.is_empty());
        assert!(values.len() <= 1005, "{} ticks", values.len());
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(values[0] <= 0.0 && *values.last().unwrap() >= 0.99e20);

        let ticks = handler(-1e30, 1e30, 1000.0);
        assert!(ticks.ticks_at_level(0, true).len() <= 1005);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_level_panics() {
        let ticks = handler(0.0, 10.0, 1000.0);
        ticks.strength_of_level(ticks.tick_levels());
    }
}
