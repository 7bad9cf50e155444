use std::collections::VecDeque;
use std::f32::consts::TAU;

use crate::coords::Vector2f;

/// Rates and amplitudes of the `fx_*` effects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EffectConfig {
    /// Shake ticks per second.
    pub shake_rate: f32,
    /// Maximum shake offset in pixels.
    pub shake_amplitude: f32,
    /// Wave phase speed in radians per second.
    pub wave_rate: f32,
    pub wave_amplitude: f32,
    /// Phase difference between neighbouring glyphs, radians.
    pub wave_spacing: f32,
    /// Rainbow hue cycles per second.
    pub rainbow_rate: f32,
    /// Hue difference between neighbouring glyphs.
    pub rainbow_spread: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            shake_rate: 20.0,
            shake_amplitude: 1.5,
            wave_rate: 6.0,
            wave_amplitude: 3.0,
            wave_spacing: 0.5,
            rainbow_rate: 0.5,
            rainbow_spread: 0.05,
        }
    }
}

/// Phase state shared by every glyph of a text.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct EffectClock {
    shake_tick: u64,
    shake_accum: f32,
    wave_phase: f32,
    rainbow_offset: f32,
}

impl EffectClock {
    pub fn advance(&mut self, dt: f32, config: &EffectConfig) {
        let dt = dt.max(0.0);

        // at most one tick per update, however long the frame was
        self.shake_accum += dt * config.shake_rate;
        if self.shake_accum >= 1.0 {
            self.shake_tick = self.shake_tick.wrapping_add(1);
            self.shake_accum = self.shake_accum.fract();
        }

        self.wave_phase = (self.wave_phase + dt * config.wave_rate).rem_euclid(TAU);
        self.rainbow_offset = (self.rainbow_offset + dt * config.rainbow_rate).rem_euclid(1.0);
    }

    #[inline]
    pub fn shake_tick(&self) -> u64 {
        self.shake_tick
    }

    /// Deterministic per-glyph jitter for the current tick.
    pub fn shake_offset(&self, index: usize, config: &EffectConfig) -> Vector2f {
        let h = mix(index as u64 ^ self.shake_tick.rotate_left(32));
        let unit = |bits: u64| (bits & 0xFFFF) as f32 / 65535.0 * 2.0 - 1.0;
        Vector2f::new(unit(h), unit(h >> 16)) * config.shake_amplitude
    }

    pub fn wave_offset(&self, index: usize, config: &EffectConfig) -> f32 {
        (self.wave_phase + index as f32 * config.wave_spacing).sin() * config.wave_amplitude
    }

    /// Hue in `[0, 1)`.
    pub fn rainbow_hue(&self, index: usize, config: &EffectConfig) -> f32 {
        (self.rainbow_offset + index as f32 * config.rainbow_spread).rem_euclid(1.0)
    }
}

/// splitmix64 finaliser.
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

// ── scroll reveal ─────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Glyphs revealed per second.
    pub rate: f32,
    /// Zero-width glyph that only inserts a pause.
    pub pause_marker: char,
    /// Extra glyph durations waited after a `.` or pause marker.
    pub pause_multiplier: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            rate: 30.0,
            pause_marker: '|',
            pause_multiplier: 15,
        }
    }
}

impl ScrollConfig {
    #[inline]
    pub fn pauses_after(&self, ch: char) -> bool {
        ch == '.' || ch == self.pause_marker
    }
}

/// Reveals queued glyphs one by one at a fixed rate.
///
/// Time is counted in glyph durations; the head of the queue is revealed
/// once the clock reaches its integer deadline.
#[derive(Debug, Clone)]
pub struct ScrollReveal {
    config: ScrollConfig,
    queue: VecDeque<(usize, char)>,
    clock: f64,
    deadline: u64,
}

impl ScrollReveal {
    pub fn new(config: ScrollConfig, glyphs: impl IntoIterator<Item = (usize, char)>) -> Self {
        Self {
            config,
            queue: glyphs.into_iter().collect(),
            clock: 0.0,
            deadline: 1,
        }
    }

    #[inline]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Glyph waiting to be revealed next.
    #[inline]
    pub fn head(&self) -> Option<usize> {
        self.queue.front().map(|&(i, _)| i)
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    /// Advances by `dt` seconds; calls `reveal` for each glyph index that
    /// became visible, in order.
    pub fn advance(&mut self, dt: f32, mut reveal: impl FnMut(usize)) {
        self.clock += f64::from(dt.max(0.0)) * f64::from(self.config.rate.max(0.0));

        while self.clock + 1e-6 >= self.deadline as f64 {
            let Some((index, ch)) = self.queue.pop_front() else {
                break;
            };
            reveal(index);
            self.deadline += 1;
            if self.config.pauses_after(ch) {
                self.deadline += u64::from(self.config.pause_multiplier);
            }
        }
    }

    /// Reveals everything left.
    pub fn skip(&mut self, reveal: impl FnMut(usize)) {
        self.queue.drain(..).map(|(i, _)| i).for_each(reveal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reveal_all(text: &str, config: ScrollConfig) -> ScrollReveal {
        ScrollReveal::new(config, text.chars().enumerate())
    }

    fn count_after(scroll: &mut ScrollReveal, steps: usize, dt: f32) -> usize {
        let mut n = 0;
        for _ in 0..steps {
            scroll.advance(dt, |_| n += 1);
        }
        n
    }

    // ── effects ───────────────────────────────────────────────────────────

    #[test]
    fn shake_ticks_at_most_once_per_update() {
        let cfg = EffectConfig::default();
        let mut clock = EffectClock::default();
        clock.advance(10.0, &cfg);
        assert_eq!(clock.shake_tick(), 1);
        clock.advance(0.01, &cfg);
        assert_eq!(clock.shake_tick(), 1);
        clock.advance(0.05, &cfg);
        assert_eq!(clock.shake_tick(), 2);
    }

    #[test]
    fn shake_is_deterministic_and_bounded() {
        let cfg = EffectConfig::default();
        let clock = EffectClock::default();
        for i in 0..64 {
            let a = clock.shake_offset(i, &cfg);
            assert_eq!(a, clock.shake_offset(i, &cfg));
            assert!(a.x.abs() <= cfg.shake_amplitude && a.y.abs() <= cfg.shake_amplitude);
        }
        assert_ne!(clock.shake_offset(0, &cfg), clock.shake_offset(1, &cfg));
    }

    #[test]
    fn wave_follows_sine() {
        let cfg = EffectConfig { wave_rate: 1.0, wave_amplitude: 2.0, wave_spacing: 0.5, ..Default::default() };
        let mut clock = EffectClock::default();
        clock.advance(0.25, &cfg);
        let expected = (0.25f32 + 3.0 * 0.5).sin() * 2.0;
        assert!((clock.wave_offset(3, &cfg) - expected).abs() < 1e-5);
    }

    #[test]
    fn rainbow_hue_wraps() {
        let cfg = EffectConfig { rainbow_rate: 1.0, rainbow_spread: 0.25, ..Default::default() };
        let mut clock = EffectClock::default();
        clock.advance(0.5, &cfg);
        assert!((clock.rainbow_hue(0, &cfg) - 0.5).abs() < 1e-5);
        assert!((clock.rainbow_hue(3, &cfg) - 0.25).abs() < 1e-5);
    }

    // ── scroll reveal ─────────────────────────────────────────────────────

    #[test]
    fn reveal_count_is_floor_of_rate_times_time() {
        let cfg = ScrollConfig { rate: 10.0, ..Default::default() };
        // (updates, dt, floor(10 * t) clamped to 26)
        for (steps, dt, expected) in [(1, 0.125, 1), (3, 0.25, 7), (8, 0.125, 10), (5, 0.5, 25), (100, 0.5, 26)] {
            let mut scroll = reveal_all("abcdefghijklmnopqrstuvwxyz", cfg);
            assert_eq!(count_after(&mut scroll, steps, dt), expected, "{steps} x {dt}");
        }
        let mut scroll = reveal_all("abc", cfg);
        assert_eq!(count_after(&mut scroll, 1, 0.0), 0);
    }

    #[test]
    fn period_pauses_the_next_glyph() {
        let cfg = ScrollConfig { rate: 1.0, pause_multiplier: 3, ..Default::default() };
        let mut scroll = reveal_all("a.b", cfg);
        assert_eq!(count_after(&mut scroll, 2, 1.0), 2);
        // b waits 1 + 3 durations after the period
        assert_eq!(count_after(&mut scroll, 3, 1.0), 0);
        assert_eq!(count_after(&mut scroll, 1, 1.0), 1);
        assert!(scroll.is_done());
    }

    #[test]
    fn pause_marker_pauses_too() {
        let cfg = ScrollConfig { rate: 1.0, pause_multiplier: 2, ..Default::default() };
        let mut scroll = reveal_all("|x", cfg);
        assert_eq!(count_after(&mut scroll, 1, 1.0), 1);
        assert_eq!(count_after(&mut scroll, 2, 1.0), 0);
        assert_eq!(count_after(&mut scroll, 1, 1.0), 1);
    }

    #[test]
    fn reveals_in_order_and_skip_flushes() {
        let mut scroll = reveal_all("abcd", ScrollConfig { rate: 2.0, ..Default::default() });
        let mut seen = Vec::new();
        scroll.advance(1.0, |i| seen.push(i));
        assert_eq!(seen, [0, 1]);
        assert_eq!(scroll.head(), Some(2));
        scroll.skip(|i| seen.push(i));
        assert_eq!(seen, [0, 1, 2, 3]);
        assert!(scroll.is_done());
    }
}
