//! Audio cues
//!
//! The simulation only requests cues by name; on the web they are
//! synthesized with Web Audio oscillators - no external files needed!

/// Sound effect requests emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Turret fired
    Shoot,
    /// Aircraft, bomb or free-falling trooper destroyed
    Explosion,
    /// Trooper shot under its chute
    HitChute,
    /// Trooper reached the ground
    Land,
    /// Run ended
    GameOver,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Shoot => "shoot",
            Cue::Explosion => "explosion",
            Cue::HitChute => "hit_chute",
            Cue::Land => "land",
            Cue::GameOver => "game_over",
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::Cue;

    /// Audio manager for the game
    ///
    /// Created lazily on the first user gesture; if the browser refuses an
    /// AudioContext every cue silently does nothing.
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        /// Play a cue (fire-and-forget)
        pub fn play(&self, cue: Cue) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            log::debug!("cue: {}", cue.name());

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.volume;
            match cue {
                Cue::Shoot => self.play_shoot(ctx, vol),
                Cue::Explosion => self.play_explosion(ctx, vol),
                Cue::HitChute => self.play_hit_chute(ctx, vol),
                Cue::Land => self.play_land(ctx, vol),
                Cue::GameOver => self.play_game_over(ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short square blip
        fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t + 0.1)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Falling sawtooth
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                .ok();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t + 0.2)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// High triangle ping
        fn play_hit_chute(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t + 0.1)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Low thud
        fn play_land(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t + 0.2)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Descending eight-note dirge
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let notes = [440.0, 415.0, 392.0, 370.0, 349.0, 330.0, 311.0, 293.0];
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.15, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.0001, t + 0.1)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.1).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names_are_distinct() {
        let cues = [Cue::Shoot, Cue::Explosion, Cue::HitChute, Cue::Land, Cue::GameOver];
        let mut names: Vec<_> = cues.iter().map(|c| c.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), cues.len());
        assert_eq!(Cue::HitChute.name(), "hit_chute");
    }
}
