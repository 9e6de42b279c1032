//! Audio system using Web Audio API
//!
//! Procedurally generated cues and a low background drone - no external
//! files needed. The cue table is plain data so hosts and tests can map
//! simulation events without a browser.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Key picked up
    KeyPickup,
    /// Player slid into mud
    Slip,
    /// Player smashed a crate
    WoodCrackle,
    /// Player lost a life
    Hurt,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::KeyCollected => Some(SoundEffect::KeyPickup),
            GameEvent::MudSlip => Some(SoundEffect::Slip),
            GameEvent::CrateBroken => Some(SoundEffect::WoodCrackle),
            GameEvent::PlayerHurt { .. } => Some(SoundEffect::Hurt),
            GameEvent::GameStarted
            | GameEvent::GameOver { .. }
            | GameEvent::ChaserSplit
            | GameEvent::ChaserMerged => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::SoundEffect;
    use crate::settings::Settings;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    /// Running background drone
    struct Music {
        oscs: Vec<OscillatorNode>,
        gain: GainNode,
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        music: Option<Music>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let defaults = Settings::default();
            Self {
                ctx,
                sfx_volume: defaults.sfx_volume,
                music_volume: defaults.music_volume,
                muted: false,
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up volume and mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.music_volume.clamp(0.0, 1.0);
            self.muted = settings.muted;
            if let Some(music) = &self.music {
                music.gain.gain().set_value(self.music_level());
            }
        }

        fn music_level(&self) -> f32 {
            if self.muted { 0.0 } else { self.music_volume * 0.08 }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.sfx_volume;
            if self.muted || vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::KeyPickup => self.play_key_pickup(ctx, vol),
                SoundEffect::Slip => self.play_slip(ctx, vol),
                SoundEffect::WoodCrackle => self.play_wood_crackle(ctx, vol),
                SoundEffect::Hurt => self.play_hurt(ctx, vol),
            }
        }

        /// Start the background drone if it isn't running
        pub fn start_music(&mut self) {
            if self.music.is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            gain.gain().set_value(self.music_level());
            if gain.connect_with_audio_node(&ctx.destination()).is_err() {
                return;
            }

            // Two detuned low tones beating against each other
            let mut oscs = Vec::new();
            for freq in [55.0, 55.7, 82.4] {
                let Ok(osc) = ctx.create_oscillator() else {
                    continue;
                };
                osc.set_type(OscillatorType::Triangle);
                osc.frequency().set_value(freq);
                if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                    oscs.push(osc);
                }
            }
            self.music = Some(Music { oscs, gain });
        }

        pub fn stop_music(&mut self) {
            if let Some(music) = self.music.take() {
                for osc in &music.oscs {
                    osc.stop().ok();
                }
                music.gain.disconnect().ok();
            }
        }

        // === Sound generators ===

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

        /// Key pickup - bright rising chime
        fn play_key_pickup(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [880.0, 1175.0, 1568.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start().ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Slip - wet downward slide
        fn play_slip(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            // Warble on the way down
            osc.frequency().set_value_at_time(500.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(320.0, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(380.0, t + 0.12).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(90.0, t + 0.5)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }

        /// Crate smash - dry splintering crackle
        fn play_wood_crackle(&self, ctx: &AudioContext, vol: f32) {
            let t0 = ctx.current_time();

            // Irregular short clicks
            for (i, freq) in [900.0, 1400.0, 700.0, 1800.0, 1100.0].iter().enumerate() {
                let t = t0 + [0.0, 0.025, 0.06, 0.08, 0.13][i];
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    gain.gain().set_value_at_time(0.0, t0).ok();
                    gain.gain().set_value_at_time(vol * 0.15, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.03)
                        .ok();
                    osc.start().ok();
                    osc.stop_with_when(t + 0.04).ok();
                }
            }

            // Hollow body thunk
            if let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.4, t0).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t0 + 0.2)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(90.0, t0 + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t0 + 0.25).ok();
            }
        }

        /// Hurt - harsh descending buzz
        fn play_hurt(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.45).ok();

            // Sub thump
            if let Some((osc2, gain2)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
                gain2.gain().set_value_at_time(vol * 0.5, t).ok();
                gain2.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc2.start().ok();
                osc2.stop_with_when(t + 0.25).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::KeyCollected),
            Some(SoundEffect::KeyPickup)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::MudSlip),
            Some(SoundEffect::Slip)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::CrateBroken),
            Some(SoundEffect::WoodCrackle)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PlayerHurt { lives: 0 }),
            Some(SoundEffect::Hurt)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::ChaserSplit), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver { score: 3 }),
            None
        );
    }
}
