//! Game settings and quality presets
//!
//! Persisted as camelCase JSON under [`Settings::STORAGE_KEY`]. The stored
//! record holds percentages; [`Settings::quality`] turns them into the
//! per-effect multipliers the simulation reads every tick.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Quality preset levels, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Potato,
    Low,
    Medium,
    #[serde(rename = "Medium+")]
    MediumPlus,
    High,
    #[serde(rename = "High+")]
    HighPlus,
    Extreme,
    #[default]
    #[serde(rename = "Extreme+")]
    ExtremePlus,
    Ultra,
    #[serde(rename = "Ultra+")]
    UltraPlus,
    #[serde(rename = "Ultra++")]
    UltraPlusPlus,
    Highest,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 12] = [
        QualityPreset::Potato,
        QualityPreset::Low,
        QualityPreset::Medium,
        QualityPreset::MediumPlus,
        QualityPreset::High,
        QualityPreset::HighPlus,
        QualityPreset::Extreme,
        QualityPreset::ExtremePlus,
        QualityPreset::Ultra,
        QualityPreset::UltraPlus,
        QualityPreset::UltraPlusPlus,
        QualityPreset::Highest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Potato => "Potato",
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::MediumPlus => "Medium+",
            QualityPreset::High => "High",
            QualityPreset::HighPlus => "High+",
            QualityPreset::Extreme => "Extreme",
            QualityPreset::ExtremePlus => "Extreme+",
            QualityPreset::Ultra => "Ultra",
            QualityPreset::UltraPlus => "Ultra+",
            QualityPreset::UltraPlusPlus => "Ultra++",
            QualityPreset::Highest => "Highest",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Column in the preset tables
    fn index(self) -> usize {
        self as usize
    }
}

/// Every tunable effect knob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Knob {
    // === Basic ===
    JumpEffect,
    WalkEffect,
    DieEffect,
    HorizontalLines,
    Trail,
    Glow,
    BlockTexture,
    DropEffect,
    // === Advanced ===
    Shockwaves,
    ScreenShake,
    BloomParticles,
    ParticleTrails,
    ScreenDistortion,
    ParallaxLayers,
    VelocityStreaks,
    ImpactWaves,
    PlatformPulse,
    WindParticles,
    SpeedLines,
    LensFlare,
    DynamicFog,
    HeatDistortion,
    Starbursts,
    AfterImages,
    GravityWaves,
    EnergyRipples,
    PixelDisplacement,
    RadialBlur,
    CosmicDust,
    EnergySphere,
    ColorLight,
    SpiralEnergy,
    MetallicParticle,
    DigitalCharacter,
    MysticOrb,
    CrystalStructure,
    DarkEnergy,
    GravitySurge,
    ShadowDash,
}

impl Knob {
    pub const COUNT: usize = 39;

    pub const ALL: [Knob; Knob::COUNT] = [
        Knob::JumpEffect,
        Knob::WalkEffect,
        Knob::DieEffect,
        Knob::HorizontalLines,
        Knob::Trail,
        Knob::Glow,
        Knob::BlockTexture,
        Knob::DropEffect,
        Knob::Shockwaves,
        Knob::ScreenShake,
        Knob::BloomParticles,
        Knob::ParticleTrails,
        Knob::ScreenDistortion,
        Knob::ParallaxLayers,
        Knob::VelocityStreaks,
        Knob::ImpactWaves,
        Knob::PlatformPulse,
        Knob::WindParticles,
        Knob::SpeedLines,
        Knob::LensFlare,
        Knob::DynamicFog,
        Knob::HeatDistortion,
        Knob::Starbursts,
        Knob::AfterImages,
        Knob::GravityWaves,
        Knob::EnergyRipples,
        Knob::PixelDisplacement,
        Knob::RadialBlur,
        Knob::CosmicDust,
        Knob::EnergySphere,
        Knob::ColorLight,
        Knob::SpiralEnergy,
        Knob::MetallicParticle,
        Knob::DigitalCharacter,
        Knob::MysticOrb,
        Knob::CrystalStructure,
        Knob::DarkEnergy,
        Knob::GravitySurge,
        Knob::ShadowDash,
    ];

    /// Preset percentages in [`QualityPreset::ALL`] order; `None` when the
    /// presets never mention this knob
    fn preset_row(self) -> Option<[u16; 12]> {
        let row = match self {
            Knob::JumpEffect => [0, 5, 10, 15, 15, 33, 60, 64, 100, 120, 200, 200],
            Knob::WalkEffect => [0, 0, 0, 15, 15, 33, 60, 64, 100, 120, 200, 200],
            Knob::DieEffect => [0, 0, 10, 15, 15, 33, 60, 64, 100, 120, 200, 200],
            Knob::HorizontalLines => [0, 0, 0, 0, 15, 33, 60, 64, 100, 120, 200, 200],
            Knob::Trail => [0, 0, 0, 0, 0, 0, 0, 100, 0, 100, 100, 100],
            Knob::Glow => [0, 0, 0, 0, 0, 0, 0, 100, 100, 100, 150, 200],
            // Presets store a flag; true maps to 100%
            Knob::BlockTexture => [0, 0, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100],
            Knob::Shockwaves | Knob::ScreenShake => {
                [0, 0, 0, 0, 10, 25, 50, 75, 100, 120, 150, 200]
            }
            Knob::BloomParticles | Knob::ParticleTrails => {
                [0, 0, 0, 0, 0, 10, 25, 50, 75, 100, 150, 200]
            }
            Knob::ScreenDistortion => [0, 0, 0, 0, 0, 0, 10, 25, 50, 75, 100, 200],
            Knob::ParallaxLayers | Knob::WindParticles | Knob::SpeedLines => {
                [0, 10, 25, 50, 75, 100, 125, 150, 175, 200, 225, 250]
            }
            Knob::VelocityStreaks | Knob::ImpactWaves | Knob::PlatformPulse => {
                [0, 0, 10, 25, 50, 75, 100, 125, 150, 175, 200, 250]
            }
            Knob::RadialBlur
            | Knob::LensFlare
            | Knob::DynamicFog
            | Knob::HeatDistortion
            | Knob::Starbursts
            | Knob::AfterImages => [0, 0, 0, 10, 25, 50, 75, 100, 125, 150, 175, 200],
            Knob::GravityWaves | Knob::EnergyRipples | Knob::PixelDisplacement => {
                [0, 0, 0, 0, 10, 25, 50, 75, 100, 125, 150, 200]
            }
            _ => return None,
        };
        Some(row)
    }
}

/// Basic effect percentages (`quality` in the stored JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicSettings {
    pub jump_effect: f32,
    pub walk_effect: f32,
    pub die_effect: f32,
    pub horizontal_lines: f32,
    pub trail: f32,
    pub glow: f32,
    pub block_texture: f32,
    pub drop_effect: f32,
}

impl Default for BasicSettings {
    fn default() -> Self {
        Self {
            jump_effect: 100.0,
            walk_effect: 100.0,
            die_effect: 100.0,
            horizontal_lines: 100.0,
            trail: 100.0,
            glow: 100.0,
            block_texture: 100.0,
            drop_effect: 100.0,
        }
    }
}

/// Per-family percentages (`advanced` in the stored JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedSettings {
    pub shockwaves: f32,
    pub screen_shake: f32,
    pub bloom_particles: f32,
    pub particle_trails: f32,
    pub screen_distortion: f32,
    pub parallax_layers: f32,
    pub velocity_streaks: f32,
    pub impact_waves: f32,
    pub platform_pulse: f32,
    pub wind_particles: f32,
    pub speed_lines: f32,
    pub lens_flare: f32,
    pub dynamic_fog: f32,
    pub heat_distortion: f32,
    pub starbursts: f32,
    pub after_images: f32,
    pub gravity_waves: f32,
    pub energy_ripples: f32,
    pub pixel_displacement: f32,
    pub radial_blur: f32,
    pub cosmic_dust: f32,
    pub energy_sphere: f32,
    pub color_light: f32,
    pub spiral_energy: f32,
    pub metallic_particle: f32,
    pub digital_character: f32,
    pub mystic_orb: f32,
    pub crystal_structure: f32,
    pub dark_energy: f32,
    pub gravity_surge: f32,
    pub shadow_dash: f32,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            shockwaves: 100.0,
            screen_shake: 100.0,
            bloom_particles: 100.0,
            particle_trails: 100.0,
            screen_distortion: 100.0,
            parallax_layers: 100.0,
            velocity_streaks: 100.0,
            impact_waves: 100.0,
            platform_pulse: 100.0,
            wind_particles: 100.0,
            speed_lines: 100.0,
            lens_flare: 100.0,
            dynamic_fog: 100.0,
            heat_distortion: 100.0,
            starbursts: 100.0,
            after_images: 100.0,
            gravity_waves: 100.0,
            energy_ripples: 100.0,
            pixel_displacement: 100.0,
            radial_blur: 100.0,
            cosmic_dust: 100.0,
            energy_sphere: 100.0,
            color_light: 100.0,
            spiral_energy: 100.0,
            metallic_particle: 100.0,
            digital_character: 100.0,
            mystic_orb: 100.0,
            crystal_structure: 100.0,
            dark_energy: 100.0,
            gravity_surge: 100.0,
            shadow_dash: 100.0,
        }
    }
}

/// Stored settings document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Frame-rate cap; 0 means unlimited
    #[serde(rename = "maxFPS")]
    pub max_fps: u32,
    pub quality_preset: QualityPreset,
    pub quality: BasicSettings,
    pub advanced: AdvancedSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_fps: 0,
            quality_preset: QualityPreset::default(),
            quality: BasicSettings::default(),
            advanced: AdvancedSettings::default(),
        }
    }
}

impl Settings {
    /// Key-value store key
    pub const STORAGE_KEY: &'static str = "briddSettings";

    /// Stored percentage for a knob
    pub fn percent(&self, knob: Knob) -> f32 {
        let q = &self.quality;
        let a = &self.advanced;
        match knob {
            Knob::JumpEffect => q.jump_effect,
            Knob::WalkEffect => q.walk_effect,
            Knob::DieEffect => q.die_effect,
            Knob::HorizontalLines => q.horizontal_lines,
            Knob::Trail => q.trail,
            Knob::Glow => q.glow,
            Knob::BlockTexture => q.block_texture,
            Knob::DropEffect => q.drop_effect,
            Knob::Shockwaves => a.shockwaves,
            Knob::ScreenShake => a.screen_shake,
            Knob::BloomParticles => a.bloom_particles,
            Knob::ParticleTrails => a.particle_trails,
            Knob::ScreenDistortion => a.screen_distortion,
            Knob::ParallaxLayers => a.parallax_layers,
            Knob::VelocityStreaks => a.velocity_streaks,
            Knob::ImpactWaves => a.impact_waves,
            Knob::PlatformPulse => a.platform_pulse,
            Knob::WindParticles => a.wind_particles,
            Knob::SpeedLines => a.speed_lines,
            Knob::LensFlare => a.lens_flare,
            Knob::DynamicFog => a.dynamic_fog,
            Knob::HeatDistortion => a.heat_distortion,
            Knob::Starbursts => a.starbursts,
            Knob::AfterImages => a.after_images,
            Knob::GravityWaves => a.gravity_waves,
            Knob::EnergyRipples => a.energy_ripples,
            Knob::PixelDisplacement => a.pixel_displacement,
            Knob::RadialBlur => a.radial_blur,
            Knob::CosmicDust => a.cosmic_dust,
            Knob::EnergySphere => a.energy_sphere,
            Knob::ColorLight => a.color_light,
            Knob::SpiralEnergy => a.spiral_energy,
            Knob::MetallicParticle => a.metallic_particle,
            Knob::DigitalCharacter => a.digital_character,
            Knob::MysticOrb => a.mystic_orb,
            Knob::CrystalStructure => a.crystal_structure,
            Knob::DarkEnergy => a.dark_energy,
            Knob::GravitySurge => a.gravity_surge,
            Knob::ShadowDash => a.shadow_dash,
        }
    }

    /// Apply a preset: every knob the preset names takes the preset's value
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality_preset = preset;
        for knob in Knob::ALL {
            if let Some(row) = knob.preset_row() {
                self.set_percent(knob, row[preset.index()] as f32);
            }
        }
    }

    pub fn set_percent(&mut self, knob: Knob, value: f32) {
        let q = &mut self.quality;
        let a = &mut self.advanced;
        let slot = match knob {
            Knob::JumpEffect => &mut q.jump_effect,
            Knob::WalkEffect => &mut q.walk_effect,
            Knob::DieEffect => &mut q.die_effect,
            Knob::HorizontalLines => &mut q.horizontal_lines,
            Knob::Trail => &mut q.trail,
            Knob::Glow => &mut q.glow,
            Knob::BlockTexture => &mut q.block_texture,
            Knob::DropEffect => &mut q.drop_effect,
            Knob::Shockwaves => &mut a.shockwaves,
            Knob::ScreenShake => &mut a.screen_shake,
            Knob::BloomParticles => &mut a.bloom_particles,
            Knob::ParticleTrails => &mut a.particle_trails,
            Knob::ScreenDistortion => &mut a.screen_distortion,
            Knob::ParallaxLayers => &mut a.parallax_layers,
            Knob::VelocityStreaks => &mut a.velocity_streaks,
            Knob::ImpactWaves => &mut a.impact_waves,
            Knob::PlatformPulse => &mut a.platform_pulse,
            Knob::WindParticles => &mut a.wind_particles,
            Knob::SpeedLines => &mut a.speed_lines,
            Knob::LensFlare => &mut a.lens_flare,
            Knob::DynamicFog => &mut a.dynamic_fog,
            Knob::HeatDistortion => &mut a.heat_distortion,
            Knob::Starbursts => &mut a.starbursts,
            Knob::AfterImages => &mut a.after_images,
            Knob::GravityWaves => &mut a.gravity_waves,
            Knob::EnergyRipples => &mut a.energy_ripples,
            Knob::PixelDisplacement => &mut a.pixel_displacement,
            Knob::RadialBlur => &mut a.radial_blur,
            Knob::CosmicDust => &mut a.cosmic_dust,
            Knob::EnergySphere => &mut a.energy_sphere,
            Knob::ColorLight => &mut a.color_light,
            Knob::SpiralEnergy => &mut a.spiral_energy,
            Knob::MetallicParticle => &mut a.metallic_particle,
            Knob::DigitalCharacter => &mut a.digital_character,
            Knob::MysticOrb => &mut a.mystic_orb,
            Knob::CrystalStructure => &mut a.crystal_structure,
            Knob::DarkEnergy => &mut a.dark_energy,
            Knob::GravitySurge => &mut a.gravity_surge,
            Knob::ShadowDash => &mut a.shadow_dash,
        };
        *slot = value;
    }

    /// Derive the runtime multipliers.
    ///
    /// A stored 0 reads as "unset" and falls back to the preset's value
    /// (or 0 when the preset does not name the knob). Glow and trail are
    /// plain on/off flags taken from the stored value.
    pub fn quality(&self) -> Quality {
        let column = self.quality_preset.index();
        let mut multipliers = [0.0; Knob::COUNT];
        for (slot, knob) in multipliers.iter_mut().zip(Knob::ALL) {
            let stored = self.percent(knob).max(0.0) / 100.0;
            *slot = if stored > 0.0 {
                stored
            } else {
                knob.preset_row()
                    .map(|row| row[column] as f32 / 100.0)
                    .unwrap_or(0.0)
            };
        }
        Quality {
            multipliers,
            glow: self.quality.glow > 0.0,
            trail: self.quality.trail > 0.0,
        }
    }

    /// Minimum seconds between rendered frames, if capped
    pub fn min_frame_time(&self) -> Option<f32> {
        (self.max_fps > 0).then(|| 1.0 / self.max_fps as f32)
    }

    /// Load from the store, merging over defaults. Any failure yields defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let json = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read settings: {e}");
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from store");
                settings
            }
            Err(e) => {
                log::warn!("Stored settings are malformed, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Best-effort save; failures are logged
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {e}");
                return;
            }
        };
        match store.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}

/// Runtime multipliers derived from [`Settings`]
#[derive(Debug, Clone, PartialEq)]
pub struct Quality {
    multipliers: [f32; Knob::COUNT],
    /// Soft glow re-strokes
    pub glow: bool,
    /// Player ghost trail
    pub trail: bool,
}

impl Quality {
    /// Every knob at the same multiplier, glow and trail following it
    pub fn uniform(multiplier: f32) -> Self {
        Self {
            multipliers: [multiplier; Knob::COUNT],
            glow: multiplier > 0.0,
            trail: multiplier > 0.0,
        }
    }

    pub fn get(&self, knob: Knob) -> f32 {
        self.multipliers[knob as usize]
    }

    pub fn set(&mut self, knob: Knob, multiplier: f32) {
        self.multipliers[knob as usize] = multiplier;
    }

    /// Whether the family behind this knob runs at all
    pub fn enabled(&self, knob: Knob) -> bool {
        self.get(knob) > 0.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Settings::default().quality()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_are_full_strength() {
        let quality = Settings::default().quality();
        for knob in Knob::ALL {
            assert_eq!(quality.get(knob), 1.0, "{knob:?}");
        }
        assert!(quality.glow && quality.trail);
    }

    #[test]
    fn test_knob_table_matches_enum_order() {
        for (i, knob) in Knob::ALL.iter().enumerate() {
            assert_eq!(*knob as usize, i);
        }
    }

    #[test]
    fn test_zero_falls_back_to_preset() {
        let mut settings = Settings::default();
        settings.quality_preset = QualityPreset::Ultra;
        settings.advanced.shockwaves = 0.0;
        settings.advanced.cosmic_dust = 0.0;
        let quality = settings.quality();
        // Ultra names shockwaves at 100%
        assert_eq!(quality.get(Knob::Shockwaves), 1.0);
        // No preset mentions cosmic dust
        assert_eq!(quality.get(Knob::CosmicDust), 0.0);
    }

    #[test]
    fn test_glow_flag_reads_stored_value() {
        let mut settings = Settings::default();
        settings.quality.glow = 0.0;
        let quality = settings.quality();
        assert!(!quality.glow);
        // Multiplier still falls back to the Extreme+ preset value
        assert_eq!(quality.get(Knob::Glow), 1.0);
    }

    #[test]
    fn test_apply_preset() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Potato);
        assert_eq!(settings.quality_preset, QualityPreset::Potato);
        assert_eq!(settings.quality.jump_effect, 0.0);
        assert_eq!(settings.advanced.parallax_layers, 0.0);
        // Untouched by presets
        assert_eq!(settings.advanced.mystic_orb, 100.0);
        assert_eq!(settings.quality().get(Knob::JumpEffect), 0.0);

        settings.apply_preset(QualityPreset::Highest);
        assert_eq!(settings.quality().get(Knob::ParallaxLayers), 2.5);
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let json = r#"{"qualityPreset":"Ultra++","quality":{"jumpEffect":50},"advanced":{"speedLines":200}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.quality_preset, QualityPreset::UltraPlusPlus);
        assert_eq!(settings.quality.jump_effect, 50.0);
        assert_eq!(settings.quality.walk_effect, 100.0);
        assert_eq!(settings.advanced.speed_lines, 200.0);
        assert_eq!(settings.max_fps, 0);
    }

    #[test]
    fn test_json_uses_stored_key_names() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"maxFPS\":0"));
        assert!(json.contains("\"qualityPreset\":\"Extreme+\""));
        assert!(json.contains("\"blockTexture\":100.0"));
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in QualityPreset::ALL {
            assert_eq!(QualityPreset::from_name(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_name("ultra++"), Some(QualityPreset::UltraPlusPlus));
        assert_eq!(QualityPreset::from_name("bogus"), None);
    }

    #[test]
    fn test_min_frame_time() {
        let mut settings = Settings::default();
        assert_eq!(settings.min_frame_time(), None);
        settings.max_fps = 30;
        assert!((settings.min_frame_time().unwrap() - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.max_fps = 144;
        settings.apply_preset(QualityPreset::High);
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }
}
