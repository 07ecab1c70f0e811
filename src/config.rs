use std::ffi::OsString;
use std::fmt::Display;
use std::str::FromStr;

use clap::ArgMatches;
use tracing::Level;

use crate::error::{Error, Result};
use crate::view::color::ColorScheme;
use crate::view::VisualizerKind;
use crate::window;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    /// Input device by name; the host default if `None`
    pub device: Option<String>,
    /// Sample rate; the device default if `None`
    pub rate: Option<f64>,
    pub period: u32,
    pub channels: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub fft_size: usize,
    pub window: String,
    pub smoothing: f32,
    pub min_db: f32,
    pub max_db: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub width: u32,
    pub height: u32,
    pub gfx_rate: f64,
    pub background: [u8; 3],
    pub views: Vec<VisualizerKind>,
    /// Seconds of audio across one spectrogram width
    pub length_secs: f64,
    pub threshold: u8,
    pub scheme: ColorScheme,
    pub trigger_search: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub list_devices: bool,
    pub list_windows: bool,
    pub audio: AudioSettings,
    pub analysis: AnalysisSettings,
    pub display: DisplaySettings,
    pub log_level: Level,
    pub profile: bool,
}

/// Parses and validates a full argument list (program name first).
pub fn parse<I, T>(args: I) -> Result<Settings>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let yaml = load_yaml!("args.yml");
    let matches = clap::App::from_yaml(yaml).get_matches_from_safe(args)?;
    Settings::from_matches(&matches)
}

fn parsed<T>(matches: &ArgMatches, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = matches
        .value_of(name)
        .ok_or_else(|| Error::config(format!("--{} is required", name)))?;
    parse_value(name, raw)
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::config(format!("--{} {:?}: {}", name, raw, e)))
}

fn optional<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    matches.value_of(name).map(|raw| parse_value(name, raw)).transpose()
}

fn parse_rgb(raw: &str) -> Result<[u8; 3]> {
    let parts = raw
        .split(',')
        .map(|p| parse_value::<u8>("background", p))
        .collect::<Result<Vec<u8>>>()?;
    match parts[..] {
        [r, g, b] => Ok([r, g, b]),
        _ => Err(Error::config(format!("--background {:?}: expected R,G,B", raw))),
    }
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Result<Settings> {
        let hues = (parsed(matches, "hue-from")?, parsed(matches, "hue-to")?);
        let scheme_name: String = parsed(matches, "scheme")?;
        let scheme = ColorScheme::from_name(&scheme_name, hues)
            .ok_or_else(|| {
                Error::config(format!(
                    "--scheme: unknown color scheme '{}' (expected one of {})",
                    scheme_name,
                    ColorScheme::NAMES.join(", ")
                ))
            })?;

        let views = parsed::<String>(matches, "views")?
            .split(',')
            .map(|v| v.trim().parse())
            .collect::<Result<Vec<VisualizerKind>>>()?;

        let threshold: u32 = parsed(matches, "threshold")?;
        let threshold = u8::try_from(threshold)
            .map_err(|_| Error::config(format!("--threshold {} is above 255", threshold)))?;

        let settings = Settings {
            list_devices: matches.is_present("list-dev"),
            list_windows: matches.is_present("list-win"),
            audio: AudioSettings {
                device: matches.value_of("aud-dev").map(String::from),
                rate: optional(matches, "aud-rate")?,
                period: parsed(matches, "aud-period")?,
                channels: parsed(matches, "aud-channels")?,
            },
            analysis: AnalysisSettings {
                fft_size: parsed(matches, "fft-size")?,
                window: parsed(matches, "fft-win")?,
                smoothing: parsed(matches, "smoothing")?,
                min_db: parsed(matches, "min-db")?,
                max_db: parsed(matches, "max-db")?,
            },
            display: DisplaySettings {
                width: parsed(matches, "width")?,
                height: parsed(matches, "height")?,
                gfx_rate: parsed(matches, "gfx-rate")?,
                background: parse_rgb(matches.value_of("background").unwrap_or("0,0,0"))?,
                views,
                length_secs: parsed(matches, "length")?,
                threshold,
                scheme,
                trigger_search: parsed(matches, "trigger-search")?,
            },
            log_level: parsed(matches, "log-level")?,
            profile: matches.is_present("profile"),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        if !a.fft_size.is_power_of_two() || a.fft_size < 32 {
            return Err(Error::config(format!("--fft-size must be a power of two >= 32, got {}", a.fft_size)));
        }
        if !window::windows().contains_key(a.window.as_str()) {
            return Err(Error::config(format!("--fft-win: unknown window function '{}'", a.window)));
        }
        if !(0.0 .. 1.0).contains(&a.smoothing) {
            return Err(Error::config(format!("--smoothing must be in [0, 1), got {}", a.smoothing)));
        }
        if a.min_db >= a.max_db {
            return Err(Error::config(format!("--min-db ({}) must be below --max-db ({})", a.min_db, a.max_db)));
        }

        let d = &self.display;
        if !(d.length_secs > 0.0) {
            return Err(Error::config(format!("--length must be positive, got {}", d.length_secs)));
        }
        if !(d.gfx_rate > 0.0) {
            return Err(Error::config(format!("--gfx-rate must be positive, got {}", d.gfx_rate)));
        }
        if d.width == 0 || d.height == 0 {
            return Err(Error::config("window size must be non-zero"));
        }
        if let ColorScheme::Custom { hue_from, hue_to } = d.scheme {
            if !(0.0 ..= 360.0).contains(&hue_from) || !(0.0 ..= 360.0).contains(&hue_to) {
                return Err(Error::config("--hue-from and --hue-to must be in [0, 360]"));
            }
        }

        let au = &self.audio;
        if au.channels < 1 {
            return Err(Error::config(format!("--aud-channels must be at least 1, got {}", au.channels)));
        }
        if au.period == 0 {
            return Err(Error::config("--aud-period must be non-zero"));
        }
        if let Some(rate) = au.rate {
            if !(rate > 0.0) {
                return Err(Error::config(format!("--aud-rate must be positive, got {}", rate)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Result<Settings> {
        parse(std::iter::once("specbg").chain(extra.iter().copied()))
    }

    #[test]
    fn defaults() {
        let s = args(&[]).unwrap();
        assert_eq!(s.analysis.fft_size, 2048);
        assert_eq!(s.analysis.window, "blackman");
        assert_eq!(s.analysis.smoothing, 0.8);
        assert_eq!((s.analysis.min_db, s.analysis.max_db), (-100.0, -30.0));
        assert_eq!(s.display.views, vec![VisualizerKind::Spectrogram]);
        assert_eq!(s.display.scheme, ColorScheme::PurpleIce);
        assert_eq!(s.display.length_secs, 15.0);
        assert_eq!(s.display.threshold, 8);
        assert_eq!(s.display.background, [0, 0, 0]);
        assert_eq!(s.audio.device, None);
        assert_eq!(s.audio.rate, None);
        assert_eq!(s.audio.channels, 1);
        assert_eq!(s.log_level, Level::INFO);
        assert!(!s.profile && !s.list_devices && !s.list_windows);
    }

    #[test]
    fn overrides() {
        let s = args(&[
            "--views", "spectrogram, waveform,spectrum",
            "--scheme", "custom", "--hue-from", "10", "--hue-to", "350",
            "--min-db", "-90", "--aud-rate", "48000", "--aud-dev", "USB Mic",
            "--background", "15,15,15", "--profile",
        ])
        .unwrap();
        assert_eq!(
            s.display.views,
            vec![VisualizerKind::Spectrogram, VisualizerKind::Waveform, VisualizerKind::Spectrum]
        );
        assert_eq!(s.display.scheme, ColorScheme::Custom { hue_from: 10.0, hue_to: 350.0 });
        assert_eq!(s.analysis.min_db, -90.0);
        assert_eq!(s.audio.rate, Some(48000.0));
        assert_eq!(s.audio.device.as_deref(), Some("USB Mic"));
        assert_eq!(s.display.background, [15, 15, 15]);
        assert!(s.profile);
    }

    #[test]
    fn rejects_bad_values() {
        for bad in [
            &["--fft-size", "1000"][..],
            &["--fft-size", "16"],
            &["--fft-win", "kaiser"],
            &["--smoothing", "1.0"],
            &["--min-db", "-20"],
            &["--length", "0"],
            &["--threshold", "256"],
            &["--scheme", "sepia"],
            &["--views", "spectrogram,oscilloscope"],
            &["--scheme", "custom", "--hue-to", "400"],
            &["--aud-channels", "0"],
            &["--background", "1,2"],
            &["--gfx-rate", "abc"],
        ] {
            match args(bad) {
                Err(Error::Config(_)) => {}
                other => panic!("{:?} gave {:?}", bad, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn unknown_flag_is_a_clap_error() {
        assert!(matches!(args(&["--nope"]), Err(Error::Args(_))));
    }
}
