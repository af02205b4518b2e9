use super::defaults::{MAX_HOST_ARGS, MAX_HOST_ARG_BYTES};
use super::{
    AppConfig, HostSource, MAX_HOST_LATENCY_MS, MAX_OPEN_TIMEOUT_MS, MAX_REFRESH_FALLBACK_MS,
    MIN_OPEN_TIMEOUT_MS, MIN_REFRESH_FALLBACK_MS,
};
use crate::hints::HintAlphabet;
use crate::input::{KeyInput, ToggleChord};
use crate::pagination::PAGE_SIZE;
use crate::render::{Theme, ThemeColors};
use crate::session::ControllerSettings;
use anyhow::{anyhow, bail, Result};
use clap::Parser;
use std::{env, time::Duration};

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before the terminal is touched.
    pub fn validate(&mut self) -> Result<()> {
        if self.host_latency_ms > MAX_HOST_LATENCY_MS {
            bail!(
                "--host-latency-ms must be between 0 and {MAX_HOST_LATENCY_MS}, got {}",
                self.host_latency_ms
            );
        }
        if !(MIN_REFRESH_FALLBACK_MS..=MAX_REFRESH_FALLBACK_MS).contains(&self.refresh_fallback_ms)
        {
            bail!(
                "--refresh-fallback-ms must be between {MIN_REFRESH_FALLBACK_MS} and {MAX_REFRESH_FALLBACK_MS}, got {}",
                self.refresh_fallback_ms
            );
        }
        if !(MIN_OPEN_TIMEOUT_MS..=MAX_OPEN_TIMEOUT_MS).contains(&self.open_timeout_ms) {
            bail!(
                "--open-timeout-ms must be between {MIN_OPEN_TIMEOUT_MS} and {MAX_OPEN_TIMEOUT_MS}, got {}",
                self.open_timeout_ms
            );
        }

        self.hint_alphabet()?;
        let chord = self.toggle_chord()?;
        if chord.matches(&KeyInput::char('q').with_ctrl()) {
            bail!("--toggle-key '{}' collides with the quit key (ctrl+q)", self.toggle_key);
        }

        if let Some(path) = &self.tabs_file {
            if !path.is_file() {
                bail!("--tabs-file '{}' is not a file", path.display());
            }
        }

        if self.host_cmd.is_none() && !self.host_args.is_empty() {
            bail!("--host-arg requires --host-cmd");
        }
        if self.host_args.len() > MAX_HOST_ARGS {
            bail!(
                "--host-arg repeated too many times (max {MAX_HOST_ARGS}, got {})",
                self.host_args.len()
            );
        }
        // Also limit the total byte length to keep argv small.
        let total_arg_bytes: usize = self.host_args.iter().map(|arg| arg.len()).sum();
        if total_arg_bytes > MAX_HOST_ARG_BYTES {
            bail!("combined --host-arg length exceeds {MAX_HOST_ARG_BYTES} bytes");
        }
        self.host_source()?;

        Ok(())
    }

    pub fn hint_alphabet(&self) -> Result<HintAlphabet> {
        HintAlphabet::new(&self.hint_chars, PAGE_SIZE).map_err(|err| anyhow!("--hint-chars: {err}"))
    }

    pub fn toggle_chord(&self) -> Result<ToggleChord> {
        self.toggle_key
            .parse::<ToggleChord>()
            .map_err(|err| anyhow!("--toggle-key: {err}"))
    }

    pub fn controller_settings(&self) -> Result<ControllerSettings> {
        Ok(ControllerSettings {
            alphabet: self.hint_alphabet()?,
            page_size: PAGE_SIZE,
            refresh_fallback: Duration::from_millis(self.refresh_fallback_ms),
            open_timeout: Duration::from_millis(self.open_timeout_ms),
        })
    }

    pub fn host_latency(&self) -> Duration {
        Duration::from_millis(self.host_latency_ms)
    }

    /// Resolve where tabs come from. `--host-cmd` is split shell-style so a
    /// command like `python3 host.py --fast` works as a single flag value.
    pub fn host_source(&self) -> Result<HostSource> {
        if let Some(cmd) = &self.host_cmd {
            let mut words = shell_words::split(cmd)
                .map_err(|err| anyhow!("--host-cmd could not be parsed: {err}"))?;
            if words.is_empty() {
                bail!("--host-cmd cannot be empty");
            }
            let program = words.remove(0);
            words.extend(self.host_args.iter().cloned());
            return Ok(HostSource::Command {
                program,
                args: words,
            });
        }
        Ok(match &self.tabs_file {
            Some(path) => HostSource::TabsFile(path.clone()),
            None => HostSource::Sample,
        })
    }

    pub fn theme_colors(&self) -> ThemeColors {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        if self.no_color || no_color_env {
            Theme::None.colors()
        } else {
            self.theme.colors()
        }
    }
}
