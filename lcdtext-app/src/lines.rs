//! GPIO wiring helpers: backlight PWM and line probe

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use lcdtext_core::config::AppConfig;
use lcdtext_hal_linux::{GpioLine, OutputPin, SoftPwm};
use log::info;

/// Dim the backlight with software PWM and set the heater line, forever
pub fn backlight(cfg: &AppConfig) -> Result<()> {
    let chip = &cfg.panel.gpio_chip;
    let bl = &cfg.backlight;

    let bl_line = GpioLine::output(chip, bl.line, false, "lcdtext-bl")
        .with_context(|| format!("requesting backlight line {}", bl.line))?;

    // Held for the lifetime of the loop
    let _heater = match bl.heater_line {
        Some(offset) => {
            let mut line = GpioLine::output(chip, offset, false, "lcdtext-heater")
                .with_context(|| format!("requesting heater line {offset}"))?;
            line.set(bl.heater_on)
                .with_context(|| format!("driving heater line {offset}"))?;
            Some(line)
        }
        None => None,
    };

    let pwm = SoftPwm::start(bl_line, bl.freq_hz, i32::from(bl.duty));
    info!(
        "backlight line {} at {}% / {} Hz, heater {}",
        bl.line,
        pwm.duty(),
        pwm.frequency_hz(),
        if bl.heater_on { "on" } else { "off" }
    );

    println!(
        "Backlight duty={}% @ {}Hz; heater={}",
        pwm.duty(),
        pwm.frequency_hz(),
        u8::from(bl.heater_on)
    );
    println!("Ctrl+C to exit.");

    loop {
        thread::sleep(Duration::from_secs(1));
    }
}

/// Request a line as output, drive it high then low
pub fn probe(cfg: &AppConfig) -> Result<()> {
    let chip = &cfg.panel.gpio_chip;
    let offset = cfg.probe_line;

    let mut line = GpioLine::output(chip, offset, false, "lcdtext-probe")
        .with_context(|| format!("requesting {chip} line {offset}"))?;
    println!("Requested OUTPUT OK: {chip} line {offset}");

    line.set_high().context("setting line high")?;
    println!("Set HIGH OK");

    line.set_low().context("setting line low")?;
    println!("Set LOW OK");
    Ok(())
}
