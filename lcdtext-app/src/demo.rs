//! Four-line status demo

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use lcdtext_core::config::{AppConfig, PanelModel};
use lcdtext_core::{LineDisplay, LineRole, TrueTypeFace, LINE_COUNT};
use lcdtext_drivers::{DriverError, Ili9488, PanelDriver, St7565};
use lcdtext_hal_linux::{Delay, GpioLine, HalError, Mode, SpiConfig, SpidevBus};
use log::info;

/// Time between frames
const FRAME_INTERVAL: Duration = Duration::from_millis(500);

type Panel = Box<dyn PanelDriver<Error = DriverError<HalError, HalError>>>;

/// Open the configured panel and draw frames until `frames` runs out
pub fn run(cfg: &AppConfig, frames: Option<u64>) -> Result<()> {
    let model = cfg.panel.model;
    let mut panel = open_panel(cfg)?;

    panel.reset().context("resetting panel")?;
    panel.init().context("initializing panel")?;
    if model.is_color() {
        panel.clear().context("clearing panel")?;
    }

    let (width, height) = panel.size();
    let (small, large) = cfg.font.sizes(model);
    let mut display = LineDisplay::<TrueTypeFace>::new(width, height, small, large)
        .context("creating line layout")?;
    display
        .initialize(&cfg.font.path)
        .with_context(|| format!("loading font {}", cfg.font.path))?;

    let title = format!("Four Line Display Demo [{} {}x{}]", model_label(model), width, height);
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    for line in 0..LINE_COUNT {
        let role = match display.line_role(line) {
            Some(LineRole::Large) => "large",
            _ => "small",
        };
        println!("Line {line} ({role}): max {} chars", display.capacity(line));
    }
    println!("\nPress Ctrl+C to exit...\n");

    let mut counter: u64 = 0;
    while frames.map_or(true, |n| counter < n) {
        display.set_text(0, "Status: Running");
        display.set_text(1, format!("Count: {counter}"));
        display.set_text(2, format!("lcdtext {}", model_label(model)));
        display.set_text(3, "Ver 2.0");

        panel
            .push_frame(display.render())
            .context("pushing frame")?;

        counter += 1;
        thread::sleep(FRAME_INTERVAL);
    }

    info!("demo finished after {} frames", counter);
    Ok(())
}

/// Acquire bus and lines, then build the driver for the configured model
fn open_panel(cfg: &AppConfig) -> Result<Panel> {
    let p = &cfg.panel;
    let mode = Mode::from_number(p.spi_mode).unwrap_or(Mode::Mode0);

    let spi = SpidevBus::open(&p.spi_device, SpiConfig::new(p.spi_hz()).with_mode(mode))
        .with_context(|| format!("opening {}", p.spi_device))?;
    let dc = GpioLine::output(&p.gpio_chip, p.dc_line, false, "lcdtext-dc")
        .with_context(|| format!("requesting DC line {}", p.dc_line))?;
    let rst = GpioLine::output(&p.gpio_chip, p.rst_line, true, "lcdtext-rst")
        .with_context(|| format!("requesting RST line {}", p.rst_line))?;

    let (width, height) = p.size();
    info!(
        "{} on {} @ {} Hz, dc={} rst={}",
        p.model,
        p.spi_device,
        p.spi_hz(),
        p.dc_line,
        p.rst_line
    );

    let panel: Panel = match p.model {
        PanelModel::St7565 => Box::new(St7565::with_size(spi, dc, rst, Delay, width, height)),
        PanelModel::Ili9488 => Box::new(
            Ili9488::new(spi, dc, rst, Delay, width, height)
                .with_rotation(p.rotation)
                .with_pixel_format(p.pixel_format)
                .with_colors(p.fg, p.bg)
                .with_max_transfer(p.max_transfer),
        ),
    };
    Ok(panel)
}

fn model_label(model: PanelModel) -> &'static str {
    match model {
        PanelModel::St7565 => "ST7565",
        PanelModel::Ili9488 => "ILI9488",
    }
}

/// Troubleshooting hints after a failed demo
pub fn print_hints(cfg: &AppConfig) {
    eprintln!("Hints:");
    eprintln!(
        "  - Ensure the SPI overlay is enabled and {} exists.",
        cfg.panel.spi_device
    );
    eprintln!("  - Ensure the font exists: {}", cfg.font.path);
    eprintln!("  - Verify GPIO line offsets with gpioinfo.");
    eprintln!("  - For ILI9488 modules, verify SPI wiring and use --model ili9488.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_labels() {
        assert_eq!(model_label(PanelModel::St7565), "ST7565");
        assert_eq!(model_label(PanelModel::Ili9488), "ILI9488");
    }
}
