use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use typed_builder::TypedBuilder;

use gameperson_core::{Console, FrameTiming, StepError, SCREEN_HEIGHT, SCREEN_WIDTH};

pub const USAGE: &str = "Usage: gameperson <cartridge> <out.ppm> [frames] [--boot-rom <path>]";

#[derive(Debug, Clone, TypedBuilder)]
pub struct RunConfig {
    /// Without a boot ROM the console starts at 0x0100 in post-boot state.
    #[builder(default, setter(strip_option))]
    pub boot_rom: Option<PathBuf>,
    pub cartridge: PathBuf,
    pub output: PathBuf,
    #[builder(default = 60)]
    pub frames: u32,
    #[builder(default)]
    pub timing: FrameTiming,
}

impl RunConfig {
    /// Parse command-line arguments (without the program name).
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut positional = Vec::new();
        let mut boot_rom = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--boot-rom" {
                let Some(path) = args.next() else {
                    bail!("--boot-rom needs a path");
                };
                boot_rom = Some(PathBuf::from(path));
            } else if arg.starts_with("--") {
                bail!("unknown option '{arg}'");
            } else {
                positional.push(arg);
            }
        }

        let mut positional = positional.into_iter();
        let (Some(cartridge), Some(output)) = (positional.next(), positional.next()) else {
            bail!("missing cartridge or output path");
        };
        let frames = match positional.next() {
            Some(frames) => frames
                .parse()
                .with_context(|| format!("invalid frame count '{frames}'"))?,
            None => 60,
        };
        if let Some(extra) = positional.next() {
            bail!("unexpected argument '{extra}'");
        }

        Ok(Self {
            boot_rom,
            cartridge: cartridge.into(),
            output: output.into(),
            frames,
            timing: FrameTiming::default(),
        })
    }
}

/// What happened during a [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u32,
    pub cycles: u64,
    pub soft_faults: u64,
    /// Set when the CPU locked before all frames ran.
    pub stopped: Option<StepError>,
}

/// Load the ROM images, run the requested frames and write the last frame
/// as a PPM image.
///
/// A CPU error ends the loop early but the frame is still written; the
/// error is reported in the summary.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let cartridge = std::fs::read(&config.cartridge)
        .with_context(|| format!("failed to read cartridge '{}'", config.cartridge.display()))?;
    log::info!(
        "loaded cartridge '{}' ({} bytes)",
        config.cartridge.display(),
        cartridge.len()
    );

    let mut console = match &config.boot_rom {
        Some(path) => {
            let boot_rom = std::fs::read(path)
                .with_context(|| format!("failed to read boot ROM '{}'", path.display()))?;
            Console::new(&boot_rom, cartridge)?
        }
        None => Console::without_boot_rom(cartridge),
    };

    let mut frames = 0;
    let mut stopped = None;
    while frames < config.frames {
        match console.run_frame(&config.timing) {
            Ok(_) => frames += 1,
            Err(err) => {
                stopped = Some(err);
                break;
            }
        }
    }

    let mut rgb = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    console.video_frame(&mut rgb);
    write_ppm(&config.output, SCREEN_WIDTH, SCREEN_HEIGHT, &rgb)?;

    let summary = RunSummary {
        frames,
        cycles: console.cpu.cycles,
        soft_faults: console.bus().soft_faults(),
        stopped,
    };
    log::info!("{summary:?}");
    Ok(summary)
}

/// Binary PPM (P6) encoding of an RGB24 image.
pub fn encode_ppm(width: usize, height: usize, rgb: &[u8]) -> Result<Vec<u8>> {
    let expected = width * height * 3;
    if rgb.len() != expected {
        bail!("expected {expected} bytes of RGB data, got {}", rgb.len());
    }

    let mut out = format!("P6\n{width} {height}\n255\n").into_bytes();
    out.extend_from_slice(rgb);
    Ok(out)
}

pub fn write_ppm(path: &Path, width: usize, height: usize, rgb: &[u8]) -> Result<()> {
    let data = encode_ppm(width, height, rgb)?;
    std::fs::write(path, data).with_context(|| format!("failed to write '{}'", path.display()))
}
