use super::*;
use crate::cpu::Bus;
use crate::error::{Access, BusError, Feature, LoadError, StepError};
use crate::SCREEN_WIDTH;

fn cart_with(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0; 0x8000];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    rom
}

/// Bus with unsigned tile data, the `0x9800` map and the identity palette.
fn render_bus() -> AddressBus {
    let mut bus = AddressBus::without_boot_rom(cart_with(&[]));
    bus.write8(0xFF40, 0x91).unwrap();
    bus.write8(0xFF47, 0b1110_0100).unwrap();
    bus
}

/// Tile 1: pixel (0,0) uses colour 1, pixel (7,1) uses colour 3.
fn load_test_tile(bus: &mut AddressBus) {
    bus.write8(0x8010, 0x80).unwrap();
    bus.write8(0x8011, 0x00).unwrap();
    bus.write8(0x8012, 0x01).unwrap();
    bus.write8(0x8013, 0x01).unwrap();
}

fn pixel(bus: &AddressBus, x: usize, y: usize) -> u32 {
    bus.display().framebuffer()[y * SCREEN_WIDTH + x]
}

#[test]
fn palette_decodes_two_bit_fields() {
    let palette = Palette::from_register(0b1110_0100);
    assert_eq!(
        palette.colors(),
        [Shade::White, Shade::LightGray, Shade::DarkGray, Shade::Black]
    );
    assert_eq!(Palette::from_register(0xFC).shade(0), Shade::White);
    assert_eq!(Palette::from_register(0xFC).shade(1), Shade::Black);
}

#[test]
fn object_palette_treats_zero_as_transparent() {
    let palette = ObjectPalette::from_register(0b1110_0100);
    assert_eq!(palette.shade(0), None);
    assert_eq!(palette.shade(1), Some(Shade::LightGray));
    assert_eq!(palette.shade(3), Some(Shade::Black));
}

#[test]
fn shade_packs_rgba_little_endian() {
    assert_eq!(Shade::White.rgba().to_le_bytes(), [0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(Shade::LightGray.rgba().to_le_bytes(), [0xAA, 0xAA, 0xAA, 0xFF]);
    assert_eq!(Shade::Black.rgba().to_le_bytes(), [0x00, 0x00, 0x00, 0xFF]);
}

#[test]
fn boot_rom_must_be_256_bytes() {
    assert_eq!(
        AddressBus::new(&[0; 100], Vec::new()).err(),
        Some(LoadError::BootRomSize {
            len: 100,
            expected: 256
        })
    );
}

#[test]
fn boot_rom_unmap_is_permanent() {
    let mut bus = AddressBus::new(&[0xAA; 256], vec![0x11; 0x8000]).unwrap();
    assert_eq!(bus.read8(0x0000), Ok(0xAA));
    assert_eq!(bus.read8(0x0100), Ok(0x11));

    bus.write8(0xFF50, 0x00).unwrap();
    assert!(bus.boot_rom_enabled());

    bus.write8(0xFF50, 0x01).unwrap();
    assert!(!bus.boot_rom_enabled());
    assert_eq!(bus.read8(0x0000), Ok(0x11));

    bus.write8(0xFF50, 0x00).unwrap();
    assert!(!bus.boot_rom_enabled());
    assert_eq!(bus.read8(0x00FF), Ok(0x11));
}

#[test]
fn empty_cartridge_leaves_address_zero_unmapped() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    assert_eq!(bus.read8(0x0000), Err(BusError::UnmappedRead { addr: 0x0000 }));
}

#[test]
fn byte_at_cartridge_length_is_unmapped() {
    let mut short = AddressBus::without_boot_rom(vec![0x42; 0x10]);
    assert_eq!(short.read8(0x000F), Ok(0x42));
    assert_eq!(
        short.read8(0x0010),
        Err(BusError::UnmappedRead { addr: 0x0010 })
    );

    let mut full = AddressBus::without_boot_rom(vec![0x42; 0x8000]);
    assert_eq!(
        full.read8(0x8000),
        Err(BusError::UnmappedRead { addr: 0x8000 })
    );
    full.write8(0x8001, 0x77).unwrap();
    assert_eq!(full.read8(0x8001), Ok(0x77));
}

#[test]
fn long_cartridge_shadows_video_ram_reads() {
    let mut rom = vec![0; 0x9000];
    rom[0x8000] = 0x5A;
    let mut bus = AddressBus::without_boot_rom(rom);
    assert_eq!(bus.read8(0x8000), Ok(0x5A));

    // Writes still land in VRAM underneath.
    bus.write8(0x8000, 0x11).unwrap();
    assert_eq!(bus.vram()[0], 0x11);
    assert_eq!(bus.read8(0x8000), Ok(0x5A));

    // Past the end of the image VRAM is visible again.
    bus.write8(0x9001, 0x22).unwrap();
    assert_eq!(bus.read8(0x9001), Ok(0x22));
}

#[test]
fn boot_rom_takes_precedence_over_cartridge() {
    let mut bus = AddressBus::new(&[0xAA; 256], vec![0x11; 0x9000]).unwrap();
    assert_eq!(bus.read8(0x00FF), Ok(0xAA));
    assert_eq!(bus.read8(0x0100), Ok(0x11));
    assert_eq!(bus.read8(0x8FFF), Ok(0x11));
}

#[test]
fn rom_writes_are_soft_faults() {
    let mut bus = AddressBus::without_boot_rom(cart_with(&[]));
    let err = bus.write8(0x2000, 0x01).unwrap_err();
    assert_eq!(
        err,
        BusError::UnmappedWrite {
            addr: 0x2000,
            value: 0x01
        }
    );
    assert!(!err.is_fatal());
    assert_eq!(bus.soft_faults(), 1);
    assert_eq!(bus.read8(0x2000), Ok(0x00));
}

#[test]
fn echo_ram_mirrors_work_ram() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    bus.write8(0xC123, 0x5A).unwrap();
    assert_eq!(bus.read8(0xE123), Ok(0x5A));
    bus.write8(0xFDFF, 0xA5).unwrap();
    assert_eq!(bus.read8(0xDDFF), Ok(0xA5));
}

#[test]
fn word_access_straddles_regions() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    bus.write8(0xFFFE, 0x34).unwrap();
    bus.write8(0xFFFF, 0x1F).unwrap();
    assert_eq!(bus.read16(0xFFFE), Ok(0x1F34));

    bus.write16(0x9FFF, 0xBEEF).unwrap_err();
    assert_eq!(bus.read8(0x9FFF), Ok(0xEF));
    assert_eq!(bus.soft_faults(), 1);
    assert_eq!(
        bus.read16(0x9FFF),
        Err(BusError::UnmappedRead { addr: 0xA000 })
    );
}

#[test]
fn joypad_is_a_placeholder() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    assert_eq!(bus.read8(0xFF00), Ok(0xFF));
    assert_eq!(bus.write8(0xFF00, 0x20), Ok(()));
    assert_eq!(bus.read8(0xFF00), Ok(0xFF));
}

#[test]
fn interrupt_registers_route_to_controller() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    bus.write8(0xFF0F, 0x05).unwrap();
    bus.write8(0xFFFF, 0x01).unwrap();
    assert_eq!(bus.read8(0xFF0F), Ok(0xE5));
    assert_eq!(bus.read8(0xFFFF), Ok(0x01));
    assert_eq!(
        bus.interrupt_controller().pending_count(Interrupt::Timer),
        1
    );
    assert!(bus.interrupt_controller().has_enabled_pending());
}

#[test]
fn lcd_register_errors() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());

    let err = bus.write8(0xFF44, 0x10).unwrap_err();
    assert_eq!(
        err,
        BusError::Unimplemented {
            addr: 0xFF44,
            access: Access::Write,
            feature: Feature::ScanlineWrite
        }
    );
    assert!(!err.is_fatal());
    assert_eq!(bus.read8(0xFF44), Ok(0));

    let err = bus.read8(0xFF45).unwrap_err();
    assert_eq!(
        err,
        BusError::Unimplemented {
            addr: 0xFF45,
            access: Access::Read,
            feature: Feature::LcdRegister(0x05)
        }
    );
    assert!(err.is_fatal());
}

#[test]
fn window_and_object_palette_registers_read_back() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    for (addr, value) in [(0xFF48, 0xE4), (0xFF49, 0x1B), (0xFF4A, 0x10), (0xFF4B, 0x07)] {
        bus.write8(addr, value).unwrap();
        assert_eq!(bus.read8(addr), Ok(value));
    }
    assert_eq!(
        bus.display().obj_palette(1).map(|p| p.shade(1)),
        Some(Some(Shade::DarkGray))
    );
}

#[test]
fn stat_reports_select_bits_and_mode() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    bus.write8(0xFF41, 0xFF).unwrap();
    assert_eq!(bus.read8(0xFF41), Ok(0xF8));

    for _ in 0..144 {
        bus.display_mut().step();
    }
    assert_eq!(bus.read8(0xFF41), Ok(0xF9));
}

#[test]
fn scanline_holds_at_last_line() {
    let mut display = DisplayController::new();
    let vblank_entries = (0..200).filter(|_| display.step()).count();
    assert_eq!(vblank_entries, 1);
    assert_eq!(display.scanline(), 153);

    display.start_frame();
    assert_eq!(display.scanline(), 0);
}

#[test]
fn lcdc_decodes_flags() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    bus.write8(0xFF40, 0x91).unwrap();
    let lcdc = bus.display().lcd_control();
    assert!(bus.display().display_enabled());
    assert!(bus.display().bg_enabled());
    assert!(lcdc.contains(LcdControl::TILE_DATA));
    assert!(!lcdc.contains(LcdControl::BG_TILE_MAP));
    assert!(!lcdc.contains(LcdControl::WINDOW_ENABLE));
    assert_eq!(bus.read8(0xFF40), Ok(0x91));
}

#[test]
fn background_tile_renders_through_palette() {
    let mut bus = render_bus();
    load_test_tile(&mut bus);
    bus.write8(0x9800, 0x01).unwrap();
    bus.write8(0xFF43, 0x00).unwrap();

    assert_eq!(pixel(&bus, 0, 0), Shade::LightGray.rgba());
    assert_eq!(pixel(&bus, 1, 0), Shade::White.rgba());
    assert_eq!(pixel(&bus, 7, 1), Shade::Black.rgba());
    assert_eq!(pixel(&bus, 8, 0), Shade::White.rgba());
}

#[test]
fn scroll_moves_and_wraps_background() {
    let mut bus = render_bus();
    load_test_tile(&mut bus);
    bus.write8(0x9800, 0x01).unwrap();

    bus.write8(0xFF43, 0x01).unwrap();
    assert_eq!(pixel(&bus, 0, 0), Shade::White.rgba());
    assert_eq!(pixel(&bus, 6, 1), Shade::Black.rgba());

    // Tile column 31 sits just left of column 0 in the 256-pixel map.
    bus.write8(0x9800, 0x00).unwrap();
    bus.write8(0x981F, 0x01).unwrap();
    bus.write8(0xFF43, 0xF8).unwrap();
    assert_eq!(pixel(&bus, 0, 0), Shade::LightGray.rgba());

    // Row 31 wraps the same way vertically.
    bus.write8(0x981F, 0x00).unwrap();
    bus.write8(0x9BE0, 0x01).unwrap();
    bus.write8(0xFF43, 0x00).unwrap();
    bus.write8(0xFF42, 0xF8).unwrap();
    assert_eq!(pixel(&bus, 0, 0), Shade::LightGray.rgba());
    assert_eq!(pixel(&bus, 7, 1), Shade::Black.rgba());
}

#[test]
fn second_tile_map_is_selected_by_lcdc() {
    let mut bus = render_bus();
    load_test_tile(&mut bus);
    bus.write8(0x9C00, 0x01).unwrap();

    bus.write8(0xFF43, 0x00).unwrap();
    assert_eq!(pixel(&bus, 0, 0), Shade::White.rgba());

    bus.write8(0xFF40, 0x99).unwrap();
    bus.write8(0xFF43, 0x00).unwrap();
    assert_eq!(pixel(&bus, 0, 0), Shade::LightGray.rgba());
}

#[test]
fn palette_write_redraws() {
    let mut bus = render_bus();
    load_test_tile(&mut bus);
    bus.write8(0x9800, 0x01).unwrap();
    bus.write8(0xFF43, 0x00).unwrap();

    // Colour 1 -> black.
    bus.write8(0xFF47, 0b1110_1100).unwrap();
    assert_eq!(pixel(&bus, 0, 0), Shade::Black.rgba());
}

#[test]
fn signed_tile_data_is_reported() {
    let mut bus = AddressBus::without_boot_rom(Vec::new());
    bus.write8(0xFF40, 0x81).unwrap();

    let err = bus.write8(0xFF43, 0x08).unwrap_err();
    assert_eq!(
        err,
        BusError::Unimplemented {
            addr: 0xFF43,
            access: Access::Write,
            feature: Feature::SignedTileData
        }
    );
    assert!(!err.is_fatal());
    assert_eq!(bus.soft_faults(), 1);
    assert_eq!(bus.display().scroll(), (0x08, 0x00));
    assert!(bus
        .display()
        .framebuffer()
        .iter()
        .all(|&p| p == Shade::White.rgba()));
}

#[test]
fn post_boot_state() {
    let console = Console::without_boot_rom(cart_with(&[]));
    let regs = &console.cpu.regs;
    assert_eq!(regs.af(), 0x01B0);
    assert_eq!(regs.bc(), 0x0013);
    assert_eq!(regs.de(), 0x00D8);
    assert_eq!(regs.hl(), 0x014D);
    assert_eq!(regs.sp, 0xFFFE);
    assert_eq!(regs.pc, 0x0100);
    assert!(!console.bus().boot_rom_enabled());
    assert_eq!(console.display().lcd_control().bits(), 0x91);
    assert_eq!(console.display().bg_palette(), Palette::from_register(0xFC));
    assert_eq!(console.bus().soft_faults(), 0);
}

#[test]
fn entering_vblank_requests_interrupt() {
    let mut console = Console::without_boot_rom(cart_with(&[]));
    for _ in 0..143 {
        console.step_scanline();
    }
    let pending = |c: &Console| c.bus().interrupt_controller().pending_count(Interrupt::VBlank);
    assert_eq!(pending(&console), 0);

    console.step_scanline();
    assert_eq!(pending(&console), 1);

    for _ in 0..20 {
        console.step_scanline();
    }
    assert_eq!(pending(&console), 1);
}

#[test]
fn run_frame_spends_one_frame_of_cycles() {
    // JR -2
    let mut console = Console::without_boot_rom(cart_with(&[0x18, 0xFE]));
    let timing = FrameTiming::default();
    assert_eq!(timing.cycles_per_frame(), 70_224);

    let cycles = console.run_frame(&timing).unwrap();
    assert!((70_224..70_224 + 12).contains(&cycles), "{cycles}");
    assert_eq!(console.cpu.cycles, cycles);
    assert_eq!(console.cpu.regs.pc, 0x0100);
    assert_eq!(console.display().scanline(), 153);
    assert_eq!(
        console
            .bus()
            .interrupt_controller()
            .pending_count(Interrupt::VBlank),
        1
    );
}

#[test]
fn vblank_handler_runs_when_enabled() {
    // EI ; JR -2, with a handler at 0x40 that increments B and returns.
    let mut rom = cart_with(&[0xFB, 0x18, 0xFE]);
    rom[0x0040] = 0x04;
    rom[0x0041] = 0xD9;
    let mut console = Console::without_boot_rom(rom);
    console.bus_mut().write8(0xFFFF, 0x01).unwrap();
    console.cpu.regs.b = 0;

    console.run_frame(&FrameTiming::default()).unwrap();
    // The request raised on line 144 is serviced before the frame ends.
    assert_eq!(console.cpu.regs.b, 1);
    assert!(console.bus().interrupt_controller().ime());
}

#[test]
fn run_frame_stops_on_bad_opcode() {
    let mut console = Console::without_boot_rom(cart_with(&[0x00, 0xDD]));
    assert_eq!(
        console.run_frame(&FrameTiming::default()),
        Err(StepError::UnknownOpcode {
            opcode: 0xDD,
            pc: 0x0101
        })
    );
    assert!(console.cpu.is_locked());
}

#[test]
fn video_frame_is_rgb24() {
    let mut console = Console::without_boot_rom(cart_with(&[]));
    console.bus_mut().write8(0x8010, 0xFF).unwrap();
    console.bus_mut().write8(0x8011, 0xFF).unwrap();
    console.bus_mut().write8(0x9800, 0x01).unwrap();
    console.bus_mut().refresh_display().unwrap();

    let mut rgb = vec![0u8; SCREEN_WIDTH * crate::SCREEN_HEIGHT * 3];
    console.video_frame(&mut rgb);
    // BGP 0xFC maps colour 3 to black.
    assert_eq!(&rgb[..3], &[0x00, 0x00, 0x00]);
    assert_eq!(&rgb[8 * 3..9 * 3], &[0xFF, 0xFF, 0xFF]);
}
