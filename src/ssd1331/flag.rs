/// Various flags and constants used in the SSD1331 OLED driver.
///
/// Parameter bytes that follow a [`Cmd`](super::cmd::Cmd) opcode.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Master Current Control (0x87): 8/16 of full scale
    pub const MASTER_CURRENT_HALF: u8 = 0x07;

    // Remap & Color Depth (0xA0)
    // 65k color format, COM split odd/even, scan COM63 to COM0, column 95 to SEG0
    pub const REMAP_65K_COLOR: u8 = 0x72;

    pub const START_LINE_TOP: u8 = 0x00;
    pub const DISPLAY_OFFSET_NONE: u8 = 0x00;

    // Multiplex Ratio (0xA8): 64 MUX
    pub const MULTIPLEX_64: u8 = 0x3F;

    // Master Configuration (0xAD): select external VCC supply
    pub const MASTER_CONFIG_EXTERNAL_VCC: u8 = 0x8E;

    // Power Save Mode (0xB0): disable power save
    pub const POWER_SAVE_DISABLE: u8 = 0x0B;

    // Phase 1 and 2 Period Adjustment (0xB1)
    pub const PHASE_PERIOD_DEFAULT: u8 = 0x31;

    // Display Clock Divider / Oscillator Frequency (0xB3)
    pub const CLOCK_DIVIDER_DEFAULT: u8 = 0xF0;

    // Pre-charge Level (0xBB) and VCOMH (0xBE)
    pub const PRE_CHARGE_DEFAULT: u8 = 0x3E;
    pub const VCOMH_DEFAULT: u8 = 0x3E;

    // Dim Mode Setting (0xAB): first parameter is reserved
    pub const DIM_MODE_RESERVED: u8 = 0x00;

    // Fill Enable (0x26)
    pub const FILL_RECTANGLE_ON: u8 = 0xA1;
    pub const FILL_RECTANGLE_OFF: u8 = 0xA0;

    // Command Lock (0xFD)
    pub const COMMAND_LOCK: u8 = 0x16;
    pub const COMMAND_UNLOCK: u8 = 0x12;
}
