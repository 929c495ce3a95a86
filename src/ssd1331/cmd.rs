pub struct Cmd;
impl Cmd {
    // Init
    pub const SET_COLUMN_ADDRESS: u8 = 0x15;
    pub const SET_ROW_ADDRESS: u8 = 0x75;
    pub const MASTER_CURRENT: u8 = 0x87;
    pub const REMAP_COLOR_DEPTH: u8 = 0xA0;
    pub const DISPLAY_START_LINE: u8 = 0xA1;
    pub const DISPLAY_OFFSET: u8 = 0xA2;
    pub const MULTIPLEX_RATIO: u8 = 0xA8;
    pub const MASTER_CONFIG: u8 = 0xAD;
    pub const POWER_SAVE_MODE: u8 = 0xB0;
    pub const PHASE_PERIOD: u8 = 0xB1;
    pub const CLOCK_DIVIDER: u8 = 0xB3;
    pub const PRE_CHARGE_LEVEL: u8 = 0xBB;
    pub const VCOMH: u8 = 0xBE;

    // Power
    pub const DISPLAY_ON_DIM: u8 = 0xAC;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const DIM_MODE_SETTING: u8 = 0xAB;

    // Contrast
    pub const CONTRAST_A: u8 = 0x81;
    pub const CONTRAST_B: u8 = 0x82;
    pub const CONTRAST_C: u8 = 0x83;

    // Graphic acceleration
    pub const DRAW_RECTANGLE: u8 = 0x22;
    pub const FILL_ENABLE: u8 = 0x26;
    pub const CONTINUOUS_SCROLL_SETUP: u8 = 0x27;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const ACTIVATE_SCROLL: u8 = 0x2F;

    // Interface
    pub const COMMAND_LOCK: u8 = 0xFD;
}

/*
Datasheet 9.1 has these too, unused here:
0x21 - Draw Line
0x23 - Copy
0x24 - Dim Window
0x25 - Clear Window
0x8A - Second Pre-charge Speed
*/
