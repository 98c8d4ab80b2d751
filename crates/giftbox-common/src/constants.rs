//! Shared constants for Giftbox components.

/// Scan secret used when the config does not set one
pub const DEFAULT_SCAN_SECRET: &str = "I-LOVE-U_LISA-ARDELIANA";

/// Unlock PIN used when none has been saved
pub const DEFAULT_UNLOCK_PIN: &str = "142";

/// Default application config file
pub const DEFAULT_CONFIG_PATH: &str = "config/giftbox.toml";

/// Default location of the persisted key-value store
pub const DEFAULT_STORE_PATH: &str = "data/giftbox-store.json";

/// Default external decoder used for camera scanning
pub const DEFAULT_SCAN_COMMAND: &str = "zbarcam";

/// Arguments passed to the default decoder (raw payload, no preview window)
pub const DEFAULT_SCAN_ARGS: &[&str] = &["--raw", "--nodisplay", "--quiet"];

/// Delay between replayed scan codes (milliseconds)
pub const DEFAULT_REPLAY_INTERVAL_MS: u64 = 500;

/// Buffered decode events between the scanner and the flow
pub const DECODE_CHANNEL_CAPACITY: usize = 16;

/// Key-value store entries
pub mod storage_keys {
    /// Serialized question list: `[{ id, question, hint, answer }]`
    pub const QUIZ_QUESTIONS: &str = "quiz-questions";

    /// Plain unlock PIN string
    pub const QUIZ_PIN: &str = "quiz-pin";
}

/// Printable scan-code generator
pub mod qr {
    /// Image endpoint that renders a QR code for the `data` query parameter
    pub const GENERATOR_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

    /// Square image size in pixels
    pub const DEFAULT_SIZE: u32 = 300;

    /// Background color (hex, no leading '#')
    pub const DEFAULT_BACKGROUND: &str = "FDF2F4";

    /// Foreground color (hex, no leading '#')
    pub const DEFAULT_FOREGROUND: &str = "831843";

    /// File written by `qr --output` when no name is given
    pub const DEFAULT_DOWNLOAD_FILE: &str = "birthday-invitation-qr.png";

    /// Image download timeout (ms)
    pub const DOWNLOAD_TIMEOUT_MS: u64 = 10_000;
}
