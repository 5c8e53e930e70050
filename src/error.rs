#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("sync word width must be between 1 and 64 bits, got {width}")]
    InvalidSyncWidth { width: u32 },

    #[error("sync word {sync_word:#x} does not fit in {width} bits")]
    SyncWordTooWide { sync_word: u64, width: u32 },

    /// CRC verification was requested for frames that carry no CRC trailer.
    #[error("crc checking requires a crc trailer")]
    CrcCheckWithoutTrailer,

    #[error("max payload length must be between 1 and 255 bytes, got {0}")]
    InvalidMaxPayload(usize),

    #[error("payload of {0} bytes does not fit an 8-bit length field")]
    PayloadTooLong(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
