use crate::header::Header;

/// The closed set of message types exchanged over the wire.
///
/// Client requests occupy the even codes `{0, 2, 4, 6, 8}`; server replies
/// occupy `{1, 3, 5, 7, 0xF}`. Any other 4-bit value is rejected by the
/// daemon's dispatcher with an [`MessageType::Error`] reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MessageType {
    /// `0` — client asks the server to return the payload unchanged.
    Echo,
    /// `1` — reply to [`MessageType::Echo`].
    EchoReply,
    /// `2` — client asks for the list of regular files in the served directory.
    DirList,
    /// `3` — reply to [`MessageType::DirList`].
    DirListReply,
    /// `4` — client asks for the size of a named file.
    FileSize,
    /// `5` — reply to [`MessageType::FileSize`].
    FileSizeReply,
    /// `6` — client asks for a byte range of a named file.
    FileRetrieve,
    /// `7` — reply to [`MessageType::FileRetrieve`].
    FileRetrieveReply,
    /// `8` — client asks the server to shut down; no reply is sent.
    Shutdown,
    /// `0xF` — generic error reply, always framed with a zero-length body.
    Error,
    /// Any 4-bit value outside the sets above.
    Unknown(u8),
}

impl MessageType {
    /// Decodes the 4-bit wire value into a [`MessageType`].
    #[must_use]
    pub const fn from_nibble(value: u8) -> Self {
        match value {
            0x0 => Self::Echo,
            0x1 => Self::EchoReply,
            0x2 => Self::DirList,
            0x3 => Self::DirListReply,
            0x4 => Self::FileSize,
            0x5 => Self::FileSizeReply,
            0x6 => Self::FileRetrieve,
            0x7 => Self::FileRetrieveReply,
            0x8 => Self::Shutdown,
            0xF => Self::Error,
            other => Self::Unknown(other),
        }
    }

    /// Encodes this type back into its 4-bit wire value.
    #[must_use]
    pub const fn to_nibble(self) -> u8 {
        match self {
            Self::Echo => 0x0,
            Self::EchoReply => 0x1,
            Self::DirList => 0x2,
            Self::DirListReply => 0x3,
            Self::FileSize => 0x4,
            Self::FileSizeReply => 0x5,
            Self::FileRetrieve => 0x6,
            Self::FileRetrieveReply => 0x7,
            Self::Shutdown => 0x8,
            Self::Error => 0xF,
            Self::Unknown(other) => other,
        }
    }

    /// True for the request types a client is allowed to send (`{0,2,4,6,8}`).
    #[must_use]
    pub const fn is_valid_request(self) -> bool {
        matches!(
            self,
            Self::Echo | Self::DirList | Self::FileSize | Self::FileRetrieve | Self::Shutdown
        )
    }
}

/// A fully parsed frame: header plus payload bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    /// The parsed header (type and flag bits).
    pub header: Header,
    /// The raw payload, exactly `header.length` bytes, still in whatever
    /// compression state the wire `compressed` bit described.
    pub payload: Vec<u8>,
}

impl Message {
    /// Builds a new message from a header and payload.
    #[must_use]
    pub fn new(header: Header, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }
}
