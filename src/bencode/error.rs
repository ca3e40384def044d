use thiserror::Error;

/// Everything that can go wrong while decoding bencoded input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BencodeError {
    // general errors
    #[error("input is empty")]
    EmptyInput,
    #[error("encountered invalid type")]
    InvalidType,
    #[error("maximum nesting limit exceeded")]
    MaxDepthExceeded,
    #[error("unexpected trailing input")]
    TrailingInput,

    // integer errors
    #[error("invalid integer encountered")]
    InvalidInteger,
    #[error("missing integer terminator")]
    MissingIntegerTerminator,
    #[error("integer value out of range")]
    OutOfRangeInteger,

    // string errors
    #[error("invalid string length")]
    InvalidStringLength,
    #[error("string length is negative")]
    NegativeStringLength,
    #[error("signed string length encountered")]
    SignedStringLength,
    #[error("string size exceeds maximum allowed")]
    StringTooLarge,
    #[error("length does not match expected string value")]
    LengthMismatch,
    #[error("missing colon after string length")]
    MissingColon,

    // list errors
    #[error("invalid element in list")]
    InvalidListElement,
    #[error("missing list terminator")]
    MissingListTerminator,

    // dictionary errors
    #[error("missing dictionary terminator")]
    MissingDictTerminator,
    #[error("dictionary key is not a string")]
    NonStringKey,
    #[error("duplicate key in dictionary")]
    DuplicateKey,
    #[error("dictionary keys are not in order")]
    UnorderedKeys,
}
