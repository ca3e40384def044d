use thiserror::Error;

use crate::bencode::BencodeError;

/// Everything that can go wrong while validating a torrent file.
///
/// Decode failures of the underlying bencode layer pass through unchanged;
/// every structural violation gets its own field-specific variant so a
/// caller can tell exactly which precondition broke first.
#[derive(Error, Debug)]
pub enum TorrentError {
    #[error("error opening file: {0}")]
    FileOpen(#[from] std::io::Error),

    #[error(transparent)]
    Bencode(#[from] BencodeError),

    #[error("the root structure is not a dictionary")]
    RootNotDict,

    #[error("announce key is missing")]
    MissingAnnounceKey,
    #[error("announce key is not a string")]
    AnnounceNotString,

    #[error("info key is missing")]
    MissingInfoKey,
    #[error("info key is not mapped to a dictionary")]
    InfoNotDict,

    #[error("name field is missing in the info dictionary")]
    MissingNameField,
    #[error("name field is not a string")]
    NameNotString,

    #[error("piece length field is missing")]
    MissingPieceLengthField,
    #[error("piece length field is not an integer")]
    PieceLengthNotInt,
    #[error("piece length is negative")]
    PieceLengthNegative,
    #[error("piece length is zero")]
    PieceLengthZero,

    #[error("pieces field is missing")]
    MissingPiecesField,
    #[error("pieces field is not a string")]
    PiecesNotString,
    #[error("pieces field length is not divisible by 20")]
    PiecesLengthNotDivisible,

    #[error("both length and files fields are missing")]
    BothFileModesMissing,
    #[error("both length and files fields are present")]
    BothFileModesPresent,

    #[error("length field is not an integer")]
    LengthNotInt,
    #[error("length field in single-file mode is negative")]
    SingleLengthNegative,
    #[error("length field in single-file mode is zero")]
    SingleLengthZero,

    #[error("files field is not a list")]
    FilesNotList,
    #[error("files list is empty")]
    EmptyFilesList,
    #[error("an item in files field is not a dictionary")]
    FileItemNotDict,
    #[error("length field missing in files item")]
    MissingFileLength,
    #[error("length field in file item is not an integer")]
    FileLengthNotInt,
    #[error("length field in multi-file mode is negative")]
    MultiLengthNegative,
    #[error("length field in multi-file mode is zero")]
    MultiLengthZero,
    #[error("path field missing in files item")]
    MissingFilePath,
    #[error("path field in file item is not a list")]
    FilePathNotList,
    #[error("path fragment in file item is not a string")]
    FilePathFragmentNotString,
}
