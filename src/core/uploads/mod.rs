mod upload_service;

pub use upload_service::{
    CoverStorage, CoverUpload, UploadError, UploadService, MAX_COVER_BYTES, PUBLIC_PREFIX,
};
