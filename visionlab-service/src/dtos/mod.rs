pub mod images;

pub use images::{
    AnalyzeRequest, AnalyzeResponse, GenerateRequest, GenerateResponse, MessageResponse,
    UploadResponse,
};
