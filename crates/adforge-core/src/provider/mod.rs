//! External provider clients and the seams they implement.

pub mod google;
pub mod video;

pub use google::{GeminiCritic, GoogleVideoClient};
pub use video::{
    generate_video, GeneratedVideo, GenerationRequest, OperationHandle, OperationStatus,
    VideoGenerator,
};
