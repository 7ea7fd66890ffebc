use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera {camera_width}x{camera_height} does not fit in scene {scene_width}x{scene_height}")]
    CameraLargerThanScene {
        camera_width: u32,
        camera_height: u32,
        scene_width: u32,
        scene_height: u32,
    },
    #[error("camera has zero area")]
    EmptyCamera,
    #[error("scene is {actual_width}x{actual_height}, extractor expects {expected_width}x{expected_height}")]
    SceneSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}
