pub mod pass;
pub mod present_pass;
pub mod scene_pass;
