pub mod model_locator;
pub mod rustface_detector;
pub mod serialized_detector;
