//! Face localization for 3D human-cluster detections.
//!
//! Each cluster's head position is projected into the color image as a
//! square ROI, a face detector searches every ROI, and the best face box is
//! written back into the detection's 2D box field.

pub mod config {
    pub mod domain {
        pub mod config_store;
        pub mod face_detection_config;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
        pub mod face_locator;
        pub mod result_merger;
        pub mod roi_projector;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod face_detection_use_case;
    pub mod infrastructure;
    pub mod pipeline_logger;
    pub mod roi_executor;
}

pub mod shared {
    pub mod bounding_box;
    pub mod camera_model;
    pub mod cluster_detection;
    pub mod constants;
    pub mod frame;
    pub mod roi;
    pub mod sensor_frames;
}

pub mod transform {
    pub mod domain {
        pub mod rigid_transform;
        pub mod transform_resolver;
    }
    pub mod infrastructure;
}

pub mod transport {
    pub mod domain {
        pub mod detection_sink;
        pub mod frame_source;
        pub mod frame_visualizer;
    }
    pub mod infrastructure;
}
